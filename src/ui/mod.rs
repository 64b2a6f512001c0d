//! egui rendering: filter panel, top bar and the two linked charts.

pub mod panels;
pub mod plot;
