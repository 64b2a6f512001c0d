use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{
    COL_BOOSTER_CATEGORY, COL_CLASS, COL_LAUNCH_SITE, COL_PAYLOAD_MASS, LaunchDataset,
    LaunchRecord, Outcome, REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch-records dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least the four launch columns
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – flat columns with the same names
///
/// Any other columns are ignored.
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Row shape shared by the CSV and JSON loaders
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawLaunchRow {
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass: f64,
    #[serde(rename = "Booster Version Category")]
    booster_category: String,
    #[serde(rename = "class")]
    class: f64,
}

impl RawLaunchRow {
    fn into_record(self, row: usize) -> Result<LaunchRecord> {
        validate_row(
            row,
            self.launch_site,
            self.payload_mass,
            self.booster_category,
            self.class,
        )
    }
}

fn validate_row(
    row: usize,
    launch_site: String,
    payload_mass: f64,
    booster_category: String,
    class: f64,
) -> Result<LaunchRecord> {
    let launch_site = launch_site.trim().to_string();
    if launch_site.is_empty() {
        bail!("Row {row}: empty '{COL_LAUNCH_SITE}'");
    }
    if !payload_mass.is_finite() || payload_mass < 0.0 {
        bail!("Row {row}: '{COL_PAYLOAD_MASS}' must be a non-negative number, got {payload_mass}");
    }
    let outcome = Outcome::from_class(class)
        .with_context(|| format!("Row {row}: '{COL_CLASS}' must be 0 or 1, got {class}"))?;

    Ok(LaunchRecord {
        launch_site,
        payload_mass,
        booster_category: booster_category.trim().to_string(),
        outcome,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one launch per row.
fn load_csv(path: &Path) -> Result<LaunchDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            bail!("CSV missing '{col}' column");
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RawLaunchRow>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(raw.into_record(row_no)?);
    }

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<LaunchDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<RawLaunchRow> = serde_json::from_str(&text).context("parsing JSON")?;

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, raw)| raw.into_record(i))
        .collect::<Result<Vec<_>>>()?;

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding flat launch columns.
///
/// Payload mass and class may be stored as Float64, Float32, Int64 or Int32;
/// site and booster category as Utf8 or LargeUtf8.
fn load_parquet(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let site_col = column_by_name(&batch, COL_LAUNCH_SITE)?;
        let mass_col = column_by_name(&batch, COL_PAYLOAD_MASS)?;
        let booster_col = column_by_name(&batch, COL_BOOSTER_CATEGORY)?;
        let class_col = column_by_name(&batch, COL_CLASS)?;

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let rec = validate_row(
                row_no,
                extract_string(site_col, row)
                    .with_context(|| format!("Row {row_no}: failed to read '{COL_LAUNCH_SITE}'"))?,
                extract_f64(mass_col, row)
                    .with_context(|| format!("Row {row_no}: failed to read '{COL_PAYLOAD_MASS}'"))?,
                extract_string(booster_col, row).with_context(|| {
                    format!("Row {row_no}: failed to read '{COL_BOOSTER_CATEGORY}'")
                })?,
                extract_f64(class_col, row)
                    .with_context(|| format!("Row {row_no}: failed to read '{COL_CLASS}'"))?,
            )?;
            records.push(rec);
        }
    }

    Ok(LaunchDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn column_by_name<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Arc<dyn Array>> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

/// Extract a numeric cell as `f64`.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in numeric column");
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .value(row),
        DataType::Float32 => f64::from(
            any.downcast_ref::<Float32Array>()
                .context("expected Float32Array")?
                .value(row),
        ),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .value(row) as f64,
        DataType::Int32 => f64::from(
            any.downcast_ref::<Int32Array>()
                .context("expected Int32Array")?
                .value(row),
        ),
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    Ok(value)
}

/// Extract a text cell.
fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in text column");
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .context("expected StringArray")?
            .value(row),
        DataType::LargeUtf8 => any
            .downcast_ref::<LargeStringArray>()
            .context("expected LargeStringArray")?
            .value(row),
        other => bail!("Expected a string column, got {other:?}"),
    };
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;
    use tempfile::Builder;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn csv_loads_required_columns_and_ignores_others() {
        let file = write_temp(
            ".csv",
            "Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category\n\
             1,CCAFS LC-40,0,0,F9 v1.0  B0003,v1.0\n\
             2,CCAFS LC-40,1,525.0,F9 v1.0  B0004,v1.0\n\
             3,VAFB SLC-4E,1,9600,F9 FT B1029.1,FT\n",
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.sites, vec!["CCAFS LC-40", "VAFB SLC-4E"]);
        assert_eq!(ds.payload_bounds, Some((0.0, 9600.0)));
        assert_eq!(ds.records[1].outcome, Outcome::Success);
        assert_eq!(ds.records[2].booster_category, "FT");
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let file = write_temp(".csv", "Launch Site,class,Payload Mass (kg)\nCCAFS LC-40,1,500\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Booster Version Category"));
    }

    #[test]
    fn csv_rejects_bad_class_and_negative_payload() {
        let bad_class = write_temp(
            ".csv",
            "Launch Site,Payload Mass (kg),Booster Version Category,class\nKSC LC-39A,500,FT,3\n",
        );
        let err = load_file(bad_class.path()).unwrap_err();
        assert!(format!("{err:#}").contains("must be 0 or 1"));

        let negative = write_temp(
            ".csv",
            "Launch Site,Payload Mass (kg),Booster Version Category,class\nKSC LC-39A,-1,FT,1\n",
        );
        let err = load_file(negative.path()).unwrap_err();
        assert!(format!("{err:#}").contains("non-negative"));
    }

    #[test]
    fn csv_non_numeric_payload_names_the_row() {
        let file = write_temp(
            ".csv",
            "Launch Site,Payload Mass (kg),Booster Version Category,class\nKSC LC-39A,heavy,FT,1\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 0"));
    }

    #[test]
    fn json_records_load() {
        let file = write_temp(
            ".json",
            r#"[
                {"Launch Site": "KSC LC-39A", "Payload Mass (kg)": 2490, "Booster Version Category": "FT", "class": 1, "Flight Number": 7},
                {"Launch Site": "CCAFS SLC-40", "Payload Mass (kg)": 4707.5, "Booster Version Category": "B5", "class": 0}
            ]"#,
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].payload_mass, 4707.5);
        assert_eq!(ds.records[1].outcome, Outcome::Failure);
    }

    #[test]
    fn parquet_with_integer_columns_loads() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_LAUNCH_SITE, DataType::Utf8, false),
            Field::new(COL_PAYLOAD_MASS, DataType::Float64, false),
            Field::new(COL_BOOSTER_CATEGORY, DataType::Utf8, false),
            Field::new(COL_CLASS, DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["VAFB SLC-4E", "KSC LC-39A"])),
                Arc::new(Float64Array::from(vec![500.0, 3600.0])),
                Arc::new(StringArray::from(vec!["v1.1", "B4"])),
                Arc::new(Int64Array::from(vec![0, 1])),
            ],
        )
        .unwrap();

        let file = Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.sites, vec!["VAFB SLC-4E", "KSC LC-39A"]);
        assert_eq!(ds.records[1].outcome, Outcome::Success);
        assert_eq!(ds.payload_bounds, Some((500.0, 3600.0)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_temp(".xlsx", "");
        assert!(load_file(file.path()).is_err());
    }
}
