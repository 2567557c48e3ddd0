use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{
    Array, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DatasetError;
use super::model::{CellValue, RawTable, ResultsDataset};

/// Spreadsheet extensions handled by calamine.
pub const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Every extension `load_file` accepts.
pub const SUPPORTED_EXTENSIONS: [&str; 9] =
    ["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "json", "parquet", "pq"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a results dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * spreadsheets (`.xlsx`, `.xls`, ...) – the sheet called `sheet`
/// * `.csv`     – header row with column names
/// * `.json`    – `[{ "Class": "A", "CGPA": 8.1, ... }, ...]`
/// * `.parquet` – flat columns, one row per student
///
/// The decoded table must carry every identity column; all other columns are
/// score columns.
pub fn load_file(path: &Path, sheet: &str) -> Result<ResultsDataset> {
    decode_file(path, sheet)
        .and_then(|table| ResultsDataset::from_table(table).map_err(anyhow::Error::from))
        .with_context(|| format!("dataset unavailable: {}", path.display()))
}

fn decode_file(path: &Path, sheet: &str) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        e if SPREADSHEET_EXTENSIONS.contains(&e) => load_spreadsheet(path, sheet),
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DatasetError::UnsupportedFormat(other.to_string()).into()),
    }
}

/// Name for a header cell; blank headers get a positional name.
fn header_name(idx: usize, raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("column_{}", idx + 1)
    } else {
        trimmed.to_string()
    }
}

/// Whole-number floats become integers, so `3.0` and `3` are one category.
/// NaN and infinities are missing marks.
fn number_cell(v: f64) -> CellValue {
    if !v.is_finite() {
        CellValue::Null
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        CellValue::Integer(v as i64)
    } else {
        CellValue::Float(v)
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_spreadsheet(path: &Path, sheet: &str) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let sheet_names = workbook.sheet_names().to_vec();
    if !sheet_names.iter().any(|name| name == sheet) {
        return Err(DatasetError::MissingSheet {
            sheet: sheet.to_string(),
            available: sheet_names.join(", "),
        }
        .into());
    }

    let range = workbook
        .worksheet_range(sheet)
        .with_context(|| format!("reading sheet '{sheet}'"))?;
    // Blank rows are skipped everywhere, including above the header.
    let mut rows = range
        .rows()
        .filter(|r| r.iter().any(|c| !matches!(c, Data::Empty)));

    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| DatasetError::EmptySheet(sheet.to_string()))?
        .iter()
        .enumerate()
        .map(|(i, c)| header_name(i, &c.to_string()))
        .collect();

    let rows = rows
        .map(|r| r.iter().map(spreadsheet_cell).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn spreadsheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => number_cell(*f),
        Data::String(s) if s.trim().is_empty() => CellValue::Null,
        Data::String(s) => CellValue::String(s.trim().to_string()),
        Data::Empty | Data::Error(_) => CellValue::Null,
        // Dates and booleans are display-only.
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .enumerate()
        .map(|(i, h)| header_name(i, h))
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(RawTable { headers, rows })
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return number_cell(f);
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Columns are the union of record keys in first-seen file order.
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut objects = Vec::with_capacity(records.len());
    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map_or(CellValue::Null, json_to_cell))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) if s.trim().is_empty() => CellValue::Null,
        JsonValue::String(s) => CellValue::String(s.trim().to_string()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                number_cell(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table, one row per student.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .enumerate()
        .map(|(i, f)| header_name(i, f.name()))
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| extract_cell_value(col, row))
                    .collect(),
            );
        }
    }

    Ok(RawTable { headers, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell_value(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|a| guess_text(a.value(row))),
        DataType::LargeUtf8 => any
            .downcast_ref::<LargeStringArray>()
            .map(|a| guess_text(a.value(row))),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| number_cell(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| number_cell(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| CellValue::String(a.value(row).to_string())),
        other => Some(CellValue::String(format!("{other:?}"))),
    };
    value.unwrap_or(CellValue::Null)
}

fn guess_text(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        CellValue::Null
    } else {
        CellValue::String(s.to_string())
    }
}
