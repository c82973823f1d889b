use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{CellValue, Dataset};

/// Column names in source order plus one map of named cells per row.
type RawTable = (Vec<String>, Vec<BTreeMap<String, CellValue>>);

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an employee table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row followed by one employee per line (recommended)
/// * `.json`    – `[{ "Age": 41, "Attrition": "Yes", ... }, ...]`
/// * `.parquet` – flat table as written by Pandas or Polars
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (columns, rows) = match ext.as_str() {
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    Dataset::from_rows(columns, rows)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one record per line.
/// Cell types are guessed per cell, the way a dataframe reader would.
fn read_csv(path: &Path) -> Result<RawTable, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let cells = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), guess_cell_type(value.trim())))
            .collect();
        rows.push(cells);
    }

    Ok((headers, rows))
}

/// Spellings of a missing value that dataframe writers put in CSV output.
const NA_TOKENS: [&str; 7] = ["NaN", "nan", "NA", "N/A", "null", "NULL", "None"];

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() || NA_TOKENS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Age": 41, "Attrition": "Yes", "Department": "Sales", ... },
///   ...
/// ]
/// ```
fn read_json(path: &Path) -> Result<RawTable, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected top-level JSON array".into()))?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Malformed(format!("row {i} is not a JSON object")))?;

        let mut cells = BTreeMap::new();
        for (key, val) in obj {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            cells.insert(key.clone(), json_to_cell(val));
        }
        rows.push(cells);
    }

    Ok((columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Columns of unsupported Arrow types
/// are rejected so a required column can never silently turn into text.
fn read_parquet(path: &Path) -> Result<RawTable, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let mut cells = BTreeMap::new();
            for (col_idx, field) in schema.fields().iter().enumerate() {
                let value = extract_cell(batch.column(col_idx), row)
                    .map_err(|msg| LoadError::invalid(rows.len(), field.name(), msg))?;
                cells.insert(field.name().clone(), value);
            }
            rows.push(cells);
        }
    }

    Ok((columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue, String> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }

    fn downcast<T: 'static>(col: &Arc<dyn Array>) -> Result<&T, String> {
        col.as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| format!("unexpected array layout for {:?}", col.data_type()))
    }

    let value = match col.data_type() {
        DataType::Utf8 => CellValue::String(downcast::<StringArray>(col)?.value(row).to_string()),
        DataType::LargeUtf8 => {
            CellValue::String(downcast::<LargeStringArray>(col)?.value(row).to_string())
        }
        DataType::Int32 => CellValue::Integer(downcast::<Int32Array>(col)?.value(row) as i64),
        DataType::Int64 => CellValue::Integer(downcast::<Int64Array>(col)?.value(row)),
        DataType::Float32 => CellValue::Float(downcast::<Float32Array>(col)?.value(row) as f64),
        DataType::Float64 => CellValue::Float(downcast::<Float64Array>(col)?.value(row)),
        DataType::Boolean => CellValue::Bool(downcast::<BooleanArray>(col)?.value(row)),
        other => return Err(format!("unsupported column type {other:?}")),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::{CategoryField, NumericField, required_columns};

    const HEADER: &str = "Age,Attrition,Department,Gender,JobRole,MaritalStatus,EducationField,OverTime,\
MonthlyIncome,TotalWorkingYears,YearsAtCompany,TrainingTimesLastYear,JobSatisfaction,\
PerformanceRating,WorkLifeBalance,EnvironmentSatisfaction,RelationshipSatisfaction,DistanceFromHome";

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_csv_with_extra_columns() {
        let csv = format!(
            "{HEADER}\n\
             41,Yes,Sales,Female,Sales Executive,Single,Life Sciences,Yes,5993,8,6,0,4,3,1,2,1,1\n\
             49,No,Research & Development,Male,Research Scientist,Married,Life Sciences,No,5130,10,10,3,2,4,3,3,4,8\n"
        );
        let file = write_temp(".csv", &csv);

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names.len(), 18);
        assert_eq!(ds.column_names[0], "Age");
        assert_eq!(ds.employees[0].category(CategoryField::JobRole), "Sales Executive");
        assert_eq!(ds.employees[1].numeric(NumericField::MonthlyIncome), 5130.0);
        assert_eq!(ds.employees[1].numeric_column("DistanceFromHome"), Some(8.0));
    }

    #[test]
    fn csv_missing_columns_fails() {
        let file = write_temp(".csv", "Age,Department\n30,Sales\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumns(ref cols) if cols.contains(&"Attrition".to_string())));
    }

    #[test]
    fn csv_non_numeric_income_fails() {
        let csv = format!(
            "{HEADER}\n41,Yes,Sales,Female,Sales Executive,Single,Life Sciences,Yes,lots,8,6,0,4,3,1,2,1,1\n"
        );
        let file = write_temp(".csv", &csv);
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { row: 0, ref column, .. } if column == "MonthlyIncome"));
    }

    #[test]
    fn csv_nan_income_is_rejected() {
        for token in ["NaN", "nan", "inf", "NA"] {
            let csv = format!(
                "{HEADER}\n\
                 41,Yes,Sales,Female,Sales Executive,Single,Life Sciences,Yes,4000,8,6,0,4,3,1,2,1,1\n\
                 35,No,Sales,Male,Manager,Married,Medical,No,{token},8,6,0,4,3,1,2,1,1\n"
            );
            let file = write_temp(".csv", &csv);
            let err = load_file(file.path()).unwrap_err();
            assert!(
                matches!(err, LoadError::InvalidValue { row: 1, ref column, .. } if column == "MonthlyIncome"),
                "{token}: {err}"
            );
        }
    }

    #[test]
    fn csv_na_tokens_become_null() {
        let csv = format!(
            "{HEADER}\n\
             41,Yes,Sales,Female,Sales Executive,Single,Life Sciences,Yes,4000,8,6,0,4,3,1,2,1,NaN\n\
             35,No,Sales,Male,Manager,Married,Medical,No,6000,8,6,0,4,3,1,2,1,N/A\n"
        );
        let file = write_temp(".csv", &csv);
        let ds = load_file(file.path()).unwrap();
        assert!(ds.employees.iter().all(|e| e.extra["DistanceFromHome"].is_null()));
        assert_eq!(guess_cell_type("null"), CellValue::Null);
        assert_eq!(guess_cell_type("2.5"), CellValue::Float(2.5));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_file(Path::new("/definitely/not/here/EA.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_temp(".xlsx", "");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ref ext) if ext == "xlsx"));
    }

    #[test]
    fn loads_json_records() {
        let json = r#"[
            {"Age": 33, "Attrition": "No", "Department": "Sales", "Gender": "Male",
             "JobRole": "Manager", "MaritalStatus": "Divorced", "EducationField": "Medical",
             "OverTime": "No", "MonthlyIncome": 10250.5, "TotalWorkingYears": 12.0,
             "YearsAtCompany": 4, "TrainingTimesLastYear": 2, "JobSatisfaction": 3,
             "PerformanceRating": 3, "WorkLifeBalance": 2, "EnvironmentSatisfaction": 4,
             "RelationshipSatisfaction": 1, "StockOptionLevel": null}
        ]"#;
        let file = write_temp(".json", json);
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.employees[0].monthly_income, 10250.5);
        assert_eq!(ds.employees[0].total_working_years, 12);
        assert!(ds.employees[0].extra["StockOptionLevel"].is_null());
    }

    #[test]
    fn json_must_be_an_array() {
        let file = write_temp(".json", r#"{"Age": 1}"#);
        assert!(matches!(load_file(file.path()), Err(LoadError::Malformed(_))));
    }

    #[test]
    fn loads_parquet_table() {
        let mut fields = Vec::new();
        let mut arrays: Vec<Arc<dyn Array>> = Vec::new();
        for col in required_columns() {
            match col {
                "MonthlyIncome" => {
                    fields.push(Field::new(col, DataType::Float64, false));
                    arrays.push(Arc::new(Float64Array::from(vec![4200.0, 6100.0])));
                }
                "Age" => {
                    fields.push(Field::new(col, DataType::Int64, false));
                    arrays.push(Arc::new(Int64Array::from(vec![29, 52])));
                }
                c if CategoryField::ALL.iter().any(|f| f.column() == c) => {
                    fields.push(Field::new(col, DataType::Utf8, false));
                    arrays.push(Arc::new(StringArray::from(vec!["A", "B"])));
                }
                _ => {
                    fields.push(Field::new(col, DataType::Int32, false));
                    arrays.push(Arc::new(Int32Array::from(vec![1, 2])));
                }
            }
        }
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(std::fs::File::create(file.path()).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.employees[1].age, 52);
        assert_eq!(ds.employees[0].department, "A");
        assert_eq!(ds.employees[1].work_life_balance, 2);
    }
}
