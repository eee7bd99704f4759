use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::{DataError, Result};
use super::model::{
    COL_CATEGORY, COL_CATEGORY_ALIAS, COL_DEPARTMENT, COL_LATITUDE, COL_LONGITUDE, COL_VALUE,
    COLUMNS, Measurement, MeasurementRecord, MeasurementTable,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a measurement table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row `Departamento,Categoría,Valor,Latitud,Longitud`
/// * `.json`    – `[{ "Departamento": "...", "Categoría": "A", ... }, ...]`
/// * `.parquet` – the same five columns; numeric columns of any int/float type
pub fn load_file(path: &Path) -> Result<MeasurementTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => read_csv(open(path)?)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedExtension(other.to_string())),
    };

    Ok(MeasurementTable::from_rows(rows))
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV measurements from any reader.
///
/// Extra columns are ignored; a missing required column is reported by name
/// before any row is parsed. Empty numeric cells load as NaN; text that is
/// not a number is still an error.
pub fn read_csv<R: std::io::Read>(input: R) -> Result<Vec<Measurement>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);

    let headers = reader.headers()?.clone();
    for col in COLUMNS {
        let present = headers
            .iter()
            .any(|h| h == col || (col == COL_CATEGORY && h == COL_CATEGORY_ALIAS));
        if !present {
            return Err(DataError::MissingColumn(col));
        }
    }

    reader
        .deserialize::<MeasurementRecord>()
        .map(|row| row.map(Measurement::from).map_err(DataError::from))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Missing numbers are written there as `null`.
fn load_json(path: &Path) -> Result<Vec<Measurement>> {
    let reader = BufReader::new(open(path)?);
    let records: Vec<MeasurementRecord> = serde_json::from_reader(reader)?;
    Ok(records.into_iter().map(Measurement::from).collect())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

fn load_parquet(path: &Path) -> Result<Vec<Measurement>> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        rows.extend(batch_to_measurements(&batch?)?);
    }
    Ok(rows)
}

/// Convert one Arrow record batch into measurements.
pub fn batch_to_measurements(batch: &RecordBatch) -> Result<Vec<Measurement>> {
    let department = string_column(batch, COL_DEPARTMENT, None)?;
    let category = string_column(batch, COL_CATEGORY, Some(COL_CATEGORY_ALIAS))?;
    let value = f64_column(batch, COL_VALUE)?;
    let latitude = f64_column(batch, COL_LATITUDE)?;
    let longitude = f64_column(batch, COL_LONGITUDE)?;

    let department = as_strings(&department)?;
    let category = as_strings(&category)?;
    let value = as_f64s(&value)?;
    let latitude = as_f64s(&latitude)?;
    let longitude = as_f64s(&longitude)?;

    Ok((0..batch.num_rows())
        .map(|row| Measurement {
            department: string_at(department, row),
            category: string_at(category, row),
            value: f64_at(value, row),
            latitude: f64_at(latitude, row),
            longitude: f64_at(longitude, row),
        })
        .collect())
}

// -- Arrow helpers --

fn column(batch: &RecordBatch, name: &'static str, alias: Option<&str>) -> Result<ArrayRef> {
    batch
        .column_by_name(name)
        .or_else(|| alias.and_then(|a| batch.column_by_name(a)))
        .cloned()
        .ok_or(DataError::MissingColumn(name))
}

fn string_column(batch: &RecordBatch, name: &'static str, alias: Option<&str>) -> Result<ArrayRef> {
    Ok(cast(&column(batch, name, alias)?, &DataType::Utf8)?)
}

fn f64_column(batch: &RecordBatch, name: &'static str) -> Result<ArrayRef> {
    Ok(cast(&column(batch, name, None)?, &DataType::Float64)?)
}

fn as_strings(col: &ArrayRef) -> Result<&StringArray> {
    col.as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| arrow::error::ArrowError::CastError("expected Utf8 column".into()).into())
}

fn as_f64s(col: &ArrayRef) -> Result<&Float64Array> {
    col.as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| arrow::error::ArrowError::CastError("expected Float64 column".into()).into())
}

fn string_at(col: &StringArray, row: usize) -> String {
    if col.is_null(row) {
        String::new()
    } else {
        col.value(row).to_string()
    }
}

/// Nulls become NaN so the table drops the row.
fn f64_at(col: &Float64Array, row: usize) -> f64 {
    if col.is_null(row) {
        f64::NAN
    } else {
        col.value(row)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float32Array, Int64Array};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    const SAMPLE: &str = "\
Departamento,Categoría,Valor,Latitud,Longitud
Antioquia,A,0.0123,6.2442,-75.5812
Cundinamarca,B,0.0456,4.7110,-74.0721
Valle del Cauca,C,0.0789,3.4516,-76.5320
";

    #[test]
    fn test_read_csv() {
        let rows = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], Measurement::new("Antioquia", "A", 0.0123, 6.2442, -75.5812));
        assert_eq!(rows[2].department, "Valle del Cauca");
    }

    #[test]
    fn test_read_csv_accepts_unaccented_header_and_extra_columns() {
        let csv = "Id,Departamento,Categoria,Valor,Latitud,Longitud\n7,Meta,B,1.5,4.1,-73.6\n";
        let rows = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows, vec![Measurement::new("Meta", "B", 1.5, 4.1, -73.6)]);
    }

    #[test]
    fn test_read_csv_missing_column() {
        let csv = "Departamento,Categoría,Valor,Latitud\nMeta,B,1.5,4.1\n";
        match read_csv(csv.as_bytes()) {
            Err(DataError::MissingColumn(col)) => assert_eq!(col, COL_LONGITUDE),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn test_read_csv_malformed_value() {
        let csv = "Departamento,Categoría,Valor,Latitud,Longitud\nMeta,B,alto,4.1,-73.6\n";
        assert!(matches!(read_csv(csv.as_bytes()), Err(DataError::Csv(_))));
    }

    #[test]
    fn test_empty_csv_cell_skips_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("con_vacios.csv");
        std::fs::write(
            &path,
            "Departamento,Categoría,Valor,Latitud,Longitud\n\
             Meta,A,1.5,4.1,-73.6\n\
             Meta,B,,4.1,-73.6\n",
        )
        .unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.rows, vec![Measurement::new("Meta", "A", 1.5, 4.1, -73.6)]);
        assert_eq!(table.skipped_rows, 1);
    }

    #[test]
    fn test_load_file_csv_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ambiente_calidad_aire.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.categories.len(), 3);

        let missing = dir.path().join("nope.csv");
        assert!(matches!(load_file(&missing), Err(DataError::Io { .. })));

        let txt = dir.path().join("data.txt");
        std::fs::write(&txt, SAMPLE).unwrap();
        assert!(matches!(
            load_file(&txt),
            Err(DataError::UnsupportedExtension(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn test_load_file_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"Departamento":"Cesar","Categoría":"C","Valor":2.5,"Latitud":10.46,"Longitud":-73.25}}]"#
        )
        .unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.rows, vec![Measurement::new("Cesar", "C", 2.5, 10.46, -73.25)]);
    }

    #[test]
    fn test_json_null_value_skips_row() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"Departamento":"Meta","Categoría":"B","Valor":null,"Latitud":4.1,"Longitud":-73.6}},
                {{"Departamento":"Meta","Categoría":"A","Valor":0.5,"Latitud":4.1,"Longitud":-73.6}}]"#
        )
        .unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.rows, vec![Measurement::new("Meta", "A", 0.5, 4.1, -73.6)]);
        assert_eq!(table.skipped_rows, 1);
    }

    #[test]
    fn test_load_file_parquet_with_mixed_numeric_types() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_DEPARTMENT, DataType::Utf8, false),
            Field::new(COL_CATEGORY, DataType::Utf8, false),
            Field::new(COL_VALUE, DataType::Int64, true),
            Field::new(COL_LATITUDE, DataType::Float32, false),
            Field::new(COL_LONGITUDE, DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Caldas", "Caldas"])),
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(Int64Array::from(vec![Some(3), None])),
                Arc::new(Float32Array::from(vec![5.0, 5.5])),
                Arc::new(Float64Array::from(vec![-75.5, -75.25])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let out = File::create(file.path()).unwrap();
        let mut writer = ArrowWriter::try_new(out, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.rows, vec![Measurement::new("Caldas", "A", 3.0, 5.0, -75.5)]);
        assert_eq!(table.skipped_rows, 1);
    }

    #[test]
    fn test_batch_missing_column() {
        let schema = Arc::new(Schema::new(vec![Field::new(COL_DEPARTMENT, DataType::Utf8, false)]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(vec!["Meta"]))]).unwrap();
        assert!(matches!(
            batch_to_measurements(&batch),
            Err(DataError::MissingColumn(COL_CATEGORY))
        ));
    }
}
