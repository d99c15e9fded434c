use std::path::Path;
use std::sync::Arc;

use arrow::array::Array;
use arrow::datatypes::Schema;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{
    SurveyRecord, SurveyTable, COL_FACULTY, COL_GPA, COL_JOB, COL_PROGRAM, COL_YEAR,
    COL_YEAR_ALIAS,
};
use crate::error::{DataError, Result, RowError};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// A loaded table plus the number of rows dropped during coercion.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: SurveyTable,
    pub skipped: usize,
}

/// Load a tracer study table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – comma separated with a header row
/// * `.tsv`     – tab separated with a header row
/// * `.json`    – `[{ "Tahun Survey": 2020, "Fakultas": "...", ... }, ...]`
/// * `.parquet` – flat columns with the same names
///
/// Rows that fail coercion are skipped with a warning; a missing file or a
/// missing required column is fatal.
pub fn load_file(path: &Path) -> Result<LoadedTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let loaded = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Loaded {} records from {} ({} malformed rows skipped)",
        loaded.table.len(),
        path.display(),
        loaded.skipped
    );
    Ok(loaded)
}

// ---------------------------------------------------------------------------
// Row coercion shared by every format
// ---------------------------------------------------------------------------

/// The five raw cells of one row, as text.
struct RawRow<'a> {
    year: &'a str,
    faculty: &'a str,
    program: &'a str,
    gpa: &'a str,
    job: &'a str,
}

impl RawRow<'_> {
    fn coerce(&self) -> std::result::Result<SurveyRecord, RowError> {
        let year = parse_year(self.year)?;
        let faculty = required_text(self.faculty, COL_FACULTY)?;
        let program = required_text(self.program, COL_PROGRAM)?;
        let gpa = parse_gpa(self.gpa)?;
        let job = required_text(self.job, COL_JOB)?;
        SurveyRecord::new(year, faculty, program, gpa, job)
    }
}

fn required_text<'a>(s: &'a str, column: &'static str) -> std::result::Result<&'a str, RowError> {
    let s = s.trim();
    if s.is_empty() {
        Err(RowError::EmptyField(column))
    } else {
        Ok(s)
    }
}

fn parse_year(s: &str) -> std::result::Result<i64, RowError> {
    let s = required_text(s, COL_YEAR)?;
    if let Ok(year) = s.parse::<i64>() {
        return Ok(year);
    }
    // Pandas writes integer columns holding NaNs as floats ("2020.0").
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
        _ => Err(RowError::BadYear(s.to_string())),
    }
}

fn parse_gpa(s: &str) -> std::result::Result<f64, RowError> {
    let s = required_text(s, COL_GPA)?;
    s.replace(',', ".")
        .parse::<f64>()
        .map_err(|_| RowError::BadGpa(s.to_string()))
}

/// Accumulates coerced rows, dropping and logging the malformed ones.
#[derive(Default)]
struct RowSink {
    records: Vec<SurveyRecord>,
    skipped: usize,
}

impl RowSink {
    fn push(&mut self, row_no: usize, row: std::result::Result<SurveyRecord, RowError>) {
        match row {
            Ok(record) => self.records.push(record),
            Err(e) => {
                log::warn!("Skipping row {row_no}: {e}");
                self.skipped += 1;
            }
        }
    }

    fn finish(self) -> LoadedTable {
        LoadedTable {
            table: SurveyTable::from_records(self.records),
            skipped: self.skipped,
        }
    }
}

// ---------------------------------------------------------------------------
// CSV / TSV loader
// ---------------------------------------------------------------------------

/// Positions of the required columns in a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndex {
    year: usize,
    faculty: usize,
    program: usize,
    gpa: usize,
    job: usize,
}

impl ColumnIndex {
    fn resolve<'a>(headers: impl Iterator<Item = &'a str> + Clone) -> Result<Self> {
        let find = |name: &'static str| {
            headers
                .clone()
                .position(|h| h.trim() == name)
                .ok_or(DataError::MissingColumn { column: name })
        };
        let year = find(COL_YEAR)
            .or_else(|_| find(COL_YEAR_ALIAS))
            .map_err(|_| DataError::MissingColumn { column: COL_YEAR })?;
        Ok(ColumnIndex {
            year,
            faculty: find(COL_FACULTY)?,
            program: find(COL_PROGRAM)?,
            gpa: find(COL_GPA)?,
            job: find(COL_JOB)?,
        })
    }
}

fn load_delimited(path: &Path, delimiter: u8) -> Result<LoadedTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .map_err(|e| DataError::unavailable(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::unavailable(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let idx = ColumnIndex::resolve(headers.iter().map(|h| h.as_str()))?;

    let mut sink = RowSink::default();
    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(DataError::unavailable(path, e)),
            Err(e) => {
                log::warn!("Skipping row {row_no}: {e}");
                sink.skipped += 1;
                continue;
            }
        };
        let cell = |i: usize| record.get(i).unwrap_or("");
        let raw = RawRow {
            year: cell(idx.year),
            faculty: cell(idx.faculty),
            program: cell(idx.program),
            gpa: cell(idx.gpa),
            job: cell(idx.job),
        };
        sink.push(row_no, raw.coerce());
    }

    Ok(sink.finish())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Tahun Survey": 2020,
///     "Fakultas": "FTI",
///     "Prodi": "Teknik Kimia",
///     "IP": 3.41,
///     "Pekerjaan Utama": "Bekerja"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<LoadedTable> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::unavailable(path, e))?;
    let root: JsonValue =
        serde_json::from_str(&text).map_err(|e| DataError::unavailable(path, e))?;

    let records = root
        .as_array()
        .ok_or_else(|| DataError::unavailable(path, "expected top-level JSON array"))?;

    // A column is missing only when no record carries it; a record lacking a
    // key is an ordinary malformed row.
    let objects: Vec<&Map<String, JsonValue>> =
        records.iter().filter_map(|r| r.as_object()).collect();
    let has_key = |key: &str| objects.iter().any(|obj| obj.contains_key(key));

    let year_key = if objects.is_empty() || has_key(COL_YEAR) {
        COL_YEAR
    } else if has_key(COL_YEAR_ALIAS) {
        COL_YEAR_ALIAS
    } else {
        return Err(DataError::MissingColumn { column: COL_YEAR });
    };
    if !objects.is_empty() {
        for column in [COL_FACULTY, COL_PROGRAM, COL_GPA, COL_JOB] {
            if !has_key(column) {
                return Err(DataError::MissingColumn { column });
            }
        }
    }

    let mut sink = RowSink::default();
    for (row_no, rec) in records.iter().enumerate() {
        let Some(obj) = rec.as_object() else {
            log::warn!("Skipping row {row_no}: not a JSON object");
            sink.skipped += 1;
            continue;
        };
        let year = json_cell(obj, year_key);
        let faculty = json_cell(obj, COL_FACULTY);
        let program = json_cell(obj, COL_PROGRAM);
        let gpa = json_cell(obj, COL_GPA);
        let job = json_cell(obj, COL_JOB);
        let raw = RawRow {
            year: &year,
            faculty: &faculty,
            program: &program,
            gpa: &gpa,
            job: &job,
        };
        sink.push(row_no, raw.coerce());
    }

    Ok(sink.finish())
}

/// Text form of a JSON cell; null and missing keys become empty.
fn json_cell(obj: &Map<String, JsonValue>, key: &str) -> String {
    match obj.get(key) {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat columns named like the CSV header.
///
/// Integer, float and string columns are all accepted; every cell goes through
/// the same coercion as CSV text.  Works with files written by both **Pandas**
/// and **Polars**.
fn load_parquet(path: &Path) -> Result<LoadedTable> {
    let file = std::fs::File::open(path).map_err(|e| DataError::unavailable(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| DataError::unavailable(path, e))?;
    let idx = {
        let schema: &Arc<Schema> = builder.schema();
        ColumnIndex::resolve(schema.fields().iter().map(|f| f.name().as_str()))?
    };
    let reader = builder.build().map_err(|e| DataError::unavailable(path, e))?;

    let mut sink = RowSink::default();
    let mut row_no = 0;

    for batch_result in reader {
        let batch = batch_result.map_err(|e| DataError::unavailable(path, e))?;
        for row in 0..batch.num_rows() {
            let cell = |i: usize| arrow_cell(batch.column(i), row);
            let year = cell(idx.year);
            let faculty = cell(idx.faculty);
            let program = cell(idx.program);
            let gpa = cell(idx.gpa);
            let job = cell(idx.job);
            let raw = RawRow {
                year: &year,
                faculty: &faculty,
                program: &program,
                gpa: &gpa,
                job: &job,
            };
            sink.push(row_no, raw.coerce());
            row_no += 1;
        }
    }

    Ok(sink.finish())
}

/// Text form of an Arrow cell; nulls and unprintable types become empty.
fn arrow_cell(col: &Arc<dyn Array>, row: usize) -> String {
    if col.is_null(row) {
        return String::new();
    }
    array_value_to_string(col, row).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_accepts_integral_floats() {
        assert_eq!(parse_year("2020"), Ok(2020));
        assert_eq!(parse_year(" 2021.0 "), Ok(2021));
        assert_eq!(parse_year("2021.5"), Err(RowError::BadYear("2021.5".into())));
        assert_eq!(parse_year(""), Err(RowError::EmptyField(COL_YEAR)));
    }

    #[test]
    fn gpa_accepts_decimal_comma() {
        assert_eq!(parse_gpa("3,45"), Ok(3.45));
        assert_eq!(parse_gpa("3.45"), Ok(3.45));
        assert_eq!(parse_gpa("n/a"), Err(RowError::BadGpa("n/a".into())));
    }

    #[test]
    fn coerce_rejects_off_scale_gpa() {
        let raw = RawRow {
            year: "2020",
            faculty: "FTI",
            program: "Teknik Kimia",
            gpa: "4.5",
            job: "Bekerja",
        };
        assert_eq!(raw.coerce(), Err(RowError::GpaOutOfRange(4.5)));
    }

    #[test]
    fn coerce_trims_text() {
        let raw = RawRow {
            year: "2020",
            faculty: " FTI ",
            program: "Teknik Kimia ",
            gpa: "3.2",
            job: " Bekerja",
        };
        let rec = raw.coerce().unwrap();
        assert_eq!(rec.faculty, "FTI");
        assert_eq!(rec.program, "Teknik Kimia");
        assert_eq!(rec.primary_job, "Bekerja");
    }

    #[test]
    fn resolve_accepts_year_alias_and_reports_missing() {
        let headers = ["Survey Year", "Fakultas", "Prodi", "IP", "Pekerjaan Utama"];
        let idx = ColumnIndex::resolve(headers.iter().copied()).unwrap();
        assert_eq!(idx.year, 0);
        assert_eq!(idx.job, 4);

        let headers = ["Tahun Survey", "Fakultas", "Prodi", "Pekerjaan Utama"];
        match ColumnIndex::resolve(headers.iter().copied()) {
            Err(DataError::MissingColumn { column }) => assert_eq!(column, COL_GPA),
            other => panic!("expected missing IP column, got {other:?}"),
        }
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = load_file(Path::new("survey.xlsx")).unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat(ext) if ext == "xlsx"));
    }
}
