// CSV source records
// Header row gives column names; every following non-blank row becomes one
// SourceRecord. Names and values are trimmed.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Error type for reading CSV input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvError {
    /// File missing or unreadable
    FileRead { path: PathBuf, message: String },
    /// Content is not well-formed delimited text
    Parse { line: Option<u64>, message: String },
}

impl fmt::Display for CsvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvError::FileRead { path, message } => {
                write!(f, "cannot read {}: {}", path.display(), message)
            }
            CsvError::Parse { line: Some(line), message } => {
                write!(f, "CSV parse error at line {}: {}", line, message)
            }
            CsvError::Parse { line: None, message } => write!(f, "CSV parse error: {}", message),
        }
    }
}

impl std::error::Error for CsvError {}

/// One data row, keyed by header name, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceRecord {
    /// 1-based data row number (header excluded, blank lines excluded)
    pub row: usize,
    /// 1-based line in the source file where the row starts
    pub line: u64,
    fields: Vec<(String, String)>,
}

impl SourceRecord {
    pub fn new(row: usize, line: u64, fields: Vec<(String, String)>) -> Self {
        Self { row, line, fields }
    }

    /// Value for a column. First column wins when headers repeat.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v.as_str())
    }

    /// Value for a column, treating an empty cell as absent.
    pub fn get_non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !v.is_empty())
    }

    /// Value for a column, or "" when absent.
    pub fn get_or_empty(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    /// Replace (or append) a column value.
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| k == column) {
            Some((_, v)) => *v = value,
            None => self.fields.push((column.to_string(), value)),
        }
    }

}

impl Serialize for SourceRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Read a CSV file into source records.
pub fn read_records(path: &Path) -> Result<Vec<SourceRecord>, CsvError> {
    let content = read_file_as_utf8(path).map_err(|message| CsvError::FileRead {
        path: path.to_path_buf(),
        message,
    })?;
    read_records_from_str(&content)
}

/// Parse CSV text into source records.
///
/// Rules:
/// - first row is the header
/// - header names and values are trimmed
/// - rows whose cells are all empty are skipped
/// - any other row must have exactly as many cells as the header
/// - a quoted field must close before the end of the input
pub fn read_records_from_str(content: &str) -> Result<Vec<SourceRecord>, CsvError> {
    let content = content.trim_start_matches('\u{feff}');

    if let Some(line) = unterminated_quote(content) {
        return Err(CsvError::Parse {
            line: Some(line),
            message: "unterminated quoted field".to_string(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(parse_error)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(parse_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        if record.len() != headers.len() {
            return Err(CsvError::Parse {
                line: Some(line),
                message: format!(
                    "expected {} fields, found {}",
                    headers.len(),
                    record.len(),
                ),
            });
        }

        let fields = headers
            .iter()
            .cloned()
            .zip(record.iter().map(|v| v.to_string()))
            .collect();
        records.push(SourceRecord::new(records.len() + 1, line, fields));
    }

    Ok(records)
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            // Excel exports are commonly Windows-1252
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Line where a quoted field opens without ever closing.
///
/// A quote only opens a field when it is the field's first byte; `""` inside
/// a quoted field is an escaped quote. The csv reader would otherwise run the
/// open field through to EOF and swallow every following row.
fn unterminated_quote(content: &str) -> Option<u64> {
    let mut line = 1u64;
    let mut opened_at: Option<u64> = None;
    let mut field_start = true;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if opened_at.is_some() {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                }
                '"' => {
                    opened_at = None;
                    field_start = false;
                }
                '\n' => line += 1,
                _ => {}
            }
            continue;
        }

        match c {
            '"' if field_start => opened_at = Some(line),
            '\n' => line += 1,
            _ => {}
        }
        field_start = matches!(c, ',' | '\n' | '\r');
    }

    opened_at
}

fn parse_error(e: csv::Error) -> CsvError {
    CsvError::Parse {
        line: e.position().map(|p| p.line()),
        message: e.to_string(),
    }
}
