use std::fmt;
use std::path::PathBuf;

/// Run-aborting failures. All of them happen before the first write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// CSV file missing or unreadable.
    FileRead { path: PathBuf, message: String },
    /// CSV content is not well-formed.
    Parse { path: PathBuf, line: Option<u64>, message: String },
    /// A row has no value for a mandatory column.
    MissingField { row: usize, line: u64, column: &'static str, record: String },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileRead { path, message } => {
                write!(f, "cannot read {}: {message}", path.display())
            }
            Self::Parse { path, line: Some(line), message } => {
                write!(f, "{}:{line}: malformed CSV: {message}", path.display())
            }
            Self::Parse { path, line: None, message } => {
                write!(f, "{}: malformed CSV: {message}", path.display())
            }
            Self::MissingField { row, line, column, record } => {
                write!(f, "row {row} (line {line}): missing '{column}': {record}")
            }
        }
    }
}

impl std::error::Error for ImportError {}

impl ImportError {
    pub(crate) fn from_csv(path: &std::path::Path, err: csv2wp_io::CsvError) -> Self {
        match err {
            csv2wp_io::CsvError::FileRead { message, .. } => {
                Self::FileRead { path: path.to_path_buf(), message }
            }
            csv2wp_io::CsvError::Parse { line, message } => {
                Self::Parse { path: path.to_path_buf(), line, message }
            }
        }
    }
}
