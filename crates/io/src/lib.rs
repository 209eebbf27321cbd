// File I/O operations

pub mod records;

pub use records::{read_file_as_utf8, read_records, read_records_from_str, CsvError, SourceRecord};
