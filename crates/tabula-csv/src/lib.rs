#![forbid(unsafe_code)]

mod export;
mod import;
mod options;
mod sniff;

pub use crate::export::{write_csv, write_csv_path, write_csv_string};
pub use crate::import::{read_csv, read_csv_path, read_csv_str, table_from_text_rows};
pub use crate::options::CsvOptions;
pub use crate::sniff::{detect_delimiter, validate_csv, CsvInfo};
