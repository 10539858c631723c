use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tabula::{ErrorKind, FrameError, FrameResult};

use crate::import::{io_error, map_csv_error};

const SAMPLE_BYTES: u64 = 1024;
const CANDIDATES: [u8; 4] = [b',', b'\t', b';', b'|'];

/// Basic facts about a delimited file, as reported by [`validate_csv`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvInfo {
    pub path: PathBuf,
    pub delimiter: u8,
    /// Records in the file, including a header row if there is one.
    pub rows: usize,
    pub columns: usize,
    pub has_header: bool,
}

/// Guess the delimiter from the first KiB of input.
///
/// The most frequent of `,` `\t` `;` `|` wins; ties go to the earlier candidate, and input with
/// none of them is treated as comma-separated.
pub fn detect_delimiter<R: Read>(reader: R) -> FrameResult<u8> {
    let mut sample = Vec::with_capacity(SAMPLE_BYTES as usize);
    reader.take(SAMPLE_BYTES).read_to_end(&mut sample).map_err(|err| {
        FrameError::new(ErrorKind::Io, "DetectDelimiter", err.to_string()).with_cause(err)
    })?;
    Ok(delimiter_for(&sample))
}

fn delimiter_for(sample: &[u8]) -> u8 {
    let mut best = b',';
    let mut best_count = 0;
    for candidate in CANDIDATES {
        let count = sample.iter().filter(|&&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Check that every record of a file has the same number of fields.
///
/// The delimiter is detected first; the first record is assumed to be a header.
pub fn validate_csv(path: impl AsRef<Path>) -> FrameResult<CsvInfo> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| io_error("ValidateCSV", path, err))?;
    let delimiter = delimiter_for(&bytes[..bytes.len().min(SAMPLE_BYTES as usize)]);

    let mut info = CsvInfo {
        path: path.to_path_buf(),
        delimiter,
        rows: 0,
        columns: 0,
        has_header: true,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes.as_slice());
    let mut record = StringRecord::new();

    while reader
        .read_record(&mut record)
        .map_err(|err| map_csv_error("ValidateCSV", err))?
    {
        if info.rows == 0 {
            info.columns = record.len();
        } else if record.len() != info.columns {
            return Err(FrameError::parse(
                "ValidateCSV",
                format!(
                    "inconsistent column count at row {}: expected {}, got {}",
                    info.rows + 1,
                    info.columns,
                    record.len()
                ),
            )
            .with_row(info.rows + 1));
        }
        info.rows += 1;
    }

    log::debug!(
        "validated {}: {} rows x {} columns, delimiter {:?}",
        path.display(),
        info.rows,
        info.columns,
        delimiter as char
    );
    Ok(info)
}
