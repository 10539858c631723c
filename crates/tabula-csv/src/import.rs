use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use csv::StringRecord;
use tabula::{
    infer_kind, Column, ColumnData, ErrorKind, FrameError, FrameResult, Scalar, ScalarKind, Table,
};

use crate::options::CsvOptions;

const BOM: char = '\u{feff}';

/// Read delimited text into a table, inferring each column's kind.
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> FrameResult<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        // Headers are handled here so skipped rows and cleaning apply uniformly.
        .has_headers(false)
        // Ragged rows are reported with our own message instead of the csv crate's.
        .flexible(true)
        .from_reader(reader);

    let mut record = StringRecord::new();
    let mut next = |record: &mut StringRecord| -> FrameResult<bool> {
        csv_reader
            .read_record(record)
            .map_err(|err| map_csv_error("ReadCSV", err))
    };

    for _ in 0..options.skip_rows {
        if !next(&mut record)? {
            return Ok(Table::new());
        }
    }

    if !next(&mut record)? {
        return Ok(Table::new());
    }
    let first = fields(&record, true);

    let mut rows: Vec<Vec<String>> = Vec::new();
    let headers = if options.has_header {
        first.iter().map(|h| clean_header(h)).collect()
    } else {
        let names = (0..first.len()).map(|i| format!("Column_{i}")).collect();
        rows.push(first);
        names
    };

    while options.max_rows == 0 || rows.len() < options.max_rows {
        if !next(&mut record)? {
            break;
        }
        rows.push(fields(&record, false));
    }

    table_from_text_rows(headers, rows).map_err(|err| FrameError::wrap("ReadCSV", err))
}

pub fn read_csv_path(path: impl AsRef<Path>, options: &CsvOptions) -> FrameResult<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| io_error("ReadCSV", path, err))?;
    read_csv(BufReader::new(file), options)
}

pub fn read_csv_str(data: &str, options: &CsvOptions) -> FrameResult<Table> {
    read_csv(data.as_bytes(), options)
}

/// Build a table from header names and rows of raw text.
///
/// Every row must have exactly one field per header. Each column takes the most specific kind
/// all of its non-blank values parse as; blank cells become the kind's zero value.
pub fn table_from_text_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> FrameResult<Table> {
    if headers.is_empty() {
        return Ok(Table::new());
    }

    let width = headers.len();
    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(FrameError::parse(
                "BuildTable",
                format!("row {} has {} columns, expected {width}", i + 1, row.len()),
            )
            .with_row(i + 1));
        }
    }

    let mut columns = Vec::with_capacity(width);
    for (idx, name) in headers.into_iter().enumerate() {
        let values: Vec<&str> = rows.iter().map(|row| row[idx].as_str()).collect();
        let kind = infer_kind(&values);
        log::debug!("column {name:?}: inferred {kind} from {} values", values.len());

        let data = convert(&values, kind).map_err(|err| {
            FrameError::wrap("BuildTable", err).with_column(name.as_str())
        })?;
        columns.push(Column::new(name, data));
    }

    Table::from_columns(columns)
}

fn convert(values: &[&str], kind: ScalarKind) -> FrameResult<ColumnData> {
    if kind == ScalarKind::String {
        let strings: Vec<String> = values
            .iter()
            .map(|v| {
                if v.trim().is_empty() {
                    String::new()
                } else {
                    (*v).to_string()
                }
            })
            .collect();
        return Ok(ColumnData::String(strings));
    }

    let scalars = values
        .iter()
        .enumerate()
        .map(|(row, v)| Scalar::parse(v, kind).map_err(|err| err.with_row(row + 1)))
        .collect::<FrameResult<Vec<_>>>()?;
    ColumnData::from_scalars(kind, scalars).map_err(|value| {
        FrameError::type_mismatch(
            "ConvertValue",
            format!("parsed {} value for {kind} column", value.kind()),
        )
    })
}

/// Strip a byte-order mark, trim, and replace spaces and dashes with underscores.
pub(crate) fn clean_header(header: &str) -> String {
    header
        .trim_start_matches(BOM)
        .trim()
        .replace([' ', '-'], "_")
}

fn fields(record: &StringRecord, first: bool) -> Vec<String> {
    record
        .iter()
        .enumerate()
        .map(|(i, field)| {
            if first && i == 0 {
                field.trim_start_matches(BOM).to_string()
            } else {
                field.to_string()
            }
        })
        .collect()
}

pub(crate) fn map_csv_error(op: &str, err: csv::Error) -> FrameError {
    let kind = if err.is_io_error() {
        ErrorKind::Io
    } else {
        ErrorKind::Parse
    };
    let row = err
        .position()
        .map(|p| p.record() as usize)
        .filter(|r| *r > 0);

    let mut out = FrameError::new(kind, op, err.to_string());
    if let Some(row) = row {
        out = out.with_row(row);
    }
    out.with_cause(err)
}

pub(crate) fn io_error(op: &str, path: &Path, err: io::Error) -> FrameError {
    FrameError::new(ErrorKind::Io, op, format!("{}: {err}", path.display())).with_cause(err)
}
