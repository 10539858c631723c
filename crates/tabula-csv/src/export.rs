use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tabula::{zero_timestamp, ErrorKind, FrameError, FrameResult, Scalar, Table};

use crate::import::{io_error, map_csv_error};
use crate::options::CsvOptions;

/// Write a table as delimited text. The header row is written when `options.has_header` is set.
pub fn write_csv<W: Write>(table: &Table, writer: W, options: &CsvOptions) -> FrameResult<()> {
    if let Some(err) = table.error() {
        return Err(err.clone());
    }

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);

    if options.has_header && table.width() > 0 {
        csv_writer
            .write_record(table.column_names())
            .map_err(|err| map_csv_error("WriteCSV", err))?;
    }

    let mut record: Vec<String> = Vec::with_capacity(table.width());
    for row in 0..table.len() {
        record.clear();
        for column in table.columns() {
            record.push(format_field(&column.get(row)?, options)?);
        }
        csv_writer
            .write_record(&record)
            .map_err(|err| map_csv_error("WriteCSV", err).with_row(row + 1))?;
    }

    csv_writer.flush().map_err(|err| {
        FrameError::new(ErrorKind::Io, "WriteCSV", err.to_string()).with_cause(err)
    })
}

pub fn write_csv_path(
    table: &Table,
    path: impl AsRef<Path>,
    options: &CsvOptions,
) -> FrameResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|err| io_error("WriteCSV", path, err))?;
    write_csv(table, BufWriter::new(file), options)
}

pub fn write_csv_string(table: &Table, options: &CsvOptions) -> FrameResult<String> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf, options)?;
    String::from_utf8(buf).map_err(|err| {
        FrameError::parse("WriteCSV", "output is not valid UTF-8").with_cause(err)
    })
}

fn format_field(value: &Scalar, options: &CsvOptions) -> FrameResult<String> {
    let text = match value {
        Scalar::String(s) => s.clone(),
        Scalar::Int64(v) => v.to_string(),
        Scalar::Float64(v) => match options.float_precision {
            Some(precision) => format!("{v:.precision$}"),
            None => v.to_string(),
        },
        Scalar::Bool(v) => v.to_string(),
        Scalar::Timestamp(ts) if *ts == zero_timestamp() => String::new(),
        Scalar::Timestamp(ts) => {
            let mut out = String::new();
            write!(out, "{}", ts.format(&options.datetime_format)).map_err(|_| {
                FrameError::invalid(
                    "WriteCSV",
                    format!("invalid datetime format {:?}", options.datetime_format),
                )
            })?;
            out
        }
    };
    Ok(text)
}
