#![no_main]

use libfuzzer_sys::fuzz_target;
use tabula_csv::{read_csv, write_csv_string, CsvOptions};

const MAX_INPUT_BYTES: usize = 64 * 1024;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > MAX_INPUT_BYTES {
        return;
    }

    // The quote character cannot double as the delimiter.
    let delimiter = match data[0] {
        b'"' => b',',
        other => other,
    };
    let options = CsvOptions::default().with_delimiter(delimiter);
    let Ok(table) = read_csv(&data[1..], &options) else {
        return;
    };

    // Anything we can read we must be able to write back out.
    let _ = table.describe();
    write_csv_string(&table, &options).unwrap();
});
