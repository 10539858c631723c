#![no_main]

use libfuzzer_sys::fuzz_target;
use tabula::{Column, Table};

const MAX_INPUT_BYTES: usize = 4 * 1024;

fn sample() -> Table {
    Table::from_columns(vec![
        Column::new("name", vec!["Ada", "Grace Hopper", ""]),
        Column::new("age", vec![36i64, 85, -1]),
        Column::new("score", vec![91.5, f64::NAN, 0.0]),
        Column::new("active", vec![true, false, true]),
    ])
    .unwrap()
}

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_BYTES {
        return;
    }
    let expr = String::from_utf8_lossy(data);

    let table = sample();
    let out = table.query(&expr);

    // Queries only ever narrow the table, and never disturb the source.
    assert!(out.len() <= table.len());
    assert_eq!(table.shape(), (3, 4));
    let _ = out.to_string();
});
