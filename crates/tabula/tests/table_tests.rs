use std::collections::HashMap;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tabula::{Column, ColumnData, Scalar, ScalarKind, Table, Timestamp};

fn ts(y: i32, m: u32, d: u32) -> Timestamp {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap()
}

fn people() -> Table {
    Table::from_columns(vec![
        Column::new("name", vec!["Ada", "Grace", "Linus", "Ken"]),
        Column::new("age", vec![36i64, 45, 28, 52]),
        Column::new("score", vec![91.5, 78.0, 88.25, 60.0]),
        Column::new("active", vec![true, false, true, true]),
    ])
    .unwrap()
}

#[test]
fn shape_and_accessors() {
    let table = people();
    assert_eq!(table.shape(), (4, 4));
    assert_eq!(table.column_names(), ["name", "age", "score", "active"]);
    assert!(table.has_column("score"));
    assert!(!table.has_column("missing"));
    assert_eq!(table.column_kind("age").unwrap(), ScalarKind::Int64);
    assert!(table.column_kind("missing").unwrap_err().is_column_not_found());
    assert_eq!(table.get(1, "name").unwrap(), Scalar::from("Grace"));
    assert!(table.get(4, "name").unwrap_err().is_index_out_of_range());
    assert_eq!(table.column("age").unwrap().as_i64(), Some(&[36, 45, 28, 52][..]));
}

#[test]
fn column_names_are_a_defensive_copy() {
    let table = people();
    let mut names = table.column_names();
    names.clear();
    assert_eq!(table.width(), 4);
}

#[test]
fn from_columns_rejects_inconsistent_input() {
    let err = Table::from_columns(vec![
        Column::new("a", vec![1i64, 2]),
        Column::new("b", vec![1i64]),
    ])
    .unwrap_err();
    assert!(err.is_invalid_operation());
    assert_eq!(err.column(), Some("b"));

    let err = Table::from_columns(vec![
        Column::new("a", vec![1i64]),
        Column::new("a", vec![2i64]),
    ])
    .unwrap_err();
    assert_eq!(err.column(), Some("a"));

    assert_eq!(Table::from_columns(Vec::new()).unwrap().shape(), (0, 0));
}

#[test]
fn from_map_orders_columns_by_name() {
    for _ in 0..20 {
        let mut data: HashMap<&str, ColumnData> = HashMap::new();
        data.insert("zeta", vec![1i64, 2].into());
        data.insert("alpha", vec!["x", "y"].into());
        data.insert("Mid", vec![0.5, 1.5].into());
        data.insert("beta", vec![true, false].into());
        let table = Table::from_map(data).unwrap();
        assert_eq!(table.column_names(), ["Mid", "alpha", "beta", "zeta"]);
    }
}

#[test]
fn from_map_rejects_ragged_columns() {
    let err = Table::from_map([("a", ColumnData::from(vec![1i64, 2])), ("b", vec![1i64].into())])
        .unwrap_err();
    assert_eq!(err.op(), "NewTableFromMap");
    assert!(err.is_invalid_operation());
}

#[test]
fn set_writes_in_place_with_checks() {
    let mut table = people();
    table.set(2, "age", 29i64).unwrap();
    assert_eq!(table.get(2, "age").unwrap(), Scalar::Int64(29));

    assert!(table.set(2, "age", "old").unwrap_err().is_type_mismatch());
    assert!(table.set(9, "age", 1i64).unwrap_err().is_index_out_of_range());
    assert!(table.set(0, "missing", 1i64).unwrap_err().is_column_not_found());
}

#[test]
fn copy_is_independent_in_both_directions() {
    let mut original = people();
    let mut copy = original.copy();

    copy.set(0, "name", "Changed").unwrap();
    assert_eq!(original.get(0, "name").unwrap(), Scalar::from("Ada"));

    original.set(1, "score", 0.0).unwrap();
    assert_eq!(copy.get(1, "score").unwrap(), Scalar::Float64(78.0));
}

#[test]
fn get_column_returns_a_copy() {
    let table = people();
    let mut column = table.get_column("age").unwrap();
    column.set(0, 99i64).unwrap();
    assert_eq!(table.get(0, "age").unwrap(), Scalar::Int64(36));
}

#[test]
fn head_and_tail_bounds() {
    let table = people();
    assert_eq!(table.head(2).column("name").unwrap().as_strings().unwrap(), ["Ada", "Grace"]);
    assert_eq!(table.tail(1).column("name").unwrap().as_strings().unwrap(), ["Ken"]);
    assert_eq!(table.head(100).shape(), (4, 4));
    assert_eq!(table.tail(100).shape(), (4, 4));

    let none = table.head(0);
    assert!(!none.is_err());
    assert_eq!(none.shape(), (0, 4));
    assert_eq!(none.column_kind("score").unwrap(), ScalarKind::Float64);
    assert_eq!(table.tail(0).shape(), (0, 4));
}

#[test]
fn head_and_tail_handle_timestamps() {
    let (t1, t2, t3) = (ts(2024, 1, 1), ts(2024, 2, 1), ts(2024, 3, 1));
    let table = Table::from_columns(vec![
        Column::new("when", vec![t1, t2, t3]),
        Column::new("n", vec![1i64, 2, 3]),
    ])
    .unwrap();

    let tail = table.tail(1);
    assert!(!tail.is_err());
    assert_eq!(tail.column("when").unwrap().as_timestamps().unwrap(), [t3]);

    let head = table.head(2);
    assert_eq!(head.column("when").unwrap().as_timestamps().unwrap(), [t1, t2]);
}

#[test]
fn add_drop_and_rename_never_touch_the_receiver() {
    let table = people();

    let added = table.add_column(Column::new("id", vec![1i64, 2, 3, 4]));
    assert_eq!(added.width(), 5);
    assert_eq!(table.width(), 4);

    let clash = table.add_column(Column::new("age", vec![1i64, 2, 3, 4]));
    assert!(clash.error().unwrap().is_invalid_operation());
    let short = table.add_column(Column::new("id", vec![1i64]));
    assert!(short.is_err());
    assert!(!table.is_err());

    let dropped = table.drop_column("score");
    assert_eq!(dropped.column_names(), ["name", "age", "active"]);
    assert!(table.drop_column("missing").error().unwrap().is_column_not_found());

    let renamed = table.rename_column("age", "years");
    assert_eq!(renamed.column_names(), ["name", "years", "score", "active"]);
    assert_eq!(renamed.get(0, "years").unwrap(), Scalar::Int64(36));
    assert!(table.rename_column("age", "name").is_err());
    assert!(table.rename_column("nope", "x").is_err());
    assert_eq!(table.rename_column("age", "age").column_names(), table.column_names());
    assert!(table.has_column("age"));
}

#[test]
fn empty_table_adopts_first_column_length() {
    let table = Table::new().add_column(Column::new("x", vec![1.0, 2.0, 3.0]));
    assert_eq!(table.shape(), (3, 1));
}

#[test]
fn reset_index_is_a_copy() {
    let table = people();
    let reset = table.reset_index();
    assert_eq!(reset.shape(), table.shape());
    assert_eq!(reset.get(3, "name").unwrap(), Scalar::from("Ken"));
}

#[test]
fn values_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Table>();
    assert_send_sync::<Column>();
    assert_send_sync::<Scalar>();
    assert_send_sync::<tabula::FrameError>();
}
