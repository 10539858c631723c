use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tabula::{Column, Scalar, SortOrder, Table};

fn sales() -> Table {
    Table::from_columns(vec![
        Column::new("region", vec!["west", "east", "west", "north", "east", "west"]),
        Column::new("units", vec![5i64, 3, 5, 8, 3, 1]),
        Column::new("price", vec![2.5, 4.0, 1.5, 3.0, 4.0, 9.0]),
        Column::new("row", vec![0i64, 1, 2, 3, 4, 5]),
    ])
    .unwrap()
}

fn rows(table: &Table) -> Vec<i64> {
    table.column("row").unwrap().as_i64().unwrap().to_vec()
}

#[test]
fn select_projects_in_requested_order() {
    let table = sales();
    let out = table.select(&["price", "region"]);
    assert_eq!(out.column_names(), ["price", "region"]);
    assert_eq!(out.len(), 6);

    assert!(table.select(&[]).error().unwrap().is_invalid_operation());
    assert!(table.select(&["nope"]).error().unwrap().is_column_not_found());
    let dup = table.select(&["units", "units"]);
    assert_eq!(dup.error().unwrap().column(), Some("units"));
}

#[test]
fn drop_is_the_complement_of_select() {
    let table = sales();
    assert_eq!(table.drop(&["units", "row"]).column_names(), ["region", "price"]);
    assert_eq!(table.drop(&[]).shape(), table.shape());
    assert!(table.drop(&["nope"]).error().unwrap().is_column_not_found());
    assert!(table
        .drop(&["region", "units", "price", "row"])
        .error()
        .unwrap()
        .is_invalid_operation());
}

#[test]
fn sort_single_key_is_stable() {
    let table = sales();
    assert_eq!(rows(&table.sort("units", SortOrder::Ascending)), [5, 1, 4, 0, 2, 3]);
    assert_eq!(rows(&table.sort("units", SortOrder::Descending)), [3, 0, 2, 1, 4, 5]);
}

#[test]
fn sort_multiple_keys_fall_through_ties() {
    let table = sales();
    let out = table.sort_by(
        &["region", "price"],
        &[SortOrder::Ascending, SortOrder::Descending],
    );
    assert_eq!(rows(&out), [1, 4, 3, 5, 0, 2]);
    assert_eq!(out.column_names(), table.column_names());
}

#[test]
fn sort_validates_arguments() {
    let table = sales();
    assert!(table.sort_by(&[], &[]).is_err());
    assert!(table
        .sort_by(&["units"], &[SortOrder::Ascending, SortOrder::Descending])
        .error()
        .unwrap()
        .is_invalid_operation());
    assert!(table
        .sort("nope", SortOrder::Ascending)
        .error()
        .unwrap()
        .is_column_not_found());
    assert!(table
        .head(0)
        .sort("units", SortOrder::Ascending)
        .error()
        .unwrap()
        .is_empty_table());
}

#[test]
fn sort_places_nan_last_when_ascending() {
    let table = Table::from_columns(vec![Column::new("x", vec![2.0, f64::NAN, -1.0])]).unwrap();
    let out = table.sort("x", SortOrder::Ascending);
    let values = out.column("x").unwrap().as_f64().unwrap();
    assert_eq!(&values[..2], [-1.0, 2.0]);
    assert!(values[2].is_nan());
}

#[test]
fn unique_keeps_first_occurrence_order() {
    let table = sales();
    assert_eq!(
        table.unique("region").unwrap(),
        vec![Scalar::from("west"), Scalar::from("east"), Scalar::from("north")]
    );
    assert_eq!(
        table.unique("units").unwrap(),
        vec![Scalar::Int64(5), Scalar::Int64(3), Scalar::Int64(8), Scalar::Int64(1)]
    );
    assert!(table.unique("nope").unwrap_err().is_column_not_found());
}

#[test]
fn unique_distinguishes_close_floats() {
    let table = Table::from_columns(vec![Column::new("x", vec![0.1, 0.1 + 1e-16, 0.1])]).unwrap();
    assert_eq!(table.unique("x").unwrap().len(), 2);
}

proptest! {
    #[test]
    fn sorted_output_is_ordered_and_a_permutation(
        values in prop::collection::vec(-50i64..50, 1..60),
    ) {
        let ids: Vec<i64> = (0..values.len() as i64).collect();
        let table = Table::from_columns(vec![
            Column::new("v", values.clone()),
            Column::new("row", ids),
        ]).unwrap();

        let out = table.sort("v", SortOrder::Ascending);
        let sorted_values = out.column("v").unwrap().as_i64().unwrap();
        let order = out.column("row").unwrap().as_i64().unwrap();

        for pair in order.windows(2).zip(sorted_values.windows(2)) {
            let (ids, vals) = pair;
            prop_assert!(vals[0] <= vals[1]);
            if vals[0] == vals[1] {
                prop_assert!(ids[0] < ids[1]);
            }
        }

        let mut expected = values.clone();
        expected.sort();
        prop_assert_eq!(sorted_values, &expected[..]);
    }
}
