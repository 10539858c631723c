use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tabula::{Column, Scalar, ScalarKind, Table};

fn sales() -> Table {
    Table::from_columns(vec![
        Column::new("region", vec!["west", "east", "west", "north", "east"]),
        Column::new("product", vec!["a", "b", "a", "a", "c"]),
        Column::new("units", vec![5i64, 3, 7, 8, 1]),
        Column::new("price", vec![2.5, 4.0, 1.5, 3.0, 6.0]),
        Column::new("note", vec!["x", "y", "z", "w", "v"]),
    ])
    .unwrap()
}

// Rows come out in byte order of the encoded key, so shorter values sort first.
#[test]
fn sum_groups_by_one_column() {
    let out = sales().group_by(&["region"]).sum();
    assert!(!out.is_err());
    assert_eq!(out.column_names(), ["region", "units", "price"]);
    assert_eq!(
        out.column("region").unwrap().as_strings().unwrap(),
        ["east", "west", "north"]
    );
    assert_eq!(out.column("units").unwrap().as_f64().unwrap(), [4.0, 12.0, 8.0]);
    assert_eq!(out.column("price").unwrap().as_f64().unwrap(), [10.0, 4.0, 3.0]);
}

#[test]
fn other_aggregates() {
    let grouped = sales();
    let grouped = grouped.group_by(&["region"]);

    let mean = grouped.mean();
    assert_eq!(mean.column("units").unwrap().as_f64().unwrap(), [2.0, 6.0, 8.0]);

    let count = grouped.count();
    assert_eq!(count.column_kind("units").unwrap(), ScalarKind::Int64);
    assert_eq!(count.column("units").unwrap().as_i64().unwrap(), [2, 2, 1]);

    let min = grouped.min();
    assert_eq!(min.column("price").unwrap().as_f64().unwrap(), [4.0, 1.5, 3.0]);

    let max = grouped.max();
    assert_eq!(max.column("units").unwrap().as_f64().unwrap(), [3.0, 7.0, 8.0]);
}

#[test]
fn multi_column_groups_keep_key_kinds() {
    let table = Table::from_columns(vec![
        Column::new("year", vec![2024i64, 2023, 2024, 2024]),
        Column::new("flag", vec![true, false, true, false]),
        Column::new("v", vec![1.0, 2.0, 3.0, 4.0]),
    ])
    .unwrap();
    let grouped = table.group_by(&["year", "flag"]);
    assert_eq!(grouped.ngroups().unwrap(), 3);

    let out = grouped.sum();
    assert_eq!(out.column_names(), ["year", "flag", "v"]);
    assert_eq!(out.column_kind("year").unwrap(), ScalarKind::Int64);
    assert_eq!(out.column("year").unwrap().as_i64().unwrap(), [2023, 2024, 2024]);
    assert_eq!(out.column("flag").unwrap().as_bools().unwrap(), [false, true, false]);
    assert_eq!(out.column("v").unwrap().as_f64().unwrap(), [2.0, 4.0, 4.0]);
}

#[test]
fn delimiter_like_values_do_not_collide() {
    let table = Table::from_columns(vec![
        Column::new("category", vec!["a|b", "a|b", "a"]),
        Column::new("value", vec![1i64, 2, 10]),
    ])
    .unwrap();
    let out = table.group_by(&["category"]).sum();
    assert_eq!(out.len(), 2);

    let groups = table.group_by(&["category"]).groups().unwrap();
    let sums: Vec<(Scalar, usize)> = groups
        .iter()
        .map(|(values, rows)| (values[0].clone(), rows.len()))
        .collect();
    assert!(sums.contains(&(Scalar::from("a|b"), 2)));
    assert!(sums.contains(&(Scalar::from("a"), 1)));

    let filtered = out.filter("category", tabula::CompareOp::Eq, "a|b");
    assert_eq!(filtered.column("value").unwrap().as_f64().unwrap(), [3.0]);
    let filtered = out.filter("category", tabula::CompareOp::Eq, "a");
    assert_eq!(filtered.column("value").unwrap().as_f64().unwrap(), [10.0]);
}

#[test]
fn repeated_calls_produce_identical_output() {
    let table = sales();
    let first = table.group_by(&["product", "region"]).mean();
    for _ in 0..10 {
        let again = table.group_by(&["product", "region"]).mean();
        assert_eq!(again.to_string(), first.to_string());
    }
}

#[test]
fn invalid_grouping_short_circuits_aggregates() {
    let table = sales();
    let grouped = table.group_by(&[]);
    assert!(grouped.error().unwrap().is_invalid_operation());
    assert!(grouped.sum().is_err());

    let grouped = table.group_by(&["nope"]);
    assert!(grouped.count().error().unwrap().is_column_not_found());
    assert!(grouped.ngroups().is_err());

    let grouped = table.group_by(&["region", "region"]);
    assert!(grouped.max().is_err());

    let failed = table.select(&["nope"]);
    assert!(failed.group_by(&["region"]).mean().error().unwrap().is_column_not_found());
}

#[test]
fn min_and_max_order_nan_like_table_extremes() {
    let table = Table::from_columns(vec![
        Column::new("k", vec!["a", "b", "b"]),
        Column::new("v", vec![f64::NAN, f64::NAN, 1.0]),
    ])
    .unwrap();
    let grouped = table.group_by(&["k"]);

    let min = grouped.min();
    let min = min.column("v").unwrap().as_f64().unwrap();
    assert!(min[0].is_nan());
    assert_eq!(min[1], 1.0);

    let max = grouped.max();
    let max = max.column("v").unwrap().as_f64().unwrap();
    assert!(max.iter().all(|v| v.is_nan()));

    let mixed = table.tail(2);
    assert_eq!(mixed.min("v").unwrap(), Scalar::Float64(1.0));
    assert!(mixed.max("v").unwrap().as_f64().unwrap().is_nan());
}

#[test]
fn grouping_an_empty_table_yields_no_rows() {
    let out = sales().head(0).group_by(&["region"]).sum();
    assert!(!out.is_err());
    assert_eq!(out.shape(), (0, 3));
}

proptest! {
    #[test]
    fn group_sums_match_a_naive_total(
        rows in prop::collection::vec(("[ab|:]{0,3}", -100i64..100), 1..50),
    ) {
        let (keys, values): (Vec<String>, Vec<i64>) = rows.iter().cloned().unzip();
        let table = Table::from_columns(vec![
            Column::new("k", keys.clone()),
            Column::new("v", values.clone()),
        ]).unwrap();

        let out = table.group_by(&["k"]).sum();
        prop_assert!(!out.is_err());

        let mut distinct = keys.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(out.len(), distinct.len());

        let out_keys = out.column("k").unwrap().as_strings().unwrap();
        let out_sums = out.column("v").unwrap().as_f64().unwrap();
        for (key, sum) in out_keys.iter().zip(out_sums) {
            let expected: i64 = rows.iter().filter(|(k, _)| k == key).map(|(_, v)| v).sum();
            prop_assert_eq!(*sum, expected as f64);
        }
    }
}
