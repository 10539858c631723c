use pretty_assertions::assert_eq;
use tabula::{Column, ErrorKind, Table};

fn people() -> Table {
    Table::from_columns(vec![
        Column::new("name", vec!["Ada Lovelace", "Grace Hopper", "Ken Thompson"]),
        Column::new("age", vec![36i64, 85, 80]),
        Column::new("city", vec!["London", "New York", "New Orleans"]),
        Column::new("active", vec![false, true, true]),
    ])
    .unwrap()
}

fn names(table: &Table) -> Vec<String> {
    table.column("name").unwrap().as_strings().unwrap().to_vec()
}

#[test]
fn query_runs_as_a_filter() {
    let table = people();
    assert_eq!(names(&table.query("age > 50")), ["Grace Hopper", "Ken Thompson"]);
    assert_eq!(names(&table.query("age = 36")), ["Ada Lovelace"]);
    assert_eq!(names(&table.query("age <> 36")).len(), 2);
    assert_eq!(names(&table.query("active == true")).len(), 2);
}

#[test]
fn quoted_literals_may_contain_spaces() {
    let table = people();
    assert_eq!(names(&table.query("name == 'Grace Hopper'")), ["Grace Hopper"]);
    assert_eq!(names(&table.query(r#"city startswith "New ""#)), ["Grace Hopper", "Ken Thompson"]);
    assert_eq!(names(&table.query("city contains York")), ["Grace Hopper"]);
}

#[test]
fn malformed_queries_are_errors() {
    let table = people();

    let err = table.query("age >").error().cloned().unwrap();
    assert_eq!(err.kind(), ErrorKind::Parse);

    let err = table.query("age > 1 2").error().cloned().unwrap();
    assert_eq!(err.kind(), ErrorKind::Parse);

    let err = table.query("age ~ 1").error().cloned().unwrap();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(err.op(), "Query");

    let err = table.query("name == 'open").error().cloned().unwrap();
    assert_eq!(err.kind(), ErrorKind::Parse);

    let err = table.query("nope == 1").error().cloned().unwrap();
    assert!(err.is_column_not_found());

    let err = table.query("age > old").error().cloned().unwrap();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(err.column(), Some("age"));

    assert!(!table.is_err());
}
