use std::collections::{HashMap, HashSet};

use ordered_float::OrderedFloat;

use crate::column::{Column, ColumnData};
use crate::error::{FrameError, FrameResult};
use crate::table::Table;
use crate::value::Scalar;

/// Deferred grouping of a table's rows by one or more columns.
///
/// Validation happens up front; an invalid grouping carries its error into every aggregation.
#[derive(Clone, Debug)]
pub struct GroupBy<'a> {
    table: &'a Table,
    by: Vec<String>,
    error: Option<FrameError>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Aggregate {
    Sum,
    Mean,
    Count,
    Min,
    Max,
}

impl Aggregate {
    fn op_name(self) -> &'static str {
        match self {
            Aggregate::Sum => "GroupBy.Sum",
            Aggregate::Mean => "GroupBy.Mean",
            Aggregate::Count => "GroupBy.Count",
            Aggregate::Min => "GroupBy.Min",
            Aggregate::Max => "GroupBy.Max",
        }
    }
}

struct Group {
    key: String,
    values: Vec<Scalar>,
    rows: Vec<usize>,
}

impl Table {
    /// Group rows by equal values of `columns`.
    pub fn group_by(&self, columns: &[&str]) -> GroupBy<'_> {
        let error = self.validate_group_columns(columns).err();
        if let Some(err) = &error {
            log::debug!("GroupBy failed: {err}");
        }
        GroupBy {
            table: self,
            by: columns.iter().map(|c| c.to_string()).collect(),
            error,
        }
    }

    fn validate_group_columns(&self, columns: &[&str]) -> FrameResult<()> {
        if let Some(err) = self.error() {
            return Err(err.clone());
        }
        if columns.is_empty() {
            return Err(FrameError::invalid("GroupBy", "no group columns specified"));
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for &name in columns {
            self.require_column("GroupBy", name)?;
            if !seen.insert(name) {
                return Err(
                    FrameError::invalid("GroupBy", "column grouped twice").with_column(name)
                );
            }
        }
        Ok(())
    }
}

impl<'a> GroupBy<'a> {
    pub fn error(&self) -> Option<&FrameError> {
        self.error.as_ref()
    }

    /// The grouping columns, in the requested order.
    pub fn keys(&self) -> &[String] {
        &self.by
    }

    /// `(group values, row indices)` for every group, in result order.
    pub fn groups(&self) -> FrameResult<Vec<(Vec<Scalar>, Vec<usize>)>> {
        Ok(self
            .build_groups()?
            .into_iter()
            .map(|g| (g.values, g.rows))
            .collect())
    }

    pub fn ngroups(&self) -> FrameResult<usize> {
        self.build_groups().map(|groups| groups.len())
    }

    pub fn sum(&self) -> Table {
        self.aggregate(Aggregate::Sum)
    }

    pub fn mean(&self) -> Table {
        self.aggregate(Aggregate::Mean)
    }

    pub fn count(&self) -> Table {
        self.aggregate(Aggregate::Count)
    }

    pub fn min(&self) -> Table {
        self.aggregate(Aggregate::Min)
    }

    pub fn max(&self) -> Table {
        self.aggregate(Aggregate::Max)
    }

    fn key_columns(&self) -> FrameResult<Vec<&'a Column>> {
        let table: &'a Table = self.table;
        self.by
            .iter()
            .map(|name| table.require_column("GroupBy", name))
            .collect()
    }

    /// Single pass over the rows, then an explicit sort by encoded key.
    fn build_groups(&self) -> FrameResult<Vec<Group>> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let keys = self.key_columns()?;

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<Group> = Vec::new();
        for row in 0..self.table.len() {
            let values = keys
                .iter()
                .map(|column| column.get(row))
                .collect::<FrameResult<Vec<_>>>()?;
            let key = encode_key(&values);

            match index.get(&key) {
                Some(&slot) => groups[slot].rows.push(row),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push(Group {
                        key,
                        values,
                        rows: vec![row],
                    });
                }
            }
        }

        groups.sort_by(|a, b| a.key.as_bytes().cmp(b.key.as_bytes()));
        log::debug!(
            "GroupBy {:?}: {} groups over {} rows",
            self.by,
            groups.len(),
            self.table.len()
        );
        Ok(groups)
    }

    fn aggregate(&self, agg: Aggregate) -> Table {
        let op = agg.op_name();
        match self.try_aggregate(agg) {
            Ok(table) => table,
            Err(err) => {
                log::debug!("{op} failed: {err}");
                Table::failed(err)
            }
        }
    }

    fn try_aggregate(&self, agg: Aggregate) -> FrameResult<Table> {
        let op = agg.op_name();
        let groups = self.build_groups()?;
        let keys = self.key_columns()?;

        let mut columns = Vec::with_capacity(self.table.width());
        for (pos, column) in keys.iter().enumerate() {
            let values = groups.iter().map(|g| g.values[pos].clone()).collect();
            let data = ColumnData::from_scalars(column.kind(), values).map_err(|value| {
                FrameError::type_mismatch(
                    op,
                    format!("group value of kind {} in {} column", value.kind(), column.kind()),
                )
                .with_column(column.name())
            })?;
            columns.push(Column::new(column.name(), data));
        }

        for column in self.table.columns() {
            if self.by.iter().any(|name| name == column.name()) {
                continue;
            }
            let Some(values) = column.numeric_values() else {
                continue;
            };

            let data = match agg {
                Aggregate::Count => ColumnData::Int64(
                    groups.iter().map(|g| g.rows.len() as i64).collect(),
                ),
                Aggregate::Sum | Aggregate::Mean | Aggregate::Min | Aggregate::Max => {
                    ColumnData::Float64(
                        groups
                            .iter()
                            .map(|g| reduce(agg, &values, &g.rows))
                            .collect(),
                    )
                }
            };
            columns.push(Column::new(column.name(), data));
        }

        Table::from_columns(columns).map_err(|err| FrameError::wrap(op, err))
    }
}

/// Encode one row's grouping values as `<len>:<text>` components joined by NUL.
///
/// NUL and backslash are escaped inside each component, so the separator only ever appears
/// between components.
fn encode_key(values: &[Scalar]) -> String {
    let mut key = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            key.push('\0');
        }
        let text = escape_component(&value.canonical_text());
        key.push_str(&text.len().to_string());
        key.push(':');
        key.push_str(&text);
    }
    key
}

fn escape_component(text: &str) -> String {
    if !text.contains(['\0', '\\']) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out
}

fn reduce(agg: Aggregate, values: &[f64], rows: &[usize]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let picked = rows.iter().map(|&r| values[r]);
    match agg {
        Aggregate::Sum => picked.sum(),
        Aggregate::Mean => picked.sum::<f64>() / rows.len() as f64,
        Aggregate::Count => rows.len() as f64,
        // NaN orders above every number, matching `Table::min`/`Table::max`.
        Aggregate::Min => picked.map(OrderedFloat).min().map_or(0.0, |v| v.0),
        Aggregate::Max => picked.map(OrderedFloat).max().map_or(0.0, |v| v.0),
    }
}
