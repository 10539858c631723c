use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnData};
use crate::error::FrameError;
use crate::table::Table;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    }
}

impl Table {
    /// Sort by a single column.
    pub fn sort(&self, column: &str, order: SortOrder) -> Table {
        self.sort_by(&[column], &[order])
    }

    /// Stable multi-key sort.
    ///
    /// Keys are compared in the listed order; rows equal on every key keep their relative
    /// order.
    pub fn sort_by(&self, columns: &[&str], orders: &[SortOrder]) -> Table {
        self.chain("SortBy", |t| {
            if columns.is_empty() {
                return Err(FrameError::invalid("SortBy", "no sort columns specified"));
            }
            if columns.len() != orders.len() {
                return Err(FrameError::invalid(
                    "SortBy",
                    format!(
                        "{} sort columns but {} sort orders",
                        columns.len(),
                        orders.len()
                    ),
                ));
            }
            let keys = columns
                .iter()
                .zip(orders)
                .map(|(&name, &order)| Ok((t.require_column("SortBy", name)?, order)))
                .collect::<Result<Vec<(&Column, SortOrder)>, FrameError>>()?;
            t.require_not_empty("SortBy")?;

            let mut rows: Vec<usize> = (0..t.len()).collect();
            rows.sort_by(|&a, &b| {
                keys.iter()
                    .map(|(column, order)| order.apply(compare_rows(column, a, b)))
                    .find(|ord| ord.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
            t.take_rows("SortBy", &rows)
        })
    }
}

fn compare_rows(column: &Column, a: usize, b: usize) -> Ordering {
    match column.data() {
        ColumnData::String(v) => v[a].cmp(&v[b]),
        ColumnData::Int64(v) => v[a].cmp(&v[b]),
        ColumnData::Float64(v) => OrderedFloat(v[a]).cmp(&OrderedFloat(v[b])),
        ColumnData::Bool(v) => v[a].cmp(&v[b]),
        ColumnData::Timestamp(v) => v[a].cmp(&v[b]),
    }
}
