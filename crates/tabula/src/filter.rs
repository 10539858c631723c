use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnData};
use crate::error::{FrameError, FrameResult};
use crate::table::Table;
use crate::value::{Scalar, ScalarKind};

/// Row predicate operator used by [`Table::filter`] and [`Table::query`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Contains,
    StartsWith,
    EndsWith,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Contains => "contains",
            CompareOp::StartsWith => "startswith",
            CompareOp::EndsWith => "endswith",
        }
    }

    /// Substring operators only apply to string columns.
    pub fn is_text_only(self) -> bool {
        matches!(
            self,
            CompareOp::Contains | CompareOp::StartsWith | CompareOp::EndsWith
        )
    }

    pub fn is_equality(self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::Ne)
    }

    pub fn supports(self, kind: ScalarKind) -> bool {
        match kind {
            ScalarKind::String => true,
            ScalarKind::Bool => self.is_equality(),
            ScalarKind::Int64 | ScalarKind::Float64 | ScalarKind::Timestamp => !self.is_text_only(),
        }
    }

    /// Whether `lhs op rhs` holds given `lhs.cmp(rhs)`. Substring operators never match here.
    fn accepts(self, ord: Ordering) -> bool {
        match self {
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Ne => ord != Ordering::Equal,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Ge => ord != Ordering::Less,
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Le => ord != Ordering::Greater,
            CompareOp::Contains | CompareOp::StartsWith | CompareOp::EndsWith => false,
        }
    }

    fn matches_text(self, lhs: &str, rhs: &str) -> bool {
        match self {
            CompareOp::Contains => lhs.contains(rhs),
            CompareOp::StartsWith => lhs.starts_with(rhs),
            CompareOp::EndsWith => lhs.ends_with(rhs),
            _ => self.accepts(lhs.cmp(rhs)),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompareOp {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" | "=" => Ok(CompareOp::Eq),
            "!=" | "<>" => Ok(CompareOp::Ne),
            ">" => Ok(CompareOp::Gt),
            ">=" => Ok(CompareOp::Ge),
            "<" => Ok(CompareOp::Lt),
            "<=" => Ok(CompareOp::Le),
            "contains" => Ok(CompareOp::Contains),
            "startswith" | "starts_with" => Ok(CompareOp::StartsWith),
            "endswith" | "ends_with" => Ok(CompareOp::EndsWith),
            other => Err(FrameError::parse(
                "ParseOperator",
                format!("unsupported operator '{other}'"),
            )),
        }
    }
}

impl Table {
    /// Keep the rows whose `column` value satisfies `op` against `value`.
    ///
    /// `value` is converted to the column's kind first; a value that cannot be converted is an
    /// error rather than a silent non-match.
    pub fn filter(&self, column: &str, op: CompareOp, value: impl Into<Scalar>) -> Table {
        let value = value.into();
        self.chain("Filter", |t| t.filter_rows("Filter", column, op, &value))
    }

    pub(crate) fn filter_rows(
        &self,
        op_name: &str,
        column: &str,
        op: CompareOp,
        value: &Scalar,
    ) -> FrameResult<Table> {
        let source = self.require_column(op_name, column)?;
        self.require_not_empty(op_name)?;

        let kind = source.kind();
        if !op.supports(kind) {
            return Err(FrameError::invalid(
                op_name,
                format!("operator {op} is not supported for {kind} columns"),
            )
            .with_column(column));
        }

        let target = value
            .coerce_to(kind)
            .map_err(|err| FrameError::wrap(op_name, err).with_column(column))?;
        let rows = matching_rows(source, op, &target)
            .map_err(|err| FrameError::wrap(op_name, err).with_column(column))?;

        log::trace!(
            "{op_name}: {column} {op} {target} kept {} of {} rows",
            rows.len(),
            self.len()
        );
        self.take_rows(op_name, &rows)
    }
}

fn positions<T>(values: &[T], mut keep: impl FnMut(&T) -> bool) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| keep(v).then_some(i))
        .collect()
}

fn matching_rows(column: &Column, op: CompareOp, target: &Scalar) -> FrameResult<Vec<usize>> {
    let rows = match (column.data(), target) {
        (ColumnData::String(values), Scalar::String(rhs)) => {
            positions(values, |lhs| op.matches_text(lhs, rhs))
        }
        (ColumnData::Int64(values), Scalar::Int64(rhs)) => {
            positions(values, |lhs| op.accepts(lhs.cmp(rhs)))
        }
        (ColumnData::Float64(values), Scalar::Float64(rhs)) => {
            let rhs = OrderedFloat(*rhs);
            positions(values, |lhs| op.accepts(OrderedFloat(*lhs).cmp(&rhs)))
        }
        (ColumnData::Bool(values), Scalar::Bool(rhs)) => {
            positions(values, |lhs| op.accepts(lhs.cmp(rhs)))
        }
        (ColumnData::Timestamp(values), Scalar::Timestamp(rhs)) => {
            positions(values, |lhs| op.accepts(lhs.cmp(rhs)))
        }
        (data, other) => {
            return Err(FrameError::type_mismatch(
                "CompareValue",
                format!("cannot compare {} column with {} value", data.kind(), other.kind()),
            ))
        }
    };
    Ok(rows)
}
