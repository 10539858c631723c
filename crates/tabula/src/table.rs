use std::collections::HashMap;

use crate::column::{Column, ColumnData};
use crate::error::{FrameError, FrameResult};
use crate::value::{Scalar, ScalarKind};

/// An ordered collection of equally long, uniquely named columns.
///
/// Transforms never modify the receiver: they return a new table. A failed transform returns a
/// new table in the *error state*, which carries the error and reports itself as a 0×0 table to
/// every accessor, so a chain of calls can be checked once at the end.
#[derive(Clone, Debug, Default)]
pub struct Table {
    columns: Vec<Column>,
    column_index: HashMap<String, usize>,
    rows: usize,
    error: Option<FrameError>,
}

impl Table {
    /// A 0×0 table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from columns, keeping their order.
    ///
    /// All columns must have the same length and distinct names.
    pub fn from_columns(columns: Vec<Column>) -> FrameResult<Self> {
        let Some(first) = columns.first() else {
            return Ok(Self::new());
        };

        let rows = first.len();
        for (i, column) in columns.iter().enumerate() {
            if column.len() != rows {
                return Err(FrameError::invalid(
                    "DataValidation",
                    format!("column {i} has length {}, expected {rows}", column.len()),
                )
                .with_column(column.name()));
            }
        }

        let mut table = Self {
            columns: Vec::with_capacity(columns.len()),
            column_index: HashMap::with_capacity(columns.len()),
            rows,
            error: None,
        };
        for column in columns {
            if table.column_index.contains_key(column.name()) {
                return Err(
                    FrameError::invalid("NewTable", "duplicate column name").with_column(column.name())
                );
            }
            table.push_column(column);
        }
        Ok(table)
    }

    /// Build a table from `(name, data)` pairs.
    ///
    /// Columns are ordered by name (byte-wise), whatever order the pairs arrive in, so building
    /// from a `HashMap` is reproducible.
    pub fn from_map<I, K, V>(data: I) -> FrameResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ColumnData>,
    {
        let mut columns: Vec<Column> = data
            .into_iter()
            .map(|(name, values)| Column::new(name, values))
            .collect();
        columns.sort_by(|a, b| a.name().cmp(b.name()));

        if let Some(pair) = columns.windows(2).find(|w| w[0].name() == w[1].name()) {
            return Err(
                FrameError::invalid("NewTableFromMap", "duplicate column name")
                    .with_column(pair[0].name()),
            );
        }

        Self::from_columns(columns).map_err(|err| FrameError::wrap("NewTableFromMap", err))
    }

    /// A table in the error state.
    pub fn failed(error: FrameError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn error(&self) -> Option<&FrameError> {
        self.error.as_ref()
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    /// Convert the error state into a `Result`.
    pub fn into_result(self) -> FrameResult<Self> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    /// `(rows, columns)`; `(0, 0)` in the error state.
    pub fn shape(&self) -> (usize, usize) {
        (self.len(), self.width())
    }

    /// Column names in table order. Returns an owned copy.
    pub fn column_names(&self) -> Vec<String> {
        if self.is_err() {
            return Vec::new();
        }
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    /// Borrow the columns in table order.
    pub fn columns(&self) -> &[Column] {
        if self.is_err() {
            return &[];
        }
        &self.columns
    }

    pub fn len(&self) -> usize {
        if self.is_err() {
            return 0;
        }
        self.rows
    }

    pub fn width(&self) -> usize {
        if self.is_err() {
            return 0;
        }
        self.columns.len()
    }

    /// True when the table has no rows or no columns (always true in the error state).
    pub fn is_empty(&self) -> bool {
        self.len() == 0 || self.width() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        !self.is_err() && self.column_index.contains_key(name)
    }

    pub fn column_kind(&self, name: &str) -> FrameResult<ScalarKind> {
        self.require_column("ColumnKind", name).map(Column::kind)
    }

    /// Borrow a column. The returned reference shares storage with the table.
    pub fn column(&self, name: &str) -> Option<&Column> {
        if self.is_err() {
            return None;
        }
        self.column_index.get(name).map(|&idx| &self.columns[idx])
    }

    /// An independent copy of a column.
    pub fn get_column(&self, name: &str) -> FrameResult<Column> {
        self.require_column("GetColumn", name).map(Column::copy)
    }

    pub fn get(&self, row: usize, column: &str) -> FrameResult<Scalar> {
        self.check_row("Get", row)?;
        self.require_column("Get", column)?.get(row)
    }

    /// Overwrite one cell in place.
    pub fn set(&mut self, row: usize, column: &str, value: impl Into<Scalar>) -> FrameResult<()> {
        self.check_row("Set", row)?;
        let idx = self.require_column("Set", column).map(|_| self.column_index[column])?;
        self.columns[idx].set(row, value)
    }

    /// Deep copy. Copying an error-state table yields a new table carrying the same error.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Kept for API parity with index-based frames; returns a copy.
    pub fn reset_index(&self) -> Self {
        self.chain("ResetIndex", |t| Ok(t.copy()))
    }

    pub fn add_column(&self, column: Column) -> Self {
        self.chain("AddColumn", |t| {
            if t.column_index.contains_key(column.name()) {
                return Err(
                    FrameError::invalid("AddColumn", "column already exists")
                        .with_column(column.name()),
                );
            }
            if !t.columns.is_empty() && column.len() != t.rows {
                return Err(FrameError::invalid(
                    "AddColumn",
                    format!(
                        "column length {} does not match table length {}",
                        column.len(),
                        t.rows
                    ),
                )
                .with_column(column.name()));
            }

            let mut out = t.copy();
            if out.columns.is_empty() {
                out.rows = column.len();
            }
            out.push_column(column);
            Ok(out)
        })
    }

    pub fn drop_column(&self, name: &str) -> Self {
        self.chain("DropColumn", |t| {
            t.require_column("DropColumn", name)?;
            let kept = t
                .columns
                .iter()
                .filter(|c| c.name() != name)
                .cloned()
                .collect();
            Ok(t.rebuild(kept, t.rows))
        })
    }

    pub fn rename_column(&self, old: &str, new: &str) -> Self {
        self.chain("RenameColumn", |t| {
            t.require_column("RenameColumn", old)?;
            if old != new && t.column_index.contains_key(new) {
                return Err(
                    FrameError::invalid("RenameColumn", "column already exists").with_column(new)
                );
            }

            let renamed = t
                .columns
                .iter()
                .map(|c| {
                    let mut c = c.clone();
                    if c.name() == old {
                        c.set_name(new);
                    }
                    c
                })
                .collect();
            Ok(t.rebuild(renamed, t.rows))
        })
    }

    /// The first `n` rows. `n == 0` yields an empty table with the same schema.
    pub fn head(&self, n: usize) -> Self {
        self.chain("Head", |t| {
            let end = n.min(t.rows);
            t.slice_rows("Head", 0, end)
        })
    }

    /// The last `n` rows. `n == 0` yields an empty table with the same schema.
    pub fn tail(&self, n: usize) -> Self {
        self.chain("Tail", |t| {
            let start = t.rows - n.min(t.rows);
            t.slice_rows("Tail", start, t.rows)
        })
    }

    /// Run a transform unless the table already failed.
    ///
    /// Failures become a fresh error-state table; the receiver is never touched.
    pub(crate) fn chain<F>(&self, op: &str, f: F) -> Self
    where
        F: FnOnce(&Table) -> FrameResult<Table>,
    {
        if let Some(err) = &self.error {
            return Self::failed(err.clone());
        }
        match f(self) {
            Ok(table) => {
                log::trace!("{op}: produced {}x{} table", table.rows, table.columns.len());
                table
            }
            Err(err) => {
                log::debug!("{op} failed: {err}");
                Self::failed(err)
            }
        }
    }

    /// Fail fast on an error-state table, otherwise resolve a column by name.
    pub(crate) fn require_column(&self, op: &str, name: &str) -> FrameResult<&Column> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        self.column_index
            .get(name)
            .map(|&idx| &self.columns[idx])
            .ok_or_else(|| FrameError::column_not_found(op, name))
    }

    pub(crate) fn require_not_empty(&self, op: &str) -> FrameResult<()> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if self.rows == 0 {
            return Err(FrameError::empty_table(op));
        }
        Ok(())
    }

    fn check_row(&self, op: &str, row: usize) -> FrameResult<()> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if row >= self.rows {
            return Err(FrameError::index_out_of_range(op, row, self.rows));
        }
        Ok(())
    }

    pub(crate) fn slice_rows(&self, op: &str, start: usize, end: usize) -> FrameResult<Table> {
        let columns = self
            .columns
            .iter()
            .map(|c| c.slice(start, end))
            .collect::<FrameResult<Vec<_>>>()
            .map_err(|err| FrameError::wrap(op, err))?;
        Ok(self.rebuild(columns, end - start))
    }

    /// Materialize the given rows, in order, into a new table with the same schema.
    pub(crate) fn take_rows(&self, op: &str, indices: &[usize]) -> FrameResult<Table> {
        let columns = self
            .columns
            .iter()
            .map(|c| c.take(indices))
            .collect::<FrameResult<Vec<_>>>()
            .map_err(|err| FrameError::wrap(op, err))?;
        Ok(self.rebuild(columns, indices.len()))
    }

    /// Assemble a table from columns already known to be consistent.
    pub(crate) fn rebuild(&self, columns: Vec<Column>, rows: usize) -> Table {
        let mut table = Table {
            columns: Vec::with_capacity(columns.len()),
            column_index: HashMap::with_capacity(columns.len()),
            rows,
            error: None,
        };
        for column in columns {
            table.push_column(column);
        }
        table
    }

    fn push_column(&mut self, column: Column) {
        self.column_index
            .insert(column.name().to_string(), self.columns.len());
        self.columns.push(column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_state_reports_defaults() {
        let table = Table::failed(FrameError::invalid("Test", "boom"));
        assert_eq!(table.shape(), (0, 0));
        assert!(table.column_names().is_empty());
        assert!(table.is_empty());
        assert!(!table.has_column("x"));
        assert!(table.column("x").is_none());
        assert_eq!(table.get(0, "x").unwrap_err().op(), "Test");
    }

    #[test]
    fn chained_calls_keep_the_first_error() {
        let table = Table::from_columns(vec![Column::new("a", vec![1i64, 2])]).unwrap();
        let failed = table.drop_column("missing").head(1).rename_column("a", "b");
        let err = failed.error().expect("error state");
        assert!(err.is_column_not_found());
        assert_eq!(err.op(), "DropColumn");
        assert_eq!(table.shape(), (2, 1));
    }
}
