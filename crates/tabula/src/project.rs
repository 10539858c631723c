use std::collections::HashSet;

use crate::error::{FrameError, FrameResult};
use crate::table::Table;
use crate::value::Scalar;

impl Table {
    /// Project onto `columns`, in the requested order.
    pub fn select(&self, columns: &[&str]) -> Table {
        self.chain("Select", |t| {
            if columns.is_empty() {
                return Err(FrameError::invalid("Select", "no columns specified"));
            }

            let mut seen = HashSet::with_capacity(columns.len());
            let mut picked = Vec::with_capacity(columns.len());
            for &name in columns {
                if !seen.insert(name) {
                    return Err(
                        FrameError::invalid("Select", "column selected twice").with_column(name)
                    );
                }
                picked.push(t.require_column("Select", name)?.clone());
            }
            Ok(t.rebuild(picked, t.len()))
        })
    }

    /// Remove `columns`. An empty list yields a copy.
    pub fn drop(&self, columns: &[&str]) -> Table {
        self.chain("Drop", |t| {
            if columns.is_empty() {
                return Ok(t.copy());
            }
            for &name in columns {
                t.require_column("Drop", name)?;
            }

            let dropped: HashSet<&str> = columns.iter().copied().collect();
            let kept: Vec<_> = t
                .columns()
                .iter()
                .filter(|c| !dropped.contains(c.name()))
                .cloned()
                .collect();
            if kept.is_empty() {
                return Err(FrameError::invalid(
                    "Drop",
                    "cannot drop all columns",
                ));
            }
            Ok(t.rebuild(kept, t.len()))
        })
    }

    /// Distinct values of `column` in first-occurrence order.
    pub fn unique(&self, column: &str) -> FrameResult<Vec<Scalar>> {
        let source = self.require_column("Unique", column)?;

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for value in source.iter() {
            if seen.insert(value.canonical_text()) {
                out.push(value);
            }
        }
        Ok(out)
    }
}
