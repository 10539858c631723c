use std::fmt::{self, Write as _};

use crate::table::Table;

/// Rendering options for [`Table::render`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Rows shown before the `... (N more rows)` footer.
    pub max_rows: usize,
    pub separator: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            max_rows: 10,
            separator: "\t".to_string(),
        }
    }
}

impl DisplayOptions {
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

impl Table {
    /// Render the header and leading rows as delimited text.
    pub fn render(&self, options: &DisplayOptions) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.render_into(&mut out, options);
        out
    }

    fn render_into(&self, out: &mut impl fmt::Write, options: &DisplayOptions) -> fmt::Result {
        if let Some(err) = self.error() {
            return write!(out, "Table(error: {err})");
        }
        if self.is_empty() {
            return out.write_str("Table(empty)");
        }

        writeln!(out, "{}", self.column_names().join(options.separator.as_str()))?;
        let shown = self.len().min(options.max_rows);
        for row in 0..shown {
            for (i, column) in self.columns().iter().enumerate() {
                if i > 0 {
                    out.write_str(&options.separator)?;
                }
                if let Ok(value) = column.get(row) {
                    write!(out, "{value}")?;
                }
            }
            out.write_char('\n')?;
        }
        if self.len() > shown {
            writeln!(out, "... ({} more rows)", self.len() - shown)?;
        }
        Ok(())
    }

    /// Shape and per-column kinds.
    pub fn info(&self) -> String {
        if let Some(err) = self.error() {
            return format!("Table Info: Error - {err}");
        }

        let mut out = String::from("Table Info:\n");
        let (rows, cols) = self.shape();
        let _ = writeln!(out, "  Shape: ({rows}, {cols})");
        out.push_str("  Columns:\n");
        for column in self.columns() {
            let _ = writeln!(out, "    {}: {}", column.name(), column.kind());
        }
        out
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render_into(f, &DisplayOptions::default())
    }
}
