use std::fmt;
use std::sync::Arc;

use thiserror::Error;

pub type FrameResult<T> = Result<T, FrameError>;

/// Broad category of a [`FrameError`], for callers that want to branch on the failure class
/// rather than on the message text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ColumnNotFound,
    IndexOutOfRange,
    TypeMismatch,
    EmptyTable,
    InvalidOperation,
    /// Text that could not be converted into a scalar, or a malformed query/record.
    Parse,
    Io,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ColumnNotFound => "column not found",
            ErrorKind::IndexOutOfRange => "index out of range",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::EmptyTable => "empty table",
            ErrorKind::InvalidOperation => "invalid operation",
            ErrorKind::Parse => "parse error",
            ErrorKind::Io => "io error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single error type of the engine.
///
/// Every failure carries the name of the operation that produced it and, when relevant, the
/// column and row it concerns. Errors are cheap to clone so a failed table can hand the same
/// record to every downstream call in a chain.
#[derive(Clone, Debug, Error)]
#[error("tabula.{op}: {message}{}", Location::new(.column, .row))]
pub struct FrameError {
    kind: ErrorKind,
    op: String,
    column: Option<String>,
    row: Option<usize>,
    message: String,
    #[source]
    cause: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
}

struct Location<'a> {
    column: Option<&'a str>,
    row: Option<usize>,
}

impl<'a> Location<'a> {
    fn new(column: &'a Option<String>, row: &Option<usize>) -> Self {
        Self {
            column: column.as_deref(),
            row: *row,
        }
    }
}

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.column, self.row) {
            (Some(column), Some(row)) => write!(f, " (column: {column}, row: {row})"),
            (Some(column), None) => write!(f, " (column: {column})"),
            (None, Some(row)) => write!(f, " (row: {row})"),
            (None, None) => Ok(()),
        }
    }
}

impl FrameError {
    pub fn new(kind: ErrorKind, op: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            op: op.into(),
            column: None,
            row: None,
            message: message.into(),
            cause: None,
        }
    }

    pub fn column_not_found(op: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(ErrorKind::ColumnNotFound, op, "column does not exist").with_column(column)
    }

    pub fn index_out_of_range(op: impl Into<String>, index: usize, len: usize) -> Self {
        Self::new(
            ErrorKind::IndexOutOfRange,
            op,
            format!("index {index} out of range [0:{len}]"),
        )
        .with_row(index)
    }

    pub fn type_mismatch(op: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch, op, message)
    }

    pub fn empty_table(op: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyTable, op, "cannot operate on empty table")
    }

    pub fn invalid(op: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidOperation, op, message)
    }

    pub fn parse(op: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, op, message)
    }

    /// Re-attribute an error to an outer operation, keeping the original as the cause.
    ///
    /// The category, column and row of the inner error carry over unless the outer context
    /// overrides them.
    pub fn wrap(op: impl Into<String>, cause: FrameError) -> Self {
        Self {
            kind: cause.kind,
            op: op.into(),
            column: cause.column.clone(),
            row: cause.row,
            message: cause.message.clone(),
            cause: Some(Arc::new(cause)),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn op(&self) -> &str {
        &self.op
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_column_not_found(&self) -> bool {
        self.kind == ErrorKind::ColumnNotFound
    }

    pub fn is_index_out_of_range(&self) -> bool {
        self.kind == ErrorKind::IndexOutOfRange
    }

    pub fn is_type_mismatch(&self) -> bool {
        self.kind == ErrorKind::TypeMismatch
    }

    pub fn is_empty_table(&self) -> bool {
        self.kind == ErrorKind::EmptyTable
    }

    pub fn is_invalid_operation(&self) -> bool {
        self.kind == ErrorKind::InvalidOperation
    }
}
