use crate::error::{FrameError, FrameResult};
use crate::value::{Scalar, ScalarKind, Timestamp};

/// Homogeneous backing storage for one column.
///
/// Every variant corresponds to exactly one [`ScalarKind`]; the storage kind and the declared
/// kind cannot drift apart because the kind is derived from the variant.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    String(Vec<String>),
    Int64(Vec<i64>),
    Float64(Vec<f64>),
    Bool(Vec<bool>),
    Timestamp(Vec<Timestamp>),
}

/// Apply the same expression to whichever vector backs a [`ColumnData`], rebuilding the same
/// variant from the result. The match is exhaustive, so a new kind cannot be skipped.
macro_rules! map_data {
    ($data:expr, $values:ident => $body:expr) => {
        match $data {
            ColumnData::String($values) => ColumnData::String($body),
            ColumnData::Int64($values) => ColumnData::Int64($body),
            ColumnData::Float64($values) => ColumnData::Float64($body),
            ColumnData::Bool($values) => ColumnData::Bool($body),
            ColumnData::Timestamp($values) => ColumnData::Timestamp($body),
        }
    };
}

impl ColumnData {
    pub fn kind(&self) -> ScalarKind {
        match self {
            ColumnData::String(_) => ScalarKind::String,
            ColumnData::Int64(_) => ScalarKind::Int64,
            ColumnData::Float64(_) => ScalarKind::Float64,
            ColumnData::Bool(_) => ScalarKind::Bool,
            ColumnData::Timestamp(_) => ScalarKind::Timestamp,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::String(v) => v.len(),
            ColumnData::Int64(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty storage of the given kind.
    pub fn empty(kind: ScalarKind) -> Self {
        Self::with_capacity(kind, 0)
    }

    pub fn with_capacity(kind: ScalarKind, capacity: usize) -> Self {
        match kind {
            ScalarKind::String => ColumnData::String(Vec::with_capacity(capacity)),
            ScalarKind::Int64 => ColumnData::Int64(Vec::with_capacity(capacity)),
            ScalarKind::Float64 => ColumnData::Float64(Vec::with_capacity(capacity)),
            ScalarKind::Bool => ColumnData::Bool(Vec::with_capacity(capacity)),
            ScalarKind::Timestamp => ColumnData::Timestamp(Vec::with_capacity(capacity)),
        }
    }

    fn get(&self, index: usize) -> Option<Scalar> {
        match self {
            ColumnData::String(v) => v.get(index).cloned().map(Scalar::String),
            ColumnData::Int64(v) => v.get(index).copied().map(Scalar::Int64),
            ColumnData::Float64(v) => v.get(index).copied().map(Scalar::Float64),
            ColumnData::Bool(v) => v.get(index).copied().map(Scalar::Bool),
            ColumnData::Timestamp(v) => v.get(index).copied().map(Scalar::Timestamp),
        }
    }

    /// Append a scalar, which must already match this storage's kind.
    pub(crate) fn push(&mut self, value: Scalar) -> Result<(), Scalar> {
        match (self, value) {
            (ColumnData::String(v), Scalar::String(x)) => v.push(x),
            (ColumnData::Int64(v), Scalar::Int64(x)) => v.push(x),
            (ColumnData::Float64(v), Scalar::Float64(x)) => v.push(x),
            (ColumnData::Bool(v), Scalar::Bool(x)) => v.push(x),
            (ColumnData::Timestamp(v), Scalar::Timestamp(x)) => v.push(x),
            (_, other) => return Err(other),
        }
        Ok(())
    }

    /// Build storage from dynamically-typed scalars, all of which must share `kind`.
    pub fn from_scalars(kind: ScalarKind, values: Vec<Scalar>) -> Result<Self, Scalar> {
        let mut data = Self::with_capacity(kind, values.len());
        for value in values {
            data.push(value)?;
        }
        Ok(data)
    }

    fn slice(&self, start: usize, end: usize) -> Self {
        map_data!(self, v => v[start..end].to_vec())
    }

    fn take(&self, indices: &[usize]) -> Self {
        map_data!(self, v => indices.iter().map(|&i| v[i].clone()).collect())
    }
}

impl From<Vec<String>> for ColumnData {
    fn from(value: Vec<String>) -> Self {
        ColumnData::String(value)
    }
}

impl From<Vec<&str>> for ColumnData {
    fn from(value: Vec<&str>) -> Self {
        ColumnData::String(value.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<i64>> for ColumnData {
    fn from(value: Vec<i64>) -> Self {
        ColumnData::Int64(value)
    }
}

impl From<Vec<f64>> for ColumnData {
    fn from(value: Vec<f64>) -> Self {
        ColumnData::Float64(value)
    }
}

impl From<Vec<bool>> for ColumnData {
    fn from(value: Vec<bool>) -> Self {
        ColumnData::Bool(value)
    }
}

impl From<Vec<Timestamp>> for ColumnData {
    fn from(value: Vec<Timestamp>) -> Self {
        ColumnData::Timestamp(value)
    }
}

/// A named, homogeneously typed column of values.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: impl Into<ColumnData>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Build a column from dynamically-typed values, inferring the kind from the elements.
    ///
    /// Fails when the list is empty (no kind to infer) or when the elements mix kinds.
    pub fn from_scalars(name: impl Into<String>, values: Vec<Scalar>) -> FrameResult<Self> {
        let name = name.into();
        let Some(kind) = values.first().map(Scalar::kind) else {
            return Err(FrameError::type_mismatch(
                "NewColumn",
                "cannot infer a kind from an empty value list",
            )
            .with_column(name));
        };

        match ColumnData::from_scalars(kind, values) {
            Ok(data) => Ok(Self { name, data }),
            Err(bad) => Err(FrameError::type_mismatch(
                "NewColumn",
                format!("unsupported mixed kinds: expected {kind}, got {}", bad.kind()),
            )
            .with_column(name)),
        }
    }

    /// An empty column of the given kind.
    pub fn empty(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::empty(kind),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn kind(&self) -> ScalarKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the backing storage.
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn into_data(self) -> ColumnData {
        self.data
    }

    pub fn get(&self, index: usize) -> FrameResult<Scalar> {
        self.data
            .get(index)
            .ok_or_else(|| self.out_of_range("Column.Get", index))
    }

    pub fn set(&mut self, index: usize, value: impl Into<Scalar>) -> FrameResult<()> {
        let value = value.into();
        let len = self.len();
        if index >= len {
            return Err(self.out_of_range("Column.Set", index));
        }

        let kind = self.kind();
        match (&mut self.data, value) {
            (ColumnData::String(v), Scalar::String(x)) => v[index] = x,
            (ColumnData::Int64(v), Scalar::Int64(x)) => v[index] = x,
            (ColumnData::Float64(v), Scalar::Float64(x)) => v[index] = x,
            (ColumnData::Bool(v), Scalar::Bool(x)) => v[index] = x,
            (ColumnData::Timestamp(v), Scalar::Timestamp(x)) => v[index] = x,
            (_, other) => {
                return Err(FrameError::type_mismatch(
                    "Column.Set",
                    format!("expected {kind}, got {}", other.kind()),
                )
                .with_column(self.name.clone())
                .with_row(index));
            }
        }
        Ok(())
    }

    pub fn get_i64(&self, index: usize) -> FrameResult<i64> {
        match &self.data {
            ColumnData::Int64(v) => v
                .get(index)
                .copied()
                .ok_or_else(|| self.out_of_range("Column.GetInt64", index)),
            other => Err(self.kind_error("Column.GetInt64", ScalarKind::Int64, other.kind())),
        }
    }

    pub fn get_f64(&self, index: usize) -> FrameResult<f64> {
        match &self.data {
            ColumnData::Float64(v) => v
                .get(index)
                .copied()
                .ok_or_else(|| self.out_of_range("Column.GetFloat64", index)),
            other => Err(self.kind_error("Column.GetFloat64", ScalarKind::Float64, other.kind())),
        }
    }

    pub fn get_str(&self, index: usize) -> FrameResult<&str> {
        match &self.data {
            ColumnData::String(v) => v
                .get(index)
                .map(String::as_str)
                .ok_or_else(|| self.out_of_range("Column.GetString", index)),
            other => Err(self.kind_error("Column.GetString", ScalarKind::String, other.kind())),
        }
    }

    // Borrowing views: these share the column's storage and return `None` on a kind mismatch.

    pub fn as_i64(&self) -> Option<&[i64]> {
        match &self.data {
            ColumnData::Int64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match &self.data {
            ColumnData::Float64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[String]> {
        match &self.data {
            ColumnData::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bools(&self) -> Option<&[bool]> {
        match &self.data {
            ColumnData::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_timestamps(&self) -> Option<&[Timestamp]> {
        match &self.data {
            ColumnData::Timestamp(v) => Some(v),
            _ => None,
        }
    }

    /// The column widened to `f64`, for Int64 and Float64 columns only.
    pub fn numeric_values(&self) -> Option<Vec<f64>> {
        match &self.data {
            ColumnData::Int64(v) => Some(v.iter().map(|&x| x as f64).collect()),
            ColumnData::Float64(v) => Some(v.clone()),
            ColumnData::String(_) | ColumnData::Bool(_) | ColumnData::Timestamp(_) => None,
        }
    }

    /// Iterate the column as owned scalars.
    pub fn iter(&self) -> impl Iterator<Item = Scalar> + '_ {
        (0..self.len()).filter_map(move |i| self.data.get(i))
    }

    /// Deep copy; the result shares nothing with `self`.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Copy rows `start..end` into a new column.
    pub fn slice(&self, start: usize, end: usize) -> FrameResult<Self> {
        if start > end || end > self.len() {
            return Err(FrameError::invalid(
                "Column.Slice",
                format!("invalid slice range [{start}:{end}] for length {}", self.len()),
            )
            .with_column(self.name.clone()));
        }
        Ok(Self {
            name: self.name.clone(),
            data: self.data.slice(start, end),
        })
    }

    /// Gather the given rows (in the given order) into a new column.
    pub fn take(&self, indices: &[usize]) -> FrameResult<Self> {
        let len = self.len();
        if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
            return Err(self.out_of_range("Column.Take", bad));
        }
        Ok(Self {
            name: self.name.clone(),
            data: self.data.take(indices),
        })
    }

    fn out_of_range(&self, op: &str, index: usize) -> FrameError {
        FrameError::index_out_of_range(op, index, self.len()).with_column(self.name.clone())
    }

    fn kind_error(&self, op: &str, expected: ScalarKind, actual: ScalarKind) -> FrameError {
        FrameError::type_mismatch(op, format!("type mismatch: expected {expected}, got {actual}"))
            .with_column(self.name.clone())
    }
}
