use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Timestamps are naive date-times interpreted as UTC.
pub type Timestamp = NaiveDateTime;

/// Date-only formats accepted by [`parse_timestamp`]; midnight is implied.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// The zero timestamp (`0001-01-01T00:00:00`), used for blank cells.
pub fn zero_timestamp() -> Timestamp {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// The closed set of scalar kinds a column can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    Int64,
    Float64,
    Bool,
    Timestamp,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 5] = [
        ScalarKind::String,
        ScalarKind::Int64,
        ScalarKind::Float64,
        ScalarKind::Bool,
        ScalarKind::Timestamp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Int64 => "int64",
            ScalarKind::Float64 => "float64",
            ScalarKind::Bool => "bool",
            ScalarKind::Timestamp => "timestamp",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ScalarKind::Int64 | ScalarKind::Float64)
    }

    /// The value a blank cell of this kind takes.
    pub fn zero_value(self) -> Scalar {
        match self {
            ScalarKind::String => Scalar::String(String::new()),
            ScalarKind::Int64 => Scalar::Int64(0),
            ScalarKind::Float64 => Scalar::Float64(0.0),
            ScalarKind::Bool => Scalar::Bool(false),
            ScalarKind::Timestamp => Scalar::Timestamp(zero_timestamp()),
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cell value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Scalar {
    String(String),
    Int64(i64),
    Float64(f64),
    Bool(bool),
    Timestamp(Timestamp),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::String(_) => ScalarKind::String,
            Scalar::Int64(_) => ScalarKind::Int64,
            Scalar::Float64(_) => ScalarKind::Float64,
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Timestamp(_) => ScalarKind::Timestamp,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int64(v) => Some(*v as f64),
            Scalar::Float64(v) => Some(*v),
            Scalar::String(_) | Scalar::Bool(_) | Scalar::Timestamp(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Kind-appropriate text that never merges two distinct values of the same kind.
    ///
    /// Floats use the shortest text that parses back to the same bits, booleans are
    /// `true`/`false`, timestamps are ISO-8601 with as many fractional digits as needed.
    pub fn canonical_text(&self) -> String {
        match self {
            Scalar::String(s) => s.clone(),
            Scalar::Int64(v) => v.to_string(),
            Scalar::Float64(v) => v.to_string(),
            Scalar::Bool(v) => v.to_string(),
            Scalar::Timestamp(ts) => ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        }
    }

    /// Parse trimmed text as a scalar of `kind`. Blank text yields the kind's zero value.
    pub fn parse(text: &str, kind: ScalarKind) -> FrameResult<Scalar> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(kind.zero_value());
        }

        let parsed = match kind {
            ScalarKind::String => Some(Scalar::String(text.to_string())),
            ScalarKind::Int64 => text.parse::<i64>().ok().map(Scalar::Int64),
            ScalarKind::Float64 => text.parse::<f64>().ok().map(Scalar::Float64),
            ScalarKind::Bool => parse_bool(text).map(Scalar::Bool),
            ScalarKind::Timestamp => parse_timestamp(text).map(Scalar::Timestamp),
        };

        parsed.ok_or_else(|| {
            FrameError::parse("ConvertValue", format!("cannot convert '{text}' to {kind}"))
        })
    }

    /// Convert a comparison operand into a scalar of `kind`.
    ///
    /// String targets accept anything (via its canonical text); numeric targets accept either
    /// numeric kind or numeric text; other targets accept their own kind or text.
    pub fn coerce_to(&self, kind: ScalarKind) -> FrameResult<Scalar> {
        let mismatch = || {
            FrameError::type_mismatch(
                "ConvertValue",
                format!("cannot convert {} value {self} to {kind}", self.kind()),
            )
        };

        match (kind, self) {
            (ScalarKind::String, Scalar::String(s)) => Ok(Scalar::String(s.clone())),
            (ScalarKind::String, other) => Ok(Scalar::String(other.canonical_text())),
            (ScalarKind::Int64, Scalar::Int64(v)) => Ok(Scalar::Int64(*v)),
            (ScalarKind::Int64, Scalar::Float64(v)) => {
                if v.is_finite() {
                    Ok(Scalar::Int64(v.trunc() as i64))
                } else {
                    Err(mismatch())
                }
            }
            (ScalarKind::Float64, Scalar::Float64(v)) => Ok(Scalar::Float64(*v)),
            (ScalarKind::Float64, Scalar::Int64(v)) => Ok(Scalar::Float64(*v as f64)),
            (ScalarKind::Bool, Scalar::Bool(v)) => Ok(Scalar::Bool(*v)),
            (ScalarKind::Timestamp, Scalar::Timestamp(ts)) => Ok(Scalar::Timestamp(*ts)),
            (_, Scalar::String(s)) => Scalar::parse(s, kind).map_err(|err| {
                FrameError::type_mismatch("ConvertValue", err.message().to_string())
                    .with_cause(err)
            }),
            _ => Err(mismatch()),
        }
    }
}

/// Total order between two scalars of the same kind.
///
/// Floats are ordered with NaN equal to itself and above every number. Scalars of different
/// kinds compare by kind so the function stays total; callers compare within one column.
pub fn compare_scalars(a: &Scalar, b: &Scalar) -> Ordering {
    match (a, b) {
        (Scalar::String(a), Scalar::String(b)) => a.cmp(b),
        (Scalar::Int64(a), Scalar::Int64(b)) => a.cmp(b),
        (Scalar::Float64(a), Scalar::Float64(b)) => OrderedFloat(*a).cmp(&OrderedFloat(*b)),
        (Scalar::Bool(a), Scalar::Bool(b)) => a.cmp(b),
        (Scalar::Timestamp(a), Scalar::Timestamp(b)) => a.cmp(b),
        (a, b) => a.kind().cmp(&b.kind()),
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Int64(v) => write!(f, "{v}"),
            Scalar::Float64(v) => write!(f, "{v}"),
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int64(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int64(value.into())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float64(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<Timestamp> for Scalar {
    fn from(value: Timestamp) -> Self {
        Scalar::Timestamp(value)
    }
}

/// Boolean text as accepted by the text surfaces: `1 t T TRUE true True` and their negations.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parse common date and date-time layouts. Offsets in RFC 3339 / RFC 2822 input are
/// normalized to UTC.
pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    let text = text.trim();
    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
            return Some(ts);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.naive_utc());
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(text) {
        return Some(ts.naive_utc());
    }
    None
}

/// Pick the most specific kind every non-blank value parses as.
///
/// Priority is Bool, then Int64, Float64, Timestamp, and finally String. Blank values are
/// skipped; a column with no non-blank values is String.
pub fn infer_kind<S: AsRef<str>>(values: &[S]) -> ScalarKind {
    let mut can_bool = true;
    let mut can_int = true;
    let mut can_float = true;
    let mut can_time = true;
    let mut saw_value = false;

    for value in values {
        let value = value.as_ref().trim();
        if value.is_empty() {
            continue;
        }
        saw_value = true;

        can_bool = can_bool && parse_bool(value).is_some();
        can_int = can_int && value.parse::<i64>().is_ok();
        can_float = can_float && value.parse::<f64>().is_ok();
        can_time = can_time && parse_timestamp(value).is_some();

        if !(can_bool || can_int || can_float || can_time) {
            return ScalarKind::String;
        }
    }

    if !saw_value {
        ScalarKind::String
    } else if can_bool {
        ScalarKind::Bool
    } else if can_int {
        ScalarKind::Int64
    } else if can_float {
        ScalarKind::Float64
    } else if can_time {
        ScalarKind::Timestamp
    } else {
        ScalarKind::String
    }
}
