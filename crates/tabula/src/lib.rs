#![forbid(unsafe_code)]

mod column;
mod display;
mod error;
mod filter;
mod group_by;
mod guard;
mod project;
mod query;
mod sort;
mod stats;
mod table;
mod value;

pub use crate::column::{Column, ColumnData};
pub use crate::table::Table;
pub use crate::value::{
    compare_scalars, infer_kind, parse_bool, parse_timestamp, zero_timestamp, Scalar, ScalarKind,
    Timestamp,
};

pub use crate::display::DisplayOptions;
pub use crate::filter::CompareOp;
pub use crate::group_by::GroupBy;
pub use crate::sort::SortOrder;
pub use crate::stats::NumericSummary;

pub use crate::error::{ErrorKind, FrameError, FrameResult};
pub use crate::guard::{must_operation, safe_operation};
