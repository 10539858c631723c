use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnData};
use crate::error::{FrameError, FrameResult};
use crate::table::Table;
use crate::value::Scalar;

/// Summary statistics of one numeric column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// `NaN` when the column has fewer than two values.
    pub std: f64,
    pub median: f64,
}

impl fmt::Display for NumericSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Numeric Summary for {}:", self.column)?;
        writeln!(f, "  Count:  {}", self.count)?;
        writeln!(f, "  Sum:    {:.6}", self.sum)?;
        writeln!(f, "  Mean:   {:.6}", self.mean)?;
        writeln!(f, "  Std:    {:.6}", self.std)?;
        writeln!(f, "  Min:    {:.6}", self.min)?;
        writeln!(f, "  Max:    {:.6}", self.max)?;
        write!(f, "  Median: {:.6}", self.median)
    }
}

const DESCRIBE_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

impl Table {
    /// Number of rows; 0 in the error state.
    pub fn count(&self) -> usize {
        self.len()
    }

    pub fn sum(&self, column: &str) -> FrameResult<f64> {
        Ok(self.numeric_column("Sum", column)?.iter().sum())
    }

    pub fn mean(&self, column: &str) -> FrameResult<f64> {
        let values = self.numeric_column("Mean", column)?;
        Ok(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Smallest value, as an `Int64` scalar for integer columns and `Float64` otherwise.
    pub fn min(&self, column: &str) -> FrameResult<Scalar> {
        self.extreme("Min", column, Ordering::Less)
    }

    /// Largest value, as an `Int64` scalar for integer columns and `Float64` otherwise.
    pub fn max(&self, column: &str) -> FrameResult<Scalar> {
        self.extreme("Max", column, Ordering::Greater)
    }

    /// Sample standard deviation (n − 1 denominator).
    pub fn std(&self, column: &str) -> FrameResult<f64> {
        let values = self.numeric_column("Std", column)?;
        sample_std(&values).ok_or_else(|| {
            FrameError::invalid("Std", "need at least 2 values for standard deviation")
                .with_column(column)
        })
    }

    pub fn var(&self, column: &str) -> FrameResult<f64> {
        let std = self.std(column).map_err(|err| FrameError::wrap("Var", err))?;
        Ok(std * std)
    }

    pub fn median(&self, column: &str) -> FrameResult<f64> {
        let values = sorted(self.numeric_column("Median", column)?);
        let n = values.len();
        if n % 2 == 0 {
            Ok((values[n / 2 - 1] + values[n / 2]) / 2.0)
        } else {
            Ok(values[n / 2])
        }
    }

    /// Linear interpolation between order statistics at rank `q·(n−1)`.
    pub fn quantile(&self, column: &str, q: f64) -> FrameResult<f64> {
        if !(0.0..=1.0).contains(&q) {
            return Err(FrameError::invalid(
                "Quantile",
                format!("quantile must be between 0 and 1, got {q}"),
            )
            .with_column(column));
        }
        let values = sorted(self.numeric_column("Quantile", column)?);
        Ok(interpolate(&values, q))
    }

    /// Fixed eight-row summary of every numeric column, formatted as text.
    pub fn describe(&self) -> FrameResult<Table> {
        if let Some(err) = self.error() {
            return Err(err.clone());
        }
        let numeric = self.numeric_columns();
        if numeric.is_empty() {
            return Err(FrameError::invalid("Describe", "no numeric columns found"));
        }
        self.require_not_empty("Describe")?;

        let mut columns = Vec::with_capacity(numeric.len() + 1);
        columns.push(Column::new(self.unique_label("statistic"), DESCRIBE_ROWS.to_vec()));
        for column in numeric {
            let name = column.name();
            let mut cells = Vec::with_capacity(DESCRIBE_ROWS.len());
            cells.push(self.len().to_string());
            cells.push(fixed(self.mean(name)));
            cells.push(fixed(self.std(name)));
            cells.push(fixed(self.min(name).map(|v| v.as_f64().unwrap_or(f64::NAN))));
            cells.push(fixed(self.quantile(name, 0.25)));
            cells.push(fixed(self.median(name)));
            cells.push(fixed(self.quantile(name, 0.75)));
            cells.push(fixed(self.max(name).map(|v| v.as_f64().unwrap_or(f64::NAN))));
            columns.push(Column::new(name, cells));
        }
        Table::from_columns(columns).map_err(|err| FrameError::wrap("Describe", err))
    }

    /// Frequency of each distinct value, most frequent first.
    ///
    /// Ties keep the order in which values were first seen.
    pub fn value_counts(&self, column: &str) -> FrameResult<Table> {
        let source = self.require_column("ValueCounts", column)?;
        self.require_not_empty("ValueCounts")?;

        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut distinct: Vec<(Scalar, i64)> = Vec::new();
        for value in source.iter() {
            match slots.get(&value.canonical_text()) {
                Some(&slot) => distinct[slot].1 += 1,
                None => {
                    slots.insert(value.canonical_text(), distinct.len());
                    distinct.push((value, 1));
                }
            }
        }
        distinct.sort_by(|a, b| b.1.cmp(&a.1));

        let (values, counts): (Vec<Scalar>, Vec<i64>) = distinct.into_iter().unzip();
        let data = ColumnData::from_scalars(source.kind(), values).map_err(|value| {
            FrameError::type_mismatch(
                "ValueCounts",
                format!("value of kind {} in {} column", value.kind(), source.kind()),
            )
            .with_column(column)
        })?;
        Table::from_columns(vec![
            Column::new(column, data),
            Column::new(self.unique_label("count"), counts),
        ])
        .map_err(|err| FrameError::wrap("ValueCounts", err))
    }

    /// Pairwise Pearson correlation of every numeric column.
    ///
    /// The first column names the row; zero-variance pairs correlate as 0.
    pub fn correlation(&self) -> FrameResult<Table> {
        if let Some(err) = self.error() {
            return Err(err.clone());
        }
        let numeric = self.numeric_columns();
        if numeric.len() < 2 {
            return Err(FrameError::invalid(
                "Correlation",
                "need at least 2 numeric columns for correlation",
            ));
        }
        self.require_not_empty("Correlation")?;

        let series: Vec<Vec<f64>> = numeric
            .iter()
            .map(|c| c.numeric_values().unwrap_or_default())
            .collect();
        let names: Vec<String> = numeric.iter().map(|c| c.name().to_string()).collect();

        let mut columns = Vec::with_capacity(numeric.len() + 1);
        columns.push(Column::new(self.unique_label("column"), names.clone()));
        for (i, name) in names.iter().enumerate() {
            let row: Vec<f64> = (0..series.len())
                .map(|j| {
                    if i == j {
                        1.0
                    } else {
                        pearson(&series[i], &series[j])
                    }
                })
                .collect();
            columns.push(Column::new(name.as_str(), row));
        }
        Table::from_columns(columns).map_err(|err| FrameError::wrap("Correlation", err))
    }

    pub fn numeric_summary(&self, column: &str) -> FrameResult<NumericSummary> {
        let values = self.numeric_column("NumericSummary", column)?;
        let min = self.min(column)?.as_f64().unwrap_or(f64::NAN);
        let max = self.max(column)?.as_f64().unwrap_or(f64::NAN);
        let sum: f64 = values.iter().sum();
        let count = values.len();
        let sorted = sorted(values);

        Ok(NumericSummary {
            column: column.to_string(),
            count,
            sum,
            mean: sum / count as f64,
            min,
            max,
            std: sample_std(&sorted).unwrap_or(f64::NAN),
            median: interpolate(&sorted, 0.5),
        })
    }

    /// Values of a numeric column, after checking the column exists and the table has rows.
    fn numeric_column(&self, op: &str, name: &str) -> FrameResult<Vec<f64>> {
        let column = self.require_column(op, name)?;
        self.require_not_empty(op)?;
        column.numeric_values().ok_or_else(|| {
            FrameError::type_mismatch(op, format!("column must be numeric, got {}", column.kind()))
                .with_column(name)
        })
    }

    fn numeric_columns(&self) -> Vec<&Column> {
        self.columns()
            .iter()
            .filter(|c| c.kind().is_numeric())
            .collect()
    }

    fn extreme(&self, op: &str, name: &str, want: Ordering) -> FrameResult<Scalar> {
        let column = self.require_column(op, name)?;
        self.require_not_empty(op)?;
        match column.data() {
            ColumnData::Int64(values) => {
                let best = values
                    .iter()
                    .copied()
                    .reduce(|acc, v| if v.cmp(&acc) == want { v } else { acc });
                Ok(Scalar::Int64(best.unwrap_or_default()))
            }
            ColumnData::Float64(values) => {
                let best = values.iter().copied().reduce(|acc, v| {
                    if OrderedFloat(v).cmp(&OrderedFloat(acc)) == want {
                        v
                    } else {
                        acc
                    }
                });
                Ok(Scalar::Float64(best.unwrap_or_default()))
            }
            ColumnData::String(_) | ColumnData::Bool(_) | ColumnData::Timestamp(_) => {
                Err(FrameError::type_mismatch(
                    op,
                    format!("column must be numeric, got {}", column.kind()),
                )
                .with_column(name))
            }
        }
    }

    /// `base`, with underscores appended until it names no existing column.
    fn unique_label(&self, base: &str) -> String {
        let mut label = base.to_string();
        while self.has_column(&label) {
            label.push('_');
        }
        label
    }
}

fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by_key(|v| OrderedFloat(*v));
    values
}

fn interpolate(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = q * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            if lo == hi {
                sorted[lo]
            } else {
                sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
            }
        }
    }
}

fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let squares: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    Some((squares / (n - 1) as f64).sqrt())
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        cov / denominator
    }
}

fn fixed(value: FrameResult<f64>) -> String {
    match value {
        Ok(v) if !v.is_nan() => format!("{v:.6}"),
        _ => "NaN".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_between_order_statistics() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(interpolate(&values, 0.0), 1.0);
        assert_eq!(interpolate(&values, 1.0), 4.0);
        assert_eq!(interpolate(&values, 0.5), 2.5);
        assert_eq!(interpolate(&values, 0.25), 1.75);
        assert_eq!(interpolate(&[7.0], 0.3), 7.0);
    }

    #[test]
    fn pearson_handles_constant_input() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
        assert!((pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn sample_std_requires_two_values() {
        assert_eq!(sample_std(&[1.0]), None);
        assert_eq!(sample_std(&[2.0, 4.0]), Some(2f64.sqrt()));
    }
}
