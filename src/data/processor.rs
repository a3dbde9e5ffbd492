//! Data Processor Module
//! Extracts histogram samples and faceted line series from DataFrames.

use polars::prelude::*;
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{column}' is not numeric ({dtype})")]
    NotNumeric { column: String, dtype: DataType },
    #[error("Dataset has no rows with a '{0}' value")]
    EmptyDataset(String),
}

pub(crate) fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Sort key of a category value.
#[derive(Debug, Clone)]
pub enum CategoryKey {
    Number(f64),
    Text(String),
}

impl PartialEq for CategoryKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CategoryKey {}

impl PartialOrd for CategoryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CategoryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CategoryKey::Number(a), CategoryKey::Number(b)) => a.total_cmp(b),
            (CategoryKey::Text(a), CategoryKey::Text(b)) => a.cmp(b),
            (CategoryKey::Number(_), CategoryKey::Text(_)) => Ordering::Less,
            (CategoryKey::Text(_), CategoryKey::Number(_)) => Ordering::Greater,
        }
    }
}

/// A discrete value of a hue or facet column.
///
/// Numeric columns order numerically, everything else lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Category {
    pub key: CategoryKey,
    pub label: String,
}

impl Category {
    pub fn text(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            key: CategoryKey::Text(label.clone()),
            label,
        }
    }

    pub fn number(value: f64, label: impl Into<String>) -> Self {
        Self {
            key: CategoryKey::Number(value),
            label: label.into(),
        }
    }

    fn from_any_value(value: &AnyValue, numeric: bool) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        if numeric {
            return value
                .extract::<f64>()
                .map(|v| Category::number(v, value.to_string()));
        }
        match value.get_str() {
            Some(text) => Some(Category::text(text)),
            None => Some(Category::text(value.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// One row of a line-plot dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    pub x: f64,
    pub y: f64,
    pub hue: Category,
    pub facet: Category,
}

/// Points of one hue value, in record order.
#[derive(Debug, Clone, PartialEq)]
pub struct HueSeries {
    pub hue: Category,
    pub points: Vec<(f64, f64)>,
}

impl HueSeries {
    /// Whether x never decreases along the series.
    pub fn is_x_monotonic(&self) -> bool {
        self.points.windows(2).all(|w| !(w[1].0 < w[0].0))
    }
}

/// All series of one facet value.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetGroup {
    pub facet: Category,
    pub series: Vec<HueSeries>,
}

/// Handles extraction and grouping of chart data.
pub struct DataProcessor;

impl DataProcessor {
    fn numeric_column(df: &DataFrame, column: &str) -> Result<Series, ProcessorError> {
        let series = df.column(column)?.as_materialized_series();
        if !is_numeric(series.dtype()) {
            return Err(ProcessorError::NotNumeric {
                column: column.to_string(),
                dtype: series.dtype().clone(),
            });
        }
        Ok(series.strict_cast(&DataType::Float64)?)
    }

    /// Non-null values of a numeric column, in row order.
    pub fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<f64>, ProcessorError> {
        let values = Self::numeric_column(df, column)?;
        let values: Vec<f64> = values.f64()?.into_iter().flatten().collect();
        debug!(column, count = values.len(), "extracted numeric samples");
        Ok(values)
    }

    fn categories(df: &DataFrame, column: &str) -> Result<Vec<Option<Category>>, ProcessorError> {
        let series = df.column(column)?.as_materialized_series();
        let numeric = is_numeric(series.dtype());
        (0..series.len())
            .map(|i| Ok(Category::from_any_value(&series.get(i)?, numeric)))
            .collect()
    }

    /// Rows of a line-plot dataset. Null x/y become NaN; rows with a null hue
    /// or facet are skipped.
    pub fn line_records(
        df: &DataFrame,
        x: &str,
        y: &str,
        hue: &str,
        col: &str,
    ) -> Result<Vec<LineRecord>, ProcessorError> {
        let xs = Self::numeric_column(df, x)?;
        let ys = Self::numeric_column(df, y)?;
        let xs = xs.f64()?;
        let ys = ys.f64()?;
        let hues = Self::categories(df, hue)?;
        let facets = Self::categories(df, col)?;

        let mut records = Vec::with_capacity(df.height());
        let mut skipped = 0usize;
        for (i, (hue, facet)) in hues.into_iter().zip(facets).enumerate() {
            match (hue, facet) {
                (Some(hue), Some(facet)) => records.push(LineRecord {
                    x: xs.get(i).unwrap_or(f64::NAN),
                    y: ys.get(i).unwrap_or(f64::NAN),
                    hue,
                    facet,
                }),
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(skipped, hue, col, "skipped rows with null category values");
        }
        Ok(records)
    }

    /// Distinct values in ascending natural order.
    pub fn sorted_unique<'a>(values: impl IntoIterator<Item = &'a Category>) -> Vec<Category> {
        let mut unique: Vec<Category> = values.into_iter().cloned().collect();
        unique.sort();
        unique.dedup();
        unique
    }

    /// Distinct values in first-encounter order.
    pub fn unique_in_order<'a>(values: impl IntoIterator<Item = &'a Category>) -> Vec<Category> {
        let mut unique: Vec<Category> = Vec::new();
        for value in values {
            if !unique.contains(value) {
                unique.push(value.clone());
            }
        }
        unique
    }

    /// Group records into facets (sorted) and hue series (encounter order
    /// within the facet). Points keep record order.
    pub fn facet_groups(records: &[LineRecord]) -> Vec<FacetGroup> {
        Self::sorted_unique(records.iter().map(|r| &r.facet))
            .into_iter()
            .map(|facet| {
                let subset: Vec<&LineRecord> =
                    records.iter().filter(|r| r.facet == facet).collect();
                let series = Self::unique_in_order(subset.iter().map(|r| &r.hue))
                    .into_iter()
                    .map(|hue| {
                        let points = subset
                            .iter()
                            .filter(|r| r.hue == hue)
                            .map(|r| (r.x, r.y))
                            .collect();
                        HueSeries { hue, points }
                    })
                    .collect();
                FacetGroup { facet, series }
            })
            .collect()
    }

    /// Extract and group a line-plot dataset in one step.
    pub fn prepare_facets(
        df: &DataFrame,
        x: &str,
        y: &str,
        hue: &str,
        col: &str,
    ) -> Result<Vec<FacetGroup>, ProcessorError> {
        let records = Self::line_records(df, x, y, hue, col)?;
        let groups = Self::facet_groups(&records);
        if groups.is_empty() {
            return Err(ProcessorError::EmptyDataset(col.to_string()));
        }
        Ok(groups)
    }
}
