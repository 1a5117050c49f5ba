//! Shared utilities for the sweeper pipeline.
//!
//! Dtype checks, numeric extraction and the quantile routine used by more than
//! one stage live here so every stage agrees on what "numeric" means.

use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use std::collections::HashSet;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
///
/// Booleans are not numeric here; they are left alone by imputation, scaling
/// and outlier detection.
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Names of the columns whose dtype is numeric, in table order.
///
/// This is a derived view: call it again after any structural change.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

/// Check whether a named column exists and is numeric.
pub fn is_numeric_column(df: &DataFrame, name: &str) -> bool {
    df.column(name)
        .map(|col| is_numeric_dtype(col.dtype()))
        .unwrap_or(false)
}

// =============================================================================
// Numeric Extraction
// =============================================================================

/// Read a numeric Series as `f64` cells, preserving nulls.
pub fn series_to_f64(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let float_series = series.cast(&DataType::Float64)?;
    let values = float_series.f64()?.into_iter().collect();
    Ok(values)
}

/// Non-null values of a numeric Series, sorted ascending.
pub fn sorted_non_null(series: &Series) -> PolarsResult<Vec<f64>> {
    let mut values: Vec<f64> = series_to_f64(series)?.into_iter().flatten().collect();
    values.sort_by(|a, b| a.total_cmp(b));
    Ok(values)
}

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always Float64.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let values: Vec<f64> = series_to_f64(series)?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

// =============================================================================
// Statistics
// =============================================================================

/// Quantile of an ascending slice using linear interpolation between the two
/// closest ranks.
///
/// Returns `None` for an empty slice.
pub fn quantile_linear(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Arithmetic mean; `None` when empty.
///
/// Falls back to summing `v / n` when the plain sum overflows.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        Some(sum / n)
    } else {
        Some(values.iter().map(|v| v / n).sum())
    }
}

/// Population standard deviation (ddof = 0); `None` when empty.
///
/// Deviations are divided by the largest one before squaring, so the result
/// stays finite whenever the deviations are.
pub fn population_std(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let scale = values
        .iter()
        .map(|v| (v - mean).abs())
        .fold(0.0_f64, f64::max);
    if scale == 0.0 {
        return Some(0.0);
    }
    let variance = values
        .iter()
        .map(|v| ((v - mean) / scale).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    Some(scale * variance.sqrt())
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Try to parse a trimmed cell as a number.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// Header Utilities
// =============================================================================

/// Headers generated by readers when a file has no header row.
///
/// The polars CSV reader names the first blank header `column_1` and renames
/// repeats of it `_duplicated_<n>`.
static PLACEHOLDER_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:|.*Unnamed.*|column_\d+|_duplicated_\d+)$")
        .expect("placeholder header pattern is valid")
});

/// Check if a (trimmed) header is a reader-generated placeholder.
pub fn is_placeholder_header(name: &str) -> bool {
    PLACEHOLDER_HEADER.is_match(name)
}

/// Make header names unique and non-empty.
///
/// Blank names become `column_<position>`; repeated names get a `_<n>` suffix.
pub fn dedupe_headers(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
    names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let base = if name.trim().is_empty() {
                format!("column_{}", idx + 1)
            } else {
                name.trim().to_string()
            };
            let mut candidate = base.clone();
            let mut suffix = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            candidate
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
