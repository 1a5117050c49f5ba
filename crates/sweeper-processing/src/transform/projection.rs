//! Column projection.

use crate::error::{Result, SweepError};
use polars::prelude::*;
use std::collections::HashSet;

/// Restrict the table to `columns`, in the given order.
///
/// An empty selection keeps every column in its current order. Row count and
/// row order never change.
pub fn select_columns(df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
    if columns.is_empty() {
        return Ok(df.clone());
    }

    let mut seen = HashSet::with_capacity(columns.len());
    for name in columns {
        if df.column(name).is_err() {
            return Err(SweepError::UnknownColumn(name.clone()));
        }
        if !seen.insert(name.as_str()) {
            return Err(SweepError::DuplicateColumn(name.clone()));
        }
    }

    let selected: Vec<Column> = columns
        .iter()
        .map(|name| df.column(name).cloned())
        .collect::<PolarsResult<_>>()?;
    Ok(DataFrame::new(selected)?)
}
