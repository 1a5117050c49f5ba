//! Header normalization for freshly decoded tables.

use crate::utils::{dedupe_headers, is_placeholder_header, parse_numeric_string};
use anyhow::Result;
use polars::prelude::*;
use tracing::debug;

/// Trim header names and promote the first data row when the file had no
/// real header row.
///
/// Returns the normalized table and whether promotion happened.
pub(crate) fn normalize_headers(df: DataFrame, coerce_numeric: bool) -> Result<(DataFrame, bool)> {
    let trimmed: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.trim().to_string())
        .collect();

    let header_less = !trimmed.is_empty()
        && df.height() > 0
        && trimmed.iter().all(|name| is_placeholder_header(name));

    if !header_less {
        return Ok((rename_columns(&df, dedupe_headers(trimmed))?, false));
    }

    debug!("All headers are placeholders, promoting first row to header");

    let mut promoted = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let first = column.as_materialized_series().slice(0, 1);
        let text = first.cast(&DataType::String)?;
        let value = text.str()?.get(0).unwrap_or_default().trim().to_string();
        promoted.push(value);
    }

    let body = df.slice(1, df.height() - 1);
    let mut renamed = rename_columns(&body, dedupe_headers(promoted))?;
    if coerce_numeric {
        renamed = coerce_numeric_strings(renamed)?;
    }

    Ok((renamed, true))
}

fn rename_columns(df: &DataFrame, names: Vec<String>) -> Result<DataFrame> {
    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .zip(names)
        .map(|(column, name)| column.clone().with_name(name.into()))
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Cast String columns whose non-null values all parse as numbers.
///
/// Needed after promotion: the header text forced those columns to String.
pub(crate) fn coerce_numeric_strings(df: DataFrame) -> Result<DataFrame> {
    let mut df = df;
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    for name in &names {
        let series = df.column(name)?.as_materialized_series().clone();
        if series.dtype() != &DataType::String {
            continue;
        }

        let values = series.str()?;
        let non_null = series.len() - series.null_count();
        if non_null == 0 {
            continue;
        }

        // Integers parse exactly; only values that need it go through f64.
        let ints: Vec<Option<i64>> = values
            .into_iter()
            .map(|value| value.and_then(|v| v.trim().parse::<i64>().ok()))
            .collect();
        let converted = if ints.iter().flatten().count() == non_null {
            Series::new(name.as_str().into(), ints)
        } else {
            let floats: Vec<Option<f64>> = values
                .into_iter()
                .map(|value| value.and_then(parse_numeric_string))
                .collect();
            if floats.iter().flatten().count() != non_null {
                continue;
            }
            Series::new(name.as_str().into(), floats)
        };

        debug!("Coerced promoted column '{}' to {}", name, converted.dtype());
        df.replace(name, converted)?;
    }

    Ok(df)
}
