//! Chart data extraction.
//!
//! The pipeline does not render charts. It validates the axis selection and
//! hands a renderer-agnostic [`ChartData`] to whatever front end draws it.

use crate::error::{Result, SweepError};
use crate::utils::{is_numeric_column, series_to_f64};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Supported chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    /// `x` holds slice names, `y` holds slice values.
    Pie,
}

impl ChartKind {
    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line Chart",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Pie => "Pie Chart",
        }
    }
}

/// Axis selection for one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub x: String,
    pub y: String,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            kind,
            x: x.into(),
            y: y.into(),
        }
    }
}

/// One plotted point, or one pie slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Everything a renderer needs to draw a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ChartPoint>,
}

/// Build chart data for `spec` from the table.
///
/// `x` may be any column type; its values are rendered as text labels (nulls
/// as an empty label). `y` must be numeric, and rows where it is null are
/// skipped.
///
/// # Errors
///
/// - `UnknownColumn` when either axis names a missing column
/// - `NonNumericColumn` when `y` is not numeric
pub fn chart_data(df: &DataFrame, spec: &ChartSpec) -> Result<ChartData> {
    let x = df
        .column(&spec.x)
        .map_err(|_| SweepError::UnknownColumn(spec.x.clone()))?;
    let y = df
        .column(&spec.y)
        .map_err(|_| SweepError::UnknownColumn(spec.y.clone()))?;
    if !is_numeric_column(df, &spec.y) {
        return Err(SweepError::NonNumericColumn(spec.y.clone()));
    }

    let labels = x.cast(&DataType::String)?;
    let labels = labels.str()?;
    let values = series_to_f64(y.as_materialized_series())?;

    let pairs = labels
        .into_iter()
        .zip(values)
        .filter_map(|(label, value)| Some((label.unwrap_or_default().to_string(), value?)));

    let points = match spec.kind {
        ChartKind::Pie => sum_by_label(pairs),
        _ => pairs
            .map(|(label, value)| ChartPoint { label, value })
            .collect(),
    };

    debug!(
        "Built {} with {} points ({} vs {})",
        spec.kind.title(),
        points.len(),
        spec.x,
        spec.y
    );

    Ok(ChartData {
        kind: spec.kind,
        title: spec.kind.title().to_string(),
        x_label: spec.x.clone(),
        y_label: spec.y.clone(),
        points,
    })
}

/// Sum values per label, keeping labels in order of first appearance.
fn sum_by_label(pairs: impl Iterator<Item = (String, f64)>) -> Vec<ChartPoint> {
    let mut slices: Vec<ChartPoint> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (label, value) in pairs {
        match positions.get(&label) {
            Some(&idx) => slices[idx].value += value,
            None => {
                positions.insert(label.clone(), slices.len());
                slices.push(ChartPoint { label, value });
            }
        }
    }
    slices
}
