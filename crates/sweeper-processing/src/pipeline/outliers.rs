//! Outlier detection module.
//!
//! Flags rows with at least one numeric value outside the Tukey fences
//! `[Q1 - k*IQR, Q3 + k*IQR]` of its column.

use crate::error::Result;
use crate::types::ColumnFences;
use crate::utils::{numeric_column_names, quantile_linear, series_to_f64, sorted_non_null};
use polars::prelude::*;
use tracing::debug;

/// Rows flagged as outliers together with the fences that flagged them.
#[derive(Debug, Clone)]
pub struct OutlierReport {
    /// The flagged rows, in original order.
    pub rows: DataFrame,
    /// Positions of the flagged rows in the source table.
    pub row_indices: Vec<usize>,
    /// Fences for every numeric column that had values.
    pub fences: Vec<ColumnFences>,
}

impl OutlierReport {
    pub fn count(&self) -> usize {
        self.row_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_indices.is_empty()
    }
}

/// Detects outliers with the interquartile-range rule.
#[derive(Debug, Clone, Copy)]
pub struct OutlierDetector {
    lower_quantile: f64,
    upper_quantile: f64,
    multiplier: f64,
}

impl Default for OutlierDetector {
    fn default() -> Self {
        Self::new(0.25, 0.75, 1.5)
    }
}

impl OutlierDetector {
    pub fn new(lower_quantile: f64, upper_quantile: f64, multiplier: f64) -> Self {
        Self {
            lower_quantile,
            upper_quantile,
            multiplier,
        }
    }

    /// Compute the fences for one numeric Series.
    ///
    /// Returns `None` when the column has no non-null values.
    pub fn fences(&self, series: &Series) -> Result<Option<ColumnFences>> {
        let sorted = sorted_non_null(series)?;

        let (Some(q1), Some(q3)) = (
            quantile_linear(&sorted, self.lower_quantile),
            quantile_linear(&sorted, self.upper_quantile),
        ) else {
            return Ok(None);
        };
        let iqr = q3 - q1;

        Ok(Some(ColumnFences {
            column: series.name().to_string(),
            q1,
            q3,
            iqr,
            lower: q1 - self.multiplier * iqr,
            upper: q3 + self.multiplier * iqr,
            outlier_count: 0,
        }))
    }

    /// Flag rows where any numeric value falls outside its column's fences.
    ///
    /// Null cells never flag a row. The input table is not modified.
    pub fn detect(&self, df: &DataFrame) -> Result<OutlierReport> {
        let mut mask = vec![false; df.height()];
        let mut fences = Vec::new();

        for col_name in numeric_column_names(df) {
            let series = df.column(&col_name)?.as_materialized_series();
            let Some(mut column_fences) = self.fences(series)? else {
                debug!("Skipping '{}': no values", col_name);
                continue;
            };

            for (flag, value) in mask.iter_mut().zip(series_to_f64(series)?) {
                if let Some(value) = value
                    && column_fences.is_outside(value)
                {
                    column_fences.outlier_count += 1;
                    *flag = true;
                }
            }

            debug!(
                "'{}': Q1={:.4} Q3={:.4} fences=[{:.4}, {:.4}] outliers={}",
                col_name,
                column_fences.q1,
                column_fences.q3,
                column_fences.lower,
                column_fences.upper,
                column_fences.outlier_count
            );
            fences.push(column_fences);
        }

        let row_indices: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(idx, flagged)| flagged.then_some(idx))
            .collect();
        let mask = BooleanChunked::from_slice("mask".into(), &mask);
        let rows = df.filter(&mask)?;

        Ok(OutlierReport {
            rows,
            row_indices,
            fences,
        })
    }
}
