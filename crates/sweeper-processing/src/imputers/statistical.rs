//! Statistical imputation methods.

use crate::error::{Result, SweepError};
use crate::types::{ColumnFill, ImputationReport};
use crate::utils::{fill_numeric_nulls, is_numeric_dtype};
use polars::prelude::*;
use tracing::{debug, warn};

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Replace missing entries of every numeric column with the column mean.
    ///
    /// Non-numeric columns are untouched. Filled columns become Float64.
    /// A numeric column with no values at all is filled with 0 (reported in
    /// `fallback_columns`), or rejected with `UndefinedStatistic` when `strict`.
    pub fn apply_numeric_means(
        df: &DataFrame,
        strict: bool,
    ) -> Result<(DataFrame, ImputationReport)> {
        let mut df = df.clone();
        let mut report = ImputationReport::default();

        let targets: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()) && col.null_count() > 0)
            .map(|col| col.name().to_string())
            .collect();

        for col_name in &targets {
            let series = df.column(col_name)?.as_materialized_series().clone();
            let missing = series.null_count();

            let fill_value = match series.mean() {
                Some(mean) => mean,
                None if strict => {
                    return Err(SweepError::UndefinedStatistic {
                        column: col_name.clone(),
                        statistic: "mean".to_string(),
                    });
                }
                None => {
                    warn!("Column '{}' has no values, filling with 0", col_name);
                    report.fallback_columns.push(col_name.clone());
                    0.0
                }
            };

            let filled = fill_numeric_nulls(&series, fill_value)?;
            df.replace(col_name, filled)?;

            debug!(
                "Filled {} missing values in '{}' with {:.4}",
                missing, col_name, fill_value
            );
            report.filled.push(ColumnFill {
                column: col_name.clone(),
                fill_value,
                filled_count: missing,
            });
        }

        Ok((df, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_numeric_columns_with_mean() {
        let df = df![
            "a" => [Some(1.0), None, Some(3.0)],
            "b" => [Some(10i64), Some(20), None],
        ]
        .unwrap();

        let (filled, report) = StatisticalImputer::apply_numeric_means(&df, false).unwrap();

        let a: Vec<Option<f64>> = filled.column("a").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(a, vec![Some(1.0), Some(2.0), Some(3.0)]);

        let b = filled.column("b").unwrap();
        assert_eq!(b.dtype(), &DataType::Float64);
        assert_eq!(b.f64().unwrap().get(2), Some(15.0));

        assert_eq!(report.filled.len(), 2);
        assert_eq!(report.total_filled(), 2);
        assert!(report.fallback_columns.is_empty());
    }

    #[test]
    fn test_text_columns_untouched() {
        let df = df![
            "name" => [Some("a"), None, Some("c")],
            "v" => [Some(1.0), Some(2.0), Some(3.0)],
        ]
        .unwrap();

        let (filled, report) = StatisticalImputer::apply_numeric_means(&df, false).unwrap();
        assert_eq!(filled.column("name").unwrap().null_count(), 1);
        // complete numeric columns keep their dtype and values
        assert!(
            filled
                .column("v")
                .unwrap()
                .as_materialized_series()
                .equals(df.column("v").unwrap().as_materialized_series())
        );
        assert!(report.filled.is_empty());
    }

    #[test]
    fn test_all_missing_column_falls_back_to_zero() {
        let df = df![
            "empty" => [None::<f64>, None, None],
        ]
        .unwrap();

        let (filled, report) = StatisticalImputer::apply_numeric_means(&df, false).unwrap();
        let values: Vec<Option<f64>> = filled
            .column("empty")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(0.0); 3]);
        assert_eq!(report.fallback_columns, vec!["empty"]);
    }

    #[test]
    fn test_all_missing_column_strict_errors() {
        let df = df![
            "empty" => [None::<f64>, None],
        ]
        .unwrap();

        let err = StatisticalImputer::apply_numeric_means(&df, true).unwrap_err();
        assert_eq!(err.error_code(), "UNDEFINED_STATISTIC");
    }

    #[test]
    fn test_no_missing_after_imputation() {
        let df = df![
            "x" => [Some(1.0), None, None, Some(5.0)],
            "y" => [None, Some(2i32), Some(4), None],
        ]
        .unwrap();

        let (filled, _) = StatisticalImputer::apply_numeric_means(&df, false).unwrap();
        for col in filled.get_columns() {
            assert_eq!(col.null_count(), 0, "column {} still has nulls", col.name());
        }
    }
}
