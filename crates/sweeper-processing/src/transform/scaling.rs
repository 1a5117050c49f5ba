//! Column-wise rescaling of numeric columns.

use crate::config::ScalingMethod;
use crate::error::{Result, SweepError};
use crate::types::ScalingReport;
use crate::utils::{mean, numeric_column_names, population_std, series_to_f64};
use polars::prelude::*;
use tracing::{debug, warn};

/// Rescale every numeric column with `method`.
///
/// Non-numeric columns, row order and row count are unchanged; scaled columns
/// become Float64 and nulls stay null. Columns with zero range (MinMax) or zero
/// deviation (ZScore) map to 0, or fail with `UndefinedStatistic` when `strict`.
///
/// Statistics are computed on halved values so that a range spanning most of
/// the f64 domain stays finite; the ratio is unchanged.
pub fn scale_numeric(
    df: &DataFrame,
    method: ScalingMethod,
    strict: bool,
) -> Result<(DataFrame, ScalingReport)> {
    let mut report = ScalingReport {
        method,
        scaled_columns: Vec::new(),
        degenerate_columns: Vec::new(),
    };
    let statistic: fn(&[f64]) -> Option<(f64, f64)> = match method {
        ScalingMethod::None => return Ok((df.clone(), report)),
        ScalingMethod::MinMax => min_max,
        ScalingMethod::ZScore => z_score,
    };

    let mut df = df.clone();
    for col_name in numeric_column_names(&df) {
        let values = series_to_f64(df.column(&col_name)?.as_materialized_series())?;
        let present: Vec<f64> = values.iter().flatten().map(|x| x / 2.0).collect();

        let scaled: Vec<Option<f64>> = match statistic(&present) {
            Some((offset, divisor)) => values
                .iter()
                .map(|v| v.map(|x| (x / 2.0 - offset) / divisor))
                .collect(),
            None if strict => {
                return Err(SweepError::UndefinedStatistic {
                    column: col_name,
                    statistic: match method {
                        ScalingMethod::ZScore => "standard deviation",
                        _ => "range",
                    }
                    .to_string(),
                });
            }
            None => {
                warn!("Column '{}' is constant or empty, mapping to 0", col_name);
                report.degenerate_columns.push(col_name.clone());
                values.iter().map(|v| v.map(|_| 0.0)).collect()
            }
        };

        df.replace(&col_name, Series::new(col_name.as_str().into(), scaled))?;
        debug!("Scaled '{}' with {}", col_name, method.label());
        report.scaled_columns.push(col_name);
    }

    Ok((df, report))
}

/// `(min, max - min)`, or `None` when the range is zero or undefined.
fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let min = values.iter().copied().reduce(f64::min)?;
    let max = values.iter().copied().reduce(f64::max)?;
    let range = max - min;
    (range > 0.0 && range.is_finite()).then_some((min, range))
}

/// `(mean, population std)`, or `None` when the deviation is zero or undefined.
fn z_score(values: &[f64]) -> Option<(f64, f64)> {
    let mean = mean(values)?;
    let std = population_std(values)?;
    (std > 0.0 && std.is_finite()).then_some((mean, std))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name).unwrap().f64().unwrap().into_iter().collect()
    }

    #[test]
    fn test_min_max_maps_to_unit_interval() {
        let df = df![
            "a" => [10i64, 20, 30, 50],
            "label" => ["w", "x", "y", "z"],
        ]
        .unwrap();

        let (scaled, report) = scale_numeric(&df, ScalingMethod::MinMax, false).unwrap();
        assert_eq!(
            column_values(&scaled, "a"),
            vec![Some(0.0), Some(0.25), Some(0.5), Some(1.0)]
        );
        assert_eq!(scaled.column("label").unwrap().dtype(), &DataType::String);
        assert_eq!(report.scaled_columns, vec!["a"]);
    }

    #[test]
    fn test_z_score_uses_population_std() {
        let df = df!["v" => [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]].unwrap();

        let (scaled, _) = scale_numeric(&df, ScalingMethod::ZScore, false).unwrap();
        let values = column_values(&scaled, "v");
        assert_eq!(values[0], Some(-1.5));
        assert_eq!(values[7], Some(2.0));

        let sum: f64 = values.iter().flatten().sum();
        assert!(sum.abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_maps_to_zero() {
        let df = df!["c" => [Some(3.0), None, Some(3.0)]].unwrap();

        let (scaled, report) = scale_numeric(&df, ScalingMethod::MinMax, false).unwrap();
        assert_eq!(column_values(&scaled, "c"), vec![Some(0.0), None, Some(0.0)]);
        assert_eq!(report.degenerate_columns, vec!["c"]);

        let (scaled, _) = scale_numeric(&df, ScalingMethod::ZScore, false).unwrap();
        assert_eq!(column_values(&scaled, "c"), vec![Some(0.0), None, Some(0.0)]);
    }

    #[test]
    fn test_constant_column_strict_errors() {
        let df = df!["c" => [1.0, 1.0]].unwrap();
        let err = scale_numeric(&df, ScalingMethod::ZScore, true).unwrap_err();
        assert!(matches!(err, SweepError::UndefinedStatistic { ref statistic, .. } if statistic == "standard deviation"));
    }

    #[test]
    fn test_extreme_range_is_not_degenerate() {
        let df = df!["wide" => [-1e308, 0.0, 1e308]].unwrap();

        let (scaled, report) = scale_numeric(&df, ScalingMethod::MinMax, true).unwrap();
        assert_eq!(
            column_values(&scaled, "wide"),
            vec![Some(0.0), Some(0.5), Some(1.0)]
        );
        assert!(report.degenerate_columns.is_empty());

        let (scaled, report) = scale_numeric(&df, ScalingMethod::ZScore, true).unwrap();
        let values: Vec<f64> = column_values(&scaled, "wide").into_iter().flatten().collect();
        assert!(values.iter().all(|v| v.is_finite()));
        assert_eq!(values[1], 0.0);
        assert!(values[0] < 0.0 && values[2] > 0.0);
        assert!(report.degenerate_columns.is_empty());
    }

    #[test]
    fn test_none_is_identity() {
        let df = df!["a" => [1i64, 5, 9]].unwrap();
        let (scaled, report) = scale_numeric(&df, ScalingMethod::None, false).unwrap();
        assert!(scaled.equals(&df));
        assert!(report.scaled_columns.is_empty());
    }
}
