//! Configuration types for the sweeper pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use serde::{Deserialize, Serialize};

/// Column-wise rescaling applied to numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScalingMethod {
    /// Leave values untouched
    #[default]
    None,
    /// Map `[min, max]` linearly onto `[0, 1]`
    MinMax,
    /// Subtract the mean and divide by the population standard deviation
    ZScore,
}

impl ScalingMethod {
    /// Human-readable label used in stage records.
    pub fn label(&self) -> &'static str {
        match self {
            ScalingMethod::None => "none",
            ScalingMethod::MinMax => "normalization (min-max)",
            ScalingMethod::ZScore => "standardization (z-score)",
        }
    }
}

/// Configuration for the sweeper pipeline.
///
/// Use [`SweeperConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use sweeper_processing::config::SweeperConfig;
///
/// let config = SweeperConfig::builder()
///     .iqr_multiplier(3.0)
///     .strict_statistics(true)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweeperConfig {
    /// Width of the outlier fences in multiples of the IQR.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Probability used for the lower quartile.
    /// Default: 0.25
    pub lower_quantile: f64,

    /// Probability used for the upper quartile.
    /// Default: 0.75
    pub upper_quantile: f64,

    /// Raise `UndefinedStatistic` on zero-variance or all-missing columns
    /// instead of falling back to 0.
    /// Default: false
    pub strict_statistics: bool,

    /// Number of rows the CSV reader scans to infer column types.
    /// `None` scans the whole file.
    /// Default: Some(100)
    pub infer_schema_length: Option<usize>,

    /// File name stem used for exported artifacts.
    /// Default: "processed_data"
    pub output_file_stem: String,

    /// Number of rows returned by the table preview.
    /// Default: 5
    pub preview_rows: usize,

    /// Re-type promoted string columns that hold only numbers.
    /// Default: true
    pub coerce_promoted_headers: bool,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier: 1.5,
            lower_quantile: 0.25,
            upper_quantile: 0.75,
            strict_statistics: false,
            infer_schema_length: Some(100),
            output_file_stem: "processed_data".to_string(),
            preview_rows: 5,
            coerce_promoted_headers: true,
        }
    }
}

impl SweeperConfig {
    /// Create a new configuration builder.
    pub fn builder() -> SweeperConfigBuilder {
        SweeperConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidMultiplier(self.iqr_multiplier));
        }

        for (field, value) in [
            ("lower_quantile", self.lower_quantile),
            ("upper_quantile", self.upper_quantile),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidQuantile {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.lower_quantile >= self.upper_quantile {
            return Err(ConfigValidationError::InvertedQuantiles {
                lower: self.lower_quantile,
                upper: self.upper_quantile,
            });
        }

        if self.infer_schema_length == Some(0) {
            return Err(ConfigValidationError::InvalidSchemaLength);
        }

        if self.output_file_stem.trim().is_empty() {
            return Err(ConfigValidationError::EmptyFileStem);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid IQR multiplier: {0} (must be a positive finite number)")]
    InvalidMultiplier(f64),

    #[error("Invalid quantile for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidQuantile { field: String, value: f64 },

    #[error("Lower quantile {lower} must be below upper quantile {upper}")]
    InvertedQuantiles { lower: f64, upper: f64 },

    #[error("Schema inference length must be at least 1")]
    InvalidSchemaLength,

    #[error("Output file stem must not be empty")]
    EmptyFileStem,
}

/// Builder for [`SweeperConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct SweeperConfigBuilder {
    iqr_multiplier: Option<f64>,
    lower_quantile: Option<f64>,
    upper_quantile: Option<f64>,
    strict_statistics: Option<bool>,
    infer_schema_length: Option<Option<usize>>,
    output_file_stem: Option<String>,
    preview_rows: Option<usize>,
    coerce_promoted_headers: Option<bool>,
}

impl SweeperConfigBuilder {
    /// Set the outlier fence multiplier (1.5 is the classic Tukey fence).
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the lower and upper quartile probabilities.
    pub fn quantiles(mut self, lower: f64, upper: f64) -> Self {
        self.lower_quantile = Some(lower);
        self.upper_quantile = Some(upper);
        self
    }

    /// Fail on degenerate statistics instead of falling back to 0.
    pub fn strict_statistics(mut self, strict: bool) -> Self {
        self.strict_statistics = Some(strict);
        self
    }

    /// Set the CSV schema inference window (`None` = full scan).
    pub fn infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Set the file name stem for exported artifacts.
    pub fn output_file_stem(mut self, stem: impl Into<String>) -> Self {
        self.output_file_stem = Some(stem.into());
        self
    }

    /// Set the number of preview rows.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Enable or disable numeric re-typing after header promotion.
    pub fn coerce_promoted_headers(mut self, coerce: bool) -> Self {
        self.coerce_promoted_headers = Some(coerce);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `SweeperConfig` or an error if validation fails.
    pub fn build(self) -> Result<SweeperConfig, ConfigValidationError> {
        let defaults = SweeperConfig::default();
        let config = SweeperConfig {
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            lower_quantile: self.lower_quantile.unwrap_or(defaults.lower_quantile),
            upper_quantile: self.upper_quantile.unwrap_or(defaults.upper_quantile),
            strict_statistics: self.strict_statistics.unwrap_or(defaults.strict_statistics),
            infer_schema_length: self
                .infer_schema_length
                .unwrap_or(defaults.infer_schema_length),
            output_file_stem: self.output_file_stem.unwrap_or(defaults.output_file_stem),
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
            coerce_promoted_headers: self
                .coerce_promoted_headers
                .unwrap_or(defaults.coerce_promoted_headers),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SweeperConfig::default();
        assert_eq!(config.iqr_multiplier, 1.5);
        assert_eq!(config.lower_quantile, 0.25);
        assert_eq!(config.upper_quantile, 0.75);
        assert_eq!(config.output_file_stem, "processed_data");
        assert!(!config.strict_statistics);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = SweeperConfig::builder()
            .iqr_multiplier(3.0)
            .quantiles(0.1, 0.9)
            .strict_statistics(true)
            .infer_schema_length(None)
            .output_file_stem("cleaned")
            .preview_rows(10)
            .build()
            .unwrap();

        assert_eq!(config.iqr_multiplier, 3.0);
        assert_eq!(config.lower_quantile, 0.1);
        assert_eq!(config.upper_quantile, 0.9);
        assert!(config.strict_statistics);
        assert_eq!(config.infer_schema_length, None);
        assert_eq!(config.output_file_stem, "cleaned");
        assert_eq!(config.preview_rows, 10);
    }

    #[test]
    fn test_validation_invalid_multiplier() {
        let result = SweeperConfig::builder().iqr_multiplier(0.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidMultiplier(_)
        ));

        let result = SweeperConfig::builder().iqr_multiplier(f64::NAN).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_quantiles() {
        let result = SweeperConfig::builder().quantiles(-0.1, 0.75).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidQuantile { .. }
        ));

        let result = SweeperConfig::builder().quantiles(0.75, 0.25).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvertedQuantiles { .. }
        ));
    }

    #[test]
    fn test_validation_file_stem() {
        let result = SweeperConfig::builder().output_file_stem("  ").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyFileStem
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "iqr_multiplier": 2.0,
            "lower_quantile": 0.2,
            "upper_quantile": 0.8,
            "strict_statistics": true,
            "infer_schema_length": null,
            "output_file_stem": "export",
            "preview_rows": 3,
            "coerce_promoted_headers": false
        }"#;

        let config: SweeperConfig =
            serde_json::from_str(json).expect("Should deserialize from frontend JSON");

        assert_eq!(config.iqr_multiplier, 2.0);
        assert_eq!(config.lower_quantile, 0.2);
        assert!(config.strict_statistics);
        assert_eq!(config.infer_schema_length, None);
        assert!(!config.coerce_promoted_headers);
    }

    #[test]
    fn test_scaling_method_default() {
        assert_eq!(ScalingMethod::default(), ScalingMethod::None);
        assert_eq!(ScalingMethod::ZScore.label(), "standardization (z-score)");
    }
}
