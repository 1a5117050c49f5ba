//! Tabular Data Sweeper Library
//!
//! Merge, clean, transform, chart and export small tabular datasets with Polars.
//!
//! # Overview
//!
//! A session starts from one or more uploaded files and applies the stages
//! the caller asks for, in any order:
//!
//! - **Ingestion & Merge**: CSV and spreadsheet decoding, header normalization,
//!   concatenation in upload order
//! - **Cleaning**: exact-duplicate removal and mean imputation of numeric columns
//! - **Projection**: keep a chosen subset of columns
//! - **Scaling**: min-max normalization or z-score standardization
//! - **Outlier Detection**: IQR fences over numeric columns
//! - **Charts**: renderer-agnostic chart data for line, bar, scatter and pie charts
//! - **Export**: CSV, Excel, JSON lines or Parquet, encoded in memory
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sweeper_processing::{
//!     ChartKind, ChartSpec, ExportFormat, PipelineState, ScalingMethod, SweeperConfig,
//!     UploadedFile,
//! };
//!
//! let files = vec![
//!     UploadedFile::from_path("january.csv")?,
//!     UploadedFile::from_path("february.xlsx")?,
//! ];
//!
//! let mut state = PipelineState::from_uploads(&files, SweeperConfig::default())?;
//! println!("{}", state.preview());
//!
//! state.deduplicate()?;
//! state.impute_numeric_means()?;
//! state.select_columns(&["region".to_string(), "revenue".to_string()])?;
//! state.scale(ScalingMethod::ZScore)?;
//!
//! let outliers = state.detect_outliers()?;
//! println!("{} outlier rows", outliers.count());
//!
//! let chart = state.chart(&ChartSpec::new(ChartKind::Bar, "region", "revenue"))?;
//! let artifact = state.export(ExportFormat::Excel)?;
//! artifact.write_to_dir("outputs")?;
//! ```
//!
//! # Configuration
//!
//! Use [`SweeperConfig`] to tune the statistics and the export name:
//!
//! ```rust,ignore
//! use sweeper_processing::SweeperConfig;
//!
//! let config = SweeperConfig::builder()
//!     .iqr_multiplier(3.0)              // wider outlier fences
//!     .quantiles(0.1, 0.9)
//!     .strict_statistics(true)          // fail instead of mapping degenerate columns to 0
//!     .output_file_stem("cleaned")
//!     .build()?;
//! ```
//!
//! # Errors
//!
//! Every stage returns [`SweepError`]. A failed stage never replaces the
//! session table, so the caller can report the error and carry on.

pub mod charts;
pub mod cleaner;
pub mod codecs;
pub mod config;
pub mod error;
pub mod export;
pub mod imputers;
pub mod ingest;
pub mod pipeline;
pub mod transform;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use charts::{ChartData, ChartKind, ChartPoint, ChartSpec};
pub use cleaner::DataCleaner;
pub use codecs::TableCodec;
pub use config::{ConfigValidationError, ScalingMethod, SweeperConfig, SweeperConfigBuilder};
pub use error::{Result, ResultExt, SweepError};
pub use export::{ExportArtifact, ExportFormat};
pub use imputers::StatisticalImputer;
pub use pipeline::{OutlierDetector, OutlierReport, PipelineState};
pub use types::{
    ColumnFences, ColumnFill, ImputationReport, ScalingReport, SessionSummary, SourceFormat,
    StageKind, StageRecord, UploadedFile,
};
