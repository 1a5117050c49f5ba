//! Session state for the sweeper pipeline.
//!
//! This module provides [`PipelineState`], which owns the working table and
//! applies the cleaning and transformation stages the caller triggers.

use crate::charts::{ChartData, ChartSpec, chart_data};
use crate::cleaner::DataCleaner;
use crate::config::{ScalingMethod, SweeperConfig};
use crate::error::{Result, ResultExt};
use crate::export::{ExportArtifact, ExportFormat, export_table};
use crate::imputers::StatisticalImputer;
use crate::ingest::ingest;
use crate::pipeline::outliers::{OutlierDetector, OutlierReport};
use crate::transform::{scale_numeric, select_columns};
use crate::types::{
    ImputationReport, ScalingReport, SessionSummary, StageKind, StageRecord, UploadedFile,
};
use crate::utils::numeric_column_names;
use polars::prelude::*;
use tracing::{error, info};

/// The working table of one session and the stages applied to it.
///
/// Mutating stages compute a new table and swap it in only on success, so a
/// failed stage leaves the previous table untouched.
///
/// # Example
///
/// ```rust,ignore
/// use sweeper_processing::{ExportFormat, PipelineState, ScalingMethod, SweeperConfig, UploadedFile};
///
/// let files = vec![UploadedFile::from_path("sales.csv")?];
/// let mut state = PipelineState::from_uploads(&files, SweeperConfig::default())?;
///
/// state.deduplicate()?;
/// state.impute_numeric_means()?;
/// state.scale(ScalingMethod::MinMax)?;
///
/// let outliers = state.detect_outliers()?;
/// let artifact = state.export(ExportFormat::Parquet)?;
/// ```
#[derive(Debug, Clone)]
pub struct PipelineState {
    df: DataFrame,
    config: SweeperConfig,
    history: Vec<StageRecord>,
}

impl PipelineState {
    /// Ingest and merge a batch of uploads.
    pub fn from_uploads(files: &[UploadedFile], config: SweeperConfig) -> Result<Self> {
        config.validate()?;

        let df = ingest(files, &config).context("Ingestion failed")?;
        let description = format!("Merged {} file(s)", files.len());
        let record = StageRecord::new(StageKind::Ingest, description, (0, 0), shape(&df));

        Ok(Self {
            df,
            config,
            history: vec![record],
        })
    }

    /// Wrap an existing table.
    pub fn from_frame(df: DataFrame, config: SweeperConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            df,
            config,
            history: Vec::new(),
        })
    }

    pub fn table(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_table(self) -> DataFrame {
        self.df
    }

    pub fn config(&self) -> &SweeperConfig {
        &self.config
    }

    /// Stages applied so far, oldest first.
    pub fn history(&self) -> &[StageRecord] {
        &self.history
    }

    /// Remove exact duplicate rows. Returns the number of rows removed.
    pub fn deduplicate(&mut self) -> Result<usize> {
        let (df, removed) = self.run(StageKind::Deduplicate, DataCleaner::deduplicate)?;
        self.commit(
            StageKind::Deduplicate,
            format!("Removed {} duplicate row(s)", removed),
            df,
        );
        Ok(removed)
    }

    /// Fill missing numeric values with their column mean.
    pub fn impute_numeric_means(&mut self) -> Result<ImputationReport> {
        let strict = self.config.strict_statistics;
        let (df, report) = self.run(StageKind::Impute, |df| {
            StatisticalImputer::apply_numeric_means(df, strict)
        })?;

        let mut description = format!(
            "Filled {} missing value(s) in {} column(s)",
            report.total_filled(),
            report.filled.len()
        );
        if !report.fallback_columns.is_empty() {
            description.push_str(&format!(
                "; all-missing columns filled with 0: {}",
                report.fallback_columns.join(", ")
            ));
        }
        self.commit(StageKind::Impute, description, df);
        Ok(report)
    }

    /// Keep only `columns`, in the given order. An empty slice keeps all columns.
    pub fn select_columns(&mut self, columns: &[String]) -> Result<()> {
        let df = self.run(StageKind::Select, |df| select_columns(df, columns))?;
        let description = format!("Selected {} column(s)", df.width());
        self.commit(StageKind::Select, description, df);
        Ok(())
    }

    /// Rescale numeric columns with `method`.
    pub fn scale(&mut self, method: ScalingMethod) -> Result<ScalingReport> {
        let strict = self.config.strict_statistics;
        let (df, report) =
            self.run(StageKind::Scale, |df| scale_numeric(df, method, strict))?;

        let description = format!(
            "Applied {} to {} column(s)",
            method.label(),
            report.scaled_columns.len()
        );
        self.commit(StageKind::Scale, description, df);
        Ok(report)
    }

    /// Rows with at least one numeric value outside the IQR fences.
    pub fn detect_outliers(&self) -> Result<OutlierReport> {
        let detector = OutlierDetector::new(
            self.config.lower_quantile,
            self.config.upper_quantile,
            self.config.iqr_multiplier,
        );
        let report = detector.detect(&self.df)?;
        info!(
            "Detected {} outlier row(s) across {} numeric column(s)",
            report.count(),
            report.fences.len()
        );
        Ok(report)
    }

    pub fn chart(&self, spec: &ChartSpec) -> Result<ChartData> {
        chart_data(&self.df, spec)
    }

    /// Encode the current table as `format`.
    pub fn export(&self, format: ExportFormat) -> Result<ExportArtifact> {
        let artifact = export_table(&self.df, format, &self.config.output_file_stem)?;
        info!(
            "Exported {} rows as {} ({} bytes)",
            self.df.height(),
            artifact.file_name,
            artifact.bytes.len()
        );
        Ok(artifact)
    }

    /// First `preview_rows` rows of the current table.
    pub fn preview(&self) -> DataFrame {
        self.df.head(Some(self.config.preview_rows))
    }

    /// Names of the columns that are currently numeric.
    pub fn numeric_columns(&self) -> Vec<String> {
        numeric_column_names(&self.df)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            rows: self.df.height(),
            columns: self
                .df
                .get_column_names()
                .iter()
                .map(|name| name.to_string())
                .collect(),
            numeric_columns: self.numeric_columns(),
            missing_cells: self.df.get_columns().iter().map(|c| c.null_count()).sum(),
            history: self.history.clone(),
        }
    }

    /// Run a stage against the current table without touching it.
    fn run<T>(&self, stage: StageKind, f: impl FnOnce(&DataFrame) -> Result<T>) -> Result<T> {
        f(&self.df).inspect_err(|e| error!("Stage {:?} failed: {}", stage, e))
    }

    fn commit(&mut self, stage: StageKind, description: String, df: DataFrame) {
        let record = StageRecord::new(stage, description, shape(&self.df), shape(&df));
        info!("{}", record.description);
        self.df = df;
        self.history.push(record);
    }
}

fn shape(df: &DataFrame) -> (usize, usize) {
    (df.height(), df.width())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartKind;
    use crate::error::SweepError;
    use pretty_assertions::assert_eq;

    fn state(df: DataFrame) -> PipelineState {
        PipelineState::from_frame(df, SweeperConfig::default()).unwrap()
    }

    #[test]
    fn test_stages_are_recorded_in_order() {
        let mut state = state(
            df![
                "id" => [1i64, 2, 2, 3],
                "v" => [Some(1.0), None, None, Some(3.0)],
            ]
            .unwrap(),
        );

        assert_eq!(state.deduplicate().unwrap(), 1);
        assert_eq!(state.impute_numeric_means().unwrap().total_filled(), 1);
        state.select_columns(&["v".to_string()]).unwrap();
        state.scale(ScalingMethod::MinMax).unwrap();

        let stages: Vec<StageKind> = state.history().iter().map(|r| r.stage).collect();
        assert_eq!(
            stages,
            vec![
                StageKind::Deduplicate,
                StageKind::Impute,
                StageKind::Select,
                StageKind::Scale,
            ]
        );

        let dedupe = &state.history()[0];
        assert_eq!((dedupe.rows_before, dedupe.rows_after), (4, 3));
        let select = &state.history()[2];
        assert_eq!((select.columns_before, select.columns_after), (2, 1));

        let values: Vec<Option<f64>> =
            state.table().column("v").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(0.0), Some(0.5), Some(1.0)]);
    }

    #[test]
    fn test_failed_stage_keeps_last_valid_table() {
        let original = df!["a" => [1i64, 2, 3]].unwrap();
        let mut state = state(original.clone());

        let err = state.select_columns(&["missing".to_string()]).unwrap_err();
        assert!(matches!(err, SweepError::UnknownColumn(_)));
        assert!(state.table().equals(&original));
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_strict_statistics_reject_constant_column() {
        let original = df!["c" => [2.0, 2.0, 2.0]].unwrap();
        let config = SweeperConfig::builder().strict_statistics(true).build().unwrap();
        let mut state = PipelineState::from_frame(original.clone(), config).unwrap();

        let err = state.scale(ScalingMethod::ZScore).unwrap_err();
        assert_eq!(err.error_code(), "UNDEFINED_STATISTIC");
        assert!(state.table().equals(&original));
    }

    #[test]
    fn test_numeric_columns_follow_table() {
        let mut state = state(
            df![
                "name" => ["a", "b"],
                "x" => [1i64, 2],
                "y" => [0.5, 1.5],
            ]
            .unwrap(),
        );
        assert_eq!(state.numeric_columns(), vec!["x", "y"]);

        state
            .select_columns(&["y".to_string(), "name".to_string()])
            .unwrap();
        assert_eq!(state.numeric_columns(), vec!["y"]);
    }

    #[test]
    fn test_read_only_operations_do_not_mutate() {
        let original = df![
            "k" => ["a", "b", "c", "d", "e"],
            "v" => [1.0, 2.0, 3.0, 4.0, 100.0],
        ]
        .unwrap();
        let state = state(original.clone());

        assert_eq!(state.detect_outliers().unwrap().row_indices, vec![4]);
        state
            .chart(&ChartSpec::new(ChartKind::Bar, "k", "v"))
            .unwrap();
        state.export(ExportFormat::Csv).unwrap();

        assert!(state.table().equals(&original));
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_preview_and_summary() {
        let config = SweeperConfig::builder().preview_rows(2).build().unwrap();
        let mut state = PipelineState::from_frame(
            df!["a" => [Some(1i64), None, Some(3), Some(3)]].unwrap(),
            config,
        )
        .unwrap();
        state.deduplicate().unwrap();

        assert_eq!(state.preview().height(), 2);

        let summary = state.summary();
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.missing_cells, 1);
        assert_eq!(summary.history.len(), 1);
    }

    #[test]
    fn test_from_uploads_records_ingest() {
        let files = vec![
            UploadedFile::new("a.csv", "x\n1\n"),
            UploadedFile::new("b.csv", "x\n2\n"),
        ];
        let state = PipelineState::from_uploads(&files, SweeperConfig::default()).unwrap();

        assert_eq!(state.table().height(), 2);
        let ingest = &state.history()[0];
        assert_eq!(ingest.stage, StageKind::Ingest);
        assert_eq!((ingest.rows_after, ingest.columns_after), (2, 1));
    }

    #[test]
    fn test_export_uses_configured_stem() {
        let config = SweeperConfig::builder()
            .output_file_stem("cleaned")
            .build()
            .unwrap();
        let state = PipelineState::from_frame(df!["a" => [1i64]].unwrap(), config).unwrap();

        let artifact = state.export(ExportFormat::Parquet).unwrap();
        assert_eq!(artifact.file_name, "cleaned.parquet");
        assert_eq!(artifact.mime_type, "application/octet-stream");
    }

    #[test]
    fn test_missing_value_tokens_are_imputed() {
        let files = vec![UploadedFile::new(
            "tokens.csv",
            "id,score\n1,10\n2,NA\n3,N/A\n4,20\n5,NaN\n",
        )];
        let mut state = PipelineState::from_uploads(&files, SweeperConfig::default()).unwrap();
        assert_eq!(state.numeric_columns(), vec!["id", "score"]);
        assert_eq!(state.table().column("score").unwrap().null_count(), 3);

        let report = state.impute_numeric_means().unwrap();
        assert_eq!(report.total_filled(), 3);
        let scores = crate::utils::series_to_f64(
            state.table().column("score").unwrap().as_materialized_series(),
        )
        .unwrap();
        assert_eq!(scores[1], Some(15.0));
        assert_eq!(scores[4], Some(15.0));
    }
}
