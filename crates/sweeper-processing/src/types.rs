use crate::config::ScalingMethod;
use crate::error::{Result, SweepError};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Uploads
// ============================================================================

/// A file handed to the pipeline by the caller: its name and raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its file name.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    /// Lower-cased extension without the dot; empty when there is none.
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default()
    }
}

/// Table formats accepted at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    Csv,
    Spreadsheet,
}

impl SourceFormat {
    /// Resolve the decoder for an uploaded file from its extension.
    pub fn detect(file: &UploadedFile) -> Result<Self> {
        let extension = file.extension();
        match extension.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(SourceFormat::Spreadsheet),
            _ => Err(SweepError::UnsupportedFormat {
                file: file.name.clone(),
                extension,
            }),
        }
    }
}

// ============================================================================
// Stage History
// ============================================================================

/// Pipeline stages that change the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Ingest,
    Deduplicate,
    Impute,
    Select,
    Scale,
}

/// One applied stage and its effect on the table shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: StageKind,
    pub description: String,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
}

impl StageRecord {
    pub fn new(
        stage: StageKind,
        description: impl Into<String>,
        before: (usize, usize),
        after: (usize, usize),
    ) -> Self {
        Self {
            stage,
            description: description.into(),
            rows_before: before.0,
            rows_after: after.0,
            columns_before: before.1,
            columns_after: after.1,
        }
    }
}

// ============================================================================
// Stage Reports
// ============================================================================

/// Mean used to fill one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFill {
    pub column: String,
    pub fill_value: f64,
    pub filled_count: usize,
}

/// Outcome of mean imputation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImputationReport {
    pub filled: Vec<ColumnFill>,
    /// Columns with no values at all, filled with 0.
    pub fallback_columns: Vec<String>,
}

impl ImputationReport {
    pub fn total_filled(&self) -> usize {
        self.filled.iter().map(|f| f.filled_count).sum()
    }
}

/// Outcome of a scaling pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingReport {
    pub method: ScalingMethod,
    pub scaled_columns: Vec<String>,
    /// Columns with zero range or deviation, mapped to 0.
    pub degenerate_columns: Vec<String>,
}

/// IQR fences computed for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFences {
    pub column: String,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
    pub outlier_count: usize,
}

impl ColumnFences {
    /// Check if a value lies outside the fences.
    pub fn is_outside(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Serializable snapshot of a session, for callers that report as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub rows: usize,
    pub columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub missing_cells: usize,
    pub history: Vec<StageRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_lowercased() {
        let file = UploadedFile::new("Sales.Q1.XLSX", Vec::new());
        assert_eq!(file.extension(), "xlsx");

        let file = UploadedFile::new("README", Vec::new());
        assert_eq!(file.extension(), "");
    }

    #[test]
    fn test_source_format_detect() {
        let csv = UploadedFile::new("a.csv", Vec::new());
        assert_eq!(SourceFormat::detect(&csv).unwrap(), SourceFormat::Csv);

        let xlsx = UploadedFile::new("b.xlsx", Vec::new());
        assert_eq!(
            SourceFormat::detect(&xlsx).unwrap(),
            SourceFormat::Spreadsheet
        );

        let txt = UploadedFile::new("notes.txt", Vec::new());
        let err = SourceFormat::detect(&txt).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
        assert!(err.to_string().contains("notes.txt"));
    }

    #[test]
    fn test_fences_are_inclusive() {
        let fences = ColumnFences {
            column: "a".to_string(),
            q1: 2.0,
            q3: 4.0,
            iqr: 2.0,
            lower: -1.0,
            upper: 7.0,
            outlier_count: 0,
        };
        assert!(!fences.is_outside(-1.0));
        assert!(!fences.is_outside(7.0));
        assert!(fences.is_outside(7.5));
        assert!(fences.is_outside(-3.0));
    }

    #[test]
    fn test_stage_record_serialization() {
        let record = StageRecord::new(StageKind::Deduplicate, "Removed 1 duplicate row", (4, 1), (3, 1));
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"deduplicate\""));
        assert!(json.contains("\"rows_after\":3"));
    }
}
