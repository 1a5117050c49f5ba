//! Export of the current table as a downloadable artifact.
//!
//! Every format is encoded into memory; writing to disk is left to the caller
//! through [`ExportArtifact::write_to_dir`].

use crate::codecs::{CsvCodec, ExcelCodec, JsonLinesCodec, ParquetCodec, TableCodec};
use crate::error::{Result, SweepError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Export targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Excel,
    /// Newline-delimited JSON records.
    Json,
    Parquet,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
            ExportFormat::Json => "json",
            ExportFormat::Parquet => "parquet",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Json => "application/json",
            ExportFormat::Parquet => "application/octet-stream",
        }
    }

    /// Suggested download name, e.g. `processed_data.xlsx`.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension())
    }

    fn codec(&self) -> Box<dyn TableCodec> {
        match self {
            ExportFormat::Csv => Box::new(CsvCodec::default()),
            ExportFormat::Excel => Box::new(ExcelCodec),
            ExportFormat::Json => Box::new(JsonLinesCodec),
            ExportFormat::Parquet => Box::new(ParquetCodec),
        }
    }
}

/// An encoded table ready to be offered for download.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
}

impl ExportArtifact {
    /// Write the artifact into `dir` under its suggested name.
    ///
    /// The directory is created if needed. Returns the written path.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        info!("Wrote {} bytes to {}", self.bytes.len(), path.display());
        Ok(path)
    }
}

/// Encode `df` as `format`.
///
/// The table is cloned before encoding since writers may rechunk it. Codec
/// failures are reported as `ExportError`.
pub fn export_table(df: &DataFrame, format: ExportFormat, stem: &str) -> Result<ExportArtifact> {
    let codec = format.codec();
    let mut df = df.clone();

    let bytes = codec
        .encode(&mut df)
        .map_err(|e| SweepError::ExportError {
            format: codec.name().to_string(),
            reason: e.to_string(),
        })?;

    debug!(
        "Encoded {} rows as {} ({} bytes)",
        df.height(),
        codec.name(),
        bytes.len()
    );

    Ok(ExportArtifact {
        bytes,
        mime_type: format.mime_type().to_string(),
        file_name: format.file_name(stem),
    })
}
