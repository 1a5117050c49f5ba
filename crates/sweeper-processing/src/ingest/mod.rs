//! Ingestion and merge.
//!
//! Decodes each uploaded file with the codec implied by its extension,
//! normalizes its headers and concatenates everything into one table in
//! upload order.

mod headers;

use crate::codecs::{CsvCodec, ExcelCodec, TableCodec};
use crate::config::SweeperConfig;
use crate::error::{Result, SweepError};
use crate::types::{SourceFormat, UploadedFile};
use polars::prelude::*;
use tracing::{debug, info};

/// Decode, normalize and merge a batch of uploads.
///
/// The batch is all-or-nothing: an unsupported extension or an undecodable
/// file aborts ingestion and no table is produced.
pub fn ingest(files: &[UploadedFile], config: &SweeperConfig) -> Result<DataFrame> {
    if files.is_empty() {
        return Err(SweepError::NoFiles);
    }

    // Resolve every format up front so a bad extension fails before decoding.
    let formats: Vec<SourceFormat> = files
        .iter()
        .map(SourceFormat::detect)
        .collect::<Result<_>>()?;

    let mut tables = Vec::with_capacity(files.len());
    for (file, format) in files.iter().zip(formats) {
        tables.push(read_upload(file, format, config)?);
    }

    let merged = merge_tables(tables)?;
    info!(
        "Merged {} file(s) into {} rows x {} columns",
        files.len(),
        merged.height(),
        merged.width()
    );
    Ok(merged)
}

/// Decode one upload and normalize its headers.
pub fn read_upload(
    file: &UploadedFile,
    format: SourceFormat,
    config: &SweeperConfig,
) -> Result<DataFrame> {
    let codec: Box<dyn TableCodec> = match format {
        SourceFormat::Csv => Box::new(CsvCodec::new(config.infer_schema_length)),
        SourceFormat::Spreadsheet => Box::new(ExcelCodec),
    };

    let decode_failed = |e: anyhow::Error| SweepError::DecodeFailed {
        file: file.name.clone(),
        reason: e.to_string(),
    };

    let df = codec.decode(&file.bytes).map_err(decode_failed)?;
    let (df, promoted) =
        headers::normalize_headers(df, config.coerce_promoted_headers).map_err(decode_failed)?;

    debug!(
        "Read '{}' as {}: {} rows x {} columns{}",
        file.name,
        codec.name(),
        df.height(),
        df.width(),
        if promoted { " (first row promoted to header)" } else { "" }
    );
    Ok(df)
}

/// Concatenate tables in order.
///
/// Columns missing from a table are filled with nulls, and numeric columns of
/// different widths are widened to a common type. Schemas are not otherwise
/// reconciled.
pub fn merge_tables(tables: Vec<DataFrame>) -> Result<DataFrame> {
    let mut tables = tables;
    match tables.len() {
        0 => Err(SweepError::NoFiles),
        1 => Ok(tables.remove(0)),
        _ => {
            let frames: Vec<LazyFrame> = tables.into_iter().map(|df| df.lazy()).collect();
            let merged = concat_lf_diagonal(
                frames,
                UnionArgs {
                    rechunk: true,
                    to_supertypes: true,
                    ..Default::default()
                },
            )?
            .collect()?;
            Ok(merged)
        }
    }
}
