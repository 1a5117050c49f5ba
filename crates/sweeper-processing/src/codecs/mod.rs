//! Table codecs.
//!
//! This module defines the [`TableCodec`] trait, the seam between the pipeline
//! and the byte-level file formats. Every codec works on in-memory buffers;
//! nothing here touches the filesystem.
//!
//! # Implementing a New Codec
//!
//! 1. Create a new file in `src/codecs/` (e.g., `arrow_ipc.rs`)
//! 2. Implement [`TableCodec`] for your codec struct
//! 3. Export it here and wire it into [`crate::export::ExportFormat`] or
//!    [`crate::types::SourceFormat`]

mod csv;
mod excel;
mod json;
mod parquet;

pub use self::csv::CsvCodec;
pub use self::excel::ExcelCodec;
pub use self::json::JsonLinesCodec;
pub use self::parquet::ParquetCodec;

use anyhow::Result;
use polars::prelude::DataFrame;

/// Encoder/decoder pair between a [`DataFrame`] and a byte representation.
///
/// Implementations return `anyhow::Result`; the ingestion and export stages
/// wrap failures into the matching [`crate::SweepError`] variant.
pub trait TableCodec: Send + Sync {
    /// Display name of the format (used in error messages).
    fn name(&self) -> &'static str;

    /// Decode a complete file into a table.
    fn decode(&self, bytes: &[u8]) -> Result<DataFrame>;

    /// Encode a table into a complete file.
    ///
    /// Takes `&mut` because polars writers may rechunk the frame in place.
    fn encode(&self, df: &mut DataFrame) -> Result<Vec<u8>>;
}
