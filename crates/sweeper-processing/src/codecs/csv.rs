//! CSV codec backed by the polars reader and writer.

use super::TableCodec;
use anyhow::Result;
use polars::prelude::*;
use std::io::Cursor;
use tracing::debug;

/// Cell tokens read as missing values, matching the usual spreadsheet and
/// dataframe spellings of "no value".
const NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Comma-separated values with a header row.
#[derive(Debug, Clone)]
pub struct CsvCodec {
    infer_schema_length: Option<usize>,
}

impl CsvCodec {
    /// Create a codec that infers column types from the first `rows` rows
    /// (`None` scans the whole file).
    pub fn new(infer_schema_length: Option<usize>) -> Self {
        Self {
            infer_schema_length,
        }
    }

    fn read(&self, bytes: &[u8], infer_schema_length: Option<usize>) -> PolarsResult<DataFrame> {
        let null_values = NullValues::AllColumns(NULL_TOKENS.iter().map(|t| (*t).into()).collect());
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(infer_schema_length)
            .with_parse_options(CsvParseOptions::default().with_null_values(Some(null_values)))
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()
    }
}

impl Default for CsvCodec {
    fn default() -> Self {
        Self::new(Some(100))
    }
}

impl TableCodec for CsvCodec {
    fn name(&self) -> &'static str {
        "CSV"
    }

    /// Decode with types inferred from the leading rows; when a later row
    /// does not fit them, decode again inferring from the whole file.
    fn decode(&self, bytes: &[u8]) -> Result<DataFrame> {
        match self.read(bytes, self.infer_schema_length) {
            Ok(df) => Ok(df),
            Err(e) if self.infer_schema_length.is_some() => {
                debug!("CSV decode with partial inference failed: {}", e);
                Ok(self.read(bytes, None)?)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn encode(&self, df: &mut DataFrame) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        CsvWriter::new(&mut buffer)
            .include_header(true)
            .finish(df)?;
        Ok(buffer)
    }
}
