//! Parquet codec.
//!
//! The writer targets an in-memory buffer, so exporting never needs a
//! temporary file.

use super::TableCodec;
use anyhow::Result;
use polars::prelude::*;
use std::io::Cursor;

/// Apache Parquet columnar binary format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParquetCodec;

impl TableCodec for ParquetCodec {
    fn name(&self) -> &'static str {
        "Parquet"
    }

    fn decode(&self, bytes: &[u8]) -> Result<DataFrame> {
        let df = ParquetReader::new(Cursor::new(bytes.to_vec())).finish()?;
        Ok(df)
    }

    fn encode(&self, df: &mut DataFrame) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        ParquetWriter::new(&mut buffer).finish(df)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parquet_buffer_keeps_schema() {
        let mut df = df![
            "id" => [1i64, 2, 3],
            "score" => [Some(0.5), None, Some(1.5)],
            "name" => ["a", "b", "c"],
        ]
        .unwrap();

        let bytes = ParquetCodec.encode(&mut df).unwrap();
        assert_eq!(&bytes[..4], b"PAR1");

        let decoded = ParquetCodec.decode(&bytes).unwrap();
        assert!(decoded.equals_missing(&df));
    }
}
