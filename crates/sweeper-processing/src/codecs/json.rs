//! Newline-delimited JSON codec (one record object per row).

use super::TableCodec;
use anyhow::Result;
use polars::prelude::*;
use std::io::Cursor;

/// JSON lines: `{"col": value, ...}` per row, no enclosing array.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLinesCodec;

impl TableCodec for JsonLinesCodec {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn decode(&self, bytes: &[u8]) -> Result<DataFrame> {
        let df = JsonLineReader::new(Cursor::new(bytes.to_vec())).finish()?;
        Ok(df)
    }

    fn encode(&self, df: &mut DataFrame) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer)
            .with_json_format(JsonFormat::JsonLines)
            .finish(df)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_one_record_per_line() {
        let mut df = df![
            "a" => [Some(1i64), None],
            "b" => ["x", "y"],
        ]
        .unwrap();

        let bytes = JsonLinesCodec.encode(&mut df).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let records: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["a"], serde_json::json!(1));
        assert_eq!(records[0]["b"], serde_json::json!("x"));
        assert!(records[1]["a"].is_null());
    }

    #[test]
    fn test_decode_reads_records() {
        let text = b"{\"a\":1,\"b\":\"x\"}\n{\"a\":2,\"b\":\"y\"}\n";
        let df = JsonLinesCodec.decode(text).unwrap();
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.column("a").unwrap().dtype(), &DataType::Int64);
    }
}
