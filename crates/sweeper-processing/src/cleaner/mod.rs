//! Data cleaning module.
//!
//! Removes rows that exactly repeat an earlier row.

use crate::error::Result;
use polars::prelude::*;
use tracing::debug;

/// Row-level cleaning operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Remove exact duplicate rows, comparing every column.
    ///
    /// Keeps the first occurrence and the original row order; nulls compare
    /// equal to nulls. Returns the cleaned table and the number of rows removed.
    pub fn deduplicate(df: &DataFrame) -> Result<(DataFrame, usize)> {
        if df.width() == 0 {
            return Ok((df.clone(), 0));
        }

        let before = df.height();
        let deduped = df
            .clone()
            .lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()?;
        let removed = before - deduped.height();

        if removed > 0 {
            let pct = (removed as f64 / before as f64) * 100.0;
            debug!("Removed {} duplicate rows ({:.1}%)", removed, pct);
        } else {
            debug!("No duplicate rows found");
        }

        Ok((deduped, removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deduplicate_single_column() {
        let df = df!["a" => [1i64, 2, 2, 3]].unwrap();
        let (deduped, removed) = DataCleaner::deduplicate(&df).unwrap();

        assert_eq!(removed, 1);
        assert!(deduped.equals(&df!["a" => [1i64, 2, 3]].unwrap()));
    }

    #[test]
    fn test_deduplicate_compares_all_columns() {
        let df = df![
            "a" => [1i64, 1, 1],
            "b" => ["x", "y", "x"],
        ]
        .unwrap();

        let (deduped, removed) = DataCleaner::deduplicate(&df).unwrap();
        assert_eq!(removed, 1);
        assert!(deduped.equals(
            &df![
                "a" => [1i64, 1],
                "b" => ["x", "y"],
            ]
            .unwrap()
        ));
    }

    #[test]
    fn test_deduplicate_keeps_first_occurrence_order() {
        let df = df!["a" => [3i64, 1, 3, 2, 1]].unwrap();
        let (deduped, _) = DataCleaner::deduplicate(&df).unwrap();
        assert!(deduped.equals(&df!["a" => [3i64, 1, 2]].unwrap()));
    }

    #[test]
    fn test_deduplicate_nulls_are_equal() {
        let df = df![
            "a" => [Some(1i64), None, None],
            "b" => [Some("x"), None, None],
        ]
        .unwrap();

        let (deduped, removed) = DataCleaner::deduplicate(&df).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(deduped.height(), 2);
    }

    #[test]
    fn test_deduplicate_is_idempotent() {
        let df = df![
            "a" => [1i64, 2, 2, 3, 1],
            "b" => [0.5, 1.5, 1.5, 2.5, 0.5],
        ]
        .unwrap();

        let (once, _) = DataCleaner::deduplicate(&df).unwrap();
        let (twice, removed_again) = DataCleaner::deduplicate(&once).unwrap();

        assert_eq!(removed_again, 0);
        assert!(once.equals(&twice));
    }

    #[test]
    fn test_deduplicate_empty_dataframe() {
        let df = DataFrame::empty();
        let (deduped, removed) = DataCleaner::deduplicate(&df).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(deduped.height(), 0);
    }
}
