//! Spreadsheet codec.
//!
//! Decoding goes through `calamine` (xlsx, xlsm, xls, ods; first worksheet,
//! first row is the header). Encoding writes a single-sheet xlsx workbook with
//! `rust_xlsxwriter`.
//!
//! Worksheet cells have no NaN or infinity, so non-finite floats are written
//! as empty cells (with a warning) and read back as nulls.

use super::TableCodec;
use crate::utils::{dedupe_headers, is_numeric_dtype, series_to_f64};
use anyhow::{Result, anyhow, bail};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use polars::prelude::*;
use rust_xlsxwriter::Workbook;
use std::io::Cursor;
use tracing::{debug, warn};

/// Excel-compatible workbook codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelCodec;

impl TableCodec for ExcelCodec {
    fn name(&self) -> &'static str {
        "Excel"
    }

    fn decode(&self, bytes: &[u8]) -> Result<DataFrame> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| anyhow!("workbook contains no worksheets"))??;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Ok(DataFrame::empty());
        };
        let headers = dedupe_headers(
            header_row
                .iter()
                .enumerate()
                .map(|(idx, cell)| match cell {
                    Data::Empty => format!("column_{}", idx + 1),
                    other => other.to_string(),
                })
                .collect(),
        );
        let body: Vec<&[Data]> = rows.collect();
        debug!(
            "Decoded worksheet with {} columns and {} data rows",
            headers.len(),
            body.len()
        );

        let columns: Vec<Column> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells: Vec<&Data> = body
                    .iter()
                    .map(|row| row.get(idx).unwrap_or(&Data::Empty))
                    .collect();
                Column::from(cells_to_series(name, &cells))
            })
            .collect();

        Ok(DataFrame::new(columns)?)
    }

    fn encode(&self, df: &mut DataFrame) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        for (col_idx, column) in df.get_columns().iter().enumerate() {
            let col_num = u16::try_from(col_idx)?;
            worksheet.write_string(0, col_num, column.name().as_str())?;

            let series = column.as_materialized_series();
            if series.dtype().is_nested() {
                bail!(
                    "column '{}' has nested type {} with no cell representation",
                    series.name(),
                    series.dtype()
                );
            }
            if is_numeric_dtype(series.dtype()) {
                let mut non_finite = 0;
                for (row_idx, value) in series_to_f64(series)?.into_iter().enumerate() {
                    match value {
                        Some(value) if value.is_finite() => {
                            worksheet.write_number(u32::try_from(row_idx + 1)?, col_num, value)?;
                        }
                        Some(_) => non_finite += 1,
                        None => {}
                    }
                }
                if non_finite > 0 {
                    warn!(
                        "Column '{}': {} non-finite value(s) written as empty cells",
                        series.name(),
                        non_finite
                    );
                }
            } else if series.dtype() == &DataType::Boolean {
                for (row_idx, value) in series.bool()?.into_iter().enumerate() {
                    if let Some(value) = value {
                        worksheet.write_boolean(u32::try_from(row_idx + 1)?, col_num, value)?;
                    }
                }
            } else {
                let text = series.cast(&DataType::String)?;
                for (row_idx, value) in text.str()?.into_iter().enumerate() {
                    if let Some(value) = value {
                        worksheet.write_string(u32::try_from(row_idx + 1)?, col_num, value)?;
                    }
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

/// Build a typed Series from one worksheet column.
///
/// All-integral numbers become Int64, other numbers Float64, all-boolean cells
/// Boolean; anything mixed falls back to String. Empty and error cells are null.
fn cells_to_series(name: &str, cells: &[&Data]) -> Series {
    let present: Vec<&Data> = cells
        .iter()
        .copied()
        .filter(|cell| !matches!(cell, Data::Empty | Data::Error(_)))
        .collect();

    let all_numeric = !present.is_empty()
        && present
            .iter()
            .all(|cell| matches!(cell, Data::Int(_) | Data::Float(_)));
    let all_bool = !present.is_empty() && present.iter().all(|cell| matches!(cell, Data::Bool(_)));

    if all_numeric && present.iter().all(|cell| cell_as_i64(cell).is_some()) {
        let ints: Vec<Option<i64>> = cells.iter().map(|cell| cell_as_i64(cell)).collect();
        Series::new(name.into(), ints)
    } else if all_numeric {
        let floats: Vec<Option<f64>> = cells.iter().map(|cell| cell_as_f64(cell)).collect();
        Series::new(name.into(), floats)
    } else if all_bool {
        let bools: Vec<Option<bool>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        Series::new(name.into(), bools)
    } else {
        let text: Vec<Option<String>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Empty | Data::Error(_) => None,
                Data::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect();
        Series::new(name.into(), text)
    }
}

/// Integer cells as-is; integral floats only when they fit an i64.
fn cell_as_i64(cell: &Data) -> Option<i64> {
    match cell {
        Data::Int(i) => Some(*i),
        Data::Float(f) if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
            Some(*f as i64)
        }
        _ => None,
    }
}

fn cell_as_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        _ => None,
    }
}
