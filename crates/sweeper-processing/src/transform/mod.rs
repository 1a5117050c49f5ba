//! Structural transforms: column projection and numeric scaling.

mod projection;
mod scaling;

pub use projection::select_columns;
pub use scaling::scale_numeric;
