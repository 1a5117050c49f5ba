//! Pipeline module.
//!
//! This module provides the session state object and outlier detection.

pub mod outliers;
mod state;

pub use outliers::{OutlierDetector, OutlierReport};
pub use state::PipelineState;
