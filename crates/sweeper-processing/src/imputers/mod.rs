//! Imputation module for handling missing values.
//!
//! Only mean imputation of numeric columns is provided; text columns are
//! never filled.

mod statistical;

pub use statistical::StatisticalImputer;
