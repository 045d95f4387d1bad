//! Error types for equity analytics.

mod financial_error;

pub use financial_error::*;
