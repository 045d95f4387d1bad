//! Equity Analytics Service Provider Interface
//!
//! Defines the series models, error types and trait contracts shared by
//! the return builder, CAPM risk model, technical indicators and the
//! GBM Monte Carlo simulator.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::*;
pub use error::*;
pub use model::*;
