//! Equity Analytics API
//!
//! Configuration types consumed by the analytics implementations.

pub mod config;

pub use config::*;
