//! Trait contracts for equity analytics.

mod band_indicator;
mod path_simulator;
mod risk_model;
mod signal_generator;

pub use band_indicator::*;
pub use path_simulator::*;
pub use risk_model::*;
pub use signal_generator::*;
