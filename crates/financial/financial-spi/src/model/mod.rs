//! Data models for equity analytics.

mod bands;
mod price_series;
mod return_series;
mod risk;
mod signal;
mod simulation;

pub use bands::*;
pub use price_series::*;
pub use return_series::*;
pub use risk::*;
pub use signal::*;
pub use simulation::*;
