//! Equity Analytics Core
//!
//! Implementations for return building, CAPM risk, technical indicators,
//! GBM Monte Carlo simulation and trading calendars.

pub mod bands;
pub mod calendar;
pub mod returns;
pub mod risk;
pub mod signals;
pub mod simulation;
pub mod stats;

pub use bands::*;
pub use calendar::*;
pub use returns::*;
pub use risk::*;
pub use signals::*;
pub use simulation::*;
