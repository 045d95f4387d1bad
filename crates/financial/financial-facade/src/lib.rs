//! Equity Analytics Facade
//!
//! Unified re-exports for the financial module.
//!
//! This facade provides access to all equity analytics components:
//! - `returns` - Daily and month-end return series, date alignment
//! - `risk` - CAPM beta and expected return
//! - `bands` - Bollinger bands
//! - `signals` - SMA/EMA crossover signals
//! - `simulation` - GBM calibration, path simulation and terminal distribution
//! - `calendar` - US federal and NYSE calendars, business days

// Re-export everything from SPI (traits, errors, types)
pub use financial_spi::*;

// Re-export everything from API (configs)
pub use financial_api::*;

// Re-export everything from Core (implementations)
pub use financial_core::*;
