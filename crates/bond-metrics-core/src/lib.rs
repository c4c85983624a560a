pub mod error;
pub mod types;

pub mod config;
pub mod time_value;

pub mod cash_flows;
pub mod metrics;
pub mod simulation;

pub use error::BondMetricsError;
pub use types::*;

/// Standard result type for all bond-metrics operations
pub type BondMetricsResult<T> = Result<T, BondMetricsError>;
