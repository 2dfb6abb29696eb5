pub mod error;
pub mod metrics;
pub mod projection;
pub mod scenarios;
pub mod types;

#[cfg(feature = "ingest")]
pub mod ingest;

pub use error::BimFinanceError;
pub use types::*;

/// Standard result type for all viability-engine operations
pub type BimFinanceResult<T> = Result<T, BimFinanceError>;
