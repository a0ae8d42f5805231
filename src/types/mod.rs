//! Core data types for the order book
//!
//! ## Types
//!
//! - [`Order`]: an order intent or resting order
//! - [`Side`]: Bid or Ask
//! - [`OrderKind`]: Limit or Market
//! - [`Fill`] / [`ExecutionReport`]: matching results
//! - [`Intent`] / [`Outcome`]: ingestion requests and their results
//! - [`BookError`]: rejected operations
//!
//! ## Fixed-Point Arithmetic
//!
//! All prices and sizes are stored as `u64` scaled by 10^8.
//! Example: 100.01 is stored as 10_001_000_000u64

mod error;
mod execution;
mod intent;
mod order;
pub mod price;
pub mod record;

pub use error::BookError;
pub use execution::{Amended, Consumed, ExecutionReport, Fill, FillStatus};
pub use intent::{Intent, Outcome};
pub use order::{Order, OrderKind, Side};
pub use record::{RestingRecord, StateHasher};
