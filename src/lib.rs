//! # lob-core
//!
//! In-memory limit order book for a single instrument with deterministic
//! price-time priority.
//!
//! ## Architecture
//!
//! - **Types**: Order records, intents, fills and errors
//! - **OrderBook**: price level queues, book sides and the two-sided book
//! - **Engine**: single-writer workers and the feed ingestion adapter
//!
//! ## Design Principles
//!
//! 1. **Determinism**: the same intents in the same order rebuild the same book
//! 2. **No Floating Point**: prices and sizes are fixed-point u64 (10^8 scaling)
//! 3. **Arena Storage**: slab-allocated nodes give O(1) cancel by id
//! 4. **Synchronous Execution**: no operation blocks or suspends
//! 5. **Fail Clean**: a rejected intent leaves the book untouched

// ============================================================================
// Module declarations
// ============================================================================

/// Engine configuration
pub mod config;

/// Core data types: Order, Intent, Fill, BookError
pub mod types;

/// Order book: levels, sides and the limit order book
pub mod orderbook;

/// Single-writer workers and ingestion
pub mod engine;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::EngineConfig;
pub use engine::{BookHandle, BookWorker, IngestError, Ingestor, NormalizedIntent, SymbolMap};
pub use orderbook::{BookSide, BookSnapshot, LevelView, LimitOrderBook, PriceLevel};
pub use types::{
    Amended, BookError, ExecutionReport, Fill, FillStatus, Intent, Order, OrderKind, Outcome, Side,
};
