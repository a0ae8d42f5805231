//! Execution model around the book.
//!
//! ## Single Writer
//!
//! Price-time priority is only meaningful if intents are applied in true
//! arrival order. Each instrument therefore gets one [`BookWorker`]
//! thread that drains a FIFO command queue; producers submit through
//! cloneable [`BookHandle`]s and observers read published snapshots.
//!
//! ## Ingestion
//!
//! [`Ingestor`] maps venue symbols to instruments through an injected
//! [`SymbolMap`] and routes each intent to its instrument's worker.
//!
//! ## Example
//!
//! ```
//! use lob_core::config::EngineConfig;
//! use lob_core::engine::BookWorker;
//! use lob_core::types::{Intent, Side};
//!
//! let worker = BookWorker::spawn("BTC-USD", &EngineConfig::default()).unwrap();
//! let handle = worker.handle();
//!
//! handle.submit(Intent::Limit { side: Side::Bid, id: 1, price: 10_000, size: 5 }).unwrap();
//! assert_eq!(handle.best_bid(), Some(10_000));
//!
//! let book = worker.shutdown().unwrap();
//! assert_eq!(book.order_count(), 1);
//! ```

mod error;
pub mod ingest;
pub mod worker;

pub use error::IngestError;
pub use ingest::{Ingestor, NormalizedIntent, SymbolMap};
pub use worker::{BookHandle, BookWorker};
