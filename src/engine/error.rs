use thiserror::Error;

use crate::config::ConfigError;
use crate::types::BookError;

/// Errors raised between the ingestion layer and the book workers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// The venue/symbol pair has no instrument mapping
    #[error("no instrument mapped for {venue}:{symbol}")]
    UnknownSymbol { venue: String, symbol: String },

    /// The worker thread could not be started
    #[error("failed to spawn book worker for {instrument}: {reason}")]
    Spawn { instrument: String, reason: String },

    /// The instrument's worker has shut down
    #[error("book worker for {0} is closed")]
    WorkerClosed(String),

    /// The instrument's worker thread panicked
    #[error("book worker for {0} panicked")]
    WorkerPanicked(String),

    /// The book rejected the intent
    #[error(transparent)]
    Book(#[from] BookError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
