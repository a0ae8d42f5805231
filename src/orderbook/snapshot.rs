//! Read-only views of book state for market-data consumers.

use serde::{Deserialize, Serialize};

/// Aggregate view of one price level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelView {
    pub price: u64,
    pub size: u64,
    pub order_count: usize,
}

/// Top-N levels per side, most extreme price first.
///
/// Snapshots are plain copies: they can be handed to other threads while
/// the book keeps mutating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// Arrival sequence of the last intent applied before the snapshot
    pub sequence: u64,
    pub bids: Vec<LevelView>,
    pub asks: Vec<LevelView>,
}

impl BookSnapshot {
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.first().map(|l| l.price)
    }

    pub fn best_ask(&self) -> Option<u64> {
        self.asks.first().map(|l| l.price)
    }

    /// Best ask minus best bid, if both exist and the book is not crossed
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }
}
