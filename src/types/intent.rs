//! Normalized order intents, as delivered by the ingestion layer.

use crate::types::{Amended, ExecutionReport, Order, Side};

/// One mutation request against a book.
///
/// Applying the same intents in the same order to an empty book always
/// rebuilds the same state, so a journal of accepted intents is enough to
/// replay a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Limit { side: Side, id: u64, price: u64, size: u64 },
    Market { side: Side, id: u64, size: u64 },
    Cancel { side: Side, id: u64 },
    Amend { side: Side, id: u64, new_size: Option<u64>, new_price: Option<u64> },
}

impl Intent {
    pub fn side(&self) -> Side {
        match *self {
            Intent::Limit { side, .. }
            | Intent::Market { side, .. }
            | Intent::Cancel { side, .. }
            | Intent::Amend { side, .. } => side,
        }
    }

    pub fn order_id(&self) -> u64 {
        match *self {
            Intent::Limit { id, .. }
            | Intent::Market { id, .. }
            | Intent::Cancel { id, .. }
            | Intent::Amend { id, .. } => id,
        }
    }
}

/// Result of an accepted intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Limit order now resting
    Rested(Order),
    /// Market order matched (fully, partially or not at all)
    Executed(ExecutionReport),
    /// Order removed from the book
    Cancelled(Order),
    /// Order changed in place or requeued
    Amended(Amended),
}
