//! Error taxonomy for book operations.
//!
//! Identity and validation failures are rejected before any state is
//! touched, so a failed call leaves the book exactly as it was. Running out
//! of liquidity is not an error: see [`crate::types::FillStatus::NoLiquidity`].

use thiserror::Error;

use crate::types::Side;

/// Errors returned by book operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// An order with this id is already resting on the side
    #[error("order {id} already rests on the {side} side")]
    DuplicateOrder { side: Side, id: u64 },

    /// No resting order with this id on the side
    #[error("order {id} is not resting on the {side} side")]
    UnknownOrder { side: Side, id: u64 },

    /// Malformed intent: zero size, market order with a price, missing field
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// Encoding resting state for the state root failed
    #[error("state encoding failed: {0}")]
    Encoding(String),
}
