//! Order records for the limit order book.
//!
//! ## Fixed-Point Representation
//!
//! Prices and sizes are stored as u64 scaled by 10^8 (see [`crate::types::price`]).
//!
//! ## Lifecycle
//!
//! An order is created by the caller-facing API, rests in a price level
//! while `remaining > 0`, and is dropped from every index on full fill or
//! cancel. Only `remaining` (and `quantity` on amend) ever change.

use std::fmt;

use crate::types::BookError;

// ============================================================================
// Side enum
// ============================================================================

/// Book side: Bid (buy interest) or Ask (sell interest)
///
/// Represented as u8 in encoded records:
/// - Bid = 0
/// - Ask = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Resting buy interest; best price is the highest
    #[default]
    Bid,
    /// Resting sell interest; best price is the lowest
    Ask,
}

impl Side {
    /// Convert to u8 for encoding
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Bid => 0,
            Side::Ask => 1,
        }
    }

    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Bid),
            1 => Some(Side::Ask),
            _ => None,
        }
    }

    /// Returns the opposite side
    ///
    /// A market order on one side crosses the opposite side of the book.
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// True if `candidate` is strictly better than `current` on this side.
    #[inline]
    pub fn is_more_extreme(self, candidate: u64, current: u64) -> bool {
        match self {
            Side::Bid => candidate > current,
            Side::Ask => candidate < current,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => f.write_str("bid"),
            Side::Ask => f.write_str("ask"),
        }
    }
}

// ============================================================================
// OrderKind enum
// ============================================================================

/// Order kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderKind {
    /// Rests at a price until filled or cancelled
    #[default]
    Limit,
    /// Executes immediately against the opposite side, never rests
    Market,
}

// ============================================================================
// Order struct
// ============================================================================

/// A single order intent or resting order.
///
/// Invariant: `price` is `Some` exactly when `kind == Limit`, and
/// `remaining > 0` while the order rests in a book.
///
/// ## Example
///
/// ```
/// use lob_core::types::{Order, Side};
///
/// let order = Order::limit(1, Side::Bid, 10_000, 100, 0).unwrap();
/// assert_eq!(order.price(), Some(10_000));
/// assert_eq!(order.remaining, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: u64,
    side: Side,
    kind: OrderKind,
    price: Option<u64>,
    sequence: u64,

    /// Size as last submitted or amended
    pub quantity: u64,

    /// Unfilled size; decremented by partial fills
    pub remaining: u64,
}

impl Order {
    /// Create a validated limit order
    ///
    /// # Errors
    ///
    /// `InvalidOrder` if `price` or `size` is zero.
    pub fn limit(id: u64, side: Side, price: u64, size: u64, sequence: u64) -> Result<Self, BookError> {
        if price == 0 {
            return Err(BookError::InvalidOrder(format!("limit order {id} has zero price")));
        }
        if size == 0 {
            return Err(BookError::InvalidOrder(format!("limit order {id} has zero size")));
        }
        Ok(Self {
            id,
            side,
            kind: OrderKind::Limit,
            price: Some(price),
            sequence,
            quantity: size,
            remaining: size,
        })
    }

    /// Create a validated market order
    ///
    /// # Errors
    ///
    /// `InvalidOrder` if `size` is zero.
    pub fn market(id: u64, side: Side, size: u64, sequence: u64) -> Result<Self, BookError> {
        Self::build(id, side, OrderKind::Market, None, size, sequence)
    }

    /// Create an order of any kind, checking kind-appropriate fields
    ///
    /// # Errors
    ///
    /// `InvalidOrder` when a market order carries a price, a limit order
    /// lacks one, or any size/price is zero.
    pub fn build(
        id: u64,
        side: Side,
        kind: OrderKind,
        price: Option<u64>,
        size: u64,
        sequence: u64,
    ) -> Result<Self, BookError> {
        match (kind, price) {
            (OrderKind::Limit, Some(price)) => Self::limit(id, side, price, size, sequence),
            (OrderKind::Limit, None) => Err(BookError::InvalidOrder(format!(
                "limit order {id} is missing a price"
            ))),
            (OrderKind::Market, Some(_)) => Err(BookError::InvalidOrder(format!(
                "market order {id} must not carry a price"
            ))),
            (OrderKind::Market, None) => {
                if size == 0 {
                    return Err(BookError::InvalidOrder(format!("market order {id} has zero size")));
                }
                Ok(Self {
                    id,
                    side,
                    kind: OrderKind::Market,
                    price: None,
                    sequence,
                    quantity: size,
                    remaining: size,
                })
            }
        }
    }

    /// Caller-assigned identifier, unique per side while resting
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn kind(&self) -> OrderKind {
        self.kind
    }

    /// Limit price, `None` for market orders
    #[inline]
    pub fn price(&self) -> Option<u64> {
        self.price
    }

    /// Arrival sequence assigned by the book
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Check if the order is fully filled
    pub fn is_filled(&self) -> bool {
        self.remaining == 0
    }

    /// Get the filled quantity
    pub fn filled_quantity(&self) -> u64 {
        self.quantity.saturating_sub(self.remaining)
    }

    /// Fill a portion of this order
    ///
    /// # Returns
    ///
    /// The actual quantity filled (may be less if order doesn't have enough remaining)
    pub fn fill(&mut self, fill_qty: u64) -> u64 {
        let actual_fill = fill_qty.min(self.remaining);
        self.remaining -= actual_fill;
        actual_fill
    }

    /// Copy of this order re-stamped for a requeue after amend.
    pub(crate) fn requeued(&self, price: u64, remaining: u64, sequence: u64) -> Self {
        Self {
            id: self.id,
            side: self.side,
            kind: OrderKind::Limit,
            price: Some(price),
            sequence,
            quantity: self.filled_quantity().saturating_add(remaining),
            remaining,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
