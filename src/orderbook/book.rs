//! Limit order book: a bid side and an ask side for one instrument.
//!
//! ## Routing
//!
//! - Limit orders rest on their own side
//! - A market buy (`Side::Bid`) crosses the ask side; a market sell
//!   (`Side::Ask`) crosses the bid side
//! - Cancel and amend go to the named side; ids are unique per side only
//!
//! Every accepted intent takes the next arrival sequence number from a
//! single counter. Rejected intents take none and change nothing.
//!
//! A crossed book (best bid >= best ask) is reported through
//! [`LimitOrderBook::is_crossed`] and a warning, never prevented.
//!
//! ## Example
//!
//! ```
//! use lob_core::orderbook::LimitOrderBook;
//! use lob_core::types::{FillStatus, Side};
//!
//! let mut book = LimitOrderBook::new();
//! book.submit_limit(Side::Ask, 1, 10_001, 100).unwrap();
//! book.submit_limit(Side::Bid, 1, 9_999, 100).unwrap();
//! assert_eq!(book.spread(), Some(2));
//!
//! let report = book.submit_market(Side::Bid, 2, 150).unwrap();
//! assert_eq!(report.status, FillStatus::PartiallyFilled);
//! assert_eq!(report.unfilled, 50);
//! assert_eq!(book.best_ask(), None);
//! ```

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::orderbook::snapshot::BookSnapshot;
use crate::orderbook::BookSide;
use crate::types::record::root_hex;
use crate::types::{
    Amended, BookError, ExecutionReport, FillStatus, Intent, Order, Outcome, Side, StateHasher,
};

/// Single-instrument limit order book
#[derive(Debug)]
pub struct LimitOrderBook {
    bids: BookSide,
    asks: BookSide,

    /// Sequence of the last accepted intent
    sequence: u64,
}

impl Default for LimitOrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl LimitOrderBook {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a book with `order_capacity` slots pre-allocated per side
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self {
            bids: BookSide::with_capacity(Side::Bid, order_capacity),
            asks: BookSide::with_capacity(Side::Ask, order_capacity),
            sequence: 0,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_capacity(config.order_capacity)
    }

    // ========================================================================
    // Ingestion API
    // ========================================================================

    /// Rest a limit order on `side`.
    ///
    /// # Errors
    ///
    /// - `DuplicateOrder` if `id` already rests on `side`
    /// - `InvalidOrder` if `price` or `size` is zero, or the level's
    ///   aggregate size would overflow
    pub fn submit_limit(&mut self, side: Side, id: u64, price: u64, size: u64) -> Result<Order, BookError> {
        let order = Order::limit(id, side, price, size, self.sequence + 1)?;
        let book_side = self.side_mut(side);
        if book_side.contains(id) {
            return Err(BookError::DuplicateOrder { side, id });
        }
        book_side.insert_limit(order.clone())?;
        self.sequence += 1;

        if self.is_crossed() {
            warn!(
                best_bid = ?self.best_bid(),
                best_ask = ?self.best_ask(),
                "book is crossed"
            );
        }
        Ok(order)
    }

    /// Execute a market order against the opposite side.
    ///
    /// Running out of liquidity is not an error: the report's `status` and
    /// `unfilled` tell the caller how much was left.
    ///
    /// # Errors
    ///
    /// `InvalidOrder` if `size` is zero.
    pub fn submit_market(&mut self, side: Side, id: u64, size: u64) -> Result<ExecutionReport, BookError> {
        let order = Order::market(id, side, size, self.sequence + 1)?;
        self.sequence += 1;

        let consumed = self.side_mut(side.opposite()).consume(order.remaining, id);
        let report = ExecutionReport::new(id, side, size, consumed);

        match report.status {
            FillStatus::Filled => {
                debug!(%side, id, matched = report.matched, "market order filled");
            }
            FillStatus::PartiallyFilled | FillStatus::NoLiquidity => {
                warn!(
                    %side,
                    id,
                    matched = report.matched,
                    unfilled = report.unfilled,
                    "market order not fully filled, {} side exhausted",
                    side.opposite()
                );
            }
        }
        Ok(report)
    }

    /// Cancel a resting order.
    ///
    /// # Errors
    ///
    /// `UnknownOrder` if `id` is not resting on `side`.
    pub fn cancel(&mut self, side: Side, id: u64) -> Result<Order, BookError> {
        let order = self.side_mut(side).cancel(id)?;
        self.sequence += 1;
        Ok(order)
    }

    /// Amend size and/or price of a resting order.
    ///
    /// A size reduction at the same price keeps time priority; a price
    /// change or size increase sends the order to the back of its level.
    ///
    /// # Errors
    ///
    /// - `InvalidOrder` if neither field is given or either is zero
    /// - `UnknownOrder` if `id` is not resting on `side`
    pub fn amend(
        &mut self,
        side: Side,
        id: u64,
        new_size: Option<u64>,
        new_price: Option<u64>,
    ) -> Result<Amended, BookError> {
        let sequence = self.sequence + 1;
        let amended = self.side_mut(side).amend(id, new_size, new_price, sequence)?;
        self.sequence = sequence;

        if amended.requeued && self.is_crossed() {
            warn!(
                best_bid = ?self.best_bid(),
                best_ask = ?self.best_ask(),
                "book is crossed"
            );
        }
        Ok(amended)
    }

    /// Dispatch one intent
    pub fn apply(&mut self, intent: Intent) -> Result<Outcome, BookError> {
        match intent {
            Intent::Limit { side, id, price, size } => self.submit_limit(side, id, price, size).map(Outcome::Rested),
            Intent::Market { side, id, size } => self.submit_market(side, id, size).map(Outcome::Executed),
            Intent::Cancel { side, id } => self.cancel(side, id).map(Outcome::Cancelled),
            Intent::Amend { side, id, new_size, new_price } => {
                self.amend(side, id, new_size, new_price).map(Outcome::Amended)
            }
        }
    }

    // ========================================================================
    // Observation API
    // ========================================================================

    /// Highest bid, `None` when there is no bid liquidity
    #[inline]
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.best()
    }

    /// Lowest ask, `None` when there is no ask liquidity
    #[inline]
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.best()
    }

    /// Get the spread (best_ask - best_bid)
    ///
    /// `None` if either side is empty or the book is crossed
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }

    /// True when best bid >= best ask
    pub fn is_crossed(&self) -> bool {
        matches!((self.best_bid(), self.best_ask()), (Some(bid), Some(ask)) if bid >= ask)
    }

    /// Aggregate size resting at `price` on `side`, zero if none
    pub fn depth_at(&self, side: Side, price: u64) -> u64 {
        self.side(side).depth_at(price)
    }

    /// Resting order on `side` by id
    pub fn order(&self, side: Side, id: u64) -> Option<&Order> {
        self.side(side).get(id)
    }

    /// Top `levels` price levels per side, most extreme first
    pub fn snapshot(&self, levels: usize) -> BookSnapshot {
        BookSnapshot {
            sequence: self.sequence,
            bids: self.bids.levels(levels),
            asks: self.asks.levels(levels),
        }
    }

    /// Read access to one side
    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Sequence number of the last accepted intent
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Total resting orders across both sides
    pub fn order_count(&self) -> usize {
        self.bids.order_count() + self.asks.order_count()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// SHA-256 over every resting order in book order.
    ///
    /// Books rebuilt from the same intents yield the same root.
    pub fn state_root(&self) -> Result<[u8; 32], BookError> {
        let mut hasher = StateHasher::new();
        self.bids.hash_into(&mut hasher)?;
        self.asks.hash_into(&mut hasher)?;
        Ok(hasher.finalize())
    }

    pub fn state_root_hex(&self) -> Result<String, BookError> {
        Ok(root_hex(&self.state_root()?))
    }

    /// Check the structural invariants of both sides
    pub fn check_invariants(&self) -> Result<(), String> {
        self.bids.check_invariants()?;
        self.asks.check_invariants()
    }

    fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
