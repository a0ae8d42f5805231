//! Results of matching and amend operations.
//!
//! ## Terminology
//!
//! - **Maker**: the resting order that was already in the book
//! - **Taker**: the incoming market order that triggered the match
//!
//! Every fill executes at the maker's price.

use crate::types::{Order, Side};

/// A single match between a resting maker and an incoming taker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    /// Resting order id
    pub maker_order_id: u64,

    /// Incoming order id
    pub taker_order_id: u64,

    /// Execution price (the maker's level price)
    pub price: u64,

    /// Executed quantity
    pub quantity: u64,

    /// Maker's remaining size after this fill; zero means fully filled
    pub maker_remaining: u64,
}

impl Fill {
    /// True when this fill removed the maker from the book
    #[inline]
    pub fn completes_maker(&self) -> bool {
        self.maker_remaining == 0
    }

    /// Notional value (price * quantity), scaled by 10^16
    pub fn notional_raw(&self) -> u128 {
        (self.price as u128) * (self.quantity as u128)
    }
}

/// How much of a market order executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStatus {
    /// The whole requested size matched
    Filled,
    /// Some size matched before the crossed side ran dry
    PartiallyFilled,
    /// The crossed side had no resting orders; nothing matched
    NoLiquidity,
}

/// Outcome of consuming liquidity from one side of the book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consumed {
    /// Quantity that could not be matched
    pub unfilled: u64,

    /// Total quantity matched
    pub matched: u64,

    /// Fills in execution order
    pub fills: Vec<Fill>,

    /// Maker ids removed from the book because they were fully filled
    pub completed: Vec<u64>,
}

/// Report returned to the submitter of a market order.
///
/// An order that was not completely filled is a reportable outcome;
/// callers inspect [`ExecutionReport::status`] rather than a log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub order_id: u64,
    pub side: Side,
    pub requested: u64,
    pub matched: u64,
    pub unfilled: u64,
    pub fills: Vec<Fill>,
    pub completed: Vec<u64>,
    pub status: FillStatus,
}

impl ExecutionReport {
    pub(crate) fn new(order_id: u64, side: Side, requested: u64, consumed: Consumed) -> Self {
        let status = if consumed.unfilled == 0 {
            FillStatus::Filled
        } else if consumed.matched == 0 {
            FillStatus::NoLiquidity
        } else {
            FillStatus::PartiallyFilled
        };

        Self {
            order_id,
            side,
            requested,
            matched: consumed.matched,
            unfilled: consumed.unfilled,
            fills: consumed.fills,
            completed: consumed.completed,
            status,
        }
    }

    /// True if the whole requested size executed
    pub fn is_filled(&self) -> bool {
        self.status == FillStatus::Filled
    }

    /// Volume-weighted average execution price, if anything matched
    pub fn average_price(&self) -> Option<u64> {
        if self.matched == 0 {
            return None;
        }
        let notional: u128 = self.fills.iter().map(Fill::notional_raw).sum();
        u64::try_from(notional / self.matched as u128).ok()
    }
}

/// Result of an accepted amend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amended {
    /// The order as it now rests
    pub order: Order,

    /// True if the order lost time priority (moved to the back of a level)
    pub requeued: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(maker: u64, price: u64, quantity: u64, maker_remaining: u64) -> Fill {
        Fill {
            maker_order_id: maker,
            taker_order_id: 99,
            price,
            quantity,
            maker_remaining,
        }
    }

    #[test]
    fn test_fill_completes_maker() {
        assert!(fill(1, 100, 10, 0).completes_maker());
        assert!(!fill(1, 100, 10, 5).completes_maker());
        assert_eq!(fill(1, 100, 10, 0).notional_raw(), 1_000);
    }

    #[test]
    fn test_report_status() {
        let full = Consumed {
            unfilled: 0,
            matched: 10,
            fills: vec![fill(1, 100, 10, 0)],
            completed: vec![1],
        };
        assert_eq!(ExecutionReport::new(5, Side::Bid, 10, full).status, FillStatus::Filled);

        let partial = Consumed {
            unfilled: 5,
            matched: 10,
            fills: vec![fill(1, 100, 10, 0)],
            completed: vec![1],
        };
        let report = ExecutionReport::new(5, Side::Bid, 15, partial);
        assert_eq!(report.status, FillStatus::PartiallyFilled);
        assert!(!report.is_filled());

        let empty = Consumed {
            unfilled: 15,
            ..Consumed::default()
        };
        let report = ExecutionReport::new(5, Side::Bid, 15, empty);
        assert_eq!(report.status, FillStatus::NoLiquidity);
        assert_eq!(report.average_price(), None);
    }

    #[test]
    fn test_average_price() {
        let consumed = Consumed {
            unfilled: 0,
            matched: 30,
            fills: vec![fill(1, 100, 10, 0), fill(2, 103, 20, 0)],
            completed: vec![1, 2],
        };
        let report = ExecutionReport::new(5, Side::Bid, 30, consumed);
        // (100*10 + 103*20) / 30 = 102
        assert_eq!(report.average_price(), Some(102));
    }
}
