//! Order node for slab-based storage.
//!
//! ## Design
//!
//! `OrderNode` wraps an `Order` with doubly-linked list pointers and the
//! slab key of the price level that owns it. The order-id index maps an id
//! to the node's slab key, so cancel reaches both the node and its level
//! without any search.
//!
//! ## Linked List
//!
//! Orders at the same price level form a doubly-linked list:
//! - `next`: the next (newer) order in the level
//! - `prev`: the previous (older) order in the level
//!
//! Links are slab keys (`usize`), never references.

use crate::types::Order;

/// Order node stored in a book side's order slab.
#[derive(Debug, Clone)]
pub struct OrderNode {
    /// The resting order
    pub order: Order,

    /// Slab key of the owning price level
    pub level: usize,

    /// Next order in the level queue (None if this is the newest)
    pub next: Option<usize>,

    /// Previous order in the level queue (None if this is the oldest)
    pub prev: Option<usize>,
}

impl OrderNode {
    /// Create a new, unlinked node belonging to `level`
    #[inline]
    pub fn new(order: Order, level: usize) -> Self {
        Self {
            order,
            level,
            next: None,
            prev: None,
        }
    }

    /// Check if this node is unlinked (no neighbours)
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.next.is_none() && self.prev.is_none()
    }

    #[inline]
    pub fn order_id(&self) -> u64 {
        self.order.id()
    }

    #[inline]
    pub fn remaining(&self) -> u64 {
        self.order.remaining
    }

    /// Fill a portion of this order, returning the amount actually filled
    #[inline]
    pub fn fill(&mut self, quantity: u64) -> u64 {
        self.order.fill(quantity)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
