//! Price level queue: all resting orders at one price.
//!
//! ## Queue Structure
//!
//! ```text
//! head (oldest) <-> order2 <-> order3 <-> tail (newest)
//! ```
//!
//! - New orders are appended at the tail
//! - Matching consumes orders from the head
//! - Any order can be removed in O(1) using its slab key
//!
//! Node storage lives in the book side's slab; this struct only holds
//! queue metadata. Slab keys handed out by [`PriceLevel::append`] are the
//! handles the order-id index stores.
//!
//! Invariant: `total_quantity` equals the sum of member `remaining` and
//! `order_count` equals the number of linked nodes.

use slab::Slab;

use crate::orderbook::OrderNode;
use crate::types::{Consumed, Fill, Order};

/// A FIFO queue of orders sharing one price.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price for this level (fixed-point, scaled by 10^8)
    pub price: u64,

    /// Total remaining quantity at this level
    pub total_quantity: u64,

    /// Oldest order (next to match)
    pub head: Option<usize>,

    /// Newest order
    pub tail: Option<usize>,

    /// Number of orders at this price level
    pub order_count: usize,
}

/// Result of matching against a single level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelConsume {
    /// Quantity left after this level
    pub unfilled: u64,

    /// Orders fully filled and removed from the level
    pub removed: usize,
}

impl PriceLevel {
    pub fn new(price: u64) -> Self {
        Self {
            price,
            total_quantity: 0,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Store `order` in the slab and link it as the newest member.
    ///
    /// `level_key` is this level's own key in the side's level slab; it is
    /// recorded on the node so cancel can find the level in O(1).
    ///
    /// # Returns
    ///
    /// The slab key (handle) of the new node
    pub fn append(&mut self, level_key: usize, order: Order, orders: &mut Slab<OrderNode>) -> usize {
        let quantity = order.remaining;
        let mut node = OrderNode::new(order, level_key);
        node.prev = self.tail;
        let key = orders.insert(node);

        match self.tail {
            Some(tail_key) => orders[tail_key].next = Some(key),
            None => self.head = Some(key),
        }

        self.tail = Some(key);
        self.order_count += 1;
        self.total_quantity = self.total_quantity.saturating_add(quantity);
        key
    }

    /// Unlink a node and take it out of the slab
    ///
    /// # Returns
    ///
    /// The removed order
    pub fn remove(&mut self, key: usize, orders: &mut Slab<OrderNode>) -> Order {
        let node = orders.remove(key);

        match node.prev {
            Some(prev) => orders[prev].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => orders[next].prev = node.prev,
            None => self.tail = node.prev,
        }

        self.order_count -= 1;
        self.total_quantity -= node.remaining();
        node.order
    }

    /// Slab key of the oldest member, if any
    #[inline]
    pub fn oldest(&self) -> Option<usize> {
        self.head
    }

    /// Shrink a member's remaining size in place; FIFO position is kept.
    ///
    /// Caller guarantees `0 < new_remaining <= current remaining`.
    pub fn reduce(&mut self, key: usize, new_remaining: u64, orders: &mut Slab<OrderNode>) {
        let order = &mut orders[key].order;
        debug_assert!(
            new_remaining > 0 && new_remaining <= order.remaining,
            "reduce of order {} to {new_remaining} from {}",
            order.id(),
            order.remaining
        );
        let delta = order.remaining - new_remaining;
        order.remaining = new_remaining;
        order.quantity -= delta;
        self.total_quantity -= delta;
    }

    /// Match `quantity` against the oldest members, in arrival order.
    ///
    /// - oldest.remaining > quantity: decrement it, stop
    /// - oldest.remaining == quantity: remove it, stop
    /// - oldest.remaining < quantity: remove it, continue with the next oldest
    ///
    /// Fills and the ids of removed makers are appended to `out`; the
    /// remaining members are never reordered.
    pub fn consume(
        &mut self,
        mut quantity: u64,
        taker_order_id: u64,
        orders: &mut Slab<OrderNode>,
        out: &mut Consumed,
    ) -> LevelConsume {
        let mut removed = 0;

        while quantity > 0 {
            let Some(key) = self.head else { break };

            let node = &mut orders[key];
            let filled = node.fill(quantity);
            let maker_remaining = node.remaining();
            let maker_order_id = node.order_id();

            quantity -= filled;
            self.total_quantity -= filled;
            out.matched += filled;
            out.fills.push(Fill {
                maker_order_id,
                taker_order_id,
                price: self.price,
                quantity: filled,
                maker_remaining,
            });

            if maker_remaining == 0 {
                self.remove(key, orders);
                out.completed.push(maker_order_id);
                removed += 1;
            }
        }

        LevelConsume {
            unfilled: quantity,
            removed,
        }
    }

    /// Iterate members oldest first
    pub fn iter<'a>(&self, orders: &'a Slab<OrderNode>) -> LevelIter<'a> {
        LevelIter {
            orders,
            cursor: self.head,
        }
    }
}

/// Oldest-first iterator over a level's orders
pub struct LevelIter<'a> {
    orders: &'a Slab<OrderNode>,
    cursor: Option<usize>,
}

impl<'a> Iterator for LevelIter<'a> {
    type Item = (usize, &'a Order);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor?;
        let node = self.orders.get(key)?;
        self.cursor = node.next;
        Some((key, &node.order))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
