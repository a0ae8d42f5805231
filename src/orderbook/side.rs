//! One side (bid or ask) of the limit order book.
//!
//! ## Architecture
//!
//! - **Order slab**: arena of [`OrderNode`]s; keys are the handles stored
//!   in the order-id index
//! - **Level slab**: arena of [`PriceLevel`]s; each node records its level key
//! - **BTreeMap**: price -> level key, ordered ascending
//! - **HashMap**: order id -> node key
//! - **Cached best/worst**: max/min price for bids, min/max for asks
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Insert at existing level | O(1) |
//! | Insert at new level | O(log M) |
//! | Cancel | O(1), plus O(log M) if the level empties |
//! | Best/worst | O(1) |
//!
//! M is the number of distinct price levels.

use std::collections::{BTreeMap, HashMap};

use slab::Slab;
use tracing::debug;

use crate::orderbook::snapshot::LevelView;
use crate::orderbook::{OrderNode, PriceLevel};
use crate::types::{Amended, BookError, Consumed, Order, OrderKind, Side, StateHasher};

/// One side of a limit order book.
#[derive(Debug)]
pub struct BookSide {
    side: Side,

    /// Order node storage
    orders: Slab<OrderNode>,

    /// Price level storage
    levels: Slab<PriceLevel>,

    /// Price -> level key, ascending
    prices: BTreeMap<u64, usize>,

    /// Order id -> node key
    index: HashMap<u64, usize>,

    best: Option<u64>,
    worst: Option<u64>,

    /// Price-index lookups made while refreshing best/worst
    #[cfg(test)]
    edge_lookups: usize,
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        Self::with_capacity(side, 0)
    }

    /// Create a side with pre-allocated order storage
    pub fn with_capacity(side: Side, order_capacity: usize) -> Self {
        Self {
            side,
            orders: Slab::with_capacity(order_capacity),
            levels: Slab::new(),
            prices: BTreeMap::new(),
            index: HashMap::with_capacity(order_capacity),
            best: None,
            worst: None,
            #[cfg(test)]
            edge_lookups: 0,
        }
    }

    // ========================================================================
    // Size
    // ========================================================================

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Number of resting orders
    #[inline]
    pub fn order_count(&self) -> usize {
        self.index.len()
    }

    /// Number of distinct price levels
    #[inline]
    pub fn level_count(&self) -> usize {
        self.prices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: u64) -> bool {
        self.index.contains_key(&id)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Rest a limit order at the back of its price level.
    ///
    /// # Errors
    ///
    /// - `DuplicateOrder` if the id already rests on this side
    /// - `InvalidOrder` if the order is not a limit order for this side, or
    ///   its size would overflow the level's aggregate
    ///
    /// # Returns
    ///
    /// The node handle of the resting order
    pub fn insert_limit(&mut self, order: Order) -> Result<usize, BookError> {
        if order.side() != self.side {
            return Err(BookError::InvalidOrder(format!(
                "order {} is a {} order, cannot rest on the {} side",
                order.id(),
                order.side(),
                self.side
            )));
        }
        let price = match (order.kind(), order.price()) {
            (OrderKind::Limit, Some(price)) => price,
            _ => {
                return Err(BookError::InvalidOrder(format!(
                    "order {} is not a priced limit order",
                    order.id()
                )))
            }
        };
        if order.remaining == 0 {
            return Err(BookError::InvalidOrder(format!("order {} has nothing to rest", order.id())));
        }
        if self.index.contains_key(&order.id()) {
            return Err(BookError::DuplicateOrder {
                side: self.side,
                id: order.id(),
            });
        }

        let existing = self.prices.get(&price).copied();
        if let Some(key) = existing {
            self.ensure_room(key, 0, order.remaining, order.id())?;
        }

        let id = order.id();
        let level_key = match existing {
            Some(key) => key,
            None => self.open_level(price),
        };
        let key = self.levels[level_key].append(level_key, order, &mut self.orders);
        self.index.insert(id, key);

        debug!(side = %self.side, id, price, "order rested");
        Ok(key)
    }

    /// Remove a resting order by id.
    ///
    /// # Errors
    ///
    /// `UnknownOrder` if the id is not resting on this side.
    pub fn cancel(&mut self, id: u64) -> Result<Order, BookError> {
        let key = self.index.remove(&id).ok_or(BookError::UnknownOrder { side: self.side, id })?;
        let order = self.unlink(key);
        debug!(side = %self.side, id, "order cancelled");
        Ok(order)
    }

    /// Change size and/or price of a resting order.
    ///
    /// Policy:
    /// - same price and size reduced (or unchanged): updated in place, time
    ///   priority kept
    /// - price changed or size increased: removed and re-inserted at the
    ///   back of the target level with `sequence`, time priority lost
    ///
    /// # Errors
    ///
    /// - `InvalidOrder` if neither field is given, either is zero, or a
    ///   requeue would overflow the target level's aggregate
    /// - `UnknownOrder` if the id is not resting on this side
    pub fn amend(
        &mut self,
        id: u64,
        new_size: Option<u64>,
        new_price: Option<u64>,
        sequence: u64,
    ) -> Result<Amended, BookError> {
        if new_size.is_none() && new_price.is_none() {
            return Err(BookError::InvalidOrder(format!("amend of order {id} changes nothing")));
        }
        if new_size == Some(0) || new_price == Some(0) {
            return Err(BookError::InvalidOrder(format!(
                "amend of order {id} has a zero size or price"
            )));
        }
        let key = *self.index.get(&id).ok_or(BookError::UnknownOrder { side: self.side, id })?;

        let node = &self.orders[key];
        let level_key = node.level;
        let current_price = node.order.price().unwrap_or_default();
        let current_size = node.remaining();
        let price = new_price.unwrap_or(current_price);
        let size = new_size.unwrap_or(current_size);

        if price == current_price && size <= current_size {
            if size < current_size {
                self.levels[level_key].reduce(key, size, &mut self.orders);
            }
            debug!(side = %self.side, id, size, "order reduced in place");
            return Ok(Amended {
                order: self.orders[key].order.clone(),
                requeued: false,
            });
        }

        if let Some(&target) = self.prices.get(&price) {
            let leaving = if target == level_key { current_size } else { 0 };
            self.ensure_room(target, leaving, size, id)?;
        }

        self.index.remove(&id);
        let old = self.unlink(key);
        let order = old.requeued(price, size, sequence);
        self.insert_limit(order.clone())?;
        debug!(side = %self.side, id, price, size, "order requeued");

        Ok(Amended { order, requeued: true })
    }

    /// Match `quantity` against this side, best price first.
    ///
    /// Each exhausted level is removed and the best price recomputed before
    /// moving on. Stops when the quantity is filled or the side is empty.
    pub fn consume(&mut self, quantity: u64, taker_order_id: u64) -> Consumed {
        let mut out = Consumed::default();
        let mut remaining = quantity;

        while remaining > 0 {
            let Some(best) = self.best else { break };
            let Some(&level_key) = self.prices.get(&best) else { break };

            let first_completed = out.completed.len();
            let result =
                self.levels[level_key].consume(remaining, taker_order_id, &mut self.orders, &mut out);
            remaining = result.unfilled;

            for id in &out.completed[first_completed..] {
                self.index.remove(id);
            }
            if self.levels[level_key].is_empty() {
                self.close_level(level_key);
            }
        }

        out.unfilled = remaining;
        out
    }

    /// Drop every order and level
    pub fn clear(&mut self) {
        self.orders.clear();
        self.levels.clear();
        self.prices.clear();
        self.index.clear();
        self.best = None;
        self.worst = None;
    }

    // ========================================================================
    // Observation
    // ========================================================================

    /// Most aggressive resting price, `None` when the side has no liquidity
    #[inline]
    pub fn best(&self) -> Option<u64> {
        self.best
    }

    /// Least aggressive resting price
    #[inline]
    pub fn worst(&self) -> Option<u64> {
        self.worst
    }

    /// Aggregate size at `price`, zero if no level exists
    pub fn depth_at(&self, price: u64) -> u64 {
        self.prices
            .get(&price)
            .map_or(0, |&key| self.levels[key].total_quantity)
    }

    /// Resting order by id
    pub fn get(&self, id: u64) -> Option<&Order> {
        self.index.get(&id).map(|&key| &self.orders[key].order)
    }

    /// Top `n` levels, most extreme first
    pub fn levels(&self, n: usize) -> Vec<LevelView> {
        self.level_keys()
            .take(n)
            .map(|key| self.view(key))
            .collect()
    }

    /// Orders of the level at `price`, oldest first
    pub fn orders_at(&self, price: u64) -> Vec<&Order> {
        match self.prices.get(&price) {
            Some(&key) => self.levels[key].iter(&self.orders).map(|(_, o)| o).collect(),
            None => Vec::new(),
        }
    }

    /// Zero-based FIFO position of an order within its level.
    ///
    /// Walks the level from its head, so cost grows with the orders ahead.
    pub fn queue_position(&self, id: u64) -> Option<usize> {
        let key = *self.index.get(&id)?;
        let level = &self.levels[self.orders[key].level];
        level.iter(&self.orders).position(|(k, _)| k == key)
    }

    /// Total resting size with `lo <= price <= hi`, saturating at `u64::MAX`
    pub fn volume_between(&self, lo: u64, hi: u64) -> u64 {
        if lo > hi {
            return 0;
        }
        self.prices
            .range(lo..=hi)
            .fold(0u64, |total, (_, &key)| total.saturating_add(self.levels[key].total_quantity))
    }

    /// The level holding the most orders among the top `n`.
    ///
    /// Ties go to the more extreme price.
    pub fn busiest_level(&self, n: usize) -> Option<LevelView> {
        self.level_keys()
            .take(n)
            .map(|key| self.view(key))
            .fold(None, |busiest: Option<LevelView>, level| match busiest {
                Some(b) if b.order_count >= level.order_count => Some(b),
                _ => Some(level),
            })
    }

    /// Hash every resting order, best level first, oldest first within a level
    pub(crate) fn hash_into(&self, hasher: &mut StateHasher) -> Result<(), BookError> {
        for key in self.level_keys() {
            for (_, order) in self.levels[key].iter(&self.orders) {
                hasher.update(order)?;
            }
        }
        Ok(())
    }

    /// Verify every structural invariant of the side.
    ///
    /// Intended for tests; walks the whole side.
    pub fn check_invariants(&self) -> Result<(), String> {
        let first = self.prices.keys().next().copied();
        let last = self.prices.keys().next_back().copied();
        let (expected_best, expected_worst) = match self.side {
            Side::Bid => (last, first),
            Side::Ask => (first, last),
        };
        if self.best != expected_best || self.worst != expected_worst {
            return Err(format!(
                "{} cache best={:?} worst={:?}, index best={:?} worst={:?}",
                self.side, self.best, self.worst, expected_best, expected_worst
            ));
        }
        if self.levels.len() != self.prices.len() {
            return Err(format!(
                "{} holds {} levels but indexes {}",
                self.side,
                self.levels.len(),
                self.prices.len()
            ));
        }

        let mut seen = 0;
        for (&price, &key) in &self.prices {
            let level = &self.levels[key];
            if level.price != price {
                return Err(format!("level {key} priced {} indexed at {price}", level.price));
            }
            if level.is_empty() {
                return Err(format!("empty level at {price} still indexed"));
            }
            let mut total = 0;
            let mut count = 0;
            let mut last_sequence = None;
            for (node_key, order) in level.iter(&self.orders) {
                total += order.remaining;
                count += 1;
                if order.remaining == 0 {
                    return Err(format!("order {} rests with zero size", order.id()));
                }
                if order.price() != Some(price) {
                    return Err(format!("order {} is at the wrong level", order.id()));
                }
                if self.orders[node_key].level != key {
                    return Err(format!("order {} points at the wrong level", order.id()));
                }
                if self.index.get(&order.id()) != Some(&node_key) {
                    return Err(format!("order {} missing from id index", order.id()));
                }
                if last_sequence.is_some_and(|s| s >= order.sequence()) {
                    return Err(format!("level {price} is out of arrival order"));
                }
                last_sequence = Some(order.sequence());
            }
            if total != level.total_quantity || count != level.order_count {
                return Err(format!(
                    "level {price} aggregate {}/{} but members sum {total}/{count}",
                    level.total_quantity, level.order_count
                ));
            }
            seen += count;
        }
        if seen != self.index.len() || seen != self.orders.len() {
            return Err(format!(
                "{} levels hold {seen} orders, index {} slab {}",
                self.side,
                self.index.len(),
                self.orders.len()
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Level keys from the most to the least extreme price
    fn level_keys(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        match self.side {
            Side::Bid => Box::new(self.prices.values().rev().copied()),
            Side::Ask => Box::new(self.prices.values().copied()),
        }
    }

    fn view(&self, key: usize) -> LevelView {
        let level = &self.levels[key];
        LevelView {
            price: level.price,
            size: level.total_quantity,
            order_count: level.order_count,
        }
    }

    /// Create and index an empty level. A new level can only replace the
    /// cached extremes if it is strictly beyond them, so no rescan is needed.
    fn open_level(&mut self, price: u64) -> usize {
        let key = self.levels.insert(PriceLevel::new(price));
        self.prices.insert(price, key);

        if self.best.map_or(true, |best| self.side.is_more_extreme(price, best)) {
            self.best = Some(price);
        }
        if self.worst.map_or(true, |worst| self.side.is_more_extreme(worst, price)) {
            self.worst = Some(price);
        }
        debug!(side = %self.side, price, "level opened");
        key
    }

    /// Remove an emptied level and refresh whichever extreme it was.
    fn close_level(&mut self, key: usize) {
        let price = self.levels.remove(key).price;
        self.prices.remove(&price);

        if self.best == Some(price) {
            self.best = self.edge(self.side == Side::Bid);
        }
        if self.worst == Some(price) {
            self.worst = self.edge(self.side == Side::Ask);
        }
        debug!(side = %self.side, price, "level closed");
    }

    /// Highest or lowest indexed price: one O(log M) descent of the BTreeMap
    fn edge(&mut self, highest: bool) -> Option<u64> {
        #[cfg(test)]
        {
            self.edge_lookups += 1;
        }
        if highest {
            self.prices.keys().next_back().copied()
        } else {
            self.prices.keys().next().copied()
        }
    }

    /// Reject a size that would overflow the aggregate of level `key` once
    /// `leaving` has been taken out of it
    fn ensure_room(&self, key: usize, leaving: u64, size: u64, id: u64) -> Result<(), BookError> {
        let level = &self.levels[key];
        match (level.total_quantity - leaving).checked_add(size) {
            Some(_) => Ok(()),
            None => Err(BookError::InvalidOrder(format!(
                "order {id} of size {size} overflows the aggregate at price {}",
                level.price
            ))),
        }
    }

    /// Take a node out of its level (id index already updated by the caller)
    fn unlink(&mut self, key: usize) -> Order {
        let level_key = self.orders[key].level;
        let order = self.levels[level_key].remove(key, &mut self.orders);
        if self.levels[level_key].is_empty() {
            self.close_level(level_key);
        }
        order
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
