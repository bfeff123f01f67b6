//! Limit order book and matching engine
//!
//! Sides are sorted vectors of price levels (bids descending, asks
//! ascending), so the matching walk is a linear scan from the front.
//! A hash index maps order id to pool handle for O(1) cancellation.
//!
//! Matching rules:
//! - An incoming buy crosses while its limit is at or above the best ask;
//!   symmetric for sells.
//! - Execution price is always the resting (maker) order's price.
//! - Within a level, fills consume orders strictly oldest-first.
//! - Any unfilled remainder rests at the taker's original limit price.

use crate::config::BookConfig;
use crate::events::Execution;
use crate::level::PriceLevel;
use crate::pool::{Order, OrderHandle, OrderPool};
use common::{OrderId, Px, Qty, Side};
use rustc_hash::FxHashMap;
use tracing::{info, warn};

/// Price-time-priority limit order book for a single instrument
///
/// Strictly single-threaded; all state mutation goes through `&mut self`.
pub struct OrderBook {
    /// Bid levels, best (highest) price first
    bids: Vec<PriceLevel>,
    /// Ask levels, best (lowest) price first
    asks: Vec<PriceLevel>,
    /// Resting order id -> pool slot
    index: FxHashMap<OrderId, OrderHandle>,
    /// Storage for all resting orders
    pool: OrderPool,
}

impl OrderBook {
    /// Create a book with default sizing (see [`BookConfig`])
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&BookConfig::default())
    }

    /// Create a book whose pool holds up to `pool_capacity` resting orders
    #[must_use]
    pub fn with_capacity(pool_capacity: usize) -> Self {
        Self::with_config(&BookConfig {
            pool_capacity,
            ..BookConfig::default()
        })
    }

    /// Create a book from explicit sizing
    #[must_use]
    pub fn with_config(config: &BookConfig) -> Self {
        info!(
            "initialising order book: pool capacity {}, level reserve {}",
            config.pool_capacity, config.level_capacity
        );
        Self {
            bids: Vec::with_capacity(config.level_capacity),
            asks: Vec::with_capacity(config.level_capacity),
            index: FxHashMap::with_capacity_and_hasher(config.pool_capacity, Default::default()),
            pool: OrderPool::with_capacity(config.pool_capacity),
        }
    }

    // ------------------------------------------------------------------
    // Order entry
    // ------------------------------------------------------------------

    /// Add a limit order, discarding execution events
    ///
    /// See [`OrderBook::add_order_with`].
    pub fn add_order(&mut self, id: OrderId, price: Px, qty: Qty, side: Side) -> bool {
        self.add_order_with(id, price, qty, side, |_| {})
    }

    /// Add a limit order, reporting each fill through `on_exec`
    ///
    /// Crossing quantity is matched against the opposite side first; any
    /// remainder rests at `price`. Returns `false` for a duplicate `id`
    /// (no state change) or when the pool cannot hold the remainder; in
    /// the latter case the match has already happened and its executions
    /// stand; only the remainder is dropped.
    ///
    /// Each fill is reported before the mutation it describes becomes
    /// visible. Complexity is O(k) over crossed levels plus O(levels) if a
    /// new level must be inserted.
    pub fn add_order_with<F>(&mut self, id: OrderId, price: Px, qty: Qty, side: Side, mut on_exec: F) -> bool
    where
        F: FnMut(&Execution),
    {
        if self.index.contains_key(&id) {
            return false;
        }

        let remaining = match side {
            Side::Buy => self.match_buy(id, price, qty, &mut on_exec),
            Side::Sell => self.match_sell(id, price, qty, &mut on_exec),
        };

        if remaining.is_zero() {
            return true;
        }

        let Some(handle) = self.pool.acquire() else {
            warn!("order pool exhausted; remainder of order {id} ({remaining} shares) cannot rest");
            return false;
        };

        {
            let order = self.pool.get_mut(handle);
            order.id = id;
            order.price = price;
            order.qty = remaining;
            order.side = side;
        }

        match side {
            Side::Buy => Self::insert_resting(&mut self.bids, &mut self.pool, handle, true),
            Side::Sell => Self::insert_resting(&mut self.asks, &mut self.pool, handle, false),
        }
        self.index.insert(id, handle);
        true
    }

    /// Cancel a resting order
    ///
    /// Returns `false` if `id` is not resting. Unlinks the order from its
    /// level in O(1), erasing the level when it empties, and returns the
    /// slot to the pool.
    pub fn cancel_order(&mut self, id: OrderId) -> bool {
        let Some(handle) = self.index.remove(&id) else {
            return false;
        };

        let (price, side) = {
            let order = self.pool.get(handle);
            (order.price, order.side)
        };

        let levels = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let pos = Self::level_position(levels, price, side.is_buy());
        debug_assert!(pos < levels.len() && levels[pos].price == price);

        levels[pos].remove(&mut self.pool, handle);
        if levels[pos].is_empty() {
            levels.remove(pos);
        }
        self.pool.release(handle);
        true
    }

    /// Apply an exchange-reported execution against a resting order
    ///
    /// Reduces the order and its level volume by `min(qty, remaining)`,
    /// removing the order (and the level, if it empties) once exhausted.
    /// Returns `false` if `id` is not resting.
    pub fn execute_order(&mut self, id: OrderId, qty: Qty) -> bool {
        let Some(&handle) = self.index.get(&id) else {
            return false;
        };

        let (price, side, remaining) = {
            let order = self.pool.get(handle);
            (order.price, order.side, order.qty)
        };
        let fill = qty.min(remaining);

        self.pool.get_mut(handle).reduce_qty(fill);

        let levels = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let pos = Self::level_position(levels, price, side.is_buy());
        debug_assert!(pos < levels.len() && levels[pos].price == price);
        levels[pos].reduce_volume(fill.as_u64());

        if self.pool.get(handle).is_filled() {
            levels[pos].remove(&mut self.pool, handle);
            if levels[pos].is_empty() {
                levels.remove(pos);
            }
            self.index.remove(&id);
            self.pool.release(handle);
        }
        true
    }

    // ------------------------------------------------------------------
    // Market data accessors
    // ------------------------------------------------------------------

    /// Best (highest) bid price
    #[inline]
    #[must_use]
    pub fn best_bid(&self) -> Option<Px> {
        self.bids.first().map(|level| level.price)
    }

    /// Best (lowest) ask price
    #[inline]
    #[must_use]
    pub fn best_ask(&self) -> Option<Px> {
        self.asks.first().map(|level| level.price)
    }

    /// Bid-ask spread in ticks; `None` when either side is empty
    #[inline]
    #[must_use]
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.as_ticks().saturating_sub(bid.as_ticks())),
            _ => None,
        }
    }

    /// Resting volume at the best bid (0 when no bids)
    #[inline]
    #[must_use]
    pub fn best_bid_volume(&self) -> u64 {
        self.bids.first().map_or(0, PriceLevel::total_volume)
    }

    /// Resting volume at the best ask (0 when no asks)
    #[inline]
    #[must_use]
    pub fn best_ask_volume(&self) -> u64 {
        self.asks.first().map_or(0, PriceLevel::total_volume)
    }

    /// Number of resting orders
    #[inline]
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.index.len()
    }

    /// Number of bid price levels
    #[inline]
    #[must_use]
    pub fn bid_level_count(&self) -> usize {
        self.bids.len()
    }

    /// Number of ask price levels
    #[inline]
    #[must_use]
    pub fn ask_level_count(&self) -> usize {
        self.asks.len()
    }

    /// True when no order rests on either side
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Bid levels, best first (inspection and tests)
    #[must_use]
    pub fn bids(&self) -> &[PriceLevel] {
        &self.bids
    }

    /// Ask levels, best first (inspection and tests)
    #[must_use]
    pub fn asks(&self) -> &[PriceLevel] {
        &self.asks
    }

    /// Backing order pool (inspection and tests)
    #[must_use]
    pub fn pool(&self) -> &OrderPool {
        &self.pool
    }

    /// Look up a resting order by id
    #[must_use]
    pub fn resting_order(&self, id: OrderId) -> Option<&Order> {
        self.index.get(&id).map(|&handle| self.pool.get(handle))
    }

    // ------------------------------------------------------------------
    // Matching
    // ------------------------------------------------------------------

    /// Match an incoming buy against the ask side; returns the remainder
    fn match_buy<F>(&mut self, taker_id: OrderId, limit: Px, qty: Qty, on_exec: &mut F) -> Qty
    where
        F: FnMut(&Execution),
    {
        let mut remaining = qty;
        while !remaining.is_zero() {
            match self.asks.first() {
                Some(level) if level.price <= limit => {}
                _ => break,
            }
            remaining = Self::match_level(
                &mut self.asks[0],
                &mut self.pool,
                &mut self.index,
                taker_id,
                remaining,
                on_exec,
            );
            if self.asks[0].is_empty() {
                self.asks.remove(0);
            }
        }
        remaining
    }

    /// Match an incoming sell against the bid side; returns the remainder
    fn match_sell<F>(&mut self, taker_id: OrderId, limit: Px, qty: Qty, on_exec: &mut F) -> Qty
    where
        F: FnMut(&Execution),
    {
        let mut remaining = qty;
        while !remaining.is_zero() {
            match self.bids.first() {
                Some(level) if level.price >= limit => {}
                _ => break,
            }
            remaining = Self::match_level(
                &mut self.bids[0],
                &mut self.pool,
                &mut self.index,
                taker_id,
                remaining,
                on_exec,
            );
            if self.bids[0].is_empty() {
                self.bids.remove(0);
            }
        }
        remaining
    }

    /// Consume resting orders at one level, oldest first
    fn match_level<F>(
        level: &mut PriceLevel,
        pool: &mut OrderPool,
        index: &mut FxHashMap<OrderId, OrderHandle>,
        taker_id: OrderId,
        mut remaining: Qty,
        on_exec: &mut F,
    ) -> Qty
    where
        F: FnMut(&Execution),
    {
        while !remaining.is_zero() {
            let Some(maker_handle) = level.front() else {
                break;
            };
            let (maker_id, maker_qty, maker_side) = {
                let maker = pool.get(maker_handle);
                (maker.id, maker.qty, maker.side)
            };
            let fill = remaining.min(maker_qty);

            // Report before any externally visible mutation
            on_exec(&Execution {
                maker_id,
                taker_id,
                price: level.price,
                qty: fill,
                maker_side,
            });

            remaining = remaining.saturating_sub(fill);
            pool.get_mut(maker_handle).reduce_qty(fill);
            level.reduce_volume(fill.as_u64());

            if pool.get(maker_handle).is_filled() {
                level.orders.pop_front(pool);
                index.remove(&maker_id);
                pool.release(maker_handle);
            }
        }
        remaining
    }

    // ------------------------------------------------------------------
    // Sorted-side maintenance
    // ------------------------------------------------------------------

    /// First position whose price is not better than `price` under the
    /// side's ordering (descending for bids)
    fn level_position(levels: &[PriceLevel], price: Px, descending: bool) -> usize {
        levels.partition_point(|level| {
            if descending {
                level.price > price
            } else {
                level.price < price
            }
        })
    }

    /// Splice a freshly initialised order into its side
    fn insert_resting(levels: &mut Vec<PriceLevel>, pool: &mut OrderPool, handle: OrderHandle, descending: bool) {
        let price = pool.get(handle).price;
        let pos = Self::level_position(levels, price, descending);

        if let Some(level) = levels.get_mut(pos) {
            if level.price == price {
                level.add(pool, handle);
                return;
            }
        }

        let mut level = PriceLevel::new(price);
        level.add(pool, handle);
        levels.insert(pos, level);
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}
