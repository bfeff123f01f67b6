//! Price level aggregation
//!
//! A level is the FIFO queue of all orders resting at one price plus a
//! cached aggregate volume, so market-data queries never walk the queue.
//! Invariant: `total_volume` equals the sum of remaining quantities of the
//! queued orders. Volume subtraction saturates so the book stays queryable
//! if the invariant ever drifts; drift itself is a bug that the invariant
//! tests catch.

use crate::pool::{Order, OrderHandle, OrderPool};
use crate::queue::OrderQueue;
use common::Px;

/// All orders resting at a single price, oldest first
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price of this level in ticks
    pub price: Px,
    pub(crate) orders: OrderQueue,
    total_volume: u64,
}

impl PriceLevel {
    /// Create an empty level at `price`
    #[must_use]
    pub const fn new(price: Px) -> Self {
        Self {
            price,
            orders: OrderQueue::new(),
            total_volume: 0,
        }
    }

    /// Queue an order at the back (time priority)
    pub fn add(&mut self, pool: &mut OrderPool, handle: OrderHandle) {
        debug_assert_eq!(pool.get(handle).price, self.price);
        self.total_volume += pool.get(handle).qty.as_u64();
        self.orders.push_back(pool, handle);
    }

    /// Unlink an order and deduct its remaining quantity
    pub fn remove(&mut self, pool: &mut OrderPool, handle: OrderHandle) {
        let qty = pool.get(handle).qty.as_u64();
        self.total_volume = self.total_volume.saturating_sub(qty);
        self.orders.remove(pool, handle);
    }

    /// Deduct a partial fill from the cached volume
    #[inline]
    pub fn reduce_volume(&mut self, delta: u64) {
        self.total_volume = self.total_volume.saturating_sub(delta);
    }

    /// Aggregate resting quantity at this price
    #[inline]
    #[must_use]
    pub const fn total_volume(&self) -> u64 {
        self.total_volume
    }

    /// True when no order rests here
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Oldest resting order
    #[inline]
    #[must_use]
    pub const fn front(&self) -> Option<OrderHandle> {
        self.orders.front()
    }

    /// Number of resting orders. O(n).
    #[must_use]
    pub fn order_count(&self, pool: &OrderPool) -> usize {
        self.orders.len(pool)
    }

    /// Iterate resting orders oldest first
    pub fn orders<'p>(&self, pool: &'p OrderPool) -> impl Iterator<Item = &'p Order> + 'p {
        self.orders.iter(pool).map(|h| pool.get(h))
    }
}
