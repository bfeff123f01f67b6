//! ITCH feed to order book translation
//!
//! Bridges the decoder and the book for one instrument: Add Order records
//! matching the configured symbol become book insertions, Order Executed
//! records are applied against the resting orders they reference, and
//! everything else is counted and skipped. Executions produced by crossing
//! inserts are collected for the caller to drain.

use crate::book::OrderBook;
use crate::config::BookConfig;
use crate::events::Execution;
use common::Side;
use itch::{AddOrder, ItchSink, OrderExecuted};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised when constructing a feed adapter
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedError {
    /// The configured symbol cannot be represented in the 8-byte wire field
    #[error("symbol `{0}` exceeds the 8-character wire width")]
    SymbolTooLong(String),
    /// An empty symbol would match nothing
    #[error("symbol must not be empty")]
    EmptySymbol,
}

/// Per-message tallies kept by the adapter
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct AdapterStats {
    /// Add Orders applied to the book
    pub add_orders: u64,
    /// Exchange executions applied to resting orders
    pub executions: u64,
    /// Records for other symbols
    pub skipped: u64,
    /// Records the book rejected (duplicate id, pool exhausted, unknown id)
    pub rejected: u64,
    /// Records without a structural view
    pub unknown: u64,
}

/// Applies decoded ITCH messages for one symbol to an order book
pub struct ItchBookAdapter {
    book: OrderBook,
    symbol: String,
    executions: Vec<Execution>,
    stats: AdapterStats,
}

impl ItchBookAdapter {
    /// Create an adapter for `symbol` with the given book sizing
    pub fn new(symbol: &str, config: &BookConfig) -> Result<Self, FeedError> {
        if symbol.is_empty() {
            return Err(FeedError::EmptySymbol);
        }
        if symbol.len() > 8 {
            return Err(FeedError::SymbolTooLong(symbol.to_string()));
        }
        Ok(Self {
            book: OrderBook::with_config(config),
            symbol: symbol.to_string(),
            executions: Vec::new(),
            stats: AdapterStats::default(),
        })
    }

    /// The maintained book
    #[must_use]
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// The maintained book, mutably
    pub fn book_mut(&mut self) -> &mut OrderBook {
        &mut self.book
    }

    /// Message tallies so far
    #[must_use]
    pub fn stats(&self) -> AdapterStats {
        self.stats
    }

    /// Take all executions collected since the last drain
    pub fn drain_executions(&mut self) -> Vec<Execution> {
        std::mem::take(&mut self.executions)
    }
}

impl ItchSink for ItchBookAdapter {
    fn on_add_order(&mut self, msg: &AddOrder<'_>) {
        if !msg.stock().matches(&self.symbol) {
            self.stats.skipped += 1;
            return;
        }

        let Some(side) = Side::from_wire(msg.side_raw()) else {
            warn!(
                "add order {} carries malformed side indicator {:#04x}",
                msg.order_ref(),
                msg.side_raw()
            );
            self.stats.rejected += 1;
            return;
        };

        let executions = &mut self.executions;
        let accepted = self.book.add_order_with(
            msg.order_ref(),
            msg.price(),
            msg.shares(),
            side,
            |exec| executions.push(*exec),
        );

        if accepted {
            self.stats.add_orders += 1;
        } else {
            warn!("book rejected add order {}", msg.order_ref());
            self.stats.rejected += 1;
        }
    }

    fn on_order_executed(&mut self, msg: &OrderExecuted<'_>) {
        if self.book.execute_order(msg.order_ref(), msg.executed_shares()) {
            self.stats.executions += 1;
        } else {
            debug!(
                "execution (match {}) references unknown order {}",
                msg.match_number(),
                msg.order_ref()
            );
            self.stats.rejected += 1;
        }
    }

    fn on_unknown(&mut self, kind: u8, _data: &[u8]) {
        debug!("skipping unmodeled message type {:#04x}", kind);
        self.stats.unknown += 1;
    }
}
