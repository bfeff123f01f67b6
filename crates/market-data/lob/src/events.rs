//! Execution events emitted by the matching engine

use common::{Px, Qty, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single maker-taker fill
///
/// Emitted once per fill, in matching-walk order (levels best-first,
/// orders oldest-first), before the corresponding book mutation becomes
/// visible. The feed of executions is append-only: a later rejection of
/// the taker's remainder never rolls fills back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    /// Resting order that provided liquidity
    pub maker_id: u64,
    /// Incoming order that crossed the spread
    pub taker_id: u64,
    /// Execution price, always the maker's price
    pub price: Px,
    /// Filled quantity
    pub qty: Qty,
    /// Side of the maker (opposite of the taker)
    pub maker_side: Side,
}

impl fmt::Display for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EXEC maker={} taker={} {} x {} ({} maker)",
            self.maker_id, self.taker_id, self.qty, self.price, self.maker_side
        )
    }
}
