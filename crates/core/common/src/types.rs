//! Core types for the TickForge market-data core

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique order identifier as carried on the ITCH wire (order reference number)
pub type OrderId = u64;

/// Price in integer ticks (1 tick = 0.0001, i.e. price * 10000)
///
/// Stored as `u64` for determinism; the ITCH wire carries prices as
/// `u32 * 10000` which widens losslessly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Px(u64);

impl Px {
    /// Create a price from integer ticks
    #[must_use]
    pub const fn from_ticks(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Get the price as integer ticks
    #[must_use]
    pub const fn as_ticks(&self) -> u64 {
        self.0
    }

    /// Get the price as f64 (display/analytics only, never on the data path)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 10000.0
    }

    /// Zero price
    pub const ZERO: Self = Self(0);
}

impl fmt::Display for Px {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.as_f64())
    }
}

/// Quantity in whole shares
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Qty(u32);

impl Qty {
    /// Create a quantity from a share count
    #[must_use]
    pub const fn new(shares: u32) -> Self {
        Self(shares)
    }

    /// Get the quantity as u32 shares
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Get the quantity widened to u64 (for volume accumulation)
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0 as u64
    }

    /// Check if quantity is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtract saturating at zero
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Zero quantity
    pub const ZERO: Self = Self(0);
}

impl fmt::Display for Qty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp in nanoseconds since midnight, local to the feed
///
/// The ITCH wire carries timestamps as 48-bit values; the legal maximum is
/// `2^48 - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ts(u64);

impl Ts {
    /// Largest value representable in the 48-bit wire field
    pub const MAX_FEED: Self = Self((1u64 << 48) - 1);

    /// Create timestamp from nanoseconds since midnight
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Get timestamp as nanoseconds
    #[must_use]
    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Get timestamp as microseconds
    #[must_use]
    pub const fn as_micros(&self) -> u64 {
        self.0 / 1000
    }

    /// Get timestamp as milliseconds
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.0 / 1_000_000
    }
}

impl fmt::Display for Ts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

/// Side of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// Buy side (bid)
    Buy = b'B',
    /// Sell side (ask/offer)
    Sell = b'S',
}

impl Side {
    /// Check if this is the buy side
    #[inline]
    #[must_use]
    pub const fn is_buy(&self) -> bool {
        matches!(self, Side::Buy)
    }

    /// Get the opposite side
    #[inline]
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Decode the wire indicator (`B`/`S`); any other byte is malformed
    #[must_use]
    pub const fn from_wire(byte: u8) -> Option<Self> {
        match byte {
            b'B' => Some(Side::Buy),
            b'S' => Some(Side::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}
