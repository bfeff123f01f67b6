//! Typed overlays for ITCH 5.0 records
//!
//! Each overlay borrows a record-length slice of the receive buffer and
//! decodes fields on access with explicit big-endian reads at the wire
//! offsets. Nothing is copied and no alignment beyond 1 is assumed. A view
//! must not outlive the buffer it borrows and is only handed out by the
//! parser after the length check.

use crate::endian::{read_u16, read_u32, read_u48, read_u64};
use common::{Px, Qty, Ts};

/// Message-type byte constants for ITCH 5.0
pub mod msg_type {
    /// System Event
    pub const SYSTEM_EVENT: u8 = b'S';
    /// Stock Directory
    pub const STOCK_DIRECTORY: u8 = b'R';
    /// Stock Trading Action
    pub const STOCK_TRADING_ACTION: u8 = b'H';
    /// Reg SHO Restriction
    pub const REG_SHO_RESTRICTION: u8 = b'Y';
    /// Market Participant Position
    pub const MARKET_PARTICIPANT_POSITION: u8 = b'L';
    /// MWCB Decline Level
    pub const MWCB_DECLINE_LEVEL: u8 = b'V';
    /// MWCB Status
    pub const MWCB_STATUS: u8 = b'W';
    /// IPO Quoting Period Update
    pub const IPO_QUOTING_PERIOD: u8 = b'K';
    /// Add Order (no MPID attribution)
    pub const ADD_ORDER: u8 = b'A';
    /// Add Order with MPID attribution
    pub const ADD_ORDER_MPID: u8 = b'F';
    /// Order Executed
    pub const ORDER_EXECUTED: u8 = b'E';
    /// Order Executed with Price
    pub const ORDER_EXECUTED_WITH_PRICE: u8 = b'C';
    /// Order Cancel
    pub const ORDER_CANCEL: u8 = b'X';
    /// Order Delete
    pub const ORDER_DELETE: u8 = b'D';
    /// Order Replace
    pub const ORDER_REPLACE: u8 = b'U';
    /// Trade (non-cross)
    pub const TRADE: u8 = b'P';
    /// Cross Trade
    pub const CROSS_TRADE: u8 = b'Q';
    /// Broken Trade
    pub const BROKEN_TRADE: u8 = b'B';
    /// Net Order Imbalance Indicator
    pub const NOII: u8 = b'I';
    /// Retail Price Improvement Indicator
    pub const RPII: u8 = b'N';
}

/// 8-character stock symbol, ASCII, right-padded with spaces
#[derive(Debug, Clone, Copy)]
pub struct StockSymbol<'a> {
    data: &'a [u8],
}

impl<'a> StockSymbol<'a> {
    /// Wire width of a symbol field
    pub const WIRE_LEN: usize = 8;

    pub(crate) fn new(data: &'a [u8]) -> Self {
        debug_assert!(data.len() == Self::WIRE_LEN);
        Self { data }
    }

    /// Raw 8 bytes, padding included
    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Compare against a symbol string
    ///
    /// Every character of `symbol` must match in order, and the remaining
    /// wire bytes must all be the space pad. Symbols longer than 8
    /// characters never match.
    #[must_use]
    pub fn matches(&self, symbol: &str) -> bool {
        let sym = symbol.as_bytes();
        if sym.len() > Self::WIRE_LEN {
            return false;
        }
        if self.data[..sym.len()] != *sym {
            return false;
        }
        self.data[sym.len()..].iter().all(|&b| b == b' ')
    }
}

impl std::fmt::Display for StockSymbol<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &b in self.data.iter().take_while(|&&b| b != b' ') {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

/// Common 11-byte header shared by every ITCH message
///
/// | off | size | field |
/// |-----|------|-------|
/// | 0   | 1    | msg_type (ASCII) |
/// | 1   | 2    | stock_locate |
/// | 3   | 2    | tracking_number |
/// | 5   | 6    | timestamp (48-bit ns since midnight) |
#[derive(Debug, Clone, Copy)]
pub struct MessageHeader<'a> {
    data: &'a [u8],
}

impl<'a> MessageHeader<'a> {
    /// Wire length of the header
    pub const WIRE_LEN: usize = 11;

    pub(crate) fn new(data: &'a [u8]) -> Self {
        debug_assert!(data.len() >= Self::WIRE_LEN);
        Self { data }
    }

    /// Message type character
    #[must_use]
    pub fn msg_type(&self) -> u8 {
        self.data[0]
    }

    /// NASDAQ locate code identifying the security
    #[must_use]
    pub fn stock_locate(&self) -> u16 {
        read_u16(self.data, 1)
    }

    /// NASDAQ internal tracking number
    #[must_use]
    pub fn tracking_number(&self) -> u16 {
        read_u16(self.data, 3)
    }

    /// Nanoseconds since midnight
    #[must_use]
    pub fn timestamp(&self) -> Ts {
        Ts::from_nanos(read_u48(self.data, 5))
    }
}

/// Add Order message (`A`, 36 bytes, no MPID attribution)
///
/// | off | size | field |
/// |-----|------|-------|
/// | 0   | 11   | header |
/// | 11  | 8    | order_ref |
/// | 19  | 1    | side (`B`/`S`) |
/// | 20  | 4    | shares |
/// | 24  | 8    | stock symbol |
/// | 32  | 4    | price * 10000 |
#[derive(Debug, Clone, Copy)]
pub struct AddOrder<'a> {
    data: &'a [u8],
}

impl<'a> AddOrder<'a> {
    /// Wire length of an Add Order record
    pub const WIRE_LEN: usize = 36;

    pub(crate) fn new(data: &'a [u8]) -> Self {
        debug_assert!(data.len() >= Self::WIRE_LEN);
        Self { data }
    }

    /// Shared message header
    #[must_use]
    pub fn header(&self) -> MessageHeader<'a> {
        MessageHeader::new(self.data)
    }

    /// Unique order reference number
    #[must_use]
    pub fn order_ref(&self) -> u64 {
        read_u64(self.data, 11)
    }

    /// Raw buy/sell indicator byte
    #[must_use]
    pub fn side_raw(&self) -> u8 {
        self.data[19]
    }

    /// True if the indicator byte is `B`
    #[must_use]
    pub fn is_buy(&self) -> bool {
        self.side_raw() == b'B'
    }

    /// True if the indicator byte is `S`
    #[must_use]
    pub fn is_sell(&self) -> bool {
        self.side_raw() == b'S'
    }

    /// Number of shares
    #[must_use]
    pub fn shares(&self) -> Qty {
        Qty::new(read_u32(self.data, 20))
    }

    /// Stock symbol, space-padded
    #[must_use]
    pub fn stock(&self) -> StockSymbol<'a> {
        StockSymbol::new(&self.data[24..32])
    }

    /// Limit price in ticks (wire value is price * 10000)
    #[must_use]
    pub fn price(&self) -> Px {
        Px::from_ticks(u64::from(read_u32(self.data, 32)))
    }
}

/// Order Executed message (`E`, 31 bytes)
///
/// | off | size | field |
/// |-----|------|-------|
/// | 0   | 11   | header |
/// | 11  | 8    | order_ref |
/// | 19  | 4    | executed_shares |
/// | 23  | 8    | match_number |
#[derive(Debug, Clone, Copy)]
pub struct OrderExecuted<'a> {
    data: &'a [u8],
}

impl<'a> OrderExecuted<'a> {
    /// Wire length of an Order Executed record
    pub const WIRE_LEN: usize = 31;

    pub(crate) fn new(data: &'a [u8]) -> Self {
        debug_assert!(data.len() >= Self::WIRE_LEN);
        Self { data }
    }

    /// Shared message header
    #[must_use]
    pub fn header(&self) -> MessageHeader<'a> {
        MessageHeader::new(self.data)
    }

    /// Reference of the order being executed
    #[must_use]
    pub fn order_ref(&self) -> u64 {
        read_u64(self.data, 11)
    }

    /// Number of shares executed
    #[must_use]
    pub fn executed_shares(&self) -> Qty {
        Qty::new(read_u32(self.data, 19))
    }

    /// NASDAQ match identifier for this execution
    #[must_use]
    pub fn match_number(&self) -> u64 {
        read_u64(self.data, 23)
    }
}
