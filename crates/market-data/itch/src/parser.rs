//! Stateless ITCH decoder and dispatcher
//!
//! A single byte selects the message type; a 256-entry table maps it to the
//! on-wire record length, so stream parsing never branches through chained
//! comparisons and structurally-unmodeled records can still be skipped by
//! their exact length.

use crate::messages::{msg_type, AddOrder, MessageHeader, OrderExecuted};

/// Outcome of decoding a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseResult {
    /// A full record was decoded and dispatched
    Ok,
    /// The buffer ends before the record does
    BufferTooSmall,
    /// The leading type byte has no tabulated length
    UnknownType,
}

/// On-wire lengths per ITCH 5.0, indexed by the message-type byte
///
/// `S` is tabulated at the 11-byte header we model; every byte with no
/// tabulated length maps to 0.
const MESSAGE_LENGTHS: [u8; 256] = {
    let mut table = [0u8; 256];
    table[msg_type::SYSTEM_EVENT as usize] = 11;
    table[msg_type::STOCK_DIRECTORY as usize] = 39;
    table[msg_type::STOCK_TRADING_ACTION as usize] = 25;
    table[msg_type::REG_SHO_RESTRICTION as usize] = 20;
    table[msg_type::MARKET_PARTICIPANT_POSITION as usize] = 26;
    table[msg_type::MWCB_DECLINE_LEVEL as usize] = 35;
    table[msg_type::MWCB_STATUS as usize] = 12;
    table[msg_type::IPO_QUOTING_PERIOD as usize] = 28;
    table[msg_type::ADD_ORDER as usize] = 36;
    table[msg_type::ADD_ORDER_MPID as usize] = 40;
    table[msg_type::ORDER_EXECUTED as usize] = 31;
    table[msg_type::ORDER_EXECUTED_WITH_PRICE as usize] = 36;
    table[msg_type::ORDER_CANCEL as usize] = 23;
    table[msg_type::ORDER_DELETE as usize] = 19;
    table[msg_type::ORDER_REPLACE as usize] = 35;
    table[msg_type::TRADE as usize] = 44;
    table[msg_type::CROSS_TRADE as usize] = 40;
    table[msg_type::BROKEN_TRADE as usize] = 19;
    table[msg_type::NOII as usize] = 50;
    table[msg_type::RPII as usize] = 20;
    table
};

/// Wire length for a message-type byte; 0 means unknown
///
/// Total over all 256 possible bytes.
#[inline]
#[must_use]
pub fn message_length(kind: u8) -> usize {
    MESSAGE_LENGTHS[kind as usize] as usize
}

/// Receiver of decoded messages
///
/// One hook per modeled type plus a fallback for everything the length
/// table covers but the crate does not model structurally. All hooks
/// default to no-ops so a sink overrides only what it consumes. Overlays
/// alias the caller's buffer and must not be retained past the call.
pub trait ItchSink {
    /// System Event (`S`), delivered as the bare 11-byte header
    fn on_system_event(&mut self, _msg: &MessageHeader<'_>) {}

    /// Add Order (`A`)
    fn on_add_order(&mut self, _msg: &AddOrder<'_>) {}

    /// Order Executed (`E`)
    fn on_order_executed(&mut self, _msg: &OrderExecuted<'_>) {}

    /// Any record without a structural view: tabulated types carry exactly
    /// the record bytes, unknown types the unconsumed suffix
    fn on_unknown(&mut self, _kind: u8, _data: &[u8]) {}
}

/// Sink that discards every message
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ItchSink for NullSink {}

/// Decode one record from the front of `buf` and dispatch it to `sink`
///
/// Purely structural: the type byte selects a tabulated length, the buffer
/// must hold at least that many bytes, and the typed view (or the unknown
/// fallback) is handed to the sink. Field values are never range-checked
/// here. Never allocates.
pub fn parse_one<S: ItchSink>(buf: &[u8], sink: &mut S) -> ParseResult {
    let Some(&kind) = buf.first() else {
        return ParseResult::BufferTooSmall;
    };

    let len = message_length(kind);
    if len == 0 {
        sink.on_unknown(kind, buf);
        return ParseResult::UnknownType;
    }
    if buf.len() < len {
        return ParseResult::BufferTooSmall;
    }

    let record = &buf[..len];
    match kind {
        msg_type::SYSTEM_EVENT => sink.on_system_event(&MessageHeader::new(record)),
        msg_type::ADD_ORDER => sink.on_add_order(&AddOrder::new(record)),
        msg_type::ORDER_EXECUTED => sink.on_order_executed(&OrderExecuted::new(record)),
        _ => sink.on_unknown(kind, record),
    }
    ParseResult::Ok
}

/// Decode records from `buf` until it is exhausted or a record cannot be
/// completed, returning the number of bytes consumed
///
/// Stops cleanly at the first incomplete or unknown-length record; the
/// caller may inspect the suffix at the returned offset (e.g. to carry a
/// partial record into the next receive).
pub fn parse_stream<S: ItchSink>(buf: &[u8], sink: &mut S) -> usize {
    let mut consumed = 0;
    while consumed < buf.len() {
        let rest = &buf[consumed..];
        match parse_one(rest, sink) {
            ParseResult::Ok => consumed += message_length(rest[0]),
            ParseResult::BufferTooSmall | ParseResult::UnknownType => break,
        }
    }
    consumed
}
