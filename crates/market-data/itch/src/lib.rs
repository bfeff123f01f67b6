//! Zero-copy NASDAQ TotalView-ITCH 5.0 message decoder
//!
//! ITCH records are fixed-layout, byte-packed, big-endian. This crate parses
//! them as read-only overlays directly out of a receive buffer: no copies,
//! no allocation, no per-field validation. Dispatch is a single table lookup
//! on the message-type byte.
//!
//! The decoder is structural only. Field values are handed to the sink
//! exactly as decoded; semantic validation (non-zero quantities, known
//! symbols) belongs to the consumer.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod endian;
pub mod messages;
pub mod parser;

pub use messages::{msg_type, AddOrder, MessageHeader, OrderExecuted, StockSymbol};
pub use parser::{message_length, parse_one, parse_stream, ItchSink, NullSink, ParseResult};
