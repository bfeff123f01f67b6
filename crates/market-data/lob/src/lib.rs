//! Limit order book with price-time-priority matching
//!
//! The book is a deterministic, single-threaded matching core:
//!
//! - Orders live in a pre-allocated pool; nothing on the trading path
//!   touches the heap.
//! - Each price level keeps its resting orders in a FIFO queue threaded
//!   through linkage slots inside the order records, so cancellation
//!   unlinks in O(1) without scanning the level.
//! - Sides are sorted vectors of price levels (bids descending, asks
//!   ascending) for cache-friendly best-price iteration.
//!
//! Cross-thread sharing of a book is not supported; pin one book per
//! symbol to one thread and feed it in arrival order.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod adapter;
pub mod book;
pub mod config;
pub mod events;
pub mod level;
pub mod pool;
pub mod queue;

pub use adapter::{AdapterStats, FeedError, ItchBookAdapter};
pub use book::OrderBook;
pub use config::BookConfig;
pub use events::Execution;
pub use level::PriceLevel;
pub use pool::{Order, OrderHandle, OrderPool};
pub use queue::OrderQueue;
