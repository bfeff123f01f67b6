//! Core types for the TickForge market-data core
//!
//! Fixed-point prices and integer quantities keep every book operation
//! deterministic; no floating point is used anywhere on the data path.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod types;

pub use types::{OrderId, Px, Qty, Side, Ts};
