//! Replay a synthetic ITCH buffer through the decoder into an order book
//!
//! Builds a handful of Add Order / Order Executed records for one symbol,
//! streams them through the parser, and prints the resulting book state.
//!
//! Run with: `cargo run --example itch_replay`

use anyhow::Result;
use lob::{BookConfig, ItchBookAdapter};
use tracing::info;

fn header(buf: &mut Vec<u8>, kind: u8, ts_ns: u64) {
    buf.push(kind);
    buf.extend_from_slice(&1u16.to_be_bytes()); // stock_locate
    buf.extend_from_slice(&0u16.to_be_bytes()); // tracking_number
    buf.extend_from_slice(&ts_ns.to_be_bytes()[2..]); // 48-bit timestamp
}

fn add_order(buf: &mut Vec<u8>, ts_ns: u64, order_ref: u64, side: u8, shares: u32, price_ticks: u32) {
    header(buf, b'A', ts_ns);
    buf.extend_from_slice(&order_ref.to_be_bytes());
    buf.push(side);
    buf.extend_from_slice(&shares.to_be_bytes());
    buf.extend_from_slice(b"AAPL    ");
    buf.extend_from_slice(&price_ticks.to_be_bytes());
}

fn order_executed(buf: &mut Vec<u8>, ts_ns: u64, order_ref: u64, shares: u32, match_number: u64) {
    header(buf, b'E', ts_ns);
    buf.extend_from_slice(&order_ref.to_be_bytes());
    buf.extend_from_slice(&shares.to_be_bytes());
    buf.extend_from_slice(&match_number.to_be_bytes());
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // One morning's worth of toy flow: build both sides, cross once,
    // then apply an exchange execution against a resting order
    let mut feed = Vec::new();
    let t0 = 34_200_000_000_000u64; // 09:30:00
    add_order(&mut feed, t0, 1, b'B', 100, 1_000_000); // bid 100 @ 100.0000
    add_order(&mut feed, t0 + 1_000, 2, b'B', 50, 999_900); // bid 50 @ 99.9900
    add_order(&mut feed, t0 + 2_000, 3, b'S', 80, 1_000_500); // ask 80 @ 100.0500
    add_order(&mut feed, t0 + 3_000, 4, b'S', 60, 1_000_000); // crosses the bid
    order_executed(&mut feed, t0 + 4_000, 1, 20, 9001); // exchange fill on order 1

    let mut adapter = ItchBookAdapter::new(
        "AAPL",
        &BookConfig {
            pool_capacity: 1024,
            level_capacity: 64,
        },
    )?;

    let consumed = itch::parse_stream(&feed, &mut adapter);
    info!("consumed {consumed} of {} feed bytes", feed.len());

    for exec in adapter.drain_executions() {
        info!("{exec}");
    }

    let book = adapter.book();
    let stats = adapter.stats();
    println!("messages: {stats:?}");
    println!(
        "best bid: {} x {}",
        book.best_bid().map_or_else(|| "-".into(), |p| p.to_string()),
        book.best_bid_volume()
    );
    println!(
        "best ask: {} x {}",
        book.best_ask().map_or_else(|| "-".into(), |p| p.to_string()),
        book.best_ask_volume()
    );
    println!(
        "spread: {} ticks, {} resting orders across {} bid / {} ask levels",
        book.spread().map_or_else(|| "-".into(), |s| s.to_string()),
        book.order_count(),
        book.bid_level_count(),
        book.ask_level_count()
    );

    Ok(())
}
