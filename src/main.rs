//! lob-core demo binary
//!
//! Replays a short scripted session through the ingestion adapter and
//! prints the resulting book.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lob_core::types::price::from_fixed_trimmed;
use lob_core::{EngineConfig, Ingestor, NormalizedIntent, Outcome, Side, SymbolMap};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lob_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run() {
        error!(error = %e, "demo session failed");
        std::process::exit(1);
    }
}

fn run() -> Result<(), lob_core::IngestError> {
    let symbols = SymbolMap::new()
        .with("coinbase", "BTC-USD", "BTC/USD")
        .with("bybit", "BTCUSD", "BTC/USD");
    let mut ingestor = Ingestor::new(symbols, EngineConfig::default())?;

    let session = [
        ("coinbase", "BTC-USD", limit(Side::Bid, 1, "100.00", "1")),
        ("coinbase", "BTC-USD", limit(Side::Bid, 2, "100.01", "1")),
        ("bybit", "BTCUSD", limit(Side::Bid, 3, "100.01", "1")),
        ("coinbase", "BTC-USD", limit(Side::Ask, 1, "100.05", "2")),
        ("bybit", "BTCUSD", NormalizedIntent::Market { side: Side::Ask, id: 4, size: "1.5".into() }),
        ("coinbase", "BTC-USD", NormalizedIntent::Cancel { side: Side::Bid, id: 1 }),
    ];

    for (venue, symbol, intent) in &session {
        match ingestor.route(venue, symbol, intent)? {
            Outcome::Executed(report) => info!(
                matched = %from_fixed_trimmed(report.matched),
                unfilled = %from_fixed_trimmed(report.unfilled),
                status = ?report.status,
                "market order executed"
            ),
            outcome => info!(?outcome, "intent applied"),
        }
    }

    let handle = ingestor.handle("BTC/USD")?;
    let snapshot = handle.snapshot();
    println!("BTC/USD after {} intents", snapshot.sequence);
    for level in snapshot.asks.iter().rev() {
        println!("  ask {:>12} x {}", from_fixed_trimmed(level.price), from_fixed_trimmed(level.size));
    }
    for level in &snapshot.bids {
        println!("  bid {:>12} x {}", from_fixed_trimmed(level.price), from_fixed_trimmed(level.size));
    }

    for (instrument, book) in ingestor.shutdown()? {
        let root = book.state_root_hex()?;
        info!(instrument = %instrument, orders = book.order_count(), root = %root, "final state");
    }
    Ok(())
}

fn limit(side: Side, id: u64, price: &str, size: &str) -> NormalizedIntent {
    NormalizedIntent::Limit {
        side,
        id,
        price: price.into(),
        size: size.into(),
    }
}
