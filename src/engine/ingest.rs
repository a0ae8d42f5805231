//! Ingestion adapter between venue feeds and book workers.
//!
//! Feeds deliver intents keyed by venue-specific symbols with decimal
//! string prices. The adapter resolves the symbol through a [`SymbolMap`]
//! it owns (constructed and injected by the caller), converts numbers to
//! fixed-point, and hands the intent to the instrument's single writer.
//! Instruments never share a worker or a lock.

use std::collections::HashMap;

use tracing::debug;

use crate::config::EngineConfig;
use crate::engine::{BookHandle, BookWorker, IngestError};
use crate::orderbook::LimitOrderBook;
use crate::types::price::to_fixed;
use crate::types::{BookError, Intent, Outcome, Side};

/// Venue symbol -> normalized instrument name, per venue
#[derive(Debug, Clone, Default)]
pub struct SymbolMap {
    venues: HashMap<String, HashMap<String, String>>,
}

impl SymbolMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `raw` on `venue` to `instrument`, replacing any previous mapping
    pub fn insert(&mut self, venue: &str, raw: &str, instrument: &str) {
        self.venues
            .entry(venue.to_string())
            .or_default()
            .insert(raw.to_string(), instrument.to_string());
    }

    /// Builder-style [`SymbolMap::insert`]
    pub fn with(mut self, venue: &str, raw: &str, instrument: &str) -> Self {
        self.insert(venue, raw, instrument);
        self
    }

    pub fn resolve(&self, venue: &str, raw: &str) -> Option<&str> {
        self.venues.get(venue)?.get(raw).map(String::as_str)
    }

    /// True once any symbol is mapped for `venue`
    pub fn populated(&self, venue: &str) -> bool {
        self.venues.get(venue).is_some_and(|symbols| !symbols.is_empty())
    }

    pub fn clear(&mut self) {
        self.venues.clear();
    }
}

/// An intent as decoded from a feed, numbers still in decimal text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedIntent {
    Limit { side: Side, id: u64, price: String, size: String },
    Market { side: Side, id: u64, size: String },
    Cancel { side: Side, id: u64 },
    Amend { side: Side, id: u64, new_size: Option<String>, new_price: Option<String> },
}

impl NormalizedIntent {
    /// Convert to a fixed-point [`Intent`]
    ///
    /// # Errors
    ///
    /// `InvalidOrder` for any number that is not a non-negative decimal.
    pub fn to_intent(&self) -> Result<Intent, BookError> {
        Ok(match self {
            NormalizedIntent::Limit { side, id, price, size } => Intent::Limit {
                side: *side,
                id: *id,
                price: parse(*id, "price", price)?,
                size: parse(*id, "size", size)?,
            },
            NormalizedIntent::Market { side, id, size } => Intent::Market {
                side: *side,
                id: *id,
                size: parse(*id, "size", size)?,
            },
            NormalizedIntent::Cancel { side, id } => Intent::Cancel { side: *side, id: *id },
            NormalizedIntent::Amend { side, id, new_size, new_price } => Intent::Amend {
                side: *side,
                id: *id,
                new_size: new_size.as_deref().map(|s| parse(*id, "size", s)).transpose()?,
                new_price: new_price.as_deref().map(|p| parse(*id, "price", p)).transpose()?,
            },
        })
    }
}

fn parse(id: u64, field: &str, value: &str) -> Result<u64, BookError> {
    to_fixed(value).ok_or_else(|| BookError::InvalidOrder(format!("order {id} has malformed {field} {value:?}")))
}

/// Routes feed intents to one book worker per instrument
pub struct Ingestor {
    symbols: SymbolMap,
    config: EngineConfig,
    workers: HashMap<String, BookWorker>,
}

impl Ingestor {
    pub fn new(symbols: SymbolMap, config: EngineConfig) -> Result<Self, IngestError> {
        config.validate()?;
        Ok(Self {
            symbols,
            config,
            workers: HashMap::new(),
        })
    }

    pub fn symbols(&self) -> &SymbolMap {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolMap {
        &mut self.symbols
    }

    /// Resolve, convert and apply one feed intent
    pub fn route(
        &mut self,
        venue: &str,
        raw_symbol: &str,
        intent: &NormalizedIntent,
    ) -> Result<Outcome, IngestError> {
        let instrument = self
            .symbols
            .resolve(venue, raw_symbol)
            .ok_or_else(|| IngestError::UnknownSymbol {
                venue: venue.to_string(),
                symbol: raw_symbol.to_string(),
            })?
            .to_string();
        let intent = intent.to_intent()?;
        debug!(venue, raw_symbol, instrument = %instrument, ?intent, "routing intent");
        self.handle(&instrument)?.submit(intent)
    }

    /// Handle for `instrument`, starting its worker on first use
    pub fn handle(&mut self, instrument: &str) -> Result<BookHandle, IngestError> {
        if let Some(worker) = self.workers.get(instrument) {
            return Ok(worker.handle());
        }
        let worker = BookWorker::spawn(instrument, &self.config)?;
        let handle = worker.handle();
        self.workers.insert(instrument.to_string(), worker);
        Ok(handle)
    }

    /// Instruments with a running worker, sorted
    pub fn instruments(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.workers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Stop every worker and collect the final books
    pub fn shutdown(self) -> Result<HashMap<String, LimitOrderBook>, IngestError> {
        self.workers
            .into_iter()
            .map(|(name, worker)| worker.shutdown().map(|book| (name, book)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::SCALE;

    fn symbols() -> SymbolMap {
        SymbolMap::new()
            .with("coinbase", "BTC-USD", "BTC/USD")
            .with("bybit", "BTCUSD", "BTC/USD")
            .with("bybit", "ETHUSD", "ETH/USD")
    }

    #[test]
    fn test_symbol_map() {
        let mut map = symbols();
        assert_eq!(map.resolve("bybit", "BTCUSD"), Some("BTC/USD"));
        assert_eq!(map.resolve("coinbase", "BTCUSD"), None);
        assert!(map.populated("bybit"));
        assert!(!map.populated("ftx"));
        map.clear();
        assert!(!map.populated("bybit"));
    }

    #[test]
    fn test_to_intent_converts_decimals() {
        let intent = NormalizedIntent::Limit {
            side: Side::Bid,
            id: 4,
            price: "100.5".into(),
            size: "0.25".into(),
        };
        assert_eq!(
            intent.to_intent().unwrap(),
            Intent::Limit {
                side: Side::Bid,
                id: 4,
                price: 100 * SCALE + SCALE / 2,
                size: SCALE / 4,
            }
        );

        let amend = NormalizedIntent::Amend {
            side: Side::Ask,
            id: 4,
            new_size: None,
            new_price: Some("1".into()),
        };
        assert_eq!(
            amend.to_intent().unwrap(),
            Intent::Amend { side: Side::Ask, id: 4, new_size: None, new_price: Some(SCALE) }
        );
    }

    #[test]
    fn test_to_intent_rejects_malformed() {
        let intent = NormalizedIntent::Market { side: Side::Bid, id: 4, size: "lots".into() };
        assert!(matches!(intent.to_intent(), Err(BookError::InvalidOrder(_))));
    }

    #[test]
    fn test_route_shares_instrument_across_venues() {
        let mut ingestor = Ingestor::new(symbols(), EngineConfig::default()).unwrap();

        ingestor
            .route(
                "coinbase",
                "BTC-USD",
                &NormalizedIntent::Limit { side: Side::Ask, id: 1, price: "100".into(), size: "2".into() },
            )
            .unwrap();
        let outcome = ingestor
            .route("bybit", "BTCUSD", &NormalizedIntent::Market { side: Side::Bid, id: 2, size: "1".into() })
            .unwrap();
        assert!(matches!(outcome, Outcome::Executed(ref r) if r.matched == SCALE));

        ingestor
            .route(
                "bybit",
                "ETHUSD",
                &NormalizedIntent::Limit { side: Side::Bid, id: 1, price: "10".into(), size: "1".into() },
            )
            .unwrap();
        assert_eq!(ingestor.instruments(), vec!["BTC/USD", "ETH/USD"]);

        let books = ingestor.shutdown().unwrap();
        assert_eq!(books["BTC/USD"].depth_at(Side::Ask, 100 * SCALE), SCALE);
        assert_eq!(books["ETH/USD"].best_bid(), Some(10 * SCALE));
    }

    #[test]
    fn test_route_unknown_symbol() {
        let mut ingestor = Ingestor::new(symbols(), EngineConfig::default()).unwrap();
        let err = ingestor
            .route("ftx", "BTC-PERP", &NormalizedIntent::Cancel { side: Side::Bid, id: 1 })
            .unwrap_err();
        assert_eq!(
            err,
            IngestError::UnknownSymbol { venue: "ftx".into(), symbol: "BTC-PERP".into() }
        );
        assert!(ingestor.instruments().is_empty());
    }
}
