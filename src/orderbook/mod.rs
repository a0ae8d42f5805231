//! Order book data structures.
//!
//! ## Architecture
//!
//! - **Slab-based storage**: O(1) order insertion, removal, and lookup
//! - **Price levels**: FIFO queues indexed by price in a BTreeMap
//! - **Price-time priority**: best price first, oldest order first within a price
//!
//! ## Components
//!
//! - [`OrderNode`]: an `Order` plus its level key and linked-list pointers
//! - [`PriceLevel`]: FIFO queue of orders at a single price
//! - [`BookSide`]: ordered price index, order-id index and cached extremes
//! - [`LimitOrderBook`]: bid and ask sides plus intent routing
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Add at existing level | O(1) |
//! | Add at new level | O(log M) |
//! | Cancel | O(1), O(log M) if the level empties |
//! | Best bid/ask | O(1) |
//! | Market order | O(fills + exhausted levels * log M) |
//!
//! ## Example
//!
//! ```
//! use lob_core::orderbook::LimitOrderBook;
//! use lob_core::types::Side;
//!
//! let mut book = LimitOrderBook::with_capacity(1_000);
//! book.submit_limit(Side::Bid, 1, 10_000, 100).unwrap();
//! book.submit_limit(Side::Bid, 2, 10_001, 100).unwrap();
//! book.submit_limit(Side::Bid, 3, 10_001, 100).unwrap();
//!
//! assert_eq!(book.best_bid(), Some(10_001));
//! assert_eq!(book.depth_at(Side::Bid, 10_001), 200);
//! ```

pub mod book;
pub mod level;
pub mod node;
pub mod side;
pub mod snapshot;

pub use book::LimitOrderBook;
pub use level::PriceLevel;
pub use node::OrderNode;
pub use side::BookSide;
pub use snapshot::{BookSnapshot, LevelView};
