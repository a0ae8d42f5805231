//! Deterministic encoding of resting state.
//!
//! ## SSZ Serialization
//!
//! Each resting order is encoded as a fixed-size SSZ container
//! (little-endian fields, no padding), so two books holding the same
//! orders in the same positions produce byte-identical encodings.
//! The state root is the SHA-256 of those bytes taken in book order.

use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

use crate::types::{BookError, Order};

/// Encoded view of one resting order
///
/// ## SSZ Layout
///
/// 8 (id) + 1 (side) + 8 (price) + 8 (remaining) + 8 (sequence) = 33 bytes
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct RestingRecord {
    pub id: u64,
    pub side_raw: u8,
    pub price: u64,
    pub remaining: u64,
    pub sequence: u64,
}

impl RestingRecord {
    /// Snapshot a resting order; market orders never rest so price is always set
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: order.id(),
            side_raw: order.side().to_u8(),
            price: order.price().unwrap_or_default(),
            remaining: order.remaining,
            sequence: order.sequence(),
        }
    }

    /// SSZ bytes for this record
    pub fn encode(&self) -> Result<Vec<u8>, BookError> {
        ssz_rs::serialize(self).map_err(|e| BookError::Encoding(format!("{e:?}")))
    }
}

/// Incremental SHA-256 over encoded records
#[derive(Default)]
pub struct StateHasher {
    hasher: Sha256,
    records: u64,
}

impl StateHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one order into the hash
    pub fn update(&mut self, order: &Order) -> Result<(), BookError> {
        let bytes = RestingRecord::from_order(order).encode()?;
        self.hasher.update(&bytes);
        self.records += 1;
        Ok(())
    }

    /// Number of records hashed so far
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Finish and return the 32-byte root
    pub fn finalize(self) -> [u8; 32] {
        let result = self.hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }
}

/// Render a state root as lowercase hex
pub fn root_hex(root: &[u8; 32]) -> String {
    hex::encode(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    #[test]
    fn test_record_ssz_size() {
        let order = Order::limit(1, Side::Bid, 10_000, 100, 4).unwrap();
        let bytes = RestingRecord::from_order(&order).encode().unwrap();
        assert_eq!(bytes.len(), 33, "RestingRecord should serialize to 33 bytes");
    }

    #[test]
    fn test_record_ssz_roundtrip() {
        let order = Order::limit(42, Side::Ask, 10_001, 5, 8).unwrap();
        let record = RestingRecord::from_order(&order);
        let bytes = record.encode().unwrap();
        let back: RestingRecord = ssz_rs::deserialize(&bytes).expect("Failed to deserialize");
        assert_eq!(record, back);
        assert_eq!(back.side_raw, Side::Ask.to_u8());
    }

    #[test]
    fn test_hasher_determinism() {
        let a = Order::limit(1, Side::Bid, 10_000, 100, 0).unwrap();
        let b = Order::limit(2, Side::Bid, 10_000, 100, 1).unwrap();

        let mut h1 = StateHasher::new();
        h1.update(&a).unwrap();
        h1.update(&b).unwrap();
        assert_eq!(h1.records(), 2);

        let mut h2 = StateHasher::new();
        h2.update(&a).unwrap();
        h2.update(&b).unwrap();
        assert_eq!(h1.finalize(), h2.finalize());

        // Order of records matters
        let mut h3 = StateHasher::new();
        h3.update(&b).unwrap();
        h3.update(&a).unwrap();
        let mut h4 = StateHasher::new();
        h4.update(&a).unwrap();
        h4.update(&b).unwrap();
        assert_ne!(h3.finalize(), h4.finalize());
    }

    #[test]
    fn test_root_hex() {
        let hex = root_hex(&StateHasher::new().finalize());
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
