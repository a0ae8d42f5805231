//! Fixed-point price and size conversion.
//!
//! Feeds deliver prices and sizes as decimal strings; the book works on
//! u64 values scaled by 10^8. Conversion goes through `rust_decimal` so
//! no floating point is involved.
//!
//! ```
//! use lob_core::types::price::{to_fixed, from_fixed};
//!
//! let price = to_fixed("100.01").unwrap();
//! assert_eq!(price, 10_001_000_000);
//! assert_eq!(from_fixed(price), "100.01000000");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point arithmetic: 10^8
pub const SCALE: u64 = 100_000_000;

/// Convert a decimal string to fixed-point u64
///
/// Returns `None` for unparsable, negative or out-of-range input.
/// Digits beyond the eighth decimal place are rounded (banker's rounding).
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s.trim()).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal to fixed-point u64
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    scaled.round_dp(0).to_u64()
}

/// Convert fixed-point u64 to a Decimal
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Render with exactly 8 decimal places
pub fn from_fixed(value: u64) -> String {
    format!("{:.8}", fixed_to_decimal(value))
}

/// Render without trailing zeros
///
/// ```
/// use lob_core::types::price::from_fixed_trimmed;
///
/// assert_eq!(from_fixed_trimmed(150_000_000), "1.5");
/// ```
pub fn from_fixed_trimmed(value: u64) -> String {
    fixed_to_decimal(value).normalize().to_string()
}
