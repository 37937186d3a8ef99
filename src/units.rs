//! Base-unit amount formatting
//!
//! Balances arrive as integer MIST (1 SUI = 10^9 MIST) and are rendered with a
//! fixed 9-decimal divisor regardless of coin type.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Decimals of the smallest-unit convention
pub const DISPLAY_DECIMALS: u32 = 9;

/// Base units per whole coin
pub const BASE_UNITS_PER_COIN: u128 = 1_000_000_000;

/// How a base-unit amount is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BalanceFormat {
    /// Whole coins only, fractional part dropped: `1_500_000_000` -> `"1"`
    #[default]
    Truncated,
    /// All nine decimals: `1_000_000_000` -> `"1.000000000"`
    Fixed,
    /// Full precision without trailing zeros: `1_500_000_000` -> `"1.5"`
    Trimmed,
}

/// Render a base-unit amount
pub fn format_base_units(amount: u128, format: BalanceFormat) -> String {
    let whole = amount / BASE_UNITS_PER_COIN;
    let remainder = amount % BASE_UNITS_PER_COIN;

    match format {
        BalanceFormat::Truncated => whole.to_string(),
        BalanceFormat::Fixed => format!(
            "{}.{:0>width$}",
            whole,
            remainder,
            width = DISPLAY_DECIMALS as usize
        ),
        BalanceFormat::Trimmed => {
            if remainder == 0 {
                return whole.to_string();
            }
            let remainder_str = format!("{:0>width$}", remainder, width = DISPLAY_DECIMALS as usize);
            format!("{}.{}", whole, remainder_str.trim_end_matches('0'))
        }
    }
}

/// Parse a decimal base-unit string as returned by the chain
pub fn parse_base_units(raw: &str) -> Result<u128> {
    raw.trim()
        .parse()
        .map_err(|e| Error::Rpc(format!("Invalid base-unit amount {:?}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated() {
        assert_eq!(format_base_units(1_000_000_000, BalanceFormat::Truncated), "1");
        assert_eq!(format_base_units(1_999_999_999, BalanceFormat::Truncated), "1");
        assert_eq!(format_base_units(5_000_000_000, BalanceFormat::Truncated), "5");
        assert_eq!(format_base_units(999_999_999, BalanceFormat::Truncated), "0");
        assert_eq!(format_base_units(0, BalanceFormat::Truncated), "0");
    }

    #[test]
    fn test_fixed() {
        assert_eq!(format_base_units(1_000_000_000, BalanceFormat::Fixed), "1.000000000");
        assert_eq!(format_base_units(1_000_000, BalanceFormat::Fixed), "0.001000000");
        assert_eq!(format_base_units(1, BalanceFormat::Fixed), "0.000000001");
        assert_eq!(format_base_units(0, BalanceFormat::Fixed), "0.000000000");
    }

    #[test]
    fn test_trimmed() {
        assert_eq!(format_base_units(1_000_000_000, BalanceFormat::Trimmed), "1");
        assert_eq!(format_base_units(1_500_000_000, BalanceFormat::Trimmed), "1.5");
        assert_eq!(format_base_units(1_000_000, BalanceFormat::Trimmed), "0.001");
        assert_eq!(format_base_units(0, BalanceFormat::Trimmed), "0");
    }

    #[test]
    fn test_formats_agree_on_whole_part() {
        for amount in [0u128, 1, 999_999_999, 1_000_000_000, 12_345_678_901_234] {
            let truncated = format_base_units(amount, BalanceFormat::Truncated);
            let fixed = format_base_units(amount, BalanceFormat::Fixed);
            let trimmed = format_base_units(amount, BalanceFormat::Trimmed);
            assert_eq!(fixed.split('.').next(), Some(truncated.as_str()));
            assert_eq!(trimmed.split('.').next(), Some(truncated.as_str()));
        }
    }

    #[test]
    fn test_parse_base_units() {
        assert_eq!(parse_base_units("5000000000").unwrap(), 5_000_000_000);
        assert!(matches!(parse_base_units("1.5"), Err(Error::Rpc(_))));
    }
}
