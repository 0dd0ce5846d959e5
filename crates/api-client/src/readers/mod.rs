//! One reader per upstream resource. Each reader turns one call into exactly
//! one GET request and hands back the parsed JSON untouched.

use crate::error::ApiError;

pub mod directory;
pub mod historical;
pub mod symbol;
pub mod technical_indicators;

pub use directory::SymbolDirectoryReader;
pub use historical::HistoricalDataReader;
pub use symbol::SymbolDataReader;
pub use technical_indicators::{
    DEFAULT_MA_PERIODS, IndicatorQuery, Periods, TechnicalIndicatorsReader,
};

/// Trims `symbol`, rejecting it when nothing is left.
pub(crate) fn normalize_symbol(symbol: &str) -> Result<&str, ApiError> {
    let normalized = symbol.trim();
    if normalized.is_empty() {
        return Err(ApiError::Validation("symbol must be a non-empty string"));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_trimmed() {
        assert_eq!(normalize_symbol("  TCS\n").unwrap(), "TCS");
    }

    #[test]
    fn blank_symbols_are_rejected() {
        for symbol in ["", " ", "\t\n"] {
            assert!(matches!(normalize_symbol(symbol), Err(ApiError::Validation(_))));
        }
    }
}
