//! # Equity market-data client
//!
//! A thin async client for the equity market-data HTTP service.
//!
//! - [`EquityMarketClient`] issues GET requests and decodes JSON bodies.
//! - The readers translate one domain fetch (snapshot, history, indicators,
//!   symbol directory) into one request.
//! - The [`fetch`] helpers run readers over lists of symbols.
//!
//! Responses are returned as `serde_json::Value` exactly as the service sent
//! them; their shape is not validated here.

pub mod client;
pub mod error;
pub mod fetch;
pub mod readers;

// --- Public API ---
pub use client::{ClientHandle, EquityMarketClient};
pub use error::ApiError;
pub use fetch::{
    INDICATORS_FAILURE_MESSAGE, fetch_historical_data, fetch_symbol_data, fetch_symbols_data,
    fetch_technical_indicators_data, fetch_technical_indicators_data_with,
};
pub use readers::{
    HistoricalDataReader, IndicatorQuery, Periods, SymbolDataReader, SymbolDirectoryReader,
    TechnicalIndicatorsReader,
};
