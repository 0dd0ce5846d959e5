//! Batch helpers that fan one client out over several readers and symbols.
//!
//! Every function takes anything convertible into a [`ClientHandle`]: pass
//! `&client` to keep the client open for further calls, or an owned client
//! (e.g. `ClientHandle::connect(url)?`) to have it closed before returning.

use crate::client::ClientHandle;
use crate::error::ApiError;
use crate::readers::{
    HistoricalDataReader, IndicatorQuery, SymbolDataReader, TechnicalIndicatorsReader,
};
use serde_json::{Map, Value, json};

/// Message placed in the per-symbol error entry of an indicators batch.
pub const INDICATORS_FAILURE_MESSAGE: &str = "Failed to fetch technical indicators.";

/// Fetches the snapshot of a single symbol.
pub async fn fetch_symbol_data<'a>(
    symbol: &str,
    client: impl Into<ClientHandle<'a>>,
) -> Result<Value, ApiError> {
    let reader = SymbolDataReader::new(client);
    let result = reader.fetch_symbol(symbol).await;
    reader.close();
    result
}

/// Fetches the snapshot of every symbol. The first failure aborts the batch.
pub async fn fetch_symbols_data<'a, I, S>(
    symbols: I,
    client: impl Into<ClientHandle<'a>>,
) -> Result<Map<String, Value>, ApiError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let reader = SymbolDataReader::new(client);
    let result = reader.fetch_symbols(symbols).await;
    reader.close();
    result
}

/// Fetches the history of every symbol between two dates. The first failure
/// aborts the batch.
pub async fn fetch_historical_data<'a, I, S>(
    symbols: I,
    start_date: &str,
    end_date: &str,
    client: impl Into<ClientHandle<'a>>,
) -> Result<Map<String, Value>, ApiError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let reader = HistoricalDataReader::new(client);
    let result = collect_history(&reader, symbols, start_date, end_date).await;
    reader.close();
    result
}

async fn collect_history<I, S>(
    reader: &HistoricalDataReader<'_>,
    symbols: I,
    start_date: &str,
    end_date: &str,
) -> Result<Map<String, Value>, ApiError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut results = Map::new();
    for symbol in symbols {
        let symbol = symbol.as_ref();
        let history = reader.fetch_history(symbol, start_date, end_date).await?;
        results.insert(symbol.to_string(), history);
    }
    Ok(results)
}

/// Fetches indicators for every symbol with the default query.
///
/// Unlike the other batches, a symbol the service answers with an error
/// status does not abort the run: its entry becomes
/// `{"error", "status_code", "details"}` and the remaining symbols are still
/// fetched. Validation and transport failures abort as usual.
pub async fn fetch_technical_indicators_data<'a, I, S>(
    symbols: I,
    client: impl Into<ClientHandle<'a>>,
) -> Result<Map<String, Value>, ApiError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fetch_technical_indicators_data_with(symbols, client, &IndicatorQuery::default()).await
}

/// [`fetch_technical_indicators_data`] with an explicit query.
pub async fn fetch_technical_indicators_data_with<'a, I, S>(
    symbols: I,
    client: impl Into<ClientHandle<'a>>,
    query: &IndicatorQuery,
) -> Result<Map<String, Value>, ApiError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let reader = TechnicalIndicatorsReader::new(client);
    let result = collect_indicators(&reader, symbols, query).await;
    reader.close();
    result
}

async fn collect_indicators<I, S>(
    reader: &TechnicalIndicatorsReader<'_>,
    symbols: I,
    query: &IndicatorQuery,
) -> Result<Map<String, Value>, ApiError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut results = Map::new();
    for symbol in symbols {
        let symbol = symbol.as_ref();
        let entry = match reader.fetch_indicators(symbol, query).await {
            Ok(indicators) => indicators,
            Err(ApiError::Http { status, body, .. }) => {
                tracing::warn!(
                    symbol,
                    status = %status,
                    "Technical indicators unavailable; recording the failure."
                );
                json!({
                    "error": INDICATORS_FAILURE_MESSAGE,
                    "status_code": status.as_u16(),
                    "details": body,
                })
            }
            Err(e) => return Err(e),
        };
        results.insert(symbol.to_string(), entry);
    }
    Ok(results)
}
