use crate::client::{ClientHandle, EquityMarketClient};
use crate::error::ApiError;
use crate::readers::normalize_symbol;
use serde_json::{Map, Value};

/// Reads the current snapshot of a symbol from `GET /api/equity/{symbol}`.
pub struct SymbolDataReader<'a> {
    client: ClientHandle<'a>,
}

impl<'a> SymbolDataReader<'a> {
    pub fn new(client: impl Into<ClientHandle<'a>>) -> Self {
        Self {
            client: client.into(),
        }
    }

    /// A reader with its own client pointed at the default local service.
    pub fn with_default_client() -> Result<Self, ApiError> {
        Ok(Self {
            client: ClientHandle::connect_default()?,
        })
    }

    pub fn client(&self) -> &EquityMarketClient {
        self.client.client()
    }

    pub async fn fetch_symbol(&self, symbol: &str) -> Result<Value, ApiError> {
        let symbol = normalize_symbol(symbol)?;
        self.client()
            .get_json(&format!("/api/equity/{symbol}"), &[])
            .await
    }

    /// Fetches every symbol in turn, keyed by the symbol as given.
    /// The first failure aborts the batch.
    pub async fn fetch_symbols<I, S>(&self, symbols: I) -> Result<Map<String, Value>, ApiError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut results = Map::new();
        for symbol in symbols {
            let symbol = symbol.as_ref();
            let data = self.fetch_symbol(symbol).await?;
            results.insert(symbol.to_string(), data);
        }
        Ok(results)
    }

    /// Closes the client if this reader owns it.
    pub fn close(self) {
        self.client.release();
    }
}
