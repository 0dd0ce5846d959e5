use crate::client::{ClientHandle, EquityMarketClient};
use crate::error::ApiError;
use serde_json::Value;

/// Reads the list of every symbol the service knows from `GET /api/allSymbols`.
pub struct SymbolDirectoryReader<'a> {
    client: ClientHandle<'a>,
}

impl<'a> SymbolDirectoryReader<'a> {
    pub fn new(client: impl Into<ClientHandle<'a>>) -> Self {
        Self {
            client: client.into(),
        }
    }

    pub fn with_default_client() -> Result<Self, ApiError> {
        Ok(Self {
            client: ClientHandle::connect_default()?,
        })
    }

    pub fn client(&self) -> &EquityMarketClient {
        self.client.client()
    }

    pub async fn fetch_all_symbols(&self) -> Result<Value, ApiError> {
        self.client().get_json("/api/allSymbols", &[]).await
    }

    pub fn close(self) {
        self.client.release();
    }
}
