use crate::client::{ClientHandle, EquityMarketClient};
use crate::error::ApiError;
use crate::readers::normalize_symbol;
use serde_json::Value;

/// Reads price history from `GET /api/equity/historical/{symbol}`.
pub struct HistoricalDataReader<'a> {
    client: ClientHandle<'a>,
}

impl<'a> HistoricalDataReader<'a> {
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

    /// Fetches the series between `date_start` and `date_end`.
    ///
    /// The dates are forwarded verbatim; their format is the service's concern.
    pub async fn fetch_history(
        &self,
        symbol: &str,
        date_start: &str,
        date_end: &str,
    ) -> Result<Value, ApiError> {
        let symbol = normalize_symbol(symbol)?;
        if date_start.is_empty() || date_end.is_empty() {
            return Err(ApiError::Validation("date_start and date_end are required"));
        }

        let params = [
            ("dateStart", date_start.to_string()),
            ("dateEnd", date_end.to_string()),
        ];
        self.client()
            .get_json(&format!("/api/equity/historical/{symbol}"), &params)
            .await
    }

    pub fn close(self) {
        self.client.release();
    }
}
