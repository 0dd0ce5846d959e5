use crate::client::{ClientHandle, EquityMarketClient};
use crate::error::ApiError;
use crate::readers::normalize_symbol;
use serde_json::Value;

/// Moving-average windows requested when the caller does not choose any.
pub const DEFAULT_MA_PERIODS: [u32; 6] = [5, 10, 20, 50, 100, 200];

/// A list of indicator windows, either already rendered (`"5,10,20"`) or as numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Periods {
    Formatted(String),
    Windows(Vec<u32>),
}

impl Periods {
    /// The comma-separated form the service expects. Preformatted input is
    /// returned unchanged.
    pub fn format(&self) -> String {
        match self {
            Periods::Formatted(formatted) => formatted.clone(),
            Periods::Windows(windows) => windows
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl Default for Periods {
    fn default() -> Self {
        Periods::Windows(DEFAULT_MA_PERIODS.to_vec())
    }
}

impl From<&str> for Periods {
    fn from(formatted: &str) -> Self {
        Periods::Formatted(formatted.to_string())
    }
}

impl From<String> for Periods {
    fn from(formatted: String) -> Self {
        Periods::Formatted(formatted)
    }
}

impl From<Vec<u32>> for Periods {
    fn from(windows: Vec<u32>) -> Self {
        Periods::Windows(windows)
    }
}

impl From<&[u32]> for Periods {
    fn from(windows: &[u32]) -> Self {
        Periods::Windows(windows.to_vec())
    }
}

impl<const N: usize> From<[u32; N]> for Periods {
    fn from(windows: [u32; N]) -> Self {
        Periods::Windows(windows.to_vec())
    }
}

/// Query parameters for `GET /api/equity/technicalIndicators/{symbol}`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorQuery {
    /// Number of trailing sessions the indicators are computed over.
    pub period: u32,
    pub sma_periods: Periods,
    pub ema_periods: Periods,
    pub rsi_period: u32,
    /// Bollinger Bands window.
    pub bb_period: u32,
    /// Bollinger Bands width in standard deviations.
    pub bb_std_dev: f64,
    /// Ask the service for the most recent point only instead of the full series.
    pub show_only_latest: bool,
}

impl Default for IndicatorQuery {
    fn default() -> Self {
        Self {
            period: 200,
            sma_periods: Periods::default(),
            ema_periods: Periods::default(),
            rsi_period: 14,
            bb_period: 20,
            bb_std_dev: 2.0,
            show_only_latest: true,
        }
    }
}

impl IndicatorQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("period", self.period.to_string()),
            ("smaPeriods", self.sma_periods.format()),
            ("emaPeriods", self.ema_periods.format()),
            ("rsiPeriod", self.rsi_period.to_string()),
            ("bbPeriod", self.bb_period.to_string()),
            ("bbStdDev", self.bb_std_dev.to_string()),
            ("showOnlyLatest", self.show_only_latest.to_string()),
        ]
    }
}

/// Reads computed indicators (moving averages, RSI, Bollinger Bands) for a symbol.
pub struct TechnicalIndicatorsReader<'a> {
    client: ClientHandle<'a>,
}

impl<'a> TechnicalIndicatorsReader<'a> {
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

    pub async fn fetch_indicators(
        &self,
        symbol: &str,
        query: &IndicatorQuery,
    ) -> Result<Value, ApiError> {
        let symbol = normalize_symbol(symbol)?;
        self.client()
            .get_json(
                &format!("/api/equity/technicalIndicators/{symbol}"),
                &query.to_params(),
            )
            .await
    }

    /// Renders a period list as the comma-separated string the service expects.
    pub fn format_periods(periods: impl Into<Periods>) -> String {
        periods.into().format()
    }

    pub fn close(self) {
        self.client.release();
    }
}
