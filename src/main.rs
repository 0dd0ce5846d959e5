use anyhow::Context;
use api_client::{
    ApiError, EquityMarketClient, fetch_historical_data, fetch_symbols_data,
    fetch_technical_indicators_data,
};
use clap::{Parser, Subcommand, ValueEnum};
use database::{Database, check_database_health};
use serde_json::{Map, Value, json};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the equity data tool.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from the .env file, if there is one.
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries nothing but the JSON payload.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch(args) => handle_fetch(args).await,
        Commands::DbHealth => handle_db_health().await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Pulls equity market data from the market-data service and prints it as JSON.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch snapshot, historical and indicator data for a list of symbols.
    Fetch(FetchArgs),
    /// Check that the configured database answers queries.
    DbHealth,
}

#[derive(Parser)]
struct FetchArgs {
    /// Symbols to fetch, comma separated (e.g., "ACC,TCS").
    #[arg(long, value_delimiter = ',', default_values = ["ACC", "TCS", "HDFC", "INFY"])]
    symbols: Vec<String>,

    /// Start of the historical range, forwarded to the service as-is.
    #[arg(long, default_value = "2025-01-01")]
    start: String,

    /// End of the historical range, forwarded to the service as-is.
    #[arg(long, default_value = "2025-12-31")]
    end: String,

    /// Market-data service URL. Overrides EQUITY_API_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds. Overrides EQUITY_API_TIMEOUT_SECONDS.
    #[arg(long)]
    timeout_seconds: Option<f64>,

    /// Which parts of the payload to fetch.
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values = ["symbols", "historical", "technical-indicators"]
    )]
    sections: Vec<Section>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Section {
    Symbols,
    Historical,
    TechnicalIndicators,
}

// ==============================================================================
// Fetch Command Logic
// ==============================================================================

/// Builds one client, runs the selected batches with it and prints the result.
async fn handle_fetch(args: FetchArgs) -> anyhow::Result<()> {
    let settings = configuration::load_equity_api_settings()?
        .with_overrides(args.base_url, args.timeout_seconds)?;
    tracing::info!(
        base_url = settings.base_url(),
        symbols = ?args.symbols,
        start = %args.start,
        end = %args.end,
        "Fetching equity data."
    );

    let client = EquityMarketClient::from_settings(&settings)?;
    let payload =
        build_payload(&client, &args.symbols, &args.start, &args.end, &args.sections).await;
    client.close();
    let payload = payload.context("Failed to fetch equity data")?;

    println!("{}", serde_json::to_string_pretty(&Value::Object(payload))?);
    Ok(())
}

async fn build_payload(
    client: &EquityMarketClient,
    symbols: &[String],
    start: &str,
    end: &str,
    sections: &[Section],
) -> Result<Map<String, Value>, ApiError> {
    let mut payload = Map::new();

    if sections.contains(&Section::Symbols) {
        let data = fetch_symbols_data(symbols, client).await?;
        payload.insert("symbols".to_string(), Value::Object(data));
    }
    if sections.contains(&Section::Historical) {
        let data = fetch_historical_data(symbols, start, end, client).await?;
        payload.insert("historical".to_string(), Value::Object(data));
    }
    if sections.contains(&Section::TechnicalIndicators) {
        let data = fetch_technical_indicators_data(symbols, client).await?;
        payload.insert("technicalIndicators".to_string(), Value::Object(data));
    }

    Ok(payload)
}

// ==============================================================================
// Database Health Command Logic
// ==============================================================================

async fn handle_db_health() -> anyhow::Result<()> {
    let database = Database::from_env().context("Failed to load database settings")?;
    let healthy = check_database_health(&database).await;
    database.dispose().await;

    let status = if healthy { "ok" } else { "unavailable" };
    println!("{}", json!({ "database": status }));

    if !healthy {
        let settings = database.settings();
        anyhow::bail!(
            "database {} at {}:{} is unavailable",
            settings.name(),
            settings.host(),
            settings.port()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    async fn serve(server: &mut Server, path: &str, body: Value) -> mockito::Mock {
        server
            .mock("GET", path)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    fn all_sections() -> Vec<Section> {
        vec![Section::Symbols, Section::Historical, Section::TechnicalIndicators]
    }

    #[tokio::test]
    async fn default_sections_fill_every_payload_key_in_order() {
        let mut server = Server::new_async().await;
        let mocks = vec![
            serve(&mut server, "/api/equity/TCS", json!({"price": 100})).await,
            serve(&mut server, "/api/equity/historical/TCS", json!({"data": []})).await,
            serve(&mut server, "/api/equity/technicalIndicators/TCS", json!({"rsi": 48})).await,
        ];
        let client = EquityMarketClient::new(&server.url()).unwrap();

        let payload = build_payload(
            &client,
            &["TCS".to_string()],
            "2025-01-01",
            "2025-12-31",
            &all_sections(),
        )
        .await
        .unwrap();

        assert_eq!(
            payload.keys().collect::<Vec<_>>(),
            vec!["symbols", "historical", "technicalIndicators"]
        );
        assert_eq!(payload["symbols"]["TCS"], json!({"price": 100}));
        assert_eq!(payload["historical"]["TCS"], json!({"data": []}));
        assert_eq!(payload["technicalIndicators"]["TCS"], json!({"rsi": 48}));
        for mock in mocks {
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn selected_sections_narrow_the_payload() {
        let mut server = Server::new_async().await;
        let historical =
            serve(&mut server, "/api/equity/historical/ACC", json!({"data": [1, 2]})).await;
        let untouched = server
            .mock("GET", Matcher::Regex("^/api/equity/(ACC|technicalIndicators/)".into()))
            .expect(0)
            .create_async()
            .await;
        let client = EquityMarketClient::new(&server.url()).unwrap();

        let payload = build_payload(
            &client,
            &["ACC".to_string()],
            "2025-01-01",
            "2025-03-31",
            &[Section::Historical],
        )
        .await
        .unwrap();

        assert_eq!(payload.keys().collect::<Vec<_>>(), vec!["historical"]);
        assert_eq!(payload["historical"]["ACC"], json!({"data": [1, 2]}));
        historical.assert_async().await;
        untouched.assert_async().await;
    }

    #[test]
    fn fetch_defaults_request_every_section() {
        let cli = Cli::try_parse_from(["equity-data", "fetch"]).unwrap();
        let Commands::Fetch(args) = cli.command else {
            panic!("expected the fetch command");
        };
        assert_eq!(args.sections, all_sections());
        assert_eq!(args.symbols, ["ACC", "TCS", "HDFC", "INFY"]);

        let cli = Cli::try_parse_from([
            "equity-data",
            "fetch",
            "--symbols",
            "TCS,INFY",
            "--sections",
            "technical-indicators",
        ])
        .unwrap();
        let Commands::Fetch(args) = cli.command else {
            panic!("expected the fetch command");
        };
        assert_eq!(args.sections, vec![Section::TechnicalIndicators]);
        assert_eq!(args.symbols, ["TCS", "INFY"]);
    }
}
