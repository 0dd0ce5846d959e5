use configuration::{DatabaseSettings, RawDatabaseSettings};
use database::{Database, check_database_health};

fn unreachable_settings() -> DatabaseSettings {
    // Nothing listens on port 1 locally, so every connect attempt is refused.
    DatabaseSettings::try_from(RawDatabaseSettings {
        host: "127.0.0.1".to_string(),
        port: 1,
        pool_timeout_seconds: 1,
        ..RawDatabaseSettings::default()
    })
    .expect("settings are valid")
}

#[tokio::test]
async fn health_check_reports_false_when_the_database_is_unreachable() {
    let database = Database::new(unreachable_settings());

    assert!(!check_database_health(&database).await);

    database.dispose().await;
}

#[tokio::test]
async fn acquire_surfaces_connection_errors() {
    let database = Database::new(unreachable_settings());

    assert!(database.acquire().await.is_err());

    database.dispose().await;
    assert!(!database.is_initialized().await);
}
