use crate::connection::Database;

/// Returns `true` when the database answers a trivial query.
///
/// Never fails: any error while connecting or querying is logged and reported
/// as unhealthy.
pub async fn check_database_health(database: &Database) -> bool {
    let mut connection = match database.acquire().await {
        Ok(connection) => connection,
        Err(e) => {
            tracing::warn!(error = %e, "Database health probe could not connect.");
            return false;
        }
    };

    match sqlx::query("SELECT 1").execute(&mut *connection).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health probe query failed.");
            false
        }
    }
}
