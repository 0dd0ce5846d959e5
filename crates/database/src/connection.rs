use crate::error::DbError;
use crate::session::PgSessionFactory;
use crate::unit_of_work::UnitOfWork;
use configuration::DatabaseSettings;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, Postgres};
use tokio::sync::Mutex;

/// Owner of the process's PostgreSQL pool.
///
/// The pool is created lazily on first use and torn down with
/// [`Database::dispose`], after which the next access builds a fresh one.
/// Create one `Database` at startup and hand out references (or wrap it in an
/// `Arc`) to everything that needs database access.
pub struct Database {
    settings: DatabaseSettings,
    engine: Mutex<Option<PgPool>>,
}

impl Database {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self {
            settings,
            engine: Mutex::new(None),
        }
    }

    /// Builds the handle from the `DB_*` environment variables.
    pub fn from_env() -> Result<Self, DbError> {
        Ok(Self::new(configuration::load_database_settings()?))
    }

    pub fn settings(&self) -> &DatabaseSettings {
        &self.settings
    }

    /// Returns the shared pool, creating it on first call.
    ///
    /// Creation performs no I/O: connections are opened on demand and checked
    /// with a ping before each checkout so stale ones are replaced.
    pub async fn engine(&self) -> PgPool {
        let mut engine = self.engine.lock().await;
        engine
            .get_or_insert_with(|| {
                tracing::info!(
                    host = self.settings.host(),
                    port = self.settings.port(),
                    database = self.settings.name(),
                    max_connections = self.settings.max_connections(),
                    "Creating database connection pool."
                );
                build_pool(&self.settings)
            })
            .clone()
    }

    /// A session factory bound to the shared pool.
    pub async fn session_factory(&self) -> PgSessionFactory {
        PgSessionFactory::new(self.engine().await)
    }

    /// A fresh, not yet started unit of work.
    pub async fn unit_of_work(&self) -> UnitOfWork<PgSessionFactory> {
        UnitOfWork::new(self.session_factory().await)
    }

    /// Checks out one pooled connection without any transaction handling.
    /// The connection goes back to the pool when dropped.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, DbError> {
        let pool = self.engine().await;
        Ok(pool.acquire().await?)
    }

    pub async fn is_initialized(&self) -> bool {
        self.engine.lock().await.is_some()
    }

    /// Closes the pool and resets the handle. Safe to call repeatedly and
    /// when nothing was ever initialized.
    pub async fn dispose(&self) {
        let engine = self.engine.lock().await.take();
        if let Some(pool) = engine {
            pool.close().await;
            tracing::info!("Database connection pool disposed.");
        }
    }
}

/// Connection options built field by field, so credentials never pass
/// through URL parsing.
pub fn connect_options(settings: &DatabaseSettings) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(settings.host())
        .port(settings.port())
        .username(settings.user())
        .password(settings.password())
        .database(settings.name())
}

fn build_pool(settings: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .max_connections(settings.max_connections())
        .acquire_timeout(settings.pool_timeout())
        .max_lifetime(settings.pool_recycle())
        .test_before_acquire(true)
        .connect_lazy_with(connect_options(settings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn engine_is_created_lazily_and_reused() {
        let database = Database::new(DatabaseSettings::default());
        assert!(!database.is_initialized().await);

        let first = database.engine().await;
        assert!(database.is_initialized().await);
        assert_eq!(first.options().get_max_connections(), 30);
        // No connection is opened until someone asks for one.
        assert_eq!(first.size(), 0);

        let second = database.engine().await;
        assert!(!second.is_closed());

        database.dispose().await;
        assert!(first.is_closed());
        assert!(!database.is_initialized().await);
    }

    #[tokio::test]
    async fn dispose_is_idempotent_and_allows_reinitialisation() {
        let database = Database::new(DatabaseSettings::default());
        database.dispose().await;
        database.dispose().await;

        let pool = database.engine().await;
        database.dispose().await;
        database.dispose().await;
        assert!(pool.is_closed());

        let fresh = database.engine().await;
        assert!(!fresh.is_closed());
        database.dispose().await;
    }

    #[test]
    fn connect_options_mirror_the_settings() {
        let settings = DatabaseSettings::default();
        let options = connect_options(&settings);
        assert_eq!(options.get_host(), "localhost");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_username(), "app");
        assert_eq!(options.get_database(), Some("app"));
    }
}
