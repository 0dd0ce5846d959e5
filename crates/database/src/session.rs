use crate::error::DbError;
use async_trait::async_trait;
use sqlx::postgres::{PgConnection, PgPool, Postgres};
use sqlx::Transaction;

/// One transactional conversation with the database.
///
/// `commit` and `rollback` finish the transaction; `close` releases whatever
/// the session still holds. Each is called at most once by [`crate::UnitOfWork`].
#[async_trait]
pub trait Session: Send {
    async fn commit(&mut self) -> Result<(), DbError>;
    async fn rollback(&mut self) -> Result<(), DbError>;
    async fn close(&mut self) -> Result<(), DbError>;
}

/// Opens new sessions. Implemented for the real pool and for test doubles.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: Session;

    async fn open(&self) -> Result<Self::Session, DbError>;
}

/// A PostgreSQL session: a pooled connection with an open transaction.
///
/// Rows read through [`PgSession::connection`] are decoded into owned values,
/// so they stay usable after the transaction has been committed.
pub struct PgSession {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgSession {
    /// The connection to run statements on, e.g.
    /// `sqlx::query("...").execute(session.connection()?)`.
    pub fn connection(&mut self) -> Result<&mut PgConnection, DbError> {
        self.tx.as_deref_mut().ok_or(DbError::SessionClosed)
    }

    /// Whether the transaction is still open.
    pub fn is_open(&self) -> bool {
        self.tx.is_some()
    }
}

#[async_trait]
impl Session for PgSession {
    async fn commit(&mut self) -> Result<(), DbError> {
        let tx = self.tx.take().ok_or(DbError::SessionClosed)?;
        tx.commit().await?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DbError> {
        let tx = self.tx.take().ok_or(DbError::SessionClosed)?;
        tx.rollback().await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DbError> {
        // A transaction that was neither committed nor rolled back is discarded.
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
        }
        Ok(())
    }
}

/// Hands out [`PgSession`]s from a shared pool.
#[derive(Debug, Clone)]
pub struct PgSessionFactory {
    pool: PgPool,
}

impl PgSessionFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SessionFactory for PgSessionFactory {
    type Session = PgSession;

    async fn open(&self) -> Result<PgSession, DbError> {
        let tx = self.pool.begin().await?;
        tracing::debug!("Opened database session.");
        Ok(PgSession { tx: Some(tx) })
    }
}
