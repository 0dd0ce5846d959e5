use crate::error::DbError;
use crate::session::{Session, SessionFactory};
use futures::future::BoxFuture;
use std::fmt;

/// Lifecycle of a [`UnitOfWork`]. It only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Idle,
    Active,
    Closed,
}

/// A single transaction boundary around one session.
///
/// The session is committed when the work succeeds and rolled back when it
/// fails; in both cases it is closed afterwards, even if the commit or the
/// rollback itself fails.
///
/// # Example
/// ```ignore
/// let uow = database.unit_of_work().await;
/// let id: i64 = uow
///     .run(|session| {
///         Box::pin(async move {
///             let insert = "INSERT INTO watchlist (symbol) VALUES ($1) RETURNING id";
///             let row: (i64,) = sqlx::query_as(insert)
///                 .bind("TCS")
///                 .fetch_one(session.connection()?)
///                 .await
///                 .map_err(DbError::from)?;
///             Ok::<_, DbError>(row.0)
///         })
///     })
///     .await?;
/// ```
pub struct UnitOfWork<F: SessionFactory> {
    factory: F,
    session: Option<F::Session>,
    state: UnitState,
}

impl<F: SessionFactory> UnitOfWork<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            session: None,
            state: UnitState::Idle,
        }
    }

    pub fn state(&self) -> UnitState {
        self.state
    }

    /// The active session, if [`UnitOfWork::begin`] has been called and
    /// [`UnitOfWork::end`] has not.
    pub fn session(&mut self) -> Option<&mut F::Session> {
        self.session.as_mut()
    }

    /// Opens the session. For callers that cannot use [`UnitOfWork::run`];
    /// every `begin` must be paired with an [`UnitOfWork::end`].
    pub async fn begin(&mut self) -> Result<&mut F::Session, DbError> {
        if self.state != UnitState::Idle {
            return Err(DbError::UnitOfWorkReused);
        }
        let session = self.factory.open().await?;
        self.state = UnitState::Active;
        Ok(self.session.insert(session))
    }

    /// Finishes the unit: commits when `failure` is `None`, rolls back
    /// otherwise, then closes the session. The first error wins.
    ///
    /// Does nothing when no session is active.
    pub async fn end(
        &mut self,
        failure: Option<&(dyn fmt::Display + Sync)>,
    ) -> Result<(), DbError> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };
        self.state = UnitState::Closed;

        let finished = match failure {
            None => session.commit().await,
            Some(reason) => {
                tracing::warn!(error = %reason, "Rolling back unit of work.");
                session.rollback().await
            }
        };
        let closed = session.close().await;
        tracing::debug!(
            committed = failure.is_none() && finished.is_ok(),
            "Closed unit of work."
        );

        finished.and(closed)
    }

    /// Runs `work` inside the transaction and settles it according to the outcome.
    ///
    /// A failure from `work` is returned as-is; if the rollback that follows
    /// also fails, that second error is logged rather than returned.
    pub async fn run<T, E, W>(mut self, work: W) -> Result<T, E>
    where
        W: for<'s> FnOnce(&'s mut F::Session) -> BoxFuture<'s, Result<T, E>>,
        E: From<DbError> + fmt::Display + Send + Sync,
    {
        let session = self.begin().await?;
        let outcome = work(session).await;

        match &outcome {
            Ok(_) => self.end(None).await?,
            Err(err) => {
                if let Err(cleanup) = self.end(Some(err)).await {
                    tracing::warn!(
                        error = %cleanup,
                        "Rollback of a failed unit of work did not complete cleanly."
                    );
                }
            }
        }

        outcome
    }
}

impl<F: SessionFactory> Drop for UnitOfWork<F> {
    fn drop(&mut self) {
        if self.state == UnitState::Active {
            tracing::warn!("Unit of work dropped while active; its transaction is discarded.");
        }
    }
}
