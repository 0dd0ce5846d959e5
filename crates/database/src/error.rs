use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database configuration: {0}")]
    ConnectionConfigError(#[from] configuration::error::ConfigError),

    #[error("Database operation failed: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("The session has already been committed, rolled back or closed.")]
    SessionClosed,

    #[error("A unit of work can only be entered once.")]
    UnitOfWorkReused,
}
