//! # Database Crate
//!
//! Pooled PostgreSQL access and the transactional unit of work built on it.
//!
//! ## Architectural Principles
//!
//! - **Explicit ownership:** the pool lives inside a [`Database`] handle that the
//!   application creates once and disposes at shutdown. There is no global state,
//!   so tests can build and tear down as many handles as they like.
//! - **Guaranteed release:** a [`UnitOfWork`] commits on success, rolls back on
//!   failure and always closes its session afterwards.
//! - **Asynchronous & Pooled:** all operations are asynchronous and go through
//!   `sqlx`'s connection pool (`PgPool`).
//!
//! ## Public API
//!
//! - `Database`: owns the pool; `engine`, `session_factory`, `unit_of_work`,
//!   `acquire` and `dispose`.
//! - `UnitOfWork`: the transaction boundary, generic over a `SessionFactory`.
//! - `check_database_health`: a probe that reports `false` instead of failing.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod health;
pub mod session;
pub mod unit_of_work;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{Database, connect_options};
pub use error::DbError;
pub use health::check_database_health;
pub use session::{PgSession, PgSessionFactory, Session, SessionFactory};
pub use unit_of_work::{UnitOfWork, UnitState};
