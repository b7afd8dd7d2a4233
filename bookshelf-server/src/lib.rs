//! bookshelf-server: HTTP API for the bookshelf catalogue
//!
//! Serves the book catalogue, per-user favourites and learnings, and basic
//! account management over REST/JSON backed by SQLite.
//!
//! Layers, leaf to root:
//! - [`db`]: pool, schema migrations and one repository per entity
//! - [`credentials`]: Argon2id password hashing and verification
//! - [`http`]: axum router, request validation and JSON error mapping

pub mod credentials;
pub mod db;
pub mod http;
pub mod models;

pub use credentials::{CredentialError, CredentialService};
pub use db::{connect, connect_in_memory, DbError};
pub use http::{router, run_server, AppState, ServerConfig, ServerError};
pub use sqlx::SqlitePool;
