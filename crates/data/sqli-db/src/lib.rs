//! Demo credential database
//!
//! A SQLite `users` table with plaintext passwords, queried two ways:
//!
//! - vulnerable: credentials are pasted straight into the SQL text
//! - safe: credentials are bound as parameters
//!
//! Plaintext storage is part of the teaching scenario.

pub mod store;

pub use store::{vulnerable_query, LoginAttempt, User, UserStore, SEED_USERS};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, DbError>;
