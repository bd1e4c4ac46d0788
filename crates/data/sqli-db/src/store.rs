//! User store and the two login lookups

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use sqli_core::{Channel, Outcome};

use crate::{DbError, Result};

/// Seeded accounts: (username, password, role)
pub const SEED_USERS: &[(&str, &str, &str)] = &[
    ("admin", "admin123", "admin"),
    ("gilberto", "1234", "user"),
];

const SAFE_QUERY: &str = "SELECT * FROM users WHERE username = ? AND password = ?";

/// A row from `users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
    pub role: String,
}

impl User {
    // Columns are read as text so UNION payloads with mixed types still
    // produce a row, the way SQLite itself would hand them back.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: column_text(row, 0)?,
            username: column_text(row, 1)?,
            password: column_text(row, 2)?,
            role: column_text(row, 3)?,
        })
    }
}

fn column_text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    })
}

/// Build the injectable query text for the vulnerable endpoint
pub fn vulnerable_query(username: &str, password: &str) -> String {
    format!(
        "SELECT * FROM users WHERE username = '{}' AND password = '{}'",
        username, password
    )
}

/// What a login lookup produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAttempt {
    pub outcome: Outcome,
    /// Matched row on success
    pub user: Option<User>,
    /// SQL text executed; vulnerable channel only
    pub raw_query: Option<String>,
}

/// SQLite-backed user table
pub struct UserStore {
    conn: Mutex<Connection>,
}

impl UserStore {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        tracing::info!("Opened user database at {}", path.as_ref().display());
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    /// Drop and recreate `users` with the demo accounts
    pub fn seed(&self) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute_batch(
            r#"
            DROP TABLE IF EXISTS users;
            CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                password TEXT NOT NULL,
                role TEXT NOT NULL
            );
            "#,
        )?;
        for (username, password, role) in SEED_USERS {
            tx.execute(
                "INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)",
                params![username, password, role],
            )?;
        }
        tx.commit()?;

        tracing::info!("Seeded users table ({} accounts)", SEED_USERS.len());
        Ok(())
    }

    /// Whether the `users` table exists
    pub fn is_seeded(&self) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = 'users'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn count_users(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT count(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Execute caller-built SQL and return its first row
    pub fn find_user_raw(&self, sql: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(User::from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Parameterized lookup
    pub fn find_user(&self, username: &str, password: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(SAFE_QUERY)?;
        let mut rows = stmt.query(params![username, password])?;
        match rows.next()? {
            Some(row) => Ok(Some(User::from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Run the lookup for `channel`; database errors become `Outcome::Error`
    pub fn login(&self, channel: Channel, username: &str, password: &str) -> LoginAttempt {
        let (result, raw_query) = match channel {
            Channel::Vulnerable => {
                let sql = vulnerable_query(username, password);
                (self.find_user_raw(&sql), Some(sql))
            }
            Channel::Safe => (self.find_user(username, password), None),
        };

        match result {
            Ok(Some(user)) => LoginAttempt {
                outcome: Outcome::Success,
                user: Some(user),
                raw_query,
            },
            Ok(None) => LoginAttempt {
                outcome: Outcome::Failed,
                user: None,
                raw_query,
            },
            Err(e) => {
                tracing::error!(channel = %channel, "login query failed: {}", e);
                LoginAttempt {
                    outcome: Outcome::Error,
                    user: None,
                    raw_query,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> UserStore {
        let store = UserStore::open_in_memory().unwrap();
        store.seed().unwrap();
        store
    }

    #[test]
    fn test_seed() {
        let store = UserStore::open_in_memory().unwrap();
        assert!(!store.is_seeded().unwrap());

        store.seed().unwrap();
        assert!(store.is_seeded().unwrap());
        assert_eq!(store.count_users().unwrap(), 2);

        // reseeding resets rather than duplicates
        store.seed().unwrap();
        assert_eq!(store.count_users().unwrap(), 2);
    }

    #[test]
    fn test_vulnerable_query_text() {
        assert_eq!(
            vulnerable_query("admin' OR '1'='1", "x"),
            "SELECT * FROM users WHERE username = 'admin' OR '1'='1' AND password = 'x'"
        );
    }

    #[test]
    fn test_valid_credentials_both_channels() {
        let store = seeded();

        let vulnerable = store.login(Channel::Vulnerable, "admin", "admin123");
        assert_eq!(vulnerable.outcome, Outcome::Success);
        assert_eq!(vulnerable.user.unwrap().role, "admin");
        assert!(vulnerable.raw_query.is_some());

        let safe = store.login(Channel::Safe, "gilberto", "1234");
        assert_eq!(safe.outcome, Outcome::Success);
        assert_eq!(safe.user.unwrap().username, "gilberto");
        assert!(safe.raw_query.is_none());
    }

    #[test]
    fn test_wrong_password_fails() {
        let store = seeded();
        assert_eq!(store.login(Channel::Vulnerable, "admin", "nope").outcome, Outcome::Failed);
        assert_eq!(store.login(Channel::Safe, "admin", "nope").outcome, Outcome::Failed);
    }

    #[test]
    fn test_tautology_bypasses_vulnerable_only() {
        let store = seeded();

        let vulnerable = store.login(Channel::Vulnerable, "admin' OR '1'='1", "x");
        assert_eq!(vulnerable.outcome, Outcome::Success);
        assert_eq!(vulnerable.user.unwrap().username, "admin");
        assert_eq!(
            vulnerable.raw_query.as_deref(),
            Some("SELECT * FROM users WHERE username = 'admin' OR '1'='1' AND password = 'x'")
        );

        let safe = store.login(Channel::Safe, "admin' OR '1'='1", "x");
        assert_eq!(safe.outcome, Outcome::Failed);
    }

    #[test]
    fn test_comment_bypass() {
        let store = seeded();
        let attempt = store.login(Channel::Vulnerable, "admin'--", "whatever");
        assert_eq!(attempt.outcome, Outcome::Success);
        assert_eq!(attempt.user.unwrap().username, "admin");
    }

    #[test]
    fn test_union_leaks_through_vulnerable() {
        let store = seeded();
        let attempt = store.login(
            Channel::Vulnerable,
            "' UNION SELECT 1, password, 'p', 'leak' FROM users WHERE username = 'admin'--",
            "",
        );
        assert_eq!(attempt.outcome, Outcome::Success);
        let user = attempt.user.unwrap();
        assert_eq!(user.username, "admin123");
        assert_eq!(user.role, "leak");
    }

    #[test]
    fn test_broken_sql_is_error_outcome() {
        let store = seeded();
        let attempt = store.login(Channel::Vulnerable, "'", "x");
        assert_eq!(attempt.outcome, Outcome::Error);
        assert!(attempt.user.is_none());
        assert!(attempt.raw_query.is_some());
    }

    #[test]
    fn test_missing_table_is_error_outcome() {
        let store = UserStore::open_in_memory().unwrap();
        assert_eq!(store.login(Channel::Safe, "admin", "admin123").outcome, Outcome::Error);
    }

    #[test]
    fn test_file_database() {
        let path = std::env::temp_dir().join(format!("sqli_lab_{}.db", uuid::Uuid::new_v4()));
        {
            let store = UserStore::open(&path).unwrap();
            store.seed().unwrap();
        }
        {
            let store = UserStore::open(&path).unwrap();
            assert!(store.is_seeded().unwrap());
            assert!(store.find_user("admin", "admin123").unwrap().is_some());
        }
        std::fs::remove_file(&path).ok();
    }
}
