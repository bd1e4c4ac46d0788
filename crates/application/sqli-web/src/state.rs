//! Application state for the web server

use std::sync::Arc;

use sqli_config::LabConfig;
use sqli_core::AttemptRecorder;
use sqli_db::UserStore;

use crate::Result;

/// Shared application state
pub struct AppState {
    /// Classifier and bounded attempt log
    pub recorder: Arc<AttemptRecorder>,
    /// Demo credential database
    pub users: Arc<UserStore>,
    /// Dashboard auto-refresh interval
    pub monitor_refresh_secs: u64,
    /// Server start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(recorder: AttemptRecorder, users: UserStore, monitor_refresh_secs: u64) -> Self {
        Self {
            recorder: Arc::new(recorder),
            users: Arc::new(users),
            monitor_refresh_secs,
            started_at: chrono::Utc::now(),
        }
    }

    /// Open the configured database (seeding it if asked and needed) and
    /// build an empty recorder
    pub fn from_config(config: &LabConfig) -> Result<Self> {
        let users = UserStore::open(&config.database_path)?;
        if config.seed_on_start && !users.is_seeded()? {
            users.seed()?;
        }

        let recorder = AttemptRecorder::with_capacity(config.log_capacity);
        Ok(Self::new(recorder, users, config.monitor_refresh_secs))
    }

    /// Seeded in-memory database, default capacity
    pub fn in_memory() -> Result<Self> {
        let users = UserStore::open_in_memory()?;
        users.seed()?;
        Ok(Self::new(AttemptRecorder::new(), users, 5))
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_state() {
        let state = AppState::in_memory().unwrap();
        assert_eq!(state.recorder.size(), 0);
        assert_eq!(state.recorder.capacity(), 100);
        assert!(state.users.is_seeded().unwrap());
        assert!(state.uptime_secs() <= 1);
    }

    #[test]
    fn test_from_config_seeds_new_file() {
        let path = std::env::temp_dir().join(format!("sqli_lab_state_{}.db", uuid::Uuid::new_v4()));
        std::fs::remove_file(&path).ok();

        let config = LabConfig {
            database_path: path.clone(),
            log_capacity: 7,
            ..LabConfig::default()
        };
        let state = AppState::from_config(&config).unwrap();

        assert!(state.users.is_seeded().unwrap());
        assert_eq!(state.recorder.capacity(), 7);
        drop(state);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_from_config_without_seed() {
        let path = std::env::temp_dir().join(format!("sqli_lab_noseed_{}.db", uuid::Uuid::new_v4()));
        std::fs::remove_file(&path).ok();

        let config = LabConfig {
            database_path: path.clone(),
            seed_on_start: false,
            ..LabConfig::default()
        };
        let state = AppState::from_config(&config).unwrap();

        assert!(!state.users.is_seeded().unwrap());
        drop(state);
        std::fs::remove_file(&path).ok();
    }
}
