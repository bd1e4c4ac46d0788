//! Attempt Recorder
//!
//! Classifies each login attempt and appends it to the event log. One recorder
//! is built at startup and shared by every request handler.

use chrono::Utc;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::detector::Detector;
use crate::log::EventLog;
use crate::record::{AttemptRecord, Channel, Outcome};
use crate::summary::{summarize, Summary};

/// Thread-safe classifier in front of a bounded event log
#[derive(Debug, Default)]
pub struct AttemptRecorder {
    detector: Detector,
    log: RwLock<EventLog>,
}

impl AttemptRecorder {
    /// Standard catalog, default capacity
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_parts(Detector::new(), EventLog::with_capacity(capacity))
    }

    pub fn with_parts(detector: Detector, log: EventLog) -> Self {
        Self {
            detector,
            log: RwLock::new(log),
        }
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    /// Classify and store one attempt.
    ///
    /// Detection runs over `username + " " + password`. The timestamp is taken
    /// inside the write lock and clamped to the previous record, so timestamps
    /// never decrease along the log.
    pub fn record_attempt(
        &self,
        channel: Channel,
        username: &str,
        password: &str,
        outcome: Outcome,
        raw_query: Option<&str>,
    ) -> AttemptRecord {
        let detection = self.detector.detect(&format!("{} {}", username, password));

        if detection.is_attack() {
            tracing::warn!(
                target: "sqli_core::alert",
                channel = %channel,
                username = %username,
                patterns = %detection.matched_rules().join(", "),
                "injection attempt detected"
            );
        }

        let mut log = self.write_log();
        let now = Utc::now();
        let timestamp = match log.last() {
            Some(prev) if prev.timestamp() > now => prev.timestamp(),
            _ => now,
        };

        let record = AttemptRecord::new(
            timestamp,
            channel,
            username,
            password,
            outcome,
            detection,
            raw_query.map(str::to_string),
        );

        if let Some(evicted) = log.append(record.clone()) {
            tracing::trace!(id = %evicted.id(), "evicted oldest attempt");
        }

        record
    }

    /// Current contents, oldest first
    pub fn snapshot(&self) -> Vec<AttemptRecord> {
        self.read_log().snapshot()
    }

    /// Counts over the current contents
    pub fn summary(&self) -> Summary {
        summarize(&self.snapshot())
    }

    pub fn size(&self) -> usize {
        self.read_log().size()
    }

    pub fn capacity(&self) -> usize {
        self.read_log().capacity()
    }

    /// Forget every recorded attempt
    pub fn clear(&self) {
        self.write_log().clear();
        tracing::info!("attempt log cleared");
    }

    // A panic mid-append cannot leave the deque half-written, so a poisoned
    // lock still guards a consistent log.
    fn read_log(&self) -> RwLockReadGuard<'_, EventLog> {
        self.log.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_log(&self) -> RwLockWriteGuard<'_, EventLog> {
        self.log.write().unwrap_or_else(|e| e.into_inner())
    }
}
