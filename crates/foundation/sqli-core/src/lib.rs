//! SQL Injection Lab Core
//!
//! Attack detection and the bounded event log behind the lab's dashboard.
//!
//! - PatternCatalog: named lexical rules for injection payloads
//! - Detector: runs the catalog over credential text
//! - EventLog: fixed-capacity FIFO of attempt records
//! - AttemptRecorder: classifies and records each login attempt
//! - summarize: attack / legitimate / total counts over a snapshot
//!
//! ```text
//!   login attempt ──► AttemptRecorder ──► Detector ──► PatternCatalog
//!                           │
//!                           ▼
//!                       EventLog (cap 100, oldest evicted)
//!                           │
//!                 snapshot ─┴─► summarize / dashboard / JSON feed
//! ```

pub mod catalog;
pub mod detector;
pub mod log;
pub mod record;
pub mod recorder;
pub mod summary;

pub use catalog::{PatternCatalog, PatternRule};
pub use detector::{DetectionResult, Detector};
pub use log::{EventLog, DEFAULT_CAPACITY};
pub use record::{AttemptRecord, Channel, Outcome};
pub use recorder::AttemptRecorder;
pub use summary::{rule_hits, summarize, RuleHits, Summary};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid pattern for rule '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Duplicate rule name: {0}")]
    DuplicateRule(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
