//! Attempt records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::detector::DetectionResult;

/// Which login endpoint produced an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// String-interpolated query
    Vulnerable,
    /// Parameterized query
    Safe,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vulnerable => "vulnerable",
            Self::Safe => "safe",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a login attempt, as seen by the query layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failed,
    Error,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified login attempt.
///
/// Fields are private: a record is never modified after it is built, and the
/// log hands out clones only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    id: uuid::Uuid,
    timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    channel: Channel,
    username: String,
    password: String,
    #[serde(rename = "result")]
    outcome: Outcome,
    #[serde(rename = "isAttack")]
    is_attack: bool,
    #[serde(rename = "detectedPatterns")]
    matched_rules: Vec<String>,
    #[serde(rename = "query")]
    raw_query: Option<String>,
}

impl AttemptRecord {
    /// Build a record; the safe channel never carries query text
    pub fn new(
        timestamp: DateTime<Utc>,
        channel: Channel,
        username: impl Into<String>,
        password: impl Into<String>,
        outcome: Outcome,
        detection: DetectionResult,
        raw_query: Option<String>,
    ) -> Self {
        let raw_query = match channel {
            Channel::Vulnerable => raw_query,
            Channel::Safe => None,
        };

        Self {
            id: uuid::Uuid::new_v4(),
            timestamp,
            channel,
            username: username.into(),
            password: password.into(),
            outcome,
            is_attack: detection.is_attack(),
            matched_rules: detection.into_matched_rules(),
            raw_query,
        }
    }

    pub fn id(&self) -> uuid::Uuid {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_attack(&self) -> bool {
        self.is_attack
    }

    pub fn matched_rules(&self) -> &[String] {
        &self.matched_rules
    }

    pub fn raw_query(&self) -> Option<&str> {
        self.raw_query.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Detector;

    #[test]
    fn test_safe_channel_drops_query() {
        let detection = Detector::new().detect("gilberto 1234");
        let record = AttemptRecord::new(
            Utc::now(),
            Channel::Safe,
            "gilberto",
            "1234",
            Outcome::Success,
            detection,
            Some("SELECT 1".to_string()),
        );

        assert!(record.raw_query().is_none());
        assert!(!record.is_attack());
    }

    #[test]
    fn test_json_shape() {
        let detection = Detector::new().detect("admin'-- x");
        let record = AttemptRecord::new(
            Utc::now(),
            Channel::Vulnerable,
            "admin'--",
            "x",
            Outcome::Success,
            detection,
            Some("SELECT * FROM users WHERE username = 'admin'--' AND password = 'x'".to_string()),
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "vulnerable");
        assert_eq!(json["result"], "success");
        assert_eq!(json["isAttack"], true);
        assert_eq!(json["username"], "admin'--");
        assert_eq!(json["password"], "x");
        assert!(json["detectedPatterns"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("SQL comment marker")));
        assert!(json["query"].as_str().unwrap().starts_with("SELECT"));
        assert!(json["timestamp"].is_string());
        assert!(json["id"].is_string());
    }

    #[test]
    fn test_safe_query_serializes_as_null() {
        let record = AttemptRecord::new(
            Utc::now(),
            Channel::Safe,
            "alice",
            "hunter2",
            Outcome::Failed,
            Detector::new().detect("alice hunter2"),
            None,
        );

        let json = serde_json::to_value(&record).unwrap();
        assert!(json["query"].is_null());
        assert_eq!(json["type"], "safe");
        assert_eq!(json["result"], "failed");
    }

    #[test]
    fn test_display() {
        assert_eq!(Channel::Vulnerable.to_string(), "vulnerable");
        assert_eq!(Outcome::Error.to_string(), "error");
    }
}
