//! Aggregation over log snapshots. Always computed fresh, never cached.

use serde::{Deserialize, Serialize};

use crate::record::AttemptRecord;

/// Attack / legitimate / total counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub attacks: usize,
    pub legitimate: usize,
}

/// Count attacks and legitimate attempts in a snapshot
pub fn summarize(records: &[AttemptRecord]) -> Summary {
    let attacks = records.iter().filter(|r| r.is_attack()).count();
    Summary {
        total: records.len(),
        attacks,
        legitimate: records.len() - attacks,
    }
}

/// Per-rule hit count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleHits {
    pub rule: String,
    pub hits: usize,
}

/// How often each rule fired, in order of first appearance
pub fn rule_hits(records: &[AttemptRecord]) -> Vec<RuleHits> {
    let mut hits: Vec<RuleHits> = Vec::new();
    for name in records.iter().flat_map(|r| r.matched_rules()) {
        match hits.iter_mut().find(|h| &h.rule == name) {
            Some(entry) => entry.hits += 1,
            None => hits.push(RuleHits {
                rule: name.clone(),
                hits: 1,
            }),
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Detector;
    use crate::record::{Channel, Outcome};
    use chrono::Utc;

    fn record(username: &str, password: &str) -> AttemptRecord {
        let detection = Detector::new().detect(&format!("{} {}", username, password));
        AttemptRecord::new(
            Utc::now(),
            Channel::Vulnerable,
            username,
            password,
            Outcome::Failed,
            detection,
            None,
        )
    }

    #[test]
    fn test_empty_snapshot() {
        assert_eq!(summarize(&[]), Summary::default());
        assert!(rule_hits(&[]).is_empty());
    }

    #[test]
    fn test_counts_add_up() {
        let records = vec![
            record("alice", "hunter2"),
            record("admin'--", "x"),
            record("gilberto", "1234"),
            record("x", "' UNION SELECT 1"),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.attacks, 2);
        assert_eq!(summary.legitimate, 2);
        assert_eq!(summary.attacks + summary.legitimate, records.len());
    }

    #[test]
    fn test_rule_hits_first_seen_order() {
        let records = vec![
            record("admin'--", "x"),
            record("o'neil", "pw"),
            record("a", "1=1"),
        ];

        let hits = rule_hits(&records);
        assert_eq!(
            hits,
            vec![
                RuleHits { rule: "SQL comment marker".into(), hits: 1 },
                RuleHits { rule: "Single-quote character".into(), hits: 2 },
                RuleHits { rule: "Always-true condition".into(), hits: 1 },
            ]
        );
    }
}
