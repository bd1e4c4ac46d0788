//! Injection Detector
//!
//! Runs every catalog rule against a piece of untrusted text and reports the
//! labels that fired. Stateless: one detector can be shared by every request.

use serde::{Deserialize, Serialize};

use crate::catalog::PatternCatalog;

/// Injection detector
#[derive(Debug, Clone, Default)]
pub struct Detector {
    catalog: PatternCatalog,
}

impl Detector {
    /// Detector over the standard catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Detector over a custom catalog
    pub fn with_catalog(catalog: PatternCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Analyze text; matched labels keep catalog order
    pub fn detect(&self, text: &str) -> DetectionResult {
        let matched_rules: Vec<String> = self
            .catalog
            .rules()
            .iter()
            .filter(|rule| rule.test(text))
            .map(|rule| rule.name().to_string())
            .collect();

        DetectionResult::from_matches(matched_rules)
    }

    /// Quick check if text is suspicious
    pub fn is_suspicious(&self, text: &str) -> bool {
        self.catalog.rules().iter().any(|rule| rule.test(text))
    }
}

/// Detection outcome for one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// True iff at least one rule fired
    is_attack: bool,
    /// Labels of the rules that fired, in catalog order
    matched_rules: Vec<String>,
}

impl DetectionResult {
    fn from_matches(matched_rules: Vec<String>) -> Self {
        Self {
            is_attack: !matched_rules.is_empty(),
            matched_rules,
        }
    }

    pub fn is_attack(&self) -> bool {
        self.is_attack
    }

    pub fn matched_rules(&self) -> &[String] {
        &self.matched_rules
    }

    pub fn into_matched_rules(self) -> Vec<String> {
        self.matched_rules
    }
}
