//! Pattern Catalog
//!
//! The single place where detection policy lives. Each rule pairs a
//! human-readable label with a compiled expression; a rule fires when its
//! expression matches anywhere in the input.

use regex::Regex;

use crate::{CoreError, Result};

/// A named detection rule
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// Label reported when the rule fires
    name: String,
    /// Compiled expression
    pattern: Regex,
}

impl PatternRule {
    /// Compile a rule from a label and a regex expression
    pub fn new(name: impl Into<String>, expression: &str) -> Result<Self> {
        let name = name.into();
        let pattern = Regex::new(expression).map_err(|source| CoreError::InvalidPattern {
            name: name.clone(),
            source,
        })?;
        Ok(Self { name, pattern })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Expression source, as compiled
    pub fn expression(&self) -> &str {
        self.pattern.as_str()
    }

    /// Whether the rule fires on `text`
    pub fn test(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Built-in rules: (label, expression)
///
/// `.` stops at line breaks, so "followed eventually by" means on the same line.
/// The logical-operator rule fires on a keyword followed by two `=`, or by a
/// quoted literal compared to an opening quote (`' OR '1'='1`).
const STANDARD_RULES: &[(&str, &str)] = &[
    (
        "Suspicious logical operator",
        r"(?i)\b(?:OR|AND)\b(?:.*=.*=|.*'[^']*'\s*=\s*')",
    ),
    ("SQL comment marker", r"--"),
    ("DROP-table attempt", r"(?i);.*DROP"),
    ("UNION-based injection", r"(?i)UNION.*SELECT"),
    ("Single-quote character", r"'"),
    ("Always-true condition", r"(?i)1=1"),
];

/// Ordered set of detection rules
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    rules: Vec<PatternRule>,
}

impl PatternCatalog {
    /// Catalog with the six standard injection rules
    pub fn standard() -> Self {
        let rules = STANDARD_RULES
            .iter()
            .map(|(name, expression)| PatternRule {
                name: (*name).to_string(),
                // covered by `standard_rules_compile`
                pattern: Regex::new(expression).expect("standard rule must compile"),
            })
            .collect();

        Self { rules }
    }

    /// Catalog with no rules
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule; labels must stay unique
    pub fn with_rule(mut self, rule: PatternRule) -> Result<Self> {
        if self.rules.iter().any(|r| r.name == rule.name) {
            return Err(CoreError::DuplicateRule(rule.name));
        }
        self.rules.push(rule);
        Ok(self)
    }

    /// Drop a rule by label. Returns true if something was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.name != name);
        self.rules.len() != before
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule<'a>(catalog: &'a PatternCatalog, name: &str) -> &'a PatternRule {
        catalog.rules().iter().find(|r| r.name() == name).unwrap()
    }

    #[test]
    fn standard_rules_compile() {
        for (name, expression) in STANDARD_RULES {
            assert!(PatternRule::new(*name, expression).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_standard_order() {
        let catalog = PatternCatalog::standard();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(
            names,
            vec![
                "Suspicious logical operator",
                "SQL comment marker",
                "DROP-table attempt",
                "UNION-based injection",
                "Single-quote character",
                "Always-true condition",
            ]
        );
    }

    #[test]
    fn test_logical_operator_needs_two_equals() {
        let catalog = PatternCatalog::standard();
        let r = rule(&catalog, "Suspicious logical operator");

        assert!(r.test("x OR 1=1 AND 2=2"));
        assert!(r.test("admin' or '1'='1"));
        assert!(r.test("' AND 'a' = 'a"));
        assert!(!r.test("x OR y=1"));
        assert!(!r.test("x OR 'y'=1"));
        // keyword must be a whole word
        assert!(!r.test("ORACLE a=b=c"));
        assert!(!r.test("a=b=c OR"));
    }

    #[test]
    fn test_drop_needs_separator_first() {
        let catalog = PatternCatalog::standard();
        let r = rule(&catalog, "DROP-table attempt");

        assert!(r.test("x'; drop table users"));
        assert!(!r.test("DROP table; x"));
    }

    #[test]
    fn test_union_select_case_insensitive() {
        let catalog = PatternCatalog::standard();
        let r = rule(&catalog, "UNION-based injection");

        assert!(r.test("' union all select password from users"));
        assert!(!r.test("select ... union"));
    }

    #[test]
    fn test_simple_markers() {
        let catalog = PatternCatalog::standard();

        assert!(rule(&catalog, "SQL comment marker").test("admin'--"));
        assert!(!rule(&catalog, "SQL comment marker").test("a-b-c"));
        assert!(rule(&catalog, "Single-quote character").test("o'brien"));
        assert!(rule(&catalog, "Always-true condition").test("WHERE 1=1"));
        assert!(!rule(&catalog, "Always-true condition").test("1 = 1"));
    }

    #[test]
    fn test_with_rule_rejects_duplicates() {
        let dup = PatternRule::new("SQL comment marker", r"#").unwrap();
        let err = PatternCatalog::standard().with_rule(dup).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateRule(name) if name == "SQL comment marker"));
    }

    #[test]
    fn test_invalid_expression() {
        let err = PatternRule::new("broken", r"(unclosed").unwrap_err();
        assert!(matches!(err, CoreError::InvalidPattern { ref name, .. } if name == "broken"));
    }

    #[test]
    fn test_custom_rule_and_remove() {
        let sleep = PatternRule::new("Time-based blind", r"(?i)SLEEP\s*\(").unwrap();
        let mut catalog = PatternCatalog::standard().with_rule(sleep).unwrap();
        assert_eq!(catalog.len(), 7);

        assert!(catalog.remove("Time-based blind"));
        assert!(!catalog.remove("Time-based blind"));
        assert_eq!(catalog.len(), 6);
    }
}
