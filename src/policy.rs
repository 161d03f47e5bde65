//! Content-policy gate: checked before classification on every turn.
//!
//! The gate is a trait seam so hosts can substitute their own filter; the
//! default [`KeywordPolicy`] scans the RuleConfig category keyword lists
//! with the same case-insensitive substring rules as classification. On a
//! match the orchestrator short-circuits with the category's canned
//! redirect, bypassing classification and composition entirely.

use crate::rules::{contains_any, PolicyCategory, RuleConfig};

/// A matched content-policy category and its canned redirect.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyMatch {
    /// Category name, for logging and the caller
    pub category: String,
    /// The canned redirect message to return instead of a composed response
    pub redirect: String,
}

/// The content-policy collaborator interface.
pub trait ContentPolicy {
    /// Return the matched category, or `None` to let the turn through.
    fn check(&self, text: &str) -> Option<PolicyMatch>;
}

/// Keyword-based default policy built from the rule vocabulary.
#[derive(Debug, Clone)]
pub struct KeywordPolicy {
    categories: Vec<PolicyCategory>,
}

impl KeywordPolicy {
    /// Build from the configured categories.
    pub fn from_rules(rules: &RuleConfig) -> Self {
        Self {
            categories: rules.policy.clone(),
        }
    }
}

impl ContentPolicy for KeywordPolicy {
    fn check(&self, text: &str) -> Option<PolicyMatch> {
        let lower = text.to_lowercase();
        self.categories
            .iter()
            .find(|category| contains_any(&lower, &category.keywords))
            .map(|category| PolicyMatch {
                category: category.name.clone(),
                redirect: category.redirect.clone(),
            })
    }
}

/// A policy that never matches; for hosts that run their own filter
/// upstream of the engine.
#[derive(Debug, Clone, Default)]
pub struct NoPolicy;

impl ContentPolicy for NoPolicy {
    fn check(&self, _text: &str) -> Option<PolicyMatch> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_policy_matches_category() {
        let policy = KeywordPolicy::from_rules(&RuleConfig::builtin());
        let hit = policy.check("sometimes i want to hurt myself").unwrap();
        assert_eq!(hit.category, "crisis");
        assert!(!hit.redirect.is_empty());
    }

    #[test]
    fn test_keyword_policy_passes_ordinary_text() {
        let policy = KeywordPolicy::from_rules(&RuleConfig::builtin());
        assert!(policy.check("this essay is so hard").is_none());
    }

    #[test]
    fn test_no_policy_never_matches() {
        assert!(NoPolicy.check("anything at all").is_none());
    }
}
