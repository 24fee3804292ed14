use crate::core::registry::SchemeRegistry;
use crate::domain::model::{MatchResult, SchemeCode, SchemeMatch};
use crate::utils::error::{ExplainerError, Result};
use std::collections::HashSet;
use std::sync::Arc;

/// What to report when no keyword phrase matches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NoMatchPolicy {
    /// Report absence to the caller.
    #[default]
    None,
    /// Report this scheme instead.
    DefaultFallback(SchemeCode),
}

#[derive(Debug, Clone)]
pub struct SchemeMatcher {
    registry: Arc<SchemeRegistry>,
    policy: NoMatchPolicy,
}

impl SchemeMatcher {
    pub fn new(registry: Arc<SchemeRegistry>, policy: NoMatchPolicy) -> Result<Self> {
        if let NoMatchPolicy::DefaultFallback(code) = &policy {
            if !registry.contains(code) {
                return Err(ExplainerError::InvalidConfigValueError {
                    field: "identifier.default_scheme".to_string(),
                    value: code.to_string(),
                    reason: "Default scheme is not in the registry".to_string(),
                });
            }
        }

        Ok(Self { registry, policy })
    }

    /// First scheme in registry order with a phrase fully contained in
    /// `tokens`; otherwise the no-match policy decides.
    pub fn match_tokens(&self, tokens: &HashSet<String>) -> MatchResult {
        for scheme in self.registry.schemes() {
            if let Some(phrase) = scheme.keywords.first_match(tokens) {
                return MatchResult::Matched(SchemeMatch {
                    code: scheme.code.clone(),
                    phrase: phrase.text().to_string(),
                });
            }
        }

        match &self.policy {
            NoMatchPolicy::None => MatchResult::Absent,
            NoMatchPolicy::DefaultFallback(code) => MatchResult::Fallback(code.clone()),
        }
    }

    pub fn registry(&self) -> &SchemeRegistry {
        &self.registry
    }

    pub fn policy(&self) -> &NoMatchPolicy {
        &self.policy
    }
}
