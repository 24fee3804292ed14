use crate::config::toml_config::ExplainerConfig;
use crate::core::matcher::{NoMatchPolicy, SchemeMatcher};
use crate::core::normalizer::TextNormalizer;
use crate::core::registry::SchemeRegistry;
use crate::core::spelling::SymSpellCorrector;
use crate::core::tokenizer::Tokenizer;
use crate::domain::model::MatchResult;
use crate::domain::ports::TextCorrector;
use crate::utils::error::Result;
use std::sync::Arc;

/// Maps free text to a scheme code: normalize, tokenize, match.
///
/// Holds only immutable state, so one instance can serve any number of
/// concurrent requests behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SchemeIdentifier {
    normalizer: TextNormalizer,
    tokenizer: Tokenizer,
    matcher: SchemeMatcher,
}

impl SchemeIdentifier {
    pub fn new(
        corrector: Arc<dyn TextCorrector>,
        tokenizer: Tokenizer,
        registry: Arc<SchemeRegistry>,
        policy: NoMatchPolicy,
    ) -> Result<Self> {
        Ok(Self {
            normalizer: TextNormalizer::new(corrector),
            tokenizer,
            matcher: SchemeMatcher::new(registry, policy)?,
        })
    }

    /// Builds the registry and loads the correction dictionary. A dictionary
    /// that fails to load is an initialization error; there is no degraded
    /// mode without it.
    pub fn from_config(config: &ExplainerConfig) -> Result<Self> {
        let settings = &config.identifier;
        let tokenizer = Tokenizer::new(settings.stopword_set());
        let registry = Arc::new(SchemeRegistry::build(&config.schemes, &tokenizer)?);

        let mut corrector = match &settings.dictionary_path {
            Some(path) => SymSpellCorrector::load_dictionary(
                path,
                settings.max_edit_distance,
                settings.prefix_length,
            )?,
            None => {
                tracing::info!("📖 Using bundled frequency dictionary");
                SymSpellCorrector::bundled(settings.max_edit_distance, settings.prefix_length)?
            }
        };
        // Keyword tokens must survive correction verbatim.
        corrector.ensure_terms(registry.vocabulary());

        let policy = settings.no_match_policy()?;
        tracing::info!(
            "🔎 Scheme identifier ready: {} schemes, {} dictionary terms, policy {:?}",
            registry.len(),
            corrector.len(),
            policy
        );

        Self::new(Arc::new(corrector), tokenizer, registry, policy)
    }

    pub fn identify_scheme(&self, user_input: &str) -> MatchResult {
        let normalized = self.normalizer.normalize(user_input);
        let tokens = self.tokenizer.token_set(&normalized);
        let result = self.matcher.match_tokens(&tokens);

        tracing::debug!(
            normalized = %normalized,
            tokens = tokens.len(),
            result = ?result,
            "identify_scheme"
        );
        result
    }

    pub fn registry(&self) -> &SchemeRegistry {
        self.matcher.registry()
    }

    pub fn policy(&self) -> &NoMatchPolicy {
        self.matcher.policy()
    }
}
