use crate::domain::ports::TextCorrector;
use std::sync::Arc;

/// Lowercases input and runs it through the configured corrector.
#[derive(Clone)]
pub struct TextNormalizer {
    corrector: Arc<dyn TextCorrector>,
}

impl TextNormalizer {
    pub fn new(corrector: Arc<dyn TextCorrector>) -> Self {
        Self { corrector }
    }

    /// Blank input comes back untouched. A corrector that produces nothing
    /// for non-blank input falls back to the lowercased text.
    pub fn normalize(&self, raw: &str) -> String {
        if raw.trim().is_empty() {
            return raw.to_string();
        }

        let lowered = raw.to_lowercase();
        let corrected = self.corrector.correct(&lowered);
        if corrected.trim().is_empty() {
            lowered
        } else {
            corrected
        }
    }
}

impl std::fmt::Debug for TextNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextNormalizer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::spelling::{NoopCorrector, SymSpellCorrector};

    struct EmptyCorrector;

    impl TextCorrector for EmptyCorrector {
        fn correct(&self, _text: &str) -> String {
            String::new()
        }
    }

    #[test]
    fn test_normalize_lowercases() {
        let normalizer = TextNormalizer::new(Arc::new(NoopCorrector));
        assert_eq!(normalizer.normalize("Loan For MACHINE"), "loan for machine");
    }

    #[test]
    fn test_normalize_applies_correction() {
        let corrector =
            SymSpellCorrector::from_reader("machine 1000\nloan 900\n".as_bytes(), 2, 7).unwrap();
        let normalizer = TextNormalizer::new(Arc::new(corrector));
        assert_eq!(normalizer.normalize("Loan MACHNE"), "loan machine");
    }

    #[test]
    fn test_normalize_blank_input_is_returned_as_is() {
        let normalizer = TextNormalizer::new(Arc::new(EmptyCorrector));
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize(" \n\t"), " \n\t");
    }

    #[test]
    fn test_empty_correction_falls_back_to_lowercase() {
        let normalizer = TextNormalizer::new(Arc::new(EmptyCorrector));
        assert_eq!(normalizer.normalize("Organic"), "organic");
    }
}
