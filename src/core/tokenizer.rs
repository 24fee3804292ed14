use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Unicode word runs, the same rule used for keyword phrases and input text.
pub(crate) static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("word pattern is a valid regex"));

pub const DEFAULT_STOPWORDS: &[&str] = &[
    "and", "the", "for", "in", "of", "a", "to", "or", "on", "at", "with", "by", "from",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopwordSet {
    fn default() -> Self {
        Self::new(DEFAULT_STOPWORDS)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stopwords: StopwordSet,
}

impl Tokenizer {
    pub fn new(stopwords: StopwordSet) -> Self {
        Self { stopwords }
    }

    /// Word tokens of `text` in input order, stopwords removed.
    ///
    /// Expects normalized (lowercase) text; case is not folded here.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        WORD_RE
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|token| !self.stopwords.contains(token))
            .map(str::to_string)
            .collect()
    }

    pub fn token_set(&self, text: &str) -> HashSet<String> {
        self.tokenize(text).into_iter().collect()
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_keeps_input_order() {
        let tokenizer = Tokenizer::default();
        assert_eq!(
            tokenizer.tokenize("i need a loan for machine modernize"),
            vec!["i", "need", "loan", "machine", "modernize"]
        );
    }

    #[test]
    fn test_stopwords_are_removed() {
        let tokenizer = Tokenizer::default();
        assert_eq!(
            tokenizer.tokenize("the loan for the machine"),
            tokenizer.tokenize("loan machine")
        );
    }

    #[test]
    fn test_punctuation_splits_words() {
        let tokenizer = Tokenizer::default();
        assert_eq!(
            tokenizer.tokenize("post-harvest, zero-budget!"),
            vec!["post", "harvest", "zero", "budget"]
        );
        assert_eq!(tokenizer.tokenize("50 lakh"), vec!["50", "lakh"]);
    }

    #[test]
    fn test_unicode_words() {
        let tokenizer = Tokenizer::new(StopwordSet::new(Vec::<String>::new()));
        assert_eq!(tokenizer.tokenize("किसान loan"), vec!["किसान", "loan"]);
    }

    #[test]
    fn test_empty_input_yields_no_tokens() {
        let tokenizer = Tokenizer::default();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("   \t ").is_empty());
        assert!(tokenizer.token_set("the and of").is_empty());
    }

    #[test]
    fn test_custom_stopwords_are_normalized() {
        let stopwords = StopwordSet::new([" Need ", "", "I"]);
        assert_eq!(stopwords.len(), 2);

        let tokenizer = Tokenizer::new(stopwords);
        assert_eq!(tokenizer.tokenize("i need the loan"), vec!["the", "loan"]);
    }
}
