use crate::core::tokenizer::Tokenizer;
use crate::domain::model::{SchemeCode, SchemeDefinition};
use crate::utils::error::{ExplainerError, Result};
use crate::utils::validation::validate_scheme_code;
use std::collections::HashSet;

/// One keyword signal, tokenized once when the registry is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordPhrase {
    text: String,
    tokens: Vec<String>,
}

impl KeywordPhrase {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Never empty.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_contained_in(&self, input: &HashSet<String>) -> bool {
        self.tokens.iter().all(|token| input.contains(token))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    phrases: Vec<KeywordPhrase>,
}

impl KeywordSet {
    pub fn phrases(&self) -> &[KeywordPhrase] {
        &self.phrases
    }

    /// First phrase fully contained in `input`, in authored order.
    pub fn first_match(&self, input: &HashSet<String>) -> Option<&KeywordPhrase> {
        self.phrases.iter().find(|phrase| phrase.is_contained_in(input))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredScheme {
    pub code: SchemeCode,
    pub name: Option<String>,
    pub keywords: KeywordSet,
}

/// Schemes in match-priority order. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeRegistry {
    schemes: Vec<RegisteredScheme>,
}

impl SchemeRegistry {
    /// Tokenizes every keyword phrase with `tokenizer`, so phrases lose the
    /// same stopwords user input does.
    pub fn build(definitions: &[SchemeDefinition], tokenizer: &Tokenizer) -> Result<Self> {
        if definitions.is_empty() {
            return Err(ExplainerError::ConfigValidationError {
                field: "schemes".to_string(),
                message: "at least one scheme must be configured".to_string(),
            });
        }

        let mut seen = HashSet::new();
        let mut schemes = Vec::with_capacity(definitions.len());

        for definition in definitions {
            let code = definition.code.trim();
            validate_scheme_code("schemes.code", code)?;
            if !seen.insert(code.to_string()) {
                return Err(ExplainerError::InvalidConfigValueError {
                    field: "schemes.code".to_string(),
                    value: code.to_string(),
                    reason: "Scheme codes must be unique".to_string(),
                });
            }

            if definition.keywords.is_empty() {
                return Err(ExplainerError::ConfigValidationError {
                    field: format!("schemes.{}.keywords", code),
                    message: "a scheme needs at least one keyword phrase".to_string(),
                });
            }

            let phrases = definition
                .keywords
                .iter()
                .map(|text| {
                    let tokens = tokenizer.tokenize(&text.to_lowercase());
                    if tokens.is_empty() {
                        return Err(ExplainerError::InvalidConfigValueError {
                            field: format!("schemes.{}.keywords", code),
                            value: text.clone(),
                            reason: "Keyword phrase has no matchable words".to_string(),
                        });
                    }
                    Ok(KeywordPhrase {
                        text: text.clone(),
                        tokens,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            schemes.push(RegisteredScheme {
                code: SchemeCode::new(code),
                name: definition.name.clone(),
                keywords: KeywordSet { phrases },
            });
        }

        tracing::debug!("Built scheme registry with {} schemes", schemes.len());
        Ok(Self { schemes })
    }

    pub fn schemes(&self) -> &[RegisteredScheme] {
        &self.schemes
    }

    pub fn get(&self, code: &SchemeCode) -> Option<&RegisteredScheme> {
        self.schemes.iter().find(|scheme| &scheme.code == code)
    }

    pub fn contains(&self, code: &SchemeCode) -> bool {
        self.get(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    /// Every keyword token, in registry order, duplicates included.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.schemes
            .iter()
            .flat_map(|scheme| scheme.keywords.phrases())
            .flat_map(|phrase| phrase.tokens())
            .map(String::as_str)
    }
}
