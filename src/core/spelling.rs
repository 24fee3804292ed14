//! Dictionary-based spelling correction.
//!
//! Terms are indexed by every string reachable from their prefix with up to
//! `max_edit_distance` deletions. A lookup generates the same deletions for
//! the input word, collects the dictionary terms that share one, and keeps the
//! candidates whose real edit distance is in bounds. Ties are broken by corpus
//! frequency, so the table's counts matter as much as its terms.

use crate::core::tokenizer::WORD_RE;
use crate::domain::ports::TextCorrector;
use crate::utils::error::{ExplainerError, Result};
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

/// English word frequencies plus the agriculture and scheme vocabulary.
pub const BUNDLED_DICTIONARY: &str = include_str!("../../data/frequency_dictionary.txt");

pub const DEFAULT_MAX_EDIT_DISTANCE: usize = 2;
pub const DEFAULT_PREFIX_LENGTH: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub term: String,
    pub distance: usize,
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct SymSpellCorrector {
    terms: Vec<String>,
    counts: HashMap<String, u64>,
    deletes: HashMap<String, Vec<usize>>,
    max_edit_distance: usize,
    prefix_length: usize,
}

impl SymSpellCorrector {
    pub fn new(max_edit_distance: usize, prefix_length: usize) -> Self {
        Self {
            terms: Vec::new(),
            counts: HashMap::new(),
            deletes: HashMap::new(),
            max_edit_distance,
            prefix_length: prefix_length.max(1),
        }
    }

    /// Loads a `term count` frequency table. Any failure here means the
    /// corrector cannot be trusted, so it is reported as an initialization error.
    pub fn load_dictionary<P: AsRef<Path>>(
        path: P,
        max_edit_distance: usize,
        prefix_length: usize,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| ExplainerError::InitializationError {
            message: format!("cannot open dictionary {}: {}", path.display(), e),
        })?;

        let corrector = Self::from_reader(file, max_edit_distance, prefix_length)?;
        tracing::info!(
            "📖 Loaded {} dictionary terms from {}",
            corrector.len(),
            path.display()
        );
        Ok(corrector)
    }

    pub fn bundled(max_edit_distance: usize, prefix_length: usize) -> Result<Self> {
        Self::from_reader(
            BUNDLED_DICTIONARY.as_bytes(),
            max_edit_distance,
            prefix_length,
        )
    }

    pub fn from_reader<R: Read>(
        reader: R,
        max_edit_distance: usize,
        prefix_length: usize,
    ) -> Result<Self> {
        let mut corrector = Self::new(max_edit_distance, prefix_length);
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        for (line, record) in csv_reader.records().enumerate() {
            let record = record?;
            // runs of spaces show up as empty fields
            let mut fields = record.iter().filter(|field| !field.is_empty());

            let term = match fields.next() {
                Some(term) => term,
                None => continue,
            };
            let count = fields
                .next()
                .ok_or_else(|| ExplainerError::InitializationError {
                    message: format!("dictionary line {}: missing count for '{}'", line + 1, term),
                })?
                .parse::<u64>()
                .map_err(|e| ExplainerError::InitializationError {
                    message: format!("dictionary line {}: invalid count for '{}': {}", line + 1, term, e),
                })?;

            corrector.insert(term, count);
        }

        if corrector.is_empty() {
            return Err(ExplainerError::InitializationError {
                message: "dictionary contains no terms".to_string(),
            });
        }

        Ok(corrector)
    }

    /// Adds `term`, summing counts for repeated entries.
    pub fn insert(&mut self, term: &str, count: u64) {
        let term = term.to_lowercase();
        if let Some(existing) = self.counts.get_mut(&term) {
            *existing = existing.saturating_add(count);
            return;
        }

        let index = self.terms.len();
        for delete in deletes_of(&prefix_of(&term, self.prefix_length), self.max_edit_distance) {
            self.deletes.entry(delete).or_default().push(index);
        }
        self.counts.insert(term.clone(), count);
        self.terms.push(term);
    }

    /// Makes sure every term is known without changing the count of terms
    /// that already are.
    pub fn ensure_terms<'a, I>(&mut self, terms: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for term in terms {
            if !self.contains(term) {
                self.insert(term, 1);
            }
        }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.counts.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Closest dictionary term to `word`: smallest distance, then highest
    /// count, then alphabetical.
    pub fn lookup(&self, word: &str) -> Option<Suggestion> {
        if let Some(&count) = self.counts.get(word) {
            return Some(Suggestion {
                term: word.to_string(),
                distance: 0,
                count,
            });
        }

        // A word may not be rewritten wholesale: one character always survives.
        let word_len = word.chars().count();
        let max_distance = self.max_edit_distance.min(word_len.saturating_sub(1));
        if max_distance == 0 {
            return None;
        }

        let mut candidates = HashSet::new();
        for delete in deletes_of(&prefix_of(word, self.prefix_length), max_distance) {
            if let Some(indices) = self.deletes.get(&delete) {
                candidates.extend(indices.iter().copied());
            }
        }

        candidates
            .into_iter()
            .filter_map(|index| {
                let term = &self.terms[index];
                if term.chars().count().abs_diff(word_len) > max_distance {
                    return None;
                }
                let distance = strsim::osa_distance(word, term);
                (distance <= max_distance).then(|| Suggestion {
                    term: term.clone(),
                    distance,
                    count: self.counts[term],
                })
            })
            .min_by(|a, b| {
                a.distance
                    .cmp(&b.distance)
                    .then_with(|| b.count.cmp(&a.count))
                    .then_with(|| a.term.cmp(&b.term))
            })
    }

    /// Best split of `word` into two known terms, e.g. `cowurine` -> `cow urine`.
    fn split(&self, word: &str) -> Option<(String, String)> {
        word.char_indices()
            .skip(1)
            .filter_map(|(at, _)| {
                let (left, right) = word.split_at(at);
                let score = self.counts.get(left)?.min(self.counts.get(right)?);
                Some((*score, left, right))
            })
            .max_by_key(|(score, _, _)| *score)
            .map(|(_, left, right)| (left.to_string(), right.to_string()))
    }

    fn correct_word(&self, word: &str) -> Option<String> {
        if word.chars().any(char::is_numeric) || self.contains(word) {
            return None;
        }

        if let Some(suggestion) = self.lookup(word) {
            tracing::debug!(
                "spelling: '{}' -> '{}' (distance {})",
                word,
                suggestion.term,
                suggestion.distance
            );
            return Some(suggestion.term);
        }

        self.split(word).map(|(left, right)| {
            tracing::debug!("spelling: '{}' -> '{} {}'", word, left, right);
            format!("{} {}", left, right)
        })
    }
}

impl TextCorrector for SymSpellCorrector {
    /// Lowercases `text` and corrects it word by word. When no word changes,
    /// the lowercased text is returned untouched, punctuation included.
    fn correct(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let mut changed = false;

        let words: Vec<String> = WORD_RE
            .find_iter(&lowered)
            .map(|m| match self.correct_word(m.as_str()) {
                Some(corrected) => {
                    changed = true;
                    corrected
                }
                None => m.as_str().to_string(),
            })
            .collect();

        if changed {
            words.join(" ")
        } else {
            lowered
        }
    }
}

/// Lowercasing only; for deployments or tests without a dictionary.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCorrector;

impl TextCorrector for NoopCorrector {
    fn correct(&self, text: &str) -> String {
        text.to_lowercase()
    }
}

fn prefix_of(word: &str, prefix_length: usize) -> String {
    word.chars().take(prefix_length).collect()
}

/// `word` plus every string obtained by deleting up to `max_distance` chars.
fn deletes_of(word: &str, max_distance: usize) -> HashSet<String> {
    let mut seen = HashSet::new();
    seen.insert(word.to_string());

    let mut frontier = vec![word.to_string()];
    for _ in 0..max_distance {
        let mut next = Vec::new();
        for current in &frontier {
            let chars: Vec<char> = current.chars().collect();
            if chars.len() <= 1 {
                continue;
            }
            for skip in 0..chars.len() {
                let delete: String = chars
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip)
                    .map(|(_, c)| *c)
                    .collect();
                if seen.insert(delete.clone()) {
                    next.push(delete);
                }
            }
        }
        frontier = next;
    }

    seen
}
