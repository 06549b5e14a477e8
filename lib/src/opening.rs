use crate::language::Language;
use crate::results::WordleError;
use crate::scorers::EntropyScorer;
use std::result::Result;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The best first guesses for one vocabulary, best first, with their expected entropy.
///
/// Scoring the whole guess list against the whole solution list is the most expensive step of a
/// game, and its answer never changes, so it can be computed once and reused.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OpeningGuesses {
    /// Identifies the guess and solution lists these guesses were computed for.
    pub vocabulary: String,
    pub word_length: usize,
    pub guesses: Vec<(Arc<str>, f64)>,
}

impl OpeningGuesses {
    /// Ranks every word in `guesses` against every word in `solutions`, keeping the best `top_n`.
    pub fn compute(
        vocabulary: &str,
        guesses: &[Arc<str>],
        solutions: &[Arc<str>],
        top_n: usize,
        parallel: bool,
    ) -> Result<OpeningGuesses, WordleError> {
        let scorer = EntropyScorer::new(solutions)?;
        let ranked = scorer.rank(guesses, top_n, parallel)?;
        Ok(OpeningGuesses {
            vocabulary: vocabulary.to_owned(),
            word_length: solutions[0].chars().count(),
            guesses: ranked,
        })
    }

    /// The best opening guess, if any.
    pub fn best(&self) -> Option<&Arc<str>> {
        self.guesses.first().map(|(word, _)| word)
    }

    /// The guesses that appear in `words`, in the same order, or `None` if none of them do.
    ///
    /// A table computed for another word list may name words the current list does not have.
    pub fn playable_in(&self, words: &[Arc<str>]) -> Option<OpeningGuesses> {
        let guesses: Vec<(Arc<str>, f64)> = self
            .guesses
            .iter()
            .filter(|(word, _)| words.contains(word))
            .cloned()
            .collect();
        if guesses.is_empty() {
            return None;
        }
        Some(OpeningGuesses {
            vocabulary: self.vocabulary.clone(),
            word_length: self.word_length,
            guesses,
        })
    }

    fn from_table(language: &Language, table: &[(&str, f64)]) -> OpeningGuesses {
        OpeningGuesses {
            vocabulary: language.name.to_owned(),
            word_length: language.word_length,
            guesses: table
                .iter()
                .map(|(word, entropy)| (Arc::from(*word), *entropy))
                .collect(),
        }
    }
}

const ENGLISH_OPENINGS: [(&str, f64); 5] = [
    ("raise", 5.877),
    ("slate", 5.855),
    ("crate", 5.834),
    ("irate", 5.831),
    ("trace", 5.830),
];

// Stored in canonical form, so the final letter of each word is regular.
const HEBREW_OPENINGS: [(&str, f64); 5] = [
    ("מילות", 5.985),
    ("מניות", 5.983),
    ("הורית", 5.960),
    ("מונית", 5.938),
    ("משרות", 5.935),
];

/// A collection of precomputed [`OpeningGuesses`], keyed by vocabulary and word length.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OpeningGuessCache {
    entries: Vec<OpeningGuesses>,
}

impl OpeningGuessCache {
    pub fn new() -> OpeningGuessCache {
        OpeningGuessCache::default()
    }

    /// A cache holding the opening guesses for the built-in languages' default word lists.
    pub fn builtin() -> OpeningGuessCache {
        let mut cache = OpeningGuessCache::new();
        cache.insert(OpeningGuesses::from_table(
            &Language::english(),
            &ENGLISH_OPENINGS,
        ));
        cache.insert(OpeningGuesses::from_table(
            &Language::hebrew(),
            &HEBREW_OPENINGS,
        ));
        cache
    }

    /// Adds `guesses`, replacing any entry for the same vocabulary and word length.
    pub fn insert(&mut self, guesses: OpeningGuesses) {
        match self.entries.iter_mut().find(|entry| {
            entry.vocabulary == guesses.vocabulary && entry.word_length == guesses.word_length
        }) {
            Some(entry) => *entry = guesses,
            None => self.entries.push(guesses),
        }
    }

    /// Adds every entry of `other`, which take precedence over entries already present.
    pub fn merge(&mut self, other: OpeningGuessCache) {
        for entry in other.entries {
            self.insert(entry);
        }
    }

    pub fn lookup(&self, vocabulary: &str, word_length: usize) -> Option<&OpeningGuesses> {
        self.entries
            .iter()
            .find(|entry| entry.vocabulary == vocabulary && entry.word_length == word_length)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
