use crate::results::GuessResult;
use crate::results::LetterResult;
use crate::results::WordleError;
use log::warn;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;
use std::iter::zip;
use std::result::Result;
use std::sync::Arc;

/// The letters allowed at one location in the word.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum PositionRestriction {
    /// Only this letter may appear here.
    Is(char),
    /// Any letter except these may appear here.
    IsNot(HashSet<char>),
}

impl PositionRestriction {
    /// Returns `true` iff `letter` may appear at this location.
    pub fn allows(&self, letter: char) -> bool {
        match self {
            PositionRestriction::Is(required) => *required == letter,
            PositionRestriction::IsNot(excluded) => !excluded.contains(&letter),
        }
    }

    fn exclude(&mut self, letter: char) {
        if let PositionRestriction::IsNot(excluded) = self {
            excluded.insert(letter);
        }
    }
}

/// Defines letter restrictions that a word must adhere to, as learned from one guess result.
///
/// A letter is tracked in at most one of the minimum-count, exact-count, or not-present tables.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct WordRestrictions {
    positions: Vec<PositionRestriction>,
    min_counts: HashMap<char, u8>,
    exact_counts: HashMap<char, u8>,
    not_present_letters: HashSet<char>,
}

impl WordRestrictions {
    /// Creates a `WordRestrictions` object for the given word length with all letters unknown.
    pub fn new(word_length: usize) -> WordRestrictions {
        WordRestrictions {
            positions: vec![PositionRestriction::IsNot(HashSet::new()); word_length],
            min_counts: HashMap::new(),
            exact_counts: HashMap::new(),
            not_present_letters: HashSet::new(),
        }
    }

    /// Returns the restrictions imposed by the given result.
    ///
    /// Returns [`WordleError::InvalidResults`] if a letter is marked present after the same letter
    /// was already marked absent, since the real feedback rules never produce that.
    pub fn from_result(result: &GuessResult) -> Result<WordRestrictions, WordleError> {
        let guess: Vec<char> = result.guess.chars().collect();
        if guess.len() != result.results.len() {
            return Err(WordleError::InvalidLength {
                expected: guess.len(),
                actual: result.results.len(),
            });
        }
        let mut restrictions = WordRestrictions::new(guess.len());
        // Until reconciled below, `min_counts` holds how often each letter was seen as a hit or
        // present, and `not_present_letters` holds every letter marked absent.
        for (index, (letter, letter_result)) in zip(guess, result.results.results()).enumerate() {
            match letter_result {
                LetterResult::Hit => {
                    restrictions.positions[index] = PositionRestriction::Is(letter);
                    *restrictions.min_counts.entry(letter).or_insert(0) += 1;
                }
                LetterResult::Present => {
                    if restrictions.not_present_letters.contains(&letter) {
                        return Err(WordleError::InvalidResults);
                    }
                    restrictions.positions[index].exclude(letter);
                    *restrictions.min_counts.entry(letter).or_insert(0) += 1;
                }
                LetterResult::Absent => {
                    restrictions.positions[index].exclude(letter);
                    restrictions.not_present_letters.insert(letter);
                }
            }
        }
        // A letter that was both absent and seen appears exactly as many times as it was seen.
        let reconciled: Vec<char> = restrictions
            .not_present_letters
            .iter()
            .filter(|letter| restrictions.min_counts.contains_key(*letter))
            .copied()
            .collect();
        for letter in reconciled {
            restrictions.not_present_letters.remove(&letter);
            if let Some(count) = restrictions.min_counts.remove(&letter) {
                restrictions.exact_counts.insert(letter, count);
            }
        }
        Ok(restrictions)
    }

    /// Returns `true` iff the given word satisfies these restrictions.
    pub fn is_satisfied_by(&self, word: &str) -> bool {
        let mut length = 0;
        for (index, letter) in word.chars().enumerate() {
            length += 1;
            match self.positions.get(index) {
                Some(restriction) if restriction.allows(letter) => {}
                _ => return false,
            }
            if self.not_present_letters.contains(&letter) {
                return false;
            }
        }
        length == self.positions.len()
            && self
                .min_counts
                .iter()
                .all(|(letter, min)| count_letter(word, *letter) >= *min as usize)
            && self
                .exact_counts
                .iter()
                .all(|(letter, count)| count_letter(word, *letter) == *count as usize)
    }

    pub fn word_length(&self) -> usize {
        self.positions.len()
    }

    /// The restriction at the given location. Panics if `index` is out of bounds.
    pub fn position(&self, index: usize) -> &PositionRestriction {
        &self.positions[index]
    }

    /// The letters from `alphabet` that may appear at the given location.
    pub fn allowed_letters(&self, index: usize, alphabet: &[char]) -> BTreeSet<char> {
        alphabet
            .iter()
            .copied()
            .filter(|letter| {
                self.positions[index].allows(*letter) && !self.not_present_letters.contains(letter)
            })
            .collect()
    }

    /// The minimum number of times `letter` must appear, if only a lower bound is known.
    pub fn min_count(&self, letter: char) -> Option<u8> {
        self.min_counts.get(&letter).copied()
    }

    /// The exact number of times `letter` must appear, if known.
    pub fn exact_count(&self, letter: char) -> Option<u8> {
        self.exact_counts.get(&letter).copied()
    }

    /// Returns `true` iff `letter` must not appear anywhere in the word.
    pub fn is_not_present(&self, letter: char) -> bool {
        self.not_present_letters.contains(&letter)
    }
}

fn count_letter(word: &str, letter: char) -> usize {
    word.chars().filter(|other| *other == letter).count()
}

/// Filters `possible_words` down to the words that could still be the objective after seeing
/// `result`. Order is preserved.
///
/// If `result` is internally inconsistent, the words are returned unfiltered so that more evidence
/// can be gathered.
pub fn filter_possible_words(
    possible_words: &[Arc<str>],
    result: &GuessResult,
) -> Result<Vec<Arc<str>>, WordleError> {
    let Some(first) = possible_words.first() else {
        return Ok(Vec::new());
    };
    let expected = first.chars().count();
    let actual = result.guess.chars().count();
    if expected != actual {
        return Err(WordleError::InvalidLength { expected, actual });
    }
    match WordRestrictions::from_result(result) {
        Ok(restrictions) => Ok(possible_words
            .iter()
            .filter(|word| restrictions.is_satisfied_by(word))
            .map(Arc::clone)
            .collect()),
        Err(WordleError::InvalidResults) => {
            warn!(
                "Ignoring inconsistent result {} for guess {}",
                result.results, result.guess
            );
            Ok(possible_words.to_vec())
        }
        Err(e) => Err(e),
    }
}
