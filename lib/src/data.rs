use crate::language::Language;
use crate::results::WordleError;
use crate::results::MAX_WORD_LENGTH;
use std::io::BufRead;
use std::ops::Deref;
use std::result::Result;
use std::sync::Arc;

/// An ordered list of words that all have the same length.
///
/// The order is significant: when two guesses are equally good, the one that appears first in
/// the bank is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordBank {
    all_words: Vec<Arc<str>>,
    word_length: usize,
}

impl WordBank {
    /// Constructs a new `WordBank` by reading words from the given reader.
    ///
    /// The reader should provide one word per line. Each word is trimmed and converted to lower
    /// case, and blank lines are skipped.
    pub fn from_reader<R: BufRead>(word_reader: &mut R) -> Result<Self, WordleError> {
        let words = word_reader
            .lines()
            .collect::<Result<Vec<String>, std::io::Error>>()?;
        WordBank::from_iterator(words)
    }

    /// Constructs a new `WordBank` from the given words.
    ///
    /// Each word is trimmed and converted to lower case, and empty words are skipped.
    ///
    /// ```
    /// use wordle_entropy_solver::WordBank;
    ///
    /// let bank = WordBank::from_iterator(&["abc", " DEF ", "", "ghi"]).unwrap();
    /// assert_eq!(bank.len(), 3);
    /// assert_eq!(bank[1].as_ref(), "def");
    /// ```
    pub fn from_iterator<S, I>(words: I) -> Result<Self, WordleError>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let mut word_length = 0;
        let mut all_words: Vec<Arc<str>> = Vec::new();
        for word in words {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            let word = word.to_lowercase();
            let length = word.chars().count();
            if word_length == 0 {
                if length > MAX_WORD_LENGTH {
                    return Err(WordleError::UnsupportedWordLength(length));
                }
                word_length = length;
            } else if length != word_length {
                return Err(WordleError::InvalidLength {
                    expected: word_length,
                    actual: length,
                });
            }
            all_words.push(Arc::from(word));
        }
        Ok(WordBank {
            all_words,
            word_length,
        })
    }

    /// Returns the number of letters in each word, or 0 if the bank is empty.
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    /// Checks that every word has the language's word length and only uses letters from its
    /// alphabet.
    pub fn validate(&self, language: &Language) -> Result<(), WordleError> {
        if !self.all_words.is_empty() && self.word_length != language.word_length {
            return Err(WordleError::InvalidLength {
                expected: language.word_length,
                actual: self.word_length,
            });
        }
        match self
            .all_words
            .iter()
            .flat_map(|word| word.chars())
            .find(|letter| !language.contains(*letter))
        {
            Some(letter) => Err(WordleError::UnsupportedCharacter(letter)),
            None => Ok(()),
        }
    }
}

impl Deref for WordBank {
    type Target = [Arc<str>];

    fn deref(&self) -> &Self::Target {
        &self.all_words
    }
}
