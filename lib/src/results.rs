use std::fmt;
use std::io;
use std::iter::zip;
use std::result::Result;
use std::sync::Arc;
use thiserror::Error;

/// The longest word this library can score. Every pattern for a word of this length fits in a
/// `u32`, and a dense table of all 3<sup>10</sup> patterns stays small.
pub const MAX_WORD_LENGTH: usize = 10;

/// The result of a given letter at a specific location.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum LetterResult {
    /// The letter is in the objective word at this exact location.
    Hit,
    /// The letter is in the objective word, but not at this location.
    Present,
    /// The letter is not in the objective word, or every copy of it is already accounted for.
    Absent,
}

impl LetterResult {
    /// Parses the textual symbol used by the feedback channel: `'2'` for [`LetterResult::Hit`],
    /// `'1'` for [`LetterResult::Present`] and `'0'` for [`LetterResult::Absent`].
    pub fn from_symbol(symbol: char) -> Option<LetterResult> {
        match symbol {
            '2' => Some(LetterResult::Hit),
            '1' => Some(LetterResult::Present),
            '0' => Some(LetterResult::Absent),
            _ => None,
        }
    }

    /// The textual symbol for this result.
    pub fn symbol(self) -> char {
        match self {
            LetterResult::Hit => '2',
            LetterResult::Present => '1',
            LetterResult::Absent => '0',
        }
    }

    fn trit(self) -> u32 {
        match self {
            LetterResult::Absent => 0,
            LetterResult::Present => 1,
            LetterResult::Hit => 2,
        }
    }
}

/// Indicates that an error occurred while trying to guess the objective word.
#[derive(Debug, Error)]
pub enum WordleError {
    /// Two words, or a word and its feedback, did not have the same number of letters.
    #[error("expected a word of length {expected}, but got one of length {actual}")]
    InvalidLength { expected: usize, actual: usize },
    /// Words must have between 1 and [`MAX_WORD_LENGTH`] letters.
    #[error("words of length {0} are not supported (max is {MAX_WORD_LENGTH})")]
    UnsupportedWordLength(usize),
    /// There are no candidate words left to evaluate a guess against.
    #[error("there are no possible words left")]
    EmptyPool,
    /// The feedback text did not match the expected length or alphabet.
    #[error("malformed feedback {0:?}: expected one of '0', '1' or '2' per letter")]
    MalformedFeedback(String),
    /// No feedback arrived within the allowed time.
    #[error("timed out waiting for feedback")]
    FeedbackTimeout,
    /// The feedback channel closed before providing feedback.
    #[error("the feedback channel was closed")]
    FeedbackClosed,
    /// Indicates that the given `GuessResult` is impossible due to some inconsistency.
    #[error("the given results are inconsistent")]
    InvalidResults,
    /// Indicates that one or more given characters are not in the supported alphabet.
    #[error("unsupported character {0:?}")]
    UnsupportedCharacter(char),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The letters of one word, stored inline so that hot loops never allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Letters {
    letters: [char; MAX_WORD_LENGTH],
    len: usize,
}

impl Letters {
    pub(crate) fn from_word(word: &str) -> Result<Letters, WordleError> {
        let mut letters = ['\0'; MAX_WORD_LENGTH];
        let mut len = 0;
        for letter in word.chars() {
            if len == MAX_WORD_LENGTH {
                return Err(WordleError::UnsupportedWordLength(word.chars().count()));
            }
            letters[len] = letter;
            len += 1;
        }
        if len == 0 {
            return Err(WordleError::UnsupportedWordLength(0));
        }
        Ok(Letters { letters, len })
    }

    pub(crate) fn as_slice(&self) -> &[char] {
        &self.letters[..self.len]
    }
}

/// Remaining, unmatched letters of the objective word.
struct LetterCounts {
    letters: [char; MAX_WORD_LENGTH],
    counts: [u8; MAX_WORD_LENGTH],
    len: usize,
}

impl LetterCounts {
    fn new(word: &[char]) -> LetterCounts {
        let mut counts = LetterCounts {
            letters: ['\0'; MAX_WORD_LENGTH],
            counts: [0; MAX_WORD_LENGTH],
            len: 0,
        };
        for &letter in word {
            match counts.position(letter) {
                Some(index) => counts.counts[index] += 1,
                None => {
                    counts.letters[counts.len] = letter;
                    counts.counts[counts.len] = 1;
                    counts.len += 1;
                }
            }
        }
        counts
    }

    fn position(&self, letter: char) -> Option<usize> {
        self.letters[..self.len].iter().position(|&l| l == letter)
    }

    /// Uses up one copy of `letter`, returning false if none are left.
    fn take(&mut self, letter: char) -> bool {
        match self.position(letter) {
            Some(index) if self.counts[index] > 0 => {
                self.counts[index] -= 1;
                true
            }
            _ => false,
        }
    }
}

/// Scores `guess` against `objective`. Both must have the same length, at most
/// [`MAX_WORD_LENGTH`].
///
/// All hits are found before any present letters, since a present mark may only use copies of a
/// letter that are not already matched exactly.
fn score_letters(guess: &[char], objective: &[char], results: &mut [LetterResult]) {
    let mut remaining = LetterCounts::new(objective);
    for (index, (&guess_letter, &objective_letter)) in zip(guess, objective).enumerate() {
        if guess_letter == objective_letter {
            results[index] = LetterResult::Hit;
            remaining.take(guess_letter);
        } else {
            results[index] = LetterResult::Absent;
        }
    }
    for (index, &guess_letter) in guess.iter().enumerate() {
        if results[index] != LetterResult::Hit && remaining.take(guess_letter) {
            results[index] = LetterResult::Present;
        }
    }
}

/// The result of each letter of a guess, provided in the same letter order as in the guess.
#[derive(Debug, Eq, PartialEq, Hash, Clone)]
pub struct FeedbackPattern {
    results: Vec<LetterResult>,
}

impl FeedbackPattern {
    /// Wraps the given per-letter results.
    pub fn new(results: Vec<LetterResult>) -> FeedbackPattern {
        FeedbackPattern { results }
    }

    /// Determines the feedback for playing `guess` when the objective word is `secret`.
    ///
    /// ```
    /// use wordle_entropy_solver::FeedbackPattern;
    ///
    /// let pattern = FeedbackPattern::generate("abbey", "aabby").unwrap();
    /// assert_eq!(pattern.to_string(), "21202");
    /// ```
    pub fn generate(guess: &str, secret: &str) -> Result<FeedbackPattern, WordleError> {
        let guess_letters = Letters::from_word(guess)?;
        let secret_letters = Letters::from_word(secret)?;
        if guess_letters.len != secret_letters.len {
            return Err(WordleError::InvalidLength {
                expected: secret_letters.len,
                actual: guess_letters.len,
            });
        }
        let mut results = vec![LetterResult::Absent; guess_letters.len];
        score_letters(
            guess_letters.as_slice(),
            secret_letters.as_slice(),
            &mut results,
        );
        Ok(FeedbackPattern { results })
    }

    /// Parses feedback for a word of `word_length` letters, written as one of `'0'`, `'1'` or
    /// `'2'` per letter. Surrounding whitespace is ignored.
    pub fn parse(text: &str, word_length: usize) -> Result<FeedbackPattern, WordleError> {
        let trimmed = text.trim();
        let results = trimmed
            .chars()
            .map(LetterResult::from_symbol)
            .collect::<Option<Vec<LetterResult>>>()
            .ok_or_else(|| WordleError::MalformedFeedback(trimmed.to_string()))?;
        if results.len() != word_length {
            return Err(WordleError::MalformedFeedback(trimmed.to_string()));
        }
        Ok(FeedbackPattern { results })
    }

    /// Returns `true` iff every letter was a hit, i.e. the guess was the objective word.
    pub fn is_all_hit(&self) -> bool {
        self.results.iter().all(|result| *result == LetterResult::Hit)
    }

    pub fn results(&self) -> &[LetterResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl fmt::Display for FeedbackPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            write!(f, "{}", result.symbol())?;
        }
        Ok(())
    }
}

/// A compact base-3 representation of a [`FeedbackPattern`]. The first letter is the least
/// significant digit, with `Absent = 0`, `Present = 1` and `Hit = 2`.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct CompressedGuessResult {
    data: u32,
}

impl CompressedGuessResult {
    /// Compresses the given results.
    pub fn from_results(results: &[LetterResult]) -> Result<CompressedGuessResult, WordleError> {
        if results.len() > MAX_WORD_LENGTH {
            return Err(WordleError::UnsupportedWordLength(results.len()));
        }
        let data = results
            .iter()
            .rev()
            .fold(0, |acc, result| acc * 3 + result.trit());
        Ok(CompressedGuessResult { data })
    }

    /// Computes the compressed result of `guess` against `objective` without allocating.
    ///
    /// Both slices must have the same length, at most [`MAX_WORD_LENGTH`].
    pub fn compute(guess: &[char], objective: &[char]) -> CompressedGuessResult {
        debug_assert_eq!(guess.len(), objective.len());
        let mut results = [LetterResult::Absent; MAX_WORD_LENGTH];
        let results = &mut results[..guess.len()];
        score_letters(guess, objective, results);
        let data = results
            .iter()
            .rev()
            .fold(0, |acc, result| acc * 3 + result.trit());
        CompressedGuessResult { data }
    }

    /// The dense index of this result, in `0..num_patterns(word_length)`.
    pub fn index(self) -> usize {
        self.data as usize
    }

    /// The number of distinct results for words of the given length: 3<sup>`word_length`</sup>.
    pub fn num_patterns(word_length: usize) -> usize {
        3usize.pow(word_length as u32)
    }
}

impl From<&FeedbackPattern> for CompressedGuessResult {
    fn from(pattern: &FeedbackPattern) -> CompressedGuessResult {
        let data = pattern
            .results
            .iter()
            .rev()
            .fold(0, |acc, result| acc * 3 + result.trit());
        CompressedGuessResult { data }
    }
}

/// The result of a single word guess.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GuessResult<'a> {
    pub guess: &'a str,
    /// The result of each letter, provided in the same letter order as in the guess.
    pub results: FeedbackPattern,
}

/// Determines the result of the given `guess` when applied to the given `objective`.
///
/// ```
/// use wordle_entropy_solver::get_result_for_guess;
/// use wordle_entropy_solver::LetterResult;
///
/// let result = get_result_for_guess("crate", "trace").unwrap();
/// assert_eq!(result.guess, "trace");
/// assert_eq!(result.results.results()[0], LetterResult::Present);
/// ```
pub fn get_result_for_guess<'a>(
    objective: &str,
    guess: &'a str,
) -> Result<GuessResult<'a>, WordleError> {
    Ok(GuessResult {
        guess,
        results: FeedbackPattern::generate(guess, objective)?,
    })
}

/// How a game ended.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum GameResult {
    /// The objective word was identified. `guesses` holds every guess made, ending with `word`.
    Solved {
        word: Arc<str>,
        guesses: Vec<Arc<str>>,
    },
    /// The guesser ran out of attempts, or no possible words remained.
    Failed { guesses: Vec<Arc<str>> },
}

impl GameResult {
    /// The number of attempts used.
    pub fn attempts(&self) -> usize {
        self.guesses().len()
    }

    pub fn guesses(&self) -> &[Arc<str>] {
        match self {
            GameResult::Solved { guesses, .. } | GameResult::Failed { guesses } => guesses,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, GameResult::Solved { .. })
    }
}
