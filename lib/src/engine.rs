use crate::data::WordBank;
use crate::feedback::FeedbackSource;
use crate::feedback::SimulatedFeedback;
use crate::restrictions::filter_possible_words;
use crate::results::*;
use crate::scorers::EntropyScorer;
use log::{debug, info, warn};
use std::result::Result;
use std::sync::Arc;

/// Settings that control a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// The game is lost once this many guesses have been made without finding the objective.
    pub max_attempts: usize,
    /// Whether to score candidate guesses across threads.
    pub parallel: bool,
    /// How many times a guess may be re-asked after malformed feedback before giving up.
    pub max_feedback_retries: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_attempts: 6,
            parallel: true,
            max_feedback_retries: 3,
        }
    }
}

/// Guesses words in order to solve a single Wordle.
pub trait Guesser {
    /// Updates this guesser with information about a word.
    fn update<'a>(&mut self, result: &'a GuessResult) -> Result<(), WordleError>;

    /// Selects a new guess for the Wordle, or `None` if no words remain.
    fn select_next_guess(&mut self) -> Result<Option<Arc<str>>, WordleError>;

    /// Provides read access to the remaining set of possible words in this guesser.
    fn possible_words(&self) -> &[Arc<str>];

    /// The number of letters in every word this guesser plays.
    fn word_length(&self) -> usize;
}

/// Selects the guess that maximizes the expected information gained about the objective word.
///
/// Candidate guesses are drawn from the guess bank, while the words that could still be the
/// objective are drawn from the solution bank. Ties go to the guess that appears first in the
/// guess bank.
///
/// ```
/// use wordle_entropy_solver::*;
///
/// let bank = WordBank::from_iterator(&["abc", "abd", "xyz", "xyw"]).unwrap();
/// let mut guesser = MaxEntropyGuesser::new(bank.clone(), bank).unwrap();
///
/// assert_eq!(guesser.select_next_guess().unwrap().as_deref(), Some("abc"));
/// ```
#[derive(Debug, Clone)]
pub struct MaxEntropyGuesser {
    guess_words: WordBank,
    possible_words: Vec<Arc<str>>,
    opening_guess: Option<Arc<str>>,
    word_length: usize,
    num_updates: usize,
    parallel: bool,
}

impl MaxEntropyGuesser {
    /// Constructs a guesser that plays words from `guesses` to find one of `solutions`.
    ///
    /// When `guesses` is empty, guesses are drawn from the remaining possible solutions instead.
    pub fn new(guesses: WordBank, solutions: WordBank) -> Result<MaxEntropyGuesser, WordleError> {
        if !guesses.is_empty()
            && !solutions.is_empty()
            && guesses.word_length() != solutions.word_length()
        {
            return Err(WordleError::InvalidLength {
                expected: solutions.word_length(),
                actual: guesses.word_length(),
            });
        }
        let word_length = if solutions.is_empty() {
            guesses.word_length()
        } else {
            solutions.word_length()
        };
        Ok(MaxEntropyGuesser {
            guess_words: guesses,
            possible_words: solutions.to_vec(),
            opening_guess: None,
            word_length,
            num_updates: 0,
            parallel: true,
        })
    }

    /// Plays `guess` first instead of scoring every guess against every solution.
    ///
    /// A word that is not one of the candidate guesses is ignored, and the first guess is scored
    /// as usual.
    pub fn with_opening_guess(mut self, guess: Arc<str>) -> MaxEntropyGuesser {
        if self.candidate_guesses().contains(&guess) {
            self.opening_guess = Some(guess);
        } else {
            warn!("Ignoring opening guess {guess}, which is not in the guess list");
            self.opening_guess = None;
        }
        self
    }

    pub fn with_parallelism(mut self, parallel: bool) -> MaxEntropyGuesser {
        self.parallel = parallel;
        self
    }

    fn candidate_guesses(&self) -> &[Arc<str>] {
        if self.guess_words.is_empty() {
            &self.possible_words
        } else {
            &self.guess_words
        }
    }

    /// Returns up to `n` of the best guesses with their expected entropy, best first.
    ///
    /// With two or fewer possible words left, those words are returned instead, each scored by
    /// the entropy it would yield. This can differ from [`Guesser::select_next_guess`], which
    /// always scores the whole guess list and may pick a word that cannot be the answer.
    pub fn select_top_n_guesses(&self, n: usize) -> Result<Vec<(Arc<str>, f64)>, WordleError> {
        if self.possible_words.is_empty() {
            return Ok(Vec::new());
        }
        let scorer = EntropyScorer::new(&self.possible_words)?;
        if self.possible_words.len() <= 2 {
            return scorer.rank(&self.possible_words, n, false);
        }
        scorer.rank(self.candidate_guesses(), n, self.parallel)
    }
}

impl Guesser for MaxEntropyGuesser {
    fn update<'a>(&mut self, result: &'a GuessResult) -> Result<(), WordleError> {
        let num_before = self.possible_words.len();
        self.possible_words = filter_possible_words(&self.possible_words, result)?;
        self.num_updates += 1;
        debug!(
            "{} {} left {} of {} possible words",
            result.guess,
            result.results,
            self.possible_words.len(),
            num_before
        );
        Ok(())
    }

    fn select_next_guess(&mut self) -> Result<Option<Arc<str>>, WordleError> {
        if self.possible_words.len() <= 1 {
            return Ok(self.possible_words.first().map(Arc::clone));
        }
        if self.num_updates == 0 {
            if let Some(opening) = &self.opening_guess {
                debug!("Opening with {opening}");
                return Ok(Some(Arc::clone(opening)));
            }
        }
        let scorer = EntropyScorer::new(&self.possible_words)?;
        let best = scorer.select_best(self.candidate_guesses(), self.parallel)?;
        if let Some((guess, entropy)) = &best {
            debug!(
                "Selected {guess} ({entropy:.3} bits) against {} possible words",
                self.possible_words.len()
            );
        }
        Ok(best.map(|(guess, _)| guess))
    }

    fn possible_words(&self) -> &[Arc<str>] {
        &self.possible_words
    }

    fn word_length(&self) -> usize {
        self.word_length
    }
}

/// Where a game currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveState {
    /// Waiting for the guess with this zero-based index.
    Round(usize),
    Solved { word: Arc<str>, attempts: usize },
    Failed { attempts: usize },
}

impl SolveState {
    pub fn is_finished(&self) -> bool {
        !matches!(self, SolveState::Round(_))
    }
}

/// Tracks one game: which round it is in, the guesses made so far, and whether it has ended.
///
/// A session moves from `Round(0)` through successive rounds until it is either `Solved` or
/// `Failed`. The guesser's possible words only ever shrink, and the session always ends within
/// `max_attempts` guesses.
pub struct Session<G: Guesser> {
    guesser: G,
    config: SolverConfig,
    state: SolveState,
    guesses: Vec<Arc<str>>,
}

impl<G: Guesser> Session<G> {
    pub fn new(guesser: G, config: SolverConfig) -> Session<G> {
        Session {
            guesser,
            config,
            state: SolveState::Round(0),
            guesses: Vec::new(),
        }
    }

    pub fn state(&self) -> &SolveState {
        &self.state
    }

    pub fn guesser(&self) -> &G {
        &self.guesser
    }

    pub fn guesses(&self) -> &[Arc<str>] {
        &self.guesses
    }

    /// Picks the guess for the current round.
    ///
    /// Returns `None` once the game has ended. When only one possible word remains, that word is
    /// the answer: it counts as a guess and the game ends as solved. When none remain, the game
    /// ends as failed.
    pub fn next_guess(&mut self) -> Result<Option<Arc<str>>, WordleError> {
        let round = match self.state {
            SolveState::Round(round) => round,
            _ => return Ok(None),
        };
        if round >= self.config.max_attempts {
            self.state = SolveState::Failed { attempts: round };
            return Ok(None);
        }
        match self.guesser.possible_words().len() {
            0 => {
                warn!("No possible words remain after {round} guesses");
                self.state = SolveState::Failed { attempts: round };
                Ok(None)
            }
            1 => {
                let word = Arc::clone(&self.guesser.possible_words()[0]);
                self.guesses.push(Arc::clone(&word));
                self.state = SolveState::Solved {
                    word,
                    attempts: round + 1,
                };
                Ok(None)
            }
            _ => self.guesser.select_next_guess(),
        }
    }

    /// Applies the feedback received for `guess` and advances to the next state.
    ///
    /// `guess` need not be the word returned by [`Session::next_guess`]. A guess or feedback of
    /// the wrong length is rejected with [`WordleError::InvalidLength`] and leaves the round
    /// unchanged.
    pub fn record(
        &mut self,
        guess: &str,
        feedback: FeedbackPattern,
    ) -> Result<&SolveState, WordleError> {
        let round = match self.state {
            SolveState::Round(round) => round,
            _ => return Ok(&self.state),
        };
        let word_length = self.guesser.word_length();
        for actual in [guess.chars().count(), feedback.len()] {
            if actual != word_length {
                return Err(WordleError::InvalidLength {
                    expected: word_length,
                    actual,
                });
            }
        }
        let result = GuessResult {
            guess,
            results: feedback,
        };
        if result.results.is_all_hit() {
            let word: Arc<str> = Arc::from(guess);
            self.guesses.push(Arc::clone(&word));
            self.state = SolveState::Solved {
                word,
                attempts: round + 1,
            };
            return Ok(&self.state);
        }
        self.guesser.update(&result)?;
        self.guesses.push(Arc::from(guess));
        self.state = if round + 1 >= self.config.max_attempts {
            SolveState::Failed {
                attempts: round + 1,
            }
        } else {
            SolveState::Round(round + 1)
        };
        Ok(&self.state)
    }

    /// Ends the session, returning how the game went.
    pub fn into_result(self) -> GameResult {
        match self.state {
            SolveState::Solved { word, .. } => GameResult::Solved {
                word,
                guesses: self.guesses,
            },
            _ => GameResult::Failed {
                guesses: self.guesses,
            },
        }
    }
}

/// Plays a full game with `guesser`, asking `source` for the feedback to each guess.
///
/// Malformed feedback does not use up a guess: the same guess is asked about again, up to
/// `config.max_feedback_retries` more times.
pub fn solve<G: Guesser, S: FeedbackSource>(
    guesser: G,
    config: SolverConfig,
    source: &mut S,
) -> Result<GameResult, WordleError> {
    let mut session = Session::new(guesser, config);
    while let Some(guess) = session.next_guess()? {
        let feedback = request_feedback(source, &guess, config.max_feedback_retries)?;
        session.record(&guess, feedback)?;
    }
    let result = session.into_result();
    match &result {
        GameResult::Solved { word, guesses } => {
            info!("Solved {word} in {} guesses", guesses.len())
        }
        GameResult::Failed { guesses } => info!("Failed after {} guesses", guesses.len()),
    }
    Ok(result)
}

/// Asks `source` for the feedback to `guess`, asking again after malformed feedback up to
/// `max_retries` times.
pub fn request_feedback<S: FeedbackSource>(
    source: &mut S,
    guess: &str,
    max_retries: usize,
) -> Result<FeedbackPattern, WordleError> {
    let mut retries = 0;
    loop {
        match source.feedback(guess) {
            Err(WordleError::MalformedFeedback(text)) if retries < max_retries => {
                retries += 1;
                warn!("Ignoring malformed feedback {text:?} for {guess} ({retries}/{max_retries})");
            }
            other => return other,
        }
    }
}

/// Attempts to guess the given word within the maximum number of guesses, using the given
/// guesser.
///
/// ```
/// use wordle_entropy_solver::*;
///
/// let bank = WordBank::from_iterator(&["abc", "def", "ghi"]).unwrap();
/// let guesser = MaxEntropyGuesser::new(bank.clone(), bank).unwrap();
///
/// let result = play_game_with_guesser("def", 4, guesser).unwrap();
/// assert!(result.is_solved());
/// ```
pub fn play_game_with_guesser<G: Guesser>(
    objective: &str,
    max_attempts: usize,
    guesser: G,
) -> Result<GameResult, WordleError> {
    let config = SolverConfig {
        max_attempts,
        ..SolverConfig::default()
    };
    solve(guesser, config, &mut SimulatedFeedback::new(objective))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn bank(words: &[&str]) -> WordBank {
        WordBank::from_iterator(words).unwrap()
    }

    #[test]
    fn new_rejects_mismatched_banks() {
        assert_matches!(
            MaxEntropyGuesser::new(bank(&["abcd"]), bank(&["abc"])),
            Err(WordleError::InvalidLength {
                expected: 3,
                actual: 4
            })
        );
    }

    #[test]
    fn select_next_guess_uses_opening_once() -> Result<(), WordleError> {
        let words = bank(&["abc", "abd", "xyz", "xyw"]);
        let mut guesser = MaxEntropyGuesser::new(words.clone(), words)?
            .with_opening_guess(Arc::from("xyw"))
            .with_parallelism(false);

        assert_eq!(guesser.select_next_guess()?.as_deref(), Some("xyw"));
        guesser.update(&get_result_for_guess("abc", "xyw")?)?;

        assert_eq!(guesser.possible_words().len(), 2);
        assert_ne!(guesser.select_next_guess()?.as_deref(), Some("xyw"));
        Ok(())
    }

    #[test]
    fn select_top_n_with_two_left_returns_them() -> Result<(), WordleError> {
        let guesser = MaxEntropyGuesser::new(bank(&["qqq", "abc"]), bank(&["abc", "abd"]))?;

        let top = guesser.select_top_n_guesses(5)?;

        let words: Vec<&str> = top.iter().map(|(word, _)| word.as_ref()).collect();
        assert_eq!(words, vec!["abc", "abd"]);
        Ok(())
    }

    #[test]
    fn session_solves_single_possible_word() -> Result<(), WordleError> {
        let guesser = MaxEntropyGuesser::new(bank(&["abc", "xyz"]), bank(&["abc"]))?;
        let mut session = Session::new(guesser, SolverConfig::default());

        assert_eq!(session.next_guess()?, None);
        assert_eq!(
            session.state(),
            &SolveState::Solved {
                word: Arc::from("abc"),
                attempts: 1
            }
        );
        Ok(())
    }

    #[test]
    fn session_fails_after_max_attempts() -> Result<(), WordleError> {
        let words = bank(&["abc", "abd", "abe"]);
        let guesser = MaxEntropyGuesser::new(words.clone(), words)?;
        let mut session = Session::new(
            guesser,
            SolverConfig {
                max_attempts: 1,
                ..SolverConfig::default()
            },
        );

        assert!(session.next_guess()?.is_some());
        let state = session.record("xyz", FeedbackPattern::parse("000", 3)?)?;

        assert_eq!(state, &SolveState::Failed { attempts: 1 });
        assert_eq!(session.next_guess()?, None);
        assert_matches!(session.into_result(), GameResult::Failed { guesses } if guesses.len() == 1);
        Ok(())
    }

    #[test]
    fn session_record_after_finish_is_ignored() -> Result<(), WordleError> {
        let guesser = MaxEntropyGuesser::new(bank(&["abc"]), bank(&["abc", "abd"]))?;
        let mut session = Session::new(guesser, SolverConfig::default());

        session.record("abd", FeedbackPattern::parse("222", 3)?)?;
        let state = session.record("abc", FeedbackPattern::parse("000", 3)?)?;

        assert_eq!(
            state,
            &SolveState::Solved {
                word: Arc::from("abd"),
                attempts: 1
            }
        );
        Ok(())
    }

    #[test]
    fn with_opening_guess_ignores_unknown_word() -> Result<(), WordleError> {
        let words = bank(&["abc", "abd", "xyz", "xyw"]);
        let mut guesser = MaxEntropyGuesser::new(words.clone(), words)?
            .with_opening_guess(Arc::from("qrs"))
            .with_parallelism(false);

        assert_eq!(guesser.select_next_guess()?.as_deref(), Some("abc"));
        Ok(())
    }

    #[test]
    fn with_opening_guess_checks_pool_without_guess_list() -> Result<(), WordleError> {
        let mut guesser = MaxEntropyGuesser::new(bank(&[]), bank(&["abc", "xyz"]))?
            .with_opening_guess(Arc::from("xyz"));

        assert_eq!(guesser.select_next_guess()?.as_deref(), Some("xyz"));
        Ok(())
    }

    #[test]
    fn top_guess_matches_next_guess_with_many_left() -> Result<(), WordleError> {
        let words = bank(&["abc", "abd", "xyz", "xyw", "qqq"]);
        let mut guesser = MaxEntropyGuesser::new(words.clone(), words)?;

        let top = guesser.select_top_n_guesses(3)?;

        assert_eq!(top.first().map(|(word, _)| Arc::clone(word)), guesser.select_next_guess()?);
        Ok(())
    }

    #[test]
    fn session_record_rejects_wrong_length_guess() -> Result<(), WordleError> {
        let guesser = MaxEntropyGuesser::new(bank(&["abc", "abd"]), bank(&["abc", "abd"]))?;
        let mut session = Session::new(guesser, SolverConfig::default());

        assert_matches!(
            session.record("ab", FeedbackPattern::parse("22", 2)?),
            Err(WordleError::InvalidLength {
                expected: 3,
                actual: 2
            })
        );
        assert_matches!(
            session.record("abc", FeedbackPattern::parse("2222", 4)?),
            Err(WordleError::InvalidLength {
                expected: 3,
                actual: 4
            })
        );
        assert_eq!(session.state(), &SolveState::Round(0));
        assert!(session.guesses().is_empty());
        assert_eq!(session.guesser().possible_words().len(), 2);
        Ok(())
    }

    #[test]
    fn request_feedback_gives_up_after_retries() {
        let mut calls = 0;
        let mut source = |_: &str| -> Result<FeedbackPattern, WordleError> {
            calls += 1;
            Err(WordleError::MalformedFeedback(String::from("??")))
        };

        assert_matches!(
            request_feedback(&mut source, "abc", 2),
            Err(WordleError::MalformedFeedback(_))
        );
        assert_eq!(calls, 3);
    }
}
