use crate::results::CompressedGuessResult;
use crate::results::Letters;
use crate::results::WordleError;
use log::trace;
use rayon::prelude::*;
use std::result::Result;
use std::sync::Arc;

/// A reusable tally of how many possible words produce each feedback pattern for one guess.
///
/// Each scoring call clears it first, so one buffer can be reused across every guess in a round.
#[derive(Debug, Default, Clone)]
pub struct PatternCounts {
    counts: Vec<u32>,
}

impl PatternCounts {
    pub fn new() -> PatternCounts {
        PatternCounts::default()
    }

    fn reset(&mut self, word_length: usize) {
        self.counts.clear();
        self.counts
            .resize(CompressedGuessResult::num_patterns(word_length), 0);
    }

    fn record(&mut self, result: CompressedGuessResult) {
        self.counts[result.index()] += 1;
    }

    /// The number of distinct patterns recorded since the last reset.
    pub fn num_distinct(&self) -> usize {
        self.counts.iter().filter(|count| **count > 0).count()
    }

    /// The Shannon entropy, in bits, of the recorded distribution.
    fn entropy(&self, total: usize) -> f64 {
        let total = total as f64;
        self.counts
            .iter()
            .filter(|count| **count > 0)
            .map(|count| {
                let p = *count as f64 / total;
                -p * p.log2()
            })
            .fold(0.0, |sum, term| sum + term)
    }
}

/// Computes the expected information, in bits, gained by guessing `guess` when the objective is
/// equally likely to be any of `possible_words`.
///
/// ```
/// use std::sync::Arc;
/// use wordle_entropy_solver::scorers::expected_entropy;
///
/// let pool: Vec<Arc<str>> = vec![Arc::from("crate"), Arc::from("slate")];
/// assert_eq!(expected_entropy("crate", &pool).unwrap(), 1.0);
/// ```
pub fn expected_entropy(guess: &str, possible_words: &[Arc<str>]) -> Result<f64, WordleError> {
    EntropyScorer::new(possible_words)?.score_word(guess, &mut PatternCounts::new())
}

/// Scores guesses by their expected entropy over a fixed set of possible words.
#[derive(Debug, Clone)]
pub struct EntropyScorer {
    possible_words: Vec<Letters>,
    word_length: usize,
}

impl EntropyScorer {
    /// Prepares to score guesses against `possible_words`, which must be non-empty and share one
    /// word length.
    pub fn new(possible_words: &[Arc<str>]) -> Result<EntropyScorer, WordleError> {
        let possible_words = possible_words
            .iter()
            .map(|word| Letters::from_word(word))
            .collect::<Result<Vec<Letters>, WordleError>>()?;
        let word_length = possible_words
            .first()
            .map(|letters| letters.as_slice().len())
            .ok_or(WordleError::EmptyPool)?;
        if let Some(other) = possible_words
            .iter()
            .find(|letters| letters.as_slice().len() != word_length)
        {
            return Err(WordleError::InvalidLength {
                expected: word_length,
                actual: other.as_slice().len(),
            });
        }
        Ok(EntropyScorer {
            possible_words,
            word_length,
        })
    }

    pub fn num_possible_words(&self) -> usize {
        self.possible_words.len()
    }

    /// The expected entropy of `guess`, tallied into `counts`.
    pub fn score_word(&self, guess: &str, counts: &mut PatternCounts) -> Result<f64, WordleError> {
        let guess_letters = Letters::from_word(guess)?;
        let guess_letters = guess_letters.as_slice();
        if guess_letters.len() != self.word_length {
            return Err(WordleError::InvalidLength {
                expected: self.word_length,
                actual: guess_letters.len(),
            });
        }
        counts.reset(self.word_length);
        for objective in &self.possible_words {
            counts.record(CompressedGuessResult::compute(
                guess_letters,
                objective.as_slice(),
            ));
        }
        let entropy = counts.entropy(self.possible_words.len());
        trace!(
            "{guess}: {entropy:.4} bits over {} patterns",
            counts.num_distinct()
        );
        Ok(entropy)
    }

    /// Scores every word in `guesses`, in order.
    pub fn score_all(
        &self,
        guesses: &[Arc<str>],
        parallel: bool,
    ) -> Result<Vec<f64>, WordleError> {
        if parallel {
            guesses
                .par_iter()
                .map_init(PatternCounts::new, |counts, guess| {
                    self.score_word(guess, counts)
                })
                .collect()
        } else {
            let mut counts = PatternCounts::new();
            guesses
                .iter()
                .map(|guess| self.score_word(guess, &mut counts))
                .collect()
        }
    }

    /// Returns the guess with the highest expected entropy, along with that entropy. When several
    /// guesses tie, the one that comes first in `guesses` wins.
    pub fn select_best(
        &self,
        guesses: &[Arc<str>],
        parallel: bool,
    ) -> Result<Option<(Arc<str>, f64)>, WordleError> {
        let scores = self.score_all(guesses, parallel)?;
        let mut best: Option<(usize, f64)> = None;
        for (index, score) in scores.into_iter().enumerate() {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((index, score)),
            }
        }
        Ok(best.map(|(index, score)| (Arc::clone(&guesses[index]), score)))
    }

    /// Returns up to `n` guesses with the highest expected entropy, best first. Ties keep the
    /// order of `guesses`.
    pub fn rank(
        &self,
        guesses: &[Arc<str>],
        n: usize,
        parallel: bool,
    ) -> Result<Vec<(Arc<str>, f64)>, WordleError> {
        let scores = self.score_all(guesses, parallel)?;
        let mut ranked: Vec<(Arc<str>, f64)> = guesses.iter().map(Arc::clone).zip(scores).collect();
        // Stable, so equal scores stay in vocabulary order.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(n);
        Ok(ranked)
    }
}

/// Returns up to `n` of `guesses` with the highest expected entropy against `possible_words`.
pub fn rank_guesses(
    guesses: &[Arc<str>],
    possible_words: &[Arc<str>],
    n: usize,
) -> Result<Vec<(Arc<str>, f64)>, WordleError> {
    EntropyScorer::new(possible_words)?.rank(guesses, n, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc_words(words: &[&str]) -> Vec<Arc<str>> {
        words.iter().map(|word| Arc::from(*word)).collect()
    }

    #[test]
    fn pattern_counts_entropy() {
        let mut counts = PatternCounts::new();
        counts.reset(1);
        counts.counts[0] = 2;
        counts.counts[2] = 2;

        assert_eq!(counts.entropy(4), 1.0);
        assert_eq!(counts.num_distinct(), 2);
    }

    #[test]
    fn single_pattern_scores_positive_zero() -> Result<(), WordleError> {
        let scorer = EntropyScorer::new(&arc_words(&["abc", "abd"]))?;

        let entropy = scorer.score_word("xyz", &mut PatternCounts::new())?;

        assert_eq!(entropy, 0.0);
        assert!(entropy.is_sign_positive());
        assert_eq!(format!("{entropy:.2}"), "0.00");
        Ok(())
    }

    #[test]
    fn pattern_counts_reset_clears() {
        let mut counts = PatternCounts::new();
        counts.reset(2);
        counts.counts[4] = 7;

        counts.reset(2);

        assert_eq!(counts.counts.len(), 9);
        assert_eq!(counts.num_distinct(), 0);
    }

    #[test]
    fn scorer_new_empty_pool() {
        assert!(matches!(EntropyScorer::new(&[]), Err(WordleError::EmptyPool)));
    }

    #[test]
    fn scorer_new_mixed_lengths() {
        assert!(matches!(
            EntropyScorer::new(&arc_words(&["abc", "abcd"])),
            Err(WordleError::InvalidLength {
                expected: 3,
                actual: 4
            })
        ));
    }

    #[test]
    fn score_word_reuses_counts() -> Result<(), WordleError> {
        let scorer = EntropyScorer::new(&arc_words(&["abc", "abd", "xyz", "xyw"]))?;
        let mut counts = PatternCounts::new();

        // abc: 222, 220, 000, 000
        let first = scorer.score_word("abc", &mut counts)?;
        // xyz: 000, 000, 222, 220
        let second = scorer.score_word("xyz", &mut counts)?;

        assert_eq!(first, 1.5);
        assert_eq!(second, 1.5);
        Ok(())
    }

    #[test]
    fn score_word_wrong_length() -> Result<(), WordleError> {
        let scorer = EntropyScorer::new(&arc_words(&["abc"]))?;

        assert!(matches!(
            scorer.score_word("ab", &mut PatternCounts::new()),
            Err(WordleError::InvalidLength {
                expected: 3,
                actual: 2
            })
        ));
        Ok(())
    }

    #[test]
    fn select_best_ties_go_to_first() -> Result<(), WordleError> {
        let scorer = EntropyScorer::new(&arc_words(&["abc", "xyz"]))?;
        let guesses = arc_words(&["qqq", "xyz", "abc", "abz"]);

        let best = scorer.select_best(&guesses, false)?;

        assert_eq!(best, Some((Arc::from("xyz"), 1.0)));
        Ok(())
    }

    #[test]
    fn select_best_parallel_matches_sequential() -> Result<(), WordleError> {
        let pool = arc_words(&["crane", "crate", "trace", "slate", "react", "caret"]);
        let scorer = EntropyScorer::new(&pool)?;

        assert_eq!(
            scorer.select_best(&pool, true)?,
            scorer.select_best(&pool, false)?
        );
        Ok(())
    }

    #[test]
    fn select_best_no_guesses() -> Result<(), WordleError> {
        let scorer = EntropyScorer::new(&arc_words(&["abc"]))?;

        assert_eq!(scorer.select_best(&[], true)?, None);
        Ok(())
    }

    #[test]
    fn rank_orders_by_entropy_then_vocabulary() -> Result<(), WordleError> {
        let scorer = EntropyScorer::new(&arc_words(&["abc", "abd", "xyz", "xyw"]))?;
        let guesses = arc_words(&["qqq", "abd", "cdw", "abc"]);

        let ranked = scorer.rank(&guesses, 3, true)?;

        let words: Vec<&str> = ranked.iter().map(|(word, _)| word.as_ref()).collect();
        assert_eq!(words, vec!["cdw", "abd", "abc"]);
        assert_eq!(ranked[0].1, 2.0);
        assert_eq!(ranked[1].1, 1.5);
        assert_eq!(ranked[2].1, 1.5);
        Ok(())
    }
}
