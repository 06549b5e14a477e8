use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;
use wordle_entropy_solver::details::*;
use wordle_entropy_solver::*;

const WORDS: [&str; 16] = [
    "crate", "trace", "slate", "react", "caret", "cater", "stare", "tears", "rates", "aster",
    "eerie", "there", "three", "abbey", "tatty", "steed",
];

fn arc_words(words: &[&str]) -> Vec<Arc<str>> {
    words.iter().map(|word| Arc::from(*word)).collect()
}

fn as_strs(words: &[Arc<str>]) -> Vec<&str> {
    words.iter().map(|word| word.as_ref()).collect()
}

#[test]
fn filter_keeps_only_consistent_words() -> Result<(), WordleError> {
    let pool = arc_words(&["crate", "trace", "slate"]);
    let result = get_result_for_guess("crate", "trace")?;

    let filtered = filter_possible_words(&pool, &result)?;

    assert_eq!(as_strs(&filtered), vec!["crate"]);
    Ok(())
}

#[test]
fn filter_keeps_the_objective_and_never_grows() -> Result<(), WordleError> {
    let pool = arc_words(&WORDS);

    for objective in WORDS {
        for guess in WORDS {
            let result = get_result_for_guess(objective, guess)?;

            let filtered = filter_possible_words(&pool, &result)?;

            assert!(filtered.len() <= pool.len());
            assert!(
                filtered.iter().any(|word| word.as_ref() == objective),
                "{guess} removed {objective}"
            );
        }
    }
    Ok(())
}

#[test]
fn filter_is_idempotent() -> Result<(), WordleError> {
    let mut rng = StdRng::seed_from_u64(3);
    let pool = arc_words(&WORDS);

    for _ in 0..50 {
        let objective = WORDS.choose(&mut rng).copied().unwrap_or("crate");
        let guess = WORDS.choose(&mut rng).copied().unwrap_or("trace");
        let result = get_result_for_guess(objective, guess)?;

        let once = filter_possible_words(&pool, &result)?;
        let twice = filter_possible_words(&once, &result)?;

        assert_eq!(once, twice);
    }
    Ok(())
}

#[test]
fn filter_matches_generated_feedback() -> Result<(), WordleError> {
    let pool = arc_words(&WORDS);

    for objective in WORDS {
        for guess in WORDS {
            let result = get_result_for_guess(objective, guess)?;

            let filtered = filter_possible_words(&pool, &result)?;

            let expected: Vec<&str> = WORDS
                .iter()
                .copied()
                .filter(|word| {
                    FeedbackPattern::generate(guess, word)
                        .map(|pattern| pattern == result.results)
                        .unwrap_or(false)
                })
                .collect();
            assert_eq!(as_strs(&filtered), expected, "{guess} vs {objective}");
        }
    }
    Ok(())
}

#[test]
fn filter_inconsistent_result_returns_everything() -> Result<(), WordleError> {
    let pool = arc_words(&["abba", "baba", "dcdc"]);
    let result = GuessResult {
        guess: "abba",
        results: FeedbackPattern::parse("0010", 4)?,
    };

    let filtered = filter_possible_words(&pool, &result)?;

    assert_eq!(filtered, pool);
    Ok(())
}

#[test]
fn restrictions_from_result() -> Result<(), WordleError> {
    let result = get_result_for_guess("aabby", "abbey")?;

    let restrictions = WordRestrictions::from_result(&result)?;

    assert_eq!(restrictions.position(0), &PositionRestriction::Is('a'));
    assert!(!restrictions.position(1).allows('b'));
    assert_eq!(restrictions.min_count('b'), Some(2));
    assert_eq!(restrictions.exact_count('b'), None);
    assert_eq!(restrictions.min_count('a'), Some(1));
    assert!(restrictions.is_not_present('e'));
    assert!(restrictions.is_satisfied_by("aabby"));
    assert!(!restrictions.is_satisfied_by("abbey"));
    Ok(())
}

#[test]
fn restrictions_absent_duplicate_sets_exact_count() -> Result<(), WordleError> {
    let result = get_result_for_guess("there", "eerie")?;

    let restrictions = WordRestrictions::from_result(&result)?;

    assert_eq!(restrictions.exact_count('e'), Some(2));
    assert_eq!(restrictions.exact_count('r'), None);
    assert_eq!(restrictions.min_count('r'), Some(1));
    assert!(restrictions.is_not_present('i'));
    assert!(!restrictions.is_not_present('e'));
    assert!(restrictions.is_satisfied_by("there"));
    assert!(!restrictions.is_satisfied_by("three"));
    Ok(())
}
