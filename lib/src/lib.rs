//! Solves Wordle-style puzzles by always guessing the word that is expected to reveal the most
//! information about the objective.
//!
//! ```
//! use wordle_entropy_solver::*;
//!
//! let bank = WordBank::from_iterator(&["crate", "trace", "slate"]).unwrap();
//! let guesser = MaxEntropyGuesser::new(bank.clone(), bank).unwrap();
//!
//! let result = play_game_with_guesser("slate", 6, guesser).unwrap();
//! assert_eq!(result.guesses().last().map(|word| word.as_ref()), Some("slate"));
//! ```

mod data;
mod engine;
mod feedback;
mod language;
mod opening;
mod restrictions;
mod results;
pub mod scorers;

pub use data::WordBank;
pub use engine::*;
pub use feedback::*;
pub use language::Language;
pub use opening::*;
pub use restrictions::filter_possible_words;
pub use results::*;

/// Lower-level types for inspecting what a single observation implies.
pub mod details {
    pub use crate::restrictions::PositionRestriction;
    pub use crate::restrictions::WordRestrictions;
}
