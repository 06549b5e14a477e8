use crate::results::FeedbackPattern;
use crate::results::WordleError;
use log::warn;
use std::io::BufRead;
use std::result::Result;
use std::sync::mpsc;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use std::time::Duration;

/// Provides the feedback for each guess the solver makes.
pub trait FeedbackSource {
    /// Returns the feedback for `guess`.
    ///
    /// Returning [`WordleError::MalformedFeedback`] means the same guess may be asked about
    /// again. Any other error ends the game.
    fn feedback(&mut self, guess: &str) -> Result<FeedbackPattern, WordleError>;
}

impl<F> FeedbackSource for F
where
    F: FnMut(&str) -> Result<FeedbackPattern, WordleError>,
{
    fn feedback(&mut self, guess: &str) -> Result<FeedbackPattern, WordleError> {
        self(guess)
    }
}

/// Scores every guess against a known objective word.
#[derive(Debug, Clone)]
pub struct SimulatedFeedback<'a> {
    objective: &'a str,
}

impl<'a> SimulatedFeedback<'a> {
    pub fn new(objective: &'a str) -> SimulatedFeedback<'a> {
        SimulatedFeedback { objective }
    }
}

impl<'a> FeedbackSource for SimulatedFeedback<'a> {
    fn feedback(&mut self, guess: &str) -> Result<FeedbackPattern, WordleError> {
        FeedbackPattern::generate(guess, self.objective)
    }
}

/// Reads feedback patterns, one per line, from a reader such as stdin.
///
/// The reader is drained on a helper thread so that waiting for a line can be bounded by a
/// timeout. The helper thread stops once the reader is exhausted or this struct is dropped and
/// another line arrives.
pub struct LineFeedback {
    lines: Receiver<std::io::Result<String>>,
    timeout: Option<Duration>,
    word_length: usize,
}

impl LineFeedback {
    /// Starts reading lines from `reader`. Patterns must have `word_length` symbols. With no
    /// `timeout`, waits indefinitely for each line.
    pub fn spawn<R>(reader: R, word_length: usize, timeout: Option<Duration>) -> LineFeedback
    where
        R: BufRead + Send + 'static,
    {
        let (sender, lines) = mpsc::channel();
        thread::spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if sender.send(line).is_err() || failed {
                    break;
                }
            }
        });
        LineFeedback {
            lines,
            timeout,
            word_length,
        }
    }

    /// Waits for the next line of input.
    pub fn next_line(&mut self) -> Result<String, WordleError> {
        let line = match self.timeout {
            Some(timeout) => self.lines.recv_timeout(timeout).map_err(|e| match e {
                RecvTimeoutError::Timeout => WordleError::FeedbackTimeout,
                RecvTimeoutError::Disconnected => WordleError::FeedbackClosed,
            })?,
            None => self
                .lines
                .recv()
                .map_err(|_| WordleError::FeedbackClosed)?,
        };
        Ok(line?)
    }
}

impl FeedbackSource for LineFeedback {
    fn feedback(&mut self, guess: &str) -> Result<FeedbackPattern, WordleError> {
        let line = self.next_line()?;
        FeedbackPattern::parse(&line, self.word_length).map_err(|e| {
            warn!("Could not read feedback for {guess}: {e}");
            e
        })
    }
}
