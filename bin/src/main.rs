use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn, LevelFilter};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::fs::File;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::result::Result;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;
use wordle_entropy_solver::*;

/// Solves Wordle-style puzzles by guessing the word expected to reveal the most information.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a file that contains the words that may be guessed, with one word on each line.
    #[arg(short = 'f', long)]
    guesses_file: PathBuf,

    /// Path to a file that contains the words that may be the answer. Defaults to the guesses
    /// file.
    #[arg(short, long)]
    solutions_file: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = LanguageArg::English)]
    language: LanguageArg,

    #[arg(short, long, default_value_t = 6)]
    max_attempts: usize,

    /// A RON file of precomputed opening guesses, as written by the `opening` command. Its
    /// entries take precedence over the built-in ones.
    #[arg(long)]
    opening_cache: Option<PathBuf>,

    /// Compute the first guess from scratch instead of using a precomputed opening guess.
    #[arg(long)]
    no_opening: bool,

    /// Number of threads used to score guesses. Defaults to one per CPU.
    #[arg(long)]
    threads: Option<usize>,

    /// Seconds to wait for each line of input in interactive mode. Waits forever by default.
    #[arg(long)]
    feedback_timeout: Option<u64>,

    /// Log more detail. Repeat for even more.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LanguageArg {
    English,
    Hebrew,
}

impl LanguageArg {
    fn language(self) -> Language {
        match self {
            LanguageArg::English => Language::english(),
            LanguageArg::Hebrew => Language::hebrew(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Benchmark the solver against every word in the solutions file.
    Benchmark,
    /// Run a single game with the given word.
    Single { word: String },
    /// Suggest guesses for a game played elsewhere, such as on the official site.
    Interactive,
    /// Compute the best opening guesses for the word lists.
    Opening {
        /// How many guesses to keep.
        #[arg(short, long, default_value_t = 5)]
        top: usize,
        /// Add the result to this RON file, creating it if needed.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

struct Solver {
    language: Language,
    /// Names the word lists in the opening guess cache.
    vocabulary: String,
    guesses: WordBank,
    solutions: WordBank,
    openings: OpeningGuessCache,
    config: SolverConfig,
    use_opening: bool,
}

impl Solver {
    /// The cached opening guesses for these word lists, limited to words that can be played.
    ///
    /// Entries computed for this guesses file come first, then the language's built-in table.
    fn opening(&self) -> Option<OpeningGuesses> {
        if !self.use_opening {
            return None;
        }
        let word_length = self.solutions.word_length();
        let playable: &[Arc<str>] = if self.guesses.is_empty() {
            &self.solutions
        } else {
            &self.guesses
        };
        [self.vocabulary.as_str(), self.language.name]
            .into_iter()
            .filter_map(|vocabulary| self.openings.lookup(vocabulary, word_length))
            .find_map(|entry| entry.playable_in(playable))
    }

    fn new_guesser(&self) -> Result<MaxEntropyGuesser, WordleError> {
        let guesser = MaxEntropyGuesser::new(self.guesses.clone(), self.solutions.clone())?
            .with_parallelism(self.config.parallel);
        let opening = self.opening();
        Ok(match opening.as_ref().and_then(OpeningGuesses::best) {
            Some(word) => guesser.with_opening_guess(Arc::clone(word)),
            None => guesser,
        })
    }

    fn display(&self, word: &str) -> String {
        self.language.display(word)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let start_time = Instant::now();
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let language = args.language.language();
    let vocabulary = match args.guesses_file.file_stem() {
        Some(stem) => stem.to_string_lossy().into_owned(),
        None => language.name.to_owned(),
    };
    let guesses = read_word_bank(&args.guesses_file, &language)?;
    let solutions = match &args.solutions_file {
        Some(path) => read_word_bank(path, &language)?,
        None => guesses.clone(),
    };
    println!(
        "There are {} possible guesses and {} possible answers.",
        guesses.len(),
        solutions.len()
    );

    let mut openings = OpeningGuessCache::builtin();
    if let Some(path) = &args.opening_cache {
        openings.merge(read_opening_cache(path)?);
    }

    let solver = Solver {
        language,
        vocabulary,
        guesses,
        solutions,
        openings,
        config: SolverConfig {
            max_attempts: args.max_attempts,
            ..SolverConfig::default()
        },
        use_opening: !args.no_opening,
    };

    match args.command {
        Command::Benchmark => run_benchmark(&solver)?,
        Command::Single { word } => play_single_game(&word, &solver)?,
        Command::Interactive => {
            play_interactive_game(&solver, args.feedback_timeout.map(Duration::from_secs))?
        }
        Command::Opening { top, output } => compute_opening(&solver, top, output.as_deref())?,
    }

    println!(
        "Command executed in {:.3}s.",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn read_word_bank(path: &Path, language: &Language) -> Result<WordBank, WordleError> {
    let mut reader = io::BufReader::new(File::open(path)?);
    let bank = WordBank::from_reader(&mut reader)?;
    bank.validate(language)?;
    info!("Read {} words from {}", bank.len(), path.display());
    Ok(bank)
}

fn read_opening_cache(path: &Path) -> Result<OpeningGuessCache, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    Ok(ron::from_str::<OpeningGuessCache>(&text)?)
}

fn run_benchmark(solver: &Solver) -> Result<(), WordleError> {
    // Each game runs on its own thread, so the games themselves score guesses sequentially.
    let results = solver
        .solutions
        .par_iter()
        .map(|objective| -> Result<(Arc<str>, GameResult), WordleError> {
            let guesser = solver.new_guesser()?.with_parallelism(false);
            let config = SolverConfig {
                parallel: false,
                ..solver.config
            };
            let result = solve(guesser, config, &mut SimulatedFeedback::new(objective))?;
            Ok((Arc::clone(objective), result))
        })
        .collect::<Result<Vec<(Arc<str>, GameResult)>, WordleError>>()?;

    let mut num_games_per_round: BTreeMap<usize, usize> = BTreeMap::new();
    let mut num_guesses_per_game: Vec<usize> = Vec::new();
    let mut failures: Vec<&str> = Vec::new();
    for (objective, result) in results.iter() {
        if result.is_solved() {
            *num_games_per_round.entry(result.attempts()).or_insert(0) += 1;
            num_guesses_per_game.push(result.attempts());
        } else {
            failures.push(objective);
        }
    }
    println!("Played {} games. Results:", results.len());

    println!("|Num guesses|Num games|");
    println!("|-----------|---------|");
    for (num_guesses, num_games) in num_games_per_round.iter() {
        println!("|{}|{}|", num_guesses, num_games);
    }

    if !num_guesses_per_game.is_empty() {
        let num_games = num_guesses_per_game.len() as f64;
        let average = num_guesses_per_game.iter().sum::<usize>() as f64 / num_games;
        let std_dev = (num_guesses_per_game
            .iter()
            .map(|num_guesses| (*num_guesses as f64 - average).powi(2))
            .sum::<f64>()
            / num_games)
            .sqrt();
        println!(
            "\n**Average number of guesses:** {:.2} +/- {:.2}",
            average, std_dev
        );
    }

    if !failures.is_empty() {
        println!("\nFailed to solve {} words:", failures.len());
        for word in failures {
            println!("\t{}", solver.display(word));
        }
    }
    Ok(())
}

fn play_single_game(word: &str, solver: &Solver) -> Result<(), WordleError> {
    // Words are typed as they are displayed, so convert back to the stored spelling.
    let objective = solver.display(&word.trim().to_lowercase());
    if !solver
        .solutions
        .iter()
        .any(|solution| solution.as_ref() == objective.as_str())
    {
        warn!("{word} is not in the solutions list");
    }
    let result = solve(
        solver.new_guesser()?,
        solver.config,
        &mut SimulatedFeedback::new(&objective),
    )?;
    match &result {
        GameResult::Solved { guesses, .. } => {
            println!("Solved it! It took me {} guesses.", guesses.len());
        }
        GameResult::Failed { guesses } => {
            println!(
                "I still couldn't solve it after {} guesses :(",
                guesses.len()
            );
        }
    }
    for guess in result.guesses() {
        println!("\t{}", solver.display(guess));
    }
    Ok(())
}

fn print_suggestions(solver: &Solver, suggestions: &[(Arc<str>, f64)]) {
    println!("Top guesses are:");
    for (word, entropy) in suggestions {
        println!("\t{} ({:.2})", solver.display(word), entropy);
    }
}

fn play_interactive_game(solver: &Solver, timeout: Option<Duration>) -> Result<(), WordleError> {
    let word_length = solver.solutions.word_length();
    let mut input = LineFeedback::spawn(io::BufReader::new(io::stdin()), word_length, timeout);
    let mut session = Session::new(solver.new_guesser()?, solver.config);

    println!(
        "Play each guess, then enter the result for each letter as:\n\n\
           * '0' = this letter is not in the word\n\
           * '1' = this letter is in the word, but not in this location\n\
           * '2' = this letter is in the word and in the right location.\n\n\
         For example, if the word was \"spade\" and the guess was \"soapy\", you would enter \"20210\"."
    );

    loop {
        let round = match session.state() {
            SolveState::Round(round) => *round,
            _ => break,
        };
        let possible_words = session.guesser().possible_words();
        // The list shown to the user, whose first entry is offered as the default guess.
        let shown = if possible_words.len() == 2 {
            println!(
                "The word is either {} or {}.",
                solver.display(&possible_words[0]),
                solver.display(&possible_words[1])
            );
            session.guesser().select_top_n_guesses(2)?
        } else if possible_words.len() > 2 {
            let suggestions = match solver.opening() {
                Some(opening) if round == 0 => opening.guesses,
                _ => session.guesser().select_top_n_guesses(5)?,
            };
            print_suggestions(solver, &suggestions);
            suggestions
        } else {
            Vec::new()
        };

        let Some(selected) = session.next_guess()? else {
            break;
        };
        let suggestion = match shown.first() {
            Some((word, _)) => Arc::clone(word),
            None => selected,
        };
        println!(
            "Enter your guess (or press enter to play {}):",
            solver.display(&suggestion)
        );
        let typed = input.next_line()?;
        let typed = typed.trim().to_lowercase();
        let guess: Arc<str> = if typed.is_empty() {
            suggestion
        } else {
            Arc::from(solver.display(&typed))
        };
        if guess.chars().count() != word_length {
            println!("Guesses must have {word_length} letters. Try again.");
            continue;
        }

        println!("How did {} do?", solver.display(&guess));
        let mut read_pattern = |_: &str| -> Result<FeedbackPattern, WordleError> {
            FeedbackPattern::parse(&input.next_line()?, word_length)
        };
        let feedback = request_feedback(
            &mut read_pattern,
            &guess,
            solver.config.max_feedback_retries,
        )?;
        session.record(&guess, feedback)?;
    }

    match session.into_result() {
        GameResult::Solved { word, guesses } => println!(
            "The word is {}! It took {} guesses.",
            solver.display(&word),
            guesses.len()
        ),
        GameResult::Failed { guesses } => {
            println!("I couldn't find it after {} guesses :(", guesses.len())
        }
    }
    Ok(())
}

fn compute_opening(solver: &Solver, top: usize, output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let opening = OpeningGuesses::compute(
        &solver.vocabulary,
        &solver.guesses,
        &solver.solutions,
        top,
        true,
    )?;
    print_suggestions(solver, &opening.guesses);

    if let Some(path) = output {
        let mut cache = if path.exists() {
            read_opening_cache(path)?
        } else {
            OpeningGuessCache::new()
        };
        cache.insert(opening);
        fs::write(
            path,
            ron::ser::to_string_pretty(&cache, ron::ser::PrettyConfig::default())?,
        )?;
        println!("Wrote opening guesses to {}", path.display());
    }
    Ok(())
}
