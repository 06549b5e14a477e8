use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::sync::Arc;
use wordle_entropy_solver::scorers::*;
use wordle_entropy_solver::*;

const LETTERS: &[u8] = b"aeioulnrstcdhmp";

fn random_words(count: usize, seed: u64) -> Vec<Arc<str>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let word: String = (0..5)
                .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
                .collect();
            Arc::from(word)
        })
        .collect()
}

fn bench_feedback(c: &mut Criterion) {
    c.bench_function("feedback_generate", |b| {
        b.iter(|| FeedbackPattern::generate(black_box("abbey"), black_box("aabby")))
    });
}

fn bench_select_best(c: &mut Criterion) {
    let guesses = random_words(2000, 1);
    let mut group = c.benchmark_group("select_best");
    for pool_size in [50, 500, 2000] {
        let pool = random_words(pool_size, 2);
        let scorer = match EntropyScorer::new(&pool) {
            Ok(scorer) => scorer,
            Err(e) => panic!("could not build scorer: {e}"),
        };
        for parallel in [false, true] {
            group.bench_with_input(
                BenchmarkId::new(if parallel { "parallel" } else { "sequential" }, pool_size),
                &parallel,
                |b, parallel| b.iter(|| scorer.select_best(&guesses, *parallel)),
            );
        }
    }
    group.finish();
}

fn bench_play_game(c: &mut Criterion) {
    let words = random_words(1000, 3);
    let bank = match WordBank::from_iterator(words.iter()) {
        Ok(bank) => bank,
        Err(e) => panic!("could not build word bank: {e}"),
    };
    let mut objectives = bank.iter().cycle();
    c.bench_function("play_game", |b| {
        b.iter(|| {
            let objective = objectives.next().map(Arc::clone).unwrap_or_else(|| Arc::from("aeiou"));
            let guesser = MaxEntropyGuesser::new(bank.clone(), bank.clone())?;
            play_game_with_guesser(&objective, 10, guesser)
        })
    });
}

criterion_group!(benches, bench_feedback, bench_select_best, bench_play_game);
criterion_main!(benches);
