//! Performance benchmarks for the Hearth engine
//!
//! Measures game execution using Criterion.rs in three modes:
//!
//! 1. **Fresh** - build a new match for each iteration
//! 2. **Snapshot** - clone a pre-built match each iteration
//! 3. **Speculate** - enumerate legal actions on a mid-game board
//!
//! Matches are RandomController vs RandomController with the built-in
//! mage and warrior decks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hearth_engine::{
    core::HeroClass,
    game::{Action, Game, NullChannel},
    loader::GameInitializer,
    tournament::{play_match, ControllerType, MatchSetup},
    Result,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::time::{Duration, Instant};

/// Metrics collected during game execution
#[derive(Debug, Clone)]
struct GameMetrics {
    turns: u32,
    /// Events recorded over the match
    events: usize,
    duration: Duration,
}

impl GameMetrics {
    fn games_per_sec(&self) -> f64 {
        1.0 / self.duration.as_secs_f64()
    }

    fn events_per_sec(&self) -> f64 {
        self.events as f64 / self.duration.as_secs_f64()
    }

    fn turns_per_sec(&self) -> f64 {
        self.turns as f64 / self.duration.as_secs_f64()
    }
}

fn new_match(init: &GameInitializer) -> Result<Game> {
    init.builtin_match(HeroClass::Mage, HeroClass::Warrior)
}

/// Run a single game and collect metrics
fn run_game_with_metrics(init: &GameInitializer, seed: u64) -> Result<GameMetrics> {
    let start = Instant::now();
    let mut game = new_match(init)?;
    let result = play_match(&mut game, &MatchSetup::new(ControllerType::Random, ControllerType::Random, seed))?;
    Ok(GameMetrics {
        turns: result.turns_played,
        events: game.events().len(),
        duration: start.elapsed(),
    })
}

/// Benchmark: Fresh mode - allocate new game each iteration
fn bench_game_fresh(c: &mut Criterion) {
    let init = GameInitializer::new();
    let mut group = c.benchmark_group("game_execution");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let seed = 42u64;
    println!("\nWarmup game (seed {seed}):");
    if let Ok(metrics) = run_game_with_metrics(&init, seed) {
        println!("  Turns: {}", metrics.turns);
        println!("  Events: {}", metrics.events);
        println!("  Duration: {:?}", metrics.duration);
        println!("  Games/sec: {:.2}", metrics.games_per_sec());
        println!("  Events/sec: {:.2}", metrics.events_per_sec());
        println!("  Turns/sec: {:.2}", metrics.turns_per_sec());
    }

    group.bench_with_input(BenchmarkId::new("fresh", seed), &seed, |b, &seed| {
        b.iter(|| run_game_with_metrics(&init, black_box(seed)).expect("Game should complete successfully"));
    });
    group.finish();
}

/// Benchmark: Snapshot mode - clone the unstarted match each iteration
fn bench_game_snapshot(c: &mut Criterion) {
    let init = GameInitializer::new();
    let initial = new_match(&init).expect("Failed to initialize game");

    let mut group = c.benchmark_group("game_execution");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let seed = 42u64;
    group.bench_function(BenchmarkId::new("snapshot", seed), |b| {
        b.iter(|| {
            let mut game = initial.clone();
            play_match(&mut game, &MatchSetup::new(ControllerType::Random, ControllerType::Random, seed))
                .expect("Game should complete successfully")
        });
    });
    group.finish();
}

/// Benchmark: legal action enumeration, which speculates every candidate
fn bench_speculation(c: &mut Criterion) {
    let init = GameInitializer::new();
    let mut game = new_match(&init).expect("Failed to initialize game");
    game.start(&mut NullChannel).expect("Failed to start game");

    // Advance to a busy mid-game board
    let mut rng = ChaCha12Rng::seed_from_u64(7);
    while game.state().turn_number() < 12 && game.result().is_none() {
        let actions = game.snapshot().legal_actions();
        let action = *actions.choose(&mut rng).unwrap_or(&Action::EndTurn);
        game.resolve(&action, &mut NullChannel).expect("legal action should resolve");
    }

    c.bench_function("legal_actions_mid_game", |b| {
        b.iter(|| black_box(game.snapshot().legal_actions()));
    });
}

criterion_group!(benches, bench_game_fresh, bench_game_snapshot, bench_speculation);
criterion_main!(benches);
