//! Tournament mode for running many matches in parallel and collecting statistics
//!
//! Matches run on the rayon pool. Each one derives its deck pairing, channel
//! seed and controller seeds from the tournament seed and its own index, so
//! a tournament is reproducible regardless of thread scheduling.

use crate::core::PlayerHandle;
use crate::game::{
    ControllerChannel, Game, GameLogger, GameLoop, GameResult, PlayerController, RandomController,
    VerbosityLevel, ZeroController,
};
use crate::loader::{DeckList, GameInitializer};
use crate::{EngineError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Controller type for automated matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerType {
    Zero,
    Random,
}

impl ControllerType {
    pub fn build(self, player: PlayerHandle, seed: u64) -> Box<dyn PlayerController> {
        match self {
            ControllerType::Zero => Box::new(ZeroController::new(player)),
            ControllerType::Random => Box::new(RandomController::with_seed(player, seed)),
        }
    }
}

/// How to run one automated match
#[derive(Debug, Clone, Copy)]
pub struct MatchSetup {
    pub p1: ControllerType,
    pub p2: ControllerType,
    /// Seeds the channel's shuffles and picks; controller seeds derive from it
    pub seed: u64,
    pub max_turns: u32,
}

impl MatchSetup {
    pub fn new(p1: ControllerType, p2: ControllerType, seed: u64) -> Self {
        MatchSetup {
            p1,
            p2,
            seed,
            max_turns: 200,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Seeded, silent channel for `game`
    pub fn channel(&self, game: &Game) -> ControllerChannel {
        let [p1, p2] = game.player_handles();
        ControllerChannel::new(
            self.p1.build(p1, self.seed.wrapping_add(0x1234_5678_9ABC_DEF0)),
            self.p2.build(p2, self.seed.wrapping_add(0xFEDC_BA98_7654_3210)),
        )
        .with_seed(self.seed)
        .with_logger(GameLogger::with_verbosity(VerbosityLevel::Silent))
    }
}

/// Play `game` to the end without output
pub fn play_match(game: &mut Game, setup: &MatchSetup) -> Result<GameResult> {
    let mut channel = setup.channel(game);
    GameLoop::new(game).with_max_turns(setup.max_turns).run_game(&mut channel)
}

/// Tournament parameters
#[derive(Debug, Clone, Copy)]
pub struct TournamentConfig {
    /// Stop after this many matches
    pub games: Option<usize>,
    /// Stop starting new matches after this long
    pub seconds: Option<u64>,
    pub p1: ControllerType,
    pub p2: ControllerType,
    pub seed: u64,
    pub max_turns: u32,
}

/// Win/loss record for one (first deck, second deck) pairing
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MatchupRecord {
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
}

impl MatchupRecord {
    pub fn total(&self) -> usize {
        self.first_wins + self.second_wins + self.draws
    }
}

/// Statistics collected during tournament
#[derive(Debug, Default, Clone)]
pub struct TournamentStats {
    pub p1_wins: usize,
    pub p2_wins: usize,
    pub draws: usize,
    /// Matches that ended in an engine error
    pub failures: usize,
    pub deck_wins: BTreeMap<String, usize>,
    pub deck_games: BTreeMap<String, usize>,
    pub matchups: BTreeMap<(String, String), MatchupRecord>,
}

/// One finished tournament match
struct Outcome {
    first_deck: String,
    second_deck: String,
    /// Seat of the winner
    winner: Option<usize>,
}

impl TournamentStats {
    pub fn games(&self) -> usize {
        self.p1_wins + self.p2_wins + self.draws
    }

    fn record(&mut self, outcome: Result<Outcome>) {
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(_) => {
                self.failures += 1;
                return;
            }
        };
        *self.deck_games.entry(outcome.first_deck.clone()).or_default() += 1;
        *self.deck_games.entry(outcome.second_deck.clone()).or_default() += 1;
        let record = self
            .matchups
            .entry((outcome.first_deck.clone(), outcome.second_deck.clone()))
            .or_default();
        match outcome.winner {
            Some(0) => {
                self.p1_wins += 1;
                record.first_wins += 1;
                *self.deck_wins.entry(outcome.first_deck).or_default() += 1;
            }
            Some(_) => {
                self.p2_wins += 1;
                record.second_wins += 1;
                *self.deck_wins.entry(outcome.second_deck).or_default() += 1;
            }
            None => {
                self.draws += 1;
                record.draws += 1;
            }
        }
    }

    fn merge(mut self, other: TournamentStats) -> TournamentStats {
        self.p1_wins += other.p1_wins;
        self.p2_wins += other.p2_wins;
        self.draws += other.draws;
        self.failures += other.failures;
        for (deck, wins) in other.deck_wins {
            *self.deck_wins.entry(deck).or_default() += wins;
        }
        for (deck, games) in other.deck_games {
            *self.deck_games.entry(deck).or_default() += games;
        }
        for (pairing, record) in other.matchups {
            let mine = self.matchups.entry(pairing).or_default();
            mine.first_wins += record.first_wins;
            mine.second_wins += record.second_wins;
            mine.draws += record.draws;
        }
        self
    }

    /// Print the summary tables
    pub fn print_report(&self) {
        let percent = |n: usize, total: usize| 100.0 * n as f64 / total.max(1) as f64;

        println!("=== Player Position Statistics ===");
        let total = self.games();
        println!("P1 wins: {} ({:.1}%)", self.p1_wins, percent(self.p1_wins, total));
        println!("P2 wins: {} ({:.1}%)", self.p2_wins, percent(self.p2_wins, total));
        println!("Draws: {} ({:.1}%)", self.draws, percent(self.draws, total));
        if self.failures > 0 {
            println!("Failed matches: {}", self.failures);
        }

        println!("\n=== Deck Win Rates ===");
        for (deck, games) in &self.deck_games {
            let wins = self.deck_wins.get(deck).copied().unwrap_or(0);
            println!("  {deck}: {wins}/{games} ({:.1}%)", percent(wins, *games));
        }

        println!("\n=== Matchup Results ===");
        for ((first, second), record) in &self.matchups {
            let n = record.total();
            println!("  {first} (first) vs {second}: {n} games");
            println!("    {first} wins: {} ({:.1}%)", record.first_wins, percent(record.first_wins, n));
            println!("    {second} wins: {} ({:.1}%)", record.second_wins, percent(record.second_wins, n));
            if record.draws > 0 {
                println!("    Draws: {} ({:.1}%)", record.draws, percent(record.draws, n));
            }
        }
    }
}

/// Per-match seed, spread so neighbouring indices get unrelated streams
fn match_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Run tournament mode: random deck pairings, played in parallel
pub fn run_tourney(
    initializer: &GameInitializer,
    decks: &[(String, DeckList)],
    config: &TournamentConfig,
) -> Result<TournamentStats> {
    if decks.is_empty() {
        return Err(EngineError::InvalidDeckFormat("Tournament requires at least 1 deck".to_string()));
    }
    let total_games = match (config.games, config.seconds) {
        (Some(games), _) => games,
        (None, Some(_)) => usize::MAX,
        (None, None) => {
            return Err(EngineError::InvalidDecision(
                "Must specify either a game count or a time limit".to_string(),
            ))
        }
    };
    let deadline = config.seconds.map(|s| Instant::now() + Duration::from_secs(s));

    let stats = (0..total_games)
        .into_par_iter()
        .map(|index| {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return None;
            }
            let seed = match_seed(config.seed, index);
            let mut pairing = ChaCha12Rng::seed_from_u64(seed);
            let (first_name, first) = &decks[pairing.gen_range(0..decks.len())];
            let (second_name, second) = &decks[pairing.gen_range(0..decks.len())];

            let outcome = initializer.deck_match(first, second).and_then(|mut game| {
                let setup = MatchSetup::new(config.p1, config.p2, seed).with_max_turns(config.max_turns);
                let result = play_match(&mut game, &setup)?;
                let winner = result.winner.and_then(|w| game.state().seat_of(w).ok());
                Ok(Outcome {
                    first_deck: first_name.clone(),
                    second_deck: second_name.clone(),
                    winner,
                })
            });
            Some(outcome)
        })
        .while_some()
        .fold(TournamentStats::default, |mut stats, outcome| {
            stats.record(outcome);
            stats
        })
        .reduce(TournamentStats::default, TournamentStats::merge);

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HeroClass;
    use crate::loader::class_deck;

    fn decks() -> Vec<(String, DeckList)> {
        [HeroClass::Mage, HeroClass::Warrior]
            .into_iter()
            .map(|class| (class.to_string(), class_deck(class)))
            .collect()
    }

    #[test]
    fn test_tourney_counts_every_game() {
        let config = TournamentConfig {
            games: Some(6),
            seconds: None,
            p1: ControllerType::Random,
            p2: ControllerType::Zero,
            seed: 11,
            max_turns: 80,
        };
        let stats = run_tourney(&GameInitializer::new(), &decks(), &config).unwrap();
        assert_eq!(stats.games() + stats.failures, 6);
        assert_eq!(stats.failures, 0);
        assert_eq!(stats.deck_games.values().sum::<usize>(), 12);
    }

    #[test]
    fn test_tourney_is_reproducible() {
        let config = TournamentConfig {
            games: Some(4),
            seconds: None,
            p1: ControllerType::Random,
            p2: ControllerType::Random,
            seed: 5,
            max_turns: 80,
        };
        let a = run_tourney(&GameInitializer::new(), &decks(), &config).unwrap();
        let b = run_tourney(&GameInitializer::new(), &decks(), &config).unwrap();
        assert_eq!(a.matchups, b.matchups);
        assert_eq!(a.deck_wins, b.deck_wins);
    }

    #[test]
    fn test_tourney_needs_a_limit() {
        let config = TournamentConfig {
            games: None,
            seconds: None,
            p1: ControllerType::Zero,
            p2: ControllerType::Zero,
            seed: 0,
            max_turns: 10,
        };
        assert!(run_tourney(&GameInitializer::new(), &decks(), &config).is_err());
    }
}
