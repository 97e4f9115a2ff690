//! End-to-end determinism tests
//!
//! Plays random-vs-random matches twice with the same seed and compares the
//! full event transcripts. One test per `.dck` file in `decks/`, generated
//! by the `dir-test` macro.

use dir_test::{dir_test, Fixture};
use hearth_engine::{
    game::{Game, GameResult},
    loader::{DeckLoader, GameInitializer},
    tournament::{play_match, ControllerType, MatchSetup},
};
use similar_asserts::assert_eq;
use std::path::Path;

/// Play `deck` against itself and return the transcript as JSON lines
fn transcript(deck_path: &str, seed: u64) -> (String, GameResult) {
    let deck = DeckLoader::load_from_file(Path::new(deck_path)).expect("deck should load");
    let mut game: Game = GameInitializer::new().deck_match(&deck, &deck).expect("match should build");
    let setup = MatchSetup::new(ControllerType::Random, ControllerType::Random, seed).with_max_turns(120);
    let result = play_match(&mut game, &setup).expect("match should finish");

    let lines: Vec<String> = game
        .events()
        .iter()
        .map(|e| serde_json::to_string(e).expect("events serialize"))
        .collect();
    (lines.join("\n"), result)
}

#[dir_test(
    dir: "$CARGO_MANIFEST_DIR/decks",
    glob: "**/*.dck",
)]
fn test_deck_determinism(fixture: Fixture<&str>) {
    let deck_path = fixture.path();

    let (run1, result1) = transcript(deck_path, 42);
    let (run2, result2) = transcript(deck_path, 42);

    assert!(!run1.is_empty(), "Deck {deck_path} produced no events");
    assert_eq!(run1, run2, "Deck {deck_path} diverged with the same seed");
    assert_eq!(result1, result2);
}

#[test]
fn test_different_seeds_diverge() {
    let deck_path = concat!(env!("CARGO_MANIFEST_DIR"), "/decks/mage_tempo.dck");

    let (seed42, _) = transcript(deck_path, 42);
    let (seed100, _) = transcript(deck_path, 100);
    assert!(seed42 != seed100, "Different seeds produced identical transcripts");
}

#[test]
fn test_state_hash_reproducible() {
    let deck_path = concat!(env!("CARGO_MANIFEST_DIR"), "/decks/warrior_control.dck");
    let deck = DeckLoader::load_from_file(Path::new(deck_path)).unwrap();
    let hashes: Vec<u64> = (0..2)
        .map(|_| {
            let mut game = GameInitializer::new().deck_match(&deck, &deck).unwrap();
            play_match(&mut game, &MatchSetup::new(ControllerType::Random, ControllerType::Zero, 9)).unwrap();
            hearth_engine::game::compute_state_hash(game.state())
        })
        .collect();
    assert_eq!(hashes[0], hashes[1]);
}
