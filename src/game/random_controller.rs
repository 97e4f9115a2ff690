//! Random AI controller for testing and baseline gameplay
//!
//! Picks uniformly among the legal actions. Serves as a baseline for more
//! sophisticated players and as a fuzzer for the resolver.

use crate::core::PlayerHandle;
use crate::game::action::Action;
use crate::game::channel::PlayerController;
use crate::game::snapshot::Snapshot;
use crate::zones::HandCard;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A controller that makes random choices
pub struct RandomController {
    player: PlayerHandle,
    rng: StdRng,
}

impl RandomController {
    pub fn new(player: PlayerHandle) -> Self {
        RandomController {
            player,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a random controller with a seeded RNG (for deterministic testing)
    pub fn with_seed(player: PlayerHandle, seed: u64) -> Self {
        RandomController {
            player,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl PlayerController for RandomController {
    fn player(&self) -> PlayerHandle {
        self.player
    }

    fn name(&self) -> &str {
        "random"
    }

    fn choose_action(&mut self, snapshot: &Snapshot<'_>) -> Option<Action> {
        let legal = snapshot.legal_actions();
        if legal.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..legal.len());
        Some(legal[index])
    }

    /// Each card is kept with even odds
    fn choose_mulligan(&mut self, hand: &[HandCard]) -> Vec<usize> {
        (0..hand.len()).filter(|_| self.rng.gen_bool(0.5)).collect()
    }
}
