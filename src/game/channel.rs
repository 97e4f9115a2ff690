//! Decision and notification channel
//!
//! The engine never performs I/O and never rolls its own dice. Every choice
//! it needs (the next action, a shuffle order, a random pick, a mulligan)
//! and every notification it emits goes through one [`DecisionChannel`].
//! The same engine therefore runs against a terminal, a bot, or a test
//! double by swapping the channel.

use crate::core::{CharacterHandle, PlayerHandle};
use crate::game::action::Action;
use crate::game::events::{DebugEvent, GameEvent};
use crate::game::game_loop::GameResult;
use crate::game::logger::GameLogger;
use crate::game::snapshot::Snapshot;
use crate::game::state_hash::{compute_state_hash, format_hash};
use crate::zones::{DeckCard, HandCard};
use crate::{EngineError, Result};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// The engine's only window to the outside world
///
/// Requests block until answered. Notifications must return promptly.
pub trait DecisionChannel {
    /// Next action for the active player. `None` means the caller is walking
    /// away from the match; the driver stops asking.
    fn request_action(&mut self, snapshot: &Snapshot<'_>) -> Option<Action>;

    /// A permutation of `0..cards.len()`. Position `i` of the reordered deck
    /// receives `cards[order[i]]`; the last position is the top.
    fn request_shuffle(&mut self, player: PlayerHandle, cards: &[DeckCard]) -> Vec<usize>;

    /// Index of one element of the non-empty `candidates`
    fn request_pick_random(&mut self, candidates: &[CharacterHandle]) -> usize;

    /// Indices (into `hand`) of the cards to keep
    fn request_mulligan(&mut self, player: PlayerHandle, hand: &[HandCard]) -> Vec<usize>;

    fn notify_game_event(&mut self, event: &GameEvent);

    fn notify_debug_event(&mut self, event: &DebugEvent);
}

/// Check a pick answer
pub(crate) fn validate_pick(index: usize, len: usize) -> Result<usize> {
    if index < len {
        Ok(index)
    } else {
        Err(EngineError::InvalidDecision(format!(
            "random pick {index} out of range for {len} candidates"
        )))
    }
}

/// Check a mulligan answer: distinct, in-range indices
pub(crate) fn validate_mulligan(kept: &[usize], len: usize) -> Result<()> {
    let mut seen = vec![false; len];
    for &i in kept {
        if i >= len || seen[i] {
            return Err(EngineError::InvalidDecision(format!(
                "mulligan keeps invalid or repeated index {i} of {len}"
            )));
        }
        seen[i] = true;
    }
    Ok(())
}

/// Strategy for one seat
///
/// Controllers only make the choices that belong to a player: what to do
/// next and what to keep. Shuffles and random picks are not theirs.
pub trait PlayerController {
    /// Player this controller plays for
    fn player(&self) -> PlayerHandle;

    /// Short controller kind, for logs
    fn name(&self) -> &str;

    /// Choose the next action, or `None` to leave the match
    fn choose_action(&mut self, snapshot: &Snapshot<'_>) -> Option<Action>;

    /// Indices of opening-hand cards to keep (default: keep everything)
    fn choose_mulligan(&mut self, hand: &[HandCard]) -> Vec<usize> {
        (0..hand.len()).collect()
    }

    /// The engine refused the last action
    fn on_action_rejected(&mut self, _reason: &str) {}

    fn on_game_end(&mut self, _result: &GameResult) {}
}

/// Channel that routes decisions to per-seat controllers
///
/// Shuffles and random picks come from a ChaCha12 stream, so a fixed seed
/// reproduces a match exactly. Notifications go to the [`GameLogger`].
pub struct ControllerChannel {
    controllers: Vec<Box<dyn PlayerController>>,
    rng: ChaCha12Rng,
    logger: GameLogger,
    /// Player of the most recent action request, for rejection callbacks
    last_requester: Option<PlayerHandle>,
}

impl ControllerChannel {
    pub fn new(first: Box<dyn PlayerController>, second: Box<dyn PlayerController>) -> Self {
        ControllerChannel {
            controllers: vec![first, second],
            rng: ChaCha12Rng::from_entropy(),
            logger: GameLogger::new(),
            last_requester: None,
        }
    }

    /// Seed shuffles and random picks
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha12Rng::seed_from_u64(seed);
        self
    }

    pub fn with_logger(mut self, logger: GameLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn logger(&self) -> &GameLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut GameLogger {
        &mut self.logger
    }

    fn controller_for(&mut self, player: PlayerHandle) -> Option<&mut Box<dyn PlayerController>> {
        self.controllers.iter_mut().find(|c| c.player() == player)
    }
}

impl DecisionChannel for ControllerChannel {
    fn request_action(&mut self, snapshot: &Snapshot<'_>) -> Option<Action> {
        let player = snapshot.active_player_handle();
        self.last_requester = Some(player);

        if self.logger.debug_state_hash_enabled() {
            let hash = compute_state_hash(snapshot.state());
            self.logger.state_hash(&format_hash(hash));
        }

        let controller = self.controller_for(player)?;
        let action = controller.choose_action(snapshot);
        let kind = controller.name().to_string();

        match &action {
            Some(action) => {
                let described = snapshot.describe_action(action);
                self.logger.controller_choice(&kind, &format!("{player} chose {described}"));
            }
            None => self.logger.controller_choice(&kind, &format!("{player} leaves the match")),
        }
        action
    }

    fn request_shuffle(&mut self, _player: PlayerHandle, cards: &[DeckCard]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..cards.len()).collect();
        order.shuffle(&mut self.rng);
        order
    }

    fn request_pick_random(&mut self, candidates: &[CharacterHandle]) -> usize {
        if candidates.is_empty() {
            return 0;
        }
        self.rng.gen_range(0..candidates.len())
    }

    fn request_mulligan(&mut self, player: PlayerHandle, hand: &[HandCard]) -> Vec<usize> {
        match self.controller_for(player) {
            Some(controller) => controller.choose_mulligan(hand),
            None => (0..hand.len()).collect(),
        }
    }

    fn notify_game_event(&mut self, event: &GameEvent) {
        self.logger.game_event(event);
        if let GameEvent::GameEnds { result } = event {
            for controller in self.controllers.iter_mut() {
                controller.on_game_end(result);
            }
        }
    }

    fn notify_debug_event(&mut self, event: &DebugEvent) {
        self.logger.debug_event(event);
        if let DebugEvent::ActionRejected { player, reason } = event {
            if self.last_requester == Some(*player) {
                if let Some(controller) = self.controller_for(*player) {
                    controller.on_action_rejected(reason);
                }
            }
        }
    }
}

/// Deterministic, silent channel
///
/// Identity shuffles, first-candidate picks, keep-everything mulligans, and
/// no actions. Used for speculation and as a test double.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullChannel;

impl DecisionChannel for NullChannel {
    fn request_action(&mut self, _snapshot: &Snapshot<'_>) -> Option<Action> {
        None
    }

    fn request_shuffle(&mut self, _player: PlayerHandle, cards: &[DeckCard]) -> Vec<usize> {
        (0..cards.len()).collect()
    }

    fn request_pick_random(&mut self, _candidates: &[CharacterHandle]) -> usize {
        0
    }

    fn request_mulligan(&mut self, _player: PlayerHandle, hand: &[HandCard]) -> Vec<usize> {
        (0..hand.len()).collect()
    }

    fn notify_game_event(&mut self, _event: &GameEvent) {}

    fn notify_debug_event(&mut self, _event: &DebugEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pick() {
        assert_eq!(validate_pick(2, 3).unwrap(), 2);
        assert!(matches!(validate_pick(3, 3), Err(EngineError::InvalidDecision(_))));
    }

    #[test]
    fn test_validate_mulligan() {
        assert!(validate_mulligan(&[], 3).is_ok());
        assert!(validate_mulligan(&[2, 0], 3).is_ok());
        assert!(validate_mulligan(&[1, 1], 3).is_err());
        assert!(validate_mulligan(&[3], 3).is_err());
    }

    #[test]
    fn test_seeded_shuffle_is_permutation_and_repeatable() {
        use crate::core::Card;
        use crate::zones::DeckCard;

        let cards: Vec<DeckCard> = (0..20)
            .map(|i| DeckCard(Card::minion(format!("c{i}"), 1, 1, 1).into_shared()))
            .collect();
        let mut a = ControllerChannel::new(
            Box::new(crate::game::ZeroController::new(first_handle())),
            Box::new(crate::game::ZeroController::new(first_handle())),
        )
        .with_seed(7);
        let mut b = ControllerChannel::new(
            Box::new(crate::game::ZeroController::new(first_handle())),
            Box::new(crate::game::ZeroController::new(first_handle())),
        )
        .with_seed(7);

        let order_a = a.request_shuffle(first_handle(), &cards);
        let order_b = b.request_shuffle(first_handle(), &cards);
        assert_eq!(order_a, order_b);
        assert!(crate::zones::validate_permutation(&order_a, cards.len()).is_ok());
    }

    fn first_handle() -> PlayerHandle {
        crate::core::HandleRegistry::new().allocate_player(0)
    }
}
