//! Zero controller for testing and automation
//!
//! Always chooses the first legal action. Legal actions list `EndTurn` last,
//! so this plays out every card, power, and attack it can before passing.

use crate::core::PlayerHandle;
use crate::game::action::Action;
use crate::game::channel::PlayerController;
use crate::game::snapshot::Snapshot;

/// A controller that always chooses the first legal action (index 0)
///
/// This is useful for:
/// - Automated testing
/// - Benchmarking the engine
/// - Ensuring matches complete deterministically
pub struct ZeroController {
    player: PlayerHandle,
}

impl ZeroController {
    pub fn new(player: PlayerHandle) -> Self {
        ZeroController { player }
    }
}

impl PlayerController for ZeroController {
    fn player(&self) -> PlayerHandle {
        self.player
    }

    fn name(&self) -> &str {
        "zero"
    }

    fn choose_action(&mut self, snapshot: &Snapshot<'_>) -> Option<Action> {
        snapshot.legal_actions().into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HeroClass;
    use crate::game::channel::NullChannel;
    use crate::loader::GameInitializer;

    #[test]
    fn test_zero_controller_chooses_first() {
        let mut game = GameInitializer::new()
            .builtin_match(HeroClass::Paladin, HeroClass::Mage)
            .unwrap();
        game.start(&mut NullChannel).unwrap();
        let snapshot = game.snapshot();
        let mut controller = ZeroController::new(snapshot.active_player_handle());

        let chosen = controller.choose_action(&snapshot);
        assert_eq!(chosen, snapshot.legal_actions().first().cloned());
        assert!(chosen.is_some());
    }
}
