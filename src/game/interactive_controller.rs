//! Interactive terminal controller for human players
//!
//! Prints the board and the numbered legal actions, then reads either a
//! number or a positional command (`play 1 0`, `attack 1 -0`, `end`, ...).
//! Invalid input re-prompts. End of input leaves the match.

use crate::core::{Player, PlayerHandle};
use crate::game::action::{Action, Command};
use crate::game::channel::PlayerController;
use crate::game::snapshot::Snapshot;
use crate::zones::HandCard;
use std::io::{self, BufRead, Write};

/// A controller that prompts a human player for decisions
pub struct InteractiveController {
    player: PlayerHandle,
    input: Box<dyn BufRead>,
}

impl InteractiveController {
    /// Read from stdin
    pub fn new(player: PlayerHandle) -> Self {
        Self::with_input(player, Box::new(io::BufReader::new(io::stdin())))
    }

    /// Read from any line source
    pub fn with_input(player: PlayerHandle, input: Box<dyn BufRead>) -> Self {
        InteractiveController { player, input }
    }

    /// Next trimmed line, or `None` at end of input
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{prompt} ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(err) => {
                eprintln!("Error reading input: {err}");
                None
            }
        }
    }

    fn display_help(&self) {
        println!("\n=== Help ===");
        println!("  <n>               - choose action [n] from the list");
        println!("  play <card> <pos> - play a minion (cards count from 1 = newest)");
        println!("  spell <card>      - cast a spell");
        println!("  attack <a> <d>    - attack; 0 your hero, 1..N your minions, -0 / -N enemy");
        println!("  power             - use your hero power");
        println!("  end               - end your turn");
        println!("  v                 - view the board");
        println!("  q                 - leave the match");
        println!();
    }

    fn display_player(label: &str, player: &Player) {
        println!(
            "{label} {} ({}): {} health, {} armor, {}/{} mana, {} in hand, {} in deck",
            player.name,
            player.hero.class,
            player.hero.health,
            player.hero.armor,
            player.mana.current(),
            player.mana.total(),
            player.hand.len(),
            player.deck.len(),
        );
        if player.minions.is_empty() {
            println!("    (no minions)");
        }
        for (i, minion) in player.minions.iter().enumerate() {
            println!("    [{}] {minion}", i + 1);
        }
    }

    fn display_board(&self, snapshot: &Snapshot<'_>) {
        println!("\n=== Turn {} ===", snapshot.turn_number());
        Self::display_player("Opponent", snapshot.opponent());
        Self::display_player("You     ", snapshot.active_player());
        println!("Hand:");
        for (index, card) in snapshot.active_player().hand.indexed() {
            println!("    {index}: {} ({} mana)", card.name(), card.cost());
        }
    }

    /// Turn one line of input into an action, or explain why not
    fn interpret(&self, snapshot: &Snapshot<'_>, legal: &[Action], input: &str) -> Result<Action, String> {
        if let Ok(choice) = input.parse::<usize>() {
            return legal
                .get(choice)
                .copied()
                .ok_or_else(|| format!("choose 0-{}", legal.len().saturating_sub(1)));
        }
        let command: Command = input.parse().map_err(|e| format!("{e}"))?;
        let action = snapshot.resolve_command(&command).map_err(|e| format!("{e}"))?;
        snapshot.check(&action).map_err(|e| format!("{e}"))?;
        Ok(action)
    }
}

impl PlayerController for InteractiveController {
    fn player(&self) -> PlayerHandle {
        self.player
    }

    fn name(&self) -> &str {
        "interactive"
    }

    fn choose_action(&mut self, snapshot: &Snapshot<'_>) -> Option<Action> {
        let legal = snapshot.legal_actions();
        self.display_board(snapshot);
        println!("\nAvailable actions:");
        for (idx, action) in legal.iter().enumerate() {
            println!("  [{idx}] {}", snapshot.describe_action(action));
        }

        loop {
            let line = self.read_line("Choose action (number or command, ? for help):")?;
            match line.as_str() {
                "" => continue,
                "?" | "help" => self.display_help(),
                "v" => self.display_board(snapshot),
                "q" | "quit" => return None,
                input => match self.interpret(snapshot, &legal, input) {
                    Ok(action) => return Some(action),
                    Err(reason) => eprintln!("Invalid choice: {reason}"),
                },
            }
        }
    }

    fn choose_mulligan(&mut self, hand: &[HandCard]) -> Vec<usize> {
        println!("\n=== Opening hand ===");
        for (i, card) in hand.iter().enumerate() {
            println!("  [{i}] {} ({} mana)", card.name(), card.cost());
        }
        loop {
            let Some(line) = self.read_line("Cards to replace (e.g. '0 2', empty keeps all):") else {
                return (0..hand.len()).collect();
            };
            let replaced: Result<Vec<usize>, _> = line.split_whitespace().map(str::parse::<usize>).collect();
            match replaced {
                Ok(replaced) if replaced.iter().all(|&i| i < hand.len()) => {
                    return (0..hand.len()).filter(|i| !replaced.contains(i)).collect();
                }
                _ => eprintln!("Enter indices between 0 and {}", hand.len().saturating_sub(1)),
            }
        }
    }

    fn on_action_rejected(&mut self, reason: &str) {
        eprintln!("Rejected: {reason}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, HeroClass};
    use crate::game::channel::NullChannel;
    use crate::loader::GameInitializer;
    use std::io::Cursor;

    fn scripted_input(text: &str) -> Box<dyn BufRead> {
        Box::new(Cursor::new(text.to_string().into_bytes()))
    }

    #[test]
    fn test_reads_commands_and_reprompts() {
        let mut game = GameInitializer::new()
            .builtin_match(HeroClass::Mage, HeroClass::Warrior)
            .unwrap();
        game.start(&mut NullChannel).unwrap();
        let snapshot = game.snapshot();
        let me = snapshot.active_player_handle();

        // Bogus input, then two attacks the board does not allow
        let mut controller = InteractiveController::with_input(me, scripted_input("bogus\nattack 4 -0\nattack 0 -0\n"));
        let chosen = controller.choose_action(&snapshot);
        // Unarmed hero cannot attack, so even "attack 0 -0" is refused and input runs out
        assert_eq!(chosen, None);

        let mut controller = InteractiveController::with_input(me, scripted_input("end\n"));
        assert_eq!(controller.choose_action(&snapshot), Some(Action::EndTurn));

        let mut controller = InteractiveController::with_input(me, scripted_input("?\n0\n"));
        assert_eq!(controller.choose_action(&snapshot), snapshot.legal_actions().first().copied());
    }

    #[test]
    fn test_mulligan_input() {
        let me = crate::core::HandleRegistry::new().allocate_player(0);
        let hand: Vec<HandCard> = (0..3)
            .map(|i| HandCard(Card::minion(format!("c{i}"), 1, 1, 1).into_shared()))
            .collect();

        let mut controller = InteractiveController::with_input(me, scripted_input("7\n0 2\n"));
        assert_eq!(controller.choose_mulligan(&hand), vec![1]);

        let mut controller = InteractiveController::with_input(me, scripted_input(""));
        assert_eq!(controller.choose_mulligan(&hand), vec![0, 1, 2]);
    }
}
