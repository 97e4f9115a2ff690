//! Action resolution
//!
//! The resolver validates an action completely before touching state, then
//! applies it one mutation at a time, emitting the matching event after each
//! mutation. Rejections leave the state exactly as it was.

use crate::core::{
    Card, CharacterHandle, CrystalVariety, Effect, EntityRef, Minion, MinionHandle, Player,
    Selector,
};
use crate::game::action::Action;
use crate::game::channel::{validate_mulligan, validate_pick, DecisionChannel};
use crate::game::combat::{apply_armor_damage, AttackPolicy};
use crate::game::events::{DebugEvent, DrawResult, EventLog, GameEvent};
use crate::game::game_loop::{GameEndReason, GameResult};
use crate::game::state::GameState;
use crate::zones::{DeckCard, HandCard, HandIndex};
use crate::{EngineError, Result};
use std::sync::Arc;

/// Applies actions to a state, reporting through an event log and a channel
pub struct Resolver<'a> {
    state: &'a mut GameState,
    events: &'a mut EventLog,
    channel: &'a mut dyn DecisionChannel,
    policy: &'a dyn AttackPolicy,
}

impl<'a> Resolver<'a> {
    pub fn new(
        state: &'a mut GameState,
        events: &'a mut EventLog,
        channel: &'a mut dyn DecisionChannel,
        policy: &'a dyn AttackPolicy,
    ) -> Self {
        Resolver {
            state,
            events,
            channel,
            policy,
        }
    }

    fn emit(&mut self, event: GameEvent) {
        self.channel.notify_game_event(&event);
        self.events.push(event);
    }

    fn debug(&mut self, event: DebugEvent) {
        self.channel.notify_debug_event(&event);
    }

    fn ensure_running(&self) -> Result<()> {
        if self.state.is_over() {
            return Err(EngineError::IllegalState("the match is over".to_string()));
        }
        if self.state.turn_number() == 0 {
            return Err(EngineError::IllegalState("the match has not started".to_string()));
        }
        Ok(())
    }

    /// Apply one action for the active player
    pub fn resolve(&mut self, action: &Action) -> Result<()> {
        self.ensure_running()?;
        match *action {
            Action::PlayMinion { card, position } => self.play_minion(card, position)?,
            Action::PlaySpell { card } => self.play_spell(card)?,
            Action::Attack { attacker, defender } => self.attack(attacker, defender)?,
            Action::UseHeroPower => self.use_hero_power()?,
            Action::EndTurn => self.end_turn()?,
        }
        self.check_game_over();
        Ok(())
    }

    // ---- match lifecycle ----

    /// Shuffle, deal opening hands, run mulligans and begin the first turn
    pub fn start_match(&mut self) -> Result<()> {
        if self.state.turn_number() != 0 || self.state.is_over() {
            return Err(EngineError::IllegalState("the match has already started".to_string()));
        }
        self.emit(GameEvent::GameBegins {
            players: self.state.player_handles(),
        });

        for seat in 0..2 {
            self.shuffle_deck(seat)?;
        }

        let opening = self.state.config().opening_hand;
        for (seat, count) in opening.into_iter().enumerate() {
            for _ in 0..count {
                self.draw(seat);
            }
        }

        for seat in 0..2 {
            self.mulligan(seat)?;
        }

        self.state.set_active_seat(0);
        self.begin_turn();
        self.check_game_over();
        Ok(())
    }

    /// End the match without a winner (turn limit and similar)
    pub fn end_match(&mut self, reason: GameEndReason) {
        if self.state.is_over() {
            return;
        }
        let result = GameResult {
            winner: None,
            turns_played: self.state.turn_number(),
            end_reason: reason,
        };
        self.finish(result);
    }

    fn finish(&mut self, result: GameResult) {
        self.state.set_result(result.clone());
        self.emit(GameEvent::GameEnds { result });
    }

    fn check_game_over(&mut self) {
        if self.state.is_over() {
            return;
        }
        let [p1, p2] = self.state.player_handles();
        let dead1 = self.state.player_at(0).hero.is_dead();
        let dead2 = self.state.player_at(1).hero.is_dead();
        let turns_played = self.state.turn_number();
        let result = match (dead1, dead2) {
            (false, false) => return,
            (true, true) => GameResult {
                winner: None,
                turns_played,
                end_reason: GameEndReason::BothHeroesDied,
            },
            (true, false) => GameResult {
                winner: Some(p2),
                turns_played,
                end_reason: GameEndReason::HeroDied { loser: p1 },
            },
            (false, true) => GameResult {
                winner: Some(p1),
                turns_played,
                end_reason: GameEndReason::HeroDied { loser: p2 },
            },
        };
        self.finish(result);
    }

    fn shuffle_deck(&mut self, seat: usize) -> Result<()> {
        let player = self.state.player_at(seat).handle;
        let order = self
            .channel
            .request_shuffle(player, self.state.player_at(seat).deck.cards());
        self.state.player_at_mut(seat).deck.apply_permutation(&order)?;
        self.emit(GameEvent::DeckShuffled { player });
        Ok(())
    }

    fn mulligan(&mut self, seat: usize) -> Result<()> {
        let player = self.state.player_at(seat).handle;
        let hand_len = self.state.player_at(seat).hand.len();
        let kept = self
            .channel
            .request_mulligan(player, self.state.player_at(seat).hand.cards());
        validate_mulligan(&kept, hand_len)?;

        // Highest slot first so earlier removals don't shift later ones
        let mut replaced_slots: Vec<usize> = (0..hand_len).filter(|i| !kept.contains(i)).collect();
        if replaced_slots.is_empty() {
            return Ok(());
        }
        replaced_slots.sort_unstable_by(|a, b| b.cmp(a));

        let mut returned: Vec<HandCard> = Vec::with_capacity(replaced_slots.len());
        for slot in &replaced_slots {
            if let Some(card) = self.state.player_at_mut(seat).hand.remove_slot(*slot) {
                returned.push(card);
            }
        }
        let replaced = returned.len();
        for _ in 0..replaced {
            self.draw(seat);
        }
        for card in returned.into_iter().rev() {
            self.state.player_at_mut(seat).deck.add_to_bottom(card.into_deck());
        }
        self.shuffle_deck(seat)?;
        self.emit(GameEvent::Mulliganed { player, replaced });
        Ok(())
    }

    // ---- turn structure ----

    fn end_turn(&mut self) -> Result<()> {
        let next = 1 - self.state.active_seat();
        self.state.set_active_seat(next);
        self.begin_turn();
        Ok(())
    }

    fn begin_turn(&mut self) {
        let seat = self.state.active_seat();
        let player = self.state.player_at(seat).handle;

        let turn = self.state.advance_turn_counter();
        self.emit(GameEvent::TurnBegins { player, turn });

        if self.state.player_at_mut(seat).mana.gain(CrystalVariety::Full) {
            self.emit(GameEvent::GainsManaCrystal {
                player,
                variety: CrystalVariety::Full,
            });
        }
        let refilled = self.state.player_at_mut(seat).mana.refill();
        if refilled > 0 {
            self.emit(GameEvent::ManaCrystalsRefill {
                player,
                amount: refilled,
            });
        }

        let p = self.state.player_at_mut(seat);
        p.hero.attacks_this_turn = 0;
        p.hero.power.used_this_turn = false;
        for minion in p.minions.iter_mut() {
            minion.summoning_sick = false;
            minion.attacks_this_turn = 0;
        }

        self.draw(seat);
    }

    /// Draw the top card. An empty deck deals growing fatigue damage; a full
    /// hand burns the drawn card.
    fn draw(&mut self, seat: usize) {
        let player = self.state.player_at(seat).handle;
        let max_hand = self.state.config().max_hand_size;
        let p = self.state.player_at_mut(seat);
        match p.deck.draw_top() {
            Some(DeckCard(card)) => {
                let name = card.name.clone();
                let burned = p.hand.add(HandCard(card), max_hand).is_err();
                let result = if burned { DrawResult::Burned } else { DrawResult::Drawn };
                self.emit(GameEvent::CardDrawn {
                    player,
                    card: Some(name),
                    result,
                });
            }
            None => {
                p.fatigue += 1;
                let damage = p.fatigue;
                self.emit(GameEvent::CardDrawn {
                    player,
                    card: None,
                    result: DrawResult::Fatigue { damage },
                });
                self.damage(CharacterHandle::Player(player), damage);
            }
        }
    }

    fn spend_mana(&mut self, seat: usize, amount: u8) -> Result<()> {
        let player = self.state.player_at(seat).handle;
        self.state.player_at_mut(seat).mana.spend(amount)?;
        if amount > 0 {
            self.emit(GameEvent::ManaCrystalsEmpty { player, amount });
        }
        Ok(())
    }

    fn check_mana(&self, seat: usize, cost: u8) -> Result<()> {
        let available = self.state.player_at(seat).mana.current();
        if cost > available {
            return Err(EngineError::InsufficientResource {
                required: cost,
                available,
            });
        }
        Ok(())
    }

    // ---- card play ----

    fn hand_card(&self, seat: usize, card: HandIndex) -> Result<Arc<Card>> {
        let hand = &self.state.player_at(seat).hand;
        hand.get(card).map(|c| c.0.clone()).ok_or_else(|| {
            EngineError::InvalidReference(format!(
                "no card at hand index {card} (hand has {} cards)",
                hand.len()
            ))
        })
    }

    fn play_minion(&mut self, card_index: HandIndex, position: usize) -> Result<()> {
        let seat = self.state.active_seat();
        let card = self.hand_card(seat, card_index)?;
        let Some(stats) = card.as_minion() else {
            return Err(EngineError::InvalidReference(format!(
                "{} is a spell, not a minion",
                card.name
            )));
        };
        self.check_mana(seat, card.cost)?;
        let board_len = self.state.player_at(seat).minions.len();
        if board_len >= self.state.config().max_board_size {
            return Err(EngineError::IllegalState("the board is full".to_string()));
        }
        if position > board_len {
            return Err(EngineError::InvalidReference(format!(
                "position {position} is outside 0..={board_len}"
            )));
        }

        let player = self.state.player_at(seat).handle;
        self.state.player_at_mut(seat).hand.remove(card_index)?;
        self.spend_mana(seat, card.cost)?;
        let handle = self.state.registry_mut().allocate_minion(player);
        let minion = Minion::from_card(handle, card.clone())
            .ok_or_else(|| EngineError::InvalidReference(format!("{} has no stats", card.name)))?;
        self.state.player_at_mut(seat).minions.insert(position, minion);
        self.emit(GameEvent::PlayedMinion {
            player,
            minion: handle,
            card: card.name.clone(),
            position,
        });

        for effect in &stats.battlecry {
            self.apply_effect(seat, effect)?;
        }
        self.process_deaths();
        Ok(())
    }

    fn play_spell(&mut self, card_index: HandIndex) -> Result<()> {
        let seat = self.state.active_seat();
        let card = self.hand_card(seat, card_index)?;
        let Some(spell) = card.as_spell() else {
            return Err(EngineError::InvalidReference(format!(
                "{} is a minion, not a spell",
                card.name
            )));
        };
        self.check_mana(seat, card.cost)?;

        let player = self.state.player_at(seat).handle;
        self.state.player_at_mut(seat).hand.remove(card_index)?;
        self.spend_mana(seat, card.cost)?;
        self.emit(GameEvent::PlayedSpell {
            player,
            card: card.name.clone(),
        });

        for effect in &spell.effects {
            self.apply_effect(seat, effect)?;
        }
        self.process_deaths();
        Ok(())
    }

    fn use_hero_power(&mut self) -> Result<()> {
        let seat = self.state.active_seat();
        let power = self.state.player_at(seat).hero.power.clone();
        if power.used_this_turn {
            return Err(EngineError::IllegalState(format!(
                "{} was already used this turn",
                power.name
            )));
        }
        self.check_mana(seat, power.cost)?;
        let summons_only = power.effects.iter().all(|e| matches!(e, Effect::Summon { .. }));
        let board = self.state.player_at(seat).minions.len();
        if summons_only && board >= self.state.config().max_board_size {
            return Err(EngineError::IllegalState(format!(
                "{} has nowhere to summon: board full",
                power.name
            )));
        }

        let player = self.state.player_at(seat).handle;
        self.state.player_at_mut(seat).hero.power.used_this_turn = true;
        self.spend_mana(seat, power.cost)?;
        self.emit(GameEvent::UsedHeroPower {
            player,
            power: power.name.clone(),
        });

        for effect in &power.effects {
            self.apply_effect(seat, effect)?;
        }
        self.process_deaths();
        Ok(())
    }

    // ---- combat ----

    fn attack(&mut self, attacker: CharacterHandle, defender: CharacterHandle) -> Result<()> {
        let a = self.state.combatant(attacker).ok_or_else(|| {
            EngineError::InvalidReference(format!("attacker {attacker} does not exist"))
        })?;
        let d = self.state.combatant(defender).ok_or_else(|| {
            EngineError::InvalidReference(format!("defender {defender} does not exist"))
        })?;

        if let Err(reason) = self.policy.check(self.state, &a, &d) {
            self.emit(GameEvent::AttackFailed { reason });
            return Err(reason.into_error());
        }

        match attacker {
            CharacterHandle::Player(p) => {
                let seat = self.state.seat_of(p)?;
                self.state.player_at_mut(seat).hero.attacks_this_turn += 1;
            }
            CharacterHandle::Minion(m) => {
                if let Some(minion) = self.state.minion_mut(m) {
                    minion.attacks_this_turn += 1;
                }
            }
        }
        self.emit(GameEvent::EnactAttack { attacker, defender });

        self.damage(defender, a.attack);
        if d.attack > 0 {
            self.damage(attacker, d.attack);
        }
        self.process_deaths();
        Ok(())
    }

    /// Deal damage to one character. Stale handles are reported and skipped.
    fn damage(&mut self, target: CharacterHandle, amount: i32) {
        if amount <= 0 {
            return;
        }
        match self.state.registry().resolve(target) {
            Some(EntityRef::Player { seat }) => {
                let player = self.state.player_at(seat).handle;
                let hero = &mut self.state.player_at_mut(seat).hero;
                let (h0, a0) = (hero.health, hero.armor);
                let (h1, a1) = apply_armor_damage(h0, a0, amount);
                hero.health = h1;
                hero.armor = a1;
                self.emit(GameEvent::HeroTakesDamage {
                    player,
                    health_before_after: (h0, h1),
                    armor_before_after: (a0, a1),
                });
            }
            Some(EntityRef::Minion { .. }) => {
                let Some(handle) = target.as_minion() else { return };
                let Some(minion) = self.state.minion_mut(handle) else {
                    self.stale(target, "damage");
                    return;
                };
                if minion.divine_shield {
                    minion.divine_shield = false;
                    self.emit(GameEvent::LostDivineShield { minion: handle });
                    return;
                }
                let (h1, _) = apply_armor_damage(minion.health, 0, amount);
                minion.health = h1;
                self.emit(GameEvent::MinionTakesDamage {
                    minion: handle,
                    damage: amount,
                });
            }
            None => self.stale(target, "damage"),
        }
    }

    fn stale(&mut self, handle: CharacterHandle, context: &str) {
        self.debug(DebugEvent::StaleHandle {
            handle,
            context: context.to_string(),
        });
    }

    /// Remove dead minions, first seat first, left to right
    fn process_deaths(&mut self) {
        for seat in 0..2 {
            let dead: Vec<MinionHandle> = self
                .state
                .player_at(seat)
                .minions
                .iter()
                .filter(|m| m.is_dead())
                .map(|m| m.handle)
                .collect();
            for handle in dead {
                self.remove_minion(seat, handle);
            }
        }
    }

    fn remove_minion(&mut self, seat: usize, handle: MinionHandle) {
        let p = self.state.player_at_mut(seat);
        let Some(pos) = p.position_of(handle) else { return };
        let minion = p.minions.remove(pos);
        self.state.registry_mut().release(handle);
        self.emit(GameEvent::MinionDied {
            minion: handle,
            card: minion.card.name.clone(),
        });
    }

    // ---- effects ----

    /// Turn a selector into concrete handles, from `seat`'s point of view
    fn select(&mut self, seat: usize, selector: Selector) -> Result<Vec<CharacterHandle>> {
        let own = self.state.player_at(seat);
        let enemy = self.state.player_at(1 - seat);
        let minions_of = |p: &Player| -> Vec<CharacterHandle> {
            p.living_minions().map(CharacterHandle::Minion).collect()
        };

        let targets = match selector {
            Selector::FriendlyHero => vec![CharacterHandle::Player(own.handle)],
            Selector::EnemyHero => vec![CharacterHandle::Player(enemy.handle)],
            Selector::AllFriendlyMinions => minions_of(own),
            Selector::AllEnemyMinions => minions_of(enemy),
            Selector::AllMinions => {
                let mut all = minions_of(own);
                all.extend(minions_of(enemy));
                all
            }
            Selector::AllEnemyCharacters => {
                let mut all = vec![CharacterHandle::Player(enemy.handle)];
                all.extend(minions_of(enemy));
                all
            }
            Selector::RandomEnemyMinion | Selector::RandomEnemyCharacter => {
                let mut candidates = minions_of(enemy);
                if selector == Selector::RandomEnemyCharacter {
                    candidates.insert(0, CharacterHandle::Player(enemy.handle));
                }
                if candidates.is_empty() {
                    return Ok(Vec::new());
                }
                let pick = self.channel.request_pick_random(&candidates);
                let index = validate_pick(pick, candidates.len())?;
                vec![candidates[index]]
            }
        };
        Ok(targets)
    }

    fn apply_effect(&mut self, seat: usize, effect: &Effect) -> Result<()> {
        let player = self.state.player_at(seat).handle;
        match effect {
            Effect::DealDamage { target, amount } => {
                for t in self.select(seat, *target)? {
                    self.damage(t, *amount);
                }
            }
            Effect::RestoreHealth { target, amount } => {
                for t in self.select(seat, *target)? {
                    self.restore(t, *amount);
                }
            }
            Effect::GainArmor { amount } => {
                self.state.player_at_mut(seat).hero.armor += amount;
                self.emit(GameEvent::GainedArmor {
                    player,
                    amount: *amount,
                });
            }
            Effect::DrawCards { count } => {
                for _ in 0..*count {
                    self.draw(seat);
                }
            }
            Effect::Silence { target } => {
                for handle in self.select_minions(seat, *target, "silence")? {
                    if let Some(minion) = self.state.minion_mut(handle) {
                        minion.silence();
                        self.emit(GameEvent::Silenced { minion: handle });
                    }
                }
            }
            Effect::Destroy { target } => {
                for handle in self.select_minions(seat, *target, "destroy")? {
                    match self.state.minion_owner(handle) {
                        Some(owner) => {
                            let owner_seat = self.state.seat_of(owner)?;
                            self.remove_minion(owner_seat, handle);
                        }
                        None => self.stale(handle.into(), "destroy"),
                    }
                }
            }
            Effect::Buff { target, attack, health } => {
                for handle in self.select_minions(seat, *target, "buff")? {
                    if let Some(minion) = self.state.minion_mut(handle) {
                        minion.buff(*attack, *health);
                        self.emit(GameEvent::MinionBuffed {
                            minion: handle,
                            attack: *attack,
                            health: *health,
                        });
                    }
                }
            }
            Effect::Summon { card } => self.summon(seat, card.clone()),
            Effect::GainManaCrystal { variety } => {
                if self.state.player_at_mut(seat).mana.gain(*variety) {
                    self.emit(GameEvent::GainsManaCrystal {
                        player,
                        variety: *variety,
                    });
                }
            }
        }
        Ok(())
    }

    /// Minion targets only; heroes picked by the selector are ignored, and
    /// minions that vanished are reported as stale
    fn select_minions(
        &mut self,
        seat: usize,
        selector: Selector,
        context: &str,
    ) -> Result<Vec<MinionHandle>> {
        let mut live = Vec::new();
        for target in self.select(seat, selector)? {
            let Some(handle) = target.as_minion() else { continue };
            if self.state.minion(handle).is_some() {
                live.push(handle);
            } else {
                self.stale(target, context);
            }
        }
        Ok(live)
    }

    fn restore(&mut self, target: CharacterHandle, amount: i32) {
        let restored = match self.state.registry().resolve(target) {
            Some(EntityRef::Player { seat }) => self.state.player_at_mut(seat).hero.restore(amount),
            Some(EntityRef::Minion { .. }) => {
                match target.as_minion().and_then(|m| self.state.minion_mut(m)) {
                    Some(minion) => minion.restore(amount),
                    None => {
                        self.stale(target, "restore");
                        return;
                    }
                }
            }
            None => {
                self.stale(target, "restore");
                return;
            }
        };
        self.emit(GameEvent::HealthRestored {
            character: target,
            amount: restored,
        });
    }

    fn summon(&mut self, seat: usize, card: Arc<Card>) {
        let player = self.state.player_at(seat).handle;
        let position = self.state.player_at(seat).minions.len();
        if position >= self.state.config().max_board_size {
            self.debug(DebugEvent::Diagnostic(format!(
                "{player} cannot summon {}: board full",
                card.name
            )));
            return;
        }
        if !card.is_minion() {
            self.debug(DebugEvent::Diagnostic(format!("{} is not a minion", card.name)));
            return;
        }
        let handle = self.state.registry_mut().allocate_minion(player);
        if let Some(minion) = Minion::from_card(handle, card.clone()) {
            self.state.player_at_mut(seat).minions.push(minion);
            self.emit(GameEvent::MinionSummoned {
                player,
                minion: handle,
                card: card.name.clone(),
                position,
            });
        }
    }
}
