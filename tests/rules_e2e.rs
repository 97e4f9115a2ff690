//! Keyword, draw, mulligan and driver rules, with scripted decision channels

use hearth_engine::{
    core::{CharacterHandle, HeroClass, PlayerHandle},
    game::{
        Action, DebugEvent, DecisionChannel, DrawResult, GameEndReason, GameEvent, GameLoop,
        NullChannel, RulesConfig, Snapshot,
    },
    loader::{GameInitializer, Scenario},
    zones::{DeckCard, HandCard, HandIndex},
    EngineError,
};

/// Configurable test double: fixed answers, with a record of what was asked
#[derive(Default)]
struct ScriptedAnswers {
    /// Actions handed out in order; `None` once exhausted
    actions: Vec<Action>,
    /// Keep these indices at the mulligan (None keeps everything)
    mulligan: Option<Vec<usize>>,
    /// Answer shuffles with a repeated index
    broken_shuffle: bool,
    /// Pick one past the end of the candidates
    out_of_range_pick: bool,
    /// Pick the last candidate instead of the first
    pick_last: bool,
    action_requests: usize,
    pick_sizes: Vec<usize>,
    rejections: Vec<String>,
}

impl DecisionChannel for ScriptedAnswers {
    fn request_action(&mut self, _snapshot: &Snapshot<'_>) -> Option<Action> {
        self.action_requests += 1;
        if self.actions.is_empty() {
            None
        } else {
            Some(self.actions.remove(0))
        }
    }

    fn request_shuffle(&mut self, _player: PlayerHandle, cards: &[DeckCard]) -> Vec<usize> {
        if self.broken_shuffle {
            vec![0; cards.len()]
        } else {
            (0..cards.len()).collect()
        }
    }

    fn request_pick_random(&mut self, candidates: &[CharacterHandle]) -> usize {
        self.pick_sizes.push(candidates.len());
        if self.out_of_range_pick {
            candidates.len()
        } else if self.pick_last {
            candidates.len() - 1
        } else {
            0
        }
    }

    fn request_mulligan(&mut self, _player: PlayerHandle, hand: &[HandCard]) -> Vec<usize> {
        match &self.mulligan {
            Some(kept) => kept.clone(),
            None => (0..hand.len()).collect(),
        }
    }

    fn notify_game_event(&mut self, _event: &GameEvent) {}

    fn notify_debug_event(&mut self, event: &DebugEvent) {
        if let DebugEvent::ActionRejected { reason, .. } = event {
            self.rejections.push(reason.clone());
        }
    }
}

#[test]
fn test_divine_shield_absorbs_first_hit() {
    let mut game = Scenario::new(HeroClass::Mage, HeroClass::Warrior)
        .minion(0, "Young Dragonhawk")
        .unwrap()
        .minion(1, "Argent Squire")
        .unwrap()
        .build();
    let [p1, p2] = game.player_handles();
    let dragonhawk = game.board(p1).unwrap()[0];
    let squire = game.board(p2).unwrap()[0];

    game.resolve(
        &Action::Attack { attacker: dragonhawk.into(), defender: squire.into() },
        &mut NullChannel,
    )
    .unwrap();

    let survivor = &game.player(p2).unwrap().minions[0];
    assert_eq!(survivor.handle, squire);
    assert_eq!(survivor.health, 1);
    assert!(!survivor.divine_shield);
    assert!(game.player(p1).unwrap().minions.is_empty());

    let events = game.events();
    assert!(events.iter().any(|e| *e == GameEvent::LostDivineShield { minion: squire }));
    assert!(events.iter().any(|e| matches!(e, GameEvent::MinionDied { minion, .. } if *minion == dragonhawk)));
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::MinionTakesDamage { minion, .. } if *minion == squire)));
}

#[test]
fn test_windfury_attacks_twice() {
    let mut game = Scenario::new(HeroClass::Mage, HeroClass::Warrior)
        .minion(0, "Young Dragonhawk")
        .unwrap()
        .build();
    let [p1, p2] = game.player_handles();
    let swing = Action::Attack {
        attacker: game.board(p1).unwrap()[0].into(),
        defender: CharacterHandle::Player(p2),
    };

    game.resolve(&swing, &mut NullChannel).unwrap();
    assert!(game.speculate(&swing));
    game.resolve(&swing, &mut NullChannel).unwrap();

    assert!(!game.speculate(&swing));
    assert!(matches!(
        game.resolve(&swing, &mut NullChannel),
        Err(EngineError::IllegalState(_))
    ));
    assert_eq!(game.player(p2).unwrap().hero.health, 28);
}

#[test]
fn test_silence_strips_taunt() {
    let mut game = Scenario::new(HeroClass::Priest, HeroClass::Warrior)
        .minion(0, "Bloodfen Raptor")
        .unwrap()
        .minion(1, "Frostwolf Grunt")
        .unwrap()
        .hand(0, &["Mass Dispel"])
        .unwrap()
        .deck(0, &["Wisp"])
        .unwrap()
        .mana(0, 4, 0)
        .unwrap()
        .build();
    let [p1, p2] = game.player_handles();
    let grunt = game.board(p2).unwrap()[0];
    let at_face = Action::Attack {
        attacker: game.board(p1).unwrap()[0].into(),
        defender: CharacterHandle::Player(p2),
    };
    assert!(!game.speculate(&at_face));

    game.resolve(&Action::PlaySpell { card: HandIndex(1) }, &mut NullChannel)
        .unwrap();

    let silenced = &game.player(p2).unwrap().minions[0];
    assert!(silenced.silenced);
    assert!(!silenced.taunt);
    assert!(game.events().iter().any(|e| *e == GameEvent::Silenced { minion: grunt }));
    // The spell's draw took the Wisp
    assert_eq!(game.player(p1).unwrap().hand.len(), 1);
    assert!(game.speculate(&at_face));
}

#[test]
fn test_mulligan_replaces_whole_hand() {
    let mut game = GameInitializer::new()
        .builtin_match(HeroClass::Mage, HeroClass::Warrior)
        .unwrap();
    let [p1, p2] = game.player_handles();
    let mut channel = ScriptedAnswers { mulligan: Some(Vec::new()), ..Default::default() };

    game.start(&mut channel).unwrap();

    let mulligans: Vec<(PlayerHandle, usize)> = game
        .events()
        .iter()
        .filter_map(|e| match e {
            GameEvent::Mulliganed { player, replaced } => Some((*player, *replaced)),
            _ => None,
        })
        .collect();
    assert_eq!(mulligans, vec![(p1, 3), (p2, 4)]);

    // Two opening shuffles plus one after each mulligan
    let shuffles = game
        .events()
        .iter()
        .filter(|e| matches!(e, GameEvent::DeckShuffled { .. }))
        .count();
    assert_eq!(shuffles, 4);

    let first = game.player(p1).unwrap();
    assert_eq!((first.hand.len(), first.deck.len()), (4, 26));
    let second = game.player(p2).unwrap();
    assert_eq!((second.hand.len(), second.deck.len()), (4, 26));
}

#[test]
fn test_keep_all_mulligan_emits_nothing() {
    let mut game = GameInitializer::new()
        .builtin_match(HeroClass::Hunter, HeroClass::Priest)
        .unwrap();
    game.start(&mut NullChannel).unwrap();
    assert!(!game
        .events()
        .iter()
        .any(|e| matches!(e, GameEvent::Mulliganed { .. })));
}

#[test]
fn test_malformed_shuffle_is_invalid_decision() {
    let mut game = GameInitializer::new()
        .builtin_match(HeroClass::Mage, HeroClass::Warrior)
        .unwrap();
    let mut channel = ScriptedAnswers { broken_shuffle: true, ..Default::default() };
    assert!(matches!(game.start(&mut channel), Err(EngineError::InvalidDecision(_))));
}

#[test]
fn test_malformed_mulligan_is_invalid_decision() {
    for kept in [vec![0, 0], vec![7]] {
        let mut game = GameInitializer::new()
            .builtin_match(HeroClass::Mage, HeroClass::Warrior)
            .unwrap();
        let mut channel = ScriptedAnswers { mulligan: Some(kept), ..Default::default() };
        assert!(matches!(game.start(&mut channel), Err(EngineError::InvalidDecision(_))));
    }
}

#[test]
fn test_out_of_range_pick_is_invalid_decision() {
    let mut game = Scenario::new(HeroClass::Mage, HeroClass::Warrior)
        .hand(0, &["Elven Archer"])
        .unwrap()
        .mana(0, 1, 0)
        .unwrap()
        .build();
    let mut channel = ScriptedAnswers { out_of_range_pick: true, ..Default::default() };

    let played = game.resolve(&Action::PlayMinion { card: HandIndex(1), position: 0 }, &mut channel);
    assert!(matches!(played, Err(EngineError::InvalidDecision(_))));
    assert_eq!(channel.pick_sizes, vec![1]);
}

#[test]
fn test_random_missiles_skip_dead_minions() {
    let mut game = Scenario::new(HeroClass::Mage, HeroClass::Warrior)
        .hand(0, &["Arcane Missiles"])
        .unwrap()
        .mana(0, 1, 0)
        .unwrap()
        .minion(1, "Wisp")
        .unwrap()
        .build();
    let [_, p2] = game.player_handles();
    let wisp = game.board(p2).unwrap()[0];
    // The hero comes first, so picking last aims at the Wisp while it lives
    let mut channel = ScriptedAnswers { pick_last: true, ..Default::default() };

    game.resolve(&Action::PlaySpell { card: HandIndex(1) }, &mut channel)
        .unwrap();

    assert_eq!(channel.pick_sizes, vec![2, 1, 1]);
    assert_eq!(game.player(p2).unwrap().hero.health, 28);
    assert!(game.player(p2).unwrap().minions.is_empty());
    let wisp_hits = game
        .events()
        .iter()
        .filter(|e| matches!(e, GameEvent::MinionTakesDamage { minion, .. } if *minion == wisp))
        .count();
    assert_eq!(wisp_hits, 1);
}

#[test]
fn test_draw_into_full_hand_burns() {
    let mut game = Scenario::new(HeroClass::Mage, HeroClass::Warrior)
        .hand(1, &["Wisp"; 10])
        .unwrap()
        .deck(1, &["Core Hound"])
        .unwrap()
        .build();
    let [_, p2] = game.player_handles();

    game.resolve(&Action::EndTurn, &mut NullChannel).unwrap();

    let second = game.player(p2).unwrap();
    assert_eq!(second.hand.len(), 10);
    assert!(second.deck.is_empty());
    assert!(second.hand.cards().iter().all(|c| c.name().as_str() == "Wisp"));
    assert!(game.events().iter().any(|e| matches!(
        e,
        GameEvent::CardDrawn { card: Some(name), result: DrawResult::Burned, .. }
            if name.as_str() == "Core Hound"
    )));
}

#[test]
fn test_configured_hand_limit_above_ten() {
    let rules = RulesConfig { max_hand_size: 12, ..RulesConfig::default() };
    let mut game = Scenario::with_rules(HeroClass::Mage, HeroClass::Warrior, rules)
        .hand(1, &["Wisp"; 11])
        .unwrap()
        .deck(1, &["Core Hound", "Core Hound"])
        .unwrap()
        .build();
    let [_, p2] = game.player_handles();

    game.resolve(&Action::EndTurn, &mut NullChannel).unwrap();
    assert_eq!(game.player(p2).unwrap().hand.len(), 12);
    assert!(matches!(
        game.events().last(),
        Some(GameEvent::CardDrawn { result: DrawResult::Drawn, .. })
    ));

    // Next draw for the same player hits the raised limit
    game.resolve(&Action::EndTurn, &mut NullChannel).unwrap();
    game.resolve(&Action::EndTurn, &mut NullChannel).unwrap();
    assert_eq!(game.player(p2).unwrap().hand.len(), 12);
    assert!(matches!(
        game.events().last(),
        Some(GameEvent::CardDrawn { result: DrawResult::Burned, .. })
    ));
}

#[test]
fn test_hero_power_refused_on_full_board() {
    let mut scenario = Scenario::new(HeroClass::Paladin, HeroClass::Warrior)
        .mana(0, 2, 0)
        .unwrap();
    for _ in 0..7 {
        scenario = scenario.minion(0, "Wisp").unwrap();
    }
    let mut game = scenario.build();
    let [p1, _] = game.player_handles();
    let before = game.state().clone();

    assert!(!game.snapshot().legal_actions().contains(&Action::UseHeroPower));
    assert!(matches!(
        game.resolve(&Action::UseHeroPower, &mut NullChannel),
        Err(EngineError::IllegalState(_))
    ));
    assert_eq!(game.state(), &before);
    let me = game.player(p1).unwrap();
    assert_eq!(me.mana.current(), 2);
    assert!(!me.hero.power.used_this_turn);
}

#[test]
fn test_hero_power_summons_with_room() {
    let mut scenario = Scenario::new(HeroClass::Paladin, HeroClass::Warrior)
        .mana(0, 2, 0)
        .unwrap();
    for _ in 0..6 {
        scenario = scenario.minion(0, "Wisp").unwrap();
    }
    let mut game = scenario.build();
    let [p1, _] = game.player_handles();

    assert!(game.snapshot().legal_actions().contains(&Action::UseHeroPower));
    game.resolve(&Action::UseHeroPower, &mut NullChannel).unwrap();

    let me = game.player(p1).unwrap();
    assert_eq!(me.minions.len(), 7);
    assert_eq!(me.minions[6].name(), "Silver Hand Recruit");
    assert_eq!(me.mana.current(), 0);
}

#[test]
fn test_refill_only_when_crystals_spent() {
    let mut game = Scenario::new(HeroClass::Mage, HeroClass::Warrior)
        .mana(0, 3, 2)
        .unwrap()
        .mana(1, 3, 0)
        .unwrap()
        .build();
    let [p1, p2] = game.player_handles();
    let refills = |game: &hearth_engine::game::Game| -> Vec<(PlayerHandle, u8)> {
        game.events()
            .iter()
            .filter_map(|e| match e {
                GameEvent::ManaCrystalsRefill { player, amount } => Some((*player, *amount)),
                _ => None,
            })
            .collect()
    };

    game.resolve(&Action::EndTurn, &mut NullChannel).unwrap();
    assert!(refills(&game).is_empty());
    assert_eq!(game.player(p2).unwrap().mana.current(), 4);

    game.resolve(&Action::EndTurn, &mut NullChannel).unwrap();
    assert_eq!(refills(&game), vec![(p1, 2)]);
    assert_eq!(game.player(p1).unwrap().mana.current(), 4);
}

#[test]
fn test_loop_asks_again_after_rejection() {
    let mut game = Scenario::new(HeroClass::Mage, HeroClass::Warrior).build();
    let bogus = Action::PlayMinion { card: HandIndex(3), position: 0 };
    let mut channel = ScriptedAnswers { actions: vec![bogus, bogus], ..Default::default() };

    let result = GameLoop::new(&mut game).run_game(&mut channel).unwrap();

    assert_eq!(result.end_reason, GameEndReason::Abandoned);
    assert_eq!(channel.action_requests, 3);
    assert_eq!(channel.rejections.len(), 2);
    assert_eq!(game.state().turn_number(), 1);
}

#[test]
fn test_loop_gives_up_at_rejection_ceiling() {
    let mut game = Scenario::new(HeroClass::Mage, HeroClass::Warrior).build();
    let bogus = Action::PlayMinion { card: HandIndex(3), position: 0 };
    let mut channel = ScriptedAnswers { actions: vec![bogus; 20], ..Default::default() };

    let outcome = GameLoop::new(&mut game)
        .with_max_rejections(5)
        .run_game(&mut channel);

    assert!(matches!(outcome, Err(EngineError::InvalidDecision(_))));
    assert_eq!(channel.action_requests, 5);
    assert_eq!(channel.rejections.len(), 5);
}

#[test]
fn test_loop_default_ceiling_is_sixty_four() {
    let mut game = Scenario::new(HeroClass::Mage, HeroClass::Warrior).build();
    let bogus = Action::PlayMinion { card: HandIndex(3), position: 0 };
    let mut channel = ScriptedAnswers { actions: vec![bogus; 100], ..Default::default() };

    let outcome = GameLoop::new(&mut game).run_game(&mut channel);

    assert!(matches!(outcome, Err(EngineError::InvalidDecision(_))));
    assert_eq!(channel.rejections.len(), 64);
}
