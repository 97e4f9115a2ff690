//! Built-in card set and class decks
//!
//! A small basic set: vanilla and keyword minions, a few battlecries, and
//! untargeted class spells. Enough to play full matches without a catalog
//! on disk.

use crate::core::{Card, CrystalVariety, Effect, HeroClass, Keyword, Selector};
use crate::loader::deck::{DeckEntry, DeckList};

use Selector::*;

/// Every built-in card, neutral minions first
pub fn builtin_cards() -> Vec<Card> {
    let mut cards = neutral_minions();
    cards.extend(class_spells());
    cards
}

fn neutral_minions() -> Vec<Card> {
    vec![
        Card::minion("Wisp", 0, 1, 1),
        Card::minion("Murloc Raider", 1, 2, 1),
        Card::minion("Elven Archer", 1, 1, 1)
            .with_battlecry(Effect::DealDamage { target: RandomEnemyCharacter, amount: 1 })
            .with_text("Battlecry: Deal 1 damage to a random enemy."),
        Card::minion("Argent Squire", 1, 1, 1).with_keyword(Keyword::DivineShield),
        Card::minion("Young Dragonhawk", 1, 1, 1).with_keyword(Keyword::Windfury),
        Card::minion("Bloodfen Raptor", 2, 3, 2),
        Card::minion("River Crocolisk", 2, 2, 3),
        Card::minion("Frostwolf Grunt", 2, 2, 2).with_keyword(Keyword::Taunt),
        Card::minion("Bluegill Warrior", 2, 2, 1).with_keyword(Keyword::Charge),
        Card::minion("Novice Engineer", 2, 1, 1)
            .with_battlecry(Effect::DrawCards { count: 1 })
            .with_text("Battlecry: Draw a card."),
        Card::minion("Magma Rager", 3, 5, 1),
        Card::minion("Ironfur Grizzly", 3, 3, 3).with_keyword(Keyword::Taunt),
        Card::minion("Wolfrider", 3, 3, 1).with_keyword(Keyword::Charge),
        Card::minion("Earthen Ring Farseer", 3, 3, 3)
            .with_battlecry(Effect::RestoreHealth { target: FriendlyHero, amount: 3 })
            .with_text("Battlecry: Restore 3 health to your hero."),
        Card::minion("Chillwind Yeti", 4, 4, 5),
        Card::minion("Sen'jin Shieldmasta", 4, 3, 5).with_keyword(Keyword::Taunt),
        Card::minion("Gnomish Inventor", 4, 2, 4)
            .with_battlecry(Effect::DrawCards { count: 1 })
            .with_text("Battlecry: Draw a card."),
        Card::minion("Booty Bay Bodyguard", 5, 5, 4).with_keyword(Keyword::Taunt),
        Card::minion("Boulderfist Ogre", 6, 6, 7),
        Card::minion("Core Hound", 7, 9, 5),
    ]
}

fn class_spells() -> Vec<Card> {
    let missile = Effect::DealDamage { target: RandomEnemyCharacter, amount: 1 };
    let mirror_image = Card::minion("Mirror Image", 0, 0, 2).with_keyword(Keyword::Taunt).into_shared();
    let huffer = Card::minion("Huffer", 3, 4, 2).with_keyword(Keyword::Charge).into_shared();

    vec![
        // Mage
        Card::spell("Arcane Missiles", 1, vec![missile.clone(); 3])
            .with_text("Deal 3 damage randomly split among all enemies."),
        Card::spell(
            "Mirror Image",
            1,
            vec![Effect::Summon { card: mirror_image.clone() }, Effect::Summon { card: mirror_image }],
        )
        .with_text("Summon two 0/2 minions with Taunt."),
        Card::spell("Arcane Explosion", 2, vec![Effect::DealDamage { target: AllEnemyMinions, amount: 1 }]),
        Card::spell("Arcane Intellect", 3, vec![Effect::DrawCards { count: 2 }]),
        Card::spell("Flamestrike", 7, vec![Effect::DealDamage { target: AllEnemyMinions, amount: 4 }]),
        // Warrior
        Card::spell("Whirlwind", 1, vec![Effect::DealDamage { target: AllMinions, amount: 1 }]),
        Card::spell("Shield Block", 3, vec![Effect::GainArmor { amount: 5 }, Effect::DrawCards { count: 1 }]),
        Card::spell("Brawl", 5, vec![Effect::Destroy { target: RandomEnemyMinion }])
            .with_text("Destroy a random enemy minion."),
        // Hunter
        Card::spell("Arcane Shot", 1, vec![Effect::DealDamage { target: RandomEnemyCharacter, amount: 2 }]),
        Card::spell("Animal Companion", 3, vec![Effect::Summon { card: huffer }]),
        Card::spell("Multi-Shot", 4, vec![Effect::DealDamage { target: RandomEnemyMinion, amount: 3 }; 2]),
        // Paladin
        Card::spell("Blessing of Might", 1, vec![Effect::Buff { target: AllFriendlyMinions, attack: 1, health: 0 }]),
        Card::spell("Consecration", 4, vec![Effect::DealDamage { target: AllEnemyCharacters, amount: 2 }]),
        Card::spell("Avenging Wrath", 6, vec![missile; 8])
            .with_text("Deal 8 damage randomly split among all enemies."),
        // Warlock
        Card::spell("Wild Growth", 2, vec![Effect::GainManaCrystal { variety: CrystalVariety::Empty }]),
        Card::spell("Sense Demons", 3, vec![Effect::DrawCards { count: 2 }]),
        Card::spell("Twisting Nether", 8, vec![Effect::Destroy { target: AllMinions }]),
        // Priest
        Card::spell("Mind Blast", 2, vec![Effect::DealDamage { target: EnemyHero, amount: 5 }]),
        Card::spell("Mass Dispel", 4, vec![Effect::Silence { target: AllEnemyMinions }, Effect::DrawCards { count: 1 }]),
        Card::spell("Power Word: Fortify", 3, vec![Effect::Buff { target: AllFriendlyMinions, attack: 0, health: 2 }]),
        Card::spell(
            "Holy Nova",
            5,
            vec![
                Effect::DealDamage { target: AllEnemyCharacters, amount: 2 },
                Effect::RestoreHealth { target: FriendlyHero, amount: 2 },
            ],
        ),
    ]
}

/// Class cards of the built-in decks
fn class_card_names(class: HeroClass) -> &'static [&'static str] {
    match class {
        HeroClass::Mage => &["Arcane Missiles", "Mirror Image", "Arcane Explosion", "Arcane Intellect", "Flamestrike"],
        HeroClass::Warrior => &["Whirlwind", "Shield Block", "Brawl"],
        HeroClass::Hunter => &["Arcane Shot", "Animal Companion", "Multi-Shot"],
        HeroClass::Paladin => &["Blessing of Might", "Consecration", "Avenging Wrath"],
        HeroClass::Warlock => &["Wild Growth", "Sense Demons", "Twisting Nether"],
        HeroClass::Priest => &["Mind Blast", "Mass Dispel", "Power Word: Fortify", "Holy Nova"],
    }
}

/// Neutral fillers in the order decks take them
const NEUTRAL_CURVE: &[&str] = &[
    "Argent Squire",
    "Bloodfen Raptor",
    "River Crocolisk",
    "Frostwolf Grunt",
    "Novice Engineer",
    "Ironfur Grizzly",
    "Wolfrider",
    "Earthen Ring Farseer",
    "Chillwind Yeti",
    "Sen'jin Shieldmasta",
    "Gnomish Inventor",
    "Booty Bay Bodyguard",
    "Boulderfist Ogre",
    "Core Hound",
    "Elven Archer",
];

/// Copies of each card in a built-in deck
const COPIES: u8 = 2;
/// Distinct cards in a built-in deck
const DISTINCT_CARDS: usize = 15;

/// 30-card deck for `class`: its class spells topped up with neutral minions
pub fn class_deck(class: HeroClass) -> DeckList {
    let class_cards = class_card_names(class);
    let fillers = DISTINCT_CARDS.saturating_sub(class_cards.len());
    let main_deck = class_cards
        .iter()
        .chain(NEUTRAL_CURVE.iter().take(fillers))
        .map(|name| DeckEntry {
            card_name: name.to_string(),
            count: COPIES,
        })
        .collect();
    DeckList {
        name: Some(format!("Basic {class}")),
        hero: Some(class),
        main_deck,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::CardDatabase;

    #[test]
    fn test_class_decks_are_thirty_known_cards() {
        let db = CardDatabase::builtin();
        for class in HeroClass::ALL {
            let deck = class_deck(class);
            assert_eq!(deck.total_cards(), 30, "{class}");
            assert_eq!(deck.hero, Some(class));
            for entry in &deck.main_deck {
                assert!(db.contains(&entry.card_name), "{} missing", entry.card_name);
            }
        }
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let cards = builtin_cards();
        let mut keys: Vec<String> = cards.iter().map(|c| c.name.catalog_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), cards.len());
    }
}
