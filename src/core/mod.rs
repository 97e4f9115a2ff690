//! Core game types and entities

pub mod card;
pub mod effects;
pub mod entity;
pub mod hero;
pub mod mana;
pub mod minion;
pub mod player;
pub mod types;

pub use card::{Card, CardKind, CardType, Keyword, MinionCard, SpellCard};
pub use effects::{Effect, Selector};
pub use entity::{CharacterHandle, EntityRef, HandleRegistry, MinionHandle, PlayerHandle};
pub use hero::{Hero, HeroClass, HeroPower};
pub use mana::{CrystalVariety, ManaCrystals};
pub use minion::Minion;
pub use player::Player;
pub use types::{catalog_key, CardName, PlayerName};
