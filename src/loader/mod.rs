//! Card catalog, deck lists, and match construction
//!
//! Cards come from the built-in set or from JSON catalog files; decks from
//! `.dck` lists.

pub mod catalog;
pub mod database;
pub mod database_async;
pub mod deck;
pub mod deck_async;
pub mod game_init;
pub mod scenario;

pub use catalog::{builtin_cards, class_deck};
pub use database::CardDatabase;
pub use database_async::load_catalog_dir;
pub use deck::{DeckEntry, DeckList, DeckLoader};
pub use deck_async::{deck_paths_in, load_deck, load_decks};
pub use game_init::GameInitializer;
pub use scenario::Scenario;
