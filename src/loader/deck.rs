//! Deck file loader (.dck format)
//!
//! ```text
//! [metadata]
//! Name=Basic Mage
//! Hero=Mage
//!
//! [Main]
//! 2 Arcane Missiles
//! 2 Chillwind Yeti
//! ```

use crate::core::HeroClass;
use crate::{EngineError, Result};
use std::fs;
use std::path::Path;

/// Deck loader for .dck files
pub struct DeckLoader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Metadata,
    Main,
    Other,
}

impl DeckLoader {
    /// Load a deck from a .dck file
    pub fn load_from_file(path: &Path) -> Result<DeckList> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a deck from its text content
    ///
    /// Card lines outside any section count as main deck. Unknown sections
    /// (a sideboard, say) are skipped.
    pub fn parse(content: &str) -> Result<DeckList> {
        let mut deck = DeckList::default();
        let mut section = Section::Main;

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = match header.to_ascii_lowercase().as_str() {
                    "metadata" => Section::Metadata,
                    "main" => Section::Main,
                    _ => Section::Other,
                };
                continue;
            }

            match section {
                Section::Metadata => {
                    let Some((key, value)) = line.split_once('=') else {
                        continue;
                    };
                    match key.trim() {
                        "Name" => deck.name = Some(value.trim().to_string()),
                        "Hero" => deck.hero = Some(value.parse()?),
                        _ => {}
                    }
                }
                Section::Main => deck.main_deck.push(Self::parse_entry(line, line_no + 1)?),
                Section::Other => {}
            }
        }

        if deck.main_deck.is_empty() {
            return Err(EngineError::InvalidDeckFormat("Empty deck".to_string()));
        }
        Ok(deck)
    }

    /// "2 Chillwind Yeti"
    fn parse_entry(line: &str, line_no: usize) -> Result<DeckEntry> {
        let bad = || EngineError::InvalidDeckFormat(format!("line {line_no}: expected '<count> <card name>', got '{line}'"));
        let (count, name) = line.split_once(char::is_whitespace).ok_or_else(bad)?;
        let count = count.parse::<u8>().map_err(|_| bad())?;
        let card_name = name.trim();
        if card_name.is_empty() || count == 0 {
            return Err(bad());
        }
        Ok(DeckEntry {
            card_name: card_name.to_string(),
            count,
        })
    }
}

/// Represents a deck entry (card name and count)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub card_name: String,
    pub count: u8,
}

/// Represents a complete deck list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckList {
    pub name: Option<String>,
    /// Class the deck is built for, if the file says
    pub hero: Option<HeroClass>,
    pub main_deck: Vec<DeckEntry>,
}

impl DeckList {
    /// Total cards in main deck
    pub fn total_cards(&self) -> usize {
        self.main_deck.iter().map(|e| e.count as usize).sum()
    }

    /// Name for logs: the metadata name, else the hero class, else "deck"
    pub fn display_name(&self) -> String {
        match (&self.name, self.hero) {
            (Some(name), _) => name.clone(),
            (None, Some(hero)) => hero.to_string(),
            (None, None) => "deck".to_string(),
        }
    }
}
