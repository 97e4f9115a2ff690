//! Mana crystals
//!
//! A player owns `total` crystals, `empty` of which are spent this turn.
//! Current mana is `total - empty`, and `0 <= empty <= total <= max`
//! holds after every operation.

use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Crystal cap
pub const MAX_MANA_CRYSTALS: u8 = 10;

/// Whether a newly gained crystal arrives usable this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrystalVariety {
    Empty,
    Full,
}

impl fmt::Display for CrystalVariety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrystalVariety::Empty => write!(f, "empty"),
            CrystalVariety::Full => write!(f, "full"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManaCrystals {
    total: u8,
    empty: u8,
}

impl ManaCrystals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a specific crystal state (clamped to keep the invariant)
    pub fn with(total: u8, empty: u8) -> Self {
        let total = total.min(MAX_MANA_CRYSTALS);
        ManaCrystals {
            total,
            empty: empty.min(total),
        }
    }

    pub fn total(&self) -> u8 {
        self.total
    }

    pub fn empty(&self) -> u8 {
        self.empty
    }

    /// Mana available to spend right now
    pub fn current(&self) -> u8 {
        self.total - self.empty
    }

    pub fn is_maxed(&self) -> bool {
        self.total >= MAX_MANA_CRYSTALS
    }

    /// Gain one crystal. Returns false if already at the cap.
    pub fn gain(&mut self, variety: CrystalVariety) -> bool {
        if self.is_maxed() {
            return false;
        }
        self.total += 1;
        if variety == CrystalVariety::Empty {
            self.empty += 1;
        }
        true
    }

    /// Refill all spent crystals, returning how many were refilled
    pub fn refill(&mut self) -> u8 {
        let refilled = self.empty;
        self.empty = 0;
        refilled
    }

    /// Spend `amount` mana, or fail without change
    pub fn spend(&mut self, amount: u8) -> Result<()> {
        let available = self.current();
        if amount > available {
            return Err(EngineError::InsufficientResource {
                required: amount,
                available,
            });
        }
        self.empty += amount;
        Ok(())
    }
}

impl fmt::Display for ManaCrystals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current(), self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_and_refill() {
        let mut mana = ManaCrystals::new();
        assert!(mana.gain(CrystalVariety::Full));
        assert!(mana.gain(CrystalVariety::Empty));
        assert_eq!(mana.total(), 2);
        assert_eq!(mana.current(), 1);
        assert_eq!(mana.refill(), 1);
        assert_eq!(mana.current(), 2);
    }

    #[test]
    fn test_spend_insufficient_leaves_unchanged() {
        let mut mana = ManaCrystals::with(3, 1);
        let err = mana.spend(3).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientResource { required: 3, available: 2 }
        ));
        assert_eq!(mana, ManaCrystals::with(3, 1));

        mana.spend(2).unwrap();
        assert_eq!(mana.current(), 0);
        assert_eq!(mana.empty(), 3);
    }

    #[test]
    fn test_cap() {
        let mut mana = ManaCrystals::with(10, 0);
        assert!(!mana.gain(CrystalVariety::Full));
        assert_eq!(mana.total(), 10);
        assert_eq!(ManaCrystals::with(12, 15), ManaCrystals::with(10, 10));
    }

    #[test]
    fn test_invariant_after_any_sequence() {
        let mut mana = ManaCrystals::new();
        for step in 0..40u8 {
            match step % 4 {
                0 => {
                    mana.gain(CrystalVariety::Full);
                }
                1 => {
                    mana.gain(CrystalVariety::Empty);
                }
                2 => {
                    let _ = mana.spend(step % 5);
                }
                _ => {
                    mana.refill();
                }
            }
            assert!(mana.empty() <= mana.total());
            assert!(mana.total() <= MAX_MANA_CRYSTALS);
        }
    }
}
