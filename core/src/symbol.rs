use serde::{Deserialize, Serialize};

use crate::*;

/// Number of symbols in the door code, and of clue slots in the journal.
pub const CODE_LENGTH: usize = 3;

pub(crate) fn validate_slot(slot: usize) -> Result<usize> {
    if slot < CODE_LENGTH {
        Ok(slot)
    } else {
        Err(GameError::InvalidSlot)
    }
}

/// Puzzle icon vocabulary, organised top-to-bottom as on the door screen.
/// `None` is the unfilled sentinel used to clear player input; it never
/// appears in an answer or a clue.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    None,
    Crystal,
    Sword,
    Sun,
    Gauntlet,
    Bullions,
}

impl Symbol {
    /// The five icons an answer position may hold.
    pub const ANSWERS: [Symbol; 5] = [
        Symbol::Crystal,
        Symbol::Sword,
        Symbol::Sun,
        Symbol::Gauntlet,
        Symbol::Bullions,
    ];

    pub const fn is_filled(self) -> bool {
        !matches!(self, Symbol::None)
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Symbol::None
    }
}

/// The answer to the door puzzle. Generated once when the session begins and
/// read-only for the rest of its lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretCode([Symbol; CODE_LENGTH]);

impl SecretCode {
    pub(crate) fn from_symbols(symbols: [Symbol; CODE_LENGTH]) -> Self {
        Self(symbols)
    }

    pub fn symbols(&self) -> &[Symbol; CODE_LENGTH] {
        &self.0
    }

    pub fn symbol(&self, slot: usize) -> Result<Symbol> {
        let slot = validate_slot(slot)?;
        Ok(self.0[slot])
    }
}
