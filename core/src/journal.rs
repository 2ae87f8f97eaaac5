use serde::{Deserialize, Serialize};

use crate::*;

/// Which positions of the secret the player has earned so far. Slots only
/// ever go from hidden to revealed within a session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueJournal {
    revealed: [bool; CODE_LENGTH],
}

impl ClueJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reveal(&mut self, slot: usize) -> Result<MarkOutcome> {
        let slot = validate_slot(slot)?;

        Ok(if self.revealed[slot] {
            MarkOutcome::NoChange
        } else {
            self.revealed[slot] = true;
            MarkOutcome::Changed
        })
    }

    pub fn is_revealed(&self, slot: usize) -> bool {
        slot < CODE_LENGTH && self.revealed[slot]
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|&&slot| slot).count()
    }

    /// Clue imagery for display. Revealed slots expose their secret symbol,
    /// hidden slots expose nothing.
    pub fn clue_view(&self, secret: &SecretCode) -> [Option<Symbol>; CODE_LENGTH] {
        core::array::from_fn(|slot| self.revealed[slot].then(|| secret.symbols()[slot]))
    }
}
