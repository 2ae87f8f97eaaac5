use serde::{Deserialize, Serialize};

use crate::*;

/// Outcome of submitting the current guess against the secret.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Incomplete,
    Wrong,
    Correct,
}

impl SubmitOutcome {
    /// Whether the door screen closes after this submission. An incomplete
    /// guess keeps the screen open for further editing.
    pub const fn closes_door(self) -> bool {
        matches!(self, Self::Wrong | Self::Correct)
    }
}

/// Player-facing side of the final door: holds the in-progress guess and
/// checks it against the secret on submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorPuzzle {
    guess: [Symbol; CODE_LENGTH],
}

impl DoorPuzzle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guess(&self) -> &[Symbol; CODE_LENGTH] {
        &self.guess
    }

    /// Overwrites a single guess slot. No validation happens at edit time;
    /// writing `Symbol::None` un-fills the slot.
    pub fn edit(&mut self, slot: usize, symbol: Symbol) -> Result<()> {
        let slot = validate_slot(slot)?;
        self.guess[slot] = symbol;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.guess = [Symbol::None; CODE_LENGTH];
    }

    /// The emptiness pass runs over every slot before any comparison, so a
    /// guess that is both wrong and unfinished still reads as incomplete.
    /// Only a fully filled guess is compared, short-circuiting on the first
    /// mismatch.
    pub fn submit(&self, secret: &SecretCode) -> SubmitOutcome {
        if self.guess.iter().any(|symbol| !symbol.is_filled()) {
            return SubmitOutcome::Incomplete;
        }

        for (slot, &symbol) in self.guess.iter().enumerate() {
            if symbol != secret.symbols()[slot] {
                return SubmitOutcome::Wrong;
            }
        }

        SubmitOutcome::Correct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> SecretCode {
        SecretCode::from_symbols([Symbol::Crystal, Symbol::Sword, Symbol::Sun])
    }

    fn door_with(guess: [Symbol; CODE_LENGTH]) -> DoorPuzzle {
        let mut door = DoorPuzzle::new();
        for (slot, symbol) in guess.into_iter().enumerate() {
            door.edit(slot, symbol).unwrap();
        }
        door
    }

    #[test]
    fn any_unfilled_slot_reads_incomplete_even_when_others_are_wrong() {
        let door = door_with([Symbol::None, Symbol::Gauntlet, Symbol::Sun]);

        assert_eq!(door.submit(&secret()), SubmitOutcome::Incomplete);
    }

    #[test]
    fn an_unfilled_slot_with_correct_neighbors_is_still_incomplete() {
        let door = door_with([Symbol::None, Symbol::Sword, Symbol::Sun]);

        assert_eq!(door.submit(&secret()), SubmitOutcome::Incomplete);
    }

    #[test]
    fn first_mismatch_makes_the_guess_wrong() {
        let door = door_with([Symbol::Crystal, Symbol::Sun, Symbol::Sun]);

        assert_eq!(door.submit(&secret()), SubmitOutcome::Wrong);
    }

    #[test]
    fn matching_every_slot_is_correct() {
        let door = door_with([Symbol::Crystal, Symbol::Sword, Symbol::Sun]);

        assert_eq!(door.submit(&secret()), SubmitOutcome::Correct);
    }

    #[test]
    fn edits_overwrite_unconditionally_and_clear_resets() {
        let mut door = door_with([Symbol::Crystal, Symbol::Sword, Symbol::Sun]);

        door.edit(0, Symbol::Bullions).unwrap();
        assert_eq!(door.guess()[0], Symbol::Bullions);

        door.edit(0, Symbol::None).unwrap();
        assert_eq!(door.submit(&secret()), SubmitOutcome::Incomplete);

        door.clear();
        assert_eq!(door.guess(), &[Symbol::None; CODE_LENGTH]);
    }

    #[test]
    fn edit_rejects_out_of_range_slots() {
        let mut door = DoorPuzzle::new();

        assert_eq!(
            door.edit(CODE_LENGTH, Symbol::Crystal),
            Err(GameError::InvalidSlot)
        );
    }
}
