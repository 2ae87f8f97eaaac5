use serde::{Deserialize, Serialize};

use crate::*;

pub const RING_COUNT: usize = 3;

/// The three concentric discs, innermost first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ring {
    Inner,
    Middle,
    Outer,
}

impl Ring {
    pub const ALL: [Ring; RING_COUNT] = [Ring::Inner, Ring::Middle, Ring::Outer];

    const fn index(self) -> usize {
        match self {
            Ring::Inner => 0,
            Ring::Middle => 1,
            Ring::Outer => 2,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SpinOutcome {
    Spun,
    Solved,
}

impl SpinOutcome {
    pub const fn is_solved(self) -> bool {
        matches!(self, Self::Solved)
    }
}

/// Each disc advances by its own fixed step per spin, so the discs return to
/// the upright position at different rates; the player has to work out each
/// disc's cycle length to line all three up at once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscPuzzle {
    steps: [u16; RING_COUNT],
    counters: [u32; RING_COUNT],
    solved: bool,
}

impl DiscPuzzle {
    /// Randomizes how far each disc has already spun so the set starts
    /// misaligned.
    pub fn new(config: DiscsConfig, seed: u64) -> Result<Self> {
        use rand::prelude::*;

        config.validate()?;

        let mut rng = SmallRng::seed_from_u64(seed);
        let counters: [u32; RING_COUNT] =
            core::array::from_fn(|_| rng.random_range(0..config.max_start_offset));

        Ok(Self {
            steps: config.steps,
            counters,
            solved: false,
        })
    }

    /// Display angle of a disc in degrees, `(counter * step) mod 360`.
    pub fn angle(&self, ring: Ring) -> u16 {
        let index = ring.index();
        ((u64::from(self.counters[index]) * u64::from(self.steps[index])) % 360) as u16
    }

    pub fn counter(&self, ring: Ring) -> u32 {
        self.counters[ring.index()]
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Advances one disc by its step and re-evaluates the win condition.
    /// The completion fires once per puzzle instance; spinning an already
    /// aligned set keeps rotating but never re-fires.
    pub fn spin(&mut self, ring: Ring) -> SpinOutcome {
        let index = ring.index();
        self.counters[index] = self.counters[index].wrapping_add(1);
        log::trace!("{:?} disc at {} degrees", ring, self.angle(ring));

        if !self.solved && self.is_aligned() {
            self.solved = true;
            return SpinOutcome::Solved;
        }

        SpinOutcome::Spun
    }

    /// All three discs upright at once. Relative alignment between discs does
    /// not count.
    fn is_aligned(&self) -> bool {
        Ring::ALL.iter().all(|&ring| self.angle(ring) == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle_at(counters: [u32; RING_COUNT]) -> DiscPuzzle {
        DiscPuzzle {
            steps: [6, 9, 12],
            counters,
            solved: false,
        }
    }

    #[test]
    fn win_requires_every_disc_upright() {
        // 60 * 6, 40 * 9 and 30 * 12 are all multiples of 360
        assert!(puzzle_at([60, 40, 30]).is_aligned());
        assert!(!puzzle_at([60, 40, 29]).is_aligned());
        assert!(!puzzle_at([1, 40, 30]).is_aligned());
    }

    #[test]
    fn final_spin_into_alignment_fires_once() {
        let mut puzzle = puzzle_at([59, 40, 30]);

        assert_eq!(puzzle.spin(Ring::Inner), SpinOutcome::Solved);
        assert!(puzzle.is_solved());

        // a full extra cycle of the inner disc re-aligns without re-firing
        for _ in 0..60 {
            assert_eq!(puzzle.spin(Ring::Inner), SpinOutcome::Spun);
        }
        assert_eq!(puzzle.angle(Ring::Inner), 0);
    }

    #[test]
    fn spin_advances_only_the_requested_disc() {
        let mut puzzle = puzzle_at([3, 5, 7]);

        puzzle.spin(Ring::Middle);

        assert_eq!(puzzle.counter(Ring::Inner), 3);
        assert_eq!(puzzle.counter(Ring::Middle), 6);
        assert_eq!(puzzle.counter(Ring::Outer), 7);
        assert_eq!(puzzle.angle(Ring::Middle), 54);
    }

    #[test]
    fn start_offsets_stay_in_the_configured_range() {
        for seed in 0..32 {
            let puzzle = DiscPuzzle::new(DiscsConfig::default(), seed).unwrap();
            for ring in Ring::ALL {
                assert!(puzzle.counter(ring) < DiscsConfig::default().max_start_offset);
            }
        }
    }
}
