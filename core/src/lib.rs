#![no_std]

extern crate alloc;

use core::time::Duration;
use serde::{Deserialize, Serialize};

pub use discs::*;
pub use door::*;
pub use error::*;
pub use generator::*;
pub use journal::*;
pub use session::*;
pub use symbol::*;
pub use tiles::*;
pub use types::*;

mod discs;
mod door;
mod error;
mod generator;
mod journal;
mod session;
mod symbol;
mod tiles;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TilesConfig {
    pub side: Coord,
    pub shuffle_steps: u16,
    pub completion_threshold: f32,
    pub slide_duration: Duration,
    pub shuffle_step_interval: Duration,
}

impl Default for TilesConfig {
    fn default() -> Self {
        Self {
            side: 4,
            shuffle_steps: 20,
            completion_threshold: 0.8,
            slide_duration: Duration::from_millis(150),
            shuffle_step_interval: Duration::from_millis(40),
        }
    }
}

impl TilesConfig {
    /// Tile values are stored as `u8`, which caps the board at 16x16.
    pub fn validate(&self) -> Result<()> {
        if !(2..=16).contains(&self.side) {
            return Err(GameError::InvalidBoardSide);
        }
        if self.shuffle_steps == 0 {
            return Err(GameError::NoShuffleSteps);
        }
        if !(self.completion_threshold > 0.0 && self.completion_threshold <= 1.0) {
            return Err(GameError::InvalidThreshold);
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscsConfig {
    /// Degrees each disc advances per spin, innermost first.
    pub steps: [u16; RING_COUNT],
    /// Start counters are drawn from `0..max_start_offset`.
    pub max_start_offset: u32,
}

impl Default for DiscsConfig {
    fn default() -> Self {
        Self {
            steps: [6, 9, 12],
            max_start_offset: 15,
        }
    }
}

impl DiscsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.steps.iter().any(|&step| !(1..360).contains(&step)) {
            return Err(GameError::InvalidRingStep);
        }
        if self.max_start_offset == 0 {
            return Err(GameError::InvalidStartOffset);
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub tiles: TilesConfig,
    pub discs: DiscsConfig,
    /// Unpaused play time before the session is forfeited.
    pub time_limit: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tiles: TilesConfig::default(),
            discs: DiscsConfig::default(),
            time_limit: Duration::from_secs(300),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        self.tiles.validate()?;
        self.discs.validate()?;
        if self.time_limit.is_zero() {
            return Err(GameError::InvalidTimeLimit);
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}
