use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Slot index outside the code length")]
    InvalidSlot,
    #[error("Board side must be between 2 and 16 tiles")]
    InvalidBoardSide,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Board must hold each tile value exactly once")]
    DuplicateTile,
    #[error("Shuffle walk needs at least one step")]
    NoShuffleSteps,
    #[error("Completion threshold must lie within (0, 1]")]
    InvalidThreshold,
    #[error("Ring step must be between 1 and 359 degrees")]
    InvalidRingStep,
    #[error("Ring start offset range must be at least 1")]
    InvalidStartOffset,
    #[error("Session time limit must be positive")]
    InvalidTimeLimit,
    #[error("Session already ended, no new commands are accepted")]
    SessionOver,
}

pub type Result<T> = core::result::Result<T, GameError>;
