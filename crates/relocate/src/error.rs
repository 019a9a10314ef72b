//! Relocation error types.

use std::fmt;
use std::path::PathBuf;

use donorswap_registry::RegistryError;

/// Which relocation step failed. Partial state is surfaced, not rolled
/// back, so the report must say how far the operation got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    MoveAssets,
    MoveExec,
    Cleanup,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::MoveAssets => write!(f, "moving asset subtree"),
            Step::MoveExec => write!(f, "moving executable subtree"),
            Step::Cleanup => write!(f, "cleaning up"),
        }
    }
}

/// Errors from the single-subtree move primitive.
#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    #[error("source missing: {0}")]
    SourceMissing(PathBuf),

    /// Fail closed: never merge into or overwrite an existing destination.
    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced by relocation operations.
#[derive(Debug, thiserror::Error)]
pub enum RelocateError {
    #[error("invalid game folder name '{0}'")]
    InvalidName(String),

    #[error("unknown donor '{0}'")]
    UnknownDonor(String),

    #[error("game folder not found: {0}")]
    GameMissing(String),

    #[error("donor {donor} is already occupied by '{game}'")]
    AlreadyOccupied { donor: String, game: String },

    #[error("donor {0} has no game assigned")]
    AlreadyAbsent(String),

    /// The donor's directory is on disk although the slot is vacant:
    /// config and filesystem have diverged. Refused rather than merged.
    #[error("donor directory already exists: {0}")]
    DonorDirExists(PathBuf),

    /// The slot says occupied but the donor's directory is gone.
    #[error("donor directory missing: {0}")]
    DonorDirMissing(PathBuf),

    #[error("{step} failed: {source}")]
    Move {
        step: Step,
        #[source]
        source: MoveError,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl RelocateError {
    pub(crate) fn at_step(step: Step) -> impl FnOnce(MoveError) -> Self {
        move |source| RelocateError::Move { step, source }
    }
}
