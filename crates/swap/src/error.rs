//! Swap session error types.

use donorswap_npdm::NpdmError;
use donorswap_registry::RegistryError;
use donorswap_relocate::RelocateError;

/// Errors produced by the swap controller.
///
/// Selection errors (`DonorNotFound`, `GameNotFound`, `NothingSelected`)
/// are recoverable: the session keeps its state and the user re-prompts.
#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    #[error("no donor title with id or name '{0}'")]
    DonorNotFound(String),

    #[error("no game folder named '{0}'")]
    GameNotFound(String),

    #[error("select a donor title and a game folder first")]
    NothingSelected,

    #[error("select a donor title first")]
    NoDonorSelected,

    /// One game in two slots at once would desynchronize the registry.
    #[error("game '{game}' is already installed in donor {donor}")]
    GameInUse { game: String, donor: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Relocate(#[from] RelocateError),

    #[error(transparent)]
    Npdm(#[from] NpdmError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
