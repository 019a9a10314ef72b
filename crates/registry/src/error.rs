//! Registry error types.

/// Errors produced while loading or persisting the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted config could not be parsed. Fatal at startup: a
    /// dropped assignment record would desynchronize the filesystem from
    /// the config, so we abort instead of defaulting slots.
    #[error("corrupt config at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },
}

impl RegistryError {
    pub(crate) fn corrupt(line: usize, reason: impl Into<String>) -> Self {
        RegistryError::Corrupt {
            line,
            reason: reason.into(),
        }
    }
}
