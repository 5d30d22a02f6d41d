//! Error types for tsrefs-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that end the process with exit code 1
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from tsrefs-core
    #[error(transparent)]
    Core(#[from] tsrefs_core::Error),

    /// Error from tsrefs-fs
    #[error(transparent)]
    Fs(#[from] tsrefs_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
