//! Error types for tsrefs-content

/// Result type for tsrefs-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tsrefs-content operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse {format} content: {message}")]
    ParseError { format: String, message: String },

    #[error("Cannot set path in {format} document: {reason}")]
    PathSetFailed {
        format: String,
        path: String,
        reason: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rendered document is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            format: format.into(),
            message: message.into(),
        }
    }

    pub(crate) fn path_set(path: &[&str], reason: impl Into<String>) -> Self {
        Self::PathSetFailed {
            format: "JSONC".into(),
            path: path.join("."),
            reason: reason.into(),
        }
    }
}
