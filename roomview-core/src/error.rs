use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can surface from the core.
///
/// Rendering itself never fails; these cover parsing and configuration at the
/// edges of the crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Unknown furniture type: {0}")]
    UnknownFurnitureType(String),

    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}
