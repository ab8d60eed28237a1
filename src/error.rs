use std::path::PathBuf;

use thiserror::Error;

/// Library error type for snapshot generation.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file passed on the command line does not exist.
    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The source file referenced by `input.file` does not exist.
    #[error("input file not found: {}", .0.display())]
    InputFileNotFound(PathBuf),

    /// The configuration parsed but is missing fields or holds invalid values.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A custom file icon could not be loaded. Recoverable: the renderer
    /// falls back to the built-in glyph and records a diagnostic.
    #[error("failed to load file icon {}: {reason}", path.display())]
    IconLoad { path: PathBuf, reason: String },

    /// No usable font face could be located or decoded.
    #[error("font error: {0}")]
    Font(String),

    /// Any drawing or encoding failure.
    #[error("generation failed: {0}")]
    Generation(String),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    pub(crate) fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
