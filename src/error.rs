//! Unified error types for cnikit

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cnikit operations
#[derive(Error, Debug)]
pub enum Error {
    // Argument errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Out of memory")]
    OutOfMemory,

    #[error("{0}")]
    InvalidAddress(String),

    #[error("{field} is required")]
    MissingField { field: &'static str },

    // Result errors
    #[error("parse json failed: {0}")]
    Parse(String),

    #[error("Convert {what} failed: {reason}")]
    Conversion { what: String, reason: String },

    // Config errors
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("Error parsing configuration: {0}")]
    ConfigParse(String),

    #[error("Config validation failed: {0}")]
    ConfigValidation(String),

    #[error("No network config named '{name}' found in {dir}: {cause}")]
    NotFound {
        name: String,
        dir: PathBuf,
        cause: NotFoundCause,
    },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl Error {
    /// Allocation failures are recoverable and may be retried later
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Error::OutOfMemory)
    }

    /// True for every flavor of "nothing matched" from directory discovery
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub(crate) fn conversion(what: impl Into<String>, reason: impl fmt::Display) -> Self {
        Error::Conversion {
            what: what.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::OutOfMemory
    }
}

/// Why a lookup by network name came back empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundCause {
    /// The directory holds no file with a recognized extension
    NoConfigFiles,
    /// Every candidate failed to parse; one diagnostic per file, in scan order
    AllUnparsable(Vec<(PathBuf, String)>),
    /// Files parsed but none carried the requested name; `failures` holds the
    /// diagnostics of the files that were skipped along the way
    NoMatch {
        parsed: usize,
        failures: Vec<(PathBuf, String)>,
    },
}

impl fmt::Display for NotFoundCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundCause::NoConfigFiles => write!(f, "no config files"),
            NotFoundCause::AllUnparsable(failures) => {
                write!(f, "all {} config files failed to parse", failures.len())?;
                write_failures(f, failures)
            }
            NotFoundCause::NoMatch { parsed, failures } => {
                write!(f, "no match among {} parsed config files", parsed)?;
                if !failures.is_empty() {
                    write!(f, ", {} skipped", failures.len())?;
                }
                write_failures(f, failures)
            }
        }
    }
}

fn write_failures(f: &mut fmt::Formatter<'_>, failures: &[(PathBuf, String)]) -> fmt::Result {
    for (path, reason) in failures {
        write!(f, "; {}: {}", path.display(), reason)?;
    }
    Ok(())
}

/// Result type alias for cnikit operations
pub type Result<T> = std::result::Result<T, Error>;
