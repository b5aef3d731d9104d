//! CLI-specific error types and mappings.
//!
//! Library errors are folded into [`CliError`] at the binary edge, which
//! also decides the process exit code.

use kaizen_core::{DownloadError, PathError, SettingsError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Anything the core or an adapter reported.
    #[error("{0}")]
    Core(String),

    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required external program is missing.
    #[error("{0}")]
    MissingDependency(String),

    /// Process execution error.
    #[error("Process error: {0}")]
    Process(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(_) => 1,
            Self::Arguments(_) => 2,          // EX_USAGE
            Self::MissingDependency(_) => 69, // EX_UNAVAILABLE
            Self::Process(_) => 71,           // EX_OSERR
            Self::Io(_) => 74,                // EX_IOERR
            Self::Config(_) => 78,            // EX_CONFIG
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::CreateFailed { .. } | PathError::NotADirectory(_) => {
                Self::Io(err.to_string())
            }
            _ => Self::Config(err.to_string()),
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<DownloadError> for CliError {
    fn from(err: DownloadError) -> Self {
        Self::Core(err.user_message())
    }
}

impl From<kaizen_api::ApiError> for CliError {
    fn from(err: kaizen_api::ApiError) -> Self {
        match err {
            kaizen_api::ApiError::InvalidUrl(_) => Self::Config(err.to_string()),
            _ => Self::Core(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn exit_codes_follow_sysexits() {
        assert_eq!(CliError::Core("x".into()).exit_code(), 1);
        assert_eq!(CliError::Arguments("x".into()).exit_code(), 2);
        assert_eq!(CliError::MissingDependency("x".into()).exit_code(), 69);
        assert_eq!(CliError::Config("x".into()).exit_code(), 78);
    }

    #[test]
    fn path_errors_split_between_io_and_config() {
        let create = PathError::CreateFailed {
            path: PathBuf::from("/nope"),
            reason: "denied".to_string(),
        };
        assert!(matches!(CliError::from(create), CliError::Io(_)));
        assert!(matches!(
            CliError::from(PathError::NoHomeDir),
            CliError::Config(_)
        ));
    }

    #[test]
    fn settings_errors_are_config_errors() {
        let err = CliError::from(SettingsError::EmptyPlayerCommand);
        assert_eq!(
            err.to_string(),
            "Configuration error: Player command cannot be empty"
        );
    }
}
