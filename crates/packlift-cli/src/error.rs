//! CLI error types with exit code handling
//!
//! Maps library errors to user-facing diagnostics and exit codes.

use miette::Diagnostic;
use thiserror::Error;

use packlift_core::CoreError;
use packlift_store::StoreError;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Manifest or deploy descriptor invalid
    #[error("Config error: {message}")]
    #[diagnostic(code(packlift::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Pull/push against the remote store failed
    #[error("Transfer error: {message}")]
    #[diagnostic(code(packlift::cli::transfer))]
    Transfer { message: String },

    /// Packaging or extraction failed
    #[error("Archive error: {message}")]
    #[diagnostic(code(packlift::cli::archive))]
    Archive { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(packlift::cli::io))]
    Io { message: String },

    /// Wrapped error for passthrough
    #[error("{message}")]
    #[diagnostic(code(packlift::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Transfer { .. } => exit_codes::TRANSFER_ERROR,
            CliError::Archive { .. } => exit_codes::ARCHIVE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    fn config(message: impl Into<String>, help: Option<String>) -> Self {
        Self::Config {
            message: message.into(),
            help,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(error: CoreError) -> Self {
        match &error {
            CoreError::ConfigRead { .. } | CoreError::ConfigFormat { .. } => {
                CliError::config(error.to_string(), None)
            }
            CoreError::ConfigValidation { field } => CliError::config(
                error.to_string(),
                Some(format!("add a non-empty \"{field}\" field")),
            ),
            CoreError::MissingEnvVar { name } => CliError::config(
                error.to_string(),
                Some(format!("export {name} before running packlift")),
            ),
            CoreError::Archive { .. } | CoreError::Extract { .. } => CliError::Archive {
                message: error.to_string(),
            },
            CoreError::Io(_) => CliError::Io {
                message: error.to_string(),
            },
        }
    }
}

impl From<StoreError> for CliError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::UnsupportedProvider { .. } | StoreError::InvalidRemote { .. } => {
                CliError::config(error.to_string(), None)
            }
            StoreError::MissingCredential { .. }
            | StoreError::Transfer { .. }
            | StoreError::Network { .. }
            | StoreError::IntegrityCheckFailed { .. } => CliError::Transfer {
                message: error.to_string(),
            },
            StoreError::CacheDir { .. } | StoreError::Io(_) => CliError::Io {
                message: error.to_string(),
            },
            StoreError::Core(core) => core.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        let config = CliError::from(CoreError::ConfigValidation {
            field: "name".to_string(),
        });
        assert_eq!(config.exit_code(), exit_codes::CONFIG_ERROR);

        let transfer = CliError::from(StoreError::Transfer {
            object: "pkg@1.0.0.tar.gz".to_string(),
            message: "404".to_string(),
        });
        assert_eq!(transfer.exit_code(), exit_codes::TRANSFER_ERROR);

        let archive = CliError::from(CoreError::Archive {
            message: "missing".to_string(),
        });
        assert_eq!(archive.exit_code(), exit_codes::ARCHIVE_ERROR);
    }

    #[test]
    fn test_nested_core_error_unwrapped() {
        let nested = StoreError::Core(CoreError::MissingEnvVar {
            name: "TOKEN".to_string(),
        });
        let cli = CliError::from(nested);
        assert_eq!(cli.exit_code(), exit_codes::CONFIG_ERROR);
        assert!(cli.to_string().contains("TOKEN"));
    }
}
