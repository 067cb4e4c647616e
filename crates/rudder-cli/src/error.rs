//! CLI error types with exit code handling
//!
//! Library errors are folded into a small set of categories, each with its
//! own exit code and diagnostic code.

use miette::Diagnostic;
use rudder_repo::RepoError;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Unknown repository, chart, or version
    #[error("{message}")]
    #[diagnostic(code(rudder::cli::not_found))]
    NotFound {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Remote resource could not be retrieved
    #[error("{message}")]
    #[diagnostic(code(rudder::cli::network))]
    Network {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Remote document or archive is malformed
    #[error("{message}")]
    #[diagnostic(code(rudder::cli::decode))]
    Decode { message: String },

    /// Invalid arguments or configuration
    #[error("{message}")]
    #[diagnostic(code(rudder::cli::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (cache directory, config file)
    #[error("IO error: {message}")]
    #[diagnostic(code(rudder::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(rudder::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::Network { .. } => exit_codes::NETWORK_ERROR,
            CliError::Decode { .. } => exit_codes::DECODE_ERROR,
            CliError::Input { .. } => exit_codes::USAGE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a not-found error with help text
    pub fn not_found_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

/// Render an error followed by its source chain
fn with_sources(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl From<RepoError> for CliError {
    fn from(err: RepoError) -> Self {
        let message = with_sources(&err);
        match err {
            RepoError::RepositoryNotFound { .. } => CliError::NotFound {
                message,
                help: Some("Run 'rudder repo list' to see the configured repositories".to_string()),
            },
            RepoError::PackageNotFound { repo, .. } => CliError::NotFound {
                message,
                help: Some(format!("Run 'rudder list {}' to see the available charts", repo)),
            },
            RepoError::VersionNotFound { .. } => CliError::NotFound { message, help: None },

            RepoError::RateLimited { retry_after } => CliError::Network {
                message,
                help: Some(format!("Retry in {} seconds", retry_after)),
            },
            RepoError::IndexFetchFailed { .. }
            | RepoError::ArchiveFetchFailed { .. }
            | RepoError::HttpError { .. }
            | RepoError::NetworkError { .. }
            | RepoError::Timeout { .. }
            | RepoError::AuthRequired { .. }
            | RepoError::AuthFailed { .. } => CliError::Network { message, help: None },

            RepoError::IndexDecodeFailed { .. }
            | RepoError::NoDownloadUrl { .. }
            | RepoError::ArchiveDecodeFailed { .. }
            | RepoError::MetadataDecodeFailed { .. }
            | RepoError::DefaultsDecodeFailed { .. }
            | RepoError::Serialization(_) => CliError::Decode { message },

            RepoError::InvalidConfig { .. } | RepoError::InvalidRepositoryUrl { .. } => {
                CliError::Input {
                    message,
                    help: Some(
                        "Check the repositories and cache sections of the config file".to_string(),
                    ),
                }
            }

            RepoError::CacheError { .. } | RepoError::Io(_) => CliError::Io { message },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("Failed to serialize output: {}", err))
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
