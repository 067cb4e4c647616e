//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid chart archive: {message}")]
    Archive { message: String },

    #[error("File not found in archive: {path}")]
    MissingFile { path: String },

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid values document: {message}")]
    InvalidValues { message: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
