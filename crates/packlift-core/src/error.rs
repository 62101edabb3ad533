//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to read config file: {path}")]
    ConfigRead { path: String },

    #[error("Invalid config file: {path}, JSON object required")]
    ConfigFormat { path: String },

    #[error("Missing required field: {field}")]
    ConfigValidation { field: String },

    #[error("Environment variable not set: {name}")]
    MissingEnvVar { name: String },

    #[error("Archive error: {message}")]
    Archive { message: String },

    #[error("Extract error: {message}")]
    Extract { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
