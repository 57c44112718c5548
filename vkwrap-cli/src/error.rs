//! Error types for the CLI.
//!
//! Fatal conditions surface here with enough context (paths, type names) to
//! identify the offending input. A failed run never leaves a partially
//! written target behind: generation happens fully in memory and writing
//! only starts on success.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error loading the registry document.
    #[error("Failed to load registry: {0}")]
    Registry(#[from] RegistryError),

    /// Fatal generation error; the target was aborted.
    #[error("Failed to generate target: {0}")]
    Generate(#[from] vkwrap::GenerateError),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Error during registry watching.
    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),

    /// Validation failed (generated header out of date).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error loading the registry document.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Registry file does not exist.
    #[error("Registry file not found: {path}")]
    NotFound { path: PathBuf },

    /// The document is not a valid registry.
    #[error("Invalid registry in {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    /// IO error reading the registry.
    #[error("Failed to read registry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error during registry watching.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Failed to initialize watcher.
    #[error("Failed to initialize registry watcher: {0}")]
    Init(String),

    /// Error from the notification backend.
    #[error("Watch notification error: {0}")]
    Notify(String),
}

impl RegistryError {
    /// Create a not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    /// Create an invalid document error.
    pub fn invalid(path: PathBuf, message: impl Into<String>) -> Self {
        Self::Invalid {
            path,
            message: message.into(),
        }
    }
}

impl ConfigError {
    /// Create a not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
