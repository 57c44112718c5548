//! # vkwrap-cli
//!
//! CLI library for generating safer C++ wrapper headers from a
//! Vulkan-style API registry document.
//!
//! This crate provides the tooling around the `vkwrap` generator core:
//! configuration, registry loading, output writing, and watch mode.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`loader`] - Registry document loading
//! - [`writer`] - File output and dry-run support
//! - [`watcher`] - Registry watching for development mode
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod loader;
pub mod watcher;
pub mod writer;

// Re-export main types for convenience
pub use config::{CliArgs, Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use loader::load_registry;
pub use watcher::RegistryWatcher;
pub use writer::{HeaderWriter, WriteResult};
