//! Registry document loader.
//!
//! Reads a registry JSON document and deserializes it into the core type
//! graph. The document already carries segmented member declarations; no C
//! parsing happens here or anywhere downstream.

use crate::error::{CliResult, RegistryError};
use std::path::Path;
use vkwrap::Registry;

/// Load a registry document from disk.
pub fn load_registry(path: &Path) -> CliResult<Registry> {
    if !path.exists() {
        return Err(RegistryError::not_found(path.to_path_buf()).into());
    }

    let content = std::fs::read_to_string(path).map_err(|e| RegistryError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_registry(&content, path)
}

/// Deserialize registry content, attributing failures to the source path.
pub fn parse_registry(content: &str, path: &Path) -> CliResult<Registry> {
    serde_json::from_str(content)
        .map_err(|e| RegistryError::invalid(path.to_path_buf(), e.to_string()).into())
}
