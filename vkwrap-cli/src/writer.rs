//! Output writer.
//!
//! Writes the generated header (and the companion support header the
//! generated code includes) to disk, with dry-run support. Generation
//! happens fully in memory before this module is reached, so a failed run
//! never leaves a partial target behind.

use crate::error::{CliResult, WriteError};
use std::path::{Path, PathBuf};

/// The support header shipped alongside every generated target. It defines
/// the `vkw::Array` sequence type and the `VKW_ASSERT` macro the generated
/// `map()` functions rely on.
pub const SUPPORT_HEADER: &str = include_str!("../assets/vkwrap_utils.hpp");

/// Filename the generated header includes the support code under.
pub const SUPPORT_HEADER_FILENAME: &str = "vkwrap_utils.hpp";

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written successfully.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// Dry run - content was not written.
    DryRun {
        /// Content that would have been written.
        content: String,
        /// Path where content would have been written.
        path: PathBuf,
    },
}

/// Writer for generated headers with dry-run support.
#[derive(Debug)]
pub struct HeaderWriter {
    dry_run: bool,
}

impl HeaderWriter {
    /// Create a new writer.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Write content to a file, creating parent directories as needed.
    ///
    /// In dry-run mode, returns the content without writing.
    pub fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: content.to_string(),
                path: path.to_path_buf(),
            });
        }

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    /// Write the companion support header next to the given target path.
    pub fn write_support_header(&self, target: &Path) -> CliResult<WriteResult> {
        let dir = target.parent().unwrap_or_else(|| Path::new("."));
        self.write(&dir.join(SUPPORT_HEADER_FILENAME), SUPPORT_HEADER)
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl WriteResult {
    /// Get the path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. } => path,
            WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Check if the write was successful (not dry-run).
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }

    /// Get the number of bytes written (0 for dry-run).
    pub fn bytes(&self) -> usize {
        match self {
            WriteResult::Written { bytes, .. } => *bytes,
            WriteResult::DryRun { .. } => 0,
        }
    }
}
