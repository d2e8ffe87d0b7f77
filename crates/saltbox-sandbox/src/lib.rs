//! Sandbox tree primitives for Saltbox.
//!
//! This crate provides the write side of sandbox preparation: `SandboxLayout`
//! for resolving where each generated artifact lives under the sandbox root,
//! `copy_filtered` for recursive copies that honor the configured exclude
//! patterns, `write_raw_file` for atomic file writes, and `tree_digest` for a
//! deterministic blake3 fingerprint of a prepared tree.

pub mod copy;
pub mod digest;
pub mod layout;
pub mod write;

pub use copy::{copy_filtered, CopyFilter};
pub use digest::{tree_digest, tree_listing};
pub use layout::{
    instance_file_root, instance_pillar_root, posix_join, sandbox_join, SandboxLayout,
    EXTENSION_DIRS,
};
pub use write::{copy_file, ensure_dir, write_raw_file};

use std::path::Path;
use thiserror::Error;

/// Render a relative path with `/` separators regardless of host platform.
pub(crate) fn slash_path(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("sandbox I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sandbox walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("invalid copy filter pattern '{pattern}': {reason}")]
    InvalidFilter { pattern: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_path_joins_components() {
        assert_eq!(slash_path(Path::new("a/b/c.sls")), "a/b/c.sls");
        assert_eq!(slash_path(Path::new("single")), "single");
    }

    #[test]
    fn sandbox_error_display_invalid_filter() {
        let e = SandboxError::InvalidFilter {
            pattern: "[x".to_owned(),
            reason: "unclosed".to_owned(),
        };
        let msg = e.to_string();
        assert!(msg.contains("[x"));
        assert!(msg.contains("unclosed"));
    }

    #[test]
    fn sandbox_error_display_io() {
        let e = SandboxError::Io(std::io::Error::other("disk full"));
        assert!(e.to_string().contains("disk full"));
    }
}
