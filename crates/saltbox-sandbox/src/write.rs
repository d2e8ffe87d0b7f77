use crate::SandboxError;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn ensure_parent(path: &Path) -> Result<&Path, SandboxError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    Ok(parent)
}

/// Create `path` and any missing parents inside the sandbox.
pub fn ensure_dir(path: &Path) -> Result<(), SandboxError> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Write `content` to `path` as-is, creating parent directories.
///
/// The file is staged next to its destination and renamed into place, so a
/// reader never observes a half-written file.
pub fn write_raw_file(path: &Path, content: impl AsRef<[u8]>) -> Result<(), SandboxError> {
    let parent = ensure_parent(path)?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(content.as_ref())?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }

    tmp.persist(path).map_err(|e| SandboxError::Io(e.error))?;
    Ok(())
}

/// Copy a single file byte-for-byte, creating parent directories.
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), SandboxError> {
    ensure_parent(dst)?;
    fs::copy(src, dst)?;
    Ok(())
}
