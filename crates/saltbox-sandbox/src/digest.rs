use crate::{slash_path, SandboxError};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Deterministic blake3 digest of a directory tree.
///
/// Covers every entry's relative path and kind, file contents, and symlink
/// targets, visited in sorted order. Timestamps and permissions are ignored.
pub fn tree_digest(root: &Path) -> Result<String, SandboxError> {
    let mut hasher = blake3::Hasher::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let rel = slash_path(entry.path().strip_prefix(root).unwrap_or(entry.path()));
        let ft = entry.file_type();

        if ft.is_dir() {
            hasher.update(b"d\0");
            hasher.update(rel.as_bytes());
            hasher.update(b"\0");
        } else if ft.is_symlink() {
            let target = fs::read_link(entry.path())?;
            hasher.update(b"l\0");
            hasher.update(rel.as_bytes());
            hasher.update(b"\0");
            hasher.update(target.to_string_lossy().as_bytes());
            hasher.update(b"\0");
        } else {
            let data = fs::read(entry.path())?;
            hasher.update(b"f\0");
            hasher.update(rel.as_bytes());
            hasher.update(b"\0");
            hasher.update(&(data.len() as u64).to_le_bytes());
            hasher.update(&data);
        }
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Sorted `/`-separated relative paths of every non-directory entry under `root`.
pub fn tree_listing(root: &Path) -> Result<Vec<String>, SandboxError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            files.push(slash_path(
                entry.path().strip_prefix(root).unwrap_or(entry.path()),
            ));
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populate(root: &Path) {
        fs::create_dir_all(root.join("srv/salt")).unwrap();
        fs::write(root.join("srv/salt/top.sls"), "base: {}\n").unwrap();
        fs::write(root.join("minion"), "file_client: local\n").unwrap();
    }

    #[test]
    fn identical_trees_have_identical_digests() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        populate(a.path());
        populate(b.path());
        assert_eq!(tree_digest(a.path()).unwrap(), tree_digest(b.path()).unwrap());
    }

    #[test]
    fn content_change_changes_digest() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path());
        let before = tree_digest(dir.path()).unwrap();
        fs::write(dir.path().join("minion"), "file_client: remote\n").unwrap();
        assert_ne!(before, tree_digest(dir.path()).unwrap());
    }

    #[test]
    fn empty_directory_is_part_of_digest() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path());
        let before = tree_digest(dir.path()).unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        assert_ne!(before, tree_digest(dir.path()).unwrap());
    }

    #[test]
    fn listing_is_sorted_and_relative() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path());
        assert_eq!(
            tree_listing(dir.path()).unwrap(),
            vec!["minion".to_owned(), "srv/salt/top.sls".to_owned()]
        );
    }
}
