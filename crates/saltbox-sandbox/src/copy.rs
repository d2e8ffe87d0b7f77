use crate::write::copy_file;
use crate::{slash_path, SandboxError};
use glob::Pattern;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Exclude patterns applied to every entry of a tree copy.
///
/// A pattern excludes an entry when it matches the entry's file name or its
/// `/`-separated path relative to the copy source. Patterns without glob
/// metacharacters are exact name matches.
#[derive(Debug, Clone, Default)]
pub struct CopyFilter {
    patterns: Vec<Pattern>,
}

impl CopyFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, SandboxError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let raw = p.as_ref();
                Pattern::new(raw).map_err(|e| SandboxError::InvalidFilter {
                    pattern: raw.to_owned(),
                    reason: e.msg.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn excludes(&self, rel: &Path) -> bool {
        let name = rel.file_name().map(|n| n.to_string_lossy());
        let rel = slash_path(rel);
        self.patterns.iter().any(|p| {
            name.as_deref().is_some_and(|n| p.matches(n)) || p.matches(&rel)
        })
    }
}

/// Copy `src` to `dst`, skipping excluded entries and everything beneath them.
///
/// A directory source has its contents copied into `dst`; a file source is
/// copied to `dst` (or into it, when `dst` is an existing directory) unless its
/// name is excluded. A missing source is a no-op. Existing destination files are overwritten. If `dst`
/// lies inside `src`, it is not copied into itself.
///
/// Returns the number of files written.
pub fn copy_filtered(src: &Path, dst: &Path, filter: &CopyFilter) -> Result<usize, SandboxError> {
    let meta = match fs::metadata(src) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("copy source {} does not exist, skipping", src.display());
            return Ok(0);
        }
        Err(e) => return Err(e.into()),
    };

    if !meta.is_dir() {
        if src
            .file_name()
            .is_some_and(|name| filter.excludes(Path::new(name)))
        {
            debug!("excluding {} from copy", src.display());
            return Ok(0);
        }
        let target = match src.file_name() {
            Some(name) if dst.is_dir() => dst.join(name),
            _ => dst.to_path_buf(),
        };
        copy_file(src, &target)?;
        return Ok(1);
    }

    fs::create_dir_all(dst)?;
    let root = fs::canonicalize(src)?;
    let guard = fs::canonicalize(dst)?;

    let walker = WalkDir::new(&root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.path() == guard {
                return false;
            }
            let rel = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            if filter.excludes(rel) {
                debug!("excluding {} from copy", rel.display());
                return false;
            }
            true
        });

    let mut count = 0;
    for entry in walker {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(&root)
            .map_err(|e| SandboxError::Io(io::Error::other(format!("path strip: {e}"))))?;
        let target = dst.join(rel);
        let ft = entry.file_type();

        if ft.is_dir() {
            fs::create_dir_all(&target)?;
        } else if ft.is_symlink() {
            copy_symlink(entry.path(), &target)?;
            count += 1;
        } else {
            fs::copy(entry.path(), &target)?;
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<(), SandboxError> {
    let link_target = fs::read_link(src)?;
    if dst.symlink_metadata().is_ok() {
        fs::remove_file(dst)?;
    }
    std::os::unix::fs::symlink(link_target, dst)?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<(), SandboxError> {
    fs::copy(src, dst)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn filter(patterns: &[&str]) -> CopyFilter {
        CopyFilter::new(patterns).unwrap()
    }

    #[test]
    fn exact_name_matches_any_depth() {
        let f = filter(&[".git"]);
        assert!(f.excludes(Path::new(".git")));
        assert!(f.excludes(Path::new("nested/.git")));
        assert!(!f.excludes(Path::new(".gitignore")));
    }

    #[test]
    fn glob_matches_names() {
        let f = filter(&["*.pyc"]);
        assert!(f.excludes(Path::new("_modules/util.pyc")));
        assert!(!f.excludes(Path::new("_modules/util.py")));
    }

    #[test]
    fn relative_path_patterns_match() {
        let f = filter(&["test/integration"]);
        assert!(f.excludes(Path::new("test/integration")));
        assert!(!f.excludes(Path::new("test")));
        assert!(!f.excludes(Path::new("other/integration")));
    }

    #[test]
    fn empty_filter_excludes_nothing() {
        let f = CopyFilter::default();
        assert!(f.is_empty());
        assert!(!f.excludes(Path::new("anything")));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = CopyFilter::new(&["[oops"]).unwrap_err();
        assert!(matches!(err, SandboxError::InvalidFilter { .. }));
    }

    #[test]
    fn missing_source_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("dst");
        let count = copy_filtered(&dir.path().join("absent"), &dst, &filter(&[])).unwrap();
        assert_eq!(count, 0);
        assert!(!dst.exists());
    }

    #[test]
    fn file_source_copies_to_destination_path() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("top.sls");
        fs::write(&src, "base: {}\n").unwrap();
        let dst: PathBuf = dir.path().join("out/renamed.sls");

        assert_eq!(copy_filtered(&src, &dst, &filter(&[])).unwrap(), 1);
        assert_eq!(fs::read_to_string(&dst).unwrap(), "base: {}\n");
    }

    #[test]
    fn file_source_into_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("init.sls");
        fs::write(&src, "pkg.installed: []\n").unwrap();
        let dst = dir.path().join("out");
        fs::create_dir_all(&dst).unwrap();

        copy_filtered(&src, &dst, &filter(&[])).unwrap();
        assert!(dst.join("init.sls").is_file());
    }

    #[test]
    fn excluded_file_source_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("cache.pyc");
        fs::write(&src, "bytecode").unwrap();
        let dst = dir.path().join("out/cache.pyc");

        assert_eq!(copy_filtered(&src, &dst, &filter(&["*.pyc"])).unwrap(), 0);
        assert!(!dst.exists());
    }
}
