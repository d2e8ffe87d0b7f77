use saltbox_schema::Configuration;
use std::path::{Component, Path, PathBuf};

/// Python extension directories carried alongside a formula.
pub const EXTENSION_DIRS: [&str; 5] = ["_modules", "_states", "_grains", "_renderers", "_returners"];

const DATA_DIR: &str = "data";
const GRAINS_FILE: &str = "grains";

/// Destination paths for every artifact category inside a sandbox root.
///
/// Configured fragments such as `/etc/salt/minion` are absolute from the test
/// instance's point of view; here they are re-rooted under the sandbox. No
/// method touches the filesystem.
#[derive(Debug, Clone)]
pub struct SandboxLayout {
    root: PathBuf,
}

impl SandboxLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    #[inline]
    pub fn minion_config(&self, config: &Configuration) -> PathBuf {
        sandbox_join(&self.root, &config.salt_minion_config)
    }

    #[inline]
    pub fn state_top(&self, config: &Configuration) -> PathBuf {
        sandbox_join(&self.root, &config.salt_state_top)
    }

    #[inline]
    pub fn pillar_root(&self, config: &Configuration) -> PathBuf {
        sandbox_join(&self.root, &config.salt_pillar_root)
    }

    /// Pillar names may contain `/`, which nests the file below the pillar root.
    #[inline]
    pub fn pillar_path(&self, config: &Configuration, name: &str) -> PathBuf {
        sandbox_join(&self.pillar_root(config), name)
    }

    #[inline]
    pub fn config_dir(&self, config: &Configuration) -> PathBuf {
        sandbox_join(&self.root, &config.salt_config)
    }

    #[inline]
    pub fn grains_file(&self, config: &Configuration) -> PathBuf {
        self.config_dir(config).join(GRAINS_FILE)
    }

    #[inline]
    pub fn file_root(&self, config: &Configuration) -> PathBuf {
        sandbox_join(&self.root, &config.salt_file_root)
    }

    #[inline]
    pub fn formula_dir(&self, config: &Configuration, formula: &str) -> PathBuf {
        sandbox_join(&self.file_root(config), formula)
    }

    #[inline]
    pub fn extension_dir(&self, config: &Configuration, extension: &str) -> PathBuf {
        sandbox_join(&self.file_root(config), extension)
    }

    /// An empty collection name resolves to the file root itself.
    #[inline]
    pub fn collection_dir(&self, config: &Configuration, collection: &str) -> PathBuf {
        sandbox_join(&self.file_root(config), collection)
    }
}

/// Append the normal components of `fragment` to `base`.
///
/// Root, prefix, `.` and `..` components are dropped, so the result never
/// leaves `base`.
pub fn sandbox_join(base: &Path, fragment: impl AsRef<Path>) -> PathBuf {
    let mut out = base.to_path_buf();
    for component in fragment.as_ref().components() {
        if let Component::Normal(part) = component {
            out.push(part);
        }
    }
    out
}

/// Join two POSIX path strings with exactly one `/` between them.
pub fn posix_join(base: &str, fragment: &str) -> String {
    let head = base.trim_end_matches('/');
    let tail = fragment.trim_start_matches('/');
    if tail.is_empty() {
        return base.to_owned();
    }
    if head.is_empty() && !base.starts_with('/') {
        return tail.to_owned();
    }
    format!("{head}/{tail}")
}

/// The file root as the minion inside the test instance sees it.
pub fn instance_file_root(config: &Configuration) -> String {
    posix_join(&config.root_path, &config.salt_file_root)
}

/// The pillar root as the minion inside the test instance sees it.
pub fn instance_pillar_root(config: &Configuration) -> String {
    posix_join(&config.root_path, &config.salt_pillar_root)
}
