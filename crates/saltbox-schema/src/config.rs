use crate::normalize::normalize_keys;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("failed to parse configuration: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("configuration error: {0} must not be empty")]
    EmptyField(&'static str),
    #[error("configuration error: invalid salt_copy_filter pattern '{pattern}': {reason}")]
    InvalidFilter { pattern: String, reason: String },
    #[error("configuration error: pillar name must not be empty")]
    EmptyPillarName,
    #[error("configuration error: dependency name must not be empty")]
    EmptyDependencyName,
}

/// Fully resolved sandbox configuration.
///
/// Path fragments default to the values the Salt provisioner ships with, so a
/// document only needs to name what it changes. Unknown keys are ignored: the
/// surrounding tool owns many options this crate never reads.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Configuration {
    /// Fixture directory copied verbatim into `<sandbox>/data`.
    #[serde(default)]
    pub data_path: Option<PathBuf>,
    /// Entry names (or glob patterns) excluded from every tree copy.
    #[serde(default)]
    pub salt_copy_filter: Vec<String>,
    #[serde(default = "default_salt_env")]
    pub salt_env: String,
    /// Root of the sandbox as seen from inside the test instance.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    #[serde(default = "default_salt_file_root")]
    pub salt_file_root: String,
    #[serde(default = "default_salt_pillar_root")]
    pub salt_pillar_root: String,
    #[serde(default = "default_salt_minion_config")]
    pub salt_minion_config: String,
    #[serde(default = "default_salt_state_top")]
    pub salt_state_top: String,
    #[serde(default = "default_salt_config")]
    pub salt_config: String,
    #[serde(default)]
    pub state_top_from_file: bool,
    /// On-disk top file read when `state_top_from_file` is set.
    #[serde(default = "default_state_top_file")]
    pub state_top_file: PathBuf,
    #[serde(default = "empty_mapping")]
    pub state_top: Value,
    #[serde(default)]
    pub pillars: Option<BTreeMap<String, Value>>,
    #[serde(default, rename = "pillars-from-files")]
    pub pillars_from_files: Option<BTreeMap<String, PathBuf>>,
    #[serde(default)]
    pub grains: Option<Value>,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default = "default_kitchen_root")]
    pub kitchen_root: PathBuf,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default)]
    pub state_collection: bool,
    #[serde(default)]
    pub is_file_root: bool,
}

/// A formula living outside the project, copied next to the project's own states.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    /// Directory that contains the `name` formula directory.
    pub path: PathBuf,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            data_path: None,
            salt_copy_filter: Vec::new(),
            salt_env: default_salt_env(),
            root_path: default_root_path(),
            salt_file_root: default_salt_file_root(),
            salt_pillar_root: default_salt_pillar_root(),
            salt_minion_config: default_salt_minion_config(),
            salt_state_top: default_salt_state_top(),
            salt_config: default_salt_config(),
            state_top_from_file: false,
            state_top_file: default_state_top_file(),
            state_top: empty_mapping(),
            pillars: None,
            pillars_from_files: None,
            grains: None,
            collection_name: None,
            formula: None,
            kitchen_root: default_kitchen_root(),
            dependencies: Vec::new(),
            state_collection: false,
            is_file_root: false,
        }
    }
}

impl Configuration {
    /// Check the invariants every preparation step relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("salt_env", &self.salt_env),
            ("salt_file_root", &self.salt_file_root),
            ("salt_pillar_root", &self.salt_pillar_root),
            ("salt_minion_config", &self.salt_minion_config),
            ("salt_state_top", &self.salt_state_top),
            ("salt_config", &self.salt_config),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField(field));
            }
        }

        for pattern in &self.salt_copy_filter {
            glob::Pattern::new(pattern).map_err(|e| ConfigError::InvalidFilter {
                pattern: pattern.clone(),
                reason: e.msg.to_owned(),
            })?;
        }

        let pillar_names = self
            .pillars
            .iter()
            .flat_map(BTreeMap::keys)
            .chain(self.pillars_from_files.iter().flat_map(BTreeMap::keys));
        for name in pillar_names {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyPillarName);
            }
        }

        if self.dependencies.iter().any(|d| d.name.trim().is_empty()) {
            return Err(ConfigError::EmptyDependencyName);
        }

        Ok(())
    }
}

fn default_salt_env() -> String {
    "base".to_owned()
}

fn default_root_path() -> String {
    "/tmp/kitchen".to_owned()
}

fn default_salt_file_root() -> String {
    "/srv/salt".to_owned()
}

fn default_salt_pillar_root() -> String {
    "/srv/pillar".to_owned()
}

fn default_salt_minion_config() -> String {
    "/etc/salt/minion".to_owned()
}

fn default_salt_state_top() -> String {
    "/srv/salt/top.sls".to_owned()
}

fn default_salt_config() -> String {
    "/etc/salt".to_owned()
}

fn default_state_top_file() -> PathBuf {
    PathBuf::from("top.sls")
}

fn default_kitchen_root() -> PathBuf {
    PathBuf::from(".")
}

fn empty_mapping() -> Value {
    Value::Mapping(Mapping::new())
}

/// Parse a YAML configuration document.
///
/// A document whose top level carries a `provisioner` mapping (the layout of a
/// kitchen file) is unwrapped to that mapping first. Pillar names are
/// normalized like any other symbol-style key, so `:top` names `top`.
pub fn parse_config_str(input: &str) -> Result<Configuration, ConfigError> {
    let mut doc: Value = serde_yaml::from_str(input)?;
    if doc.is_null() {
        doc = empty_mapping();
    }
    let provisioner = doc
        .get("provisioner")
        .filter(|p| p.is_mapping())
        .cloned();
    if let Some(provisioner) = provisioner {
        doc = provisioner;
    }
    for key in ["pillars", "pillars-from-files"] {
        if let Some(pillars) = doc.get_mut(key) {
            *pillars = normalize_keys(pillars);
        }
    }
    Ok(serde_yaml::from_value(doc)?)
}

pub fn parse_config_toml_str(input: &str) -> Result<Configuration, ConfigError> {
    Ok(toml::from_str(input)?)
}

/// Read a configuration file, choosing the format from its extension
/// (`.toml` is TOML, anything else is YAML).
pub fn parse_config_file(path: impl AsRef<Path>) -> Result<Configuration, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    if path.extension().is_some_and(|ext| ext == "toml") {
        parse_config_toml_str(&content)
    } else {
        parse_config_str(&content)
    }
}
