//! Configuration schema, key normalization, and structured-data rendering for Saltbox.
//!
//! This crate defines the input layer: the typed sandbox `Configuration`
//! (loaded from a YAML or TOML document and validated once at the boundary),
//! `normalize_keys` for turning symbol-style mapping keys into plain strings,
//! and `render_yaml` / `render_normalized` for emitting YAML documents that the
//! Salt loader accepts.

pub mod config;
pub mod normalize;
pub mod render;

pub use config::{
    parse_config_file, parse_config_str, parse_config_toml_str, ConfigError, Configuration,
    Dependency,
};
pub use normalize::{
    is_non_specific_tag, is_symbol_tag, normalize_keys, plain_key_name, symbol_literal_name,
};
pub use render::{fix_wildcard_tags, render_normalized, render_yaml, RenderError};
