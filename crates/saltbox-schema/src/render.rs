use crate::normalize::normalize_keys;
use regex::Regex;
use serde::Serialize;
use serde_yaml::Value;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to render structured data: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Matches a wildcard scalar emitted behind the non-specific `!` tag, in its
/// shorthand (`! '*'`) or verbatim (`!<!> '*'`, `!<%21> '*'`) spelling.
fn tagged_wildcard() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"!(?:<(?:!|%21)>)?\s'\*'").expect("static wildcard pattern is valid")
    })
}

/// Rewrite every tagged wildcard into a plain single-quoted `'*'`.
///
/// Salt's loader reads the tagged form as a type tag and rejects the key.
/// `normalize_keys` already strips the non-specific tag, so on normalized
/// input this is a no-op; it stays as a textual pass for documents rendered
/// without normalization.
pub fn fix_wildcard_tags(text: &str) -> String {
    tagged_wildcard().replace_all(text, "'*'").into_owned()
}

/// Serialize `value` as a block-style YAML document and apply the wildcard fix-up.
pub fn render_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String, RenderError> {
    let raw = serde_yaml::to_string(value)?;
    Ok(fix_wildcard_tags(&raw))
}

/// Normalize symbol-style keys, then render.
pub fn render_normalized(value: &Value) -> Result<String, RenderError> {
    render_yaml(&normalize_keys(value))
}
