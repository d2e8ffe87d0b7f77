use super::EXIT_SUCCESS;
use saltbox_schema::render_normalized;
use std::path::Path;

/// Normalize and re-render a YAML document the way pillars and grains are written.
pub fn run(path: &Path) -> Result<u8, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let value: serde_yaml::Value = serde_yaml::from_str(&content)
        .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
    let rendered = render_normalized(&value).map_err(|e| e.to_string())?;
    print!("{rendered}");
    Ok(EXIT_SUCCESS)
}
