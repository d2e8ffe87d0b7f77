use super::{json_pretty, EXIT_SUCCESS};
use saltbox_sandbox::{tree_digest, tree_listing};
use std::path::Path;

pub fn run(sandbox: &Path, list: bool, json: bool) -> Result<u8, String> {
    let digest = tree_digest(sandbox).map_err(|e| e.to_string())?;
    let files = if list {
        tree_listing(sandbox).map_err(|e| e.to_string())?
    } else {
        Vec::new()
    };

    if json {
        let payload = serde_json::json!({
            "sandbox": sandbox.display().to_string(),
            "digest": digest,
            "files": files,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("{digest}");
        for f in &files {
            println!("  {f}");
        }
    }
    Ok(EXIT_SUCCESS)
}
