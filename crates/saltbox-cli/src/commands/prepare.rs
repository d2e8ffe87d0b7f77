use super::{json_pretty, EXIT_SUCCESS};
use saltbox_core::{prepare_sandbox, run_step, CoreError, Step, TracingLog};
use saltbox_sandbox::{tree_digest, SandboxLayout};
use saltbox_schema::parse_config_file;
use std::path::Path;

pub fn run(config_path: &Path, sandbox: &Path, step: Option<&str>, json: bool) -> Result<u8, String> {
    let config = parse_config_file(config_path).map_err(|e| e.to_string())?;
    std::fs::create_dir_all(sandbox)
        .map_err(|e| format!("sandbox error: cannot create {}: {e}", sandbox.display()))?;
    let layout = SandboxLayout::new(sandbox);

    if let Some(name) = step {
        let step: Step = name.parse().map_err(|e: CoreError| e.to_string())?;
        config.validate().map_err(|e| e.to_string())?;
        let written = run_step(step, &config, &layout, &TracingLog).map_err(|e| e.to_string())?;

        if json {
            let payload = serde_json::json!({
                "sandbox": sandbox.display().to_string(),
                "step": step,
                "written": written,
            });
            println!("{}", json_pretty(&payload)?);
        } else {
            println!("{step}: wrote {written} file(s)");
        }
        return Ok(EXIT_SUCCESS);
    }

    let report = prepare_sandbox(&config, &layout, &TracingLog).map_err(|e| e.to_string())?;
    let digest = tree_digest(sandbox).map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::json!({
            "sandbox": sandbox.display().to_string(),
            "report": report,
            "total": report.total(),
            "digest": digest,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "prepared sandbox {}: {} file(s)",
            sandbox.display(),
            report.total()
        );
        for step in Step::ALL {
            let written = match step {
                Step::Data => report.data,
                Step::Minion => report.minion,
                Step::StateTop => report.state_top,
                Step::Pillars => report.pillars,
                Step::Grains => report.grains,
                Step::States => report.states,
            };
            println!("  {step:<10} {written}");
        }
        println!("digest: {digest}");
    }
    Ok(EXIT_SUCCESS)
}
