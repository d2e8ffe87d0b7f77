use super::EXIT_SUCCESS;
use clap::CommandFactory;
use clap_complete::Shell;
use std::fs::File;
use std::path::Path;

/// Emit the completion script for `shell` to stdout, or to `output` when given.
pub fn run<C: CommandFactory>(shell: Shell, output: Option<&Path>) -> Result<u8, String> {
    let mut cmd = C::command();
    let bin_name = cmd.get_name().to_owned();
    match output {
        Some(path) => {
            let mut file = File::create(path)
                .map_err(|e| format!("failed to create {}: {e}", path.display()))?;
            clap_complete::generate(shell, &mut cmd, bin_name, &mut file);
            eprintln!("{shell} completions written to {}", path.display());
        }
        None => clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout()),
    }
    Ok(EXIT_SUCCESS)
}
