mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_CONFIG_ERROR, EXIT_FAILURE, EXIT_SANDBOX_ERROR};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "saltbox",
    version,
    about = "Build hermetic Salt sandboxes for state-application test runs"
)]
struct Cli {
    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Prepare a sandbox from a configuration file.
    Prepare {
        /// Configuration file (YAML, or TOML with a .toml extension).
        #[arg(short, long, default_value = ".kitchen.yml")]
        config: PathBuf,
        /// Sandbox root directory; created if missing.
        #[arg(short, long)]
        sandbox: PathBuf,
        /// Run a single step: data, minion, state_top, pillars, grains, states.
        #[arg(long)]
        step: Option<String>,
    },
    /// Print the content digest of a prepared sandbox.
    Digest {
        /// Sandbox root directory.
        sandbox: PathBuf,
        /// Also list every file in the sandbox.
        #[arg(long, default_value_t = false)]
        list: bool,
    },
    /// Normalize keys and re-render a YAML document to stdout.
    Render {
        /// YAML document to render.
        file: PathBuf,
    },
    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
        /// Write the script to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate man pages.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("SALTBOX_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json_output = cli.json;
    let result = match cli.command {
        Commands::Prepare {
            config,
            sandbox,
            step,
        } => commands::prepare::run(&config, &sandbox, step.as_deref(), json_output),
        Commands::Digest { sandbox, list } => commands::digest::run(&sandbox, list, json_output),
        Commands::Render { file } => commands::render::run(&file),
        Commands::Completions { shell, output } => {
            commands::completions::run::<Cli>(shell, output.as_deref())
        }
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("configuration error:")
                || msg.starts_with("failed to parse configuration")
                || msg.starts_with("failed to read configuration")
            {
                EXIT_CONFIG_ERROR
            } else if msg.starts_with("sandbox error:") {
                EXIT_SANDBOX_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
