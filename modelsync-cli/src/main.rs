//! modelsync — copy best neural network models from a sibling project.
//!
//! # Usage
//!
//! ```text
//! modelsync                    # sync best models from ../ursim/models
//! modelsync --all              # sync every model, not just the best
//! modelsync --cleanup          # sync best models, delete the rest
//! modelsync --dry-run -v       # preview what would be synced
//! modelsync --src ../other     # use a different source directory
//! ```

mod commands;

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use commands::sync::SyncArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "modelsync",
    version,
    about = "Sync neural network models from a sibling project into this one",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    sync: SyncArgs,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.sync.verbose);
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match cli.sync.run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "!".red());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
