//! `modelsync` — sync models, update the manifest, optionally clean up.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use modelsync_sync::{
    pipeline::{self, SyncConfig, SyncMode},
    SyncError,
};

use super::report;

/// Source models root, relative to the project root (sibling project).
pub const DEFAULT_SOURCE_MODELS: &str = "../ursim/models";
/// Destination models root, relative to the project root.
pub const DEST_MODELS_SUBPATH: &str = "public/models";

/// Exit code when the source models root does not exist.
const EXIT_SOURCE_MISSING: u8 = 2;

/// Arguments for `modelsync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Source models directory [default: ../ursim/models]
    #[arg(long, env = "MODELSYNC_SRC", value_name = "PATH")]
    pub src: Option<PathBuf>,

    /// Destination models directory [default: public/models]
    #[arg(long, env = "MODELSYNC_DEST", value_name = "PATH")]
    pub dest: Option<PathBuf>,

    /// Sync all models, not just those in best_models.json.
    #[arg(long)]
    pub all: bool,

    /// Delete models that are not listed as best.
    #[arg(long)]
    pub cleanup: bool,

    /// Overwrite existing files even if different.
    #[arg(long)]
    pub overwrite: bool,

    /// Show what would be done without making changes.
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<ExitCode> {
        let project_root =
            std::env::current_dir().context("could not determine the project root")?;
        let config = self.config(&project_root);
        tracing::debug!(?config, "resolved sync configuration");

        if self.verbose {
            println!("Source: {}", config.source_root.display());
            println!("Destination: {}", config.dest_root.display());
            println!(
                "Mode: {}",
                match config.mode {
                    SyncMode::All => "All models",
                    SyncMode::Best => "Best models only",
                }
            );
        }

        let result = match pipeline::run(&config) {
            Ok(result) => result,
            Err(SyncError::SourceNotFound { path }) => {
                eprintln!("{} Source models directory not found: {}", "!".red(), path.display());
                eprintln!("  Make sure the source project exists at: {}", path.display());
                return Ok(ExitCode::from(EXIT_SOURCE_MISSING));
            }
            Err(e) => return Err(e).context("sync failed"),
        };

        report::print(&result, &config, self.verbose);
        if result.is_success() {
            Ok(ExitCode::SUCCESS)
        } else {
            Ok(ExitCode::FAILURE)
        }
    }

    fn config(&self, project_root: &Path) -> SyncConfig {
        let source = self
            .src
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_MODELS));
        let dest = self
            .dest
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEST_MODELS_SUBPATH));

        SyncConfig {
            mode: if self.all { SyncMode::All } else { SyncMode::Best },
            overwrite: self.overwrite,
            dry_run: self.dry_run,
            cleanup: self.cleanup,
            ..SyncConfig::new(
                resolve(project_root, &source),
                resolve(project_root, &dest),
            )
        }
    }
}

/// Absolute form of `path`, canonicalised when it exists.
fn resolve(project_root: &Path, path: &Path) -> PathBuf {
    let joined = project_root.join(path);
    std::fs::canonicalize(&joined).unwrap_or(joined)
}
