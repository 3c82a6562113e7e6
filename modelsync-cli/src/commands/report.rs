//! Human-readable run report.
//!
//! Markers: `!` error, `-` skip, `+` copy, `*` manifest update, `=` no-op.
//! Actions go to stdout, problems to stderr. A dry run prints one line per
//! action exactly where a live run would.

use std::path::Path;

use colored::Colorize;

use modelsync_core::MANIFEST_FILENAME;
use modelsync_sync::{
    pipeline::{RunReport, SyncConfig},
    CleanupReport, CleanupSweep, CopyOutcome, ManifestUpdate, SyncEvent, SyncReport,
};

pub fn print(report: &RunReport, config: &SyncConfig, verbose: bool) {
    print_sync(&report.sync, verbose);
    print_manifest(&report.manifest, verbose);
    if let Some(cleanup) = &report.cleanup {
        print_cleanup(cleanup, config, verbose);
    }

    if verbose && report.synced_count() > 0 {
        println!("Successfully synced {} model(s).", report.synced_count());
    }
}

fn print_sync(sync: &SyncReport, verbose: bool) {
    for event in &sync.events {
        match event {
            SyncEvent::Copy {
                category,
                file,
                source,
                dest,
                outcome,
            } => match outcome {
                CopyOutcome::Copied => {
                    println!("{} Copying: {category}/{file}", "+".green())
                }
                CopyOutcome::Overwritten => {
                    println!("{} Overwriting: {category}/{file}", "+".green())
                }
                CopyOutcome::WouldCopy | CopyOutcome::WouldOverwrite => println!(
                    "DRY-RUN: would copy {} -> {}",
                    source.display(),
                    dest.display()
                ),
                CopyOutcome::UpToDate => {
                    if verbose {
                        println!("{} Already up-to-date: {category}/{file}", "=".dimmed());
                    }
                }
                CopyOutcome::SkippedDiffers => eprintln!(
                    "{} Skipping (exists, differs, no --overwrite): {category}/{file}",
                    "-".yellow()
                ),
            },
            SyncEvent::SourceManifestMissing { path } => {
                eprintln!("{} Source {MANIFEST_FILENAME} not found: {}", "!".red(), path.display())
            }
            SyncEvent::SourceManifestUnreadable { path, error } => eprintln!(
                "{} Failed to read source {}: {error}",
                "!".red(),
                path.display()
            ),
            SyncEvent::InvalidEntry(invalid) => eprintln!(
                "{} Invalid entry for {} in {MANIFEST_FILENAME}: {}",
                "!".red(),
                invalid.category,
                invalid.reason
            ),
            SyncEvent::MissingSource { path, .. } => {
                eprintln!("{} Source model file not found: {}", "!".red(), path.display())
            }
            SyncEvent::ScanFailed { path, error } => {
                eprintln!("{} Cannot scan {}: {error}", "!".red(), path.display())
            }
            SyncEvent::CopyFailed { path, error, .. } => {
                eprintln!("{} Failed to copy {}: {error}", "!".red(), path.display())
            }
        }
    }
}

fn print_manifest(update: &ManifestUpdate, verbose: bool) {
    let change = match update {
        ManifestUpdate::NothingToUpdate => {
            println!("No models were synced.");
            return;
        }
        ManifestUpdate::Failed { path, error } => {
            eprintln!("{} Failed to write {}: {error}", "!".red(), path.display());
            if verbose {
                println!("Skipping cleanup: {MANIFEST_FILENAME} was not updated");
            }
            return;
        }
        ManifestUpdate::WouldWrite(change) | ManifestUpdate::Written(change) => change,
    };

    if let Some(error) = &change.recovered_from {
        eprintln!(
            "{} Failed to read destination {MANIFEST_FILENAME}: {error}, starting fresh",
            "!".red()
        );
    }
    if verbose {
        for (category, entry) in &change.updated {
            println!(
                "{} Updated best model for {category}: {}",
                "*".cyan(),
                entry.model_file
            );
        }
    }
    match update {
        ManifestUpdate::WouldWrite(change) => {
            println!("DRY-RUN: would update {}", change.path.display())
        }
        _ => {
            if verbose {
                println!("{} Wrote {}", "*".cyan(), change.path.display());
            }
        }
    }
}

fn print_cleanup(report: &CleanupReport, config: &SyncConfig, verbose: bool) {
    match report {
        CleanupReport::NoManifest { .. } => {
            if verbose {
                println!("No {MANIFEST_FILENAME} found, skipping cleanup");
            }
        }
        CleanupReport::ManifestUnreadable { error, .. } => eprintln!(
            "{} Failed to read {MANIFEST_FILENAME} for cleanup: {error}",
            "!".red()
        ),
        CleanupReport::Swept(sweep) => print_sweep(sweep, &config.dest_root, config.dry_run, verbose),
    }
}

fn print_sweep(sweep: &CleanupSweep, dest_root: &Path, dry_run: bool, verbose: bool) {
    let rel = |p: &Path| p.strip_prefix(dest_root).unwrap_or(p).display().to_string();

    if verbose {
        println!("Found {} best model(s) to preserve", sweep.protected);
        for path in &sweep.preserved {
            println!("{} Preserving best model: {}", "=".dimmed(), rel(path));
        }
    }
    for path in &sweep.would_delete {
        println!("DRY-RUN: would delete {}", path.display());
    }
    if verbose {
        for path in &sweep.deleted {
            println!("{} Deleting old model: {}", "-".yellow(), rel(path));
        }
    }
    for (path, error) in &sweep.failures {
        eprintln!("{} Cleanup failed at {}: {error}", "!".red(), path.display());
    }

    if !dry_run && !sweep.deleted.is_empty() {
        println!("Deleted {} old model(s)", sweep.deleted.len());
    }
}
