use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use thiserror::Error;

use super::fs::FileSystem;
use super::policy::{self, Candidate, Decision};
use super::relocate;
use super::steam;
use crate::common::config::Config;
use crate::common::errors::{ArchiveError, ArchiveResult};
use crate::common::format;

/// Knobs shared by archive and restore runs
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Evaluate and report, but leave the filesystem untouched
    pub dry_run: bool,
    /// Show a spinner while copying
    pub show_progress: bool,
}

/// A directory that was (or, in a dry run, would be) relocated
#[derive(Debug, Clone, Serialize)]
pub struct MovedItem {
    pub name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub size_bytes: u64,
    pub files_copied: usize,
    pub last_modified: Option<DateTime<Utc>>,
    /// Came from a Steam library rather than the source folder itself
    pub steam: bool,
}

/// A directory that was looked at and left alone
#[derive(Debug, Clone, Serialize)]
pub struct SkippedItem {
    pub name: String,
    pub path: PathBuf,
    pub reason: Decision,
    pub steam: bool,
}

/// Everything an archive run did, in processing order
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveReport {
    pub started_at: DateTime<Utc>,
    pub source_folder: PathBuf,
    pub destination_folder: PathBuf,
    pub dry_run: bool,
    pub directories_found: usize,
    pub relocated: Vec<MovedItem>,
    pub skipped: Vec<SkippedItem>,
    pub duration_secs: f64,
}

impl ArchiveReport {
    fn new(config: &Config, dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            source_folder: config.source_folder.clone(),
            destination_folder: config.destination_folder.clone(),
            dry_run,
            directories_found: 0,
            relocated: Vec::new(),
            skipped: Vec::new(),
            duration_secs: 0.0,
        }
    }

    pub fn total_bytes(&self) -> u64 {
        self.relocated.iter().map(|i| i.size_bytes).sum()
    }
}

/// An archive run that stopped at its first error.
///
/// `report` holds the directories handled before the failure; the rest
/// of the listing was skipped for this run.
#[derive(Debug, Error)]
#[error("archive run stopped early")]
pub struct RunFailure {
    #[source]
    pub error: ArchiveError,
    pub report: ArchiveReport,
}

/// Archive every stale directory under the source folder.
///
/// Processes the source folder's immediate subdirectories in listing order.
/// A `Steam` directory has its installed games evaluated individually first;
/// then each directory itself is evaluated. The first error ends the run.
pub fn archive_all<F: FileSystem + ?Sized>(
    fs: &F,
    config: &Config,
    options: &RunOptions,
) -> Result<ArchiveReport, RunFailure> {
    let start = Instant::now();
    let mut report = ArchiveReport::new(config, options.dry_run);

    let result = run_archive(fs, config, options, SystemTime::now(), &mut report);
    report.duration_secs = start.elapsed().as_secs_f64();

    match result {
        Ok(()) => {
            tracing::info!(
                relocated = report.relocated.len(),
                skipped = report.skipped.len(),
                dry_run = options.dry_run,
                "Finished moving game files"
            );
            Ok(report)
        }
        Err(error) => {
            tracing::error!(error = %error, "Error while moving game files");
            Err(RunFailure { error, report })
        }
    }
}

fn run_archive<F: FileSystem + ?Sized>(
    fs: &F,
    config: &Config,
    options: &RunOptions,
    now: SystemTime,
    report: &mut ArchiveReport,
) -> ArchiveResult<()> {
    let source = &config.source_folder;

    tracing::info!(path = %source.display(), "Getting directory list...");
    let entries = fs.list_entries(source)?;
    let directories: Vec<_> = entries.iter().filter(|e| e.is_dir()).collect();
    tracing::info!(count = directories.len(), "Found directories");
    report.directories_found = directories.len();

    for entry in directories {
        if steam::is_steam_container(&entry.name) {
            archive_steam_library(fs, config, options, &entry.path, now, report)?;
        }

        let Some(candidate) = Candidate::from_entry(entry) else {
            tracing::warn!(path = %entry.path.display(), "No modification time, skipping");
            continue;
        };
        consider(
            fs,
            config,
            options,
            &candidate,
            &config.destination_folder,
            false,
            now,
            report,
        )?;
    }

    Ok(())
}

fn archive_steam_library<F: FileSystem + ?Sized>(
    fs: &F,
    config: &Config,
    options: &RunOptions,
    steam_root: &Path,
    now: SystemTime,
    report: &mut ArchiveReport,
) -> ArchiveResult<()> {
    let library = steam::library_dir(steam_root);
    if !fs.is_dir(&library) {
        tracing::debug!(path = %library.display(), "No Steam library found");
        return Ok(());
    }

    let archive_parent = steam::archive_dir(&config.destination_folder);
    tracing::info!(path = %library.display(), "Checking Steam library");

    for entry in fs.list_entries(&library)?.iter().filter(|e| e.is_dir()) {
        let Some(candidate) = Candidate::from_entry(entry) else {
            tracing::warn!(path = %entry.path.display(), "No modification time, skipping");
            continue;
        };
        consider(fs, config, options, &candidate, &archive_parent, true, now, report)?;
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn consider<F: FileSystem + ?Sized>(
    fs: &F,
    config: &Config,
    options: &RunOptions,
    candidate: &Candidate,
    destination_parent: &Path,
    steam: bool,
    now: SystemTime,
    report: &mut ArchiveReport,
) -> ArchiveResult<()> {
    let decision = policy::evaluate(candidate, config, fs.exists(&config.source_folder), now);

    if decision != Decision::Relocate {
        tracing::debug!(
            name = %candidate.name,
            reason = %decision,
            idle_days = format::age_in_days(candidate.modified, now),
            "Leaving directory in place"
        );
        report.skipped.push(SkippedItem {
            name: candidate.name.clone(),
            path: candidate.path.clone(),
            reason: decision,
            steam,
        });
        return Ok(());
    }

    tracing::info!(
        name = %candidate.name,
        idle_days = format::age_in_days(candidate.modified, now),
        "Directory is stale"
    );
    let size_bytes = fs.tree_size(&candidate.path);
    let (destination, files_copied) = if options.dry_run {
        let destination = relocate::validate(fs, &candidate.path, destination_parent)?;
        tracing::info!(
            name = %candidate.name,
            destination = %destination.display(),
            "Would move directory"
        );
        (destination, 0)
    } else {
        let pb = options.show_progress.then(|| spinner(&candidate.name));
        let moved = relocate::relocate_with_progress(
            fs,
            &candidate.path,
            destination_parent,
            pb.as_ref(),
        );
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        let moved = moved?;
        (moved.destination, moved.files_copied)
    };

    report.relocated.push(MovedItem {
        name: candidate.name.clone(),
        source: candidate.path.clone(),
        destination,
        size_bytes,
        files_copied,
        last_modified: Some(DateTime::<Utc>::from(candidate.modified)),
        steam,
    });

    Ok(())
}

/// What `restore` did
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RestoreOutcome {
    Restored(MovedItem),
    /// Dry run: what would have moved
    Planned(MovedItem),
    /// The path was not there; nothing was touched
    Missing { path: PathBuf },
}

/// Move a previously archived directory back into the source folder.
///
/// A blank `path` is rejected before anything is touched. A path that does
/// not exist is logged as a warning and treated as a no-op.
pub fn restore<F: FileSystem + ?Sized>(
    fs: &F,
    path: &str,
    config: &Config,
    options: &RunOptions,
) -> ArchiveResult<RestoreOutcome> {
    if path.trim().is_empty() {
        return Err(ArchiveError::InvalidArgument {
            name: "path",
            message: "cannot be empty or whitespace".to_string(),
        });
    }

    let source = Path::new(path);
    if !fs.exists(source) {
        tracing::warn!(path = %source.display(), "Directory does not exist and will not continue");
        return Ok(RestoreOutcome::Missing {
            path: source.to_path_buf(),
        });
    }

    tracing::info!(
        path = %source.display(),
        destination = %config.source_folder.display(),
        "Moving directory"
    );

    match restore_existing(fs, source, config, options) {
        Ok(outcome) => {
            tracing::info!("Finished moving directories");
            Ok(outcome)
        }
        Err(error) => {
            tracing::error!(error = %error, "Error while moving game files");
            Err(error)
        }
    }
}

fn restore_existing<F: FileSystem + ?Sized>(
    fs: &F,
    source: &Path,
    config: &Config,
    options: &RunOptions,
) -> ArchiveResult<RestoreOutcome> {
    let destination = relocate::validate(fs, source, &config.source_folder)?;
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let size_bytes = fs.tree_size(source);

    if options.dry_run {
        return Ok(RestoreOutcome::Planned(MovedItem {
            name,
            source: source.to_path_buf(),
            destination,
            size_bytes,
            files_copied: 0,
            last_modified: None,
            steam: false,
        }));
    }

    let pb = options.show_progress.then(|| spinner(&name));
    let moved = relocate::relocate_with_progress(fs, source, &config.source_folder, pb.as_ref());
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let moved = moved?;

    Ok(RestoreOutcome::Restored(MovedItem {
        name,
        source: moved.source,
        destination: moved.destination,
        size_bytes,
        files_copied: moved.files_copied,
        last_modified: None,
        steam: false,
    }))
}

fn spinner(name: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} Moving {prefix:.bold} ({pos} files) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_prefix(name.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
