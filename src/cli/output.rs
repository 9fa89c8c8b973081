use colored::*;
use serde::Serialize;

use crate::archiver::{ArchiveReport, MovedItem, RestoreOutcome, RunFailure};
use crate::common::format::{self, format_path, format_size};

/// Print any report as pretty JSON
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing results: {}", e),
    }
}

/// Print an archive report in human-readable format
pub fn print_archive_report(report: &ArchiveReport) {
    println!();
    let title = if report.dry_run {
        "gamearchive Dry Run"
    } else {
        "gamearchive Results"
    };
    println!("{}  {}", "🎮", title.bold());
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  {} → {}",
        format_path(&report.source_folder).cyan(),
        format_path(&report.destination_folder).cyan()
    );
    println!(
        "  Checked {} in {}  •  {} {}",
        format::format_count(report.directories_found),
        format!("{:.1}s", report.duration_secs).cyan(),
        format_size(report.total_bytes()).bold(),
        if report.dry_run { "would move" } else { "moved" }
    );
    println!("{}", "─".repeat(60).dimmed());
    println!();

    if report.relocated.is_empty() {
        println!("  {} Nothing stale to archive.", "✨");
        println!();
        return;
    }

    for item in &report.relocated {
        print_moved_item(item, report.dry_run);
    }
    println!();
}

fn print_moved_item(item: &MovedItem, dry_run: bool) {
    let marker = if dry_run { "→".yellow() } else { "✓".green() };
    let age = item
        .last_modified
        .map(|t| {
            let days = (chrono::Utc::now() - t).num_days().max(0);
            format!("{}d idle", days)
        })
        .unwrap_or_default();

    println!(
        "  {} {:<32} {:>10}  {}",
        marker,
        format::truncate(&item.name, 32),
        format_size(item.size_bytes),
        age.dimmed()
    );
    println!(
        "      {}",
        format!("→ {}", format_path(&item.destination)).dimmed()
    );
}

/// Print an archive run that stopped on an error
pub fn print_run_failure(failure: &RunFailure) {
    if !failure.report.relocated.is_empty() {
        print_archive_report(&failure.report);
    }
    println!(
        "  {} Run stopped: {}",
        "⚠".yellow(),
        failure.error.to_string().dimmed()
    );
    println!("    Remaining directories were skipped and will be retried next run.");
    println!();
}

/// One line per moved directory: name, size in bytes, destination
pub fn print_archive_quiet(report: &ArchiveReport) {
    for item in &report.relocated {
        println!(
            "{}\t{}\t{}",
            item.name,
            item.size_bytes,
            item.destination.display()
        );
    }
}

/// Print the outcome of a restore
pub fn print_restore_outcome(outcome: &RestoreOutcome) {
    println!();
    match outcome {
        RestoreOutcome::Restored(item) => {
            println!(
                "  {} Restored {} ({}, {} files)",
                "✓".green(),
                item.name.bold(),
                format_size(item.size_bytes).bold(),
                item.files_copied.to_string().cyan()
            );
            println!("    {}", format_path(&item.destination).cyan());
        }
        RestoreOutcome::Planned(item) => {
            println!(
                "  {} Would restore {} ({})",
                "ℹ️",
                item.name.bold(),
                format_size(item.size_bytes).bold()
            );
            println!("    {}", format_path(&item.destination).cyan());
        }
        RestoreOutcome::Missing { path } => {
            println!(
                "  {} {} does not exist, nothing to restore",
                "⚠".yellow(),
                format_path(path)
            );
        }
    }
    println!();
}

pub fn print_restore_quiet(outcome: &RestoreOutcome) {
    match outcome {
        RestoreOutcome::Restored(item) | RestoreOutcome::Planned(item) => println!(
            "{}\t{}\t{}",
            item.name,
            item.size_bytes,
            item.destination.display()
        ),
        RestoreOutcome::Missing { .. } => {}
    }
}
