use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use super::fs::DirEntry;
use crate::common::config::Config;

const SECS_PER_DAY: u64 = 86_400;

/// A directory considered for relocation during one run
#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl Candidate {
    /// Build a candidate from a listing entry. Non-directories and entries
    /// without a readable modification time yield `None`.
    pub fn from_entry(entry: &DirEntry) -> Option<Self> {
        if !entry.is_dir() {
            return None;
        }
        Some(Self {
            name: entry.name.clone(),
            path: entry.path.clone(),
            modified: entry.modified?,
        })
    }
}

/// Outcome of evaluating one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Relocate,
    /// Modified at or after the cutoff
    Recent,
    /// Name is on the ignore list
    Ignored,
    /// The configured source folder is gone
    SourceMissing,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Relocate => write!(f, "relocate"),
            Decision::Recent => write!(f, "recently used"),
            Decision::Ignored => write!(f, "ignored"),
            Decision::SourceMissing => write!(f, "source folder missing"),
        }
    }
}

/// `now - days`, or `None` when that predates the clock's epoch
pub fn cutoff(now: SystemTime, days: u32) -> Option<SystemTime> {
    now.checked_sub(Duration::from_secs(u64::from(days) * SECS_PER_DAY))
}

/// Decide what to do with a candidate.
///
/// Pure: `source_exists` is supplied by the caller rather than probed here.
pub fn evaluate(
    candidate: &Candidate,
    config: &Config,
    source_exists: bool,
    now: SystemTime,
) -> Decision {
    if !source_exists {
        return Decision::SourceMissing;
    }
    if config.is_ignored(&candidate.name) {
        return Decision::Ignored;
    }
    match cutoff(now, config.number_of_days) {
        Some(cutoff) if candidate.modified < cutoff => Decision::Relocate,
        _ => Decision::Recent,
    }
}

/// True iff the candidate is strictly older than the cutoff, the source
/// folder exists, and its name is not ignored
pub fn should_relocate(
    candidate: &Candidate,
    config: &Config,
    source_exists: bool,
    now: SystemTime,
) -> bool {
    evaluate(candidate, config, source_exists, now) == Decision::Relocate
}
