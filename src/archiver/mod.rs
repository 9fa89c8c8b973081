pub mod engine;
pub mod fs;
#[cfg(test)]
mod memory;
pub mod policy;
pub mod relocate;
pub mod steam;

pub use engine::{archive_all, restore, ArchiveReport, MovedItem, RestoreOutcome, RunFailure, RunOptions, SkippedItem};
pub use fs::{FileSystem, StdFs};
#[cfg(test)]
pub use memory::MemoryFs;
pub use policy::{should_relocate, Candidate, Decision};
pub use relocate::{relocate, Relocation};
