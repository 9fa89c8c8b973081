//! # gamearchive
//!
//! Moves game installs that have not been touched for a while from a
//! games folder onto an archive drive, and brings them back on request.
//!
//! - **Age policy**: a directory is archived once its last write is older
//!   than the configured number of days, unless its name is ignored
//! - **Steam aware**: games inside `Steam/steamapps/common` are archived
//!   individually into `<archive>/steamapps`
//! - **Copy, then delete**: the original tree is removed only after the
//!   whole copy succeeded, so a failed run never loses data
//! - **Dry run**: preview exactly what a run would move

pub mod archiver;
pub mod cli;
pub mod common;
