//! Git CLI wrappers for autopatch.

pub mod client;
pub mod runner;

pub use client::{CommitOutcome, GitClient};
pub use runner::{CmdOutput, CommandRunner, SystemRunner};
