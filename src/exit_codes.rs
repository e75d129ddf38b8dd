//! Exit code constants for the repoship CLI.
//!
//! - 0: Success (including runs that only hit soft failures)
//! - 1: Any fatal stage failure
//! - 2: Command-line usage error (reported by clap before the workflow starts)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// A fatal stage failure: missing directory or tool, missing remote, push failure.
pub const FAILURE: i32 = 1;

/// Invalid command-line usage. clap exits with this code on its own.
#[allow(dead_code)]
pub const USAGE: i32 = 2;
