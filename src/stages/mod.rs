//! The publish pipeline stages.
//!
//! Each stage takes the shared [`StageContext`] plus the explicitly threaded
//! [`RepositoryState`](crate::state::RepositoryState), performs at most a
//! handful of git calls, and returns a [`StageResult`](crate::report::StageResult).
//! A fatal problem is returned as `Err`; soft failures come back as `Ok`
//! results with [`StageOutcome::SoftFailure`](crate::report::StageOutcome).

pub mod branch;
pub mod commit;
pub mod identity;
pub mod preflight;
pub mod push;
pub mod remote;

use crate::config::Config;
use crate::git::Git;
use crate::prompt::Prompter;

/// What every stage needs besides the repository state.
pub struct StageContext<'a> {
    pub git: &'a Git<'a>,
    pub config: &'a Config,
    pub prompter: &'a mut dyn Prompter,
}
