//! Repository state detection.
//!
//! [`RepositoryState`] is a snapshot of what git already knows about the
//! working directory. It is recomputed on every run and threaded through the
//! stages, which use it to turn their actions into no-ops.

use crate::error::Result;
use crate::git::Git;
use serde::Serialize;

/// Marker directory of an initialized repository.
pub const REPOSITORY_MARKER: &str = ".git";

/// Snapshot of the local repository, derived from git.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryState {
    /// The working directory holds its own `.git` marker.
    pub initialized: bool,
    /// `HEAD` resolves to a commit.
    pub has_commits: bool,
    /// Short name of the checked-out branch (unborn branches included).
    /// Empty when uninitialized or on a detached `HEAD`.
    pub active_branch: String,
    /// URL bound to the managed remote name. Never `Some("")`.
    pub remote_url: Option<String>,
    /// `user.name` as git resolves it (any scope).
    pub committer_name: Option<String>,
    /// `user.email` as git resolves it (any scope).
    pub committer_email: Option<String>,
}

impl RepositoryState {
    /// Whether a binding under the managed remote name exists.
    pub fn remote_configured(&self) -> bool {
        self.remote_url.is_some()
    }

    /// Whether both halves of the committer identity are known.
    pub fn identity_configured(&self) -> bool {
        self.committer_name.is_some() && self.committer_email.is_some()
    }

    /// One-line description for progress output.
    pub fn summary(&self, remote: &str) -> String {
        if !self.initialized {
            return "no repository yet; it will be initialized".to_string();
        }

        let mut parts = vec![if self.active_branch.is_empty() {
            "repository on a detached HEAD".to_string()
        } else {
            format!("repository on branch '{}'", self.active_branch)
        }];
        if !self.has_commits {
            parts.push("no commits yet".to_string());
        }
        match &self.remote_url {
            Some(url) => parts.push(format!("'{}' -> {}", remote, url)),
            None => parts.push(format!("no '{}' remote", remote)),
        }
        parts.join(", ")
    }

    /// Set the remote URL, keeping the non-empty invariant.
    pub fn set_remote_url(&mut self, url: Option<&str>) {
        self.remote_url = url.map(str::trim).filter(|u| !u.is_empty()).map(String::from);
    }
}

/// Inspect the working directory and return its repository state.
///
/// "Not initialized" is a valid state: only identity (which may come from
/// global config) is queried in that case. This function has no side effects.
pub fn detect(git: &Git<'_>, remote: &str) -> Result<RepositoryState> {
    let mut state = RepositoryState {
        initialized: git.cwd().join(REPOSITORY_MARKER).exists(),
        committer_name: git.query(&["config", "--get", "user.name"])?,
        committer_email: git.query(&["config", "--get", "user.email"])?,
        ..RepositoryState::default()
    };

    if !state.initialized {
        return Ok(state);
    }

    state.has_commits = git
        .output(&["rev-parse", "--verify", "--quiet", "HEAD"])?
        .success();
    state.active_branch = git
        .query(&["symbolic-ref", "--short", "HEAD"])?
        .unwrap_or_default();
    let url = git.query(&["remote", "get-url", remote])?;
    state.set_remote_url(url.as_deref());

    Ok(state)
}
