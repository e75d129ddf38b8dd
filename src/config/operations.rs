//! Config validation and derived values.

use super::model::Config;
use crate::error::{PublishError, Result};
use crate::git::GitCommand;
use regex::Regex;
use std::sync::LazyLock;

/// Branch names git accepts for a simple, single-level or slash-separated ref.
static BRANCH_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9._-]*(/[A-Za-z0-9_][A-Za-z0-9._-]*)*$")
        .expect("branch name pattern is valid")
});

/// Remote names: no slashes, no leading dash.
static REMOTE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9._-]*$").expect("remote name pattern is valid")
});

impl Config {
    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `remote` must be a plain remote name
    /// - `branch` must be a valid branch name (no `..`, no `.lock` suffix)
    /// - `default_commit_message` must not be blank
    /// - `git` must split into at least a program name
    pub fn validate(&self) -> Result<()> {
        if !REMOTE_NAME.is_match(&self.remote) {
            return Err(PublishError::Config(format!(
                "'{}' is not a valid remote name",
                self.remote
            )));
        }

        if !BRANCH_NAME.is_match(&self.branch)
            || self.branch.contains("..")
            || self.branch.ends_with(".lock")
        {
            return Err(PublishError::Config(format!(
                "'{}' is not a valid branch name",
                self.branch
            )));
        }

        if self.default_commit_message.trim().is_empty() {
            return Err(PublishError::Config(
                "default commit message must not be empty".to_string(),
            ));
        }

        self.git_command()?;
        Ok(())
    }

    /// Split the configured git command line into program and leading arguments.
    pub fn git_command(&self) -> Result<GitCommand> {
        let mut words = shell_words::split(&self.git).map_err(|e| {
            PublishError::Config(format!("failed to parse git command '{}': {}", self.git, e))
        })?;

        if words.is_empty() {
            return Err(PublishError::Config(
                "git command must not be empty".to_string(),
            ));
        }

        let program = words.remove(0);
        Ok(GitCommand {
            program,
            args: words,
        })
    }
}
