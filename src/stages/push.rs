//! Publishing the branch and classifying push failures.

use super::StageContext;
use crate::error::{PublishError, Result};
use crate::git::CommandOutput;
use crate::report::{Stage, StageResult};
use crate::state::RepositoryState;
use regex::Regex;
use std::sync::LazyLock;

/// Credential problems. Checked first: SSH auth failures also print the
/// "could not read from remote repository" network marker.
static AUTH_FAILURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)authentication failed|permission denied|could not read username|invalid username or password|terminal prompts disabled|\b403\b",
    )
    .expect("Invalid auth failure regex")
});

/// The remote refused the update because it has history we lack.
static REJECTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[rejected\]|non-fast-forward|fetch first|updates were rejected")
        .expect("Invalid rejection regex")
});

/// The remote could not be reached at all.
static NETWORK_FAILURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)could not resolve host|unable to access|failed to connect|connection refused|connection timed out|operation timed out|network is unreachable|could not read from remote repository",
    )
    .expect("Invalid network failure regex")
});

/// Printed by git when the remote already has everything.
const UP_TO_DATE_MARKER: &str = "Everything up-to-date";

/// Push the normalized branch and set it as upstream.
pub fn run(ctx: &StageContext<'_>, state: &RepositoryState) -> Result<StageResult> {
    let remote = ctx.config.remote.as_str();
    let branch = ctx.config.branch.as_str();

    let output = ctx.git.output(&["push", "-u", remote, branch])?;

    if !output.success() {
        return Err(classify(&output));
    }

    let url = state.remote_url.as_deref().unwrap_or(remote);
    if output.combined().contains(UP_TO_DATE_MARKER) {
        return Ok(
            StageResult::unchanged(Stage::Push, format!("{} already up to date", url))
                .with_exit_code(output.exit_code),
        );
    }

    Ok(
        StageResult::done(Stage::Push, format!("pushed '{}' to {}", branch, url))
            .with_exit_code(output.exit_code),
    )
}

/// Map a failed push onto its error category.
pub fn classify(output: &CommandOutput) -> PublishError {
    let text = output.combined();
    let exit_code = output.exit_code;
    let diagnostic = output.diagnostic().to_string();

    if AUTH_FAILURE.is_match(&text) {
        PublishError::PushAuth {
            exit_code,
            diagnostic,
        }
    } else if REJECTED.is_match(&text) {
        PublishError::PushRejected {
            exit_code,
            diagnostic,
        }
    } else if NETWORK_FAILURE.is_match(&text) {
        PublishError::PushNetwork {
            exit_code,
            diagnostic,
        }
    } else {
        PublishError::UnclassifiedTool {
            command: "push".to_string(),
            exit_code,
            diagnostic,
        }
    }
}
