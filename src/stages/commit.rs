//! Repository initialization, staging and commit creation.

use super::StageContext;
use super::identity::{self, Identity};
use crate::error::{PublishError, Result};
use crate::prompt::{Field, resolve};
use crate::report::{Stage, StageResult};
use crate::state::RepositoryState;
use crate::workflow::PublishRequest;
use tracing::{info, warn};

/// Markers git prints when a commit would be empty.
const NOTHING_TO_COMMIT_MARKERS: &[&str] = &["nothing to commit", "nothing added to commit"];

/// Initialize if needed, stage everything, and commit.
///
/// `git init` is idempotent, but it only runs when the repository marker is
/// missing. A repository without commits always gets one, empty if there is
/// nothing to stage. Otherwise an empty commit is a soft failure: the result
/// comes back as `Ok` with a `NothingToCommitError` recorded on it.
pub fn run(
    ctx: &mut StageContext<'_>,
    state: &mut RepositoryState,
    request: &PublishRequest,
    pending_identity: Option<&Identity>,
) -> Result<StageResult> {
    let git = ctx.git;

    if !state.initialized {
        git.run(&["init"])?;
        state.initialized = true;
        state.active_branch = git
            .query(&["symbolic-ref", "--short", "HEAD"])?
            .unwrap_or_default();
        info!(dir = %git.cwd().display(), "initialized repository");
        eprintln!("    Initialized empty git repository");
    }

    if let Some(identity) = pending_identity {
        identity::apply(git, identity, state)?;
        eprintln!("    Configured committer {}", identity);
    }

    let status = git.run(&["status", "--porcelain"])?;
    let changed = status.stdout.lines().filter(|l| !l.is_empty()).count();
    eprintln!("    {} changed path(s) to stage", changed);

    git.run(&["add", "-A"])?;

    let default_message = ctx.config.default_commit_message.as_str();
    // An explicit blank message means "use the default", not "ask".
    let explicit = request
        .commit_message
        .as_deref()
        .map(|m| if m.trim().is_empty() { default_message } else { m });
    let message = resolve(
        Field {
            question: "Commit message",
            explicit,
            detected: None,
            default: Some(default_message),
        },
        ctx.prompter,
    )?
    .value
    .unwrap_or_else(|| default_message.to_string());

    // The first commit may be empty; a branch needs a commit before it can be pushed.
    let mut args = vec!["commit", "-m", message.as_str()];
    if !state.has_commits && changed == 0 {
        args.push("--allow-empty");
    }
    let output = git.output(&args)?;

    if output.success() {
        state.has_commits = true;
        let summary = output.stdout.lines().next().unwrap_or_default().to_string();
        return Ok(StageResult::done(Stage::Commit, summary).with_exit_code(output.exit_code));
    }

    let combined = output.combined();
    let marker_line = combined.lines().find(|line| {
        let line = line.to_lowercase();
        NOTHING_TO_COMMIT_MARKERS.iter().any(|m| line.contains(m))
    });
    if let Some(line) = marker_line {
        let err = PublishError::NothingToCommit(line.trim().to_string());
        warn!(error = %err, "continuing without a new commit");
        return Ok(StageResult::failed(Stage::Commit, &err).with_exit_code(output.exit_code));
    }

    Err(PublishError::UnclassifiedTool {
        command: "commit".to_string(),
        exit_code: output.exit_code,
        diagnostic: output.diagnostic().to_string(),
    })
}
