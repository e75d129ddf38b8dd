//! Committer identity configuration.
//!
//! Identity is written to the repository's local config only, never to the
//! user's global config.

use super::StageContext;
use crate::error::Result;
use crate::git::Git;
use crate::prompt::{Field, resolve};
use crate::report::{Stage, StageResult};
use crate::state::RepositoryState;
use crate::workflow::PublishRequest;

/// A committer name and email pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Result of the identity stage.
#[derive(Debug)]
pub struct IdentityOutcome {
    pub result: StageResult,
    /// Identity still to be written once `git init` has run.
    pub pending: Option<Identity>,
}

/// Resolve and apply the committer identity.
///
/// - Already configured and nothing explicit supplied: unchanged, no prompt.
/// - Name or email left empty: skipped; the commit stage surfaces any failure.
/// - Repository not initialized yet: the identity is returned as pending.
pub fn run(
    ctx: &mut StageContext<'_>,
    state: &mut RepositoryState,
    request: &PublishRequest,
) -> Result<IdentityOutcome> {
    let name = resolve(
        Field {
            question: "Your name (for git commits)",
            explicit: request.committer_name.as_deref(),
            detected: state.committer_name.as_deref(),
            default: None,
        },
        ctx.prompter,
    )?;
    let email = resolve(
        Field {
            question: "Your email (for git commits)",
            explicit: request.committer_email.as_deref(),
            detected: state.committer_email.as_deref(),
            default: None,
        },
        ctx.prompter,
    )?;

    let (Some(name), Some(email)) = (name.value, email.value) else {
        return Ok(IdentityOutcome {
            result: StageResult::skipped(
                Stage::Identity,
                "no name/email entered; git's default identity applies",
            ),
            pending: None,
        });
    };

    let identity = Identity { name, email };

    if state.identity_configured()
        && state.committer_name.as_deref() == Some(identity.name.as_str())
        && state.committer_email.as_deref() == Some(identity.email.as_str())
    {
        return Ok(IdentityOutcome {
            result: StageResult::unchanged(
                Stage::Identity,
                format!("already configured as {}", identity),
            ),
            pending: None,
        });
    }

    if !state.initialized {
        return Ok(IdentityOutcome {
            result: StageResult::done(
                Stage::Identity,
                format!("{} will be written to local config after git init", identity),
            ),
            pending: Some(identity),
        });
    }

    apply(ctx.git, &identity, state)?;
    Ok(IdentityOutcome {
        result: StageResult::done(
            Stage::Identity,
            format!("configured {} in local config", identity),
        ),
        pending: None,
    })
}

/// Write `identity` to the repository's local config and record it in `state`.
pub fn apply(git: &Git<'_>, identity: &Identity, state: &mut RepositoryState) -> Result<()> {
    git.run(&["config", "--local", "user.name", &identity.name])?;
    git.run(&["config", "--local", "user.email", &identity.email])?;

    state.committer_name = Some(identity.name.clone());
    state.committer_email = Some(identity.email.clone());
    Ok(())
}
