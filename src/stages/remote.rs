//! Remote binding configuration.

use super::StageContext;
use crate::error::{PublishError, Result};
use crate::prompt::{Field, resolve};
use crate::report::{Stage, StageResult};
use crate::state::RepositoryState;
use crate::workflow::PublishRequest;

/// Bind the managed remote name to the resolved URL.
///
/// The URL resolves from the explicit request, then a prompt offering the
/// currently bound URL as its default. With nothing bound and nothing
/// entered the run aborts with `MissingRemoteError`. An existing binding
/// with a different URL is removed before the new one is added, so exactly
/// one binding remains.
pub fn run(
    ctx: &mut StageContext<'_>,
    state: &mut RepositoryState,
    request: &PublishRequest,
) -> Result<StageResult> {
    let remote = ctx.config.remote.as_str();

    let resolved = resolve(
        Field {
            question: "Remote repository URL",
            explicit: request.remote_url.as_deref(),
            detected: None,
            default: state.remote_url.as_deref(),
        },
        ctx.prompter,
    )?;

    let Some(url) = resolved.value else {
        return Err(PublishError::MissingRemote {
            new_repo_url: ctx.config.new_repo_url.clone(),
        });
    };

    if state.remote_url.as_deref() == Some(url.as_str()) {
        return Ok(StageResult::unchanged(
            Stage::Remote,
            format!("'{}' already points to {}", remote, url),
        ));
    }

    let replaced = state.remote_configured();
    if replaced {
        ctx.git.run(&["remote", "remove", remote])?;
        state.set_remote_url(None);
    }

    let output = ctx.git.run(&["remote", "add", remote, &url])?;
    state.set_remote_url(Some(&url));

    let diagnostic = if replaced {
        format!("replaced '{}' with {}", remote, url)
    } else {
        format!("added '{}' -> {}", remote, url)
    };
    Ok(StageResult::done(Stage::Remote, diagnostic).with_exit_code(output.exit_code))
}
