//! Environment preflight: the working directory and the git executable.

use crate::error::{PublishError, Result};
use crate::git::Git;
use crate::report::{Stage, StageResult};
use std::fs;
use std::io;
use std::path::Path;

/// Verify the working directory is usable and git can be invoked.
///
/// The directory is checked first: git runs inside it, so a missing
/// directory would otherwise look like a missing executable.
pub fn run(git: &Git<'_>) -> Result<StageResult> {
    check_directory(git.cwd())?;

    let version = git.output(&["--version"])?;
    if !version.success() {
        return Err(PublishError::ToolNotFound(format!(
            "'{} --version' exited with code {}: {}",
            git.program(),
            version.exit_code,
            version.diagnostic()
        )));
    }

    Ok(StageResult::done(
        Stage::Preflight,
        format!("{} in {}", version.stdout, git.cwd().display()),
    )
    .with_exit_code(version.exit_code))
}

fn check_directory(dir: &Path) -> Result<()> {
    let metadata = fs::metadata(dir).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PublishError::Environment(format!("directory '{}' does not exist", dir.display()))
        } else {
            PublishError::Environment(format!("cannot access '{}': {}", dir.display(), e))
        }
    })?;

    if !metadata.is_dir() {
        return Err(PublishError::Environment(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }

    fs::read_dir(dir).map_err(|e| {
        PublishError::Environment(format!("cannot read '{}': {}", dir.display(), e))
    })?;

    Ok(())
}
