//! Branch normalization to the hosting platform's default branch name.

use super::StageContext;
use crate::error::Result;
use crate::report::{Stage, StageResult};
use crate::state::RepositoryState;

/// Force-rename the active branch to the configured target branch.
///
/// A branch that already has the target name is left alone. An unborn
/// branch (no commits yet) has no ref to move, so `HEAD` is pointed at the
/// target name instead.
pub fn run(ctx: &StageContext<'_>, state: &mut RepositoryState) -> Result<StageResult> {
    let target = ctx.config.branch.as_str();

    if state.active_branch == target {
        return Ok(StageResult::unchanged(
            Stage::Rename,
            format!("already on '{}'", target),
        ));
    }

    let output = if state.has_commits {
        ctx.git.run(&["branch", "-M", target])?
    } else {
        let head_ref = format!("refs/heads/{}", target);
        ctx.git.run(&["symbolic-ref", "HEAD", &head_ref])?
    };

    let previous = std::mem::replace(&mut state.active_branch, target.to_string());
    let diagnostic = if previous.is_empty() {
        format!("checked out '{}'", target)
    } else {
        format!("renamed '{}' to '{}'", previous, target)
    };

    Ok(StageResult::done(Stage::Rename, diagnostic).with_exit_code(output.exit_code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::ErrorKind;
    use crate::git::{CommandOutput, Git, GitCommand, SystemRunner};
    use crate::report::StageOutcome;
    use crate::state;
    use crate::test_support::{ScriptedPrompter, ScriptedRunner, create_test_repo, git};
    use tempfile::TempDir;

    fn state_on(branch: &str, has_commits: bool) -> RepositoryState {
        RepositoryState {
            initialized: true,
            has_commits,
            active_branch: branch.to_string(),
            ..RepositoryState::default()
        }
    }

    #[test]
    fn test_same_name_is_noop() {
        let runner = ScriptedRunner::new();
        let g = Git::new(&runner, GitCommand::default(), "/work");
        let config = Config::default();
        let mut prompter = ScriptedPrompter::new(&[]);
        let ctx = StageContext {
            git: &g,
            config: &config,
            prompter: &mut prompter,
        };
        let mut state = state_on("main", true);

        let result = run(&ctx, &mut state).unwrap();

        assert_eq!(result.outcome, StageOutcome::Unchanged);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_rename_uses_force_move() {
        let runner = ScriptedRunner::new();
        let g = Git::new(&runner, GitCommand::default(), "/work");
        let config = Config::default();
        let mut prompter = ScriptedPrompter::new(&[]);
        let ctx = StageContext {
            git: &g,
            config: &config,
            prompter: &mut prompter,
        };
        let mut state = state_on("master", true);

        let result = run(&ctx, &mut state).unwrap();

        assert_eq!(result.outcome, StageOutcome::Done);
        assert_eq!(result.diagnostic, "renamed 'master' to 'main'");
        assert_eq!(runner.calls(), vec![vec!["branch", "-M", "main"]]);
        assert_eq!(state.active_branch, "main");
    }

    #[test]
    fn test_unborn_branch_moves_head() {
        let runner = ScriptedRunner::new();
        let g = Git::new(&runner, GitCommand::default(), "/work");
        let config = Config {
            branch: "trunk".to_string(),
            ..Config::default()
        };
        let mut prompter = ScriptedPrompter::new(&[]);
        let ctx = StageContext {
            git: &g,
            config: &config,
            prompter: &mut prompter,
        };
        let mut state = state_on("master", false);

        run(&ctx, &mut state).unwrap();

        assert_eq!(
            runner.calls(),
            vec![vec!["symbolic-ref", "HEAD", "refs/heads/trunk"]]
        );
    }

    #[test]
    fn test_rename_failure_is_generic_tool_error() {
        let runner = ScriptedRunner::new().on(
            &["branch"],
            CommandOutput::new(128, "", "fatal: cannot rename the current branch while not on any"),
        );
        let g = Git::new(&runner, GitCommand::default(), "/work");
        let config = Config::default();
        let mut prompter = ScriptedPrompter::new(&[]);
        let ctx = StageContext {
            git: &g,
            config: &config,
            prompter: &mut prompter,
        };
        let mut state = state_on("", true);

        let err = run(&ctx, &mut state).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnclassifiedToolError);
    }

    #[test]
    fn test_real_rename_is_idempotent() {
        let temp_dir = create_test_repo();
        git(temp_dir.path(), &["branch", "-M", "master"]);
        let g = Git::new(&SystemRunner, GitCommand::default(), temp_dir.path());
        let config = Config::default();
        let mut prompter = ScriptedPrompter::new(&[]);
        let ctx = StageContext {
            git: &g,
            config: &config,
            prompter: &mut prompter,
        };

        let mut state = state::detect(&g, "origin").unwrap();
        assert_eq!(run(&ctx, &mut state).unwrap().outcome, StageOutcome::Done);

        let mut state = state::detect(&g, "origin").unwrap();
        assert_eq!(state.active_branch, "main");
        assert_eq!(run(&ctx, &mut state).unwrap().outcome, StageOutcome::Unchanged);

        let branches = git(temp_dir.path(), &["branch", "--format=%(refname:short)"]);
        assert_eq!(branches, "main");
    }

    #[test]
    fn test_real_unborn_branch_rename() {
        let temp_dir = TempDir::new().unwrap();
        git(temp_dir.path(), &["init"]);
        git(temp_dir.path(), &["symbolic-ref", "HEAD", "refs/heads/master"]);
        let g = Git::new(&SystemRunner, GitCommand::default(), temp_dir.path());
        let config = Config::default();
        let mut prompter = ScriptedPrompter::new(&[]);
        let ctx = StageContext {
            git: &g,
            config: &config,
            prompter: &mut prompter,
        };

        let mut state = state::detect(&g, "origin").unwrap();
        run(&ctx, &mut state).unwrap();

        assert_eq!(git(temp_dir.path(), &["symbolic-ref", "--short", "HEAD"]), "main");
    }
}
