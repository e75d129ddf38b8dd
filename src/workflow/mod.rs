//! The publish workflow.
//!
//! Runs the stages strictly in order:
//!
//! `Preflight → Detect → Identity → Stage&Commit → Rename → Remote → Push`
//!
//! Each stage either passes control to the next or aborts the run. The
//! repository state detected up front is threaded through every stage so
//! already-satisfied steps become no-ops. The returned [`RunReport`] is
//! handed to the outcome reporter; this module never prints the summary.


use crate::config::Config;
use crate::error::{PublishError, Result};
use crate::git::{CommandRunner, Git};
use crate::prompt::{Field, Prompter, resolve};
use crate::report::{RunReport, Stage, StageOutcome, StageResult};
use crate::stages::{self, StageContext};
use crate::state;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Inputs for one publish run. Optional fields fall back to detected state,
/// prompts, or defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishRequest {
    pub working_directory: PathBuf,
    pub committer_name: Option<String>,
    pub committer_email: Option<String>,
    pub commit_message: Option<String>,
    pub remote_url: Option<String>,
}

impl PublishRequest {
    pub fn new(working_directory: PathBuf) -> Self {
        Self {
            working_directory,
            ..Self::default()
        }
    }
}

/// Resolve the project directory: explicit argument, else a prompt
/// defaulting to `current_dir`.
pub fn resolve_working_directory(
    explicit: Option<&Path>,
    current_dir: &Path,
    prompter: &mut dyn Prompter,
) -> Result<PathBuf> {
    let explicit = explicit.map(|p| p.to_string_lossy().into_owned());
    let current = current_dir.to_string_lossy().into_owned();

    let resolved = resolve(
        Field {
            question: "Project directory",
            explicit: explicit.as_deref(),
            detected: None,
            default: Some(current.as_str()),
        },
        prompter,
    )?;

    Ok(resolved
        .value
        .map(PathBuf::from)
        .unwrap_or_else(|| current_dir.to_path_buf()))
}

/// A fatal error tagged with the stage it ended.
struct StageFailure {
    stage: Stage,
    error: PublishError,
}

trait AtStage<T> {
    fn at(self, stage: Stage) -> std::result::Result<T, StageFailure>;
}

impl<T> AtStage<T> for Result<T> {
    fn at(self, stage: Stage) -> std::result::Result<T, StageFailure> {
        self.map_err(|error| StageFailure { stage, error })
    }
}

/// Run the whole publish workflow and return what happened.
///
/// Never fails: every fatal error is recorded on the report, whose
/// `exit_code` is then non-zero.
pub fn publish(
    runner: &dyn CommandRunner,
    config: &Config,
    request: &PublishRequest,
    prompter: &mut dyn Prompter,
) -> RunReport {
    let mut report = RunReport::new(&request.working_directory, config);

    if let Err(failure) = run_stages(runner, config, request, prompter, &mut report) {
        warn!(stage = %failure.stage, error = %failure.error, "publish aborted");
        eprintln!("    FAILED: {}", failure.error);
        report.record(StageResult::failed(failure.stage, &failure.error));
    }

    report.finish();
    report
}

fn run_stages(
    runner: &dyn CommandRunner,
    config: &Config,
    request: &PublishRequest,
    prompter: &mut dyn Prompter,
    report: &mut RunReport,
) -> std::result::Result<(), StageFailure> {
    let git_command = config.git_command().at(Stage::Preflight)?;
    let git = Git::new(runner, git_command, &request.working_directory);
    let mut ctx = StageContext {
        git: &git,
        config,
        prompter,
    };

    announce(Stage::Preflight);
    let result = stages::preflight::run(&git).at(Stage::Preflight)?;
    finish(report, result);

    announce(Stage::Detect);
    let mut state = state::detect(&git, &config.remote).at(Stage::Detect)?;
    report.remote_url = state.remote_url.clone();
    report.detected = Some(state.clone());
    finish(
        report,
        StageResult::done(Stage::Detect, state.summary(&config.remote)),
    );

    announce(Stage::Identity);
    let identity = stages::identity::run(&mut ctx, &mut state, request).at(Stage::Identity)?;
    finish(report, identity.result);

    announce(Stage::Commit);
    let result = stages::commit::run(&mut ctx, &mut state, request, identity.pending.as_ref())
        .at(Stage::Commit)?;
    finish(report, result);

    announce(Stage::Rename);
    let result = stages::branch::run(&ctx, &mut state).at(Stage::Rename)?;
    finish(report, result);

    announce(Stage::Remote);
    let result = stages::remote::run(&mut ctx, &mut state, request).at(Stage::Remote)?;
    report.remote_url = state.remote_url.clone();
    finish(report, result);

    announce(Stage::Push);
    let result = stages::push::run(&ctx, &state).at(Stage::Push)?;
    finish(report, result);

    Ok(())
}

fn announce(stage: Stage) {
    eprintln!("==> {}", stage.title());
}

fn finish(report: &mut RunReport, result: StageResult) {
    match result.outcome {
        StageOutcome::SoftFailure => {
            warn!(stage = %result.stage, diagnostic = %result.diagnostic, "soft failure");
            eprintln!("    WARNING: {}", result.diagnostic);
        }
        outcome => {
            info!(stage = %result.stage, ?outcome, "stage finished");
            eprintln!("    {}", result.diagnostic);
        }
    }
    report.record(result);
}
