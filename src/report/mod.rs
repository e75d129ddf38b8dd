//! Run records and the outcome reporter.
//!
//! Each stage of a publish run produces one [`StageResult`]. The results are
//! collected, in execution order, into a [`RunReport`], which is the only
//! input the reporter renders. A report can be shown as text or serialized
//! to a single JSON document.
//!
//! # JSON format
//!
//! - `actor`: `user@HOST` running the publish
//! - `started_at` / `finished_at`: RFC3339 timestamps
//! - `detected`: repository state found before any change was made
//! - `stages`: one object per stage with `ts`, `stage`, `outcome`,
//!   `succeeded`, `exit_code`, `diagnostic`, and on failure `error` and
//!   `remediation`
//! - `exit_code`: the process exit status

mod display;


pub use display::{print_report, render_text};

use crate::config::Config;
use crate::error::{ErrorKind, PublishError, Result};
use crate::exit_codes;
use crate::state::RepositoryState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Preflight,
    Detect,
    Identity,
    Commit,
    Rename,
    Remote,
    Push,
}

impl Stage {
    /// Human-readable stage title for progress output.
    pub fn title(&self) -> &'static str {
        match self {
            Stage::Preflight => "Environment preflight",
            Stage::Detect => "Repository state",
            Stage::Identity => "Committer identity",
            Stage::Commit => "Stage and commit changes",
            Stage::Rename => "Branch rename",
            Stage::Remote => "Remote configuration",
            Stage::Push => "Push",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Preflight => write!(f, "preflight"),
            Stage::Detect => write!(f, "detect"),
            Stage::Identity => write!(f, "identity"),
            Stage::Commit => write!(f, "commit"),
            Stage::Rename => write!(f, "rename"),
            Stage::Remote => write!(f, "remote"),
            Stage::Push => write!(f, "push"),
        }
    }
}

/// How a stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageOutcome {
    /// The stage changed something.
    Done,
    /// The desired state already held.
    Unchanged,
    /// The stage chose not to act (e.g. blank identity input).
    Skipped,
    /// The stage failed but the run continues.
    SoftFailure,
    /// The stage failed and the run stopped.
    Failed,
}

/// Record of one executed stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageResult {
    pub ts: DateTime<Utc>,
    pub stage: Stage,
    pub outcome: StageOutcome,
    pub succeeded: bool,
    /// Exit status of the git process that decided the outcome, if any.
    pub exit_code: Option<i32>,
    pub diagnostic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remediation: Vec<String>,
}

impl StageResult {
    fn new(stage: Stage, outcome: StageOutcome, diagnostic: impl Into<String>) -> Self {
        Self {
            ts: Utc::now(),
            stage,
            outcome,
            succeeded: outcome != StageOutcome::Failed,
            exit_code: None,
            diagnostic: diagnostic.into(),
            error: None,
            remediation: Vec::new(),
        }
    }

    pub fn done(stage: Stage, diagnostic: impl Into<String>) -> Self {
        Self::new(stage, StageOutcome::Done, diagnostic)
    }

    pub fn unchanged(stage: Stage, diagnostic: impl Into<String>) -> Self {
        Self::new(stage, StageOutcome::Unchanged, diagnostic)
    }

    pub fn skipped(stage: Stage, diagnostic: impl Into<String>) -> Self {
        Self::new(stage, StageOutcome::Skipped, diagnostic)
    }

    /// A failure from `error`; soft errors become [`StageOutcome::SoftFailure`].
    pub fn failed(stage: Stage, error: &PublishError) -> Self {
        let outcome = if error.is_soft() {
            StageOutcome::SoftFailure
        } else {
            StageOutcome::Failed
        };
        let mut result = Self::new(stage, outcome, error.to_string());
        result.exit_code = error.tool_exit_code();
        result.error = Some(error.kind());
        result.remediation = error.remediation();
        result
    }

    /// Attach the exit status of the git process behind this result.
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = Some(exit_code);
        self
    }
}

/// Everything a publish run did, in order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub actor: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub working_directory: PathBuf,
    pub remote: String,
    pub branch: String,
    /// URL the branch was pushed to (or would have been).
    pub remote_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected: Option<RepositoryState>,
    pub stages: Vec<StageResult>,
    pub exit_code: i32,
}

impl RunReport {
    pub fn new(working_directory: &Path, config: &Config) -> Self {
        Self {
            actor: actor_string(),
            started_at: Utc::now(),
            finished_at: None,
            working_directory: working_directory.to_path_buf(),
            remote: config.remote.clone(),
            branch: config.branch.clone(),
            remote_url: None,
            detected: None,
            stages: Vec::new(),
            exit_code: exit_codes::SUCCESS,
        }
    }

    /// Report for a run that failed before any stage could start.
    pub fn aborted(working_directory: &Path, config: &Config, error: &PublishError) -> Self {
        let mut report = Self::new(working_directory, config);
        report.record(StageResult::failed(Stage::Preflight, error));
        report.finish();
        report
    }

    /// Append a stage result, keeping execution order.
    pub fn record(&mut self, result: StageResult) {
        if result.outcome == StageOutcome::Failed {
            self.exit_code = exit_codes::FAILURE;
        }
        self.stages.push(result);
    }

    /// Stamp the finish time.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// The fatal stage failure that ended the run, if any.
    pub fn failure(&self) -> Option<&StageResult> {
        self.stages
            .iter()
            .find(|r| r.outcome == StageOutcome::Failed)
    }

    /// Stages that failed softly.
    pub fn soft_failures(&self) -> impl Iterator<Item = &StageResult> {
        self.stages
            .iter()
            .filter(|r| r.outcome == StageOutcome::SoftFailure)
    }

    pub fn succeeded(&self) -> bool {
        self.failure().is_none()
    }

    /// Result recorded for `stage`, if it ran.
    pub fn stage(&self, stage: Stage) -> Option<&StageResult> {
        self.stages.iter().find(|r| r.stage == stage)
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            PublishError::Output(format!("failed to serialize run report to JSON: {}", e))
        })
    }
}

/// The actor string recorded in reports (`user@HOST`).
fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}
