//! Git command runner for repoship.
//!
//! Every git invocation goes through a [`CommandRunner`], so the whole
//! publish pipeline can run against a scripted fake in tests. [`Git`] binds a
//! runner to a git command line and a working directory and maps process
//! failures onto [`PublishError`].

use crate::error::{PublishError, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Captured result of one finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Process exit status. `-1` when the process was killed by a signal.
    pub exit_code: i32,
    /// Standard output (trimmed).
    pub stdout: String,
    /// Standard error (trimmed).
    pub stderr: String,
}

impl CommandOutput {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into().trim().to_string(),
            stderr: stderr.into().trim().to_string(),
        }
    }

    /// Returns true if the process exited with status zero.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// The text most useful to show a user: stderr, or stdout when stderr is empty.
    pub fn diagnostic(&self) -> &str {
        if self.stderr.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }

    /// Stdout and stderr joined, for substring classification.
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (true, _) => self.stderr.clone(),
            (_, true) => self.stdout.clone(),
            _ => format!("{}\n{}", self.stdout, self.stderr),
        }
    }
}

/// Narrow process-execution seam: program and arguments in, exit status and text out.
pub trait CommandRunner {
    /// Run `program` with `args` in `cwd` and wait for it to exit.
    ///
    /// Returns `Err` only when the process could not be started.
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<CommandOutput>;
}

/// Runs real processes with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<CommandOutput> {
        let output = Command::new(program).current_dir(cwd).args(args).output()?;

        Ok(CommandOutput::new(
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        ))
    }
}

/// A git command line: the executable plus arguments placed before every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            args: Vec::new(),
        }
    }
}

/// Git bound to a runner and a working directory.
pub struct Git<'a> {
    runner: &'a dyn CommandRunner,
    command: GitCommand,
    cwd: PathBuf,
}

impl<'a> Git<'a> {
    pub fn new(runner: &'a dyn CommandRunner, command: GitCommand, cwd: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            command,
            cwd: cwd.into(),
        }
    }

    /// The directory every command runs in.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The git executable name, for messages.
    pub fn program(&self) -> &str {
        &self.command.program
    }

    /// Run a git command and return its output whatever the exit status.
    ///
    /// # Returns
    ///
    /// * `Ok(CommandOutput)` - The process ran (exit status may be non-zero)
    /// * `Err(PublishError::ToolNotFound)` - The executable is missing or not runnable
    /// * `Err(PublishError::UnclassifiedTool)` - Any other spawn failure
    pub fn output(&self, args: &[&str]) -> Result<CommandOutput> {
        let mut full_args = self.command.args.clone();
        full_args.extend(args.iter().map(|a| a.to_string()));

        let subcommand = args.first().copied().unwrap_or("");
        let output = self
            .runner
            .run(&self.command.program, &full_args, &self.cwd)
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                    PublishError::ToolNotFound(format!(
                        "failed to execute '{}': {}",
                        self.command.program, e
                    ))
                }
                _ => PublishError::UnclassifiedTool {
                    command: subcommand.to_string(),
                    exit_code: -1,
                    diagnostic: format!("failed to execute {}: {}", self.command.program, e),
                },
            })?;

        debug!(
            args = %full_args.join(" "),
            exit_code = output.exit_code,
            cwd = %self.cwd.display(),
            "git finished"
        );

        Ok(output)
    }

    /// Run a git command that must succeed.
    ///
    /// A non-zero exit becomes `PublishError::UnclassifiedTool` carrying the
    /// subcommand, exit code, and diagnostic text.
    pub fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self.output(args)?;

        if output.success() {
            Ok(output)
        } else {
            Err(PublishError::UnclassifiedTool {
                command: args.first().copied().unwrap_or("").to_string(),
                exit_code: output.exit_code,
                diagnostic: output.diagnostic().to_string(),
            })
        }
    }

    /// Run a query whose non-zero exit means "no value".
    ///
    /// Returns `Some(stdout)` on success with non-empty output, `None` otherwise.
    pub fn query(&self, args: &[&str]) -> Result<Option<String>> {
        let output = self.output(args)?;
        if output.success() && !output.stdout.is_empty() {
            Ok(Some(output.stdout))
        } else {
            Ok(None)
        }
    }
}
