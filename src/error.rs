//! Error types for the repoship CLI.
//!
//! Uses thiserror for derive macros. Every variant carries the diagnostic
//! text that caused it and knows its exit code, its reporting category and
//! the remediation hints printed by the outcome reporter.

use crate::exit_codes;
use serde::Serialize;
use thiserror::Error;

/// Main error type for publish operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// The working directory is missing, not a directory, or unreadable.
    #[error("working directory unavailable: {0}")]
    Environment(String),

    /// The git executable could not be started.
    #[error("git executable not found: {0}")]
    ToolNotFound(String),

    /// The commit step had nothing to record. Soft: the workflow continues.
    #[error("nothing to commit: {0}")]
    NothingToCommit(String),

    /// No remote URL was supplied and none was bound already.
    #[error("no remote URL was provided")]
    MissingRemote {
        /// Page on the hosting platform where a new repository can be created.
        new_repo_url: String,
    },

    /// Push failed because the remote refused our credentials.
    #[error("push authentication failed: {diagnostic}")]
    PushAuth { exit_code: i32, diagnostic: String },

    /// Push failed because the remote could not be reached.
    #[error("push could not reach the remote: {diagnostic}")]
    PushNetwork { exit_code: i32, diagnostic: String },

    /// Push was refused because the remote has history we do not.
    #[error("push was rejected by the remote: {diagnostic}")]
    PushRejected { exit_code: i32, diagnostic: String },

    /// Any other non-zero git exit.
    #[error("git {command} failed (exit code {exit_code}): {diagnostic}")]
    UnclassifiedTool {
        command: String,
        exit_code: i32,
        diagnostic: String,
    },

    /// Invalid command-line or environment configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Interactive input could not be read.
    #[error("failed to read input: {0}")]
    Prompt(String),

    /// The report could not be rendered.
    #[error("failed to write output: {0}")]
    Output(String),
}

/// Reporting category of a [`PublishError`], stable across output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    EnvironmentError,
    ToolNotFoundError,
    NothingToCommitError,
    MissingRemoteError,
    PushAuthError,
    PushNetworkError,
    PushRejectedError,
    UnclassifiedToolError,
    ConfigError,
    PromptError,
    OutputError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::EnvironmentError => "EnvironmentError",
            ErrorKind::ToolNotFoundError => "ToolNotFoundError",
            ErrorKind::NothingToCommitError => "NothingToCommitError",
            ErrorKind::MissingRemoteError => "MissingRemoteError",
            ErrorKind::PushAuthError => "PushAuthError",
            ErrorKind::PushNetworkError => "PushNetworkError",
            ErrorKind::PushRejectedError => "PushRejectedError",
            ErrorKind::UnclassifiedToolError => "UnclassifiedToolError",
            ErrorKind::ConfigError => "ConfigError",
            ErrorKind::PromptError => "PromptError",
            ErrorKind::OutputError => "OutputError",
        };
        f.write_str(name)
    }
}

/// Marker git prints when it has no committer identity at all.
const MISSING_IDENTITY_MARKER: &str = "please tell me who you are";

/// Push output when the branch has no commit to send.
const NO_COMMIT_MARKER: &str = "src refspec";

impl PublishError {
    /// Returns the process exit code for this error.
    ///
    /// Soft failures never end the run, so they map to success.
    pub fn exit_code(&self) -> i32 {
        if self.is_soft() {
            exit_codes::SUCCESS
        } else {
            exit_codes::FAILURE
        }
    }

    /// Returns the reporting category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PublishError::Environment(_) => ErrorKind::EnvironmentError,
            PublishError::ToolNotFound(_) => ErrorKind::ToolNotFoundError,
            PublishError::NothingToCommit(_) => ErrorKind::NothingToCommitError,
            PublishError::MissingRemote { .. } => ErrorKind::MissingRemoteError,
            PublishError::PushAuth { .. } => ErrorKind::PushAuthError,
            PublishError::PushNetwork { .. } => ErrorKind::PushNetworkError,
            PublishError::PushRejected { .. } => ErrorKind::PushRejectedError,
            PublishError::UnclassifiedTool { .. } => ErrorKind::UnclassifiedToolError,
            PublishError::Config(_) => ErrorKind::ConfigError,
            PublishError::Prompt(_) => ErrorKind::PromptError,
            PublishError::Output(_) => ErrorKind::OutputError,
        }
    }

    /// Exit status of the git process behind this error, if one ran.
    pub fn tool_exit_code(&self) -> Option<i32> {
        match self {
            PublishError::PushAuth { exit_code, .. }
            | PublishError::PushNetwork { exit_code, .. }
            | PublishError::PushRejected { exit_code, .. }
            | PublishError::UnclassifiedTool { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }

    /// Whether the workflow keeps going after this error.
    pub fn is_soft(&self) -> bool {
        matches!(self, PublishError::NothingToCommit(_))
    }

    /// Ordered remediation hints shown to the user.
    pub fn remediation(&self) -> Vec<String> {
        match self {
            PublishError::Environment(_) => vec![
                "Check that the directory path is spelled correctly".to_string(),
                "Create the directory, or pass another one: repoship <DIR>".to_string(),
            ],
            PublishError::ToolNotFound(_) => vec![
                "Install git from https://git-scm.com/downloads".to_string(),
                "Make sure git is on your PATH, or point --git / REPOSHIP_GIT at it".to_string(),
            ],
            PublishError::NothingToCommit(_) => vec![
                "No new changes since the last commit; existing history is pushed as-is"
                    .to_string(),
            ],
            PublishError::MissingRemote { new_repo_url } => vec![
                format!("Go to {}", new_repo_url),
                "Create a new, empty repository".to_string(),
                "Copy its HTTPS URL".to_string(),
                "Re-run and paste it, or pass --remote-url <URL>".to_string(),
            ],
            PublishError::PushAuth { .. } => vec![
                "Verify your hosting credentials (HTTPS needs a personal access token, not a password)"
                    .to_string(),
                "If the URL is SSH, check that your key is loaded and registered".to_string(),
                "Check that your account has write access to the repository".to_string(),
            ],
            PublishError::PushNetwork { .. } => vec![
                "Make sure you have an internet connection".to_string(),
                "Check that the remote URL host is spelled correctly".to_string(),
                "Check proxy and firewall settings".to_string(),
            ],
            PublishError::PushRejected { .. } => vec![
                "The remote branch has commits your local branch does not".to_string(),
                "Integrate them first: git pull --rebase, then re-run".to_string(),
                "Or publish to a freshly created, empty repository".to_string(),
            ],
            PublishError::UnclassifiedTool {
                command,
                diagnostic,
                ..
            } => {
                if diagnostic.to_lowercase().contains(MISSING_IDENTITY_MARKER) {
                    vec![
                        "git has no committer identity configured".to_string(),
                        "Re-run and enter a name and email, or pass --name and --email"
                            .to_string(),
                    ]
                } else if command == "push" && diagnostic.contains(NO_COMMIT_MARKER) {
                    vec![
                        "The branch has no commit to push yet".to_string(),
                        "Add files to the project directory and re-run".to_string(),
                    ]
                } else if command == "push" {
                    vec![
                        "Check your remote URL is correct".to_string(),
                        "Make sure you have an internet connection".to_string(),
                        "Verify your hosting credentials".to_string(),
                        "Check whether the URL should be SSH or HTTPS".to_string(),
                    ]
                } else {
                    vec![format!(
                        "Run `git {}` in the working directory to see the full output",
                        command
                    )]
                }
            }
            PublishError::Config(_) => {
                vec!["Run `repoship --help` to see the accepted options".to_string()]
            }
            PublishError::Prompt(_) => vec![
                "Run in an interactive terminal, or pass --no-input with explicit options"
                    .to_string(),
            ],
            PublishError::Output(_) => Vec::new(),
        }
    }
}

/// Result type alias for publish operations.
pub type Result<T> = std::result::Result<T, PublishError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_errors_exit_with_failure() {
        let errors = [
            PublishError::Environment("missing".to_string()),
            PublishError::ToolNotFound("git".to_string()),
            PublishError::MissingRemote {
                new_repo_url: "https://github.com/new".to_string(),
            },
            PublishError::PushAuth {
                exit_code: 128,
                diagnostic: "denied".to_string(),
            },
            PublishError::PushNetwork {
                exit_code: 128,
                diagnostic: "offline".to_string(),
            },
            PublishError::PushRejected {
                exit_code: 1,
                diagnostic: "behind".to_string(),
            },
            PublishError::UnclassifiedTool {
                command: "add".to_string(),
                exit_code: 128,
                diagnostic: "boom".to_string(),
            },
        ];
        for err in errors {
            assert!(!err.is_soft(), "{} should be fatal", err.kind());
            assert_eq!(err.exit_code(), exit_codes::FAILURE);
        }
    }

    #[test]
    fn nothing_to_commit_is_soft() {
        let err = PublishError::NothingToCommit("working tree clean".to_string());
        assert!(err.is_soft());
        assert_eq!(err.exit_code(), exit_codes::SUCCESS);
        assert_eq!(err.kind(), ErrorKind::NothingToCommitError);
    }

    #[test]
    fn missing_remote_remediation_names_new_repo_page() {
        let err = PublishError::MissingRemote {
            new_repo_url: "https://git.example.com/new".to_string(),
        };
        let hints = err.remediation();
        assert_eq!(hints[0], "Go to https://git.example.com/new");
        assert!(hints.iter().any(|h| h.contains("HTTPS URL")));
    }

    #[test]
    fn unclassified_commit_failure_hints_at_identity() {
        let err = PublishError::UnclassifiedTool {
            command: "commit".to_string(),
            exit_code: 128,
            diagnostic: "*** Please tell me who you are.".to_string(),
        };
        assert!(err.remediation()[0].contains("committer identity"));
    }

    #[test]
    fn unclassified_push_failure_gets_generic_push_hints() {
        let err = PublishError::UnclassifiedTool {
            command: "push".to_string(),
            exit_code: 1,
            diagnostic: "something odd".to_string(),
        };
        let hints = err.remediation();
        assert_eq!(hints.len(), 4);
        assert!(hints[3].contains("SSH or HTTPS"));
    }

    #[test]
    fn error_kind_display_matches_category_names() {
        assert_eq!(ErrorKind::PushAuthError.to_string(), "PushAuthError");
        let err = PublishError::PushNetwork {
            exit_code: 128,
            diagnostic: "x".to_string(),
        };
        assert_eq!(err.kind().to_string(), "PushNetworkError");
    }

    #[test]
    fn tool_exit_code_only_for_git_failures() {
        let push = PublishError::PushRejected {
            exit_code: 1,
            diagnostic: "non-fast-forward".to_string(),
        };
        assert_eq!(push.tool_exit_code(), Some(1));
        assert_eq!(
            PublishError::Environment("gone".to_string()).tool_exit_code(),
            None
        );
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = PublishError::UnclassifiedTool {
            command: "remote".to_string(),
            exit_code: 3,
            diagnostic: "error: remote origin already exists.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "git remote failed (exit code 3): error: remote origin already exists."
        );
    }

    #[test]
    fn push_without_commit_gets_commit_advice() {
        let err = PublishError::UnclassifiedTool {
            command: "push".to_string(),
            exit_code: 1,
            diagnostic: "error: src refspec main does not match any".to_string(),
        };
        let hints = err.remediation();
        assert_eq!(hints[0], "The branch has no commit to push yet");
        assert!(!hints.iter().any(|h| h.contains("internet")));
    }
}
