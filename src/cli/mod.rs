//! CLI argument parsing for repoship.
//!
//! Uses clap derive macros. Every option can also come from a `REPOSHIP_*`
//! environment variable; flags on the command line win.

use crate::config::{
    Config, DEFAULT_BRANCH, DEFAULT_COMMIT_MESSAGE, DEFAULT_GIT, DEFAULT_NEW_REPO_URL,
    DEFAULT_REMOTE,
};
use crate::workflow::PublishRequest;
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

/// Repoship: publish a local project directory to a hosted git repository.
///
/// Initializes the repository if needed, configures your committer identity,
/// commits everything, renames the branch, binds the remote, and pushes.
/// Anything not given as an option is detected from the repository or asked
/// for interactively.
#[derive(Parser, Debug)]
#[command(name = "repoship")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project directory to publish (asked for when omitted).
    #[arg(value_name = "DIR", env = "REPOSHIP_DIR")]
    pub dir: Option<PathBuf>,

    /// Committer name, written to the repository's local git config.
    #[arg(long, env = "REPOSHIP_NAME")]
    pub name: Option<String>,

    /// Committer email, written to the repository's local git config.
    #[arg(long, env = "REPOSHIP_EMAIL")]
    pub email: Option<String>,

    /// Commit message for the snapshot commit. Blank uses the default message.
    #[arg(short, long, env = "REPOSHIP_MESSAGE")]
    pub message: Option<String>,

    /// URL of the hosted repository to push to.
    #[arg(long, env = "REPOSHIP_REMOTE_URL")]
    pub remote_url: Option<String>,

    /// Name of the remote binding to manage.
    #[arg(long, env = "REPOSHIP_REMOTE", default_value = DEFAULT_REMOTE)]
    pub remote: String,

    /// Branch to rename the active branch to and push.
    #[arg(long, env = "REPOSHIP_BRANCH", default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// Commit message used when none is given.
    #[arg(long, env = "REPOSHIP_DEFAULT_MESSAGE", default_value = DEFAULT_COMMIT_MESSAGE)]
    pub default_message: String,

    /// Page suggested for creating a repository when no URL is given.
    #[arg(long, env = "REPOSHIP_NEW_REPO_URL", default_value = DEFAULT_NEW_REPO_URL)]
    pub new_repo_url: String,

    /// Git command line; may include leading arguments (split shell-style).
    #[arg(long, env = "REPOSHIP_GIT", default_value = DEFAULT_GIT)]
    pub git: String,

    /// Never prompt; unresolved fields take their defaults.
    #[arg(long, env = "REPOSHIP_NO_INPUT")]
    pub no_input: bool,

    /// Print the run report as JSON on stdout.
    #[arg(long, env = "REPOSHIP_JSON")]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Run configuration from the parsed options.
    pub fn config(&self) -> Config {
        Config {
            remote: self.remote.clone(),
            branch: self.branch.clone(),
            default_commit_message: self.default_message.clone(),
            new_repo_url: self.new_repo_url.clone(),
            git: self.git.clone(),
            interactive: !self.no_input,
        }
    }

    /// Publish inputs for `working_directory`.
    pub fn request(&self, working_directory: &Path) -> PublishRequest {
        PublishRequest {
            committer_name: self.name.clone(),
            committer_email: self.email.clone(),
            commit_message: self.message.clone(),
            remote_url: self.remote_url.clone(),
            ..PublishRequest::new(working_directory.to_path_buf())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_minimal_uses_defaults() {
        let cli = Cli::try_parse_from(["repoship"]).unwrap();
        assert_eq!(cli.dir, None);
        assert_eq!(cli.remote, "origin");
        assert_eq!(cli.branch, "main");
        assert!(!cli.no_input);
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.config(), Config::default());
    }

    #[test]
    fn parse_full() {
        let cli = Cli::try_parse_from([
            "repoship",
            "site",
            "--name",
            "Ada Lovelace",
            "--email",
            "ada@example.com",
            "-m",
            "First publish",
            "--remote-url",
            "https://host/ada/site.git",
            "--remote",
            "upstream",
            "--branch",
            "trunk",
            "--git",
            "git -c core.quotepath=off",
            "--no-input",
            "--json",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.dir, Some(PathBuf::from("site")));
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);

        let config = cli.config();
        assert_eq!(config.remote, "upstream");
        assert_eq!(config.branch, "trunk");
        assert_eq!(config.git, "git -c core.quotepath=off");
        assert!(!config.interactive);

        let request = cli.request(Path::new("/work/site"));
        assert_eq!(request.working_directory, PathBuf::from("/work/site"));
        assert_eq!(request.committer_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(request.committer_email.as_deref(), Some("ada@example.com"));
        assert_eq!(request.commit_message.as_deref(), Some("First publish"));
        assert_eq!(
            request.remote_url.as_deref(),
            Some("https://host/ada/site.git")
        );
    }

    #[test]
    fn unknown_flag_is_usage_error() {
        let err = Cli::try_parse_from(["repoship", "--frobnicate"]).unwrap_err();
        assert_eq!(err.exit_code(), crate::exit_codes::USAGE);
    }
}
