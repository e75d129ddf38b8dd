//! Config struct definition and default implementation.

/// Name of the remote binding the workflow manages.
pub const DEFAULT_REMOTE: &str = "origin";

/// Branch name hosting platforms treat as primary.
pub const DEFAULT_BRANCH: &str = "main";

/// Commit message used when the user leaves the prompt blank.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Initial commit";

/// Page where a new hosted repository can be created.
pub const DEFAULT_NEW_REPO_URL: &str = "https://github.com/new";

/// Command used to invoke git.
pub const DEFAULT_GIT: &str = "git";

/// Configuration for a single publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Name of the remote binding to (re)create (default: "origin").
    pub remote: String,

    /// Branch the active branch is renamed to and pushed (default: "main").
    pub branch: String,

    /// Commit message used when none is supplied.
    pub default_commit_message: String,

    /// Where users are sent to create a repository when no URL is given.
    pub new_repo_url: String,

    /// Git command line. May carry leading arguments, e.g. `git -c core.quotepath=off`.
    pub git: String,

    /// Whether prompts are shown. When false, unresolved fields take their defaults.
    pub interactive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            default_commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            new_repo_url: DEFAULT_NEW_REPO_URL.to_string(),
            git: DEFAULT_GIT.to_string(),
            interactive: true,
        }
    }
}
