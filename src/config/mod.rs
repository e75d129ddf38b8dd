//! Run configuration for repoship.
//!
//! Settings come from command-line flags layered over `REPOSHIP_*`
//! environment variables over the defaults below. Nothing is read from or
//! written to a configuration file.

mod model;
mod operations;


pub use model::{
    Config, DEFAULT_BRANCH, DEFAULT_COMMIT_MESSAGE, DEFAULT_GIT, DEFAULT_NEW_REPO_URL,
    DEFAULT_REMOTE,
};
