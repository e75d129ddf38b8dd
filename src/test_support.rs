use crate::error::{PublishError, Result};
use crate::git::{CommandOutput, CommandRunner};
use crate::prompt::Prompter;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Switches the process working directory for the guard's lifetime.
pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // The working directory is process-global; serialize even if a
        // #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A `CommandRunner` that answers from a script instead of spawning processes.
///
/// Rules match on an argument prefix; the most recently added matching rule
/// wins. A rule holding several outputs hands them out in order and keeps
/// repeating the last one. Unmatched commands succeed with empty output.
pub(crate) struct ScriptedRunner {
    rules: RefCell<Vec<Rule>>,
    calls: RefCell<Vec<Vec<String>>>,
    spawn_error: Option<io::ErrorKind>,
}

struct Rule {
    prefix: Vec<String>,
    outputs: VecDeque<CommandOutput>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self {
            rules: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            spawn_error: None,
        }
    }

    /// Every command fails to start with `kind`.
    pub(crate) fn failing_to_spawn(kind: io::ErrorKind) -> Self {
        Self {
            spawn_error: Some(kind),
            ..Self::new()
        }
    }

    pub(crate) fn on(self, prefix: &[&str], output: CommandOutput) -> Self {
        self.on_sequence(prefix, vec![output])
    }

    pub(crate) fn on_sequence(self, prefix: &[&str], outputs: Vec<CommandOutput>) -> Self {
        self.rules.borrow_mut().push(Rule {
            prefix: prefix.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.into(),
        });
        self
    }

    /// Arguments of every command run so far, in order.
    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Whether any recorded command starts with `prefix`.
    pub(crate) fn ran(&self, prefix: &[&str]) -> bool {
        self.position(prefix).is_some()
    }

    /// Index of the first recorded command starting with `prefix`.
    pub(crate) fn position(&self, prefix: &[&str]) -> Option<usize> {
        self.calls
            .borrow()
            .iter()
            .position(|call| starts_with(call, prefix))
    }
}

fn starts_with(call: &[String], prefix: &[&str]) -> bool {
    call.len() >= prefix.len() && call.iter().zip(prefix).all(|(a, b)| a == b)
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, _program: &str, args: &[String], _cwd: &Path) -> io::Result<CommandOutput> {
        if let Some(kind) = self.spawn_error {
            return Err(io::Error::new(kind, "scripted spawn failure"));
        }

        self.calls.borrow_mut().push(args.to_vec());

        let mut rules = self.rules.borrow_mut();
        let matched = rules.iter_mut().rev().find(|rule| {
            args.len() >= rule.prefix.len() && args.iter().zip(&rule.prefix).all(|(a, b)| a == b)
        });

        Ok(match matched {
            Some(rule) if rule.outputs.len() > 1 => rule.outputs.pop_front().unwrap(),
            Some(rule) => rule.outputs[0].clone(),
            None => CommandOutput::new(0, "", ""),
        })
    }
}

/// A `Prompter` that replays canned answers and records the questions asked.
pub(crate) struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub(crate) questions: Vec<String>,
}

impl ScriptedPrompter {
    pub(crate) fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            questions: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str, _default: Option<&str>) -> Result<String> {
        self.questions.push(question.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| PublishError::Prompt(format!("unexpected prompt: {}", question)))
    }
}

/// A repository with one commit on `main` and a configured identity.
pub(crate) fn create_test_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    git(path, &["init"]);
    // Deterministic default branch name across environments.
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);

    std::fs::write(path.join("README.md"), "# Test\n").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);

    temp_dir
}

/// An empty bare repository usable as a push destination.
pub(crate) fn create_bare_remote() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    git(temp_dir.path(), &["init", "--bare"]);
    temp_dir
}

pub(crate) fn git(repo_dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }

    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
