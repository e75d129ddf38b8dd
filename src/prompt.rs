//! Interactive input and per-field parameter resolution.
//!
//! Every optional input resolves in the same order: an explicit argument,
//! then state already detected in the repository, then an interactive
//! prompt, then a fixed default. [`resolve`] implements that order once so
//! stages never inline their own prompt logic.

use crate::error::{PublishError, Result};
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Source of interactive answers.
pub trait Prompter {
    /// Ask `question`, showing `default` if there is one.
    ///
    /// Returns the trimmed answer; an empty string means "accept the default".
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String>;
}

/// Prompts on a writer (stderr for the CLI) and reads answers line by line.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stderr> {
    /// Read from stdin, prompt on stderr so stdout stays clean for reports.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        let write_err = |e: io::Error| PublishError::Prompt(format!("failed to write prompt: {}", e));

        match default {
            Some(default) => write!(self.output, "{} [{}]: ", question, default),
            None => write!(self.output, "{}: ", question),
        }
        .map_err(write_err)?;
        self.output.flush().map_err(write_err)?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| PublishError::Prompt(format!("failed to read answer: {}", e)))?;

        if read == 0 {
            return Err(PublishError::Prompt(format!(
                "input closed while asking: {}",
                question
            )));
        }

        Ok(line.trim().to_string())
    }
}

/// Never asks anything; every prompt takes its default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl Prompter for NoInput {
    fn ask(&mut self, _question: &str, _default: Option<&str>) -> Result<String> {
        Ok(String::new())
    }
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Explicit,
    Detected,
    Prompt,
    Default,
    /// Nothing supplied and no default exists.
    Unset,
}

/// One input to resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct Field<'a> {
    pub question: &'a str,
    pub explicit: Option<&'a str>,
    pub detected: Option<&'a str>,
    pub default: Option<&'a str>,
}

/// A resolved input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub value: Option<String>,
    pub source: Source,
}

impl Resolution {
    fn from(value: &str, source: Source) -> Self {
        Self {
            value: Some(value.to_string()),
            source,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolve a field: explicit, detected, prompt, default.
///
/// Blank values at any level count as absent. The prompter is only consulted
/// when neither an explicit nor a detected value exists.
pub fn resolve(field: Field<'_>, prompter: &mut dyn Prompter) -> Result<Resolution> {
    let resolution = resolve_field(field, prompter)?;
    debug!(question = field.question, source = ?resolution.source, "resolved input");
    Ok(resolution)
}

fn resolve_field(field: Field<'_>, prompter: &mut dyn Prompter) -> Result<Resolution> {
    if let Some(value) = non_blank(field.explicit) {
        return Ok(Resolution::from(value, Source::Explicit));
    }

    if let Some(value) = non_blank(field.detected) {
        return Ok(Resolution::from(value, Source::Detected));
    }

    let default = non_blank(field.default);
    let answer = prompter.ask(field.question, default)?;
    if !answer.is_empty() {
        return Ok(Resolution::from(&answer, Source::Prompt));
    }

    Ok(match default {
        Some(value) => Resolution::from(value, Source::Default),
        None => Resolution {
            value: None,
            source: Source::Unset,
        },
    })
}
