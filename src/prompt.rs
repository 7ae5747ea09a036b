//! Interactive terminal prompts.

use crate::error::{MigrateError, Result};
use std::io::{self, BufRead, Write};

/// Source of answers to interactive questions.
pub trait Prompter {
    /// Show `question` and return the trimmed answer. An empty answer is valid.
    fn prompt(&mut self, question: &str) -> Result<String>;
}

/// Prompter reading from stdin and writing to stdout.
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn prompt(&mut self, question: &str) -> Result<String> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        ask(&mut stdin.lock(), &mut stdout.lock(), question)
    }
}

/// Write `question`, flush, and read a single line from `input`.
///
/// End of input counts as an empty answer.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    output
        .write_all(question.as_bytes())
        .and_then(|()| output.flush())
        .map_err(MigrateError::Terminal)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(MigrateError::Terminal)?;
    Ok(line.trim().to_string())
}
