//! Error types and the error sink the scanner reports into.

use std::path::PathBuf;

use thiserror::Error;

/// A recoverable problem found while scanning. The scanner reports it and keeps going.
#[derive(Error, Debug, PartialEq, Clone)]
#[error("[line {line}] Error: {message}")]
pub struct LexicalError {
    pub line: usize,
    pub message: String,
}

impl LexicalError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Receives `(line, message)` reports from the scanner.
///
/// The owner decides what a reported error means: a script run stops
/// before going further, a prompt session resets and reads the next line.
pub trait Reporter {
    fn error(&mut self, line: usize, message: &str);

    fn had_error(&self) -> bool;

    fn reset(&mut self);
}

/// Collects every report in order.
impl Reporter for Vec<LexicalError> {
    fn error(&mut self, line: usize, message: &str) {
        self.push(LexicalError::new(line, message));
    }

    fn had_error(&self) -> bool {
        !self.is_empty()
    }

    fn reset(&mut self) {
        self.clear();
    }
}

/// Writes reports to stderr as they arrive.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    count: usize,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Reporter for ConsoleReporter {
    fn error(&mut self, line: usize, message: &str) {
        eprintln!("{}", LexicalError::new(line, message));
        self.count += 1;
    }

    fn had_error(&self) -> bool {
        self.count > 0
    }

    fn reset(&mut self) {
        self.count = 0;
    }
}

/// Failures of the command-line shell around the scanner.
#[derive(Error, Debug)]
pub enum LoxError {
    #[error("could not read script {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt failed: {0}")]
    Prompt(#[from] rustyline::error::ReadlineError),
}
