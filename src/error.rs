//! Error types for stream construction, reads and writes.
//!
//! End-of-resource is not represented here: `update` reports it as an empty
//! value slot.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The PTY set-up step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PtyStep {
    Allocate,
    Unlock,
    ResolveName,
    Reopen,
}

impl PtyStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            PtyStep::Allocate => "allocate",
            PtyStep::Unlock => "unlock",
            PtyStep::ResolveName => "resolve name of",
            PtyStep::Reopen => "reopen",
        }
    }
}

/// Errors raised by stream values and the writers behind them.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The locator is not of the `file:///absolute/path` form.
    #[error("Unsupported URL \"{locator}\"")]
    UnsupportedLocator { locator: String },

    #[error("Unable to open URL \"{locator}\": {source}")]
    Open {
        locator: String,
        #[source]
        source: io::Error,
    },

    #[error("Can't {} PTY: {source}", step.as_str())]
    Pty {
        step: PtyStep,
        #[source]
        source: io::Error,
    },

    #[error("Failed to spawn terminal emulator '{}': {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A write was attempted after the handle was closed.
    #[error("Text stream not open: {target}")]
    NotOpen { target: String },

    /// A value kind the content writer cannot serialize.
    #[error("Expecting strings, got {kind}")]
    TypeMismatch { kind: &'static str },

    /// A file stream was constructed from something other than a sensory node.
    #[error("Expecting a sensory node, got {kind}")]
    ExpectedSensory { kind: &'static str },

    /// An executable input produced nothing.
    #[error("Expecting something to write from {expression}")]
    UnexpectedEmpty { expression: String },

    /// The evaluation context failed to run an expression.
    #[error("Evaluation of {expression} failed: {message}")]
    Evaluation { expression: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StreamError {
    /// Stable category name, used by the CLI and in logs.
    pub fn category(&self) -> &'static str {
        match self {
            StreamError::UnsupportedLocator { .. } => "configuration",
            StreamError::Open { .. } => "resource_open",
            StreamError::Pty { .. } => "resource_open",
            StreamError::Spawn { .. } => "resource_open",
            StreamError::NotOpen { .. } => "not_open",
            StreamError::TypeMismatch { .. } => "type_mismatch",
            StreamError::ExpectedSensory { .. } => "type_mismatch",
            StreamError::UnexpectedEmpty { .. } => "unexpected_empty",
            StreamError::Evaluation { .. } => "evaluation",
            StreamError::Io(_) => "io",
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.category() == "configuration"
    }

    pub fn is_resource_open(&self) -> bool {
        self.category() == "resource_open"
    }
}
