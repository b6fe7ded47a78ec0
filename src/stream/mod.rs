//! Stream values: external resources seen as values that can be pulled
//! from (`update`) and pushed to (`write`).
//!
//! A stream value is not synchronized. Callers that share one across
//! threads serialize `update`, `write` and `halt` themselves.

mod describe;
mod drain;
mod file;
#[cfg(unix)]
mod terminal;
mod writer;

use std::io::Write;

pub use describe::describe;
pub use drain::{drain, DrainStats};
pub use file::FileStream;
#[cfg(unix)]
pub use terminal::TerminalStream;
pub use writer::{render, write_value};

use crate::error::StreamError;
use crate::resource::ResourceHandle;
use crate::value::{EvaluationContext, Input, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    TextFile,
    Terminal,
}

impl StreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::TextFile => "text_file",
            StreamKind::Terminal => "terminal",
        }
    }
}

pub trait StreamValue {
    fn kind(&self) -> StreamKind;

    /// Result of the most recent `update`: empty, or exactly one item.
    fn value(&self) -> &[Value];

    fn is_open(&self) -> bool;

    /// Pull the next line into the value slot.
    ///
    /// End-of-resource halts the stream and leaves the slot empty; it is
    /// not an error. Once halted, every call leaves the slot empty.
    fn update(&mut self) -> Result<(), StreamError>;

    /// Push `input` to the resource and return the value actually written.
    ///
    /// Executable inputs are evaluated through `ctx` first. Streaming values
    /// are drained batch by batch. Fails with [`StreamError::NotOpen`] once
    /// the stream is halted.
    fn write(
        &mut self,
        ctx: &mut dyn EvaluationContext,
        silent: bool,
        input: Input,
    ) -> Result<Value, StreamError>;

    /// Close the handle, kill any attached process and clear the slot.
    /// Idempotent.
    fn halt(&mut self);

    /// Canonical capability descriptor for this stream's kind.
    fn describe(&self, ctx: &mut dyn EvaluationContext) -> Value {
        ctx.intern(describe(self.kind()))
    }
}

/// Shared `update` body: one bounded line into `slot`.
pub(crate) fn read_into_slot(
    handle: &mut ResourceHandle,
    line_buffer_bytes: usize,
    slot: &mut Option<Value>,
) -> Result<(), StreamError> {
    match handle.read_line(line_buffer_bytes) {
        Ok(Some(line)) => {
            tracing::trace!(label = handle.label(), bytes = line.len(), "Read line");
            *slot = Some(Value::item(line));
            Ok(())
        }
        Ok(None) => {
            if handle.is_open() {
                tracing::debug!(label = handle.label(), "End of resource");
                handle.halt();
            }
            *slot = None;
            Ok(())
        }
        Err(e) => {
            tracing::warn!(label = handle.label(), "Read failed, halting stream: {}", e);
            handle.halt();
            *slot = None;
            Err(e.into())
        }
    }
}

/// Shared `write` body, once the handle is known to be open.
pub(crate) fn write_out<W: Write>(
    out: &mut W,
    ctx: &mut dyn EvaluationContext,
    silent: bool,
    input: Input,
) -> Result<Value, StreamError> {
    let content = match input {
        Input::Value(value) => value,
        Input::Executable(expression) => {
            ctx.execute(&expression, silent)?
                .ok_or_else(|| StreamError::UnexpectedEmpty {
                    expression: expression.to_string(),
                })?
        }
    };

    match &content {
        Value::Stream(source) => {
            drain(out, source)?;
        }
        other => {
            write_value(out, other)?;
            out.flush()?;
        }
    }
    Ok(content)
}
