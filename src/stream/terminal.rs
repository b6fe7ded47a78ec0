use std::path::Path;

use crate::config::Config;
use crate::error::StreamError;
use crate::pty::PtySession;
use crate::stream::{read_into_slot, write_out, StreamKind, StreamValue};
use crate::value::{EvaluationContext, Input, Producer, Value};

/// Stream over a fresh pseudo-terminal with a terminal emulator attached.
///
/// Lines typed into the emulator come back from `update`; written values
/// appear in its window. Halting force-kills the emulator.
pub struct TerminalStream {
    session: PtySession,
    current: Option<Value>,
    line_buffer_bytes: usize,
}

impl TerminalStream {
    /// Open with the default configuration (`/usr/bin/xterm`).
    pub fn open() -> Result<Self, StreamError> {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Result<Self, StreamError> {
        let session = PtySession::spawn(&config.terminal)?;
        Ok(Self {
            session,
            current: None,
            line_buffer_bytes: config.streams.line_buffer_bytes,
        })
    }

    /// Slave device the stream reads and writes.
    pub fn device(&self) -> &Path {
        self.session.device()
    }

    /// Emulator pid, until the stream is halted.
    pub fn child_id(&self) -> Option<u32> {
        self.session.handle().child_id()
    }
}

impl StreamValue for TerminalStream {
    fn kind(&self) -> StreamKind {
        StreamKind::Terminal
    }

    fn value(&self) -> &[Value] {
        self.current.as_slice()
    }

    fn is_open(&self) -> bool {
        self.session.handle().is_open()
    }

    fn update(&mut self) -> Result<(), StreamError> {
        read_into_slot(
            self.session.handle_mut(),
            self.line_buffer_bytes,
            &mut self.current,
        )
    }

    fn write(
        &mut self,
        ctx: &mut dyn EvaluationContext,
        silent: bool,
        input: Input,
    ) -> Result<Value, StreamError> {
        let target = format!("terminal {}", self.session.device().display());
        let Some(out) = self.session.handle_mut().writer() else {
            return Err(StreamError::NotOpen { target });
        };
        write_out(out, ctx, silent, input)
    }

    fn halt(&mut self) {
        self.session.handle_mut().halt();
        self.current = None;
    }
}

impl Producer for TerminalStream {
    fn next_batch(&mut self) -> Result<Vec<Value>, StreamError> {
        self.update()?;
        Ok(self.value().to_vec())
    }
}
