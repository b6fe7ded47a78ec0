use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process::Child;

use crate::error::StreamError;
use crate::resource::locator::Locator;

/// What sits behind a handle. Terminals report a hung-up peer as `EIO`,
/// which is end-of-resource rather than a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    File,
    Terminal,
}

struct Channel {
    reader: BufReader<File>,
    writer: BufWriter<File>,
}

/// Exclusive owner of one OS byte stream and, for terminals, the process
/// attached to its other end.
///
/// `close`, `terminate` and `halt` are idempotent. Dropping a live handle
/// halts it, but holders are expected to call `halt` themselves.
pub struct ResourceHandle {
    kind: HandleKind,
    label: String,
    channel: Option<Channel>,
    child: Option<Child>,
}

impl ResourceHandle {
    pub(crate) fn new(
        kind: HandleKind,
        label: impl Into<String>,
        file: File,
    ) -> io::Result<Self> {
        let writer = BufWriter::new(file.try_clone()?);
        Ok(Self {
            kind,
            label: label.into(),
            channel: Some(Channel {
                reader: BufReader::new(file),
                writer,
            }),
            child: None,
        })
    }

    /// Attach the process living on the other end of the stream.
    #[cfg(unix)]
    pub(crate) fn with_child(mut self, child: Child) -> Self {
        self.child = Some(child);
        self
    }

    /// Open a local file for reading and appending, creating it if needed.
    pub fn open_file(locator: &Locator) -> Result<Self, StreamError> {
        let open_error = |source| StreamError::Open {
            locator: locator.uri().to_string(),
            source,
        };

        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(locator.path())
            .map_err(open_error)?;

        let handle = Self::new(HandleKind::File, locator.uri(), file).map_err(open_error)?;
        tracing::info!(uri = locator.uri(), "Opened text file stream");
        Ok(handle)
    }

    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    /// Locator or device the handle was opened on.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    /// Pid of the attached process while it has not been terminated.
    pub fn child_id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Read one line of at most `limit - 1` bytes.
    ///
    /// Returns `Ok(None)` when the handle is closed or at end-of-resource.
    pub fn read_line(&mut self, limit: usize) -> io::Result<Option<String>> {
        let Some(channel) = self.channel.as_mut() else {
            return Ok(None);
        };

        match read_bounded_line(&mut channel.reader, limit) {
            Err(e) if self.kind == HandleKind::Terminal && is_hangup(&e) => Ok(None),
            other => other,
        }
    }

    /// Buffered writer, `None` once closed.
    pub fn writer(&mut self) -> Option<&mut BufWriter<File>> {
        self.channel.as_mut().map(|channel| &mut channel.writer)
    }

    pub fn close(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            if let Err(e) = channel.writer.flush() {
                tracing::warn!(label = %self.label, "Failed to flush on close: {}", e);
            }
            tracing::debug!(label = %self.label, "Closed stream handle");
        }
    }

    /// Force-kill the attached process and reap it.
    pub fn terminate(&mut self) {
        if let Some(mut child) = self.child.take() {
            let pid = child.id();
            if let Err(e) = child.kill() {
                tracing::debug!(pid, "Kill skipped: {}", e);
            }
            let _ = child.wait();
            tracing::info!(pid, "Terminated terminal emulator");
        }
    }

    pub fn halt(&mut self) {
        self.close();
        self.terminate();
    }
}

impl Drop for ResourceHandle {
    fn drop(&mut self) {
        if self.channel.is_some() || self.child.is_some() {
            tracing::debug!(label = %self.label, "Halting stream handle on drop");
            self.halt();
        }
    }
}

#[cfg(unix)]
fn is_hangup(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::EIO)
}

#[cfg(not(unix))]
fn is_hangup(_err: &io::Error) -> bool {
    false
}

/// Read up to and including the next newline, but never more than
/// `limit - 1` bytes. Longer lines come back in pieces on later calls.
///
/// A cut never splits a UTF-8 character: the partial bytes stay in `reader`
/// and start the next piece. Returns `Ok(None)` only when nothing was read
/// before end-of-input.
pub fn read_bounded_line<R: BufRead>(reader: &mut R, limit: usize) -> io::Result<Option<String>> {
    let max = limit.saturating_sub(1).max(1);
    let mut line = Vec::new();

    while line.len() < max {
        let available = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            break;
        }

        let window = &available[..available.len().min(max - line.len())];
        match window.iter().position(|&b| b == b'\n') {
            Some(end) => {
                line.extend_from_slice(&window[..=end]);
                reader.consume(end + 1);
                break;
            }
            None => {
                let mut taken = window.len();
                line.extend_from_slice(window);
                if line.len() == max {
                    let partial = incomplete_utf8_tail(&line);
                    if partial > 0 && partial <= taken && partial < line.len() {
                        line.truncate(line.len() - partial);
                        taken -= partial;
                        reader.consume(taken);
                        break;
                    }
                }
                reader.consume(taken);
            }
        }
    }

    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}

/// Length of a UTF-8 sequence started but not finished at the end of `bytes`.
fn incomplete_utf8_tail(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(3) {
        let lead = bytes[bytes.len() - back];
        if lead & 0xC0 == 0x80 {
            continue;
        }
        let width = match lead {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        return if width > back { back } else { 0 };
    }
    0
}
