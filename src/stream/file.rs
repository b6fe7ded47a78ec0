use crate::config::StreamConfig;
use crate::error::StreamError;
use crate::resource::{Locator, ResourceHandle};
use crate::stream::{read_into_slot, write_out, StreamKind, StreamValue};
use crate::value::{EvaluationContext, Input, NodeKind, Producer, Value};

/// Stream over a local text file, opened for reading and appending.
///
/// The first `update` after opening yields the locator itself, so callers
/// get a deterministic first observation; later updates yield lines.
pub struct FileStream {
    locator: Locator,
    handle: ResourceHandle,
    fresh: bool,
    current: Option<Value>,
    line_buffer_bytes: usize,
}

impl FileStream {
    pub fn open(uri: &str) -> Result<Self, StreamError> {
        Self::open_with(uri, &StreamConfig::default())
    }

    pub fn open_with(uri: &str, config: &StreamConfig) -> Result<Self, StreamError> {
        let locator = Locator::parse(uri)?;
        let handle = ResourceHandle::open_file(&locator)?;
        Ok(Self {
            locator,
            handle,
            fresh: true,
            current: None,
            line_buffer_bytes: config.line_buffer_bytes,
        })
    }

    /// Open the file named by a sensory node.
    pub fn from_node(node: &Value) -> Result<Self, StreamError> {
        Self::from_node_with(node, &StreamConfig::default())
    }

    pub fn from_node_with(node: &Value, config: &StreamConfig) -> Result<Self, StreamError> {
        match node {
            Value::Node(n) if n.kind == NodeKind::Sensory => Self::open_with(&n.name, config),
            other => Err(StreamError::ExpectedSensory {
                kind: other.kind_name(),
            }),
        }
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }
}

impl StreamValue for FileStream {
    fn kind(&self) -> StreamKind {
        StreamKind::TextFile
    }

    fn value(&self) -> &[Value] {
        self.current.as_slice()
    }

    fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    fn update(&mut self) -> Result<(), StreamError> {
        if !self.handle.is_open() {
            self.current = None;
            return Ok(());
        }

        if self.fresh {
            self.fresh = false;
            self.current = Some(Value::item(self.locator.uri()));
            return Ok(());
        }

        read_into_slot(&mut self.handle, self.line_buffer_bytes, &mut self.current)
    }

    fn write(
        &mut self,
        ctx: &mut dyn EvaluationContext,
        silent: bool,
        input: Input,
    ) -> Result<Value, StreamError> {
        let Some(out) = self.handle.writer() else {
            return Err(StreamError::NotOpen {
                target: format!("URI \"{}\"", self.locator),
            });
        };
        write_out(out, ctx, silent, input)
    }

    fn halt(&mut self) {
        self.handle.halt();
        self.current = None;
    }
}

impl Producer for FileStream {
    fn next_batch(&mut self) -> Result<Vec<Value>, StreamError> {
        self.update()?;
        Ok(self.value().to_vec())
    }
}
