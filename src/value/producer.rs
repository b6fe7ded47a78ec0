use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::StreamError;
use crate::value::Value;

/// Source of a streaming value.
///
/// Each call re-evaluates the source and returns its current batch. An empty
/// batch means the source is exhausted.
pub trait Producer: Send {
    fn next_batch(&mut self) -> Result<Vec<Value>, StreamError>;
}

/// Shared handle to a [`Producer`], so a streaming value can sit inside a
/// [`Value`] while its holder keeps access to it.
#[derive(Clone)]
pub struct SharedProducer {
    inner: Arc<Mutex<dyn Producer>>,
}

impl SharedProducer {
    pub fn new<P: Producer + 'static>(producer: P) -> Self {
        Self {
            inner: Arc::new(Mutex::new(producer)),
        }
    }

    /// Wrap a producer the caller already shares.
    pub fn from_shared<P: Producer + 'static>(producer: Arc<Mutex<P>>) -> Self {
        Self { inner: producer }
    }

    pub fn next_batch(&self) -> Result<Vec<Value>, StreamError> {
        self.inner.lock().next_batch()
    }
}

impl fmt::Debug for SharedProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedProducer")
            .field("ptr", &Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

/// Two handles are equal when they share the same producer.
impl PartialEq for SharedProducer {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.inner).cast::<()>(),
            Arc::as_ptr(&other.inner).cast::<()>(),
        )
    }
}
