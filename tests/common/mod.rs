//! Shared test utilities and mock collaborators.

#![allow(dead_code, unused_imports)]

use parking_lot::Mutex;
use sensory::value::{EvaluationContext, Expression, Producer, Value};
use sensory::StreamError;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

pub type SpyBuffer = Arc<Mutex<Vec<u8>>>;

/// `file://` locator for `name` inside `dir`.
pub fn file_uri(dir: &TempDir, name: &str) -> String {
    format!("file://{}", dir.path().join(name).display())
}

/// Create `name` in `dir` with `content` and return its locator.
pub fn file_with(dir: &TempDir, name: &str, content: &str) -> String {
    std::fs::write(dir.path().join(name), content).expect("Failed to write fixture");
    file_uri(dir, name)
}

pub fn read_back(dir: &TempDir, name: &str) -> String {
    std::fs::read_to_string(dir.path().join(name)).expect("Failed to read back file")
}

// -- Writers ------------------------------------------------------------------

/// Writer that records all bytes and counts flushes.
pub struct SpyWriter {
    buf: SpyBuffer,
    flushes: Arc<AtomicUsize>,
}

impl SpyWriter {
    pub fn new() -> Self {
        Self {
            buf: Arc::new(Mutex::new(Vec::new())),
            flushes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl std::io::Write for SpyWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// -- Producers ----------------------------------------------------------------

/// Returns the scripted batches in order, then empty batches forever.
pub struct ScriptedProducer {
    batches: VecDeque<Vec<Value>>,
    pulls: Arc<AtomicUsize>,
}

impl ScriptedProducer {
    pub fn new(batches: Vec<Vec<Value>>) -> (Self, Arc<AtomicUsize>) {
        let pulls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                batches: batches.into(),
                pulls: Arc::clone(&pulls),
            },
            pulls,
        )
    }
}

impl Producer for ScriptedProducer {
    fn next_batch(&mut self) -> Result<Vec<Value>, StreamError> {
        self.pulls.fetch_add(1, Ordering::SeqCst);
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}

/// Returns the same batch forever.
pub struct RepeatingProducer {
    batch: Vec<Value>,
    pulls: Arc<AtomicUsize>,
}

impl RepeatingProducer {
    pub fn new(batch: Vec<Value>) -> (Self, Arc<AtomicUsize>) {
        let pulls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                batch,
                pulls: Arc::clone(&pulls),
            },
            pulls,
        )
    }
}

impl Producer for RepeatingProducer {
    fn next_batch(&mut self) -> Result<Vec<Value>, StreamError> {
        self.pulls.fetch_add(1, Ordering::SeqCst);
        Ok(self.batch.clone())
    }
}

// -- Evaluation context -------------------------------------------------------

/// Evaluation context backed by a table of expression results.
#[derive(Default)]
pub struct MapContext {
    results: HashMap<String, Option<Value>>,
    pub interned: Vec<Value>,
    pub executed: Vec<(String, bool)>,
}

impl MapContext {
    pub fn with(mut self, expression: &str, result: Option<Value>) -> Self {
        self.results.insert(expression.to_string(), result);
        self
    }
}

impl EvaluationContext for MapContext {
    fn intern(&mut self, value: Value) -> Value {
        self.interned.push(value.clone());
        value
    }

    fn execute(
        &mut self,
        expression: &Expression,
        silent: bool,
    ) -> Result<Option<Value>, StreamError> {
        self.executed.push((expression.text().to_string(), silent));
        self.results
            .get(expression.text())
            .cloned()
            .ok_or_else(|| StreamError::Evaluation {
                expression: expression.to_string(),
                message: "unknown expression".to_string(),
            })
    }
}
