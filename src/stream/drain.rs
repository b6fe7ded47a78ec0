use std::io::Write;

use crate::error::StreamError;
use crate::stream::writer::write_value;
use crate::value::SharedProducer;

/// Counters from one drain.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainStats {
    /// Non-empty batches pulled.
    pub batches: usize,
    pub written: usize,
    /// Empty sequences passed over.
    pub skipped: usize,
}

/// Write every batch of `source` to `out` until the source runs dry.
///
/// Stops on an empty batch, or on a batch made only of empty sequences:
/// some producers degrade into emitting those forever. That check is a
/// heuristic; a producer that keeps returning other values never stops.
/// `out` is flushed after each batch.
pub fn drain<W: Write>(out: &mut W, source: &SharedProducer) -> Result<DrainStats, StreamError> {
    let mut stats = DrainStats::default();

    loop {
        let batch = source.next_batch()?;
        if batch.is_empty() {
            break;
        }
        stats.batches += 1;

        let mut written = 0;
        for value in &batch {
            if value.is_empty_sequence() {
                stats.skipped += 1;
                continue;
            }
            write_value(out, value)?;
            written += 1;
        }
        out.flush()?;
        stats.written += written;

        if written == 0 {
            tracing::debug!("Batch held only empty sequences, stopping drain");
            break;
        }
    }

    tracing::debug!(
        batches = stats.batches,
        written = stats.written,
        skipped = stats.skipped,
        "Drained streaming value"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Producer, Value};

    struct Batches(Vec<Vec<Value>>);

    impl Producer for Batches {
        fn next_batch(&mut self) -> Result<Vec<Value>, StreamError> {
            if self.0.is_empty() {
                return Ok(Vec::new());
            }
            Ok(self.0.remove(0))
        }
    }

    #[test]
    fn test_mixed_batch_skips_empty_sequences() {
        let source = SharedProducer::new(Batches(vec![vec![
            Value::Sequence(vec![]),
            Value::item("kept"),
        ]]));
        let mut out = Vec::new();

        let stats = drain(&mut out, &source).unwrap();

        assert_eq!(out, b" kept");
        assert_eq!(
            stats,
            DrainStats {
                batches: 1,
                written: 1,
                skipped: 1
            }
        );
    }

    #[test]
    fn test_error_mid_drain_is_surfaced() {
        let source = SharedProducer::new(Batches(vec![
            vec![Value::item("a")],
            vec![Value::Floats(vec![2.0])],
        ]));
        let mut out = Vec::new();

        let err = drain(&mut out, &source).unwrap_err();

        assert_eq!(err.category(), "type_mismatch");
        assert_eq!(out, b" a");
    }
}
