//! Content writer: flattens a value tree into text.
//!
//! There is no cycle protection; value trees are acyclic by construction.

use std::io::Write;

use crate::error::StreamError;
use crate::value::Value;

/// Append the text form of `value` to `out`.
///
/// Nested streams contribute their next batch. The whole tree is checked for
/// unsupported kinds before any nested stream is pulled, so a rejected value
/// consumes nothing. A pulled batch is checked the same way before it is
/// rendered; if it holds an unsupported kind, that batch is lost.
pub fn render(value: &Value, out: &mut String) -> Result<(), StreamError> {
    reject_unsupported(value)?;
    render_checked(value, out)
}

fn reject_unsupported(value: &Value) -> Result<(), StreamError> {
    match value {
        Value::Floats(_) => Err(StreamError::TypeMismatch {
            kind: value.kind_name(),
        }),
        Value::Sequence(values) | Value::List(values) | Value::Set(values) => {
            values.iter().try_for_each(reject_unsupported)
        }
        Value::Strings(_) | Value::Node(_) | Value::Stream(_) => Ok(()),
    }
}

fn render_checked(value: &Value, out: &mut String) -> Result<(), StreamError> {
    match value {
        Value::Strings(items) => {
            for item in items {
                out.push_str(item);
            }
        }
        Value::Node(node) => {
            out.push(' ');
            out.push_str(&node.name);
        }
        // List and Set are accepted for older inputs and unpacked like a
        // sequence.
        Value::Sequence(values) | Value::List(values) | Value::Set(values) => {
            for value in values {
                render_checked(value, out)?;
            }
        }
        Value::Stream(producer) => {
            let batch = producer.next_batch()?;
            batch.iter().try_for_each(reject_unsupported)?;
            for value in &batch {
                render_checked(value, out)?;
            }
        }
        Value::Floats(_) => {
            return Err(StreamError::TypeMismatch {
                kind: value.kind_name(),
            })
        }
    }
    Ok(())
}

/// Serialize `value` and write it in one piece. Nothing reaches `out` when
/// any part of the value is unsupported.
pub fn write_value<W: Write>(out: &mut W, value: &Value) -> Result<(), StreamError> {
    let mut text = String::new();
    render(value, &mut text)?;
    out.write_all(text.as_bytes())?;
    Ok(())
}
