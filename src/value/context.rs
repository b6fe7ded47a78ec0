use crate::error::StreamError;
use crate::value::{Expression, Value};

/// The surrounding graph system, as seen by a stream value.
pub trait EvaluationContext {
    /// Register `value` and return its canonical representation.
    fn intern(&mut self, value: Value) -> Value;

    /// Evaluate an executable input. `Ok(None)` means it produced nothing.
    fn execute(
        &mut self,
        expression: &Expression,
        silent: bool,
    ) -> Result<Option<Value>, StreamError>;
}

/// Context for callers that are not attached to a graph: values are their
/// own canonical form and nothing is executable.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedContext;

impl EvaluationContext for DetachedContext {
    fn intern(&mut self, value: Value) -> Value {
        value
    }

    fn execute(
        &mut self,
        expression: &Expression,
        _silent: bool,
    ) -> Result<Option<Value>, StreamError> {
        Err(StreamError::Evaluation {
            expression: expression.to_string(),
            message: "no evaluator attached".to_string(),
        })
    }
}
