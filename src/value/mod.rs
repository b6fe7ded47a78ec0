//! Values exchanged with stream values.
//!
//! [`Value`] is a closed set of shapes. The content writer matches on it
//! exhaustively, so adding a variant means deciding how it is serialized.

mod context;
mod producer;

use std::fmt;

pub use context::{DetachedContext, EvaluationContext};
pub use producer::{Producer, SharedProducer};

/// Role of a named scalar item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Plain item: produced lines, echoed locators.
    Item,
    /// A node whose name is a resource locator.
    Sensory,
    /// Names a value or command type; used by capability descriptors.
    Type,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    pub kind: NodeKind,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Node(Node),
    /// Tagged string container; items are written verbatim.
    Strings(Vec<String>),
    /// Generic nested-value container.
    Sequence(Vec<Value>),
    /// Legacy ordered list wrapper.
    List(Vec<Value>),
    /// Legacy unordered set wrapper.
    Set(Vec<Value>),
    Floats(Vec<f64>),
    /// Lazily produced, possibly unbounded sequence of batches.
    Stream(SharedProducer),
}

impl Value {
    pub fn item(name: impl Into<String>) -> Self {
        Value::Node(Node {
            kind: NodeKind::Item,
            name: name.into(),
        })
    }

    pub fn sensory(name: impl Into<String>) -> Self {
        Value::Node(Node {
            kind: NodeKind::Sensory,
            name: name.into(),
        })
    }

    pub fn type_name(name: impl Into<String>) -> Self {
        Value::Node(Node {
            kind: NodeKind::Type,
            name: name.into(),
        })
    }

    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Strings(items.into_iter().map(Into::into).collect())
    }

    pub fn stream<P: Producer + 'static>(producer: P) -> Self {
        Value::Stream(SharedProducer::new(producer))
    }

    /// Name reported in type-mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Node(node) => match node.kind {
                NodeKind::Item => "item",
                NodeKind::Sensory => "sensory",
                NodeKind::Type => "type",
            },
            Value::Strings(_) => "strings",
            Value::Sequence(_) => "sequence",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Floats(_) => "floats",
            Value::Stream(_) => "stream",
        }
    }

    /// Name of a node value, `None` for every other shape.
    pub fn name(&self) -> Option<&str> {
        match self {
            Value::Node(node) => Some(&node.name),
            _ => None,
        }
    }

    pub fn is_empty_sequence(&self) -> bool {
        matches!(self, Value::Sequence(values) if values.is_empty())
    }
}

/// What a stream's `write` receives.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Value(Value),
    /// Evaluated by the [`EvaluationContext`] before writing.
    Executable(Expression),
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Input::Value(value)
    }
}

impl From<Expression> for Input {
    fn from(expression: Expression) -> Self {
        Input::Executable(expression)
    }
}

/// Opaque executable expression. Only the evaluation context knows how to
/// run it; the text is used to name it in errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expression {
    text: String,
}

impl Expression {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
