//! Capability descriptors.
//!
//! A descriptor is rebuilt on every call; callers that want a canonical copy
//! intern it through their evaluation context.

use crate::stream::StreamKind;
use crate::value::Value;

/// Describe the commands a stream of `kind` accepts.
///
/// Each command is `Sequence[title, Sequence[connector...]]` and each
/// connector is `Sequence[direction, type]`.
pub fn describe(kind: StreamKind) -> Value {
    let mut commands = vec![write_command()];
    if kind == StreamKind::TextFile {
        commands.push(read_command());
    }
    Value::List(commands)
}

fn write_command() -> Value {
    command(
        "the write stuff command",
        vec![
            connector("command", Value::type_name("write")),
            connector("command", Value::type_name("item")),
            connector(
                "reply",
                Value::Sequence(vec![
                    Value::type_name("sequence"),
                    Value::type_name("strings"),
                ]),
            ),
        ],
    )
}

fn read_command() -> Value {
    command(
        "the read line command",
        vec![
            connector("command", Value::type_name("update")),
            connector("reply", Value::type_name("item")),
        ],
    )
}

fn command(title: &str, connectors: Vec<Value>) -> Value {
    Value::Sequence(vec![Value::item(title), Value::Sequence(connectors)])
}

fn connector(direction: &str, ty: Value) -> Value {
    Value::Sequence(vec![Value::item(direction), ty])
}
