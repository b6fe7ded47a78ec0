mod common;

use common::{ScriptedProducer, SpyWriter};
use sensory::stream::{render, write_value};
use sensory::value::Value;
use sensory::StreamError;
use std::sync::atomic::Ordering;

#[test]
fn test_sequence_of_strings_and_item() {
    let mut out = SpyWriter::new();
    let value = Value::Sequence(vec![Value::strings(["a", "b"]), Value::item("c")]);

    write_value(&mut out, &value).unwrap();

    assert_eq!(out.text(), "ab c");
}

#[test]
fn test_deep_nesting_flattens_depth_first() {
    let value = Value::Sequence(vec![
        Value::Sequence(vec![Value::item("1"), Value::Sequence(vec![Value::item("2")])]),
        Value::strings(["|"]),
        Value::Set(vec![Value::List(vec![Value::item("3")])]),
    ]);
    let mut text = String::new();

    render(&value, &mut text).unwrap();

    assert_eq!(text, " 1 2| 3");
}

#[test]
fn test_empty_containers_write_nothing() {
    let mut out = SpyWriter::new();
    write_value(&mut out, &Value::Sequence(vec![])).unwrap();
    write_value(&mut out, &Value::Strings(vec![])).unwrap();
    assert_eq!(out.text(), "");
}

#[test]
fn test_type_and_sensory_nodes_write_their_names() {
    let mut text = String::new();
    render(&Value::type_name("write"), &mut text).unwrap();
    render(&Value::sensory("file:///x"), &mut text).unwrap();
    assert_eq!(text, " write file:///x");
}

#[test]
fn test_raw_numbers_are_rejected_without_partial_output() {
    let mut out = SpyWriter::new();

    let err = write_value(&mut out, &Value::Floats(vec![42.0])).unwrap_err();
    assert!(matches!(err, StreamError::TypeMismatch { kind: "floats" }));

    let nested = Value::List(vec![Value::item("before"), Value::Floats(vec![1.0])]);
    let err = write_value(&mut out, &nested).unwrap_err();
    assert_eq!(err.to_string(), "Expecting strings, got floats");

    assert_eq!(out.text(), "");
}

#[test]
fn test_nested_stream_contributes_one_batch() {
    let (producer, pulls) = ScriptedProducer::new(vec![
        vec![Value::item("x"), Value::strings(["y"])],
        vec![Value::item("never")],
    ]);
    let value = Value::Sequence(vec![Value::strings(["<"]), Value::stream(producer)]);
    let mut text = String::new();

    render(&value, &mut text).unwrap();

    assert_eq!(text, "< xy");
    assert_eq!(pulls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unsupported_sibling_leaves_nested_stream_unpulled() {
    let (producer, pulls) = ScriptedProducer::new(vec![vec![Value::item("kept")]]);
    let source = sensory::value::SharedProducer::new(producer);
    let value = Value::Sequence(vec![
        Value::Stream(source.clone()),
        Value::Floats(vec![7.0]),
    ]);
    let mut out = SpyWriter::new();

    let err = write_value(&mut out, &value).unwrap_err();

    assert!(matches!(err, StreamError::TypeMismatch { kind: "floats" }));
    assert_eq!(pulls.load(Ordering::SeqCst), 0);
    assert_eq!(out.text(), "");
    // The batch is still there for the next reader.
    assert_eq!(source.next_batch().unwrap(), vec![Value::item("kept")]);
}
