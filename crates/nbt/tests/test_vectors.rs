//! Tests using the `documents.json` test vectors.

use nbt::decode::from_slice;
use nbt::encode::to_vec;
use nbt::parse::parse;
use nbt::print::{Layout, PrintOptions, render};
use nbt::{NamedTag, TagString};
use serde::Deserialize;

fn hex_to_bytes(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
        .collect()
}

#[derive(Deserialize)]
struct TestVectors {
    documents: Vec<DocumentTest>,
    decode_errors: Vec<DecodeErrorTest>,
    parse_errors: Vec<ParseErrorTest>,
}

#[derive(Deserialize)]
struct DocumentTest {
    name: String,
    root_name: String,
    /// Compact rendering.
    text: String,
    /// Uncompressed binary form.
    bytes: String,
}

#[derive(Deserialize)]
struct DecodeErrorTest {
    name: String,
    bytes: String,
    error: String,
}

#[derive(Deserialize)]
struct ParseErrorTest {
    text: String,
    offset: usize,
    message: String,
}

const COMPACT: PrintOptions = PrintOptions {
    layout: Layout::Compact,
    color: false,
};

fn load_test_vectors() -> TestVectors {
    let json = include_str!("testdata/documents.json");
    serde_json::from_str(json).expect("Failed to parse test vectors")
}

#[test]
fn test_decode_vectors() {
    let vectors = load_test_vectors();

    for test in &vectors.documents {
        let bytes = hex_to_bytes(&test.bytes);
        let root = from_slice(&bytes)
            .unwrap_or_else(|e| panic!("Failed to decode {}: {e}", test.name));
        assert_eq!(root.name, test.root_name.as_str(), "Wrong root name for: {}", test.name);
        assert_eq!(
            render(&root, &COMPACT).unwrap(),
            test.text,
            "Wrong rendering for: {}",
            test.name
        );
    }
}

#[test]
fn test_parse_vectors() {
    let vectors = load_test_vectors();

    for test in &vectors.documents {
        let parsed = parse(&test.text)
            .unwrap_or_else(|e| panic!("Failed to parse {}: {e}", test.name));
        let decoded = from_slice(&hex_to_bytes(&test.bytes)).unwrap();
        assert_eq!(parsed.value, decoded.value, "Wrong tree for: {}", test.name);
    }
}

#[test]
fn test_encode_vectors() {
    let vectors = load_test_vectors();

    for test in &vectors.documents {
        let parsed = parse(&test.text).unwrap();
        let root = NamedTag {
            name: TagString::try_from(test.root_name.as_str()).unwrap(),
            value: parsed.value,
        };
        assert_eq!(
            to_vec(&root).unwrap(),
            hex_to_bytes(&test.bytes),
            "Wrong bytes for: {}",
            test.name
        );
    }
}

#[test]
fn test_decode_error_vectors() {
    let vectors = load_test_vectors();

    for test in &vectors.decode_errors {
        let err = from_slice(&hex_to_bytes(&test.bytes))
            .expect_err(&format!("Expected failure for: {}", test.name));
        assert_eq!(err.to_string(), test.error, "Wrong error for: {}", test.name);
    }
}

#[test]
fn test_parse_error_vectors() {
    let vectors = load_test_vectors();

    for test in &vectors.parse_errors {
        let err = parse(&test.text).expect_err(&format!("Expected failure for: {:?}", test.text));
        let root = err.innermost();
        assert_eq!(
            (root.offset, root.message.as_str()),
            (test.offset, test.message.as_str()),
            "Wrong root cause for: {:?}",
            test.text
        );
    }
}
