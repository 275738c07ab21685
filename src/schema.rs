//! Typed JSON parse/serialize for wire objects
//!
//! Thin layer over serde_json. Parsing is lenient: fields a wire schema does
//! not name are kept and reported back as a notice instead of failing the
//! parse, so a later stage can still attach that notice to its own error.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A JSON document shape with a fixed version
pub trait WireObject: DeserializeOwned + Serialize {
    /// Top-level keys the schema does not describe
    fn unknown_fields(&self) -> Vec<&str> {
        Vec::new()
    }
}

/// A successfully parsed wire object and the parser's best-effort notice
#[derive(Debug)]
pub struct Parsed<T> {
    pub value: T,
    pub notice: Option<String>,
}

/// Parse JSON text into a wire object
pub fn parse<T: WireObject>(text: &str) -> Result<Parsed<T>, serde_json::Error> {
    serde_json::from_str(text).map(with_notice)
}

/// Parse raw JSON bytes into a wire object
pub fn parse_bytes<T: WireObject>(bytes: &[u8]) -> Result<Parsed<T>, serde_json::Error> {
    serde_json::from_slice(bytes).map(with_notice)
}

fn with_notice<T: WireObject>(value: T) -> Parsed<T> {
    let unknown = value.unknown_fields();
    let notice = if unknown.is_empty() {
        None
    } else {
        Some(format!("unknown fields: {}", unknown.join(", ")))
    };
    Parsed { value, notice }
}

/// Serialize a wire object into compact JSON text
pub fn serialize<T: WireObject>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}
