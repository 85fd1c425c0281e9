use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use sha2::{Digest, Sha256};
use std::io::{self, Write};

/// JSON formatter producing the canonical wire encoding used for hashing:
/// `", "` / `": "` separators and non-ASCII escaped as `\uXXXX`.
///
/// Key ordering comes from `serde_json::Value`, whose maps are sorted
/// (the `preserve_order` feature must stay disabled).
struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }
        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Serialize `value` into its canonical byte form (sorted keys, fixed
/// separators, ASCII-only output).
pub fn canonical_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let value = serde_json::to_value(value)?;
    let mut out = Vec::with_capacity(256);
    let mut ser = Serializer::with_formatter(&mut out, CanonicalFormatter);
    value.serialize(&mut ser)?;
    Ok(out)
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted_and_spaced() {
        let bytes = canonical_json(&json!({"b": 1, "a": [1, 2], "c": {"z": true, "y": null}}))
            .unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"a": [1, 2], "b": 1, "c": {"y": null, "z": true}}"#
        );
    }

    #[test]
    fn non_ascii_is_escaped() {
        let bytes = canonical_json(&json!({"name": "café 😀"})).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"name": "caf\u00e9 \ud83d\ude00"}"#
        );
    }

    #[test]
    fn control_characters_keep_json_escapes() {
        let bytes = canonical_json(&json!("a\"b\n")).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), r#""a\"b\n""#);
    }

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
