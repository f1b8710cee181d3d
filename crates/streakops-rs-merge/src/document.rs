//! Decode/encode pair for JSON-kind config values.
//!
//! The remote service stores each payload as a string inside the record. On
//! the way out the payload is pretty-printed and every newline is replaced
//! with a CRLF, which the outer record serialization then escapes to the
//! literal `\r\n` text the service expects in POST bodies. The Velocity
//! template value never passes through here; it is patched as opaque text.

use crate::MergeError;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Decode a JSON-kind config value into its payload type.
pub fn decode_json<T: DeserializeOwned>(raw: &str) -> Result<T, MergeError> {
    Ok(serde_json::from_str(raw)?)
}

/// Encode a payload back into the escaped form the service expects.
pub fn encode_json<T: Serialize>(payload: &T) -> Result<String, MergeError> {
    Ok(pretty_json(payload)?.replace('\n', "\r\n"))
}

/// Pretty-print a payload without the CRLF convention, for the
/// human-reviewable `*_after_unescaped.json` files.
pub fn pretty_json<T: Serialize>(payload: &T) -> Result<String, MergeError> {
    Ok(serde_json::to_string_pretty(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    #[test]
    fn encode_decode_round_trips() {
        let payload = json!({"configs": [{"config_key": "a"}, {"config_key": "b"}]});
        let encoded = encode_json(&payload).unwrap();
        let decoded: Value = decode_json(&encoded).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn encode_uses_crlf_line_endings() {
        let encoded = encode_json(&json!({"a": 1})).unwrap();
        assert!(encoded.contains("\r\n"));
        assert!(!encoded.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn newlines_inside_strings_stay_escaped() {
        let payload = json!({"text": "line one\nline two"});
        let encoded = encode_json(&payload).unwrap();
        // The in-string newline is a JSON escape, untouched by the CRLF pass.
        assert!(encoded.contains("line one\\nline two"));
        let decoded: Value = decode_json(&encoded).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn decode_failure_is_a_decode_error() {
        let err = decode_json::<Value>("#set($x = 1)").unwrap_err();
        assert!(matches!(err, MergeError::Decode(_)));
    }
}
