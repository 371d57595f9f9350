//! JSON payload precondition checks.

use crate::error::ValidationError;

/// Returns whether `input` parses as JSON. Parse failures are logged.
pub fn is_valid_json(input: &str) -> bool {
    match ensure_valid_json(input) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "payload is not valid JSON");
            false
        }
    }
}

/// Fail-fast form of [`is_valid_json`] for use before network I/O.
pub fn ensure_valid_json(input: &str) -> Result<(), ValidationError> {
    serde_json::from_str::<serde_json::Value>(input)
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_documents() {
        for input in [
            r#"{"osMinimumVersion":"26.0.1"}"#,
            "[]",
            "\"text\"",
            "42",
            "null",
            "  {\n  \"a\": [1, 2, {\"b\": false}]\n}  ",
        ] {
            assert!(is_valid_json(input), "expected valid: {input}");
            assert!(ensure_valid_json(input).is_ok());
        }
    }

    #[test]
    fn rejects_malformed_documents() {
        for input in ["", "{", "{\"a\":}", "{'a': 1}", "[1, 2,]", "undefined"] {
            assert!(!is_valid_json(input), "expected invalid: {input}");
            match ensure_valid_json(input) {
                Err(ValidationError::InvalidJson(detail)) => {
                    assert!(detail.contains("line 1"), "{input}: {detail}");
                }
                other => panic!("{input}: expected InvalidJson, got {other:?}"),
            }
        }
    }

    #[test]
    fn ensure_reports_parse_error() {
        let err = ensure_valid_json("{\"osMinimumVersion\": ").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidJson(_)));
        assert!(err.to_string().starts_with("Invalid JSON payload"));
    }
}
