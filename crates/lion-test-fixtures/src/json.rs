//! JSON content assertions.

use lion_test_core::{Result, assert_same};
use serde::Serialize;
use serde_json::Value;

/// Asserts that `json` holds exactly the structure and values of `expected`.
///
/// Both sides are compared as parsed documents, so key order and whitespace
/// do not matter while types do (`1` and `"1"` differ).
///
/// # Errors
/// A JSON error if `json` does not parse or `expected` cannot be serialized,
/// [`lion_test_core::TestError::Assertion`] if the documents differ.
pub fn assert_json_content(json: &str, expected: impl Serialize) -> Result<()> {
    let actual: Value = serde_json::from_str(json)?;
    let expected = serde_json::to_value(expected)?;
    assert_same(&expected, &actual, "json content")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lion_test_core::TestError;
    use serde_json::json;

    #[test]
    fn test_matching_documents() {
        let body = r#"{ "status": "success",  "data": {"ids": [1, 2]}, "message": "ok" }"#;
        assert_json_content(
            body,
            json!({"message": "ok", "status": "success", "data": {"ids": [1, 2]}}),
        )
        .unwrap();
    }

    #[test]
    fn test_typed_expected_value() {
        #[derive(Serialize)]
        struct Response<'a> {
            code: u16,
            status: &'a str,
        }
        let expected = Response {
            code: 200,
            status: "success",
        };
        assert_json_content(r#"{"code":200,"status":"success"}"#, &expected).unwrap();
    }

    #[test]
    fn test_type_mismatch_fails() {
        let err = assert_json_content(r#"{"code":"200"}"#, json!({"code": 200})).unwrap_err();
        assert!(err.is_assertion());
        assert!(err.to_string().contains("json content"));
    }

    #[test]
    fn test_extra_key_fails() {
        let err = assert_json_content(r#"{"a":1,"b":2}"#, json!({"a": 1})).unwrap_err();
        assert!(err.is_assertion());
    }

    #[test]
    fn test_invalid_json() {
        let err = assert_json_content("{not json", json!({})).unwrap_err();
        assert!(matches!(err, TestError::Json(_)));
    }
}
