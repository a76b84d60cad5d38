//! Response text helpers.

use lion_test_core::{Result, TestError};

/// Returns the trimmed text after the last `separator` in `message`.
///
/// A message without the separator is returned whole, trimmed.
///
/// # Errors
/// [`TestError::InvalidArgument`] if `separator` is empty.
pub fn get_response(message: &str, separator: &str) -> Result<String> {
    if separator.is_empty() {
        return Err(TestError::invalid_argument("Separator cannot be an empty string."));
    }
    let tail = message.rsplit(separator).next().unwrap_or(message);
    Ok(tail.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_after_last_separator() {
        assert_eq!(
            get_response("Error: session: token expired ", ":").unwrap(),
            "token expired"
        );
        assert_eq!(get_response("a -> b -> c", "->").unwrap(), "c");
    }

    #[test]
    fn test_missing_separator_returns_whole_message() {
        assert_eq!(get_response("  plain  ", "|").unwrap(), "plain");
    }

    #[test]
    fn test_trailing_separator_yields_empty() {
        assert_eq!(get_response("value:", ":").unwrap(), "");
    }

    #[test]
    fn test_empty_separator_rejected() {
        let err = get_response("message", "").unwrap_err();
        assert!(matches!(err, TestError::InvalidArgument(_)));
    }
}
