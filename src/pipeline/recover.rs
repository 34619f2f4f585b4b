//! Recover a JSON summary embedded in free-form model output.
//!
//! Chat models asked for "a JSON object" often wrap it in prose or code
//! fences: `Here it is: {"summary": "..."} Hope this helps!`. Each `{` in the
//! reply is tried in turn as the start of a JSON value with serde_json's
//! stream deserializer, which stops at the end of the first complete value.
//! String literals and escapes are handled by the parser, so braces inside a
//! summary do not end the object early, and the object may span lines.
//!
//! The first `{` that starts a complete object wins. A `{` in prose fails
//! within a few bytes, and nesting is capped by serde_json's recursion
//! limit, so scanning stays cheap on long replies.

use crate::error::ProviderError;
use serde_json::{Deserializer, Value};

/// JSON member holding the summary text.
pub const SUMMARY_KEY: &str = "summary";

/// Return the first complete JSON object in `reply` and its source span.
///
/// # Errors
/// - [`ProviderError::NoJsonFound`]: no `{`, or every object is cut off
/// - [`ProviderError::MalformedJson`]: some `{` was followed by invalid JSON
///   and no later `{` starts a valid object
pub fn find_json_object(reply: &str) -> Result<(&str, Value), ProviderError> {
    let mut first_error: Option<serde_json::Error> = None;

    for (open, _) in reply.match_indices('{') {
        let rest = &reply[open..];
        let mut values = Deserializer::from_str(rest).into_iter::<Value>();
        match values.next() {
            Some(Ok(value)) => return Ok((&rest[..values.byte_offset()], value)),
            Some(Err(e)) if !e.is_eof() => {
                first_error.get_or_insert(e);
            }
            _ => {}
        }
    }

    Err(match first_error {
        Some(e) => ProviderError::MalformedJson {
            detail: e.to_string(),
        },
        None => ProviderError::NoJsonFound,
    })
}

/// Extract the summary string from a model reply.
///
/// # Errors
/// - [`ProviderError::NoJsonFound`] / [`ProviderError::MalformedJson`] from
///   [`find_json_object`]
/// - [`ProviderError::MissingSummaryKey`] — parsed, but no string `summary`
pub fn recover_summary(reply: &str) -> Result<String, ProviderError> {
    let (_, value) = find_json_object(reply)?;

    value
        .get(SUMMARY_KEY)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ProviderError::MissingSummaryKey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_wrapped_in_prose() {
        let reply = r#"Here is it: {"summary":"From page 2 to page 4, a storm."} done"#;
        assert_eq!(
            recover_summary(reply).unwrap(),
            "From page 2 to page 4, a storm."
        );
    }

    #[test]
    fn multi_line_object_in_code_fence() {
        let reply = "```json\n{\n  \"summary\": \"Line one.\\nLine two.\"\n}\n```";
        assert_eq!(recover_summary(reply).unwrap(), "Line one.\nLine two.");
    }

    #[test]
    fn braces_inside_string_do_not_truncate() {
        let reply = r#"{"summary":"The set {a, b} is closed under }-rotation."}"#;
        assert_eq!(
            recover_summary(reply).unwrap(),
            "The set {a, b} is closed under }-rotation."
        );
    }

    #[test]
    fn escaped_quotes_inside_string() {
        let reply = r#"{"summary":"He said \"{hi}\" twice."}"#;
        assert_eq!(recover_summary(reply).unwrap(), "He said \"{hi}\" twice.");
    }

    #[test]
    fn nested_objects_are_kept_whole() {
        let reply = r#"x {"meta":{"pages":[2,4]},"summary":"s"} y"#;
        let (span, _) = find_json_object(reply).unwrap();
        assert_eq!(span, r#"{"meta":{"pages":[2,4]},"summary":"s"}"#);
        assert_eq!(recover_summary(reply).unwrap(), "s");
    }

    #[test]
    fn no_braces_is_no_json() {
        assert_eq!(
            recover_summary("I cannot summarise this."),
            Err(ProviderError::NoJsonFound)
        );
    }

    #[test]
    fn unterminated_brace_is_no_json() {
        assert_eq!(
            recover_summary(r#"{"summary": "cut off"#),
            Err(ProviderError::NoJsonFound)
        );
    }

    #[test]
    fn unterminated_prefix_skipped_for_later_object() {
        let reply = r#"Note { this never closes... {"summary":"ok"}"#;
        assert_eq!(recover_summary(reply).unwrap(), "ok");
    }

    #[test]
    fn cut_off_object_skipped_for_inner_object() {
        let reply = r#"{"draft": [1, {"summary":"inner"}"#;
        assert_eq!(recover_summary(reply).unwrap(), "inner");
    }

    #[test]
    fn invalid_object_skipped_for_later_one() {
        let reply = r#"{summary: unquoted} {"summary":"later"}"#;
        assert_eq!(recover_summary(reply).unwrap(), "later");
    }

    #[test]
    fn only_invalid_objects_is_malformed() {
        assert!(matches!(
            recover_summary(r#"Result: {summary: unquoted}"#),
            Err(ProviderError::MalformedJson { .. })
        ));
    }

    #[test]
    fn many_unmatched_braces_before_object() {
        let mut reply = "{ ".repeat(50_000);
        reply.push_str(r#"{"summary":"found"}"#);
        assert_eq!(recover_summary(&reply).unwrap(), "found");

        let only_braces = "{".repeat(50_000);
        assert!(recover_summary(&only_braces).is_err());
    }

    #[test]
    fn missing_key_is_not_fabricated() {
        assert_eq!(
            recover_summary(r#"{"text":"something else"}"#),
            Err(ProviderError::MissingSummaryKey)
        );
    }

    #[test]
    fn non_string_summary_is_rejected() {
        assert_eq!(
            recover_summary(r#"{"summary":["a","b"]}"#),
            Err(ProviderError::MissingSummaryKey)
        );
    }
}
