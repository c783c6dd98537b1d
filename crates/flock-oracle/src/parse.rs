//! Oracle response parsing into typed decisions.
//!
//! The oracle returns raw text (ideally JSON). This module extracts and
//! validates that text against the two structured schemas the platform
//! uses: the action schema (`option`, `content`, `explanation`) and the
//! boolean-choice schema (`choice`, `explanation`). Models occasionally
//! wrap JSON in markdown fences or leave trailing commas, so parsing
//! attempts multiple recovery strategies before giving up.

use serde::de::DeserializeOwned;

use flock_types::{ActionKind, ChosenAction, LinkVerdict};

use crate::error::OracleError;

/// Intermediate struct for the action schema.
///
/// `option` is kept loose because models sometimes answer with the
/// number quoted as a string.
#[derive(Debug, serde::Deserialize)]
struct RawActionResponse {
    option: serde_json::Value,
    #[serde(default)]
    content: String,
    #[serde(default)]
    explanation: String,
}

/// Intermediate struct for the boolean-choice schema.
#[derive(Debug, serde::Deserialize)]
struct RawBooleanResponse {
    choice: String,
    #[serde(default)]
    explanation: String,
}

/// Parse an oracle reply against the action schema.
///
/// # Errors
///
/// Returns [`OracleError::Parse`] if no recovery strategy yields valid
/// JSON. An unknown option number is not an error -- it maps to
/// [`ActionKind::Invalid`] so the platform can log it as a failed action.
pub fn parse_action(raw: &str) -> Result<ChosenAction, OracleError> {
    let parsed: RawActionResponse = try_parse(raw)?;
    let option = coerce_option(&parsed.option).ok_or_else(|| {
        OracleError::Parse(format!("action option is not a number: {}", parsed.option))
    })?;

    Ok(ChosenAction {
        kind: ActionKind::from_option(option),
        content: parsed.content,
        explanation: parsed.explanation,
    })
}

/// Parse an oracle reply against the boolean-choice schema.
///
/// Any choice other than `yes` (case-insensitive) is a negative verdict.
///
/// # Errors
///
/// Returns [`OracleError::Parse`] if no recovery strategy yields valid
/// JSON with a `choice` field.
pub fn parse_verdict(raw: &str) -> Result<LinkVerdict, OracleError> {
    let parsed: RawBooleanResponse = try_parse(raw)?;

    Ok(LinkVerdict {
        follow: parsed.choice.trim().eq_ignore_ascii_case("yes"),
        explanation: parsed.explanation,
    })
}

/// Intermediate struct for the biography schema.
#[derive(Debug, serde::Deserialize)]
struct RawBiographyResponse {
    biography: String,
}

/// Parse an oracle reply against the biography schema (`{"biography": ...}`).
///
/// # Errors
///
/// Returns [`OracleError::Parse`] if no recovery strategy yields valid
/// JSON with a `biography` field.
pub fn parse_biography(raw: &str) -> Result<String, OracleError> {
    let parsed: RawBiographyResponse = try_parse(raw)?;
    Ok(parsed.biography)
}

/// Attempt to deserialize through multiple recovery strategies:
/// 1. Direct `serde_json` deserialization
/// 2. Extract JSON from a markdown code block
/// 3. Strip trailing commas and retry
/// 4. Code block extraction followed by trailing-comma stripping
fn try_parse<T: DeserializeOwned>(raw: &str) -> Result<T, OracleError> {
    let trimmed = raw.trim();

    if let Ok(parsed) = serde_json::from_str::<T>(trimmed) {
        return Ok(parsed);
    }

    if let Some(json_str) = extract_json_from_codeblock(trimmed)
        && let Ok(parsed) = serde_json::from_str::<T>(json_str)
    {
        return Ok(parsed);
    }

    let cleaned = strip_trailing_commas(trimmed);
    if let Ok(parsed) = serde_json::from_str::<T>(&cleaned) {
        return Ok(parsed);
    }

    if let Some(json_str) = extract_json_from_codeblock(trimmed) {
        let cleaned_inner = strip_trailing_commas(json_str);
        if let Ok(parsed) = serde_json::from_str::<T>(&cleaned_inner) {
            return Ok(parsed);
        }
    }

    Err(OracleError::Parse(format!(
        "all parse strategies failed for: {trimmed}"
    )))
}

/// Coerce the loose `option` value into an integer.
fn coerce_option(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Extract the body of the first markdown code block, if any.
fn extract_json_from_codeblock(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = text.get(start.checked_add(3)?..)?;
    // Skip an optional language tag on the fence line.
    let body_start = after_fence.find('\n').map_or(0, |i| i.saturating_add(1));
    let body = after_fence.get(body_start..)?;
    let end = body.find("```")?;
    body.get(..end).map(str::trim)
}

/// Remove trailing commas before closing braces/brackets.
fn strip_trailing_commas(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c == ',' {
            // Look ahead past whitespace for a closing delimiter.
            let next_significant = chars.clone().find(|ch| !ch.is_whitespace());
            if matches!(next_significant, Some('}' | ']')) {
                continue;
            }
        }
        result.push(c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_action_clean_json() {
        let raw = r#"{"option": 1, "content": "17", "explanation": "this post matches my views"}"#;
        let result = parse_action(raw);
        let Ok(action) = result else {
            assert!(result.is_ok());
            return;
        };
        assert_eq!(action.kind, ActionKind::Repost);
        assert_eq!(action.content, "17");
    }

    #[test]
    fn parse_action_quoted_option() {
        let raw = r#"{"option": "2", "content": "Can't believe this headline.", "explanation": "had to share"}"#;
        let result = parse_action(raw);
        let Ok(action) = result else {
            assert!(result.is_ok());
            return;
        };
        assert_eq!(action.kind, ActionKind::Post);
    }

    #[test]
    fn parse_action_unknown_option_is_invalid_kind() {
        let raw = r#"{"option": 7, "content": "", "explanation": "confused"}"#;
        let result = parse_action(raw);
        let Ok(action) = result else {
            assert!(result.is_ok());
            return;
        };
        assert_eq!(action.kind, ActionKind::Invalid);
    }

    #[test]
    fn parse_action_from_codeblock() {
        let raw = "Here is my choice:\n```json\n{\"option\": 3, \"content\": \"\", \"explanation\": \"just watching today\"}\n```";
        let result = parse_action(raw);
        let Ok(action) = result else {
            assert!(result.is_ok());
            return;
        };
        assert_eq!(action.kind, ActionKind::Noop);
    }

    #[test]
    fn parse_action_trailing_comma_recovered() {
        let raw = "{\"option\": 1, \"content\": \"4\", \"explanation\": \"agree strongly\",}";
        let result = parse_action(raw);
        assert!(result.is_ok());
    }

    #[test]
    fn parse_action_garbage_fails() {
        let result = parse_action("I would like to repost post 4, thanks!");
        assert!(result.is_err());
    }

    #[test]
    fn parse_verdict_yes_and_no() {
        let yes = parse_verdict(r#"{"choice": "Yes", "explanation": "we share a worldview"}"#);
        let no = parse_verdict(r#"{"choice": "no", "explanation": "not my kind of poster"}"#);
        assert_eq!(yes.ok().map(|v| v.follow), Some(true));
        assert_eq!(no.ok().map(|v| v.follow), Some(false));
    }

    #[test]
    fn parse_verdict_other_token_is_negative() {
        let result = parse_verdict(r#"{"choice": "maybe", "explanation": "unsure"}"#);
        assert_eq!(result.ok().map(|v| v.follow), Some(false));
    }

    #[test]
    fn parse_verdict_missing_choice_fails() {
        let result = parse_verdict(r#"{"explanation": "no choice field"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn parse_biography_from_codeblock() {
        let raw = "```json\n{\"biography\": \"ohio born, coffee powered, opinions my own\"}\n```";
        let result = parse_biography(raw);
        assert_eq!(
            result.ok().as_deref(),
            Some("ohio born, coffee powered, opinions my own")
        );
    }

    #[test]
    fn strip_trailing_commas_preserves_inner_commas() {
        let cleaned = strip_trailing_commas(r#"{"a": 1, "b": [1, 2, 3,],}"#);
        assert_eq!(cleaned, r#"{"a": 1, "b": [1, 2, 3]}"#);
    }
}
