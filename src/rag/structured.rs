//! Recovery of the `{answer, reasoning}` object from raw model text.
//!
//! Models asked for JSON sometimes wrap it in a code fence or reply in prose.
//! Recovery runs strip, unfence, parse, and falls back to the raw text when
//! parsing fails, so callers always get an answer.

use serde_json::Value;

/// Reasoning reported when the reply could not be parsed.
pub const FALLBACK_REASONING: &str = "Model did not return valid JSON after cleaning.";

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Answer and reasoning extracted from a model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredAnswer {
    pub answer: String,
    pub reasoning: String,
}

/// Which branch produced a [`StructuredAnswer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// The cleaned reply parsed as a JSON object.
    Parsed,
    /// The reply was kept verbatim as the answer.
    Fallback,
}

/// Trim surrounding whitespace.
pub fn strip(raw: &str) -> &str {
    raw.trim()
}

/// Remove code fence markers when the text starts with one.
///
/// Every occurrence of the JSON-tagged marker and of the bare marker is
/// removed, then the result is trimmed again.
pub fn unfence(text: &str) -> String {
    if !text.starts_with(FENCE) {
        return text.to_string();
    }
    text.replace(JSON_FENCE, "").replace(FENCE, "").trim().to_string()
}

/// Clean a raw reply: strip, then unfence.
pub fn clean(raw: &str) -> String {
    unfence(strip(raw))
}

/// Parse a cleaned reply as a JSON object.
///
/// Missing or null keys become empty strings; other non-string values keep
/// their JSON rendering. Anything that is not a JSON object yields `None`.
pub fn parse(cleaned: &str) -> Option<StructuredAnswer> {
    let Value::Object(map) = serde_json::from_str::<Value>(cleaned).ok()? else {
        return None;
    };

    let field = |key: &str| match map.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    Some(StructuredAnswer {
        answer: field("answer"),
        reasoning: field("reasoning"),
    })
}

/// Answer built from an unparseable reply: the raw text plus a diagnostic.
pub fn fallback(raw: &str) -> StructuredAnswer {
    StructuredAnswer {
        answer: raw.to_string(),
        reasoning: FALLBACK_REASONING.to_string(),
    }
}

/// Run the full recovery on a raw model reply. Never fails.
pub fn recover(raw: &str) -> (StructuredAnswer, Recovery) {
    match parse(&clean(raw)) {
        Some(parsed) => (parsed, Recovery::Parsed),
        None => (fallback(raw), Recovery::Fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(answer: &str, reasoning: &str) -> (StructuredAnswer, Recovery) {
        (
            StructuredAnswer {
                answer: answer.to_string(),
                reasoning: reasoning.to_string(),
            },
            Recovery::Parsed,
        )
    }

    #[test]
    fn test_json_fenced_reply() {
        let raw = "```json\n{\"answer\":\"X\",\"reasoning\":\"Y\"}\n```";
        assert_eq!(recover(raw), parsed("X", "Y"));
    }

    #[test]
    fn test_bare_fenced_reply_with_padding() {
        let raw = "  \n```\n{\"answer\": \"X\", \"reasoning\": \"Y\"}\n```  \n";
        assert_eq!(recover(raw), parsed("X", "Y"));
    }

    #[test]
    fn test_fencing_does_not_change_parse() {
        let bodies = [
            r#"{"answer": "Rick", "reasoning": "He owns the cafe."}"#,
            r#"{"answer": "", "reasoning": ""}"#,
            r#"{"answer": "only answer"}"#,
        ];
        for body in bodies {
            let direct = parse(body);
            assert!(direct.is_some());
            assert_eq!(parse(&clean(&format!("```json\n{}\n```", body))), direct);
            assert_eq!(parse(&clean(&format!("```\n{}\n```", body))), direct);
        }
    }

    #[test]
    fn test_prose_falls_back_to_raw_text() {
        let raw = "  The butler did it, obviously.  ";
        let (answer, recovery) = recover(raw);
        assert_eq!(recovery, Recovery::Fallback);
        assert_eq!(answer.answer, raw);
        assert_eq!(answer.reasoning, "Model did not return valid JSON after cleaning.");
    }

    #[test]
    fn test_broken_json_in_fence_keeps_unstripped_raw() {
        let raw = "```json\n{\"answer\": \"X\",\n```";
        let (answer, recovery) = recover(raw);
        assert_eq!(recovery, Recovery::Fallback);
        assert_eq!(answer.answer, raw);
        assert_eq!(answer.reasoning, FALLBACK_REASONING);
    }

    #[test]
    fn test_missing_keys_default_to_empty() {
        assert_eq!(recover(r#"{"reasoning": "no answer"}"#), parsed("", "no answer"));
        assert_eq!(recover("{}"), parsed("", ""));
        assert_eq!(recover(r#"{"answer": null, "reasoning": "r"}"#), parsed("", "r"));
    }

    #[test]
    fn test_non_string_values_keep_json_rendering() {
        assert_eq!(recover(r#"{"answer": 1982, "reasoning": ["a", "b"]}"#), parsed("1982", r#"["a","b"]"#));
    }

    #[test]
    fn test_non_object_json_falls_back() {
        for raw in ["[1, 2, 3]", "\"just a string\"", "42"] {
            let (answer, recovery) = recover(raw);
            assert_eq!(recovery, Recovery::Fallback, "{}", raw);
            assert_eq!(answer.answer, raw);
        }
    }

    #[test]
    fn test_unfence_leaves_unfenced_text_alone() {
        assert_eq!(unfence("prefix ```json {} ```"), "prefix ```json {} ```");
        assert_eq!(strip("\t x \n"), "x");
    }
}
