//! Normalization of raw AI worker output.
//!
//! Model output arrives either as Mermaid text or as a JSON payload, and in
//! both cases is frequently wrapped in a markdown code fence. Mermaid text
//! only needs the fence stripped; JSON additionally gets parsed and
//! reserialized so that downstream consumers never see invalid JSON. Model
//! output sometimes arrives with its escapes mangled (doubly escaped or not
//! escaped at all), so normalization makes three attempts: the payload as-is,
//! an unescape pass, then a re-escape pass. If none of them produce valid
//! JSON the payload is rejected with [`FormatError`].

use crate::analysis::DiagramFormat;
use crate::error::{FormatError, FormatResult};

/// Remove markdown code-fence markers from `text`.
///
/// A language-tagged opening fence (matched case-insensitively) swallows the
/// whitespace that follows it; remaining bare ``` markers are removed
/// wherever they appear.
pub fn strip_code_fence(text: &str, language: Option<&str>) -> String {
    let mut cleaned = match language {
        Some(lang) => remove_marker(text, &format!("```{lang}")),
        None => text.to_string(),
    };
    cleaned = cleaned.replace("```", "");
    cleaned
}

fn remove_marker(text: &str, marker: &str) -> String {
    let haystack = text.to_ascii_lowercase();
    let needle = marker.to_ascii_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    while let Some(found) = haystack[cursor..].find(&needle) {
        let start = cursor + found;
        out.push_str(&text[cursor..start]);
        let mut end = start + needle.len();
        while let Some(c) = text[end..].chars().next() {
            if !c.is_whitespace() {
                break;
            }
            end += c.len_utf8();
        }
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Normalize a Mermaid diagram response: strip fences and surrounding
/// whitespace, pass the diagram text through untouched.
pub fn format_mermaid_response(text: &str) -> String {
    strip_code_fence(text, Some("mermaid")).trim().to_string()
}

/// Normalize a JSON response to a canonical serialization.
///
/// Idempotent: feeding the output back in yields the same string.
pub fn format_json_response(text: &str) -> FormatResult<String> {
    let mut cleaned = strip_code_fence(text, Some("json")).trim().to_string();

    if let Some(normalized) = attempt_normalize(&cleaned) {
        return Ok(normalized);
    }

    if cleaned.contains("\\n") || cleaned.contains('"') {
        let unescaped = cleaned
            .replace("\\n", "\n")
            .replace("\\\"", "\"")
            .replace("\\\\", "\\");

        if let Some(normalized) = attempt_normalize(&unescaped) {
            return Ok(normalized);
        }

        cleaned = unescaped;
    }

    let reescaped = cleaned
        .replace('\n', "\\n")
        .replace('"', "\\\"")
        .replace('\\', "\\\\");

    attempt_normalize(&reescaped).ok_or(FormatError::UnnormalizableJson)
}

fn attempt_normalize(value: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(value)
        .ok()
        .map(|parsed| parsed.to_string())
}

/// Normalize a response according to the diagram's output format.
pub fn format_diagram_response(format: DiagramFormat, text: &str) -> FormatResult<String> {
    match format {
        DiagramFormat::Structured => format_json_response(text),
        DiagramFormat::Mermaid => Ok(format_mermaid_response(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_mermaid_fence() {
        let raw = "```mermaid\nerDiagram\n  USER ||--o{ PROJECT : owns\n```";
        assert_eq!(
            format_mermaid_response(raw),
            "erDiagram\n  USER ||--o{ PROJECT : owns"
        );
    }

    #[test]
    fn fence_language_match_is_case_insensitive() {
        let raw = "```MERMAID\ngraph TD\n```";
        assert_eq!(format_mermaid_response(raw), "graph TD");
    }

    #[test]
    fn passes_unfenced_mermaid_through() {
        assert_eq!(format_mermaid_response("  graph LR  "), "graph LR");
    }

    #[test]
    fn normalizes_fenced_json() {
        let raw = "```json\n[{\"role\": \"admin\"}]\n```";
        assert_eq!(format_json_response(raw).unwrap(), r#"[{"role":"admin"}]"#);
    }

    #[test]
    fn json_normalization_is_idempotent() {
        let once = format_json_response(r#"[{"role":"admin","goal":"ship"}]"#).unwrap();
        let twice = format_json_response(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn recovers_escaped_json_via_unescape_pass() {
        // The model sometimes returns the JSON body with literal \n and \"
        // sequences instead of real newlines and quotes.
        let raw = "[{\\\"role\\\": \\\"admin\\\"}]";
        assert_eq!(format_json_response(raw).unwrap(), r#"[{"role":"admin"}]"#);
    }

    #[test]
    fn rejects_unrecoverable_json() {
        let result = format_json_response("not json at all");
        assert!(matches!(result, Err(FormatError::UnnormalizableJson)));
    }

    #[test]
    fn dispatches_on_diagram_format() {
        let mermaid = format_diagram_response(DiagramFormat::Mermaid, "```mermaid\ngraph TD\n```");
        assert_eq!(mermaid.unwrap(), "graph TD");

        let json = format_diagram_response(DiagramFormat::Structured, "```json\n[]\n```");
        assert_eq!(json.unwrap(), "[]");
    }
}
