//! Projection of worker response envelopes into analysis records.

use tracing::warn;

use super::registry::{DiagramFormat, DiagramKind};
use super::types::{AiAnalysis, DiagramContent, DiagramStatus, UserStory};
use crate::format::{format_json_response, format_mermaid_response};
use crate::worker::types::{DiagramResult, WorkerEnvelope};

/// Project a full worker envelope into an analysis record.
///
/// Entries for unrecognized diagram identifiers are skipped. Content is
/// populated only for entries flagged successful with a result payload;
/// a `user-stories` payload that fails to parse as a story list is logged
/// and omitted while its status is still honored. Statuses are copied only
/// when the envelope carries one.
pub fn transform_envelope(envelope: &WorkerEnvelope) -> AiAnalysis {
    let mut analysis = AiAnalysis::default();

    for (id, entry) in &envelope.results {
        match DiagramKind::parse(id) {
            Some(kind) => apply_entry(&mut analysis, kind, entry),
            None => warn!(diagram = %id, "Ignoring result for unknown diagram kind"),
        }
    }

    analysis
}

fn apply_entry(analysis: &mut AiAnalysis, kind: DiagramKind, entry: &DiagramResult) {
    if entry.success {
        if let Some(payload) = &entry.result {
            match kind.format() {
                DiagramFormat::Structured => match parse_stories(&payload.text) {
                    Ok(stories) => analysis.set_content(kind, DiagramContent::Stories(stories)),
                    Err(error) => {
                        warn!(diagram = %kind, %error, "Failed to parse user stories payload");
                    }
                },
                DiagramFormat::Mermaid => {
                    let text = format_mermaid_response(&payload.text);
                    analysis.set_content(kind, DiagramContent::Mermaid(text));
                }
            }
        }
    }

    if let Some(status) = entry.status {
        analysis.set_status(kind, status);
    }
}

fn parse_stories(text: &str) -> Result<Vec<UserStory>, String> {
    let normalized = format_json_response(text).map_err(|e| e.to_string())?;
    serde_json::from_str::<Vec<UserStory>>(&normalized).map_err(|e| e.to_string())
}

/// Project a single diagram's `{content, status}` pair out of an envelope.
///
/// The returned patch touches at most one content field and exactly one
/// status field. When the envelope carries no status for the kind (including
/// when it never mentions the kind at all), the status defaults to `failed`;
/// absence of a status is never treated as success, and success is never
/// inferred from the presence of `result.text` alone.
pub fn extract_partial(kind: DiagramKind, envelope: &WorkerEnvelope) -> AiAnalysis {
    let transformed = transform_envelope(envelope);
    let mut partial = AiAnalysis::default();

    if let Some(status) = transformed.status_of(kind) {
        partial.set_status(kind, status);
    }
    if let Some(content) = transformed.content_of(kind) {
        partial.set_content(kind, content);
    }

    if partial.status_of(kind).is_none() {
        partial.set_status(kind, DiagramStatus::Failed);
    }

    partial
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> WorkerEnvelope {
        serde_json::from_value(value).expect("test envelope should deserialize")
    }

    #[test]
    fn copies_mermaid_content_and_status() {
        let env = envelope(json!({
            "results": {
                "erd": {
                    "success": true,
                    "status": "completed",
                    "result": { "text": "erDiagram\n  USER" }
                }
            }
        }));

        let analysis = transform_envelope(&env);
        assert_eq!(analysis.erd.as_deref(), Some("erDiagram\n  USER"));
        assert_eq!(analysis.erd_status, Some(DiagramStatus::Completed));
    }

    #[test]
    fn strips_fences_from_mermaid_content() {
        let env = envelope(json!({
            "results": {
                "gantt": {
                    "success": true,
                    "status": "completed",
                    "result": { "text": "```mermaid\ngantt\n```" }
                }
            }
        }));

        assert_eq!(transform_envelope(&env).gantt.as_deref(), Some("gantt"));
    }

    #[test]
    fn parses_user_stories_array() {
        let stories = json!([
            { "role": "admin", "goal": "see usage", "benefit": "plan capacity" }
        ]);
        let env = envelope(json!({
            "results": {
                "user-stories": {
                    "success": true,
                    "status": "completed",
                    "result": { "text": stories.to_string() }
                }
            }
        }));

        let analysis = transform_envelope(&env);
        let parsed = analysis.user_stories.expect("stories should be present");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].role, "admin");
        assert_eq!(analysis.user_stories_status, Some(DiagramStatus::Completed));
    }

    #[test]
    fn malformed_user_stories_keep_status_but_drop_content() {
        let env = envelope(json!({
            "results": {
                "user-stories": {
                    "success": true,
                    "status": "completed",
                    "result": { "text": "{ \"not\": \"an array\" }" }
                }
            }
        }));

        let analysis = transform_envelope(&env);
        assert_eq!(analysis.user_stories, None);
        assert_eq!(analysis.user_stories_status, Some(DiagramStatus::Completed));
    }

    #[test]
    fn unsuccessful_entry_contributes_no_content() {
        let env = envelope(json!({
            "results": {
                "c4": {
                    "success": false,
                    "status": "failed",
                    "error": "model refused",
                    "result": { "text": "stale" }
                }
            }
        }));

        let analysis = transform_envelope(&env);
        assert_eq!(analysis.c4, None);
        assert_eq!(analysis.c4_status, Some(DiagramStatus::Failed));
    }

    #[test]
    fn unknown_kinds_are_skipped() {
        let env = envelope(json!({
            "results": {
                "flowchart": {
                    "success": true,
                    "status": "completed",
                    "result": { "text": "graph TD" }
                }
            }
        }));

        assert!(transform_envelope(&env).is_empty());
    }

    #[test]
    fn partial_defaults_missing_status_to_failed() {
        let env = envelope(json!({ "results": {} }));
        let partial = extract_partial(DiagramKind::Kanban, &env);

        assert_eq!(partial.kanban_status, Some(DiagramStatus::Failed));
        assert_eq!(partial.kanban, None);
        assert_eq!(
            serde_json::to_value(&partial).unwrap(),
            json!({ "kanbanStatus": "failed" })
        );
    }

    #[test]
    fn partial_does_not_infer_success_from_text_presence() {
        // Entry has text but no status field: the stricter contract applies.
        let env = envelope(json!({
            "results": {
                "erd": {
                    "success": true,
                    "result": { "text": "erDiagram" }
                }
            }
        }));

        let partial = extract_partial(DiagramKind::Erd, &env);
        assert_eq!(partial.erd_status, Some(DiagramStatus::Failed));
        assert_eq!(partial.erd.as_deref(), Some("erDiagram"));
    }

    #[test]
    fn partial_ignores_other_diagrams_in_the_envelope() {
        let env = envelope(json!({
            "results": {
                "erd": {
                    "success": true,
                    "status": "completed",
                    "result": { "text": "erDiagram" }
                },
                "gantt": {
                    "success": true,
                    "status": "completed",
                    "result": { "text": "gantt" }
                }
            }
        }));

        let partial = extract_partial(DiagramKind::Erd, &env);
        assert_eq!(partial.erd.as_deref(), Some("erDiagram"));
        assert_eq!(partial.gantt, None);
        assert_eq!(partial.gantt_status, None);
    }
}
