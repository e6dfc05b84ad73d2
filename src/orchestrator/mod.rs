//! Fan-out of diagram generation over the worker, with partial persistence.
//!
//! The orchestrator runs one worker call per requested kind and folds the
//! normalized results into an aggregate report. Failures are contained to
//! the diagram they belong to: a failed Gantt call never stops the ERD from
//! completing and being persisted.

mod regenerate;

pub use regenerate::{regenerate_diagram, RegenerationError, RegenerationInput};

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::{extract_partial, AiAnalysis, DiagramContent, DiagramKind, DiagramStatus};
use crate::error::StoreResult;
use crate::worker::{GenerationRequest, WorkerClient};

/// Caller-supplied hooks for persisting per-diagram results as they arrive.
///
/// Patches obey the partial-record invariant: at most one content field and
/// one status field per diagram. Hooks may be invoked while other diagrams
/// of the same batch are still unprocessed.
#[async_trait]
pub trait AnalysisSink: Send + Sync {
    /// Persist the normalized `{content, status}` patch for one diagram.
    async fn persist_partial(&self, kind: DiagramKind, update: &AiAnalysis) -> StoreResult<()>;

    /// Persist a failed status for one diagram whose worker call failed.
    async fn persist_failure(&self, kind: DiagramKind, update: &AiAnalysis) -> StoreResult<()>;
}

/// Outcome of one diagram in a generation batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramOutcome {
    /// Final status for the diagram.
    pub status: DiagramStatus,
    /// Normalized content, when generation produced any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<DiagramContent>,
    /// Failure detail, when the diagram did not complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate result of a generation batch.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    /// False if any requested diagram failed; completed diagrams are still
    /// present in `results` either way.
    pub success: bool,
    /// Per-diagram outcomes.
    pub results: HashMap<DiagramKind, DiagramOutcome>,
    /// Detail of the first failure, for user-facing messaging. Does not
    /// imply other diagrams failed too.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_error: Option<String>,
}

/// Orchestrates diagram generation batches against one worker client.
pub struct DiagramOrchestrator {
    client: WorkerClient,
}

impl DiagramOrchestrator {
    /// Create an orchestrator around a worker client.
    pub fn new(client: WorkerClient) -> Self {
        Self { client }
    }

    /// Generate each of `kinds` from the shared `request_text`.
    ///
    /// Kinds are processed sequentially, in order: each worker call is
    /// awaited before the next starts, so sink invocations arrive in
    /// request order. Per-kind, a successful call is projected into a
    /// partial record and handed to `sink.persist_partial`; a failed call
    /// records a failed outcome and hands `sink.persist_failure` a
    /// status-only patch. Sink errors are logged and swallowed so a
    /// persistence hiccup never masks a generation outcome, and no failure
    /// of one kind aborts the remaining kinds.
    ///
    /// When `anonymous` is true no sink method is invoked at all, whatever
    /// the outcomes: anonymous sessions must never write durable per-user
    /// state.
    pub async fn generate(
        &self,
        kinds: &[DiagramKind],
        request_text: &str,
        anonymous: bool,
        sink: Option<&dyn AnalysisSink>,
    ) -> GenerationReport {
        let batch = Uuid::new_v4();
        let sink = if anonymous { None } else { sink };

        info!(
            %batch,
            diagrams = kinds.len(),
            anonymous,
            "Starting diagram generation batch"
        );

        let mut report = GenerationReport {
            success: true,
            ..GenerationReport::default()
        };

        for &kind in kinds {
            let outcome = self.generate_one(batch, kind, request_text, sink).await;

            if outcome.status != DiagramStatus::Completed {
                report.success = false;
                if report.first_error.is_none() {
                    report.first_error = outcome.error.clone();
                }
            }

            report.results.insert(kind, outcome);
        }

        info!(%batch, success = report.success, "Diagram generation batch finished");
        report
    }

    async fn generate_one(
        &self,
        batch: Uuid,
        kind: DiagramKind,
        request_text: &str,
        sink: Option<&dyn AnalysisSink>,
    ) -> DiagramOutcome {
        let request = GenerationRequest::single(request_text, kind);

        match self.client.generate(&request).await {
            Ok(envelope) => {
                let partial = extract_partial(kind, &envelope);
                let status = partial
                    .status_of(kind)
                    .unwrap_or(DiagramStatus::Failed);
                let content = partial.content_of(kind);
                let error = match status {
                    DiagramStatus::Completed => None,
                    _ => envelope
                        .result_for(kind)
                        .and_then(|entry| entry.error.clone())
                        .or_else(|| Some("No result returned".to_string())),
                };

                if let Some(sink) = sink {
                    if let Err(e) = sink.persist_partial(kind, &partial).await {
                        warn!(%batch, diagram = %kind, error = %e, "Failed to persist partial analysis");
                    }
                }

                DiagramOutcome {
                    status,
                    content,
                    error,
                }
            }
            Err(e) => {
                warn!(%batch, diagram = %kind, error = %e, "Diagram generation failed");

                if let Some(sink) = sink {
                    let failure = AiAnalysis::failure_for(kind);
                    if let Err(write_err) = sink.persist_failure(kind, &failure).await {
                        warn!(%batch, diagram = %kind, error = %write_err, "Failed to persist failure status");
                    }
                }

                DiagramOutcome {
                    status: DiagramStatus::Failed,
                    content: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
