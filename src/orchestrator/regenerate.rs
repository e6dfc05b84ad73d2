//! Single-diagram regeneration after initial project creation.
//!
//! State machine per diagram, terminal on success or failure:
//! load project → mark pending → invoke worker → persist partial update, or
//! best-effort mark failed. All writes are partial merges, so a concurrent
//! regeneration of a different diagram on the same project cannot clobber
//! this one's fields.

use thiserror::Error;
use tracing::{error, info};

use crate::analysis::{extract_partial, AiAnalysis, DiagramKind};
use crate::error::{StoreError, WorkerError};
use crate::store::ProjectStore;
use crate::worker::{GenerationRequest, WorkerClient};

/// Identifies the diagram to regenerate and who owns it.
#[derive(Debug, Clone)]
pub struct RegenerationInput {
    /// Owning user.
    pub user_id: String,
    /// Project the diagram belongs to.
    pub project_id: String,
    /// Diagram to regenerate.
    pub kind: DiagramKind,
}

/// Failure modes of a regeneration run.
#[derive(Debug, Error)]
pub enum RegenerationError {
    /// No worker endpoint is configured. Raised before any state mutation.
    #[error("Worker endpoint not configured")]
    NotConfigured,

    /// The project could not be loaded.
    #[error("Failed to load project for regeneration: {0}")]
    Load(#[source] StoreError),

    /// The project does not exist for this owner.
    #[error("Project not found")]
    ProjectNotFound,

    /// The worker responded with a non-2xx status.
    #[error("Worker failed to regenerate {label}")]
    Worker {
        /// Human label of the diagram that failed.
        label: &'static str,
        /// Upstream HTTP status.
        status: u16,
    },

    /// The worker call failed before producing a usable response.
    #[error("Failed to regenerate diagram: {0}")]
    Generation(#[source] WorkerError),

    /// The optimistic pending write failed.
    #[error("Failed to mark diagram pending: {0}")]
    MarkPending(#[source] StoreError),

    /// The final partial update could not be persisted.
    #[error("Failed to persist regenerated diagram: {0}")]
    Persist(#[source] StoreError),
}

impl RegenerationError {
    /// HTTP status class for the hosting handler.
    pub fn status_code(&self) -> u16 {
        match self {
            RegenerationError::ProjectNotFound => 404,
            RegenerationError::Worker { status, .. } => *status,
            RegenerationError::NotConfigured
            | RegenerationError::Load(_)
            | RegenerationError::Generation(_)
            | RegenerationError::MarkPending(_)
            | RegenerationError::Persist(_) => 500,
        }
    }
}

/// Regenerate one diagram for an existing project.
///
/// On success the returned patch has already been persisted through `store`.
/// On failure a failed status is written best effort; an error from that
/// secondary write is logged and swallowed so it never masks the primary
/// outcome.
pub async fn regenerate_diagram(
    store: &dyn ProjectStore,
    client: Option<&WorkerClient>,
    input: &RegenerationInput,
) -> Result<AiAnalysis, RegenerationError> {
    let client = client.ok_or(RegenerationError::NotConfigured)?;
    let kind = input.kind;

    let project = store
        .get_project(&input.user_id, &input.project_id)
        .await
        .map_err(|e| {
            error!(project = %input.project_id, error = %e, "Error fetching project for regeneration");
            RegenerationError::Load(e)
        })?
        .ok_or(RegenerationError::ProjectNotFound)?;

    let request_text = project.ai_request_text();

    // Pending is written before the worker call is dispatched.
    if let Err(e) = store
        .update_partial_ai_analysis(
            &input.user_id,
            &input.project_id,
            &AiAnalysis::pending_for(&[kind]),
        )
        .await
    {
        error!(project = %input.project_id, diagram = %kind, error = %e, "Failed to mark diagram pending");
        mark_failure(store, input).await;
        return Err(RegenerationError::MarkPending(e));
    }

    let envelope = match client
        .generate(&GenerationRequest::single(request_text, kind))
        .await
    {
        Ok(envelope) => envelope,
        Err(WorkerError::Http { status, .. }) => {
            mark_failure(store, input).await;
            return Err(RegenerationError::Worker {
                label: kind.label(),
                status,
            });
        }
        Err(e) => {
            error!(project = %input.project_id, diagram = %kind, error = %e, "Error regenerating diagram");
            mark_failure(store, input).await;
            return Err(RegenerationError::Generation(e));
        }
    };

    let partial = extract_partial(kind, &envelope);

    if let Err(e) = store
        .update_partial_ai_analysis(&input.user_id, &input.project_id, &partial)
        .await
    {
        error!(project = %input.project_id, diagram = %kind, error = %e, "Failed to persist regenerated diagram");
        mark_failure(store, input).await;
        return Err(RegenerationError::Persist(e));
    }

    info!(project = %input.project_id, diagram = %kind, "Diagram regenerated");
    Ok(partial)
}

/// Best-effort failed-status write; its own failure is logged, never raised.
async fn mark_failure(store: &dyn ProjectStore, input: &RegenerationInput) {
    let failure = AiAnalysis::failure_for(input.kind);
    if let Err(e) = store
        .update_partial_ai_analysis(&input.user_id, &input.project_id, &failure)
        .await
    {
        error!(project = %input.project_id, diagram = %input.kind, error = %e, "Failed to record regeneration failure");
    }
}
