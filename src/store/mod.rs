//! Collaborator contracts for persistence and session verification.
//!
//! The document store and the session mechanism live outside this crate; the
//! orchestration core consumes them through the narrow traits defined here.
//! Concrete adapters (Firestore, cookie sessions, ...) belong to the hosting
//! application.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::AiAnalysis;
use crate::error::StoreResult;

/// A persisted project record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// Project identifier.
    pub id: String,
    /// Project name.
    pub name: String,
    /// Free-text project description.
    pub description: String,
    /// Free-text key objectives.
    pub key_objectives: String,
    /// Diagram outputs generated so far, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<AiAnalysis>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ProjectRecord {
    /// Create a fresh record with no analysis.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        key_objectives: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            key_objectives: key_objectives.into(),
            ai_analysis: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build the request text sent to the worker for this project.
    pub fn ai_request_text(&self) -> String {
        format!(
            "Project Name: {}\n\nProject Description: {}\n\nKey Objectives: {}",
            self.name, self.description, self.key_objectives
        )
    }

    /// Merge an analysis patch into this record.
    pub fn apply_analysis_update(&mut self, patch: &AiAnalysis) {
        self.ai_analysis
            .get_or_insert_with(AiAnalysis::default)
            .merge_from(patch);
        self.updated_at = Utc::now();
    }
}

/// Contract for the per-user project store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Fetch a project owned by `user_id`, or `None` when it does not exist.
    async fn get_project(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> StoreResult<Option<ProjectRecord>>;

    /// Merge `update` into the project's analysis record.
    ///
    /// Implementations must perform a read-merge-write that preserves every
    /// field the patch does not mention ([`AiAnalysis::merge_from`] is the
    /// reference merge); a full-record overwrite violates the contract.
    async fn update_partial_ai_analysis(
        &self,
        user_id: &str,
        project_id: &str,
        update: &AiAnalysis,
    ) -> StoreResult<()>;
}

/// Result of verifying a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    /// The token maps to a session.
    Valid {
        /// Owning user id.
        user_id: String,
        /// Anonymous sessions never cause writes to durable per-user state.
        anonymous: bool,
    },
    /// The token was rejected.
    Invalid {
        /// Why verification failed.
        reason: String,
    },
}

impl SessionCheck {
    /// Whether this is a valid anonymous session.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, SessionCheck::Valid { anonymous: true, .. })
    }

    /// The verified user id, when the session is valid.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            SessionCheck::Valid { user_id, .. } => Some(user_id),
            SessionCheck::Invalid { .. } => None,
        }
    }
}

/// Contract for the session-cookie verifier.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Verify a raw session token.
    async fn verify(&self, session_token: &str) -> SessionCheck;
}
