use serde::{Deserialize, Serialize};

use super::registry::{DiagramKind, ALL_KINDS};

/// Lifecycle status of a single diagram.
///
/// Absent (never requested) → `Pending` (written optimistically before the
/// worker call) → `Completed` or `Failed`. Regeneration may reset a terminal
/// status back to `Pending`; no other transitions occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramStatus {
    /// Generation has been dispatched but has not resolved.
    Pending,
    /// The worker returned usable content.
    Completed,
    /// The worker errored, returned nothing, or returned malformed content.
    Failed,
}

/// A single user story from the structured `user-stories` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStory {
    /// Who the story is for.
    pub role: String,
    /// What they want to do.
    pub goal: String,
    /// Why it matters to them.
    pub benefit: String,
    /// Optional estimation points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_points: Option<f64>,
    /// Optional acceptance criteria (may be empty).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptance_criteria: Option<Vec<String>>,
}

impl UserStory {
    /// Whether the story satisfies the record invariants: role, goal, and
    /// benefit are all non-empty.
    pub fn is_valid(&self) -> bool {
        !self.role.trim().is_empty()
            && !self.goal.trim().is_empty()
            && !self.benefit.trim().is_empty()
    }
}

/// Content of one diagram, in the shape its kind produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DiagramContent {
    /// Mermaid diagram text.
    Mermaid(String),
    /// Ordered user-story list.
    Stories(Vec<UserStory>),
}

/// Per-project aggregate of diagram outputs.
///
/// Every field is optional so the same type serves as the persisted record
/// and as a partial patch: serialization skips `None` fields, so a patch
/// written through a read-merge-write store never clobbers fields it does not
/// mention.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    /// Entity relationship diagram text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erd: Option<String>,
    /// Architecture diagram text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    /// C4 context diagram text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c4: Option<String>,
    /// Ordered user stories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_stories: Option<Vec<UserStory>>,
    /// Gantt chart text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gantt: Option<String>,
    /// Kanban board text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kanban: Option<String>,
    /// ERD generation status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erd_status: Option<DiagramStatus>,
    /// Architecture generation status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architecture_status: Option<DiagramStatus>,
    /// C4 generation status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c4_status: Option<DiagramStatus>,
    /// User-story generation status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_stories_status: Option<DiagramStatus>,
    /// Gantt generation status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gantt_status: Option<DiagramStatus>,
    /// Kanban generation status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kanban_status: Option<DiagramStatus>,
}

impl AiAnalysis {
    /// A patch that marks each of `kinds` as pending.
    pub fn pending_for(kinds: &[DiagramKind]) -> AiAnalysis {
        let mut patch = AiAnalysis::default();
        for &kind in kinds {
            patch.set_status(kind, DiagramStatus::Pending);
        }
        patch
    }

    /// A patch that marks a single kind as failed, touching nothing else.
    pub fn failure_for(kind: DiagramKind) -> AiAnalysis {
        let mut patch = AiAnalysis::default();
        patch.set_status(kind, DiagramStatus::Failed);
        patch
    }

    /// Whether the record carries no content and no status at all.
    pub fn is_empty(&self) -> bool {
        ALL_KINDS
            .iter()
            .all(|&kind| self.content_of(kind).is_none() && self.status_of(kind).is_none())
    }

    /// Status recorded for `kind`, if any.
    pub fn status_of(&self, kind: DiagramKind) -> Option<DiagramStatus> {
        match kind {
            DiagramKind::Erd => self.erd_status,
            DiagramKind::Architecture => self.architecture_status,
            DiagramKind::C4 => self.c4_status,
            DiagramKind::UserStories => self.user_stories_status,
            DiagramKind::Gantt => self.gantt_status,
            DiagramKind::Kanban => self.kanban_status,
        }
    }

    /// Set the status field for `kind`.
    pub fn set_status(&mut self, kind: DiagramKind, status: DiagramStatus) {
        let slot = match kind {
            DiagramKind::Erd => &mut self.erd_status,
            DiagramKind::Architecture => &mut self.architecture_status,
            DiagramKind::C4 => &mut self.c4_status,
            DiagramKind::UserStories => &mut self.user_stories_status,
            DiagramKind::Gantt => &mut self.gantt_status,
            DiagramKind::Kanban => &mut self.kanban_status,
        };
        *slot = Some(status);
    }

    /// Content recorded for `kind`, if any.
    pub fn content_of(&self, kind: DiagramKind) -> Option<DiagramContent> {
        match kind {
            DiagramKind::Erd => self.erd.clone().map(DiagramContent::Mermaid),
            DiagramKind::Architecture => self.architecture.clone().map(DiagramContent::Mermaid),
            DiagramKind::C4 => self.c4.clone().map(DiagramContent::Mermaid),
            DiagramKind::UserStories => self.user_stories.clone().map(DiagramContent::Stories),
            DiagramKind::Gantt => self.gantt.clone().map(DiagramContent::Mermaid),
            DiagramKind::Kanban => self.kanban.clone().map(DiagramContent::Mermaid),
        }
    }

    /// Set the content field for `kind`.
    ///
    /// Content whose shape does not match the kind's format is discarded.
    pub fn set_content(&mut self, kind: DiagramKind, content: DiagramContent) {
        match (kind, content) {
            (DiagramKind::Erd, DiagramContent::Mermaid(text)) => self.erd = Some(text),
            (DiagramKind::Architecture, DiagramContent::Mermaid(text)) => {
                self.architecture = Some(text)
            }
            (DiagramKind::C4, DiagramContent::Mermaid(text)) => self.c4 = Some(text),
            (DiagramKind::UserStories, DiagramContent::Stories(stories)) => {
                self.user_stories = Some(stories)
            }
            (DiagramKind::Gantt, DiagramContent::Mermaid(text)) => self.gantt = Some(text),
            (DiagramKind::Kanban, DiagramContent::Mermaid(text)) => self.kanban = Some(text),
            _ => {}
        }
    }

    /// Merge every field present in `patch` into `self`, leaving fields the
    /// patch does not mention untouched. This is the reference merge for
    /// read-merge-write stores.
    pub fn merge_from(&mut self, patch: &AiAnalysis) {
        for kind in ALL_KINDS {
            if let Some(content) = patch.content_of(kind) {
                self.set_content(kind, content);
            }
            if let Some(status) = patch.status_of(kind) {
                self.set_status(kind, status);
            }
        }
    }
}
