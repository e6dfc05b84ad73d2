//! Static registry of recognized diagram kinds.
//!
//! Every lookup is a total function over the closed [`DiagramKind`] enum, so
//! adding a kind forces every match in the crate to be revisited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A recognized diagram type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagramKind {
    /// Entity relationship diagram (Mermaid).
    Erd,
    /// System architecture diagram (Mermaid).
    Architecture,
    /// C4 context diagram (Mermaid).
    C4,
    /// User stories (structured JSON list).
    UserStories,
    /// Gantt chart (Mermaid).
    Gantt,
    /// Kanban board (Mermaid).
    Kanban,
}

/// Output format of a diagram kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramFormat {
    /// Raw Mermaid diagram text.
    Mermaid,
    /// A structured JSON payload.
    Structured,
}

/// Identifier of the aggregate selection that expands to every diagram kind.
pub const MVP_ID: &str = "mvp";

/// All concrete diagram kinds, in canonical order.
pub const ALL_KINDS: [DiagramKind; 6] = [
    DiagramKind::Erd,
    DiagramKind::Architecture,
    DiagramKind::C4,
    DiagramKind::UserStories,
    DiagramKind::Gantt,
    DiagramKind::Kanban,
];

impl DiagramKind {
    /// Wire identifier of this kind.
    pub fn id(&self) -> &'static str {
        match self {
            DiagramKind::Erd => "erd",
            DiagramKind::Architecture => "architecture",
            DiagramKind::C4 => "c4",
            DiagramKind::UserStories => "user-stories",
            DiagramKind::Gantt => "gantt",
            DiagramKind::Kanban => "kanban",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DiagramKind::Erd => "Entity Relationship Diagram",
            DiagramKind::Architecture => "System Architecture",
            DiagramKind::C4 => "C4 Context Diagram",
            DiagramKind::UserStories => "User Stories",
            DiagramKind::Gantt => "Gantt Chart",
            DiagramKind::Kanban => "Kanban Board",
        }
    }

    /// Output format produced by the worker for this kind.
    pub fn format(&self) -> DiagramFormat {
        match self {
            DiagramKind::UserStories => DiagramFormat::Structured,
            _ => DiagramFormat::Mermaid,
        }
    }

    /// Name of the content field in the persisted analysis record.
    pub fn content_field(&self) -> &'static str {
        match self {
            DiagramKind::Erd => "erd",
            DiagramKind::Architecture => "architecture",
            DiagramKind::C4 => "c4",
            DiagramKind::UserStories => "userStories",
            DiagramKind::Gantt => "gantt",
            DiagramKind::Kanban => "kanban",
        }
    }

    /// Name of the status field in the persisted analysis record.
    pub fn status_field(&self) -> &'static str {
        match self {
            DiagramKind::Erd => "erdStatus",
            DiagramKind::Architecture => "architectureStatus",
            DiagramKind::C4 => "c4Status",
            DiagramKind::UserStories => "userStoriesStatus",
            DiagramKind::Gantt => "ganttStatus",
            DiagramKind::Kanban => "kanbanStatus",
        }
    }

    /// Parse a wire identifier. Matching is exact and case-sensitive.
    pub fn parse(value: &str) -> Option<DiagramKind> {
        ALL_KINDS.iter().copied().find(|kind| kind.id() == value)
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DiagramKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiagramKind::parse(s).ok_or_else(|| AppError::Validation {
            message: format!("Unknown diagram type: {s}"),
        })
    }
}

/// Whether `value` is a recognized diagram identifier (the six concrete
/// kinds, or the aggregate `mvp`).
pub fn is_valid_kind(value: &str) -> bool {
    value == MVP_ID || DiagramKind::parse(value).is_some()
}

/// Parse a caller-supplied diagram selection.
///
/// `mvp` expands to every concrete kind. Duplicates are dropped while
/// preserving first-occurrence order. Any unrecognized identifier rejects the
/// whole selection before a single network call is made.
pub fn parse_selection<S: AsRef<str>>(values: &[S]) -> Result<Vec<DiagramKind>, AppError> {
    let mut kinds = Vec::new();

    for value in values {
        let value = value.as_ref();
        if value == MVP_ID {
            for kind in ALL_KINDS {
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
            continue;
        }

        let kind = DiagramKind::from_str(value)?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    Ok(kinds)
}
