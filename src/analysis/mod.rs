//! Diagram registry and per-project analysis records.
//!
//! The registry side is a closed enumeration of diagram kinds with total
//! lookup functions; the record side is [`AiAnalysis`], a merge-friendly
//! aggregate of diagram content and statuses, plus the projections that turn
//! worker response envelopes into partial records.

mod extract;
mod registry;
mod types;

pub use extract::{extract_partial, transform_envelope};
pub use registry::{
    is_valid_kind, parse_selection, DiagramFormat, DiagramKind, ALL_KINDS, MVP_ID,
};
pub use types::{AiAnalysis, DiagramContent, DiagramStatus, UserStory};
