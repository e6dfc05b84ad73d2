use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::analysis::{DiagramKind, DiagramStatus};

/// Request payload for the worker's generation endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Project description text the prompts are built from.
    pub text: String,
    /// Diagram kinds to generate.
    pub selected_diagrams: Vec<DiagramKind>,
}

impl GenerationRequest {
    /// Create a request for a set of diagram kinds.
    pub fn new(text: impl Into<String>, selected_diagrams: Vec<DiagramKind>) -> Self {
        Self {
            text: text.into(),
            selected_diagrams,
        }
    }

    /// Create a request for a single diagram kind.
    pub fn single(text: impl Into<String>, kind: DiagramKind) -> Self {
        Self::new(text, vec![kind])
    }
}

/// Response envelope from the worker's generation endpoint.
///
/// Keyed by diagram identifier as a plain string: the worker may mention
/// kinds this crate does not recognize, and projection decides what to do
/// with them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerEnvelope {
    /// Whether the worker considered the batch as a whole successful.
    #[serde(default)]
    pub success: bool,
    /// Per-diagram results.
    #[serde(default)]
    pub results: HashMap<String, DiagramResult>,
}

impl WorkerEnvelope {
    /// The entry for `kind`, if the envelope mentions it.
    pub fn result_for(&self, kind: DiagramKind) -> Option<&DiagramResult> {
        self.results.get(kind.id())
    }
}

/// One diagram's slot in the worker envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagramResult {
    /// Whether generation of this diagram succeeded.
    #[serde(default)]
    pub success: bool,
    /// Reported status, when present. Absence is never treated as success.
    #[serde(default)]
    pub status: Option<DiagramStatus>,
    /// Generated payload, when present.
    #[serde(default)]
    pub result: Option<DiagramPayload>,
    /// Worker-reported error detail, when present.
    #[serde(default)]
    pub error: Option<String>,
}

/// The generated text for one diagram.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagramPayload {
    /// Raw diagram text (Mermaid, or a JSON document for structured kinds).
    pub text: String,
}
