//! # Diagramcraft
//!
//! Diagram-generation orchestration for project planning: turns a project
//! description into per-diagram requests against an AI worker service,
//! normalizes the heterogeneous responses (raw Mermaid text vs. escaped JSON
//! story lists), and folds the results into partial updates of a per-project
//! analysis record.
//!
//! ## Features
//!
//! - **Diagram registry**: closed enumeration of the recognized diagram
//!   kinds (ERD, architecture, C4, user stories, Gantt, Kanban) with total
//!   lookups for labels, formats, and persisted field names
//! - **Response normalization**: code-fence stripping plus a multi-pass JSON
//!   recovery that never lets invalid JSON through silently
//! - **Generation client**: one classified HTTP call per diagram, with
//!   network / HTTP / parse failures kept distinct
//! - **Orchestration**: sequential fan-out with per-diagram failure
//!   isolation and partial-persistence hooks; anonymous sessions never write
//!   durable state
//! - **Regeneration**: single-diagram redo with optimistic pending marking
//!   and best-effort failure recording
//!
//! ## Architecture
//!
//! ```text
//! HTTP handlers → Orchestrator / Regeneration → AI Worker (HTTP)
//!                        ↓ partial merges
//!                  Project store (external)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use diagramcraft::{Config, DiagramOrchestrator};
//! use diagramcraft::analysis::parse_selection;
//! use diagramcraft::worker::ClientCache;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let worker = config.worker.clone().expect("WORKER_URL must be set");
//!     let cache = ClientCache::new(config.request.clone());
//!     let orchestrator = DiagramOrchestrator::new(cache.get_or_create(&worker)?);
//!
//!     let kinds = parse_selection(&["erd", "gantt"])?;
//!     let report = orchestrator
//!         .generate(&kinds, "A todo app for teams", true, None)
//!         .await;
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Diagram registry, analysis records, and envelope projection.
pub mod analysis;
/// Configuration management.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// Normalization of raw worker output (fence stripping, JSON recovery).
pub mod format;
/// Diagram generation orchestration and regeneration workflows.
pub mod orchestrator;
/// Collaborator contracts: project store and session verification.
pub mod store;
/// AI worker HTTP client.
pub mod worker;

pub use analysis::{AiAnalysis, DiagramKind, DiagramStatus, UserStory};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use orchestrator::{
    regenerate_diagram, AnalysisSink, DiagramOrchestrator, GenerationReport, RegenerationError,
    RegenerationInput,
};
pub use worker::WorkerClient;
