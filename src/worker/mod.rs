//! HTTP client for the AI worker service.

mod cache;
mod client;
/// Wire types for the worker's generation endpoint.
pub mod types;

pub use cache::ClientCache;
pub use client::WorkerClient;
pub use types::{DiagramPayload, DiagramResult, GenerationRequest, WorkerEnvelope};
