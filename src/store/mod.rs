//! Storage backends for simulation records.
//!
//! All durable state lives behind the [`SimulationStore`] trait: one
//! implementation talks to the managed PostgREST backend, the other keeps
//! records in process memory for development and tests. Records are
//! append-only; no backend exposes update or delete.

mod memory;
mod supabase;

pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{NewSimulation, SimulationSummary, Subject};

/// Storage layer errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("simulation not found")]
    NotFound,
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected storage response: {0}")]
    UnexpectedResponse(String),
}

/// Backend-agnostic interface to the simulations table.
#[async_trait]
pub trait SimulationStore: Send + Sync {
    /// Persist a new record and return its generated identifier.
    async fn insert(&self, sim: NewSimulation) -> Result<Uuid, StoreError>;

    /// Fetch the stored HTML for an identifier.
    async fn fetch_html(&self, id: Uuid) -> Result<String, StoreError>;

    /// All records filed under a subject, in no particular order.
    async fn list_by_subject(&self, subject: Subject)
        -> Result<Vec<SimulationSummary>, StoreError>;
}
