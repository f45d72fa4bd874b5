//! In-memory storage backend.
//!
//! Backs the `memory` storage setting and handler tests. Semantics mirror the
//! managed backend: inserts never overwrite, lookups on unknown ids are
//! `NotFound`, listing is unordered.

use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SimulationStore, StoreError};
use crate::model::{NewSimulation, SimulationSummary, Subject};

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, NewSimulation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records; lets tests assert no-insert paths.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl SimulationStore for MemoryStore {
    async fn insert(&self, sim: NewSimulation) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        self.records.write().await.insert(id, sim);
        Ok(id)
    }

    async fn fetch_html(&self, id: Uuid) -> Result<String, StoreError> {
        self.records
            .read()
            .await
            .get(&id)
            .map(|sim| sim.html_content.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn list_by_subject(
        &self,
        subject: Subject,
    ) -> Result<Vec<SimulationSummary>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|(_, sim)| sim.subject == subject)
            .map(|(id, sim)| SimulationSummary {
                id: *id,
                chapter: sim.chapter.clone(),
                html_content: sim.html_content.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(subject: Subject, chapter: &str) -> NewSimulation {
        NewSimulation {
            subject,
            chapter: chapter.to_string(),
            html_content: format!("<html><body>{chapter}</body></html>"),
        }
    }

    #[tokio::test]
    async fn test_insert_then_fetch() {
        let store = MemoryStore::new();
        let id = store
            .insert(sample(Subject::Physics, "Newton's Laws"))
            .await
            .unwrap();

        let html = store.fetch_html(id).await.unwrap();
        assert_eq!(html, "<html><body>Newton's Laws</body></html>");
    }

    #[tokio::test]
    async fn test_fetch_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        let err = store.fetch_html(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_identical_uploads_get_distinct_ids() {
        let store = MemoryStore::new();
        let a = store.insert(sample(Subject::Maths, "Algebra")).await.unwrap();
        let b = store.insert(sample(Subject::Maths, "Algebra")).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_list_filters_by_subject() {
        let store = MemoryStore::new();
        store.insert(sample(Subject::Physics, "Optics")).await.unwrap();
        store.insert(sample(Subject::Biology, "Cells")).await.unwrap();
        store.insert(sample(Subject::Physics, "Waves")).await.unwrap();

        let physics = store.list_by_subject(Subject::Physics).await.unwrap();
        assert_eq!(physics.len(), 2);

        let chemistry = store.list_by_subject(Subject::Chemistry).await.unwrap();
        assert!(chemistry.is_empty());
    }
}
