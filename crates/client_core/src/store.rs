use std::sync::Arc;

use tokio::sync::RwLock;

use crate::entity::{Entity, RecordPage};

/// Current page and total for one entity type.
///
/// Cloning yields another handle onto the same state, so a store can be
/// built once and handed to every consumer that renders or validates
/// against it.
pub struct RecordStore<E: Entity> {
    inner: Arc<RwLock<StoreState<E>>>,
}

impl<E: Entity> Clone for RecordStore<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Entity> Default for RecordStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

struct StoreState<E> {
    records: Vec<E>,
    total: u64,
    applied_seq: Option<u64>,
    revision: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot<E> {
    pub records: Vec<E>,
    pub total: u64,
    pub revision: u64,
}

impl<E: Entity> RecordStore<E> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreState {
                records: Vec::new(),
                total: 0,
                applied_seq: None,
                revision: 0,
            })),
        }
    }

    pub async fn snapshot(&self) -> StoreSnapshot<E> {
        let guard = self.inner.read().await;
        StoreSnapshot {
            records: guard.records.clone(),
            total: guard.total,
            revision: guard.revision,
        }
    }

    pub async fn records(&self) -> Vec<E> {
        self.inner.read().await.records.clone()
    }

    pub async fn total(&self) -> u64 {
        self.inner.read().await.total
    }

    /// Bumped on every applied page and every removal.
    pub async fn revision(&self) -> u64 {
        self.inner.read().await.revision
    }

    pub async fn find(&self, id: E::Id) -> Option<E> {
        self.inner
            .read()
            .await
            .records
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// Replaces the page unless a newer ticket has already been applied.
    pub async fn apply(&self, seq: u64, page: RecordPage<E>) -> bool {
        let mut guard = self.inner.write().await;
        if guard.applied_seq.is_some_and(|applied| applied >= seq) {
            return false;
        }
        guard.records = page.records;
        guard.total = page.total;
        guard.applied_seq = Some(seq);
        guard.revision += 1;
        true
    }

    /// Drops an acknowledged deletion from the local page.
    pub async fn remove(&self, id: E::Id) -> bool {
        let mut guard = self.inner.write().await;
        let before = guard.records.len();
        guard.records.retain(|record| record.id() != id);
        if guard.records.len() == before {
            return false;
        }
        guard.total = guard.total.saturating_sub(1);
        guard.revision += 1;
        true
    }
}
