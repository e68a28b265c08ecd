use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::lead::{Lead, LeadFields};

/// Append-only, in-memory sequence of leads.
///
/// Owned by the server state for the lifetime of the process. Entries are
/// immutable once stored and handed out as `Arc<Lead>` so readers can hold a
/// snapshot without blocking writers.
#[derive(Debug, Default)]
pub struct LeadStore {
    inner: RwLock<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    leads: Vec<Arc<Lead>>,
    last_id: i64,
}

impl LeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new lead stamped with the current time.
    pub async fn append(&self, fields: LeadFields) -> Arc<Lead> {
        self.append_at(fields, Utc::now()).await
    }

    /// Store a new lead stamped with `now`.
    ///
    /// The id is the millisecond clock value, bumped past the previous id when
    /// the clock has not advanced. Id assignment and the push happen under one
    /// write lock, so ids are strictly increasing in insertion order.
    pub async fn append_at(&self, fields: LeadFields, now: DateTime<Utc>) -> Arc<Lead> {
        let mut inner = self.inner.write().await;
        let id = now.timestamp_millis().max(inner.last_id + 1);
        inner.last_id = id;
        let lead = Arc::new(Lead::from_fields(id, now, fields));
        inner.leads.push(Arc::clone(&lead));
        lead
    }

    /// Every stored lead, in insertion order.
    pub async fn list_all(&self) -> Vec<Arc<Lead>> {
        self.inner.read().await.leads.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.leads.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
