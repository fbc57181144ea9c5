//! In-process waitlist with the deployment's semantics.

use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future;
use futures_util::FutureExt;

use crate::{EntryId, Signup, WaitlistBackend, WaitlistEntry, WaitlistFut};

/// Entries kept in insertion order; an update keeps the original position.
#[derive(Debug, Clone, Default)]
pub struct MemoryWaitlist {
    entries: Arc<Mutex<Vec<WaitlistEntry>>>,
}

impl MemoryWaitlist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(&self, f: impl FnOnce(&mut Vec<WaitlistEntry>) -> T) -> T {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut entries)
    }

    /// Insert or update synchronously.
    pub fn upsert(&self, signup: &Signup) -> EntryId {
        let now = chrono::Utc::now().timestamp_millis();
        self.with_entries(|entries| {
            if let Some(existing) = entries
                .iter_mut()
                .find(|entry| entry.email == signup.email.as_str())
            {
                existing.name = signup.name.to_string();
                existing.created_at = now;
                return existing.id.clone();
            }

            let id = EntryId::new(uuid::Uuid::new_v4().simple().to_string());
            entries.push(WaitlistEntry {
                id: id.clone(),
                name: signup.name.to_string(),
                email: signup.email.to_string(),
                created_at: now,
            });
            id
        })
    }

    /// Entries, most recently created first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<WaitlistEntry> {
        self.with_entries(|entries| entries.iter().rev().cloned().collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.with_entries(|entries| entries.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WaitlistBackend for MemoryWaitlist {
    fn add(&self, signup: Signup) -> WaitlistFut<EntryId> {
        let id = self.upsert(&signup);
        tracing::debug!(id = %id, "Stored signup in memory");
        future::ready(Ok(id)).boxed()
    }

    fn list(&self) -> WaitlistFut<Vec<WaitlistEntry>> {
        future::ready(Ok(self.snapshot())).boxed()
    }

    fn count(&self) -> WaitlistFut<u64> {
        future::ready(Ok(self.len() as u64)).boxed()
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
