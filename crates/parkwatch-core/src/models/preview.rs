//! Preview references.
//!
//! A `PreviewHandle` stands for a rendered preview of a selected file. Handles
//! are issued by a `PreviewRegistry` and removed from it when released, either
//! explicitly or on drop, so a slot that is replaced or cleared never leaves a
//! stale preview behind.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<Mutex<HashSet<Uuid>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn live(&self) -> MutexGuard<'_, HashSet<Uuid>> {
        self.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn issue(&self) -> PreviewHandle {
        let id = Uuid::new_v4();
        self.live().insert(id);
        PreviewHandle {
            id,
            registry: self.clone(),
        }
    }

    /// Number of handles issued and not yet released
    pub fn live_count(&self) -> usize {
        self.live().len()
    }

    pub fn is_live(&self, id: Uuid) -> bool {
        self.live().contains(&id)
    }
}

/// Owned preview reference, valid until released.
#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn url(&self) -> String {
        format!("preview:{}", self.id)
    }

    /// Invalidate the preview now.
    pub fn release(self) {}
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if self.registry.live().remove(&self.id) {
            tracing::trace!(preview_id = %self.id, "Preview released");
        }
    }
}
