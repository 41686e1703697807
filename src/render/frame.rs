//! Sandboxed frame documents for webpage results.
//!
//! A webpage result is served from its own URL and embedded with an
//! `iframe`. Each registration is owned by a [`FrameHandle`]; dropping the
//! handle removes the document, so a frame never outlives the content it
//! was created for.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

/// Route prefix frames are served under
pub const FRAME_ROUTE_PREFIX: &str = "/frame/";

/// `sandbox` tokens for both the iframe attribute and the CSP header.
/// Scripts run; same-origin access to the host page is denied.
pub const FRAME_SANDBOX: &str = "allow-scripts";

#[derive(Clone, Default)]
pub struct FrameRegistry {
    documents: Arc<RwLock<HashMap<Uuid, Arc<str>>>>,
}

impl fmt::Debug for FrameRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameRegistry")
            .field("live", &self.len())
            .finish()
    }
}

impl FrameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document under a fresh id
    pub fn acquire(&self, document: String) -> FrameHandle {
        let id = Uuid::new_v4();
        self.documents
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id, Arc::from(document));
        tracing::debug!("Frame {} acquired", id);
        FrameHandle {
            id,
            registry: self.clone(),
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<str>> {
        self.documents
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(id)
            .cloned()
    }

    /// Number of live frames
    pub fn len(&self) -> usize {
        self.documents
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, id: &Uuid) {
        let removed = self
            .documents
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(id);
        if removed.is_some() {
            tracing::debug!("Frame {} released", id);
        }
    }
}

/// Scoped ownership of one frame registration
pub struct FrameHandle {
    id: Uuid,
    registry: FrameRegistry,
}

impl fmt::Debug for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FrameHandle").field(&self.id).finish()
    }
}

impl FrameHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Value for the iframe `src` attribute
    pub fn src(&self) -> String {
        format!("{FRAME_ROUTE_PREFIX}{}", self.id)
    }
}

impl Drop for FrameHandle {
    fn drop(&mut self) {
        self.registry.release(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_the_handle_releases_the_document() {
        let registry = FrameRegistry::new();
        let handle = registry.acquire("<p>one</p>".to_string());
        let id = handle.id();
        assert_eq!(registry.get(&id).as_deref(), Some("<p>one</p>"));
        assert_eq!(handle.src(), format!("/frame/{id}"));

        drop(handle);
        assert!(registry.get(&id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn each_acquire_gets_a_fresh_id() {
        let registry = FrameRegistry::new();
        let a = registry.acquire("same".to_string());
        let b = registry.acquire("same".to_string());
        assert_ne!(a.id(), b.id());
        assert_eq!(registry.len(), 2);
        drop(a);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&b.id()).is_some());
    }
}
