//! Process-wide lookup of the running walk-in queue.

use std::sync::{LazyLock, PoisonError, RwLock};

use crate::handle::WalkInHandle;

/// Global registry for the walk-in handle.
///
/// Lets server functions reach the queue without passing the handle
/// through every call.
pub struct WalkInRegistry {
    walk_in: RwLock<Option<WalkInHandle>>,
}

impl WalkInRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            walk_in: RwLock::new(None),
        }
    }

    /// Register the walk-in handle, replacing any previous one.
    pub fn register(&self, handle: WalkInHandle) {
        *self.walk_in.write().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    /// Get the walk-in handle.
    pub fn get(&self) -> Option<WalkInHandle> {
        self.walk_in
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget the registered handle, returning it.
    pub fn take(&self) -> Option<WalkInHandle> {
        self.walk_in
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Default for WalkInRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static REGISTRY: LazyLock<WalkInRegistry> = LazyLock::new(WalkInRegistry::new);

/// Get the global walk-in registry.
pub fn global_registry() -> &'static WalkInRegistry {
    &REGISTRY
}
