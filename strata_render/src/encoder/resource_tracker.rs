/// Resource lifetime tracking
///
/// Keeps every transient native object used by a submission alive until the
/// GPU is done with it, independently of the caller's own handles.

use std::any::Any;
use std::sync::Arc;
use rustc_hash::FxHashMap;

/// Shared-ownership registry scoped to one in-flight submission
///
/// Objects are keyed by allocation address, so tracking the same object
/// twice is a no-op.
#[derive(Default)]
pub struct ResourceTracker {
    objects: FxHashMap<usize, Box<dyn Any + Send + Sync>>,
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retain a clone of `object`. Returns true the first time it is seen.
    pub fn track<T: ?Sized + Send + Sync + 'static>(&mut self, object: &Arc<T>) -> bool {
        let key = Self::key(object);
        if self.objects.contains_key(&key) {
            return false;
        }
        self.objects.insert(key, Box::new(Arc::clone(object)));
        true
    }

    /// True if `object` is retained
    pub fn contains<T: ?Sized>(&self, object: &Arc<T>) -> bool {
        self.objects.contains_key(&Self::key(object))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Drop every retained object
    ///
    /// Called by the submission layer once the completion fence signaled.
    pub fn release(&mut self) {
        self.objects.clear();
    }

    fn key<T: ?Sized>(object: &Arc<T>) -> usize {
        Arc::as_ptr(object) as *const () as usize
    }
}

impl std::fmt::Debug for ResourceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceTracker").field("len", &self.objects.len()).finish()
    }
}

#[cfg(test)]
#[path = "resource_tracker_tests.rs"]
mod tests;
