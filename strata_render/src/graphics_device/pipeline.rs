/// Pipeline trait
///
/// Pipelines are compiled outside the encoder (shader reflection and state
/// setup belong to another layer); the encoder only binds them and compares
/// them by identity.

use std::any::Any;
use std::sync::Arc;

/// Graphics pipeline resource trait
pub trait Pipeline: Send + Sync {
    /// Debug label
    fn label(&self) -> &str {
        ""
    }

    /// Downcast support for backends
    fn as_any(&self) -> &dyn Any;
}

/// True when both handles refer to the same pipeline object
pub fn same_pipeline(a: &Arc<dyn Pipeline>, b: &Arc<dyn Pipeline>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
