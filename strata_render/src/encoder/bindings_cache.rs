/// Pass-scoped cache eliding redundant state changes
///
/// Only the pipeline and the stencil reference are cached. Viewport and
/// scissor are set for every draw.

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{same_pipeline, CommandList, Pipeline};
use crate::strata_trace;

const SOURCE: &str = "strata::encoder";

#[derive(Default)]
pub struct PassBindingsCache {
    pipeline: Option<Arc<dyn Pipeline>>,
    stencil_reference: Option<u32>,
}

impl PassBindingsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `pipeline` unless it is already bound. Returns true if bound.
    pub fn bind_pipeline(&mut self, cmd: &mut dyn CommandList, pipeline: &Arc<dyn Pipeline>) -> Result<bool> {
        if let Some(current) = &self.pipeline {
            if same_pipeline(current, pipeline) {
                strata_trace!(SOURCE, "Pipeline '{}' already bound", pipeline.label());
                return Ok(false);
            }
        }
        cmd.bind_pipeline(pipeline)?;
        self.pipeline = Some(Arc::clone(pipeline));
        Ok(true)
    }

    /// Set the stencil reference unless it is already set. Returns true if set.
    pub fn set_stencil_reference(&mut self, cmd: &mut dyn CommandList, reference: u32) -> Result<bool> {
        if self.stencil_reference == Some(reference) {
            return Ok(false);
        }
        cmd.set_stencil_reference(reference)?;
        self.stencil_reference = Some(reference);
        Ok(true)
    }
}

#[cfg(test)]
#[path = "bindings_cache_tests.rs"]
mod tests;
