/// Resource-binding allocator
///
/// Allocates one binding set per command in a single batch before any draw
/// is encoded.

use std::sync::Arc;
use crate::encoder::Command;
use crate::error::Result;
use crate::graphics_device::{BindingSet, BindingSetDesc, GraphicsDevice};
use crate::{strata_bail, strata_err};

const SOURCE: &str = "strata::encoder";

/// Allocate the binding sets of `commands`, aligned 1:1 with them
pub fn allocate_binding_sets(
    device: &dyn GraphicsDevice,
    commands: &[Command],
) -> Result<Vec<Arc<dyn BindingSet>>> {
    if commands.is_empty() {
        return Ok(Vec::new());
    }

    let descs: Vec<BindingSetDesc<'_>> = commands
        .iter()
        .map(|command| BindingSetDesc {
            pipeline: &command.pipeline,
            vertex_bindings: &command.vertex_bindings,
            fragment_bindings: &command.fragment_bindings,
        })
        .collect();

    let sets = device.allocate_binding_sets(&descs).map_err(|e| {
        strata_err!(ResourceUnavailable, SOURCE, "Could not allocate binding sets: {}", e)
    })?;

    if sets.len() != commands.len() {
        strata_bail!(
            ResourceUnavailable,
            SOURCE,
            "Allocated {} binding sets for {} commands",
            sets.len(),
            commands.len()
        );
    }
    Ok(sets)
}

#[cfg(test)]
#[path = "binding_allocator_tests.rs"]
mod tests;
