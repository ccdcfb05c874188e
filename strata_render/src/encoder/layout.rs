/// Layout transition manager
///
/// Issues the barriers a pass needs before it begins and keeps the tracked
/// layout of every image it touches up to date.

use std::sync::Arc;
use crate::encoder::{Command, PassPlan};
use crate::error::Result;
use crate::graphics_device::{
    AccessFlags, CommandList, ImageBarrier, ImageLayout, PipelineStages, Texture,
};
use crate::strata_trace;

const SOURCE: &str = "strata::encoder";

/// Barrier making prior shader reads finish before attachment writes
pub fn attachment_write_barrier(old_layout: ImageLayout) -> ImageBarrier {
    ImageBarrier {
        old_layout,
        new_layout: ImageLayout::General,
        src_access: AccessFlags::SHADER_READ,
        src_stages: PipelineStages::FRAGMENT_SHADER,
        dst_access: AccessFlags::COLOR_ATTACHMENT_WRITE | AccessFlags::TRANSFER_WRITE,
        dst_stages: PipelineStages::COLOR_ATTACHMENT_OUTPUT | PipelineStages::TRANSFER,
    }
}

/// Barrier making prior render/transfer writes visible to fragment reads
pub fn sampled_read_barrier(old_layout: ImageLayout) -> ImageBarrier {
    ImageBarrier {
        old_layout,
        new_layout: ImageLayout::ShaderReadOnly,
        src_access: AccessFlags::COLOR_ATTACHMENT_WRITE | AccessFlags::TRANSFER_WRITE,
        src_stages: PipelineStages::COLOR_ATTACHMENT_OUTPUT | PipelineStages::TRANSFER,
        dst_access: AccessFlags::SHADER_READ,
        dst_stages: PipelineStages::FRAGMENT_SHADER,
    }
}

/// Layouts the images of one pass had before its barriers moved them
///
/// The barriers only take effect if the command stream is submitted, so an
/// encode that fails rolls the tracked layouts back.
#[derive(Default)]
pub struct LayoutJournal {
    entries: Vec<(Arc<dyn Texture>, ImageLayout)>,
}

impl LayoutJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Restore every journaled image, latest transition first
    pub fn rollback(self) {
        for (texture, layout) in self.entries.into_iter().rev() {
            texture.set_layout_without_encoding(layout);
        }
    }
}

/// Record `barrier`, update the tracked layout and journal the old one
fn transition(
    cmd: &mut dyn CommandList,
    texture: &Arc<dyn Texture>,
    barrier: ImageBarrier,
    journal: &mut LayoutJournal,
) -> Result<()> {
    cmd.image_barrier(texture.as_ref(), &barrier)?;
    let previous = texture.set_layout_without_encoding(barrier.new_layout);
    journal.entries.push((Arc::clone(texture), previous));
    strata_trace!(
        SOURCE,
        "Barrier on '{}': {:?} -> {:?}",
        texture.label(),
        barrier.old_layout,
        barrier.new_layout
    );
    Ok(())
}

/// Move every texture sampled by any command to `ShaderReadOnly`
///
/// Runs once over the whole command list. Returns the number of barriers
/// issued; a texture already in `ShaderReadOnly` costs nothing.
pub fn transition_sampled_textures(
    cmd: &mut dyn CommandList,
    commands: &[Command],
    journal: &mut LayoutJournal,
) -> Result<usize> {
    let mut issued = 0;
    for command in commands {
        for bindings in command.bindings() {
            for bound in bindings.sampled_images.values() {
                let current = bound.texture.layout();
                if current == ImageLayout::ShaderReadOnly {
                    continue;
                }
                transition(cmd, &bound.texture, sampled_read_barrier(current), journal)?;
                issued += 1;
            }
        }
    }
    Ok(issued)
}

/// Barrier every planned attachment whose pass starts in `General`
pub fn transition_attachments(
    cmd: &mut dyn CommandList,
    plan: &PassPlan,
    journal: &mut LayoutJournal,
) -> Result<usize> {
    let mut issued = 0;
    for (texture, desc) in plan.views.iter().zip(&plan.desc.attachments) {
        if desc.initial_layout != ImageLayout::General {
            continue;
        }
        let current = texture.layout();
        transition(cmd, texture, attachment_write_barrier(current), journal)?;
        issued += 1;
    }
    Ok(issued)
}

/// Record the layout ending the pass left each attachment in
///
/// No command is encoded: the render pass end performs the transition.
pub fn apply_final_layouts(plan: &PassPlan) {
    for (texture, layout) in plan.final_layouts() {
        texture.set_layout_without_encoding(layout);
    }
}

/// Textures referenced by the commands' sampled bindings
pub fn sampled_textures(commands: &[Command]) -> impl Iterator<Item = &Arc<dyn Texture>> {
    commands
        .iter()
        .flat_map(|command| command.bindings())
        .flat_map(|bindings| bindings.sampled_images.values())
        .map(|bound| &bound.texture)
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
