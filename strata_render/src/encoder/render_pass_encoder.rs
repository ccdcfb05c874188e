/// Render pass encoder
///
/// Drives the attachment builder, the layout manager, the pass builder and
/// the binding allocator, then records every command of the pass in order.

use std::sync::Arc;
use crate::encoder::layout::{self, LayoutJournal};
use crate::encoder::pass_builder::{create_pass_objects, plan_pass};
use crate::encoder::{
    allocate_binding_sets, Command, EncoderConfig, PassBindingsCache, Rect,
    RenderTarget, ResourceTracker,
};
use crate::error::Result;
use crate::graphics_device::{
    Allocator, BindingSet, CommandList, GraphicsDevice, IndexType, Rect2D, Viewport,
};
use crate::{strata_bail, strata_debug, strata_err};

const SOURCE: &str = "strata::encoder";

/// Encode contract shared by every backend variant
pub trait PassEncoder {
    /// Name the pass for diagnostic tooling
    fn set_label(&mut self, label: &str);

    /// Encode `commands` into one render pass over `target`
    ///
    /// Either every command is encoded or an error is returned; on error the
    /// command stream must not be submitted.
    fn encode(&mut self, target: &RenderTarget, commands: &[Command]) -> Result<()>;
}

/// Render pass encoder over the device and command list traits
///
/// One instance records into one command stream and is not shared between
/// threads.
pub struct RenderPassEncoder<'a> {
    device: &'a dyn GraphicsDevice,
    cmd: &'a mut dyn CommandList,
    tracker: &'a mut ResourceTracker,
    label: String,
    config: EncoderConfig,
}

impl<'a> RenderPassEncoder<'a> {
    /// Create an encoder with the default configuration
    ///
    /// # Arguments
    ///
    /// * `device` - Factory for the pass, framebuffer and binding sets
    /// * `cmd` - Command stream, already begun by the submission layer
    /// * `tracker` - Registry of the submission the pass belongs to
    pub fn new(
        device: &'a dyn GraphicsDevice,
        cmd: &'a mut dyn CommandList,
        tracker: &'a mut ResourceTracker,
    ) -> Self {
        Self::with_config(device, cmd, tracker, EncoderConfig::default())
    }

    pub fn with_config(
        device: &'a dyn GraphicsDevice,
        cmd: &'a mut dyn CommandList,
        tracker: &'a mut ResourceTracker,
        config: EncoderConfig,
    ) -> Self {
        Self {
            device,
            cmd,
            tracker,
            label: String::new(),
            config,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode the pass, restoring tracked layouts if any step fails
    fn encode_pass(&mut self, target: &RenderTarget, commands: &[Command]) -> Result<()> {
        let mut journal = LayoutJournal::new();
        let result = self.record_pass(target, commands, &mut journal);
        if result.is_err() && !journal.is_empty() {
            strata_debug!(
                SOURCE,
                "Pass '{}' failed, restoring {} image layouts",
                self.label,
                journal.len()
            );
            journal.rollback();
        }
        result
    }

    fn record_pass(
        &mut self,
        target: &RenderTarget,
        commands: &[Command],
        journal: &mut LayoutJournal,
    ) -> Result<()> {
        let sampled = layout::transition_sampled_textures(&mut *self.cmd, commands, journal)?;

        let tracker = &mut *self.tracker;
        target.iterate_all_attachments(|attachment| {
            tracker.track(&attachment.texture);
            if let Some(resolve) = &attachment.resolve_texture {
                tracker.track(resolve);
            }
            true
        });
        for texture in layout::sampled_textures(commands) {
            self.tracker.track(texture);
        }

        let plan = plan_pass(target);
        let barriers = layout::transition_attachments(&mut *self.cmd, &plan, journal)?;
        strata_debug!(
            SOURCE,
            "Pass '{}': {} attachments, {} commands, {} barriers",
            self.label,
            plan.desc.attachments.len(),
            commands.len(),
            sampled + barriers
        );

        let label = (!self.label.is_empty()).then_some(self.label.as_str());
        let (render_pass, framebuffer) = create_pass_objects(self.device, &plan, label)?;
        self.tracker.track(&render_pass);
        self.tracker.track(&framebuffer);

        let binding_sets = allocate_binding_sets(self.device, commands)?;
        for binding_set in &binding_sets {
            self.tracker.track(binding_set);
        }

        let render_area = Rect2D::from_size(plan.width, plan.height);
        self.cmd.begin_render_pass(&render_pass, &framebuffer, render_area, &plan.clear_values)?;

        let encoded = self.encode_commands(commands, &binding_sets, (plan.width, plan.height));
        let ended = self.cmd.end_render_pass();
        encoded?;
        ended?;

        layout::apply_final_layouts(&plan);
        Ok(())
    }

    fn encode_commands(
        &mut self,
        commands: &[Command],
        binding_sets: &[Arc<dyn BindingSet>],
        target_size: (u32, u32),
    ) -> Result<()> {
        let mut cache = PassBindingsCache::new();
        for (command, binding_set) in commands.iter().zip(binding_sets) {
            let labeled = self.config.enable_debug_labels && !command.label.is_empty();
            if labeled {
                self.cmd.push_debug_group(&command.label);
            }
            let result = self.encode_command(command, binding_set, &mut cache, target_size);
            if labeled {
                self.cmd.pop_debug_group();
            }
            result?;
        }
        Ok(())
    }

    fn encode_command(
        &mut self,
        command: &Command,
        binding_set: &Arc<dyn BindingSet>,
        cache: &mut PassBindingsCache,
        target_size: (u32, u32),
    ) -> Result<()> {
        let cmd = &mut *self.cmd;

        cmd.bind_binding_set(&command.pipeline, binding_set)?;
        cache.bind_pipeline(cmd, &command.pipeline)?;

        cmd.set_viewport(effective_viewport(command.viewport, target_size))?;
        cmd.set_scissor(
            command
                .scissor
                .unwrap_or_else(|| Rect2D::from_size(target_size.0, target_size.1)),
        )?;

        cache.set_stencil_reference(cmd, command.stencil_reference)?;

        let vertices = &command.vertex_buffer;
        let Some(vertex_view) = &vertices.vertex_buffer else {
            strata_bail!(InvalidCommand, SOURCE, "Command '{}' has no vertex buffer", command.label);
        };

        let allocator: &dyn Allocator = self.device.resource_allocator();
        let vertex_buffer = allocator.realize(vertex_view).map_err(|e| {
            strata_err!(
                ResourceUnavailable,
                SOURCE,
                "Failed to acquire device buffer for vertex buffer view: {}",
                e
            )
        })?;
        self.tracker.track(&vertex_buffer);
        cmd.bind_vertex_buffer(&vertex_buffer, vertex_view.range.offset)?;

        if vertices.index_type == IndexType::None {
            return cmd.draw(
                vertices.vertex_count,
                command.instance_count,
                command.base_vertex,
                0,
            );
        }

        let Some(index_view) = &vertices.index_buffer else {
            strata_bail!(InvalidCommand, SOURCE, "Command '{}' has no index buffer", command.label);
        };
        let index_buffer = allocator.realize(index_view).map_err(|e| {
            strata_err!(
                ResourceUnavailable,
                SOURCE,
                "Failed to acquire device buffer for index buffer view: {}",
                e
            )
        })?;
        self.tracker.track(&index_buffer);
        cmd.bind_index_buffer(&index_buffer, index_view.range.offset, vertices.index_type)?;

        let vertex_offset = indexed_vertex_offset(command)?;
        cmd.draw_indexed(
            vertices.vertex_count,
            command.instance_count,
            0,
            vertex_offset,
            0,
        )
    }
}

impl PassEncoder for RenderPassEncoder<'_> {
    fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    fn encode(&mut self, target: &RenderTarget, commands: &[Command]) -> Result<()> {
        if self.config.validate_render_target {
            target.validate()?;
        } else {
            target.validate_bind_indices()?;
        }
        validate_commands(commands)?;

        let labeled = self.config.enable_debug_labels && !self.label.is_empty();
        if labeled {
            self.cmd.push_debug_group(&self.label);
        }
        let result = self.encode_pass(target, commands);
        if labeled {
            self.cmd.pop_debug_group();
        }
        result
    }
}

/// Reject the whole list before any native call if a command lacks data
fn validate_commands(commands: &[Command]) -> Result<()> {
    for (index, command) in commands.iter().enumerate() {
        let vertices = &command.vertex_buffer;
        if vertices.vertex_buffer.is_none() {
            strata_bail!(
                InvalidCommand,
                SOURCE,
                "Command {} ('{}') has no vertex buffer",
                index,
                command.label
            );
        }
        if vertices.index_type != IndexType::None && vertices.index_buffer.is_none() {
            strata_bail!(
                InvalidCommand,
                SOURCE,
                "Command {} ('{}') uses {:?} indices without an index buffer",
                index,
                command.label,
                vertices.index_type
            );
        }
        if vertices.index_type != IndexType::None {
            indexed_vertex_offset(command)?;
        }
    }
    Ok(())
}

/// Signed vertex offset of an indexed draw
fn indexed_vertex_offset(command: &Command) -> Result<i32> {
    i32::try_from(command.base_vertex).map_err(|_| {
        strata_err!(
            InvalidCommand,
            SOURCE,
            "Command '{}' base vertex {} does not fit an indexed vertex offset",
            command.label,
            command.base_vertex
        )
    })
}

/// Convert a top-left-origin viewport to the native bottom-up convention
pub fn effective_viewport(viewport: Option<Rect>, target_size: (u32, u32)) -> Viewport {
    let rect = viewport.unwrap_or_else(|| Rect::from_size(target_size.0, target_size.1));
    Viewport {
        x: rect.x,
        y: rect.y + rect.height,
        width: rect.width,
        height: -rect.height,
        min_depth: 0.0,
        max_depth: 1.0,
    }
}

#[cfg(test)]
#[path = "render_pass_encoder_tests.rs"]
mod tests;
