/// CommandList - Vulkan implementation of the CommandList trait

use std::ffi::CString;
use std::sync::Arc;
use ash::vk;
use strata_render::strata::render::{
    BindingSet as RendererBindingSet, ClearValue, CommandList as RendererCommandList,
    DeviceBuffer, Framebuffer as RendererFramebuffer, ImageBarrier, IndexType,
    Pipeline as RendererPipeline, Rect2D, RenderPass as RendererRenderPass,
    Texture as RendererTexture, Viewport,
};
use strata_render::strata::{Error, Result};
use strata_render::{strata_bail, strata_err};
use crate::vulkan_binding_set::BindingSet;
use crate::vulkan_buffer::Buffer;
use crate::vulkan_context::GpuContext;
use crate::vulkan_format::{
    access_flags_to_vk, aspect_mask_for, clear_value_to_vk, image_layout_to_vk,
    index_type_to_vk, pipeline_stages_to_vk, rect_to_vk, viewport_to_vk,
};
use crate::vulkan_frame_buffer::Framebuffer;
use crate::vulkan_pipeline::Pipeline;
use crate::vulkan_render_pass::RenderPass;
use crate::vulkan_texture::Texture;

/// Downcast a backend-agnostic object to its Vulkan type
fn downcast<'a, T: 'static>(object: &'a dyn std::any::Any, what: &str) -> Result<&'a T> {
    object.downcast_ref::<T>().ok_or_else(|| {
        strata_err!(BackendError, "strata::vulkan", "{} was not created by the Vulkan device", what)
    })
}

/// Vulkan command list implementation
///
/// Records rendering commands for later submission to the GPU.
pub struct CommandList {
    /// Shared GPU context (device, debug utils)
    ctx: Arc<GpuContext>,
    /// Command pool for allocating command buffers
    command_pool: vk::CommandPool,
    /// Command buffer for recording
    command_buffer: vk::CommandBuffer,
    /// Whether the command list is currently recording
    is_recording: bool,
    /// Whether we're inside a render pass
    in_render_pass: bool,
    /// Open debug label regions
    debug_depth: u32,
}

impl CommandList {
    /// Create a new command list
    ///
    /// # Arguments
    ///
    /// * `ctx` - Shared GPU context
    pub(crate) fn new(ctx: Arc<GpuContext>) -> Result<Self> {
        unsafe {
            // Create command pool
            let command_pool_create_info = vk::CommandPoolCreateInfo::default()
                .queue_family_index(ctx.graphics_queue_family)
                .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);

            let command_pool = ctx.device.create_command_pool(&command_pool_create_info, None)
                .map_err(|e| strata_err!(BackendError, "strata::vulkan", "Failed to create command pool: {:?}", e))?;

            // Allocate command buffer
            let command_buffer_allocate_info = vk::CommandBufferAllocateInfo::default()
                .command_pool(command_pool)
                .level(vk::CommandBufferLevel::PRIMARY)
                .command_buffer_count(1);

            let command_buffer = match ctx.device.allocate_command_buffers(&command_buffer_allocate_info) {
                Ok(buffers) if !buffers.is_empty() => buffers[0],
                Ok(_) => {
                    ctx.device.destroy_command_pool(command_pool, None);
                    strata_bail!(BackendError, "strata::vulkan", "Driver returned no command buffer");
                }
                Err(e) => {
                    ctx.device.destroy_command_pool(command_pool, None);
                    strata_bail!(BackendError, "strata::vulkan", "Failed to allocate command buffer: {:?}", e);
                }
            };

            Ok(Self {
                ctx,
                command_pool,
                command_buffer,
                is_recording: false,
                in_render_pass: false,
                debug_depth: 0,
            })
        }
    }

    /// Get the underlying Vulkan command buffer
    pub fn command_buffer(&self) -> vk::CommandBuffer {
        self.command_buffer
    }

    fn ensure_recording(&self) -> Result<()> {
        if !self.is_recording {
            return Err(Error::BackendError("Command list not recording".to_string()));
        }
        Ok(())
    }

    fn ensure_in_render_pass(&self) -> Result<()> {
        self.ensure_recording()?;
        if !self.in_render_pass {
            return Err(Error::BackendError("Not inside a render pass".to_string()));
        }
        Ok(())
    }
}

impl RendererCommandList for CommandList {
    fn begin(&mut self) -> Result<()> {
        if self.is_recording {
            return Err(Error::BackendError("Command list already recording".to_string()));
        }

        unsafe {
            // Reset command buffer
            self.ctx.device
                .reset_command_buffer(self.command_buffer, vk::CommandBufferResetFlags::empty())
                .map_err(|e| Error::BackendError(format!("Failed to reset command buffer: {:?}", e)))?;

            // Begin command buffer
            let begin_info = vk::CommandBufferBeginInfo::default()
                .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

            self.ctx.device
                .begin_command_buffer(self.command_buffer, &begin_info)
                .map_err(|e| Error::BackendError(format!("Failed to begin command buffer: {:?}", e)))?;
        }

        self.is_recording = true;
        self.in_render_pass = false;
        self.debug_depth = 0;
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.ensure_recording()?;

        if self.in_render_pass {
            return Err(Error::BackendError("Render pass not ended before ending command list".to_string()));
        }

        unsafe {
            self.ctx.device
                .end_command_buffer(self.command_buffer)
                .map_err(|e| Error::BackendError(format!("Failed to end command buffer: {:?}", e)))?;
        }

        self.is_recording = false;
        Ok(())
    }

    fn image_barrier(&mut self, texture: &dyn RendererTexture, barrier: &ImageBarrier) -> Result<()> {
        self.ensure_recording()?;
        if self.in_render_pass {
            return Err(Error::BackendError("Image barrier recorded inside a render pass".to_string()));
        }
        if !texture.is_valid() {
            strata_bail!(
                ResourceUnavailable, "strata::vulkan",
                "Texture '{}' has no native image", texture.label()
            );
        }
        let vk_texture = downcast::<Texture>(texture.as_any(), "Texture")?;

        let subresource_range = vk::ImageSubresourceRange::default()
            .aspect_mask(aspect_mask_for(texture.desc().format))
            .base_mip_level(0)
            .level_count(vk::REMAINING_MIP_LEVELS)
            .base_array_layer(0)
            .layer_count(vk::REMAINING_ARRAY_LAYERS);

        let image_barrier = vk::ImageMemoryBarrier::default()
            .old_layout(image_layout_to_vk(barrier.old_layout))
            .new_layout(image_layout_to_vk(barrier.new_layout))
            .src_access_mask(access_flags_to_vk(barrier.src_access))
            .dst_access_mask(access_flags_to_vk(barrier.dst_access))
            .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .image(vk_texture.image)
            .subresource_range(subresource_range);

        unsafe {
            self.ctx.device.cmd_pipeline_barrier(
                self.command_buffer,
                pipeline_stages_to_vk(barrier.src_stages),
                pipeline_stages_to_vk(barrier.dst_stages),
                vk::DependencyFlags::empty(),
                &[],
                &[],
                &[image_barrier],
            );
        }
        Ok(())
    }

    fn begin_render_pass(
        &mut self,
        render_pass: &Arc<dyn RendererRenderPass>,
        framebuffer: &Arc<dyn RendererFramebuffer>,
        render_area: Rect2D,
        clear_values: &[ClearValue],
    ) -> Result<()> {
        self.ensure_recording()?;

        if self.in_render_pass {
            return Err(Error::BackendError("Already inside a render pass".to_string()));
        }

        let vk_render_pass = downcast::<RenderPass>(render_pass.as_any(), "Render pass")?;
        let vk_framebuffer = downcast::<Framebuffer>(framebuffer.as_any(), "Framebuffer")?;

        // Convert clear values
        let vk_clear_values: Vec<vk::ClearValue> = clear_values.iter().map(clear_value_to_vk).collect();

        let render_pass_info = vk::RenderPassBeginInfo::default()
            .render_pass(vk_render_pass.render_pass)
            .framebuffer(vk_framebuffer.framebuffer)
            .render_area(rect_to_vk(render_area))
            .clear_values(&vk_clear_values);

        unsafe {
            self.ctx.device.cmd_begin_render_pass(
                self.command_buffer,
                &render_pass_info,
                vk::SubpassContents::INLINE,
            );
        }

        self.in_render_pass = true;
        Ok(())
    }

    fn end_render_pass(&mut self) -> Result<()> {
        self.ensure_in_render_pass()?;

        unsafe {
            self.ctx.device.cmd_end_render_pass(self.command_buffer);
        }
        self.in_render_pass = false;
        Ok(())
    }

    fn bind_pipeline(&mut self, pipeline: &Arc<dyn RendererPipeline>) -> Result<()> {
        self.ensure_in_render_pass()?;
        let vk_pipeline = downcast::<Pipeline>(pipeline.as_any(), "Pipeline")?;

        unsafe {
            self.ctx.device.cmd_bind_pipeline(
                self.command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                vk_pipeline.pipeline,
            );
        }
        Ok(())
    }

    fn bind_binding_set(
        &mut self,
        pipeline: &Arc<dyn RendererPipeline>,
        binding_set: &Arc<dyn RendererBindingSet>,
    ) -> Result<()> {
        self.ensure_in_render_pass()?;
        let vk_pipeline = downcast::<Pipeline>(pipeline.as_any(), "Pipeline")?;
        let vk_binding_set = downcast::<BindingSet>(binding_set.as_any(), "Binding set")?;

        unsafe {
            self.ctx.device.cmd_bind_descriptor_sets(
                self.command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                vk_pipeline.pipeline_layout,
                0, // first_set
                &[vk_binding_set.descriptor_set],
                &[], // dynamic_offsets
            );
        }
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.ensure_recording()?;

        unsafe {
            self.ctx.device.cmd_set_viewport(self.command_buffer, 0, &[viewport_to_vk(viewport)]);
        }
        Ok(())
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        self.ensure_recording()?;

        unsafe {
            self.ctx.device.cmd_set_scissor(self.command_buffer, 0, &[rect_to_vk(scissor)]);
        }
        Ok(())
    }

    fn set_stencil_reference(&mut self, reference: u32) -> Result<()> {
        self.ensure_recording()?;

        unsafe {
            self.ctx.device.cmd_set_stencil_reference(
                self.command_buffer,
                vk::StencilFaceFlags::FRONT_AND_BACK,
                reference,
            );
        }
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn DeviceBuffer>, offset: u64) -> Result<()> {
        self.ensure_in_render_pass()?;
        let vk_buffer = downcast::<Buffer>(buffer.as_any(), "Vertex buffer")?;

        unsafe {
            self.ctx.device.cmd_bind_vertex_buffers(
                self.command_buffer,
                0, // first_binding
                &[vk_buffer.buffer],
                &[offset],
            );
        }
        Ok(())
    }

    fn bind_index_buffer(
        &mut self,
        buffer: &Arc<dyn DeviceBuffer>,
        offset: u64,
        index_type: IndexType,
    ) -> Result<()> {
        self.ensure_in_render_pass()?;
        let vk_buffer = downcast::<Buffer>(buffer.as_any(), "Index buffer")?;
        let Some(vk_index_type) = index_type_to_vk(index_type) else {
            strata_bail!(BackendError, "strata::vulkan", "Cannot bind an index buffer without an index type");
        };

        unsafe {
            self.ctx.device.cmd_bind_index_buffer(
                self.command_buffer,
                vk_buffer.buffer,
                offset,
                vk_index_type,
            );
        }
        Ok(())
    }

    fn draw(
        &mut self,
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    ) -> Result<()> {
        self.ensure_in_render_pass()?;

        unsafe {
            self.ctx.device.cmd_draw(
                self.command_buffer,
                vertex_count,
                instance_count,
                first_vertex,
                first_instance,
            );
        }
        Ok(())
    }

    fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) -> Result<()> {
        self.ensure_in_render_pass()?;

        unsafe {
            self.ctx.device.cmd_draw_indexed(
                self.command_buffer,
                index_count,
                instance_count,
                first_index,
                vertex_offset,
                first_instance,
            );
        }
        Ok(())
    }

    fn push_debug_group(&mut self, label: &str) {
        let Some(debug_utils) = &self.ctx.debug_utils else {
            return;
        };
        if !self.is_recording {
            return;
        }
        let name = CString::new(label.replace('\0', " ")).unwrap_or_default();

        let label_info = vk::DebugUtilsLabelEXT::default().label_name(&name);
        unsafe {
            debug_utils.cmd_begin_debug_utils_label(self.command_buffer, &label_info);
        }
        self.debug_depth += 1;
    }

    fn pop_debug_group(&mut self) {
        let Some(debug_utils) = &self.ctx.debug_utils else {
            return;
        };
        // Unbalanced pops are ignored
        if !self.is_recording || self.debug_depth == 0 {
            return;
        }

        unsafe {
            debug_utils.cmd_end_debug_utils_label(self.command_buffer);
        }
        self.debug_depth -= 1;
    }
}

impl Drop for CommandList {
    fn drop(&mut self) {
        unsafe {
            // Command buffer is freed with its pool
            self.ctx.device.destroy_command_pool(self.command_pool, None);
        }
    }
}
