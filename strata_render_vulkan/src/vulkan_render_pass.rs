/// RenderPass - Vulkan implementation of the RenderPass trait

use std::any::Any;
use std::sync::Arc;
use ash::vk;
use strata_render::strata::render::RenderPass as RendererRenderPass;
use crate::vulkan_context::GpuContext;

/// Vulkan render pass implementation
///
/// Simple wrapper around vk::RenderPass
pub struct RenderPass {
    /// Vulkan render pass handle
    pub(crate) render_pass: vk::RenderPass,
    /// Shared GPU context (for cleanup)
    ctx: Arc<GpuContext>,
}

impl RenderPass {
    pub(crate) fn new(ctx: Arc<GpuContext>, render_pass: vk::RenderPass) -> Self {
        Self { render_pass, ctx }
    }
}

impl RendererRenderPass for RenderPass {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for RenderPass {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_render_pass(self.render_pass, None);
        }
    }
}
