/// Framebuffer - Vulkan implementation of the Framebuffer trait
///
/// Wraps a VkFramebuffer that groups the color, resolve and depth/stencil
/// views of one pass. Created per encode and kept alive by the resource
/// tracker until the GPU is done with it.

use std::any::Any;
use std::sync::Arc;
use ash::vk;
use strata_render::strata::render::{Framebuffer as RendererFramebuffer, RenderPass, Texture};
use crate::vulkan_context::GpuContext;

/// Vulkan framebuffer implementation
///
/// Holds its render pass and attachment textures so the image views it
/// references cannot be destroyed first.
pub struct Framebuffer {
    /// Vulkan framebuffer handle
    pub(crate) framebuffer: vk::Framebuffer,
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    _render_pass: Arc<dyn RenderPass>,
    _attachments: Vec<Arc<dyn Texture>>,
    ctx: Arc<GpuContext>,
}

impl Framebuffer {
    pub(crate) fn new(
        ctx: Arc<GpuContext>,
        framebuffer: vk::Framebuffer,
        width: u32,
        height: u32,
        render_pass: Arc<dyn RenderPass>,
        attachments: Vec<Arc<dyn Texture>>,
    ) -> Self {
        Self {
            framebuffer,
            width,
            height,
            _render_pass: render_pass,
            _attachments: attachments,
            ctx,
        }
    }
}

impl RendererFramebuffer for Framebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_framebuffer(self.framebuffer, None);
        }
    }
}
