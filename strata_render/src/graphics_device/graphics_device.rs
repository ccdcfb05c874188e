/// GraphicsDevice trait - factory for the native objects a pass needs

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    Allocator, BindingSet, BindingSetDesc, Framebuffer, FramebufferDesc,
    RenderPass, RenderPassDesc,
};

/// Native object factory
///
/// One implementation per target API (Vulkan, ...). Every object handed out
/// is reference counted so the resource tracker can extend its lifetime
/// until the GPU has consumed it.
pub trait GraphicsDevice: Send + Sync {
    /// Create a single-subpass render pass
    ///
    /// # Arguments
    ///
    /// * `desc` - Attachment descriptions and the subpass references into them
    /// * `label` - Optional debug name for diagnostic tooling
    fn create_render_pass(
        &self,
        desc: &RenderPassDesc,
        label: Option<&str>,
    ) -> Result<Arc<dyn RenderPass>>;

    /// Create a framebuffer compatible with `desc.render_pass`
    ///
    /// Attachment order must match the render pass attachment order exactly.
    fn create_framebuffer(&self, desc: &FramebufferDesc) -> Result<Arc<dyn Framebuffer>>;

    /// Allocate one binding set per descriptor in a single batch
    ///
    /// Either every set is returned (aligned 1:1 with `descs`) or an error is;
    /// a partial batch is never exposed.
    fn allocate_binding_sets(
        &self,
        descs: &[BindingSetDesc<'_>],
    ) -> Result<Vec<Arc<dyn BindingSet>>>;

    /// Allocator used to realize logical buffer views into device buffers
    fn resource_allocator(&self) -> &dyn Allocator;
}
