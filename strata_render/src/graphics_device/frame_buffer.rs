/// Framebuffer trait - groups the image views a render pass renders into

use std::any::Any;
use std::sync::Arc;
use crate::graphics_device::{RenderPass, Texture};

/// Framebuffer - the image views bound to a render pass instance
///
/// Created fresh for each encoded pass and kept alive by the resource
/// tracker until the GPU is done with it.
pub trait Framebuffer: Send + Sync {
    /// Get the width in pixels
    fn width(&self) -> u32;

    /// Get the height in pixels
    fn height(&self) -> u32;

    /// Downcast support for backends
    fn as_any(&self) -> &dyn Any;
}

/// Descriptor for creating a framebuffer
pub struct FramebufferDesc<'a> {
    /// The render pass this framebuffer is compatible with
    pub render_pass: &'a Arc<dyn RenderPass>,
    /// Images in exactly the render pass attachment order
    pub attachments: Vec<Arc<dyn Texture>>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}
