/// CommandList trait - the native command stream a pass is encoded into

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    BindingSet, DeviceBuffer, Framebuffer, ImageBarrier, IndexType, Pipeline,
    RenderPass, Texture,
};

/// Native command stream
///
/// Calls are recorded in strict program order. The submission layer owns
/// `begin`/`end` and GPU submission; the encoder only records in between.
pub trait CommandList: Send + Sync {
    /// Begin recording commands
    fn begin(&mut self) -> Result<()>;

    /// End recording commands
    fn end(&mut self) -> Result<()>;

    /// Record an image memory barrier (outside a render pass)
    ///
    /// Fails if the native image no longer exists.
    fn image_barrier(&mut self, texture: &dyn Texture, barrier: &ImageBarrier) -> Result<()>;

    /// Begin a render pass
    ///
    /// # Arguments
    ///
    /// * `render_pass` - The render pass to begin
    /// * `framebuffer` - Framebuffer built against `render_pass`
    /// * `render_area` - Area of the framebuffer the pass touches
    /// * `clear_values` - One entry per render pass attachment, same order
    fn begin_render_pass(
        &mut self,
        render_pass: &Arc<dyn RenderPass>,
        framebuffer: &Arc<dyn Framebuffer>,
        render_area: Rect2D,
        clear_values: &[ClearValue],
    ) -> Result<()>;

    /// End the current render pass
    fn end_render_pass(&mut self) -> Result<()>;

    /// Bind a graphics pipeline
    fn bind_pipeline(&mut self, pipeline: &Arc<dyn Pipeline>) -> Result<()>;

    /// Bind a binding set at set index 0 using the pipeline's layout
    fn bind_binding_set(
        &mut self,
        pipeline: &Arc<dyn Pipeline>,
        binding_set: &Arc<dyn BindingSet>,
    ) -> Result<()>;

    /// Set the viewport
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    /// Set the scissor rectangle
    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()>;

    /// Set the stencil reference for front and back faces
    fn set_stencil_reference(&mut self, reference: u32) -> Result<()>;

    /// Bind a vertex buffer at binding slot 0
    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn DeviceBuffer>, offset: u64) -> Result<()>;

    /// Bind an index buffer
    fn bind_index_buffer(
        &mut self,
        buffer: &Arc<dyn DeviceBuffer>,
        offset: u64,
        index_type: IndexType,
    ) -> Result<()>;

    /// Draw vertices
    fn draw(
        &mut self,
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    ) -> Result<()>;

    /// Draw indexed vertices
    fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) -> Result<()>;

    /// Open a labeled region for GPU debuggers
    fn push_debug_group(&mut self, label: &str);

    /// Close the innermost labeled region
    fn pop_debug_group(&mut self);
}

/// Viewport dimensions and depth range (native convention)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

/// 2D integer rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect2D {
    /// Rectangle at the origin covering `width` x `height`
    pub fn from_size(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }
}

/// Clear value for an attachment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearValue {
    /// Color clear value (RGBA)
    Color([f32; 4]),
    /// Depth/stencil clear value
    DepthStencil { depth: f32, stencil: u32 },
}
