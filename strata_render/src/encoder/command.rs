/// Draw command as produced by the recording layer

use std::sync::Arc;
use crate::graphics_device::{Bindings, BufferView, IndexType, Pipeline, Rect2D};

/// Floating point rectangle in top-left-origin logical space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle at the origin covering `width` x `height`
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }
}

/// Vertex (and optional index) data of one draw
#[derive(Debug, Clone)]
pub struct VertexBufferBinding {
    /// Required; a command without it cannot be encoded
    pub vertex_buffer: Option<BufferView>,
    /// Required when `index_type` is not `IndexType::None`
    pub index_buffer: Option<BufferView>,
    pub index_type: IndexType,
    /// Vertex count, or index count for indexed draws
    pub vertex_count: u32,
}

impl Default for VertexBufferBinding {
    fn default() -> Self {
        Self {
            vertex_buffer: None,
            index_buffer: None,
            index_type: IndexType::None,
            vertex_count: 0,
        }
    }
}

/// One draw call and the state it needs
#[derive(Clone)]
pub struct Command {
    pub pipeline: Arc<dyn Pipeline>,
    pub vertex_buffer: VertexBufferBinding,
    /// Viewport override, full target when `None`
    pub viewport: Option<Rect>,
    /// Scissor override, full target when `None`
    pub scissor: Option<Rect2D>,
    pub stencil_reference: u32,
    pub instance_count: u32,
    pub base_vertex: u32,
    pub vertex_bindings: Bindings,
    pub fragment_bindings: Bindings,
    /// Debug label, empty for none
    pub label: String,
}

impl Command {
    pub fn new(pipeline: Arc<dyn Pipeline>) -> Self {
        Self {
            pipeline,
            vertex_buffer: VertexBufferBinding::default(),
            viewport: None,
            scissor: None,
            stencil_reference: 0,
            instance_count: 1,
            base_vertex: 0,
            vertex_bindings: Bindings::new(),
            fragment_bindings: Bindings::new(),
            label: String::new(),
        }
    }

    /// Non-indexed vertex data
    pub fn with_vertices(mut self, view: BufferView, vertex_count: u32) -> Self {
        self.vertex_buffer.vertex_buffer = Some(view);
        self.vertex_buffer.vertex_count = vertex_count;
        self
    }

    /// Index data; `vertex_count` is then read as the index count
    pub fn with_indices(mut self, view: BufferView, index_type: IndexType) -> Self {
        self.vertex_buffer.index_buffer = Some(view);
        self.vertex_buffer.index_type = index_type;
        self
    }

    pub fn with_stencil_reference(mut self, reference: u32) -> Self {
        self.stencil_reference = reference;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Both binding collections, vertex stage first
    pub fn bindings(&self) -> [&Bindings; 2] {
        [&self.vertex_bindings, &self.fragment_bindings]
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("pipeline", &self.pipeline.label())
            .field("vertex_buffer", &self.vertex_buffer)
            .field("stencil_reference", &self.stencil_reference)
            .field("instance_count", &self.instance_count)
            .field("base_vertex", &self.base_vertex)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
