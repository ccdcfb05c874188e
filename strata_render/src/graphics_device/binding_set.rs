/// BindingSet trait and the per-draw resource bindings it packs
///
/// A BindingSet is an opaque, immutable collection of resource bindings
/// (buffers, textures, samplers) consumed by one draw call. On Vulkan it is a
/// descriptor set.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;
use crate::graphics_device::{BufferView, Pipeline, Sampler, Texture};

// ============================================================================
// Slots and bound resources
// ============================================================================

/// Shader reflection data for one named resource slot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderSlot {
    /// Name of the resource in the shader
    pub name: String,
    /// Binding number inside the set (`layout(binding = N)`)
    pub binding: u32,
}

impl ShaderSlot {
    pub fn new(name: impl Into<String>, binding: u32) -> Self {
        Self { name: name.into(), binding }
    }
}

/// How a bound buffer is read by the shader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Uniform,
    Storage,
}

/// A buffer bound at a slot
#[derive(Debug, Clone)]
pub struct BoundBuffer {
    pub slot: ShaderSlot,
    pub kind: BufferKind,
    pub view: BufferView,
}

/// A texture + sampler bound at a slot
#[derive(Clone)]
pub struct BoundTexture {
    pub slot: ShaderSlot,
    pub texture: Arc<dyn Texture>,
    pub sampler: Arc<dyn Sampler>,
}

impl std::fmt::Debug for BoundTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundTexture")
            .field("slot", &self.slot)
            .field("texture", &self.texture.label())
            .finish_non_exhaustive()
    }
}

/// Named bindings of one shader stage
///
/// Keyed by slot name so re-binding a name replaces the previous resource.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    pub buffers: BTreeMap<String, BoundBuffer>,
    pub sampled_images: BTreeMap<String, BoundTexture>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a uniform buffer
    pub fn bind_buffer(&mut self, slot: ShaderSlot, view: BufferView) -> &mut Self {
        self.bind_buffer_of_kind(slot, BufferKind::Uniform, view)
    }

    /// Bind a storage buffer
    pub fn bind_storage_buffer(&mut self, slot: ShaderSlot, view: BufferView) -> &mut Self {
        self.bind_buffer_of_kind(slot, BufferKind::Storage, view)
    }

    fn bind_buffer_of_kind(&mut self, slot: ShaderSlot, kind: BufferKind, view: BufferView) -> &mut Self {
        self.buffers.insert(slot.name.clone(), BoundBuffer { slot, kind, view });
        self
    }

    /// Bind a combined texture + sampler
    pub fn bind_texture(
        &mut self,
        slot: ShaderSlot,
        texture: Arc<dyn Texture>,
        sampler: Arc<dyn Sampler>,
    ) -> &mut Self {
        self.sampled_images.insert(slot.name.clone(), BoundTexture { slot, texture, sampler });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty() && self.sampled_images.is_empty()
    }

    /// Total number of bound resources
    pub fn len(&self) -> usize {
        self.buffers.len() + self.sampled_images.len()
    }
}

// ============================================================================
// BindingSet trait
// ============================================================================

/// Everything needed to build one draw's binding set
pub struct BindingSetDesc<'a> {
    /// Pipeline whose set layout the bindings follow
    pub pipeline: &'a Arc<dyn Pipeline>,
    /// Vertex-stage bindings
    pub vertex_bindings: &'a Bindings,
    /// Fragment-stage bindings
    pub fragment_bindings: &'a Bindings,
}

/// An immutable set of GPU resource bindings
pub trait BindingSet: Send + Sync {
    /// Downcast support for backends
    fn as_any(&self) -> &dyn Any;
}
