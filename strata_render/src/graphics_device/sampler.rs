/// Sampler trait and sampler descriptor

use std::any::Any;

/// Texel filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    Nearest,
    Linear,
}

/// Texture coordinate wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

/// Descriptor for creating a sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerDesc {
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub address_mode: AddressMode,
}

impl Default for SamplerDesc {
    fn default() -> Self {
        Self {
            min_filter: Filter::Linear,
            mag_filter: Filter::Linear,
            address_mode: AddressMode::ClampToEdge,
        }
    }
}

/// Sampler resource trait (combined with a texture in sampled bindings)
pub trait Sampler: Send + Sync {
    fn desc(&self) -> &SamplerDesc;

    /// Downcast support for backends
    fn as_any(&self) -> &dyn Any;
}
