/// Texture trait, pixel formats and texture descriptors

use std::any::Any;
use crate::graphics_device::ImageLayout;

/// Texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8_UNORM,
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,
    R16G16B16A16_SFLOAT,
    S8_UINT,
    D16_UNORM,
    D32_FLOAT,
    D24_UNORM_S8_UINT,
    D32_FLOAT_S8_UINT,
}

/// Which aspects of an attachment a format carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Color,
    Depth,
    Stencil,
    DepthStencil,
}

impl TextureFormat {
    /// Classify the format by the attachment aspects it provides
    pub fn attachment_kind(&self) -> AttachmentKind {
        match self {
            TextureFormat::S8_UINT => AttachmentKind::Stencil,
            TextureFormat::D16_UNORM | TextureFormat::D32_FLOAT => AttachmentKind::Depth,
            TextureFormat::D24_UNORM_S8_UINT | TextureFormat::D32_FLOAT_S8_UINT => {
                AttachmentKind::DepthStencil
            }
            _ => AttachmentKind::Color,
        }
    }
}

/// Multisample count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleCount {
    Count1,
    Count2,
    Count4,
    Count8,
}

impl SampleCount {
    pub fn as_u32(&self) -> u32 {
        match self {
            SampleCount::Count1 => 1,
            SampleCount::Count2 => 2,
            SampleCount::Count4 => 4,
            SampleCount::Count8 => 8,
        }
    }
}

/// Where a texture's memory lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// CPU-visible memory
    HostVisible,
    /// Device-local memory that outlives the pass
    DevicePrivate,
    /// Device-local scratch, never read back (contents die with the pass)
    DeviceTransient,
}

/// Declared usage of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureUsage {
    /// Sampled by shaders only
    Sampled,
    /// Render target only
    RenderTarget,
    /// Render target that later passes sample
    SampledAndRenderTarget,
    /// Depth and/or stencil attachment
    DepthStencil,
}

/// Descriptor for creating a texture (also its read-only properties)
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub sample_count: SampleCount,
    pub storage_mode: StorageMode,
    pub usage: TextureUsage,
}

impl TextureDesc {
    /// Single-sampled, device-private render target that can be sampled later
    pub fn render_target(width: u32, height: u32, format: TextureFormat) -> Self {
        let usage = match format.attachment_kind() {
            AttachmentKind::Color => TextureUsage::SampledAndRenderTarget,
            _ => TextureUsage::DepthStencil,
        };
        Self {
            width,
            height,
            format,
            sample_count: SampleCount::Count1,
            storage_mode: StorageMode::DevicePrivate,
            usage,
        }
    }
}

/// Texture resource trait
///
/// The tracked layout is shared by every attachment and binding that refers
/// to the same image, so implementations store it behind interior
/// mutability.
pub trait Texture: Send + Sync {
    /// Read-only texture properties
    fn desc(&self) -> &TextureDesc;

    /// Layout the image is currently tracked in
    fn layout(&self) -> ImageLayout;

    /// Record a new layout without encoding anything
    ///
    /// Used after barriers, and when a render pass end performs the
    /// transition as a side effect. Returns the previous layout.
    fn set_layout_without_encoding(&self, layout: ImageLayout) -> ImageLayout;

    /// False once the underlying native image is gone
    fn is_valid(&self) -> bool {
        true
    }

    /// Debug label
    fn label(&self) -> &str {
        ""
    }

    /// Downcast support for backends
    fn as_any(&self) -> &dyn Any;
}
