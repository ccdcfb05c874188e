/// RenderPass trait and render pass descriptors

use std::any::Any;
use crate::graphics_device::{SampleCount, TextureFormat};

/// Render pass trait
///
/// Opaque native render pass handle.
pub trait RenderPass: Send + Sync {
    /// Downcast support for backends
    fn as_any(&self) -> &dyn Any;
}

/// Load operation for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAction {
    /// Load existing content
    Load,
    /// Clear the content
    Clear,
    /// Don't care about existing content
    DontCare,
}

/// Store operation for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreAction {
    /// Store the rendered content
    Store,
    /// Don't care about storing the content
    DontCare,
}

/// Image layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageLayout {
    /// Undefined layout (contents are garbage)
    Undefined,
    /// Generic layout usable for any access
    General,
    /// Layout for color attachment
    ColorAttachment,
    /// Layout for depth/stencil attachment
    DepthStencilAttachment,
    /// Layout for shader read-only access
    ShaderReadOnly,
    /// Layout for presenting to a swapchain
    PresentSrc,
}

/// Descriptor for a single attachment in a render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentDescription {
    /// Pixel format
    pub format: TextureFormat,
    /// Number of samples
    pub sample_count: SampleCount,
    /// Load operation for color/depth aspects
    pub load_action: LoadAction,
    /// Store operation for color/depth aspects
    pub store_action: StoreAction,
    /// Load operation for the stencil aspect
    pub stencil_load_action: LoadAction,
    /// Store operation for the stencil aspect
    pub stencil_store_action: StoreAction,
    /// Layout the image is in when the pass begins
    pub initial_layout: ImageLayout,
    /// Layout the pass leaves the image in
    pub final_layout: ImageLayout,
}

/// Reference from the subpass into the attachment array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentReference {
    /// Index into `RenderPassDesc::attachments`, `None` for an unused slot
    pub attachment: Option<u32>,
    /// Layout the attachment is in during the subpass
    pub layout: ImageLayout,
}

impl AttachmentReference {
    /// Marker for a color location the shader does not write
    pub const UNUSED: Self = Self { attachment: None, layout: ImageLayout::Undefined };

    pub fn new(attachment: u32, layout: ImageLayout) -> Self {
        Self { attachment: Some(attachment), layout }
    }

    pub fn is_unused(&self) -> bool {
        self.attachment.is_none()
    }
}

/// The single subpass of a render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubpassDescription {
    /// Indexed by shader output location
    pub color_attachments: Vec<AttachmentReference>,
    /// Mirrors `color_attachments` sizing and indexing
    pub resolve_attachments: Vec<AttachmentReference>,
    /// Combined depth/stencil reference
    pub depth_stencil_attachment: AttachmentReference,
}

/// Descriptor for creating a render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPassDesc {
    /// Attachments in framebuffer order
    pub attachments: Vec<AttachmentDescription>,
    /// The one subpass
    pub subpass: SubpassDescription,
}
