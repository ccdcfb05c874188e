/// Attachment descriptor builder
///
/// Converts one logical attachment into the native attachment description,
/// resolving the requested load/store actions against the image's tracked
/// layout and storage mode.

use crate::encoder::Attachment;
use crate::graphics_device::{
    AttachmentDescription, AttachmentKind, ImageLayout, LoadAction, StorageMode,
    StoreAction, Texture,
};

/// Which image of an attachment to describe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentSlot {
    /// The image rendered into
    Primary,
    /// The image a multisampled primary resolves into
    Resolve,
}

/// Describe the selected image of `attachment`
///
/// Returns `None` when the selected image is absent (a missing resolve
/// texture). Resolution rules, in order:
/// - an image in `Undefined` layout always clears
/// - a transient image never stores
/// - otherwise a resolve image always stores
/// - any tracked layout other than `Undefined`/`PresentSrc` starts the pass
///   in `General`
pub fn describe_attachment(
    attachment: &Attachment,
    slot: AttachmentSlot,
) -> Option<AttachmentDescription> {
    let texture: &dyn Texture = match slot {
        AttachmentSlot::Primary => attachment.texture.as_ref(),
        AttachmentSlot::Resolve => attachment.resolve_texture.as_deref()?,
    };
    let desc = texture.desc();
    let current_layout = texture.layout();

    let mut load_action = attachment.load_action;
    let mut store_action = attachment.store_action;

    if current_layout == ImageLayout::Undefined {
        load_action = LoadAction::Clear;
    }

    if desc.storage_mode == StorageMode::DeviceTransient {
        store_action = StoreAction::DontCare;
    } else if slot == AttachmentSlot::Resolve {
        store_action = StoreAction::Store;
    }

    let initial_layout = match current_layout {
        ImageLayout::Undefined | ImageLayout::PresentSrc => current_layout,
        _ => ImageLayout::General,
    };

    let kind = desc.format.attachment_kind();
    let (load, store) = match kind {
        AttachmentKind::Stencil => (LoadAction::DontCare, StoreAction::DontCare),
        _ => (load_action, store_action),
    };
    let (stencil_load, stencil_store) = match kind {
        AttachmentKind::Stencil | AttachmentKind::DepthStencil => (load_action, store_action),
        _ => (LoadAction::DontCare, StoreAction::DontCare),
    };

    Some(AttachmentDescription {
        format: desc.format,
        sample_count: desc.sample_count,
        load_action: load,
        store_action: store,
        stencil_load_action: stencil_load,
        stencil_store_action: stencil_store,
        initial_layout,
        final_layout: final_layout_for(kind),
    })
}

/// Layout the pass leaves an attachment of `kind` in
pub fn final_layout_for(kind: AttachmentKind) -> ImageLayout {
    match kind {
        AttachmentKind::Color => ImageLayout::General,
        _ => ImageLayout::DepthStencilAttachment,
    }
}

/// Layout an attachment of `kind` is referenced with inside the subpass
pub fn subpass_layout_for(kind: AttachmentKind) -> ImageLayout {
    match kind {
        AttachmentKind::Color => ImageLayout::ColorAttachment,
        _ => ImageLayout::DepthStencilAttachment,
    }
}

#[cfg(test)]
#[path = "attachment_tests.rs"]
mod tests;
