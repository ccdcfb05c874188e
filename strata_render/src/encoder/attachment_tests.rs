/// Unit tests for the attachment descriptor builder

use super::*;
use crate::graphics_device::mock_graphics_device::MockTexture;
use crate::graphics_device::{SampleCount, TextureFormat};

#[test]
fn test_undefined_layout_forces_clear() {
    let attachment = Attachment::new(MockTexture::color(8, 8, "c"))
        .with_actions(LoadAction::Load, StoreAction::DontCare);

    let desc = describe_attachment(&attachment, AttachmentSlot::Primary).unwrap();
    assert_eq!(desc.load_action, LoadAction::Clear);
    assert_eq!(desc.store_action, StoreAction::DontCare);
    assert_eq!(desc.initial_layout, ImageLayout::Undefined);
    assert_eq!(desc.final_layout, ImageLayout::General);
}

#[test]
fn test_defined_layout_keeps_load_and_goes_general() {
    let texture = MockTexture::color(8, 8, "c");
    texture.set_layout_without_encoding(ImageLayout::ShaderReadOnly);
    let attachment = Attachment::new(texture).with_actions(LoadAction::Load, StoreAction::Store);

    let desc = describe_attachment(&attachment, AttachmentSlot::Primary).unwrap();
    assert_eq!(desc.load_action, LoadAction::Load);
    assert_eq!(desc.initial_layout, ImageLayout::General);
}

#[test]
fn test_present_layout_is_kept() {
    let texture = MockTexture::color(8, 8, "swapchain");
    texture.set_layout_without_encoding(ImageLayout::PresentSrc);
    let attachment = Attachment::new(texture);

    let desc = describe_attachment(&attachment, AttachmentSlot::Primary).unwrap();
    assert_eq!(desc.initial_layout, ImageLayout::PresentSrc);
}

#[test]
fn test_transient_storage_never_stores() {
    let attachment = Attachment::new(MockTexture::multisampled(8, 8, "msaa"))
        .with_actions(LoadAction::Clear, StoreAction::Store);

    let desc = describe_attachment(&attachment, AttachmentSlot::Primary).unwrap();
    assert_eq!(desc.store_action, StoreAction::DontCare);
    assert_eq!(desc.sample_count, SampleCount::Count4);
}

#[test]
fn test_resolve_always_stores() {
    let attachment = Attachment::new(MockTexture::multisampled(8, 8, "msaa"))
        .with_resolve(MockTexture::color(8, 8, "resolve"))
        .with_actions(LoadAction::DontCare, StoreAction::DontCare);

    let desc = describe_attachment(&attachment, AttachmentSlot::Resolve).unwrap();
    assert_eq!(desc.store_action, StoreAction::Store);
    assert_eq!(desc.sample_count, SampleCount::Count1);
}

#[test]
fn test_missing_resolve_is_none() {
    let attachment = Attachment::new(MockTexture::color(8, 8, "c"));
    assert!(describe_attachment(&attachment, AttachmentSlot::Resolve).is_none());
}

#[test]
fn test_ops_split_by_format_kind() {
    let stencil = Attachment::depth_stencil(MockTexture::with_format(8, 8, TextureFormat::S8_UINT, "s"))
        .with_actions(LoadAction::Clear, StoreAction::Store);
    let desc = describe_attachment(&stencil, AttachmentSlot::Primary).unwrap();
    assert_eq!(desc.load_action, LoadAction::DontCare);
    assert_eq!(desc.store_action, StoreAction::DontCare);
    assert_eq!(desc.stencil_load_action, LoadAction::Clear);
    assert_eq!(desc.stencil_store_action, StoreAction::Store);
    assert_eq!(desc.final_layout, ImageLayout::DepthStencilAttachment);

    let combined = Attachment::depth_stencil(MockTexture::with_format(8, 8, TextureFormat::D24_UNORM_S8_UINT, "ds"))
        .with_actions(LoadAction::Clear, StoreAction::Store);
    let desc = describe_attachment(&combined, AttachmentSlot::Primary).unwrap();
    assert_eq!(desc.load_action, LoadAction::Clear);
    assert_eq!(desc.stencil_load_action, LoadAction::Clear);
    assert_eq!(desc.store_action, StoreAction::Store);
    assert_eq!(desc.stencil_store_action, StoreAction::Store);

    let color = Attachment::new(MockTexture::color(8, 8, "c"));
    let desc = describe_attachment(&color, AttachmentSlot::Primary).unwrap();
    assert_eq!(desc.stencil_load_action, LoadAction::DontCare);
    assert_eq!(desc.stencil_store_action, StoreAction::DontCare);
}

#[test]
fn test_subpass_layouts() {
    assert_eq!(subpass_layout_for(AttachmentKind::Color), ImageLayout::ColorAttachment);
    assert_eq!(subpass_layout_for(AttachmentKind::Depth), ImageLayout::DepthStencilAttachment);
    assert_eq!(final_layout_for(AttachmentKind::Stencil), ImageLayout::DepthStencilAttachment);
}
