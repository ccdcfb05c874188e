/// Unit tests for Attachment and RenderTarget

use super::*;
use crate::error::Error;
use crate::graphics_device::mock_graphics_device::MockTexture;
use crate::graphics_device::TextureFormat;

fn color(width: u32, height: u32, name: &str) -> Attachment {
    Attachment::new(MockTexture::color(width, height, name))
}

#[test]
fn test_attachment_defaults() {
    let attachment = color(8, 8, "c");
    assert_eq!(attachment.load_action, LoadAction::Clear);
    assert_eq!(attachment.store_action, StoreAction::Store);
    assert_eq!(attachment.clear_color(), [0.0; 4]);
    assert!(attachment.resolve_texture.is_none());
}

#[test]
fn test_depth_stencil_attachment_clear_values() {
    let depth = Attachment::depth_stencil(MockTexture::with_format(8, 8, TextureFormat::D32_FLOAT, "d"))
        .with_clear_value(ClearValue::DepthStencil { depth: 0.5, stencil: 7 });
    assert_eq!(depth.clear_depth(), 0.5);
    assert_eq!(depth.clear_stencil(), 7);
    assert_eq!(depth.clear_color(), [0.0; 4]);
}

#[test]
fn test_color_attachments_ordered_by_bind_index() {
    let mut target = RenderTarget::new();
    target.set_color_attachment(2, color(8, 8, "two"));
    target.set_color_attachment(0, color(8, 8, "zero"));

    let indices: Vec<u32> = target.color_attachments().map(|(index, _)| index).collect();
    assert_eq!(indices, vec![0, 2]);
    assert_eq!(target.max_color_bind_index(), Some(2));
    assert_eq!(target.color_attachment_count(), 2);
}

#[test]
fn test_empty_target() {
    let target = RenderTarget::new();
    assert_eq!(target.max_color_bind_index(), None);
    assert_eq!(target.render_target_size(), (0, 0));
    assert!(matches!(target.validate(), Err(Error::InvalidRenderTarget(_))));
}

#[test]
fn test_render_target_size_falls_back_to_depth() {
    let mut target = RenderTarget::new();
    target.set_depth_attachment(Some(Attachment::depth_stencil(MockTexture::with_format(
        320,
        200,
        TextureFormat::D32_FLOAT,
        "depth",
    ))));
    assert_eq!(target.render_target_size(), (320, 200));
    assert!(target.validate().is_ok());
}

#[test]
fn test_iterate_all_attachments_order_and_early_exit() {
    let mut target = RenderTarget::new();
    target.set_color_attachment(1, color(4, 4, "c1"));
    target.set_color_attachment(0, color(4, 4, "c0"));
    target.set_depth_attachment(Some(Attachment::depth_stencil(MockTexture::with_format(
        4, 4, TextureFormat::D32_FLOAT, "depth",
    ))));
    target.set_stencil_attachment(Some(Attachment::depth_stencil(MockTexture::with_format(
        4, 4, TextureFormat::S8_UINT, "stencil",
    ))));

    let mut all = Vec::new();
    target.iterate_all_attachments(|a| {
        all.push(a.texture.label().to_string());
        true
    });
    assert_eq!(all, vec!["c0", "c1", "depth", "stencil"]);

    let mut first_two = Vec::new();
    target.iterate_all_attachments(|a| {
        first_two.push(a.texture.label().to_string());
        first_two.len() < 2
    });
    assert_eq!(first_two, vec!["c0", "c1"]);
}

#[test]
fn test_validate_size_mismatch() {
    let mut target = RenderTarget::new();
    target.set_color_attachment(0, color(8, 8, "a"));
    target.set_color_attachment(1, color(16, 8, "b"));
    assert!(matches!(target.validate(), Err(Error::InvalidRenderTarget(_))));
}

#[test]
fn test_validate_resolve_rules() {
    // Multisampled primary resolving into a single-sampled image of the same format
    let mut target = RenderTarget::new();
    target.set_color_attachment(
        0,
        Attachment::new(MockTexture::multisampled(8, 8, "msaa")).with_resolve(MockTexture::color(8, 8, "resolve")),
    );
    assert!(target.validate().is_ok());

    // Single-sampled primary cannot resolve
    let mut target = RenderTarget::new();
    target.set_color_attachment(0, color(8, 8, "plain").with_resolve(MockTexture::color(8, 8, "resolve")));
    assert!(matches!(target.validate(), Err(Error::InvalidRenderTarget(_))));

    // Resolve must be single-sampled
    let mut target = RenderTarget::new();
    target.set_color_attachment(
        0,
        Attachment::new(MockTexture::multisampled(8, 8, "msaa")).with_resolve(MockTexture::multisampled(8, 8, "bad")),
    );
    assert!(matches!(target.validate(), Err(Error::InvalidRenderTarget(_))));

    // Resolve must share the format
    let mut target = RenderTarget::new();
    target.set_color_attachment(
        0,
        Attachment::new(MockTexture::multisampled(8, 8, "msaa"))
            .with_resolve(MockTexture::with_format(8, 8, TextureFormat::B8G8R8A8_UNORM, "bgra")),
    );
    assert!(matches!(target.validate(), Err(Error::InvalidRenderTarget(_))));
}

#[test]
fn test_validate_rejects_bind_index_past_maximum() {
    let mut target = RenderTarget::new();
    target.set_color_attachment(MAX_COLOR_ATTACHMENTS - 1, color(8, 8, "last"));
    assert!(target.validate().is_ok());

    target.set_color_attachment(u32::MAX, color(8, 8, "huge"));
    assert!(matches!(target.validate_bind_indices(), Err(Error::InvalidRenderTarget(_))));
    assert!(matches!(target.validate(), Err(Error::InvalidRenderTarget(_))));
}
