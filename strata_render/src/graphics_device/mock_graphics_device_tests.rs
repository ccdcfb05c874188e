/// Unit tests for MockGraphicsDevice and associated mock types.

use super::*;
use crate::error::Error;
use crate::graphics_device::{
    AttachmentReference, Bindings, ShaderSlot, SubpassDescription,
};

fn empty_pass_desc() -> RenderPassDesc {
    RenderPassDesc {
        attachments: Vec::new(),
        subpass: SubpassDescription {
            color_attachments: Vec::new(),
            resolve_attachments: Vec::new(),
            depth_stencil_attachment: AttachmentReference::UNUSED,
        },
    }
}

// ============================================================================
// MockTexture Tests
// ============================================================================

#[test]
fn test_mock_texture_starts_undefined() {
    let texture = MockTexture::color(64, 32, "color");
    assert_eq!(texture.layout(), ImageLayout::Undefined);
    assert_eq!(texture.desc().width, 64);
    assert_eq!(texture.desc().height, 32);
    assert_eq!(texture.label(), "color");
}

#[test]
fn test_mock_texture_set_layout_returns_previous() {
    let texture = MockTexture::color(4, 4, "color");
    let previous = texture.set_layout_without_encoding(ImageLayout::General);
    assert_eq!(previous, ImageLayout::Undefined);
    assert_eq!(texture.layout(), ImageLayout::General);
}

#[test]
fn test_mock_texture_invalidate() {
    let texture = MockTexture::color(4, 4, "color");
    assert!(texture.is_valid());
    texture.invalidate();
    assert!(!texture.is_valid());
}

// ============================================================================
// MockCommandList Tests
// ============================================================================

#[test]
fn test_mock_command_list_records_draws() {
    let mut cmd = MockCommandList::new();
    cmd.draw(3, 1, 0, 0).unwrap();
    cmd.draw_indexed(6, 1, 0, 2, 0).unwrap();

    assert_eq!(cmd.commands, vec!["draw 3 1 0 0", "draw_indexed 6 1 0 2 0"]);
    assert_eq!(cmd.count("draw"), 2);
    assert_eq!(cmd.calls("draw_indexed"), vec!["draw_indexed 6 1 0 2 0"]);
}

#[test]
fn test_mock_command_list_injected_failure() {
    let mut cmd = MockCommandList::new();
    cmd.fail_on = Some("end_render_pass");

    let result = cmd.end_render_pass();
    assert!(matches!(result, Err(Error::BackendError(_))));
    assert!(cmd.commands.is_empty());
}

#[test]
fn test_mock_command_list_barrier_on_destroyed_image_fails() {
    let mut cmd = MockCommandList::new();
    let texture = MockTexture::color(4, 4, "gone");
    texture.invalidate();

    let barrier = ImageBarrier {
        old_layout: ImageLayout::Undefined,
        new_layout: ImageLayout::General,
        src_access: crate::graphics_device::AccessFlags::SHADER_READ,
        src_stages: crate::graphics_device::PipelineStages::FRAGMENT_SHADER,
        dst_access: crate::graphics_device::AccessFlags::COLOR_ATTACHMENT_WRITE,
        dst_stages: crate::graphics_device::PipelineStages::COLOR_ATTACHMENT_OUTPUT,
    };
    let result = cmd.image_barrier(texture.as_ref(), &barrier);
    assert!(matches!(result, Err(Error::ResourceUnavailable(_))));
    assert!(cmd.barriers.is_empty());
}

// ============================================================================
// MockGraphicsDevice Tests
// ============================================================================

#[test]
fn test_mock_device_records_render_pass() {
    let device = MockGraphicsDevice::new();
    device.create_render_pass(&empty_pass_desc(), Some("main")).unwrap();

    let pass = device.last_render_pass().unwrap();
    assert_eq!(pass.label.as_deref(), Some("main"));
    assert!(pass.desc.attachments.is_empty());
}

#[test]
fn test_mock_device_injected_pass_failure() {
    let device = MockGraphicsDevice::new();
    device.fail_render_pass.store(true, Ordering::SeqCst);

    let result = device.create_render_pass(&empty_pass_desc(), None);
    assert!(matches!(result, Err(Error::PassCreationFailed(_))));
    assert!(device.last_render_pass().is_none());
}

#[test]
fn test_mock_device_framebuffer_keeps_view_order() {
    let device = MockGraphicsDevice::new();
    let render_pass = device.create_render_pass(&empty_pass_desc(), None).unwrap();
    let a: Arc<dyn Texture> = MockTexture::color(8, 8, "a");
    let b: Arc<dyn Texture> = MockTexture::color(8, 8, "b");

    device
        .create_framebuffer(&FramebufferDesc {
            render_pass: &render_pass,
            attachments: vec![b, a],
            width: 8,
            height: 8,
        })
        .unwrap();

    assert_eq!(device.last_framebuffer().unwrap().views, vec!["b", "a"]);
}

#[test]
fn test_mock_device_binding_sets_are_one_batch() {
    let device = MockGraphicsDevice::new();
    let pipeline = MockPipeline::new("p");
    let mut vertex = Bindings::new();
    vertex.bind_buffer(ShaderSlot::new("frame_info", 0), host_view(1, 64, "ubo"));
    let fragment = Bindings::new();

    let descs = vec![
        BindingSetDesc { pipeline: &pipeline, vertex_bindings: &vertex, fragment_bindings: &fragment },
        BindingSetDesc { pipeline: &pipeline, vertex_bindings: &fragment, fragment_bindings: &fragment },
    ];
    let sets = device.allocate_binding_sets(&descs).unwrap();

    assert_eq!(sets.len(), 2);
    assert_eq!(*device.binding_batches.lock().unwrap(), vec![2]);
    let first = sets[0].as_any().downcast_ref::<MockBindingSet>().unwrap();
    assert_eq!(first.slots, vec!["frame_info"]);
}

#[test]
fn test_mock_allocator_realize_and_failure() {
    let device = MockGraphicsDevice::new();
    let view = host_view(3, 16, "vertices");

    let buffer = device.resource_allocator().realize(&view).unwrap();
    assert_eq!(buffer.size(), 48);
    assert_eq!(device.realized_buffers(), 1);

    device.allocator.fail.store(true, Ordering::SeqCst);
    assert!(device.resource_allocator().realize(&view).is_err());
    assert_eq!(device.realized_buffers(), 1);
}

#[test]
fn test_mock_allocator_returns_resident_buffer_unchanged() {
    let device = MockGraphicsDevice::new();
    let resident: Arc<dyn DeviceBuffer> = Arc::new(MockDeviceBuffer { size: 256, name: "gpu".to_string() });
    let view = BufferView::new(
        Arc::new(crate::graphics_device::ResidentBuffer::new(Arc::clone(&resident))),
        crate::graphics_device::BufferRange::new(64, 128),
    );

    let realized = device.resource_allocator().realize(&view).unwrap();
    assert!(std::ptr::addr_eq(Arc::as_ptr(&realized), Arc::as_ptr(&resident)));
    assert_eq!(view.buffer.size(), 256);
}
