/// Conversions from backend-agnostic descriptors to Vulkan enums and flags
///
/// Pure functions, no device access.

use ash::vk;
use strata_render::strata::render::{
    AccessFlags, AddressMode, AttachmentDescription, AttachmentKind, AttachmentReference,
    ClearValue, Filter, ImageLayout, IndexType, LoadAction, PipelineStages, Rect2D,
    SampleCount, StoreAction, TextureFormat, Viewport,
};

/// Convert TextureFormat to Vulkan format
pub(crate) fn format_to_vk(format: TextureFormat) -> vk::Format {
    match format {
        TextureFormat::R8_UNORM => vk::Format::R8_UNORM,
        TextureFormat::R8G8B8A8_UNORM => vk::Format::R8G8B8A8_UNORM,
        TextureFormat::R8G8B8A8_SRGB => vk::Format::R8G8B8A8_SRGB,
        TextureFormat::B8G8R8A8_UNORM => vk::Format::B8G8R8A8_UNORM,
        TextureFormat::B8G8R8A8_SRGB => vk::Format::B8G8R8A8_SRGB,
        TextureFormat::R16G16B16A16_SFLOAT => vk::Format::R16G16B16A16_SFLOAT,
        TextureFormat::S8_UINT => vk::Format::S8_UINT,
        TextureFormat::D16_UNORM => vk::Format::D16_UNORM,
        TextureFormat::D32_FLOAT => vk::Format::D32_SFLOAT,
        TextureFormat::D24_UNORM_S8_UINT => vk::Format::D24_UNORM_S8_UINT,
        TextureFormat::D32_FLOAT_S8_UINT => vk::Format::D32_SFLOAT_S8_UINT,
    }
}

/// Image aspects a view of `format` covers
pub(crate) fn aspect_mask_for(format: TextureFormat) -> vk::ImageAspectFlags {
    match format.attachment_kind() {
        AttachmentKind::Color => vk::ImageAspectFlags::COLOR,
        AttachmentKind::Depth => vk::ImageAspectFlags::DEPTH,
        AttachmentKind::Stencil => vk::ImageAspectFlags::STENCIL,
        AttachmentKind::DepthStencil => {
            vk::ImageAspectFlags::DEPTH | vk::ImageAspectFlags::STENCIL
        }
    }
}

pub(crate) fn sample_count_to_vk(count: SampleCount) -> vk::SampleCountFlags {
    match count {
        SampleCount::Count1 => vk::SampleCountFlags::TYPE_1,
        SampleCount::Count2 => vk::SampleCountFlags::TYPE_2,
        SampleCount::Count4 => vk::SampleCountFlags::TYPE_4,
        SampleCount::Count8 => vk::SampleCountFlags::TYPE_8,
    }
}

/// Convert LoadAction to Vulkan
pub(crate) fn load_op_to_vk(action: LoadAction) -> vk::AttachmentLoadOp {
    match action {
        LoadAction::Load => vk::AttachmentLoadOp::LOAD,
        LoadAction::Clear => vk::AttachmentLoadOp::CLEAR,
        LoadAction::DontCare => vk::AttachmentLoadOp::DONT_CARE,
    }
}

/// Convert StoreAction to Vulkan
pub(crate) fn store_op_to_vk(action: StoreAction) -> vk::AttachmentStoreOp {
    match action {
        StoreAction::Store => vk::AttachmentStoreOp::STORE,
        StoreAction::DontCare => vk::AttachmentStoreOp::DONT_CARE,
    }
}

/// Convert ImageLayout to Vulkan
pub(crate) fn image_layout_to_vk(layout: ImageLayout) -> vk::ImageLayout {
    match layout {
        ImageLayout::Undefined => vk::ImageLayout::UNDEFINED,
        ImageLayout::General => vk::ImageLayout::GENERAL,
        ImageLayout::ColorAttachment => vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
        ImageLayout::DepthStencilAttachment => vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
        ImageLayout::ShaderReadOnly => vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
        ImageLayout::PresentSrc => vk::ImageLayout::PRESENT_SRC_KHR,
    }
}

pub(crate) fn access_flags_to_vk(access: AccessFlags) -> vk::AccessFlags {
    let mut flags = vk::AccessFlags::empty();
    if access.contains(AccessFlags::SHADER_READ) { flags |= vk::AccessFlags::SHADER_READ; }
    if access.contains(AccessFlags::COLOR_ATTACHMENT_WRITE) { flags |= vk::AccessFlags::COLOR_ATTACHMENT_WRITE; }
    if access.contains(AccessFlags::TRANSFER_WRITE) { flags |= vk::AccessFlags::TRANSFER_WRITE; }
    flags
}

/// Convert PipelineStages to Vulkan
///
/// An empty set maps to TOP_OF_PIPE, Vulkan rejects a zero stage mask.
pub(crate) fn pipeline_stages_to_vk(stages: PipelineStages) -> vk::PipelineStageFlags {
    let mut flags = vk::PipelineStageFlags::empty();
    if stages.contains(PipelineStages::FRAGMENT_SHADER) { flags |= vk::PipelineStageFlags::FRAGMENT_SHADER; }
    if stages.contains(PipelineStages::COLOR_ATTACHMENT_OUTPUT) { flags |= vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT; }
    if stages.contains(PipelineStages::TRANSFER) { flags |= vk::PipelineStageFlags::TRANSFER; }
    if flags.is_empty() {
        flags = vk::PipelineStageFlags::TOP_OF_PIPE;
    }
    flags
}

/// Convert IndexType to Vulkan (None has no Vulkan counterpart)
pub(crate) fn index_type_to_vk(index_type: IndexType) -> Option<vk::IndexType> {
    match index_type {
        IndexType::None => None,
        IndexType::U16 => Some(vk::IndexType::UINT16),
        IndexType::U32 => Some(vk::IndexType::UINT32),
    }
}

pub(crate) fn filter_to_vk(filter: Filter) -> vk::Filter {
    match filter {
        Filter::Nearest => vk::Filter::NEAREST,
        Filter::Linear => vk::Filter::LINEAR,
    }
}

pub(crate) fn address_mode_to_vk(mode: AddressMode) -> vk::SamplerAddressMode {
    match mode {
        AddressMode::Repeat => vk::SamplerAddressMode::REPEAT,
        AddressMode::MirroredRepeat => vk::SamplerAddressMode::MIRRORED_REPEAT,
        AddressMode::ClampToEdge => vk::SamplerAddressMode::CLAMP_TO_EDGE,
    }
}

pub(crate) fn clear_value_to_vk(value: &ClearValue) -> vk::ClearValue {
    match *value {
        ClearValue::Color(float32) => vk::ClearValue {
            color: vk::ClearColorValue { float32 },
        },
        ClearValue::DepthStencil { depth, stencil } => vk::ClearValue {
            depth_stencil: vk::ClearDepthStencilValue { depth, stencil },
        },
    }
}

pub(crate) fn attachment_description_to_vk(desc: &AttachmentDescription) -> vk::AttachmentDescription {
    vk::AttachmentDescription::default()
        .format(format_to_vk(desc.format))
        .samples(sample_count_to_vk(desc.sample_count))
        .load_op(load_op_to_vk(desc.load_action))
        .store_op(store_op_to_vk(desc.store_action))
        .stencil_load_op(load_op_to_vk(desc.stencil_load_action))
        .stencil_store_op(store_op_to_vk(desc.stencil_store_action))
        .initial_layout(image_layout_to_vk(desc.initial_layout))
        .final_layout(image_layout_to_vk(desc.final_layout))
}

/// Convert an AttachmentReference (unused slots become VK_ATTACHMENT_UNUSED)
pub(crate) fn attachment_reference_to_vk(reference: &AttachmentReference) -> vk::AttachmentReference {
    vk::AttachmentReference {
        attachment: reference.attachment.unwrap_or(vk::ATTACHMENT_UNUSED),
        layout: image_layout_to_vk(reference.layout),
    }
}

pub(crate) fn rect_to_vk(rect: Rect2D) -> vk::Rect2D {
    vk::Rect2D {
        offset: vk::Offset2D { x: rect.x, y: rect.y },
        extent: vk::Extent2D { width: rect.width, height: rect.height },
    }
}

pub(crate) fn viewport_to_vk(viewport: Viewport) -> vk::Viewport {
    vk::Viewport {
        x: viewport.x,
        y: viewport.y,
        width: viewport.width,
        height: viewport.height,
        min_depth: viewport.min_depth,
        max_depth: viewport.max_depth,
    }
}

#[cfg(test)]
#[path = "vulkan_format_tests.rs"]
mod tests;
