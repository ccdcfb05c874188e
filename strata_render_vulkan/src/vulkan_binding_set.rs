/// BindingSet - Vulkan implementation of the BindingSet trait
///
/// Every pass allocates its descriptor sets in one batch from a pool sized
/// exactly for that batch. Sets of a batch share the pool, which is
/// destroyed when the last of them is dropped.

use std::any::Any;
use std::sync::Arc;
use ash::vk;
use strata_render::strata::render::{
    Allocator, BindingSet as RendererBindingSet, BindingSetDesc, BufferKind, DeviceBuffer,
    Sampler as RendererSampler, Texture as RendererTexture,
};
use strata_render::strata::Result;
use strata_render::{strata_bail, strata_debug, strata_err};
use crate::vulkan_buffer::Buffer;
use crate::vulkan_context::GpuContext;
use crate::vulkan_pipeline::Pipeline;
use crate::vulkan_sampler::Sampler;
use crate::vulkan_texture::Texture;

/// Descriptor pool owned by one allocation batch
pub(crate) struct DescriptorPool {
    pool: vk::DescriptorPool,
    ctx: Arc<GpuContext>,
}

impl Drop for DescriptorPool {
    fn drop(&mut self) {
        unsafe {
            // Frees every set allocated from it
            self.ctx.device.destroy_descriptor_pool(self.pool, None);
        }
    }
}

/// Vulkan binding set implementation
///
/// Wraps a VkDescriptorSet and keeps everything it points at alive: the
/// realized buffers, the textures and samplers, and the pool itself.
pub struct BindingSet {
    /// Vulkan descriptor set handle
    pub(crate) descriptor_set: vk::DescriptorSet,
    _pool: Arc<DescriptorPool>,
    _buffers: Vec<Arc<dyn DeviceBuffer>>,
    _textures: Vec<Arc<dyn RendererTexture>>,
    _samplers: Vec<Arc<dyn RendererSampler>>,
}

impl RendererBindingSet for BindingSet {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Per-set resources resolved before any Vulkan call
struct ResolvedSet {
    set_layout: vk::DescriptorSetLayout,
    buffers: Vec<(u32, vk::DescriptorType, Arc<dyn DeviceBuffer>, u64, u64)>,
    images: Vec<(u32, Arc<dyn RendererTexture>, Arc<dyn RendererSampler>)>,
}

fn descriptor_type_for(kind: BufferKind) -> vk::DescriptorType {
    match kind {
        BufferKind::Uniform => vk::DescriptorType::UNIFORM_BUFFER,
        BufferKind::Storage => vk::DescriptorType::STORAGE_BUFFER,
    }
}

fn resolve_set(desc: &BindingSetDesc<'_>, allocator: &dyn Allocator) -> Result<ResolvedSet> {
    let Some(pipeline) = desc.pipeline.as_any().downcast_ref::<Pipeline>() else {
        strata_bail!(BackendError, "strata::vulkan", "Binding set pipeline is not a Vulkan pipeline");
    };

    let mut resolved = ResolvedSet {
        set_layout: pipeline.set_layout,
        buffers: Vec::new(),
        images: Vec::new(),
    };

    for bindings in [desc.vertex_bindings, desc.fragment_bindings] {
        for bound in bindings.buffers.values() {
            let buffer = allocator.realize(&bound.view)?;
            resolved.buffers.push((
                bound.slot.binding,
                descriptor_type_for(bound.kind),
                buffer,
                bound.view.range.offset,
                bound.view.range.length,
            ));
        }
        for bound in bindings.sampled_images.values() {
            if !bound.texture.is_valid() {
                strata_bail!(
                    ResourceUnavailable, "strata::vulkan",
                    "Sampled texture '{}' has been destroyed", bound.texture.label()
                );
            }
            resolved.images.push((
                bound.slot.binding,
                Arc::clone(&bound.texture),
                Arc::clone(&bound.sampler),
            ));
        }
    }

    Ok(resolved)
}

/// Pool sizes covering exactly the descriptors of `sets`
fn pool_sizes_for(sets: &[ResolvedSet]) -> Vec<vk::DescriptorPoolSize> {
    let mut uniform = 0u32;
    let mut storage = 0u32;
    let mut sampled = 0u32;
    for set in sets {
        for (_, ty, ..) in &set.buffers {
            if *ty == vk::DescriptorType::STORAGE_BUFFER {
                storage += 1;
            } else {
                uniform += 1;
            }
        }
        sampled += set.images.len() as u32;
    }

    let mut sizes = Vec::new();
    for (ty, count) in [
        (vk::DescriptorType::UNIFORM_BUFFER, uniform),
        (vk::DescriptorType::STORAGE_BUFFER, storage),
        (vk::DescriptorType::COMBINED_IMAGE_SAMPLER, sampled),
    ] {
        if count > 0 {
            sizes.push(vk::DescriptorPoolSize { ty, descriptor_count: count });
        }
    }
    // A pool needs at least one size entry even for empty sets
    if sizes.is_empty() {
        sizes.push(vk::DescriptorPoolSize {
            ty: vk::DescriptorType::UNIFORM_BUFFER,
            descriptor_count: 1,
        });
    }
    sizes
}

/// Allocate and write one descriptor set per desc
///
/// One vkAllocateDescriptorSets call and one vkUpdateDescriptorSets call
/// for the whole batch.
pub(crate) fn allocate_binding_sets(
    ctx: &Arc<GpuContext>,
    allocator: &dyn Allocator,
    descs: &[BindingSetDesc<'_>],
) -> Result<Vec<Arc<dyn RendererBindingSet>>> {
    if descs.is_empty() {
        return Ok(Vec::new());
    }

    let resolved = descs
        .iter()
        .map(|desc| resolve_set(desc, allocator))
        .collect::<Result<Vec<_>>>()?;

    // Pool sized for this batch only
    let pool_sizes = pool_sizes_for(&resolved);
    let pool_info = vk::DescriptorPoolCreateInfo::default()
        .pool_sizes(&pool_sizes)
        .max_sets(descs.len() as u32);
    let pool = unsafe { ctx.device.create_descriptor_pool(&pool_info, None) }.map_err(|e| {
        strata_err!(ResourceUnavailable, "strata::vulkan", "Failed to create descriptor pool: {:?}", e)
    })?;
    let pool = Arc::new(DescriptorPool { pool, ctx: Arc::clone(ctx) });

    let layouts: Vec<vk::DescriptorSetLayout> = resolved.iter().map(|set| set.set_layout).collect();
    let allocate_info = vk::DescriptorSetAllocateInfo::default()
        .descriptor_pool(pool.pool)
        .set_layouts(&layouts);
    let descriptor_sets = unsafe { ctx.device.allocate_descriptor_sets(&allocate_info) }.map_err(|e| {
        strata_err!(ResourceUnavailable, "strata::vulkan", "Failed to allocate descriptor sets: {:?}", e)
    })?;

    // Resolve native handles first, descriptor infos must outlive the writes
    let mut buffer_infos: Vec<vk::DescriptorBufferInfo> = Vec::new();
    let mut image_infos: Vec<vk::DescriptorImageInfo> = Vec::new();
    for set in &resolved {
        for (_, _, buffer, offset, length) in &set.buffers {
            let Some(vk_buffer) = buffer.as_any().downcast_ref::<Buffer>() else {
                strata_bail!(BackendError, "strata::vulkan", "Bound buffer is not a Vulkan buffer");
            };
            buffer_infos.push(
                vk::DescriptorBufferInfo::default()
                    .buffer(vk_buffer.buffer)
                    .offset(*offset)
                    .range(if *length == 0 { vk::WHOLE_SIZE } else { *length })
            );
        }
        for (_, texture, sampler) in &set.images {
            let Some(vk_texture) = texture.as_any().downcast_ref::<Texture>() else {
                strata_bail!(BackendError, "strata::vulkan", "Bound texture is not a Vulkan texture");
            };
            let Some(vk_sampler) = sampler.as_any().downcast_ref::<Sampler>() else {
                strata_bail!(BackendError, "strata::vulkan", "Bound sampler is not a Vulkan sampler");
            };
            image_infos.push(
                vk::DescriptorImageInfo::default()
                    .image_layout(vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL)
                    .image_view(vk_texture.view)
                    .sampler(vk_sampler.sampler)
            );
        }
    }

    // Build write descriptor sets with stable pointers into the info arrays
    let mut writes: Vec<vk::WriteDescriptorSet> = Vec::new();
    let mut buffer_idx = 0usize;
    let mut image_idx = 0usize;
    for (set, &descriptor_set) in resolved.iter().zip(&descriptor_sets) {
        for (binding, ty, ..) in &set.buffers {
            writes.push(
                vk::WriteDescriptorSet::default()
                    .dst_set(descriptor_set)
                    .dst_binding(*binding)
                    .dst_array_element(0)
                    .descriptor_type(*ty)
                    .buffer_info(std::slice::from_ref(&buffer_infos[buffer_idx]))
            );
            buffer_idx += 1;
        }
        for (binding, ..) in &set.images {
            writes.push(
                vk::WriteDescriptorSet::default()
                    .dst_set(descriptor_set)
                    .dst_binding(*binding)
                    .dst_array_element(0)
                    .descriptor_type(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
                    .image_info(std::slice::from_ref(&image_infos[image_idx]))
            );
            image_idx += 1;
        }
    }

    unsafe {
        ctx.device.update_descriptor_sets(&writes, &[]);
    }

    strata_debug!(
        "strata::vulkan",
        "Allocated {} binding sets ({} descriptor writes)",
        descriptor_sets.len(),
        writes.len()
    );

    let sets = resolved
        .into_iter()
        .zip(descriptor_sets)
        .map(|(set, descriptor_set)| {
            let binding_set: Arc<dyn RendererBindingSet> = Arc::new(BindingSet {
                descriptor_set,
                _pool: Arc::clone(&pool),
                _buffers: set.buffers.into_iter().map(|(_, _, buffer, ..)| buffer).collect(),
                _textures: set.images.iter().map(|(_, texture, _)| Arc::clone(texture)).collect(),
                _samplers: set.images.into_iter().map(|(_, _, sampler)| sampler).collect(),
            });
            binding_set
        })
        .collect();

    Ok(sets)
}
