/// Sampler - Vulkan implementation of the Sampler trait, plus a per-device cache
///
/// Typical renderers only need a handful of distinct samplers, so the device
/// creates each on first use and hands out the cached object afterwards.

use std::any::Any;
use std::sync::Arc;
use ash::vk;
use rustc_hash::FxHashMap;
use strata_render::strata::render::{Sampler as RendererSampler, SamplerDesc};
use strata_render::strata::Result;
use strata_render::strata_err;
use crate::vulkan_context::GpuContext;
use crate::vulkan_format::{address_mode_to_vk, filter_to_vk};

/// Vulkan sampler implementation
pub struct Sampler {
    ctx: Arc<GpuContext>,
    pub(crate) sampler: vk::Sampler,
    desc: SamplerDesc,
}

impl Sampler {
    fn create(ctx: &Arc<GpuContext>, desc: SamplerDesc) -> Result<Self> {
        let address = address_mode_to_vk(desc.address_mode);
        let info = vk::SamplerCreateInfo::default()
            .mag_filter(filter_to_vk(desc.mag_filter))
            .min_filter(filter_to_vk(desc.min_filter))
            .mipmap_mode(vk::SamplerMipmapMode::LINEAR)
            .address_mode_u(address)
            .address_mode_v(address)
            .address_mode_w(address)
            .border_color(vk::BorderColor::FLOAT_OPAQUE_BLACK)
            .max_lod(vk::LOD_CLAMP_NONE);

        let sampler = unsafe { ctx.device.create_sampler(&info, None) }.map_err(|e| {
            strata_err!(BackendError, "strata::vulkan", "Failed to create sampler: {:?}", e)
        })?;

        Ok(Self { ctx: Arc::clone(ctx), sampler, desc })
    }

    /// Vulkan sampler handle
    pub fn handle(&self) -> vk::Sampler {
        self.sampler
    }
}

impl RendererSampler for Sampler {
    fn desc(&self) -> &SamplerDesc {
        &self.desc
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_sampler(self.sampler, None);
        }
    }
}

/// Internal sampler cache - creates a VkSampler on first use per descriptor
pub(crate) struct SamplerCache {
    cache: FxHashMap<SamplerDesc, Arc<Sampler>>,
}

impl SamplerCache {
    pub(crate) fn new() -> Self {
        Self { cache: FxHashMap::default() }
    }

    /// Get or create the sampler for `desc`
    pub(crate) fn get(&mut self, ctx: &Arc<GpuContext>, desc: SamplerDesc) -> Result<Arc<Sampler>> {
        if let Some(sampler) = self.cache.get(&desc) {
            return Ok(Arc::clone(sampler));
        }

        let sampler = Arc::new(Sampler::create(ctx, desc)?);
        self.cache.insert(desc, Arc::clone(&sampler));
        Ok(sampler)
    }

    pub(crate) fn len(&self) -> usize {
        self.cache.len()
    }
}
