/// VulkanGraphicsDevice - Vulkan implementation of the GraphicsDevice trait
///
/// Built on top of a logical device owned by the embedder. The device only
/// creates what a render pass needs: textures, samplers, buffers, render
/// passes, framebuffers, binding sets and command lists.

use std::sync::{Arc, Mutex};
use ash::vk;
use gpu_allocator::vulkan::{
    Allocation, AllocationCreateDesc, AllocationScheme, Allocator as GpuAllocator,
    AllocatorCreateDesc,
};
use gpu_allocator::MemoryLocation;
use strata_render::strata::render::{
    Allocator as RendererAllocator, BindingSet as RendererBindingSet, BindingSetDesc,
    Framebuffer as RendererFramebuffer, FramebufferDesc, GraphicsDevice, ImageLayout,
    RenderPass as RendererRenderPass, RenderPassDesc, SamplerDesc, StorageMode, TextureDesc,
    Texture as _, TextureUsage,
};
use strata_render::strata::{Error, Result};
use strata_render::{strata_bail, strata_debug, strata_err, strata_error, strata_info};
use crate::vulkan_allocator::Allocator;
use crate::vulkan_binding_set;
use crate::vulkan_buffer::Buffer;
use crate::vulkan_command_list::CommandList;
use crate::vulkan_context::GpuContext;
use crate::vulkan_format::{
    aspect_mask_for, attachment_description_to_vk, attachment_reference_to_vk, format_to_vk,
    sample_count_to_vk,
};
use crate::vulkan_frame_buffer::Framebuffer;
use crate::vulkan_pipeline::Pipeline;
use crate::vulkan_render_pass::RenderPass;
use crate::vulkan_sampler::{Sampler, SamplerCache};
use crate::vulkan_texture::Texture;

/// Vulkan backend configuration
#[derive(Debug, Clone, Copy)]
pub struct VulkanConfig {
    /// Name objects and emit command labels through VK_EXT_debug_utils
    ///
    /// The instance must have been created with the extension enabled.
    pub enable_debug_utils: bool,
}

impl Default for VulkanConfig {
    fn default() -> Self {
        Self {
            enable_debug_utils: cfg!(debug_assertions),
        }
    }
}

/// Vulkan graphics device
pub struct VulkanGraphicsDevice {
    /// Shared GPU context
    ctx: Arc<GpuContext>,
    /// Realizes buffer views for draws and bindings
    allocator: Allocator,
    /// Samplers created so far, one per descriptor
    samplers: Mutex<SamplerCache>,
    config: VulkanConfig,
}

impl VulkanGraphicsDevice {
    /// Create a device on top of an existing logical device
    ///
    /// # Arguments
    ///
    /// * `instance` - Instance the logical device was created from
    /// * `physical_device` - Physical device backing `device`
    /// * `device` - Logical device (stays owned by the caller)
    /// * `graphics_queue_family` - Queue family command lists are created for
    /// * `config` - Backend configuration
    pub fn new(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        device: ash::Device,
        graphics_queue_family: u32,
        config: VulkanConfig,
    ) -> Result<Self> {
        // Create GPU allocator
        let gpu_allocator = GpuAllocator::new(&AllocatorCreateDesc {
            instance: instance.clone(),
            device: device.clone(),
            physical_device,
            debug_settings: Default::default(),
            buffer_device_address: false,
            allocation_sizes: Default::default(),
        })
        .map_err(|e| strata_err!(BackendError, "strata::vulkan", "Failed to create GPU allocator: {:?}", e))?;

        let debug_utils = config
            .enable_debug_utils
            .then(|| ash::ext::debug_utils::Device::new(instance, &device));

        let ctx = Arc::new(GpuContext::new(
            device,
            physical_device,
            gpu_allocator,
            graphics_queue_family,
            debug_utils,
        ));

        strata_info!(
            "strata::vulkan",
            "Vulkan graphics device ready (queue family {}, debug utils {})",
            graphics_queue_family,
            if config.enable_debug_utils { "on" } else { "off" }
        );

        Ok(Self {
            allocator: Allocator::new(Arc::clone(&ctx)),
            samplers: Mutex::new(SamplerCache::new()),
            ctx,
            config,
        })
    }

    /// Backend configuration
    pub fn config(&self) -> &VulkanConfig {
        &self.config
    }

    /// Concrete allocator (for per-frame `release_uploads`)
    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    /// Create a device-owned texture
    pub fn create_texture(&self, desc: TextureDesc, label: &str) -> Result<Arc<Texture>> {
        let format = format_to_vk(desc.format);
        let transient = desc.storage_mode == StorageMode::DeviceTransient;

        // Image usage flags based on declared TextureUsage
        let usage_flags = match (desc.usage, transient) {
            (TextureUsage::Sampled, _) => {
                vk::ImageUsageFlags::SAMPLED | vk::ImageUsageFlags::TRANSFER_DST
            }
            (TextureUsage::RenderTarget, true) => {
                vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::TRANSIENT_ATTACHMENT
            }
            (TextureUsage::RenderTarget, false) => {
                vk::ImageUsageFlags::COLOR_ATTACHMENT
                    | vk::ImageUsageFlags::TRANSFER_SRC
                    | vk::ImageUsageFlags::TRANSFER_DST
            }
            (TextureUsage::SampledAndRenderTarget, _) => {
                vk::ImageUsageFlags::SAMPLED
                    | vk::ImageUsageFlags::COLOR_ATTACHMENT
                    | vk::ImageUsageFlags::TRANSFER_SRC
                    | vk::ImageUsageFlags::TRANSFER_DST
            }
            (TextureUsage::DepthStencil, true) => {
                vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT
                    | vk::ImageUsageFlags::TRANSIENT_ATTACHMENT
            }
            (TextureUsage::DepthStencil, false) => {
                vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT
                    | vk::ImageUsageFlags::TRANSFER_DST
            }
        };

        let image_create_info = vk::ImageCreateInfo::default()
            .image_type(vk::ImageType::TYPE_2D)
            .format(format)
            .extent(vk::Extent3D {
                width: desc.width,
                height: desc.height,
                depth: 1,
            })
            .mip_levels(1)
            .array_layers(1)
            .samples(sample_count_to_vk(desc.sample_count))
            .tiling(vk::ImageTiling::OPTIMAL)
            .usage(usage_flags)
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .initial_layout(vk::ImageLayout::UNDEFINED);

        let image = unsafe { self.ctx.device.create_image(&image_create_info, None) }
            .map_err(|e| strata_err!(BackendError, "strata::vulkan", "Failed to create texture image: {:?}", e))?;

        let allocation = match self.allocate_image_memory(image, &desc, label) {
            Ok(allocation) => allocation,
            Err(e) => {
                unsafe { self.ctx.device.destroy_image(image, None) };
                return Err(e);
            }
        };

        let view = match self.create_view(image, &desc) {
            Ok(view) => view,
            Err(e) => {
                self.free_allocation(allocation);
                unsafe { self.ctx.device.destroy_image(image, None) };
                return Err(e);
            }
        };

        self.ctx.set_debug_name(image, label);
        strata_debug!(
            "strata::vulkan",
            "Created texture '{}' ({}x{}, {:?}, {} samples)",
            label, desc.width, desc.height, desc.format, desc.sample_count.as_u32()
        );

        Ok(Arc::new(Texture {
            image,
            view,
            allocation: Some(allocation),
            owns_image: true,
            ctx: Arc::clone(&self.ctx),
            desc,
            label: label.to_string(),
            layout: Mutex::new(ImageLayout::Undefined),
            valid: std::sync::atomic::AtomicBool::new(true),
        }))
    }

    /// Wrap an image owned elsewhere (e.g., a swapchain image)
    ///
    /// The texture gets its own view; the image is never destroyed by it.
    pub fn wrap_texture(
        &self,
        image: vk::Image,
        desc: TextureDesc,
        layout: ImageLayout,
        label: &str,
    ) -> Result<Arc<Texture>> {
        let view = self.create_view(image, &desc)?;

        Ok(Arc::new(Texture {
            image,
            view,
            allocation: None,
            owns_image: false,
            ctx: Arc::clone(&self.ctx),
            desc,
            label: label.to_string(),
            layout: Mutex::new(layout),
            valid: std::sync::atomic::AtomicBool::new(true),
        }))
    }

    /// Get (or create on first use) the sampler for `desc`
    pub fn create_sampler(&self, desc: SamplerDesc) -> Result<Arc<Sampler>> {
        let mut samplers = self
            .samplers
            .lock()
            .map_err(|_| strata_err!(BackendError, "strata::vulkan", "Sampler cache lock poisoned"))?;
        samplers.get(&self.ctx, desc)
    }

    /// Number of distinct samplers created so far
    pub fn sampler_count(&self) -> usize {
        self.samplers.lock().map(|samplers| samplers.len()).unwrap_or(0)
    }

    /// Create a host-visible buffer
    pub fn create_buffer(&self, size: u64, usage: vk::BufferUsageFlags, label: &str) -> Result<Arc<Buffer>> {
        Ok(Arc::new(Buffer::create(&self.ctx, size, usage, label)?))
    }

    /// Wrap a pipeline compiled elsewhere; its handles stay owned by the caller
    ///
    /// `set_layout` is the layout of descriptor set 0, which binding sets
    /// are allocated against.
    pub fn wrap_pipeline(
        &self,
        pipeline: vk::Pipeline,
        pipeline_layout: vk::PipelineLayout,
        set_layout: vk::DescriptorSetLayout,
        label: &str,
    ) -> Arc<Pipeline> {
        Arc::new(Pipeline::new(Arc::clone(&self.ctx), pipeline, pipeline_layout, set_layout, false, label))
    }

    /// Like `wrap_pipeline`, but the handles are destroyed with the returned object
    pub fn adopt_pipeline(
        &self,
        pipeline: vk::Pipeline,
        pipeline_layout: vk::PipelineLayout,
        set_layout: vk::DescriptorSetLayout,
        label: &str,
    ) -> Arc<Pipeline> {
        self.ctx.set_debug_name(pipeline, label);
        Arc::new(Pipeline::new(Arc::clone(&self.ctx), pipeline, pipeline_layout, set_layout, true, label))
    }

    /// Create a command list on the graphics queue family
    pub fn create_command_list(&self) -> Result<CommandList> {
        CommandList::new(Arc::clone(&self.ctx))
    }

    fn allocate_image_memory(&self, image: vk::Image, desc: &TextureDesc, label: &str) -> Result<Allocation> {
        let requirements = unsafe { self.ctx.device.get_image_memory_requirements(image) };
        let location = match desc.storage_mode {
            StorageMode::HostVisible => MemoryLocation::CpuToGpu,
            StorageMode::DevicePrivate | StorageMode::DeviceTransient => MemoryLocation::GpuOnly,
        };

        let allocation = self
            .ctx
            .allocator
            .lock()
            .map_err(|_| strata_err!(BackendError, "strata::vulkan", "GPU allocator lock poisoned"))?
            .allocate(&AllocationCreateDesc {
                name: label,
                requirements,
                location,
                linear: false,
                allocation_scheme: AllocationScheme::GpuAllocatorManaged,
            })
            .map_err(|_e| {
                let size_mb = requirements.size as f64 / (1024.0 * 1024.0);
                strata_error!(
                    "strata::vulkan",
                    "Out of GPU memory for texture '{}' (size: {}x{}, {:.2} MB)",
                    label, desc.width, desc.height, size_mb
                );
                Error::OutOfMemory
            })?;

        let bound = unsafe {
            self.ctx.device.bind_image_memory(image, allocation.memory(), allocation.offset())
        };
        if let Err(e) = bound {
            self.free_allocation(allocation);
            strata_bail!(BackendError, "strata::vulkan", "Failed to bind texture image memory: {:?}", e);
        }
        Ok(allocation)
    }

    fn free_allocation(&self, allocation: Allocation) {
        if let Ok(mut allocator) = self.ctx.allocator.lock() {
            allocator.free(allocation).ok();
        }
    }

    fn create_view(&self, image: vk::Image, desc: &TextureDesc) -> Result<vk::ImageView> {
        let view_create_info = vk::ImageViewCreateInfo::default()
            .image(image)
            .view_type(vk::ImageViewType::TYPE_2D)
            .format(format_to_vk(desc.format))
            .components(vk::ComponentMapping {
                r: vk::ComponentSwizzle::IDENTITY,
                g: vk::ComponentSwizzle::IDENTITY,
                b: vk::ComponentSwizzle::IDENTITY,
                a: vk::ComponentSwizzle::IDENTITY,
            })
            .subresource_range(vk::ImageSubresourceRange {
                aspect_mask: aspect_mask_for(desc.format),
                base_mip_level: 0,
                level_count: 1,
                base_array_layer: 0,
                layer_count: 1,
            });

        unsafe { self.ctx.device.create_image_view(&view_create_info, None) }
            .map_err(|e| strata_err!(BackendError, "strata::vulkan", "Failed to create texture image view: {:?}", e))
    }
}

impl GraphicsDevice for VulkanGraphicsDevice {
    fn create_render_pass(
        &self,
        desc: &RenderPassDesc,
        label: Option<&str>,
    ) -> Result<Arc<dyn RendererRenderPass>> {
        let attachments: Vec<vk::AttachmentDescription> =
            desc.attachments.iter().map(attachment_description_to_vk).collect();

        let subpass_desc = &desc.subpass;
        let color_refs: Vec<vk::AttachmentReference> =
            subpass_desc.color_attachments.iter().map(attachment_reference_to_vk).collect();
        let resolve_refs: Vec<vk::AttachmentReference> =
            subpass_desc.resolve_attachments.iter().map(attachment_reference_to_vk).collect();
        let depth_ref = attachment_reference_to_vk(&subpass_desc.depth_stencil_attachment);

        let mut subpass = vk::SubpassDescription::default()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(&color_refs);

        // Resolve array must match the color array length when present
        let has_resolve = subpass_desc.resolve_attachments.iter().any(|r| !r.is_unused());
        if has_resolve && resolve_refs.len() == color_refs.len() {
            subpass = subpass.resolve_attachments(&resolve_refs);
        }
        if !subpass_desc.depth_stencil_attachment.is_unused() {
            subpass = subpass.depth_stencil_attachment(&depth_ref);
        }

        let subpasses = [subpass];
        let render_pass_info = vk::RenderPassCreateInfo::default()
            .attachments(&attachments)
            .subpasses(&subpasses);

        let render_pass = unsafe { self.ctx.device.create_render_pass(&render_pass_info, None) }
            .map_err(|e| strata_err!(PassCreationFailed, "strata::vulkan", "Failed to create render pass: {:?}", e))?;

        if let Some(label) = label {
            self.ctx.set_debug_name(render_pass, label);
        }

        Ok(Arc::new(RenderPass::new(Arc::clone(&self.ctx), render_pass)))
    }

    fn create_framebuffer(&self, desc: &FramebufferDesc) -> Result<Arc<dyn RendererFramebuffer>> {
        let Some(vk_render_pass) = desc.render_pass.as_any().downcast_ref::<RenderPass>() else {
            strata_bail!(PassCreationFailed, "strata::vulkan", "Framebuffer render pass is not a Vulkan render pass");
        };

        // Collect image views in render pass attachment order
        let mut views = Vec::with_capacity(desc.attachments.len());
        for texture in &desc.attachments {
            let Some(vk_texture) = texture.as_any().downcast_ref::<Texture>() else {
                strata_bail!(
                    PassCreationFailed, "strata::vulkan",
                    "Framebuffer attachment '{}' is not a Vulkan texture", texture.label()
                );
            };
            if !vk_texture.is_valid() {
                strata_bail!(
                    PassCreationFailed, "strata::vulkan",
                    "Framebuffer attachment '{}' has been destroyed", texture.label()
                );
            }
            views.push(vk_texture.view);
        }

        let framebuffer_info = vk::FramebufferCreateInfo::default()
            .render_pass(vk_render_pass.render_pass)
            .attachments(&views)
            .width(desc.width)
            .height(desc.height)
            .layers(1);

        let framebuffer = unsafe { self.ctx.device.create_framebuffer(&framebuffer_info, None) }
            .map_err(|e| strata_err!(PassCreationFailed, "strata::vulkan", "Failed to create framebuffer: {:?}", e))?;

        Ok(Arc::new(Framebuffer::new(
            Arc::clone(&self.ctx),
            framebuffer,
            desc.width,
            desc.height,
            Arc::clone(desc.render_pass),
            desc.attachments.clone(),
        )))
    }

    fn allocate_binding_sets(
        &self,
        descs: &[BindingSetDesc<'_>],
    ) -> Result<Vec<Arc<dyn RendererBindingSet>>> {
        vulkan_binding_set::allocate_binding_sets(&self.ctx, &self.allocator, descs)
    }

    fn resource_allocator(&self) -> &dyn RendererAllocator {
        &self.allocator
    }
}
