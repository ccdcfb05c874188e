/*!
# Strata Render - Vulkan Backend

Vulkan implementation of the Strata render-pass encoding traits.

This crate provides the native objects the encoder drives, using the Ash
library for Vulkan bindings and gpu-allocator for memory management. It
attaches to a logical device created by the embedder; instance, surface and
queue submission stay outside of it.

```no_run
use strata_render::strata::encoder::{Attachment, PassEncoder, RenderPassEncoder, RenderTarget, ResourceTracker};
use strata_render::strata::render::{TextureDesc, TextureFormat};
use strata_render_vulkan::{VulkanConfig, VulkanGraphicsDevice};

# fn frame(instance: &ash::Instance, physical_device: ash::vk::PhysicalDevice, device: ash::Device)
#     -> strata_render::strata::Result<()> {
let gpu = VulkanGraphicsDevice::new(instance, physical_device, device, 0, VulkanConfig::default())?;
let mut cmd = gpu.create_command_list()?;
let mut tracker = ResourceTracker::new();
let color = gpu.create_texture(TextureDesc::render_target(800, 600, TextureFormat::B8G8R8A8_UNORM), "color")?;
let mut target = RenderTarget::new();
target.set_color_attachment(0, Attachment::new(color));
let mut encoder = RenderPassEncoder::new(&gpu, &mut cmd, &mut tracker);
encoder.encode(&target, &[])?;
# Ok(())
# }
```
*/

// Vulkan implementation modules
mod vulkan_context;
mod vulkan_format;
mod vulkan_texture;
mod vulkan_buffer;
mod vulkan_allocator;
mod vulkan_sampler;
mod vulkan_pipeline;
mod vulkan_render_pass;
mod vulkan_frame_buffer;
mod vulkan_binding_set;
mod vulkan_command_list;
mod vulkan_graphics_device;

pub use vulkan_graphics_device::{VulkanConfig, VulkanGraphicsDevice};
pub use vulkan_context::GpuContext;
pub use vulkan_texture::Texture as VulkanTexture;
pub use vulkan_buffer::Buffer as VulkanBuffer;
pub use vulkan_allocator::Allocator as VulkanAllocator;
pub use vulkan_sampler::Sampler as VulkanSampler;
pub use vulkan_pipeline::Pipeline as VulkanPipeline;
pub use vulkan_render_pass::RenderPass as VulkanRenderPass;
pub use vulkan_frame_buffer::Framebuffer as VulkanFramebuffer;
pub use vulkan_binding_set::BindingSet as VulkanBindingSet;
pub use vulkan_command_list::CommandList as VulkanCommandList;
