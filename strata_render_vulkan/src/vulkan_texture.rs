/// Texture - Vulkan implementation of the Texture trait

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use ash::vk;
use gpu_allocator::vulkan::Allocation;
use strata_render::strata::render::{ImageLayout, Texture as RendererTexture, TextureDesc};
use crate::vulkan_context::GpuContext;

/// Vulkan texture implementation
///
/// Either owns its image and memory (created by the device) or wraps an
/// image owned by someone else (swapchain images, external targets).
pub struct Texture {
    /// Vulkan image
    pub(crate) image: vk::Image,
    /// Vulkan image view (always owned)
    pub(crate) view: vk::ImageView,
    /// GPU memory allocation (None for wrapped images)
    pub(crate) allocation: Option<Allocation>,
    /// Whether the image is destroyed with this texture
    pub(crate) owns_image: bool,
    /// Shared GPU context (for cleanup)
    pub(crate) ctx: Arc<GpuContext>,
    /// Read-only texture properties
    pub(crate) desc: TextureDesc,
    pub(crate) label: String,
    /// Tracked layout, shared by every attachment/binding using the image
    pub(crate) layout: Mutex<ImageLayout>,
    pub(crate) valid: AtomicBool,
}

impl Texture {
    /// Vulkan image handle
    pub fn image(&self) -> vk::Image {
        self.image
    }

    /// Vulkan image view handle
    pub fn view(&self) -> vk::ImageView {
        self.view
    }

    /// Mark a wrapped image as gone (e.g., its swapchain was recreated)
    ///
    /// Barriers recorded against an invalid texture fail instead of
    /// touching a dead handle.
    pub fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
    }
}

impl RendererTexture for Texture {
    fn desc(&self) -> &TextureDesc {
        &self.desc
    }

    fn layout(&self) -> ImageLayout {
        *self.layout.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_layout_without_encoding(&self, layout: ImageLayout) -> ImageLayout {
        let mut current = self.layout.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *current, layout)
    }

    fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            // Destroy image view
            self.ctx.device.destroy_image_view(self.view, None);

            // Free GPU memory
            if let Some(allocation) = self.allocation.take() {
                if let Ok(mut allocator) = self.ctx.allocator.lock() {
                    allocator.free(allocation).ok();
                }
            }

            // Destroy image (only if we created it)
            if self.owns_image {
                self.ctx.device.destroy_image(self.image, None);
            }
        }
    }
}
