/// GpuContext - Shared GPU state for all Vulkan objects
///
/// Contains everything the backend objects need to create and destroy
/// themselves:
/// - Device for Vulkan API calls
/// - Allocator for memory management
/// - Debug utils device functions (object names, command labels)

use ash::vk;
use gpu_allocator::vulkan::Allocator;
use std::ffi::CString;
use std::mem::ManuallyDrop;
use std::sync::Mutex;

/// Shared GPU context for all Vulkan resources.
///
/// Shared (via `Arc`) by every object the backend hands out, so the allocator
/// outlives the last allocation. The logical device itself belongs to the
/// embedder and is never destroyed here.
pub struct GpuContext {
    /// Vulkan logical device
    pub device: ash::Device,

    /// Physical device the logical device was created from
    pub physical_device: vk::PhysicalDevice,

    /// GPU memory allocator
    /// Wrapped in ManuallyDrop so it is released explicitly in Drop
    pub allocator: ManuallyDrop<Mutex<Allocator>>,

    /// Graphics queue family index
    pub graphics_queue_family: u32,

    /// Debug utils device functions (None when debug utils are disabled)
    pub(crate) debug_utils: Option<ash::ext::debug_utils::Device>,
}

impl GpuContext {
    /// Create a new GPU context
    ///
    /// # Arguments
    ///
    /// * `device` - Vulkan logical device
    /// * `physical_device` - Physical device backing `device`
    /// * `allocator` - GPU memory allocator
    /// * `graphics_queue_family` - Graphics queue family index
    /// * `debug_utils` - Debug utils device functions (if enabled)
    pub fn new(
        device: ash::Device,
        physical_device: vk::PhysicalDevice,
        allocator: Allocator,
        graphics_queue_family: u32,
        debug_utils: Option<ash::ext::debug_utils::Device>,
    ) -> Self {
        Self {
            device,
            physical_device,
            allocator: ManuallyDrop::new(Mutex::new(allocator)),
            graphics_queue_family,
            debug_utils,
        }
    }

    /// Attach a debug name to a Vulkan object (no-op without debug utils)
    pub(crate) fn set_debug_name<H: vk::Handle>(&self, handle: H, name: &str) {
        let Some(debug_utils) = &self.debug_utils else {
            return;
        };
        let Ok(name) = CString::new(name) else {
            return;
        };
        let info = vk::DebugUtilsObjectNameInfoEXT::default()
            .object_handle(handle)
            .object_name(&name);
        unsafe {
            // Naming is diagnostic only; a driver refusal is not an error
            debug_utils.set_debug_utils_object_name(&info).ok();
        }
    }
}

impl Drop for GpuContext {
    fn drop(&mut self) {
        // Every allocation holds an Arc<GpuContext>, so none is left here
        unsafe {
            ManuallyDrop::drop(&mut self.allocator);
        }
    }
}
