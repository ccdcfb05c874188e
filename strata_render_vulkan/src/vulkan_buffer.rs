/// Buffer - Vulkan implementation of the DeviceBuffer trait

use std::any::Any;
use std::sync::Arc;
use ash::vk;
use gpu_allocator::vulkan::{Allocation, AllocationCreateDesc, AllocationScheme};
use gpu_allocator::MemoryLocation;
use strata_render::strata::{render::DeviceBuffer, Error, Result};
use strata_render::{strata_bail, strata_err, strata_error};
use crate::vulkan_context::GpuContext;

/// Vulkan buffer implementation
pub struct Buffer {
    /// Shared GPU context (device, allocator)
    ctx: Arc<GpuContext>,
    /// Vulkan buffer
    pub(crate) buffer: vk::Buffer,
    /// GPU memory allocation
    pub(crate) allocation: Option<Allocation>,
    /// Buffer size
    pub(crate) size: u64,
}

impl Buffer {
    /// Create a new Vulkan buffer
    pub fn new(
        ctx: Arc<GpuContext>,
        buffer: vk::Buffer,
        allocation: Allocation,
        size: u64,
    ) -> Self {
        Self {
            ctx,
            buffer,
            allocation: Some(allocation),
            size,
        }
    }

    /// Create a host-visible buffer and bind fresh memory to it
    ///
    /// # Arguments
    ///
    /// * `ctx` - Shared GPU context
    /// * `size` - Size in bytes (must be non-zero)
    /// * `usage` - Vulkan usage flags
    /// * `name` - Allocation name shown in allocator reports
    pub(crate) fn create(
        ctx: &Arc<GpuContext>,
        size: u64,
        usage: vk::BufferUsageFlags,
        name: &str,
    ) -> Result<Self> {
        if size == 0 {
            strata_bail!(ResourceUnavailable, "strata::vulkan", "Cannot create zero-sized buffer '{}'", name);
        }

        let buffer_create_info = vk::BufferCreateInfo::default()
            .size(size)
            .usage(usage | vk::BufferUsageFlags::TRANSFER_DST)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);

        let buffer = unsafe { ctx.device.create_buffer(&buffer_create_info, None) }.map_err(|e| {
            strata_err!(BackendError, "strata::vulkan", "Failed to create buffer of size {} bytes: {:?}", size, e)
        })?;

        let requirements = unsafe { ctx.device.get_buffer_memory_requirements(buffer) };
        let allocation = ctx
            .allocator
            .lock()
            .map_err(|_| strata_err!(BackendError, "strata::vulkan", "GPU allocator lock poisoned"))
            .and_then(|mut allocator| {
                allocator
                    .allocate(&AllocationCreateDesc {
                        name,
                        requirements,
                        location: MemoryLocation::CpuToGpu,
                        linear: true,
                        allocation_scheme: AllocationScheme::GpuAllocatorManaged,
                    })
                    .map_err(|_e| {
                        let size_mb = requirements.size as f64 / (1024.0 * 1024.0);
                        strata_error!("strata::vulkan", "Out of GPU memory for buffer '{}' (required: {:.2} MB)", name, size_mb);
                        Error::OutOfMemory
                    })
            });
        let allocation = match allocation {
            Ok(allocation) => allocation,
            Err(e) => {
                unsafe { ctx.device.destroy_buffer(buffer, None) };
                return Err(e);
            }
        };

        // From here on Drop releases both the buffer and its memory
        let memory = unsafe { allocation.memory() };
        let memory_offset = allocation.offset();
        let buffer = Self::new(Arc::clone(ctx), buffer, allocation, size);
        unsafe { ctx.device.bind_buffer_memory(buffer.buffer, memory, memory_offset) }
            .map_err(|e| strata_err!(BackendError, "strata::vulkan", "Failed to bind buffer memory: {:?}", e))?;

        ctx.set_debug_name(buffer.buffer, name);
        Ok(buffer)
    }

    /// Vulkan buffer handle
    pub fn handle(&self) -> vk::Buffer {
        self.buffer
    }

    /// Copy `data` into the buffer at `offset` (host-visible memory only)
    pub fn write(&self, offset: u64, data: &[u8]) -> Result<()> {
        if offset.saturating_add(data.len() as u64) > self.size {
            strata_bail!(
                BackendError, "strata::vulkan",
                "Buffer write out of range: {} bytes at offset {} (size {})",
                data.len(), offset, self.size
            );
        }

        let Some(allocation) = &self.allocation else {
            strata_bail!(BackendError, "strata::vulkan", "Buffer write failed: no GPU allocation");
        };
        let Some(mapped) = allocation.mapped_ptr() else {
            strata_bail!(BackendError, "strata::vulkan", "Buffer is not CPU-accessible");
        };

        unsafe {
            let mapped_ptr = mapped.as_ptr() as *mut u8;
            std::ptr::copy_nonoverlapping(
                data.as_ptr(),
                mapped_ptr.add(offset as usize),
                data.len(),
            );
        }
        Ok(())
    }
}

impl DeviceBuffer for Buffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe {
            // Free GPU memory
            if let Some(allocation) = self.allocation.take() {
                // Don't panic if lock fails - we still need to destroy the buffer
                if let Ok(mut allocator) = self.ctx.allocator.lock() {
                    allocator.free(allocation).ok();
                }
            }

            // Destroy buffer
            self.ctx.device.destroy_buffer(self.buffer, None);
        }
    }
}
