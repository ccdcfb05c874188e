/// Allocator - realizes logical buffer views into Vulkan buffers
///
/// Resident buffers are returned as they are. Host buffers are uploaded
/// whole into a host-visible buffer, so every range of the host buffer keeps
/// its offset in the device copy. Uploads are cached per host buffer until
/// `release_uploads` is called (once per frame, after submission).

use std::sync::{Arc, Mutex};
use ash::vk;
use rustc_hash::FxHashMap;
use strata_render::strata::render::{
    Allocator as RendererAllocator, Buffer as RendererBuffer, BufferView, DeviceBuffer, HostBuffer,
};
use strata_render::strata::Result;
use strata_render::{strata_bail, strata_err, strata_trace};
use crate::vulkan_buffer::Buffer;
use crate::vulkan_context::GpuContext;

/// One cached upload: the source keeps its address from being reused
type Upload = (Arc<dyn RendererBuffer>, Arc<Buffer>);

/// Vulkan implementation of the Allocator trait
pub struct Allocator {
    ctx: Arc<GpuContext>,
    uploads: Mutex<FxHashMap<usize, Upload>>,
}

/// Usage of every upload: it may back any binding or draw input
const UPLOAD_USAGE: vk::BufferUsageFlags = vk::BufferUsageFlags::from_raw(
    vk::BufferUsageFlags::VERTEX_BUFFER.as_raw()
        | vk::BufferUsageFlags::INDEX_BUFFER.as_raw()
        | vk::BufferUsageFlags::UNIFORM_BUFFER.as_raw()
        | vk::BufferUsageFlags::STORAGE_BUFFER.as_raw(),
);

impl Allocator {
    pub(crate) fn new(ctx: Arc<GpuContext>) -> Self {
        Self {
            ctx,
            uploads: Mutex::new(FxHashMap::default()),
        }
    }

    /// Drop the upload cache
    ///
    /// Device copies still referenced elsewhere (resource tracker, binding
    /// sets) stay alive until those references go.
    pub fn release_uploads(&self) -> usize {
        match self.uploads.lock() {
            Ok(mut uploads) => {
                let released = uploads.len();
                uploads.clear();
                released
            }
            Err(_) => 0,
        }
    }

    /// Number of host buffers currently uploaded
    pub fn upload_count(&self) -> usize {
        self.uploads.lock().map(|uploads| uploads.len()).unwrap_or(0)
    }

    fn upload(&self, host: &HostBuffer) -> Result<Arc<Buffer>> {
        let buffer = Buffer::create(&self.ctx, host.size(), UPLOAD_USAGE, host.label())?;
        buffer.write(0, host.data())?;
        strata_trace!("strata::vulkan", "Uploaded host buffer '{}' ({} bytes)", host.label(), host.size());
        Ok(Arc::new(buffer))
    }
}

/// Reject views reaching past the end of their host buffer
fn check_view_range(view: &BufferView, host: &HostBuffer) -> Result<()> {
    let end = view.range.offset.checked_add(view.range.length);
    match end {
        Some(end) if end <= host.size() => Ok(()),
        _ => strata_bail!(
            ResourceUnavailable, "strata::vulkan",
            "Buffer view at offset {} with length {} exceeds host buffer '{}' ({} bytes)",
            view.range.offset, view.range.length, host.label(), host.size()
        ),
    }
}

impl RendererAllocator for Allocator {
    fn realize(&self, view: &BufferView) -> Result<Arc<dyn DeviceBuffer>> {
        if let Some(buffer) = view.buffer.device_buffer() {
            return Ok(buffer);
        }

        let Some(host) = view.buffer.as_any().downcast_ref::<HostBuffer>() else {
            strata_bail!(ResourceUnavailable, "strata::vulkan", "Buffer has no device counterpart and no host data");
        };
        check_view_range(view, host)?;

        let key = Arc::as_ptr(&view.buffer) as *const () as usize;
        let mut uploads = self
            .uploads
            .lock()
            .map_err(|_| strata_err!(ResourceUnavailable, "strata::vulkan", "Upload cache lock poisoned"))?;

        if let Some((_, buffer)) = uploads.get(&key) {
            let buffer: Arc<dyn DeviceBuffer> = buffer.clone();
            return Ok(buffer);
        }

        let buffer = self.upload(host)?;
        uploads.insert(key, (Arc::clone(&view.buffer), Arc::clone(&buffer)));
        Ok(buffer)
    }
}

#[cfg(test)]
#[path = "vulkan_allocator_tests.rs"]
mod tests;
