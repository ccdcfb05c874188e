/// Buffer traits, buffer views and the allocator seam

use std::any::Any;
use std::sync::Arc;
use crate::error::Result;

/// Index element type of an indexed draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// Non-indexed draw
    None,
    /// 16-bit indices
    U16,
    /// 32-bit indices
    U32,
}

/// Logical buffer trait
///
/// A logical buffer is whatever the recording layer hands over: host bytes
/// still waiting for upload, or a buffer that already lives on the device.
pub trait Buffer: Send + Sync {
    /// Size in bytes
    fn size(&self) -> u64;

    /// The device buffer backing this logical buffer, if it already has one
    fn device_buffer(&self) -> Option<Arc<dyn DeviceBuffer>> {
        None
    }

    /// Downcast support for allocators
    fn as_any(&self) -> &dyn Any;
}

/// GPU-addressable buffer trait
///
/// Implemented by backend buffer types (e.g., the Vulkan buffer).
pub trait DeviceBuffer: Send + Sync {
    /// Size in bytes
    fn size(&self) -> u64;

    /// Downcast support for backends
    fn as_any(&self) -> &dyn Any;
}

/// Byte range inside a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferRange {
    pub offset: u64,
    pub length: u64,
}

impl BufferRange {
    pub fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }
}

/// A buffer plus the byte range a binding or draw reads from it
#[derive(Clone)]
pub struct BufferView {
    pub buffer: Arc<dyn Buffer>,
    pub range: BufferRange,
}

impl BufferView {
    pub fn new(buffer: Arc<dyn Buffer>, range: BufferRange) -> Self {
        Self { buffer, range }
    }

    /// View spanning the whole buffer
    pub fn whole(buffer: Arc<dyn Buffer>) -> Self {
        let length = buffer.size();
        Self { buffer, range: BufferRange::new(0, length) }
    }
}

impl std::fmt::Debug for BufferView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferView")
            .field("size", &self.buffer.size())
            .field("range", &self.range)
            .finish()
    }
}

/// Host-side bytes waiting to be realized on the device
#[derive(Debug, Clone)]
pub struct HostBuffer {
    data: Vec<u8>,
    label: String,
}

impl HostBuffer {
    pub fn new(data: Vec<u8>, label: impl Into<String>) -> Self {
        Self { data, label: label.into() }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Buffer for HostBuffer {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Logical handle to a buffer that already lives on the device
///
/// Realizing a view of it returns the wrapped device buffer unchanged.
#[derive(Clone)]
pub struct ResidentBuffer {
    buffer: Arc<dyn DeviceBuffer>,
}

impl ResidentBuffer {
    pub fn new(buffer: Arc<dyn DeviceBuffer>) -> Self {
        Self { buffer }
    }
}

impl Buffer for ResidentBuffer {
    fn size(&self) -> u64 {
        self.buffer.size()
    }

    fn device_buffer(&self) -> Option<Arc<dyn DeviceBuffer>> {
        Some(Arc::clone(&self.buffer))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Resource allocation seam
///
/// Turns a logical buffer view into a GPU-addressable buffer. May allocate
/// or flush, never blocks indefinitely: it returns a usable buffer or an
/// error.
pub trait Allocator: Send + Sync {
    fn realize(&self, view: &BufferView) -> Result<Arc<dyn DeviceBuffer>>;
}
