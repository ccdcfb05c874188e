/// Synchronization barrier description for image layout transitions

use bitflags::bitflags;
use crate::graphics_device::ImageLayout;

bitflags! {
    /// Memory access kinds a barrier orders
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u32 {
        const SHADER_READ = 1 << 0;
        const COLOR_ATTACHMENT_WRITE = 1 << 1;
        const TRANSFER_WRITE = 1 << 2;
    }
}

bitflags! {
    /// Pipeline stages a barrier waits on / blocks
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PipelineStages: u32 {
        const FRAGMENT_SHADER = 1 << 0;
        const COLOR_ATTACHMENT_OUTPUT = 1 << 1;
        const TRANSFER = 1 << 2;
    }
}

/// One image memory barrier
///
/// `old_layout` is filled from the texture's tracked layout at the moment
/// the barrier is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBarrier {
    pub old_layout: ImageLayout,
    pub new_layout: ImageLayout,
    pub src_access: AccessFlags,
    pub src_stages: PipelineStages,
    pub dst_access: AccessFlags,
    pub dst_stages: PipelineStages,
}
