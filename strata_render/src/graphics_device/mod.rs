/// Graphics device module - native-object traits and descriptors

// Module declarations
pub mod graphics_device;
pub mod texture;
pub mod sampler;
pub mod buffer;
pub mod pipeline;
pub mod barrier;
pub mod command_list;
pub mod render_pass;
pub mod frame_buffer;
pub mod binding_set;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use texture::*;
pub use sampler::*;
pub use buffer::*;
pub use pipeline::*;
pub use barrier::*;
pub use command_list::*;
pub use render_pass::*;
pub use frame_buffer::*;
pub use binding_set::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
