/*!
# Strata Render

Backend-agnostic render-pass encoding for the Strata renderer.

This crate turns a logical render target plus an ordered list of draw commands
into the exact sequence of native calls a low-level graphics API requires:
attachment descriptions, a render pass / framebuffer pair, layout-transition
barriers, per-draw binding sets and the draws themselves.

Native objects are reached through trait objects (similar to C++ virtual
inheritance). Backend crates (Vulkan, ...) provide the concrete types.

## Architecture

- **GraphicsDevice**: Factory for passes, framebuffers and binding sets
- **CommandList**: The native command stream the encoder records into
- **Allocator**: Realizes logical buffer views into device buffers
- **RenderPassEncoder**: Walks a command list and drives the above
- **ResourceTracker**: Keeps transient native objects alive until GPU completion
*/

// Internal modules
mod error;
mod strata_core;
pub mod log;
pub mod graphics_device;
pub mod encoder;

// Main strata namespace module
pub mod strata {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging facade
    pub use crate::strata_core::Strata;

    // Device traits
    pub use crate::graphics_device::GraphicsDevice;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render sub-module with all native-object types
    pub mod render {
        pub use crate::graphics_device::*;
    }

    // Encoder sub-module
    pub mod encoder {
        pub use crate::encoder::*;
    }
}
