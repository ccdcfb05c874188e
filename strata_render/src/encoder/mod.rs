/// Encoder module - turns a render target plus draw commands into native calls

// Module declarations
pub mod config;
pub mod render_target;
pub mod command;
pub mod attachment;
pub mod layout;
pub mod pass_builder;
pub mod binding_allocator;
pub mod bindings_cache;
pub mod resource_tracker;
pub mod render_pass_encoder;

// Re-export the public surface
pub use config::EncoderConfig;
pub use render_target::{Attachment, RenderTarget, MAX_COLOR_ATTACHMENTS};
pub use command::{Command, Rect, VertexBufferBinding};
pub use attachment::{describe_attachment, AttachmentSlot};
pub use pass_builder::{plan_pass, PassPlan};
pub use binding_allocator::allocate_binding_sets;
pub use bindings_cache::PassBindingsCache;
pub use resource_tracker::ResourceTracker;
pub use render_pass_encoder::{PassEncoder, RenderPassEncoder};
