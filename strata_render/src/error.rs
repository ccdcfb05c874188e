//! Error types for Strata render-pass encoding
//!
//! Every failure is terminal for the encode call that produced it: the
//! command stream is left in a non-submittable state and the caller decides
//! whether to drop the frame, retry next frame, or escalate.

use std::fmt;

/// Result type for Strata operations
pub type Result<T> = std::result::Result<T, Error>;

/// Strata errors
#[derive(Debug, Clone)]
pub enum Error {
    /// A buffer, texture or binding set could not be realized or allocated
    ResourceUnavailable(String),

    /// The native render pass or framebuffer object was rejected
    PassCreationFailed(String),

    /// A command lacks data required to issue its draw
    InvalidCommand(String),

    /// The render target description is inconsistent
    InvalidRenderTarget(String),

    /// Any other native API rejection (Vulkan, ...)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ResourceUnavailable(msg) => write!(f, "Resource unavailable: {}", msg),
            Error::PassCreationFailed(msg) => write!(f, "Pass creation failed: {}", msg),
            Error::InvalidCommand(msg) => write!(f, "Invalid command: {}", msg),
            Error::InvalidRenderTarget(msg) => write!(f, "Invalid render target: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
