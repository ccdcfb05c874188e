//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, std::error::Error).

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_resource_unavailable_display() {
    let err = Error::ResourceUnavailable("vertex buffer".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Resource unavailable"));
    assert!(display.contains("vertex buffer"));
}

#[test]
fn test_pass_creation_failed_display() {
    let err = Error::PassCreationFailed("framebuffer rejected".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Pass creation failed"));
    assert!(display.contains("framebuffer rejected"));
}

#[test]
fn test_invalid_command_display() {
    let err = Error::InvalidCommand("missing vertex buffer".to_string());
    assert_eq!(format!("{}", err), "Invalid command: missing vertex buffer");
}

#[test]
fn test_invalid_render_target_display() {
    let err = Error::InvalidRenderTarget("no attachments".to_string());
    assert!(format!("{}", err).starts_with("Invalid render target"));
}

#[test]
fn test_out_of_memory_display() {
    let err = Error::OutOfMemory;
    assert_eq!(format!("{}", err), "Out of GPU memory");
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::BackendError("vkBeginCommandBuffer".to_string());
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug = format!("{:?}", Error::PassCreationFailed("x".to_string()));
    assert!(debug.contains("PassCreationFailed"));

    let debug = format!("{:?}", Error::OutOfMemory);
    assert!(debug.contains("OutOfMemory"));
}

#[test]
fn test_error_clone() {
    let err1 = Error::InvalidCommand("test".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

// ============================================================================
// RESULT TYPE
// ============================================================================

#[test]
fn test_result_question_mark_propagation() {
    fn inner() -> Result<u32> {
        Err(Error::ResourceUnavailable("binding set".to_string()))
    }

    fn outer() -> Result<u32> {
        let value = inner()?;
        Ok(value + 1)
    }

    assert!(matches!(outer(), Err(Error::ResourceUnavailable(_))));
}
