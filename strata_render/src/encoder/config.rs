/// Encoder configuration

/// Configuration for render pass encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Push the pass label and command labels as debug groups
    pub enable_debug_labels: bool,

    /// Check render target consistency before encoding
    pub validate_render_target: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            enable_debug_labels: cfg!(debug_assertions),
            validate_render_target: true,
        }
    }
}

impl EncoderConfig {
    /// Labels on, validation on
    pub fn debug() -> Self {
        Self {
            enable_debug_labels: true,
            validate_render_target: true,
        }
    }
}
