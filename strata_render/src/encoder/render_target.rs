/// Logical render target: color attachments by bind index, depth, stencil

use std::collections::BTreeMap;
use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{ClearValue, LoadAction, SampleCount, StoreAction, Texture};
use crate::strata_bail;

const SOURCE: &str = "strata::encoder";

/// Color bind indices must be below this value
pub const MAX_COLOR_ATTACHMENTS: u32 = 8;

// ============================================================================
// Attachment
// ============================================================================

/// A target image plus its load/store policy and clear value
#[derive(Clone)]
pub struct Attachment {
    /// Image rendered into
    pub texture: Arc<dyn Texture>,
    /// Single-sampled image the multisampled `texture` resolves into
    pub resolve_texture: Option<Arc<dyn Texture>>,
    /// Requested load action (may be overridden, see `describe_attachment`)
    pub load_action: LoadAction,
    /// Requested store action (may be overridden, see `describe_attachment`)
    pub store_action: StoreAction,
    /// Color for color attachments, depth/stencil otherwise
    pub clear_value: ClearValue,
}

impl Attachment {
    /// Attachment that clears to transparent black and stores its result
    pub fn new(texture: Arc<dyn Texture>) -> Self {
        Self {
            texture,
            resolve_texture: None,
            load_action: LoadAction::Clear,
            store_action: StoreAction::Store,
            clear_value: ClearValue::Color([0.0, 0.0, 0.0, 0.0]),
        }
    }

    /// Depth and/or stencil attachment clearing to depth 1.0, stencil 0
    pub fn depth_stencil(texture: Arc<dyn Texture>) -> Self {
        Self {
            clear_value: ClearValue::DepthStencil { depth: 1.0, stencil: 0 },
            store_action: StoreAction::DontCare,
            ..Self::new(texture)
        }
    }

    pub fn with_resolve(mut self, resolve_texture: Arc<dyn Texture>) -> Self {
        self.resolve_texture = Some(resolve_texture);
        self
    }

    pub fn with_actions(mut self, load_action: LoadAction, store_action: StoreAction) -> Self {
        self.load_action = load_action;
        self.store_action = store_action;
        self
    }

    pub fn with_clear_value(mut self, clear_value: ClearValue) -> Self {
        self.clear_value = clear_value;
        self
    }

    /// Clear color, transparent black for depth/stencil values
    pub fn clear_color(&self) -> [f32; 4] {
        match self.clear_value {
            ClearValue::Color(color) => color,
            ClearValue::DepthStencil { .. } => [0.0; 4],
        }
    }

    /// Clear depth, 0.0 for color values
    pub fn clear_depth(&self) -> f32 {
        match self.clear_value {
            ClearValue::DepthStencil { depth, .. } => depth,
            ClearValue::Color(_) => 0.0,
        }
    }

    /// Clear stencil, 0 for color values
    pub fn clear_stencil(&self) -> u32 {
        match self.clear_value {
            ClearValue::DepthStencil { stencil, .. } => stencil,
            ClearValue::Color(_) => 0,
        }
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("texture", &self.texture.label())
            .field("resolve_texture", &self.resolve_texture.as_ref().map(|t| t.label().to_string()))
            .field("load_action", &self.load_action)
            .field("store_action", &self.store_action)
            .field("clear_value", &self.clear_value)
            .finish()
    }
}

// ============================================================================
// RenderTarget
// ============================================================================

/// Logical render target handed to one encode call
///
/// Color attachments are keyed by bind index (the shader output location);
/// gaps between indices become unused slots in the native pass.
#[derive(Debug, Clone, Default)]
pub struct RenderTarget {
    colors: BTreeMap<u32, Attachment>,
    depth: Option<Attachment>,
    stencil: Option<Attachment>,
}

impl RenderTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the color attachment at `index`
    pub fn set_color_attachment(&mut self, index: u32, attachment: Attachment) -> &mut Self {
        self.colors.insert(index, attachment);
        self
    }

    pub fn set_depth_attachment(&mut self, attachment: Option<Attachment>) -> &mut Self {
        self.depth = attachment;
        self
    }

    pub fn set_stencil_attachment(&mut self, attachment: Option<Attachment>) -> &mut Self {
        self.stencil = attachment;
        self
    }

    /// Color attachments in ascending bind-index order
    pub fn color_attachments(&self) -> impl Iterator<Item = (u32, &Attachment)> {
        self.colors.iter().map(|(index, attachment)| (*index, attachment))
    }

    pub fn color_attachment_count(&self) -> usize {
        self.colors.len()
    }

    pub fn depth_attachment(&self) -> Option<&Attachment> {
        self.depth.as_ref()
    }

    pub fn stencil_attachment(&self) -> Option<&Attachment> {
        self.stencil.as_ref()
    }

    /// Highest color bind index, `None` without color attachments
    pub fn max_color_bind_index(&self) -> Option<u32> {
        self.colors.keys().next_back().copied()
    }

    /// Visit colors, then depth, then stencil until `f` returns false
    pub fn iterate_all_attachments(&self, mut f: impl FnMut(&Attachment) -> bool) {
        for attachment in self.colors.values() {
            if !f(attachment) {
                return;
            }
        }
        if let Some(depth) = &self.depth {
            if !f(depth) {
                return;
            }
        }
        if let Some(stencil) = &self.stencil {
            f(stencil);
        }
    }

    /// Pixel size of the target
    ///
    /// Taken from the first color attachment, else depth, else stencil.
    /// (0, 0) for an empty target.
    pub fn render_target_size(&self) -> (u32, u32) {
        self.colors
            .values()
            .next()
            .or(self.depth.as_ref())
            .or(self.stencil.as_ref())
            .map(|attachment| {
                let desc = attachment.texture.desc();
                (desc.width, desc.height)
            })
            .unwrap_or((0, 0))
    }

    /// Reject color bind indices at or above `MAX_COLOR_ATTACHMENTS`
    ///
    /// The native pass sizes its color slots by the highest index, so this
    /// runs even when full validation is disabled.
    pub fn validate_bind_indices(&self) -> Result<()> {
        if let Some(index) = self.max_color_bind_index() {
            if index >= MAX_COLOR_ATTACHMENTS {
                strata_bail!(
                    InvalidRenderTarget,
                    SOURCE,
                    "Color bind index {} exceeds the maximum of {}",
                    index,
                    MAX_COLOR_ATTACHMENTS - 1
                );
            }
        }
        Ok(())
    }

    /// Check that the attachments can form one render pass
    pub fn validate(&self) -> Result<()> {
        self.validate_bind_indices()?;
        let (width, height) = self.render_target_size();
        let mut count = 0usize;
        let mut problem: Option<String> = None;

        self.iterate_all_attachments(|attachment| {
            count += 1;
            let desc = attachment.texture.desc();
            if (desc.width, desc.height) != (width, height) {
                problem = Some(format!(
                    "attachment '{}' is {}x{}, target is {}x{}",
                    attachment.texture.label(), desc.width, desc.height, width, height
                ));
                return false;
            }
            if let Some(resolve) = &attachment.resolve_texture {
                let resolve_desc = resolve.desc();
                if desc.sample_count == SampleCount::Count1 {
                    problem = Some(format!(
                        "attachment '{}' has a resolve texture but is not multisampled",
                        attachment.texture.label()
                    ));
                } else if resolve_desc.sample_count != SampleCount::Count1 {
                    problem = Some(format!(
                        "resolve texture '{}' must be single-sampled",
                        resolve.label()
                    ));
                } else if resolve_desc.format != desc.format {
                    problem = Some(format!(
                        "resolve texture '{}' format {:?} differs from {:?}",
                        resolve.label(), resolve_desc.format, desc.format
                    ));
                } else if (resolve_desc.width, resolve_desc.height) != (width, height) {
                    problem = Some(format!(
                        "resolve texture '{}' is {}x{}, target is {}x{}",
                        resolve.label(), resolve_desc.width, resolve_desc.height, width, height
                    ));
                }
            }
            problem.is_none()
        });

        if count == 0 {
            strata_bail!(InvalidRenderTarget, SOURCE, "Render target has no attachments");
        }
        if let Some(problem) = problem {
            strata_bail!(InvalidRenderTarget, SOURCE, "{}", problem);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "render_target_tests.rs"]
mod tests;
