/// Pass/framebuffer builder
///
/// Derives the render pass description, the framebuffer image order and the
/// clear values from one walk over the render target, so the three can never
/// disagree on attachment order.

use std::sync::Arc;
use crate::encoder::attachment::{describe_attachment, subpass_layout_for, AttachmentSlot};
use crate::encoder::{Attachment, RenderTarget};
use crate::error::Result;
use crate::graphics_device::{
    AttachmentDescription, AttachmentReference, ClearValue, Framebuffer,
    FramebufferDesc, GraphicsDevice, ImageLayout, RenderPass, RenderPassDesc,
    SubpassDescription, Texture,
};
use crate::strata_err;

const SOURCE: &str = "strata::encoder";

/// Everything needed to create and begin one render pass
#[derive(Clone)]
pub struct PassPlan {
    pub desc: RenderPassDesc,
    /// Framebuffer images, aligned 1:1 with `desc.attachments`
    pub views: Vec<Arc<dyn Texture>>,
    /// Aligned 1:1 with `desc.attachments`
    pub clear_values: Vec<ClearValue>,
    pub width: u32,
    pub height: u32,
}

impl PassPlan {
    /// Each framebuffer image with the layout the pass leaves it in
    pub fn final_layouts(&self) -> impl Iterator<Item = (&Arc<dyn Texture>, ImageLayout)> {
        self.views
            .iter()
            .zip(&self.desc.attachments)
            .map(|(texture, desc)| (texture, desc.final_layout))
    }
}

impl std::fmt::Debug for PassPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassPlan")
            .field("desc", &self.desc)
            .field("views", &self.views.iter().map(|t| t.label().to_string()).collect::<Vec<_>>())
            .field("clear_values", &self.clear_values)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Accumulates attachments in framebuffer order
struct PlanBuilder {
    attachments: Vec<AttachmentDescription>,
    views: Vec<Arc<dyn Texture>>,
    clear_values: Vec<ClearValue>,
}

impl PlanBuilder {
    /// Append the selected image of `attachment`, returning its reference
    fn push(
        &mut self,
        attachment: &Attachment,
        slot: AttachmentSlot,
        layout: ImageLayout,
        clear_value: ClearValue,
    ) -> Option<AttachmentReference> {
        let desc = describe_attachment(attachment, slot)?;
        let texture = match slot {
            AttachmentSlot::Primary => Arc::clone(&attachment.texture),
            AttachmentSlot::Resolve => Arc::clone(attachment.resolve_texture.as_ref()?),
        };
        let reference = AttachmentReference::new(self.attachments.len() as u32, layout);
        self.attachments.push(desc);
        self.views.push(texture);
        self.clear_values.push(clear_value);
        Some(reference)
    }
}

/// Plan the single-subpass render pass for `target`
///
/// Attachment order: each color attachment by ascending bind index, followed
/// directly by its resolve image if any, then depth, then stencil.
pub fn plan_pass(target: &RenderTarget) -> PassPlan {
    let slot_count = target.max_color_bind_index().map_or(0, |max| max as usize + 1);
    let mut color_refs = vec![AttachmentReference::UNUSED; slot_count];
    let mut resolve_refs = vec![AttachmentReference::UNUSED; slot_count];
    let mut builder = PlanBuilder {
        attachments: Vec::new(),
        views: Vec::new(),
        clear_values: Vec::new(),
    };

    for (index, color) in target.color_attachments() {
        let clear = ClearValue::Color(color.clear_color());
        let layout = subpass_layout_for(color.texture.desc().format.attachment_kind());
        if let Some(reference) = builder.push(color, AttachmentSlot::Primary, layout, clear) {
            color_refs[index as usize] = reference;
        }
        if let Some(reference) =
            builder.push(color, AttachmentSlot::Resolve, ImageLayout::General, clear)
        {
            resolve_refs[index as usize] = reference;
        }
    }

    let depth = target.depth_attachment();
    let stencil = target.stencil_attachment();
    let clear_depth = depth.map_or(0.0, Attachment::clear_depth);
    let clear_stencil = stencil.map_or(0, Attachment::clear_stencil);
    let mut depth_stencil_ref = AttachmentReference::UNUSED;

    if let Some(depth) = depth {
        let clear = ClearValue::DepthStencil { depth: depth.clear_depth(), stencil: clear_stencil };
        if let Some(reference) = builder.push(
            depth,
            AttachmentSlot::Primary,
            ImageLayout::DepthStencilAttachment,
            clear,
        ) {
            depth_stencil_ref = reference;
        }
    }

    if let Some(stencil) = stencil {
        let clear = ClearValue::DepthStencil { depth: clear_depth, stencil: stencil.clear_stencil() };
        let reference = builder.push(
            stencil,
            AttachmentSlot::Primary,
            ImageLayout::DepthStencilAttachment,
            clear,
        );
        // Depth and stencil share one reference; depth keeps it when both exist
        if depth_stencil_ref.is_unused() {
            if let Some(reference) = reference {
                depth_stencil_ref = reference;
            }
        }
    }

    let (width, height) = target.render_target_size();
    PassPlan {
        desc: RenderPassDesc {
            attachments: builder.attachments,
            subpass: SubpassDescription {
                color_attachments: color_refs,
                resolve_attachments: resolve_refs,
                depth_stencil_attachment: depth_stencil_ref,
            },
        },
        views: builder.views,
        clear_values: builder.clear_values,
        width,
        height,
    }
}

/// Create the native render pass and a framebuffer matching `plan`
///
/// Nothing is returned unless both objects were created.
pub fn create_pass_objects(
    device: &dyn GraphicsDevice,
    plan: &PassPlan,
    label: Option<&str>,
) -> Result<(Arc<dyn RenderPass>, Arc<dyn Framebuffer>)> {
    let render_pass = device.create_render_pass(&plan.desc, label).map_err(|e| {
        strata_err!(PassCreationFailed, SOURCE, "Could not create render pass: {}", e)
    })?;

    let framebuffer = device
        .create_framebuffer(&FramebufferDesc {
            render_pass: &render_pass,
            attachments: plan.views.clone(),
            width: plan.width,
            height: plan.height,
        })
        .map_err(|e| {
            strata_err!(PassCreationFailed, SOURCE, "Could not create framebuffer: {}", e)
        })?;

    Ok((render_pass, framebuffer))
}

#[cfg(test)]
#[path = "pass_builder_tests.rs"]
mod tests;
