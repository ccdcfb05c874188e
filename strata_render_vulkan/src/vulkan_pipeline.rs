/// Pipeline - Vulkan implementation of the Pipeline trait
///
/// Pipelines are compiled by the embedder; the backend only needs the
/// handles to bind them and to allocate descriptor sets against them.

use std::any::Any;
use std::sync::Arc;
use ash::vk;
use strata_render::strata::render::Pipeline as RendererPipeline;
use crate::vulkan_context::GpuContext;

/// Vulkan pipeline implementation
pub struct Pipeline {
    /// Vulkan graphics pipeline
    pub(crate) pipeline: vk::Pipeline,
    /// Pipeline layout (binding sets are bound against it)
    pub(crate) pipeline_layout: vk::PipelineLayout,
    /// Layout of descriptor set 0
    pub(crate) set_layout: vk::DescriptorSetLayout,
    /// Whether the handles are destroyed with this object
    owned: bool,
    label: String,
    ctx: Arc<GpuContext>,
}

impl Pipeline {
    pub(crate) fn new(
        ctx: Arc<GpuContext>,
        pipeline: vk::Pipeline,
        pipeline_layout: vk::PipelineLayout,
        set_layout: vk::DescriptorSetLayout,
        owned: bool,
        label: &str,
    ) -> Self {
        Self {
            pipeline,
            pipeline_layout,
            set_layout,
            owned,
            label: label.to_string(),
            ctx,
        }
    }

    /// Vulkan pipeline handle
    pub fn handle(&self) -> vk::Pipeline {
        self.pipeline
    }
}

impl RendererPipeline for Pipeline {
    fn label(&self) -> &str {
        &self.label
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        if !self.owned {
            return;
        }
        unsafe {
            self.ctx.device.destroy_pipeline(self.pipeline, None);
            self.ctx.device.destroy_pipeline_layout(self.pipeline_layout, None);
            self.ctx.device.destroy_descriptor_set_layout(self.set_layout, None);
        }
    }
}
