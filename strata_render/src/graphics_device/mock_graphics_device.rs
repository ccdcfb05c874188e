/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Every native call is recorded as a string so tests can assert on the exact
/// call sequence the encoder produces. Failures can be injected per object
/// kind.

use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::graphics_device::{
    Allocator, BindingSet, BindingSetDesc, Buffer, BufferView, ClearValue,
    CommandList, DeviceBuffer, Framebuffer, FramebufferDesc, GraphicsDevice,
    HostBuffer, ImageBarrier, ImageLayout, IndexType, Pipeline, Rect2D,
    RenderPass, RenderPassDesc, SampleCount, Sampler, SamplerDesc, StorageMode,
    Texture, TextureDesc, TextureFormat, TextureUsage, Viewport,
};
use crate::strata_bail;

const SOURCE: &str = "strata::mock";

// ============================================================================
// Mock Texture
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub desc: TextureDesc,
    pub name: String,
    layout: Mutex<ImageLayout>,
    valid: AtomicBool,
}

impl MockTexture {
    pub fn new(desc: TextureDesc, name: &str) -> Self {
        Self {
            desc,
            name: name.to_string(),
            layout: Mutex::new(ImageLayout::Undefined),
            valid: AtomicBool::new(true),
        }
    }

    /// Single-sampled RGBA8 color target
    pub fn color(width: u32, height: u32, name: &str) -> Arc<Self> {
        Arc::new(Self::new(
            TextureDesc::render_target(width, height, TextureFormat::R8G8B8A8_UNORM),
            name,
        ))
    }

    /// 4x multisampled RGBA8 color target
    pub fn multisampled(width: u32, height: u32, name: &str) -> Arc<Self> {
        let mut desc = TextureDesc::render_target(width, height, TextureFormat::R8G8B8A8_UNORM);
        desc.sample_count = SampleCount::Count4;
        desc.storage_mode = StorageMode::DeviceTransient;
        desc.usage = TextureUsage::RenderTarget;
        Arc::new(Self::new(desc, name))
    }

    /// Texture with an arbitrary format
    pub fn with_format(width: u32, height: u32, format: TextureFormat, name: &str) -> Arc<Self> {
        Arc::new(Self::new(TextureDesc::render_target(width, height, format), name))
    }

    /// Simulate destruction of the native image
    pub fn invalidate(&self) {
        self.valid.store(false, Ordering::SeqCst);
    }
}

impl Texture for MockTexture {
    fn desc(&self) -> &TextureDesc {
        &self.desc
    }

    fn layout(&self) -> ImageLayout {
        *self.layout.lock().unwrap()
    }

    fn set_layout_without_encoding(&self, layout: ImageLayout) -> ImageLayout {
        std::mem::replace(&mut *self.layout.lock().unwrap(), layout)
    }

    fn is_valid(&self) -> bool {
        self.valid.load(Ordering::SeqCst)
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock Sampler / Pipeline
// ============================================================================

#[derive(Debug, Default)]
pub struct MockSampler {
    pub desc: SamplerDesc,
}

impl Sampler for MockSampler {
    fn desc(&self) -> &SamplerDesc {
        &self.desc
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub struct MockPipeline {
    pub name: String,
}

impl MockPipeline {
    pub fn new(name: &str) -> Arc<dyn Pipeline> {
        Arc::new(Self { name: name.to_string() })
    }
}

impl Pipeline for MockPipeline {
    fn label(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock buffers and allocator
// ============================================================================

/// Buffer that already lives on the device
#[derive(Debug)]
pub struct MockDeviceBuffer {
    pub size: u64,
    pub name: String,
}

impl DeviceBuffer for MockDeviceBuffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Allocator that turns any logical view into a fresh mock device buffer
#[derive(Debug, Default)]
pub struct MockAllocator {
    pub realized: AtomicUsize,
    pub fail: AtomicBool,
}

impl Allocator for MockAllocator {
    fn realize(&self, view: &BufferView) -> Result<Arc<dyn DeviceBuffer>> {
        if self.fail.load(Ordering::SeqCst) {
            strata_bail!(ResourceUnavailable, SOURCE, "Injected realize failure");
        }
        self.realized.fetch_add(1, Ordering::SeqCst);
        if let Some(resident) = view.buffer.device_buffer() {
            return Ok(resident);
        }
        let name = match view.buffer.as_any().downcast_ref::<HostBuffer>() {
            Some(host) => host.label().to_string(),
            None => "device".to_string(),
        };
        Ok(Arc::new(MockDeviceBuffer { size: view.range.length, name }))
    }
}

/// Host-side buffer holding `count` vertices of `stride` bytes
pub fn host_view(count: usize, stride: usize, name: &str) -> BufferView {
    let buffer: Arc<dyn Buffer> = Arc::new(HostBuffer::new(vec![0u8; count * stride], name));
    BufferView::whole(buffer)
}

// ============================================================================
// Mock native objects
// ============================================================================

#[derive(Debug)]
pub struct MockRenderPass {
    pub desc: RenderPassDesc,
    pub label: Option<String>,
}

impl RenderPass for MockRenderPass {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub struct MockFramebuffer {
    pub width: u32,
    pub height: u32,
    /// Labels of the attached textures, in attachment order
    pub views: Vec<String>,
}

impl Framebuffer for MockFramebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub struct MockBindingSet {
    /// Position inside its allocation batch
    pub index: usize,
    /// Slot names packed into the set, vertex stage first
    pub slots: Vec<String>,
}

impl BindingSet for MockBindingSet {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock CommandList
// ============================================================================

#[derive(Debug, Default)]
pub struct MockCommandList {
    pub commands: Vec<String>,
    pub barriers: Vec<(String, ImageBarrier)>,
    pub clear_values: Vec<ClearValue>,
    pub viewports: Vec<Viewport>,
    pub scissors: Vec<Rect2D>,
    /// Name of a call that should fail (e.g. "end_render_pass")
    pub fail_on: Option<&'static str>,
}

impl MockCommandList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count recorded calls whose text starts with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.commands.iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// Recorded calls starting with `prefix`, in order
    pub fn calls(&self, prefix: &str) -> Vec<&str> {
        self.commands
            .iter()
            .filter(|c| c.starts_with(prefix))
            .map(String::as_str)
            .collect()
    }

    fn record(&mut self, name: &'static str, text: String) -> Result<()> {
        if self.fail_on == Some(name) {
            strata_bail!(BackendError, SOURCE, "Injected {} failure", name);
        }
        self.commands.push(text);
        Ok(())
    }
}

impl CommandList for MockCommandList {
    fn begin(&mut self) -> Result<()> {
        self.record("begin", "begin".to_string())
    }

    fn end(&mut self) -> Result<()> {
        self.record("end", "end".to_string())
    }

    fn image_barrier(&mut self, texture: &dyn Texture, barrier: &ImageBarrier) -> Result<()> {
        if !texture.is_valid() {
            strata_bail!(ResourceUnavailable, SOURCE, "Image '{}' no longer exists", texture.label());
        }
        self.record(
            "image_barrier",
            format!("barrier {} {:?}->{:?}", texture.label(), barrier.old_layout, barrier.new_layout),
        )?;
        self.barriers.push((texture.label().to_string(), *barrier));
        Ok(())
    }

    fn begin_render_pass(
        &mut self,
        _render_pass: &Arc<dyn RenderPass>,
        _framebuffer: &Arc<dyn Framebuffer>,
        _render_area: Rect2D,
        clear_values: &[ClearValue],
    ) -> Result<()> {
        self.record("begin_render_pass", "begin_render_pass".to_string())?;
        self.clear_values = clear_values.to_vec();
        Ok(())
    }

    fn end_render_pass(&mut self) -> Result<()> {
        self.record("end_render_pass", "end_render_pass".to_string())
    }

    fn bind_pipeline(&mut self, pipeline: &Arc<dyn Pipeline>) -> Result<()> {
        self.record("bind_pipeline", format!("bind_pipeline {}", pipeline.label()))
    }

    fn bind_binding_set(
        &mut self,
        _pipeline: &Arc<dyn Pipeline>,
        binding_set: &Arc<dyn BindingSet>,
    ) -> Result<()> {
        let index = binding_set
            .as_any()
            .downcast_ref::<MockBindingSet>()
            .map(|set| set.index)
            .unwrap_or(usize::MAX);
        self.record("bind_binding_set", format!("bind_binding_set {}", index))
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.record("set_viewport", "set_viewport".to_string())?;
        self.viewports.push(viewport);
        Ok(())
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        self.record("set_scissor", "set_scissor".to_string())?;
        self.scissors.push(scissor);
        Ok(())
    }

    fn set_stencil_reference(&mut self, reference: u32) -> Result<()> {
        self.record("set_stencil_reference", format!("set_stencil_reference {}", reference))
    }

    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn DeviceBuffer>, offset: u64) -> Result<()> {
        self.record(
            "bind_vertex_buffer",
            format!("bind_vertex_buffer {} {}", buffer.size(), offset),
        )
    }

    fn bind_index_buffer(
        &mut self,
        buffer: &Arc<dyn DeviceBuffer>,
        offset: u64,
        index_type: IndexType,
    ) -> Result<()> {
        self.record(
            "bind_index_buffer",
            format!("bind_index_buffer {} {} {:?}", buffer.size(), offset, index_type),
        )
    }

    fn draw(
        &mut self,
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    ) -> Result<()> {
        self.record(
            "draw",
            format!("draw {} {} {} {}", vertex_count, instance_count, first_vertex, first_instance),
        )
    }

    fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) -> Result<()> {
        self.record(
            "draw_indexed",
            format!(
                "draw_indexed {} {} {} {} {}",
                index_count, instance_count, first_index, vertex_offset, first_instance
            ),
        )
    }

    fn push_debug_group(&mut self, label: &str) {
        self.commands.push(format!("push_debug_group {}", label));
    }

    fn pop_debug_group(&mut self) {
        self.commands.push("pop_debug_group".to_string());
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

/// Mock device that records every object it creates
#[derive(Debug, Default)]
pub struct MockGraphicsDevice {
    pub render_passes: Mutex<Vec<Arc<MockRenderPass>>>,
    pub framebuffers: Mutex<Vec<Arc<MockFramebuffer>>>,
    /// Size of every binding-set batch, in call order
    pub binding_batches: Mutex<Vec<usize>>,
    pub allocator: MockAllocator,
    pub fail_render_pass: AtomicBool,
    pub fail_framebuffer: AtomicBool,
    pub fail_binding_sets: AtomicBool,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor of the most recently created render pass
    pub fn last_render_pass(&self) -> Option<Arc<MockRenderPass>> {
        self.render_passes.lock().unwrap().last().cloned()
    }

    /// Most recently created framebuffer
    pub fn last_framebuffer(&self) -> Option<Arc<MockFramebuffer>> {
        self.framebuffers.lock().unwrap().last().cloned()
    }

    pub fn realized_buffers(&self) -> usize {
        self.allocator.realized.load(Ordering::SeqCst)
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_render_pass(
        &self,
        desc: &RenderPassDesc,
        label: Option<&str>,
    ) -> Result<Arc<dyn RenderPass>> {
        if self.fail_render_pass.load(Ordering::SeqCst) {
            strata_bail!(PassCreationFailed, SOURCE, "Injected render pass failure");
        }
        let render_pass = Arc::new(MockRenderPass {
            desc: desc.clone(),
            label: label.map(str::to_string),
        });
        self.render_passes.lock().unwrap().push(Arc::clone(&render_pass));
        Ok(render_pass)
    }

    fn create_framebuffer(&self, desc: &FramebufferDesc) -> Result<Arc<dyn Framebuffer>> {
        if self.fail_framebuffer.load(Ordering::SeqCst) {
            strata_bail!(PassCreationFailed, SOURCE, "Injected framebuffer failure");
        }
        let framebuffer = Arc::new(MockFramebuffer {
            width: desc.width,
            height: desc.height,
            views: desc.attachments.iter().map(|t| t.label().to_string()).collect(),
        });
        self.framebuffers.lock().unwrap().push(Arc::clone(&framebuffer));
        Ok(framebuffer)
    }

    fn allocate_binding_sets(
        &self,
        descs: &[BindingSetDesc<'_>],
    ) -> Result<Vec<Arc<dyn BindingSet>>> {
        if self.fail_binding_sets.load(Ordering::SeqCst) {
            strata_bail!(ResourceUnavailable, SOURCE, "Injected binding set failure");
        }
        self.binding_batches.lock().unwrap().push(descs.len());
        Ok(descs
            .iter()
            .enumerate()
            .map(|(index, desc)| {
                let slots = desc
                    .vertex_bindings
                    .buffers
                    .keys()
                    .chain(desc.vertex_bindings.sampled_images.keys())
                    .chain(desc.fragment_bindings.buffers.keys())
                    .chain(desc.fragment_bindings.sampled_images.keys())
                    .cloned()
                    .collect();
                Arc::new(MockBindingSet { index, slots }) as Arc<dyn BindingSet>
            })
            .collect())
    }

    fn resource_allocator(&self) -> &dyn Allocator {
        &self.allocator
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
