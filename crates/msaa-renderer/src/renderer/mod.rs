//! Main renderer.
//!
//! [`Renderer`] owns the sample count negotiation result, the multisampled
//! targets and the cube pipeline, and keeps all three consistent: a sample
//! count change rebuilds both the targets and the pipeline, a resize rebuilds
//! the targets only.

mod render_pass;

pub use render_pass::{MainPassParams, clear_color, render_main_pass};

use msaa_core::{
    ClearValues, MsaaError, MsaaTargetManager, RenderMode, SampleCount, SampleCounts,
    TargetExtent, negotiate_sample_count,
};

use crate::capabilities::{color_sample_counts, format_sample_counts};
use crate::config::RendererConfig;
use crate::constants::depth::DEPTH_FORMAT;
use crate::cube::CubeRenderer;
use crate::scene::{SceneAnimation, view_projection};
use crate::targets::{GpuTargetAllocator, MsaaTargets, PresentationSurface};

/// Main renderer
pub struct Renderer {
    targets: MsaaTargetManager<MsaaTargets, wgpu::TextureFormat>,
    cube_renderer: CubeRenderer,
    animation: SceneAnimation,
    negotiated: SampleCount,
    format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
}

impl Renderer {
    /// Create a new renderer.
    ///
    /// Negotiates the sample count for `format` and the depth format, then
    /// applies the configured preferred count if the device supports it.
    pub fn new(
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: &RendererConfig,
    ) -> Result<Self, MsaaError> {
        let depth_format = DEPTH_FORMAT;

        let negotiation = negotiate_sample_count(
            color_sample_counts(adapter, device, format),
            format_sample_counts(adapter, device, depth_format),
        );

        let allocator = GpuTargetAllocator::new(device);
        let targets = MsaaTargetManager::new(
            &allocator,
            negotiation,
            TargetExtent::new(width, height),
            format,
            depth_format,
            ClearValues::with_color(config.viewport.background_color),
        )?;

        let cube_renderer = CubeRenderer::new(
            device,
            queue,
            format,
            depth_format,
            targets.sample_count(),
            &config.scene,
        );

        let mut renderer = Self {
            negotiated: targets.sample_count(),
            targets,
            cube_renderer,
            animation: SceneAnimation::new(&config.scene),
            format,
            depth_format,
        };

        if let Some(preferred) = config.viewport.msaa_sample_count {
            renderer.apply_preferred_sample_count(device, preferred)?;
        }

        tracing::info!(
            ?format,
            sample_count = %renderer.sample_count(),
            selectable = %renderer.selectable_sample_counts(),
            "Renderer initialized"
        );

        Ok(renderer)
    }

    fn apply_preferred_sample_count(
        &mut self,
        device: &wgpu::Device,
        preferred: u32,
    ) -> Result<(), MsaaError> {
        let count = match SampleCount::try_from(preferred) {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("Ignoring configured sample count: {}", e);
                return Ok(());
            }
        };

        match self.set_sample_count(device, count) {
            Ok(_) => Ok(()),
            Err(MsaaError::UnsupportedSampleCount { requested, supported }) => {
                tracing::warn!(
                    "Configured sample count {} not supported (selectable: {}), keeping {}",
                    requested,
                    supported,
                    self.sample_count()
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Active sample count
    pub fn sample_count(&self) -> SampleCount {
        self.targets.sample_count()
    }

    /// Sample counts the user may switch to
    pub fn selectable_sample_counts(&self) -> SampleCounts {
        self.targets.selectable_counts()
    }

    /// Whether any count above 1 is available
    pub fn multisampling_available(&self) -> bool {
        self.selectable_sample_counts().iter().any(SampleCount::is_multisampled)
    }

    /// Mode the next frame renders in
    pub fn mode(&self) -> RenderMode {
        self.targets.mode()
    }

    /// Switch to a new sample count.
    ///
    /// Rebuilds the multisampled targets and the cube pipeline. Returns
    /// `Ok(false)` without touching anything if `count` is already active.
    pub fn set_sample_count(
        &mut self,
        device: &wgpu::Device,
        count: SampleCount,
    ) -> Result<bool, MsaaError> {
        let allocator = GpuTargetAllocator::new(device);
        let result = self.targets.set_sample_count(&allocator, count);
        self.sync_pipeline(device);
        let changed = result?;
        if changed {
            tracing::info!(%count, "Sample count changed");
        }
        Ok(changed)
    }

    /// Resize the multisampled targets to match the output
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) -> Result<(), MsaaError> {
        let allocator = GpuTargetAllocator::new(device);
        let result = self.targets.resize(&allocator, TargetExtent::new(width, height));
        self.sync_pipeline(device);
        result
    }

    /// Match the pipeline to the target manager's count, which drops to 1
    /// after a failed rebuild
    fn sync_pipeline(&mut self, device: &wgpu::Device) {
        let active = self.targets.sample_count();
        if self.cube_renderer.sample_count() != active {
            self.cube_renderer.rebuild_pipeline(device, active);
        }
    }

    /// Current output size
    pub fn extent(&self) -> TargetExtent {
        self.targets.extent()
    }

    /// Output color format
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Depth format
    pub fn depth_format(&self) -> wgpu::TextureFormat {
        self.depth_format
    }

    /// Whether the grid rotates
    pub fn rotate(&self) -> bool {
        self.animation.rotate
    }

    /// Enable or disable grid rotation
    pub fn set_rotate(&mut self, rotate: bool) {
        self.animation.rotate = rotate;
    }

    /// Apply runtime-adjustable settings.
    ///
    /// Updates background and rotation, then switches to the preferred
    /// sample count, or back to the negotiated one when none is set.
    pub fn apply_config(
        &mut self,
        device: &wgpu::Device,
        config: &RendererConfig,
    ) -> Result<(), MsaaError> {
        self.targets
            .set_clear_values(ClearValues::with_color(config.viewport.background_color));
        self.animation.rotate = config.scene.rotate;
        self.animation.rotation_speed = config.scene.rotation_speed;

        match config.viewport.msaa_sample_count {
            Some(preferred) => self.apply_preferred_sample_count(device, preferred),
            None => self.set_sample_count(device, self.negotiated).map(|_| ()),
        }
    }

    /// Advance the animation by `dt` seconds and upload the scene matrices
    pub fn update(&mut self, queue: &wgpu::Queue, dt: f32) {
        self.animation.advance(dt);
        let view_proj = view_projection(self.targets.extent(), self.animation.world());
        self.cube_renderer.update_scene(queue, view_proj);
    }

    /// Record the frame into `encoder`
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, surface: &PresentationSurface<'_>) {
        let params = MainPassParams {
            plan: self.targets.frame_plan(surface),
            clear: self.targets.clear_values(),
            depth_format: self.depth_format,
            cube_renderer: &self.cube_renderer,
        };
        render_main_pass(encoder, &params);
    }
}
