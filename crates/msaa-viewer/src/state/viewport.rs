//! Viewport rendering state

use std::sync::Arc;

use parking_lot::Mutex;

use msaa_core::{MsaaError, SampleCount};
use msaa_renderer::targets::create_depth_texture;
use msaa_renderer::{PresentationSurface, Renderer, RendererConfig};

/// Single-sample texture the frame ends up in, shown by egui
struct RenderTexture {
    #[allow(dead_code)]
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    #[allow(dead_code)]
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    egui_texture_id: egui::TextureId,
    width: u32,
    height: u32,
}

/// Viewport rendering state
pub struct ViewportState {
    pub renderer: Renderer,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    render_texture: Option<RenderTexture>,
}

impl ViewportState {
    /// Create a new viewport state
    pub fn new(
        adapter: &wgpu::Adapter,
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        format: wgpu::TextureFormat,
        config: &RendererConfig,
    ) -> Result<Self, MsaaError> {
        let renderer = Renderer::new(adapter, &device, &queue, format, 800, 600, config)?;
        Ok(Self {
            renderer,
            device,
            queue,
            render_texture: None,
        })
    }

    /// Ensure the output texture matches the requested size.
    ///
    /// A size change also resizes the multisampled targets.
    pub fn ensure_texture(
        &mut self,
        width: u32,
        height: u32,
        egui_renderer: &mut egui_wgpu::Renderer,
    ) -> Result<egui::TextureId, MsaaError> {
        let width = width.max(1);
        let height = height.max(1);

        if let Some(rt) = &self.render_texture
            && rt.width == width
            && rt.height == height
        {
            return Ok(rt.egui_texture_id);
        }

        self.renderer.resize(&self.device, width, height)?;

        // Free old texture if exists
        if let Some(old) = self.render_texture.take() {
            egui_renderer.free_texture(&old.egui_texture_id);
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Viewport Render Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.renderer.format(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let (depth_texture, depth_view) =
            create_depth_texture(&self.device, width, height, self.renderer.depth_format());

        let egui_texture_id =
            egui_renderer.register_native_texture(&self.device, &view, wgpu::FilterMode::Linear);

        self.render_texture = Some(RenderTexture {
            texture,
            view,
            depth_texture,
            depth_view,
            egui_texture_id,
            width,
            height,
        });

        Ok(egui_texture_id)
    }

    /// Switch sample count. Applied between frames.
    pub fn set_sample_count(&mut self, count: SampleCount) -> Result<bool, MsaaError> {
        self.renderer.set_sample_count(&self.device, count)
    }

    /// Advance the animation by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.renderer.update(&self.queue, dt);
    }

    /// Render the scene into the output texture
    pub fn render(&mut self) {
        let Some(ref rt) = self.render_texture else {
            return;
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Viewport Render Encoder"),
            });

        let surface = PresentationSurface {
            color: &rt.view,
            depth: &rt.depth_view,
        };
        self.renderer.render(&mut encoder, &surface);

        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

/// Shared viewport state
pub type SharedViewportState = Arc<Mutex<ViewportState>>;
