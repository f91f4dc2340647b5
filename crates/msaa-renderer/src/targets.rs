//! GPU render targets
//!
//! [`GpuTargetAllocator`] creates the multisampled color/depth pairs that
//! [`msaa_core::MsaaTargetManager`] asks for. [`PresentationSurface`] is the
//! single-sample output a frame ends up in.

use msaa_core::{TargetAllocator, TargetDesc, TargetInfo, TargetPair};

/// Target allocation errors
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// Requested size is above the device texture limit
    #[error("target size {width}x{height} exceeds device limit {max}")]
    ExceedsLimit {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// `max_texture_dimension_2d` of the device
        max: u32,
    },
}

/// Multisampled color and depth textures with their views
pub struct MsaaTargets {
    color_texture: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
}

impl MsaaTargets {
    /// Multisampled color view
    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    /// Multisampled depth view
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }
}

impl TargetPair for MsaaTargets {
    fn color_info(&self) -> TargetInfo {
        texture_info(&self.color_texture)
    }

    fn depth_info(&self) -> TargetInfo {
        texture_info(&self.depth_texture)
    }
}

fn texture_info(texture: &wgpu::Texture) -> TargetInfo {
    TargetInfo {
        width: texture.width(),
        height: texture.height(),
        sample_count: texture.sample_count(),
    }
}

/// Allocates [`MsaaTargets`] on a wgpu device
pub struct GpuTargetAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> GpuTargetAllocator<'a> {
    /// Create an allocator for `device`
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }
}

impl TargetAllocator for GpuTargetAllocator<'_> {
    type Format = wgpu::TextureFormat;
    type Targets = MsaaTargets;
    type Error = TargetError;

    fn allocate(&self, desc: &TargetDesc<wgpu::TextureFormat>) -> Result<MsaaTargets, TargetError> {
        let width = desc.extent.width();
        let height = desc.extent.height();
        let max = self.device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            return Err(TargetError::ExceedsLimit { width, height, max });
        }

        let sample_count = desc.sample_count.get();
        let color_texture = create_texture(
            self.device,
            "MSAA Color Texture",
            width,
            height,
            sample_count,
            desc.color_format,
        );
        let depth_texture = create_texture(
            self.device,
            "MSAA Depth Texture",
            width,
            height,
            sample_count,
            desc.depth_format,
        );

        let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        tracing::debug!(width, height, sample_count, "Allocated MSAA targets");

        Ok(MsaaTargets {
            color_texture,
            color_view,
            depth_texture,
            depth_view,
        })
    }
}

fn create_texture(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    sample_count: u32,
    format: wgpu::TextureFormat,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    })
}

/// Create a single-sample depth texture for direct rendering into the output
pub fn create_depth_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Output Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// Single-sample output a frame is rendered or resolved into
#[derive(Clone, Copy)]
pub struct PresentationSurface<'a> {
    /// Output color view. Must match the renderer's color format.
    pub color: &'a wgpu::TextureView,
    /// Depth view used when rendering directly
    pub depth: &'a wgpu::TextureView,
}
