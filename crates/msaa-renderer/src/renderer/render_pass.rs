//! Render pass execution.
//!
//! The multisampled path resolves color into the output as part of the pass
//! through `resolve_target`; the multisampled depth is never stored.

use msaa_core::{ClearValues, FramePlan};

use crate::cube::CubeRenderer;
use crate::targets::{MsaaTargets, PresentationSurface};

/// Main pass parameters.
pub struct MainPassParams<'a> {
    /// Attachments for this frame.
    pub plan: FramePlan<'a, MsaaTargets, PresentationSurface<'a>>,
    /// Clear values for color, depth and stencil.
    pub clear: ClearValues,
    /// Depth format, used to decide whether a stencil clear applies.
    pub depth_format: wgpu::TextureFormat,
    /// Cube renderer.
    pub cube_renderer: &'a CubeRenderer,
}

/// Convert an RGBA clear color into a wgpu color
pub fn clear_color(color: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: f64::from(color[0]),
        g: f64::from(color[1]),
        b: f64::from(color[2]),
        a: f64::from(color[3]),
    }
}

/// Execute the main render pass.
pub fn render_main_pass(encoder: &mut wgpu::CommandEncoder, params: &MainPassParams<'_>) {
    let color_ops = wgpu::Operations {
        load: wgpu::LoadOp::Clear(clear_color(params.clear.color)),
        store: wgpu::StoreOp::Store,
    };

    let (color_attachment, depth_view) = match params.plan {
        // Render to multisample texture, resolve to output
        FramePlan::Multisampled {
            targets,
            resolve_into,
        } => (
            wgpu::RenderPassColorAttachment {
                view: targets.color_view(),
                resolve_target: Some(resolve_into.color),
                ops: color_ops,
            },
            targets.depth_view(),
        ),
        // Render directly to output
        FramePlan::Direct { surface } => (
            wgpu::RenderPassColorAttachment {
                view: surface.color,
                resolve_target: None,
                ops: color_ops,
            },
            surface.depth,
        ),
    };

    let stencil_ops = params
        .depth_format
        .has_stencil_aspect()
        .then_some(wgpu::Operations {
            load: wgpu::LoadOp::Clear(params.clear.stencil),
            store: wgpu::StoreOp::Discard,
        });

    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Main Render Pass"),
        color_attachments: &[Some(color_attachment)],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: depth_view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(params.clear.depth),
                store: wgpu::StoreOp::Discard,
            }),
            stencil_ops,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    params.cube_renderer.render(&mut render_pass);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_color() {
        let color = clear_color([0.125, 0.25, 0.5, 1.0]);
        assert_eq!(color.r, 0.125);
        assert_eq!(color.g, 0.25);
        assert_eq!(color.b, 0.5);
        assert_eq!(color.a, 1.0);
    }
}
