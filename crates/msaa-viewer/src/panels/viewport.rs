//! Cube grid viewport panel

use msaa_core::MsaaError;

use crate::state::SharedViewportState;

/// Viewport panel
#[derive(Default)]
pub struct ViewportPanel;

impl ViewportPanel {
    pub fn new() -> Self {
        Self
    }

    /// Fallback when no render context
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        let available_size = ui.available_size();
        let (response, painter) = ui.allocate_painter(available_size, egui::Sense::hover());

        painter.rect_filled(response.rect, 0.0, egui::Color32::from_rgb(30, 30, 30));
        painter.text(
            response.rect.center(),
            egui::Align2::CENTER_CENTER,
            "Viewport\n(wgpu not available)",
            egui::FontId::proportional(16.0),
            egui::Color32::GRAY,
        );
    }

    /// Render the scene for this frame and show it
    pub fn ui_with_render_context(
        &mut self,
        ui: &mut egui::Ui,
        render_state: &egui_wgpu::RenderState,
        viewport_state: &SharedViewportState,
        dt: f32,
    ) -> Result<(), MsaaError> {
        let available_size = ui.available_size();
        let width = available_size.x as u32;
        let height = available_size.y as u32;

        if width == 0 || height == 0 {
            return Ok(());
        }

        let texture_id = {
            let mut state = viewport_state.lock();
            let mut egui_renderer = render_state.renderer.write();
            let tex_id = state.ensure_texture(width, height, &mut egui_renderer)?;
            state.update(dt);
            state.render();
            tex_id
        };

        ui.add(egui::Image::new(egui::load::SizedTexture::new(
            texture_id,
            [available_size.x, available_size.y],
        )));

        Ok(())
    }
}
