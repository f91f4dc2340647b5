//! Settings window: sample count and rotation controls

use msaa_core::{RenderMode, SampleCount};

use crate::config::SharedConfig;
use crate::state::{AppAction, SharedAppState, SharedViewportState};

/// Snapshot of renderer state the window displays
struct SettingsView {
    sample_count: SampleCount,
    selectable: Vec<SampleCount>,
    multisampling_available: bool,
    rotate: bool,
    mode: RenderMode,
    format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    width: u32,
    height: u32,
}

impl SettingsView {
    fn capture(viewport_state: &SharedViewportState) -> Self {
        let state = viewport_state.lock();
        let renderer = &state.renderer;
        let extent = renderer.extent();
        Self {
            sample_count: renderer.sample_count(),
            selectable: renderer.selectable_sample_counts().iter().collect(),
            multisampling_available: renderer.multisampling_available(),
            rotate: renderer.rotate(),
            mode: renderer.mode(),
            format: renderer.format(),
            depth_format: renderer.depth_format(),
            width: extent.width(),
            height: extent.height(),
        }
    }
}

/// Warning shown when no count above 1 is usable
fn multisampling_warning(color: wgpu::TextureFormat, depth: wgpu::TextureFormat) -> String {
    format!("{color:?} + {depth:?} pair does not allow multisampling on this device")
}

/// Settings window panel
#[derive(Default)]
pub struct SettingsPanel;

impl SettingsPanel {
    /// Create a new settings panel
    pub fn new() -> Self {
        Self
    }

    /// Show the settings window
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        config: &SharedConfig,
        app_state: &SharedAppState,
        viewport_state: &Option<SharedViewportState>,
        open: &mut bool,
    ) {
        egui::Window::new("Settings")
            .open(open)
            .resizable(false)
            .default_pos([10.0, 10.0])
            .show(ctx, |ui| {
                match viewport_state {
                    Some(vp) => self.renderer_section(ui, app_state, vp),
                    None => {
                        ui.label("Rendering unavailable");
                    }
                }

                if let Some(error) = &app_state.lock().last_error {
                    ui.colored_label(egui::Color32::from_rgb(230, 90, 90), error.as_str());
                }

                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("Reset to Defaults").clicked() {
                        app_state.lock().queue_action(AppAction::ResetConfig);
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let can_save = config.read().path().is_some();
                        if ui.add_enabled(can_save, egui::Button::new("Save")).clicked() {
                            app_state.lock().queue_action(AppAction::SaveConfig);
                        }
                    });
                });
            });
    }

    fn renderer_section(
        &mut self,
        ui: &mut egui::Ui,
        app_state: &SharedAppState,
        viewport_state: &SharedViewportState,
    ) {
        let view = SettingsView::capture(viewport_state);

        let mut selected = view.sample_count;
        ui.add_enabled_ui(view.multisampling_available, |ui| {
            egui::ComboBox::from_label("Sample count")
                .selected_text(view.sample_count.to_string())
                .show_ui(ui, |ui| {
                    for count in &view.selectable {
                        ui.selectable_value(&mut selected, *count, count.to_string());
                    }
                });
        });
        if selected != view.sample_count {
            app_state
                .lock()
                .queue_action(AppAction::SetSampleCount(selected));
        }

        if !view.multisampling_available {
            ui.colored_label(
                egui::Color32::from_rgb(230, 180, 60),
                multisampling_warning(view.format, view.depth_format),
            );
        }

        let mut rotate = view.rotate;
        if ui.checkbox(&mut rotate, "Rotate grid").changed() {
            app_state.lock().queue_action(AppAction::SetRotate(rotate));
        }

        ui.separator();

        let mode = match view.mode {
            RenderMode::Multisampled => "multisampled + resolve",
            RenderMode::Direct => "direct",
        };
        ui.weak(format!("{}x{}, {}", view.width, view.height, mode));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multisampling_warning_names_both_formats() {
        let text = multisampling_warning(
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Depth32Float,
        );
        assert_eq!(
            text,
            "Bgra8Unorm + Depth32Float pair does not allow multisampling on this device"
        );
    }
}
