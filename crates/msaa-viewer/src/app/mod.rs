//! Main application module

use std::sync::Arc;

use parking_lot::Mutex;

use msaa_core::MsaaError;

use crate::actions::{ActionContext, dispatch_action};
use crate::config::{SharedConfig, create_shared_config};
use crate::panels::{SettingsPanel, ViewportPanel};
use crate::state::{SharedAppState, SharedViewportState, ViewportState, create_shared_state};

/// Longest frame step fed to the animation (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// Main application
pub struct MsaaViewerApp {
    config: SharedConfig,
    app_state: SharedAppState,
    viewport_state: Option<SharedViewportState>,
    settings_panel: SettingsPanel,
    viewport_panel: ViewportPanel,
    /// Set once a target rebuild failed; the app closes on the next frame
    fatal: bool,
}

impl MsaaViewerApp {
    /// Create a new app
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self, MsaaError> {
        let config = create_shared_config();

        // Create viewport state if WGPU is available
        let viewport_state = match cc.wgpu_render_state.as_ref() {
            Some(render_state) => {
                let renderer_config = config.read().config().renderer.clone();
                let state = ViewportState::new(
                    &render_state.adapter,
                    render_state.device.clone(),
                    render_state.queue.clone(),
                    render_state.target_format,
                    &renderer_config,
                )?;
                Some(Arc::new(Mutex::new(state)))
            }
            None => {
                tracing::warn!("wgpu render state unavailable, viewport disabled");
                None
            }
        };

        Ok(Self {
            config,
            app_state: create_shared_state(),
            viewport_state,
            settings_panel: SettingsPanel::new(),
            viewport_panel: ViewportPanel::new(),
            fatal: false,
        })
    }

    /// Process pending actions
    fn process_actions(&mut self) {
        let actions = self.app_state.lock().take_pending_actions();
        let ctx = ActionContext::new(&self.app_state, &self.viewport_state, &self.config);

        let result = actions
            .into_iter()
            .try_for_each(|action| dispatch_action(action, &ctx));

        if let Err(e) = result {
            self.report_fatal(e);
        }
    }

    fn report_fatal(&mut self, error: MsaaError) {
        tracing::error!("Render target rebuild failed: {}", error);
        self.fatal = true;
    }
}

impl eframe::App for MsaaViewerApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        if self.fatal {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        // Sample count and settings changes happen between frames
        self.process_actions();
        if self.fatal {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        let mut show_settings = self.config.read().config().ui.show_settings;

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.toggle_value(&mut show_settings, "Settings");
            });
        });

        self.settings_panel.show(
            ctx,
            &self.config,
            &self.app_state,
            &self.viewport_state,
            &mut show_settings,
        );

        if show_settings != self.config.read().config().ui.show_settings {
            self.config.write().config_mut().ui.show_settings = show_settings;
        }

        let dt = ctx.input(|i| i.stable_dt).min(MAX_FRAME_DT);
        let render_state = frame.wgpu_render_state();

        let mut result = Ok(());
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| match (render_state, &self.viewport_state) {
                (Some(render_state), Some(viewport_state)) => {
                    result = self.viewport_panel.ui_with_render_context(
                        ui,
                        render_state,
                        viewport_state,
                        dt,
                    );
                }
                _ => self.viewport_panel.ui(ui),
            });

        if let Err(e) = result {
            self.report_fatal(e);
        }

        ctx.request_repaint();
    }
}
