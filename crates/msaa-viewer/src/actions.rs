//! Action dispatch
//!
//! Applies queued [`AppAction`]s to the viewport and the configuration.

use crate::config::SharedConfig;
use crate::state::{AppAction, SharedAppState, SharedViewportState};

use msaa_core::MsaaError;

/// Everything an action may touch
pub struct ActionContext<'a> {
    pub app_state: &'a SharedAppState,
    pub viewport_state: &'a Option<SharedViewportState>,
    pub config: &'a SharedConfig,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        app_state: &'a SharedAppState,
        viewport_state: &'a Option<SharedViewportState>,
        config: &'a SharedConfig,
    ) -> Self {
        Self {
            app_state,
            viewport_state,
            config,
        }
    }
}

/// Apply one action.
///
/// Errors returned here leave the renderer without valid targets and must be
/// treated as fatal by the caller.
pub fn dispatch_action(action: AppAction, ctx: &ActionContext<'_>) -> Result<(), MsaaError> {
    match action {
        AppAction::SetSampleCount(count) => {
            let Some(vp) = ctx.viewport_state else {
                return Ok(());
            };
            match vp.lock().set_sample_count(count) {
                Ok(_) => {
                    ctx.config
                        .write()
                        .config_mut()
                        .renderer
                        .viewport
                        .msaa_sample_count = Some(count.get());
                }
                Err(e @ MsaaError::UnsupportedSampleCount { .. }) => {
                    tracing::warn!("{}", e);
                    ctx.app_state.lock().last_error = Some(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }
        AppAction::SetRotate(rotate) => {
            if let Some(vp) = ctx.viewport_state {
                vp.lock().renderer.set_rotate(rotate);
            }
            ctx.config.write().config_mut().renderer.scene.rotate = rotate;
        }
        AppAction::SaveConfig => {
            if let Err(e) = ctx.config.read().save() {
                tracing::error!("Failed to save config: {}", e);
                ctx.app_state.lock().last_error = Some(e.to_string());
            }
        }
        AppAction::ResetConfig => {
            ctx.config.write().reset_to_defaults();
            if let Some(vp) = ctx.viewport_state {
                let renderer_config = ctx.config.read().config().renderer.clone();
                let mut vp = vp.lock();
                let device = vp.device.clone();
                vp.renderer.apply_config(&device, &renderer_config)?;
            }
            ctx.app_state.lock().last_error = None;
        }
    }
    Ok(())
}
