//! Application state module

mod viewport;

pub use viewport::{SharedViewportState, ViewportState};

use std::sync::Arc;

use parking_lot::Mutex;

use msaa_core::SampleCount;

/// Actions queued by the UI and applied at the start of the next frame
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Switch the active sample count
    SetSampleCount(SampleCount),
    /// Enable or disable grid rotation
    SetRotate(bool),
    /// Write the current settings to disk
    SaveConfig,
    /// Restore default settings
    ResetConfig,
}

/// Application state
#[derive(Debug, Default)]
pub struct AppState {
    /// Pending actions
    pending_actions: Vec<AppAction>,
    /// Last error to show in the UI
    pub last_error: Option<String>,
}

impl AppState {
    /// Create a new app state
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an action
    pub fn queue_action(&mut self, action: AppAction) {
        self.pending_actions.push(action);
    }

    /// Take all pending actions in the order they were queued
    pub fn take_pending_actions(&mut self) -> Vec<AppAction> {
        std::mem::take(&mut self.pending_actions)
    }

    /// Whether any actions are pending
    pub fn has_pending_actions(&self) -> bool {
        !self.pending_actions.is_empty()
    }
}

/// Shared application state
pub type SharedAppState = Arc<Mutex<AppState>>;

/// Create a shared app state
pub fn create_shared_state() -> SharedAppState {
    Arc::new(Mutex::new(AppState::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_drain_in_order() {
        let mut state = AppState::new();
        state.queue_action(AppAction::SetSampleCount(SampleCount::X2));
        state.queue_action(AppAction::SetRotate(false));
        assert!(state.has_pending_actions());

        let actions = state.take_pending_actions();
        assert_eq!(
            actions,
            vec![
                AppAction::SetSampleCount(SampleCount::X2),
                AppAction::SetRotate(false)
            ]
        );
        assert!(!state.has_pending_actions());
        assert!(state.take_pending_actions().is_empty());
    }
}
