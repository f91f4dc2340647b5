//! MSAA Viewer Frontend
//!
//! egui-based application showing a rotating cube grid rendered with a
//! selectable multisample count.

pub mod actions;
pub mod app;
pub mod config;
pub mod panels;
pub mod state;

// Re-exports for convenience
pub use app::MsaaViewerApp;
pub use config::{AppConfig, ConfigManager, SharedConfig};
pub use state::{AppAction, AppState, SharedAppState};
