//! UI panels

mod settings;
mod viewport;

pub use settings::SettingsPanel;
pub use viewport::ViewportPanel;
