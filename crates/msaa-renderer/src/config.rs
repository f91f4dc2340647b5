//! Renderer configuration structures
//!
//! This module provides configurable settings for the renderer that can be
//! serialized and loaded from configuration files.

use serde::{Deserialize, Serialize};

use crate::constants::grid;

/// Viewport rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    /// Background clear color (RGBA)
    pub background_color: [f32; 4],
    /// Preferred MSAA sample count (1, 2, 4, 8). `None` uses the negotiated count.
    pub msaa_sample_count: Option<u32>,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            background_color: msaa_core::constants::CLEAR_COLOR,
            msaa_sample_count: None,
        }
    }
}

/// Cube grid configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Whether the grid rotates
    pub rotate: bool,
    /// Rotation speed (radians per second)
    pub rotation_speed: f32,
    /// Cubes per row and column
    pub grid_size: u32,
    /// Distance between cube centers
    pub grid_spacing: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            rotate: true,
            rotation_speed: grid::ROTATION_SPEED,
            grid_size: grid::GRID_SIZE,
            grid_spacing: grid::SPACING,
        }
    }
}

impl SceneConfig {
    /// Grid size limited to `1..=MAX_GRID_SIZE`
    pub fn clamped_grid_size(&self) -> u32 {
        self.grid_size.clamp(1, grid::MAX_GRID_SIZE)
    }
}

/// Complete renderer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RendererConfig {
    /// Viewport settings
    #[serde(default)]
    pub viewport: ViewportConfig,
    /// Scene settings
    #[serde(default)]
    pub scene: SceneConfig,
}

impl RendererConfig {
    /// Create a new renderer configuration with default values
    pub fn new() -> Self {
        Self::default()
    }
}
