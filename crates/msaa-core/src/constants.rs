//! Clear values shared by the multisampled targets and the per-frame clear

/// Neutral gray background (RGBA)
pub const CLEAR_COLOR: [f32; 4] = [0.125, 0.125, 0.125, 1.0];

/// Depth clear value (far plane)
pub const CLEAR_DEPTH: f32 = 1.0;

/// Stencil clear value
pub const CLEAR_STENCIL: u32 = 0;

/// Optimal clear values for a color/depth target pair.
///
/// Used both when describing the textures and when clearing them at the
/// start of every frame, so the two never drift apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearValues {
    /// Color clear value (RGBA)
    pub color: [f32; 4],
    /// Depth clear value
    pub depth: f32,
    /// Stencil clear value
    pub stencil: u32,
}

impl Default for ClearValues {
    fn default() -> Self {
        Self {
            color: CLEAR_COLOR,
            depth: CLEAR_DEPTH,
            stencil: CLEAR_STENCIL,
        }
    }
}

impl ClearValues {
    /// Clear values with a custom background color
    pub fn with_color(color: [f32; 4]) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}
