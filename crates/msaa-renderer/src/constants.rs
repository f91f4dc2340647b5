//! Renderer constants

/// Depth buffer constants
pub mod depth {
    /// Depth format used for both the multisampled and the output depth buffer
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
}

/// Camera constants
pub mod camera {
    /// Vertical field of view (radians)
    pub const FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
    /// Near clipping plane
    pub const NEAR_PLANE: f32 = 0.1;
    /// Far clipping plane
    pub const FAR_PLANE: f32 = 100.0;
    /// Distance from the camera to the grid center
    pub const DISTANCE: f32 = 30.0;
}

/// Cube grid constants
pub mod grid {
    /// Cubes per row and column
    pub const GRID_SIZE: u32 = 7;
    /// Largest grid size accepted from a config file
    pub const MAX_GRID_SIZE: u32 = 64;
    /// Distance between neighbouring cube centers
    pub const SPACING: f32 = 3.0;
    /// Cube edge length
    pub const CUBE_SIZE: f32 = 2.0;
    /// Grid rotation speed (radians per second)
    pub const ROTATION_SPEED: f32 = 0.1;
}

/// Cube texture constants
pub mod texture {
    /// Texture width and height in texels
    pub const SIZE: u32 = 256;
    /// Checker cells per side
    pub const CELLS: u32 = 8;
    /// Light checker color (RGBA8)
    pub const LIGHT: [u8; 4] = [230, 230, 230, 255];
    /// Dark checker color (RGBA8)
    pub const DARK: [u8; 4] = [40, 110, 200, 255];
}
