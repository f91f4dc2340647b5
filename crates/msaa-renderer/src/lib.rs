//! MSAA Viewer Renderer
//!
//! WGPU-based rendering of an instanced textured cube grid through an
//! optional multisampled offscreen target.
//!
//! # Architecture
//!
//! - [`capabilities`] - Per-format sample count queries
//! - [`targets`] - GPU allocation of multisampled color/depth pairs
//! - [`cube`] - Cube geometry, texture and pipeline
//! - [`scene`] - Rotation animation and camera matrices
//! - [`renderer`] - Main [`Renderer`] tying it together
//!
//! Sample count negotiation and target lifecycle rules come from
//! [`msaa_core`]; this crate only supplies the wgpu side.
//!
//! # Module Structure
//!
//! ```text
//! msaa-renderer/
//! ├── capabilities.rs  # Format feature flags -> SampleCounts
//! ├── config.rs        # Serializable renderer settings
//! ├── constants.rs     # Formats, camera and grid defaults
//! ├── cube.rs          # Cube mesh, checker texture, pipeline
//! ├── scene.rs         # Animation state, view/projection
//! ├── targets.rs       # GpuTargetAllocator, MsaaTargets
//! └── renderer/        # Renderer and render pass execution
//! ```

pub mod capabilities;
pub mod config;
pub mod constants;
pub mod cube;
pub mod renderer;
pub mod scene;
pub mod targets;

pub use config::RendererConfig;
pub use renderer::Renderer;
pub use scene::SceneAnimation;
pub use targets::{GpuTargetAllocator, MsaaTargets, PresentationSurface, TargetError};

pub use msaa_core::{MsaaError, RenderMode, SampleCount, SampleCounts};
