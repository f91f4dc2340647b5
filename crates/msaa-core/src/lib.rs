//! MSAA core
//!
//! GPU-independent logic for multisample anti-aliasing: which sample count
//! to render with, and keeping the offscreen multisampled targets consistent
//! with that choice and with the output size.
//!
//! # Module Structure
//!
//! ```text
//! msaa-core/
//! ├── sample_count.rs  # SampleCount / SampleCounts bitmask
//! ├── negotiate.rs     # Capability negotiation (4 > 2 > 1)
//! ├── targets.rs       # Target manager, allocator trait, frame plan
//! ├── constants.rs     # Clear values
//! └── error.rs         # Error types
//! ```
//!
//! The actual texture allocation lives behind [`TargetAllocator`], which the
//! renderer implements over a GPU device.

pub mod constants;
pub mod error;
pub mod negotiate;
pub mod sample_count;
pub mod targets;

pub use constants::ClearValues;
pub use error::MsaaError;
pub use negotiate::{Negotiation, negotiate_sample_count};
pub use sample_count::{SampleCount, SampleCounts};
pub use targets::{
    FramePlan, MsaaTargetManager, RenderMode, TargetAllocator, TargetDesc, TargetExtent,
    TargetInfo, TargetPair,
};
