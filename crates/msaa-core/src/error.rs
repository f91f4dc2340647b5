//! Error types

use crate::sample_count::{SampleCount, SampleCounts};
use crate::targets::TargetInfo;

/// Errors raised while selecting sample counts or (re)building targets
#[derive(Debug, thiserror::Error)]
pub enum MsaaError {
    #[error("Invalid sample count: {0} (expected 1, 2, 4 or 8)")]
    InvalidSampleCount(u32),
    #[error("Sample count {requested} is not supported on this device (supported: {supported})")]
    UnsupportedSampleCount {
        requested: SampleCount,
        supported: SampleCounts,
    },
    #[error("Failed to allocate multisampled targets: {0}")]
    Allocation(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error(
        "Allocated targets do not match their description: expected {expected}, got color {color} and depth {depth}"
    )]
    TargetMismatch {
        expected: TargetInfo,
        color: TargetInfo,
        depth: TargetInfo,
    },
}
