//! Multisampled render target lifecycle
//!
//! [`MsaaTargetManager`] owns the active sample count and the offscreen
//! color/depth pair that goes with it. The pair exists exactly when the
//! active count is above 1, and is always replaced as a whole: a sample
//! count change or a resize drops the old pair before allocating the new one.
//! When that allocation fails the manager drops to a sample count of 1, so
//! the pair and the count never disagree.
//!
//! Each frame the manager hands out a [`FramePlan`] telling the renderer
//! whether to draw into the multisampled pair and resolve into the output,
//! or to draw into the output directly.

use std::fmt;

use crate::constants::ClearValues;
use crate::error::MsaaError;
use crate::negotiate::Negotiation;
use crate::sample_count::{SampleCount, SampleCounts};

/// Output size in pixels. Both dimensions are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetExtent {
    width: u32,
    height: u32,
}

impl TargetExtent {
    /// Create an extent, clamping each dimension to at least 1
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width divided by height
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Description of a target pair to allocate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetDesc<F> {
    /// Size shared by color and depth
    pub extent: TargetExtent,
    /// Sample count shared by color and depth (always above 1)
    pub sample_count: SampleCount,
    /// Color format
    pub color_format: F,
    /// Depth format
    pub depth_format: F,
    /// Optimal clear values
    pub clear: ClearValues,
}

impl<F> TargetDesc<F> {
    /// Size and sample count every texture of the pair must report
    pub fn info(&self) -> TargetInfo {
        TargetInfo {
            width: self.extent.width(),
            height: self.extent.height(),
            sample_count: self.sample_count.get(),
        }
    }
}

/// Size and sample count of an allocated texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetInfo {
    pub width: u32,
    pub height: u32,
    pub sample_count: u32,
}

impl fmt::Display for TargetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} ({}x MSAA)", self.width, self.height, self.sample_count)
    }
}

/// An allocated color/depth pair
pub trait TargetPair {
    /// Size and sample count of the color texture
    fn color_info(&self) -> TargetInfo;

    /// Size and sample count of the depth texture
    fn depth_info(&self) -> TargetInfo;
}

/// Allocates multisampled target pairs on a device
pub trait TargetAllocator {
    /// Texture format type of the device
    type Format: Copy + fmt::Debug;
    /// Allocated pair type
    type Targets: TargetPair;
    /// Allocation error
    type Error: std::error::Error + Send + Sync + 'static;

    /// Allocate a new pair matching `desc`
    fn allocate(&self, desc: &TargetDesc<Self::Format>) -> Result<Self::Targets, Self::Error>;
}

/// Rendering mode for a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Draw into the multisampled pair, then resolve into the output
    Multisampled,
    /// Draw straight into the output
    Direct,
}

/// Attachments to use for one frame
#[derive(Debug)]
pub enum FramePlan<'a, T, S: ?Sized> {
    /// Render into `targets`, resolve color into `resolve_into`. Depth is discarded.
    Multisampled { targets: &'a T, resolve_into: &'a S },
    /// Render into `surface`, no resolve
    Direct { surface: &'a S },
}

impl<'a, T, S: ?Sized> FramePlan<'a, T, S> {
    /// Mode of this plan
    pub fn mode(&self) -> RenderMode {
        match self {
            Self::Multisampled { .. } => RenderMode::Multisampled,
            Self::Direct { .. } => RenderMode::Direct,
        }
    }

    /// Surface the multisampled color gets resolved into, if any
    pub fn resolve_target(&self) -> Option<&'a S> {
        match self {
            Self::Multisampled { resolve_into, .. } => Some(*resolve_into),
            Self::Direct { .. } => None,
        }
    }

    /// Number of resolve operations the frame performs
    pub fn resolve_count(&self) -> usize {
        usize::from(self.resolve_target().is_some())
    }
}

/// Owns the active sample count and the multisampled target pair
pub struct MsaaTargetManager<T, F> {
    supported: SampleCounts,
    active: SampleCount,
    extent: TargetExtent,
    color_format: F,
    depth_format: F,
    clear: ClearValues,
    targets: Option<T>,
}

impl<T, F> MsaaTargetManager<T, F>
where
    T: TargetPair,
    F: Copy + fmt::Debug,
{
    /// Create a manager from a negotiation result and build the initial targets.
    pub fn new<A>(
        allocator: &A,
        negotiation: Negotiation,
        extent: TargetExtent,
        color_format: F,
        depth_format: F,
        clear: ClearValues,
    ) -> Result<Self, MsaaError>
    where
        A: TargetAllocator<Targets = T, Format = F>,
    {
        let mut manager = Self {
            supported: negotiation.supported,
            active: negotiation.active,
            extent,
            color_format,
            depth_format,
            clear,
            targets: None,
        };
        manager.rebuild_targets(allocator)?;
        Ok(manager)
    }

    /// Active sample count
    pub fn sample_count(&self) -> SampleCount {
        self.active
    }

    /// Counts the user may select. Always contains 1.
    pub fn selectable_counts(&self) -> SampleCounts {
        self.supported.with(SampleCount::X1)
    }

    /// Current output size
    pub fn extent(&self) -> TargetExtent {
        self.extent
    }

    /// Clear values used for the targets and the frame clear
    pub fn clear_values(&self) -> ClearValues {
        self.clear
    }

    /// Update the clear values used by the frame clear and later rebuilds
    pub fn set_clear_values(&mut self, clear: ClearValues) {
        self.clear = clear;
    }

    /// Current multisampled pair, if the active count is above 1
    pub fn targets(&self) -> Option<&T> {
        self.targets.as_ref()
    }

    /// Mode the next frame renders in
    pub fn mode(&self) -> RenderMode {
        if self.active.is_multisampled() {
            RenderMode::Multisampled
        } else {
            RenderMode::Direct
        }
    }

    /// Description of the pair for the current state
    pub fn descriptor(&self) -> TargetDesc<F> {
        TargetDesc {
            extent: self.extent,
            sample_count: self.active,
            color_format: self.color_format,
            depth_format: self.depth_format,
            clear: self.clear,
        }
    }

    /// Release the current pair and allocate a new one for the current
    /// sample count and extent. With a count of 1 nothing is allocated.
    ///
    /// On failure the active count falls back to 1 and no pair is kept.
    pub fn rebuild_targets<A>(&mut self, allocator: &A) -> Result<(), MsaaError>
    where
        A: TargetAllocator<Targets = T, Format = F>,
    {
        self.targets = None;

        if !self.active.is_multisampled() {
            tracing::debug!("Single-sample mode, no offscreen targets");
            return Ok(());
        }

        match self.allocate_checked(allocator) {
            Ok(targets) => {
                self.targets = Some(targets);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Falling back to 1x after failed {}x rebuild", self.active);
                self.active = SampleCount::X1;
                Err(e)
            }
        }
    }

    fn allocate_checked<A>(&self, allocator: &A) -> Result<T, MsaaError>
    where
        A: TargetAllocator<Targets = T, Format = F>,
    {
        let desc = self.descriptor();
        let targets = allocator
            .allocate(&desc)
            .map_err(|e| MsaaError::Allocation(Box::new(e)))?;

        let expected = desc.info();
        let color = targets.color_info();
        let depth = targets.depth_info();
        if color != expected || depth != expected {
            return Err(MsaaError::TargetMismatch {
                expected,
                color,
                depth,
            });
        }

        tracing::debug!(
            "Rebuilt multisampled targets: {} color={:?} depth={:?}",
            expected,
            self.color_format,
            self.depth_format
        );
        Ok(targets)
    }

    /// Switch to `requested` and rebuild the targets.
    ///
    /// Returns `Ok(false)` without touching anything when `requested` is
    /// already active. If the new pair cannot be built the manager is left
    /// at a count of 1 with no pair.
    pub fn set_sample_count<A>(
        &mut self,
        allocator: &A,
        requested: SampleCount,
    ) -> Result<bool, MsaaError>
    where
        A: TargetAllocator<Targets = T, Format = F>,
    {
        let selectable = self.selectable_counts();
        if !selectable.contains(requested) {
            return Err(MsaaError::UnsupportedSampleCount {
                requested,
                supported: selectable,
            });
        }
        if requested == self.active {
            return Ok(false);
        }

        tracing::info!("Sample count {} -> {}", self.active, requested);
        self.active = requested;
        self.rebuild_targets(allocator)?;
        Ok(true)
    }

    /// Record a new output size and rebuild the targets at that size.
    /// Does nothing when the size is unchanged and the targets are in place.
    pub fn resize<A>(&mut self, allocator: &A, extent: TargetExtent) -> Result<(), MsaaError>
    where
        A: TargetAllocator<Targets = T, Format = F>,
    {
        let in_place = self.targets.is_some() == self.active.is_multisampled();
        if extent == self.extent && in_place {
            return Ok(());
        }
        self.extent = extent;
        self.rebuild_targets(allocator)
    }

    /// Attachments for the next frame
    pub fn frame_plan<'a, S: ?Sized>(&'a self, surface: &'a S) -> FramePlan<'a, T, S> {
        match &self.targets {
            Some(targets) => FramePlan::Multisampled {
                targets,
                resolve_into: surface,
            },
            None => {
                debug_assert_eq!(self.mode(), RenderMode::Direct);
                FramePlan::Direct { surface }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Format {
        Rgba8,
        Depth32,
    }

    #[derive(Debug)]
    struct FakeTargets {
        id: usize,
        color: TargetInfo,
        depth: TargetInfo,
    }

    impl TargetPair for FakeTargets {
        fn color_info(&self) -> TargetInfo {
            self.color
        }

        fn depth_info(&self) -> TargetInfo {
            self.depth
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("out of memory")]
    struct OutOfMemory;

    #[derive(Default)]
    struct FakeAllocator {
        allocations: Cell<usize>,
        fail: Cell<bool>,
        descs: RefCell<Vec<TargetDesc<Format>>>,
    }

    impl TargetAllocator for FakeAllocator {
        type Format = Format;
        type Targets = FakeTargets;
        type Error = OutOfMemory;

        fn allocate(&self, desc: &TargetDesc<Format>) -> Result<FakeTargets, OutOfMemory> {
            if self.fail.get() {
                return Err(OutOfMemory);
            }
            let id = self.allocations.get();
            self.allocations.set(id + 1);
            self.descs.borrow_mut().push(*desc);
            Ok(FakeTargets {
                id,
                color: desc.info(),
                depth: desc.info(),
            })
        }
    }

    fn negotiation(bits: u32) -> Negotiation {
        let mask = SampleCounts::from_bits_truncate(bits);
        crate::negotiate_sample_count(mask, mask)
    }

    fn manager(
        allocator: &FakeAllocator,
        bits: u32,
        width: u32,
        height: u32,
    ) -> MsaaTargetManager<FakeTargets, Format> {
        MsaaTargetManager::new(
            allocator,
            negotiation(bits),
            TargetExtent::new(width, height),
            Format::Rgba8,
            Format::Depth32,
            ClearValues::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_targets_match_negotiated_count() {
        let alloc = FakeAllocator::default();
        let m = manager(&alloc, 0b1110, 800, 600);

        assert_eq!(m.sample_count(), SampleCount::X4);
        let targets = m.targets().expect("targets for 4x");
        let expected = TargetInfo {
            width: 800,
            height: 600,
            sample_count: 4,
        };
        assert_eq!(targets.color_info(), expected);
        assert_eq!(targets.depth_info(), expected);
        assert_eq!(alloc.allocations.get(), 1);

        let desc = alloc.descs.borrow()[0];
        assert_eq!(desc.color_format, Format::Rgba8);
        assert_eq!(desc.depth_format, Format::Depth32);
        assert_eq!(desc.clear.color, [0.125, 0.125, 0.125, 1.0]);
        assert_eq!(desc.clear.depth, 1.0);
        assert_eq!(desc.clear.stencil, 0);
    }

    #[test]
    fn test_single_sample_never_allocates() {
        let alloc = FakeAllocator::default();
        let mut m = manager(&alloc, 0b0001, 640, 480);

        assert_eq!(m.sample_count(), SampleCount::X1);
        assert!(m.targets().is_none());
        for _ in 0..3 {
            m.rebuild_targets(&alloc).unwrap();
            assert!(m.targets().is_none());
        }
        m.resize(&alloc, TargetExtent::new(1024, 768)).unwrap();
        assert!(m.targets().is_none());
        assert_eq!(alloc.allocations.get(), 0);
    }

    #[test]
    fn test_switch_four_to_two_replaces_pair() {
        let alloc = FakeAllocator::default();
        let mut m = manager(&alloc, 0b0111, 800, 600);
        let old_id = m.targets().unwrap().id;

        assert!(m.set_sample_count(&alloc, SampleCount::X2).unwrap());

        let targets = m.targets().unwrap();
        assert_ne!(targets.id, old_id);
        assert_eq!(targets.color_info().sample_count, 2);
        assert_eq!(targets.depth_info().sample_count, 2);
        assert_eq!(targets.color_info().width, 800);
        assert_eq!(targets.color_info().height, 600);
    }

    #[test]
    fn test_resize_keeps_sample_count() {
        let alloc = FakeAllocator::default();
        let mut m = manager(&alloc, 0b0111, 800, 600);

        m.resize(&alloc, TargetExtent::new(1920, 1080)).unwrap();

        assert_eq!(m.sample_count(), SampleCount::X4);
        let info = m.targets().unwrap().color_info();
        assert_eq!(
            info,
            TargetInfo {
                width: 1920,
                height: 1080,
                sample_count: 4
            }
        );
        assert_eq!(m.targets().unwrap().depth_info(), info);
        assert_eq!(alloc.allocations.get(), 2);
    }

    #[test]
    fn test_resize_same_extent_is_noop() {
        let alloc = FakeAllocator::default();
        let mut m = manager(&alloc, 0b0111, 800, 600);

        m.resize(&alloc, TargetExtent::new(800, 600)).unwrap();
        assert_eq!(alloc.allocations.get(), 1);
        assert_eq!(m.targets().unwrap().id, 0);
    }

    #[test]
    fn test_resize_to_zero_builds_one_by_one_pair() {
        let alloc = FakeAllocator::default();
        let mut m = manager(&alloc, 0b0111, 800, 600);

        m.resize(&alloc, TargetExtent::new(0, 0)).unwrap();

        let expected = TargetInfo {
            width: 1,
            height: 1,
            sample_count: 4,
        };
        let targets = m.targets().unwrap();
        assert_eq!(targets.color_info(), expected);
        assert_eq!(targets.depth_info(), expected);
        assert_eq!(alloc.allocations.get(), 2);
    }

    #[test]
    fn test_switch_to_one_releases_targets() {
        let alloc = FakeAllocator::default();
        let mut m = manager(&alloc, 0b0111, 800, 600);

        assert!(m.set_sample_count(&alloc, SampleCount::X1).unwrap());
        assert!(m.targets().is_none());
        assert_eq!(m.mode(), RenderMode::Direct);
    }

    #[test]
    fn test_same_count_is_noop() {
        let alloc = FakeAllocator::default();
        let mut m = manager(&alloc, 0b0111, 800, 600);

        assert!(!m.set_sample_count(&alloc, SampleCount::X4).unwrap());
        assert_eq!(alloc.allocations.get(), 1);
    }

    #[test]
    fn test_unsupported_count_rejected() {
        let alloc = FakeAllocator::default();
        let mut m = manager(&alloc, 0b0111, 800, 600);

        let err = m.set_sample_count(&alloc, SampleCount::X8).unwrap_err();
        assert!(matches!(
            err,
            MsaaError::UnsupportedSampleCount {
                requested: SampleCount::X8,
                ..
            }
        ));
        assert_eq!(m.sample_count(), SampleCount::X4);
        assert!(m.targets().is_some());
        assert_eq!(alloc.allocations.get(), 1);
    }

    #[test]
    fn test_eight_selectable_when_supported() {
        let alloc = FakeAllocator::default();
        let mut m = manager(&alloc, 0b1111, 800, 600);

        assert_eq!(m.sample_count(), SampleCount::X4);
        assert!(m.set_sample_count(&alloc, SampleCount::X8).unwrap());
        assert_eq!(m.targets().unwrap().color_info().sample_count, 8);
    }

    #[test]
    fn test_one_always_selectable() {
        let alloc = FakeAllocator::default();
        let m = manager(&alloc, 0b0100, 800, 600);
        assert!(m.selectable_counts().contains(SampleCount::X1));
        assert_eq!(m.sample_count(), SampleCount::X4);
    }

    #[test]
    fn test_allocation_failure_propagates() {
        let alloc = FakeAllocator::default();
        let mut m = manager(&alloc, 0b0111, 800, 600);

        alloc.fail.set(true);
        let err = m.resize(&alloc, TargetExtent::new(100, 100)).unwrap_err();
        assert!(matches!(err, MsaaError::Allocation(_)));
        assert!(m.targets().is_none());
        assert_eq!(m.sample_count(), SampleCount::X1);
        assert_eq!(m.mode(), RenderMode::Direct);
        assert_eq!(m.extent(), TargetExtent::new(100, 100));
    }

    #[test]
    fn test_failed_switch_falls_back_to_direct() {
        let alloc = FakeAllocator::default();
        let mut m = manager(&alloc, 0b0111, 800, 600);

        alloc.fail.set(true);
        let err = m.set_sample_count(&alloc, SampleCount::X2).unwrap_err();
        assert!(matches!(err, MsaaError::Allocation(_)));

        assert_eq!(m.sample_count(), SampleCount::X1);
        assert!(m.targets().is_none());
        let plan = m.frame_plan("surface");
        assert_eq!(plan.mode(), RenderMode::Direct);
        assert_eq!(plan.resolve_count(), 0);

        alloc.fail.set(false);
        assert!(m.set_sample_count(&alloc, SampleCount::X2).unwrap());
        assert_eq!(m.frame_plan("surface").mode(), RenderMode::Multisampled);
    }

    #[test]
    fn test_failed_resize_frame_plan_is_direct() {
        let alloc = FakeAllocator::default();
        let mut m = manager(&alloc, 0b0111, 800, 600);

        alloc.fail.set(true);
        assert!(m.resize(&alloc, TargetExtent::new(1024, 768)).is_err());

        let plan = m.frame_plan("surface");
        assert_eq!(plan.mode(), RenderMode::Direct);
        assert!(plan.resolve_target().is_none());
        assert_eq!(m.mode(), RenderMode::Direct);
    }

    #[test]
    fn test_mismatched_targets_rejected() {
        struct Skewed;

        impl TargetAllocator for Skewed {
            type Format = Format;
            type Targets = FakeTargets;
            type Error = OutOfMemory;

            fn allocate(&self, desc: &TargetDesc<Format>) -> Result<FakeTargets, OutOfMemory> {
                let mut depth = desc.info();
                depth.sample_count = 1;
                Ok(FakeTargets {
                    id: 0,
                    color: desc.info(),
                    depth,
                })
            }
        }

        let result = MsaaTargetManager::new(
            &Skewed,
            negotiation(0b0111),
            TargetExtent::new(64, 64),
            Format::Rgba8,
            Format::Depth32,
            ClearValues::default(),
        );
        assert!(matches!(result, Err(MsaaError::TargetMismatch { .. })));
    }

    #[test]
    fn test_mismatch_on_switch_falls_back_to_one() {
        struct SingleDepth;

        impl TargetAllocator for SingleDepth {
            type Format = Format;
            type Targets = FakeTargets;
            type Error = OutOfMemory;

            fn allocate(&self, desc: &TargetDesc<Format>) -> Result<FakeTargets, OutOfMemory> {
                let mut depth = desc.info();
                depth.sample_count = 1;
                Ok(FakeTargets {
                    id: 0,
                    color: desc.info(),
                    depth,
                })
            }
        }

        let alloc = FakeAllocator::default();
        let mut m = manager(&alloc, 0b0111, 800, 600);

        let err = m.set_sample_count(&SingleDepth, SampleCount::X2).unwrap_err();
        assert!(matches!(err, MsaaError::TargetMismatch { .. }));
        assert_eq!(m.sample_count(), SampleCount::X1);
        assert_eq!(m.frame_plan("surface").mode(), RenderMode::Direct);
    }

    #[test]
    fn test_frame_plan_resolves_once_when_multisampled() {
        let alloc = FakeAllocator::default();
        let mut m = manager(&alloc, 0b0111, 800, 600);
        let surface = "back buffer";

        let plan = m.frame_plan(surface);
        assert_eq!(plan.mode(), RenderMode::Multisampled);
        assert_eq!(plan.resolve_count(), 1);
        assert_eq!(plan.resolve_target(), Some("back buffer"));

        m.set_sample_count(&alloc, SampleCount::X1).unwrap();
        let plan = m.frame_plan(surface);
        assert_eq!(plan.mode(), RenderMode::Direct);
        assert_eq!(plan.resolve_count(), 0);
        assert!(plan.resolve_target().is_none());
    }

    #[test]
    fn test_extent_clamped_to_one() {
        let extent = TargetExtent::new(0, 0);
        assert_eq!(extent.width(), 1);
        assert_eq!(extent.height(), 1);
        assert_eq!(TargetExtent::new(200, 100).aspect(), 2.0);
    }
}
