//! Sample count negotiation between a color and a depth format

use crate::sample_count::{SampleCount, SampleCounts};

/// Result of negotiating a sample count for a color/depth format pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Negotiation {
    /// Counts supported by both formats
    pub supported: SampleCounts,
    /// Count selected for rendering
    pub active: SampleCount,
}

impl Negotiation {
    /// Whether the format pair allows any multisampling the policy would pick
    pub fn multisampling_available(&self) -> bool {
        self.active.is_multisampled()
    }
}

/// Pick the sample count to render with.
///
/// Prefers 4, then 2, then falls back to 1. 8 is never picked here even when
/// both formats support it; it stays available for manual selection.
pub fn negotiate_sample_count(color: SampleCounts, depth: SampleCounts) -> Negotiation {
    let supported = color & depth;

    let active = if supported.contains(SampleCount::X4) {
        SampleCount::X4
    } else if supported.contains(SampleCount::X2) {
        SampleCount::X2
    } else {
        tracing::warn!(
            color = %color,
            depth = %depth,
            "Color + depth format pair does not allow multisampling on this device"
        );
        SampleCount::X1
    };

    tracing::debug!(%supported, %active, "Negotiated sample count");

    Negotiation { supported, active }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tracing_subscriber::layer::{Context, SubscriberExt};

    use super::*;

    /// Counts WARN events emitted while it is installed
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn negotiate_counting_warnings(color: u32, depth: u32) -> (Negotiation, usize) {
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));
        let result = tracing::subscriber::with_default(subscriber, || {
            negotiate_sample_count(
                SampleCounts::from_bits_truncate(color),
                SampleCounts::from_bits_truncate(depth),
            )
        });
        (result, warnings.load(Ordering::SeqCst))
    }

    #[test]
    fn test_prefers_four_over_eight() {
        let (result, warnings) = negotiate_counting_warnings(0b1110, 0b1110);
        assert_eq!(result.active, SampleCount::X4);
        assert_eq!(result.supported.bits(), 0b1110);
        assert_eq!(warnings, 0);
    }

    #[test]
    fn test_single_sample_only_warns() {
        let (result, warnings) = negotiate_counting_warnings(0b0001, 0b0001);
        assert_eq!(result.active, SampleCount::X1);
        assert!(!result.multisampling_available());
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_eight_only_falls_back_to_one() {
        let (result, warnings) = negotiate_counting_warnings(0b1001, 0b1001);
        assert_eq!(result.active, SampleCount::X1);
        assert!(result.supported.contains(SampleCount::X8));
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_uses_intersection_of_formats() {
        // Color supports 4, depth only 2
        let (result, _) = negotiate_counting_warnings(0b0101, 0b0011);
        assert_eq!(result.active, SampleCount::X1);

        let (result, _) = negotiate_counting_warnings(0b0111, 0b0011);
        assert_eq!(result.active, SampleCount::X2);
    }

    #[test]
    fn test_policy_over_all_masks() {
        for color in 0..16u32 {
            for depth in 0..16u32 {
                let (result, warnings) = negotiate_counting_warnings(color, depth);
                let both = color & depth;
                let expected = if both & 4 != 0 {
                    SampleCount::X4
                } else if both & 2 != 0 {
                    SampleCount::X2
                } else {
                    SampleCount::X1
                };
                assert_eq!(result.active, expected, "color={color:#b} depth={depth:#b}");
                assert_eq!(result.supported.bits() as u32, both);
                assert_eq!(warnings, usize::from(expected == SampleCount::X1));
                if expected != SampleCount::X1 {
                    assert!(result.supported.contains(result.active));
                }
            }
        }
    }
}
