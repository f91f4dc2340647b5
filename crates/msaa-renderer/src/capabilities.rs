//! Per-format sample count capabilities

use msaa_core::{SampleCount, SampleCounts};

/// Sample counts in {1, 2, 4, 8} allowed by a set of format feature flags
pub fn sample_counts_from_flags(flags: wgpu::TextureFormatFeatureFlags) -> SampleCounts {
    SampleCount::ALL
        .into_iter()
        .filter(|count| flags.sample_count_supported(count.get()))
        .collect()
}

/// Sample counts a color format can render at and resolve from. Without
/// `MULTISAMPLE_RESOLVE` only 1 is usable.
pub fn resolvable_sample_counts_from_flags(flags: wgpu::TextureFormatFeatureFlags) -> SampleCounts {
    if flags.contains(wgpu::TextureFormatFeatureFlags::MULTISAMPLE_RESOLVE) {
        sample_counts_from_flags(flags)
    } else {
        SampleCounts::SINGLE
    }
}

/// Sample counts `format` supports on `device`.
///
/// Adapter-specific counts are only usable when the device was created with
/// `TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES`; without it only the
/// guaranteed counts for the format apply.
pub fn format_sample_counts(
    adapter: &wgpu::Adapter,
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
) -> SampleCounts {
    let counts = sample_counts_from_flags(format_features(adapter, device, format).flags);
    tracing::debug!(?format, %counts, "Format sample counts");
    counts
}

/// Sample counts the color `format` supports on `device`, including resolve
pub fn color_sample_counts(
    adapter: &wgpu::Adapter,
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
) -> SampleCounts {
    let flags = format_features(adapter, device, format).flags;
    let counts = resolvable_sample_counts_from_flags(flags);
    if counts != sample_counts_from_flags(flags) {
        tracing::debug!(?format, "Format cannot resolve multisampled color");
    }
    tracing::debug!(?format, %counts, "Color format sample counts");
    counts
}

fn format_features(
    adapter: &wgpu::Adapter,
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
) -> wgpu::TextureFormatFeatures {
    let device_features = device.features();
    if device_features.contains(wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES) {
        adapter.get_texture_format_features(format)
    } else {
        format.guaranteed_format_features(device_features)
    }
}
