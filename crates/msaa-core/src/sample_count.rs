//! Sample counts and sample count capability masks

use std::fmt;
use std::ops::{BitAnd, BitOr};

use crate::error::MsaaError;

/// A multisample count in {1, 2, 4, 8}
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SampleCount {
    /// Single sample (no multisampling)
    #[default]
    X1,
    /// 2 samples per pixel
    X2,
    /// 4 samples per pixel
    X4,
    /// 8 samples per pixel
    X8,
}

impl SampleCount {
    /// All sample counts in ascending order
    pub const ALL: [SampleCount; 4] = [Self::X1, Self::X2, Self::X4, Self::X8];

    /// Number of samples per pixel
    pub const fn get(self) -> u32 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X4 => 4,
            Self::X8 => 8,
        }
    }

    /// Bit used for this count in a [`SampleCounts`] mask
    const fn bit(self) -> u8 {
        self.get() as u8
    }

    /// Whether rendering with this count goes through an offscreen target
    pub const fn is_multisampled(self) -> bool {
        !matches!(self, Self::X1)
    }
}

impl TryFrom<u32> for SampleCount {
    type Error = MsaaError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::X1),
            2 => Ok(Self::X2),
            4 => Ok(Self::X4),
            8 => Ok(Self::X8),
            other => Err(MsaaError::InvalidSampleCount(other)),
        }
    }
}

impl From<SampleCount> for u32 {
    fn from(count: SampleCount) -> Self {
        count.get()
    }
}

impl fmt::Display for SampleCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Bitmask over {1, 2, 4, 8} of supported sample counts.
///
/// Bit values match the sample counts themselves (0x1, 0x2, 0x4, 0x8);
/// higher bits are dropped on construction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SampleCounts(u8);

impl SampleCounts {
    /// No sample count supported
    pub const NONE: Self = Self(0);
    /// Only single-sample rendering
    pub const SINGLE: Self = Self(0x1);
    /// Every count in {1, 2, 4, 8}
    pub const ALL: Self = Self(0xF);

    /// Build a mask from raw bits, ignoring anything above 0x8
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self((bits & 0xF) as u8)
    }

    /// Raw bits of the mask
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether `count` is in the mask
    pub const fn contains(self, count: SampleCount) -> bool {
        self.0 & count.bit() != 0
    }

    /// Mask with `count` added
    pub const fn with(self, count: SampleCount) -> Self {
        Self(self.0 | count.bit())
    }

    /// Whether the mask is empty
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Counts present in the mask, ascending
    pub fn iter(self) -> impl Iterator<Item = SampleCount> {
        SampleCount::ALL
            .into_iter()
            .filter(move |count| self.contains(*count))
    }
}

impl BitAnd for SampleCounts {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for SampleCounts {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl FromIterator<SampleCount> for SampleCounts {
    fn from_iter<I: IntoIterator<Item = SampleCount>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

impl fmt::Display for SampleCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, count) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{count}")?;
        }
        f.write_str("}")
    }
}

impl fmt::Debug for SampleCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SampleCounts({:#06b} = {})", self.0, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_count_try_from() {
        assert_eq!(SampleCount::try_from(1).unwrap(), SampleCount::X1);
        assert_eq!(SampleCount::try_from(8).unwrap(), SampleCount::X8);
        assert!(matches!(
            SampleCount::try_from(3),
            Err(MsaaError::InvalidSampleCount(3))
        ));
        assert!(SampleCount::try_from(16).is_err());
    }

    #[test]
    fn test_sample_count_is_multisampled() {
        assert!(!SampleCount::X1.is_multisampled());
        assert!(SampleCount::X2.is_multisampled());
        assert!(SampleCount::X8.is_multisampled());
    }

    #[test]
    fn test_mask_truncates_high_bits() {
        let mask = SampleCounts::from_bits_truncate(0b1_0110);
        assert_eq!(mask.bits(), 0b0110);
        assert!(mask.contains(SampleCount::X2));
        assert!(mask.contains(SampleCount::X4));
        assert!(!mask.contains(SampleCount::X1));
    }

    #[test]
    fn test_mask_iter_and_collect() {
        let mask: SampleCounts = [SampleCount::X8, SampleCount::X1].into_iter().collect();
        assert_eq!(
            mask.iter().collect::<Vec<_>>(),
            vec![SampleCount::X1, SampleCount::X8]
        );
        assert_eq!(mask.to_string(), "{1, 8}");
    }

    #[test]
    fn test_mask_intersection() {
        let color = SampleCounts::from_bits_truncate(0b1111);
        let depth = SampleCounts::from_bits_truncate(0b0101);
        assert_eq!((color & depth).bits(), 0b0101);
        assert_eq!((SampleCounts::NONE | SampleCounts::SINGLE), SampleCounts::SINGLE);
    }
}
