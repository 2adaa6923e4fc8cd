//! Saaty intensity scale for pairwise judgments (1 to 9).

use serde::{Deserialize, Serialize};

/// Verbal anchors of the Saaty fundamental scale.
///
/// Intermediate values (2, 4, 6, 8) and reciprocals are expressed as raw
/// ratios on `PairwiseComparisons`; this enum covers the named anchors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Intensity {
    #[default]
    Equal = 1,
    Moderate = 3,
    Strong = 5,
    VeryStrong = 7,
    Extreme = 9,
}

impl Intensity {
    /// Upper bound of the scale.
    pub const SCALE_MAX: f64 = 9.0;

    /// Returns the ratio this anchor stands for.
    pub fn ratio(&self) -> f64 {
        f64::from(*self as u8)
    }

    /// Returns true if a ratio (or its reciprocal) lies within 1..=9.
    pub fn is_on_scale(ratio: f64) -> bool {
        let magnitude = if ratio >= 1.0 { ratio } else { 1.0 / ratio };
        magnitude <= Self::SCALE_MAX
    }
}
