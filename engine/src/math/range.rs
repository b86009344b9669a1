//! Float ranges with resettable bounds
//!
//! Used for distance limits, zoom limits and the vertical rotation range.

use serde::{Deserialize, Serialize};

/// Closed interval `[min, max]` that remembers the bounds it was created with.
///
/// The active bounds can be tightened or widened at runtime (e.g. by a settings
/// override) and restored later with [`FloatRange::reset`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    /// Active lower bound
    pub min: f32,
    /// Active upper bound
    pub max: f32,
    /// Lower bound restored by `reset`
    #[serde(default)]
    pub default_min: f32,
    /// Upper bound restored by `reset`
    #[serde(default)]
    pub default_max: f32,
}

impl FloatRange {
    /// Create a range whose defaults equal its active bounds.
    pub const fn new(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            default_min: min,
            default_max: max,
        }
    }

    /// Clamp `value` into the active bounds.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        clamp_to_range(value, *self)
    }

    /// Whether `value` lies inside the active bounds (inclusive).
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Width of the active interval.
    #[inline]
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Whether the bounds describe a usable interval.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Replace the active bounds, keeping the stored defaults.
    pub fn set(&mut self, min: f32, max: f32) {
        self.min = min;
        self.max = max;
    }

    /// Restore the bounds the range was created with.
    pub fn reset(&mut self) {
        self.min = self.default_min;
        self.max = self.default_max;
    }
}

/// Clamp `value` into `[range.min, range.max]`.
///
/// Never panics: NaN collapses to `range.min`, and an inverted range yields
/// `range.max`. Idempotent for every input.
#[inline]
pub fn clamp_to_range(value: f32, range: FloatRange) -> f32 {
    value.max(range.min).min(range.max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_inside_range() {
        let range = FloatRange::new(1.0, 15.0);
        assert_eq!(clamp_to_range(4.5, range), 4.5);
    }

    #[test]
    fn test_clamp_outside_range() {
        let range = FloatRange::new(1.0, 15.0);
        assert_eq!(clamp_to_range(-3.0, range), 1.0);
        assert_eq!(clamp_to_range(40.0, range), 15.0);
    }

    #[test]
    fn test_clamp_is_idempotent() {
        let range = FloatRange::new(-90.0, 90.0);
        for value in [-1000.0, -90.0, -12.5, 0.0, 45.0, 90.0, 1e9, f32::NAN] {
            let once = clamp_to_range(value, range);
            let twice = clamp_to_range(once, range);
            assert!(range.contains(once), "{value} clamped to {once}");
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_reset_restores_creation_bounds() {
        let mut range = FloatRange::new(2.0, 10.0);
        range.set(3.0, 4.0);
        assert_eq!(range.clamp(9.0), 4.0);

        range.reset();
        assert_eq!(range.min, 2.0);
        assert_eq!(range.max, 10.0);
    }

    #[test]
    fn test_validity() {
        assert!(FloatRange::new(0.0, 0.0).is_valid());
        assert!(!FloatRange::new(5.0, 1.0).is_valid());
        assert!(!FloatRange::new(f32::NAN, 1.0).is_valid());
    }
}
