//! Easing curves
//!
//! Maps a normalized time in `[0, 1]` to a speed multiplier. The focal point
//! uses it to close the lag distance non-linearly; the follow state uses it to
//! limit angular speed.

use serde::{Deserialize, Serialize};

/// Time → multiplier mapping over the domain `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EaseCurve {
    /// `f(t) = t`
    Linear,
    /// `f(t) = t²`
    EaseIn,
    /// `f(t) = 1 - (1 - t)²`
    #[default]
    EaseOut,
    /// Quadratic ease-in for the first half, ease-out for the second.
    EaseInOut,
    /// Piecewise-linear curve through `[t, value]` points sorted by `t`.
    Keyframes { points: Vec<[f32; 2]> },
}

impl EaseCurve {
    /// Evaluate the curve. Input is clamped to `[0, 1]`.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            EaseCurve::Linear => t,
            EaseCurve::EaseIn => t * t,
            EaseCurve::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            EaseCurve::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            EaseCurve::Keyframes { points } => sample_keyframes(points, t),
        }
    }

    /// Build a keyframe curve, sorting the points by time.
    pub fn keyframes(mut points: Vec<[f32; 2]>) -> Self {
        points.sort_by(|a, b| a[0].total_cmp(&b[0]));
        EaseCurve::Keyframes { points }
    }
}

fn sample_keyframes(points: &[[f32; 2]], t: f32) -> f32 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return 1.0;
    };
    if t <= first[0] {
        return first[1];
    }
    if t >= last[0] {
        return last[1];
    }

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t >= a[0] && t <= b[0] {
            let span = b[0] - a[0];
            if span <= f32::EPSILON {
                return b[1];
            }
            let local = (t - a[0]) / span;
            return a[1] + (b[1] - a[1]) * local;
        }
    }
    last[1]
}
