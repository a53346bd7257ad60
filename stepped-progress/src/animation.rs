//! Timing of the progress fill transitions.
//!
//! The fill is revealed by a mask whose right edge follows a node center.
//! Every mask of the control has the same outline shifted along x, so a
//! transition only needs to interpolate the target center; the path is
//! rebuilt from the sampled center.

use std::time::{Duration, Instant};

use lyon_path::math::Point;

/// Timing curve of a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimingCurve {
    /// Constant speed.
    Linear,
    /// Slow start and end, `cubic-bezier(0.42, 0, 0.58, 1)`.
    #[default]
    EaseInEaseOut,
    /// Arbitrary cubic bezier with the given control points.
    CubicBezier {
        /// First control point x.
        x1: f32,
        /// First control point y.
        y1: f32,
        /// Second control point x.
        x2: f32,
        /// Second control point y.
        y2: f32,
    },
}

impl TimingCurve {
    /// Maps linear progress in `[0, 1]` to eased progress.
    pub fn apply(self, progress: f32) -> f32 {
        match self {
            TimingCurve::Linear => progress.clamp(0.0, 1.0),
            TimingCurve::EaseInEaseOut => cubic_bezier_easing(progress, 0.42, 0.0, 0.58, 1.0),
            TimingCurve::CubicBezier { x1, y1, x2, y2 } => {
                cubic_bezier_easing(progress, x1, y1, x2, y2)
            }
        }
    }
}

fn cubic_bezier(t: f32, a: f32, b: f32, c: f32, d: f32) -> f32 {
    let u = 1.0 - t;
    (u * u * u * a) + (3.0 * u * u * t * b) + (3.0 * u * t * t * c) + (t * t * t * d)
}

fn cubic_bezier_easing(progress: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let mut lo = 0.0;
    let mut hi = 1.0;
    let mut t = progress;

    for _ in 0..20 {
        let mid = (lo + hi) * 0.5;
        if cubic_bezier(mid, 0.0, x1, x2, 1.0) < progress {
            lo = mid;
        } else {
            hi = mid;
        }
        t = mid;
    }

    cubic_bezier(t, 0.0, y1, y2, 1.0).clamp(0.0, 1.0)
}

/// A running move of the mask's target center.
///
/// `from == None` means the mask was empty; such transitions complete at
/// once because there is no edge to move. `to == None` empties the mask.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskTransition {
    /// Center the mask starts from.
    pub from: Option<Point>,
    /// Center the mask ends at.
    pub to: Option<Point>,
    /// Start time.
    pub started_at: Instant,
    /// Total duration, zero for an instant snap.
    pub duration: Duration,
    /// Timing curve.
    pub curve: TimingCurve,
}

impl MaskTransition {
    /// A transition starting at `started_at`.
    pub fn new(
        from: Option<Point>,
        to: Option<Point>,
        started_at: Instant,
        duration: Duration,
        curve: TimingCurve,
    ) -> Self {
        let duration = if from.is_some() && to.is_some() {
            duration
        } else {
            Duration::ZERO
        };
        Self {
            from,
            to,
            started_at,
            duration,
            curve,
        }
    }

    /// Linear progress in `[0, 1]` at `now`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Whether the transition has reached its end at `now`.
    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.duration
    }

    /// Target center of the mask at `now`.
    pub fn center_at(&self, now: Instant) -> Option<Point> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => {
                let t = self.curve.apply(self.progress(now));
                Some(from.lerp(to, t))
            }
            (_, to) => to,
        }
    }
}

#[cfg(test)]
mod tests {
    use lyon_path::math::point;

    use super::*;

    #[test]
    fn test_ease_in_ease_out_shape() {
        let curve = TimingCurve::EaseInEaseOut;
        assert_eq!(curve.apply(0.0), 0.0);
        assert_eq!(curve.apply(1.0), 1.0);
        assert!((curve.apply(0.5) - 0.5).abs() < 1e-3);
        assert!(curve.apply(0.1) < 0.1);
        assert!(curve.apply(0.9) > 0.9);
        assert_eq!(TimingCurve::Linear.apply(0.25), 0.25);
    }

    #[test]
    fn test_curves_hit_endpoints_exactly() {
        let custom = TimingCurve::CubicBezier {
            x1: 0.25,
            y1: 0.1,
            x2: 0.25,
            y2: 1.0,
        };
        for curve in [TimingCurve::Linear, TimingCurve::EaseInEaseOut, custom] {
            assert_eq!(curve.apply(-0.5), 0.0);
            assert_eq!(curve.apply(0.0), 0.0);
            assert_eq!(curve.apply(1.0), 1.0);
            assert_eq!(curve.apply(1.5), 1.0);
        }
        assert!(custom.apply(0.5) > 0.5);
    }

    #[test]
    fn test_transition_samples_between_centers() {
        let start = Instant::now();
        let transition = MaskTransition::new(
            Some(point(0.0, 10.0)),
            Some(point(100.0, 10.0)),
            start,
            Duration::from_millis(800),
            TimingCurve::Linear,
        );
        assert_eq!(transition.center_at(start), Some(point(0.0, 10.0)));
        let halfway = transition
            .center_at(start + Duration::from_millis(400))
            .expect("target is set");
        assert!((halfway.x - 50.0).abs() < 1e-3);
        assert!(!transition.is_finished(start + Duration::from_millis(799)));
        assert!(transition.is_finished(start + Duration::from_millis(800)));
        assert_eq!(
            transition.center_at(start + Duration::from_secs(5)),
            Some(point(100.0, 10.0))
        );
    }

    #[test]
    fn test_transition_from_empty_mask_is_instant() {
        let start = Instant::now();
        let transition = MaskTransition::new(
            None,
            Some(point(40.0, 10.0)),
            start,
            Duration::from_millis(800),
            TimingCurve::EaseInEaseOut,
        );
        assert!(transition.duration.is_zero());
        assert!(transition.is_finished(start));
        assert_eq!(transition.center_at(start), Some(point(40.0, 10.0)));
    }
}
