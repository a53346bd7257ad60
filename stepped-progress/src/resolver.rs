//! Maps touches to node indices.

use lyon_path::math::Point;
use tracing::trace;

/// Phase of the gesture that produced a touch point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// Recognition has not started.
    Possible,
    /// The touch went down.
    Began,
    /// The touch moved while down.
    Changed,
    /// The touch was released.
    Ended,
    /// The gesture was cancelled by the system.
    Cancelled,
    /// The gesture failed to be recognized.
    Failed,
}

impl GesturePhase {
    /// Only moving and released touches select a node.
    pub fn selects(self) -> bool {
        matches!(self, GesturePhase::Changed | GesturePhase::Ended)
    }
}

/// Index of the node center closest to `point`.
///
/// Ties go to the lowest index. Returns `None` when there are no centers.
pub fn nearest_node(point: Point, centers: &[Point]) -> Option<usize> {
    let mut nearest = None;
    let mut smallest = f32::INFINITY;
    for (index, center) in centers.iter().enumerate() {
        let distance = point.distance_to(*center);
        if distance < smallest {
            smallest = distance;
            nearest = Some(index);
        }
    }
    nearest
}

/// Resolves a touch into a candidate index.
///
/// Touches in phases other than [`GesturePhase::Changed`] and
/// [`GesturePhase::Ended`] are ignored. Whether the candidate is actually
/// selected is up to the caller (it may equal the current index or be
/// refused by the delegate).
pub fn resolve_touch(point: Point, centers: &[Point], phase: GesturePhase) -> Option<usize> {
    if !phase.selects() {
        trace!(?phase, "ignoring touch");
        return None;
    }
    nearest_node(point, centers)
}

#[cfg(test)]
mod tests {
    use lyon_path::math::point;

    use super::*;

    fn centers() -> Vec<Point> {
        vec![
            point(20.0, 20.0),
            point(100.0, 20.0),
            point(180.0, 20.0),
            point(260.0, 20.0),
        ]
    }

    #[test]
    fn test_nearest_node() {
        assert_eq!(nearest_node(point(95.0, 40.0), &centers()), Some(1));
        assert_eq!(nearest_node(point(-50.0, 0.0), &centers()), Some(0));
        assert_eq!(nearest_node(point(900.0, 0.0), &centers()), Some(3));
        assert_eq!(nearest_node(point(0.0, 0.0), &[]), None);
    }

    #[test]
    fn test_tie_goes_to_lower_index() {
        assert_eq!(nearest_node(point(140.0, 20.0), &centers()), Some(1));
        assert_eq!(nearest_node(point(220.0, 5.0), &centers()), Some(2));
    }

    #[test]
    fn test_phase_gating() {
        let touch = point(180.0, 20.0);
        assert_eq!(resolve_touch(touch, &centers(), GesturePhase::Ended), Some(2));
        assert_eq!(resolve_touch(touch, &centers(), GesturePhase::Changed), Some(2));
        for phase in [
            GesturePhase::Possible,
            GesturePhase::Began,
            GesturePhase::Cancelled,
            GesturePhase::Failed,
        ] {
            assert_eq!(resolve_touch(touch, &centers(), phase), None);
        }
    }
}
