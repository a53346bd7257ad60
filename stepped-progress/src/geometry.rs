//! Geometry kernel of the stepped progress bar.
//!
//! Every function here is pure: it turns numbers into node positions or
//! closed [`Path`]s and never touches state. Paths are built in logical
//! left-to-right space with y growing downwards; right-to-left output is a
//! transform applied afterwards (see [`mirror_transform`]).
//!
//! Arcs follow the screen-space clockwise convention: a positive sweep from
//! angle `π` passes through `3π/2`, the top of the circle.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use lyon_geom::{Arc, CubicBezierSegment, LineSegment, QuadraticBezierSegment};
use lyon_path::{
    Event, Path,
    builder::SvgPathBuilder,
    math::{Angle, Box2D, Point, Transform, point, vector},
};
use smallvec::SmallVec;

use crate::error::{Result, SteppedProgressError};

/// Centers of the step nodes, in index order.
pub type NodeLayout = SmallVec<[Point; 8]>;

/// Minimum number of nodes the topology supports.
pub const MIN_POINTS: usize = 2;

/// Computes the center of every node.
///
/// Nodes are spaced by the larger of the two radii so both the background
/// and the progress circles fit. The first node touches the left edge of
/// `bounds` and the last one touches the right edge. When the bounds are too
/// narrow the gap is clamped to zero and the row overflows to the right.
///
/// # Errors
///
/// Returns [`SteppedProgressError::TooFewPoints`] when `number_of_points < 2`.
pub fn layout_nodes(
    bounds: Box2D,
    number_of_points: usize,
    radius: f32,
    progress_radius: f32,
) -> Result<NodeLayout> {
    if number_of_points < MIN_POINTS {
        return Err(SteppedProgressError::TooFewPoints {
            requested: number_of_points,
        });
    }

    let larger_radius = radius.max(progress_radius);
    let count = number_of_points as f32;
    let gap = ((bounds.width() - count * 2.0 * larger_radius) / (count - 1.0)).max(0.0);
    let y = bounds.center().y;

    let mut x = bounds.min.x + larger_radius;
    let mut centers = NodeLayout::with_capacity(number_of_points);
    for _ in 0..number_of_points {
        centers.push(point(x, y));
        x += 2.0 * larger_radius + gap;
    }
    Ok(centers)
}

/// Builds the closed outline of all node circles joined by a band of
/// `line_height`.
///
/// The outline runs over the top arcs from left to right, then back over the
/// bottom arcs from right to left. Each arc stops where the band meets the
/// circle, at the half-angle `(line_height / 2) / radius`.
pub fn capsule_path(points: &[Point], radius: f32, line_height: f32) -> Path {
    let mut builder = Path::builder().with_svg();
    let count = points.len();
    if count == 0 || radius <= 0.0 {
        return builder.build();
    }

    let angle = band_half_angle(line_height, radius);
    let half_band = line_height / 2.0;

    for i in 0..2 * count {
        let index = if i < count { i } else { 2 * count - 1 - i };
        let center = points[index];

        let (start, end) = if i == 0 {
            (PI, -angle)
        } else if i < count - 1 {
            (PI + angle, -angle)
        } else if i == count - 1 {
            (PI + angle, 0.0)
        } else if i == count {
            (0.0, PI - angle)
        } else if i < 2 * count - 1 {
            (angle, PI - angle)
        } else {
            (angle, PI)
        };

        let arc = clockwise_arc(center, radius, start, end);
        if i == 0 {
            begin_arc(&mut builder, &arc);
        } else {
            continue_arc(&mut builder, &arc);
        }

        if i < count - 1 {
            let next = points[index + 1];
            builder.line_to(point(next.x - radius, center.y - half_band));
        } else if i >= count && i < 2 * count - 1 {
            let previous = points[index - 1];
            builder.line_to(point(previous.x + radius, center.y + half_band));
        }
    }

    builder.close();
    builder.build()
}

/// A closed circle around `center`.
///
/// Used for the selection disc, the last-state disc and the halo cutouts
/// drawn beneath them.
pub fn selection_disc_path(center: Point, radius: f32) -> Path {
    let mut builder = Path::builder().with_svg();
    if radius > 0.0 {
        let arc = clockwise_arc(center, radius, 0.0, TAU);
        begin_arc(&mut builder, &arc);
        builder.close();
    }
    builder.build()
}

/// The ring marking the last completed node, of radius
/// `progress_radius + ring_width`. Meant to be stroked with `ring_width`.
pub fn last_state_ring_path(center: Point, progress_radius: f32, ring_width: f32) -> Path {
    selection_disc_path(center, progress_radius + ring_width)
}

/// The clip region revealing the progress band up to `target_center`.
///
/// The region spans the full height of `bounds` from its left edge. Its right
/// edge is a vertical line at `target_center.x + cos(a) * progress_radius`
/// interrupted by an arc of the target circle, so the fill ends on the node's
/// rounded silhouette instead of cutting through it.
pub fn progress_mask_path(
    bounds: Box2D,
    target_center: Point,
    progress_radius: f32,
    progress_line_height: f32,
) -> Path {
    let mut builder = Path::builder().with_svg();
    if progress_radius <= 0.0 {
        return builder.build();
    }

    let angle = band_half_angle(progress_line_height, progress_radius);
    let edge_x = mask_edge_x(target_center, progress_radius, progress_line_height);

    builder.move_to(bounds.min);
    builder.line_to(point(edge_x, bounds.min.y));
    builder.line_to(point(edge_x, target_center.y - progress_line_height));
    continue_arc(
        &mut builder,
        &clockwise_arc(target_center, progress_radius, -angle, angle),
    );
    builder.line_to(point(edge_x, bounds.max.y));
    builder.line_to(point(bounds.min.x, bounds.max.y));
    builder.close();
    builder.build()
}

/// X coordinate of the straight right edge of [`progress_mask_path`].
pub fn mask_edge_x(target_center: Point, progress_radius: f32, progress_line_height: f32) -> f32 {
    let angle = band_half_angle(progress_line_height, progress_radius);
    target_center.x + angle.cos() * progress_radius
}

/// The stroke joining the previous node to the current one when the last
/// state is displayed.
///
/// Runs along the midline from the outer edge of the previous node's ring to
/// the outer edge of the current node's ring. Returns `None` when the rings
/// touch or overlap.
pub fn road_to_selection_path(
    previous_center: Point,
    current_center: Point,
    progress_radius: f32,
    ring_width: f32,
) -> Option<Path> {
    let reach = progress_radius + ring_width;
    let from = point(previous_center.x + reach, previous_center.y);
    let to = point(current_center.x - reach, current_center.y);
    if to.x <= from.x {
        return None;
    }

    let mut builder = Path::builder().with_svg();
    builder.move_to(from);
    builder.line_to(to);
    Some(builder.build())
}

/// Tight bounding box of every segment in `path`, `None` for an empty path.
pub fn path_bounds(path: &Path) -> Option<Box2D> {
    let mut bounds: Option<Box2D> = None;
    // Grown per component: `Box2D::union` ignores zero-area boxes.
    let mut include = |b: Box2D| {
        bounds = Some(match bounds {
            Some(existing) => Box2D::new(existing.min.min(b.min), existing.max.max(b.max)),
            None => b,
        });
    };

    for event in path.iter() {
        match event {
            Event::Begin { at } => include(Box2D::new(at, at)),
            Event::Line { from, to } => include(LineSegment { from, to }.bounding_box()),
            Event::Quadratic { from, ctrl, to } => {
                include(QuadraticBezierSegment { from, ctrl, to }.bounding_box())
            }
            Event::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => include(
                CubicBezierSegment {
                    from,
                    ctrl1,
                    ctrl2,
                    to,
                }
                .bounding_box(),
            ),
            Event::End { .. } => {}
        }
    }
    bounds
}

/// Mirrors geometry about the vertical center line of `bounds`.
pub fn mirror_transform(bounds: Box2D) -> Transform {
    Transform::scale(-1.0, 1.0).then_translate(vector(bounds.min.x + bounds.max.x, 0.0))
}

/// Mirrors a single x coordinate about the vertical center line of `bounds`.
pub fn mirror_x(bounds: Box2D, x: f32) -> f32 {
    bounds.min.x + bounds.max.x - x
}

// Half-angle subtended by a band of `line_height` at a circle of `radius`,
// kept within a quarter turn so the arcs never wrap.
fn band_half_angle(line_height: f32, radius: f32) -> f32 {
    (line_height / 2.0 / radius).clamp(0.0, FRAC_PI_2)
}

fn clockwise_arc(center: Point, radius: f32, start: f32, end: f32) -> Arc<f32> {
    let mut sweep = end - start;
    if sweep < 0.0 {
        sweep += TAU;
    }
    Arc {
        center,
        radii: vector(radius, radius),
        start_angle: Angle::radians(start),
        sweep_angle: Angle::radians(sweep),
        x_rotation: Angle::radians(0.0),
    }
}

fn begin_arc(builder: &mut impl SvgPathBuilder, arc: &Arc<f32>) {
    builder.move_to(arc.from());
    append_arc(builder, arc);
}

fn continue_arc(builder: &mut impl SvgPathBuilder, arc: &Arc<f32>) {
    builder.line_to(arc.from());
    append_arc(builder, arc);
}

fn append_arc(builder: &mut impl SvgPathBuilder, arc: &Arc<f32>) {
    arc.for_each_quadratic_bezier(&mut |segment: &QuadraticBezierSegment<f32>| {
        builder.quadratic_bezier_to(segment.ctrl, segment.to);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 0.15;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() <= EPS
    }

    fn bounds(width: f32, height: f32) -> Box2D {
        Box2D::new(point(0.0, 0.0), point(width, height))
    }

    fn subpaths(path: &Path) -> (usize, usize) {
        let mut begins = 0;
        let mut closed = 0;
        for event in path.iter() {
            match event {
                Event::Begin { .. } => begins += 1,
                Event::End { close: true, .. } => closed += 1,
                _ => {}
            }
        }
        (begins, closed)
    }

    #[test]
    fn test_layout_rejects_single_point() {
        let result = layout_nodes(bounds(100.0, 20.0), 1, 10.0, 10.0);
        assert!(matches!(
            result,
            Err(SteppedProgressError::TooFewPoints { requested: 1 })
        ));
    }

    #[test]
    fn test_layout_spans_bounds() {
        for n in 2..12 {
            let centers = layout_nodes(bounds(400.0, 40.0), n, 12.0, 16.0).expect("n >= 2");
            assert_eq!(centers.len(), n);
            assert!(approx(centers[0].x, 16.0));
            assert!(approx(centers[n - 1].x, 400.0 - 16.0));
            for pair in centers.windows(2) {
                assert!(pair[1].x > pair[0].x);
                assert_eq!(pair[0].y, 20.0);
                assert_eq!(pair[1].y, 20.0);
            }
        }
    }

    #[test]
    fn test_layout_clamps_gap_in_narrow_bounds() {
        let centers = layout_nodes(bounds(50.0, 20.0), 4, 10.0, 10.0).expect("n >= 2");
        assert_eq!(centers[0].x, 10.0);
        assert_eq!(centers[1].x, 30.0);
        assert_eq!(centers[3].x, 70.0);
    }

    #[test]
    fn test_layout_respects_bounds_origin() {
        let frame = Box2D::new(point(10.0, 100.0), point(210.0, 140.0));
        let centers = layout_nodes(frame, 3, 0.0, 20.0).expect("n >= 2");
        assert_eq!(centers[0], point(30.0, 120.0));
        assert_eq!(centers[2], point(190.0, 120.0));
    }

    #[test]
    fn test_capsule_is_one_closed_subpath() {
        let centers = layout_nodes(bounds(300.0, 40.0), 5, 20.0, 20.0).expect("n >= 2");
        let path = capsule_path(&centers, 20.0, 16.0);
        assert_eq!(subpaths(&path), (1, 1));
    }

    #[test]
    fn test_capsule_bounding_box() {
        for n in 2..8 {
            let centers = layout_nodes(bounds(320.0, 40.0), n, 14.0, 20.0).expect("n >= 2");
            let path = capsule_path(&centers, 14.0, 10.0);
            let bbox = path_bounds(&path).expect("non-empty path");
            let spacing = centers[n - 1].x - centers[0].x;
            assert!(approx(bbox.width(), spacing + 28.0), "n = {n}: {bbox:?}");
            assert!(approx(bbox.height(), 28.0), "n = {n}: {bbox:?}");
            assert!(approx(bbox.min.x, centers[0].x - 14.0));
            assert!(approx(bbox.min.y, 20.0 - 14.0));
        }
    }

    #[test]
    fn test_capsule_band_reaches_between_nodes() {
        let centers = layout_nodes(bounds(200.0, 40.0), 2, 10.0, 10.0).expect("n >= 2");
        let path = capsule_path(&centers, 10.0, 8.0);
        let top_band = path.iter().any(|event| match event {
            Event::Line { to, .. } => approx(to.y, 16.0) && approx(to.x, centers[1].x - 10.0),
            _ => false,
        });
        let bottom_band = path.iter().any(|event| match event {
            Event::Line { to, .. } => approx(to.y, 24.0) && approx(to.x, centers[0].x + 10.0),
            _ => false,
        });
        assert!(top_band);
        assert!(bottom_band);
    }

    #[test]
    fn test_selection_disc_bounds() {
        let disc = selection_disc_path(point(50.0, 20.0), 12.0);
        assert_eq!(subpaths(&disc), (1, 1));
        let bbox = path_bounds(&disc).expect("non-empty path");
        assert!(approx(bbox.min.x, 38.0));
        assert!(approx(bbox.max.x, 62.0));
        assert!(approx(bbox.min.y, 8.0));
        assert!(approx(bbox.max.y, 32.0));
    }

    #[test]
    fn test_zero_radius_disc_is_empty() {
        assert!(path_bounds(&selection_disc_path(point(0.0, 0.0), 0.0)).is_none());
    }

    #[test]
    fn test_last_state_ring_radius() {
        let ring = last_state_ring_path(point(100.0, 20.0), 15.0, 5.0);
        let bbox = path_bounds(&ring).expect("non-empty path");
        assert!(approx(bbox.width(), 40.0));
        assert!(approx(bbox.height(), 40.0));
    }

    #[test]
    fn test_mask_edge_is_independent_of_target() {
        let frame = bounds(400.0, 40.0);
        let centers = layout_nodes(frame, 5, 20.0, 20.0).expect("n >= 2");
        let expected_offset = (8.0f32 / 20.0).cos() * 20.0;

        for center in &centers {
            let mask = progress_mask_path(frame, *center, 20.0, 16.0);
            assert_eq!(subpaths(&mask), (1, 1));

            let edge = mask_edge_x(*center, 20.0, 16.0);
            assert!(approx(edge - center.x, expected_offset));

            let verticals = mask
                .iter()
                .filter(|event| match event {
                    Event::Line { from, to } => approx(from.x, edge) && approx(to.x, edge),
                    _ => false,
                })
                .count();
            assert!(verticals >= 2);

            let bbox = path_bounds(&mask).expect("non-empty path");
            assert_eq!(bbox.min.x, 0.0);
            assert_eq!(bbox.min.y, 0.0);
            assert_eq!(bbox.max.y, 40.0);
            assert!(approx(bbox.max.x, center.x + 20.0));
        }
    }

    #[test]
    fn test_road_to_selection() {
        let road = road_to_selection_path(point(20.0, 20.0), point(100.0, 20.0), 10.0, 3.0)
            .expect("rings do not overlap");
        let bbox = path_bounds(&road).expect("non-empty path");
        assert_eq!(bbox.min.x, 33.0);
        assert_eq!(bbox.max.x, 87.0);
        assert_eq!(subpaths(&road), (1, 0));

        assert!(road_to_selection_path(point(20.0, 20.0), point(40.0, 20.0), 10.0, 3.0).is_none());
    }

    #[test]
    fn test_bounds_of_straight_segments() {
        let mut builder = Path::builder().with_svg();
        builder.move_to(point(0.0, 0.0));
        builder.line_to(point(100.0, 0.0));
        builder.line_to(point(100.0, 50.0));
        let path = builder.build();
        assert_eq!(
            path_bounds(&path),
            Some(Box2D::new(point(0.0, 0.0), point(100.0, 50.0)))
        );
    }

    #[test]
    fn test_mask_covers_bounds_up_to_target() {
        let frame = bounds(400.0, 40.0);
        let mask = progress_mask_path(frame, point(200.0, 20.0), 20.0, 16.0);
        let bbox = path_bounds(&mask).expect("non-empty path");
        assert_eq!(bbox.min, point(0.0, 0.0));
        assert_eq!(bbox.max.y, 40.0);
        assert!(approx(bbox.max.x, 220.0));
    }

    #[test]
    fn test_mirror_transform() {
        let frame = Box2D::new(point(10.0, 0.0), point(110.0, 40.0));
        let mirrored = mirror_transform(frame).transform_point(point(20.0, 5.0));
        assert_eq!(mirrored, point(100.0, 5.0));
        assert_eq!(mirror_x(frame, 20.0), 100.0);
    }
}
