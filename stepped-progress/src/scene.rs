//! Plain-data description of one rendered frame.
//!
//! A [`Scene`] lists the shape layers of the control bottom to top, the
//! progress mask transition and the caption layers. Backends implement
//! [`VectorCanvas`] to draw it; nothing in a scene refers back to the
//! control, so a scene can be kept, diffed or sent to another thread.

use std::time::Duration;

use lyon_path::{
    Path,
    math::{Box2D, Transform},
};

use crate::{
    animation::TimingCurve, color::Color, geometry::NodeLayout, labels::LabelLayer,
};

/// What a shape layer depicts. Layers appear in a scene in declaration
/// order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerRole {
    /// View-background capsule cut out beneath every ring.
    ClearCenters,
    /// The unfilled capsule.
    Background,
    /// The filled capsule, clipped by the progress mask.
    Progress,
    /// Halo beneath the selection ring.
    ClearSelection,
    /// Ring around the current node.
    SelectionRing,
    /// Disc inside the current node.
    Selection,
    /// Stroke joining the previous node to the current one.
    RoadToSelection,
    /// Halo beneath the last-state ring.
    ClearLastState,
    /// Ring around the last completed node.
    LastStateRing,
    /// Disc inside the last completed node.
    LastStateCenter,
}

/// Stroke paint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// Stroke colour.
    pub color: Color,
    /// Line width in logical pixels.
    pub width: f32,
}

/// One filled and/or stroked path.
///
/// When both paints are present the fill is drawn first.
#[derive(Clone, Debug)]
pub struct ShapeLayer {
    /// What the layer depicts.
    pub role: LayerRole,
    /// Geometry in logical left-to-right coordinates.
    pub path: Path,
    /// Fill paint.
    pub fill: Option<Color>,
    /// Stroke paint.
    pub stroke: Option<Stroke>,
    /// Whether the layer is clipped by the progress mask.
    pub masked: bool,
}

impl ShapeLayer {
    /// A filled layer.
    pub fn filled(role: LayerRole, path: Path, color: Color) -> Self {
        Self {
            role,
            path,
            fill: Some(color),
            stroke: None,
            masked: false,
        }
    }

    /// A stroked layer.
    pub fn stroked(role: LayerRole, path: Path, color: Color, width: f32) -> Self {
        Self {
            role,
            path,
            fill: None,
            stroke: Some(Stroke { color, width }),
            masked: false,
        }
    }

    /// Adds a fill to the layer.
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    /// Clips the layer by the progress mask.
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }
}

/// Transition of the progress mask started by a render pass.
///
/// An empty path reveals nothing. Backends that animate on their own can
/// interpolate `from` to `to`; others sample the mask every frame through
/// [`crate::SteppedProgressBar::advance`].
#[derive(Clone, Debug)]
pub struct MaskAnimation {
    /// Mask shown when the transition starts.
    pub from: Path,
    /// Mask shown when the transition ends and afterwards.
    pub to: Path,
    /// Total duration, zero for an instant change.
    pub duration: Duration,
    /// Timing curve.
    pub curve: TimingCurve,
}

impl MaskAnimation {
    /// Whether the mask changes without animating.
    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Bounds of the control.
    pub bounds: Box2D,
    /// Node centers in logical coordinates.
    pub node_centers: NodeLayout,
    /// Shape layers, bottom to top.
    pub layers: Vec<ShapeLayer>,
    /// Progress mask transition.
    pub mask: MaskAnimation,
    /// Captions, drawn above every shape layer.
    pub labels: Vec<LabelLayer>,
    /// Transform from logical to output coordinates, set for right-to-left
    /// layouts.
    pub transform: Option<Transform>,
}

impl Scene {
    /// The first layer with `role`.
    pub fn layer(&self, role: LayerRole) -> Option<&ShapeLayer> {
        self.layers.iter().find(|layer| layer.role == role)
    }

    /// Whether a layer with `role` is present.
    pub fn has_layer(&self, role: LayerRole) -> bool {
        self.layer(role).is_some()
    }

    /// Roles of all layers, bottom to top.
    pub fn roles(&self) -> impl Iterator<Item = LayerRole> + '_ {
        self.layers.iter().map(|layer| layer.role)
    }
}

/// A drawing backend.
pub trait VectorCanvas {
    /// Error reported by the backend.
    type Error;

    /// Replaces everything drawn with `scene`.
    fn present(&mut self, scene: &Scene) -> Result<(), Self::Error>;

    /// Replaces the progress mask of the presented scene.
    fn update_mask(&mut self, mask: &Path) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use lyon_path::math::point;

    use super::*;
    use crate::geometry::selection_disc_path;

    fn scene() -> Scene {
        let disc = selection_disc_path(point(20.0, 20.0), 10.0);
        Scene {
            bounds: Box2D::new(point(0.0, 0.0), point(100.0, 40.0)),
            node_centers: NodeLayout::new(),
            layers: vec![
                ShapeLayer::filled(LayerRole::Background, disc.clone(), Color::BAND_GREY),
                ShapeLayer::filled(LayerRole::Progress, disc.clone(), Color::PROGRESS_ORANGE)
                    .masked(),
                ShapeLayer::stroked(LayerRole::LastStateRing, disc, Color::PROGRESS_ORANGE, 5.0)
                    .with_fill(Color::WHITE),
            ],
            mask: MaskAnimation {
                from: Path::new(),
                to: Path::new(),
                duration: Duration::ZERO,
                curve: TimingCurve::EaseInEaseOut,
            },
            labels: Vec::new(),
            transform: None,
        }
    }

    #[test]
    fn test_layer_lookup() {
        let scene = scene();
        assert!(scene.has_layer(LayerRole::Progress));
        assert!(!scene.has_layer(LayerRole::Selection));
        assert!(scene.layer(LayerRole::Progress).is_some_and(|layer| layer.masked));
        assert_eq!(
            scene.roles().collect::<Vec<_>>(),
            vec![
                LayerRole::Background,
                LayerRole::Progress,
                LayerRole::LastStateRing
            ]
        );
        assert!(scene.mask.is_instant());
    }

    #[test]
    fn test_fill_and_stroke_layer() {
        let scene = scene();
        let ring = scene.layer(LayerRole::LastStateRing).expect("ring layer");
        assert_eq!(ring.fill, Some(Color::WHITE));
        assert_eq!(
            ring.stroke,
            Some(Stroke {
                color: Color::PROGRESS_ORANGE,
                width: 5.0
            })
        );
        assert!(!ring.masked);
    }
}
