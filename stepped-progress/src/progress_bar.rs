//! The stepped progress bar control.
//!
//! [`SteppedProgressBar`] ties the pieces together: it owns the style and
//! the [`ProgressState`], turns touches into selections, and describes each
//! frame as a [`Scene`]. Time is never read implicitly; callers pass the
//! current [`Instant`] to [`SteppedProgressBar::render`] and
//! [`SteppedProgressBar::advance`].

use std::{sync::Arc, time::Instant};

use lyon_path::{
    Path,
    math::{Box2D, Point, point},
};
use tracing::{debug, trace, warn};

use crate::{
    animation::MaskTransition,
    delegate::{DefaultDelegate, SteppedProgressDelegate},
    error::Result,
    geometry::{
        NodeLayout, capsule_path, last_state_ring_path, layout_nodes, mirror_transform, mirror_x,
        progress_mask_path, road_to_selection_path, selection_disc_path,
    },
    labels::{ApproximateTextMeasurer, LabelContext, LabelLayout, TextMeasurer},
    resolver::{GesturePhase, resolve_touch},
    scene::{LayerRole, MaskAnimation, Scene, ShapeLayer, VectorCanvas},
    state::ProgressState,
    style::{ResolvedMetrics, SteppedProgressStyle},
};

/// The progress mask sampled at one instant.
#[derive(Clone, Debug)]
pub struct MaskFrame {
    /// Mask to clip the progress layer with. Empty when nothing is revealed.
    pub mask: Path,
    /// Whether the running transition has ended.
    pub finished: bool,
}

/// A horizontal row of step nodes with a selectable current index.
pub struct SteppedProgressBar {
    style: SteppedProgressStyle,
    state: ProgressState,
    delegate: Arc<dyn SteppedProgressDelegate>,
    measurer: Box<dyn TextMeasurer>,
    bounds: Box2D,
    metrics: Option<ResolvedMetrics>,
    centers: NodeLayout,
    static_layers: Vec<ShapeLayer>,
    labels: LabelLayout,
    transition: Option<MaskTransition>,
    awaiting_completion: bool,
}

impl SteppedProgressBar {
    /// A control drawn with `style`, the first node selected.
    ///
    /// # Errors
    ///
    /// [`crate::SteppedProgressError::TooFewPoints`] when the style asks for
    /// fewer than two nodes.
    pub fn new(style: SteppedProgressStyle) -> Result<Self> {
        let state = ProgressState::new(style.number_of_points)?;
        Ok(Self {
            style,
            state,
            delegate: Arc::new(DefaultDelegate),
            measurer: Box::new(ApproximateTextMeasurer),
            bounds: Box2D::zero(),
            metrics: None,
            centers: NodeLayout::new(),
            static_layers: Vec::new(),
            labels: LabelLayout::new(),
            transition: None,
            awaiting_completion: false,
        })
    }

    /// Replaces the delegate, builder style.
    pub fn with_delegate(mut self, delegate: impl SteppedProgressDelegate + 'static) -> Self {
        self.set_delegate(Arc::new(delegate));
        self
    }

    /// Replaces the delegate.
    pub fn set_delegate(&mut self, delegate: Arc<dyn SteppedProgressDelegate>) {
        self.delegate = delegate;
        self.labels.clear();
        self.state.request_redraw();
    }

    /// Replaces the caption measurer.
    pub fn set_text_measurer(&mut self, measurer: impl TextMeasurer + 'static) {
        self.measurer = Box::new(measurer);
        self.labels.clear();
        self.state.request_redraw();
    }

    /// Sets the frame of the control.
    pub fn set_bounds(&mut self, bounds: Box2D) {
        if bounds != self.bounds {
            self.bounds = bounds;
            self.static_layers.clear();
            self.centers.clear();
            self.state.request_redraw();
        }
    }

    /// Replaces the style. The node count follows the new style.
    ///
    /// # Errors
    ///
    /// [`crate::SteppedProgressError::TooFewPoints`] when the style asks for
    /// fewer than two nodes; the previous style is kept.
    pub fn set_style(&mut self, style: SteppedProgressStyle) -> Result<()> {
        self.state.set_number_of_points(style.number_of_points)?;
        self.labels.clear();
        self.static_layers.clear();
        self.centers.clear();
        self.style = style;
        Ok(())
    }

    /// Moves the current index programmatically. Fires `will_select` but not
    /// `did_select`.
    ///
    /// # Errors
    ///
    /// [`crate::SteppedProgressError::IndexOutOfRange`] when `index` is not a
    /// node.
    pub fn set_current_index(&mut self, index: usize) -> Result<()> {
        self.state.set_current_index(index, &*self.delegate)
    }

    /// Sets the last completed index.
    ///
    /// # Errors
    ///
    /// [`crate::SteppedProgressError::IndexOutOfRange`] when `index` is not a
    /// node.
    pub fn set_completed_till_index(&mut self, index: Option<usize>) -> Result<()> {
        self.state.set_completed_till_index(index)
    }

    /// Enables or disables the last-state cursor.
    pub fn set_use_last_state(&mut self, use_last_state: bool) {
        self.state.set_use_last_state(use_last_state);
    }

    /// Changes the number of nodes.
    ///
    /// # Errors
    ///
    /// [`crate::SteppedProgressError::TooFewPoints`] when `number_of_points < 2`.
    pub fn set_number_of_points(&mut self, number_of_points: usize) -> Result<()> {
        self.state.set_number_of_points(number_of_points)?;
        self.style.number_of_points = number_of_points;
        self.labels.retain_points(number_of_points);
        self.static_layers.clear();
        self.centers.clear();
        Ok(())
    }

    /// Style of the control.
    pub fn style(&self) -> &SteppedProgressStyle {
        &self.style
    }

    /// Selection state.
    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    /// Frame of the control.
    pub fn bounds(&self) -> Box2D {
        self.bounds
    }

    /// Current index.
    pub fn current_index(&self) -> usize {
        self.state.current_index()
    }

    /// Last completed index.
    pub fn completed_till_index(&self) -> Option<usize> {
        self.state.completed_till_index()
    }

    /// Whether a render pass is pending.
    pub fn needs_redraw(&self) -> bool {
        self.state.needs_redraw()
    }

    /// Whether a user selection is waiting for its fill transition to end.
    pub fn animation_in_flight(&self) -> bool {
        self.state.animation_in_flight()
    }

    /// Node centers of the last render, in logical coordinates. Empty until
    /// the first render after a change of bounds, style or node count.
    pub fn center_points(&self) -> &[Point] {
        &self.centers
    }

    /// The most recent mask transition.
    pub fn mask_transition(&self) -> Option<&MaskTransition> {
        self.transition.as_ref()
    }

    /// Applies a touch at `location` (in output coordinates).
    ///
    /// Touches are ignored while the layout is stale, from a change of
    /// bounds, style or node count until the next render. Returns the newly selected index, or `None` when the touch changed
    /// nothing.
    pub fn handle_gesture(&mut self, location: Point, phase: GesturePhase) -> Option<usize> {
        let location = if self.style.is_rtl {
            point(mirror_x(self.bounds, location.x), location.y)
        } else {
            location
        };

        let candidate = resolve_touch(location, &self.centers, phase)?;
        if candidate == self.state.current_index() {
            return None;
        }
        if !self.delegate.can_select(candidate) {
            debug!(candidate, "selection refused by delegate");
            return None;
        }

        if self
            .state
            .completed_till_index()
            .is_none_or(|completed| candidate > completed)
        {
            self.state.set_completed_till_index(Some(candidate)).ok()?;
        }
        self.state
            .set_current_index(candidate, &*self.delegate)
            .ok()?;
        self.state.begin_user_transition();
        debug!(index = candidate, ?phase, "selected by touch");
        Some(candidate)
    }

    /// Builds the scene for the current state and starts the mask transition
    /// towards the completed index.
    ///
    /// Returns `None` while the bounds are empty; the redraw request stays
    /// pending until they are set.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn render(&mut self, now: Instant) -> Option<Scene> {
        if self.bounds.width() <= 0.0 || self.bounds.height() <= 0.0 {
            debug!(bounds = ?self.bounds, "skipping render of empty bounds");
            return None;
        }

        self.state.begin_render();
        let metrics = self.style.resolve(self.bounds.height());
        let centers = match layout_nodes(
            self.bounds,
            self.state.number_of_points(),
            metrics.radius,
            metrics.progress_radius,
        ) {
            Ok(centers) => centers,
            Err(err) => {
                warn!(%err, "node layout failed");
                return None;
            }
        };
        self.centers = centers;
        self.metrics = Some(metrics);

        if !self.state.animation_in_flight() || self.static_layers.is_empty() {
            self.static_layers = self.build_static_layers(&metrics);
        }

        let mask = self.start_transition(now, &metrics);

        let context = LabelContext {
            style: &self.style,
            progress_radius: metrics.progress_radius,
            current_index: self.state.current_index(),
            completed_till_index: self.state.completed_till_index(),
        };
        let labels = self
            .labels
            .layout(&self.centers, &context, &*self.delegate, &*self.measurer);

        let scene = Scene {
            bounds: self.bounds,
            node_centers: self.centers.clone(),
            layers: self.static_layers.clone(),
            mask,
            labels,
            transform: self.style.is_rtl.then(|| mirror_transform(self.bounds)),
        };

        if self
            .transition
            .as_ref()
            .is_some_and(|transition| transition.is_finished(now))
        {
            self.complete_transition();
        }

        self.state.end_render();
        trace!(
            layers = scene.layers.len(),
            labels = scene.labels.len(),
            "rendered scene"
        );
        Some(scene)
    }

    /// Samples the progress mask at `now` and delivers `did_select` once the
    /// transition started by a touch has ended.
    pub fn advance(&mut self, now: Instant) -> MaskFrame {
        let Some(transition) = &self.transition else {
            return MaskFrame {
                mask: Path::new(),
                finished: true,
            };
        };

        let center = transition.center_at(now);
        let finished = transition.is_finished(now);
        let mask = self.mask_path(center);
        if finished {
            self.complete_transition();
        }
        MaskFrame { mask, finished }
    }

    /// Renders when a redraw is pending, then updates the mask on `canvas`.
    ///
    /// # Errors
    ///
    /// Whatever the canvas reports.
    pub fn present<C: VectorCanvas>(
        &mut self,
        canvas: &mut C,
        now: Instant,
    ) -> std::result::Result<MaskFrame, C::Error> {
        if self.state.needs_redraw()
            && let Some(scene) = self.render(now)
        {
            canvas.present(&scene)?;
        }
        let frame = self.advance(now);
        canvas.update_mask(&frame.mask)?;
        Ok(frame)
    }

    fn start_transition(&mut self, now: Instant, metrics: &ResolvedMetrics) -> MaskAnimation {
        let from = self
            .transition
            .as_ref()
            .and_then(|transition| transition.center_at(now));
        let to = self
            .state
            .completed_till_index()
            .and_then(|index| self.centers.get(index).copied());
        let steps = self.state.steps_crossed();
        let duration = self
            .style
            .step_animation_duration
            .saturating_mul(u32::try_from(steps).unwrap_or(u32::MAX));

        let transition =
            MaskTransition::new(from, to, now, duration, self.style.step_timing_curve);
        if self.state.animation_in_flight() {
            self.awaiting_completion = true;
        }
        debug!(
            ?from,
            ?to,
            steps,
            duration_ms = transition.duration.as_millis() as u64,
            "mask transition started"
        );

        let mask = MaskAnimation {
            from: self.mask_path_with(from, metrics),
            to: self.mask_path_with(to, metrics),
            duration: transition.duration,
            curve: transition.curve,
        };
        self.transition = Some(transition);
        mask
    }

    fn complete_transition(&mut self) {
        if !std::mem::take(&mut self.awaiting_completion) {
            return;
        }
        if self.state.finish_user_transition() {
            let index = self.state.current_index();
            debug!(index, "selection transition finished");
            self.delegate.did_select(index);
            self.state.request_redraw();
        }
    }

    fn mask_path(&self, center: Option<Point>) -> Path {
        match &self.metrics {
            Some(metrics) => self.mask_path_with(center, metrics),
            None => Path::new(),
        }
    }

    fn mask_path_with(&self, center: Option<Point>, metrics: &ResolvedMetrics) -> Path {
        center.map_or_else(Path::new, |center| {
            progress_mask_path(
                self.bounds,
                center,
                metrics.progress_radius,
                metrics.progress_line_height,
            )
        })
    }

    fn build_static_layers(&self, metrics: &ResolvedMetrics) -> Vec<ShapeLayer> {
        let style = &self.style;
        let centers = &self.centers;
        let use_last_state = self.state.use_last_state();
        let current = centers[self.state.current_index().min(centers.len() - 1)];
        let pr = metrics.progress_radius;
        let selected_ring_width = metrics.selected_ring_width;
        let last_state_ring_width = metrics.last_state_ring_width;

        let mut layers = Vec::with_capacity(10);
        layers.push(ShapeLayer::filled(
            LayerRole::ClearCenters,
            capsule_path(
                centers,
                metrics.larger_radius() + metrics.larger_ring_width(),
                metrics.line_height,
            ),
            style.view_background_color,
        ));
        layers.push(ShapeLayer::filled(
            LayerRole::Background,
            capsule_path(centers, metrics.radius, metrics.line_height),
            style.background_shape_color,
        ));
        layers.push(
            ShapeLayer::filled(
                LayerRole::Progress,
                capsule_path(centers, pr, metrics.progress_line_height),
                style.selected_background_color,
            )
            .masked(),
        );
        layers.push(ShapeLayer::filled(
            LayerRole::ClearSelection,
            selection_disc_path(current, pr.max(pr + selected_ring_width)),
            style.view_background_color,
        ));

        let ring_radius = if use_last_state {
            pr + selected_ring_width
        } else {
            pr
        };
        layers.push(ShapeLayer::stroked(
            LayerRole::SelectionRing,
            selection_disc_path(current, ring_radius),
            style.selected_ring_color(),
            selected_ring_width,
        ));
        layers.push(ShapeLayer::filled(
            LayerRole::Selection,
            selection_disc_path(current, metrics.radius),
            style.current_selected_center_color,
        ));

        if !use_last_state {
            return layers;
        }

        let current_index = self.state.current_index();
        if current_index > 0
            && let Some(road) = road_to_selection_path(
                centers[current_index - 1],
                current,
                pr,
                selected_ring_width,
            )
        {
            layers.push(ShapeLayer::stroked(
                LayerRole::RoadToSelection,
                road,
                style.selected_background_color,
                metrics.progress_line_height,
            ));
        }

        if let Some(last) = self
            .state
            .completed_till_index()
            .and_then(|index| centers.get(index).copied())
        {
            layers.push(ShapeLayer::filled(
                LayerRole::ClearLastState,
                last_state_ring_path(last, pr + last_state_ring_width, last_state_ring_width),
                style.view_background_color,
            ));
            layers.push(
                ShapeLayer::stroked(
                    LayerRole::LastStateRing,
                    last_state_ring_path(last, pr, last_state_ring_width),
                    style.last_state_ring_color(),
                    last_state_ring_width,
                )
                .with_fill(style.view_background_color),
            );
            layers.push(ShapeLayer::filled(
                LayerRole::LastStateCenter,
                selection_disc_path(last, metrics.radius),
                style.last_state_center_color(),
            ));
        }

        layers
    }
}

impl std::fmt::Debug for SteppedProgressBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SteppedProgressBar")
            .field("state", &self.state)
            .field("bounds", &self.bounds)
            .field("centers", &self.centers)
            .field("transition", &self.transition)
            .finish_non_exhaustive()
    }
}
