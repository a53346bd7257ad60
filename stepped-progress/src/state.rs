//! Selection state of the stepped progress bar.
//!
//! [`ProgressState`] owns the two cursors of the control: the live
//! `current_index` and the `completed_till_index` high-water mark. Setters
//! validate their input and raise a redraw request; nothing is redrawn until
//! the host calls [`crate::SteppedProgressBar::render`], so several
//! mutations in one frame collapse into a single render pass.

use tracing::{debug, warn};

use crate::{
    delegate::SteppedProgressDelegate,
    error::{Result, SteppedProgressError},
    geometry::MIN_POINTS,
};

/// Two-cursor progress state plus the bookkeeping of the render loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressState {
    number_of_points: usize,
    current_index: usize,
    completed_till_index: Option<usize>,
    previous_index: Option<usize>,
    use_last_state: bool,
    animation_in_flight: bool,
    needs_redraw: bool,
}

impl ProgressState {
    /// A state with `number_of_points` nodes, the first one selected and
    /// nothing completed.
    ///
    /// # Errors
    ///
    /// [`SteppedProgressError::TooFewPoints`] when `number_of_points < 2`.
    pub fn new(number_of_points: usize) -> Result<Self> {
        ensure_point_count(number_of_points)?;
        Ok(Self {
            number_of_points,
            current_index: 0,
            completed_till_index: None,
            previous_index: Some(0),
            use_last_state: false,
            animation_in_flight: false,
            needs_redraw: true,
        })
    }

    /// Number of nodes.
    pub fn number_of_points(&self) -> usize {
        self.number_of_points
    }

    /// The live selection cursor.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The last completed node, `None` when nothing is completed.
    pub fn completed_till_index(&self) -> Option<usize> {
        self.completed_till_index
    }

    /// The completed index of the previous render pass.
    pub fn previous_index(&self) -> Option<usize> {
        self.previous_index
    }

    /// Whether the last-state cursor is tracked separately.
    pub fn use_last_state(&self) -> bool {
        self.use_last_state
    }

    /// Whether a user-driven fill transition is still running.
    pub fn animation_in_flight(&self) -> bool {
        self.animation_in_flight
    }

    /// Whether a render pass has been requested.
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Requests a render pass.
    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Moves the live cursor to `index`.
    ///
    /// `delegate.will_select` is called before the state changes. Selecting
    /// the current index again is a no-op without notification.
    ///
    /// # Errors
    ///
    /// [`SteppedProgressError::IndexOutOfRange`] when `index` is not a node.
    pub fn set_current_index(
        &mut self,
        index: usize,
        delegate: &dyn SteppedProgressDelegate,
    ) -> Result<()> {
        self.check_index(index)?;
        if index == self.current_index {
            return Ok(());
        }

        delegate.will_select(index);
        debug!(from = self.current_index, to = index, "current index changed");
        self.current_index = index;
        self.needs_redraw = true;
        Ok(())
    }

    /// Sets the completed high-water mark.
    ///
    /// # Errors
    ///
    /// [`SteppedProgressError::IndexOutOfRange`] when `index` is not a node.
    pub fn set_completed_till_index(&mut self, index: Option<usize>) -> Result<()> {
        if let Some(index) = index {
            self.check_index(index)?;
        }
        if index != self.completed_till_index {
            debug!(from = ?self.completed_till_index, to = ?index, "completed index changed");
        }
        self.completed_till_index = index;
        self.needs_redraw = true;
        Ok(())
    }

    /// Enables or disables the separate last-state cursor.
    pub fn set_use_last_state(&mut self, use_last_state: bool) {
        self.use_last_state = use_last_state;
        self.needs_redraw = true;
    }

    /// Changes the number of nodes, clamping both cursors into range.
    ///
    /// # Errors
    ///
    /// [`SteppedProgressError::TooFewPoints`] when `number_of_points < 2`.
    pub fn set_number_of_points(&mut self, number_of_points: usize) -> Result<()> {
        ensure_point_count(number_of_points)?;
        let last = number_of_points - 1;
        self.number_of_points = number_of_points;
        self.current_index = self.current_index.min(last);
        self.completed_till_index = self.completed_till_index.map(|i| i.min(last));
        self.previous_index = self.previous_index.map(|i| i.min(last));
        self.needs_redraw = true;
        Ok(())
    }

    /// Marks a user-driven transition as started.
    pub fn begin_user_transition(&mut self) {
        self.animation_in_flight = true;
    }

    /// Clears the user-driven transition flag, returning whether it was set.
    pub fn finish_user_transition(&mut self) -> bool {
        std::mem::take(&mut self.animation_in_flight)
    }

    /// Starts a render pass: collapses the cursors when the last state is not
    /// tracked and clears the redraw request.
    pub fn begin_render(&mut self) {
        if !self.use_last_state {
            self.completed_till_index = Some(self.current_index);
        }
        self.needs_redraw = false;
    }

    /// Ends a render pass, remembering what was rendered.
    pub fn end_render(&mut self) {
        self.previous_index = self.completed_till_index;
    }

    /// Number of steps between the completed index and the previously
    /// rendered one, counting "nothing completed" as `-1`.
    pub fn steps_crossed(&self) -> usize {
        let as_signed = |index: Option<usize>| index.map_or(-1, |i| i as isize);
        as_signed(self.completed_till_index).abs_diff(as_signed(self.previous_index))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.number_of_points {
            return Ok(());
        }
        warn!(
            index,
            number_of_points = self.number_of_points,
            "rejected out of range index"
        );
        Err(SteppedProgressError::IndexOutOfRange {
            index,
            number_of_points: self.number_of_points,
        })
    }
}

fn ensure_point_count(number_of_points: usize) -> Result<()> {
    if number_of_points < MIN_POINTS {
        return Err(SteppedProgressError::TooFewPoints {
            requested: number_of_points,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::delegate::{CallbackDelegate, DefaultDelegate};

    #[test]
    fn test_new_rejects_degenerate_topology() {
        assert!(matches!(
            ProgressState::new(1),
            Err(SteppedProgressError::TooFewPoints { requested: 1 })
        ));
        let state = ProgressState::new(2).expect("two points");
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.completed_till_index(), None);
        assert!(state.needs_redraw());
    }

    #[test]
    fn test_will_select_fires_before_mutation() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let delegate = CallbackDelegate::new().on_will_select(move |i| sink.lock().push(i));
        let mut state = ProgressState::new(4).expect("four points");

        state.set_current_index(2, &delegate).expect("in range");
        state.set_current_index(2, &delegate).expect("in range");
        assert_eq!(*seen.lock(), vec![2]);
        assert_eq!(state.current_index(), 2);
    }

    #[test]
    fn test_out_of_range_is_rejected_without_change() {
        let mut state = ProgressState::new(3).expect("three points");
        let err = state
            .set_current_index(3, &DefaultDelegate)
            .expect_err("index 3 is out of range");
        assert!(matches!(
            err,
            SteppedProgressError::IndexOutOfRange {
                index: 3,
                number_of_points: 3
            }
        ));
        assert!(state.set_completed_till_index(Some(5)).is_err());
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.completed_till_index(), None);
    }

    #[test]
    fn test_render_collapses_cursors_without_last_state() {
        let mut state = ProgressState::new(5).expect("five points");
        state.set_current_index(3, &DefaultDelegate).expect("in range");
        state.begin_render();
        assert_eq!(state.completed_till_index(), Some(3));
        assert!(!state.needs_redraw());

        state.set_use_last_state(true);
        state.set_completed_till_index(Some(4)).expect("in range");
        state.begin_render();
        assert_eq!(state.completed_till_index(), Some(4));
        assert_eq!(state.current_index(), 3);
    }

    #[test]
    fn test_steps_crossed() {
        let mut state = ProgressState::new(5).expect("five points");
        state.set_current_index(2, &DefaultDelegate).expect("in range");
        state.begin_render();
        assert_eq!(state.steps_crossed(), 2);
        state.end_render();
        assert_eq!(state.steps_crossed(), 0);

        state.set_use_last_state(true);
        state.set_completed_till_index(None).expect("none is valid");
        assert_eq!(state.steps_crossed(), 3);
    }

    #[test]
    fn test_shrinking_clamps_cursors() {
        let mut state = ProgressState::new(6).expect("six points");
        state.set_use_last_state(true);
        state.set_current_index(5, &DefaultDelegate).expect("in range");
        state.set_completed_till_index(Some(4)).expect("in range");
        state.set_number_of_points(3).expect("three points");
        assert_eq!(state.current_index(), 2);
        assert_eq!(state.completed_till_index(), Some(2));
        assert!(state.set_number_of_points(0).is_err());
        assert_eq!(state.number_of_points(), 3);
    }

    #[test]
    fn test_user_transition_flag() {
        let mut state = ProgressState::new(3).expect("three points");
        assert!(!state.finish_user_transition());
        state.begin_user_transition();
        assert!(state.animation_in_flight());
        assert!(state.finish_user_transition());
        assert!(!state.animation_in_flight());
    }
}
