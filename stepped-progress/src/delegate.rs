//! Delegate contract of the stepped progress bar.
//!
//! Every callback is optional. [`SteppedProgressDelegate`] gives each method
//! a default so implementors override only what they need, and
//! [`CallbackDelegate`] offers the same contract as a set of optional
//! closures.

use std::sync::Arc;

use crate::labels::{StepImage, TextPosition};

/// Receives selection notifications and supplies captions.
pub trait SteppedProgressDelegate: Send + Sync {
    /// Called before the current index changes to `index`.
    fn will_select(&self, index: usize) {
        let _ = index;
    }

    /// Called once the fill animation of a user selection has finished.
    fn did_select(&self, index: usize) {
        let _ = index;
    }

    /// Whether a touch may select `index`.
    fn can_select(&self, index: usize) -> bool {
        let _ = index;
        true
    }

    /// Caption for `index` at `position`. Defaults to the index itself.
    fn text_at(&self, index: usize, position: TextPosition) -> String {
        let _ = position;
        index.to_string()
    }

    /// Optional image drawn instead of the caption.
    fn image_at(&self, index: usize, position: TextPosition) -> Option<StepImage> {
        let _ = (index, position);
        None
    }
}

/// Delegate used when the host supplies none.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultDelegate;

impl SteppedProgressDelegate for DefaultDelegate {}

type IndexCallback = Arc<dyn Fn(usize) + Send + Sync>;
type PredicateCallback = Arc<dyn Fn(usize) -> bool + Send + Sync>;
type TextCallback = Arc<dyn Fn(usize, TextPosition) -> Option<String> + Send + Sync>;
type ImageCallback = Arc<dyn Fn(usize, TextPosition) -> Option<StepImage> + Send + Sync>;

/// A delegate assembled from optional closures.
///
/// # Example
///
/// ```
/// use stepped_progress::{CallbackDelegate, SteppedProgressDelegate};
///
/// let delegate = CallbackDelegate::new().on_can_select(|index| index < 3);
/// assert!(delegate.can_select(2));
/// assert!(!delegate.can_select(3));
/// assert_eq!(delegate.text_at(4, stepped_progress::TextPosition::Top), "4");
/// ```
#[derive(Clone, Default)]
pub struct CallbackDelegate {
    will_select: Option<IndexCallback>,
    did_select: Option<IndexCallback>,
    can_select: Option<PredicateCallback>,
    text_at: Option<TextCallback>,
    image_at: Option<ImageCallback>,
}

impl CallbackDelegate {
    /// A delegate with no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pre-selection callback.
    pub fn on_will_select(mut self, f: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.will_select = Some(Arc::new(f));
        self
    }

    /// Sets the post-animation selection callback.
    pub fn on_did_select(mut self, f: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.did_select = Some(Arc::new(f));
        self
    }

    /// Sets the selection predicate.
    pub fn on_can_select(mut self, f: impl Fn(usize) -> bool + Send + Sync + 'static) -> Self {
        self.can_select = Some(Arc::new(f));
        self
    }

    /// Sets the caption provider. Returning `None` keeps the numeric fallback.
    pub fn on_text_at(
        mut self,
        f: impl Fn(usize, TextPosition) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.text_at = Some(Arc::new(f));
        self
    }

    /// Sets the image provider.
    pub fn on_image_at(
        mut self,
        f: impl Fn(usize, TextPosition) -> Option<StepImage> + Send + Sync + 'static,
    ) -> Self {
        self.image_at = Some(Arc::new(f));
        self
    }
}

impl SteppedProgressDelegate for CallbackDelegate {
    fn will_select(&self, index: usize) {
        if let Some(f) = &self.will_select {
            f(index);
        }
    }

    fn did_select(&self, index: usize) {
        if let Some(f) = &self.did_select {
            f(index);
        }
    }

    fn can_select(&self, index: usize) -> bool {
        self.can_select.as_ref().is_none_or(|f| f(index))
    }

    fn text_at(&self, index: usize, position: TextPosition) -> String {
        self.text_at
            .as_ref()
            .and_then(|f| f(index, position))
            .unwrap_or_else(|| index.to_string())
    }

    fn image_at(&self, index: usize, position: TextPosition) -> Option<StepImage> {
        self.image_at.as_ref().and_then(|f| f(index, position))
    }
}

impl std::fmt::Debug for CallbackDelegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackDelegate")
            .field("will_select", &self.will_select.is_some())
            .field("did_select", &self.did_select.is_some())
            .field("can_select", &self.can_select.is_some())
            .field("text_at", &self.text_at.is_some())
            .field("image_at", &self.image_at.is_some())
            .finish()
    }
}
