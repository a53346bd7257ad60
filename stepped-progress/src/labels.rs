//! Caption layout around the step nodes.
//!
//! Every node can carry three captions: above, below and inside the node.
//! The text comes from the delegate, its size from a [`TextMeasurer`], and
//! the resulting frames are expressed in the same logical space as the node
//! layout. Measured sizes are cached per `(index, position)` and reused as
//! long as neither the text nor the font changes.

use std::sync::Arc;

use lyon_path::math::{Box2D, Point, Size, point, size};
use rustc_hash::FxHashMap;

use crate::{
    color::Color,
    delegate::SteppedProgressDelegate,
    style::{FontSpec, FontWeight, LabelAlignment, SteppedProgressStyle},
};

/// Where a caption sits relative to its node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextPosition {
    /// Above the node.
    Top,
    /// Below the node.
    Bottom,
    /// Inside the node.
    Center,
}

/// An image drawn in place of a caption.
///
/// The engine never decodes images; `key` identifies the asset for the
/// backend and `size` is used for placement.
#[derive(Clone, Debug, PartialEq)]
pub struct StepImage {
    /// Backend-specific asset key.
    pub key: Arc<str>,
    /// Display size.
    pub size: Size,
}

/// Measures captions for placement.
pub trait TextMeasurer {
    /// Size of `text` rendered with `font`.
    fn measure(&self, text: &str, font: &FontSpec) -> Size;
}

/// A measurer that estimates sizes from the font size alone.
///
/// Good enough for headless use and tests; real backends should measure
/// with their text shaper.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproximateTextMeasurer;

impl TextMeasurer for ApproximateTextMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> Size {
        let advance = match font.weight {
            FontWeight::Bold => 0.62,
            FontWeight::Regular | FontWeight::Medium => 0.6,
        };
        size(
            text.chars().count() as f32 * advance * font.size,
            1.2 * font.size,
        )
    }
}

/// What a caption displays.
#[derive(Clone, Debug, PartialEq)]
pub enum LabelContent {
    /// A text caption.
    Text(String),
    /// An image supplied by the delegate.
    Image(StepImage),
}

/// A positioned caption ready for the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelLayer {
    /// Node index.
    pub index: usize,
    /// Caption position.
    pub position: TextPosition,
    /// Text or image.
    pub content: LabelContent,
    /// Font used for text content.
    pub font: FontSpec,
    /// Text colour.
    pub color: Color,
    /// Frame in logical coordinates.
    pub frame: Box2D,
    /// Alignment of the text inside the frame.
    pub alignment: LabelAlignment,
    /// The backend must flip the caption back so it stays readable under a
    /// mirrored scene.
    pub counter_mirrored: bool,
}

/// Per-render inputs of the caption layout.
#[derive(Clone, Copy, Debug)]
pub struct LabelContext<'a> {
    /// Style of the control.
    pub style: &'a SteppedProgressStyle,
    /// Resolved progress radius.
    pub progress_radius: f32,
    /// Current index.
    pub current_index: usize,
    /// Completed index, if any.
    pub completed_till_index: Option<usize>,
}

#[derive(Clone, Debug)]
struct CachedLabel {
    text: String,
    font: FontSpec,
    size: Size,
}

/// Lays out captions and caches their measured sizes.
#[derive(Debug, Default)]
pub struct LabelLayout {
    cache: FxHashMap<(usize, TextPosition), CachedLabel>,
}

impl LabelLayout {
    /// An empty layout cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached measurements.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Drops cached entries for nodes at or after `number_of_points`.
    pub fn retain_points(&mut self, number_of_points: usize) {
        self.cache.retain(|(index, _), _| *index < number_of_points);
    }

    /// Drops every cached measurement.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Lays out the top, bottom and (when enabled) center captions of every
    /// node.
    pub fn layout(
        &mut self,
        centers: &[Point],
        context: &LabelContext<'_>,
        delegate: &dyn SteppedProgressDelegate,
        measurer: &dyn TextMeasurer,
    ) -> Vec<LabelLayer> {
        let style = context.style;
        let mut layers = Vec::with_capacity(centers.len() * 3);

        for position in [TextPosition::Top, TextPosition::Bottom, TextPosition::Center] {
            if position == TextPosition::Center && !style.display_step_text {
                continue;
            }
            for (index, center) in centers.iter().enumerate() {
                let (content, label_size) =
                    self.content_for(index, position, context, delegate, measurer);
                layers.push(LabelLayer {
                    index,
                    position,
                    content,
                    font: font_for(style, position).clone(),
                    color: color_for(index, position, context),
                    frame: frame_for(*center, label_size, position, context),
                    alignment: alignment_for(style, position),
                    counter_mirrored: style.is_rtl,
                });
            }
        }
        layers
    }

    fn content_for(
        &mut self,
        index: usize,
        position: TextPosition,
        context: &LabelContext<'_>,
        delegate: &dyn SteppedProgressDelegate,
        measurer: &dyn TextMeasurer,
    ) -> (LabelContent, Size) {
        if let Some(image) = delegate.image_at(index, position) {
            let image_size = image.size;
            return (LabelContent::Image(image), image_size);
        }

        let text = delegate.text_at(index, position);
        let font = font_for(context.style, position);
        let cached = self
            .cache
            .get(&(index, position))
            .filter(|entry| entry.text == text && entry.font == *font)
            .map(|entry| entry.size);

        let text_size = match cached {
            Some(text_size) => text_size,
            None => {
                let text_size = measurer.measure(&text, font);
                self.cache.insert(
                    (index, position),
                    CachedLabel {
                        text: text.clone(),
                        font: font.clone(),
                        size: text_size,
                    },
                );
                text_size
            }
        };
        (LabelContent::Text(text), text_size)
    }
}

fn font_for(style: &SteppedProgressStyle, position: TextPosition) -> &FontSpec {
    match position {
        TextPosition::Center => &style.center_text_font,
        TextPosition::Top | TextPosition::Bottom => &style.step_text_font,
    }
}

fn alignment_for(style: &SteppedProgressStyle, position: TextPosition) -> LabelAlignment {
    match position {
        TextPosition::Top => style.label_top_alignment,
        TextPosition::Bottom => style.label_bottom_alignment,
        TextPosition::Center => LabelAlignment::Center,
    }
}

fn color_for(index: usize, position: TextPosition, context: &LabelContext<'_>) -> Color {
    let style = context.style;
    match position {
        TextPosition::Center => {
            if index == context.current_index || Some(index) == context.completed_till_index {
                style.center_dark_background_text_color
            } else {
                style.center_text_color()
            }
        }
        TextPosition::Top | TextPosition::Bottom => {
            if index == context.current_index {
                style.current_selected_text_color()
            } else {
                style.step_text_color
            }
        }
    }
}

fn frame_for(
    center: Point,
    label_size: Size,
    position: TextPosition,
    context: &LabelContext<'_>,
) -> Box2D {
    let style = context.style;
    let x = center.x - label_size.width / 2.0;
    let y = center.y - label_size.height / 2.0;
    let offset = context.progress_radius + style.text_distance;

    let (origin, height) = match position {
        TextPosition::Center => (point(x, y), label_size.height),
        TextPosition::Top => (
            point(x, y - offset),
            label_size.height * style.label_top_height_multiplier,
        ),
        TextPosition::Bottom => (
            point(x, y + offset),
            label_size.height * style.label_bottom_height_multiplier,
        ),
    };
    Box2D::from_origin_and_size(origin, size(label_size.width, height))
}
