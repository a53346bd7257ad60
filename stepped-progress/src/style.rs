//! Style configuration for the stepped progress bar.
//!
//! [`SteppedProgressStyle`] is a read-only value owned by the host. Sizes left
//! at `0.0` (or set larger than the bounds allow) fall back to values derived
//! from the control's height, see [`ResolvedMetrics`].

use std::time::Duration;

use derive_builder::Builder;

use crate::{animation::TimingCurve, color::Color};

pub use crate::labels::TextPosition;

/// Weight of a caption font.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Regular,
    /// Medium weight.
    Medium,
    /// Bold weight.
    Bold,
}

/// Font description handed to the text measurer and to the backend.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontSpec {
    /// Family name, `None` selects the platform's system font.
    pub family: Option<String>,
    /// Point size.
    pub size: f32,
    /// Weight.
    pub weight: FontWeight,
}

impl FontSpec {
    /// The system font at the given size and weight.
    pub fn system(size: f32, weight: FontWeight) -> Self {
        Self {
            family: None,
            size,
            weight,
        }
    }

    /// A named family at the given size and weight.
    pub fn named(family: impl Into<String>, size: f32, weight: FontWeight) -> Self {
        Self {
            family: Some(family.into()),
            size,
            weight,
        }
    }
}

/// Horizontal alignment of a caption inside its frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LabelAlignment {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
    /// Justified.
    Justified,
    /// Platform natural alignment.
    Natural,
}

/// Style of a [`crate::SteppedProgressBar`].
///
/// Build it with [`SteppedProgressStyleBuilder`] or start from
/// [`SteppedProgressStyle::default`]. Colours left as `None` resolve through
/// the accessor methods (for instance [`SteppedProgressStyle::selected_ring_color`]).
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(pattern = "owned")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SteppedProgressStyle {
    /// Number of step nodes. Must be at least 2.
    #[builder(default = "3")]
    pub number_of_points: usize,
    /// Node radius, `0.0` means half of the control height.
    #[builder(default = "0.0")]
    pub radius: f32,
    /// Radius of the filled progress nodes, `0.0` means half of the control height.
    #[builder(default = "0.0")]
    pub progress_radius: f32,
    /// Height of the band joining the nodes, `0.0` means 40% of the control height.
    #[builder(default = "0.0")]
    pub line_height: f32,
    /// Height of the filled band, `0.0` means the resolved line height.
    #[builder(default = "0.0")]
    pub progress_line_height: f32,
    /// Stroke width of the ring around the current node.
    #[builder(default = "3.0")]
    pub selected_ring_width: f32,
    /// Stroke width of the ring around the last completed node.
    #[builder(default = "5.0")]
    pub last_state_ring_width: f32,
    /// Distance between a node and its top or bottom caption.
    #[builder(default = "20.0")]
    pub text_distance: f32,
    /// Duration of the fill animation for one step.
    #[builder(default = "Duration::from_millis(400)")]
    #[cfg_attr(feature = "serde", serde(with = "duration_millis"))]
    pub step_animation_duration: Duration,
    /// Timing curve of the fill animation.
    #[builder(default)]
    pub step_timing_curve: TimingCurve,
    /// Draw the captions inside the nodes.
    #[builder(default = "true")]
    pub display_step_text: bool,
    /// Mirror the rendered output for right-to-left layouts.
    #[builder(default = "false")]
    pub is_rtl: bool,
    /// Colour of the unfilled band.
    #[builder(default = "Color::BAND_GREY")]
    pub background_shape_color: Color,
    /// Colour of the progress fill.
    #[builder(default = "Color::PROGRESS_ORANGE")]
    pub selected_background_color: Color,
    /// Colour behind the control, used by the halo cutouts.
    #[builder(default = "Color::WHITE")]
    pub view_background_color: Color,
    /// Fill of the disc on the current node.
    #[builder(default = "Color::BLACK")]
    pub current_selected_center_color: Color,
    /// Ring around the current node. Defaults to the progress colour.
    #[builder(default, setter(strip_option))]
    pub selected_ring_color: Option<Color>,
    /// Ring around the last completed node. Defaults to the progress colour.
    #[builder(default, setter(strip_option))]
    pub last_state_ring_color: Option<Color>,
    /// Disc on the last completed node. Defaults to the band colour.
    #[builder(default, setter(strip_option))]
    pub last_state_center_color: Option<Color>,
    /// Colour of the top and bottom captions.
    #[builder(default = "Color::BLACK")]
    pub step_text_color: Color,
    /// Top and bottom caption of the current node. Defaults to the progress colour.
    #[builder(default, setter(strip_option))]
    pub current_selected_text_color: Option<Color>,
    /// Captions inside the nodes. Defaults to the step text colour.
    #[builder(default, setter(strip_option))]
    pub center_text_color: Option<Color>,
    /// Captions inside filled nodes.
    #[builder(default = "Color::WHITE")]
    pub center_dark_background_text_color: Color,
    /// Font of the top and bottom captions.
    #[builder(default = "FontSpec::named(\"HelveticaNeue-Medium\", 14.0, FontWeight::Medium)")]
    pub step_text_font: FontSpec,
    /// Font of the captions inside the nodes.
    #[builder(default = "FontSpec::system(15.0, FontWeight::Bold)")]
    pub center_text_font: FontSpec,
    /// Alignment of the top captions.
    #[builder(default)]
    pub label_top_alignment: LabelAlignment,
    /// Alignment of the bottom captions.
    #[builder(default)]
    pub label_bottom_alignment: LabelAlignment,
    /// Height multiplier of the top caption frames.
    #[builder(default = "1.0")]
    pub label_top_height_multiplier: f32,
    /// Height multiplier of the bottom caption frames.
    #[builder(default = "1.0")]
    pub label_bottom_height_multiplier: f32,
}

impl Default for SteppedProgressStyle {
    fn default() -> Self {
        SteppedProgressStyleBuilder::default()
            .build()
            .expect("SteppedProgressStyleBuilder has a default for every field")
    }
}

impl SteppedProgressStyle {
    /// Ring colour around the current node.
    pub fn selected_ring_color(&self) -> Color {
        self.selected_ring_color
            .unwrap_or(self.selected_background_color)
    }

    /// Ring colour around the last completed node.
    pub fn last_state_ring_color(&self) -> Color {
        self.last_state_ring_color
            .unwrap_or(self.selected_background_color)
    }

    /// Disc colour on the last completed node.
    pub fn last_state_center_color(&self) -> Color {
        self.last_state_center_color
            .unwrap_or(self.background_shape_color)
    }

    /// Caption colour of the current node.
    pub fn current_selected_text_color(&self) -> Color {
        self.current_selected_text_color
            .unwrap_or(self.selected_background_color)
    }

    /// Colour of the captions inside the nodes.
    pub fn center_text_color(&self) -> Color {
        self.center_text_color.unwrap_or(self.step_text_color)
    }

    /// Resolves the size fallbacks for a control of the given height.
    pub fn resolve(&self, bounds_height: f32) -> ResolvedMetrics {
        ResolvedMetrics::resolve(self, bounds_height)
    }
}

/// Sizes of a style after applying the fallbacks for a given control height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedMetrics {
    /// Node radius.
    pub radius: f32,
    /// Progress node radius.
    pub progress_radius: f32,
    /// Band height.
    pub line_height: f32,
    /// Progress band height, never above `line_height`.
    pub progress_line_height: f32,
    /// Stroke width of the selection ring.
    pub selected_ring_width: f32,
    /// Stroke width of the last-state ring.
    pub last_state_ring_width: f32,
}

impl ResolvedMetrics {
    fn resolve(style: &SteppedProgressStyle, bounds_height: f32) -> Self {
        let half_height = bounds_height / 2.0;
        let radius = fallback_if_invalid(style.radius, half_height, half_height);
        let progress_radius = fallback_if_invalid(style.progress_radius, half_height, half_height);
        let line_height = fallback_if_invalid(style.line_height, bounds_height, bounds_height * 0.4);
        let progress_line_height =
            fallback_if_invalid(style.progress_line_height, line_height, line_height);

        Self {
            radius,
            progress_radius,
            line_height,
            progress_line_height,
            selected_ring_width: style.selected_ring_width,
            last_state_ring_width: style.last_state_ring_width,
        }
    }

    /// The radius used for node spacing.
    pub fn larger_radius(&self) -> f32 {
        self.radius.max(self.progress_radius)
    }

    /// The wider of the two ring strokes.
    pub fn larger_ring_width(&self) -> f32 {
        self.selected_ring_width.max(self.last_state_ring_width)
    }
}

// Zero or above the limit selects the fallback.
fn fallback_if_invalid(value: f32, limit: f32, fallback: f32) -> f32 {
    if value == 0.0 || value > limit {
        fallback
    } else {
        value
    }
}

#[cfg(feature = "serde")]
mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sizes_fall_back_to_height() {
        let metrics = SteppedProgressStyle::default().resolve(40.0);
        assert_eq!(metrics.radius, 20.0);
        assert_eq!(metrics.progress_radius, 20.0);
        assert_eq!(metrics.line_height, 16.0);
        assert_eq!(metrics.progress_line_height, 16.0);
    }

    #[test]
    fn test_oversized_values_fall_back() {
        let style = SteppedProgressStyleBuilder::default()
            .radius(30.0)
            .progress_radius(12.0)
            .line_height(50.0)
            .progress_line_height(10.0)
            .build()
            .expect("builder defaults");
        let metrics = style.resolve(40.0);
        assert_eq!(metrics.radius, 20.0);
        assert_eq!(metrics.progress_radius, 12.0);
        assert_eq!(metrics.line_height, 16.0);
        assert_eq!(metrics.progress_line_height, 10.0);
        assert_eq!(metrics.larger_radius(), 20.0);
    }

    #[test]
    fn test_progress_line_height_clamps_to_line_height() {
        let style = SteppedProgressStyleBuilder::default()
            .line_height(8.0)
            .progress_line_height(12.0)
            .build()
            .expect("builder defaults");
        let metrics = style.resolve(40.0);
        assert_eq!(metrics.line_height, 8.0);
        assert_eq!(metrics.progress_line_height, 8.0);
    }

    #[test]
    fn test_optional_colors_resolve_to_palette() {
        let style = SteppedProgressStyle::default();
        assert_eq!(style.selected_ring_color(), Color::PROGRESS_ORANGE);
        assert_eq!(style.last_state_center_color(), Color::BAND_GREY);
        assert_eq!(style.center_text_color(), Color::BLACK);

        let style = SteppedProgressStyleBuilder::default()
            .selected_ring_color(Color::BLACK)
            .build()
            .expect("builder defaults");
        assert_eq!(style.selected_ring_color(), Color::BLACK);
    }

    #[test]
    fn test_timing_curve_defaults_to_ease_in_ease_out() {
        assert_eq!(
            SteppedProgressStyle::default().step_timing_curve,
            TimingCurve::EaseInEaseOut
        );
        let style = SteppedProgressStyleBuilder::default()
            .step_timing_curve(TimingCurve::Linear)
            .build()
            .expect("builder defaults");
        assert_eq!(style.step_timing_curve, TimingCurve::Linear);
    }

    #[test]
    fn test_default_ring_widths() {
        let metrics = SteppedProgressStyle::default().resolve(40.0);
        assert_eq!(metrics.larger_ring_width(), 5.0);
        assert_eq!(
            SteppedProgressStyle::default().step_animation_duration,
            Duration::from_millis(400)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_style_loads_from_partial_json() {
        let style: SteppedProgressStyle =
            serde_json::from_str(r#"{"number_of_points": 6, "step_animation_duration": 250}"#)
                .expect("valid style json");
        assert_eq!(style.number_of_points, 6);
        assert_eq!(style.step_animation_duration, Duration::from_millis(250));
        assert_eq!(style.radius, 0.0);
    }
}
