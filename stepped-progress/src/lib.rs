//! A stepped progress bar: N circular nodes on a horizontal line, joined by a
//! capsule-shaped band, with a selectable current index, an optional
//! "last state" high-water mark and an animated progress fill.
//!
//! The crate contains the engine of the control, not a widget toolkit. It
//! computes geometry with [`lyon_path`], keeps the selection state, resolves
//! touches into index changes and describes every frame as a plain-data
//! [`Scene`](scene::Scene) that any [`VectorCanvas`](scene::VectorCanvas)
//! backend can draw.
//!
//! # Usage
//!
//! ```
//! use std::time::Instant;
//!
//! use lyon_path::math::{Box2D, point};
//! use stepped_progress::{
//!     GesturePhase, SteppedProgressBar, style::SteppedProgressStyleBuilder,
//! };
//!
//! let style = SteppedProgressStyleBuilder::default()
//!     .number_of_points(5)
//!     .build()
//!     .expect("all style fields have defaults");
//! let mut bar = SteppedProgressBar::new(style).expect("five points is a valid topology");
//! bar.set_bounds(Box2D::new(point(0.0, 0.0), point(300.0, 40.0)));
//!
//! let now = Instant::now();
//! let scene = bar.render(now).expect("bounds are not empty");
//! assert_eq!(scene.node_centers.len(), 5);
//!
//! // Tap next to the third node.
//! let third = scene.node_centers[2];
//! bar.handle_gesture(point(third.x + 2.0, third.y), GesturePhase::Ended);
//! assert_eq!(bar.current_index(), 2);
//! ```
//!
//! # Driving animations
//!
//! [`SteppedProgressBar::render`] starts a mask transition whenever the
//! completed index changes. Call [`SteppedProgressBar::advance`] every frame
//! with the current [`Instant`](std::time::Instant) to sample the mask and to
//! deliver the `did_select` notification once the transition has finished.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod animation;
pub mod color;
pub mod delegate;
pub mod error;
pub mod geometry;
pub mod labels;
pub mod mesh;
pub mod progress_bar;
pub mod resolver;
pub mod scene;
pub mod state;
pub mod style;

pub use color::Color;
pub use delegate::{CallbackDelegate, SteppedProgressDelegate};
pub use error::SteppedProgressError;
pub use progress_bar::{MaskFrame, SteppedProgressBar};
pub use resolver::GesturePhase;
pub use scene::{Scene, VectorCanvas};
pub use state::ProgressState;
pub use style::{SteppedProgressStyle, TextPosition};
