//! Headless walkthrough of the stepped progress bar.
//!
//! Drives a control with a simulated 60 Hz clock, presents every frame to a
//! [`MeshCanvas`] and logs what happens. Run with `RUST_LOG=debug` to see the
//! engine's own events.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use lyon_path::math::{Box2D, point};
use parking_lot::Mutex;
use stepped_progress::{
    CallbackDelegate, Color, GesturePhase, SteppedProgressBar, SteppedProgressError, TextPosition,
    mesh::MeshCanvas, style::SteppedProgressStyleBuilder,
};
use tracing::info;

const FRAME: Duration = Duration::from_micros(16_667);

/// Installs the tracing subscriber, honouring `RUST_LOG` when set.
pub fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new("error,stepped_progress=debug") {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}

/// Runs the walkthrough.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let selections = Arc::new(Mutex::new(Vec::new()));
    let sink = selections.clone();
    let delegate = CallbackDelegate::new()
        .on_did_select(move |index| sink.lock().push(index))
        .on_can_select(|index| index != 4)
        .on_text_at(|index, position| match position {
            TextPosition::Top => Some(format!("Step {}", index + 1)),
            TextPosition::Bottom => None,
            TextPosition::Center => Some(String::new()),
        });

    let style = SteppedProgressStyleBuilder::default()
        .number_of_points(5)
        .radius(14.0)
        .progress_radius(18.0)
        .line_height(8.0)
        .progress_line_height(4.0)
        .background_shape_color(Color::from_rgba_u8(210, 214, 222, 255).with_alpha(0.9))
        .build()?;
    let mut bar = SteppedProgressBar::new(style)?.with_delegate(delegate);
    bar.set_bounds(Box2D::new(point(0.0, 0.0), point(360.0, 60.0)));

    let mut canvas = MeshCanvas::default();
    let mut now = Instant::now();
    bar.present(&mut canvas, now)?;
    info!(
        layers = canvas.layers().len(),
        vertices = canvas.vertex_count(),
        "initial frame"
    );

    let centers = bar.center_points().to_vec();
    for (target, phase) in [
        (3, GesturePhase::Ended),
        (1, GesturePhase::Changed),
        (4, GesturePhase::Ended),
    ] {
        let touch = centers[target];
        match bar.handle_gesture(point(touch.x + 3.0, touch.y - 2.0), phase) {
            Some(index) => info!(index, "touch selected a node"),
            None => info!(target, "touch ignored"),
        }
        now = drive_until_settled(&mut bar, &mut canvas, now)?;
    }

    bar.set_use_last_state(true);
    bar.set_completed_till_index(Some(3))?;
    bar.set_current_index(2)?;
    now = drive_until_settled(&mut bar, &mut canvas, now)?;
    info!(
        current = bar.current_index(),
        completed = ?bar.completed_till_index(),
        layers = canvas.layers().len(),
        "last state shown"
    );

    if let Err(err) = bar.set_current_index(9) {
        info!(%err, "out of range index rejected");
    }
    drive_until_settled(&mut bar, &mut canvas, now)?;

    let selections = selections.lock().clone();
    info!(?selections, "walkthrough finished");
    Ok(())
}

fn drive_until_settled(
    bar: &mut SteppedProgressBar,
    canvas: &mut MeshCanvas,
    mut now: Instant,
) -> Result<Instant, SteppedProgressError> {
    let mut frames = 0u32;
    loop {
        let frame = bar.present(canvas, now)?;
        frames += 1;
        if frame.finished && !bar.needs_redraw() {
            break;
        }
        now += FRAME;
    }
    info!(
        frames,
        mask_vertices = canvas.mask().vertices.len(),
        "animation settled"
    );
    Ok(now)
}
