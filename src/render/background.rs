use tiny_skia::{LinearGradient, PathBuilder, Point, Rect, SpreadMode, Transform};
use tracing::debug;

use super::canvas::Canvas;
use crate::config::{Background, Direction, GradientStop};
use crate::error::{Error, Result};

/// Paints the whole canvas according to `background`.
pub fn draw_background(canvas: &mut Canvas, background: &Background) -> Result<()> {
    match background {
        Background::Transparent => Ok(()),
        Background::Filled(color) => {
            canvas.fill(*color);
            Ok(())
        }
        Background::Gradient { stops, direction } => {
            draw_gradient(canvas, stops, *direction)
        }
    }
}

fn draw_gradient(canvas: &mut Canvas, stops: &[GradientStop], direction: Direction) -> Result<()> {
    let (width, height) = (canvas.width() as f32, canvas.height() as f32);
    let (start, end) = gradient_line(direction, width, height);
    let skia_stops = stops
        .iter()
        .map(|stop| tiny_skia::GradientStop::new(stop.position, stop.color.to_skia()))
        .collect();
    let shader = LinearGradient::new(start, end, skia_stops, SpreadMode::Pad, Transform::identity())
        .ok_or_else(|| Error::generation("background gradient is degenerate"))?;
    let rect = Rect::from_xywh(0.0, 0.0, width, height)
        .ok_or_else(|| Error::generation("canvas has no area"))?;
    debug!(?direction, stops = stops.len(), "painting gradient background");
    canvas.fill_shader(&PathBuilder::from_rect(rect), shader, None);
    Ok(())
}

/// Start and end points spanning the canvas edge to edge (or corner to
/// corner) in `direction`.
pub fn gradient_line(direction: Direction, width: f32, height: f32) -> (Point, Point) {
    let p = Point::from_xy;
    match direction {
        Direction::ToBottom => (p(0.0, 0.0), p(0.0, height)),
        Direction::ToTop => (p(0.0, height), p(0.0, 0.0)),
        Direction::ToRight => (p(0.0, 0.0), p(width, 0.0)),
        Direction::ToLeft => (p(width, 0.0), p(0.0, 0.0)),
        Direction::ToBottomRight => (p(0.0, 0.0), p(width, height)),
        Direction::ToBottomLeft => (p(width, 0.0), p(0.0, height)),
        Direction::ToTopRight => (p(0.0, height), p(width, 0.0)),
        Direction::ToTopLeft => (p(width, height), p(0.0, 0.0)),
    }
}
