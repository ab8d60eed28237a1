//! Window controls and the file tab.

use std::path::Path;

use image::{imageops, RgbaImage};
use tracing::debug;

use super::canvas::{circle, line, rounded_rect, Canvas};
use crate::color::Color;
use crate::config::{Styling, WindowControl};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{Error, Result};
use crate::layout::{baseline, Layout, CARD_PADDING};
use crate::text::Typeface;

const CONTROL_RADIUS: f32 = 6.0;
const CONTROL_SPACING: f32 = 12.0;
const CONTROL_OFFSET_Y: f32 = 20.0;
const CONTROL_OUTLINE_WIDTH: f32 = 1.0;
/// Width of the block the controls are centred in.
pub const CONTROLS_BLOCK_WIDTH: f32 = 76.0;
const CONTROL_COLORS: [u32; 3] = [0xff5f57, 0xfebc2e, 0x28c840];

const TAB_HEIGHT: f32 = 24.0;
const TAB_OFFSET_Y: f32 = 8.0;
const TAB_PADDING_X: f32 = 12.0;
const TAB_RADIUS: f32 = 12.0;
const TAB_FILL_ALPHA: f32 = 0.1;
const TAB_TEXT_COLOR: u32 = 0xd1d5db;
const ICON_SIZE: u32 = 16;
const ICON_GAP: f32 = 6.0;

const PLUS_OFFSET: f32 = 16.0;
const PLUS_SIZE: f32 = 8.0;
const PLUS_STROKE: f32 = 1.5;
const GLYPH_COLOR: u32 = 0x9ca3af;

/// Geometry of the drawn file tab, exposed for tests and callers that
/// annotate the image further.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

pub fn draw_chrome(
    canvas: &mut Canvas,
    layout: &Layout,
    styling: &Styling,
    face: &dyn Typeface,
    diagnostics: &mut Diagnostics,
) -> Result<Option<TabGeometry>> {
    if styling.shows_window_controls() {
        draw_window_controls(canvas, layout, styling.window_control);
    }
    let Some(name) = styling.file_name.as_deref().filter(|name| !name.is_empty()) else {
        return Ok(None);
    };
    let icon = styling.file_icon.as_deref().map(|path| match load_icon(path) {
        Ok(image) => Icon::Image(image),
        Err(Error::IconLoad { path, reason }) => {
            diagnostics.push(Diagnostic::IconFallback { path, reason });
            Icon::Fallback
        }
        Err(other) => {
            diagnostics.push(Diagnostic::IconFallback {
                path: path.to_path_buf(),
                reason: other.to_string(),
            });
            Icon::Fallback
        }
    });
    draw_file_tab(canvas, layout, styling, name, icon.as_ref(), face).map(Some)
}

/// Centres of the three controls.
pub fn control_centers(layout: &Layout) -> [(f32, f32); 3] {
    let mid = layout.card_x + CONTROLS_BLOCK_WIDTH / 2.0;
    let y = layout.card_y + CONTROL_OFFSET_Y;
    [
        (mid - CONTROL_SPACING, y),
        (mid, y),
        (mid + CONTROL_SPACING, y),
    ]
}

fn draw_window_controls(canvas: &mut Canvas, layout: &Layout, style: WindowControl) {
    for ((cx, cy), hex) in control_centers(layout).into_iter().zip(CONTROL_COLORS) {
        let color = Color::from_rgb(hex);
        match style {
            WindowControl::Filled => {
                if let Some(dot) = circle(cx, cy, CONTROL_RADIUS) {
                    canvas.fill_path(&dot, color);
                }
            }
            WindowControl::Outlined => {
                let radius = CONTROL_RADIUS - CONTROL_OUTLINE_WIDTH / 2.0;
                if let Some(ring) = circle(cx, cy, radius) {
                    canvas.stroke_path(&ring, color, CONTROL_OUTLINE_WIDTH);
                }
            }
            WindowControl::Hidden => {}
        }
    }
}

enum Icon {
    Image(RgbaImage),
    Fallback,
}

/// Decodes `path` and scales it to fit a 16x16 box, keeping its aspect ratio.
pub fn load_icon(path: &Path) -> Result<RgbaImage> {
    let fail = |reason: String| Error::IconLoad {
        path: path.to_path_buf(),
        reason,
    };
    if !path.exists() {
        return Err(fail("file does not exist".into()));
    }
    let image = image::open(path).map_err(|err| fail(err.to_string()))?.to_rgba8();
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(fail("image is empty".into()));
    }
    let scale = ICON_SIZE as f32 / width.max(height) as f32;
    let target_w = ((width as f32 * scale).round() as u32).max(1);
    let target_h = ((height as f32 * scale).round() as u32).max(1);
    debug!(path = %path.display(), width, height, target_w, target_h, "scaling file icon");
    Ok(imageops::resize(
        &image,
        target_w,
        target_h,
        imageops::FilterType::Triangle,
    ))
}

fn draw_file_tab(
    canvas: &mut Canvas,
    layout: &Layout,
    styling: &Styling,
    name: &str,
    icon: Option<&Icon>,
    face: &dyn Typeface,
) -> Result<TabGeometry> {
    let x = if styling.shows_window_controls() {
        layout.card_x + CONTROLS_BLOCK_WIDTH
    } else {
        layout.card_x + CARD_PADDING
    };
    let y = layout.card_y + TAB_OFFSET_Y;
    let icon_block = if icon.is_some() {
        ICON_SIZE as f32 + ICON_GAP
    } else {
        0.0
    };
    let text_width = face.advance(name);
    let width = TAB_PADDING_X + icon_block + text_width + TAB_PADDING_X;

    if let Some(pill) = rounded_rect(x, y, width, TAB_HEIGHT, TAB_RADIUS) {
        canvas.fill_path(&pill, Color::WHITE.with_alpha(TAB_FILL_ALPHA));
    }

    let mid_y = y + TAB_HEIGHT / 2.0;
    let mut cursor = x + TAB_PADDING_X;
    match icon {
        Some(Icon::Image(image)) => {
            let ix = cursor + (ICON_SIZE - image.width()) as f32 / 2.0;
            let iy = mid_y - image.height() as f32 / 2.0;
            canvas.draw_image(image, ix.round() as i32, iy.round() as i32)?;
        }
        Some(Icon::Fallback) => draw_fallback_icon(canvas, cursor, mid_y - ICON_SIZE as f32 / 2.0),
        None => {}
    }
    cursor += icon_block;

    let text_baseline = baseline(y, face.ascent(), face.descent());
    face.draw(canvas, name, cursor, text_baseline, Color::from_rgb(TAB_TEXT_COLOR));

    draw_plus(canvas, x + width + PLUS_OFFSET, mid_y);
    Ok(TabGeometry {
        x,
        y,
        width,
        height: TAB_HEIGHT,
    })
}

/// A page outline with a folded corner, drawn in a 16x16 box at `(x, y)`.
fn draw_fallback_icon(canvas: &mut Canvas, x: f32, y: f32) {
    let color = Color::from_rgb(GLYPH_COLOR);
    let (left, top, right, bottom, fold) = (x + 3.0, y + 1.5, x + 13.0, y + 14.5, 3.5);
    let mut pb = tiny_skia::PathBuilder::new();
    pb.move_to(left, top);
    pb.line_to(right - fold, top);
    pb.line_to(right, top + fold);
    pb.line_to(right, bottom);
    pb.line_to(left, bottom);
    pb.close();
    pb.move_to(right - fold, top);
    pb.line_to(right - fold, top + fold);
    pb.line_to(right, top + fold);
    if let Some(path) = pb.finish() {
        canvas.stroke_path(&path, color, 1.2);
    }
}

fn draw_plus(canvas: &mut Canvas, cx: f32, cy: f32) {
    let color = Color::from_rgb(GLYPH_COLOR);
    let half = PLUS_SIZE / 2.0;
    for path in [
        line(cx - half, cy, cx + half, cy),
        line(cx, cy - half, cx, cy + half),
    ]
    .into_iter()
    .flatten()
    {
        canvas.stroke_path(&path, color, PLUS_STROKE);
    }
}
