//! The translucent card behind the code and the lint panel.

use tiny_skia::{LinearGradient, Point, SpreadMode, Transform};

use super::canvas::{polygon, rounded_rect, Canvas};
use crate::color::Color;
use crate::config::{CardStyle, Styling};
use crate::error::Result;
use crate::layout::{Layout, PanelRect};

const SHADOW_BLUR: f32 = 20.0;
const SHADOW_OFFSET_Y: f32 = 10.0;
const SHADOW_ALPHA: f32 = 0.3;

const OUTER_BORDER_WIDTH: f32 = 0.8;
const INNER_BORDER_WIDTH: f32 = 1.0;
const INNER_BORDER_INSET: f32 = 0.5;
const BORDER_ALPHA: f32 = 0.3;

/// Fraction of the card height the layered overlay's bottom edge slants by.
const SLANT_RATIO: f32 = 0.15;
/// Width of the fade band beyond the slanted edge.
const FADE_WIDTH: f32 = 12.0;

#[derive(Debug, Clone, Copy)]
struct Bounds {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

pub fn draw_card(canvas: &mut Canvas, layout: &Layout, styling: &Styling) -> Result<()> {
    let bounds = Bounds {
        x: layout.card_x,
        y: layout.card_y,
        width: layout.card_width,
        height: layout.card_height,
    };
    draw_surface(canvas, bounds, styling, true)
}

/// The message panel shares the card's fill, radius, shadow and borders.
pub fn draw_panel_surface(canvas: &mut Canvas, panel: &PanelRect, styling: &Styling) -> Result<()> {
    let bounds = Bounds {
        x: panel.x,
        y: panel.y,
        width: panel.width,
        height: panel.height,
    };
    draw_surface(canvas, bounds, styling, false)
}

fn draw_surface(canvas: &mut Canvas, b: Bounds, styling: &Styling, overlay: bool) -> Result<()> {
    let radius = styling.border_radius;
    let Some(shape) = rounded_rect(b.x, b.y, b.width, b.height, radius) else {
        return Ok(());
    };

    canvas.draw_shadow(
        &shape,
        Color::BLACK.with_alpha(SHADOW_ALPHA),
        0.0,
        SHADOW_OFFSET_Y,
        SHADOW_BLUR / 2.0,
    )?;
    canvas.fill_path(&shape, styling.card.base_fill());

    if overlay
        && let CardStyle::Layered {
            color,
            partial_transparency,
            show_blur,
            ..
        } = styling.card
    {
        draw_layered_overlay(canvas, b, &shape, color.scale_alpha(partial_transparency), show_blur)?;
    }

    draw_borders(canvas, b, radius);
    Ok(())
}

/// Overlay covering the card above a diagonal from the bottom-left corner up
/// to `SLANT_RATIO` of the height on the right edge.
fn draw_layered_overlay(
    canvas: &mut Canvas,
    b: Bounds,
    shape: &tiny_skia::Path,
    color: Color,
    show_blur: bool,
) -> Result<()> {
    let slant = SLANT_RATIO * b.height;
    let (right, bottom) = (b.x + b.width, b.y + b.height);
    let edge_start = (right, bottom - slant);
    let edge_end = (b.x, bottom);

    let mask = canvas.mask_for(shape)?;
    if let Some(region) = polygon(&[(b.x, b.y), (right, b.y), edge_start, edge_end]) {
        canvas.fill_path_masked(&region, color, Some(&mask));
    }
    if !show_blur {
        return Ok(());
    }

    // Unit normal of the slanted edge, pointing away from the overlay.
    let (dx, dy) = (edge_end.0 - edge_start.0, edge_end.1 - edge_start.1);
    let len = dx.hypot(dy);
    if len <= f32::EPSILON {
        return Ok(());
    }
    let (nx, ny) = (-dy / len, dx / len);
    let (nx, ny) = if ny < 0.0 { (-nx, -ny) } else { (nx, ny) };
    let offset = |(x, y): (f32, f32)| (x + nx * FADE_WIDTH, y + ny * FADE_WIDTH);

    let band = [edge_start, offset(edge_start), offset(edge_end), edge_end];
    let mid = ((edge_start.0 + edge_end.0) / 2.0, (edge_start.1 + edge_end.1) / 2.0);
    let mid_out = offset(mid);
    let shader = LinearGradient::new(
        Point::from_xy(mid.0, mid.1),
        Point::from_xy(mid_out.0, mid_out.1),
        vec![
            tiny_skia::GradientStop::new(0.0, color.to_skia()),
            tiny_skia::GradientStop::new(1.0, color.with_alpha(0.0).to_skia()),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    );
    if let (Some(shader), Some(band)) = (shader, polygon(&band)) {
        canvas.fill_shader(&band, shader, Some(&mask));
    }
    Ok(())
}

fn draw_borders(canvas: &mut Canvas, b: Bounds, radius: f32) {
    if let Some(outer) = rounded_rect(b.x, b.y, b.width, b.height, radius) {
        canvas.stroke_path(&outer, Color::BLACK.with_alpha(BORDER_ALPHA), OUTER_BORDER_WIDTH);
    }
    let inset = INNER_BORDER_INSET;
    if let Some(inner) = rounded_rect(
        b.x + inset,
        b.y + inset,
        b.width - 2.0 * inset,
        b.height - 2.0 * inset,
        (radius - inset).max(0.0),
    ) {
        canvas.stroke_path(&inner, Color::WHITE.with_alpha(BORDER_ALPHA), INNER_BORDER_WIDTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawConfig;

    fn styling(card_yaml: &str) -> Styling {
        let raw = format!(
            "input: {{file: a.dart, startLine: 1, endLine: 1}}\noutput: {{path: a.png}}\nstyling:\n  borderRadius: 15\n{card_yaml}"
        );
        RawConfig::from_yaml_str(&raw).unwrap().resolve().unwrap().styling
    }

    fn layout(x: f32, y: f32, width: f32, height: f32) -> Layout {
        Layout {
            canvas_width: 300,
            canvas_height: 220,
            card_x: x,
            card_y: y,
            card_width: width,
            card_height: height,
            top_spacing: 25.0,
            code_origin_x: x + 45.0,
            code_origin_y: y + 25.0,
            lint_panel: None,
        }
    }

    #[test]
    fn solid_card_fills_and_casts_shadow() {
        let styling = styling("  cardBackground: {type: solid, transparency: 0.8, color: '#1e1e1e'}\n");
        let mut canvas = Canvas::new(300, 220).unwrap();
        draw_card(&mut canvas, &layout(50.0, 50.0, 200.0, 100.0), &styling).unwrap();
        let [r, _, _, a] = canvas.pixel(150, 100).unwrap();
        assert!(a >= 204, "card alpha {a}");
        assert!(r <= 0x1e, "card red {r}");
        assert!(canvas.pixel(150, 158).unwrap()[3] > 0, "shadow below card");
        assert_eq!(canvas.pixel(2, 2).unwrap()[3], 0);
    }

    #[test]
    fn layered_card_splits_along_slant() {
        let styling = styling(
            "  cardBackground:\n    type: layered\n    transparency: 1.0\n    partialTransparency: 1.0\n    color: '#ff0000'\n    partialBackgroundColor: '#0000ff'\n    showBlur: false\n",
        );
        let mut canvas = Canvas::new(300, 220).unwrap();
        draw_card(&mut canvas, &layout(50.0, 50.0, 200.0, 100.0), &styling).unwrap();
        assert_eq!(canvas.pixel(150, 80), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(150, 147), Some([0, 0, 255, 255]));
    }

    #[test]
    fn layered_fade_blends_beyond_slant() {
        let styling = styling(
            "  cardBackground:\n    type: layered\n    transparency: 1.0\n    partialTransparency: 1.0\n    color: '#ff0000'\n    partialBackgroundColor: '#0000ff'\n",
        );
        let mut canvas = Canvas::new(300, 220).unwrap();
        draw_card(&mut canvas, &layout(50.0, 50.0, 200.0, 100.0), &styling).unwrap();
        let [r, _, b, _] = canvas.pixel(150, 147).unwrap();
        assert!(r > 0 && b > 0, "expected a red/blue mix, got r={r} b={b}");
    }

    #[test]
    fn empty_card_is_skipped() {
        let styling = styling("");
        let mut canvas = Canvas::new(300, 220).unwrap();
        draw_card(&mut canvas, &layout(50.0, 50.0, 0.0, 0.0), &styling).unwrap();
        assert_eq!(canvas.pixel(50, 50), Some([0, 0, 0, 0]));
    }
}
