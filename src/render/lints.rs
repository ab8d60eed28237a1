//! Wavy lint underlines and the message panel.

use tiny_skia::{Path, PathBuilder};

use super::canvas::{circle, Canvas};
use super::card::draw_panel_surface;
use crate::color::Color;
use crate::config::{LintSeverity, Styling};
use crate::error::Result;
use crate::layout::{Layout, PanelRect, CARD_PADDING, PANEL_ROW_HEIGHT, PANEL_ROW_SPACING};
use crate::lint::PlacedLint;
use crate::metrics::LINE_HEIGHT;
use crate::text::Typeface;

const WAVE_AMPLITUDE: f32 = 2.0;
const WAVE_SEGMENT: f32 = 4.0;
const WAVE_STROKE: f32 = 1.0;
/// Distance of the underline above the bottom of the line box.
const WAVE_LIFT: f32 = 2.0;

const DOT_RADIUS: f32 = 4.0;
const DOT_OFFSET_X: f32 = 24.0;
const MESSAGE_OFFSET_X: f32 = 36.0;
const MESSAGE_COLOR: u32 = 0xe5e7eb;

/// Wave from `x0` to `x1` centred on `y`, alternating up and down arcs.
pub fn wavy_line(x0: f32, x1: f32, y: f32) -> Option<Path> {
    if x1 - x0 <= f32::EPSILON {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(x0, y);
    let mut x = x0;
    let mut up = true;
    while x < x1 {
        let next = (x + WAVE_SEGMENT).min(x1);
        let peak = if up { y - WAVE_AMPLITUDE } else { y + WAVE_AMPLITUDE };
        pb.quad_to((x + next) / 2.0, peak, next, y);
        x = next;
        up = !up;
    }
    pb.finish()
}

pub fn draw_underlines(canvas: &mut Canvas, layout: &Layout, lints: &[PlacedLint<'_>]) {
    for lint in lints {
        for segment in &lint.segments {
            let y = layout.line_top(segment.line) + LINE_HEIGHT - WAVE_LIFT;
            let x0 = layout.code_origin_x + segment.start_x;
            let x1 = layout.code_origin_x + segment.end_x;
            if let Some(wave) = wavy_line(x0, x1, y) {
                canvas.stroke_path(&wave, segment.severity.color(), WAVE_STROKE);
            }
        }
    }
}

/// Top of message row `index` inside `panel`.
pub fn row_top(panel: &PanelRect, index: usize) -> f32 {
    panel.y + CARD_PADDING + index as f32 * (PANEL_ROW_HEIGHT + PANEL_ROW_SPACING)
}

pub fn draw_message_panel(
    canvas: &mut Canvas,
    panel: &PanelRect,
    entries: &[(LintSeverity, &str)],
    styling: &Styling,
    face: &dyn Typeface,
) -> Result<()> {
    draw_panel_surface(canvas, panel, styling)?;
    let text_color = Color::from_rgb(MESSAGE_COLOR);
    for (index, (severity, message)) in entries.iter().enumerate() {
        let top = row_top(panel, index);
        let mid = top + PANEL_ROW_HEIGHT / 2.0;
        if let Some(dot) = circle(panel.x + DOT_OFFSET_X, mid, DOT_RADIUS) {
            canvas.fill_path(&dot, severity.color());
        }
        let baseline = top + (PANEL_ROW_HEIGHT + face.ascent() + face.descent()) / 2.0;
        face.draw(canvas, message, panel.x + MESSAGE_OFFSET_X, baseline, text_color);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LintPosition, LintSpec, RawConfig};
    use crate::lint::LintSegment;
    use crate::text::BlockFace;

    fn layout() -> Layout {
        Layout {
            canvas_width: 200,
            canvas_height: 120,
            card_x: 0.0,
            card_y: 0.0,
            card_width: 200.0,
            card_height: 120.0,
            top_spacing: 25.0,
            code_origin_x: 45.0,
            code_origin_y: 25.0,
            lint_panel: None,
        }
    }

    #[test]
    fn wave_alternates_within_amplitude() {
        let wave = wavy_line(10.0, 30.0, 50.0).unwrap();
        let bounds = wave.bounds();
        assert_eq!(bounds.left(), 10.0);
        assert_eq!(bounds.right(), 30.0);
        assert!(bounds.top() >= 48.0 && bounds.bottom() <= 52.0);
        assert!(bounds.top() < 50.0 && bounds.bottom() > 50.0);
    }

    #[test]
    fn empty_span_has_no_wave() {
        assert!(wavy_line(10.0, 10.0, 5.0).is_none());
    }

    #[test]
    fn underline_sits_under_its_line_only() {
        let spec = LintSpec {
            start: LintPosition { line: 2, column: 1 },
            end: LintPosition { line: 2, column: 4 },
            severity: LintSeverity::Error,
            message: None,
        };
        let placed = PlacedLint {
            index: 0,
            spec: &spec,
            segments: vec![LintSegment {
                line: 1,
                start_x: 0.0,
                end_x: 32.0,
                severity: LintSeverity::Error,
            }],
        };
        let mut canvas = Canvas::new(200, 120).unwrap();
        draw_underlines(&mut canvas, &layout(), &[placed]);
        // line 1 box is 49..73, wave centred on y = 71
        let covered = (69..=73).any(|y| {
            canvas
                .pixel(47, y)
                .is_some_and(|[r, _, _, a]| a > 0 && r == 0xff)
        });
        assert!(covered);
        assert!((0..60).all(|y| canvas.pixel(47, y).unwrap()[3] == 0));
        assert!((0..120).all(|y| canvas.pixel(80, y).unwrap()[3] == 0));
    }

    #[test]
    fn panel_rows_have_dots_in_severity_color() {
        let raw = "input: {file: a.dart, startLine: 1, endLine: 1}\noutput: {path: a.png}\nstyling:\n  borderRadius: 0\n  cardBackground: {transparency: 0}\n";
        let styling = RawConfig::from_yaml_str(raw).unwrap().resolve().unwrap().styling;
        let panel = PanelRect {
            x: 10.0,
            y: 10.0,
            width: 180.0,
            height: 2.0 * 28.0 - 8.0 + 40.0,
        };
        let mut canvas = Canvas::new(200, 120).unwrap();
        let entries = [(LintSeverity::Warning, "unused"), (LintSeverity::Info, "hint")];
        draw_message_panel(&mut canvas, &panel, &entries, &styling, &BlockFace::default())
            .unwrap();
        assert_eq!(row_top(&panel, 1), 58.0);
        assert_eq!(canvas.pixel(34, 40).unwrap()[..3], [0xff, 0xa7, 0x26]);
        assert_eq!(canvas.pixel(34, 68).unwrap()[..3], [0x42, 0xa5, 0xf5]);
        assert_eq!(canvas.pixel(48, 40).unwrap()[..3], [0xe5, 0xe7, 0xeb]);
    }
}
