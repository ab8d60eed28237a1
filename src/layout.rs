//! Canvas and card geometry derived from text metrics and styling.

use crate::config::{OutputConfig, Styling};
use crate::diagnostics::{Axis, Diagnostic};
use crate::metrics::{TextMetrics, GUTTER_WIDTH, LINE_HEIGHT};

/// Inner padding of the card on every side.
pub const CARD_PADDING: f32 = 20.0;
/// Vertical gap between the card and the lint message panel.
pub const PANEL_GAP: f32 = 24.0;
/// Height of one lint message row.
pub const PANEL_ROW_HEIGHT: f32 = 20.0;
/// Spacing between lint message rows.
pub const PANEL_ROW_SPACING: f32 = 8.0;
/// Line numbers end this far left of the code.
pub const LINE_NUMBER_GAP: f32 = 10.0;

const TOP_SPACING_WITH_CONTROLS: f32 = 45.0;
const TOP_SPACING_PLAIN: f32 = 25.0;
const FILE_TAB_EXTRA: f32 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub card_x: f32,
    pub card_y: f32,
    pub card_width: f32,
    pub card_height: f32,
    pub top_spacing: f32,
    pub code_origin_x: f32,
    pub code_origin_y: f32,
    pub lint_panel: Option<PanelRect>,
}

impl Layout {
    /// Top edge of the box of displayed line `index` (0-based).
    pub fn line_top(&self, index: usize) -> f32 {
        self.code_origin_y + index as f32 * LINE_HEIGHT
    }

    /// Right edge line numbers are aligned to.
    pub fn line_number_right(&self) -> f32 {
        self.code_origin_x - LINE_NUMBER_GAP
    }
}

/// Baseline that centres a glyph box of `ascent`/`descent` in a line box.
pub fn baseline(line_top: f32, ascent: f32, descent: f32) -> f32 {
    line_top + (LINE_HEIGHT + ascent + descent) / 2.0
}

pub fn top_spacing(styling: &Styling) -> f32 {
    let base = if styling.shows_window_controls() {
        TOP_SPACING_WITH_CONTROLS
    } else {
        TOP_SPACING_PLAIN
    };
    if styling.shows_file_tab() {
        base + FILE_TAB_EXTRA
    } else {
        base
    }
}

/// Height of a message panel listing `entries` rows.
pub fn panel_height(entries: usize) -> f32 {
    entries as f32 * (PANEL_ROW_HEIGHT + PANEL_ROW_SPACING) - PANEL_ROW_SPACING
        + 2.0 * CARD_PADDING
}

/// Computes the layout. `panel_entries` is the number of lint messages the
/// panel would list; the panel only exists when messages are enabled and
/// at least one entry is present.
///
/// Returns one [`Diagnostic::Overflow`] per axis on which a fixed canvas is
/// too small for the content.
pub fn compute_layout(
    metrics: &TextMetrics,
    styling: &Styling,
    output: &OutputConfig,
    panel_entries: usize,
) -> (Layout, Vec<Diagnostic>) {
    let margin = styling.margin;
    let top_spacing = top_spacing(styling);
    let gutter = if styling.show_line_numbers {
        GUTTER_WIDTH
    } else {
        0.0
    };

    let content_width = metrics.layout_width(styling.show_line_numbers) + 2.0 * CARD_PADDING;
    let content_height = metrics.total_text_height + top_spacing + CARD_PADDING;

    let panel_height = (styling.show_lint_messages && panel_entries > 0)
        .then(|| panel_height(panel_entries));
    let panel_block = panel_height.map_or(0.0, |height| PANEL_GAP + height);

    let canvas_width = output
        .width
        .unwrap_or_else(|| (content_width + 2.0 * margin.horizontal).ceil() as u32);
    let canvas_height = output.height.unwrap_or_else(|| {
        (content_height + panel_block + 2.0 * margin.vertical).ceil() as u32
    });

    let available_width = canvas_width as f32 - 2.0 * margin.horizontal;
    let available_height = canvas_height as f32 - 2.0 * margin.vertical;
    let card_width = content_width.min(available_width).max(0.0);
    let card_height = content_height.min(available_height - panel_block).max(0.0);

    let mut diagnostics = Vec::new();
    let overflow_x = content_width - available_width;
    if overflow_x > 0.0 {
        diagnostics.push(Diagnostic::Overflow {
            axis: Axis::Horizontal,
            overflow_px: overflow_x,
        });
    }
    let overflow_y = content_height + panel_block - available_height;
    if overflow_y > 0.0 {
        diagnostics.push(Diagnostic::Overflow {
            axis: Axis::Vertical,
            overflow_px: overflow_y,
        });
    }

    let card_x = (canvas_width as f32 - card_width) / 2.0;
    let card_y = (canvas_height as f32 - (card_height + panel_block)) / 2.0;

    let lint_panel = panel_height.map(|height| PanelRect {
        x: card_x,
        y: card_y + card_height + PANEL_GAP,
        width: card_width,
        height,
    });

    let layout = Layout {
        canvas_width,
        canvas_height,
        card_x,
        card_y,
        card_width,
        card_height,
        top_spacing,
        code_origin_x: card_x + CARD_PADDING + gutter,
        code_origin_y: card_y + top_spacing,
        lint_panel,
    };
    (layout, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawConfig;
    use crate::config::RenderConfig;

    fn config(styling_yaml: &str, output_extra: &str) -> RenderConfig {
        let raw = format!(
            "input:\n  file: a.dart\n  startLine: 1\n  endLine: 5\noutput:\n  path: a.png\n{output_extra}styling:\n{styling_yaml}"
        );
        RawConfig::from_yaml_str(&raw).unwrap().resolve().unwrap()
    }

    fn metrics(width: f32, lines: usize) -> TextMetrics {
        TextMetrics {
            max_line_width: width,
            total_text_height: lines as f32 * LINE_HEIGHT,
            line_count: lines,
        }
    }

    #[test]
    fn auto_size_for_five_lines_without_controls() {
        let cfg = config("  windowControl: hidden\n  showLineNumbers: true\n", "");
        let (layout, diagnostics) = compute_layout(&metrics(100.0, 5), &cfg.styling, &cfg.output, 0);
        assert!(diagnostics.is_empty());
        assert_eq!(layout.canvas_height, 5 * 24 + 25 + 20 + 2 * 40);
        assert_eq!(layout.canvas_width, 100 + 25 + 40 + 80);
        assert_eq!(layout.card_x, 40.0);
        assert_eq!(layout.card_y, 40.0);
        assert_eq!(layout.top_spacing, 25.0);
        assert_eq!(layout.code_origin_x, 40.0 + 20.0 + 25.0);
        assert_eq!(layout.code_origin_y, 65.0);
        assert_eq!(layout.line_number_right(), 75.0);
        assert!(layout.lint_panel.is_none());
    }

    #[test]
    fn top_spacing_accounts_for_controls_and_tab() {
        let cfg = config("  fileName: main.dart\n", "");
        assert_eq!(top_spacing(&cfg.styling), 59.0);
        let cfg = config("  windowControl: hidden\n  fileName: main.dart\n", "");
        assert_eq!(top_spacing(&cfg.styling), 39.0);
        let cfg = config("  windowControl: outlined\n", "");
        assert_eq!(top_spacing(&cfg.styling), 45.0);
    }

    #[test]
    fn layout_is_deterministic() {
        let cfg = config("  fileName: x.dart\n  showLintMessages: true\n", "");
        let m = metrics(321.7, 9);
        let first = compute_layout(&m, &cfg.styling, &cfg.output, 2);
        for _ in 0..10 {
            assert_eq!(compute_layout(&m, &cfg.styling, &cfg.output, 2), first);
        }
    }

    #[test]
    fn card_and_panel_are_centred_as_one_block() {
        let cfg = config("  showLintMessages: true\n", "");
        let (layout, _) = compute_layout(&metrics(200.0, 3), &cfg.styling, &cfg.output, 2);
        let panel = layout.lint_panel.unwrap();
        assert_eq!(panel.height, 2.0 * 28.0 - 8.0 + 40.0);
        assert_eq!(panel.y, layout.card_y + layout.card_height + 24.0);
        assert_eq!(panel.x, layout.card_x);
        assert_eq!(panel.width, layout.card_width);
        let bottom_gap = layout.canvas_height as f32 - (panel.y + panel.height);
        assert!((bottom_gap - layout.card_y).abs() < 1.0);
        assert_eq!(layout.card_y, 40.0);
    }

    #[test]
    fn panel_requires_messages_and_flag() {
        let cfg = config("  showLintMessages: true\n", "");
        let (layout, _) = compute_layout(&metrics(10.0, 1), &cfg.styling, &cfg.output, 0);
        assert!(layout.lint_panel.is_none());
        let cfg = config("  showLintMessages: false\n", "");
        let (layout, _) = compute_layout(&metrics(10.0, 1), &cfg.styling, &cfg.output, 3);
        assert!(layout.lint_panel.is_none());
    }

    #[test]
    fn fixed_size_overflow_warns_once_per_axis() {
        let cfg = config("  windowControl: hidden\n", "  width: 200\n  height: 120\n");
        let (layout, diagnostics) = compute_layout(&metrics(400.0, 10), &cfg.styling, &cfg.output, 0);
        assert_eq!(layout.canvas_width, 200);
        assert_eq!(layout.canvas_height, 120);
        assert_eq!(layout.card_width, 120.0);
        assert_eq!(layout.card_height, 40.0);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.contains(&Diagnostic::Overflow {
            axis: Axis::Horizontal,
            overflow_px: 400.0 + 25.0 + 40.0 - 120.0,
        }));
        assert!(diagnostics.contains(&Diagnostic::Overflow {
            axis: Axis::Vertical,
            overflow_px: 240.0 + 25.0 + 20.0 - 40.0,
        }));
    }

    #[test]
    fn fixed_size_overflow_on_one_axis_only() {
        let cfg = config("  windowControl: hidden\n", "  width: 200\n");
        let (_, diagnostics) = compute_layout(&metrics(400.0, 2), &cfg.styling, &cfg.output, 0);
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics[0],
            Diagnostic::Overflow { axis: Axis::Horizontal, .. }
        ));
    }

    #[test]
    fn larger_fixed_canvas_centres_card() {
        let cfg = config("  windowControl: hidden\n  showLineNumbers: false\n", "  width: 1000\n  height: 500\n");
        let (layout, diagnostics) = compute_layout(&metrics(100.0, 2), &cfg.styling, &cfg.output, 0);
        assert!(diagnostics.is_empty());
        assert_eq!(layout.card_width, 140.0);
        assert_eq!(layout.card_x, 430.0);
        assert_eq!(layout.card_height, 93.0);
        assert_eq!(layout.card_y, (500.0 - 93.0) / 2.0);
    }

    #[test]
    fn baseline_centres_glyph_box() {
        assert_eq!(baseline(100.0, 11.0, -3.0), 116.0);
    }
}
