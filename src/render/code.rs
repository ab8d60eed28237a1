use crate::color::Color;
use crate::config::Styling;
use crate::highlight::Token;
use crate::layout::{baseline, Layout};
use crate::text::Typeface;

const LINE_NUMBER_COLOR: u32 = 0x6b7280;

/// Draws line numbers (when enabled) and every token, left to right.
pub fn draw_code(
    canvas: &mut super::canvas::Canvas,
    layout: &Layout,
    lines: &[Vec<Token>],
    styling: &Styling,
    face: &dyn Typeface,
) {
    let (ascent, descent) = (face.ascent(), face.descent());
    let number_color = Color::from_rgb(LINE_NUMBER_COLOR);

    for (index, tokens) in lines.iter().enumerate() {
        let line_baseline = baseline(layout.line_top(index), ascent, descent);

        if styling.show_line_numbers {
            let label = (styling.line_number_start + index as i64).to_string();
            let x = layout.line_number_right() - face.advance(&label);
            face.draw(canvas, &label, x, line_baseline, number_color);
        }

        let mut x = layout.code_origin_x;
        for token in tokens {
            let color = styling.palette.color(token.class);
            face.draw(canvas, &token.text, x, line_baseline, color);
            x += face.advance(&token.text);
        }
    }
}
