use crate::highlight::Token;
use crate::text::Typeface;

/// Height of one code line in pixels.
pub const LINE_HEIGHT: f32 = 24.0;
/// Width reserved left of the code for line numbers.
pub const GUTTER_WIDTH: f32 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub max_line_width: f32,
    pub total_text_height: f32,
    pub line_count: usize,
}

impl TextMetrics {
    /// Width the layout reserves for text, gutter included when shown.
    pub fn layout_width(&self, show_line_numbers: bool) -> f32 {
        if show_line_numbers {
            self.max_line_width + GUTTER_WIDTH
        } else {
            self.max_line_width
        }
    }
}

/// Sum of per-token advances. Kerning never crosses token boundaries.
pub fn line_width(tokens: &[Token], face: &dyn Typeface) -> f32 {
    tokens.iter().map(|token| face.advance(&token.text)).sum()
}

pub fn compute_metrics(lines: &[Vec<Token>], face: &dyn Typeface) -> TextMetrics {
    let max_line_width = lines
        .iter()
        .map(|line| line_width(line, face))
        .fold(0.0f32, f32::max);
    TextMetrics {
        max_line_width,
        total_text_height: lines.len() as f32 * LINE_HEIGHT,
        line_count: lines.len(),
    }
}
