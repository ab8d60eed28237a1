//! Font faces used to measure and draw code.

use std::path::Path;

use ab_glyph::{point, Font, FontArc, FontVec, GlyphId, PxScale, ScaleFont};
use fontdb::{Database, Family, Query};
use tracing::{debug, info};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::render::canvas::Canvas;

/// Em size in pixels for code, line numbers and chrome text.
pub const FONT_SIZE: f32 = 14.0;

/// Tab stops are this many spaces wide.
const TAB_WIDTH: f32 = 4.0;

/// Everything the layout and renderers need from a font.
pub trait Typeface {
    /// Advance width of `text` with kerning applied only between its own glyphs.
    fn advance(&self, text: &str) -> f32;
    /// Distance from baseline to the top of the glyph box.
    fn ascent(&self) -> f32;
    /// Distance from baseline to the bottom of the glyph box (negative).
    fn descent(&self) -> f32;
    fn draw(&self, canvas: &mut Canvas, text: &str, x: f32, baseline: f32, color: Color);
}

/// An outline font rendered with `ab_glyph`.
pub struct FontFace {
    font: FontArc,
    scale: PxScale,
}

impl FontFace {
    pub fn from_bytes(data: Vec<u8>, index: u32) -> Result<Self> {
        let font = FontVec::try_from_vec_and_index(data, index)
            .map_err(|err| Error::Font(err.to_string()))?;
        Ok(Self::new(FontArc::new(font)))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|err| Error::Font(format!("failed to read {}: {err}", path.display())))?;
        Self::from_bytes(data, 0)
    }

    /// Uses `font_file` when given, otherwise the first installed monospace face.
    pub fn load(font_file: Option<&Path>) -> Result<Self> {
        match font_file {
            Some(path) => {
                debug!(path = %path.display(), "loading configured font");
                Self::from_file(path)
            }
            None => Self::system_monospace(),
        }
    }

    pub fn system_monospace() -> Result<Self> {
        let mut db = Database::new();
        db.load_system_fonts();

        let preferred_families = [
            Family::Name("Monaco"),
            Family::Name("Menlo"),
            Family::Name("Ubuntu Mono"),
            Family::Name("DejaVu Sans Mono"),
            Family::Name("Liberation Mono"),
            Family::Monospace,
        ];

        for family in preferred_families {
            if let Some(id) = db.query(&Query {
                families: &[family],
                ..Default::default()
            }) && let Some(face) = load_face(&db, id)
            {
                return Ok(face);
            }
        }

        for face in db.faces().filter(|face| face.monospaced) {
            if let Some(font) = load_face(&db, face.id) {
                return Ok(font);
            }
        }

        Err(Error::Font("no monospace system font found".into()))
    }

    fn new(font: FontArc) -> Self {
        let units_per_em = font.units_per_em().unwrap_or(1000.0);
        let scale = PxScale::from(FONT_SIZE * font.height_unscaled() / units_per_em);
        Self { font, scale }
    }

    /// Walks the glyphs of `text`, calling `visit` with each drawable glyph
    /// and its pen position. Returns the total advance.
    fn walk(&self, text: &str, mut visit: impl FnMut(GlyphId, f32)) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        let space = scaled.h_advance(scaled.glyph_id(' '));
        let mut cursor = 0.0f32;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            if ch == '\t' {
                cursor += space * TAB_WIDTH;
                previous = None;
                continue;
            }
            if ch.is_control() {
                continue;
            }
            let glyph = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                cursor += scaled.kern(prev, glyph);
            }
            visit(glyph, cursor);
            cursor += scaled.h_advance(glyph);
            previous = Some(glyph);
        }
        cursor.max(0.0)
    }
}

fn load_face(db: &Database, id: fontdb::ID) -> Option<FontFace> {
    let face = db.face(id)?;
    let family = face
        .families
        .first()
        .map(|(name, _)| name.clone())
        .unwrap_or_default();
    let loaded = db.with_face_data(id, |data, index| {
        FontFace::from_bytes(data.to_vec(), index)
    })?;
    match loaded {
        Ok(font) => {
            info!(%family, "using system font");
            Some(font)
        }
        Err(err) => {
            debug!(%family, %err, "skipping undecodable font face");
            None
        }
    }
}

impl Typeface for FontFace {
    fn advance(&self, text: &str) -> f32 {
        self.walk(text, |_, _| {})
    }

    fn ascent(&self) -> f32 {
        self.font.as_scaled(self.scale).ascent()
    }

    fn descent(&self) -> f32 {
        self.font.as_scaled(self.scale).descent()
    }

    fn draw(&self, canvas: &mut Canvas, text: &str, x: f32, baseline: f32, color: Color) {
        let scale = self.scale;
        self.walk(text, |id, offset| {
            let glyph = id.with_scale_and_position(scale, point(x + offset, baseline));
            if let Some(outline) = self.font.outline_glyph(glyph) {
                let bounds = outline.px_bounds();
                outline.draw(|gx, gy, coverage| {
                    canvas.blend_pixel(
                        (bounds.min.x + gx as f32) as i32,
                        (bounds.min.y + gy as f32) as i32,
                        color,
                        coverage,
                    );
                });
            }
        });
    }
}

/// Fixed-advance face that draws every non-blank character as a solid block.
///
/// Metrics and pixels do not depend on installed fonts, which makes it the
/// face of choice for deterministic previews and tests.
#[derive(Debug, Clone, Copy)]
pub struct BlockFace {
    pub advance: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl Default for BlockFace {
    fn default() -> Self {
        Self {
            advance: 8.0,
            ascent: 11.0,
            descent: -3.0,
        }
    }
}

impl BlockFace {
    fn char_advance(&self, ch: char) -> f32 {
        match ch {
            '\t' => self.advance * TAB_WIDTH,
            c if c.is_control() => 0.0,
            _ => self.advance,
        }
    }
}

impl Typeface for BlockFace {
    fn advance(&self, text: &str) -> f32 {
        text.chars().map(|ch| self.char_advance(ch)).sum()
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn descent(&self) -> f32 {
        self.descent
    }

    fn draw(&self, canvas: &mut Canvas, text: &str, x: f32, baseline: f32, color: Color) {
        let top = baseline - self.ascent;
        let mut cursor = x;
        for ch in text.chars() {
            if !ch.is_whitespace() && !ch.is_control() {
                canvas.fill_rect(cursor + 1.0, top, self.advance - 2.0, self.ascent, color);
            }
            cursor += self.char_advance(ch);
        }
    }
}
