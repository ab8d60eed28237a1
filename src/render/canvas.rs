//! Raster surface shared by every renderer.
//!
//! Wraps a premultiplied [`Pixmap`] with the handful of primitives the
//! snapshot needs: solid and shaded fills, hairline strokes, clip masks,
//! per-pixel coverage blending for glyphs, and a blurred shadow layer.

use image::codecs::png::PngEncoder;
use image::{imageops, ExtendedColorType, ImageEncoder, RgbaImage};
use tiny_skia::{
    ColorU8, FillRule, IntSize, Mask, Paint, Path, PathBuilder, Pixmap, PixmapPaint, PremultipliedColorU8,
    Rect, Shader, Stroke, Transform,
};

use crate::color::Color;
use crate::error::{Error, Result};

pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            Error::generation(format!("cannot allocate a {width}x{height} canvas"))
        })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn fill(&mut self, color: Color) {
        self.pixmap.fill(color.to_skia());
    }

    pub fn fill_path(&mut self, path: &Path, color: Color) {
        self.fill_path_masked(path, color, None);
    }

    pub fn fill_path_masked(&mut self, path: &Path, color: Color, mask: Option<&Mask>) {
        if color.a <= 0.0 {
            return;
        }
        let paint = solid_paint(color);
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, Transform::identity(), mask);
    }

    pub fn fill_shader(&mut self, path: &Path, shader: Shader<'_>, mask: Option<&Mask>) {
        let paint = Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        };
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, Transform::identity(), mask);
    }

    pub fn stroke_path(&mut self, path: &Path, color: Color, width: f32) {
        if color.a <= 0.0 || width <= 0.0 {
            return;
        }
        let paint = solid_paint(color);
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint, &stroke, Transform::identity(), None);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        if let Some(rect) = Rect::from_xywh(x, y, width, height) {
            self.fill_path(&PathBuilder::from_rect(rect), color);
        }
    }

    /// Source-over blend of `color` at `coverage` into one pixel.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        let alpha = (color.a * coverage).clamp(0.0, 1.0);
        if alpha <= 0.0 || x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
            return;
        }
        let idx = y as usize * self.width() as usize + x as usize;
        let pixels = self.pixmap.pixels_mut();
        let dst = pixels[idx];
        let inv = 1.0 - alpha;
        let blend = |src: f32, dst: u8| {
            (src * alpha * 255.0 + dst as f32 * inv)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        let a = blend(1.0, dst.alpha());
        let r = blend(color.r, dst.red()).min(a);
        let g = blend(color.g, dst.green()).min(a);
        let b = blend(color.b, dst.blue()).min(a);
        if let Some(out) = PremultipliedColorU8::from_rgba(r, g, b, a) {
            pixels[idx] = out;
        }
    }

    /// Composites `layer` over this canvas at its origin.
    pub fn draw_layer(&mut self, layer: &Canvas) {
        self.pixmap.draw_pixmap(
            0,
            0,
            layer.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    /// Composites a straight-alpha image with its top-left corner at `(x, y)`.
    pub fn draw_image(&mut self, image: &RgbaImage, x: i32, y: i32) -> Result<()> {
        let size = IntSize::from_wh(image.width(), image.height())
            .ok_or_else(|| Error::generation("cannot draw an empty image"))?;
        let data = image
            .pixels()
            .flat_map(|px| {
                let [r, g, b, a] = px.0;
                let pm = ColorU8::from_rgba(r, g, b, a).premultiply();
                [pm.red(), pm.green(), pm.blue(), pm.alpha()]
            })
            .collect();
        let pixmap = Pixmap::from_vec(data, size)
            .ok_or_else(|| Error::generation("image buffer size mismatch"))?;
        self.pixmap.draw_pixmap(
            x,
            y,
            pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(())
    }

    /// Clears every pixel outside `mask`.
    pub fn apply_mask(&mut self, mask: &Mask) {
        self.pixmap.apply_mask(mask);
    }

    /// An anti-aliased mask covering `path`, sized to this canvas.
    pub fn mask_for(&self, path: &Path) -> Result<Mask> {
        let mut mask = Mask::new(self.width(), self.height())
            .ok_or_else(|| Error::generation("cannot allocate clip mask"))?;
        mask.fill_path(path, FillRule::Winding, true, Transform::identity());
        Ok(mask)
    }

    /// Draws `path` filled with `color` into a scratch layer shifted by
    /// `(dx, dy)`, gaussian-blurs it and composites the result here.
    pub fn draw_shadow(&mut self, path: &Path, color: Color, dx: f32, dy: f32, sigma: f32) -> Result<()> {
        let mut layer = Canvas::new(self.width(), self.height())?;
        let Some(shifted) = path.clone().transform(Transform::from_translate(dx, dy)) else {
            return Ok(());
        };
        layer.fill_path(&shifted, color);
        if sigma > 0.0 {
            let size = IntSize::from_wh(self.width(), self.height())
                .ok_or_else(|| Error::generation("invalid shadow layer size"))?;
            let raw = RgbaImage::from_raw(self.width(), self.height(), layer.pixmap.data().to_vec())
                .ok_or_else(|| Error::generation("shadow layer buffer mismatch"))?;
            // Blurring premultiplied data keeps every channel at or below alpha.
            let blurred = imageops::blur(&raw, sigma);
            layer.pixmap = Pixmap::from_vec(blurred.into_raw(), size)
                .ok_or_else(|| Error::generation("blurred shadow layer is invalid"))?;
        }
        self.draw_layer(&layer);
        Ok(())
    }

    /// Straight-alpha RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.width(), self.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let color = src.demultiply();
            dst.0 = [color.red(), color.green(), color.blue(), color.alpha()];
        }
        out
    }
}

fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

/// PNG bytes for `image`.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|err| Error::generation(format!("png encoding failed: {err}")))?;
    Ok(bytes)
}

/// Rounded rectangle with quadratic corners. The radius is clamped to half
/// the shorter side.
pub fn rounded_rect(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Option<Path> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let r = radius.clamp(0.0, width.min(height) / 2.0);
    if r <= 0.0 {
        return Rect::from_xywh(x, y, width, height).map(PathBuilder::from_rect);
    }
    let (right, bottom) = (x + width, y + height);
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(right - r, y);
    pb.quad_to(right, y, right, y + r);
    pb.line_to(right, bottom - r);
    pb.quad_to(right, bottom, right - r, bottom);
    pb.line_to(x + r, bottom);
    pb.quad_to(x, bottom, x, bottom - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

pub fn circle(cx: f32, cy: f32, radius: f32) -> Option<Path> {
    PathBuilder::from_circle(cx, cy, radius)
}

pub fn polygon(points: &[(f32, f32)]) -> Option<Path> {
    let (&(x0, y0), rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(x0, y0);
    for &(x, y) in rest {
        pb.line_to(x, y);
    }
    pb.close();
    pb.finish()
}

pub fn line(x0: f32, y0: f32, x1: f32, y1: f32) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(x0, y0);
    pb.line_to(x1, y1);
    pb.finish()
}
