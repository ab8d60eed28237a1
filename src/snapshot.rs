//! End-to-end pipeline: source excerpt to encoded image.

use std::path::Path;

use image::RgbaImage;
use tracing::{debug, info};

use crate::config::{self, RenderConfig};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{Error, Result};
use crate::highlight::highlight_lines;
use crate::layout::{compute_layout, Layout};
use crate::lint::{panel_entries, place_lints};
use crate::metrics::compute_metrics;
use crate::render::canvas::rounded_rect;
use crate::render::{background, card, chrome, code, encode_png, lints, Canvas};
use crate::text::{FontFace, Typeface};

/// A rendered snapshot and everything noticed while producing it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub image: RgbaImage,
    pub layout: Layout,
    pub diagnostics: Vec<Diagnostic>,
}

impl Snapshot {
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.image)
    }
}

/// Lines `start_line..=end_line` (1-based) of `source`. An `end_line` past
/// the end of input is clamped and reported; a `start_line` past it is an
/// error.
pub fn excerpt<'s>(
    source: &'s str,
    start_line: usize,
    end_line: usize,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<&'s str>> {
    let all: Vec<&str> = source.lines().collect();
    let available = all.len();
    if start_line == 0 || start_line > available {
        return Err(Error::invalid(format!(
            "startLine {start_line} is outside the input ({available} lines)"
        )));
    }
    let end = if end_line > available {
        diagnostics.push(Diagnostic::LineRangeClamped {
            requested_end: end_line,
            available,
        });
        available
    } else {
        end_line
    };
    Ok(all[start_line - 1..end].to_vec())
}

/// Renders `source` according to `config`. Pure apart from logging: nothing
/// is read from or written to disk except a configured file icon.
pub fn render_snapshot(
    config: &RenderConfig,
    source: &str,
    face: &dyn Typeface,
) -> Result<Snapshot> {
    let styling = &config.styling;
    let mut diagnostics = Diagnostics::new();

    let lines = excerpt(source, config.start_line, config.end_line, &mut diagnostics)?;
    let tokens = highlight_lines(&lines);
    let metrics = compute_metrics(&tokens, face);
    debug!(
        lines = metrics.line_count,
        max_width = metrics.max_line_width,
        "measured code"
    );

    let (placed, lint_diagnostics) = place_lints(&config.lints, config.start_line, &lines, face);
    diagnostics.extend(lint_diagnostics);
    let entries = panel_entries(&placed);

    let (layout, overflow) = compute_layout(&metrics, styling, &config.output, entries.len());
    diagnostics.extend(overflow);
    debug!(?layout, "computed layout");

    let mut canvas = Canvas::new(layout.canvas_width, layout.canvas_height)?;
    background::draw_background(&mut canvas, &styling.background)?;
    card::draw_card(&mut canvas, &layout, styling)?;
    chrome::draw_chrome(&mut canvas, &layout, styling, face, &mut diagnostics)?;
    code::draw_code(&mut canvas, &layout, &tokens, styling, face);
    lints::draw_underlines(&mut canvas, &layout, &placed);
    if let Some(panel) = &layout.lint_panel {
        lints::draw_message_panel(&mut canvas, panel, &entries, styling, face)?;
    }

    if styling.image_border_radius > 0.0
        && let Some(outline) = rounded_rect(
            0.0,
            0.0,
            layout.canvas_width as f32,
            layout.canvas_height as f32,
            styling.image_border_radius,
        )
    {
        let mask = canvas.mask_for(&outline)?;
        canvas.apply_mask(&mask);
    }

    Ok(Snapshot {
        image: canvas.to_rgba_image(),
        layout,
        diagnostics: diagnostics.into_vec(),
    })
}

/// Reads the configured input file.
pub fn read_source(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::InputFileNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Writes `bytes` to `path`, creating missing parent directories.
pub async fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// Renders with `face` and writes the PNG to the configured output path.
pub async fn generate_with(config: &RenderConfig, face: &dyn Typeface) -> Result<Snapshot> {
    let source = read_source(&config.input_file)?;
    let snapshot = render_snapshot(config, &source, face)?;
    let bytes = snapshot.encode_png()?;
    write_output(&config.output.path, &bytes).await?;
    info!(
        path = %config.output.path.display(),
        width = snapshot.layout.canvas_width,
        height = snapshot.layout.canvas_height,
        warnings = snapshot.diagnostics.len(),
        "snapshot written"
    );
    Ok(snapshot)
}

/// Loads the config at `config_path`, resolves a font and generates the image.
pub async fn generate(config_path: &Path) -> Result<Snapshot> {
    let config = config::load(config_path)?;
    let face = FontFace::load(config.styling.font_file.as_deref())?;
    generate_with(&config, &face).await
}
