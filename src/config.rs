//! Declarative snapshot configuration.
//!
//! The on-disk shape ([`RawConfig`]) mirrors the camelCase keys users write.
//! [`RawConfig::resolve`] validates it and fills every default once, producing
//! the immutable [`RenderConfig`] the renderers consume.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::highlight::StyleClass;

macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err(Error::invalid(format!($($arg)+)));
        }
    };
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawConfig {
    pub input: InputSection,
    pub output: OutputSection,
    #[serde(default)]
    pub styling: StylingSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InputSection {
    pub file: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    #[serde(default)]
    pub lints: Vec<LintSpec>,
}

/// 1-based position in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintPosition {
    pub line: usize,
    #[serde(rename = "char")]
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintSpec {
    pub start: LintPosition,
    pub end: LintPosition,
    #[serde(rename = "type")]
    pub severity: LintSeverity,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    Error,
    Warning,
    Info,
}

impl LintSeverity {
    pub fn color(self) -> Color {
        match self {
            Self::Error => Color::from_rgb(0xff6b6b),
            Self::Warning => Color::from_rgb(0xffa726),
            Self::Info => Color::from_rgb(0x42a5f5),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OutputSection {
    pub path: PathBuf,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StylingSection {
    #[serde(default)]
    pub card_background: Option<CardBackgroundSection>,
    #[serde(default)]
    pub background: Option<BackgroundSection>,
    #[serde(default)]
    pub show_line_numbers: Option<bool>,
    #[serde(default)]
    pub line_number_start: Option<i64>,
    #[serde(default)]
    pub show_lint_messages: Option<bool>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_icon: Option<PathBuf>,
    #[serde(default)]
    pub window_control: Option<WindowControl>,
    #[serde(default)]
    pub card_margin: Option<MarginSection>,
    #[serde(default)]
    pub border_radius: Option<f32>,
    #[serde(default)]
    pub image_border_radius: Option<f32>,
    #[serde(default)]
    pub token_colors: BTreeMap<StyleClass, Color>,
    #[serde(default)]
    pub font_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    #[default]
    Solid,
    Layered,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CardBackgroundSection {
    #[serde(default, rename = "type")]
    pub kind: CardKind,
    #[serde(default)]
    pub transparency: Option<f32>,
    #[serde(default)]
    pub partial_transparency: Option<f32>,
    #[serde(default)]
    pub show_blur: Option<bool>,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub partial_background_color: Option<Color>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Filled,
    Transparent,
    Gradient,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BackgroundSection {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub colors: Option<Vec<GradientStop>>,
    #[serde(default)]
    pub direction: Option<Direction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GradientStop {
    pub color: Color,
    #[serde(rename = "stop")]
    pub position: f32,
}

/// Gradient direction, named after the edge or corner the gradient ends at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    ToBottom,
    ToTop,
    ToRight,
    ToLeft,
    ToBottomRight,
    ToBottomLeft,
    ToTopRight,
    ToTopLeft,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowControl {
    #[default]
    Filled,
    Outlined,
    Hidden,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MarginSection {
    #[serde(default)]
    pub horizontal: Option<f32>,
    #[serde(default)]
    pub vertical: Option<f32>,
}

/// Fully resolved configuration. Nothing here is optional-with-default.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub input_file: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    pub lints: Vec<LintSpec>,
    pub output: OutputConfig,
    pub styling: Styling,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Styling {
    pub card: CardStyle,
    pub background: Background,
    pub show_line_numbers: bool,
    pub line_number_start: i64,
    pub show_lint_messages: bool,
    pub file_name: Option<String>,
    pub file_icon: Option<PathBuf>,
    pub window_control: WindowControl,
    pub margin: Margin,
    pub border_radius: f32,
    pub image_border_radius: f32,
    pub palette: Palette,
    pub font_file: Option<PathBuf>,
}

impl Styling {
    pub fn shows_window_controls(&self) -> bool {
        self.window_control != WindowControl::Hidden
    }

    pub fn shows_file_tab(&self) -> bool {
        self.file_name.as_deref().is_some_and(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardStyle {
    Solid {
        color: Color,
        transparency: f32,
    },
    Layered {
        /// Overlay color drawn inside the slanted region.
        color: Color,
        /// Full-card base color.
        base_color: Color,
        transparency: f32,
        partial_transparency: f32,
        show_blur: bool,
    },
}

impl CardStyle {
    /// Fill used for the card base and the lint panel.
    pub fn base_fill(&self) -> Color {
        match *self {
            Self::Solid {
                color,
                transparency,
            } => color.scale_alpha(transparency),
            Self::Layered {
                base_color,
                transparency,
                ..
            } => base_color.scale_alpha(transparency),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Transparent,
    Filled(Color),
    Gradient {
        /// Sorted ascending by position, positions within `0..=1`.
        stops: Vec<GradientStop>,
        direction: Direction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub horizontal: f32,
    pub vertical: f32,
}

/// Color per [`StyleClass`], defaults overlaid with user overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: BTreeMap<StyleClass, Color>,
}

impl Default for Palette {
    fn default() -> Self {
        let colors = StyleClass::ALL
            .iter()
            .map(|&class| (class, Self::default_color(class)))
            .collect();
        Self { colors }
    }
}

impl Palette {
    pub fn default_color(class: StyleClass) -> Color {
        match class {
            StyleClass::Keyword => Color::from_rgb(0xc084fc),
            StyleClass::Function | StyleClass::Method => Color::from_rgb(0xfbbf24),
            StyleClass::String => Color::from_rgb(0x86efac),
            StyleClass::Number => Color::from_rgb(0xfb923c),
            StyleClass::Comment => Color::from_rgb(0x6b7280),
            StyleClass::ClassName => Color::from_rgb(0x60a5fa),
            StyleClass::Variable => Color::from_rgb(0x93c5fd),
            StyleClass::Operator | StyleClass::Punctuation | StyleClass::Plain => Color::WHITE,
        }
    }

    pub fn with_overrides(overrides: &BTreeMap<StyleClass, Color>) -> Self {
        let mut palette = Self::default();
        palette.colors.extend(overrides.iter().map(|(k, v)| (*k, *v)));
        palette
    }

    pub fn color(&self, class: StyleClass) -> Color {
        self.colors
            .get(&class)
            .copied()
            .unwrap_or_else(|| Self::default_color(class))
    }
}

impl Background {
    pub fn default_gradient() -> Self {
        Self::Gradient {
            stops: default_gradient_stops(),
            direction: Direction::ToBottom,
        }
    }
}

fn default_gradient_stops() -> Vec<GradientStop> {
    [(0x1e3a8a, 0.0), (0x3b82f6, 0.5), (0x1e3a8a, 1.0)]
        .into_iter()
        .map(|(hex, position)| GradientStop {
            color: Color::from_rgb(hex),
            position,
        })
        .collect()
}

const fn default_transparency() -> f32 {
    0.8
}

const fn default_border_radius() -> f32 {
    15.0
}

const fn default_margin() -> f32 {
    40.0
}

fn default_card_color() -> Color {
    Color::from_rgb(0x1e1e1e)
}

fn default_partial_background_color() -> Color {
    Color::from_rgb(0x2d2d2d)
}

fn default_filled_color() -> Color {
    Color::from_rgb(0x1e3a8a)
}

/// Reads and resolves a configuration file. `.json` files parse as JSON,
/// everything else as YAML.
pub fn load(path: impl AsRef<Path>) -> Result<RenderConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::ConfigNotFound(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        RawConfig::from_json_str(&raw)?
    } else {
        RawConfig::from_yaml_str(&raw)?
    };
    debug!(path = %path.display(), "loaded snapshot config");
    config.resolve()
}

impl RawConfig {
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).map_err(|err| Error::invalid(err.to_string()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|err| Error::invalid(err.to_string()))
    }

    /// Validates the raw values and fills every default.
    pub fn resolve(self) -> Result<RenderConfig> {
        let Self {
            input,
            output,
            styling,
        } = self;

        ensure!(input.start_line >= 1, "startLine must be at least 1");
        ensure!(
            input.end_line >= input.start_line,
            "endLine ({}) must not be before startLine ({})",
            input.end_line,
            input.start_line
        );
        for (index, lint) in input.lints.iter().enumerate() {
            ensure!(
                lint.start.line >= 1 && lint.start.column >= 1,
                "lint #{index}: start line and char are 1-based"
            );
            ensure!(
                (lint.end.line, lint.end.column) >= (lint.start.line, lint.start.column),
                "lint #{index}: end is before start"
            );
        }
        ensure!(output.width != Some(0), "output width must be greater than zero");
        ensure!(output.height != Some(0), "output height must be greater than zero");

        let styling = styling.resolve()?;
        Ok(RenderConfig {
            input_file: input.file,
            start_line: input.start_line,
            end_line: input.end_line,
            lints: input.lints,
            output: OutputConfig {
                path: output.path,
                width: output.width,
                height: output.height,
            },
            styling,
        })
    }
}

impl StylingSection {
    fn resolve(self) -> Result<Styling> {
        let card = resolve_card(self.card_background)?;
        let background = resolve_background(self.background)?;

        let margin = self.card_margin.unwrap_or_default();
        let margin = Margin {
            horizontal: margin.horizontal.unwrap_or(default_margin()),
            vertical: margin.vertical.unwrap_or(default_margin()),
        };
        ensure!(
            non_negative(margin.horizontal) && non_negative(margin.vertical),
            "cardMargin values must be non-negative"
        );

        let border_radius = self.border_radius.unwrap_or(default_border_radius());
        let image_border_radius = self.image_border_radius.unwrap_or(0.0);
        ensure!(non_negative(border_radius), "borderRadius must be non-negative");
        ensure!(
            non_negative(image_border_radius),
            "imageBorderRadius must be non-negative"
        );

        Ok(Styling {
            card,
            background,
            show_line_numbers: self.show_line_numbers.unwrap_or(true),
            line_number_start: self.line_number_start.unwrap_or(1),
            show_lint_messages: self.show_lint_messages.unwrap_or(false),
            file_name: self.file_name.filter(|name| !name.is_empty()),
            file_icon: self.file_icon,
            window_control: self.window_control.unwrap_or_default(),
            margin,
            border_radius,
            image_border_radius,
            palette: Palette::with_overrides(&self.token_colors),
            font_file: self.font_file,
        })
    }
}

fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

fn unit_interval(value: f32) -> bool {
    (0.0..=1.0).contains(&value)
}

fn resolve_card(section: Option<CardBackgroundSection>) -> Result<CardStyle> {
    let Some(section) = section else {
        return Ok(CardStyle::Solid {
            color: default_card_color(),
            transparency: default_transparency(),
        });
    };
    let transparency = section.transparency.unwrap_or(default_transparency());
    ensure!(
        unit_interval(transparency),
        "cardBackground.transparency must be within 0..=1, got {transparency}"
    );
    let color = section.color.unwrap_or_else(default_card_color);
    match section.kind {
        CardKind::Solid => Ok(CardStyle::Solid {
            color,
            transparency,
        }),
        CardKind::Layered => {
            let partial_transparency = section.partial_transparency.unwrap_or(transparency);
            ensure!(
                unit_interval(partial_transparency),
                "cardBackground.partialTransparency must be within 0..=1, got {partial_transparency}"
            );
            Ok(CardStyle::Layered {
                color,
                base_color: section
                    .partial_background_color
                    .unwrap_or_else(default_partial_background_color),
                transparency,
                partial_transparency,
                show_blur: section.show_blur.unwrap_or(true),
            })
        }
    }
}

fn resolve_background(section: Option<BackgroundSection>) -> Result<Background> {
    let Some(section) = section else {
        return Ok(Background::default_gradient());
    };
    match section.kind {
        BackgroundKind::Transparent => Ok(Background::Transparent),
        BackgroundKind::Filled => Ok(Background::Filled(
            section.color.unwrap_or_else(default_filled_color),
        )),
        BackgroundKind::Gradient => {
            let direction = section.direction.unwrap_or_default();
            let Some(stops) = section.colors else {
                return Ok(Background::Gradient {
                    stops: default_gradient_stops(),
                    direction,
                });
            };
            ensure!(
                !stops.is_empty(),
                "background.colors must contain at least one color"
            );
            ensure!(
                stops.iter().all(|stop| stop.position.is_finite()),
                "gradient stops must be finite numbers"
            );
            Ok(Background::Gradient {
                stops: normalize_stops(stops),
                direction,
            })
        }
    }
}

/// Clamps stop positions into `0..=1` and orders them ascending. The sort is
/// stable, so stops sharing a position keep their declared order.
pub fn normalize_stops(mut stops: Vec<GradientStop>) -> Vec<GradientStop> {
    for stop in &mut stops {
        stop.position = stop.position.clamp(0.0, 1.0);
    }
    stops.sort_by(|a, b| a.position.total_cmp(&b.position));
    stops
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
input:
  file: snippet.dart
  startLine: 1
  endLine: 5
output:
  path: out/snapshot.png
"#;

    #[test]
    fn minimal_yaml_resolves_defaults() {
        let config = RawConfig::from_yaml_str(MINIMAL).unwrap().resolve().unwrap();
        assert_eq!(config.input_file, PathBuf::from("snippet.dart"));
        assert_eq!(config.output.width, None);
        let styling = &config.styling;
        assert!(styling.show_line_numbers);
        assert_eq!(styling.line_number_start, 1);
        assert!(!styling.show_lint_messages);
        assert_eq!(styling.window_control, WindowControl::Filled);
        assert_eq!(styling.margin, Margin { horizontal: 40.0, vertical: 40.0 });
        assert_eq!(styling.border_radius, 15.0);
        assert_eq!(styling.image_border_radius, 0.0);
        assert_eq!(styling.background, Background::default_gradient());
        assert_eq!(
            styling.card,
            CardStyle::Solid {
                color: Color::from_rgb(0x1e1e1e),
                transparency: 0.8
            }
        );
        assert_eq!(
            styling.palette.color(StyleClass::Keyword),
            Color::from_rgb(0xc084fc)
        );
    }

    #[test]
    fn json_with_full_styling() {
        let raw = r##"{
            "input": {
                "file": "a.dart", "startLine": 2, "endLine": 3,
                "lints": [{"start": {"line": 2, "char": 1}, "end": {"line": 2, "char": 4},
                           "type": "warning", "message": "unused"}]
            },
            "output": {"path": "a.png", "width": 800, "height": null},
            "styling": {
                "cardBackground": {"type": "layered", "transparency": 0.5, "color": "#ff0000"},
                "background": {"type": "filled", "color": "#101010"},
                "showLineNumbers": false,
                "lineNumberStart": 10,
                "showLintMessages": true,
                "fileName": "main.dart",
                "windowControl": "outlined",
                "cardMargin": {"horizontal": 12},
                "tokenColors": {"class-name": "#123456"}
            }
        }"##;
        let config = RawConfig::from_json_str(raw).unwrap().resolve().unwrap();
        assert_eq!(config.output.width, Some(800));
        assert_eq!(config.output.height, None);
        assert_eq!(config.lints[0].severity, LintSeverity::Warning);
        assert_eq!(config.lints[0].start, LintPosition { line: 2, column: 1 });
        let styling = &config.styling;
        assert_eq!(styling.margin.horizontal, 12.0);
        assert_eq!(styling.margin.vertical, 40.0);
        assert_eq!(styling.file_name.as_deref(), Some("main.dart"));
        assert_eq!(styling.background, Background::Filled(Color::from_rgb(0x101010)));
        match styling.card {
            CardStyle::Layered {
                partial_transparency,
                base_color,
                show_blur,
                ..
            } => {
                assert_eq!(partial_transparency, 0.5);
                assert_eq!(base_color, Color::from_rgb(0x2d2d2d));
                assert!(show_blur);
            }
            other => panic!("expected layered card, got {other:?}"),
        }
        assert_eq!(
            styling.palette.color(StyleClass::ClassName),
            Color::from_rgb(0x123456)
        );
        assert_eq!(
            styling.palette.color(StyleClass::String),
            Color::from_rgb(0x86efac)
        );
    }

    #[test]
    fn gradient_stops_are_sorted_and_clamped() {
        let raw = format!(
            "{MINIMAL}styling:\n  background:\n    type: gradient\n    direction: to-right\n    colors:\n      - {{color: '#000', stop: 1.5}}\n      - {{color: '#fff', stop: 0}}\n"
        );
        let config = RawConfig::from_yaml_str(&raw).unwrap().resolve().unwrap();
        let Background::Gradient { stops, direction } = config.styling.background else {
            panic!("expected gradient");
        };
        assert_eq!(direction, Direction::ToRight);
        assert_eq!(stops[0].color, Color::WHITE);
        assert_eq!(stops[0].position, 0.0);
        assert_eq!(stops[1].color, Color::BLACK);
        assert_eq!(stops[1].position, 1.0);
    }

    #[test]
    fn rejects_inverted_range() {
        let raw = MINIMAL.replace("startLine: 1", "startLine: 6");
        let err = RawConfig::from_yaml_str(&raw).unwrap().resolve().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)), "{err}");
    }

    #[test]
    fn rejects_unknown_keys_and_missing_fields() {
        let typo = MINIMAL.replace("startLine", "startline");
        assert!(matches!(
            RawConfig::from_yaml_str(&typo),
            Err(Error::InvalidConfig(_))
        ));
        let missing = "input:\n  file: a.dart\n  startLine: 1\n  endLine: 1\n";
        assert!(matches!(
            RawConfig::from_yaml_str(missing),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_transparency() {
        let raw = format!("{MINIMAL}styling:\n  cardBackground:\n    transparency: 1.2\n");
        let err = RawConfig::from_yaml_str(&raw).unwrap().resolve().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_unknown_lint_type() {
        let raw = MINIMAL.replace(
            "  endLine: 5\n",
            "  endLine: 5\n  lints:\n    - start: {line: 1, char: 1}\n      end: {line: 1, char: 2}\n      type: fatal\n",
        );
        assert!(matches!(
            RawConfig::from_yaml_str(&raw),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_zero_output_size() {
        let raw = MINIMAL.replace("  path: out/snapshot.png\n", "  path: a.png\n  width: 0\n");
        let err = RawConfig::from_yaml_str(&raw).unwrap().resolve().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn normalize_stops_is_stable_for_ties() {
        let stops = normalize_stops(vec![
            GradientStop { color: Color::WHITE, position: 0.5 },
            GradientStop { color: Color::BLACK, position: 0.5 },
            GradientStop { color: Color::TRANSPARENT, position: -1.0 },
        ]);
        assert_eq!(stops[0].color, Color::TRANSPARENT);
        assert_eq!(stops[1].color, Color::WHITE);
        assert_eq!(stops[2].color, Color::BLACK);
    }
}
