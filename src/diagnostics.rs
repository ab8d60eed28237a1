use std::fmt;
use std::path::PathBuf;

use tracing::warn;

/// Axis an overflow was measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        })
    }
}

/// Non-fatal condition noticed while rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Content is larger than the card on one axis of a fixed-size canvas.
    Overflow { axis: Axis, overflow_px: f32 },
    /// The configured file icon could not be used; the built-in glyph was drawn.
    IconFallback { path: PathBuf, reason: String },
    /// `endLine` pointed past the end of the input and was clamped.
    LineRangeClamped { requested_end: usize, available: usize },
    /// A multi-line lint extends outside the displayed lines and was cut.
    LintClipped { index: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow { axis, overflow_px } => {
                write!(f, "content overflows the card {axis}ly by {overflow_px:.1}px")
            }
            Self::IconFallback { path, reason } => write!(
                f,
                "file icon {} unusable ({reason}); using built-in glyph",
                path.display()
            ),
            Self::LineRangeClamped {
                requested_end,
                available,
            } => write!(
                f,
                "endLine {requested_end} is past the end of input; clamped to {available}"
            ),
            Self::LintClipped { index } => {
                write!(f, "lint #{index} extends outside the displayed lines")
            }
        }
    }
}

/// Ordered diagnostic sink. Every pushed entry is also logged.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!(%diagnostic, "render diagnostic");
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.push(diagnostic);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
