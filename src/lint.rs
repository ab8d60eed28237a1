//! Placement of lints on the displayed lines.

use tracing::debug;

use crate::config::{LintSeverity, LintSpec};
use crate::diagnostics::Diagnostic;
use crate::text::Typeface;

/// Horizontal span to underline on one displayed line, relative to the code origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LintSegment {
    /// 0-based index into the displayed lines.
    pub line: usize,
    pub start_x: f32,
    pub end_x: f32,
    pub severity: LintSeverity,
}

/// A lint with at least one visible line.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLint<'a> {
    /// Position in the configured lint list.
    pub index: usize,
    pub spec: &'a LintSpec,
    pub segments: Vec<LintSegment>,
}

impl PlacedLint<'_> {
    /// Message to list in the panel, if any.
    pub fn message(&self) -> Option<&str> {
        self.spec.message.as_deref().filter(|msg| !msg.is_empty())
    }
}

/// Maps a 1-based file line to a 0-based display index.
pub fn display_index(file_line: usize, start_line: usize, displayed: usize) -> Option<usize> {
    file_line
        .checked_sub(start_line)
        .filter(|&index| index < displayed)
}

/// Width of the first `chars` characters of `line`, clamped to its length.
fn prefix_width(line: &str, chars: usize, face: &dyn Typeface) -> f32 {
    let end = line
        .char_indices()
        .nth(chars)
        .map_or(line.len(), |(byte, _)| byte);
    face.advance(&line[..end])
}

/// Resolves every lint against the displayed lines.
///
/// Lints with no visible line are dropped without a diagnostic. Multi-line
/// lints that are only partly visible keep their visible segments and yield
/// a [`Diagnostic::LintClipped`].
pub fn place_lints<'a, S: AsRef<str>>(
    lints: &'a [LintSpec],
    start_line: usize,
    lines: &[S],
    face: &dyn Typeface,
) -> (Vec<PlacedLint<'a>>, Vec<Diagnostic>) {
    let mut placed = Vec::new();
    let mut diagnostics = Vec::new();

    for (index, spec) in lints.iter().enumerate() {
        let (first, last) = (spec.start.line, spec.end.line);
        let visible_last = last.min((start_line + lines.len()).saturating_sub(1));
        let mut segments = Vec::new();
        for file_line in first.max(start_line)..=visible_last {
            let Some(display) = display_index(file_line, start_line, lines.len()) else {
                continue;
            };
            let text = lines[display].as_ref();
            let start_x = if file_line == first {
                prefix_width(text, spec.start.column.saturating_sub(1), face)
            } else {
                0.0
            };
            let end_x = if file_line == last {
                prefix_width(text, spec.end.column, face)
            } else {
                face.advance(text)
            };
            segments.push(LintSegment {
                line: display,
                start_x,
                end_x,
                severity: spec.severity,
            });
        }

        if segments.is_empty() {
            debug!(index, first, last, "lint outside displayed lines, skipping");
            continue;
        }
        if segments.len() != last - first + 1 {
            diagnostics.push(Diagnostic::LintClipped { index });
        }
        placed.push(PlacedLint {
            index,
            spec,
            segments,
        });
    }
    (placed, diagnostics)
}

/// Panel rows: visible lints carrying a non-empty message, in input order.
pub fn panel_entries<'p>(placed: &'p [PlacedLint<'_>]) -> Vec<(LintSeverity, &'p str)> {
    placed
        .iter()
        .filter_map(|lint| lint.message().map(|msg| (lint.spec.severity, msg)))
        .collect()
}
