//! Measurement over built glyph runs.
//!
//! All of these are pure scans over [`GlyphRun`] tokens; the advances cached
//! in the tokens make the run self-describing, so no glyph table is needed
//! here. Per-line widths drive center/right alignment offsets before
//! projection, the maximum width gives the block width of multi-line text.

use crate::layout::GlyphRun;

impl GlyphRun {
    /// Number of laid-out lines: `0` for an empty run, otherwise one more
    /// than the number of line breaks.
    pub fn line_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        1 + self.tokens().iter().filter(|t| t.break_before).count()
    }

    /// Width of the line starting at token index `start`, in line-height
    /// units, together with the index of the next line's first token.
    ///
    /// The scan stops before the next `break_before` token: a breaking
    /// glyph's advance belongs to the line it opens, not the one it ends.
    pub fn line_width_at(&self, start: usize) -> (f32, usize) {
        let tokens = self.tokens();
        let mut width = 0.0f32;
        let mut i = start;
        while i < tokens.len() {
            width += tokens[i].advance;
            i += 1;
            if tokens.get(i).is_some_and(|t| t.break_before) {
                break;
            }
        }
        (width, i)
    }

    /// Iterator over the width of each line in order.
    pub fn line_widths(&self) -> LineWidths<'_> {
        LineWidths { run: self, pos: 0 }
    }

    /// Width of the widest line, `0.0` for an empty run.
    pub fn max_line_width(&self) -> f32 {
        self.line_widths().fold(0.0, f32::max)
    }
}

/// Iterator returned by [`GlyphRun::line_widths`].
pub struct LineWidths<'a> {
    run: &'a GlyphRun,
    pos: usize,
}

impl Iterator for LineWidths<'_> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.pos >= self.run.len() {
            return None;
        }
        let (width, next) = self.run.line_width_at(self.pos);
        self.pos = next;
        Some(width)
    }
}
