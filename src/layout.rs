//! Glyph run construction: UTF-8 decoding and greedy line wrapping.
//!
//! A [`GlyphRun`] is the intermediate representation between raw text and
//! quad geometry: one token per placed glyph, in layout order, with a flag
//! marking the first glyph of each new line. Runs are built against an
//! immutable [`GlyphTable`]; code points without table metrics are dropped
//! rather than failing the build, so a missing glyph can never abort a frame.

use crate::atlas::GlyphTable;

/// One placed glyph in a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunToken {
    /// Glyph id, guaranteed to resolve in the table the run was built with.
    pub glyph: u32,
    /// Horizontal advance in line-height units, copied from the table so
    /// measurement does not need the table again.
    pub advance: f32,
    /// Whether this glyph starts a new line. The glyph itself belongs to the
    /// new line's coordinate frame.
    pub break_before: bool,
}

/// An ordered sequence of positioned glyph tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphRun {
    tokens: Vec<RunToken>,
    dropped: usize,
}

impl GlyphRun {
    /// The tokens in layout order.
    pub fn tokens(&self) -> &[RunToken] {
        &self.tokens
    }

    /// Number of placed glyphs.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the run places no glyphs at all.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of input code points or bytes that produced no token: glyphs
    /// absent from the table plus malformed UTF-8 bytes. Diagnostics only;
    /// dropped input never fails a build.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// Builds glyph runs against a glyph table.
pub struct RunBuilder<'a> {
    table: &'a GlyphTable,
}

/// Decoder state for an in-flight multi-byte sequence.
struct Utf8State {
    acc: u32,
    remaining: u8,
}

const SPACE: u32 = ' ' as u32;

impl<'a> RunBuilder<'a> {
    pub fn new(table: &'a GlyphTable) -> Self {
        Self { table }
    }

    /// Build a run from raw UTF-8 bytes.
    ///
    /// `max_line_width` is in line-height units; `None` disables wrapping.
    /// Line-feed bytes are never drawn, they force the next drawable glyph
    /// onto a new line. When accumulated line width exceeds the limit the
    /// scan rewinds to the most recent space (break candidate) and continues
    /// after it on a fresh line; a single glyph wider than the limit with no
    /// candidate starts its own line instead.
    ///
    /// Supported UTF-8 forms are 1 to 3 bytes (code points up to `0xFFFF`).
    /// Stray continuation bytes, truncated sequences and 4-byte leads are
    /// dropped and counted, as are code points without table metrics.
    pub fn build(&self, bytes: &[u8], max_line_width: Option<f32>) -> GlyphRun {
        let max_width = max_line_width.unwrap_or(f32::INFINITY);
        let mut tokens: Vec<RunToken> = Vec::with_capacity(bytes.len());
        let mut dropped = 0usize;

        let mut utf8 = Utf8State {
            acc: 0,
            remaining: 0,
        };

        // Soft-wrap bookkeeping. A break candidate is registered only on the
        // transition from non-space to space, but the input resume position
        // follows every space, so a run of spaces collapses onto one
        // candidate that resumes after the last of them.
        let mut candidate: Option<usize> = None;
        let mut in_word = true;
        let mut resume_byte = 0usize;

        let mut line_length = 0.0f32;
        let mut pending_break = false;

        let mut i = 0usize;
        while i < bytes.len() {
            let byte = bytes[i];
            i += 1;

            if byte == b'\n' {
                pending_break = true;
                if utf8.remaining > 0 {
                    // A line feed can never continue a multi-byte sequence.
                    dropped += 1;
                    utf8.remaining = 0;
                }
                continue;
            }

            let Some(cp) = utf8.feed(byte, &mut dropped) else {
                continue;
            };

            let Some(glyph) = self.table.get(cp) else {
                dropped += 1;
                continue;
            };
            let advance = glyph.advance;

            if cp == SPACE {
                tokens.push(RunToken {
                    glyph: cp,
                    advance,
                    break_before: false,
                });
                line_length += advance;
                // Spaces never trigger a soft break themselves.
                if candidate.is_none() || in_word {
                    candidate = Some(tokens.len() - 1);
                    in_word = false;
                }
                resume_byte = i;
            } else if pending_break {
                pending_break = false;
                tokens.push(RunToken {
                    glyph: cp,
                    advance,
                    break_before: true,
                });
                candidate = None;
                in_word = true;
                line_length = advance;
            } else {
                in_word = true;
                tokens.push(RunToken {
                    glyph: cp,
                    advance,
                    break_before: false,
                });
                line_length += advance;
                if line_length > max_width {
                    if let Some(cand) = candidate.take() {
                        // Rewind: the candidate space ends its line, input
                        // resumes after the last space, and the next glyph
                        // opens the new line.
                        tokens.truncate(cand + 1);
                        i = resume_byte;
                        line_length = 0.0;
                        pending_break = true;
                        utf8.remaining = 0;
                    } else if let Some(last) = tokens.last_mut() {
                        // A single word wider than the limit: this glyph
                        // starts its own line.
                        last.break_before = true;
                        line_length = advance;
                    }
                }
            }
        }

        if dropped > 0 {
            tracing::trace!(dropped, "run builder dropped undecodable input");
        }

        GlyphRun { tokens, dropped }
    }

    /// Build a run from UTF-16 code units by converting to UTF-8 first.
    /// Unpaired surrogates become replacement characters, which the UTF-8
    /// pass then drops like any other unavailable glyph.
    pub fn build_utf16(&self, units: &[u16], max_line_width: Option<f32>) -> GlyphRun {
        let utf8 = String::from_utf16_lossy(units);
        self.build(utf8.as_bytes(), max_line_width)
    }
}

impl Utf8State {
    /// Feed one byte, returning a completed code point if this byte ends a
    /// sequence. Malformed input resets the state and bumps `dropped`.
    fn feed(&mut self, byte: u8, dropped: &mut usize) -> Option<u32> {
        if byte < 0x80 {
            if self.remaining > 0 {
                // Truncated multi-byte sequence.
                *dropped += 1;
                self.remaining = 0;
            }
            return Some(byte as u32);
        }
        if byte >= 0b1111_0000 {
            // 4-byte sequences (code points above 0xFFFF) are unsupported.
            *dropped += 1;
            self.remaining = 0;
            return None;
        }
        if byte >= 0b1110_0000 {
            if self.remaining > 0 {
                *dropped += 1;
            }
            self.remaining = 2;
            self.acc = ((byte & 0b0000_1111) as u32) << 12;
            return None;
        }
        if byte >= 0b1100_0000 {
            if self.remaining > 0 {
                *dropped += 1;
            }
            self.remaining = 1;
            self.acc = ((byte & 0b0001_1111) as u32) << 6;
            return None;
        }
        // Continuation byte.
        if self.remaining == 0 {
            *dropped += 1;
            return None;
        }
        self.remaining -= 1;
        self.acc |= ((byte & 0b0011_1111) as u32) << (self.remaining * 6);
        if self.remaining == 0 {
            Some(self.acc)
        } else {
            None
        }
    }
}
