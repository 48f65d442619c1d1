//! High-level font handle tying the glyph table to the layout pipeline.

use std::path::Path;

use glam::Vec2;

use crate::atlas::{GlyphKerning, GlyphMetrics, GlyphTable};
use crate::error::FontResult;
use crate::geometry::{self, Alignment, QuadVertex, VerticalAlign};
use crate::layout::{GlyphRun, RunBuilder};

/// A loaded SDF bitmap font.
///
/// Owns the glyph metrics table and exposes run building, measurement and
/// quad projection over it. The font is immutable after loading; to reload,
/// build a new `SdfFont` and swap it in (an `Arc<SdfFont>` swap is atomic
/// from the readers' point of view, and runs built against the old font
/// remain valid as long as that font is kept alive).
#[derive(Debug, Clone)]
pub struct SdfFont {
    table: GlyphTable,
}

impl SdfFont {
    /// Parse a font from a BMFont text description.
    pub fn parse(description: &str) -> FontResult<Self> {
        Ok(Self {
            table: GlyphTable::parse(description)?,
        })
    }

    /// Load a font description file from disk.
    pub fn load(path: impl AsRef<Path>) -> FontResult<Self> {
        let path = path.as_ref();
        let description = std::fs::read_to_string(path)?;
        let font = Self::parse(&description)?;
        tracing::debug!(path = %path.display(), glyphs = font.table.len(), "font loaded");
        Ok(font)
    }

    /// The underlying glyph table.
    pub fn table(&self) -> &GlyphTable {
        &self.table
    }

    /// Metrics for a single glyph, if the font has it.
    pub fn glyph(&self, id: u32) -> Option<&GlyphMetrics> {
        self.table.get(id)
    }

    /// Kerning pairs where `id` is the second glyph. Parsed from the font
    /// description but not applied during layout; empty for unknown ids.
    pub fn kernings(&self, id: u32) -> &[GlyphKerning] {
        self.table.get(id).map_or(&[], |g| &g.kernings)
    }

    /// Build a glyph run from text. `max_line_width` is in line-height
    /// units; `None` disables wrapping.
    pub fn build_run(&self, text: &str, max_line_width: Option<f32>) -> GlyphRun {
        RunBuilder::new(&self.table).build(text.as_bytes(), max_line_width)
    }

    /// Build a glyph run from raw UTF-8 bytes; malformed input is dropped,
    /// never an error.
    pub fn build_run_bytes(&self, bytes: &[u8], max_line_width: Option<f32>) -> GlyphRun {
        RunBuilder::new(&self.table).build(bytes, max_line_width)
    }

    /// Build a glyph run from UTF-16 code units.
    pub fn build_run_utf16(&self, units: &[u16], max_line_width: Option<f32>) -> GlyphRun {
        RunBuilder::new(&self.table).build_utf16(units, max_line_width)
    }

    /// Width of the widest line of `text` at the given font size, without
    /// wrapping.
    pub fn line_width(&self, size: f32, text: &str) -> f32 {
        self.build_run(text, None).max_line_width() * size
    }

    /// Number of lines `text` occupies when wrapped into `max_width` at the
    /// given font size.
    pub fn block_line_count(&self, max_width: f32, size: f32, text: &str) -> usize {
        self.build_run(text, Some(max_width / size)).line_count()
    }

    /// Lay out `text` without wrapping and project it into quad vertices.
    ///
    /// `pen` is the anchor point: lines start there for left alignment, end
    /// there for right, straddle it for center. Middle/bottom vertical
    /// alignment shifts the whole block so the anchor sits at the block's
    /// vertical center or bottom edge. `flip_y` selects y-up conventions.
    pub fn draw_string(
        &self,
        pen: Vec2,
        size: f32,
        flip_y: bool,
        text: &str,
        align: Alignment,
    ) -> Vec<QuadVertex> {
        let run = self.build_run(text, None);
        let lines = run.line_count() as f32;
        let dir = if flip_y { 1.0 } else { -1.0 };

        let mut pen = pen;
        match align.vertical {
            VerticalAlign::Top => {}
            VerticalAlign::Middle => pen.y += lines * 0.5 * size * dir,
            VerticalAlign::Bottom => pen.y += lines * size * dir,
        }

        geometry::project_run(
            &self.table,
            &run,
            pen.extend(0.0),
            size,
            flip_y,
            align.horizontal,
        )
    }

    /// Lay out `text` wrapped into a rectangle of `extent` at `pen` and
    /// project it into quad vertices.
    ///
    /// The nine alignments place the wrapped block inside the rectangle:
    /// horizontal alignment moves the anchor to the rectangle's left edge,
    /// center line or right edge, vertical alignment to its top, middle or
    /// bottom (accounting for the block height).
    pub fn draw_string_in_rect(
        &self,
        pen: Vec2,
        extent: Vec2,
        size: f32,
        flip_y: bool,
        text: &str,
        align: Alignment,
    ) -> Vec<QuadVertex> {
        let run = self.build_run(text, Some(extent.x / size));
        let lines = run.line_count() as f32;
        let dir = if flip_y { -1.0 } else { 1.0 };

        let mut pen = pen;
        if flip_y {
            pen.y += extent.y;
        }
        match align.horizontal {
            geometry::HorizontalAlign::Left => {}
            geometry::HorizontalAlign::Center => pen.x += extent.x * 0.5,
            geometry::HorizontalAlign::Right => pen.x += extent.x,
        }
        match align.vertical {
            VerticalAlign::Top => {}
            VerticalAlign::Middle => pen.y += dir * (extent.y - lines * size) * 0.5,
            VerticalAlign::Bottom => pen.y += dir * (extent.y - lines * size),
        }

        geometry::project_run(
            &self.table,
            &run,
            pen.extend(0.0),
            size,
            flip_y,
            align.horizontal,
        )
    }
}
