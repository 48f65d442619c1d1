//! Projection of glyph runs into textured quad geometry.
//!
//! The projector walks a [`GlyphRun`] and emits one quad per glyph, scaled by
//! the font size and positioned from the glyph bearing/advance metrics, with
//! texture coordinates taken straight from the atlas rectangle. The output is
//! plain vertex data; uploading it and binding the atlas texture is the
//! renderer's business.

use glam::Vec3;

use crate::atlas::GlyphTable;
use crate::layout::GlyphRun;

/// Horizontal placement of each line relative to the pen origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical placement of the text block relative to the pen origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Combined alignment, covering the nine left/center/right x
/// top/middle/bottom placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Alignment {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

impl Alignment {
    pub const TOP_LEFT: Self = Self::new(HorizontalAlign::Left, VerticalAlign::Top);
    pub const TOP_CENTER: Self = Self::new(HorizontalAlign::Center, VerticalAlign::Top);
    pub const TOP_RIGHT: Self = Self::new(HorizontalAlign::Right, VerticalAlign::Top);
    pub const MIDDLE_LEFT: Self = Self::new(HorizontalAlign::Left, VerticalAlign::Middle);
    pub const MIDDLE_CENTER: Self = Self::new(HorizontalAlign::Center, VerticalAlign::Middle);
    pub const MIDDLE_RIGHT: Self = Self::new(HorizontalAlign::Right, VerticalAlign::Middle);
    pub const BOTTOM_LEFT: Self = Self::new(HorizontalAlign::Left, VerticalAlign::Bottom);
    pub const BOTTOM_CENTER: Self = Self::new(HorizontalAlign::Center, VerticalAlign::Bottom);
    pub const BOTTOM_RIGHT: Self = Self::new(HorizontalAlign::Right, VerticalAlign::Bottom);

    pub const fn new(horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// One corner of a glyph quad, ready for vertex buffer upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

/// Vertices per glyph quad.
pub const VERTICES_PER_QUAD: usize = 4;

/// Index pattern splitting one quad into two counter-clockwise triangles.
pub const QUAD_INDEX_PATTERN: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Triangle-list indices for `quad_count` quads emitted by [`project_run`].
pub fn quad_indices(quad_count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(quad_count * QUAD_INDEX_PATTERN.len());
    for quad in 0..quad_count as u32 {
        let base = quad * VERTICES_PER_QUAD as u32;
        indices.extend(QUAD_INDEX_PATTERN.iter().map(|i| base + i));
    }
    indices
}

/// Project a glyph run into quad vertices.
///
/// `origin` is the pen position of the first line's left edge (before
/// horizontal alignment), `size` scales the normalized glyph metrics into
/// target units and equals the line step. With `flip_y` the quads extend
/// downward in y and lines step in negative y, matching y-up coordinate
/// systems; without it y grows downward.
///
/// The horizontal alignment offset (half or full line width for center and
/// right) is applied at the start of every line, the first included.
/// Vertical alignment is the caller's concern: it is a whole-block offset
/// applied to `origin` before projecting (see [`crate::SdfFont::draw_string`]).
pub fn project_run(
    table: &GlyphTable,
    run: &GlyphRun,
    origin: Vec3,
    size: f32,
    flip_y: bool,
    align: HorizontalAlign,
) -> Vec<QuadVertex> {
    let sy = if flip_y { -size } else { size };
    let mut vertices = Vec::with_capacity(run.len() * VERTICES_PER_QUAD);

    let mut gx = origin.x;
    let mut gy = origin.y;

    for (idx, token) in run.tokens().iter().enumerate() {
        if idx == 0 || token.break_before {
            if token.break_before {
                gy += sy;
            }
            let (line_width, _) = run.line_width_at(idx);
            gx = origin.x
                - match align {
                    HorizontalAlign::Left => 0.0,
                    HorizontalAlign::Center => line_width * size * 0.5,
                    HorizontalAlign::Right => line_width * size,
                };
        }

        // The build invariant guarantees the lookup succeeds for runs built
        // against this table; a stale run against a reloaded table just
        // skips the glyph.
        let Some(glyph) = table.get(token.glyph) else {
            continue;
        };

        let x0 = size * glyph.bearing.x + gx;
        let y0 = sy * glyph.bearing.y + gy;
        let x1 = size * (glyph.bearing.x + glyph.size.x) + gx;
        let y1 = sy * (glyph.bearing.y + glyph.size.y) + gy;

        vertices.extend_from_slice(&[
            QuadVertex {
                position: [x0, y0, origin.z],
                tex_coord: [glyph.uv_min.x, glyph.uv_min.y],
            },
            QuadVertex {
                position: [x1, y0, origin.z],
                tex_coord: [glyph.uv_max.x, glyph.uv_min.y],
            },
            QuadVertex {
                position: [x1, y1, origin.z],
                tex_coord: [glyph.uv_max.x, glyph.uv_max.y],
            },
            QuadVertex {
                position: [x0, y1, origin.z],
                tex_coord: [glyph.uv_min.x, glyph.uv_max.y],
            },
        ]);

        gx += glyph.advance * size;
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::RunBuilder;

    /// 'a' and 'b' advance 1.0 with a full-height quad and zero bearing,
    /// so quad corners land on whole pen units.
    fn test_table() -> GlyphTable {
        GlyphTable::parse(
            "common lineHeight=16 scaleW=64 scaleH=64\n\
             char id=97 x=0 y=0 width=16 height=16 xoffset=0 yoffset=0 xadvance=16\n\
             char id=98 x=16 y=0 width=16 height=16 xoffset=0 yoffset=0 xadvance=16\n",
        )
        .unwrap()
    }

    fn positions(vertices: &[QuadVertex]) -> Vec<[f32; 3]> {
        vertices.iter().map(|v| v.position).collect()
    }

    #[test]
    fn test_single_glyph_quad() {
        let table = test_table();
        let run = RunBuilder::new(&table).build(b"a", None);
        let verts = project_run(
            &table,
            &run,
            Vec3::ZERO,
            10.0,
            false,
            HorizontalAlign::Left,
        );
        assert_eq!(verts.len(), 4);
        assert_eq!(
            positions(&verts),
            vec![
                [0.0, 0.0, 0.0],
                [10.0, 0.0, 0.0],
                [10.0, 10.0, 0.0],
                [0.0, 10.0, 0.0],
            ]
        );
        // UVs come straight from the atlas rectangle.
        assert_eq!(verts[0].tex_coord, [0.0, 0.0]);
        assert_eq!(verts[2].tex_coord, [0.25, 0.25]);
    }

    #[test]
    fn test_pen_advances_between_glyphs() {
        let table = test_table();
        let run = RunBuilder::new(&table).build(b"ab", None);
        let verts = project_run(
            &table,
            &run,
            Vec3::ZERO,
            10.0,
            false,
            HorizontalAlign::Left,
        );
        assert_eq!(verts.len(), 8);
        // Second quad starts one advance (10 units) to the right.
        assert_eq!(verts[4].position, [10.0, 0.0, 0.0]);
    }

    #[test]
    fn test_line_break_steps_vertically() {
        let table = test_table();
        let run = RunBuilder::new(&table).build(b"a\nb", None);
        let verts = project_run(
            &table,
            &run,
            Vec3::ZERO,
            10.0,
            false,
            HorizontalAlign::Left,
        );
        // The second line's pen resets to the origin x and steps down.
        assert_eq!(verts[4].position, [0.0, 10.0, 0.0]);
    }

    #[test]
    fn test_flip_y_steps_upward() {
        let table = test_table();
        let run = RunBuilder::new(&table).build(b"a\nb", None);
        let verts = project_run(&table, &run, Vec3::ZERO, 10.0, true, HorizontalAlign::Left);
        assert_eq!(verts[4].position, [0.0, -10.0, 0.0]);
        // Quads extend in negative y when flipped.
        assert_eq!(verts[2].position, [10.0, -10.0, 0.0]);
    }

    #[test]
    fn test_center_alignment_offsets_every_line() {
        let table = test_table();
        let run = RunBuilder::new(&table).build(b"ab\na", None);
        let verts = project_run(
            &table,
            &run,
            Vec3::ZERO,
            10.0,
            false,
            HorizontalAlign::Center,
        );
        // First line is two glyphs wide: starts at -10. Second line is one
        // glyph wide: starts at -5.
        assert_eq!(verts[0].position[0], -10.0);
        assert_eq!(verts[8].position[0], -5.0);
    }

    #[test]
    fn test_right_alignment() {
        let table = test_table();
        let run = RunBuilder::new(&table).build(b"ab", None);
        let verts = project_run(
            &table,
            &run,
            Vec3::ZERO,
            10.0,
            false,
            HorizontalAlign::Right,
        );
        // The line's right edge lands on the origin.
        assert_eq!(verts[0].position[0], -20.0);
        assert_eq!(verts[5].position[0], 0.0);
    }

    #[test]
    fn test_bearing_offsets_quad() {
        let table = GlyphTable::parse(
            "common lineHeight=16 scaleW=64 scaleH=64\n\
             char id=97 x=0 y=0 width=8 height=8 xoffset=4 yoffset=8 xadvance=16\n",
        )
        .unwrap();
        let run = RunBuilder::new(&table).build(b"a", None);
        let verts = project_run(
            &table,
            &run,
            Vec3::ZERO,
            16.0,
            false,
            HorizontalAlign::Left,
        );
        assert_eq!(verts[0].position, [4.0, 8.0, 0.0]);
        assert_eq!(verts[2].position, [12.0, 16.0, 0.0]);
    }

    #[test]
    fn test_quad_indices_pattern() {
        assert_eq!(quad_indices(0), Vec::<u32>::new());
        assert_eq!(quad_indices(2), vec![0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
    }

    #[test]
    fn test_empty_run_projects_nothing() {
        let table = test_table();
        let run = RunBuilder::new(&table).build(b"", None);
        let verts = project_run(
            &table,
            &run,
            Vec3::ZERO,
            10.0,
            false,
            HorizontalAlign::Left,
        );
        assert!(verts.is_empty());
    }
}
