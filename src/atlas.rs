//! Glyph metrics table loaded from a BMFont text description.
//!
//! The description format is line oriented: each line starts with a record
//! kind (`common`, `char`, `kerning`, ...) followed by whitespace-separated
//! `key=value` fields. Pixel metrics are normalized by the font's nominal
//! line height, texture rectangles by the atlas dimensions, so layout and
//! geometry work in line-height units regardless of the atlas resolution.
//!
//! Format reference: <http://www.angelcode.com/products/bmfont/doc/file_format.html>

use glam::Vec2;

use crate::error::{FontError, FontResult};

/// Highest glyph id a table will accept.
///
/// BMFont ids are Unicode scalar values, so anything above this range in a
/// `char` record indicates a broken description file and fails the load.
pub const MAX_GLYPH_ID: u32 = 0x10FFFF;

/// A kerning adjustment against the previous glyph on the line.
///
/// Parsed and stored but not consulted during layout; exposed for consumers
/// that want to apply pair kerning themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphKerning {
    /// Id of the glyph preceding this one.
    pub previous: u32,
    /// Pen adjustment in line-height units.
    pub amount: f32,
}

/// Metrics for a single glyph in the atlas.
///
/// All linear measures are in line-height units; `uv_min`/`uv_max` are the
/// normalized atlas rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMetrics {
    /// Glyph id (the Unicode scalar value in BMFont descriptions).
    pub id: u32,
    /// Top-left corner of the atlas rectangle, in `[0, 1]`.
    pub uv_min: Vec2,
    /// Bottom-right corner of the atlas rectangle, in `[0, 1]`.
    pub uv_max: Vec2,
    /// Quad extent.
    pub size: Vec2,
    /// Quad placement offset relative to the pen position.
    pub bearing: Vec2,
    /// Horizontal pen movement after this glyph.
    pub advance: f32,
    /// Kerning pairs where this glyph is the second of the pair.
    pub kernings: Vec<GlyphKerning>,
}

/// Lookup from glyph id to [`GlyphMetrics`].
///
/// Built once from a font description and immutable afterwards, so it can be
/// shared read-only across threads (wrap it in an `Arc` and swap the `Arc` to
/// reload; runs built against the old table stay valid).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphTable {
    glyphs: Vec<Option<GlyphMetrics>>,
    glyph_count: usize,
    line_height: f32,
}

impl GlyphTable {
    /// Parse a BMFont text description into a table.
    ///
    /// Unrecognized record kinds and unknown fields are ignored so newer
    /// description files keep loading. Recognized records with missing or
    /// non-numeric required fields fail the load; so does a `char` record
    /// before the `common` record or a glyph id above [`MAX_GLYPH_ID`].
    pub fn parse(description: &str) -> FontResult<Self> {
        let mut common: Option<CommonRecord> = None;
        let mut glyphs: Vec<GlyphMetrics> = Vec::new();
        let mut dropped_kernings = 0usize;

        for (idx, line) in description.lines().enumerate() {
            let line_no = idx + 1;
            let mut tokens = line.split_whitespace();
            let Some(kind) = tokens.next() else { continue };
            let fields: Vec<&str> = tokens.collect();

            match kind {
                "common" => {
                    common = Some(CommonRecord::parse(&fields, line_no)?);
                }
                "char" => {
                    let Some(common) = common.as_ref() else {
                        return Err(FontError::MissingCommonRecord { line: line_no });
                    };
                    glyphs.push(parse_char_record(&fields, line_no, common)?);
                }
                "kerning" => {
                    let Some(common) = common.as_ref() else {
                        // Kerning before 'common' cannot be normalized; the
                        // description is broken enough to reject.
                        return Err(FontError::MissingCommonRecord { line: line_no });
                    };
                    let second = parse_field::<u32>(&fields, "second", "kerning", line_no)?;
                    let kern = GlyphKerning {
                        previous: parse_field::<u32>(&fields, "first", "kerning", line_no)?,
                        amount: parse_field::<f32>(&fields, "amount", "kerning", line_no)?
                            / common.line_height,
                    };
                    // Single left-to-right pass: the referenced glyph must
                    // already have been declared, otherwise the pair is lost.
                    match glyphs.iter_mut().find(|g| g.id == second) {
                        Some(glyph) => glyph.kernings.push(kern),
                        None => dropped_kernings += 1,
                    }
                }
                _ => {}
            }
        }

        if dropped_kernings > 0 {
            tracing::trace!(
                dropped = dropped_kernings,
                "kerning records referenced undeclared glyphs"
            );
        }

        let line_height = common.map_or(0.0, |c| c.line_height);
        let max_id = glyphs.iter().map(|g| g.id).max();
        let mut table = vec![None; max_id.map_or(0, |id| id as usize + 1)];
        let glyph_count = glyphs.len();
        for glyph in glyphs {
            let idx = glyph.id as usize;
            table[idx] = Some(glyph);
        }

        tracing::debug!(glyphs = glyph_count, "glyph table built");

        Ok(Self {
            glyphs: table,
            glyph_count,
            line_height,
        })
    }

    /// Look up a glyph by id. Absent ids (including ids beyond the table
    /// bound) return `None`.
    pub fn get(&self, id: u32) -> Option<&GlyphMetrics> {
        self.glyphs.get(id as usize)?.as_ref()
    }

    /// Whether the table holds metrics for `id`.
    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    /// Number of glyphs in the table.
    pub fn len(&self) -> usize {
        self.glyph_count
    }

    /// Whether the table holds no glyphs at all.
    pub fn is_empty(&self) -> bool {
        self.glyph_count == 0
    }

    /// Largest glyph id in the table, if any.
    pub fn max_id(&self) -> Option<u32> {
        if self.glyphs.is_empty() {
            None
        } else {
            Some(self.glyphs.len() as u32 - 1)
        }
    }

    /// Nominal line height in pixels, as declared by the description.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }
}

struct CommonRecord {
    atlas_width: f32,
    atlas_height: f32,
    line_height: f32,
}

impl CommonRecord {
    fn parse(fields: &[&str], line_no: usize) -> FontResult<Self> {
        let record = Self {
            atlas_width: parse_field(fields, "scaleW", "common", line_no)?,
            atlas_height: parse_field(fields, "scaleH", "common", line_no)?,
            line_height: parse_field(fields, "lineHeight", "common", line_no)?,
        };
        for (key, value) in [
            ("scaleW", record.atlas_width),
            ("scaleH", record.atlas_height),
            ("lineHeight", record.line_height),
        ] {
            if value <= 0.0 {
                return Err(FontError::InvalidCommonRecord { line: line_no, key });
            }
        }
        Ok(record)
    }
}

fn parse_char_record(
    fields: &[&str],
    line_no: usize,
    common: &CommonRecord,
) -> FontResult<GlyphMetrics> {
    let id = parse_field::<u32>(fields, "id", "char", line_no)?;
    if id > MAX_GLYPH_ID {
        return Err(FontError::GlyphIdOutOfRange { line: line_no, id });
    }

    let x = parse_field::<f32>(fields, "x", "char", line_no)?;
    let y = parse_field::<f32>(fields, "y", "char", line_no)?;
    let width = parse_field::<f32>(fields, "width", "char", line_no)?;
    let height = parse_field::<f32>(fields, "height", "char", line_no)?;
    let xoffset = parse_field::<f32>(fields, "xoffset", "char", line_no)?;
    let yoffset = parse_field::<f32>(fields, "yoffset", "char", line_no)?;
    let xadvance = parse_field::<f32>(fields, "xadvance", "char", line_no)?;

    let atlas = Vec2::new(common.atlas_width, common.atlas_height);
    let uv_min = Vec2::new(x, y) / atlas;

    Ok(GlyphMetrics {
        id,
        uv_min,
        uv_max: uv_min + Vec2::new(width, height) / atlas,
        size: Vec2::new(width, height) / common.line_height,
        bearing: Vec2::new(xoffset, yoffset) / common.line_height,
        advance: xadvance / common.line_height,
        kernings: Vec::new(),
    })
}

/// Find `key=value` in a record's fields and parse the value.
///
/// Key matching is exact: `x=` never matches `xadvance=`.
fn parse_field<T: std::str::FromStr>(
    fields: &[&str],
    key: &'static str,
    record: &'static str,
    line_no: usize,
) -> FontResult<T> {
    let value = fields
        .iter()
        .find_map(|f| f.strip_prefix(key)?.strip_prefix('='))
        .ok_or(FontError::MissingField {
            line: line_no,
            record,
            key,
        })?;
    value.parse().map_err(|_| FontError::MalformedField {
        line: line_no,
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION: &str = "\
info face=\"test\" size=16\n\
common lineHeight=16 base=12 scaleW=128 scaleH=256 pages=1\n\
page id=0 file=\"test.png\"\n\
chars count=2\n\
char id=97 x=32 y=64 width=32 height=32 xoffset=4 yoffset=8 xadvance=16 page=0 chnl=15\n\
char id=98 x=64 y=64 width=16 height=32 xoffset=4 yoffset=8 xadvance=8 page=0 chnl=15\n\
kerning first=97 second=98 amount=-4\n";

    #[test]
    fn test_parse_basic_description() {
        let table = GlyphTable::parse(DESCRIPTION).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.max_id(), Some(98));
        assert_eq!(table.line_height(), 16.0);
        assert!(table.contains(97));
        assert!(table.contains(98));
        assert!(!table.contains(0));
        assert!(!table.contains(99));
    }

    #[test]
    fn test_metrics_are_normalized() {
        let table = GlyphTable::parse(DESCRIPTION).unwrap();
        let a = table.get(97).unwrap();
        assert_eq!(a.advance, 1.0);
        assert_eq!(a.size, Vec2::new(2.0, 2.0));
        assert_eq!(a.bearing, Vec2::new(0.25, 0.5));
        // UVs are normalized by the atlas dimensions, not the line height.
        assert_eq!(a.uv_min, Vec2::new(0.25, 0.25));
        assert_eq!(a.uv_max, Vec2::new(0.5, 0.375));
    }

    #[test]
    fn test_kerning_is_attached_to_second_glyph() {
        let table = GlyphTable::parse(DESCRIPTION).unwrap();
        assert!(table.get(97).unwrap().kernings.is_empty());
        let b = table.get(98).unwrap();
        assert_eq!(b.kernings.len(), 1);
        assert_eq!(b.kernings[0].previous, 97);
        assert_eq!(b.kernings[0].amount, -0.25);
    }

    #[test]
    fn test_kerning_for_undeclared_glyph_is_dropped() {
        let description = format!("{DESCRIPTION}kerning first=97 second=120 amount=-1\n");
        let table = GlyphTable::parse(&description).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_unknown_records_and_fields_are_ignored() {
        let description = format!("{DESCRIPTION}distanceField fieldType=sdf range=4\n");
        assert!(GlyphTable::parse(&description).is_ok());
    }

    #[test]
    fn test_char_before_common_fails() {
        let description =
            "char id=97 x=0 y=0 width=8 height=8 xoffset=0 yoffset=0 xadvance=10\n";
        assert_eq!(
            GlyphTable::parse(description),
            Err(FontError::MissingCommonRecord { line: 1 })
        );
    }

    #[test]
    fn test_glyph_id_out_of_range_fails() {
        let description = format!(
            "common lineHeight=10 scaleW=100 scaleH=100\n\
             char id={} x=0 y=0 width=8 height=8 xoffset=0 yoffset=0 xadvance=10\n",
            MAX_GLYPH_ID + 1
        );
        assert_eq!(
            GlyphTable::parse(&description),
            Err(FontError::GlyphIdOutOfRange {
                line: 2,
                id: MAX_GLYPH_ID + 1
            })
        );
    }

    #[test]
    fn test_missing_field_fails() {
        let description = "common lineHeight=10 scaleW=100 scaleH=100\n\
                           char id=97 x=0 y=0 width=8 height=8 xoffset=0 yoffset=0\n";
        assert_eq!(
            GlyphTable::parse(description),
            Err(FontError::MissingField {
                line: 2,
                record: "char",
                key: "xadvance"
            })
        );
    }

    #[test]
    fn test_malformed_field_fails() {
        let description = "common lineHeight=ten scaleW=100 scaleH=100\n";
        assert!(matches!(
            GlyphTable::parse(description),
            Err(FontError::MalformedField { key: "lineHeight", .. })
        ));
    }

    #[test]
    fn test_zero_line_height_fails() {
        let description = "common lineHeight=0 scaleW=100 scaleH=100\n";
        assert_eq!(
            GlyphTable::parse(description),
            Err(FontError::InvalidCommonRecord {
                line: 1,
                key: "lineHeight"
            })
        );
    }

    #[test]
    fn test_empty_description_yields_empty_table() {
        let table = GlyphTable::parse("").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.max_id(), None);
        assert!(table.get(97).is_none());
    }

    #[test]
    fn test_exact_key_matching() {
        // 'x=' must not match the 'xadvance' or 'xoffset' fields even when
        // they come first on the line.
        let description = "common lineHeight=10 scaleW=100 scaleH=100\n\
             char id=97 xadvance=10 xoffset=3 yoffset=0 x=50 y=0 width=8 height=8\n";
        let table = GlyphTable::parse(description).unwrap();
        let a = table.get(97).unwrap();
        assert_eq!(a.uv_min.x, 0.5);
        assert_eq!(a.bearing.x, 0.3);
        assert_eq!(a.advance, 1.0);
    }
}
