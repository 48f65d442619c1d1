//! SDF bitmap-font text layout.
//!
//! This crate turns a UTF-8 (or UTF-16) string plus a BMFont-style glyph
//! atlas description into a renderable run of positioned glyph quads:
//! - **Glyph table**: parses the text description format into normalized
//!   per-glyph metrics (atlas UVs, quad size/bearing, advance, kerning)
//! - **Run building**: hand-rolled UTF-8 decoding with greedy line wrapping
//!   at space candidates, hard breaks on line feeds, and forced mid-word
//!   breaks for oversized words
//! - **Measurement**: line counts and per-line widths for alignment
//! - **Geometry**: projection into textured quads with the nine
//!   left/center/right x top/middle/bottom alignments
//!
//! GPU buffer upload, atlas image decoding and shader management are out of
//! scope; the quad vertex stream is the handoff to the renderer.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sdfont::{Alignment, SdfFont};
//! use glam::Vec2;
//!
//! let font = SdfFont::load("fonts/evolventa.fnt").unwrap();
//!
//! // Measure without drawing
//! let width = font.line_width(24.0, "Hello, World!");
//! let lines = font.block_line_count(200.0, 24.0, "Hello, World!");
//!
//! // Project into quad vertices for the renderer
//! let vertices = font.draw_string(
//!     Vec2::new(100.0, 100.0),
//!     24.0,
//!     false,
//!     "Hello, World!",
//!     Alignment::TOP_LEFT,
//! );
//! # let _ = (width, lines, vertices);
//! ```
//!
//! Missing glyphs and malformed UTF-8 never fail a layout call: the run
//! builder drops them (and counts the drops for diagnostics) so a bad code
//! point cannot abort a frame. Font loading, in contrast, fails loudly with
//! [`FontError`].

pub mod atlas;
pub mod error;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod measure;

pub use atlas::{GlyphKerning, GlyphMetrics, GlyphTable, MAX_GLYPH_ID};
pub use error::{FontError, FontResult};
pub use font::SdfFont;
pub use geometry::{
    Alignment, HorizontalAlign, QuadVertex, VerticalAlign, project_run, quad_indices,
};
pub use layout::{GlyphRun, RunBuilder, RunToken};
pub use measure::LineWidths;

// Re-export the math types appearing in the public API.
pub use glam::{Vec2, Vec3};
