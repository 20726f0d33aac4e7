//! Text measurement — the only thing layout needs from a font.

use std::fs;
use std::path::PathBuf;

use log::debug;
use ttf_parser::{name_id, Face};

use crate::error::{Error, Result};

/// Average glyph advance relative to the font size, for estimated widths.
const CHAR_WIDTH_FACTOR: f64 = 0.55;
/// Line box height relative to the font size, for estimated heights.
const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Size of a single line of text at some font size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
}

/// Measures single-line text.
///
/// Implementations must be non-decreasing in `font_size` for a fixed text;
/// the font size search relies on it.
pub trait TextMeasurer {
    fn measure(&self, font_size: f64, text: &str) -> TextExtent;

    /// Distance from the baseline down to the bottom of the line box.
    fn descent(&self, _font_size: f64) -> f64 {
        0.0
    }
}

/// Estimates extents from the character count alone.
///
/// Used when no font file is configured, and handy as a deterministic
/// measurer in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl Default for EstimatedMeasurer {
    fn default() -> Self {
        Self { char_width_factor: CHAR_WIDTH_FACTOR, line_height_factor: LINE_HEIGHT_FACTOR }
    }
}

impl TextMeasurer for EstimatedMeasurer {
    fn measure(&self, font_size: f64, text: &str) -> TextExtent {
        TextExtent {
            width: text.chars().count() as f64 * font_size * self.char_width_factor,
            height: font_size * self.line_height_factor,
        }
    }

    fn descent(&self, font_size: f64) -> f64 {
        (font_size * (self.line_height_factor - 1.0)).max(0.0)
    }
}

// ─── Fonts ───────────────────────────────────────────────────────────

/// Where the font comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum FontSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A parsed-once font file shared by measurement and rasterization.
#[derive(Debug, Clone)]
pub struct LoadedFont {
    pub family: String,
    data: Vec<u8>,
}

impl LoadedFont {
    pub fn load(source: &FontSource) -> Result<Self> {
        let data = match source {
            FontSource::Path(path) => fs::read(path).map_err(|e| Error::io(path, e))?,
            FontSource::Bytes(bytes) => bytes.clone(),
        };
        Self::from_bytes(data)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let face = Face::parse(&data, 0).map_err(|e| Error::Font(format!("cannot parse font: {e}")))?;
        let family = face
            .names()
            .into_iter()
            .filter(|n| n.name_id == name_id::FAMILY && n.is_unicode())
            .find_map(|n| n.to_string())
            .ok_or_else(|| Error::Font("font has no family name".into()))?;
        debug!("loaded font family '{family}' ({} bytes)", data.len());
        Ok(Self { family, data })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Measures text from the glyph advances of a real font.
///
/// Width is the sum of horizontal advances; height is the ascender to
/// descender distance, so it does not depend on which glyphs are used.
pub struct FontMeasurer<'a> {
    face: Face<'a>,
}

impl<'a> FontMeasurer<'a> {
    pub fn new(font: &'a LoadedFont) -> Result<Self> {
        let face = Face::parse(&font.data, 0)
            .map_err(|e| Error::Font(format!("cannot parse font '{}': {e}", font.family)))?;
        Ok(Self { face })
    }

    fn scale(&self, font_size: f64) -> f64 {
        font_size / f64::from(self.face.units_per_em())
    }
}

impl TextMeasurer for FontMeasurer<'_> {
    fn measure(&self, font_size: f64, text: &str) -> TextExtent {
        let face = &self.face;
        let fallback = face.glyph_index('?');

        let advance: u32 = text
            .chars()
            .filter_map(|c| face.glyph_index(c).or(fallback))
            .filter_map(|g| face.glyph_hor_advance(g))
            .map(u32::from)
            .sum();
        let height = i32::from(face.ascender()) - i32::from(face.descender());

        let scale = self.scale(font_size);
        TextExtent { width: f64::from(advance) * scale, height: f64::from(height) * scale }
    }

    fn descent(&self, font_size: f64) -> f64 {
        -f64::from(self.face.descender()) * self.scale(font_size)
    }
}
