//! Data model for a parsed chord-annotated song.
//!
//! A song is a list of sections separated by blank lines in the source.
//! Each section carries its own tags and the lyric lines with their chords.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Tag naming a section's slide title and output file name.
pub const COMMENT_TAG: &str = "comment";
/// Tag declaring the musical key, read from the first section only.
pub const KEY_TAG: &str = "key";

/// A complete song parsed from one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// Display name; also the name of the output directory
    pub name: String,
    /// File the song was read from, if any
    pub source: Option<PathBuf>,
    /// Target image size in pixels
    pub canvas: Canvas,
    pub display: DisplayOptions,
    /// Sections in source order, including ones that will not be rendered
    pub sections: Vec<Section>,
}

/// A block of lines between blank-line separators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub lines: Vec<Line>,
    pub tags: HashMap<String, String>,
}

/// One lyric line with the chords anchored into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Lyric text with chord markup and carriage returns removed
    pub lyrics: String,
    /// Chords in left-to-right order of appearance
    pub chords: Vec<Chord>,
}

/// A chord annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    /// Chord label, e.g. "F#m", or "4m" after Nashville conversion
    pub name: String,
    /// Character index into the owning line's lyrics the chord sits above
    pub char_offset: usize,
}

/// Pixel dimensions of an output slide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self { width: 1920.0, height: 1080.0 }
    }
}

/// An opaque-or-not 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Rgba = Rgba { r: 255, g: 255, b: 255, a: 255 };

    /// `#rrggbb` form used for SVG fill attributes.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a 0.0–1.0 opacity.
    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

/// How a chord's chromatic distance from the key is turned into a degree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegreeMode {
    /// Look up the raw difference; anything outside the seven diatonic
    /// offsets (including negative differences) becomes degree 0.
    #[default]
    Legacy,
    /// Reduce the difference modulo 12 before the lookup.
    Wrapped,
}

/// Song-wide presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// Font file used for measuring and drawing, if one was supplied
    pub font: Option<PathBuf>,
    pub font_color: Rgba,
    pub background_color: Rgba,
    /// Convert chord names to Nashville numbers before layout
    pub nashville: bool,
    pub degree_mode: DegreeMode,
    /// Passed through for downstream consumers; not interpreted here
    pub slide_delimiter: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            font: None,
            font_color: Rgba::WHITE,
            background_color: Rgba::BLACK,
            nashville: false,
            degree_mode: DegreeMode::Legacy,
            slide_delimiter: String::new(),
        }
    }
}

impl Song {
    pub fn new(name: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            name: name.into(),
            source: None,
            canvas: Canvas::default(),
            display: DisplayOptions::default(),
            sections,
        }
    }

    /// The key declared by the first section, if any.
    pub fn key(&self) -> Option<&str> {
        self.sections
            .first()
            .and_then(|s| s.tags.get(KEY_TAG))
            .map(String::as_str)
    }

    /// Sections that become slides, paired with their index in `sections`.
    pub fn displayable_sections(&self) -> impl Iterator<Item = (usize, &Section)> {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_displayable())
    }

    /// Total number of chords across all sections.
    pub fn chord_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.lines)
            .map(|l| l.chords.len())
            .sum()
    }
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    /// The slide title, present only when the comment tag is non-empty.
    pub fn comment(&self) -> Option<&str> {
        self.tags
            .get(COMMENT_TAG)
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }

    pub fn is_displayable(&self) -> bool {
        self.comment().is_some()
    }

    /// The line with the most lyric characters; the first one wins ties.
    pub fn longest_line(&self) -> Option<&Line> {
        let mut longest: Option<&Line> = None;
        for line in &self.lines {
            let longer = match longest {
                Some(current) => line.char_count() > current.char_count(),
                None => true,
            };
            if longer {
                longest = Some(line);
            }
        }
        longest
    }
}

impl Line {
    pub fn char_count(&self) -> usize {
        self.lyrics.chars().count()
    }

    /// The lyrics before character index `char_offset`, clamped to the line.
    pub fn prefix(&self, char_offset: usize) -> &str {
        match self.lyrics.char_indices().nth(char_offset) {
            Some((byte_idx, _)) => &self.lyrics[..byte_idx],
            None => &self.lyrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(lyrics: &str) -> Line {
        Line { lyrics: lyrics.into(), chords: Vec::new() }
    }

    #[test]
    fn comment_must_be_non_empty() {
        let mut section = Section::new();
        assert!(!section.is_displayable());

        section.tags.insert(COMMENT_TAG.into(), String::new());
        assert!(!section.is_displayable());

        section.tags.insert(COMMENT_TAG.into(), "Verse 1".into());
        assert_eq!(section.comment(), Some("Verse 1"));
    }

    #[test]
    fn longest_line_keeps_first_on_tie() {
        let section = Section {
            lines: vec![line("abc"), line("xyz"), line("ab")],
            tags: HashMap::new(),
        };
        assert_eq!(section.longest_line().map(|l| l.lyrics.as_str()), Some("abc"));
    }

    #[test]
    fn prefix_counts_characters_not_bytes() {
        let l = line("童年 time");
        assert_eq!(l.prefix(0), "");
        assert_eq!(l.prefix(2), "童年");
        assert_eq!(l.prefix(99), "童年 time");
    }

    #[test]
    fn rgba_hex() {
        assert_eq!(Rgba { r: 255, g: 0, b: 16, a: 255 }.to_hex(), "#ff0010");
    }
}
