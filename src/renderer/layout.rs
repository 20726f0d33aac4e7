//! Layout computation — picks the largest font size at which a section fits
//! the slide and works out where every lyric line and chord label goes.
//!
//! Each lyric line takes two rows of equal height: chords on top, lyrics
//! below. The resulting block is centered on the canvas.

use serde::Serialize;

use crate::model::*;
use super::constants::*;
use super::measure::{TextExtent, TextMeasurer};

// ═══════════════════════════════════════════════════════════════════════
// Layout structures
// ═══════════════════════════════════════════════════════════════════════

/// Outcome of the font size search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontFit {
    pub font_size: f64,
    /// Measured height of the longest line at `font_size`
    pub line_height: f64,
    /// Measured width of the longest line at `font_size`
    pub line_width: f64,
}

impl FontFit {
    /// False for sections with nothing to fit (no letters at all).
    pub fn has_text(&self) -> bool {
        self.line_height > 0.0 || self.line_width > 0.0
    }
}

/// Everything needed to draw one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionLayout {
    pub fit: FontFit,
    pub chord_font_size: f64,
    /// Height of one chord or lyric row
    pub row_height: f64,
    /// Left edge of the text block
    pub x_offset: f64,
    /// Top edge of the text block
    pub y_offset: f64,
    /// Space kept below each baseline for descenders
    pub descent: f64,
    /// Horizontal distance from `x_offset` of each chord, by `[line][chord]`
    pub chord_offsets: Vec<Vec<f64>>,
}

impl SectionLayout {
    /// Baseline of the chord row above line `line_idx` (top-left origin).
    pub fn chord_baseline(&self, line_idx: usize) -> f64 {
        self.row_bottom(2 * line_idx + 1) - self.descent
    }

    /// Baseline of the lyric row of line `line_idx` (top-left origin).
    pub fn lyric_baseline(&self, line_idx: usize) -> f64 {
        self.row_bottom(2 * line_idx + 2) - self.descent
    }

    /// Bottom edge of the text block.
    pub fn bottom(&self, line_count: usize) -> f64 {
        self.row_bottom(2 * line_count)
    }

    fn row_bottom(&self, rows: usize) -> f64 {
        self.y_offset + self.row_height * rows as f64
    }

    /// Absolute x of a chord label.
    pub fn chord_x(&self, line_idx: usize, chord_idx: usize) -> f64 {
        let offset = self
            .chord_offsets
            .get(line_idx)
            .and_then(|l| l.get(chord_idx))
            .copied()
            .unwrap_or(0.0);
        self.x_offset + offset
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Font size search
// ═══════════════════════════════════════════════════════════════════════

/// Find the largest whole font size at which the section's longest line is
/// narrower than the canvas and all its rows (two per line) are shorter.
///
/// The search counts up from [`MIN_FONT_SIZE`] and never returns less than
/// it, even when that size already overflows. Sections whose longest line
/// has no letters get [`DEFAULT_FONT_SIZE`] with a zero extent.
pub fn choose_font_size(section: &Section, canvas: Canvas, measurer: &dyn TextMeasurer) -> FontFit {
    let longest = section.longest_line().map_or("", |l| l.lyrics.as_str());
    if !longest.chars().any(char::is_alphabetic) {
        return FontFit { font_size: DEFAULT_FONT_SIZE, line_height: 0.0, line_width: 0.0 };
    }

    let rows = 2.0 * section.lines.len() as f64;
    let fits = |e: TextExtent| e.width < canvas.width && e.height * rows < canvas.height;

    let mut size = MIN_FONT_SIZE;
    let mut extent = measurer.measure(size, longest);
    if fits(extent) {
        while size < MAX_FONT_SIZE {
            let next = measurer.measure(size + 1.0, longest);
            if !fits(next) {
                break;
            }
            size += 1.0;
            extent = next;
        }
    }

    FontFit { font_size: size, line_height: extent.height, line_width: extent.width }
}

/// Horizontal offset of every chord: the measured width of the lyrics in
/// front of it at `font_size`. Indexed `[line][chord]`.
pub fn compute_pixel_offsets(section: &Section, font_size: f64, measurer: &dyn TextMeasurer) -> Vec<Vec<f64>> {
    section
        .lines
        .iter()
        .map(|line| {
            line.chords
                .iter()
                .map(|chord| match chord.char_offset {
                    0 => 0.0,
                    n => measurer.measure(font_size, line.prefix(n)).width,
                })
                .collect()
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════
// Section layout
// ═══════════════════════════════════════════════════════════════════════

/// Fit the section, place its chords and center the block on the canvas.
///
/// Baselines sit above the bottom of their row by the font's descent, so
/// descenders stay inside the block. Sections with nothing to fit keep their
/// chords at the left margin and use the font size as the row height.
pub fn layout_section(section: &Section, canvas: Canvas, measurer: &dyn TextMeasurer) -> SectionLayout {
    let fit = choose_font_size(section, canvas, measurer);

    let (chord_offsets, row_height) = if fit.has_text() {
        (compute_pixel_offsets(section, fit.font_size, measurer), fit.line_height)
    } else {
        let zeros = section.lines.iter().map(|l| vec![0.0; l.chords.len()]).collect();
        (zeros, fit.font_size)
    };

    let block_height = 2.0 * section.lines.len() as f64 * row_height;
    let y_offset = ((canvas.height - block_height) / 2.0).max(0.0);
    let x_offset = ((canvas.width - fit.line_width) / 2.0).max(0.0);

    SectionLayout {
        fit,
        chord_font_size: (fit.font_size - CHORD_SIZE_REDUCTION).max(MIN_CHORD_FONT_SIZE),
        row_height,
        x_offset,
        y_offset,
        descent: measurer.descent(fit.font_size),
        chord_offsets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_sections;

    /// Every character is exactly `font_size / 2` wide and `font_size` tall.
    struct HalfEm;

    impl TextMeasurer for HalfEm {
        fn measure(&self, font_size: f64, text: &str) -> TextExtent {
            TextExtent { width: text.chars().count() as f64 * font_size / 2.0, height: font_size }
        }
    }

    fn section(text: &str) -> Section {
        parse_sections(text).unwrap().remove(0)
    }

    fn canvas(width: f64, height: f64) -> Canvas {
        Canvas { width, height }
    }

    #[test]
    fn width_bound_limits_size() {
        // 10 chars at size s are 5s wide; 5s < 500 holds up to s = 99.
        let s = section("abcdefghij");
        let fit = choose_font_size(&s, canvas(500.0, 10_000.0), &HalfEm);
        assert_eq!(fit.font_size, 99.0);
        assert_eq!(fit.line_width, 495.0);
        assert_eq!(fit.line_height, 99.0);
    }

    #[test]
    fn height_bound_limits_size() {
        // Two lines are four rows: 4s < 200 holds up to s = 49.
        let s = section("ab\ncd");
        let fit = choose_font_size(&s, canvas(10_000.0, 200.0), &HalfEm);
        assert_eq!(fit.font_size, 49.0);
    }

    #[test]
    fn longest_line_drives_the_fit() {
        let s = section("short\na much longer line here\nmid length");
        let fit = choose_font_size(&s, canvas(1000.0, 10_000.0), &HalfEm);
        // 23 chars: 11.5s < 1000 up to s = 86.
        assert_eq!(fit.font_size, 86.0);
    }

    #[test]
    fn no_letters_means_default_size() {
        let s = section("[G] [C]\n1 2 3");
        let fit = choose_font_size(&s, canvas(1920.0, 1080.0), &HalfEm);
        assert_eq!(fit, FontFit { font_size: DEFAULT_FONT_SIZE, line_height: 0.0, line_width: 0.0 });
        assert!(!fit.has_text());
    }

    #[test]
    fn overflow_at_minimum_keeps_minimum() {
        let s = section("a line far too long for this tiny canvas");
        let fit = choose_font_size(&s, canvas(50.0, 50.0), &HalfEm);
        assert_eq!(fit.font_size, MIN_FONT_SIZE);
    }

    #[test]
    fn bigger_canvas_never_shrinks_the_font() {
        let s = section("[G]Amazing grace how [D]sweet the sound\nThat saved a [G]wretch like me");
        let mut last = 0.0;
        for step in 1..30 {
            let size = step as f64 * 100.0;
            let fit = choose_font_size(&s, canvas(size * 16.0 / 9.0, size), &HalfEm);
            assert!(fit.font_size >= last, "font shrank at canvas height {size}");
            last = fit.font_size;
        }
    }

    #[test]
    fn pixel_offsets_are_prefix_widths() {
        let s = section("[G]Amazing [C]grace");
        let offsets = compute_pixel_offsets(&s, 20.0, &HalfEm);
        assert_eq!(offsets, vec![vec![0.0, 80.0]]);
        assert_eq!(offsets[0][1], HalfEm.measure(20.0, "Amazing ").width);
    }

    #[test]
    fn layout_centers_the_block() {
        let s = section("[C]abcdefghij\nklm");
        let layout = layout_section(&s, canvas(500.0, 1000.0), &HalfEm);
        assert_eq!(layout.fit.font_size, 99.0);
        assert_eq!(layout.x_offset, 2.5);
        // Four rows of 99 in 1000.
        assert_eq!(layout.y_offset, 302.0);
        assert_eq!(layout.chord_baseline(0), 401.0);
        assert_eq!(layout.lyric_baseline(0), 500.0);
        assert_eq!(layout.lyric_baseline(1), 698.0);
        assert_eq!(layout.chord_font_size, 59.0);
        assert_eq!(layout.chord_x(0, 0), 2.5);
    }

    /// `HalfEm` with a quarter of each line box below the baseline.
    struct Descending;

    impl TextMeasurer for Descending {
        fn measure(&self, font_size: f64, text: &str) -> TextExtent {
            HalfEm.measure(font_size, text)
        }

        fn descent(&self, font_size: f64) -> f64 {
            font_size / 4.0
        }
    }

    #[test]
    fn descenders_stay_inside_the_block() {
        let s = section("[C]abcdefghij\nklm");
        let layout = layout_section(&s, canvas(500.0, 1000.0), &Descending);
        assert_eq!(layout.descent, 24.75);
        assert_eq!(layout.chord_baseline(0), 376.25);
        assert_eq!(layout.lyric_baseline(1), 673.25);
        assert_eq!(layout.lyric_baseline(1) + layout.descent, layout.bottom(2));
        assert_eq!(layout.bottom(2), 698.0);
    }

    #[test]
    fn empty_fit_skips_alignment() {
        let s = section("[G]...[C]!!!");
        let layout = layout_section(&s, canvas(400.0, 300.0), &HalfEm);
        assert_eq!(layout.chord_offsets, vec![vec![0.0, 0.0]]);
        assert_eq!(layout.row_height, DEFAULT_FONT_SIZE);
        assert_eq!(layout.x_offset, 200.0);
        assert_eq!(layout.chord_font_size, MIN_CHORD_FONT_SIZE);
    }
}
