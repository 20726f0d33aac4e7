//! Slide renderer — turns the displayable sections of a Song into slides.
//!
//! Each section with a non-empty comment tag is laid out on its own
//! canvas and drawn as a self-contained SVG, which [`raster::Rasterizer`]
//! converts to PNG.

mod constants;
mod svg_builder;
pub mod layout;
pub mod measure;
pub mod raster;

use log::debug;
use serde::Serialize;

use crate::model::*;
pub use constants::{DEFAULT_FONT_SIZE, MIN_FONT_SIZE};
use layout::{layout_section, SectionLayout};
use measure::TextMeasurer;
use svg_builder::SvgBuilder;

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Colors and font family used when drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideStyle {
    /// Family written into the SVG; `None` leaves it to the rasterizer
    pub font_family: Option<String>,
    pub font_color: Rgba,
    pub background_color: Rgba,
}

impl SlideStyle {
    pub fn from_display(display: &DisplayOptions, font_family: Option<&str>) -> Self {
        Self {
            font_family: font_family.map(String::from),
            font_color: display.font_color,
            background_color: display.background_color,
        }
    }
}

/// One rendered section.
#[derive(Debug, Clone, Serialize)]
pub struct Slide {
    /// The section's comment tag; also the output file stem
    pub title: String,
    /// Index of the section within the song
    pub section_index: usize,
    pub layout: SectionLayout,
    #[serde(skip)]
    pub svg: String,
}

/// Draw a laid-out section: chord row above each lyric row.
pub fn render_section_to_svg(
    section: &Section,
    layout: &SectionLayout,
    canvas: Canvas,
    style: &SlideStyle,
) -> String {
    let mut svg = SvgBuilder::new(canvas.width, canvas.height, style.font_family.as_deref());

    let bg = style.background_color;
    svg.rect(0.0, 0.0, canvas.width, canvas.height, &bg.to_hex(), bg.opacity());

    let fill = style.font_color.to_hex();
    let opacity = style.font_color.opacity();
    for (li, line) in section.lines.iter().enumerate() {
        let chord_y = layout.chord_baseline(li);
        for (ci, chord) in line.chords.iter().enumerate() {
            svg.text(layout.chord_x(li, ci), chord_y, &chord.name, layout.chord_font_size, &fill, opacity);
        }
        svg.text(
            layout.x_offset,
            layout.lyric_baseline(li),
            &line.lyrics,
            layout.fit.font_size,
            &fill,
            opacity,
        );
    }

    svg.build()
}

/// Lay out and draw every displayable section of the song, in order.
pub fn render_song_to_slides(
    song: &Song,
    measurer: &dyn TextMeasurer,
    font_family: Option<&str>,
) -> Vec<Slide> {
    let style = SlideStyle::from_display(&song.display, font_family);

    song.displayable_sections()
        .filter_map(|(section_index, section)| {
            let title = section.comment()?.to_string();
            let layout = layout_section(section, song.canvas, measurer);
            debug!(
                "slide '{title}': font size {} ({} lines, {} chords)",
                layout.fit.font_size,
                section.lines.len(),
                section.lines.iter().map(|l| l.chords.len()).sum::<usize>()
            );
            let svg = render_section_to_svg(section, &layout, song.canvas, &style);
            Some(Slide { title, section_index, layout, svg })
        })
        .collect()
}
