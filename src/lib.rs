//! chordslides — chord-annotated song parser and projection slide renderer.
//!
//! Reads ChordPro-style text (lyrics with inline `[Chord]` markers, `{key: value}`
//! tag lines, blank-line section breaks) and renders one PNG per section that
//! carries a `comment` tag, with chords aligned above the lyric characters.
//!
//! # Example
//! ```no_run
//! use chordslides::{parse_file, render_song_to_slides};
//! use chordslides::renderer::measure::EstimatedMeasurer;
//!
//! let song = parse_file("path/to/song.cho").unwrap();
//! println!("Sections: {}", song.sections.len());
//! for slide in render_song_to_slides(&song, &EstimatedMeasurer::default(), None) {
//!     println!("{}: font size {}", slide.title, slide.layout.fit.font_size);
//! }
//! ```

pub mod error;
pub mod model;
pub mod nashville;
pub mod output;
pub mod parser;
pub mod renderer;
pub mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

pub use error::{Error, Result};
pub use model::*;
pub use nashville::to_nashville;
pub use parser::{parse_line, parse_sections, parse_song, parse_tag};
pub use renderer::render_song_to_slides;
pub use settings::{RawSettings, Settings};

use renderer::measure::{EstimatedMeasurer, FontMeasurer, FontSource, LoadedFont, TextMeasurer};
use renderer::raster::Rasterizer;

/// Parse a song file with default canvas and display options.
/// The song is named after the file, without its extension.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Song> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

    let mut song = parse_song(settings::song_name_from_path(path), &text)?;
    song.source = Some(path.to_path_buf());
    Ok(song)
}

/// Read and parse the configured input, applying the run's canvas and
/// display options, and convert to Nashville numbers if enabled.
pub fn load_song(settings: &Settings) -> Result<Song> {
    let text = fs::read_to_string(&settings.input).map_err(|e| Error::io(&settings.input, e))?;

    let song = Song {
        name: settings.name.clone(),
        source: Some(settings.input.clone()),
        canvas: settings.canvas,
        display: settings.display.clone(),
        sections: parse_sections(&text)?,
    };

    if song.displayable_sections().next().is_none() {
        warn!("'{}' has no sections with a comment tag; nothing will be rendered", song.name);
    }

    if song.display.nashville {
        Ok(to_nashville(&song, song.display.degree_mode))
    } else {
        Ok(song)
    }
}

/// Convert a song to JSON, e.g. for inspecting what the parser produced.
pub fn song_to_json(song: &Song) -> Result<String> {
    serde_json::to_string_pretty(song).map_err(|e| Error::Render(format!("JSON serialization error: {e}")))
}

/// Run a whole conversion: parse, optionally transpose, lay out, and write
/// one PNG per displayable section. Returns the written paths in order.
pub fn convert(settings: &Settings) -> Result<Vec<PathBuf>> {
    let song = load_song(settings)?;

    let font = settings
        .display
        .font
        .as_ref()
        .map(|path| LoadedFont::load(&FontSource::Path(path.clone())))
        .transpose()?;

    let estimated = EstimatedMeasurer::default();
    let font_measurer = font.as_ref().map(FontMeasurer::new).transpose()?;
    let measurer: &dyn TextMeasurer = match &font_measurer {
        Some(m) => m,
        None => &estimated,
    };

    let slides = render_song_to_slides(&song, measurer, font.as_ref().map(|f| f.family.as_str()));
    let rasterizer = Rasterizer::new(font.as_ref());
    let written = output::write_slides(&slides, &settings.song_dir(), &rasterizer)?;

    info!("'{}': {} of {} sections rendered", song.name, written.len(), song.sections.len());
    Ok(written)
}
