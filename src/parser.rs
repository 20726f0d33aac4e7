//! Song text parser — converts chord-annotated lyric text into the Song model.
//!
//! The format is line oriented:
//! - `{key: value}` lines set a tag on the current section
//! - blank lines close the current section
//! - a line starting with `CCLI` ends the song; the rest is ignored
//! - any other line is lyrics with inline `[Chord]` markers

use log::trace;

use crate::error::{Error, Result};
use crate::model::*;

/// Lines starting with this marker end the song content.
pub const FOOTER_MARKER: &str = "CCLI";

const TAG_OPEN: char = '{';
const TAG_CLOSE: char = '}';
const TAG_SEPARATOR: &str = ": ";

/// Parse song text into its sections, in source order.
///
/// Every blank line produces a section boundary, so consecutive blank lines
/// yield empty sections. The trailing section is always included.
pub fn parse_sections(text: &str) -> Result<Vec<Section>> {
    let mut sections = Vec::new();
    let mut section = Section::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        if raw.starts_with(FOOTER_MARKER) {
            trace!("footer marker on line {line_no}, stopping");
            break;
        } else if raw.starts_with(TAG_OPEN) {
            let (key, value) = parse_tag(raw).map_err(|e| e.at_line(line_no))?;
            section.tags.insert(key, value);
        } else if !raw.is_empty() {
            section.lines.push(parse_line(raw).map_err(|e| e.at_line(line_no))?);
        } else {
            sections.push(std::mem::take(&mut section));
        }
    }
    sections.push(section);

    Ok(sections)
}

/// Parse song text into a [`Song`] with default canvas and display options.
pub fn parse_song(name: impl Into<String>, text: &str) -> Result<Song> {
    Ok(Song::new(name, parse_sections(text)?))
}

// ─── Tags ────────────────────────────────────────────────────────────

/// Split a `{key: value}` line into its key and value.
///
/// The separator is the first `": "`, so values may themselves contain it.
/// The value may be empty; the key may not.
pub fn parse_tag(raw: &str) -> Result<(String, String)> {
    let inner = raw
        .strip_prefix(TAG_OPEN)
        .ok_or_else(|| Error::format(format!("tag must start with '{TAG_OPEN}': {raw:?}")))?;
    let (key, rest) = inner
        .split_once(TAG_SEPARATOR)
        .ok_or_else(|| Error::format(format!("tag is missing the ': ' separator: {raw:?}")))?;
    let value = rest
        .strip_suffix(TAG_CLOSE)
        .ok_or_else(|| Error::format(format!("tag must end with '{TAG_CLOSE}': {raw:?}")))?;

    if key.is_empty() {
        return Err(Error::format(format!("tag has an empty key: {raw:?}")));
    }

    Ok((key.to_string(), value.to_string()))
}

// ─── Lyric lines ─────────────────────────────────────────────────────

/// Parse a lyric line, pulling out `[Chord]` markers.
///
/// Each chord is anchored at the number of lyric characters emitted before
/// its opening bracket. Carriage returns are dropped before scanning so they
/// never shift an offset.
pub fn parse_line(raw: &str) -> Result<Line> {
    let mut line = Line::default();
    let mut emitted = 0usize;
    let mut chars = raw.chars().filter(|&c| c != '\r').enumerate();

    while let Some((column, c)) = chars.next() {
        if c != '[' {
            line.lyrics.push(c);
            emitted += 1;
            continue;
        }

        let mut name = String::new();
        let mut closed = false;
        for (_, n) in chars.by_ref() {
            if n == ']' {
                closed = true;
                break;
            }
            name.push(n);
        }
        if !closed {
            return Err(Error::format(format!(
                "unterminated chord marker at column {}",
                column + 1
            )));
        }

        line.chords.push(Chord { name, char_offset: emitted });
    }

    Ok(line)
}
