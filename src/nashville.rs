//! Nashville Number System conversion.
//!
//! Chord roots are placed on a 1–12 chromatic numbering starting at A♭ and
//! compared against the song key. The difference is mapped to a diatonic
//! scale degree; the chord's quality suffix is kept as-is.

use log::{debug, warn};

use crate::model::*;

/// Chromatic position of each spelled note, A♭ = 1 through G = 12.
const CHROMATIC_POSITIONS: &[(&str, i32)] = &[
    ("ab", 1),
    ("a", 2),
    ("a#", 3),
    ("bb", 3),
    ("b", 4),
    ("b#", 5),
    ("cb", 4),
    ("c", 5),
    ("c#", 6),
    ("db", 6),
    ("d", 7),
    ("d#", 8),
    ("eb", 8),
    ("e", 9),
    ("e#", 10),
    ("fb", 9),
    ("f", 10),
    ("f#", 11),
    ("gb", 11),
    ("g", 12),
];

/// Semitones above the tonic for each degree of the major scale.
const DIATONIC_DEGREES: &[(i32, u8)] = &[(0, 1), (2, 2), (4, 3), (5, 4), (7, 5), (9, 6), (11, 7)];

/// Chromatic position of a lower-case note name, or 0 if it is not a note.
pub fn chromatic_position(note: &str) -> i32 {
    CHROMATIC_POSITIONS
        .iter()
        .find(|(name, _)| *name == note)
        .map_or(0, |&(_, pos)| pos)
}

/// Scale degree for a chromatic distance above the key, or 0 when the
/// distance is not one of the seven diatonic offsets.
pub fn scale_degree(difference: i32, mode: DegreeMode) -> u8 {
    let difference = match mode {
        DegreeMode::Legacy => difference,
        DegreeMode::Wrapped => difference.rem_euclid(12),
    };
    DIATONIC_DEGREES
        .iter()
        .find(|(offset, _)| *offset == difference)
        .map_or(0, |&(_, degree)| degree)
}

/// Byte length of the chord's root: two for `[a-g][#b]`, otherwise the
/// first character.
fn root_len(chord: &str) -> usize {
    match chord.as_bytes() {
        [b'a'..=b'g', b'#' | b'b', ..] => 2,
        _ => chord.chars().next().map_or(0, char::len_utf8),
    }
}

/// Convert one chord name relative to a key's chromatic position.
///
/// Names without any of the letters a–g (repeat marks like `x2` or `%`)
/// are returned unchanged, as are names whose root is not a note (`N.C.`)
/// in [`DegreeMode::Wrapped`]. Everything else comes back lower-cased.
pub fn chord_to_number(name: &str, key_position: i32, mode: DegreeMode) -> String {
    let lower = name.to_lowercase();
    if !lower.contains(|c: char| ('a'..='g').contains(&c)) {
        return name.to_string();
    }

    let (root, suffix) = lower.split_at(root_len(&lower));
    let position = chromatic_position(root);
    if position == 0 && mode == DegreeMode::Wrapped {
        return name.to_string();
    }
    let degree = scale_degree(position - key_position, mode);
    format!("{degree}{suffix}")
}

/// Return a copy of the song with every chord rewritten as a Nashville number
/// relative to the key tag of the first section.
pub fn to_nashville(song: &Song, mode: DegreeMode) -> Song {
    let key = song.key().map(str::to_lowercase).unwrap_or_default();
    if key.is_empty() {
        warn!("'{}' declares no key in its first section; chords map against position 0", song.name);
    }
    let key_position = chromatic_position(&key);
    debug!("converting '{}' to Nashville numbers, key {key:?} at position {key_position}", song.name);

    let mut converted = song.clone();
    for chord in converted
        .sections
        .iter_mut()
        .flat_map(|s| s.lines.iter_mut())
        .flat_map(|l| l.chords.iter_mut())
    {
        chord.name = chord_to_number(&chord.name, key_position, mode);
    }
    converted
}
