//! Run settings — the string-typed settings contract and its validation.
//!
//! Settings arrive as text, from a TOML file and/or command-line flags, and
//! are resolved once into typed values before any song is parsed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::*;

/// Settings as supplied by the user, before validation.
///
/// Every field is optional text so a settings file and command-line flags
/// can be layered with [`RawSettings::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    /// Display name; defaults to the input file name without extension
    pub name: Option<String>,
    pub input: Option<String>,
    pub font: Option<String>,
    /// `#RRGGBB` or `#RGB`
    pub font_color: Option<String>,
    pub background_color: Option<String>,
    /// `"true"` or `"false"`
    pub nashville: Option<String>,
    /// Reduce key distances modulo 12 when converting to numbers
    pub nashville_wrap: Option<String>,
    pub slide_delimiter: Option<String>,
    pub height: Option<String>,
    pub width: Option<String>,
    /// Parent directory for the song's slide folder
    pub output_dir: Option<String>,
}

impl RawSettings {
    /// Load settings from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("invalid settings file: {e}")))
    }

    /// Layer `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merge(self, overrides: RawSettings) -> Self {
        Self {
            name: overrides.name.or(self.name),
            input: overrides.input.or(self.input),
            font: overrides.font.or(self.font),
            font_color: overrides.font_color.or(self.font_color),
            background_color: overrides.background_color.or(self.background_color),
            nashville: overrides.nashville.or(self.nashville),
            nashville_wrap: overrides.nashville_wrap.or(self.nashville_wrap),
            slide_delimiter: overrides.slide_delimiter.or(self.slide_delimiter),
            height: overrides.height.or(self.height),
            width: overrides.width.or(self.width),
            output_dir: overrides.output_dir.or(self.output_dir),
        }
    }
}

/// Validated settings for one conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub name: String,
    pub input: PathBuf,
    /// Slides are written to `output_dir/<name>/`
    pub output_dir: PathBuf,
    pub canvas: Canvas,
    pub display: DisplayOptions,
}

impl Settings {
    pub fn resolve(raw: RawSettings) -> Result<Self> {
        let input = raw
            .input
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| Error::Config("no input file given".into()))?;

        let name = match raw.name {
            Some(name) if !name.is_empty() => name,
            _ => song_name_from_path(&input),
        };

        let defaults = Canvas::default();
        let canvas = Canvas {
            width: optional(raw.width.as_deref(), "width", parse_dimension)?.unwrap_or(defaults.width),
            height: optional(raw.height.as_deref(), "height", parse_dimension)?
                .unwrap_or(defaults.height),
        };

        let defaults = DisplayOptions::default();
        let wrap = optional(raw.nashville_wrap.as_deref(), "nashville_wrap", parse_bool)?.unwrap_or(false);
        let display = DisplayOptions {
            font: raw.font.filter(|f| !f.is_empty()).map(PathBuf::from),
            font_color: optional(raw.font_color.as_deref(), "font_color", parse_hex_color)?
                .unwrap_or(defaults.font_color),
            background_color: optional(raw.background_color.as_deref(), "background_color", parse_hex_color)?
                .unwrap_or(defaults.background_color),
            nashville: optional(raw.nashville.as_deref(), "nashville", parse_bool)?.unwrap_or(false),
            degree_mode: if wrap { DegreeMode::Wrapped } else { DegreeMode::Legacy },
            slide_delimiter: raw.slide_delimiter.unwrap_or_default(),
        };

        let output_dir = match raw.output_dir {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        };

        Ok(Self { name, input, output_dir, canvas, display })
    }

    /// Directory the slides of this song are written to.
    pub fn song_dir(&self) -> PathBuf {
        self.output_dir.join(&self.name)
    }
}

fn optional<T>(
    value: Option<&str>,
    field: &str,
    parse: impl Fn(&str) -> Result<T>,
) -> Result<Option<T>> {
    match value {
        Some(v) => parse(v)
            .map(Some)
            .map_err(|e| Error::Config(format!("{field}: {}", strip_kind(e)))),
        None => Ok(None),
    }
}

fn strip_kind(err: Error) -> String {
    match err {
        Error::Config(message) => message,
        other => other.to_string(),
    }
}

// ─── Field parsers ───────────────────────────────────────────────────

/// Song name from a file path: the file name without its extension.
pub fn song_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "untitled".to_string())
}

/// Parse `#RRGGBB` or `#RGB` into an opaque color.
pub fn parse_hex_color(s: &str) -> Result<Rgba> {
    let digits = s
        .strip_prefix('#')
        .ok_or_else(|| Error::Config(format!("color {s:?} must start with '#'")))?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::Config(format!("color {s:?} has non-hex digits")));
    }

    // All digits are ASCII here, so byte slicing is safe.
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16);
    let parsed = match digits.len() {
        6 => (channel(0..2), channel(2..4), channel(4..6)),
        3 => (channel(0..1), channel(1..2), channel(2..3)),
        _ => {
            return Err(Error::Config(format!(
                "color {s:?} has invalid length, must be 7 or 4"
            )))
        }
    };
    let scale = if digits.len() == 3 { 17 } else { 1 };

    match parsed {
        (Ok(r), Ok(g), Ok(b)) => Ok(Rgba { r: r * scale, g: g * scale, b: b * scale, a: 255 }),
        _ => Err(Error::Config(format!("color {s:?} is not valid hex"))),
    }
}

/// Parse a boolean the way most config formats spell one.
pub fn parse_bool(s: &str) -> Result<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(Error::Config(format!("{s:?} is not a boolean"))),
    }
}

/// Parse a canvas dimension in pixels.
pub fn parse_dimension(s: &str) -> Result<f64> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{s:?} is not a number")))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::Config(format!("{s:?} must be a positive size")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(input: &str) -> RawSettings {
        RawSettings { input: Some(input.into()), ..Default::default() }
    }

    #[test]
    fn name_from_path() {
        assert_eq!(song_name_from_path(Path::new("/a/b/song.cho")), "song");
        assert_eq!(song_name_from_path(Path::new("song.cho")), "song");
        assert_eq!(song_name_from_path(Path::new("/a/b/amazing.grace.cho")), "amazing.grace");
    }

    #[test]
    fn hex_colors() {
        let red = Rgba { r: 255, g: 0, b: 0, a: 255 };
        assert_eq!(parse_hex_color("#ff0000").unwrap(), red);
        assert_eq!(parse_hex_color("#f00").unwrap(), red);
        assert_eq!(parse_hex_color("#FfF").unwrap(), Rgba::WHITE);
        assert!(parse_hex_color("#ff00").is_err());
        assert!(parse_hex_color("ff0000").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
    }

    #[test]
    fn booleans() {
        assert!(parse_bool("true").unwrap());
        assert!(!parse_bool("False").unwrap());
        assert!(parse_bool("yes").is_err());
    }

    #[test]
    fn defaults_resolve() {
        let settings = Settings::resolve(raw("/songs/amazing.cho")).unwrap();
        assert_eq!(settings.name, "amazing");
        assert_eq!(settings.output_dir, PathBuf::from("/songs"));
        assert_eq!(settings.song_dir(), PathBuf::from("/songs/amazing"));
        assert_eq!(settings.canvas, Canvas::default());
        assert_eq!(settings.display, DisplayOptions::default());
    }

    #[test]
    fn bare_file_name_writes_next_to_it() {
        let settings = Settings::resolve(raw("amazing.cho")).unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("."));
    }

    #[test]
    fn explicit_values_resolve() {
        let settings = Settings::resolve(RawSettings {
            name: Some("Grace".into()),
            font_color: Some("#0f0".into()),
            nashville: Some("true".into()),
            nashville_wrap: Some("true".into()),
            height: Some("720".into()),
            width: Some("1280".into()),
            slide_delimiter: Some("---".into()),
            ..raw("in.cho")
        })
        .unwrap();
        assert_eq!(settings.name, "Grace");
        assert_eq!(settings.canvas, Canvas { width: 1280.0, height: 720.0 });
        assert_eq!(settings.display.font_color, Rgba { r: 0, g: 255, b: 0, a: 255 });
        assert!(settings.display.nashville);
        assert_eq!(settings.display.degree_mode, DegreeMode::Wrapped);
        assert_eq!(settings.display.slide_delimiter, "---");
    }

    #[test]
    fn malformed_fields_are_config_errors() {
        for bad in [
            RawSettings { height: Some("tall".into()), ..raw("a.cho") },
            RawSettings { width: Some("-5".into()), ..raw("a.cho") },
            RawSettings { nashville: Some("maybe".into()), ..raw("a.cho") },
            RawSettings { font_color: Some("#12345".into()), ..raw("a.cho") },
            RawSettings::default(),
        ] {
            assert!(matches!(Settings::resolve(bad), Err(Error::Config(_))));
        }
    }

    #[test]
    fn toml_and_overrides() {
        let file = RawSettings::from_toml(
            "input = \"a.cho\"\nheight = \"720\"\nnashville = \"false\"\n",
        )
        .unwrap();
        let merged = file.merge(RawSettings { nashville: Some("true".into()), ..Default::default() });
        assert_eq!(merged.input.as_deref(), Some("a.cho"));
        assert_eq!(merged.height.as_deref(), Some("720"));
        assert_eq!(merged.nashville.as_deref(), Some("true"));
    }

    #[test]
    fn unknown_toml_keys_are_rejected() {
        assert!(RawSettings::from_toml("colour = \"#fff\"").is_err());
    }
}
