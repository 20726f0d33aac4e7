//! Shared constants for the slide renderer (all in pixels).

// ── Font size search ────────────────────────────────────────────────
pub const MIN_FONT_SIZE: f64 = 12.0;
/// Size reported for sections with no letters to fit.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;
pub(super) const MAX_FONT_SIZE: f64 = 4096.0;

// ── Chords ──────────────────────────────────────────────────────────
pub(super) const CHORD_SIZE_REDUCTION: f64 = 40.0; // chords are drawn smaller than lyrics
pub(super) const MIN_CHORD_FONT_SIZE: f64 = 10.0;
