// Session preferences: the process-wide store of user-visible state.
//
// The theory core is pure; everything a user selects (root, scale, tuning,
// theme, circle-of-fifths key, focused chord) lives here instead, with an
// explicit load-from-persisted-or-default lifecycle. Persistence is a
// single JSON file.
//
// Hydration policy: the core fails loudly on malformed input, but a stale
// or hand-edited preferences file should never take the app down. So after
// decoding, every field is validated against the core and invalid values
// are replaced with defaults, field by field. A chord-focus snapshot is
// persisted as (key, mode, kind, degree index) and recomputed into full
// chord tones on demand, so the stored form can never drift from the
// engine's spelling.

use fretlab_theory::circle::{CIRCLE_KEYS, KeyMode};
use fretlab_theory::fretboard::{STANDARD_TUNING, Tuning};
use fretlab_theory::harmony::{ChordFocus, ChordKind, build_diatonic_chords, chord_focus_for};
use fretlab_theory::pitch::parse_root;
use fretlab_theory::scale::{scale_by_id, spell_scale};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;

/// UI color theme. Stored here untouched; applying it is the UI's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// A persisted chord selection: just enough context to recompute the
/// identical ChordFocus (spelled tones included) through the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordFocusSnapshot {
    pub key_id: String,
    pub key_mode: KeyMode,
    pub kind: ChordKind,
    pub degree_index: usize,
}

/// Everything the visualizer persists between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPrefs {
    pub root: String,
    pub scale_id: String,
    /// Open-string note names, highest pitched first.
    pub tuning: Vec<String>,
    pub theme: Theme,
    pub circle_key: String,
    pub key_mode: KeyMode,
    pub chord_focus: Option<ChordFocusSnapshot>,
}

impl Default for SessionPrefs {
    fn default() -> Self {
        SessionPrefs {
            root: "C".to_string(),
            scale_id: "major".to_string(),
            tuning: STANDARD_TUNING.iter().map(|s| (*s).to_string()).collect(),
            theme: Theme::Light,
            circle_key: "C".to_string(),
            key_mode: KeyMode::Major,
            chord_focus: None,
        }
    }
}

impl SessionPrefs {
    /// Decode preferences from a JSON file.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let data = fs::read_to_string(path)?;
        let prefs: SessionPrefs = serde_json::from_str(&data)?;
        Ok(prefs)
    }

    /// Load and validate, substituting defaults for a missing or corrupt
    /// file and for individually invalid fields.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).map_or_else(|_| SessionPrefs::default(), SessionPrefs::sanitized)
    }

    /// Write preferences as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Replace every field the engine rejects with its default. Keeps the
    /// valid fields, so one stale entry doesn't reset the whole session.
    pub fn sanitized(mut self) -> Self {
        let defaults = SessionPrefs::default();

        if parse_root(&self.root).is_err() {
            self.root = defaults.root;
        }
        if scale_by_id(&self.scale_id).is_none() {
            self.scale_id = defaults.scale_id;
        }
        if self.tuning.len() != defaults.tuning.len() || Tuning::parse(&self.tuning).is_err() {
            self.tuning = defaults.tuning;
        }
        if !CIRCLE_KEYS.iter().any(|k| k.id == self.circle_key) {
            self.circle_key = defaults.circle_key;
        }
        if let Some(snapshot) = &self.chord_focus
            && recompute_chord_focus(snapshot).is_none()
        {
            self.chord_focus = None;
        }
        self
    }

    /// Parse the stored tuning. Call after `sanitized`; a validated
    /// tuning always parses.
    pub fn tuning(&self) -> Result<Tuning, fretlab_theory::pitch::InvalidRootError> {
        Tuning::parse(&self.tuning)
    }
}

/// Rebuild the full ChordFocus a snapshot refers to. None when the
/// snapshot no longer resolves (unknown key, out-of-range degree).
pub fn recompute_chord_focus(snapshot: &ChordFocusSnapshot) -> Option<ChordFocus> {
    let scale = scale_by_id(snapshot.key_mode.scale_id())?;
    let spelled = spell_scale(&snapshot.key_id, scale).ok()?;
    let chords = build_diatonic_chords(&spelled, snapshot.kind);
    let chord = chords.get(snapshot.degree_index)?;
    Some(chord_focus_for(
        &spelled,
        chord,
        snapshot.kind,
        snapshot.key_mode,
        &snapshot.key_id,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fretlab_theory::harmony::chord_tones_for_diatonic;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("fretlab_session_{}_{}", std::process::id(), name))
    }

    #[test]
    fn defaults_survive_sanitization() {
        let prefs = SessionPrefs::default();
        assert_eq!(prefs.clone().sanitized(), prefs);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let prefs = SessionPrefs::load_or_default(Path::new("/nonexistent/prefs.json"));
        assert_eq!(prefs, SessionPrefs::default());
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let path = temp_path("corrupt");
        fs::write(&path, "{not json").unwrap();
        let prefs = SessionPrefs::load_or_default(&path);
        assert_eq!(prefs, SessionPrefs::default());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn save_load_round_trip() {
        let path = temp_path("roundtrip");
        let prefs = SessionPrefs {
            root: "Eb".to_string(),
            scale_id: "dorian".to_string(),
            tuning: ["E", "B", "G", "D", "A", "D"].iter().map(|s| (*s).to_string()).collect(),
            theme: Theme::Dark,
            circle_key: "Bb".to_string(),
            key_mode: KeyMode::Minor,
            chord_focus: Some(ChordFocusSnapshot {
                key_id: "G".to_string(),
                key_mode: KeyMode::Minor,
                kind: ChordKind::Seventh,
                degree_index: 3,
            }),
        };

        prefs.save(&path).unwrap();
        let loaded = SessionPrefs::load(&path).unwrap();
        assert_eq!(loaded, prefs);
        assert_eq!(loaded.sanitized(), prefs);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn invalid_fields_fall_back_individually() {
        let prefs = SessionPrefs {
            root: "H##".to_string(),
            scale_id: "whole_tone".to_string(),
            tuning: vec!["E".to_string(), "B".to_string()],
            theme: Theme::Dark,
            circle_key: "Gb".to_string(),
            key_mode: KeyMode::Major,
            chord_focus: Some(ChordFocusSnapshot {
                key_id: "C".to_string(),
                key_mode: KeyMode::Major,
                kind: ChordKind::Triad,
                degree_index: 99,
            }),
        }
        .sanitized();

        let defaults = SessionPrefs::default();
        assert_eq!(prefs.root, defaults.root);
        assert_eq!(prefs.scale_id, defaults.scale_id);
        assert_eq!(prefs.tuning, defaults.tuning);
        assert_eq!(prefs.circle_key, defaults.circle_key);
        assert_eq!(prefs.chord_focus, None);
        // Valid fields survive.
        assert_eq!(prefs.theme, Theme::Dark);
    }

    #[test]
    fn snapshot_recomputes_identical_tones() {
        let snapshot = ChordFocusSnapshot {
            key_id: "C".to_string(),
            key_mode: KeyMode::Major,
            kind: ChordKind::Triad,
            degree_index: 4,
        };
        let focus = recompute_chord_focus(&snapshot).unwrap();
        assert_eq!(focus.label, "G");
        assert_eq!(focus.id, "triad-major-C-4");

        let scale = scale_by_id("major").unwrap();
        let spelled = spell_scale("C", scale).unwrap();
        let chords = build_diatonic_chords(&spelled, ChordKind::Triad);
        let direct = chord_tones_for_diatonic(&spelled, &chords[4], ChordKind::Triad);
        assert_eq!(focus.tones, direct);
    }
}
