// Circle-of-fifths key relationships.
//
// The circle is a fixed ring of 12 major keys (mixed sharp/flat spellings,
// chosen to avoid double accidentals in any key signature). Each major key
// anchors a relative minor (its 6th degree) and a leading-tone diminished
// key (its 7th degree); keys outside the ring normalize onto it through a
// fixed enharmonic table. All of it is derived from spelled major scales,
// so the ring, the minor ring, and the diminished ring stay mutually
// consistent by construction.

use crate::pitch::{InvalidRootError, SpelledNote};
use crate::scale::{MAJOR, SpelledScale, spell_scale};
use serde::{Deserialize, Serialize};

/// Which ring of the circle a key selection lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    Major,
    Minor,
    Diminished,
}

impl KeyMode {
    pub fn id(self) -> &'static str {
        match self {
            KeyMode::Major => "major",
            KeyMode::Minor => "minor",
            KeyMode::Diminished => "diminished",
        }
    }

    /// The scale spelled for a key in this mode: majors use the major
    /// scale, relative minors the natural minor, diminished keys locrian.
    pub fn scale_id(self) -> &'static str {
        match self {
            KeyMode::Major => "major",
            KeyMode::Minor => "natural_minor",
            KeyMode::Diminished => "locrian",
        }
    }
}

/// One major key on the circle: parseable id plus display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CircleKey {
    pub id: &'static str,
    pub label: &'static str,
}

/// The 12 circle keys, clockwise from C.
pub const CIRCLE_KEYS: [CircleKey; 12] = [
    CircleKey { id: "C", label: "C" },
    CircleKey { id: "G", label: "G" },
    CircleKey { id: "D", label: "D" },
    CircleKey { id: "A", label: "A" },
    CircleKey { id: "E", label: "E" },
    CircleKey { id: "B", label: "B" },
    CircleKey { id: "F#", label: "F\u{266f}" },
    CircleKey { id: "Db", label: "D\u{266d}" },
    CircleKey { id: "Ab", label: "A\u{266d}" },
    CircleKey { id: "Eb", label: "E\u{266d}" },
    CircleKey { id: "Bb", label: "B\u{266d}" },
    CircleKey { id: "F", label: "F" },
];

/// Enharmonic respellings onto the circle's chosen key ids.
const ENHARMONIC_TO_CIRCLE: [(&str, &str); 9] = [
    ("E#", "F"),
    ("B#", "C"),
    ("Cb", "B"),
    ("Fb", "E"),
    ("Gb", "F#"),
    ("C#", "Db"),
    ("G#", "Ab"),
    ("D#", "Eb"),
    ("A#", "Bb"),
];

/// Turn display text back into a parseable ASCII id ("D♭" -> "Db").
pub fn normalize_note_id(text: &str) -> String {
    text.replace('\u{266d}', "b").replace('\u{266f}', "#")
}

/// Map a note's text onto its circle key id, respelling enharmonically
/// where the circle uses the other spelling. None if the note has no
/// single-accidental circle equivalent (never the case for valid roots).
pub fn circle_id_for_note(text: &str) -> Option<&'static str> {
    let normalized = normalize_note_id(text);
    let mapped = ENHARMONIC_TO_CIRCLE
        .iter()
        .find(|(from, _)| *from == normalized)
        .map(|(_, to)| *to);

    match mapped {
        Some(id) => Some(id),
        None => CIRCLE_KEYS
            .iter()
            .find(|k| k.id == normalized)
            .map(|k| k.id),
    }
}

/// Spell a circle key's major scale (the key signature source).
pub fn signature_major(major_id: &str) -> Result<SpelledScale, InvalidRootError> {
    spell_scale(major_id, &MAJOR)
}

/// The relative minor tonic of a major key: its 6th degree.
pub fn relative_minor_for(major_id: &str) -> Result<SpelledNote, InvalidRootError> {
    Ok(signature_major(major_id)?.degrees[5].note.clone())
}

/// The leading-tone diminished tonic of a major key: its 7th degree.
pub fn leading_tone_dim_for(major_id: &str) -> Result<SpelledNote, InvalidRootError> {
    Ok(signature_major(major_id)?.degrees[6].note.clone())
}

/// The root actually spelled for a circle selection: the major key itself,
/// its relative minor, or its leading-tone diminished key.
pub fn active_key_id(mode: KeyMode, circle_id: &str) -> Result<String, InvalidRootError> {
    match mode {
        KeyMode::Major => Ok(circle_id.to_string()),
        KeyMode::Minor => Ok(normalize_note_id(&relative_minor_for(circle_id)?.text)),
        KeyMode::Diminished => Ok(normalize_note_id(&leading_tone_dim_for(circle_id)?.text)),
    }
}

/// Index of the active tonic within its signature major scale, for
/// rotating the relative-mode list to start at the active key. Falls back
/// to 0 (Ionian first) when the pitch class is not in the scale.
pub fn mode_start_index(signature: &SpelledScale, active_pc: u8) -> usize {
    signature
        .degrees
        .iter()
        .position(|d| d.note.pc == active_pc)
        .unwrap_or(0)
}

/// Rotate a mode list so the mode at `start` comes first.
pub fn rotate_modes<T>(mut modes: Vec<T>, start: usize) -> Vec<T> {
    if modes.is_empty() || start == 0 || start >= modes.len() {
        return modes;
    }
    modes.rotate_left(start);
    modes
}
