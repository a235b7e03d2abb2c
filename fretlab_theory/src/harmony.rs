// Diatonic chord analysis: stacked-third qualities, Roman numerals,
// chord tones, and relative modes.
//
// Chords are built from a SpelledScale by stacking scale-steps: root at
// degree i, third at i+2, fifth at i+4 (sevenths add i+6), all modulo the
// scale's own degree count. For heptatonic scales this is the textbook
// diatonic construction; for pentatonics and other sizes it generalizes
// "skip one degree per stacked interval".
//
// Quality classification is an exact interval-pair match against a fixed
// table. Unmatched combinations deliberately fall back to major / dominant
// seventh instead of erroring — a stability policy so exotic catalog
// additions degrade to something renderable rather than failing analysis.

use crate::circle::KeyMode;
use crate::scale::{SpelledScale, format_degree};
use serde::{Deserialize, Serialize};

/// Triad and seventh chord qualities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChordQuality {
    Maj,
    Min,
    Dim,
    Aug,
    Maj7,
    Dom7,
    Min7,
    Min7b5,
    Dim7,
    MinMaj7,
    AugMaj7,
    Aug7,
}

/// Coarse quality grouping, used by the circle-of-fifths ring placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QualityCategory {
    Major,
    Minor,
    Dominant,
    Diminished,
    HalfDiminished,
    Augmented,
}

impl ChordQuality {
    /// Chord-symbol suffix appended to the root note text.
    pub fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Maj => "",
            ChordQuality::Min => "m",
            ChordQuality::Dim => "dim",
            ChordQuality::Aug => "aug",
            ChordQuality::Maj7 => "maj7",
            ChordQuality::Dom7 => "7",
            ChordQuality::Min7 => "m7",
            ChordQuality::Min7b5 => "m7\u{266d}5",
            ChordQuality::Dim7 => "dim7",
            ChordQuality::MinMaj7 => "m(maj7)",
            ChordQuality::AugMaj7 => "aug(maj7)",
            ChordQuality::Aug7 => "aug7",
        }
    }

    pub fn category(self) -> QualityCategory {
        match self {
            ChordQuality::Maj | ChordQuality::Maj7 => QualityCategory::Major,
            ChordQuality::Min | ChordQuality::Min7 | ChordQuality::MinMaj7 => {
                QualityCategory::Minor
            }
            ChordQuality::Dom7 => QualityCategory::Dominant,
            ChordQuality::Dim | ChordQuality::Dim7 => QualityCategory::Diminished,
            ChordQuality::Min7b5 => QualityCategory::HalfDiminished,
            ChordQuality::Aug | ChordQuality::AugMaj7 | ChordQuality::Aug7 => {
                QualityCategory::Augmented
            }
        }
    }
}

/// Triad vs. seventh chord construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordKind {
    Triad,
    Seventh,
}

impl ChordKind {
    /// Chord-degree labels this kind must cover.
    pub fn required_labels(self) -> &'static [u8] {
        match self {
            ChordKind::Triad => &[1, 3, 5],
            ChordKind::Seventh => &[1, 3, 5, 7],
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            ChordKind::Triad => "triad",
            ChordKind::Seventh => "7th",
        }
    }
}

/// A chord diatonic to a spelled scale, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiatonicChord {
    pub degree_index: usize,
    pub degree_text: String,
    /// Present only for 7-degree scales.
    pub roman: Option<String>,
    pub chord_text: String,
    pub quality: ChordQuality,
}

/// A single chord tone: pitch class, spelled text, and chord-degree label
/// (1, 3, 5, or 7).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordTone {
    pub pc: u8,
    pub text: String,
    pub label: u8,
}

/// A user-selected chord in context: enough to highlight its tones on the
/// fretboard and to voice it through the CAGED solver. Ephemeral; cleared
/// whenever the key/scale context changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChordFocus {
    pub id: String,
    pub key_id: String,
    pub mode: KeyMode,
    pub kind: ChordKind,
    pub label: String,
    pub tones: Vec<ChordTone>,
}

fn triad_quality(third: u8, fifth: u8) -> ChordQuality {
    match (third, fifth) {
        (4, 7) => ChordQuality::Maj,
        (3, 7) => ChordQuality::Min,
        (3, 6) => ChordQuality::Dim,
        (4, 8) => ChordQuality::Aug,
        // Stability fallback for interval pairs outside the table.
        _ => ChordQuality::Maj,
    }
}

fn seventh_quality(third: u8, fifth: u8, seventh: u8) -> ChordQuality {
    match (third, fifth, seventh) {
        (4, 7, 11) => ChordQuality::Maj7,
        (4, 7, 10) => ChordQuality::Dom7,
        (3, 7, 10) => ChordQuality::Min7,
        (3, 6, 10) => ChordQuality::Min7b5,
        (3, 6, 9) => ChordQuality::Dim7,
        (3, 7, 11) => ChordQuality::MinMaj7,
        (4, 8, 11) => ChordQuality::AugMaj7,
        (4, 8, 10) => ChordQuality::Aug7,
        // Stability fallback for interval triples outside the table.
        _ => ChordQuality::Dom7,
    }
}

const ROMANS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

fn roman_numeral_for_triad(degree_number: u8, quality: ChordQuality) -> String {
    let base = usize::from(degree_number)
        .checked_sub(1)
        .and_then(|i| ROMANS.get(i))
        .map_or_else(|| degree_number.to_string(), |r| (*r).to_string());
    match quality {
        ChordQuality::Maj => base,
        ChordQuality::Min => base.to_lowercase(),
        ChordQuality::Dim => format!("{}\u{b0}", base.to_lowercase()),
        _ => format!("{base}+"),
    }
}

/// True iff the scale is a proper heptatonic: exactly 7 degrees numbered
/// 1..=7 with no repeats. Guards diatonic-chord analysis against
/// pentatonics and degenerate definitions.
pub fn is_diatonic_seven_unique(spelled: &SpelledScale) -> bool {
    let degrees = spelled.scale.degrees;
    if degrees.len() != 7 {
        return false;
    }
    let mut seen = [false; 7];
    for d in degrees {
        let Some(slot) = usize::from(d.number)
            .checked_sub(1)
            .filter(|&i| i < 7)
            .map(|i| &mut seen[i])
        else {
            return false;
        };
        if *slot {
            return false;
        }
        *slot = true;
    }
    true
}

fn interval_from(root_pc: u8, other_pc: u8) -> u8 {
    (i32::from(other_pc) - i32::from(root_pc)).rem_euclid(12) as u8
}

/// Build every diatonic chord of the scale by stacking thirds.
///
/// Scales with fewer than 3 degrees yield nothing. Roman numerals are
/// attached only when the scale has exactly 7 degrees.
pub fn build_diatonic_chords(spelled: &SpelledScale, kind: ChordKind) -> Vec<DiatonicChord> {
    let n = spelled.degrees.len();
    if n < 3 {
        return Vec::new();
    }

    let mut chords = Vec::with_capacity(n);
    for i in 0..n {
        let root = &spelled.degrees[i].note;
        let third = &spelled.degrees[(i + 2) % n].note;
        let fifth = &spelled.degrees[(i + 4) % n].note;

        let third_int = interval_from(root.pc, third.pc);
        let fifth_int = interval_from(root.pc, fifth.pc);
        let triad = triad_quality(third_int, fifth_int);

        let quality = match kind {
            ChordKind::Triad => triad,
            ChordKind::Seventh => {
                let seventh = &spelled.degrees[(i + 6) % n].note;
                seventh_quality(third_int, fifth_int, interval_from(root.pc, seventh.pc))
            }
        };

        let degree = spelled.degrees[i].degree;
        // Roman casing follows the triad quality even for seventh chords.
        let roman = (n == 7).then(|| roman_numeral_for_triad(degree.number, triad));

        chords.push(DiatonicChord {
            degree_index: i,
            degree_text: format_degree(degree),
            roman,
            chord_text: format!("{}{}", root.text, quality.suffix()),
            quality,
        });
    }
    chords
}

/// The spelled tones of a diatonic chord, labeled 1/3/5(/7).
pub fn chord_tones_for_diatonic(
    spelled: &SpelledScale,
    chord: &DiatonicChord,
    kind: ChordKind,
) -> Vec<ChordTone> {
    let n = spelled.degrees.len();
    if n == 0 {
        return Vec::new();
    }

    let steps: &[(usize, u8)] = match kind {
        ChordKind::Triad => &[(0, 1), (2, 3), (4, 5)],
        ChordKind::Seventh => &[(0, 1), (2, 3), (4, 5), (6, 7)],
    };

    steps
        .iter()
        .map(|&(step, label)| {
            let note = &spelled.degrees[(chord.degree_index + step) % n].note;
            ChordTone {
                pc: note.pc,
                text: note.text.clone(),
                label,
            }
        })
        .collect()
}

/// Assemble a ChordFocus for a selected diatonic chord. The id is stable
/// for a (kind, mode, key, degree) selection so callers can toggle on
/// reselect and round-trip the selection through persistence.
pub fn chord_focus_for(
    spelled: &SpelledScale,
    chord: &DiatonicChord,
    kind: ChordKind,
    mode: KeyMode,
    key_id: &str,
) -> ChordFocus {
    ChordFocus {
        id: format!("{}-{}-{}-{}", kind.id(), mode.id(), key_id, chord.degree_index),
        key_id: key_id.to_string(),
        mode,
        kind,
        label: chord.chord_text.clone(),
        tones: chord_tones_for_diatonic(spelled, chord, kind),
    }
}

/// One of the 7 relative modes sharing a major key signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeInKeySignature {
    pub mode_name: &'static str,
    pub scale_id: &'static str,
    pub tonic_text: String,
}

const MODE_DEFS: [(&str, &str); 7] = [
    ("Ionian", "major"),
    ("Dorian", "dorian"),
    ("Phrygian", "phrygian"),
    ("Lydian", "lydian"),
    ("Mixolydian", "mixolydian"),
    ("Aeolian", "natural_minor"),
    ("Locrian", "locrian"),
];

/// The 7 modes anchored at each degree of a spelled major scale — the
/// relative modes that all share that scale's key signature. Returns an
/// empty list for anything that is not a 7-note spelling.
pub fn modes_for_major_key_signature(major_spelled: &SpelledScale) -> Vec<ModeInKeySignature> {
    if major_spelled.scale.degrees.len() != 7 || major_spelled.degrees.len() != 7 {
        return Vec::new();
    }

    MODE_DEFS
        .iter()
        .enumerate()
        .map(|(i, &(mode_name, scale_id))| ModeInKeySignature {
            mode_name,
            scale_id,
            tonic_text: major_spelled.degrees[i].note.text.clone(),
        })
        .collect()
}
