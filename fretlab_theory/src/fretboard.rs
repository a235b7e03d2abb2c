// Fretboard mapping: tunings and per-cell pitch classes.
//
// A tuning is an ordered list of open-string notes, highest-pitched string
// first (index 0 = high E in standard tuning, matching how a chord chart
// reads top to bottom). The mapper itself is stateless: a cell's pitch
// class is the open string's pitch class plus the fret, reduced mod 12,
// and scale membership is a lookup through the SpelledScale's pitch-class
// map.

use crate::pitch::{InvalidRootError, Letter, SpelledNote, parse_root, pitch_class};
use crate::scale::SpelledScale;
use serde::Serialize;

/// Highest playable fret.
pub const FRET_COUNT: u8 = 24;

/// Standard tuning open strings, high to low.
pub const STANDARD_TUNING: [&str; 6] = ["E", "B", "G", "D", "A", "E"];

/// Frets carrying position-marker inlays on a standard neck.
pub const INLAY_FRETS: [u8; 10] = [3, 5, 7, 9, 12, 15, 17, 19, 21, 24];

/// Octave frets, marked with a double inlay.
pub const DOUBLE_INLAY_FRETS: [u8; 2] = [12, 24];

/// An instrument tuning: one open-string root note per string, highest
/// pitched first. Mutable user state upstream; an immutable input here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tuning {
    strings: Vec<SpelledNote>,
}

impl Tuning {
    /// Parse a tuning from open-string note names.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Tuning, InvalidRootError> {
        let strings = names
            .iter()
            .map(|name| parse_root(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Tuning { strings })
    }

    /// Standard six-string tuning E B G D A E.
    pub fn standard() -> Tuning {
        let letters = [Letter::E, Letter::B, Letter::G, Letter::D, Letter::A, Letter::E];
        Tuning {
            strings: letters
                .into_iter()
                .map(|l| SpelledNote::new(l, crate::pitch::Accidental::Natural))
                .collect(),
        }
    }

    pub fn string_count(&self) -> usize {
        self.strings.len()
    }

    pub fn open_string(&self, string_index: usize) -> &SpelledNote {
        &self.strings[string_index]
    }

    pub fn open_pc(&self, string_index: usize) -> u8 {
        self.strings[string_index].pc
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning::standard()
    }
}

/// Pitch class sounding at a fret on a string. Fret 0 is the open string.
pub fn pitch_class_at(tuning: &Tuning, string_index: usize, fret: u8) -> u8 {
    pitch_class(i32::from(tuning.open_pc(string_index)) + i32::from(fret))
}

/// Scale-degree index sounding at a fretboard cell, or None when the cell
/// is out of scale.
pub fn degree_at(
    spelled: &SpelledScale,
    tuning: &Tuning,
    string_index: usize,
    fret: u8,
) -> Option<usize> {
    spelled.degree_index_of_pc(pitch_class_at(tuning, string_index, fret))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{MAJOR, spell_scale};

    #[test]
    fn standard_tuning_open_pitch_classes() {
        let tuning = Tuning::standard();
        // E B G D A E, high to low.
        let pcs: Vec<u8> = (0..6).map(|s| tuning.open_pc(s)).collect();
        assert_eq!(pcs, [4, 11, 7, 2, 9, 4]);
    }

    #[test]
    fn fretted_pitch_classes_wrap() {
        let tuning = Tuning::standard();
        assert_eq!(pitch_class_at(&tuning, 0, 0), 4); // open high E
        assert_eq!(pitch_class_at(&tuning, 0, 1), 5); // F
        assert_eq!(pitch_class_at(&tuning, 0, 12), 4); // octave
        assert_eq!(pitch_class_at(&tuning, 5, 5), 9); // low E fret 5 = A
    }

    #[test]
    fn parse_rejects_bad_tunings() {
        assert!(Tuning::parse(&["E", "B", "G", "D", "A", "X"]).is_err());
        assert!(Tuning::parse(&["D", "A", "D"]).is_ok()); // fewer strings is fine
    }

    #[test]
    fn parsed_standard_matches_builtin() {
        let parsed = Tuning::parse(&STANDARD_TUNING).unwrap();
        assert_eq!(parsed, Tuning::standard());
    }

    #[test]
    fn degree_lookup_marks_in_scale_cells() {
        let spelled = spell_scale("C", &MAJOR).unwrap();
        let tuning = Tuning::standard();

        // Low E string fret 8 = C, the root.
        assert_eq!(degree_at(&spelled, &tuning, 5, 8), Some(0));
        // High E string fret 1 = F, degree index 3.
        assert_eq!(degree_at(&spelled, &tuning, 0, 1), Some(3));
        // Fret 2 on the B string = C♯, out of scale.
        assert_eq!(degree_at(&spelled, &tuning, 1, 2), None);
    }

    #[test]
    fn drop_d_changes_only_the_low_string() {
        let drop_d = Tuning::parse(&["E", "B", "G", "D", "A", "D"]).unwrap();
        assert_eq!(pitch_class_at(&drop_d, 5, 0), 2);
        assert_eq!(pitch_class_at(&drop_d, 0, 0), 4);
    }
}
