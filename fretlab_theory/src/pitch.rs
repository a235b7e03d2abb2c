// Pitch classes, letter names, and single-accidental note spelling.
//
// Everything downstream (scale spelling, harmony analysis, fretboard
// mapping, CAGED voicing) works in terms of these types. A pitch class is
// an octave-equivalent note identity, 0..=11 with C = 0. A spelled note is
// a letter plus at most one accidental; double accidentals are outside the
// supported domain, which is what forces the respelling logic in scale.rs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reduce any integer to a pitch class in 0..=11.
pub fn pitch_class(n: i32) -> u8 {
    // rem_euclid(12) lands in 0..=11, so the narrowing cast is lossless.
    n.rem_euclid(12) as u8
}

/// The seven natural letter names, cyclic C..B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Letter {
    C = 0,
    D = 1,
    E = 2,
    F = 3,
    G = 4,
    A = 5,
    B = 6,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Position in the musical alphabet, C = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Pitch class of the natural letter: C=0 D=2 E=4 F=5 G=7 A=9 B=11.
    pub fn base_pc(self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    pub fn name(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }

    /// Parse a single letter character, case-insensitive.
    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }
}

/// A single accidental. The whole system caps at one accidental per note;
/// the spelling solver respells rather than produce doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accidental {
    Flat,
    Natural,
    Sharp,
}

impl Accidental {
    /// Semitone offset: flat = -1, natural = 0, sharp = +1.
    pub fn offset(self) -> i32 {
        match self {
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
        }
    }

    /// Display glyph. Naturals render as nothing, not "♮".
    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::Flat => "\u{266d}",
            Accidental::Natural => "",
            Accidental::Sharp => "\u{266f}",
        }
    }
}

/// Format a note as its letter followed by the accidental glyph.
pub fn format_note_text(letter: Letter, accidental: Accidental) -> String {
    format!("{}{}", letter.name(), accidental.symbol())
}

/// A concretely spelled note: letter, accidental, resulting pitch class,
/// and display text. Immutable once constructed; `pc` and `text` are
/// derived from the other two fields at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpelledNote {
    pub letter: Letter,
    pub accidental: Accidental,
    pub pc: u8,
    pub text: String,
}

impl SpelledNote {
    pub fn new(letter: Letter, accidental: Accidental) -> Self {
        SpelledNote {
            letter,
            accidental,
            pc: pitch_class(i32::from(letter.base_pc()) + accidental.offset()),
            text: format_note_text(letter, accidental),
        }
    }
}

/// Malformed root input: empty, first character not A-G, or a suffix that
/// is not exactly one accidental marker. The core never substitutes a
/// default note; callers decide fallback behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRootError {
    pub input: String,
}

impl fmt::Display for InvalidRootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bad root: {:?}", self.input)
    }
}

impl std::error::Error for InvalidRootError {}

/// Parse a root note: a letter optionally followed by one accidental
/// marker (ASCII `b`/`#` or the unicode flat/sharp glyphs).
pub fn parse_root(text: &str) -> Result<SpelledNote, InvalidRootError> {
    let err = || InvalidRootError {
        input: text.to_string(),
    };

    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    let letter = chars.next().and_then(Letter::from_char).ok_or_else(err)?;

    let accidental = match chars.as_str() {
        "" => Accidental::Natural,
        "b" | "\u{266d}" => Accidental::Flat,
        "#" | "\u{266f}" => Accidental::Sharp,
        _ => return Err(err()),
    };

    Ok(SpelledNote::new(letter, accidental))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_class_reduces_negative_inputs() {
        assert_eq!(pitch_class(0), 0);
        assert_eq!(pitch_class(12), 0);
        assert_eq!(pitch_class(-1), 11);
        assert_eq!(pitch_class(-13), 11);
        assert_eq!(pitch_class(25), 1);
    }

    #[test]
    fn letter_base_pitches() {
        let expected = [0, 2, 4, 5, 7, 9, 11];
        for (letter, pc) in Letter::ALL.iter().zip(expected) {
            assert_eq!(letter.base_pc(), pc);
        }
    }

    #[test]
    fn parse_accepts_naturals_and_single_accidentals() {
        assert_eq!(parse_root("C").unwrap().text, "C");
        assert_eq!(parse_root("Cb").unwrap().text, "C\u{266d}");
        assert_eq!(parse_root("C\u{266d}").unwrap().text, "C\u{266d}");
        assert_eq!(parse_root("C#").unwrap().text, "C\u{266f}");
        assert_eq!(parse_root("C\u{266f}").unwrap().text, "C\u{266f}");
        assert_eq!(parse_root("e#").unwrap().pc, 5);
    }

    #[test]
    fn parse_rejects_invalid_roots() {
        assert!(parse_root("").is_err());
        assert!(parse_root("H").is_err());
        assert!(parse_root("Cfoo").is_err());
        assert!(parse_root("C##").is_err());
        assert!(parse_root("Cbb").is_err());
    }

    #[test]
    fn parse_format_round_trip() {
        for letter in Letter::ALL {
            for accidental in [Accidental::Flat, Accidental::Natural, Accidental::Sharp] {
                let text = format_note_text(letter, accidental);
                let parsed = parse_root(&text).unwrap();
                assert_eq!(parsed.letter, letter);
                assert_eq!(parsed.accidental, accidental);
                assert_eq!(
                    parsed.pc,
                    pitch_class(i32::from(letter.base_pc()) + accidental.offset())
                );
            }
        }
    }

    #[test]
    fn spelled_note_derives_pc_and_text() {
        let e_sharp = SpelledNote::new(Letter::E, Accidental::Sharp);
        assert_eq!(e_sharp.pc, 5);
        assert_eq!(e_sharp.text, "E\u{266f}");

        let c_flat = SpelledNote::new(Letter::C, Accidental::Flat);
        assert_eq!(c_flat.pc, 11);
    }
}
