// Scale definitions and the note-spelling solver.
//
// A ScaleDef is an abstract scale: nominal degree numbers (1-based, not
// necessarily contiguous — pentatonics skip degrees) paired with semitone
// offsets from the root. Spelling a scale means choosing a concrete
// letter + accidental for each degree such that:
//
// - degree N uses the letter N steps up the alphabet from the root when a
//   single accidental can reach the target pitch class ("every letter
//   used once" for diatonic scales);
// - when that would require a double accidental, the degree is respelled
//   with the lowest-cost single-accidental alternative: nearest letter
//   first, then naturals, then the accidental matching the root's own
//   sharp/flat flavor.
//
// The result is a SpelledScale, the input to harmony analysis and
// fretboard mapping.

use crate::pitch::{
    Accidental, InvalidRootError, Letter, SpelledNote, parse_root, pitch_class,
};
use serde::Serialize;

/// A nominal scale degree: 1-based number plus alteration relative to the
/// major-scale reference (♭3, ♯4, ...). Describes degree identity, not the
/// actual spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Degree {
    pub number: u8,
    pub alt: Accidental,
}

const fn nat(number: u8) -> Degree {
    Degree {
        number,
        alt: Accidental::Natural,
    }
}

const fn flat(number: u8) -> Degree {
    Degree {
        number,
        alt: Accidental::Flat,
    }
}

const fn sharp(number: u8) -> Degree {
    Degree {
        number,
        alt: Accidental::Sharp,
    }
}

/// Degree display text: accidental prefix then number ("♭3", "5").
pub fn format_degree(d: Degree) -> String {
    format!("{}{}", d.alt.symbol(), d.number)
}

/// An abstract scale: parallel degree and semitone tables.
///
/// Invariants: `degrees.len() == semitones.len()`; semitone offsets are
/// non-decreasing and lie in 0..=11; 3 to 12 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScaleDef {
    pub id: &'static str,
    pub name: &'static str,
    pub degrees: &'static [Degree],
    pub semitones: &'static [u8],
}

pub const MAJOR: ScaleDef = ScaleDef {
    id: "major",
    name: "Major",
    degrees: &[nat(1), nat(2), nat(3), nat(4), nat(5), nat(6), nat(7)],
    semitones: &[0, 2, 4, 5, 7, 9, 11],
};

pub const NATURAL_MINOR: ScaleDef = ScaleDef {
    id: "natural_minor",
    name: "Natural Minor",
    degrees: &[nat(1), nat(2), flat(3), nat(4), nat(5), flat(6), flat(7)],
    semitones: &[0, 2, 3, 5, 7, 8, 10],
};

pub const HARMONIC_MINOR: ScaleDef = ScaleDef {
    id: "harmonic_minor",
    name: "Harmonic Minor",
    degrees: &[nat(1), nat(2), flat(3), nat(4), nat(5), flat(6), nat(7)],
    semitones: &[0, 2, 3, 5, 7, 8, 11],
};

pub const MELODIC_MINOR: ScaleDef = ScaleDef {
    id: "melodic_minor",
    name: "Melodic Minor (Jazz)",
    degrees: &[nat(1), nat(2), flat(3), nat(4), nat(5), nat(6), nat(7)],
    semitones: &[0, 2, 3, 5, 7, 9, 11],
};

pub const DORIAN: ScaleDef = ScaleDef {
    id: "dorian",
    name: "Dorian",
    degrees: &[nat(1), nat(2), flat(3), nat(4), nat(5), nat(6), flat(7)],
    semitones: &[0, 2, 3, 5, 7, 9, 10],
};

pub const PHRYGIAN: ScaleDef = ScaleDef {
    id: "phrygian",
    name: "Phrygian",
    degrees: &[nat(1), flat(2), flat(3), nat(4), nat(5), flat(6), flat(7)],
    semitones: &[0, 1, 3, 5, 7, 8, 10],
};

pub const LYDIAN: ScaleDef = ScaleDef {
    id: "lydian",
    name: "Lydian",
    degrees: &[nat(1), nat(2), nat(3), sharp(4), nat(5), nat(6), nat(7)],
    semitones: &[0, 2, 4, 6, 7, 9, 11],
};

pub const MIXOLYDIAN: ScaleDef = ScaleDef {
    id: "mixolydian",
    name: "Mixolydian",
    degrees: &[nat(1), nat(2), nat(3), nat(4), nat(5), nat(6), flat(7)],
    semitones: &[0, 2, 4, 5, 7, 9, 10],
};

pub const LOCRIAN: ScaleDef = ScaleDef {
    id: "locrian",
    name: "Locrian",
    degrees: &[nat(1), flat(2), flat(3), nat(4), flat(5), flat(6), flat(7)],
    semitones: &[0, 1, 3, 5, 6, 8, 10],
};

pub const MAJOR_PENTATONIC: ScaleDef = ScaleDef {
    id: "major_pentatonic",
    name: "Major Pentatonic",
    degrees: &[nat(1), nat(2), nat(3), nat(5), nat(6)],
    semitones: &[0, 2, 4, 7, 9],
};

pub const MINOR_PENTATONIC: ScaleDef = ScaleDef {
    id: "minor_pentatonic",
    name: "Minor Pentatonic",
    degrees: &[nat(1), flat(3), nat(4), nat(5), flat(7)],
    semitones: &[0, 3, 5, 7, 10],
};

pub const BLUES: ScaleDef = ScaleDef {
    id: "blues",
    name: "Blues",
    degrees: &[nat(1), flat(3), nat(4), flat(5), nat(5), flat(7)],
    semitones: &[0, 3, 5, 6, 7, 10],
};

/// The built-in scale catalog.
pub const SCALES: &[ScaleDef] = &[
    MAJOR,
    NATURAL_MINOR,
    HARMONIC_MINOR,
    MELODIC_MINOR,
    DORIAN,
    PHRYGIAN,
    LYDIAN,
    MIXOLYDIAN,
    LOCRIAN,
    MAJOR_PENTATONIC,
    MINOR_PENTATONIC,
    BLUES,
];

pub fn scale_by_id(id: &str) -> Option<&'static ScaleDef> {
    SCALES.iter().find(|s| s.id == id)
}

/// A spelled degree: the nominal degree plus its concrete note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpelledDegree {
    pub degree: Degree,
    pub note: SpelledNote,
}

/// A scale spelled from a concrete root. Derived and immutable; recomputed
/// whenever the root or scale selection changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpelledScale {
    pub root: SpelledNote,
    pub scale: ScaleDef,
    pub degrees: Vec<SpelledDegree>,
    /// Pitch class -> index into `degrees`. First index wins on collision,
    /// which keeps lookups stable for scales with enharmonically repeated
    /// pitch classes.
    pub pc_to_degree_index: [Option<usize>; 12],
}

impl SpelledScale {
    pub fn degree_index_of_pc(&self, pc: u8) -> Option<usize> {
        self.pc_to_degree_index[usize::from(pc % 12)]
    }
}

/// The letter scale degree N "wants": N steps up the alphabet from the
/// root letter. Degree 1 is the root letter itself.
pub fn diatonic_letter_for(root_letter: Letter, degree_number: u8) -> Letter {
    let idx = (root_letter.index() + usize::from(degree_number) + 6) % 7;
    Letter::ALL[idx]
}

/// Circular distance between two letters over the 7-letter alphabet.
fn letter_distance(a: Letter, b: Letter) -> u32 {
    let d = (a.index() as u32).abs_diff(b.index() as u32);
    d.min(7 - d)
}

/// Respelling cost of an accidental given the root's flavor. Naturals are
/// free; the accidental matching the root (sharp keys prefer sharps, flat
/// keys prefer flats, natural roots default to sharp) beats the opposite.
fn accidental_cost(acc: Accidental, root_acc: Accidental) -> u32 {
    if acc == Accidental::Natural {
        return 0;
    }
    let preferred = match root_acc {
        Accidental::Flat => Accidental::Flat,
        _ => Accidental::Sharp,
    };
    if acc == preferred { 1 } else { 2 }
}

/// Spell a target pitch class, preferring the expected letter.
///
/// Tries natural/sharp/flat on the expected letter first. If none reach
/// the target (the spelling would need a double accidental), searches all
/// 7 letters x 3 accidentals and takes the lowest-cost candidate: letter
/// distance is scaled to dominate, then naturals, then the root-flavored
/// accidental.
pub fn spell_pitch_class(
    expected: Letter,
    target_pc: u8,
    root_acc: Accidental,
) -> SpelledNote {
    for acc in [Accidental::Natural, Accidental::Sharp, Accidental::Flat] {
        if pitch_class(i32::from(expected.base_pc()) + acc.offset()) == target_pc {
            return SpelledNote::new(expected, acc);
        }
    }

    let mut best: Option<(u32, SpelledNote)> = None;
    for letter in Letter::ALL {
        for acc in [Accidental::Natural, Accidental::Sharp, Accidental::Flat] {
            if pitch_class(i32::from(letter.base_pc()) + acc.offset()) != target_pc {
                continue;
            }
            let cost = letter_distance(expected, letter) * 10 + accidental_cost(acc, root_acc);
            if best.as_ref().is_none_or(|(c, _)| cost < *c) {
                best = Some((cost, SpelledNote::new(letter, acc)));
            }
        }
    }

    // Every pitch class has a natural or sharp spelling, so the search
    // always finds something; the fallback mirrors that invariant.
    best.map_or_else(|| SpelledNote::new(expected, Accidental::Natural), |(_, n)| n)
}

/// Spell a whole scale from a root string.
///
/// Fails only on root parsing; spelling itself is total over valid roots.
pub fn spell_scale(root_text: &str, scale: &ScaleDef) -> Result<SpelledScale, InvalidRootError> {
    let root = parse_root(root_text)?;

    let mut degrees = Vec::with_capacity(scale.degrees.len());
    let mut pc_to_degree_index = [None; 12];

    for (i, (degree, &semitone)) in scale.degrees.iter().zip(scale.semitones).enumerate() {
        let target_pc = pitch_class(i32::from(root.pc) + i32::from(semitone));
        let expected = diatonic_letter_for(root.letter, degree.number);
        let note = spell_pitch_class(expected, target_pc, root.accidental);

        if pc_to_degree_index[usize::from(target_pc)].is_none() {
            pc_to_degree_index[usize::from(target_pc)] = Some(i);
        }
        degrees.push(SpelledDegree {
            degree: *degree,
            note,
        });
    }

    Ok(SpelledScale {
        root,
        scale: *scale,
        degrees,
        pc_to_degree_index,
    })
}
