// Fretlab theory engine.
//
// The calculation core behind an interactive fretboard/scale/chord
// visualizer: given a root note and an abstract scale definition, it
// derives correctly spelled notes (letter + single accidental), analyzes
// the diatonic harmony, maps pitch classes onto a fretboard under an
// arbitrary tuning, and solves CAGED-style chord fingerings.
//
// Architecture (data flows one direction):
// - pitch.rs: pitch-class arithmetic, letters, accidentals, root parsing
// - scale.rs: scale catalog + the single-accidental spelling solver
// - harmony.rs: diatonic triads/sevenths, Roman numerals, chord tones,
//   relative modes
// - fretboard.rs: tunings and per-cell pitch-class/degree lookup
// - caged.rs: the CAGED shape templates and voicing search
// - circle.rs: circle-of-fifths key relationships (relative minor,
//   leading-tone diminished, enharmonic normalization, mode rotation)
//
// Everything is pure and synchronous: derived values are recomputed from
// scratch whenever an upstream input (root, scale, tuning, chord
// selection) changes. UI rendering and preference persistence live in
// separate crates and consume these functions as-is.

pub mod caged;
pub mod circle;
pub mod fretboard;
pub mod harmony;
pub mod pitch;
pub mod scale;
