// CAGED voicing solver.
//
// The CAGED system voices any chord anywhere on the neck by sliding one of
// the five open-position shapes (C, A, G, E, D) up the fretboard. A shape
// template fixes which string carries the chord root, where that root sits
// inside the shape's 4-fret span, and which chord degree and fret offset
// each string idiomatically plays for triad and seventh voicings.
//
// Solving a (tuning, chord, shape) triple:
// 1. anchor: every fret on the shape's root string sounding the root pitch
//    class, with the whole span on the neck;
// 2. per string, enumerate candidates: frets inside the span matching any
//    required chord tone, plus a muted option;
// 3. branch-and-bound over the per-string choices, minimizing distance to
//    the template's target frets plus penalties for off-template degrees,
//    unnecessary mutes, and duplicated degree coverage;
// 4. reject assignments that fail to cover every required degree; keep the
//    best-scoring assignment across all viable anchors.
//
// A shape that cannot cover the chord under the current tuning simply
// produces no position; that is an expected outcome, not an error.

use crate::fretboard::{FRET_COUNT, Tuning, pitch_class_at};
use crate::harmony::{ChordKind, ChordTone};
use serde::Serialize;

/// Fret span of a shape above its base fret (4 frets total).
pub const SHAPE_SPAN: u8 = 3;

const DEGREE_MISMATCH_PENALTY: u32 = 2;
const MUTE_PENALTY: u32 = 3;
const DUPLICATE_PENALTY: u32 = 1;

/// The five open-position shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ShapeId {
    C,
    A,
    G,
    E,
    D,
}

impl ShapeId {
    pub fn name(self) -> &'static str {
        match self {
            ShapeId::C => "C",
            ShapeId::A => "A",
            ShapeId::G => "G",
            ShapeId::E => "E",
            ShapeId::D => "D",
        }
    }
}

/// A fixed fretting-hand shape template. Strings are indexed high to low
/// (0 = high E in standard tuning). `None` in a degree array marks a
/// string the open fingering leaves muted; its offset entry is unused
/// filler. Static configuration; never constructed at runtime.
#[derive(Debug, Clone, Copy)]
pub struct CagedShape {
    pub id: ShapeId,
    /// String carrying the chord root in the fixed fingering.
    pub root_string: usize,
    /// The root's fret offset above the shape's base fret.
    pub root_offset: u8,
    pub triad_degrees: [Option<u8>; 6],
    pub triad_offsets: [u8; 6],
    pub seventh_degrees: [Option<u8>; 6],
    pub seventh_offsets: [u8; 6],
}

impl CagedShape {
    fn voicing(&self, kind: ChordKind) -> (&[Option<u8>; 6], &[u8; 6]) {
        match kind {
            ChordKind::Triad => (&self.triad_degrees, &self.triad_offsets),
            ChordKind::Seventh => (&self.seventh_degrees, &self.seventh_offsets),
        }
    }
}

/// The five shape templates, encoding the open C/A/G/E/D fingerings
/// (C x32010, A x02220, G 320003, E 022100, D xx0232 and their dominant
/// seventh variants) as per-string degrees and fret offsets.
pub const SHAPES: [CagedShape; 5] = [
    CagedShape {
        id: ShapeId::C,
        root_string: 4,
        root_offset: 3,
        triad_degrees: [Some(3), Some(1), Some(5), Some(3), Some(1), None],
        triad_offsets: [0, 1, 0, 2, 3, 0],
        seventh_degrees: [Some(3), Some(1), Some(7), Some(3), Some(1), None],
        seventh_offsets: [0, 1, 3, 2, 3, 0],
    },
    CagedShape {
        id: ShapeId::A,
        root_string: 4,
        root_offset: 0,
        triad_degrees: [Some(5), Some(3), Some(1), Some(5), Some(1), None],
        triad_offsets: [0, 2, 2, 2, 0, 0],
        seventh_degrees: [Some(5), Some(3), Some(7), Some(5), Some(1), None],
        seventh_offsets: [0, 2, 0, 2, 0, 0],
    },
    CagedShape {
        id: ShapeId::G,
        root_string: 5,
        root_offset: 3,
        triad_degrees: [Some(1), Some(3), Some(1), Some(5), Some(3), Some(1)],
        triad_offsets: [3, 0, 0, 0, 2, 3],
        seventh_degrees: [Some(7), Some(3), Some(1), Some(5), Some(3), Some(1)],
        seventh_offsets: [1, 0, 0, 0, 2, 3],
    },
    CagedShape {
        id: ShapeId::E,
        root_string: 5,
        root_offset: 0,
        triad_degrees: [Some(1), Some(5), Some(3), Some(1), Some(5), Some(1)],
        triad_offsets: [0, 0, 1, 2, 2, 0],
        seventh_degrees: [Some(1), Some(5), Some(3), Some(7), Some(5), Some(1)],
        seventh_offsets: [0, 0, 1, 0, 2, 0],
    },
    CagedShape {
        id: ShapeId::D,
        root_string: 3,
        root_offset: 0,
        triad_degrees: [Some(3), Some(1), Some(5), Some(1), None, None],
        triad_offsets: [2, 3, 2, 0, 0, 0],
        seventh_degrees: [Some(3), Some(7), Some(5), Some(1), None, None],
        seventh_offsets: [2, 1, 2, 0, 0, 0],
    },
];

/// A solved fingering: one shape anchored at a base fret, with a chosen
/// fret (or mute) and sounding chord degree per string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CagedPosition {
    pub shape: ShapeId,
    pub base_fret: u8,
    pub max_fret: u8,
    /// Chosen fret per string, high to low; None = muted.
    pub frets: [Option<u8>; 6],
    /// Chord-degree label sounding on each played string.
    pub labels: [Option<u8>; 6],
}

/// One per-string choice: play a fret sounding a chord tone, or mute.
/// `base_cost` is the choice's context-free cost (distance to the template
/// target plus mismatch or mute penalties); the duplicate-coverage penalty
/// depends on search state and is added during descent.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    fret: Option<u8>,
    label: Option<u8>,
    base_cost: u32,
}

fn label_bit(label: u8) -> u8 {
    match label {
        1 => 1,
        3 => 2,
        5 => 4,
        7 => 8,
        _ => 0,
    }
}

fn required_mask(kind: ChordKind) -> u8 {
    kind.required_labels().iter().map(|&l| label_bit(l)).sum()
}

/// Depth-first assignment search with running-best pruning.
struct ShapeSearch<'a> {
    candidates: &'a [Vec<Candidate>],
    required: u8,
    /// Strictly-better bound; seeded with the best cost found at earlier
    /// anchors so later anchors prune against it.
    best_cost: u32,
    best: Option<([Option<u8>; 6], [Option<u8>; 6])>,
}

impl ShapeSearch<'_> {
    fn run(&mut self) {
        let mut frets = [None; 6];
        let mut labels = [None; 6];
        self.descend(0, 0, 0, &mut frets, &mut labels);
    }

    fn descend(
        &mut self,
        string: usize,
        cost: u32,
        covered: u8,
        frets: &mut [Option<u8>; 6],
        labels: &mut [Option<u8>; 6],
    ) {
        if cost >= self.best_cost {
            return;
        }
        if string == self.candidates.len() {
            if covered & self.required == self.required {
                self.best_cost = cost;
                self.best = Some((*frets, *labels));
            }
            return;
        }

        for candidate in &self.candidates[string] {
            let (step_cost, next_covered) = match candidate.label {
                Some(label) => {
                    let bit = label_bit(label);
                    let duplicate = if covered & bit != 0 { DUPLICATE_PENALTY } else { 0 };
                    (candidate.base_cost + duplicate, covered | bit)
                }
                None => (candidate.base_cost, covered),
            };
            frets[string] = candidate.fret;
            labels[string] = candidate.label;
            self.descend(string + 1, cost + step_cost, next_covered, frets, labels);
        }
    }
}

/// Best position for one shape, or None when the chord's tones cannot be
/// covered within the shape's span under this tuning. Shapes are
/// six-string templates; other string counts yield no position.
pub fn best_position_for_shape(
    tuning: &Tuning,
    tones: &[ChordTone],
    kind: ChordKind,
    shape: &CagedShape,
) -> Option<CagedPosition> {
    if tuning.string_count() != 6 {
        return None;
    }
    let root = tones.iter().find(|t| t.label == 1)?;
    let (degrees, offsets) = shape.voicing(kind);
    let required = required_mask(kind);

    let mut best_cost = u32::MAX;
    let mut best: Option<CagedPosition> = None;

    for anchor in 0..=FRET_COUNT {
        if pitch_class_at(tuning, shape.root_string, anchor) != root.pc {
            continue;
        }
        if anchor < shape.root_offset {
            continue;
        }
        let base = anchor - shape.root_offset;
        if base + SHAPE_SPAN > FRET_COUNT {
            continue;
        }

        let candidates = string_candidates(tuning, tones, shape, degrees, offsets, base, anchor);
        let mut search = ShapeSearch {
            candidates: &candidates,
            required,
            best_cost,
            best: None,
        };
        search.run();

        if let Some((frets, labels)) = search.best {
            best_cost = search.best_cost;
            best = Some(CagedPosition {
                shape: shape.id,
                base_fret: base,
                max_fret: base + SHAPE_SPAN,
                frets,
                labels,
            });
        }
    }

    best
}

/// Enumerate per-string candidates for one anchored shape. The root string
/// is pinned to the anchor fret; every other string offers the in-span
/// frets matching a chord tone (ascending) and then a mute.
fn string_candidates(
    tuning: &Tuning,
    tones: &[ChordTone],
    shape: &CagedShape,
    degrees: &[Option<u8>; 6],
    offsets: &[u8; 6],
    base: u8,
    anchor: u8,
) -> Vec<Vec<Candidate>> {
    (0..6)
        .map(|string| {
            if string == shape.root_string {
                return vec![Candidate {
                    fret: Some(anchor),
                    label: Some(1),
                    base_cost: u32::from(anchor.abs_diff(base + offsets[string])),
                }];
            }

            let target = base + offsets[string];
            let mut candidates = Vec::new();
            for fret in base..=base + SHAPE_SPAN {
                let pc = pitch_class_at(tuning, string, fret);
                for tone in tones.iter().filter(|t| t.pc == pc) {
                    let mismatch = match degrees[string] {
                        Some(preferred) if preferred != tone.label => DEGREE_MISMATCH_PENALTY,
                        _ => 0,
                    };
                    candidates.push(Candidate {
                        fret: Some(fret),
                        label: Some(tone.label),
                        base_cost: u32::from(fret.abs_diff(target)) + mismatch,
                    });
                }
            }
            // Mute last: free for template-muted strings, penalized where
            // the template expects the string to sound.
            candidates.push(Candidate {
                fret: None,
                label: None,
                base_cost: if degrees[string].is_some() { MUTE_PENALTY } else { 0 },
            });
            candidates
        })
        .collect()
}

/// Best position per shape for a chord's tones, in C-A-G-E-D order.
/// Shapes that cannot cover the chord are simply absent.
pub fn caged_positions(
    tuning: &Tuning,
    tones: &[ChordTone],
    kind: ChordKind,
) -> Vec<CagedPosition> {
    SHAPES
        .iter()
        .filter_map(|shape| best_position_for_shape(tuning, tones, kind, shape))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmony::{ChordKind, build_diatonic_chords, chord_tones_for_diatonic};
    use crate::scale::{MAJOR, spell_scale};

    fn triad_tones(root: &str) -> Vec<ChordTone> {
        let spelled = spell_scale(root, &MAJOR).unwrap();
        let chords = build_diatonic_chords(&spelled, ChordKind::Triad);
        chord_tones_for_diatonic(&spelled, &chords[0], ChordKind::Triad)
    }

    fn seventh_tones(root: &str, degree_index: usize) -> Vec<ChordTone> {
        let spelled = spell_scale(root, &MAJOR).unwrap();
        let chords = build_diatonic_chords(&spelled, ChordKind::Seventh);
        chord_tones_for_diatonic(&spelled, &chords[degree_index], ChordKind::Seventh)
    }

    fn shape(id: ShapeId) -> &'static CagedShape {
        SHAPES.iter().find(|s| s.id == id).unwrap()
    }

    fn covered_labels(position: &CagedPosition) -> Vec<u8> {
        let mut labels: Vec<u8> = position.labels.iter().flatten().copied().collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    #[test]
    fn open_e_major_is_the_canonical_fingering() {
        let tuning = Tuning::standard();
        let position =
            best_position_for_shape(&tuning, &triad_tones("E"), ChordKind::Triad, shape(ShapeId::E))
                .unwrap();

        assert_eq!(position.base_fret, 0);
        assert_eq!(
            position.frets,
            [Some(0), Some(0), Some(1), Some(2), Some(2), Some(0)]
        );
        assert_eq!(
            position.labels,
            [Some(1), Some(5), Some(3), Some(1), Some(5), Some(1)]
        );
    }

    #[test]
    fn open_c_major_mutes_the_low_string() {
        let tuning = Tuning::standard();
        let position =
            best_position_for_shape(&tuning, &triad_tones("C"), ChordKind::Triad, shape(ShapeId::C))
                .unwrap();

        // x32010 read low-to-high; frets are stored high-to-low.
        assert_eq!(
            position.frets,
            [Some(0), Some(1), Some(0), Some(2), Some(3), None]
        );
    }

    #[test]
    fn open_a_g_and_d_majors_match_their_shapes() {
        let tuning = Tuning::standard();

        let a = best_position_for_shape(&tuning, &triad_tones("A"), ChordKind::Triad, shape(ShapeId::A))
            .unwrap();
        assert_eq!(a.frets, [Some(0), Some(2), Some(2), Some(2), Some(0), None]);

        let g = best_position_for_shape(&tuning, &triad_tones("G"), ChordKind::Triad, shape(ShapeId::G))
            .unwrap();
        assert_eq!(
            g.frets,
            [Some(3), Some(0), Some(0), Some(0), Some(2), Some(3)]
        );

        let d = best_position_for_shape(&tuning, &triad_tones("D"), ChordKind::Triad, shape(ShapeId::D))
            .unwrap();
        assert_eq!(d.frets, [Some(2), Some(3), Some(2), Some(0), None, None]);
    }

    #[test]
    fn e_shape_barres_up_the_neck() {
        let tuning = Tuning::standard();
        let position =
            best_position_for_shape(&tuning, &triad_tones("F#"), ChordKind::Triad, shape(ShapeId::E))
                .unwrap();

        assert_eq!(position.base_fret, 2);
        assert_eq!(position.max_fret, 5);
        assert_eq!(
            position.frets,
            [Some(2), Some(2), Some(3), Some(4), Some(4), Some(2)]
        );
    }

    #[test]
    fn every_shape_covers_a_major_triad() {
        let tuning = Tuning::standard();
        for root in ["C", "G", "D", "A", "E", "Bb", "F#"] {
            let tones = triad_tones(root);
            let positions = caged_positions(&tuning, &tones, ChordKind::Triad);
            assert_eq!(positions.len(), 5, "root {root}: expected all 5 shapes");
            for position in &positions {
                assert_eq!(
                    covered_labels(position),
                    [1, 3, 5],
                    "root {root}, shape {:?}: incomplete coverage",
                    position.shape
                );
                assert!(position.max_fret == position.base_fret + SHAPE_SPAN);
            }
        }
    }

    #[test]
    fn seventh_positions_cover_all_four_degrees() {
        let tuning = Tuning::standard();
        // G7, the dominant seventh of C major.
        let tones = seventh_tones("C", 4);
        let positions = caged_positions(&tuning, &tones, ChordKind::Seventh);
        assert!(!positions.is_empty());
        for position in &positions {
            assert_eq!(covered_labels(position), [1, 3, 5, 7]);
        }
    }

    #[test]
    fn open_a7_uses_the_seventh_template() {
        let tuning = Tuning::standard();
        // A7 is the fifth-degree seventh of D major.
        let tones = seventh_tones("D", 4);
        let position =
            best_position_for_shape(&tuning, &tones, ChordKind::Seventh, shape(ShapeId::A))
                .unwrap();

        // x02020: the G string drops to the open ♭7.
        assert_eq!(
            position.frets,
            [Some(0), Some(2), Some(0), Some(2), Some(0), None]
        );
        assert_eq!(position.labels[2], Some(7));
    }

    #[test]
    fn root_string_is_pinned_to_the_root() {
        let tuning = Tuning::standard();
        let tones = triad_tones("Bb");
        for position in caged_positions(&tuning, &tones, ChordKind::Triad) {
            let template = SHAPES.iter().find(|s| s.id == position.shape).unwrap();
            let fret = position.frets[template.root_string].unwrap();
            assert_eq!(pitch_class_at(&tuning, template.root_string, fret), 10);
            assert_eq!(position.labels[template.root_string], Some(1));
        }
    }

    #[test]
    fn uncoverable_chord_yields_no_positions() {
        // Six strings all tuned to C: no 4-fret span reaches E or G from
        // any root anchor.
        let tuning = Tuning::parse(&["C"; 6]).unwrap();
        let tones = triad_tones("C");
        assert!(caged_positions(&tuning, &tones, ChordKind::Triad).is_empty());
    }

    #[test]
    fn non_six_string_tunings_yield_nothing() {
        let tuning = Tuning::parse(&["G", "D", "A", "E"]).unwrap();
        let tones = triad_tones("C");
        assert!(caged_positions(&tuning, &tones, ChordKind::Triad).is_empty());
    }
}
