// Fretlab explorer — CLI entry point.
//
// Spells a scale and prints everything the engine derives from it: the
// degree map, diatonic chords with Roman numerals, relative modes, a
// fretboard degree chart, and CAGED voicings for a selected chord.
//
// Usage:
//   cargo run -p fretlab_theory -- [ROOT] [--scale ID] [--tuning E,B,G,D,A,E]
//     [--chord N] [--kind triad|7th] [--json]
//
// ROOT defaults to C; --chord selects the Nth scale degree (1-based) and
// turns on the CAGED section. --json emits the same data as JSON.

use fretlab_theory::caged::caged_positions;
use fretlab_theory::circle::KeyMode;
use fretlab_theory::fretboard::{Tuning, degree_at};
use fretlab_theory::harmony::{
    ChordKind, build_diatonic_chords, chord_focus_for, is_diatonic_seven_unique,
    modes_for_major_key_signature,
};
use fretlab_theory::scale::{SCALES, format_degree, scale_by_id, spell_scale};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let root = args
        .get(1)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or("C");
    let scale_id: String = parse_flag(&args, "--scale").unwrap_or_else(|| "major".to_string());
    let kind = match parse_flag::<String>(&args, "--kind").as_deref() {
        Some("7th") => ChordKind::Seventh,
        _ => ChordKind::Triad,
    };
    let chord_degree: Option<usize> = parse_flag(&args, "--chord");
    let json = args.iter().any(|a| a == "--json");

    let Some(scale) = scale_by_id(&scale_id) else {
        eprintln!("Unknown scale '{}'. Known scales:", scale_id);
        for s in SCALES {
            eprintln!("  {} ({})", s.id, s.name);
        }
        std::process::exit(1);
    };

    let tuning = match parse_flag::<String>(&args, "--tuning") {
        Some(spec) => {
            let names: Vec<&str> = spec.split(',').map(str::trim).collect();
            match Tuning::parse(&names) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Bad tuning '{}': {}", spec, e);
                    std::process::exit(1);
                }
            }
        }
        None => Tuning::standard(),
    };

    let spelled = match spell_scale(root, scale) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let chords = build_diatonic_chords(&spelled, kind);
    let modes = if scale.id == "major" {
        modes_for_major_key_signature(&spelled)
    } else {
        Vec::new()
    };

    let focus = chord_degree
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| chords.get(i))
        .map(|chord| chord_focus_for(&spelled, chord, kind, KeyMode::Major, root));
    let positions = focus
        .as_ref()
        .map(|f| caged_positions(&tuning, &f.tones, kind));

    if json {
        let out = serde_json::json!({
            "spelled": spelled,
            "chords": chords,
            "modes": modes,
            "focus": focus,
            "positions": positions,
        });
        match serde_json::to_string_pretty(&out) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("JSON encoding failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("=== Fretlab Explorer ===");
    println!("Key: {} {}", spelled.root.text, scale.name);
    println!();

    println!("Degrees:");
    for d in &spelled.degrees {
        println!("  {:>3}  {}", format_degree(d.degree), d.note.text);
    }
    println!();

    if is_diatonic_seven_unique(&spelled) {
        println!("Diatonic chords ({}):", kind.id());
        for chord in &chords {
            let roman = chord.roman.as_deref().unwrap_or("-");
            println!("  {:>5}  {:>4}  {}", roman, chord.degree_text, chord.chord_text);
        }
    } else if !chords.is_empty() {
        println!("Stacked-third chords ({}):", kind.id());
        for chord in &chords {
            println!("  {:>4}  {}", chord.degree_text, chord.chord_text);
        }
    }
    println!();

    if !modes.is_empty() {
        println!("Relative modes ({} major signature):", spelled.root.text);
        for mode in &modes {
            println!("  {:<10}  {}", mode.mode_name, mode.tonic_text);
        }
        println!();
    }

    print_fretboard(&spelled, &tuning);

    if let (Some(focus), Some(positions)) = (&focus, &positions) {
        println!();
        println!("CAGED voicings for {}:", focus.label);
        if positions.is_empty() {
            println!("  (no shape can cover this chord in this tuning)");
        }
        for p in positions {
            let frets: Vec<String> = p
                .frets
                .iter()
                .map(|f| f.map_or_else(|| "x".to_string(), |n| n.to_string()))
                .collect();
            println!(
                "  {} shape, frets {:>2}-{:>2}:  {}  (high to low)",
                p.shape.name(),
                p.base_fret,
                p.max_fret,
                frets.join(" ")
            );
        }
    }
}

/// Print the first 12 frets: degree numbers on in-scale cells.
fn print_fretboard(spelled: &fretlab_theory::scale::SpelledScale, tuning: &Tuning) {
    println!("Fretboard (frets 0-12):");
    for string in 0..tuning.string_count() {
        let mut row = format!("  {:>2} |", tuning.open_string(string).text);
        for fret in 0..=12 {
            let cell = degree_at(spelled, tuning, string, fret)
                .map_or_else(|| ".".to_string(), |i| {
                    spelled.scale.degrees[i].number.to_string()
                });
            row.push_str(&format!(" {:>2}", cell));
        }
        println!("{}", row);
    }
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
