//! Built-in practice charts, so the trainer is playable before the player
//! has authored or installed any chart files.

use crate::game::chart::{BeatNote, Chart};
use crate::game::tuning::Tuning;
use std::sync::Arc;

const STRING_G: usize = 0;
const STRING_D: usize = 1;
const STRING_A: usize = 2;
const STRING_E: usize = 3;

pub fn builtin_exercises() -> Vec<Arc<Chart>> {
    vec![
        Arc::new(e_minor_scale()),
        Arc::new(open_string_warmup()),
        Arc::new(root_fifth_groove()),
    ]
}

/// One octave of E minor up the E and A strings, one note per beat.
fn e_minor_scale() -> Chart {
    let frets = [
        (STRING_E, 0),
        (STRING_E, 2),
        (STRING_E, 3),
        (STRING_E, 5),
        (STRING_A, 0),
        (STRING_A, 2),
        (STRING_A, 3),
        (STRING_A, 5),
    ];
    let notes = frets
        .iter()
        .enumerate()
        .map(|(i, &(string, fret))| BeatNote {
            beat: i as f64,
            string,
            fret,
            duration_beats: 0.0,
        })
        .collect();
    Chart::from_beats("E Minor Scale", "Built-in", 80.0, Tuning::standard(), notes)
}

/// All four open strings, low to high, twice through. Good for checking
/// the microphone before harder material.
fn open_string_warmup() -> Chart {
    let order = [STRING_E, STRING_A, STRING_D, STRING_G];
    let notes = (0..8)
        .map(|i| BeatNote {
            beat: i as f64 * 2.0,
            string: order[i % 4],
            fret: 0,
            duration_beats: 1.5,
        })
        .collect();
    Chart::from_beats("Open String Warmup", "Built-in", 60.0, Tuning::standard(), notes)
}

/// Root-fifth pattern over E and A, the standard country/rock bass move.
fn root_fifth_groove() -> Chart {
    let bars = [(STRING_E, 0, STRING_A, 2), (STRING_A, 0, STRING_D, 2)];
    let mut notes = Vec::new();
    for (bar, &(root_string, root_fret, fifth_string, fifth_fret)) in
        bars.iter().cycle().take(4).enumerate()
    {
        let start = bar as f64 * 4.0;
        notes.push(BeatNote { beat: start, string: root_string, fret: root_fret, duration_beats: 0.0 });
        notes.push(BeatNote { beat: start + 2.0, string: fifth_string, fret: fifth_fret, duration_beats: 0.0 });
    }
    Chart::from_beats("Root-Fifth Groove", "Built-in", 100.0, Tuning::standard(), notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tuning::PitchClass;

    #[test]
    fn exercises_are_well_formed() {
        for chart in builtin_exercises() {
            assert!(chart.note_count() > 0);
            assert!(chart.duration > 0.0);
            assert!(chart.bpm > 0.0);
            // Every note must resolve under the chart's own tuning.
            for note in &chart.notes {
                assert!(note.fretted_note(&chart.tuning).is_some());
            }
            // Notes are in time order.
            for pair in chart.notes.windows(2) {
                assert!(pair[0].time <= pair[1].time);
            }
        }
    }

    #[test]
    fn scale_starts_on_the_open_e() {
        let chart = e_minor_scale();
        assert_eq!(
            chart.notes[0].fretted_note(&chart.tuning),
            Some((PitchClass::E, 1))
        );
        // 80 BPM: one note per beat, 0.75s apart.
        assert!((chart.notes[1].time - 0.75).abs() < 1e-9);
    }
}
