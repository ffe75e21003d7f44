use crate::audio::PitchSample;
use crate::game::tuning::{ALL_PITCH_CLASSES, PitchClass};
use once_cell::sync::Lazy;

/// Octave range covered by the reference table. Octave 0 reaches the low B
/// of a 5-string bass; octave 4 leaves headroom above the 24th fret.
pub const MIN_OCTAVE: i32 = 0;
pub const MAX_OCTAVE: i32 = 4;

const OCTAVE_SPAN: usize = (MAX_OCTAVE - MIN_OCTAVE + 1) as usize;

/// Equal-tempered reference frequencies, A4 = 440 Hz, densely indexed by
/// (octave, pitch class). Computed once at first use.
static REFERENCE_TABLE: Lazy<[f64; OCTAVE_SPAN * 12]> = Lazy::new(|| {
    let mut table = [0.0; OCTAVE_SPAN * 12];
    for octave in MIN_OCTAVE..=MAX_OCTAVE {
        for pitch_class in ALL_PITCH_CLASSES {
            let midi = midi_number(pitch_class, octave);
            let index = table_index(pitch_class, octave);
            table[index] = 440.0 * 2.0_f64.powf((midi as f64 - 69.0) / 12.0);
        }
    }
    table
});

fn midi_number(pitch_class: PitchClass, octave: i32) -> i32 {
    12 * (octave + 1) + pitch_class.semitone() as i32
}

fn table_index(pitch_class: PitchClass, octave: i32) -> usize {
    (octave - MIN_OCTAVE) as usize * 12 + pitch_class.semitone() as usize
}

/// Reference frequency for a note, or `None` outside the table's octave
/// range. Never panics; the judging hot path relies on that.
pub fn reference_frequency(pitch_class: PitchClass, octave: i32) -> Option<f64> {
    if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&octave) {
        return None;
    }
    Some(REFERENCE_TABLE[table_index(pitch_class, octave)])
}

/// Signed deviation of `frequency` from `reference` in cents
/// (100 cents = one semitone, positive = sharp).
pub fn cents_off(frequency: f64, reference: f64) -> f64 {
    1200.0 * (frequency / reference).log2()
}

/// Pitch-matching tolerance. A single tunable constant; call sites always
/// go through this struct rather than a hard-coded number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatcherConfig {
    pub tolerance_cents: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        // Half a semitone either way.
        MatcherConfig { tolerance_cents: 50.0 }
    }
}

/// Whether the sampled frequency sounds the expected note. Fails closed on
/// non-finite or non-positive frequencies and on notes outside the
/// reference table.
pub fn matches(
    sample: &PitchSample,
    pitch_class: PitchClass,
    octave: i32,
    config: &MatcherConfig,
) -> bool {
    if !sample.frequency.is_finite() || sample.frequency <= 0.0 {
        return false;
    }
    let Some(reference) = reference_frequency(pitch_class, octave) else {
        return false;
    };
    cents_off(sample.frequency, reference).abs() < config.tolerance_cents
}

/// Nearest equal-tempered note to a raw frequency, with the residual cents
/// deviation. Used for the detected-note readout and logs, not for judging.
pub fn nearest_note(frequency: f64) -> Option<(PitchClass, i32, f64)> {
    if !frequency.is_finite() || frequency < 20.0 || frequency > 5000.0 {
        return None;
    }
    let midi = 12.0 * (frequency / 440.0).log2() + 69.0;
    let rounded = midi.round();
    let cents = (midi - rounded) * 100.0;
    let rounded = rounded as i32;
    let pitch_class = PitchClass::from_semitone(rounded.rem_euclid(12) as u32);
    let octave = rounded.div_euclid(12) - 1;
    Some((pitch_class, octave, cents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tuning::PitchClass;

    fn sample(frequency: f64) -> PitchSample {
        PitchSample { frequency, confidence: 0.9, rms_level: 0.5 }
    }

    #[test]
    fn reference_table_anchors() {
        let a4 = reference_frequency(PitchClass::A, 4).unwrap();
        assert!((a4 - 440.0).abs() < 1e-9);
        // Open strings of a standard-tuned bass.
        let e1 = reference_frequency(PitchClass::E, 1).unwrap();
        assert!((e1 - 41.203).abs() < 0.01);
        let a1 = reference_frequency(PitchClass::A, 1).unwrap();
        assert!((a1 - 55.0).abs() < 0.01);
        let g2 = reference_frequency(PitchClass::G, 2).unwrap();
        assert!((g2 - 97.999).abs() < 0.01);
    }

    #[test]
    fn out_of_range_octave_is_none() {
        assert_eq!(reference_frequency(PitchClass::C, -1), None);
        assert_eq!(reference_frequency(PitchClass::C, 5), None);
    }

    #[test]
    fn cents_math() {
        assert!(cents_off(440.0, 440.0).abs() < 1e-9);
        // One semitone up is +100 cents.
        let sharp = 440.0 * 2.0_f64.powf(1.0 / 12.0);
        assert!((cents_off(sharp, 440.0) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn matches_within_half_a_semitone() {
        let config = MatcherConfig::default();
        assert!(matches(&sample(41.2), PitchClass::E, 1, &config));
        // F1 is ~100 cents above E1, well outside tolerance.
        assert!(!matches(&sample(41.2), PitchClass::F, 1, &config));
        assert!(!matches(&sample(43.65), PitchClass::E, 1, &config));
    }

    #[test]
    fn matcher_fails_closed() {
        let config = MatcherConfig::default();
        assert!(!matches(&sample(f64::NAN), PitchClass::E, 1, &config));
        assert!(!matches(&sample(0.0), PitchClass::E, 1, &config));
        assert!(!matches(&sample(41.2), PitchClass::E, 9, &config));
    }

    #[test]
    fn tolerance_is_configurable() {
        let tight = MatcherConfig { tolerance_cents: 10.0 };
        // ~20 cents sharp of E1.
        let detuned = 41.203 * 2.0_f64.powf(20.0 / 1200.0);
        assert!(matches(&sample(detuned), PitchClass::E, 1, &MatcherConfig::default()));
        assert!(!matches(&sample(detuned), PitchClass::E, 1, &tight));
    }

    #[test]
    fn nearest_note_readout() {
        let (pc, octave, cents) = nearest_note(440.0).unwrap();
        assert_eq!((pc, octave), (PitchClass::A, 4));
        assert!(cents.abs() < 1e-6);

        let (pc, octave, _) = nearest_note(41.2).unwrap();
        assert_eq!((pc, octave), (PitchClass::E, 1));

        assert_eq!(nearest_note(5.0), None);
        assert_eq!(nearest_note(f64::INFINITY), None);
    }
}
