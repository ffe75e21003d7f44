use crate::game::judgment::HitQuality;
use crate::game::tuning::{PitchClass, Tuning};
use serde::{Deserialize, Serialize};

/// Silence appended after the last note before a session is considered over.
pub const CHART_TAIL_SECONDS: f64 = 2.0;

/// Fraction of a beat a note rings for when the author leaves duration out.
const DEFAULT_DURATION_BEATS: f64 = 0.9;

/// A single tablature note. Immutable once the chart is built; all runtime
/// judging state lives in the session's parallel [`NoteJudgment`] vector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartNote {
    /// Seconds from chart start. Resolved from beats exactly once at
    /// construction; judging never re-derives this.
    pub time: f64,
    /// String index into the chart's tuning (0 = highest-pitched string).
    pub string: usize,
    /// Fret number, 0 for the open string.
    pub fret: u32,
    /// Seconds the note rings for.
    pub duration: f64,
}

impl ChartNote {
    /// The note name and octave this tab position sounds under `tuning`.
    /// A string index outside the tuning yields `None`.
    pub fn fretted_note(&self, tuning: &Tuning) -> Option<(PitchClass, i32)> {
        let open = tuning.string(self.string)?;
        let position = open.pitch_class.semitone() as u32 + self.fret;
        let pitch_class = PitchClass::from_semitone(position);
        let octave = open.octave + (position / 12) as i32;
        Some((pitch_class, octave))
    }
}

/// A note authored on the beat grid rather than in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BeatNote {
    pub beat: f64,
    pub string: usize,
    pub fret: u32,
    /// Beats the note rings for; 0 means "use the default".
    pub duration_beats: f64,
}

/// One exercise: timed notes plus the tuning and tempo they were written for.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    pub artist: String,
    pub bpm: f64,
    pub tuning: Tuning,
    pub notes: Vec<ChartNote>,
    /// Last note's end plus [`CHART_TAIL_SECONDS`]; 0 for an empty chart.
    pub duration: f64,
}

impl Chart {
    /// Builds a chart from notes already resolved to seconds. Notes are
    /// sorted by time and the total duration is computed here, once.
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        bpm: f64,
        tuning: Tuning,
        mut notes: Vec<ChartNote>,
    ) -> Chart {
        notes.sort_by(|a, b| a.time.total_cmp(&b.time));
        let duration = notes
            .last()
            .map(|last| last.time + last.duration + CHART_TAIL_SECONDS)
            .unwrap_or(0.0);
        Chart {
            title: title.into(),
            artist: artist.into(),
            bpm,
            tuning,
            notes,
            duration,
        }
    }

    /// Builds a chart from beat-grid notes, resolving `time = beat * 60/bpm`
    /// up front so the judging hot path never touches the tempo again.
    pub fn from_beats(
        title: impl Into<String>,
        artist: impl Into<String>,
        bpm: f64,
        tuning: Tuning,
        beats: Vec<BeatNote>,
    ) -> Chart {
        let beat_seconds = if bpm > 0.0 { 60.0 / bpm } else { 0.0 };
        let notes = beats
            .into_iter()
            .map(|n| {
                let duration_beats = if n.duration_beats > 0.0 {
                    n.duration_beats
                } else {
                    DEFAULT_DURATION_BEATS
                };
                ChartNote {
                    time: n.beat * beat_seconds,
                    string: n.string,
                    fret: n.fret,
                    duration: duration_beats * beat_seconds,
                }
            })
            .collect();
        Chart::new(title, artist, bpm, tuning, notes)
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }
}

/// Runtime judging state for one chart note. A fresh vector of these is
/// built every time a chart is (re)selected; chart templates are never
/// mutated, so nothing leaks between sessions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteJudgment {
    /// True once the note has been resolved, as a hit or as a miss.
    pub hit: bool,
    pub quality: HitQuality,
    pub hit_time: f64,
}

impl Default for NoteJudgment {
    fn default() -> Self {
        NoteJudgment {
            hit: false,
            quality: HitQuality::Miss,
            hit_time: 0.0,
        }
    }
}
