use crate::audio::PitchSample;
use crate::game::chart::{Chart, NoteJudgment};
use crate::game::judgment::{HitQuality, TimingWindows};
use crate::game::pitch::{self, MatcherConfig};
use crate::game::scoring::ScoreState;
use crate::game::tuning::full_name;
use log::info;
use std::sync::Arc;

// Feedback anchor: judged notes pop at the play line, one lane per string.
// The renderer maps these reference coordinates into its own space.
pub const PLAY_LINE_X: f32 = 250.0;
pub const LANE_TOP_Y: f32 = 80.0;
pub const LANE_SPACING_Y: f32 = 40.0;

/// Everything tunable about judging, resolved once before play starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayConfig {
    pub windows: TimingWindows,
    pub matcher: MatcherConfig,
    pub confidence_threshold: f64,
    pub feedback_lifetime: f64,
}

impl Default for PlayConfig {
    fn default() -> Self {
        PlayConfig {
            windows: TimingWindows::default(),
            matcher: MatcherConfig::default(),
            confidence_threshold: crate::audio::DEFAULT_CONFIDENCE_THRESHOLD,
            feedback_lifetime: crate::game::scoring::DEFAULT_FEEDBACK_LIFETIME,
        }
    }
}

/// Live state for one play-through of one chart. The chart itself is shared
/// and immutable; `judgments` is the parallel per-note runtime vector, so a
/// fresh `State` always starts from a clean slate.
pub struct State {
    pub chart: Arc<Chart>,
    pub judgments: Vec<NoteJudgment>,
    pub score: ScoreState,
    pub config: PlayConfig,
    pub current_time: f64,
    pub finished: bool,
}

pub fn init(chart: Arc<Chart>, config: PlayConfig) -> State {
    info!(
        "Starting play: '{}' ({} notes, {:.0} BPM, {:.1}s)",
        chart.title,
        chart.note_count(),
        chart.bpm,
        chart.duration
    );
    let judgments = vec![NoteJudgment::default(); chart.note_count()];
    let score = ScoreState::with_feedback_lifetime(
        chart.note_count() as u32,
        config.feedback_lifetime,
    );
    State {
        chart,
        judgments,
        score,
        config,
        current_time: 0.0,
        finished: false,
    }
}

/// One frame tick: judge against the latest pitch sample, resolve aged-out
/// notes, sweep expired feedback, and detect the end of the chart.
pub fn update(state: &mut State, now: f64, sample: &PitchSample) {
    state.current_time = now;

    judge_pitch(state, sample);
    sweep_missed(state);
    state.score.retire_feedback(now);

    if !state.finished && now > state.chart.duration {
        state.finished = true;
        info!(
            "Chart complete: score {}, accuracy {:.1}%, max combo {}",
            state.score.score,
            state.score.accuracy(),
            state.score.max_combo
        );
    }
}

/// Scans unresolved notes in time order against the current sample. At most
/// one note is credited per invocation so a single pluck cannot double-count
/// chords or neighbors; notes that aged out along the way are resolved as
/// misses without blocking the scan.
pub fn judge_pitch(state: &mut State, sample: &PitchSample) {
    if !sample.is_valid_with(state.config.confidence_threshold) {
        return;
    }

    let miss_window = state.config.windows.miss;
    for index in 0..state.chart.notes.len() {
        if state.judgments[index].hit {
            continue;
        }
        let note = state.chart.notes[index];
        let time_delta = note.time - state.current_time;

        // Still too far in the future; every later note is further away.
        if time_delta > miss_window {
            break;
        }

        if time_delta < -miss_window {
            register(state, index, HitQuality::Miss);
            continue;
        }

        let Some((pitch_class, octave)) = note.fretted_note(&state.chart.tuning) else {
            // String index outside the tuning: unjudgeable, skip it.
            continue;
        };
        if pitch::matches(sample, pitch_class, octave, &state.config.matcher) {
            let quality = state.config.windows.classify(time_delta.abs());
            info!(
                "HIT: {} at {:.3}s, offset {:+.0}ms, {:?}",
                full_name(pitch_class, octave),
                state.current_time,
                -time_delta * 1000.0,
                quality
            );
            register(state, index, quality);
            break;
        }
    }
}

/// Resolves every note that aged past the miss window without being hit.
/// Runs every frame, valid sample or not, so silence still ends in misses.
pub fn sweep_missed(state: &mut State) {
    let miss_window = state.config.windows.miss;
    for index in 0..state.chart.notes.len() {
        if state.judgments[index].hit {
            continue;
        }
        if state.current_time - state.chart.notes[index].time > miss_window {
            info!(
                "MISSED: note {} at {:.3}s",
                index, state.chart.notes[index].time
            );
            register(state, index, HitQuality::Miss);
        }
    }
}

/// Marks a note resolved and feeds the score exactly once. Callers only
/// reach this through the `!hit` filter, which is what makes re-judging
/// structurally impossible.
fn register(state: &mut State, index: usize, quality: HitQuality) {
    let judgment = &mut state.judgments[index];
    judgment.hit = true;
    judgment.quality = quality;
    judgment.hit_time = state.current_time;

    let (x, y) = lane_anchor(state.chart.notes[index].string);
    state.score.register(quality, x, y, state.current_time);
}

/// Chart-derived feedback position: a miss has no pluck to anchor to, so
/// both hits and misses pop at the play line in the note's string lane.
fn lane_anchor(string: usize) -> (f32, f32) {
    (PLAY_LINE_X, LANE_TOP_Y + string as f32 * LANE_SPACING_Y)
}
