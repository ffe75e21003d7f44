//! The live-judging screen: owns the play state and a session-relative
//! clock, and hands off to the results screen when the chart runs out.

use crate::audio::PitchSample;
use crate::game::chart::Chart;
use crate::game::gameplay::{self, PlayConfig};
use crate::screens::{Screen, ScreenAction};
use std::sync::Arc;

pub struct State {
    pub play: gameplay::State,
    /// Driver time at which this play-through began; play time is measured
    /// from here so `current_time` starts at zero for every session.
    started_at: f64,
}

pub fn init(chart: Arc<Chart>, config: PlayConfig, now: f64) -> State {
    State {
        play: gameplay::init(chart, config),
        started_at: now,
    }
}

pub fn update(state: &mut State, now: f64, sample: &PitchSample) -> ScreenAction {
    let play_time = (now - state.started_at).max(0.0);
    gameplay::update(&mut state.play, play_time, sample);
    if state.play.finished {
        return ScreenAction::Navigate(Screen::Results);
    }
    ScreenAction::None
}
