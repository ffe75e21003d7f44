//! Frozen end-of-session results. Judging never runs here; the summary is
//! computed once on entry and a played note returns to the menu.

use crate::game::gameplay;
use crate::game::scores::{self, ResultsSummary};
use crate::screens::{Screen, ScreenAction};
use log::info;

pub struct State {
    pub summary: ResultsSummary,
}

pub fn init(play: &gameplay::State) -> State {
    let summary = scores::summarize(&play.chart, &play.score);
    info!(
        "Results: '{}' grade {} score {} accuracy {:.1}% ({}/{} notes, max combo {})",
        summary.title,
        summary.grade.label(),
        summary.score,
        summary.accuracy,
        summary.notes_hit,
        summary.total_notes,
        summary.max_combo
    );
    State { summary }
}

pub fn handle_note_pulse(_state: &mut State) -> ScreenAction {
    ScreenAction::Navigate(Screen::Menu)
}
