//! Exercise selection. The menu is driven by played notes rather than
//! keys: a fresh pluck cycles the selection, a note held across the
//! debounce window confirms it and arms the pre-start screen.

use crate::screens::{Screen, ScreenAction};
use log::info;

pub struct State {
    pub selected_index: usize,
    pub exercise_count: usize,
}

pub fn init(exercise_count: usize) -> State {
    State {
        selected_index: 0,
        exercise_count,
    }
}

/// Called by the driver on each debounced note pulse. `note_was_sounding`
/// is whether a valid note was already ringing on the previous frame.
pub fn handle_note_pulse(state: &mut State, note_was_sounding: bool) -> ScreenAction {
    if state.exercise_count == 0 {
        return ScreenAction::None;
    }
    if note_was_sounding {
        info!("Exercise {} confirmed.", state.selected_index);
        return ScreenAction::Navigate(Screen::PreStart);
    }
    state.selected_index = (state.selected_index + 1) % state.exercise_count;
    info!("Exercise selection moved to {}.", state.selected_index);
    ScreenAction::None
}
