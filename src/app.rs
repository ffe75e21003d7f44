use crate::audio::PitchSample;
use crate::game::chart::Chart;
use crate::game::exercises;
use crate::game::gameplay::PlayConfig;
use crate::game::scores::ResultsSummary;
use crate::screens::{self, Screen, ScreenAction};
use log::{info, warn};
use std::sync::Arc;

/// Minimum gap between note pulses used for navigation, so one sustained
/// pluck does not race through the menus.
pub const NOTE_PULSE_COOLDOWN: f64 = 0.300;

/// The session driver. Owns the exercise list, the active screen states and
/// the navigation debounce; the host calls [`App::update`] once per frame
/// with a monotonic clock and the latest pitch sample.
pub struct App {
    exercises: Vec<Arc<Chart>>,
    config: PlayConfig,
    screen: Screen,
    menu: screens::menu::State,
    pre_start: Option<screens::pre_start::State>,
    gameplay: Option<screens::gameplay::State>,
    results: Option<screens::results::State>,
    note_was_sounding: bool,
    last_pulse_at: Option<f64>,
    exit_requested: bool,
}

impl App {
    /// An empty exercise list falls back to the built-in charts so the
    /// session always has something selectable.
    pub fn new(exercises: Vec<Arc<Chart>>, config: PlayConfig) -> App {
        let exercises = if exercises.is_empty() {
            warn!("No exercises supplied, falling back to built-ins.");
            exercises::builtin_exercises()
        } else {
            exercises
        };
        info!("Session driver ready with {} exercises.", exercises.len());
        let menu = screens::menu::init(exercises.len());
        App {
            exercises,
            config,
            screen: Screen::Menu,
            menu,
            pre_start: None,
            gameplay: None,
            results: None,
            note_was_sounding: false,
            last_pulse_at: None,
            exit_requested: false,
        }
    }

    /// One frame tick. `now` must be monotonic non-decreasing within the
    /// process; judging only runs while the gameplay screen is active.
    pub fn update(&mut self, now: f64, sample: PitchSample) {
        let sounding = sample.is_valid_with(self.config.confidence_threshold);
        let pulse = sounding
            && self
                .last_pulse_at
                .is_none_or(|t| now - t > NOTE_PULSE_COOLDOWN);
        if pulse {
            self.last_pulse_at = Some(now);
        }

        let action = match self.screen {
            Screen::Menu => {
                if pulse {
                    screens::menu::handle_note_pulse(&mut self.menu, self.note_was_sounding)
                } else {
                    ScreenAction::None
                }
            }
            Screen::PreStart => match self.pre_start.as_mut() {
                Some(state) => {
                    if pulse {
                        screens::pre_start::handle_note_pulse(state)
                    } else {
                        screens::pre_start::update(state, now)
                    }
                }
                None => ScreenAction::None,
            },
            Screen::Gameplay => match self.gameplay.as_mut() {
                Some(state) => screens::gameplay::update(state, now, &sample),
                None => ScreenAction::None,
            },
            Screen::Results => match self.results.as_mut() {
                Some(state) => {
                    if pulse {
                        screens::results::handle_note_pulse(state)
                    } else {
                        ScreenAction::None
                    }
                }
                None => ScreenAction::None,
            },
        };

        self.note_was_sounding = sounding;
        self.handle_action(action, now);
    }

    /// Picks an exercise by index. While a session is live this is a hard
    /// reset: the running play-through is discarded and the new chart
    /// starts over from a clean slate.
    pub fn select_exercise(&mut self, index: usize, now: f64) {
        if index >= self.exercises.len() {
            warn!("Exercise index {} out of range.", index);
            return;
        }
        self.menu.selected_index = index;
        if self.screen == Screen::Gameplay {
            info!("Chart re-selected mid-play, restarting.");
            self.gameplay = Some(screens::gameplay::init(
                Arc::clone(&self.exercises[index]),
                self.config,
                now,
            ));
        }
    }

    fn handle_action(&mut self, action: ScreenAction, now: f64) {
        match action {
            ScreenAction::None => {}
            ScreenAction::Navigate(target) => self.transition(target, now),
            ScreenAction::Exit => {
                info!("Exit requested.");
                self.exit_requested = true;
            }
        }
    }

    /// Applies a screen transition if it is one of the legal edges of the
    /// session machine; anything else is a logged no-op.
    fn transition(&mut self, target: Screen, now: f64) {
        match (self.screen, target) {
            (Screen::Menu, Screen::PreStart) => {
                self.pre_start = Some(screens::pre_start::init(now));
                self.screen = Screen::PreStart;
                info!("Armed: play a note or wait for the countdown.");
            }
            (Screen::PreStart, Screen::Gameplay) => {
                let chart = Arc::clone(&self.exercises[self.menu.selected_index]);
                self.pre_start = None;
                self.gameplay = Some(screens::gameplay::init(chart, self.config, now));
                self.screen = Screen::Gameplay;
            }
            (Screen::Gameplay, Screen::Results) => {
                if let Some(gameplay) = self.gameplay.as_ref() {
                    self.results = Some(screens::results::init(&gameplay.play));
                    self.screen = Screen::Results;
                }
            }
            (Screen::Results, Screen::Menu) => {
                // No resume: the note runtimes and score go with the screen.
                self.gameplay = None;
                self.results = None;
                self.screen = Screen::Menu;
                info!("Back to the menu.");
            }
            (from, to) => {
                warn!("Ignoring illegal transition {:?} -> {:?}.", from, to);
            }
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn exercises(&self) -> &[Arc<Chart>] {
        &self.exercises
    }

    pub fn selected_exercise(&self) -> &Arc<Chart> {
        &self.exercises[self.menu.selected_index]
    }

    pub fn selected_index(&self) -> usize {
        self.menu.selected_index
    }

    /// The live play state while the gameplay or results screen is up.
    pub fn play(&self) -> Option<&crate::game::gameplay::State> {
        self.gameplay.as_ref().map(|s| &s.play)
    }

    pub fn results(&self) -> Option<&ResultsSummary> {
        self.results.as_ref().map(|s| &s.summary)
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}
