use log::{LevelFilter, info, warn};
use pitchsync::app::App;
use pitchsync::audio::{PitchFeed, PitchSample, PitchSource};
use pitchsync::game::exercises::builtin_exercises;
use pitchsync::game::pitch;
use pitchsync::screens::Screen;
use pitchsync::settings::{SETTINGS_PATH, Settings};
use rand::Rng;
use std::error::Error;
use std::path::Path;

const FRAME_SECONDS: f64 = 1.0 / 60.0;
const MAX_SESSION_SECONDS: f64 = 120.0;
const PLUCK_RING_SECONDS: f64 = 0.12;

/// One synthetic pluck: what the "player" sounds and when.
struct Pluck {
    at: f64,
    frequency: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    // --- Logging Setup ---
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .filter_module("pitchsync::game::gameplay", LevelFilter::Debug)
        .filter_module("pitchsync::screens", LevelFilter::Debug)
        .init();

    info!("pitchsync demo session starting...");

    let settings = Settings::load(Path::new(SETTINGS_PATH));
    let config = settings.play_config();

    let exercises = builtin_exercises();
    for (i, exercise) in exercises.iter().enumerate() {
        info!(
            "  {}. {} ({:.0} BPM, {} notes)",
            i + 1,
            exercise.title,
            exercise.bpm,
            exercise.note_count()
        );
    }

    // The demo stands in for the capture thread: it publishes into the
    // same single-slot mailbox a real estimator would.
    let feed = PitchFeed::new();
    let publisher = feed.publisher();
    let mut app = App::new(exercises, config);

    let mut rng = rand::rng();
    let mut now = 0.0_f64;
    let mut plucks: Option<(f64, Vec<Pluck>)> = None;

    while now < MAX_SESSION_SECONDS {
        let sample = match app.screen() {
            // Hold an open E through the menu: the first pulse cycles the
            // selection, the sustained note confirms it.
            Screen::Menu => strong_sample(41.2),
            // Stay silent through the pre-roll so the countdown arm of the
            // state machine is the one that fires.
            Screen::PreStart => {
                plucks = None;
                PitchSample::silence()
            }
            Screen::Gameplay => {
                let (started_at, schedule) = plucks.get_or_insert_with(|| {
                    (now, schedule_plucks(&app, &mut rng))
                });
                let play_time = now - *started_at;
                match schedule
                    .iter()
                    .find(|p| play_time >= p.at && play_time < p.at + PLUCK_RING_SECONDS)
                {
                    Some(pluck) => strong_sample(pluck.frequency),
                    None => PitchSample::silence(),
                }
            }
            Screen::Results => break,
        };

        publisher.publish(sample);
        app.update(now, feed.latest_sample());
        now += FRAME_SECONDS;
    }

    let Some(summary) = app.results() else {
        warn!("Session ran out of time without reaching the results screen.");
        return Err("demo session did not finish".into());
    };
    println!("{}", serde_json::to_string_pretty(summary)?);

    info!("Demo session finished.");
    Ok(())
}

fn strong_sample(frequency: f64) -> PitchSample {
    PitchSample { frequency, confidence: 0.9, rms_level: 0.6 }
}

/// Builds the synthetic player's performance for the chart now in play:
/// every note slightly early or late and slightly detuned, with the
/// occasional pluck dropped outright.
fn schedule_plucks(app: &App, rng: &mut impl Rng) -> Vec<Pluck> {
    let chart = app.selected_exercise();
    let mut plucks = Vec::with_capacity(chart.note_count());
    for note in &chart.notes {
        if rng.random_bool(0.1) {
            continue; // flubbed it
        }
        let Some((pitch_class, octave)) = note.fretted_note(&chart.tuning) else {
            continue;
        };
        let Some(reference) = pitch::reference_frequency(pitch_class, octave) else {
            continue;
        };
        let timing_jitter = rng.random_range(-0.04..0.04);
        let detune_cents = rng.random_range(-15.0..15.0);
        plucks.push(Pluck {
            at: (note.time + timing_jitter).max(0.0),
            frequency: reference * 2.0_f64.powf(detune_cents / 1200.0),
        });
    }
    plucks
}
