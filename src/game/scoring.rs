use crate::game::judgment::HitQuality;

/// Seconds a feedback popup stays alive before the per-frame sweep drops it.
pub const DEFAULT_FEEDBACK_LIFETIME: f64 = 1.0;

/// Score multiplier for the current (post-increment) combo.
pub fn combo_multiplier(combo: u32) -> u64 {
    if combo >= 50 {
        4
    } else if combo >= 25 {
        3
    } else if combo >= 10 {
        2
    } else {
        1
    }
}

/// Transient judgment popup, positioned in screen space by the renderer.
/// `created_at` is logical session time so eviction follows the same clock
/// as judging.
#[derive(Clone, Debug)]
pub struct FeedbackEvent {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub created_at: f64,
    pub quality: HitQuality,
}

/// Running score for one session. One of these is alive per play state and
/// it is rebuilt from scratch whenever a chart is (re)selected.
#[derive(Clone, Debug)]
pub struct ScoreState {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub notes_hit: u32,
    pub notes_missed: u32,
    pub total_notes: u32,
    pub feedback: Vec<FeedbackEvent>,
    feedback_lifetime: f64,
}

impl ScoreState {
    pub fn new(total_notes: u32) -> ScoreState {
        ScoreState::with_feedback_lifetime(total_notes, DEFAULT_FEEDBACK_LIFETIME)
    }

    pub fn with_feedback_lifetime(total_notes: u32, feedback_lifetime: f64) -> ScoreState {
        ScoreState {
            score: 0,
            combo: 0,
            max_combo: 0,
            notes_hit: 0,
            notes_missed: 0,
            total_notes,
            feedback: Vec::new(),
            feedback_lifetime,
        }
    }

    /// Applies one judged note. A Miss breaks the combo; anything else
    /// extends it and scores base points times the combo multiplier.
    /// Always pushes a feedback event at (x, y).
    pub fn register(&mut self, quality: HitQuality, x: f32, y: f32, current_time: f64) {
        let mut multiplier = 1;
        if quality.is_hit() {
            self.combo += 1;
            if self.combo > self.max_combo {
                self.max_combo = self.combo;
            }
            multiplier = combo_multiplier(self.combo);
            self.score += quality.base_points() * multiplier;
            self.notes_hit += 1;
        } else {
            self.combo = 0;
            self.notes_missed += 1;
        }

        let text = if quality.is_hit() && multiplier > 1 {
            format!("{} x{}", quality.label(), multiplier)
        } else {
            quality.label().to_string()
        };
        self.feedback.push(FeedbackEvent {
            text,
            x,
            y,
            created_at: current_time,
            quality,
        });
    }

    /// Hit accuracy percentage; 100 before anything has been judged.
    pub fn accuracy(&self) -> f64 {
        let judged = self.notes_hit + self.notes_missed;
        if judged == 0 {
            return 100.0;
        }
        f64::from(self.notes_hit) / f64::from(judged) * 100.0
    }

    /// Per-frame garbage collection of expired feedback events.
    pub fn retire_feedback(&mut self, current_time: f64) {
        let lifetime = self.feedback_lifetime;
        self.feedback.retain(|event| current_time - event.created_at < lifetime);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn multiplier_ladder_breakpoints() {
        assert_eq!(combo_multiplier(0), 1);
        assert_eq!(combo_multiplier(9), 1);
        assert_eq!(combo_multiplier(10), 2);
        assert_eq!(combo_multiplier(24), 2);
        assert_eq!(combo_multiplier(25), 3);
        assert_eq!(combo_multiplier(49), 3);
        assert_eq!(combo_multiplier(50), 4);
        assert_eq!(combo_multiplier(u32::MAX), 4);
    }

    #[test]
    fn hits_extend_combo_and_score() {
        let mut score = ScoreState::new(4);
        score.register(HitQuality::Perfect, 0.0, 0.0, 0.0);
        score.register(HitQuality::Good, 0.0, 0.0, 0.1);
        assert_eq!(score.score, 150);
        assert_eq!(score.combo, 2);
        assert_eq!(score.max_combo, 2);
        assert_eq!(score.notes_hit, 2);
        assert_eq!(score.notes_missed, 0);
    }

    #[test]
    fn miss_breaks_combo_but_keeps_max() {
        let mut score = ScoreState::new(4);
        score.register(HitQuality::Perfect, 0.0, 0.0, 0.0);
        score.register(HitQuality::Perfect, 0.0, 0.0, 0.1);
        score.register(HitQuality::Miss, 0.0, 0.0, 0.2);
        assert_eq!(score.combo, 0);
        assert_eq!(score.max_combo, 2);
        assert_eq!(score.notes_missed, 1);
        assert_eq!(score.score, 200);
    }

    #[test]
    fn multiplier_applies_on_post_increment_combo() {
        let mut score = ScoreState::new(20);
        // Nine hits leave the combo at 9; the tenth crosses the 2x break.
        for i in 0..10 {
            score.register(HitQuality::Perfect, 0.0, 0.0, i as f64 * 0.1);
        }
        assert_eq!(score.combo, 10);
        // 9 * 100 + 1 * 200
        assert_eq!(score.score, 1100);

        // An eleventh Perfect also doubles.
        score.register(HitQuality::Perfect, 0.0, 0.0, 1.1);
        assert_eq!(score.score, 1300);
        assert!(score.max_combo >= 11);
    }

    #[test]
    fn accuracy_is_total() {
        let mut score = ScoreState::new(2);
        assert_eq!(score.accuracy(), 100.0);
        score.register(HitQuality::Good, 0.0, 0.0, 0.0);
        score.register(HitQuality::Miss, 0.0, 0.0, 0.1);
        assert!((score.accuracy() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn feedback_text_carries_multiplier_suffix() {
        let mut score = ScoreState::new(20);
        for i in 0..10 {
            score.register(HitQuality::Perfect, 0.0, 0.0, i as f64 * 0.1);
        }
        let last = score.feedback.last().unwrap();
        assert_eq!(last.text, "Perfect! x2");

        let first = &score.feedback[0];
        assert_eq!(first.text, "Perfect!");
    }

    #[test]
    fn miss_feedback_has_no_suffix() {
        let mut score = ScoreState::new(60);
        for i in 0..50 {
            score.register(HitQuality::Ok, 0.0, 0.0, i as f64 * 0.1);
        }
        score.register(HitQuality::Miss, 0.0, 0.0, 5.0);
        assert_eq!(score.feedback.last().unwrap().text, "Miss");
    }

    #[test]
    fn feedback_sweep_drops_expired_events() {
        let mut score = ScoreState::new(2);
        score.register(HitQuality::Perfect, 0.0, 0.0, 0.0);
        score.register(HitQuality::Good, 0.0, 0.0, 0.8);
        score.retire_feedback(0.9);
        assert_eq!(score.feedback.len(), 2);
        score.retire_feedback(1.0);
        assert_eq!(score.feedback.len(), 1);
        score.retire_feedback(5.0);
        assert!(score.feedback.is_empty());
    }

    proptest! {
        /// The ladder is monotonic non-decreasing and only ever 1, 2, 3, 4.
        #[test]
        fn multiplier_is_monotonic_and_bounded(combo in 0u32..200) {
            let here = combo_multiplier(combo);
            prop_assert!((1..=4).contains(&here));
            prop_assert!(here <= combo_multiplier(combo + 1));
        }

        /// Counters never exceed the chart and combo never exceeds max.
        #[test]
        fn invariants_hold_over_random_sequences(
            qualities in proptest::collection::vec(0u8..4, 0..64)
        ) {
            let mut score = ScoreState::new(64);
            for (i, q) in qualities.iter().enumerate() {
                let quality = match q {
                    0 => HitQuality::Miss,
                    1 => HitQuality::Ok,
                    2 => HitQuality::Good,
                    _ => HitQuality::Perfect,
                };
                score.register(quality, 0.0, 0.0, i as f64 * 0.05);
                prop_assert!(score.combo <= score.max_combo);
                prop_assert!(score.notes_hit + score.notes_missed <= score.total_notes);
            }
        }
    }
}
