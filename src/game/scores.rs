use crate::game::chart::Chart;
use crate::game::scoring::ScoreState;
use serde::Serialize;

/// Letter grade awarded on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn label(self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

pub fn accuracy_to_grade(accuracy: f64) -> Grade {
    if accuracy >= 95.0 {
        Grade::S
    } else if accuracy >= 90.0 {
        Grade::A
    } else if accuracy >= 80.0 {
        Grade::B
    } else if accuracy >= 70.0 {
        Grade::C
    } else if accuracy >= 60.0 {
        Grade::D
    } else {
        Grade::F
    }
}

/// Frozen end-of-session results, ready for the results screen or for
/// export by an external collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct ResultsSummary {
    pub title: String,
    pub score: u64,
    pub accuracy: f64,
    pub grade: Grade,
    pub max_combo: u32,
    pub notes_hit: u32,
    pub notes_missed: u32,
    pub total_notes: u32,
}

pub fn summarize(chart: &Chart, score: &ScoreState) -> ResultsSummary {
    let accuracy = score.accuracy();
    ResultsSummary {
        title: chart.title.clone(),
        score: score.score,
        accuracy,
        grade: accuracy_to_grade(accuracy),
        max_combo: score.max_combo,
        notes_hit: score.notes_hit,
        notes_missed: score.notes_missed,
        total_notes: score.total_notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::judgment::HitQuality;
    use crate::game::tuning::Tuning;

    #[test]
    fn grade_thresholds() {
        assert_eq!(accuracy_to_grade(100.0), Grade::S);
        assert_eq!(accuracy_to_grade(95.0), Grade::S);
        assert_eq!(accuracy_to_grade(94.9), Grade::A);
        assert_eq!(accuracy_to_grade(90.0), Grade::A);
        assert_eq!(accuracy_to_grade(80.0), Grade::B);
        assert_eq!(accuracy_to_grade(70.0), Grade::C);
        assert_eq!(accuracy_to_grade(60.0), Grade::D);
        assert_eq!(accuracy_to_grade(59.9), Grade::F);
        assert_eq!(accuracy_to_grade(0.0), Grade::F);
    }

    #[test]
    fn summary_freezes_the_score_state() {
        let chart = Chart::new("scale", "", 80.0, Tuning::standard(), Vec::new());
        let mut score = ScoreState::new(4);
        score.register(HitQuality::Perfect, 0.0, 0.0, 0.0);
        score.register(HitQuality::Perfect, 0.0, 0.0, 0.5);
        score.register(HitQuality::Good, 0.0, 0.0, 1.0);
        score.register(HitQuality::Miss, 0.0, 0.0, 1.5);

        let summary = summarize(&chart, &score);
        assert_eq!(summary.title, "scale");
        assert_eq!(summary.score, 250);
        assert_eq!(summary.max_combo, 3);
        assert!((summary.accuracy - 75.0).abs() < 1e-9);
        assert_eq!(summary.grade, Grade::C);
    }
}
