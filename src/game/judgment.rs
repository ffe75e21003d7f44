use serde::{Deserialize, Serialize};

/// How well a note was hit, ordered worst to best.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HitQuality {
    Miss,
    Ok,
    Good,
    Perfect,
}

impl HitQuality {
    pub fn base_points(self) -> u64 {
        match self {
            HitQuality::Perfect => 100,
            HitQuality::Good => 50,
            HitQuality::Ok => 25,
            HitQuality::Miss => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HitQuality::Perfect => "Perfect!",
            HitQuality::Good => "Good",
            HitQuality::Ok => "OK",
            HitQuality::Miss => "Miss",
        }
    }

    pub fn is_hit(self) -> bool {
        self != HitQuality::Miss
    }
}

/// Timing windows in seconds, tightest to widest: an absolute offset at or
/// inside `perfect` grades Perfect, and so on outward. `miss` bounds the
/// judging window itself; past it an unhit note is forcibly resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimingWindows {
    pub perfect: f64,
    pub good: f64,
    pub ok: f64,
    pub miss: f64,
}

impl Default for TimingWindows {
    fn default() -> Self {
        TimingWindows {
            perfect: 0.050,
            good: 0.100,
            ok: 0.150,
            miss: 0.300,
        }
    }
}

impl TimingWindows {
    /// Grades an absolute time offset. Boundary values resolve to the
    /// tighter (better) tier; inputs past the OK window grade Miss.
    pub fn classify(&self, abs_offset: f64) -> HitQuality {
        if abs_offset <= self.perfect {
            HitQuality::Perfect
        } else if abs_offset <= self.good {
            HitQuality::Good
        } else if abs_offset <= self.ok {
            HitQuality::Ok
        } else {
            HitQuality::Miss
        }
    }
}
