//! The seam between the external microphone/pitch-estimation pipeline and
//! the judging core. The estimator publishes its most recent result into a
//! single-slot mailbox; the frame loop reads it back any number of times.
//! Intermediate samples are intentionally dropped; stale-sample tolerance
//! comes from the scanner's time windows, never from buffering.

use std::sync::{Arc, Mutex};

/// Samples below this confidence never trigger a hit.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// One confidence-scored fundamental-frequency estimate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PitchSample {
    /// Estimated fundamental in Hz.
    pub frequency: f64,
    /// Estimator confidence, 0..1.
    pub confidence: f64,
    /// Input signal level, 0..1.
    pub rms_level: f64,
}

impl PitchSample {
    /// The "nothing detected" sample the mailbox starts out holding.
    pub fn silence() -> PitchSample {
        PitchSample { frequency: 0.0, confidence: 0.0, rms_level: 0.0 }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_with(DEFAULT_CONFIDENCE_THRESHOLD)
    }

    /// Valid for judging: finite positive frequency and confidence strictly
    /// above the threshold. Out-of-range numeric input is treated as an
    /// invalid sample rather than an error.
    pub fn is_valid_with(&self, confidence_threshold: f64) -> bool {
        self.frequency.is_finite()
            && self.frequency > 0.0
            && self.confidence > confidence_threshold
    }
}

impl Default for PitchSample {
    fn default() -> Self {
        PitchSample::silence()
    }
}

/// Anything that can hand the frame loop the most recent pitch estimate.
/// Repeated calls within a frame return the same value until the producer
/// publishes a newer one.
pub trait PitchSource {
    fn latest_sample(&self) -> PitchSample;
}

/// The consumer end of the single-slot mailbox.
#[derive(Clone)]
pub struct PitchFeed {
    slot: Arc<Mutex<PitchSample>>,
}

/// The producer end, handed to the capture/estimation thread. Publishing
/// overwrites whatever was in the slot.
#[derive(Clone)]
pub struct PitchPublisher {
    slot: Arc<Mutex<PitchSample>>,
}

impl PitchFeed {
    pub fn new() -> PitchFeed {
        PitchFeed {
            slot: Arc::new(Mutex::new(PitchSample::silence())),
        }
    }

    pub fn publisher(&self) -> PitchPublisher {
        PitchPublisher { slot: Arc::clone(&self.slot) }
    }
}

impl Default for PitchFeed {
    fn default() -> Self {
        PitchFeed::new()
    }
}

impl PitchSource for PitchFeed {
    fn latest_sample(&self) -> PitchSample {
        match self.slot.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl PitchPublisher {
    pub fn publish(&self, sample: PitchSample) {
        match self.slot.lock() {
            Ok(mut guard) => *guard = sample,
            Err(poisoned) => *poisoned.into_inner() = sample,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_thresholds() {
        let strong = PitchSample { frequency: 110.0, confidence: 0.9, rms_level: 0.4 };
        let weak = PitchSample { frequency: 110.0, confidence: 0.3, rms_level: 0.4 };
        let boundary = PitchSample { frequency: 110.0, confidence: 0.5, rms_level: 0.4 };
        assert!(strong.is_valid());
        assert!(!weak.is_valid());
        // Exactly at the threshold is not enough.
        assert!(!boundary.is_valid());
        assert!(!PitchSample::silence().is_valid());
    }

    #[test]
    fn bad_numerics_are_invalid() {
        let nan = PitchSample { frequency: f64::NAN, confidence: 0.9, rms_level: 0.4 };
        let negative = PitchSample { frequency: -42.0, confidence: 0.9, rms_level: 0.4 };
        assert!(!nan.is_valid());
        assert!(!negative.is_valid());
    }

    #[test]
    fn mailbox_keeps_only_the_latest_sample() {
        let feed = PitchFeed::new();
        let publisher = feed.publisher();
        assert_eq!(feed.latest_sample(), PitchSample::silence());

        publisher.publish(PitchSample { frequency: 41.2, confidence: 0.8, rms_level: 0.5 });
        publisher.publish(PitchSample { frequency: 55.0, confidence: 0.9, rms_level: 0.5 });
        let latest = feed.latest_sample();
        assert_eq!(latest.frequency, 55.0);
        // Reads are idempotent until the next publish.
        assert_eq!(feed.latest_sample(), latest);
    }

    #[test]
    fn mailbox_crosses_threads() {
        let feed = PitchFeed::new();
        let publisher = feed.publisher();
        let handle = std::thread::spawn(move || {
            publisher.publish(PitchSample { frequency: 98.0, confidence: 0.9, rms_level: 0.5 });
        });
        handle.join().unwrap();
        assert_eq!(feed.latest_sample().frequency, 98.0);
    }
}
