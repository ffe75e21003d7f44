pub mod chart;
pub mod exercises;
pub mod gameplay;
pub mod judgment;
pub mod pitch;
pub mod scores;
pub mod scoring;
pub mod tuning;
