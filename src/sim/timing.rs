//! Per-segment phase durations
//!
//! Difficulty ramps continuously with run progress so timings never jump
//! between consecutive segments.

use serde::{Deserialize, Serialize};

use crate::config::TimingConfig;

/// Durations (seconds) in effect for one segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub reveal_delay: f32,
    pub door_open: f32,
    pub door_slide: f32,
    pub run: f32,
    pub pass_through: f32,
    pub result_pause: f32,
}

impl PhaseDurations {
    /// Ramp base timings by `progress` in [0, 1].
    ///
    /// Run time loses up to `run_shrink` of its base, door phases up to
    /// `door_shrink`; neither goes below `min_duration`.
    pub fn for_progress(timing: &TimingConfig, progress: f32) -> Self {
        let p = progress.clamp(0.0, 1.0);
        let floor = timing.min_duration;
        let shrink = |base: f32, fraction: f32| (base * (1.0 - fraction * p)).max(floor.min(base));
        Self {
            reveal_delay: timing.reveal_delay,
            door_open: shrink(timing.door_open, timing.door_shrink),
            door_slide: shrink(timing.door_slide, timing.door_shrink),
            run: shrink(timing.run, timing.run_shrink),
            pass_through: timing.pass_through,
            result_pause: timing.result_pause,
        }
    }
}
