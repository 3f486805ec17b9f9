//! Lane Runner - segment lifecycle core for a lane-picking arcade run
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rules engine, segment controller, track, coins)
//! - `config`: Validated game and timing configuration
//! - `session`: Owned per-run session with listener fan-out
//! - `events`: Lifecycle notifications for presentation collaborators
//! - `cues`: Sound cue mapping for audio collaborators

pub mod config;
pub mod cues;
pub mod error;
pub mod events;
pub mod session;
pub mod sim;

pub use config::{GameConfig, TimingConfig};
pub use error::{GameError, Result};
pub use events::{GameEvent, SessionListener};
pub use session::GameSession;

/// Game configuration constants
pub mod consts {
    /// Default number of lanes
    pub const DEFAULT_LANES: usize = 3;
    /// Default number of checkpoints in a run
    pub const DEFAULT_MAX_CHECKPOINTS: u32 = 20;
    /// Checkpoint index from which two lanes are obstructed
    pub const DEFAULT_RAMP_CHECKPOINT: u32 = 10;
    /// Prize for a cleared checkpoint (pence)
    pub const DEFAULT_CHECKPOINT_PRIZE: u64 = 25;
    /// Prize for a collected coin (pence)
    pub const DEFAULT_COIN_PRIZE: u64 = 10;

    /// Phase timings (seconds)
    pub const REVEAL_DELAY: f32 = 0.5;
    pub const DOOR_OPEN_DURATION: f32 = 0.9;
    pub const DOOR_SLIDE_DURATION: f32 = 0.6;
    pub const RUN_DURATION: f32 = 3.5;
    pub const PASS_DURATION: f32 = 1.5;
    pub const RESULT_PAUSE: f32 = 1.0;

    /// Clamp for oversized frame deltas (tab suspend, debugger pause)
    pub const MAX_TICK_DELTA: f32 = 0.5;

    /// Track layout (world units, player runs toward +z)
    pub const LANE_SPACING: f32 = 2.0;
    pub const OBSTACLE_START_Z: f32 = -55.0;
    pub const PLAYER_Z: f32 = 2.0;
    pub const OBSTACLE_PAST_Z: f32 = 20.0;
    /// Half the obstacle depth; the leading edge sits this far ahead of its center
    pub const OBSTACLE_HALF_DEPTH: f32 = 0.5;
    /// Coins are collected when within this distance of the player plane
    pub const COIN_PICKUP_RANGE: f32 = 0.5;
}

/// Linear interpolation between `a` and `b`, `t` clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Format a pence amount as pounds, e.g. `£1.35`
pub fn format_pence(pence: u64) -> String {
    format!("£{}.{:02}", pence / 100, pence % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_clamps() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, -1.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 2.0), 10.0);
    }

    #[test]
    fn test_format_pence() {
        assert_eq!(format_pence(0), "£0.00");
        assert_eq!(format_pence(135), "£1.35");
        assert_eq!(format_pence(2500), "£25.00");
    }
}
