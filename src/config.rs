//! Game configuration
//!
//! Immutable once a session is built. Every field has a default so partial
//! JSON documents (e.g. `{"seed": 7}`) are accepted.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};

/// Phase durations and difficulty ramp shape (seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Pause after the choice before the doors start opening
    pub reveal_delay: f32,
    /// Door rotation
    pub door_open: f32,
    /// Door slide-out after opening
    pub door_slide: f32,
    /// Obstacle travel time until it reaches the player plane
    pub run: f32,
    /// Extra travel past the player before a safe checkpoint resolves
    pub pass_through: f32,
    /// How long the result stays up before the next segment
    pub result_pause: f32,
    /// Largest delta a single tick may apply
    pub max_tick_delta: f32,
    /// Fraction of `run` removed at full progress
    pub run_shrink: f32,
    /// Fraction of door timings removed at full progress
    pub door_shrink: f32,
    /// Floor for any ramped duration
    pub min_duration: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reveal_delay: REVEAL_DELAY,
            door_open: DOOR_OPEN_DURATION,
            door_slide: DOOR_SLIDE_DURATION,
            run: RUN_DURATION,
            pass_through: PASS_DURATION,
            result_pause: RESULT_PAUSE,
            max_tick_delta: MAX_TICK_DELTA,
            run_shrink: 0.4,
            door_shrink: 0.3,
            min_duration: 0.05,
        }
    }
}

impl TimingConfig {
    fn validate(&self) -> Result<()> {
        let durations = [
            ("reveal_delay", self.reveal_delay),
            ("door_open", self.door_open),
            ("door_slide", self.door_slide),
            ("run", self.run),
            ("pass_through", self.pass_through),
            ("result_pause", self.result_pause),
            ("min_duration", self.min_duration),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(GameError::InvalidConfig(format!(
                    "{name} must be a finite, non-negative duration"
                )));
            }
        }
        // The run must be long enough for the leading edge to be meaningful
        if self.run <= 0.0 || self.min_duration <= 0.0 {
            return Err(GameError::InvalidConfig(
                "run and min_duration must be positive".to_string(),
            ));
        }
        if !self.max_tick_delta.is_finite() || self.max_tick_delta <= 0.0 {
            return Err(GameError::InvalidConfig(
                "max_tick_delta must be positive".to_string(),
            ));
        }
        for (name, value) in [("run_shrink", self.run_shrink), ("door_shrink", self.door_shrink)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GameError::InvalidConfig(format!("{name} must be within 0..=1")));
            }
        }
        Ok(())
    }
}

/// Rules and timing for one play-through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of lanes (at least 2)
    pub lanes: usize,
    /// Checkpoints in a full run
    pub max_checkpoints: u32,
    /// Chance that a checkpoint carries obstacles at all
    pub obstacle_probability: f64,
    /// Checkpoint index from which two lanes are obstructed
    pub ramp_checkpoint: u32,
    /// Prize per cleared checkpoint (pence)
    pub checkpoint_prize: u64,
    /// Prize per collected coin (pence); zero disables coins
    pub coin_prize: u64,
    /// Seed for a replayable run; `None` draws one at construction
    pub seed: Option<u64>,
    pub timing: TimingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lanes: DEFAULT_LANES,
            max_checkpoints: DEFAULT_MAX_CHECKPOINTS,
            obstacle_probability: 1.0,
            ramp_checkpoint: DEFAULT_RAMP_CHECKPOINT,
            checkpoint_prize: DEFAULT_CHECKPOINT_PRIZE,
            coin_prize: DEFAULT_COIN_PRIZE,
            seed: None,
            timing: TimingConfig::default(),
        }
    }
}

impl GameConfig {
    /// Default configuration with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every field is within range
    pub fn validate(&self) -> Result<()> {
        if self.lanes < 2 {
            return Err(GameError::InvalidConfig("lanes must be at least 2".to_string()));
        }
        if i32::try_from(self.lanes).is_err() {
            return Err(GameError::InvalidConfig("lanes is too large".to_string()));
        }
        if self.max_checkpoints == 0 {
            return Err(GameError::InvalidConfig(
                "max_checkpoints must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.obstacle_probability) {
            return Err(GameError::InvalidConfig(
                "obstacle_probability must be within 0..=1".to_string(),
            ));
        }
        self.timing.validate()
    }

    /// Fraction of the run completed at `checkpoint`, clamped to [0, 1]
    pub fn progress(&self, checkpoint: u32) -> f32 {
        (checkpoint as f32 / self.max_checkpoints as f32).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{"seed": 7, "timing": {"run": 2.0}}"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.lanes, DEFAULT_LANES);
        assert_eq!(config.timing.run, 2.0);
        assert_eq!(config.timing.door_open, DOOR_OPEN_DURATION);
    }

    #[test]
    fn test_rejects_single_lane() {
        let err = GameConfig::from_json(r#"{"lanes": 1}"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_bad_probability_and_timing() {
        let config = GameConfig {
            obstacle_probability: 1.5,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.timing.max_tick_delta = 0.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.timing.door_slide = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = GameConfig::from_json("{lanes: 3").unwrap_err();
        assert!(matches!(err, GameError::ConfigParse(_)));
    }

    #[test]
    fn test_progress_clamped() {
        let config = GameConfig::default();
        assert_eq!(config.progress(0), 0.0);
        assert_eq!(config.progress(10), 0.5);
        assert_eq!(config.progress(40), 1.0);
    }
}
