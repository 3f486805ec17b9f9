//! Segment lifecycle controller
//!
//! Sequences one checkpoint at a time:
//! awaiting-choice → pre-open → doors-opening → doors-sliding → running → result.
//! Driven only by `advance_time` ticks and the `choose_lane` input, so it runs
//! the same with or without a renderer attached.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::coins::{CoinField, RunStage};
use super::rules::{CheckpointResult, ObstacleLanes, RulesEngine};
use super::timing::PhaseDurations;
use super::track::Track;
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::events::GameEvent;

/// Offset separating the coin stream from the obstacle stream
const COIN_STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Presentation phase of the current segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentPhase {
    /// Constructed, `start` not called yet
    Idle,
    /// Obstacles generated, waiting for the player's lane
    AwaitingChoice,
    /// Short reveal pause after the choice
    PreOpen,
    DoorsOpening,
    DoorsSliding,
    /// Obstacle approaching, then passing the player
    Running,
    /// Result on screen before the next segment
    Result,
    /// Run finished
    Ended,
}

/// Drives one run from the first segment to the end screen
#[derive(Debug, Clone)]
pub struct SegmentController {
    engine: RulesEngine,
    track: Track,
    coin_rng: Pcg32,
    phase: SegmentPhase,
    /// Seconds spent in the current phase
    elapsed: f32,
    durations: PhaseDurations,
    /// Mirror of the engine's pending set for presentation
    obstacle_lanes: ObstacleLanes,
    player_lane: Option<usize>,
    /// Set once the current segment has been scored
    resolved: bool,
    obstacle_z: f32,
    coins: CoinField,
    last_result: Option<CheckpointResult>,
    events: Vec<GameEvent>,
}

impl SegmentController {
    pub fn new(config: GameConfig) -> Result<Self> {
        let engine = RulesEngine::new(config)?;
        let track = Track::new(engine.config().lanes);
        let coin_rng = Pcg32::seed_from_u64(engine.seed().wrapping_add(COIN_STREAM_SALT));
        let durations = PhaseDurations::for_progress(&engine.config().timing, 0.0);
        Ok(Self {
            engine,
            track,
            coin_rng,
            phase: SegmentPhase::Idle,
            elapsed: 0.0,
            durations,
            obstacle_lanes: ObstacleLanes::default(),
            player_lane: None,
            resolved: false,
            obstacle_z: track.obstacle_start_z,
            coins: CoinField::default(),
            last_result: None,
            events: Vec::new(),
        })
    }

    /// Begin the first segment
    pub fn start(&mut self) -> Result<()> {
        match self.phase {
            SegmentPhase::Idle => {
                log::info!(
                    "Run starting: {} lanes, {} checkpoints, seed {}",
                    self.track.lanes,
                    self.engine.config().max_checkpoints,
                    self.engine.seed()
                );
                self.begin_segment();
                Ok(())
            }
            SegmentPhase::Ended => Err(GameError::AlreadyOver),
            phase => Err(GameError::WrongPhase { phase }),
        }
    }

    /// Commit the player's lane for the current segment
    pub fn choose_lane(&mut self, lane: i32) -> Result<()> {
        match self.phase {
            SegmentPhase::AwaitingChoice => {}
            SegmentPhase::Ended => return Err(GameError::AlreadyOver),
            phase => return Err(GameError::WrongPhase { phase }),
        }
        let lane = self.engine.validate_lane(lane)?;
        log::debug!("Lane {} chosen for checkpoint {}", lane, self.engine.state().checkpoint());
        self.player_lane = Some(lane);
        self.set_phase(SegmentPhase::PreOpen);
        Ok(())
    }

    /// Advance by one frame. At most one phase transition happens per call.
    pub fn advance_time(&mut self, delta_seconds: f32) {
        if matches!(self.phase, SegmentPhase::Idle | SegmentPhase::Ended) {
            return;
        }

        let max = self.engine.config().timing.max_tick_delta;
        let dt = if delta_seconds.is_finite() && delta_seconds > 0.0 {
            if delta_seconds > max {
                log::debug!("Clamping tick {:.3}s to {:.3}s", delta_seconds, max);
            }
            delta_seconds.min(max)
        } else {
            if delta_seconds != 0.0 {
                log::warn!("Ignoring invalid tick delta {}", delta_seconds);
            }
            0.0
        };
        self.elapsed += dt;

        match self.phase {
            SegmentPhase::PreOpen => {
                self.advance_after(self.durations.reveal_delay, SegmentPhase::DoorsOpening);
            }
            SegmentPhase::DoorsOpening => {
                self.advance_after(self.durations.door_open, SegmentPhase::DoorsSliding);
            }
            SegmentPhase::DoorsSliding => {
                if self.advance_after(self.durations.door_slide, SegmentPhase::Running) {
                    self.enter_running();
                }
            }
            SegmentPhase::Running => self.update_running(),
            SegmentPhase::Result => {
                if self.elapsed >= self.durations.result_pause {
                    self.begin_segment();
                }
            }
            SegmentPhase::Idle | SegmentPhase::AwaitingChoice | SegmentPhase::Ended => {}
        }
    }

    /// Move to `next` once `duration` has elapsed, carrying the overrun into
    /// the next phase without evaluating it until the following tick
    fn advance_after(&mut self, duration: f32, next: SegmentPhase) -> bool {
        if self.elapsed < duration {
            return false;
        }
        let overrun = self.elapsed - duration;
        self.set_phase(next);
        self.elapsed = overrun;
        true
    }

    fn set_phase(&mut self, next: SegmentPhase) {
        let from = self.phase;
        log::debug!("Phase {:?} -> {:?}", from, next);
        self.phase = next;
        self.elapsed = 0.0;
        self.events.push(GameEvent::PhaseChanged { from, to: next });
    }

    fn begin_segment(&mut self) {
        let Some(lanes) = self.engine.start_segment() else {
            self.finish();
            return;
        };
        let checkpoint = self.engine.state().checkpoint();
        let config = self.engine.config();
        self.durations = PhaseDurations::for_progress(&config.timing, config.progress(checkpoint));

        self.obstacle_lanes = lanes.clone();
        self.player_lane = None;
        self.resolved = false;
        self.obstacle_z = self.track.obstacle_start_z;
        self.coins.clear();

        log::info!("Checkpoint {} ready ({} obstructed)", checkpoint + 1, lanes.len());
        self.events.push(GameEvent::SegmentStarted {
            checkpoint,
            obstacle_lanes: lanes,
        });
        self.set_phase(SegmentPhase::AwaitingChoice);
    }

    fn enter_running(&mut self) {
        self.obstacle_z = self.track.obstacle_start_z;
        let config = self.engine.config();
        if config.coin_prize > 0 {
            let progress = config.progress(self.engine.state().checkpoint());
            self.coins = CoinField::spawn(&mut self.coin_rng, &self.track, progress);
        }
    }

    fn update_running(&mut self) {
        let Some(lane) = self.player_lane else {
            return;
        };
        let run = self.durations.run;
        let stage = if self.elapsed <= run {
            RunStage::Approach(self.elapsed / run)
        } else if self.durations.pass_through > 0.0 {
            RunStage::Pass(((self.elapsed - run) / self.durations.pass_through).min(1.0))
        } else {
            RunStage::Pass(1.0)
        };
        self.obstacle_z = match stage {
            RunStage::Approach(t) => self.track.approach_z(t),
            RunStage::Pass(t) => self.track.pass_z(t),
        };

        // Hit the instant the leading edge crosses an occupied obstructed lane
        if self.obstacle_lanes.contains(lane) && self.track.leading_edge_reached(self.obstacle_z) {
            self.resolve();
            return;
        }

        let collected = self.coins.advance(&self.track, stage, lane);
        let amount = self.engine.config().coin_prize;
        for _ in 0..collected {
            match self.engine.award_bonus(amount) {
                Ok(total) => self.events.push(GameEvent::CoinCollected { lane, amount, total }),
                Err(err) => log::warn!("Coin award rejected: {}", err),
            }
        }

        if matches!(stage, RunStage::Pass(t) if t >= 1.0) {
            self.resolve();
        }
    }

    fn resolve(&mut self) {
        if self.resolved {
            return;
        }
        let Some(lane) = self.player_lane else {
            return;
        };

        // Lane was validated against the lane count, which fits in i32
        let result = match self.engine.resolve_choice(lane as i32) {
            Ok(result) => result,
            Err(err) => {
                // No outcome can be scored for this segment; end rather than stall in Running
                log::warn!("Checkpoint resolution rejected: {}", err);
                self.resolved = true;
                self.coins.clear();
                self.finish();
                return;
            }
        };
        self.resolved = true;
        self.coins.clear();
        self.last_result = Some(result.clone());
        self.events.push(GameEvent::CheckpointResolved(result.clone()));

        if result.safe {
            self.set_phase(SegmentPhase::Result);
        } else {
            self.finish();
        }
    }

    fn finish(&mut self) {
        let summary = self.engine.summary();
        log::info!(
            "Run over after {} checkpoints: prize {} ({:?})",
            summary.checkpoints,
            crate::format_pence(summary.prize),
            summary.end_reason
        );
        self.set_phase(SegmentPhase::Ended);
        self.events.push(GameEvent::GameEnded(summary));
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> SegmentPhase {
        self.phase
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Nominal length of the current phase, `None` for input-driven phases
    pub fn phase_duration(&self) -> Option<f32> {
        match self.phase {
            SegmentPhase::PreOpen => Some(self.durations.reveal_delay),
            SegmentPhase::DoorsOpening => Some(self.durations.door_open),
            SegmentPhase::DoorsSliding => Some(self.durations.door_slide),
            SegmentPhase::Running => Some(self.durations.run + self.durations.pass_through),
            SegmentPhase::Result => Some(self.durations.result_pause),
            SegmentPhase::Idle | SegmentPhase::AwaitingChoice | SegmentPhase::Ended => None,
        }
    }

    /// Fraction of the current timed phase completed, for door animations
    pub fn phase_progress(&self) -> f32 {
        match self.phase_duration() {
            Some(d) if d > 0.0 => (self.elapsed / d).min(1.0),
            Some(_) => 1.0,
            None => 0.0,
        }
    }

    pub fn durations(&self) -> &PhaseDurations {
        &self.durations
    }

    pub fn obstacle_lanes(&self) -> &ObstacleLanes {
        &self.obstacle_lanes
    }

    pub fn player_lane(&self) -> Option<usize> {
        self.player_lane
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Current obstacle depth along the track
    pub fn obstacle_z(&self) -> f32 {
        self.obstacle_z
    }

    /// World position of every obstacle in the current segment
    pub fn obstacle_positions(&self) -> Vec<Vec3> {
        self.obstacle_lanes
            .iter()
            .map(|lane| self.track.position(lane, self.obstacle_z))
            .collect()
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn coins(&self) -> &CoinField {
        &self.coins
    }

    pub fn last_result(&self) -> Option<&CheckpointResult> {
        self.last_result.as_ref()
    }

    pub fn engine(&self) -> &RulesEngine {
        &self.engine
    }
}
