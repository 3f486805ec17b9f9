//! Rules engine: obstacle placement, safety and scoring
//!
//! Pure decision logic with no notion of time. The engine owns the only
//! mutable copy of [`GameState`]; everything else reads it.

use rand::SeedableRng;
use rand::{Rng, seq::index};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::{GameError, Result};

/// Distinct obstructed lanes for one segment, kept sorted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObstacleLanes(Vec<usize>);

impl ObstacleLanes {
    pub fn new(mut lanes: Vec<usize>) -> Self {
        lanes.sort_unstable();
        lanes.dedup();
        Self(lanes)
    }

    pub fn contains(&self, lane: usize) -> bool {
        self.0.binary_search(&lane).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

/// Outcome of one resolved checkpoint. Never mutated once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointResult {
    /// Checkpoint index (0-based)
    pub index: u32,
    pub chosen_lane: usize,
    pub obstacle_lanes: ObstacleLanes,
    pub safe: bool,
    /// Prize awarded by this checkpoint (pence)
    pub prize_delta: u64,
    /// Cumulative prize after this checkpoint, coin bonus included
    pub total_prize: u64,
    /// True when this resolution ended the game
    pub ended: bool,
}

/// Why a run finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Every checkpoint was cleared
    Cleared,
    /// The player ran into an obstacle
    Hit,
}

/// End-of-run view for the summary screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub prize: u64,
    pub coin_bonus: u64,
    pub checkpoints: u32,
    pub max_checkpoints: u32,
    pub safe_count: usize,
    pub hit_count: usize,
    pub end_reason: Option<EndReason>,
    pub history: Vec<CheckpointResult>,
}

/// Authoritative run state, mutated only through [`RulesEngine`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameState {
    checkpoint: u32,
    prize: u64,
    coin_bonus: u64,
    history: Vec<CheckpointResult>,
    over: bool,
    end_reason: Option<EndReason>,
    pending: Option<ObstacleLanes>,
}

impl GameState {
    /// Index of the next checkpoint to be resolved
    pub fn checkpoint(&self) -> u32 {
        self.checkpoint
    }

    /// Cumulative prize in pence
    pub fn prize(&self) -> u64 {
        self.prize
    }

    /// Portion of the prize that came from coins
    pub fn coin_bonus(&self) -> u64 {
        self.coin_bonus
    }

    pub fn history(&self) -> &[CheckpointResult] {
        &self.history
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// Obstacles generated for the segment awaiting resolution
    pub fn pending(&self) -> Option<&ObstacleLanes> {
        self.pending.as_ref()
    }
}

/// Decides obstacles and scores choices for a single run
#[derive(Debug, Clone)]
pub struct RulesEngine {
    config: GameConfig,
    seed: u64,
    rng: Pcg32,
    state: GameState,
}

impl RulesEngine {
    /// Build an engine for a fresh run
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        log::debug!("Rules engine seeded with {}", seed);
        Ok(Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            state: GameState::default(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed actually in use (drawn at construction when none was configured)
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.over
    }

    /// How many lanes are obstructed at `checkpoint`
    pub fn obstacle_count(&self, checkpoint: u32) -> usize {
        if checkpoint < self.config.ramp_checkpoint {
            1
        } else {
            2.min(self.config.lanes - 1)
        }
    }

    /// Generate the obstacle set for the upcoming checkpoint.
    ///
    /// Returns `None` once the game is over. A segment that is already pending
    /// keeps its obstacles; calling again does not re-roll them.
    pub fn start_segment(&mut self) -> Option<ObstacleLanes> {
        if self.state.over {
            log::debug!("start_segment ignored: game over");
            return None;
        }
        if let Some(pending) = &self.state.pending {
            return Some(pending.clone());
        }

        let checkpoint = self.state.checkpoint;
        let has_obstacle = self.config.obstacle_probability >= 1.0
            || self.rng.random_bool(self.config.obstacle_probability);
        let lanes = if has_obstacle {
            let count = self.obstacle_count(checkpoint);
            ObstacleLanes::new(index::sample(&mut self.rng, self.config.lanes, count).into_vec())
        } else {
            ObstacleLanes::default()
        };

        log::debug!("Checkpoint {} obstacles: {:?}", checkpoint, lanes.as_slice());
        self.state.pending = Some(lanes.clone());
        Some(lanes)
    }

    /// Map an external lane index into `0..lanes`
    pub fn validate_lane(&self, lane: i32) -> Result<usize> {
        usize::try_from(lane)
            .ok()
            .filter(|&l| l < self.config.lanes)
            .ok_or(GameError::InvalidLane {
                lane: i64::from(lane),
                lane_count: self.config.lanes,
            })
    }

    /// Score the player's lane against the pending obstacles.
    ///
    /// A hit ends the run without deducting anything already won.
    pub fn resolve_choice(&mut self, lane: i32) -> Result<CheckpointResult> {
        if self.state.over {
            return Err(GameError::AlreadyOver);
        }
        let chosen_lane = self.validate_lane(lane)?;
        let obstacle_lanes = self.state.pending.take().ok_or(GameError::NoPendingSegment)?;

        let safe = !obstacle_lanes.contains(chosen_lane);
        let prize_delta = if safe { self.config.checkpoint_prize } else { 0 };
        self.state.prize = self.state.prize.saturating_add(prize_delta);

        let index = self.state.checkpoint;
        self.state.checkpoint += 1;

        if !safe {
            self.state.over = true;
            self.state.end_reason = Some(EndReason::Hit);
        } else if self.state.checkpoint >= self.config.max_checkpoints {
            self.state.over = true;
            self.state.end_reason = Some(EndReason::Cleared);
        }

        let result = CheckpointResult {
            index,
            chosen_lane,
            obstacle_lanes,
            safe,
            prize_delta,
            total_prize: self.state.prize,
            ended: self.state.over,
        };
        log::info!(
            "Checkpoint {} lane {} -> {} (total {})",
            index,
            chosen_lane,
            if safe { "SAFE" } else { "HIT" },
            self.state.prize
        );
        self.state.history.push(result.clone());
        Ok(result)
    }

    /// Add a secondary reward (coin pickup) to the cumulative prize
    pub fn award_bonus(&mut self, amount: u64) -> Result<u64> {
        if self.state.over {
            return Err(GameError::AlreadyOver);
        }
        self.state.prize = self.state.prize.saturating_add(amount);
        self.state.coin_bonus = self.state.coin_bonus.saturating_add(amount);
        Ok(self.state.prize)
    }

    pub fn summary(&self) -> GameSummary {
        let safe_count = self.state.history.iter().filter(|r| r.safe).count();
        GameSummary {
            prize: self.state.prize,
            coin_bonus: self.state.coin_bonus,
            checkpoints: self.state.checkpoint,
            max_checkpoints: self.config.max_checkpoints,
            safe_count,
            hit_count: self.state.history.len() - safe_count,
            end_reason: self.state.end_reason,
            history: self.state.history.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(seed: u64) -> RulesEngine {
        RulesEngine::new(GameConfig::seeded(seed)).unwrap()
    }

    /// First lane not in the pending set
    fn safe_lane(lanes: &ObstacleLanes, lane_count: usize) -> i32 {
        (0..lane_count).find(|&l| !lanes.contains(l)).unwrap() as i32
    }

    #[test]
    fn test_obstacle_count_ramps_at_threshold() {
        let mut engine = engine(1);
        for checkpoint in 0..20 {
            let lanes = engine.start_segment().unwrap();
            let expected = if checkpoint < 10 { 1 } else { 2 };
            assert_eq!(lanes.len(), expected, "checkpoint {checkpoint}");
            engine.resolve_choice(safe_lane(&lanes, 3)).unwrap();
        }
        assert!(engine.is_over());
        assert_eq!(engine.state().end_reason(), Some(EndReason::Cleared));
    }

    #[test]
    fn test_two_lanes_never_fully_blocked() {
        let config = GameConfig {
            lanes: 2,
            ramp_checkpoint: 0,
            seed: Some(5),
            ..GameConfig::default()
        };
        let mut engine = RulesEngine::new(config).unwrap();
        let lanes = engine.start_segment().unwrap();
        assert_eq!(lanes.len(), 1);
    }

    #[test]
    fn test_hit_ends_game_without_deduction() {
        let mut engine = engine(2);
        let lanes = engine.start_segment().unwrap();
        engine.resolve_choice(safe_lane(&lanes, 3)).unwrap();
        assert_eq!(engine.state().prize(), 25);

        let lanes = engine.start_segment().unwrap();
        let hit_lane = lanes.as_slice()[0] as i32;
        let result = engine.resolve_choice(hit_lane).unwrap();
        assert!(!result.safe);
        assert!(result.ended);
        assert_eq!(result.prize_delta, 0);
        assert_eq!(result.total_prize, 25);
        assert!(engine.is_over());
        assert_eq!(engine.state().end_reason(), Some(EndReason::Hit));
    }

    #[test]
    fn test_start_segment_after_over_is_noop() {
        let mut engine = engine(3);
        let lanes = engine.start_segment().unwrap();
        engine.resolve_choice(lanes.as_slice()[0] as i32).unwrap();
        assert!(engine.start_segment().is_none());
        assert!(engine.state().pending().is_none());
        assert!(matches!(engine.resolve_choice(0), Err(GameError::AlreadyOver)));
        assert!(matches!(engine.award_bonus(10), Err(GameError::AlreadyOver)));
        assert_eq!(engine.state().history().len(), 1);
    }

    #[test]
    fn test_repeated_start_keeps_pending() {
        let mut engine = engine(4);
        let first = engine.start_segment().unwrap();
        for _ in 0..5 {
            assert_eq!(engine.start_segment().unwrap(), first);
        }
    }

    #[test]
    fn test_resolve_without_segment() {
        let mut engine = engine(5);
        assert!(matches!(engine.resolve_choice(0), Err(GameError::NoPendingSegment)));
        assert_eq!(engine.state().checkpoint(), 0);
    }

    #[test]
    fn test_invalid_lane_leaves_state() {
        let mut engine = engine(6);
        let lanes = engine.start_segment().unwrap();
        for lane in [-1, 3, i32::MIN, i32::MAX] {
            let err = engine.resolve_choice(lane).unwrap_err();
            assert!(matches!(err, GameError::InvalidLane { lane_count: 3, .. }));
        }
        assert_eq!(engine.state().checkpoint(), 0);
        assert_eq!(engine.state().pending(), Some(&lanes));
    }

    #[test]
    fn test_zero_probability_means_no_obstacles() {
        let config = GameConfig {
            obstacle_probability: 0.0,
            seed: Some(9),
            ..GameConfig::default()
        };
        let mut engine = RulesEngine::new(config).unwrap();
        let lanes = engine.start_segment().unwrap();
        assert!(lanes.is_empty());
        assert!(engine.resolve_choice(0).unwrap().safe);
    }

    #[test]
    fn test_bonus_joins_total() {
        let mut engine = engine(7);
        engine.award_bonus(10).unwrap();
        let lanes = engine.start_segment().unwrap();
        let result = engine.resolve_choice(safe_lane(&lanes, 3)).unwrap();
        assert_eq!(result.prize_delta, 25);
        assert_eq!(result.total_prize, 35);
        let summary = engine.summary();
        assert_eq!(summary.prize, 35);
        assert_eq!(summary.coin_bonus, 10);
        assert_eq!(summary.safe_count, 1);
        assert_eq!(summary.hit_count, 0);
    }

    #[test]
    fn test_huge_prizes_saturate() {
        let config = GameConfig {
            checkpoint_prize: u64::MAX,
            seed: Some(8),
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());
        let mut engine = RulesEngine::new(config).unwrap();
        for _ in 0..2 {
            let lanes = engine.start_segment().unwrap();
            let result = engine.resolve_choice(safe_lane(&lanes, 3)).unwrap();
            assert_eq!(result.prize_delta, u64::MAX);
        }
        assert_eq!(engine.state().prize(), u64::MAX);
        assert_eq!(engine.award_bonus(u64::MAX).unwrap(), u64::MAX);
        assert_eq!(engine.award_bonus(1).unwrap(), u64::MAX);
        assert_eq!(engine.state().coin_bonus(), u64::MAX);
    }

    #[test]
    fn test_determinism() {
        let mut a = engine(99999);
        let mut b = engine(99999);
        for _ in 0..20 {
            assert_eq!(a.start_segment(), b.start_segment());
            let lanes = a.state().pending().cloned().unwrap();
            let lane = safe_lane(&lanes, 3);
            assert_eq!(a.resolve_choice(lane).unwrap(), b.resolve_choice(lane).unwrap());
        }
    }
}
