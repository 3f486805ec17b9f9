//! Coin pickups ridden along with the obstacle run
//!
//! Coins are a secondary reward: the field only reports which coins were
//! collected, the rules engine owns the prize.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::track::Track;
use crate::consts::COIN_PICKUP_RANGE;

/// Fewest coins a full run can spawn per segment at zero progress
const BASE_MAX_COINS: u32 = 10;
/// Extra coin capacity added at full progress
const EXTRA_MAX_COINS: u32 = 6;
/// Coins are placed within this fraction of the approach
const OFFSET_SPAN: f32 = 0.85;
/// How far behind the obstacle curve the earliest coin lags
const LAG_SPAN: f32 = 0.05;

/// Where the run is along its two stages
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunStage {
    /// Approach fraction in [0, 1]
    Approach(f32),
    /// Pass-through fraction in [0, 1]
    Pass(f32),
}

/// A single coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub lane: usize,
    /// Spacing offset within its lane, in (0, 0.85]
    pub offset: f32,
    /// Current depth along the track
    pub z: f32,
    pub taken: bool,
}

impl Coin {
    fn z_at(&self, track: &Track, stage: RunStage) -> f32 {
        match stage {
            RunStage::Approach(t) => {
                let lag = (1.0 - self.offset) * LAG_SPAN;
                let t_coin = ((t - lag).max(0.0) / (1.0 - lag)).min(1.0);
                track.approach_z(t_coin)
            }
            RunStage::Pass(t) => track.pass_z(t),
        }
    }
}

/// Coins for the current segment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoinField {
    coins: Vec<Coin>,
}

impl CoinField {
    /// Scatter coins across lanes; more coins become possible as `progress` grows
    pub fn spawn<R: Rng>(rng: &mut R, track: &Track, progress: f32) -> Self {
        let max = BASE_MAX_COINS + (progress.clamp(0.0, 1.0) * EXTRA_MAX_COINS as f32).floor() as u32;
        let total = rng.random_range(1..=max);

        let mut per_lane = vec![0u32; track.lanes];
        for _ in 0..total {
            per_lane[rng.random_range(0..track.lanes)] += 1;
        }

        let mut coins = Vec::with_capacity(total as usize);
        for (lane, &count) in per_lane.iter().enumerate() {
            for i in 0..count {
                let offset = (i + 1) as f32 / (count + 1) as f32 * OFFSET_SPAN;
                let mut coin = Coin {
                    lane,
                    offset,
                    z: 0.0,
                    taken: false,
                };
                coin.z = coin.z_at(track, RunStage::Approach(0.0));
                coins.push(coin);
            }
        }
        log::debug!("Spawned {} coins (max {})", coins.len(), max);
        Self { coins }
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Coins still on the track
    pub fn remaining(&self) -> usize {
        self.coins.iter().filter(|c| !c.taken).count()
    }

    pub fn clear(&mut self) {
        self.coins.clear();
    }

    /// Move coins to `stage` and collect those that swept through the player
    /// plane in `player_lane`. Returns how many were collected this step.
    pub fn advance(&mut self, track: &Track, stage: RunStage, player_lane: usize) -> u32 {
        let lo = track.player_z - COIN_PICKUP_RANGE;
        let hi = track.player_z + COIN_PICKUP_RANGE;
        let mut collected = 0;
        for coin in self.coins.iter_mut().filter(|c| !c.taken) {
            let prev = coin.z;
            coin.z = coin.z_at(track, stage);
            // Swept test so a long frame cannot jump a coin over the player
            let (from, to) = if prev <= coin.z { (prev, coin.z) } else { (coin.z, prev) };
            if coin.lane == player_lane && from <= hi && to >= lo {
                coin.taken = true;
                collected += 1;
            }
        }
        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_counts_within_bounds() {
        let track = Track::new(3);
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..50 {
            let field = CoinField::spawn(&mut rng, &track, 0.0);
            assert!((1..=10).contains(&field.coins().len()));
            let field = CoinField::spawn(&mut rng, &track, 1.0);
            assert!((1..=16).contains(&field.coins().len()));
            assert!(field.coins().iter().all(|c| c.lane < 3 && c.offset > 0.0 && c.offset <= 0.85));
        }
    }

    #[test]
    fn test_only_player_lane_collected() {
        let track = Track::new(3);
        let mut field = CoinField {
            coins: vec![
                Coin {
                    lane: 0,
                    offset: 0.5,
                    z: track.obstacle_start_z,
                    taken: false,
                },
                Coin {
                    lane: 1,
                    offset: 0.5,
                    z: track.obstacle_start_z,
                    taken: false,
                },
                Coin {
                    lane: 1,
                    offset: 0.85,
                    z: track.obstacle_start_z,
                    taken: false,
                },
            ],
        };
        assert_eq!(field.advance(&track, RunStage::Approach(0.5), 1), 0);
        assert_eq!(field.advance(&track, RunStage::Approach(1.0), 1), 2);
        assert_eq!(field.remaining(), 1);
        // Already taken coins are never counted again
        assert_eq!(field.advance(&track, RunStage::Pass(1.0), 1), 0);
    }

    #[test]
    fn test_single_long_step_still_collects() {
        let track = Track::new(3);
        let mut field = CoinField {
            coins: vec![Coin {
                lane: 2,
                offset: 0.3,
                z: track.obstacle_start_z,
                taken: false,
            }],
        };
        // Jump straight from the start to well past the player
        assert_eq!(field.advance(&track, RunStage::Pass(1.0), 2), 1);
    }
}
