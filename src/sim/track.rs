//! Track geometry
//!
//! Lanes run along z toward the player. Obstacles and coins approach on a
//! straight line so their position is a pure function of phase time.

use glam::Vec3;

use crate::consts::*;
use crate::lerp;

/// Fixed layout of the lanes and the approach path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub lanes: usize,
    pub lane_spacing: f32,
    pub obstacle_start_z: f32,
    pub player_z: f32,
    pub past_z: f32,
    pub obstacle_half_depth: f32,
}

impl Track {
    pub fn new(lanes: usize) -> Self {
        Self {
            lanes,
            lane_spacing: LANE_SPACING,
            obstacle_start_z: OBSTACLE_START_Z,
            player_z: PLAYER_Z,
            past_z: OBSTACLE_PAST_Z,
            obstacle_half_depth: OBSTACLE_HALF_DEPTH,
        }
    }

    /// Lateral position of a lane, centered on x = 0 (3 lanes: -2, 0, 2)
    pub fn lane_x(&self, lane: usize) -> f32 {
        let center = (self.lanes as f32 - 1.0) / 2.0;
        (lane as f32 - center) * self.lane_spacing
    }

    /// Obstacle center z while approaching, `t` in [0, 1]
    pub fn approach_z(&self, t: f32) -> f32 {
        lerp(self.obstacle_start_z, self.player_z, t)
    }

    /// Obstacle center z while passing the player, `t` in [0, 1]
    pub fn pass_z(&self, t: f32) -> f32 {
        lerp(self.player_z, self.past_z, t)
    }

    /// World position of something in `lane` at depth `z`
    pub fn position(&self, lane: usize, z: f32) -> Vec3 {
        Vec3::new(self.lane_x(lane), 0.0, z)
    }

    /// True once the obstacle's leading edge has reached the player plane
    pub fn leading_edge_reached(&self, obstacle_z: f32) -> bool {
        obstacle_z + self.obstacle_half_depth >= self.player_z
    }
}
