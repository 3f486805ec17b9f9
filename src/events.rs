//! Lifecycle notifications for presentation, UI and audio collaborators

use serde::{Deserialize, Serialize};

use crate::sim::{CheckpointResult, GameSummary, ObstacleLanes, SegmentPhase};

/// Something observable happened in the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new checkpoint is waiting for a lane choice
    SegmentStarted {
        checkpoint: u32,
        obstacle_lanes: ObstacleLanes,
    },
    PhaseChanged {
        from: SegmentPhase,
        to: SegmentPhase,
    },
    /// A coin was picked up; `total` is the cumulative prize afterwards
    CoinCollected { lane: usize, amount: u64, total: u64 },
    CheckpointResolved(CheckpointResult),
    GameEnded(GameSummary),
}

/// Observer registered on a [`crate::GameSession`]
pub trait SessionListener {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> SessionListener for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}
