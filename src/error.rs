//! Error types for the lane runner core
//!
//! Every error is local and recoverable: the rejected call leaves state untouched.

use thiserror::Error;

use crate::sim::SegmentPhase;

/// Errors surfaced by the rules engine, controller and configuration loader
#[derive(Debug, Error)]
pub enum GameError {
    #[error("lane {lane} is outside 0..{lane_count}")]
    InvalidLane { lane: i64, lane_count: usize },
    #[error("input not accepted during the {phase:?} phase")]
    WrongPhase { phase: SegmentPhase },
    #[error("the game is already over")]
    AlreadyOver,
    #[error("no segment is awaiting resolution")]
    NoPendingSegment,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
