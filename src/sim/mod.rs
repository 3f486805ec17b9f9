//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Explicit delta-time ticks only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod coins;
pub mod controller;
pub mod rules;
pub mod timing;
pub mod track;

pub use coins::{Coin, CoinField, RunStage};
pub use controller::{SegmentController, SegmentPhase};
pub use rules::{CheckpointResult, EndReason, GameState, GameSummary, ObstacleLanes, RulesEngine};
pub use timing::PhaseDurations;
pub use track::Track;
