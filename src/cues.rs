//! Sound cues for audio collaborators
//!
//! Playback lives outside the core; this only decides which cue an event triggers.

use crate::events::{GameEvent, SessionListener};
use crate::sim::{EndReason, SegmentPhase};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Doors start swinging open
    Door,
    /// Coin collected
    Pickup,
    /// Checkpoint cleared
    Checkpoint,
    /// Ran into an obstacle
    Fail,
    /// Every checkpoint cleared
    Fanfare,
}

impl SoundCue {
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PhaseChanged {
                to: SegmentPhase::DoorsOpening,
                ..
            } => Some(SoundCue::Door),
            GameEvent::CoinCollected { .. } => Some(SoundCue::Pickup),
            GameEvent::CheckpointResolved(result) if result.safe => Some(SoundCue::Checkpoint),
            GameEvent::CheckpointResolved(_) => Some(SoundCue::Fail),
            GameEvent::GameEnded(summary) if summary.end_reason == Some(EndReason::Cleared) => {
                Some(SoundCue::Fanfare)
            }
            _ => None,
        }
    }
}

/// Listener that forwards cues to a playback callback
pub struct CuePlayer<F: FnMut(SoundCue)> {
    play: F,
}

impl<F: FnMut(SoundCue)> CuePlayer<F> {
    pub fn new(play: F) -> Self {
        Self { play }
    }
}

impl<F: FnMut(SoundCue)> SessionListener for CuePlayer<F> {
    fn on_event(&mut self, event: &GameEvent) {
        if let Some(cue) = SoundCue::for_event(event) {
            (self.play)(cue);
        }
    }
}
