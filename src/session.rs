//! One play-through
//!
//! A session owns the controller (and through it the rules engine). It is
//! built once per run and never reused; restarting means building a new one.

use crate::config::GameConfig;
use crate::error::Result;
use crate::events::{GameEvent, SessionListener};
use crate::sim::{GameSummary, SegmentController, SegmentPhase};

/// Owned game session with listener fan-out
pub struct GameSession {
    controller: SegmentController,
    listeners: Vec<Box<dyn SessionListener>>,
    /// Events already dispatched but not yet drained by a poller
    backlog: Vec<GameEvent>,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self> {
        Ok(Self {
            controller: SegmentController::new(config)?,
            listeners: Vec::new(),
            backlog: Vec::new(),
        })
    }

    /// Register an observer; it receives events in registration order
    pub fn subscribe(&mut self, listener: impl SessionListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Start the first segment
    pub fn start(&mut self) -> Result<()> {
        let outcome = self.controller.start();
        self.dispatch();
        outcome
    }

    /// Submit the player's lane; only accepted while awaiting a choice
    pub fn submit_lane_choice(&mut self, lane: i32) -> Result<()> {
        let outcome = self.controller.choose_lane(lane);
        self.dispatch();
        outcome
    }

    /// Advance by one rendering frame
    pub fn advance_time(&mut self, delta_seconds: f32) {
        self.controller.advance_time(delta_seconds);
        self.dispatch();
    }

    fn dispatch(&mut self) {
        let events = self.controller.drain_events();
        for event in &events {
            for listener in &mut self.listeners {
                listener.on_event(event);
            }
        }
        self.backlog.extend(events);
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.backlog)
    }

    pub fn phase(&self) -> SegmentPhase {
        self.controller.phase()
    }

    pub fn is_over(&self) -> bool {
        self.controller.engine().is_over()
    }

    pub fn summary(&self) -> GameSummary {
        self.controller.engine().summary()
    }

    /// Read access for presentation collaborators
    pub fn controller(&self) -> &SegmentController {
        &self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_listeners_see_events_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut session = GameSession::new(GameConfig::seeded(12345)).unwrap();
        let sink = Rc::clone(&seen);
        session.subscribe(move |event: &GameEvent| sink.borrow_mut().push(event.clone()));

        session.start().unwrap();
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[0], GameEvent::SegmentStarted { .. }));
        assert_eq!(*seen, session.drain_events());
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_rejected_input_emits_nothing() {
        let mut session = GameSession::new(GameConfig::seeded(1)).unwrap();
        session.start().unwrap();
        session.drain_events();
        assert!(session.submit_lane_choice(7).is_err());
        assert!(session.drain_events().is_empty());
        assert_eq!(session.phase(), SegmentPhase::AwaitingChoice);
    }
}
