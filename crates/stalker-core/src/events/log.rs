//! Event Queue
//!
//! Systems record events here during a tick; the host drains them.

use bevy_ecs::prelude::*;
use stalker_events::{generate_event_id, EventPayload, SimEvent};

use crate::components::SimClock;

/// Resource: events recorded but not yet drained
#[derive(Resource, Debug)]
pub struct EventLog {
    pending: Vec<SimEvent>,
    next_id: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 1,
        }
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a payload with the next id and the clock's tick and time
    pub fn record(&mut self, clock: &SimClock, payload: EventPayload) -> &SimEvent {
        let event = SimEvent::new(generate_event_id(self.next_id), clock.tick, clock.elapsed, payload);
        self.next_id += 1;
        self.pending.push(event);
        &self.pending[self.pending.len() - 1]
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[SimEvent] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Total events ever recorded
    pub fn recorded(&self) -> u64 {
        self.next_id - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_keep_counting_across_drains() {
        let mut log = EventLog::new();
        let mut clock = SimClock::default();
        clock.advance(0.05);

        let first = log.record(&clock, EventPayload::LevelCleared);
        assert_eq!(first.event_id, "evt_00000001");
        assert_eq!(first.tick, 1);

        assert_eq!(log.drain().len(), 1);
        assert!(log.is_empty());

        log.record(&clock, EventPayload::FlashlightDepleted);
        assert_eq!(log.pending()[0].event_id, "evt_00000002");
        assert_eq!(log.recorded(), 2);
    }
}
