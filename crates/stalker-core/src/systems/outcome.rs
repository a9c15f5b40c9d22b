//! Level Outcome
//!
//! Ending the level: record the outcome once, freeze time, tell the host.

use stalker_events::EventPayload;

use crate::components::{GameOutcome, SimClock};
use crate::events::EventLog;
use crate::output::{HostCommand, Outbox};

/// End the level in defeat. Later causes are ignored.
pub fn declare_game_over(
    outcome: &mut GameOutcome,
    clock: &mut SimClock,
    outbox: &mut Outbox,
    log: &mut EventLog,
    cause: &str,
    agent_id: Option<&str>,
) -> bool {
    if !outcome.trigger_game_over(cause) {
        return false;
    }
    clock.freeze();
    tracing::info!("Game over: {}", cause);
    outbox.push(HostCommand::GameOver {
        cause: cause.to_string(),
    });
    log.record(
        clock,
        EventPayload::GameOver {
            cause: cause.to_string(),
            agent_id: agent_id.map(str::to_string),
        },
    );
    true
}

/// End the level in victory
pub fn declare_level_cleared(
    outcome: &mut GameOutcome,
    clock: &mut SimClock,
    outbox: &mut Outbox,
    log: &mut EventLog,
) -> bool {
    if !outcome.clear_level() {
        return false;
    }
    clock.freeze();
    tracing::info!("Level cleared at {:.2}s", clock.elapsed);
    outbox.push(HostCommand::LevelCleared);
    log.record(clock, EventPayload::LevelCleared);
    true
}
