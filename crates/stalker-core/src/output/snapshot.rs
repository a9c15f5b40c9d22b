//! Snapshot Generation
//!
//! Point-in-time views of a running level.

use bevy_ecs::prelude::*;
use std::fs;
use std::path::Path;

use stalker_events::{
    generate_snapshot_id, AgentSnapshot, FlashlightSnapshot, LevelSnapshot, VoiceSnapshot,
};

use crate::components::{AgentId, Behavior, GameOutcome, Policy, Position, SimClock, Warning};
use crate::dialogue::IntersectionMarker;
use crate::systems::{ExposureGauge, Flashlight};
use crate::voice::VoiceArbiter;

/// Resource to track snapshot numbering
#[derive(Resource, Debug)]
pub struct SnapshotGenerator {
    next_snapshot_id: u64,
}

impl Default for SnapshotGenerator {
    fn default() -> Self {
        Self { next_snapshot_id: 1 }
    }
}

impl SnapshotGenerator {
    pub fn next_id(&mut self) -> String {
        let id = generate_snapshot_id(self.next_snapshot_id);
        self.next_snapshot_id += 1;
        id
    }

    pub fn snapshot_count(&self) -> u64 {
        self.next_snapshot_id - 1
    }
}

/// Generate a complete level snapshot
pub fn generate_snapshot(world: &mut World) -> LevelSnapshot {
    let snapshot_id = world.get_resource_or_insert_with(SnapshotGenerator::default).next_id();

    let (tick, time) = world
        .get_resource::<SimClock>()
        .map_or((0, 0.0), |clock| (clock.tick, clock.elapsed));
    let outcome = world
        .get_resource::<GameOutcome>()
        .map(|o| o.0.clone())
        .unwrap_or_default();

    let mut agents = Vec::new();
    {
        let mut query = world.query::<(&AgentId, &Policy, &Behavior, &Position, &ExposureGauge, &Warning)>();
        for (id, policy, behavior, position, gauge, warning) in query.iter(world) {
            agents.push(AgentSnapshot {
                agent_id: id.0.clone(),
                kind: policy.kind(),
                state: behavior.state(),
                visual: behavior.visual(),
                position: position.0.to_array(),
                exposure: gauge.level(),
                exposure_fraction: gauge.fraction(),
                has_whispered: warning.has_whispered,
            });
        }
    }
    agents.sort_by(|a, b| a.agent_id.cmp(&b.agent_id));

    let voice = world
        .get_resource::<VoiceArbiter>()
        .and_then(|arbiter| arbiter.active())
        .map(|active| VoiceSnapshot {
            priority: active.channel.priority(),
            channel: Some(active.channel),
            output: Some(active.output),
            clip: Some(active.clip.clone()),
            remaining: active.remaining,
        })
        .unwrap_or_default();

    let flashlight = world.get_resource::<Flashlight>().map(|light| FlashlightSnapshot {
        on: light.is_on(),
        battery: light.battery(),
        depleted: light.is_depleted(),
    });

    let mut consumed_markers: Vec<String> = {
        let mut query = world.query::<&IntersectionMarker>();
        query
            .iter(world)
            .filter(|m| m.consumed)
            .map(|m| m.id.clone())
            .collect()
    };
    consumed_markers.sort();

    LevelSnapshot {
        snapshot_id,
        tick,
        time,
        outcome,
        agents,
        voice,
        flashlight,
        consumed_markers,
    }
}

/// Write snapshot to a JSON file
pub fn write_snapshot(snapshot: &LevelSnapshot, path: impl AsRef<Path>) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use stalker_events::{AgentKind, BehaviorState, Direction, Outcome};

    use crate::components::{Agent, BehaviorPolicy, ListenerPolicy};
    use crate::config::ListenerTuning;

    fn world_with_agent() -> World {
        let mut world = World::new();
        world.insert_resource(SimClock::default());
        world.insert_resource(GameOutcome::default());
        let tuning = ListenerTuning::default();
        world.spawn((
            Agent,
            AgentId("listener_01".to_string()),
            Policy(BehaviorPolicy::Listener(ListenerPolicy::from_tuning(&tuning))),
            Behavior::new(),
            Position(Vec3::new(1.0, 0.0, 2.0)),
            ExposureGauge::new(1.5, 0.5),
            Warning::default(),
        ));
        let mut marker = IntersectionMarker::new("fork", vec![Direction::Left], Direction::Left);
        marker.consumed = true;
        world.spawn(marker);
        world
    }

    #[test]
    fn test_snapshot_collects_agents_and_markers() {
        let mut world = world_with_agent();
        let snapshot = generate_snapshot(&mut world);

        assert_eq!(snapshot.snapshot_id, "snap_000001");
        assert_eq!(snapshot.outcome, Outcome::Running);
        let agent = snapshot.agent("listener_01").unwrap();
        assert_eq!(agent.kind, AgentKind::Listener);
        assert_eq!(agent.state, BehaviorState::Patrol);
        assert_eq!(agent.position, [1.0, 0.0, 2.0]);
        assert_eq!(snapshot.consumed_markers, vec!["fork".to_string()]);
        assert_eq!(snapshot.voice.priority, 0);
        assert!(snapshot.flashlight.is_none());

        let next = generate_snapshot(&mut world);
        assert_eq!(next.snapshot_id, "snap_000002");
        assert_eq!(world.resource::<SnapshotGenerator>().snapshot_count(), 2);
    }

    #[test]
    fn test_write_snapshot() {
        let mut world = world_with_agent();
        let snapshot = generate_snapshot(&mut world);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");

        write_snapshot(&snapshot, &path).unwrap();
        let parsed: LevelSnapshot = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
