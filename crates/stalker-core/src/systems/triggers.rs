//! Trigger Volumes
//!
//! Boxes that react when the player steps into them: hazards end the
//! level, the exit clears it, intersection markers ask the narrator for a
//! hint.

use bevy_ecs::prelude::*;

use super::outcome::{declare_game_over, declare_level_cleared};
use crate::components::{GameOutcome, PlayerPose, SimClock};
use crate::dialogue::{HintQueue, IntersectionMarker};
use crate::events::EventLog;
use crate::geometry::Aabb;
use crate::output::Outbox;

/// Component: a region that notices the player entering it
#[derive(Component, Debug, Clone)]
pub struct TriggerVolume {
    pub bounds: Aabb,
    player_inside: bool,
}

impl TriggerVolume {
    pub fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            player_inside: false,
        }
    }

    /// Update occupancy; true only on the tick the player steps in
    pub fn enter_edge(&mut self, inside: bool) -> bool {
        let entered = inside && !self.player_inside;
        self.player_inside = inside;
        entered
    }

    pub fn player_inside(&self) -> bool {
        self.player_inside
    }
}

/// Component: touching this kills the player
#[derive(Component, Debug, Clone)]
pub struct Hazard {
    pub cause: String,
}

/// Component: reaching this clears the level
#[derive(Component, Debug, Clone, Default)]
pub struct LevelExit;

/// System: fire hazards, the exit and markers on the player's entry
#[allow(clippy::too_many_arguments)]
pub fn detect_trigger_entries(
    player: Option<Res<PlayerPose>>,
    mut clock: ResMut<SimClock>,
    mut outcome: ResMut<GameOutcome>,
    mut outbox: ResMut<Outbox>,
    mut log: ResMut<EventLog>,
    mut hints: ResMut<HintQueue>,
    mut volumes: Query<(
        &mut TriggerVolume,
        Option<&Hazard>,
        Option<&LevelExit>,
        Option<&IntersectionMarker>,
    )>,
) {
    let Some(player) = player else {
        return;
    };

    for (mut volume, hazard, exit, marker) in volumes.iter_mut() {
        if !outcome.is_running() {
            break;
        }
        let inside = volume.bounds.contains(player.position);
        if !volume.enter_edge(inside) {
            continue;
        }

        if let Some(hazard) = hazard {
            declare_game_over(&mut outcome, &mut clock, &mut outbox, &mut log, &hazard.cause, None);
        }
        if exit.is_some() {
            declare_level_cleared(&mut outcome, &mut clock, &mut outbox, &mut log);
        }
        if let Some(marker) = marker.filter(|m| m.is_active()) {
            tracing::debug!("Player entered intersection {}", marker.id);
            hints.push(marker.contact());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::HostCommand;
    use glam::Vec3;
    use stalker_events::{Direction, Outcome};

    fn trigger_world() -> World {
        let mut world = World::new();
        world.insert_resource(SimClock::default());
        world.insert_resource(GameOutcome::default());
        world.insert_resource(Outbox::new());
        world.insert_resource(EventLog::new());
        world.insert_resource(HintQueue::default());
        world
    }

    fn unit_box(center: Vec3) -> Aabb {
        Aabb::new(center - Vec3::splat(1.0), center + Vec3::splat(1.0))
    }

    #[test]
    fn test_enter_edge_only_once_per_visit() {
        let mut volume = TriggerVolume::new(unit_box(Vec3::ZERO));
        assert!(volume.enter_edge(true));
        assert!(!volume.enter_edge(true));
        assert!(!volume.enter_edge(false));
        assert!(volume.enter_edge(true));
    }

    #[test]
    fn test_marker_queues_hint_on_entry() {
        let mut world = trigger_world();
        world.spawn((
            TriggerVolume::new(unit_box(Vec3::new(5.0, 0.0, 0.0))),
            IntersectionMarker::new("fork", vec![Direction::Left, Direction::Center], Direction::Center),
        ));
        let mut schedule = Schedule::default();
        schedule.add_systems(detect_trigger_entries);

        world.insert_resource(PlayerPose::standing(Vec3::ZERO));
        schedule.run(&mut world);
        assert!(world.resource::<HintQueue>().is_empty());

        world.insert_resource(PlayerPose::standing(Vec3::new(5.0, 0.0, 0.0)));
        schedule.run(&mut world);
        schedule.run(&mut world);
        let contacts = world.resource_mut::<HintQueue>().drain();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].correct, Direction::Center);
    }

    #[test]
    fn test_hazard_ends_level_and_blocks_exit() {
        let mut world = trigger_world();
        world.spawn((
            TriggerVolume::new(unit_box(Vec3::ZERO)),
            Hazard {
                cause: "fell into the abyss".to_string(),
            },
        ));
        world.spawn((TriggerVolume::new(unit_box(Vec3::new(5.0, 0.0, 0.0))), LevelExit));
        world.insert_resource(PlayerPose::standing(Vec3::ZERO));

        let mut schedule = Schedule::default();
        schedule.add_systems(detect_trigger_entries);
        schedule.run(&mut world);

        world.insert_resource(PlayerPose::standing(Vec3::new(5.0, 0.0, 0.0)));
        schedule.run(&mut world);

        assert_eq!(
            world.resource::<GameOutcome>().0,
            Outcome::GameOver {
                cause: "fell into the abyss".to_string()
            }
        );
        assert!(world.resource::<SimClock>().is_frozen());
        let commands = world.resource_mut::<Outbox>().drain();
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], HostCommand::GameOver { .. }));
    }
}
