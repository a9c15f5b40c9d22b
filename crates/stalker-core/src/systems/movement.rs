//! Movement
//!
//! Straight-line seek toward each navigator's destination.

use bevy_ecs::prelude::*;

use crate::components::{Navigator, Position, SimClock};

/// Closer than this counts as standing on the destination
const ARRIVAL_EPSILON: f32 = 1e-4;

/// System: move every non-halted agent toward its destination without overshooting
pub fn move_agents(clock: Res<SimClock>, mut movers: Query<(&mut Position, &Navigator)>) {
    for (mut position, navigator) in movers.iter_mut() {
        if navigator.halted {
            continue;
        }
        let Some(destination) = navigator.destination() else {
            continue;
        };

        let offset = destination - position.0;
        let distance = offset.length();
        if distance < ARRIVAL_EPSILON {
            continue;
        }

        let step = navigator.speed.max(0.0) * clock.dt;
        if step >= distance {
            position.0 = destination;
        } else {
            position.0 += offset / distance * step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_moves_at_speed_and_stops_on_target() {
        let mut world = World::new();
        let mut clock = SimClock::default();
        clock.advance(0.1);
        world.insert_resource(clock);

        let mut navigator = Navigator::new(5.0, 0.5);
        navigator.set_destination(Vec3::new(1.2, 0.0, 0.0));
        let walker = world.spawn((Position(Vec3::ZERO), navigator)).id();

        let mut halted_nav = Navigator::new(5.0, 0.5);
        halted_nav.set_destination(Vec3::new(5.0, 0.0, 0.0));
        halted_nav.halted = true;
        let frozen = world.spawn((Position(Vec3::ZERO), halted_nav)).id();

        let mut schedule = Schedule::default();
        schedule.add_systems(move_agents);

        schedule.run(&mut world);
        assert!((world.get::<Position>(walker).unwrap().0.x - 0.5).abs() < 1e-5);

        schedule.run(&mut world);
        schedule.run(&mut world);
        assert_eq!(world.get::<Position>(walker).unwrap().0, Vec3::new(1.2, 0.0, 0.0));
        assert_eq!(world.get::<Position>(frozen).unwrap().0, Vec3::ZERO);
    }
}
