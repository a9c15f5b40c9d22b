//! Shader State Machine
//!
//! Patrols until the player comes inside the detection ring, then hovers
//! restlessly around them, picking a new spot near the player at random
//! intervals. Enough light enrages it into a direct chase that only ends
//! once the player gets past the de-aggro radius.

use std::f32::consts::TAU;

use rand::Rng;
use stalker_events::BehaviorState;

use super::behavior::{AgentBody, Effects, StepContext};
use crate::components::{PlayerPose, ShaderPolicy};

/// One tick of a shader
pub fn step_shader(policy: &mut ShaderPolicy, body: &mut AgentBody, ctx: &mut StepContext) -> Effects {
    let mut fx = Effects::default();
    if body.behavior.state().is_terminal() {
        return fx;
    }

    let sighting = ctx.player.map(|p| (p, body.distance_to(p)));

    if let Some((_, distance)) = sighting {
        if body.try_catch(distance, &mut fx) {
            return fx;
        }
    }

    if body.gauge.tick(body.lit, ctx.dt) && !body.behavior.is(BehaviorState::Aggroed) {
        fx.light_fired = true;
        body.enter(BehaviorState::Aggroed, &mut fx);
        body.navigator.speed = policy.chase_speed;
    }

    let Some((player, distance)) = sighting else {
        if !body.behavior.is(BehaviorState::Patrol) {
            calm_down(policy, body, ctx, &mut fx);
        }
        body.patrol(policy.patrol_speed, ctx);
        return fx;
    };

    if body.behavior.is(BehaviorState::Aggroed) {
        if distance > policy.deaggro_radius {
            calm_down(policy, body, ctx, &mut fx);
        } else {
            body.navigator.speed = policy.chase_speed;
            body.navigator.set_destination(player.position);
            return fx;
        }
    }

    body.sense_warning(distance, ctx.now, &mut fx);

    if distance <= body.senses.detection_radius {
        hover(policy, body, player, ctx, &mut fx);
    } else {
        if body.behavior.is(BehaviorState::Hovering) {
            body.enter(BehaviorState::Patrol, &mut fx);
        }
        body.patrol(policy.patrol_speed, ctx);
    }

    fx
}

/// Drop pursuit: empty gauge, patrol speed, fresh patrol destination
fn calm_down(policy: &ShaderPolicy, body: &mut AgentBody, ctx: &mut StepContext, fx: &mut Effects) {
    body.enter(BehaviorState::Patrol, fx);
    body.gauge.reset();
    body.navigator.speed = policy.patrol_speed;
    body.planner.reset_wait();
    body.planner.retarget(body.navigator, ctx.nav, &mut *ctx.rng);
}

/// Retarget a random point around the player whenever the hover timer runs out
fn hover(policy: &mut ShaderPolicy, body: &mut AgentBody, player: &PlayerPose, ctx: &mut StepContext, fx: &mut Effects) {
    if body.enter(BehaviorState::Hovering, fx) {
        policy.hover_timer = 0.0;
    }
    body.navigator.speed = policy.hover_speed;

    policy.hover_timer -= ctx.dt;
    if policy.hover_timer > 0.0 {
        return;
    }

    let angle = ctx.rng.gen_range(0.0..TAU);
    let radius = policy.hover_radius * ctx.rng.gen::<f32>().sqrt();
    let target = player.position + glam::Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin());
    if let Some(point) = ctx
        .nav
        .and_then(|nav| nav.sample_point(target, body.planner.search_radius))
    {
        body.navigator.set_destination(point);
        fx.hover_retargeted = true;
    }

    let (min, max) = policy.hover_interval;
    policy.hover_timer = if max > min { ctx.rng.gen_range(min..=max) } else { min };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Behavior, Navigator, Senses, Warning};
    use crate::config::{DeaggroBoundary, ShaderTuning};
    use crate::systems::exposure::ExposureGauge;
    use crate::systems::patrol::PatrolPlanner;
    use crate::geometry::FlatNavMesh;
    use glam::{Vec2, Vec3};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    struct Rig {
        policy: ShaderPolicy,
        senses: Senses,
        behavior: Behavior,
        gauge: ExposureGauge,
        planner: PatrolPlanner,
        navigator: Navigator,
        warning: Warning,
        nav: FlatNavMesh,
        rng: SmallRng,
    }

    impl Rig {
        fn new(tuning: ShaderTuning) -> Self {
            Self {
                policy: ShaderPolicy::from_tuning(&tuning),
                senses: Senses::for_shader(&tuning),
                behavior: Behavior::new(),
                gauge: ExposureGauge::new(tuning.required_light_time, tuning.decay_cooldown),
                planner: PatrolPlanner::new(Vec3::ZERO, Vec2::splat(10.0), (2.0, 5.0), 5.0),
                navigator: Navigator::new(tuning.patrol_speed, 0.5),
                warning: Warning::default(),
                nav: FlatNavMesh::new(Vec2::splat(-50.0), Vec2::splat(50.0), 0.0),
                rng: SmallRng::seed_from_u64(29),
            }
        }

        fn step(&mut self, player: &PlayerPose, lit: bool, dt: f32) -> Effects {
            let mut body = AgentBody {
                position: Vec3::ZERO,
                senses: &self.senses,
                behavior: &mut self.behavior,
                gauge: &mut self.gauge,
                planner: &mut self.planner,
                navigator: &mut self.navigator,
                warning: &mut self.warning,
                lit,
            };
            let mut ctx = StepContext {
                dt,
                now: 0.0,
                player: Some(player),
                env: None,
                nav: Some(&self.nav),
                rng: &mut self.rng,
            };
            step_shader(&mut self.policy, &mut body, &mut ctx)
        }
    }

    #[test]
    fn test_hovers_without_aggro_and_retargets_on_schedule() {
        let mut rig = Rig::new(ShaderTuning::default());
        let player = PlayerPose::standing(Vec3::new(5.0, 0.0, 0.0));
        let dt = 0.02;

        let mut retarget_times = Vec::new();
        for i in 0..1000 {
            let fx = rig.step(&player, false, dt);
            assert!(!rig.behavior.is(BehaviorState::Aggroed));
            if fx.hover_retargeted {
                retarget_times.push(i as f32 * dt);
                let dest = rig.navigator.destination().unwrap();
                assert!(dest.distance(player.position) <= rig.policy.hover_radius + 1e-3);
            }
        }

        assert!(rig.behavior.is(BehaviorState::Hovering));
        assert!(retarget_times.len() >= 8);
        for pair in retarget_times.windows(2) {
            let interval = pair[1] - pair[0];
            assert!(interval >= 1.0 - 1e-3, "interval {} too short", interval);
            assert!(interval <= 2.5 + dt + 1e-3, "interval {} too long", interval);
        }
    }

    #[test]
    fn test_light_aggroes_and_chases() {
        let mut rig = Rig::new(ShaderTuning::default());
        let player = PlayerPose::standing(Vec3::new(5.0, 0.0, 0.0));

        let mut fired = 0;
        for _ in 0..16 {
            if rig.step(&player, true, 0.125).light_fired {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert!(rig.behavior.is(BehaviorState::Aggroed));
        assert_eq!(rig.navigator.destination(), Some(player.position));
        assert_eq!(rig.navigator.speed, rig.policy.chase_speed);
    }

    #[test]
    fn test_deaggro_past_detection_radius() {
        let mut rig = Rig::new(ShaderTuning::default());
        rig.behavior.enter(BehaviorState::Aggroed);
        rig.gauge.tick(true, 1.0);

        let player = PlayerPose::standing(Vec3::new(9.0, 0.0, 0.0));
        let fx = rig.step(&player, false, 0.1);
        assert_eq!(fx.transitions, vec![(BehaviorState::Aggroed, BehaviorState::Patrol)]);
        assert_eq!(rig.gauge.level(), 0.0);
        assert_eq!(rig.navigator.speed, rig.policy.patrol_speed);
    }

    #[test]
    fn test_warning_boundary_keeps_chase_longer() {
        let tuning = ShaderTuning {
            deaggro_boundary: DeaggroBoundary::Warning,
            ..ShaderTuning::default()
        };
        let mut rig = Rig::new(tuning);
        rig.behavior.enter(BehaviorState::Aggroed);

        let player = PlayerPose::standing(Vec3::new(15.0, 0.0, 0.0));
        let fx = rig.step(&player, false, 0.1);
        assert!(fx.transitions.is_empty());
        assert_eq!(rig.navigator.destination(), Some(player.position));

        let gone = PlayerPose::standing(Vec3::new(25.0, 0.0, 0.0));
        rig.step(&gone, false, 0.1);
        assert!(rig.behavior.is(BehaviorState::Patrol));
    }

    #[test]
    fn test_caught_from_hover() {
        let mut rig = Rig::new(ShaderTuning::default());
        rig.step(&PlayerPose::standing(Vec3::new(5.0, 0.0, 0.0)), false, 0.1);
        let fx = rig.step(&PlayerPose::standing(Vec3::new(0.5, 0.0, 0.0)), false, 0.1);
        assert!(fx.caught);
        assert!(rig.behavior.is(BehaviorState::Caught));
    }
}
