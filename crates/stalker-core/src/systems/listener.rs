//! Listener State Machine
//!
//! Patrol until a standing player is in sight inside the detection ring,
//! then chase. Enough light stuns it for a while. Touching the player ends
//! the level, even mid-stun.

use stalker_events::BehaviorState;

use super::behavior::{AgentBody, Effects, StepContext};
use crate::components::ListenerPolicy;

/// One tick of a listener
pub fn step_listener(policy: &mut ListenerPolicy, body: &mut AgentBody, ctx: &mut StepContext) -> Effects {
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

    if body.behavior.is(BehaviorState::Stunned) {
        policy.stun_timer -= ctx.dt;
        if policy.stun_timer <= 0.0 {
            policy.stun_timer = 0.0;
            body.enter(BehaviorState::Patrol, &mut fx);
            body.navigator.resume();
            body.navigator.speed = policy.wander_speed;
            body.planner.reset_wait();
            body.planner.retarget(body.navigator, ctx.nav, &mut *ctx.rng);
        }
        return fx;
    }

    if body.gauge.tick(body.lit, ctx.dt) {
        fx.light_fired = true;
        body.enter(BehaviorState::Stunned, &mut fx);
        body.navigator.halt();
        body.gauge.reset();
        policy.stun_timer = policy.stun_duration;
        return fx;
    }

    let Some((player, distance)) = sighting else {
        if body.behavior.is(BehaviorState::Chasing) {
            body.enter(BehaviorState::Patrol, &mut fx);
            body.navigator.clear();
        }
        body.patrol(policy.wander_speed, ctx);
        return fx;
    };

    body.sense_warning(distance, ctx.now, &mut fx);

    let detected =
        distance <= body.senses.detection_radius && !player.crouched && body.can_see(player, ctx.env);

    if detected {
        if body.enter(BehaviorState::Chasing, &mut fx) {
            body.planner.reset_wait();
        }
        body.navigator.speed = policy.chase_speed;
        body.navigator.set_destination(player.position);
    } else {
        if body.behavior.is(BehaviorState::Chasing) {
            body.enter(BehaviorState::Patrol, &mut fx);
            body.navigator.clear();
        }
        body.patrol(policy.wander_speed, ctx);
    }

    fx
}
