//! Narrator odds and intersection hints

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use stalker_core::dialogue::{DialogueEngine, Utterance};
use stalker_core::setup::{HintClip, MarkerSpawn};
use stalker_core::{HostCommand, LevelLayout, PlayerPose, Simulation, Tuning};
use stalker_events::{ChannelClass, Direction, EventPayload, SimEvent, Verdict, VoiceOutput};

const RUNS: usize = 10_000;

fn path_hints(events: &[SimEvent]) -> Vec<(Verdict, Option<Direction>)> {
    events
        .iter()
        .filter_map(|e| match &e.payload {
            EventPayload::PathHint { verdict, announced, .. } => Some((*verdict, *announced)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_steady_state_odds_are_40_40_20() {
    let mut rng = SmallRng::seed_from_u64(2024);
    let mut engine = DialogueEngine::new(10.0);
    let available = [Direction::Left, Direction::Right];
    engine.on_intersection_entered(&available, Direction::Left, 0.0, true, &mut rng);

    let mut counts = [0usize; 3];
    for i in 0..RUNS {
        match engine.on_intersection_entered(&available, Direction::Left, i as f64 + 1.0, true, &mut rng) {
            Utterance::Spoken(hint) if hint.is_lie => {
                assert_eq!(hint.announced, Direction::Right);
                counts[1] += 1;
            }
            Utterance::Spoken(hint) => {
                assert_eq!(hint.announced, Direction::Left);
                counts[0] += 1;
            }
            Utterance::Silent => counts[2] += 1,
            Utterance::CoolingDown => panic!("bypassed cooldown must not block"),
        }
    }

    let share = |n: usize| n as f64 / RUNS as f64;
    assert!((share(counts[0]) - 0.40).abs() < 0.02, "truth share {}", share(counts[0]));
    assert!((share(counts[1]) - 0.40).abs() < 0.02, "lie share {}", share(counts[1]));
    assert!((share(counts[2]) - 0.20).abs() < 0.02, "silence share {}", share(counts[2]));
}

#[test]
fn test_first_encounter_is_coin_flip_and_never_silent() {
    let mut rng = SmallRng::seed_from_u64(77);
    let mut truths = 0usize;

    for _ in 0..RUNS {
        let mut engine = DialogueEngine::new(10.0);
        match engine.roll(0.0, &mut rng) {
            Verdict::Truth => truths += 1,
            Verdict::Lie => {}
            Verdict::Silence => panic!("first utterance must not be silent"),
        }
    }

    let share = truths as f64 / RUNS as f64;
    assert!((share - 0.5).abs() < 0.02, "truth share {}", share);
}

#[test]
fn test_lies_never_point_at_the_correct_path() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut engine = DialogueEngine::new(10.0);
    let available = [Direction::Left, Direction::Center, Direction::Right];

    let mut lies = 0;
    for i in 0..RUNS {
        let correct = available[i % 3];
        if let Utterance::Spoken(hint) = engine.on_intersection_entered(&available, correct, i as f64, true, &mut rng) {
            if hint.is_lie {
                lies += 1;
                assert_ne!(hint.announced, correct);
            } else {
                assert_eq!(hint.announced, correct);
            }
        }
    }
    assert!(lies > 0);
}

#[test]
fn test_cooldown_swallows_rapid_requests() {
    let mut rng = SmallRng::seed_from_u64(9);
    let mut engine = DialogueEngine::new(10.0);
    let available = [Direction::Left, Direction::Right];

    assert!(engine
        .on_intersection_entered(&available, Direction::Left, 0.0, false, &mut rng)
        .spoken()
        .is_some());
    assert_eq!(
        engine.on_intersection_entered(&available, Direction::Left, 9.9, false, &mut rng),
        Utterance::CoolingDown
    );
    assert_ne!(
        engine.on_intersection_entered(&available, Direction::Left, 10.0, false, &mut rng),
        Utterance::CoolingDown
    );
}

fn hint_level() -> LevelLayout {
    let mut layout = LevelLayout::empty("fork");
    layout.markers.push(MarkerSpawn {
        id: "fork".to_string(),
        min: [-1.0, -1.0, 9.0],
        max: [1.0, 2.0, 11.0],
        available: vec![Direction::Left, Direction::Right],
        correct: Direction::Left,
        one_shot: true,
    });
    for &direction in Direction::all() {
        for truthful in [true, false] {
            layout.clips.hints.push(HintClip {
                direction,
                truthful,
                name: format!("{}_{}", direction.as_str(), truthful),
                duration: 2.0,
            });
        }
    }
    layout
}

#[test]
fn test_marker_hints_once_and_is_consumed() {
    let mut sim = Simulation::new(&Tuning::default(), &hint_level(), Some(31)).unwrap();
    let outside = PlayerPose::standing(Vec3::ZERO);
    let inside = PlayerPose::standing(Vec3::new(0.0, 0.0, 10.0));

    sim.set_player(inside.clone());
    sim.tick(0.05);

    let hints = path_hints(&sim.drain_events());
    assert_eq!(hints.len(), 1);
    let (verdict, announced) = hints[0];
    match verdict {
        Verdict::Truth => assert_eq!(announced, Some(Direction::Left)),
        Verdict::Lie => assert_eq!(announced, Some(Direction::Right)),
        Verdict::Silence => panic!("first hint must not be silent"),
    }

    let commands = sim.drain_commands();
    assert!(commands.contains(&HostCommand::PlayAudio {
        channel: ChannelClass::PathHint,
        output: VoiceOutput::for_lie(verdict.is_lie()),
        clip: format!("{}_{}", announced.map_or("", |d| d.as_str()), !verdict.is_lie()),
    }));

    for _ in 0..3 {
        sim.set_player(outside.clone());
        for _ in 0..300 {
            sim.tick(0.05);
        }
        sim.set_player(inside.clone());
        sim.tick(0.05);
    }
    assert!(path_hints(&sim.drain_events()).is_empty());
    assert_eq!(sim.snapshot().consumed_markers, vec!["fork".to_string()]);
}

#[test]
fn test_host_reported_intersection_gets_a_hint() {
    let mut sim = Simulation::new(&Tuning::default(), &hint_level(), Some(32)).unwrap();
    sim.intersection_entered(
        "host_fork",
        &[Direction::Left, Direction::Center, Direction::Right],
        Direction::Center,
    );
    sim.tick(0.05);

    let hints = path_hints(&sim.drain_events());
    assert_eq!(hints.len(), 1);
    assert_ne!(hints[0].0, Verdict::Silence);
    if hints[0].0 == Verdict::Truth {
        assert_eq!(hints[0].1, Some(Direction::Center));
    } else {
        assert_ne!(hints[0].1, Some(Direction::Center));
    }
}
