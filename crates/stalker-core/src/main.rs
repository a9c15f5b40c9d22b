//! Stalker Simulation Runner
//!
//! Plays the demo level headless: a scripted player walks the corridor,
//! sneaks past the listener and shines a light at the shader while the
//! narrator whispers. Events go to a JSONL log, the last state to a snapshot.

use clap::Parser;
use glam::Vec3;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use stalker_core::events::EventLogger;
use stalker_core::output::write_snapshot;
use stalker_core::{demo_level, HostCommand, LevelLayout, PlayerPose, SimError, Simulation, Tuning};
use stalker_events::Outcome;

/// Command line arguments for the runner
#[derive(Parser, Debug)]
#[command(name = "stalker_sim")]
#[command(about = "Headless run of the stalker antagonist simulation")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Seconds to simulate (defaults to the tuning file)
    #[arg(long)]
    duration: Option<f32>,

    /// Frame delta in seconds (defaults to the tuning file)
    #[arg(long)]
    dt: Option<f32>,

    /// Tuning file
    #[arg(long, default_value = stalker_core::config::DEFAULT_TUNING_PATH)]
    tuning: PathBuf,

    /// Level layout JSON; the bundled demo level when omitted
    #[arg(long)]
    level: Option<PathBuf>,

    /// Event log output
    #[arg(long, default_value = "output/events.jsonl")]
    events: PathBuf,

    /// Final snapshot output
    #[arg(long, default_value = "output/final_state.json")]
    snapshot: PathBuf,

    /// Walking speed of the scripted player
    #[arg(long, default_value_t = 3.0)]
    walk_speed: f32,
}

/// One leg of the scripted route
struct Waypoint {
    target: Vec3,
    crouch: bool,
    /// Flashlight state while walking this leg
    light: bool,
    /// Face this point instead of the walking direction
    look_at: Option<Vec3>,
}

impl Waypoint {
    fn walk(x: f32, z: f32) -> Self {
        Self {
            target: Vec3::new(x, 0.0, z),
            crouch: false,
            light: false,
            look_at: None,
        }
    }

    fn crouched(mut self) -> Self {
        self.crouch = true;
        self
    }

    fn shining_at(mut self, point: Vec3) -> Self {
        self.light = true;
        self.look_at = Some(point);
        self
    }
}

/// Player route through the corridor
fn demo_route(layout: &LevelLayout) -> Vec<Waypoint> {
    let shader = layout
        .agents
        .iter()
        .find(|a| a.id == "shader_01")
        .map_or(Vec3::new(6.0, 0.0, 42.0), |a| Vec3::from(a.position));

    vec![
        Waypoint::walk(0.0, 12.0),
        Waypoint::walk(-1.0, 18.0).crouched(),
        Waypoint::walk(0.0, 28.0).crouched(),
        Waypoint::walk(0.0, 33.0),
        Waypoint::walk(0.0, 42.0).shining_at(shader),
        Waypoint::walk(0.0, 58.0),
    ]
}

/// Walks the route and drives the player's flashlight
struct Script {
    route: Vec<Waypoint>,
    leg: usize,
    position: Vec3,
    speed: f32,
}

impl Script {
    fn new(route: Vec<Waypoint>, start: Vec3, speed: f32) -> Self {
        Self {
            route,
            leg: 0,
            position: start,
            speed,
        }
    }

    /// Next pose, and whether the flashlight should be on
    fn step(&mut self, dt: f32) -> (PlayerPose, bool) {
        let Some(leg) = self.route.get(self.leg) else {
            return (PlayerPose::standing(self.position), false);
        };

        let to_target = leg.target - self.position;
        let step = self.speed * dt;
        let heading = to_target.normalize_or_zero();
        if to_target.length() <= step {
            self.position = leg.target;
            self.leg += 1;
        } else {
            self.position += heading * step;
        }

        let facing = leg
            .look_at
            .map(|p| (p - self.position).normalize_or_zero())
            .unwrap_or(heading);
        let pose = if leg.crouch {
            PlayerPose::crouching(self.position)
        } else {
            PlayerPose::standing(self.position)
        };
        (pose.facing(facing), leg.light)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), SimError> {
    let tuning = Tuning::load_or_default(&args.tuning);
    let layout = match &args.level {
        Some(path) => LevelLayout::load(path)?,
        None => demo_level(),
    };
    let dt = args.dt.unwrap_or(tuning.simulation.default_dt);
    let duration = args.duration.unwrap_or(tuning.simulation.default_duration);

    println!("Stalker Simulation");
    println!("==================");
    println!("Seed: {}", args.seed);
    println!("Level: {}", layout.name);
    println!("Duration: {:.1}s at dt {:.4}", duration, dt);
    println!();

    for path in [&args.events, &args.snapshot] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Warning: Could not create {}: {}", parent.display(), e);
            }
        }
    }

    let mut sim = Simulation::new(&tuning, &layout, Some(args.seed))?;
    println!("Spawned {}", sim.summary());

    let mut logger = open_logger(&args.events);
    let mut script = Script::new(demo_route(&layout), layout.player_start(), args.walk_speed);

    println!();
    println!("Starting simulation...");
    println!();

    let mut clips_played = 0u32;
    while sim.is_running() && sim.elapsed() < duration as f64 {
        let (pose, want_light) = script.step(dt);
        sim.set_player(pose);
        let light_on = sim.flashlight().map_or(false, |f| f.is_on());
        if want_light != light_on {
            sim.toggle_flashlight();
        }

        sim.tick(dt);

        for command in sim.drain_commands() {
            match &command {
                HostCommand::PlayAudio { channel, output, clip } => {
                    clips_played += 1;
                    println!(
                        "[{:6.2}s] {:>15} {:?}: {}",
                        sim.elapsed(),
                        channel.as_str(),
                        output,
                        clip
                    );
                }
                HostCommand::StopAudio { channel, .. } => {
                    println!("[{:6.2}s] {:>15} cut off", sim.elapsed(), channel.as_str());
                }
                HostCommand::GameOver { cause } => {
                    println!("[{:6.2}s] GAME OVER: {}", sim.elapsed(), cause);
                }
                HostCommand::LevelCleared => {
                    println!("[{:6.2}s] Level cleared", sim.elapsed());
                }
            }
        }

        let events = sim.drain_events();
        if let Err(e) = logger.log_batch(&events) {
            eprintln!("Warning: Could not write events: {}", e);
        }
    }

    if let Err(e) = logger.flush() {
        eprintln!("Warning: Could not flush event log: {}", e);
    }

    let snapshot = sim.snapshot();
    if let Err(e) = write_snapshot(&snapshot, &args.snapshot) {
        eprintln!("Warning: Could not write final snapshot: {}", e);
    }

    println!();
    match sim.outcome() {
        Outcome::Running => println!("Time ran out after {:.1}s.", sim.elapsed()),
        Outcome::GameOver { cause } => println!("Game over after {:.1}s: {}", sim.elapsed(), cause),
        Outcome::Cleared => println!("Level cleared in {:.1}s.", sim.elapsed()),
    }
    for agent in &snapshot.agents {
        println!("  {} ({}): {}", agent.agent_id, agent.kind, agent.state);
    }
    println!(
        "Logged {} events, played {} clips.",
        logger.event_count(),
        clips_played
    );
    Ok(())
}

fn open_logger(path: &Path) -> EventLogger {
    match EventLogger::new(path) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Warning: Could not open {}: {}", path.display(), e);
            EventLogger::null()
        }
    }
}
