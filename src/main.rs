//! SanghaMap - Headless cooperative landmark estimation daemon.
//!
//! Runs the sense → communicate → optimize tick loop over a simulated
//! agent team and streams estimation-quality metrics to the log. The
//! daemon is the reference external driver: it owns agent motion and
//! pacing, the library owns all estimation state.
//!
//! # Usage
//!
//! ```bash
//! # With default config
//! cargo run --release
//!
//! # With custom config file
//! cargo run --release -- --config sangha-map.toml
//!
//! # With a fixed tick budget
//! cargo run --release -- --ticks 2000
//! ```

use std::fs;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use sangha_map::utils::SampleStats;
use sangha_map::{
    compute_team_error, ConsensusConfig, MotionCommand, Point2D, RangeCostConfig,
    RangeSensorConfig, Simulation, SimulationConfig, WorldBounds,
};

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Deserialize, Default)]
struct Config {
    #[serde(default)]
    world: WorldConfig,
    #[serde(default)]
    sensor: SensorConfig,
    #[serde(default)]
    consensus: ConsensusSection,
    #[serde(default)]
    gradient: GradientConfig,
    #[serde(default)]
    run: RunConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct WorldConfig {
    width: f32,
    height: f32,
    num_agents: usize,
    agent_speed: f32,
    /// Master random seed (0 for time-derived)
    seed: u64,
    /// Landmark positions as [x, y] pairs (empty for the default
    /// two-thirds / one-third layout)
    landmarks: Vec<[f32; 2]>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            num_agents: 3,
            agent_speed: 2.0,
            seed: 0,
            landmarks: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SensorConfig {
    noise_scale: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self { noise_scale: 10.0 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ConsensusSection {
    self_weight: f32,
}

impl Default for ConsensusSection {
    fn default() -> Self {
        Self { self_weight: 0.1 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct GradientConfig {
    step_size: f32,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self { step_size: 0.1 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RunConfig {
    /// Number of ticks to simulate (0 runs until Ctrl-C)
    ticks: u64,
    /// Log a metrics line every this many ticks
    log_interval: u64,
    /// Give every agent a fresh random motion command each tick
    random_walk: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 500,
            log_interval: 50,
            random_walk: false,
        }
    }
}

// ============================================================================
// Argument Parsing
// ============================================================================

#[derive(Debug, Default)]
struct Args {
    config_path: Option<String>,
    ticks_override: Option<u64>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut result = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                if i < args.len() {
                    result.config_path = Some(args[i].clone());
                } else {
                    eprintln!("Missing value for {}", args[i - 1]);
                    std::process::exit(1);
                }
            }
            "-t" | "--ticks" => {
                i += 1;
                match args.get(i).and_then(|v| v.parse().ok()) {
                    Some(ticks) => result.ticks_override = Some(ticks),
                    None => {
                        eprintln!("Missing or invalid value for {}", args[i - 1]);
                        std::process::exit(1);
                    }
                }
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    result
}

fn print_help() {
    println!("sangha-map - cooperative landmark estimation daemon");
    println!();
    println!("USAGE:");
    println!("    sangha-map [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>     Configuration file (default: sangha-map.toml)");
    println!("    -t, --ticks <N>         Tick budget override (0 runs until Ctrl-C)");
    println!("    -h, --help              Print help information");
    println!();
    println!("CONFIGURATION:");
    println!("    All settings are configured via the TOML config file:");
    println!("    - [world] num_agents, seed, landmarks, width/height");
    println!("    - [sensor] noise_scale: range noise gain");
    println!("    - [consensus] self_weight: own-estimate blend weight");
    println!("    - [gradient] step_size: gradient descent step");
    println!("    - [run] ticks, log_interval, random_walk");
}

fn load_config(args: &Args) -> Config {
    match &args.config_path {
        Some(path) => match fs::read_to_string(path) {
            Ok(contents) => match basic_toml::from_str(&contents) {
                Ok(cfg) => {
                    log::info!("Loaded config from {}", path);
                    cfg
                }
                Err(e) => {
                    log::warn!("Failed to parse config {}: {}", path, e);
                    Config::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read config {}: {}", path, e);
                Config::default()
            }
        },
        None => {
            for path in &["sangha-map.toml", "/etc/sangha-map.toml"] {
                if let Ok(contents) = fs::read_to_string(path) {
                    if let Ok(cfg) = basic_toml::from_str(&contents) {
                        log::info!("Loaded config from {}", path);
                        return cfg;
                    }
                }
            }
            Config::default()
        }
    }
}

/// Build the library's SimulationConfig from the TOML configuration.
fn build_simulation_config(config: &Config) -> SimulationConfig {
    let bounds = WorldBounds::new(config.world.width, config.world.height);

    let landmarks: Vec<Point2D> = if config.world.landmarks.is_empty() {
        sangha_map::default_landmarks(&bounds)
    } else {
        config
            .world
            .landmarks
            .iter()
            .map(|&[x, y]| Point2D::new(x, y))
            .collect()
    };

    SimulationConfig {
        num_agents: config.world.num_agents,
        landmarks,
        bounds,
        agent_speed: config.world.agent_speed,
        seed: config.world.seed,
        sensor: RangeSensorConfig {
            noise_scale: config.sensor.noise_scale,
            seed: 0,
        },
        consensus: ConsensusConfig {
            self_weight: config.consensus.self_weight,
        },
        cost: RangeCostConfig {
            step_size: config.gradient.step_size,
        },
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = parse_args();
    let config = load_config(&args);
    let ticks = args.ticks_override.unwrap_or(config.run.ticks);

    log::info!("sangha-map starting");
    log::info!("  Agents: {}", config.world.num_agents);
    log::info!(
        "  World: {}x{}, noise gain {}",
        config.world.width,
        config.world.height,
        config.sensor.noise_scale
    );
    log::info!(
        "  Consensus self weight: {}, gradient step: {}",
        config.consensus.self_weight,
        config.gradient.step_size
    );
    if ticks == 0 {
        log::info!("  Ticks: unbounded (Ctrl-C to stop)");
    } else {
        log::info!("  Ticks: {}", ticks);
    }

    // Setup signal handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .expect("Error setting Ctrl-C handler");

    if let Err(e) = run(&config, ticks, running) {
        log::error!("Daemon error: {}", e);
        std::process::exit(1);
    }

    log::info!("sangha-map shutdown complete");
}

// ============================================================================
// Tick Loop
// ============================================================================

fn run(
    config: &Config,
    ticks: u64,
    running: Arc<AtomicBool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let sim_config = build_simulation_config(config);
    let mut sim = Simulation::new(sim_config)?;

    // Driver-side randomness stays separate from the simulation seed
    // so motion choices never perturb the measurement stream.
    let mut walk_rng = StdRng::seed_from_u64(config.world.seed.wrapping_add(0x5eed));

    while running.load(Ordering::Relaxed) && (ticks == 0 || sim.ticks() < ticks) {
        if config.run.random_walk {
            for agent in sim.agents_mut() {
                agent.command = MotionCommand::new(
                    walk_rng.random_range(-1..=1) as f32,
                    walk_rng.random_range(-1..=1) as f32,
                );
            }
            sim.advance_agents();
        }

        sim.tick()?;

        if config.run.log_interval > 0 && sim.ticks() % config.run.log_interval == 0 {
            log_progress(&sim);
        }
    }

    log_summary(&sim);
    Ok(())
}

fn log_progress(sim: &Simulation) {
    let stats = compute_team_error(sim.agents(), sim.landmarks());
    let costs: Vec<f32> = sim
        .agents()
        .iter()
        .flat_map(|a| a.costs().iter().map(|c| c.cost()))
        .collect();
    let cost_stats = SampleStats::compute(&costs);

    log::info!(
        "tick {}: rmse {:.2}px, worst {:.2}px, disagreement {:.2}px, mean cost {:.3}",
        sim.ticks(),
        stats.rmse,
        stats.max_error,
        stats.max_disagreement,
        cost_stats.map(|s| s.mean).unwrap_or(0.0)
    );
}

fn log_summary(sim: &Simulation) {
    let stats = compute_team_error(sim.agents(), sim.landmarks());

    log::info!("finished after {} ticks", sim.ticks());
    log::info!(
        "  rmse {:.2}px, worst {:.2}px, disagreement {:.2}px",
        stats.rmse,
        stats.max_error,
        stats.max_disagreement
    );
    if sim.degenerate_skips() > 0 {
        log::info!("  degenerate gradient skips: {}", sim.degenerate_skips());
    }

    for (i, landmark) in sim.landmarks().iter().enumerate() {
        log::info!("  landmark {} at ({:.1}, {:.1})", i, landmark.x, landmark.y);
        for agent in sim.agents() {
            let estimate = agent.costs()[i].estimate();
            log::info!(
                "    {} estimates ({:.1}, {:.1})",
                agent.id(),
                estimate.x,
                estimate.y
            );
        }
    }
}
