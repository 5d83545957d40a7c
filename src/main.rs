//! Pendulum Hop entry point
//!
//! The native binary is a headless tool: solve and inspect pendulums, run a
//! scripted stage, or print colour ramps.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::error::Error;
    use std::path::PathBuf;

    use clap::{Parser, Subcommand};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use pendulum_hop::palette::{gradation, parse_hex_color};
    use pendulum_hop::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use pendulum_hop::solver::{ChainSpec, ChainState, PendulumSolver, Trajectory, kinematics};
    use pendulum_hop::{Difficulty, Settings};

    type CliResult = Result<(), Box<dyn Error>>;

    #[derive(Parser)]
    #[command(name = "pendulum-hop")]
    #[command(about = "Multi-bob pendulum solver and headless Pendulum Hop runner")]
    pub struct Cli {
        /// Settings file (JSON); defaults are used when it does not exist
        #[arg(long, global = true, default_value = "settings.json")]
        settings: PathBuf,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Solve one pendulum and print a summary (or the full trajectory)
        Simulate {
            /// Seed for the random chain draw
            #[arg(long, default_value_t = 0)]
            seed: u64,
            /// Explicit segment lengths, comma separated (overrides the random draw)
            #[arg(long, value_delimiter = ',', requires_all = ["masses", "angles"])]
            lengths: Option<Vec<f64>>,
            /// Explicit bob masses
            #[arg(long, value_delimiter = ',')]
            masses: Option<Vec<f64>>,
            /// Explicit initial angles (radians)
            #[arg(long, value_delimiter = ',')]
            angles: Option<Vec<f64>>,
            /// Explicit initial angular velocities; zero when omitted
            #[arg(long, value_delimiter = ',')]
            velocities: Option<Vec<f64>>,
            /// Print every frame as JSON
            #[arg(long)]
            json: bool,
        },
        /// Run a stage headless with a scripted player
        Demo {
            #[arg(long, default_value_t = 0)]
            seed: u64,
            /// Ticks to run
            #[arg(long, default_value_t = 900)]
            ticks: u64,
            /// Calm, Normal or Frantic (overrides the settings file)
            #[arg(long)]
            difficulty: Option<String>,
        },
        /// Print a colour ramp between two hex colours
        Gradient { start: String, end: String, steps: usize },
        /// Write the current settings (or defaults) to the settings file
        InitSettings,
    }

    pub fn run(cli: Cli) -> CliResult {
        let settings = Settings::load(&cli.settings)?;
        match cli.command {
            Commands::Simulate {
                seed,
                lengths,
                masses,
                angles,
                velocities,
                json,
            } => {
                let (chain, initial) = match (lengths, masses, angles) {
                    (Some(lengths), Some(masses), Some(angles)) => {
                        let velocities = velocities.unwrap_or_else(|| vec![0.0; angles.len()]);
                        (
                            ChainSpec::from_slices(&lengths, &masses)?,
                            ChainState::new(angles, velocities),
                        )
                    }
                    _ => settings
                        .ranges
                        .draw(&mut Pcg32::seed_from_u64(seed), settings.bob_count())?,
                };
                simulate(&settings, chain, initial, json)
            }
            Commands::Demo {
                seed,
                ticks,
                difficulty,
            } => {
                let mut settings = settings;
                if let Some(name) = difficulty {
                    settings.difficulty = Difficulty::from_str(&name)
                        .ok_or_else(|| format!("unknown difficulty {name:?}"))?;
                }
                demo(&settings, seed, ticks)
            }
            Commands::Gradient { start, end, steps } => {
                let ramp = gradation(parse_hex_color(&start)?, parse_hex_color(&end)?, steps)?;
                for color in ramp {
                    println!("0x{color:06X}");
                }
                Ok(())
            }
            Commands::InitSettings => {
                settings.save(&cli.settings)?;
                Ok(())
            }
        }
    }

    fn simulate(settings: &Settings, chain: ChainSpec, initial: ChainState, json: bool) -> CliResult {
        let horizon = settings.horizon()?;
        let solver = PendulumSolver::new(chain, settings.integrator);
        let states = solver.solve_states(&initial, &horizon)?;
        let frames = states
            .iter()
            .map(|s| kinematics::joint_positions(solver.chain(), &s.angles))
            .collect();
        let trajectory = Trajectory::new(horizon.duration, frames);

        if json {
            println!("{}", serde_json::to_string_pretty(&trajectory)?);
            return Ok(());
        }

        let e0 = kinematics::energy(solver.chain(), &initial);
        let e1 = states
            .last()
            .map(|s| kinematics::energy(solver.chain(), s))
            .unwrap_or(e0);
        println!("bobs:          {}", solver.chain().len());
        println!("reach:         {:.3}", solver.chain().total_length());
        println!("frames:        {}", trajectory.len());
        println!("duration:      {} s", trajectory.duration());
        if let Some(tip) = trajectory.frames().last().and_then(|f| f.tip()) {
            println!("final tip:     ({:.3}, {:.3})", tip.x, tip.y);
        }
        println!("max tip jump:  {:.3}", trajectory.max_tip_jump());
        println!("energy drift:  {:.3e}", (e1 - e0) / e0.abs().max(f64::MIN_POSITIVE));
        Ok(())
    }

    fn demo(settings: &Settings, seed: u64, ticks: u64) -> CliResult {
        let mut state = GameState::new(seed, settings)?;
        for t in 0..ticks {
            // Pace back and forth, hopping every half second
            let input = TickInput {
                right: (t / 120) % 2 == 0,
                left: (t / 120) % 2 == 1,
                jump: t % 30 < 2,
            };
            tick(&mut state, &input);
            for event in &state.events {
                match event {
                    GameEvent::AppleCollected => log::info!("tick {t}: apple (score {})", state.score),
                    GameEvent::PlayerHit => log::info!("tick {t}: hit ({} lives left)", state.lives),
                    GameEvent::GameOver => log::info!("tick {t}: game over"),
                }
            }
            if state.phase == GamePhase::GameOver {
                break;
            }
        }
        println!(
            "seed {} {}: score {} lives {} after {} ticks",
            seed,
            settings.difficulty.as_str(),
            state.score,
            state.lives,
            state.time_ticks
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    if let Err(e) = cli::run(cli::Cli::parse()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the wasm surface; there is no browser front-end here
}
