//! Arena Survivor headless runner
//!
//! Loads a config, drives the simulation with a scripted player until the run
//! ends, and logs a HUD line as it goes.
//!
//! Usage: `arena-survivor [config.json] [seed]`

use std::process::ExitCode;

use glam::Vec2;

use arena_survivor::consts::*;
use arena_survivor::sim::{
    EndReason, GameEvent, GamePhase, GameState, TickInput, Wall, Walls, fixed_tick, frame_tick,
};
use arena_survivor::{ConfigError, GameConfig};

/// Simulated frame deltas; uneven on purpose so the accumulator sees real jitter
const FRAME_PATTERN: [f32; 6] = [
    1.0 / 60.0,
    1.0 / 60.0,
    1.0 / 45.0,
    1.0 / 60.0,
    1.0 / 120.0,
    1.0 / 30.0,
];
/// Frames between HUD lines
const HUD_INTERVAL: u64 = 300;

/// Game instance holding all state
struct Game {
    state: GameState,
    walls: Walls,
    accumulator: f32,
    input: TickInput,
    frames: u64,
}

impl Game {
    fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            state: GameState::new(config, seed)?,
            walls: arena_walls(),
            accumulator: 0.0,
            input: TickInput {
                movement: Vec2::ZERO,
                accelerate: true,
            },
            frames: 0,
        })
    }

    /// Scripted input: a slow circle around the origin
    fn steer(&mut self) {
        let t = self.frames as f32 / 240.0;
        self.input.movement = Vec2::new(-t.sin(), t.cos());
    }

    /// Run one frame: fixed substeps first, then the frame pass
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            fixed_tick(&mut self.state, &self.input, &self.walls, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        frame_tick(&mut self.state, &self.input, dt);
        self.frames += 1;
    }

    fn drain_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::ChunkChanged { chunk } => log::debug!("Chunk {}", chunk),
                GameEvent::PlayerDamaged {
                    health_fraction, ..
                } => log::debug!("Health {:.0}%", health_fraction * 100.0),
                GameEvent::GameOver { reason, kills } => {
                    log::info!("Run over: {:?} with {} kills", reason, kills)
                }
                _ => {}
            }
        }
    }

    fn log_hud(&self) {
        let (minutes, seconds) = self.state.clock.minutes_seconds();
        let (x, y) = self.state.player_coordinates();
        log::info!(
            "{:02}:{:02} | kills {} | units {} | X: {}, Y: {} | health {:.0}%",
            minutes,
            seconds,
            self.state.total_kills(),
            self.state.total_units(),
            x,
            y,
            self.state.health_fraction() * 100.0
        );
    }

    fn print_summary(&self) {
        let outcome = match self.state.phase() {
            GamePhase::GameOver(EndReason::TimeUp) => "Survived",
            GamePhase::GameOver(EndReason::Defeated) => "Defeated",
            GamePhase::Playing => "Unfinished",
        };
        let (minutes, seconds) = self.state.clock.minutes_seconds();
        println!("{} at {:02}:{:02} (seed {})", outcome, minutes, seconds, self.state.seed);
        println!("Kills: {}", self.state.total_kills());
        println!("Units: {}", self.state.total_units());
        for (name, units) in self.state.ledger().iter() {
            println!("  {}: {}", name, units);
        }
    }
}

/// A handful of obstacles around the start so pursuit has something to get stuck on
fn arena_walls() -> Walls {
    Walls::new(vec![
        Wall::Circle {
            center: Vec2::new(12.0, 6.0),
            radius: 2.0,
        },
        Wall::Box {
            center: Vec2::new(-10.0, -8.0),
            half_extents: Vec2::new(1.0, 6.0),
        },
        Wall::Box {
            center: Vec2::new(0.0, 15.0),
            half_extents: Vec2::new(8.0, 1.0),
        },
    ])
}

fn load_config(path: Option<&str>) -> Result<GameConfig, ConfigError> {
    match path {
        Some(path) => GameConfig::load(path),
        None => {
            log::info!("No config given, using the built-in demo");
            Ok(GameConfig::default())
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Arena Survivor (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config_path = args.next();
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("Invalid seed: {}", e);
            return ExitCode::FAILURE;
        }
        None => 12345,
    };

    let mut game = match load_config(config_path.as_deref()).and_then(|c| Game::new(c, seed)) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    while !game.state.is_over() {
        game.steer();
        let dt = FRAME_PATTERN[(game.frames % FRAME_PATTERN.len() as u64) as usize];
        game.update(dt);
        game.drain_events();
        if game.frames % HUD_INTERVAL == 0 {
            game.log_hud();
        }
    }

    // Let the final reveal play out
    while game
        .state
        .final_reveal()
        .is_some_and(|reveal| !reveal.is_finished())
    {
        game.update(1.0 / 60.0);
    }

    game.log_hud();
    game.print_summary();
    ExitCode::SUCCESS
}
