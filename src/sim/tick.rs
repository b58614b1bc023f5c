//! Fixed and frame pass orchestration
//!
//! The fixed pass runs at `SIM_DT` and owns everything physical. The frame
//! pass runs once per rendered frame with the real frame delta.

use glam::Vec2;

use super::physics::Physics;
use super::state::{EndReason, GameEvent, GameState};
use super::{combat, magnet, movement, spawn};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Raw movement axis, normalized before use
    pub movement: Vec2,
    /// Hold to run the clock faster
    pub accelerate: bool,
}

/// Advance the physical simulation by one fixed timestep.
///
/// Order matters: shots fired here are checked for hits in the same pass,
/// and dead enemies are gone before enemy movement runs.
pub fn fixed_tick(state: &mut GameState, input: &TickInput, physics: &dyn Physics, dt: f32) {
    if !state.is_running() {
        return;
    }
    state.physics_time += dt;

    movement::move_player(state, input.movement, physics, dt);
    movement::fire_weapons(state);
    combat::update_projectiles(state, physics, dt);
    movement::update_enemies(state, physics, dt);

    if !state.is_running() {
        return;
    }
    if let Some(chunk) = state.world.update(state.player.pos) {
        log::debug!("Player entered chunk {}", chunk);
        state.push_event(GameEvent::ChunkChanged { chunk });
    }
}

/// Advance the clock, spawns, collectables and presentation timers by one frame
pub fn frame_tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.feedback.update(dt);
    if let Some(reveal) = state.final_reveal.as_mut() {
        reveal.update(dt);
    }

    if state.is_over() {
        return;
    }
    if state.clock.advance(dt, input.accelerate) {
        log::info!("Level complete!");
        state.end_game(EndReason::TimeUp);
        return;
    }

    spawn::update(state);
    magnet::update(state, dt);
}
