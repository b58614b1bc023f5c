//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform code:
//! - Physics runs on a fixed timestep, the clock and spawns on frame time
//! - Seeded RNG only
//! - Stable iteration order (entity insertion order)

pub mod clock;
pub mod combat;
pub mod feedback;
pub mod magnet;
pub mod movement;
pub mod physics;
pub mod pool;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod world;

pub use clock::Clock;
pub use feedback::{CombatFeedback, DamageIndicator, FinalReveal};
pub use physics::{OpenField, Physics, Wall, Walls};
pub use pool::{Handle, Pool};
pub use state::{
    Collectable, CurrencyLedger, EndReason, Enemy, GameEvent, GamePhase, GameState, Player,
    Projectile, WallMode,
};
pub use tick::{TickInput, fixed_tick, frame_tick};
pub use world::WorldStreamer;
