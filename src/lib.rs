//! Arena Survivor - simulation core for a top-down survival arena game
//!
//! Core modules:
//! - `sim`: Simulation (entity pools, combat, movement, spawning, streaming)
//! - `config`: Data-driven weapons, enemies, spawn schedule and collectables

pub mod config;
pub mod sim;

pub use config::{ConfigError, GameConfig};

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz physics)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Elapsed game time at which the level ends (20:00)
    pub const LEVEL_END_TIME: f32 = 1200.0;
    /// Clock multiplier while the accelerate input is held
    pub const TIME_ACCELERATION: f32 = 15.0;

    /// Projectile-enemy hit distance
    pub const HIT_RADIUS: f32 = 0.5;
    /// Radius checked against walls for travelling projectiles
    pub const PROJECTILE_WALL_RADIUS: f32 = 0.2;
    /// Seconds before a non-circling projectile expires
    pub const PROJECTILE_LIFETIME: f32 = 5.0;
    /// Orbit radius of circling projectiles
    pub const ORBIT_RADIUS: f32 = 2.0;
    /// Orbit angular speed per unit of weapon speed
    pub const ORBIT_SPEED_FACTOR: f32 = 2.0;

    /// Per-tick displacement below which an enemy counts as stationary
    pub const STUCK_DISPLACEMENT: f32 = 0.05;
    /// Stationary time before an enemy ignores walls
    pub const STUCK_TIME: f32 = 1.5;
    /// How long wall collision stays disabled
    pub const COLLISION_DISABLE_TIME: f32 = 0.5;

    /// Enemy-player distance that counts as contact
    pub const CONTACT_DISTANCE: f32 = 1.0;
    /// Minimum gap between contact damage applications
    pub const CONTACT_DAMAGE_INTERVAL: f32 = 1.0;

    /// Distance from the player at which waves appear
    pub const SPAWN_DISTANCE: f32 = 20.0;
    /// Dispersion radius for random spawns
    pub const RANDOM_SPREAD: f32 = 5.0;
    /// Dispersion radius for swarm spawns
    pub const SWARM_SPREAD: f32 = 1.0;

    /// Max scatter of dropped loot around the dead enemy
    pub const LOOT_SCATTER: f32 = 0.5;
    /// Speed at which collectables fly toward the player
    pub const ATTRACTION_SPEED: f32 = 5.0;
    /// Distance at which a collectable is picked up
    pub const PICKUP_DISTANCE: f32 = 0.1;

    /// Final score flash sequence
    pub const FLASH_DURATION: f32 = 2.0;
    pub const FLASH_INTERVAL: f32 = 0.5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Uniform random point inside a disk of the given radius
pub fn random_in_disk<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec2 {
    // sqrt keeps the density uniform over the area
    let r = radius * rng.random::<f32>().sqrt();
    let theta = rng.random_range(0.0..std::f32::consts::TAU);
    polar_to_cartesian(r, theta)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
