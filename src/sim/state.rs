//! Game state and core simulation types
//!
//! `GameState` is the simulation context every pass receives. Config records
//! are shared read-only; everything that changes per entity lives in the
//! instance structs below.

use std::collections::BTreeMap;
use std::sync::Arc;

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::Clock;
use super::feedback::{CombatFeedback, FinalReveal};
use super::pool::{Handle, Pool};
use super::spawn::SpawnScheduler;
use super::world::WorldStreamer;
use crate::config::{CollectableTypeId, ConfigError, EnemyTypeId, GameConfig, WeaponId};

pub type EnemyHandle = Handle<Enemy>;
pub type ProjectileHandle = Handle<Projectile>;
pub type CollectableHandle = Handle<Collectable>;

/// Why the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Survived to the level time limit
    TimeUp,
    /// Health ran out
    Defeated,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    /// Terminal; nothing in the simulation changes any more
    GameOver(EndReason),
}

/// Signals for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    EnemySpawned { handle: EnemyHandle, kind: EnemyTypeId },
    EnemyKilled { handle: EnemyHandle, position: Vec2, kills: u32 },
    ProjectileFired { handle: ProjectileHandle, weapon: WeaponId },
    ProjectileDestroyed { handle: ProjectileHandle },
    CollectableDropped { handle: CollectableHandle, kind: CollectableTypeId },
    CollectableCollected { handle: CollectableHandle, kind: CollectableTypeId, units: u32 },
    DamageDealt { position: Vec2, amount: f32, critical: bool },
    PlayerDamaged { amount: f32, health_fraction: f32 },
    ChunkChanged { chunk: IVec2 },
    GameOver { reason: EndReason, kills: u32 },
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub active: bool,
    pub speed: f32,
    pub radius: f32,
    pub collection_radius: f32,
    /// Last nonzero movement direction (unit length)
    pub last_move_dir: Vec2,
}

/// Runtime state of one configured weapon
#[derive(Debug, Clone)]
pub struct WeaponState {
    pub id: WeaponId,
    /// Game time at which the weapon may fire next
    pub next_fire_time: f32,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub weapon: WeaponId,
    pub pos: Vec2,
    /// Unit travel direction (unused while orbiting)
    pub dir: Vec2,
    /// Seconds alive
    pub age: f32,
    /// Orbit angle, circling projectiles only
    pub orbit_angle: f32,
}

/// Wall collision mode used to escape stuck spots
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WallMode {
    Normal,
    CollisionDisabled { timer: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactState {
    pub in_contact: bool,
    /// Fixed-step time of the last damage application
    pub last_damage_time: f32,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyTypeId,
    pub pos: Vec2,
    pub health: f32,
    pub radius: f32,
    /// Position at the previous fixed tick
    pub last_pos: Vec2,
    pub stationary_time: f32,
    pub contact: ContactState,
    pub wall_mode: WallMode,
}

impl Enemy {
    pub fn new(kind: EnemyTypeId, pos: Vec2, health: f32, radius: f32) -> Self {
        Self {
            kind,
            pos,
            health,
            radius,
            last_pos: pos,
            stationary_time: 0.0,
            contact: ContactState {
                in_contact: false,
                last_damage_time: -1.0,
            },
            wall_mode: WallMode::Normal,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn collides_with_walls(&self) -> bool {
        self.wall_mode == WallMode::Normal
    }
}

/// Pulsing halo around a collectable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    /// Phase accumulator, randomized at creation so pickups pulse out of step
    pub phase: f32,
    /// Scale multiplier in [radius_min, radius_max]
    pub scale: f32,
    /// Alpha in [brightness_min, brightness_max]
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct Collectable {
    pub kind: CollectableTypeId,
    pub pos: Vec2,
    pub glow: Option<Glow>,
}

/// Live entities, owned in one place
#[derive(Debug, Default)]
pub struct EntityPools {
    pub enemies: Pool<Enemy>,
    pub projectiles: Pool<Projectile>,
    pub collectables: Pool<Collectable>,
}

/// Units collected per collectable name. Only ever grows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrencyLedger {
    balances: BTreeMap<String, u64>,
}

impl CurrencyLedger {
    pub fn credit(&mut self, name: &str, units: u32) -> u64 {
        let balance = self.balances.entry(name.to_string()).or_insert(0);
        *balance += units as u64;
        *balance
    }

    pub fn balance(&self, name: &str) -> u64 {
        self.balances.get(name).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.balances.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    pub config: Arc<GameConfig>,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub clock: Clock,
    /// Accumulated fixed-step time (drives contact damage timing)
    pub physics_time: f32,
    pub phase: GamePhase,
    pub player: Player,
    pub weapons: Vec<WeaponState>,
    pub pools: EntityPools,
    pub spawner: SpawnScheduler,
    pub world: WorldStreamer,
    pub feedback: CombatFeedback,
    pub ledger: CurrencyLedger,
    pub total_kills: u32,
    pub total_units: u64,
    pub final_reveal: Option<FinalReveal>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Validate the config and set up a fresh run
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let config = Arc::new(config);

        let p = &config.player;
        let player = Player {
            pos: p.initial_position,
            health: p.max_health,
            max_health: p.max_health,
            active: true,
            speed: p.speed,
            radius: p.scale.max_element() * 0.5,
            collection_radius: p.collection_radius,
            last_move_dir: Vec2::X,
        };

        let weapons = (0..config.weapons.len())
            .map(|i| WeaponState {
                id: WeaponId(i),
                next_fire_time: 0.0,
            })
            .collect();

        for (i, e) in config.enemy_types.iter().enumerate() {
            log::debug!("Enemy type {}: {} (active: {})", i, e.name, e.active);
            let missing = config.collectable_by_name(&e.collectable_name).is_none();
            if !e.collectable_name.is_empty() && missing {
                log::warn!(
                    "Enemy type '{}' drops unknown collectable '{}'",
                    e.name,
                    e.collectable_name
                );
            }
        }

        let spawner = SpawnScheduler::new(&config);
        let world = WorldStreamer::new(config.map.tile_size, config.map.grid_span, player.pos);
        // Distinct stream for cosmetic rolls
        let feedback =
            CombatFeedback::new(config.damage_text.clone(), seed ^ 0x9E37_79B9_7F4A_7C15);

        log::info!(
            "New run (seed {}): {} weapons, {} enemy types, {} spawner events",
            seed,
            config.weapons.len(),
            config.enemy_types.len(),
            config.spawner_events.len()
        );

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            clock: Clock::default(),
            physics_time: 0.0,
            phase: GamePhase::Playing,
            player,
            weapons,
            pools: EntityPools::default(),
            spawner,
            world,
            feedback,
            ledger: CurrencyLedger::default(),
            total_kills: 0,
            total_units: 0,
            final_reveal: None,
            events: Vec::new(),
            config,
        })
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver(_))
    }

    /// True while the simulation may still change
    pub fn is_running(&self) -> bool {
        self.player.active && !self.is_over()
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn health_fraction(&self) -> f32 {
        (self.player.health / self.player.max_health).clamp(0.0, 1.0)
    }

    /// Player position rounded for the coordinate readout
    pub fn player_coordinates(&self) -> (i32, i32) {
        (self.player.pos.x.round() as i32, self.player.pos.y.round() as i32)
    }

    pub fn tiles(&self) -> &[Vec2] {
        self.world.tiles()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn total_kills(&self) -> u32 {
        self.total_kills
    }

    pub fn total_units(&self) -> u64 {
        self.total_units
    }

    pub fn ledger(&self) -> &CurrencyLedger {
        &self.ledger
    }

    /// Present only after the terminal transition
    pub fn final_reveal(&self) -> Option<&FinalReveal> {
        self.final_reveal.as_ref()
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand all pending events to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply contact damage to the player. Health is floored at zero.
    pub fn damage_player(&mut self, amount: f32) {
        if !self.is_running() {
            return;
        }
        self.player.health = (self.player.health - amount).max(0.0);
        self.feedback.spawn(self.player.pos, amount, false);
        let health_fraction = self.health_fraction();
        self.push_event(GameEvent::PlayerDamaged {
            amount,
            health_fraction,
        });
        log::debug!("Player health: {}", self.player.health);

        if self.player.health <= 0.0 {
            log::info!("Player defeated!");
            self.end_game(EndReason::Defeated);
        }
    }

    /// One-way switch into the terminal state
    pub fn end_game(&mut self, reason: EndReason) {
        if self.is_over() {
            return;
        }
        self.phase = GamePhase::GameOver(reason);
        self.player.active = false;
        self.final_reveal = Some(FinalReveal::new(self.total_kills));
        self.push_event(GameEvent::GameOver {
            reason,
            kills: self.total_kills,
        });
        log::info!("Game over ({:?}) - total kills: {}", reason, self.total_kills);
    }
}
