//! Game configuration
//!
//! Weapons, enemy types, the spawn schedule and collectables are plain data,
//! loaded from JSON or taken from the built-in demo defaults. Records are
//! immutable once a run starts; entities refer to them by index.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA color
pub type Color = [f32; 4];

/// Fatal configuration problems. The simulation refuses to start on any of these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("weapon '{name}' has non-positive fire rate {rate}")]
    FireRate { name: String, rate: f32 },

    #[error("weapon '{name}' has negative damage {damage}")]
    WeaponDamage { name: String, damage: f32 },

    #[error("weapon '{name}' has negative crit damage {min}")]
    CritDamage { name: String, min: f32 },

    #[error("weapon '{name}' has crit range {min}..{max} (min above max)")]
    CritRange { name: String, min: f32, max: f32 },

    #[error("weapon '{name}' has crit chance {chance} outside [0, 1]")]
    CritChance { name: String, chance: f32 },

    #[error("enemy type '{name}' has negative contact damage {damage}")]
    EnemyDamage { name: String, damage: f32 },

    #[error("enemy type '{name}' has non-positive health {health}")]
    EnemyHealth { name: String, health: f32 },

    #[error("enemy type '{name}' has drop rate {rate} outside [0, 100]")]
    DropRate { name: String, rate: f32 },

    #[error("spawner event for '{spawn_type}' has non-positive interval {interval}")]
    SpawnInterval { spawn_type: String, interval: f32 },

    #[error("tile size must be positive, got {0}")]
    TileSize(Vec2),

    #[error("tile grid span must be odd and non-zero, got {0}")]
    GridSpan(u32),

    #[error("player max health must be positive, got {0}")]
    MaxHealth(f32),

    #[error("damage indicator duration must be positive, got {0}")]
    IndicatorDuration(f32),
}

/// Index of a weapon in [`GameConfig::weapons`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeaponId(pub usize);

/// Index of an enemy type in [`GameConfig::enemy_types`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnemyTypeId(pub usize);

/// Index of a collectable type in [`GameConfig::collectables`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectableTypeId(pub usize);

/// How a weapon picks its shot directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FiringPattern {
    /// One shot along the player's last movement direction
    #[default]
    LastMovedDirection,
    /// One shot at the closest enemy (nothing if there are none)
    NearestEnemy,
    /// One projectile orbiting the player, never expires
    CirclingPlayer,
    FourPoint,
    EightPoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    pub name: String,
    pub active: bool,
    /// Projectile speed (orbit speed for circling weapons)
    pub speed: f32,
    /// Shots per second
    pub rate: f32,
    pub scale: Vec2,
    pub damage: f32,
    pub min_crit_damage: f32,
    pub max_crit_damage: f32,
    /// Probability in [0, 1]
    pub crit_chance: f32,
    pub pattern: FiringPattern,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            name: "Weapon".to_string(),
            active: true,
            speed: 5.0,
            rate: 2.0,
            scale: Vec2::ONE,
            damage: 10.0,
            min_crit_damage: 15.0,
            max_crit_damage: 25.0,
            crit_chance: 0.1,
            pattern: FiringPattern::LastMovedDirection,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTypeConfig {
    pub name: String,
    pub active: bool,
    pub size: Vec2,
    pub speed: f32,
    pub health: f32,
    /// Contact damage dealt to the player
    pub damage: f32,
    /// Collectable dropped on death (empty = none)
    pub collectable_name: String,
    /// Drop chance in [0, 100]
    pub drop_rate: f32,
}

impl Default for EnemyTypeConfig {
    fn default() -> Self {
        Self {
            name: "Enemy".to_string(),
            active: true,
            size: Vec2::ONE,
            speed: 3.0,
            health: 50.0,
            damage: 10.0,
            collectable_name: String::new(),
            drop_rate: 100.0,
        }
    }
}

impl EnemyTypeConfig {
    /// Collision radius derived from the visual size
    pub fn body_radius(&self) -> f32 {
        self.size.max_element() * 0.5
    }
}

/// Side of the player a wave appears on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpawnDirection {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl SpawnDirection {
    pub fn offset(self) -> Vec2 {
        match self {
            SpawnDirection::Up => Vec2::Y,
            SpawnDirection::Down => Vec2::NEG_Y,
            SpawnDirection::Left => Vec2::NEG_X,
            SpawnDirection::Right => Vec2::X,
        }
    }
}

/// Spread of a wave around its base point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dispersion {
    #[default]
    None,
    Random,
    Swarm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerEvent {
    /// Name of an active enemy type
    pub spawn_type: String,
    pub amount: u32,
    pub interval: f32,
    pub start_time: f32,
    pub end_time: f32,
    pub direction: SpawnDirection,
    pub dispersion: Dispersion,
}

impl Default for SpawnerEvent {
    fn default() -> Self {
        Self {
            spawn_type: String::new(),
            amount: 1,
            interval: 5.0,
            start_time: 0.0,
            end_time: 60.0,
            direction: SpawnDirection::Up,
            dispersion: Dispersion::None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowConfig {
    pub enabled: bool,
    pub color: Color,
    pub radius_min: f32,
    pub radius_max: f32,
    pub brightness_min: f32,
    pub brightness_max: f32,
    pub speed: f32,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            color: [1.0, 1.0, 0.0, 1.0],
            radius_min: 1.2,
            radius_max: 1.5,
            brightness_min: 0.3,
            brightness_max: 0.8,
            speed: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectableTypeConfig {
    pub name: String,
    pub unit_value: u32,
    pub scale: Vec2,
    pub color: Color,
    pub glow: GlowConfig,
}

impl Default for CollectableTypeConfig {
    fn default() -> Self {
        Self {
            name: "Collectable".to_string(),
            unit_value: 1,
            scale: Vec2::splat(0.2),
            color: [1.0, 1.0, 1.0, 1.0],
            glow: GlowConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub initial_position: Vec2,
    pub scale: Vec2,
    pub speed: f32,
    pub max_health: f32,
    /// Collectables inside this radius fly to the player
    pub collection_radius: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            initial_position: Vec2::new(2.0, 2.0),
            scale: Vec2::ONE,
            speed: 5.0,
            max_health: 100.0,
            collection_radius: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// World size of one terrain tile (and of one chunk)
    pub tile_size: Vec2,
    /// Tiles per axis in the recycled pool (odd)
    pub grid_span: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_size: Vec2::new(18.0, 10.0),
            grid_span: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageTextConfig {
    pub duration: f32,
    /// Rise distance over the full duration
    pub speed: f32,
    pub offset: Vec2,
    pub min_font_size: f32,
    pub max_font_size: f32,
    pub critical_color: Color,
    pub standard_color: Color,
}

impl Default for DamageTextConfig {
    fn default() -> Self {
        Self {
            duration: 0.5,
            speed: 2.0,
            offset: Vec2::new(0.0, 0.5),
            min_font_size: 2.0,
            max_font_size: 4.0,
            critical_color: [1.0, 0.0, 0.0, 1.0],
            standard_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Complete run configuration
///
/// Omitted tables in a JSON file take their defaults, but omitted lists are
/// empty rather than the demo content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    #[serde(default)]
    pub weapons: Vec<WeaponConfig>,
    #[serde(default)]
    pub enemy_types: Vec<EnemyTypeConfig>,
    #[serde(default)]
    pub spawner_events: Vec<SpawnerEvent>,
    #[serde(default)]
    pub collectables: Vec<CollectableTypeConfig>,
    pub map: MapConfig,
    pub damage_text: DamageTextConfig,
}

impl Default for GameConfig {
    /// Demo configuration: a starter loadout and a twenty minute wave schedule
    fn default() -> Self {
        let gem = CollectableTypeConfig {
            name: "Gem".to_string(),
            unit_value: 1,
            color: [0.3, 0.8, 1.0, 1.0],
            glow: GlowConfig {
                enabled: true,
                color: [0.3, 0.8, 1.0, 1.0],
                ..GlowConfig::default()
            },
            ..CollectableTypeConfig::default()
        };
        let gold = CollectableTypeConfig {
            name: "Gold".to_string(),
            unit_value: 5,
            scale: Vec2::splat(0.3),
            color: [1.0, 0.85, 0.2, 1.0],
            ..CollectableTypeConfig::default()
        };

        let weapons = vec![
            WeaponConfig {
                name: "Blaster".to_string(),
                ..WeaponConfig::default()
            },
            WeaponConfig {
                name: "Seeker".to_string(),
                speed: 8.0,
                rate: 1.0,
                damage: 15.0,
                pattern: FiringPattern::NearestEnemy,
                ..WeaponConfig::default()
            },
            WeaponConfig {
                name: "Orbiter".to_string(),
                speed: 1.5,
                rate: 0.1,
                damage: 5.0,
                crit_chance: 0.0,
                pattern: FiringPattern::CirclingPlayer,
                ..WeaponConfig::default()
            },
            WeaponConfig {
                name: "Cross".to_string(),
                active: false,
                rate: 0.5,
                pattern: FiringPattern::FourPoint,
                ..WeaponConfig::default()
            },
            WeaponConfig {
                name: "Nova".to_string(),
                active: false,
                rate: 0.25,
                pattern: FiringPattern::EightPoint,
                ..WeaponConfig::default()
            },
        ];

        let enemy_types = vec![
            EnemyTypeConfig {
                name: "Slime".to_string(),
                speed: 2.5,
                health: 20.0,
                damage: 5.0,
                collectable_name: "Gem".to_string(),
                drop_rate: 80.0,
                ..EnemyTypeConfig::default()
            },
            EnemyTypeConfig {
                name: "Bat".to_string(),
                size: Vec2::splat(0.7),
                speed: 4.0,
                health: 10.0,
                damage: 3.0,
                collectable_name: "Gem".to_string(),
                drop_rate: 50.0,
                ..EnemyTypeConfig::default()
            },
            EnemyTypeConfig {
                name: "Brute".to_string(),
                size: Vec2::splat(1.6),
                speed: 1.5,
                health: 150.0,
                damage: 20.0,
                collectable_name: "Gold".to_string(),
                drop_rate: 100.0,
                ..EnemyTypeConfig::default()
            },
        ];

        let spawner_events = vec![
            SpawnerEvent {
                spawn_type: "Slime".to_string(),
                amount: 3,
                interval: 4.0,
                start_time: 0.0,
                end_time: 600.0,
                direction: SpawnDirection::Up,
                dispersion: Dispersion::Random,
            },
            SpawnerEvent {
                spawn_type: "Bat".to_string(),
                amount: 6,
                interval: 10.0,
                start_time: 60.0,
                end_time: 1200.0,
                direction: SpawnDirection::Left,
                dispersion: Dispersion::Swarm,
            },
            SpawnerEvent {
                spawn_type: "Slime".to_string(),
                amount: 5,
                interval: 6.0,
                start_time: 300.0,
                end_time: 1200.0,
                direction: SpawnDirection::Down,
                dispersion: Dispersion::Random,
            },
            SpawnerEvent {
                spawn_type: "Brute".to_string(),
                amount: 1,
                interval: 30.0,
                start_time: 180.0,
                end_time: 1200.0,
                direction: SpawnDirection::Right,
                dispersion: Dispersion::None,
            },
        ];

        Self {
            player: PlayerConfig::default(),
            weapons,
            enemy_types,
            spawner_events,
            collectables: vec![gem, gold],
            map: MapConfig::default(),
            damage_text: DamageTextConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded config: {} weapons, {} enemy types, {} spawner events, {} collectables",
            config.weapons.len(),
            config.enemy_types.len(),
            config.spawner_events.len(),
            config.collectables.len()
        );
        Ok(config)
    }

    /// Check every record that would leave the simulation half-configured
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.player.max_health > 0.0) {
            return Err(ConfigError::MaxHealth(self.player.max_health));
        }
        for w in &self.weapons {
            if !(w.rate > 0.0) {
                return Err(ConfigError::FireRate {
                    name: w.name.clone(),
                    rate: w.rate,
                });
            }
            if !(w.damage >= 0.0) {
                return Err(ConfigError::WeaponDamage {
                    name: w.name.clone(),
                    damage: w.damage,
                });
            }
            if !(w.min_crit_damage >= 0.0) {
                return Err(ConfigError::CritDamage {
                    name: w.name.clone(),
                    min: w.min_crit_damage,
                });
            }
            if w.min_crit_damage > w.max_crit_damage {
                return Err(ConfigError::CritRange {
                    name: w.name.clone(),
                    min: w.min_crit_damage,
                    max: w.max_crit_damage,
                });
            }
            if !(0.0..=1.0).contains(&w.crit_chance) {
                return Err(ConfigError::CritChance {
                    name: w.name.clone(),
                    chance: w.crit_chance,
                });
            }
        }
        for e in &self.enemy_types {
            if !(e.damage >= 0.0) {
                return Err(ConfigError::EnemyDamage {
                    name: e.name.clone(),
                    damage: e.damage,
                });
            }
            if !(e.health > 0.0) {
                return Err(ConfigError::EnemyHealth {
                    name: e.name.clone(),
                    health: e.health,
                });
            }
            if !(0.0..=100.0).contains(&e.drop_rate) {
                return Err(ConfigError::DropRate {
                    name: e.name.clone(),
                    rate: e.drop_rate,
                });
            }
        }
        for ev in &self.spawner_events {
            if !(ev.interval > 0.0) {
                return Err(ConfigError::SpawnInterval {
                    spawn_type: ev.spawn_type.clone(),
                    interval: ev.interval,
                });
            }
        }
        if !(self.map.tile_size.x > 0.0 && self.map.tile_size.y > 0.0) {
            return Err(ConfigError::TileSize(self.map.tile_size));
        }
        if self.map.grid_span % 2 == 0 {
            return Err(ConfigError::GridSpan(self.map.grid_span));
        }
        if !(self.damage_text.duration > 0.0) {
            return Err(ConfigError::IndicatorDuration(self.damage_text.duration));
        }
        Ok(())
    }

    /// Names of the enemy types spawner events may reference
    pub fn active_enemy_names(&self) -> Vec<&str> {
        self.enemy_types
            .iter()
            .filter(|e| e.active)
            .map(|e| e.name.as_str())
            .collect()
    }

    /// Find an active enemy type by name
    pub fn enemy_type_by_name(&self, name: &str) -> Option<EnemyTypeId> {
        self.enemy_types
            .iter()
            .position(|e| e.active && e.name == name)
            .map(EnemyTypeId)
    }

    /// Find a collectable type by name
    pub fn collectable_by_name(&self, name: &str) -> Option<CollectableTypeId> {
        self.collectables
            .iter()
            .position(|c| c.name == name)
            .map(CollectableTypeId)
    }

    pub fn weapon(&self, id: WeaponId) -> &WeaponConfig {
        &self.weapons[id.0]
    }

    pub fn enemy_type(&self, id: EnemyTypeId) -> &EnemyTypeConfig {
        &self.enemy_types[id.0]
    }

    pub fn collectable(&self, id: CollectableTypeId) -> &CollectableTypeConfig {
        &self.collectables[id.0]
    }
}
