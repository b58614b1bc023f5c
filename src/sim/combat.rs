//! Projectile flight, hit resolution, death and loot
//!
//! Projectiles are checked against enemies in spawn order and take the first
//! enemy in range, not the closest one. A projectile deals at most one hit
//! per tick. Travelling shots die on impact; orbiting shots keep going.

use rand::Rng;

use super::physics::Physics;
use super::state::{Collectable, EnemyHandle, GameEvent, GameState, Glow, ProjectileHandle};
use crate::config::{FiringPattern, WeaponConfig};
use crate::consts::*;
use crate::{lerp, normalize_angle, polar_to_cartesian, random_in_disk};

/// Result of one hit roll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRoll {
    pub damage: f32,
    pub critical: bool,
}

/// Roll damage for one hit: a crit replaces base damage with a value in the crit range
pub fn roll_damage<R: Rng + ?Sized>(rng: &mut R, weapon: &WeaponConfig) -> HitRoll {
    let critical = rng.random::<f32>() < weapon.crit_chance;
    let damage = if !critical {
        weapon.damage
    } else if weapon.max_crit_damage > weapon.min_crit_damage {
        rng.random_range(weapon.min_crit_damage..weapon.max_crit_damage)
    } else {
        weapon.min_crit_damage
    };
    HitRoll { damage, critical }
}

/// Advance every projectile and resolve its hits
pub fn update_projectiles(state: &mut GameState, physics: &dyn Physics, dt: f32) {
    let config = state.config.clone();
    let player_pos = state.player.pos;

    for handle in state.pools.projectiles.handles() {
        let Some(projectile) = state.pools.projectiles.get_mut(handle) else {
            continue;
        };
        let weapon = config.weapon(projectile.weapon);
        let orbiting = weapon.pattern == FiringPattern::CirclingPlayer;

        projectile.age += dt;
        if !orbiting && projectile.age > PROJECTILE_LIFETIME {
            destroy_projectile(state, handle);
            continue;
        }

        if orbiting {
            projectile.orbit_angle =
                normalize_angle(projectile.orbit_angle + weapon.speed * dt * ORBIT_SPEED_FACTOR);
            projectile.pos = player_pos + polar_to_cartesian(ORBIT_RADIUS, projectile.orbit_angle);
        } else {
            projectile.pos += projectile.dir * weapon.speed * dt;
            if physics.overlaps_wall(projectile.pos, PROJECTILE_WALL_RADIUS) {
                destroy_projectile(state, handle);
                continue;
            }
        }

        let pos = projectile.pos;
        let target = state
            .pools
            .enemies
            .iter()
            .find(|(_, e)| e.pos.distance(pos) < HIT_RADIUS)
            .map(|(h, _)| h);

        if let Some(enemy) = target {
            let roll = roll_damage(&mut state.rng, weapon);
            if !orbiting {
                destroy_projectile(state, handle);
            }
            apply_hit(state, enemy, roll);
        }
    }
}

fn destroy_projectile(state: &mut GameState, handle: ProjectileHandle) {
    if state.pools.projectiles.remove(handle).is_some() {
        state.push_event(GameEvent::ProjectileDestroyed { handle });
    }
}

/// Subtract damage, report it, and kill the enemy if that was enough
pub fn apply_hit(state: &mut GameState, handle: EnemyHandle, roll: HitRoll) {
    let Some(enemy) = state.pools.enemies.get_mut(handle) else {
        return;
    };
    enemy.health = (enemy.health - roll.damage).max(0.0);
    let (pos, health, dead) = (enemy.pos, enemy.health, enemy.is_dead());

    state.feedback.spawn(pos, roll.damage, roll.critical);
    state.push_event(GameEvent::DamageDealt {
        position: pos,
        amount: roll.damage,
        critical: roll.critical,
    });
    log::debug!("Enemy {:?} took {} damage. Health: {}", handle, roll.damage, health);

    if dead {
        kill_enemy(state, handle);
    }
}

fn kill_enemy(state: &mut GameState, handle: EnemyHandle) {
    let Some(enemy) = state.pools.enemies.remove(handle) else {
        return;
    };
    let config = state.config.clone();
    let enemy_cfg = config.enemy_type(enemy.kind);

    // Roll in [0, 100]; a zero drop rate never drops
    let roll = state.rng.random_range(0.0..=100.0f32);
    let drops = enemy_cfg.drop_rate > 0.0 && roll <= enemy_cfg.drop_rate;
    if drops && !enemy_cfg.collectable_name.is_empty() {
        match config.collectable_by_name(&enemy_cfg.collectable_name) {
            Some(kind) => {
                let collectable_cfg = config.collectable(kind);
                let pos = enemy.pos + random_in_disk(&mut state.rng, LOOT_SCATTER);
                let glow = collectable_cfg.glow.enabled.then(|| {
                    let phase = state.rng.random_range(0.0..std::f32::consts::TAU);
                    let g = &collectable_cfg.glow;
                    let t = (phase.sin() + 1.0) / 2.0;
                    Glow {
                        phase,
                        scale: lerp(g.radius_min, g.radius_max, t),
                        alpha: lerp(g.brightness_min, g.brightness_max, t),
                    }
                });
                let dropped = state.pools.collectables.insert(Collectable { kind, pos, glow });
                state.push_event(GameEvent::CollectableDropped { handle: dropped, kind });
            }
            None => log::warn!(
                "Collectable '{}' not found for enemy '{}'",
                enemy_cfg.collectable_name,
                enemy_cfg.name
            ),
        }
    }

    state.total_kills += 1;
    state.push_event(GameEvent::EnemyKilled {
        handle,
        position: enemy.pos,
        kills: state.total_kills,
    });
    log::info!("{} defeated! Kills: {}", enemy_cfg.name, state.total_kills);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        CollectableTypeConfig, EnemyTypeConfig, EnemyTypeId, GameConfig, GlowConfig, WeaponId,
    };
    use glam::Vec2;
    use crate::sim::physics::{OpenField, Wall, Walls};
    use crate::sim::state::{Enemy, Projectile};

    fn test_config() -> GameConfig {
        GameConfig {
            weapons: vec![
                WeaponConfig {
                    name: "Shot".to_string(),
                    speed: 0.0,
                    damage: 10.0,
                    crit_chance: 0.0,
                    pattern: FiringPattern::LastMovedDirection,
                    ..WeaponConfig::default()
                },
                WeaponConfig {
                    name: "Orbit".to_string(),
                    speed: 0.0,
                    damage: 10.0,
                    crit_chance: 0.0,
                    pattern: FiringPattern::CirclingPlayer,
                    ..WeaponConfig::default()
                },
            ],
            enemy_types: vec![
                EnemyTypeConfig {
                    name: "Looter".to_string(),
                    health: 20.0,
                    collectable_name: "Gem".to_string(),
                    drop_rate: 100.0,
                    ..EnemyTypeConfig::default()
                },
                EnemyTypeConfig {
                    name: "Miser".to_string(),
                    health: 10.0,
                    collectable_name: "Gem".to_string(),
                    drop_rate: 0.0,
                    ..EnemyTypeConfig::default()
                },
                EnemyTypeConfig {
                    name: "Broken".to_string(),
                    health: 10.0,
                    collectable_name: "Unobtainium".to_string(),
                    drop_rate: 100.0,
                    ..EnemyTypeConfig::default()
                },
            ],
            spawner_events: Vec::new(),
            collectables: vec![CollectableTypeConfig {
                name: "Gem".to_string(),
                glow: GlowConfig {
                    enabled: true,
                    ..GlowConfig::default()
                },
                ..CollectableTypeConfig::default()
            }],
            ..GameConfig::default()
        }
    }

    fn setup() -> GameState {
        GameState::new(test_config(), 9).unwrap()
    }

    fn add_enemy(state: &mut GameState, kind: usize, pos: Vec2) -> EnemyHandle {
        let health = state.config.enemy_types[kind].health;
        state
            .pools
            .enemies
            .insert(Enemy::new(EnemyTypeId(kind), pos, health, 0.5))
    }

    fn add_projectile(state: &mut GameState, weapon: usize, pos: Vec2) -> ProjectileHandle {
        state.pools.projectiles.insert(Projectile {
            weapon: WeaponId(weapon),
            pos,
            dir: Vec2::X,
            age: 0.0,
            orbit_angle: 0.0,
        })
    }

    #[test]
    fn test_roll_damage_crit_bounds() {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(1);
        let never = WeaponConfig {
            crit_chance: 0.0,
            ..WeaponConfig::default()
        };
        let always = WeaponConfig {
            crit_chance: 1.0,
            ..WeaponConfig::default()
        };
        for _ in 0..200 {
            assert_eq!(
                roll_damage(&mut rng, &never),
                HitRoll {
                    damage: 10.0,
                    critical: false
                }
            );
            let crit = roll_damage(&mut rng, &always);
            assert!(crit.critical);
            assert!(crit.damage >= 15.0 && crit.damage < 25.0);
        }
    }

    #[test]
    fn test_travelling_shot_hits_first_enemy_in_spawn_order() {
        let mut state = setup();
        let far = add_enemy(&mut state, 0, Vec2::new(10.4, 0.0));
        let near = add_enemy(&mut state, 0, Vec2::new(10.1, 0.0));
        let shot = add_projectile(&mut state, 0, Vec2::new(10.0, 0.0));

        update_projectiles(&mut state, &OpenField, 0.02);

        // Both in range; the older enemy takes the hit even though it is farther
        assert_eq!(state.pools.enemies.get(far).unwrap().health, 10.0);
        assert_eq!(state.pools.enemies.get(near).unwrap().health, 20.0);
        assert!(!state.pools.projectiles.contains(shot));
        assert_eq!(state.feedback.indicators().len(), 1);
    }

    #[test]
    fn test_orbiting_shot_persists_and_hits_again() {
        let mut state = setup();
        let player = state.player.pos;
        // Orbit speed 0: stays at angle 0, i.e. (2, 0) from the player
        let target = add_enemy(&mut state, 0, player + Vec2::new(2.0, 0.0));
        let orbit = add_projectile(&mut state, 1, player);

        update_projectiles(&mut state, &OpenField, 0.02);
        assert!(state.pools.projectiles.contains(orbit));
        assert_eq!(state.pools.enemies.get(target).unwrap().health, 10.0);

        update_projectiles(&mut state, &OpenField, 0.02);
        assert!(!state.pools.enemies.contains(target));
        assert!(state.pools.projectiles.contains(orbit));
        assert_eq!(state.total_kills, 1);
    }

    #[test]
    fn test_dead_enemy_removed_and_not_hit_again() {
        let mut state = setup();
        let victim = add_enemy(&mut state, 1, Vec2::new(5.0, 5.0));
        add_projectile(&mut state, 0, Vec2::new(5.0, 5.0));
        let second = add_projectile(&mut state, 0, Vec2::new(5.0, 5.0));

        update_projectiles(&mut state, &OpenField, 0.02);
        assert!(!state.pools.enemies.contains(victim));
        assert_eq!(state.total_kills, 1);
        // Second shot found nothing to hit
        assert!(state.pools.projectiles.contains(second));
    }

    #[test]
    fn test_drop_rate_hundred_always_drops_once() {
        for seed in 0..20 {
            let mut state = GameState::new(test_config(), seed).unwrap();
            let pos = Vec2::new(3.0, 3.0);
            let e = add_enemy(&mut state, 0, pos);
            apply_hit(&mut state, e, HitRoll { damage: 100.0, critical: false });
            assert_eq!(state.pools.collectables.len(), 1);
            let (_, c) = state.pools.collectables.iter().next().unwrap();
            assert!(c.pos.distance(pos) <= LOOT_SCATTER + 1e-5);
            let glow = c.glow.unwrap();
            assert!((0.0..std::f32::consts::TAU).contains(&glow.phase));
        }
    }

    #[test]
    fn test_drop_rate_zero_never_drops() {
        for seed in 0..20 {
            let mut state = GameState::new(test_config(), seed).unwrap();
            let e = add_enemy(&mut state, 1, Vec2::ZERO);
            apply_hit(&mut state, e, HitRoll { damage: 100.0, critical: false });
            assert!(state.pools.collectables.is_empty());
            assert_eq!(state.total_kills, 1);
        }
    }

    #[test]
    fn test_unknown_collectable_skips_drop() {
        let mut state = setup();
        let e = add_enemy(&mut state, 2, Vec2::ZERO);
        apply_hit(&mut state, e, HitRoll { damage: 100.0, critical: true });
        assert!(state.pools.collectables.is_empty());
        assert!(!state.pools.enemies.contains(e));
        assert_eq!(state.total_kills, 1);
    }

    #[test]
    fn test_lifetime_expiry_exempts_orbiters() {
        let mut state = setup();
        let shot = add_projectile(&mut state, 0, Vec2::new(50.0, 50.0));
        let orbit = add_projectile(&mut state, 1, Vec2::ZERO);
        for _ in 0..249 {
            update_projectiles(&mut state, &OpenField, 0.02);
        }
        assert!(state.pools.projectiles.contains(shot));
        for _ in 0..3 {
            update_projectiles(&mut state, &OpenField, 0.02);
        }
        assert!(!state.pools.projectiles.contains(shot));
        for _ in 0..500 {
            update_projectiles(&mut state, &OpenField, 0.02);
        }
        assert!(state.pools.projectiles.contains(orbit));
    }

    #[test]
    fn test_wall_destroys_travelling_shot() {
        let mut state = setup();
        let walls = Walls::new(vec![Wall::Circle {
            center: Vec2::new(20.0, 0.0),
            radius: 1.0,
        }]);
        let shot = add_projectile(&mut state, 0, Vec2::new(19.0, 0.0));
        update_projectiles(&mut state, &walls, 0.02);
        assert!(!state.pools.projectiles.contains(shot));
        let destroyed = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ProjectileDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 1);
    }
}
