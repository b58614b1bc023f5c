//! Player movement, weapon firing and enemy pursuit
//!
//! Enemies chase the player in a straight line. When one stops making
//! progress (pinned on a wall) it drops wall collision for a moment so it
//! can clip free.

use glam::Vec2;

use super::physics::Physics;
use super::state::{EnemyHandle, GameEvent, GameState, Projectile, WallMode};
use crate::config::{FiringPattern, WeaponId};
use crate::consts::*;

/// Move the player by the raw input direction (magnitude normalized)
pub fn move_player(state: &mut GameState, input: Vec2, physics: &dyn Physics, dt: f32) {
    let player = &mut state.player;
    let dir = input.normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    player.pos = physics.move_body(player.pos, dir * player.speed * dt, player.radius, true);
    player.last_move_dir = dir;
}

/// Shot directions for one trigger of a weapon. Empty means nothing to shoot at.
pub fn shot_directions(state: &GameState, pattern: FiringPattern) -> Vec<Vec2> {
    use std::f32::consts::FRAC_1_SQRT_2;

    match pattern {
        FiringPattern::LastMovedDirection => vec![state.player.last_move_dir],
        FiringPattern::NearestEnemy => {
            let player = &state.player;
            nearest_enemy(state, player.pos)
                .and_then(|h| state.pools.enemies.get(h))
                .map(|e| vec![(e.pos - player.pos).normalize_or(player.last_move_dir)])
                .unwrap_or_default()
        }
        // Direction is ignored while orbiting
        FiringPattern::CirclingPlayer => vec![Vec2::Y],
        FiringPattern::FourPoint => vec![Vec2::Y, Vec2::NEG_Y, Vec2::NEG_X, Vec2::X],
        FiringPattern::EightPoint => vec![
            Vec2::Y,
            Vec2::NEG_Y,
            Vec2::NEG_X,
            Vec2::X,
            Vec2::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2),
            Vec2::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
            Vec2::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
            Vec2::new(-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
        ],
    }
}

/// Closest live enemy to a point, if any
pub fn nearest_enemy(state: &GameState, point: Vec2) -> Option<EnemyHandle> {
    state
        .pools
        .enemies
        .iter()
        .min_by(|(_, a), (_, b)| {
            a.pos
                .distance_squared(point)
                .partial_cmp(&b.pos.distance_squared(point))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(h, _)| h)
}

/// Fire every active weapon whose cooldown has elapsed on the game clock
pub fn fire_weapons(state: &mut GameState) {
    let now = state.clock.elapsed();
    let config = state.config.clone();

    for i in 0..state.weapons.len() {
        let id = state.weapons[i].id;
        let weapon = config.weapon(id);
        if !weapon.active || now < state.weapons[i].next_fire_time {
            continue;
        }

        for dir in shot_directions(state, weapon.pattern) {
            spawn_projectile(state, id, dir);
        }
        // The cycle is spent even when there was nothing to shoot at
        state.weapons[i].next_fire_time = now + 1.0 / weapon.rate;
    }
}

fn spawn_projectile(state: &mut GameState, weapon: WeaponId, dir: Vec2) {
    let handle = state.pools.projectiles.insert(Projectile {
        weapon,
        pos: state.player.pos,
        dir,
        age: 0.0,
        orbit_angle: 0.0,
    });
    state.push_event(GameEvent::ProjectileFired { handle, weapon });
}

/// Steer enemies at the player, run stuck detection, apply contact damage
pub fn update_enemies(state: &mut GameState, physics: &dyn Physics, dt: f32) {
    let now = state.physics_time;

    for handle in state.pools.enemies.handles() {
        if !state.is_running() {
            break;
        }
        let player_pos = state.player.pos;
        let kind = match state.pools.enemies.get(handle) {
            Some(e) => e.kind,
            None => continue,
        };
        let cfg = state.config.enemy_type(kind);
        let (speed, contact_damage) = (cfg.speed, cfg.damage);

        let Some(enemy) = state.pools.enemies.get_mut(handle) else {
            continue;
        };

        // Stuck detection uses the displacement achieved since the previous tick
        if enemy.pos.distance(enemy.last_pos) < STUCK_DISPLACEMENT {
            enemy.stationary_time += dt;
        } else {
            enemy.stationary_time = 0.0;
        }
        enemy.last_pos = enemy.pos;

        match enemy.wall_mode {
            WallMode::CollisionDisabled { timer } => {
                let timer = timer + dt;
                if timer >= COLLISION_DISABLE_TIME {
                    enemy.wall_mode = WallMode::Normal;
                    enemy.stationary_time = 0.0;
                    log::debug!("Enemy {:?} re-enabled wall collision", handle);
                } else {
                    enemy.wall_mode = WallMode::CollisionDisabled { timer };
                }
            }
            WallMode::Normal if enemy.stationary_time >= STUCK_TIME => {
                enemy.wall_mode = WallMode::CollisionDisabled { timer: 0.0 };
                log::debug!("Enemy {:?} disabled wall collision to get unstuck", handle);
            }
            WallMode::Normal => {}
        }

        let delta = (player_pos - enemy.pos).normalize_or_zero() * speed * dt;
        enemy.pos = physics.move_body(enemy.pos, delta, enemy.radius, enemy.collides_with_walls());

        let touching = player_pos.distance(enemy.pos) < CONTACT_DISTANCE;
        let contact = &mut enemy.contact;
        let deal_damage = match (touching, contact.in_contact) {
            // First touch always hurts, whatever the timer says
            (true, false) => true,
            (true, true) => now > contact.last_damage_time + CONTACT_DAMAGE_INTERVAL,
            (false, _) => {
                contact.in_contact = false;
                false
            }
        };

        if deal_damage {
            contact.in_contact = true;
            contact.last_damage_time = now;
            state.damage_player(contact_damage);
        }
    }
}
