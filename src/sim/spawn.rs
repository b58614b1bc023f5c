//! Timed enemy waves
//!
//! Each spawner event fires every `interval` seconds inside its active window,
//! dropping `amount` enemies a fixed distance from the player.

use glam::Vec2;

use super::state::{Enemy, GameEvent, GameState};
use crate::config::{Dispersion, EnemyTypeId, GameConfig, SpawnerEvent};
use crate::consts::{RANDOM_SPREAD, SPAWN_DISTANCE, SWARM_SPREAD};
use crate::random_in_disk;

/// Runtime state of one spawner event
#[derive(Debug, Clone)]
pub struct ScheduledSpawn {
    /// Index into `GameConfig::spawner_events`
    pub event: usize,
    /// Resolved at startup; None if the name matched no active type
    pub enemy_type: Option<EnemyTypeId>,
    /// Never earlier than the event's start time
    pub next_spawn_time: f32,
}

#[derive(Debug, Clone, Default)]
pub struct SpawnScheduler {
    entries: Vec<ScheduledSpawn>,
}

impl SpawnScheduler {
    /// Resolve every event's enemy type, warning about the ones that don't match
    pub fn new(config: &GameConfig) -> Self {
        let available = config.active_enemy_names().join(", ");
        log::info!("Available enemy names for spawner events: {}", available);

        let entries = config
            .spawner_events
            .iter()
            .enumerate()
            .map(|(i, ev)| {
                let enemy_type = config.enemy_type_by_name(&ev.spawn_type);
                if enemy_type.is_none() {
                    log::warn!(
                        "Spawner event {} has invalid spawn type '{}'. Available types: {}",
                        i,
                        ev.spawn_type,
                        available
                    );
                }
                ScheduledSpawn {
                    event: i,
                    enemy_type,
                    next_spawn_time: ev.start_time,
                }
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[ScheduledSpawn] {
        &self.entries
    }
}

/// Fire every spawner event that is due at the current game time
pub fn update(state: &mut GameState) {
    if !state.is_running() {
        return;
    }
    let now = state.clock.elapsed();
    let config = state.config.clone();

    for i in 0..state.spawner.entries.len() {
        let entry = &state.spawner.entries[i];
        let event = &config.spawner_events[entry.event];
        let in_window = now >= event.start_time && now <= event.end_time;
        if !in_window || now < entry.next_spawn_time {
            continue;
        }

        let enemy_type = entry.enemy_type;
        // One step per trigger; missed intervals are not replayed in bulk
        state.spawner.entries[i].next_spawn_time += event.interval;

        match enemy_type {
            Some(kind) => spawn_wave(state, kind, event),
            None => log::warn!(
                "No active enemy type named '{}' for spawning",
                event.spawn_type
            ),
        }
    }
}

fn spawn_wave(state: &mut GameState, kind: EnemyTypeId, event: &SpawnerEvent) {
    let enemy_cfg = state.config.enemy_type(kind);
    let (health, radius) = (enemy_cfg.health, enemy_cfg.body_radius());
    let base = state.player.pos + event.direction.offset() * SPAWN_DISTANCE;

    for _ in 0..event.amount {
        let pos = base + dispersion_offset(state, event.dispersion);
        let handle = state.pools.enemies.insert(Enemy::new(kind, pos, health, radius));
        state.push_event(GameEvent::EnemySpawned { handle, kind });
    }

    log::info!(
        "Spawned {} {}(s) at {:?}",
        event.amount,
        event.spawn_type,
        event.direction
    );
}

fn dispersion_offset(state: &mut GameState, dispersion: Dispersion) -> Vec2 {
    match dispersion {
        Dispersion::None => Vec2::ZERO,
        Dispersion::Random => random_in_disk(&mut state.rng, RANDOM_SPREAD),
        Dispersion::Swarm => random_in_disk(&mut state.rng, SWARM_SPREAD),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnemyTypeConfig, SpawnDirection};
    use proptest::prelude::*;

    fn config_with(events: Vec<SpawnerEvent>) -> GameConfig {
        GameConfig {
            weapons: Vec::new(),
            enemy_types: vec![
                EnemyTypeConfig {
                    name: "Slime".to_string(),
                    ..EnemyTypeConfig::default()
                },
                EnemyTypeConfig {
                    name: "Ghost".to_string(),
                    active: false,
                    ..EnemyTypeConfig::default()
                },
            ],
            spawner_events: events,
            ..GameConfig::default()
        }
    }

    fn advance_to(state: &mut GameState, t: f32) {
        let dt = t - state.clock.elapsed();
        state.clock.advance(dt, false);
        update(state);
    }

    #[test]
    fn test_spawns_in_window_at_interval() {
        let config = config_with(vec![SpawnerEvent {
            spawn_type: "Slime".to_string(),
            amount: 2,
            interval: 5.0,
            start_time: 10.0,
            end_time: 20.0,
            direction: SpawnDirection::Right,
            dispersion: Dispersion::None,
        }]);
        let mut state = GameState::new(config, 3).unwrap();

        advance_to(&mut state, 9.0);
        assert_eq!(state.pools.enemies.len(), 0);
        assert_eq!(state.spawner.entries()[0].next_spawn_time, 10.0);

        advance_to(&mut state, 10.0);
        assert_eq!(state.pools.enemies.len(), 2);
        assert_eq!(state.spawner.entries()[0].next_spawn_time, 15.0);
        // Exactly 20 units to the right of the player, no spread
        for (_, e) in state.pools.enemies.iter() {
            assert_eq!(e.pos, state.player.pos + Vec2::new(20.0, 0.0));
            assert_eq!(e.health, 50.0);
        }

        advance_to(&mut state, 12.0);
        assert_eq!(state.pools.enemies.len(), 2);
        advance_to(&mut state, 15.5);
        assert_eq!(state.pools.enemies.len(), 4);
        // Past the window: nothing more
        advance_to(&mut state, 25.0);
        assert_eq!(state.pools.enemies.len(), 4);
    }

    #[test]
    fn test_unknown_or_inactive_type_is_noop() {
        let config = config_with(vec![
            SpawnerEvent {
                spawn_type: "Dragon".to_string(),
                ..SpawnerEvent::default()
            },
            SpawnerEvent {
                spawn_type: "Ghost".to_string(),
                ..SpawnerEvent::default()
            },
        ]);
        let mut state = GameState::new(config, 3).unwrap();
        assert!(state.spawner.entries().iter().all(|e| e.enemy_type.is_none()));
        advance_to(&mut state, 1.0);
        assert!(state.pools.enemies.is_empty());
        // The schedule still advances
        assert_eq!(state.spawner.entries()[0].next_spawn_time, 5.0);
    }

    #[test]
    fn test_dispersion_radius() {
        let config = config_with(vec![
            SpawnerEvent {
                spawn_type: "Slime".to_string(),
                amount: 50,
                direction: SpawnDirection::Up,
                dispersion: Dispersion::Swarm,
                ..SpawnerEvent::default()
            },
            SpawnerEvent {
                spawn_type: "Slime".to_string(),
                amount: 50,
                direction: SpawnDirection::Down,
                dispersion: Dispersion::Random,
                ..SpawnerEvent::default()
            },
        ]);
        let mut state = GameState::new(config, 11).unwrap();
        advance_to(&mut state, 0.0);
        let up = state.player.pos + Vec2::new(0.0, 20.0);
        let down = state.player.pos + Vec2::new(0.0, -20.0);
        let mut count = 0;
        for (_, e) in state.pools.enemies.iter() {
            let d = if e.pos.y > state.player.pos.y {
                e.pos.distance(up) - SWARM_SPREAD
            } else {
                e.pos.distance(down) - RANDOM_SPREAD
            };
            assert!(d <= 1e-4);
            count += 1;
        }
        assert_eq!(count, 100);
    }

    proptest! {
        #[test]
        fn prop_next_spawn_monotonic(steps in prop::collection::vec(0.0f32..3.0, 1..60)) {
            let config = config_with(vec![SpawnerEvent {
                spawn_type: "Slime".to_string(),
                interval: 2.0,
                start_time: 5.0,
                end_time: 40.0,
                ..SpawnerEvent::default()
            }]);
            let mut state = GameState::new(config, 5).unwrap();
            let mut last = state.spawner.entries()[0].next_spawn_time;
            for dt in steps {
                let before = state.pools.enemies.len();
                state.clock.advance(dt, false);
                update(&mut state);
                let now = state.clock.elapsed();
                let next = state.spawner.entries()[0].next_spawn_time;
                prop_assert!(next >= last);
                prop_assert!(next >= 5.0);
                if state.pools.enemies.len() > before {
                    prop_assert!((5.0..=40.0).contains(&now));
                }
                last = next;
            }
        }
    }
}
