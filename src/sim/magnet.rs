//! Collectable attraction, pickup and glow pulse

use super::state::{GameEvent, GameState};
use crate::consts::{ATTRACTION_SPEED, PICKUP_DISTANCE};
use crate::lerp;

/// Animate glows, pull nearby collectables in and bank the ones that arrive
pub fn update(state: &mut GameState, dt: f32) {
    if !state.is_running() {
        return;
    }
    let config = state.config.clone();
    let player_pos = state.player.pos;
    let collection_radius = state.player.collection_radius;

    for handle in state.pools.collectables.handles() {
        let Some(item) = state.pools.collectables.get_mut(handle) else {
            continue;
        };
        let cfg = config.collectable(item.kind);

        if let Some(glow) = item.glow.as_mut() {
            let g = &cfg.glow;
            glow.phase += dt * g.speed;
            let t = (glow.phase.sin() + 1.0) / 2.0;
            glow.scale = lerp(g.radius_min, g.radius_max, t);
            glow.alpha = lerp(g.brightness_min, g.brightness_max, t);
        }

        let distance = item.pos.distance(player_pos);
        if distance > collection_radius {
            continue;
        }

        // Never step past the player
        let step = (ATTRACTION_SPEED * dt).min(distance);
        item.pos += (player_pos - item.pos).normalize_or_zero() * step;

        if distance <= PICKUP_DISTANCE {
            let kind = item.kind;
            state.pools.collectables.remove(handle);
            let balance = state.ledger.credit(&cfg.name, cfg.unit_value);
            state.total_units += cfg.unit_value as u64;
            state.push_event(GameEvent::CollectableCollected {
                handle,
                kind,
                units: cfg.unit_value,
            });
            log::debug!(
                "Collected {} units of {}. Total: {}",
                cfg.unit_value,
                cfg.name,
                balance
            );
        }
    }
}
