//! Combat feedback: floating damage numbers and the final score reveal
//!
//! Both are timer-driven state objects advanced once per frame. Renderers
//! read them; nothing here affects gameplay.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::{Color, DamageTextConfig};
use crate::consts::{FLASH_DURATION, FLASH_INTERVAL};

/// A floating damage number
#[derive(Debug, Clone)]
pub struct DamageIndicator {
    /// Current position (rises over time)
    pub position: Vec2,
    origin: Vec2,
    /// Damage rounded for display
    pub amount: i32,
    pub critical: bool,
    pub font_size: f32,
    pub color: Color,
    elapsed: f32,
}

impl DamageIndicator {
    /// Fade-out alpha in [0, 1]
    pub fn alpha(&self) -> f32 {
        self.color[3]
    }
}

#[derive(Debug, Clone)]
pub struct CombatFeedback {
    settings: DamageTextConfig,
    indicators: Vec<DamageIndicator>,
    /// Cosmetic rolls only; kept apart from the gameplay RNG
    rng: Pcg32,
}

impl CombatFeedback {
    pub fn new(settings: DamageTextConfig, seed: u64) -> Self {
        Self {
            settings,
            indicators: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Spawn a damage number above `position`
    pub fn spawn(&mut self, position: Vec2, amount: f32, critical: bool) {
        let s = &self.settings;
        let font_size = if s.max_font_size > s.min_font_size {
            self.rng.random_range(s.min_font_size..s.max_font_size)
        } else {
            s.min_font_size
        };
        let color = if critical {
            s.critical_color
        } else {
            s.standard_color
        };
        let origin = position + s.offset;
        self.indicators.push(DamageIndicator {
            position: origin,
            origin,
            amount: amount.round() as i32,
            critical,
            font_size,
            color,
            elapsed: 0.0,
        });
    }

    /// Rise and fade every indicator; drop the ones whose time is up
    pub fn update(&mut self, dt: f32) {
        let duration = self.settings.duration;
        let speed = self.settings.speed;
        for ind in &mut self.indicators {
            ind.elapsed += dt;
            let t = (ind.elapsed / duration).min(1.0);
            ind.position = ind.origin + Vec2::new(0.0, t * speed);
            ind.color[3] = 1.0 - t;
        }
        self.indicators.retain(|i| i.elapsed < duration);
    }

    pub fn indicators(&self) -> &[DamageIndicator] {
        &self.indicators
    }
}

/// End-of-run kill count reveal with a short flash
#[derive(Debug, Clone)]
pub struct FinalReveal {
    pub kills: u32,
    elapsed: f32,
}

impl FinalReveal {
    pub fn new(kills: u32) -> Self {
        Self { kills, elapsed: 0.0 }
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Hidden for the first half of each flash interval, then shown; steady once finished
    pub fn text_visible(&self) -> bool {
        if self.is_finished() {
            return true;
        }
        self.elapsed % FLASH_INTERVAL >= FLASH_INTERVAL / 2.0
    }

    pub fn is_finished(&self) -> bool {
        let flashes = (FLASH_DURATION / FLASH_INTERVAL).floor();
        self.elapsed >= flashes * FLASH_INTERVAL
    }
}
