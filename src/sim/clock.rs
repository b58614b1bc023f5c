//! Game clock with time acceleration and a fixed level length

use crate::consts::{LEVEL_END_TIME, TIME_ACCELERATION};

#[derive(Debug, Clone)]
pub struct Clock {
    elapsed: f32,
    level_end: f32,
    acceleration: f32,
    ended: bool,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(LEVEL_END_TIME, TIME_ACCELERATION)
    }
}

impl Clock {
    pub fn new(level_end: f32, acceleration: f32) -> Self {
        Self {
            elapsed: 0.0,
            level_end,
            acceleration,
            ended: false,
        }
    }

    /// Advance by a frame delta. Returns true on the single frame the level end is reached.
    pub fn advance(&mut self, dt: f32, accelerate: bool) -> bool {
        if self.ended {
            return false;
        }
        let scale = if accelerate { self.acceleration } else { 1.0 };
        self.elapsed += dt * scale;
        if self.elapsed >= self.level_end {
            self.elapsed = self.level_end;
            self.ended = true;
            return true;
        }
        false
    }

    /// Elapsed game seconds
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn has_ended(&self) -> bool {
        self.ended
    }

    /// Whole minutes and seconds, for a mm:ss readout
    pub fn minutes_seconds(&self) -> (u32, u32) {
        let total = self.elapsed.max(0.0) as u32;
        (total / 60, total % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acceleration() {
        let mut clock = Clock::default();
        clock.advance(0.1, false);
        assert!((clock.elapsed() - 0.1).abs() < 1e-6);
        clock.advance(0.1, true);
        assert!((clock.elapsed() - 1.6).abs() < 1e-5);
    }

    #[test]
    fn test_level_end_fires_once() {
        let mut clock = Clock::new(10.0, 15.0);
        let mut fired = 0;
        for _ in 0..200 {
            if clock.advance(0.1, false) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert!(clock.has_ended());
        // Pinned to the level length and frozen there
        assert_eq!(clock.elapsed(), 10.0);
        clock.advance(5.0, true);
        assert_eq!(clock.elapsed(), 10.0);
    }

    #[test]
    fn test_minutes_seconds() {
        let mut clock = Clock::default();
        clock.advance(125.5, false);
        assert_eq!(clock.minutes_seconds(), (2, 5));
    }
}
