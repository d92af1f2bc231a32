//! Cooldown: переиспользуемый countdown таймер
//!
//! Используется каждой атакой, переключением оружия и AI действием.
//! `tick(dt)` уменьшает remaining (floor 0), `is_ready()` = remaining ≤ 0.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Countdown таймер (секунды)
///
/// Инвариант: remaining ≥ 0. Default, готов сразу.
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect, Serialize, Deserialize)]
pub struct Cooldown {
    remaining: f32,
}

impl Cooldown {
    /// Уже готовый таймер
    pub const READY: Cooldown = Cooldown { remaining: 0.0 };

    /// Таймер, который станет готов через `duration` секунд
    pub fn new(duration: f32) -> Self {
        let mut cooldown = Self::READY;
        cooldown.reset(duration);
        cooldown
    }

    /// Уменьшить remaining на `dt` (отрицательные dt игнорируются)
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.remaining = (self.remaining - dt).max(0.0);
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Перезапустить countdown
    pub fn reset(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_default_ready() {
        assert!(Cooldown::default().is_ready());
        assert!(Cooldown::READY.is_ready());
    }

    #[test]
    fn test_cooldown_counts_down() {
        let mut cooldown = Cooldown::new(1.0);
        assert!(!cooldown.is_ready());

        cooldown.tick(0.5);
        assert!(!cooldown.is_ready());
        assert_eq!(cooldown.remaining(), 0.5);

        cooldown.tick(0.5);
        assert!(cooldown.is_ready());
    }

    #[test]
    fn test_cooldown_floors_at_zero() {
        let mut cooldown = Cooldown::new(0.2);
        cooldown.tick(5.0);
        assert_eq!(cooldown.remaining(), 0.0);

        // Отрицательный dt не "отматывает" время назад
        cooldown.tick(-3.0);
        assert_eq!(cooldown.remaining(), 0.0);
        assert!(cooldown.is_ready());
    }

    #[test]
    fn test_cooldown_reset_restarts() {
        let mut cooldown = Cooldown::READY;
        cooldown.reset(0.75);
        assert!(!cooldown.is_ready());
        assert_eq!(cooldown.remaining(), 0.75);

        cooldown.reset(-1.0); // clamp
        assert!(cooldown.is_ready());
    }
}
