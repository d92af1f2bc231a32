//! Combat tuning (resource)
//!
//! Значения по умолчанию: стартовый баланс. Может быть загружен
//! из RON/JSON (serde) и вставлен в App до `SimulationPlugin`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::inventory::{WeaponInventory, DEFAULT_AUTO_SWITCH_DELAY, DEFAULT_SWITCH_COOLDOWN};
use super::weapon::Weapon;

/// Радиус hitbox актора для projectiles (метры, ground plane)
pub const DEFAULT_HIT_RADIUS: f32 = 0.8;

#[derive(Resource, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Resource)]
#[serde(default)]
pub struct CombatConfig {
    /// Projectile попадает если ближе этого к актору
    pub hit_radius: f32,
    /// Cooldown ручного переключения оружия (секунды)
    pub switch_cooldown: f32,
    /// Задержка auto-switch на melee при пустом магазине (секунды)
    pub auto_switch_delay: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            hit_radius: DEFAULT_HIT_RADIUS,
            switch_cooldown: DEFAULT_SWITCH_COOLDOWN,
            auto_switch_delay: DEFAULT_AUTO_SWITCH_DELAY,
        }
    }
}

impl CombatConfig {
    /// Инвентарь с таймингами переключения из конфига
    pub fn weapon_inventory(&self, weapons: Vec<Weapon>) -> WeaponInventory {
        WeaponInventory::new(weapons).with_switch_timings(self.switch_cooldown, self.auto_switch_delay)
    }
}
