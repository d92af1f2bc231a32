//! Combat events (typed channels вместо глобального event bus)
//!
//! Intents: presentation/input → ECS
//! Signals: ECS → presentation (HUD, VFX, audio)

use bevy::prelude::*;

use super::inventory::CycleDirection;
use super::weapon::WeaponKind;

// ============================================================================
// Intents
// ============================================================================

/// Event: актор хочет атаковать активным оружием в точку (world space)
#[derive(Event, Debug, Clone)]
pub struct AttackIntent {
    pub entity: Entity,
    pub target_point: Vec3,
}

/// Event: переключиться на конкретный слот (hotkeys)
#[derive(Event, Debug, Clone)]
pub struct SwitchWeaponIntent {
    pub entity: Entity,
    pub slot: usize,
}

/// Event: переключиться на следующее/предыдущее оружие (wheel)
#[derive(Event, Debug, Clone)]
pub struct CycleWeaponIntent {
    pub entity: Entity,
    pub direction: CycleDirection,
}

/// Event: подобран боезапас
#[derive(Event, Debug, Clone)]
pub struct AmmoPickup {
    pub entity: Entity,
    pub amount: u32,
}

// ============================================================================
// Signals
// ============================================================================

/// Event: успешная атака (muzzle flash / swing visual, рисует presentation)
#[derive(Event, Debug, Clone)]
pub struct WeaponFired {
    pub shooter: Entity,
    pub slot: usize,
    pub kind: WeaponKind,
    pub origin: Vec3,
    pub target_point: Vec3,
}

/// Event: активное оружие сменилось
#[derive(Event, Debug, Clone)]
pub struct ActiveWeaponChanged {
    pub entity: Entity,
    pub slot: usize,
    pub kind: WeaponKind,
    /// true: auto-switch (пустой магазин), false, intent игрока
    pub automatic: bool,
}

/// Источник урона
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum DamageSource {
    /// Projectile
    Ranged,
    /// Melee swing
    Melee,
    /// Контактный урон hostile AI
    Contact,
}

/// Событие: урон нанесен
///
/// Генерируется после применения damage к Armor/Health.
/// Используется для UI, звуков, эффектов (damage flash: таймер у presentation).
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    /// Снято с Health
    pub amount: u32,
    /// Поглощено бронёй
    pub absorbed: u32,
    pub source: DamageSource,
}

/// Событие: entity умер (health → 0), ровно один раз
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Событие: очки за убийство (один раз на смерть врага)
#[derive(Event, Debug, Clone)]
pub struct PointsScored {
    pub victim: Entity,
    /// None: смерть не от попадания (урон мимо resolver)
    pub killer: Option<Entity>,
    pub points: u32,
}

/// Какой стат изменился
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum StatKind {
    Health,
    Armor,
    Ammo,
}

/// Event: значение стата реально изменилось (payload, новая пара current/max)
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct StatChanged {
    pub entity: Entity,
    pub stat: StatKind,
    pub current: u32,
    pub max: u32,
}

/// Event: общий счёт изменился
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ScoreChanged {
    pub total: u32,
}
