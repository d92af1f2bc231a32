//! Weapon variants (ranged + melee)
//!
//! Architecture Decision:
//! - Tagged variant `Weapon { Ranged, Melee }` вместо interface с optional методами
//! - Resolver делает exhaustive match, никаких runtime capability проверок
//! - Ranged владеет ProjectilePool (попадания растянуты по тикам полёта)
//! - Melee создаёт MeleeSwing, который резолвится в том же тике

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cooldown::Cooldown;
use super::projectile::{ProjectileId, ProjectilePool, DEFAULT_POOL_CAPACITY};
use crate::shared::{angular_offset, planar_direction, planar_distance, yaw_of, direction_from_yaw};

/// Тип оружия (для HUD / WeaponFired)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum WeaponKind {
    Ranged,
    Melee,
}

/// Боезапас оружия
///
/// Melee сообщает `Unlimited` вместо числового sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AmmoCount {
    Limited { current: u32, max: u32 },
    Unlimited,
}

impl AmmoCount {
    pub fn has_ammo(&self) -> bool {
        match self {
            AmmoCount::Limited { current, .. } => *current > 0,
            AmmoCount::Unlimited => true,
        }
    }
}

/// Почему атака не состоялась (ожидаемые отказы, не ошибки)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AttackRefusal {
    #[error("weapon is on cooldown")]
    OnCooldown,
    #[error("weapon is out of ammo")]
    OutOfAmmo,
    #[error("projectile pool exhausted")]
    PoolExhausted,
}

/// Откуда наносится атака (актор-владелец оружия)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackOrigin {
    pub entity: Entity,
    pub position: Vec3,
    /// Текущий yaw актора (fallback если target совпадает с позицией)
    pub facing: f32,
}

impl AttackOrigin {
    /// Yaw прицеливания в `target_point` (на ground plane)
    pub fn aim_yaw(&self, target_point: Vec3) -> f32 {
        planar_direction(self.position, target_point)
            .map(yaw_of)
            .unwrap_or(self.facing)
    }
}

// ============================================================================
// Ranged
// ============================================================================

/// Ranged weapon (пистолет, винтовка)
///
/// Инвариант: 0 ≤ ammo ≤ max_ammo; успешная атака тратит ровно 1 патрон
/// и перезапускает cooldown.
#[derive(Debug, Clone, Reflect)]
pub struct RangedWeapon {
    /// Урон за попадание
    pub damage: u32,
    /// Cooldown между выстрелами (секунды)
    pub cooldown_duration: f32,
    /// Скорость projectile (м/с)
    pub muzzle_speed: f32,
    /// Время жизни projectile (секунды)
    pub projectile_lifetime: f32,
    ammo: u32,
    max_ammo: u32,
    cooldown: Cooldown,
    pool: ProjectilePool,
}

impl RangedWeapon {
    pub fn new(damage: u32, cooldown_duration: f32, muzzle_speed: f32, projectile_lifetime: f32, max_ammo: u32) -> Self {
        Self {
            damage,
            cooldown_duration,
            muzzle_speed,
            projectile_lifetime,
            ammo: max_ammo,
            max_ammo,
            cooldown: Cooldown::READY,
            pool: ProjectilePool::new(DEFAULT_POOL_CAPACITY),
        }
    }

    /// Пистолет (стартовое оружие игрока)
    pub fn pistol() -> Self {
        Self::new(10, 0.25, 50.0, 2.0, 30)
    }

    /// Заменить pool (другая capacity)
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool = ProjectilePool::new(capacity);
        self
    }

    /// Дальность = muzzle_speed × lifetime (информативно, для AI решений)
    pub fn range(&self) -> f32 {
        self.muzzle_speed * self.projectile_lifetime
    }

    pub fn can_attack(&self) -> bool {
        self.cooldown.is_ready() && self.ammo > 0
    }

    /// Выстрел в `target_point`
    ///
    /// Pool exhausted → отказ без траты патрона и без cooldown.
    pub fn try_attack(&mut self, origin: &AttackOrigin, target_point: Vec3) -> Result<ProjectileId, AttackRefusal> {
        if !self.cooldown.is_ready() {
            return Err(AttackRefusal::OnCooldown);
        }
        if self.ammo == 0 {
            return Err(AttackRefusal::OutOfAmmo);
        }

        let direction = direction_from_yaw(origin.aim_yaw(target_point));
        let velocity = direction * self.muzzle_speed;

        let id = self
            .pool
            .launch(origin.position, velocity, self.projectile_lifetime)
            .ok_or(AttackRefusal::PoolExhausted)?;

        self.ammo -= 1;
        self.cooldown.reset(self.cooldown_duration);
        Ok(id)
    }

    pub fn attack(&mut self, origin: &AttackOrigin, target_point: Vec3) -> bool {
        self.try_attack(origin, target_point).is_ok()
    }

    /// Cooldown + полёт projectiles
    pub fn update(&mut self, dt: f32) {
        self.cooldown.tick(dt);
        self.pool.tick(dt);
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn max_ammo(&self) -> u32 {
        self.max_ammo
    }

    pub fn has_ammo(&self) -> bool {
        self.ammo > 0
    }

    /// Pickup: добавить патроны (clamp к max)
    pub fn add_ammo(&mut self, amount: u32) {
        self.ammo = self.ammo.saturating_add(amount).min(self.max_ammo);
    }

    /// Установить боезапас (clamp к [0, max])
    pub fn set_ammo(&mut self, amount: u32) {
        self.ammo = amount.min(self.max_ammo);
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown.remaining()
    }

    pub fn pool(&self) -> &ProjectilePool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut ProjectilePool {
        &mut self.pool
    }
}

// ============================================================================
// Melee
// ============================================================================

/// Один мгновенный melee удар (существует один тик резолва)
///
/// `struck`: кого этот swing уже задел (один swing не бьёт цель дважды).
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct MeleeSwing {
    pub attacker: Entity,
    pub origin: Vec3,
    /// Yaw направления удара
    pub facing: f32,
    /// Половина ширины дуги (радианы)
    pub arc_half_width: f32,
    pub range: f32,
    pub damage: u32,
    struck: Vec<Entity>,
}

impl MeleeSwing {
    pub fn new(attacker: Entity, origin: Vec3, facing: f32, arc_half_width: f32, range: f32, damage: u32) -> Self {
        Self {
            attacker,
            origin,
            facing,
            arc_half_width,
            range,
            damage,
            struck: Vec::new(),
        }
    }

    /// Точка внутри дуги удара? (дистанция ≤ range И угол ≤ half width)
    pub fn covers(&self, point: Vec3) -> bool {
        let distance = planar_distance(self.origin, point);
        if distance > self.range {
            return false;
        }

        // Цель прямо в origin: считается попаданием
        let Some(direction) = planar_direction(self.origin, point) else {
            return true;
        };

        angular_offset(self.facing, yaw_of(direction)) <= self.arc_half_width
    }

    pub fn has_struck(&self, entity: Entity) -> bool {
        self.struck.contains(&entity)
    }

    /// Записать попадание. false: цель уже была задета этим swing.
    pub fn mark_struck(&mut self, entity: Entity) -> bool {
        if self.has_struck(entity) {
            return false;
        }
        self.struck.push(entity);
        true
    }

    pub fn struck(&self) -> &[Entity] {
        &self.struck
    }
}

/// Melee weapon (клинок)
///
/// `is_attacking()`: короткое visual lockout окно после удара
/// (блокирует смену оружия), не зависит от cooldown.
#[derive(Debug, Clone, Reflect)]
pub struct MeleeWeapon {
    pub damage: u32,
    pub cooldown_duration: f32,
    /// Дальность удара (метры)
    pub range: f32,
    /// Половина ширины дуги (радианы)
    pub arc_half_width: f32,
    /// Длительность visual lockout (секунды)
    pub lockout_duration: f32,
    cooldown: Cooldown,
    lockout: Cooldown,
    pending_swing: Option<MeleeSwing>,
}

impl MeleeWeapon {
    pub fn new(damage: u32, cooldown_duration: f32, range: f32, arc_half_width: f32, lockout_duration: f32) -> Self {
        Self {
            damage,
            cooldown_duration,
            range,
            arc_half_width,
            lockout_duration,
            cooldown: Cooldown::READY,
            lockout: Cooldown::READY,
            pending_swing: None,
        }
    }

    /// Клинок (fallback оружие без патронов)
    pub fn blade() -> Self {
        Self::new(25, 0.6, 2.2, 60f32.to_radians(), 0.3)
    }

    pub fn can_attack(&self) -> bool {
        self.cooldown.is_ready()
    }

    /// Удар в сторону `target_point`
    ///
    /// Swing ждёт в `pending_swing` до резолва (тот же тик).
    pub fn try_attack(&mut self, origin: &AttackOrigin, target_point: Vec3) -> Result<(), AttackRefusal> {
        if !self.cooldown.is_ready() {
            return Err(AttackRefusal::OnCooldown);
        }

        self.pending_swing = Some(MeleeSwing::new(
            origin.entity,
            origin.position,
            origin.aim_yaw(target_point),
            self.arc_half_width,
            self.range,
            self.damage,
        ));
        self.cooldown.reset(self.cooldown_duration);
        self.lockout.reset(self.lockout_duration);
        Ok(())
    }

    pub fn attack(&mut self, origin: &AttackOrigin, target_point: Vec3) -> bool {
        self.try_attack(origin, target_point).is_ok()
    }

    pub fn is_attacking(&self) -> bool {
        !self.lockout.is_ready()
    }

    pub fn update(&mut self, dt: f32) {
        self.cooldown.tick(dt);
        self.lockout.tick(dt);
    }

    /// Забрать swing для резолва
    pub fn take_swing(&mut self) -> Option<MeleeSwing> {
        self.pending_swing.take()
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown.remaining()
    }
}

// ============================================================================
// Weapon (tagged variant)
// ============================================================================

/// Оружие актора
#[derive(Debug, Clone, Reflect)]
pub enum Weapon {
    Ranged(RangedWeapon),
    Melee(MeleeWeapon),
}

impl Weapon {
    pub fn kind(&self) -> WeaponKind {
        match self {
            Weapon::Ranged(_) => WeaponKind::Ranged,
            Weapon::Melee(_) => WeaponKind::Melee,
        }
    }

    pub fn can_attack(&self) -> bool {
        match self {
            Weapon::Ranged(ranged) => ranged.can_attack(),
            Weapon::Melee(melee) => melee.can_attack(),
        }
    }

    pub fn try_attack(&mut self, origin: &AttackOrigin, target_point: Vec3) -> Result<(), AttackRefusal> {
        match self {
            Weapon::Ranged(ranged) => ranged.try_attack(origin, target_point).map(|_| ()),
            Weapon::Melee(melee) => melee.try_attack(origin, target_point),
        }
    }

    pub fn attack(&mut self, origin: &AttackOrigin, target_point: Vec3) -> bool {
        self.try_attack(origin, target_point).is_ok()
    }

    /// Ranged не имеет lockout окна
    pub fn is_attacking(&self) -> bool {
        match self {
            Weapon::Ranged(_) => false,
            Weapon::Melee(melee) => melee.is_attacking(),
        }
    }

    pub fn update(&mut self, dt: f32) {
        match self {
            Weapon::Ranged(ranged) => ranged.update(dt),
            Weapon::Melee(melee) => melee.update(dt),
        }
    }

    pub fn ammo(&self) -> AmmoCount {
        match self {
            Weapon::Ranged(ranged) => AmmoCount::Limited {
                current: ranged.ammo(),
                max: ranged.max_ammo(),
            },
            Weapon::Melee(_) => AmmoCount::Unlimited,
        }
    }

    pub fn has_ammo(&self) -> bool {
        self.ammo().has_ammo()
    }

    pub fn cooldown_remaining(&self) -> f32 {
        match self {
            Weapon::Ranged(ranged) => ranged.cooldown_remaining(),
            Weapon::Melee(melee) => melee.cooldown_remaining(),
        }
    }

    pub fn damage(&self) -> u32 {
        match self {
            Weapon::Ranged(ranged) => ranged.damage,
            Weapon::Melee(melee) => melee.damage,
        }
    }

    pub fn range(&self) -> f32 {
        match self {
            Weapon::Ranged(ranged) => ranged.range(),
            Weapon::Melee(melee) => melee.range,
        }
    }
}

impl From<RangedWeapon> for Weapon {
    fn from(weapon: RangedWeapon) -> Self {
        Weapon::Ranged(weapon)
    }
}

impl From<MeleeWeapon> for Weapon {
    fn from(weapon: MeleeWeapon) -> Self {
        Weapon::Melee(weapon)
    }
}
