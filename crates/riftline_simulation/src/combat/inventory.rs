//! Weapon inventory: оружие актора + активный слот
//!
//! # Flow (каждый тик)
//!
//! 1. `try_switch_to` / `cycle_*`: ручное переключение (intent игрока), до или после `tick`
//! 2. `tick(dt)`: таймеры ВСЕХ оружий (неактивные тоже: cooldown идёт, projectiles летят)
//! 3. `try_auto_switch()`: активный ranged без патронов → melee после auto-switch delay;
//!    конец тика, флаг ручного intent сбрасывается
//!
//! Ручной intent в том же тике имеет приоритет: auto-switch этот тик пропускается.
//! Auto-switch delay: монотонный countdown (как switch cooldown), взводится один раз
//! при обнаружении пустого магазина.

use bevy::prelude::*;
use thiserror::Error;

use super::cooldown::Cooldown;
use super::weapon::{AmmoCount, AttackOrigin, AttackRefusal, MeleeSwing, MeleeWeapon, RangedWeapon, Weapon, WeaponKind};

/// Cooldown ручного переключения (секунды)
pub const DEFAULT_SWITCH_COOLDOWN: f32 = 0.5;

/// Задержка auto-switch на melee после опустошения магазина (секунды)
pub const DEFAULT_AUTO_SWITCH_DELAY: f32 = 0.75;

/// Почему переключение отклонено
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SwitchRefusal {
    #[error("weapon slot {0} does not exist")]
    UnknownSlot(usize),
    #[error("weapon is already active")]
    AlreadyActive,
    #[error("weapon switch is on cooldown")]
    OnCooldown,
    #[error("active weapon is mid-attack")]
    Attacking,
}

/// Направление циклического переключения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum CycleDirection {
    Next,
    Previous,
}

/// Инвентарь оружия (компонент актора)
///
/// Инвариант: `active` всегда валидный индекс (если оружие есть).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct WeaponInventory {
    weapons: Vec<Weapon>,
    active: usize,
    switch_cooldown_duration: f32,
    auto_switch_delay: f32,
    switch_cooldown: Cooldown,
    /// Взведённый auto-switch countdown (None: магазин не пуст / не ranged)
    auto_switch: Option<Cooldown>,
    /// Был ли ручной intent в текущем тике
    manual_intent: bool,
}

impl Default for WeaponInventory {
    fn default() -> Self {
        Self::standard()
    }
}

impl WeaponInventory {
    /// Инвентарь из упорядоченного списка (активен слот 0)
    pub fn new(weapons: Vec<Weapon>) -> Self {
        Self {
            weapons,
            active: 0,
            switch_cooldown_duration: DEFAULT_SWITCH_COOLDOWN,
            auto_switch_delay: DEFAULT_AUTO_SWITCH_DELAY,
            switch_cooldown: Cooldown::READY,
            auto_switch: None,
            manual_intent: false,
        }
    }

    /// Пистолет (слот 0) + клинок (слот 1)
    pub fn standard() -> Self {
        Self::new(vec![RangedWeapon::pistol().into(), MeleeWeapon::blade().into()])
    }

    pub fn with_switch_timings(mut self, switch_cooldown: f32, auto_switch_delay: f32) -> Self {
        self.switch_cooldown_duration = switch_cooldown.max(0.0);
        self.auto_switch_delay = auto_switch_delay.max(0.0);
        self
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn weapons_mut(&mut self) -> &mut [Weapon] {
        &mut self.weapons
    }

    pub fn weapon(&self, slot: usize) -> Option<&Weapon> {
        self.weapons.get(slot)
    }

    pub fn weapon_mut(&mut self, slot: usize) -> Option<&mut Weapon> {
        self.weapons.get_mut(slot)
    }

    pub fn active_slot(&self) -> usize {
        self.active
    }

    pub fn active_weapon(&self) -> Option<&Weapon> {
        self.weapons.get(self.active)
    }

    pub fn active_kind(&self) -> Option<WeaponKind> {
        self.active_weapon().map(Weapon::kind)
    }

    /// Первый слот заданного типа
    pub fn slot_of(&self, kind: WeaponKind) -> Option<usize> {
        self.weapons.iter().position(|weapon| weapon.kind() == kind)
    }

    /// Боезапас активного оружия (`None`: инвентарь пуст)
    pub fn ammo(&self) -> Option<AmmoCount> {
        self.active_weapon().map(Weapon::ammo)
    }

    pub fn has_ammo(&self) -> bool {
        self.active_weapon().is_some_and(Weapon::has_ammo)
    }

    pub fn is_attacking(&self) -> bool {
        self.active_weapon().is_some_and(Weapon::is_attacking)
    }

    pub fn switch_cooldown_remaining(&self) -> f32 {
        self.switch_cooldown.remaining()
    }

    /// Auto-switch взведён (ждёт delay)
    pub fn auto_switch_pending(&self) -> bool {
        self.auto_switch.is_some()
    }

    // ------------------------------------------------------------------------
    // Attack
    // ------------------------------------------------------------------------

    pub fn try_attack(&mut self, origin: &AttackOrigin, target_point: Vec3) -> Result<(), AttackRefusal> {
        let Some(weapon) = self.weapons.get_mut(self.active) else {
            return Err(AttackRefusal::OutOfAmmo);
        };
        weapon.try_attack(origin, target_point)
    }

    pub fn attack(&mut self, origin: &AttackOrigin, target_point: Vec3) -> bool {
        self.try_attack(origin, target_point).is_ok()
    }

    // ------------------------------------------------------------------------
    // Switching
    // ------------------------------------------------------------------------

    /// Ручное переключение на `slot`
    pub fn try_switch_to(&mut self, slot: usize) -> Result<(), SwitchRefusal> {
        self.manual_intent = true;
        self.perform_switch(slot)
    }

    pub fn switch_to(&mut self, slot: usize) -> bool {
        self.try_switch_to(slot).is_ok()
    }

    pub fn try_cycle(&mut self, direction: CycleDirection) -> Result<(), SwitchRefusal> {
        let len = self.weapons.len();
        if len == 0 {
            self.manual_intent = true;
            return Err(SwitchRefusal::UnknownSlot(0));
        }

        let slot = match direction {
            CycleDirection::Next => (self.active + 1) % len,
            CycleDirection::Previous => (self.active + len - 1) % len,
        };
        self.try_switch_to(slot)
    }

    pub fn cycle_next(&mut self) -> bool {
        self.try_cycle(CycleDirection::Next).is_ok()
    }

    pub fn cycle_previous(&mut self) -> bool {
        self.try_cycle(CycleDirection::Previous).is_ok()
    }

    fn perform_switch(&mut self, slot: usize) -> Result<(), SwitchRefusal> {
        if slot >= self.weapons.len() {
            return Err(SwitchRefusal::UnknownSlot(slot));
        }
        if slot == self.active {
            return Err(SwitchRefusal::AlreadyActive);
        }
        if !self.switch_cooldown.is_ready() {
            return Err(SwitchRefusal::OnCooldown);
        }
        if self.is_attacking() {
            return Err(SwitchRefusal::Attacking);
        }

        self.active = slot;
        self.switch_cooldown.reset(self.switch_cooldown_duration);
        self.auto_switch = None;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Per-tick update
    // ------------------------------------------------------------------------

    /// Таймеры всех оружий + switch cooldown + auto-switch countdown
    pub fn tick(&mut self, dt: f32) {
        for weapon in &mut self.weapons {
            weapon.update(dt);
        }
        self.switch_cooldown.tick(dt);
        if let Some(countdown) = self.auto_switch.as_mut() {
            countdown.tick(dt);
        }
    }

    /// Auto-switch пустого ranged → melee
    ///
    /// Возвращает новый слот если переключение произошло.
    /// Завершает тик: флаг ручного intent сбрасывается на любом пути.
    pub fn try_auto_switch(&mut self) -> Option<usize> {
        let manual_intent = std::mem::take(&mut self.manual_intent);

        let depleted = matches!(self.active_weapon(), Some(Weapon::Ranged(ranged)) if !ranged.has_ammo());
        if !depleted {
            self.auto_switch = None;
            return None;
        }

        let melee_slot = self.slot_of(WeaponKind::Melee)?;

        let delay = self.auto_switch_delay;
        let countdown = self.auto_switch.get_or_insert_with(|| Cooldown::new(delay));
        if !countdown.is_ready() || manual_intent {
            return None;
        }

        // Refused (lockout/cooldown) → остаёмся взведёнными, повтор на следующем тике
        self.perform_switch(melee_slot).ok().map(|_| melee_slot)
    }

    /// tick + auto-switch
    ///
    /// Ручной intent, поданный до `update` в этом тике, имеет приоритет.
    pub fn update(&mut self, dt: f32) -> Option<usize> {
        self.tick(dt);
        self.try_auto_switch()
    }

    // ------------------------------------------------------------------------
    // Ammo
    // ------------------------------------------------------------------------

    /// Pickup: патроны во все ranged оружия. true, хоть что-то изменилось.
    pub fn add_ammo(&mut self, amount: u32) -> bool {
        let mut changed = false;
        for weapon in &mut self.weapons {
            if let Weapon::Ranged(ranged) = weapon {
                let before = ranged.ammo();
                ranged.add_ammo(amount);
                changed |= ranged.ammo() != before;
            }
        }
        changed
    }

    /// Забрать все ожидающие melee swings (для резолва)
    pub fn take_pending_swings(&mut self) -> Vec<MeleeSwing> {
        self.weapons
            .iter_mut()
            .filter_map(|weapon| match weapon {
                Weapon::Melee(melee) => melee.take_swing(),
                Weapon::Ranged(_) => None,
            })
            .collect()
    }
}
