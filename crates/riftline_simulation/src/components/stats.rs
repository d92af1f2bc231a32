//! Stat model: Health, Armor, Score
//!
//! Порядок поглощения урона: сначала Armor, остаток, в Health.
//! Инварианты: 0 ≤ current ≤ max для Health и Armor (saturating арифметика).

use bevy::prelude::*;

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Вычесть урон. Возвращает true если ЭТОТ вызов убил актора.
    ///
    /// Мёртвый актор урон не получает (повторный вызов: no-op, false).
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.current = self.current.saturating_sub(amount);
        !self.is_alive()
    }

    /// Лечение (clamp к max). Мёртвых не воскрешает.
    pub fn heal(&mut self, amount: u32) {
        if self.is_alive() {
            self.current = self.current.saturating_add(amount).min(self.max);
        }
    }

    /// Установить значение (clamp к [0, max])
    pub fn set(&mut self, value: u32) {
        self.current = value.min(self.max);
    }
}

/// Броня: поглощает урон до Health
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Armor {
    pub current: u32,
    pub max: u32,
}

impl Armor {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Поглотить часть урона. Возвращает сколько поглощено.
    pub fn absorb(&mut self, amount: u32) -> u32 {
        let absorbed = amount.min(self.current);
        self.current -= absorbed;
        absorbed
    }

    pub fn repair(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }
}

/// Результат применения урона
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Поглощено бронёй
    pub absorbed: u32,
    /// Реально снято с Health
    pub dealt: u32,
    /// Этот удар убил цель
    pub killed: bool,
}

impl DamageOutcome {
    /// Урон проигнорирован (цель уже мертва)
    pub const IGNORED: DamageOutcome = DamageOutcome {
        absorbed: 0,
        dealt: 0,
        killed: false,
    };
}

/// Применить урон: Armor → Health
///
/// Мёртвая цель → `DamageOutcome::IGNORED` (броня тоже не тратится).
pub fn apply_damage(health: &mut Health, armor: Option<&mut Armor>, amount: u32) -> DamageOutcome {
    if !health.is_alive() {
        return DamageOutcome::IGNORED;
    }

    let absorbed = armor.map_or(0, |armor| armor.absorb(amount));
    let before = health.current;
    let killed = health.take_damage(amount - absorbed);

    DamageOutcome {
        absorbed,
        dealt: before - health.current,
        killed,
    }
}

/// Счёт сессии (очки за убийства)
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Resource)]
pub struct Score {
    pub total: u32,
}

impl Score {
    pub fn add(&mut self, points: u32) {
        self.total = self.total.saturating_add(points);
    }
}

/// Последние значения, отправленные в StatChanged (HUD видел именно их)
///
/// `None`: значение ещё не сообщалось (или стат отсутствует).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ReportedStats {
    pub health: Option<(u32, u32)>,
    pub armor: Option<(u32, u32)>,
    pub ammo: Option<(u32, u32)>,
}
