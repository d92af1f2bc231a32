//! Projectile pool: фиксированный набор переиспользуемых projectile слотов
//!
//! Архитектура:
//! - Arena (Vec<Projectile>) + free-list индексов → O(1) acquire/release
//! - `ProjectileId` несёт generation: устаревший handle (слот уже
//!   переиспользован) игнорируется в `deactivate`
//! - Pool exhausted → `None` (backpressure при непрерывной стрельбе, не ошибка)

use bevy::prelude::*;

/// Capacity пула по умолчанию
pub const DEFAULT_POOL_CAPACITY: usize = 50;

/// Handle на projectile слот
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub struct ProjectileId {
    index: u32,
    generation: u32,
}

impl ProjectileId {
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// Projectile слот
///
/// Активен между тиком выстрела и тиком timeout/попадания.
#[derive(Debug, Clone, Default, Reflect)]
pub struct Projectile {
    pub active: bool,
    pub position: Vec3,
    /// Позиция в начале последнего тика (swept hit test)
    pub previous_position: Vec3,
    pub velocity: Vec3,
    /// Оставшееся время жизни (секунды)
    pub lifetime: f32,
    generation: u32,
}

/// Fixed-capacity pool projectiles
#[derive(Debug, Clone, Reflect)]
pub struct ProjectilePool {
    slots: Vec<Projectile>,
    /// Стек свободных индексов (последний: следующий к выдаче)
    free: Vec<u32>,
}

impl Default for ProjectilePool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

impl ProjectilePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Projectile::default(); capacity],
            // Reverse: первым выдаётся слот 0
            free: (0..capacity as u32).rev().collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.free.is_empty()
    }

    /// Взять свободный слот (active = true, state сброшен)
    ///
    /// `None`: pool exhausted.
    pub fn acquire(&mut self) -> Option<ProjectileId> {
        let index = self.free.pop()?;
        let slot = &mut self.slots[index as usize];
        slot.active = true;
        slot.position = Vec3::ZERO;
        slot.previous_position = Vec3::ZERO;
        slot.velocity = Vec3::ZERO;
        slot.lifetime = 0.0;

        Some(ProjectileId {
            index,
            generation: slot.generation,
        })
    }

    /// Acquire + инициализация полёта
    pub fn launch(&mut self, origin: Vec3, velocity: Vec3, lifetime: f32) -> Option<ProjectileId> {
        let id = self.acquire()?;
        let slot = &mut self.slots[id.index()];
        slot.position = origin;
        slot.previous_position = origin;
        slot.velocity = velocity;
        slot.lifetime = lifetime;
        Some(id)
    }

    /// Продвинуть активные projectiles, деактивировать истёкшие
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);

        for index in 0..self.slots.len() {
            let slot = &mut self.slots[index];
            if !slot.active {
                continue;
            }

            slot.previous_position = slot.position;
            slot.position += slot.velocity * dt;
            slot.lifetime -= dt;

            if slot.lifetime <= 0.0 {
                self.release(index);
            }
        }
    }

    /// Вернуть слот в pool. Идемпотентно: повторный вызов (или устаревший
    /// handle): no-op, возвращает false.
    pub fn deactivate(&mut self, id: ProjectileId) -> bool {
        match self.slots.get(id.index()) {
            Some(slot) if slot.active && slot.generation == id.generation => {
                self.release(id.index());
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.active && slot.generation == id.generation)
    }

    /// Handles всех активных projectiles (snapshot, pool можно мутировать)
    pub fn active_ids(&self) -> Vec<ProjectileId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.active)
            .map(|(index, slot)| ProjectileId {
                index: index as u32,
                generation: slot.generation,
            })
            .collect()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Projectile> {
        self.slots.iter().filter(|slot| slot.active)
    }

    fn release(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        slot.active = false;
        slot.velocity = Vec3::ZERO;
        slot.lifetime = 0.0;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index as u32);
    }
}
