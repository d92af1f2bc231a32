//! Базовые компоненты акторов: Actor, Player, Facing

use bevy::prelude::*;

use crate::components::stats::{Health, ReportedStats};
use crate::shared::{direction_from_yaw, planar_direction, yaw_of};

/// Актор (игрок, враг): любая entity, которая наносит или получает урон
///
/// Позиция = `Transform.translation` на ground plane (XZ).
/// Автоматически добавляет Health, Facing, Transform через Required Components.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health, Facing, Transform, ReportedStats)]
pub struct Actor;

/// Marker component для player-controlled entity
///
/// Единственная цель, которую отслеживает hostile AI.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Actor)]
pub struct Player;

/// Направление взгляда актора (yaw, радианы; 0 = +Z)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Facing {
    pub yaw: f32,
}

impl Facing {
    pub fn new(yaw: f32) -> Self {
        Self { yaw }
    }

    /// Повернуться к точке (no-op если точка совпадает с позицией)
    pub fn look_at(&mut self, from: Vec3, to: Vec3) {
        if let Some(direction) = planar_direction(from, to) {
            self.yaw = yaw_of(direction);
        }
    }

    pub fn direction(&self) -> Vec3 {
        direction_from_yaw(self.yaw)
    }
}
