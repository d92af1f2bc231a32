//! Планарная геометрия на ground plane (XZ).
//!
//! Вся симуляция считает дистанции и углы в плоскости XZ: высота (Y)
//! игнорируется (top-down / isometric shooter).
//!
//! Конвенция yaw: `yaw = atan2(dir.x, dir.z)`, т.е. yaw = 0 смотрит в +Z,
//! yaw = PI/2 смотрит в +X.

use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

/// Минимальная планарная длина, ниже которой направление считается неопределённым
pub const DIRECTION_EPSILON: f32 = 1e-4;

/// Проекция вектора на ground plane (Y = 0)
pub fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Дистанция между двумя точками без учёта высоты
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar(b - a).length()
}

/// Дистанция от точки до отрезка `start → end` без учёта высоты
///
/// Вырожденный отрезок (start == end): обычная дистанция до точки.
pub fn planar_segment_distance(start: Vec3, end: Vec3, point: Vec3) -> f32 {
    let segment = planar(end - start);
    let length_squared = segment.length_squared();
    if length_squared <= f32::EPSILON {
        return planar_distance(start, point);
    }

    let t = (planar(point - start).dot(segment) / length_squared).clamp(0.0, 1.0);
    planar_distance(start + segment * t, point)
}

/// Единичное планарное направление `from → to`.
///
/// `None` если точки совпадают на ground plane.
pub fn planar_direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    let delta = planar(to - from);
    let length = delta.length();
    if length < DIRECTION_EPSILON || !length.is_finite() {
        None
    } else {
        Some(delta / length)
    }
}

/// Yaw (радианы) планарного направления
pub fn yaw_of(direction: Vec3) -> f32 {
    direction.x.atan2(direction.z)
}

/// Единичное направление для yaw
pub fn direction_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Нормализует угол в диапазон [-PI, PI]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid может вернуть ровно TAU - PI на границе
    if wrapped < -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Абсолютная угловая разница между двумя yaw (0..=PI)
pub fn angular_offset(from_yaw: f32, to_yaw: f32) -> f32 {
    wrap_angle(to_yaw - from_yaw).abs()
}
