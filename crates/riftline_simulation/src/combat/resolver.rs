//! Combat resolver: попадания projectiles и melee swings
//!
//! Чистые функции (`resolve_projectile_hits`, `resolve_swing`) работают над
//! snapshot целей и ничего не знают про ECS. Системы ниже собирают snapshot
//! из Query и применяют урон через `land_hit`.
//!
//! Правила:
//! - Projectile поражает максимум одного актора, затем деактивируется
//! - Проверяется весь отрезок полёта за тик (previous → current), не только конец
//! - Swing может задеть несколько целей, но каждую максимум один раз
//! - Владелец никогда не попадает сам в себя

use bevy::prelude::*;

use super::config::CombatConfig;
use super::damage::{land_hit, CombatSignals, Dead, Hit};
use super::events::DamageSource;
use super::inventory::WeaponInventory;
use super::projectile::ProjectilePool;
use super::weapon::{MeleeSwing, Weapon};
use crate::ai::{AIConfig, HostileAI};
use crate::components::{Actor, Armor, Health};
use crate::shared::{planar_distance, planar_segment_distance};

/// Цель в snapshot резолва
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTarget {
    pub entity: Entity,
    pub position: Vec3,
    /// false: мёртв / умирает (попадания не засчитываются)
    pub alive: bool,
}

/// Проверить активные projectiles против целей
///
/// Цель засчитывается, если отрезок полёта за тик прошёл ближе `hit_radius`.
/// `on_hit(target)` применяет урон и возвращает true если цель умерла.
/// Возвращает число засчитанных попаданий.
pub fn resolve_projectile_hits<F>(
    pool: &mut ProjectilePool,
    owner: Entity,
    hit_radius: f32,
    targets: &mut [HitTarget],
    mut on_hit: F,
) -> usize
where
    F: FnMut(Entity) -> bool,
{
    let mut hits = 0;

    for id in pool.active_ids() {
        let Some((from, to)) = pool.get(id).map(|projectile| (projectile.previous_position, projectile.position)) else {
            continue;
        };

        // Весь путь за тик, первая цель по ходу полёта
        let struck = targets
            .iter_mut()
            .filter(|target| {
                target.alive
                    && target.entity != owner
                    && planar_segment_distance(from, to, target.position) <= hit_radius
            })
            .min_by(|a, b| planar_distance(from, a.position).total_cmp(&planar_distance(from, b.position)));

        if let Some(target) = struck {
            if on_hit(target.entity) {
                target.alive = false;
            }
            pool.deactivate(id);
            hits += 1;
        }
    }

    hits
}

/// Резолв одного melee swing против целей
///
/// `on_hit(target)` применяет урон и возвращает true если цель умерла.
pub fn resolve_swing<F>(swing: &mut MeleeSwing, targets: &mut [HitTarget], mut on_hit: F) -> usize
where
    F: FnMut(Entity) -> bool,
{
    let mut hits = 0;

    for target in targets.iter_mut() {
        if !target.alive || target.entity == swing.attacker || swing.has_struck(target.entity) {
            continue;
        }
        if !swing.covers(target.position) {
            continue;
        }

        swing.mark_struck(target.entity);
        if on_hit(target.entity) {
            target.alive = false;
        }
        hits += 1;
    }

    hits
}

// ============================================================================
// ECS systems
// ============================================================================

/// Акторы, которые могут получить урон
pub type CombatTargets<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static Transform,
        &'static mut Health,
        Option<&'static mut Armor>,
        Option<&'static mut HostileAI>,
        Option<&'static AIConfig>,
    ),
    (With<Actor>, Without<Dead>),
>;

fn collect_targets(targets: &CombatTargets) -> Vec<HitTarget> {
    targets
        .iter()
        .map(|(entity, transform, health, _, ai, _)| HitTarget {
            entity,
            position: transform.translation,
            alive: health.is_alive() && !ai.is_some_and(|ai| ai.is_dying()),
        })
        .collect()
}

fn strike(targets: &mut CombatTargets, signals: &mut CombatSignals, hit: Hit) -> bool {
    let Ok((_, _, mut health, mut armor, mut ai, config)) = targets.get_mut(hit.target) else {
        return false;
    };

    let hostile = match (ai.as_deref_mut(), config) {
        (Some(ai), Some(config)) => Some((ai, config)),
        _ => None,
    };

    land_hit(&mut health, armor.as_deref_mut(), hostile, hit, signals)
}

/// Система: melee swings, созданные в этом тике
pub fn resolve_melee_swings(
    mut attackers: Query<(Entity, &mut WeaponInventory)>,
    mut targets: CombatTargets,
    mut signals: CombatSignals,
) {
    let mut snapshot: Option<Vec<HitTarget>> = None;

    for (attacker, mut inventory) in attackers.iter_mut() {
        let swings = inventory.take_pending_swings();
        if swings.is_empty() {
            continue;
        }

        let snapshot = snapshot.get_or_insert_with(|| collect_targets(&targets));

        for mut swing in swings {
            let damage = swing.damage;
            let hits = resolve_swing(&mut swing, snapshot, |target| {
                strike(
                    &mut targets,
                    &mut signals,
                    Hit {
                        attacker,
                        target,
                        damage,
                        source: DamageSource::Melee,
                    },
                )
            });

            crate::log(&format!("Melee: {:?} swing hit {} target(s)", attacker, hits));
        }
    }
}

/// Система: коллизии projectiles с акторами
pub fn resolve_projectile_collisions(
    config: Res<CombatConfig>,
    mut shooters: Query<(Entity, &mut WeaponInventory)>,
    mut targets: CombatTargets,
    mut signals: CombatSignals,
) {
    let mut snapshot: Option<Vec<HitTarget>> = None;

    for (owner, mut inventory) in shooters.iter_mut() {
        for weapon in inventory.weapons_mut() {
            let Weapon::Ranged(ranged) = weapon else {
                continue;
            };
            if ranged.pool().active_count() == 0 {
                continue;
            }

            let damage = ranged.damage;
            let snapshot = snapshot.get_or_insert_with(|| collect_targets(&targets));

            resolve_projectile_hits(ranged.pool_mut(), owner, config.hit_radius, snapshot, |target| {
                strike(
                    &mut targets,
                    &mut signals,
                    Hit {
                        attacker: owner,
                        target,
                        damage,
                        source: DamageSource::Ranged,
                    },
                )
            });
        }
    }
}
