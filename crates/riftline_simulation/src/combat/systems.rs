//! Combat ECS systems: таймеры, intents, auto-switch, HUD сигналы
//!
//! Порядок внутри тика задаётся `CombatSet` (см. combat/mod.rs).

use bevy::prelude::*;

use super::damage::Dead;
use super::events::{
    ActiveWeaponChanged, AmmoPickup, AttackIntent, CycleWeaponIntent, ScoreChanged, StatChanged, StatKind,
    SwitchWeaponIntent, WeaponFired,
};
use super::inventory::{CycleDirection, WeaponInventory};
use super::weapon::{AmmoCount, AttackOrigin};
use crate::components::{Armor, Facing, Health, ReportedStats, Score};
use crate::SimulationTick;

/// Система: таймеры оружия (cooldowns, lockout, полёт projectiles, switch cooldown)
pub fn tick_weapon_inventories(tick: Res<SimulationTick>, mut inventories: Query<&mut WeaponInventory>) {
    for mut inventory in inventories.iter_mut() {
        inventory.tick(tick.delta);
    }
}

/// Система: подбор патронов
pub fn apply_ammo_pickups(mut pickups: EventReader<AmmoPickup>, mut inventories: Query<&mut WeaponInventory>) {
    for pickup in pickups.read() {
        let Ok(mut inventory) = inventories.get_mut(pickup.entity) else {
            crate::log_warning(&format!("AmmoPickup: {:?} has no WeaponInventory", pickup.entity));
            continue;
        };

        if inventory.add_ammo(pickup.amount) {
            crate::log(&format!("AmmoPickup: {:?} +{} ammo", pickup.entity, pickup.amount));
        }
    }
}

enum SwitchRequest {
    Slot(usize),
    Cycle(CycleDirection),
}

/// Система: ручное переключение оружия (slot hotkeys + cycle)
///
/// Отказ (cooldown, lockout, неизвестный слот): не ошибка, только лог.
pub fn process_switch_intents(
    mut switches: EventReader<SwitchWeaponIntent>,
    mut cycles: EventReader<CycleWeaponIntent>,
    mut inventories: Query<&mut WeaponInventory, Without<Dead>>,
    mut changed: EventWriter<ActiveWeaponChanged>,
) {
    let requests = switches
        .read()
        .map(|intent| (intent.entity, SwitchRequest::Slot(intent.slot)))
        .chain(cycles.read().map(|intent| (intent.entity, SwitchRequest::Cycle(intent.direction))));

    for (entity, request) in requests {
        let Ok(mut inventory) = inventories.get_mut(entity) else {
            continue;
        };

        let result = match request {
            SwitchRequest::Slot(slot) => inventory.try_switch_to(slot),
            SwitchRequest::Cycle(direction) => inventory.try_cycle(direction),
        };

        match result {
            Ok(()) => {
                let slot = inventory.active_slot();
                let Some(kind) = inventory.active_kind() else {
                    continue;
                };
                changed.write(ActiveWeaponChanged {
                    entity,
                    slot,
                    kind,
                    automatic: false,
                });
                crate::log(&format!("Weapon switch: {:?} → slot {} ({:?})", entity, slot, kind));
            }
            Err(refusal) => {
                crate::log(&format!("Weapon switch refused for {:?}: {}", entity, refusal));
            }
        }
    }
}

/// Система: атака активным оружием
///
/// Успех → актор поворачивается к цели + WeaponFired.
/// Melee swing резолвится сразу после этой системы (`resolve_melee_swings`).
pub fn process_attack_intents(
    mut intents: EventReader<AttackIntent>,
    mut attackers: Query<(&mut WeaponInventory, &Transform, &mut Facing, &Health), Without<Dead>>,
    mut fired: EventWriter<WeaponFired>,
) {
    for intent in intents.read() {
        let Ok((mut inventory, transform, mut facing, health)) = attackers.get_mut(intent.entity) else {
            continue;
        };
        if !health.is_alive() {
            continue;
        }

        let origin = AttackOrigin {
            entity: intent.entity,
            position: transform.translation,
            facing: facing.yaw,
        };

        match inventory.try_attack(&origin, intent.target_point) {
            Ok(()) => {
                facing.yaw = origin.aim_yaw(intent.target_point);

                let slot = inventory.active_slot();
                let Some(kind) = inventory.active_kind() else {
                    continue;
                };
                fired.write(WeaponFired {
                    shooter: intent.entity,
                    slot,
                    kind,
                    origin: origin.position,
                    target_point: intent.target_point,
                });
            }
            Err(refusal) => {
                crate::log(&format!("Attack refused for {:?}: {}", intent.entity, refusal));
            }
        }
    }
}

/// Система: пустой ranged → melee после auto-switch delay
pub fn auto_switch_depleted_weapons(
    mut inventories: Query<(Entity, &mut WeaponInventory), Without<Dead>>,
    mut changed: EventWriter<ActiveWeaponChanged>,
) {
    for (entity, mut inventory) in inventories.iter_mut() {
        let Some(slot) = inventory.try_auto_switch() else {
            continue;
        };
        let Some(kind) = inventory.active_kind() else {
            continue;
        };

        changed.write(ActiveWeaponChanged {
            entity,
            slot,
            kind,
            automatic: true,
        });
        crate::log_info(&format!("Auto-switch: {:?} out of ammo → slot {} ({:?})", entity, slot, kind));
    }
}

/// Система: StatChanged только при реальном изменении значения
///
/// Первое наблюдение актора тоже сообщается (HUD получает стартовые значения).
pub fn notify_stat_changes(
    mut actors: Query<(Entity, &Health, Option<&Armor>, Option<&WeaponInventory>, &mut ReportedStats)>,
    mut changed: EventWriter<StatChanged>,
) {
    for (entity, health, armor, inventory, mut reported) in actors.iter_mut() {
        let health_now = Some((health.current, health.max));
        let armor_now = armor.map(|armor| (armor.current, armor.max));
        let ammo_now = match inventory.and_then(WeaponInventory::ammo) {
            Some(AmmoCount::Limited { current, max }) => Some((current, max)),
            _ => None,
        };

        let report = ReportedStats {
            health: health_now,
            armor: armor_now,
            ammo: ammo_now,
        };
        if *reported == report {
            continue;
        }

        let updates = [
            (StatKind::Health, reported.health, health_now),
            (StatKind::Armor, reported.armor, armor_now),
            (StatKind::Ammo, reported.ammo, ammo_now),
        ];
        for (stat, before, now) in updates {
            if before == now {
                continue;
            }
            if let Some((current, max)) = now {
                changed.write(StatChanged {
                    entity,
                    stat,
                    current,
                    max,
                });
            }
        }

        *reported = report;
    }
}

/// Система: ScoreChanged при изменении общего счёта
pub fn notify_score_changes(score: Res<Score>, mut last_total: Local<u32>, mut changed: EventWriter<ScoreChanged>) {
    if score.total == *last_total {
        return;
    }

    *last_total = score.total;
    changed.write(ScoreChanged { total: score.total });
}
