//! Применение урона + смерть
//!
//! Единая точка входа для всех источников урона (projectile, melee swing,
//! контактный удар AI): `land_hit`. Гарантирует:
//! - Armor поглощает первым, остаток в Health
//! - Мёртвые / умирающие цели урон не получают
//! - EntityDied + очки ровно один раз на смерть

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::events::{DamageDealt, DamageSource, EntityDied, PointsScored};
use crate::ai::{AIConfig, HostileAI};
use crate::components::{apply_damage, Armor, Health, Score};
use crate::SimulationTick;

/// Компонент-маркер: entity мертв (Health == 0)
///
/// Ставится не-hostile акторам (игрок). Hostile акторы вместо этого
/// проходят death sequence (`AIState::Dying`) и деспавнятся.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Одно попадание
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub source: DamageSource,
}

/// Всё, что нужно для публикации последствий попадания
#[derive(SystemParam)]
pub struct CombatSignals<'w, 's> {
    commands: Commands<'w, 's>,
    damage_dealt: EventWriter<'w, DamageDealt>,
    deaths: EventWriter<'w, EntityDied>,
    points: EventWriter<'w, PointsScored>,
    score: ResMut<'w, Score>,
}

impl CombatSignals<'_, '_> {
    /// Hostile → Dying + EntityDied + очки
    ///
    /// false: уже умирал (ничего не публикуется).
    pub fn hostile_killed(
        &mut self,
        victim: Entity,
        killer: Option<Entity>,
        ai: &mut HostileAI,
        config: &AIConfig,
    ) -> bool {
        if !ai.begin_dying(config.death_duration) {
            return false;
        }

        self.deaths.write(EntityDied { entity: victim, killer });

        if config.points > 0 {
            self.points.write(PointsScored {
                victim,
                killer,
                points: config.points,
            });
            self.score.add(config.points);
        }
        true
    }
}

/// Применить попадание к цели
///
/// `hostile`: Some для hostile акторов (смерть → Dying + очки).
/// Возвращает true если ЭТО попадание убило цель.
pub fn land_hit(
    health: &mut Health,
    armor: Option<&mut Armor>,
    hostile: Option<(&mut HostileAI, &AIConfig)>,
    hit: Hit,
    signals: &mut CombatSignals,
) -> bool {
    if !health.is_alive() {
        return false;
    }
    if hostile.as_ref().is_some_and(|(ai, _)| ai.is_dying()) {
        return false;
    }

    let outcome = apply_damage(health, armor, hit.damage);

    signals.damage_dealt.write(DamageDealt {
        attacker: hit.attacker,
        target: hit.target,
        amount: outcome.dealt,
        absorbed: outcome.absorbed,
        source: hit.source,
    });

    crate::log(&format!(
        "Damage: {:?} → {:?} ({:?}, {} dealt, {} absorbed, health {}/{})",
        hit.attacker, hit.target, hit.source, outcome.dealt, outcome.absorbed, health.current, health.max
    ));

    if !outcome.killed {
        return false;
    }

    match hostile {
        Some((ai, config)) => {
            signals.hostile_killed(hit.target, Some(hit.attacker), ai, config);
        }
        None => {
            signals.deaths.write(EntityDied {
                entity: hit.target,
                killer: Some(hit.attacker),
            });
            signals.commands.entity(hit.target).try_insert(Dead);
        }
    }

    crate::log_info(&format!("Entity {:?} killed by {:?}", hit.target, hit.attacker));
    true
}

/// Система: death sequence hostile акторов → despawn
///
/// Entity убирается из мира только когда death timer истёк. Тик смерти
/// не засчитывается (см. `HostileAI::advance_death`).
pub fn advance_death_sequences(
    mut commands: Commands,
    tick: Res<SimulationTick>,
    mut dying: Query<(Entity, &mut HostileAI)>,
) {
    for (entity, mut ai) in dying.iter_mut() {
        if !ai.is_dying() {
            continue;
        }

        ai.advance_death(tick.delta);

        if ai.death_sequence_finished() {
            commands.entity(entity).despawn();
            crate::log(&format!("Despawned {:?} after death sequence", entity));
        }
    }
}
