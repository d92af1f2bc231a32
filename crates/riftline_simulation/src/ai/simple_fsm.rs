//! Simple FSM AI для hostile акторов
//!
//! Конечный автомат: Idle → Wander ⇄ Chase ⇄ Attack, любой → Dying (terminal)
//!
//! Архитектура:
//! - State выводится каждый тик из дистанции до игрока + cooldowns
//! - Напрямую state ставит только смерть (Dying, необратимо)
//! - Attack = контактный урон напрямую цели (не projectile)
//! - Wander точки/интервалы: из DeterministicRng (детерминизм)

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::combat::{land_hit, CombatSignals, Cooldown, DamageSource, Hit};
use crate::components::{Actor, Armor, Facing, Health, Player};
use crate::shared::{direction_from_yaw, planar_direction, planar_distance, yaw_of};
use crate::{DeterministicRng, SimulationTick};

/// AI FSM состояния
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum AIState {
    /// Idle: только что заспавнен, ещё не думал
    #[default]
    Idle,
    /// Wander: бродим вокруг случайной точки
    Wander,
    /// Chase: цель в detection range, бежим к ней
    Chase,
    /// Attack: цель в attack range, бьём по cooldown
    Attack,
    /// Dying: health == 0, death sequence, потом despawn
    Dying,
}

/// Параметры hostile AI
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct AIConfig {
    /// Радиус обнаружения игрока (метры)
    pub detection_range: f32,
    /// Радиус контактной атаки (метры)
    pub attack_range: f32,
    /// Скорость погони (м/с)
    pub chase_speed: f32,
    /// Скорость блуждания (м/с)
    pub wander_speed: f32,
    /// Радиус выбора wander точки от текущей позиции (метры)
    pub wander_radius: f32,
    /// Интервал смены wander точки: [min, max] секунд
    pub wander_interval_min: f32,
    pub wander_interval_max: f32,
    /// Ближе этого к wander точке: стоим
    pub wander_tolerance: f32,
    /// Контактный урон за удар
    pub contact_damage: u32,
    /// Cooldown контактной атаки (секунды)
    pub attack_cooldown: f32,
    /// Длительность death sequence до despawn (секунды)
    pub death_duration: f32,
    /// Очки за убийство
    pub points: u32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            detection_range: 15.0,
            attack_range: 1.5,
            chase_speed: 4.0,
            wander_speed: 1.5,
            wander_radius: 6.0,
            wander_interval_min: 2.0,
            wander_interval_max: 4.0,
            wander_tolerance: 0.5,
            contact_damage: 10,
            attack_cooldown: 1.0,
            death_duration: 1.5,
            points: 100,
        }
    }
}

/// Hostile AI компонент (state + таймеры)
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
#[require(Actor, AIConfig)]
pub struct HostileAI {
    pub state: AIState,
    /// Текущая wander точка
    pub wander_target: Option<Vec3>,
    /// Время до смены wander точки (секунды)
    pub wander_timer: f32,
    pub attack_cooldown: Cooldown,
    death_timer: Cooldown,
    /// Тик входа в Dying ещё не закончился (timer не тикает)
    death_entered: bool,
}

/// Результат одного тика AI (что сделать с актором)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AIStep {
    /// Смещение позиции за тик
    pub displacement: Vec3,
    /// Новый yaw (None: не поворачиваться)
    pub facing: Option<f32>,
    /// Нанести контактный удар цели
    pub strike: bool,
}

/// Выбор состояния по дистанции до цели (Dying: terminal)
pub fn select_state(current: AIState, target_distance: Option<f32>, config: &AIConfig) -> AIState {
    if current == AIState::Dying {
        return AIState::Dying;
    }

    match target_distance {
        None => AIState::Wander,
        Some(distance) if distance >= config.detection_range => AIState::Wander,
        Some(distance) if distance > config.attack_range => AIState::Chase,
        Some(_) => AIState::Attack,
    }
}

impl HostileAI {
    pub fn is_dying(&self) -> bool {
        self.state == AIState::Dying
    }

    /// Жив ли актор с точки зрения spawner (ещё не в death sequence)
    pub fn is_live(&self) -> bool {
        !self.is_dying()
    }

    /// Перейти в Dying. false: уже умирал (переход ровно один раз).
    pub fn begin_dying(&mut self, death_duration: f32) -> bool {
        if self.is_dying() {
            return false;
        }
        self.state = AIState::Dying;
        self.death_timer.reset(death_duration);
        self.death_entered = true;
        true
    }

    /// Продвинуть death sequence
    ///
    /// Первый вызов после `begin_dying` закрывает тик смерти и время не считает:
    /// sequence длится полные `death_duration` после него.
    pub fn advance_death(&mut self, dt: f32) {
        if !self.is_dying() {
            return;
        }
        if std::mem::take(&mut self.death_entered) {
            return;
        }
        self.death_timer.tick(dt);
    }

    /// Death sequence завершена: можно убирать из мира
    pub fn death_sequence_finished(&self) -> bool {
        self.is_dying() && self.death_timer.is_ready()
    }

    /// Один тик решения
    ///
    /// `target`: позиция отслеживаемого игрока (None, цели нет).
    pub fn think<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        position: Vec3,
        target: Option<Vec3>,
        config: &AIConfig,
        rng: &mut R,
    ) -> AIStep {
        self.attack_cooldown.tick(dt);

        if self.is_dying() {
            return AIStep::default();
        }

        let distance = target.map(|target| planar_distance(position, target));
        self.state = select_state(self.state, distance, config);

        match (self.state, target) {
            (AIState::Chase, Some(target)) => move_toward(position, target, config.chase_speed * dt, 0.0),
            (AIState::Attack, Some(target)) => {
                let facing = planar_direction(position, target).map(yaw_of);
                let strike = self.attack_cooldown.is_ready();
                if strike {
                    self.attack_cooldown.reset(config.attack_cooldown);
                }
                AIStep {
                    displacement: Vec3::ZERO,
                    facing,
                    strike,
                }
            }
            (AIState::Wander, _) => self.wander(dt, position, config, rng),
            _ => AIStep::default(),
        }
    }

    fn wander<R: Rng + ?Sized>(&mut self, dt: f32, position: Vec3, config: &AIConfig, rng: &mut R) -> AIStep {
        self.wander_timer = (self.wander_timer - dt.max(0.0)).max(0.0);

        let wander_target = match self.wander_target {
            Some(point) if self.wander_timer > 0.0 => point,
            _ => {
                let angle = rng.gen::<f32>() * TAU;
                let distance = rng.gen::<f32>() * config.wander_radius;
                let point = position + direction_from_yaw(angle) * distance;

                let spread = (config.wander_interval_max - config.wander_interval_min).max(0.0);
                self.wander_timer = config.wander_interval_min + rng.gen::<f32>() * spread;
                self.wander_target = Some(point);
                point
            }
        };

        move_toward(position, wander_target, config.wander_speed * dt, config.wander_tolerance)
    }
}

/// Шаг к точке (не дальше самой точки); ближе `tolerance`: стоим
fn move_toward(position: Vec3, target: Vec3, max_step: f32, tolerance: f32) -> AIStep {
    let distance = planar_distance(position, target);
    if distance <= tolerance {
        return AIStep::default();
    }

    let Some(direction) = planar_direction(position, target) else {
        return AIStep::default();
    };

    AIStep {
        displacement: direction * max_step.max(0.0).min(distance),
        facing: Some(yaw_of(direction)),
        strike: false,
    }
}

/// Игроки: цели hostile AI
pub type PlayerTargets<'w, 's> = Query<
    'w,
    's,
    (Entity, &'static Transform, &'static mut Health, Option<&'static mut Armor>),
    (With<Player>, Without<HostileAI>),
>;

/// Ближайший живой игрок
fn nearest_live_player(position: Vec3, players: &PlayerTargets) -> Option<(Entity, Vec3)> {
    players
        .iter()
        .filter(|(_, _, health, _)| health.is_alive())
        .map(|(entity, transform, _, _)| (entity, transform.translation))
        .min_by(|(_, a), (_, b)| {
            planar_distance(position, *a).total_cmp(&planar_distance(position, *b))
        })
}

/// Система: hostile AI тик (transitions + движение + контактные удары)
///
/// Порядок приоритетов:
/// 1. Dying (health == 0): terminal
/// 2. Нет цели → Wander
/// 3. Дистанция до цели → Wander / Chase / Attack
pub fn hostile_ai_tick(
    tick: Res<SimulationTick>,
    mut rng: ResMut<DeterministicRng>,
    mut hostiles: Query<
        (Entity, &mut HostileAI, &AIConfig, &mut Transform, &mut Facing, &Health),
        Without<Player>,
    >,
    mut players: PlayerTargets,
    mut signals: CombatSignals,
) {
    let dt = tick.delta;

    for (entity, mut ai, config, mut transform, mut facing, health) in hostiles.iter_mut() {
        // Урон мог прийти мимо resolver (внешний источник): смерть без killer,
        // но с тем же EntityDied + очками
        if !health.is_alive() && signals.hostile_killed(entity, None, &mut ai, config) {
            crate::log(&format!("AI: {:?} → Dying (health depleted)", entity));
        }

        let position = transform.translation;
        let target = nearest_live_player(position, &players);
        let previous = ai.state;

        let step = ai.think(dt, position, target.map(|(_, point)| point), config, &mut rng.rng);

        if previous != ai.state {
            crate::log(&format!("AI: {:?} {:?} → {:?}", entity, previous, ai.state));
        }

        transform.translation += step.displacement;
        if let Some(yaw) = step.facing {
            facing.yaw = yaw;
        }

        if !step.strike {
            continue;
        }
        let Some((target_entity, _)) = target else {
            continue;
        };
        let Ok((_, _, mut target_health, mut target_armor)) = players.get_mut(target_entity) else {
            continue;
        };

        land_hit(
            &mut target_health,
            target_armor.as_deref_mut(),
            None,
            Hit {
                attacker: entity,
                target: target_entity,
                damage: config.contact_damage,
                source: DamageSource::Contact,
            },
            &mut signals,
        );
    }
}
