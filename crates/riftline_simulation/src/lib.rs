//! RIFTLINE Simulation Core
//!
//! ECS-симуляция боевого ядра на Bevy 0.16 (headless, без рендера)
//!
//! Архитектура:
//! - ECS = game state + combat rules (оружие, projectiles, AI, урон)
//! - Presentation (HUD, VFX, audio, input): снаружи, общается через events
//! - Время тика приходит извне (`step`), никакого wall clock внутри систем

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod logger;
pub mod shared;

// Re-export базовых компонентов для удобства
pub use ai::{AIConfig, AIPlugin, AIState, HostileAI};
pub use combat::{
    ActiveWeaponChanged, AmmoCount, AmmoPickup, AttackIntent, AttackRefusal, CombatConfig, CombatPlugin, CombatSet,
    Cooldown, CycleDirection, CycleWeaponIntent, DamageDealt, DamageSource, Dead, EntityDied, MeleeWeapon,
    PointsScored, ProjectilePool, RangedWeapon, ScoreChanged, StatChanged, StatKind, SwitchRefusal,
    SwitchWeaponIntent, Weapon, WeaponFired, WeaponInventory, WeaponKind,
};
pub use components::*;
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, LogLevel};

/// Шаг по умолчанию (60Hz)
pub const DEFAULT_TICK_DELTA: f32 = 1.0 / 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin {
    /// Seed для DeterministicRng (если RNG ещё не вставлен)
    pub seed: u64,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Детерминистичный RNG: вставленный заранее не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(self.seed));
        }

        app.init_resource::<SimulationTick>()
            .register_type::<SimulationTick>()
            .register_type::<Actor>()
            .register_type::<Player>()
            .register_type::<Facing>()
            .register_type::<Health>()
            .register_type::<Armor>()
            .register_type::<ReportedStats>()
            .register_type::<HostileAI>()
            .register_type::<AIConfig>()
            // Подсистемы (ECS)
            .add_plugins((CombatPlugin, AIPlugin));
    }
}

/// Текущий тик симуляции
///
/// `delta`: elapsed time этого тика (секунды), задаётся через `step`.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct SimulationTick {
    pub delta: f32,
    pub frame: u64,
}

/// Один тик симуляции с заданным elapsed time
///
/// Отрицательный `dt` считается нулём.
pub fn step(app: &mut App, dt: f32) {
    {
        let mut tick = app.world_mut().get_resource_or_insert_with(SimulationTick::default);
        tick.delta = dt.max(0.0);
        tick.frame += 1;
    }
    app.update();
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins).add_plugins(SimulationPlugin { seed });

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
