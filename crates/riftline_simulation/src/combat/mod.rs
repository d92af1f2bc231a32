//! Combat system module
//!
//! ECS ответственность:
//! - Game state: Health, Armor, WeaponInventory, Score
//! - Combat rules: cooldowns, ammo, projectile pool, melee arc, урон
//! - Events: intents (input → ECS) и signals (ECS → presentation)
//!
//! Presentation (HUD, VFX, audio) только читает signals и держит свои таймеры.

use bevy::prelude::*;

pub mod config;
pub mod cooldown;
pub mod damage;
pub mod events;
pub mod inventory;
pub mod projectile;
pub mod resolver;
pub mod systems;
pub mod weapon;

#[cfg(test)]
mod resolver_tests;

// Re-export основных типов
pub use config::{CombatConfig, DEFAULT_HIT_RADIUS};
pub use cooldown::Cooldown;
pub use damage::{advance_death_sequences, land_hit, CombatSignals, Dead, Hit};
pub use events::{
    ActiveWeaponChanged, AmmoPickup, AttackIntent, CycleWeaponIntent, DamageDealt, DamageSource, EntityDied,
    PointsScored, ScoreChanged, StatChanged, StatKind, SwitchWeaponIntent, WeaponFired,
};
pub use inventory::{CycleDirection, SwitchRefusal, WeaponInventory, DEFAULT_AUTO_SWITCH_DELAY, DEFAULT_SWITCH_COOLDOWN};
pub use projectile::{Projectile, ProjectileId, ProjectilePool, DEFAULT_POOL_CAPACITY};
pub use resolver::{resolve_projectile_hits, resolve_swing, HitTarget};
pub use weapon::{AmmoCount, AttackOrigin, AttackRefusal, MeleeSwing, MeleeWeapon, RangedWeapon, Weapon, WeaponKind};

use crate::components::Score;

/// Фазы combat тика (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSet {
    /// Таймеры оружия + полёт projectiles
    Timers,
    /// Pickups, ручные switch/attack intents, резолв melee swings
    Intents,
    /// Auto-switch пустого ranged → melee
    AutoSwitch,
    /// Hostile AI (transitions, движение, контактные удары)
    Ai,
    /// Коллизии projectiles
    Resolve,
    /// Death sequences → despawn
    Death,
    /// StatChanged / ScoreChanged для presentation
    Notify,
}

/// Combat Plugin
///
/// Регистрирует combat системы в Update (тик = `SimulationTick`).
///
/// Порядок выполнения:
/// 1. Timers: tick_weapon_inventories
/// 2. Intents: ammo pickups → switch → attack → melee резолв
/// 3. AutoSwitch: пустой магазин → melee (ручной intent в этом тике приоритетнее)
/// 4. Ai: hostile AI (AIPlugin)
/// 5. Resolve: projectile коллизии
/// 6. Death: despawn после death sequence
/// 7. Notify: HUD сигналы (только реальные изменения)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<AttackIntent>()
            .add_event::<SwitchWeaponIntent>()
            .add_event::<CycleWeaponIntent>()
            .add_event::<AmmoPickup>()
            .add_event::<WeaponFired>()
            .add_event::<ActiveWeaponChanged>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<PointsScored>()
            .add_event::<StatChanged>()
            .add_event::<ScoreChanged>();

        // Resources (не перетираем вставленные до плагина)
        app.init_resource::<Score>().init_resource::<CombatConfig>();

        app.register_type::<Cooldown>()
            .register_type::<WeaponInventory>()
            .register_type::<Dead>()
            .register_type::<Score>()
            .register_type::<CombatConfig>();

        app.configure_sets(
            Update,
            (
                CombatSet::Timers,
                CombatSet::Intents,
                CombatSet::AutoSwitch,
                CombatSet::Ai,
                CombatSet::Resolve,
                CombatSet::Death,
                CombatSet::Notify,
            )
                .chain(),
        );

        app.add_systems(Update, systems::tick_weapon_inventories.in_set(CombatSet::Timers))
            .add_systems(
                Update,
                (
                    systems::apply_ammo_pickups,
                    systems::process_switch_intents,
                    systems::process_attack_intents,
                    resolver::resolve_melee_swings,
                )
                    .chain()
                    .in_set(CombatSet::Intents),
            )
            .add_systems(Update, systems::auto_switch_depleted_weapons.in_set(CombatSet::AutoSwitch))
            .add_systems(Update, resolver::resolve_projectile_collisions.in_set(CombatSet::Resolve))
            .add_systems(Update, damage::advance_death_sequences.in_set(CombatSet::Death))
            .add_systems(
                Update,
                (systems::notify_stat_changes, systems::notify_score_changes)
                    .chain()
                    .in_set(CombatSet::Notify),
            );
    }
}
