//! AI decision-making module
//!
//! Simple FSM для hostile акторов (wander / chase / attack / dying).

use bevy::prelude::*;

pub mod simple_fsm;


// Re-export основных типов
pub use simple_fsm::{hostile_ai_tick, select_state, AIConfig, AIState, AIStep, HostileAI, PlayerTargets};

use crate::combat::CombatSet;

/// AI Plugin
///
/// Регистрирует hostile AI в `CombatSet::Ai`, после обновления оружия
/// и ручных intents, до резолва projectiles.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, hostile_ai_tick.in_set(CombatSet::Ai));
    }
}
