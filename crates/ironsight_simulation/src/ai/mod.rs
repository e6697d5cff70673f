//! AI Controller: FSM + perception + плавный доворот.
//!
//! AI — единственный писатель command surface своего персонажа: каждый тик
//! решает state, пишет MovementInput и шлёт Fire/Reload intents. Сам
//! персонаж мутируется системами character/combat.

use bevy::prelude::*;

pub mod facing;
pub mod fsm;
pub mod perception;

pub use facing::{face_toward, move_towards};
pub use fsm::{AiConfig, AiState};

use crate::SimStage;

/// AI Plugin
///
/// Порядок выполнения (chain):
/// 1. ai_fsm_transitions — внутренний цикл автомата + команды
/// 2. perceive_player — внешний цикл; бежит после и переписывает при
///    конфликте (поздняя запись побеждает)
pub struct AiPlugin;

impl Plugin for AiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (fsm::ai_fsm_transitions, perception::perceive_player)
                .chain()
                .in_set(SimStage::AiDecide),
        );
    }
}
