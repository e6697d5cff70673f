//! Character Model: общая боевая модель для игрока и AI.
//!
//! Владеет health, движением, прыжком, ground detection. Огонь/перезарядка/
//! урон — в combat, AI решения — в ai. Оба драйвера (AI и player adapter)
//! ходят через один command surface: MovementInput, TurnInput, intent events.

use bevy::prelude::*;

pub mod components;
pub mod systems;

pub use components::{
    Body, Character, CharacterController, CharacterKind, Health, HitVolumes, JumpIntent,
    MovementInput, RigBlendWeight, TurnInput,
};

use crate::SimStage;

/// Character Plugin
///
/// Порядок выполнения (chain):
/// 1. check_ground — ground probe, falling flag
/// 2. apply_turn_input — yaw корпуса + pitch AimPoint
/// 3. apply_movement_input — direction → горизонтальная velocity
/// 4. process_jump_intents — импульс прыжка + rig weight
/// 5. apply_gravity — в воздухе
/// 6. integrate_velocity — velocity → position
/// 7. restore_rig_weight — deferred восстановление blend weight
pub struct CharacterPlugin;

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<JumpIntent>();

        app.add_systems(
            FixedUpdate,
            (
                systems::check_ground,
                systems::apply_turn_input,
                systems::apply_movement_input,
                systems::process_jump_intents,
                systems::apply_gravity,
                systems::integrate_velocity,
                systems::restore_rig_weight,
            )
                .chain()
                .in_set(SimStage::Locomotion),
        );
    }
}

/// Spawn helper: враг с AI контроллером
///
/// Полный набор компонентов боевой модели + FSM. Required Components
/// Character добирают остальное (Health, Body, inputs, hit volumes).
pub fn spawn_enemy(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            Character {
                kind: CharacterKind::Enemy,
            },
            crate::combat::WeaponStats::rifle(),
            crate::combat::AimPoint::default(),
            crate::ai::AiState::default(),
            crate::ai::AiConfig::default(),
        ))
        .id()
}

/// Spawn helper: игрок (управляется внешним input-слоем через PlayerInput)
pub fn spawn_player(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            Character {
                kind: CharacterKind::Player,
            },
            crate::combat::WeaponStats::rifle(),
            crate::combat::AimPoint::default(),
            crate::player::PlayerControlled,
            crate::player::PlayerInput::default(),
        ))
        .id()
}
