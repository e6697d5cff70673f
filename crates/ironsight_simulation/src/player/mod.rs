//! Player control surface: адаптер внешнего ввода к общей боевой модели.
//!
//! Опрос клавиатуры/мыши — вне ядра: внешний input-слой пишет PlayerInput,
//! система здесь конвертирует его в тот же command surface, которым
//! пользуется AI (MovementInput/TurnInput/intent events). Ровно один
//! драйвер на персонажа.

use bevy::prelude::*;

use crate::character::{JumpIntent, MovementInput, TurnInput};
use crate::combat::{Dead, FireIntent, ReloadIntent};
use crate::SimStage;

/// Маркер: персонаж под управлением игрока
#[derive(Component, Debug, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerControlled;

/// Сырой ввод игрока за тик (пишется внешним слоем)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerInput {
    /// Оси движения: x — strafe (A/D), y — вперёд/назад (W/S)
    pub move_axis: Vec2,
    /// Оси взгляда: x — yaw (mouse X), y — pitch (mouse Y)
    pub look_axis: Vec2,
    /// Зажат спуск
    pub fire: bool,
    /// Нажата перезарядка
    pub reload: bool,
    /// Нажат прыжок
    pub jump: bool,
}

/// Система: PlayerInput → command surface персонажа
///
/// Движение переводим в мировые оси по текущему развороту корпуса.
/// Мёртвый игрок отфильтрован — ввод после смерти это no-op.
pub fn apply_player_input(
    mut players: Query<
        (
            Entity,
            &PlayerInput,
            &Transform,
            &mut MovementInput,
            &mut TurnInput,
        ),
        (With<PlayerControlled>, Without<Dead>),
    >,
    mut fire_events: EventWriter<FireIntent>,
    mut reload_events: EventWriter<ReloadIntent>,
    mut jump_events: EventWriter<JumpIntent>,
) {
    for (entity, input, transform, mut movement, mut turn) in players.iter_mut() {
        // Локальные оси → мир: forward = -Z
        let local = Vec3::new(input.move_axis.x, 0.0, -input.move_axis.y);
        movement.direction = (transform.rotation * local).normalize_or_zero();

        turn.yaw = input.look_axis.x;
        turn.pitch = input.look_axis.y;

        if input.fire {
            fire_events.write(FireIntent { shooter: entity });
        }
        if input.reload {
            reload_events.write(ReloadIntent { entity });
        }
        if input.jump {
            jump_events.write(JumpIntent { entity });
        }
    }
}

/// Player Plugin
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            apply_player_input.in_set(SimStage::PlayerControl),
        );
    }
}
