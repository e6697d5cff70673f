//! Системы персонажа: ground probe, движение, поворот, прыжок, rig weight.
//!
//! Всё в FixedUpdate (60Hz), `.chain()` для детерминизма. Мёртвые персонажи
//! отфильтрованы через `Without<Dead>` — команды после смерти это no-op,
//! не ошибка.

use bevy::prelude::*;

use crate::character::components::*;
use crate::combat::cues::{AnimKind, AnimationFlag};
use crate::combat::{AimPoint, Dead};
use crate::world::Terrain;

/// Система: ground probe
///
/// Каждый тик проверяем маленький объём под ногами против terrain'а.
/// Переход grounded → airborne и обратно шлёт falling animation flag.
pub fn check_ground(
    mut query: Query<(Entity, &Transform, &mut CharacterController)>,
    terrain: Res<Terrain>,
    mut anim_events: EventWriter<AnimationFlag>,
) {
    for (entity, transform, mut controller) in query.iter_mut() {
        let probe_bottom = transform.translation.y - controller.ground_offset;
        let grounded = probe_bottom <= terrain.ground_height + controller.ground_radius;

        if grounded != controller.grounded {
            controller.grounded = grounded;
            anim_events.write(AnimationFlag {
                entity,
                kind: AnimKind::Falling,
                active: !grounded,
            });
        }
    }
}

/// Система: поворот корпуса + вертикальное смещение AimPoint
///
/// Yaw крутит тело вокруг вертикальной оси, pitch двигает локальную Y
/// координату AimPoint с clamp'ом в пределах лимитов.
pub fn apply_turn_input(
    mut query: Query<
        (&TurnInput, &CharacterController, &mut Transform, &mut AimPoint),
        Without<Dead>,
    >,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (turn, controller, mut transform, mut aim) in query.iter_mut() {
        if turn.yaw != 0.0 {
            let yaw_radians = turn.yaw * controller.turn_speed.to_radians() * delta;
            transform.rotate_y(yaw_radians);
        }

        if turn.pitch != 0.0 {
            aim.local.y += turn.pitch * controller.pitch_sensitivity * delta;
            aim.clamp_vertical();
        }
    }
}

/// Система: movement input → горизонтальная velocity
///
/// Direction приходит normalized от контроллера (AI или player adapter).
/// Y компонент velocity не трогаем — им владеет gravity/jump.
pub fn apply_movement_input(
    mut query: Query<
        (Entity, &MovementInput, &mut CharacterController, &mut Body),
        Without<Dead>,
    >,
    mut anim_events: EventWriter<AnimationFlag>,
) {
    for (entity, input, mut controller, mut body) in query.iter_mut() {
        let walking = input.direction.length_squared() > 0.01;

        if walking {
            let direction = input.direction.normalize();
            body.velocity.x = direction.x * controller.move_speed;
            body.velocity.z = direction.z * controller.move_speed;
        } else {
            body.velocity.x = 0.0;
            body.velocity.z = 0.0;
        }

        if walking != controller.walking {
            controller.walking = walking;
            anim_events.write(AnimationFlag {
                entity,
                kind: AnimKind::Walk,
                active: walking,
            });
        }
    }
}

/// Система: гравитация (только в воздухе)
pub fn apply_gravity(
    mut query: Query<(&CharacterController, &mut Body), Without<Dead>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (controller, mut body) in query.iter_mut() {
        if !controller.grounded {
            body.velocity.y += controller.gravity * delta;
        }
    }
}

/// Система: обработка JumpIntent
///
/// No-op если не grounded или мёртв. Импульс вверх + обнуление rig blend
/// weight с таймером восстановления (новый прыжок заменяет pending таймер).
pub fn process_jump_intents(
    mut jump_events: EventReader<JumpIntent>,
    mut query: Query<
        (&mut CharacterController, &mut Body, &mut RigBlendWeight),
        Without<Dead>,
    >,
    mut anim_events: EventWriter<AnimationFlag>,
) {
    for intent in jump_events.read() {
        let Ok((mut controller, mut body, mut rig)) = query.get_mut(intent.entity) else {
            continue;
        };

        if !controller.grounded {
            continue; // в воздухе — no-op
        }

        body.velocity.y = controller.jump_impulse;
        controller.grounded = false;

        rig.value = 0.0;
        rig.restore_timer = Some(controller.weight_restore_delay);

        anim_events.write(AnimationFlag {
            entity: intent.entity,
            kind: AnimKind::Jump,
            active: true,
        });
    }
}

/// Система: интеграция velocity → position (fixed tick)
///
/// position += velocity * dt, затем прижимаем к полу чтобы не проваливаться.
pub fn integrate_velocity(
    mut query: Query<(&mut Transform, &mut Body, &CharacterController), Without<Dead>>,
    terrain: Res<Terrain>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut body, _controller) in query.iter_mut() {
        transform.translation += body.velocity * delta;

        // Пол не проламываем
        if transform.translation.y < terrain.ground_height {
            transform.translation.y = terrain.ground_height;
            body.velocity.y = 0.0;
        }
    }
}

/// Система: восстановление rig blend weight после прыжка
///
/// Deferred effect с проверкой aliveness: `Without<Dead>` гарантирует что
/// таймер мёртвого персонажа не применит эффект.
pub fn restore_rig_weight(
    mut query: Query<&mut RigBlendWeight, Without<Dead>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for mut rig in query.iter_mut() {
        let Some(timer) = rig.restore_timer else {
            continue;
        };

        let remaining = timer - delta;
        if remaining <= 0.0 {
            rig.value = 1.0;
            rig.restore_timer = None;
        } else {
            rig.restore_timer = Some(remaining);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_only_when_airborne() {
        let delta = 1.0 / 60.0;
        let controller = CharacterController {
            grounded: false,
            ..default()
        };
        let mut body = Body::default();

        if !controller.grounded {
            body.velocity.y += controller.gravity * delta;
        }
        assert!(body.velocity.y < 0.0);

        let grounded_controller = CharacterController {
            grounded: true,
            ..default()
        };
        let mut grounded_body = Body::default();
        if !grounded_controller.grounded {
            grounded_body.velocity.y += grounded_controller.gravity * delta;
        }
        assert_eq!(grounded_body.velocity.y, 0.0);
    }

    #[test]
    fn test_rig_restore_timer_countdown() {
        let mut rig = RigBlendWeight {
            value: 0.0,
            restore_timer: Some(0.5),
        };
        let delta = 1.0 / 60.0;

        // 29 тиков — ещё не восстановились
        for _ in 0..29 {
            if let Some(t) = rig.restore_timer {
                let remaining = t - delta;
                if remaining <= 0.0 {
                    rig.value = 1.0;
                    rig.restore_timer = None;
                } else {
                    rig.restore_timer = Some(remaining);
                }
            }
        }
        assert_eq!(rig.value, 0.0);

        // Ещё 2 тика — delay 0.5s прошёл
        for _ in 0..2 {
            if let Some(t) = rig.restore_timer {
                let remaining = t - delta;
                if remaining <= 0.0 {
                    rig.value = 1.0;
                    rig.restore_timer = None;
                } else {
                    rig.restore_timer = Some(remaining);
                }
            }
        }
        assert_eq!(rig.value, 1.0);
        assert!(rig.restore_timer.is_none());
    }

    #[test]
    fn test_movement_input_sets_horizontal_velocity() {
        let controller = CharacterController::default();
        let input = MovementInput { direction: Vec3::Z };
        let mut body = Body {
            velocity: Vec3::new(0.0, -1.0, 0.0),
        };

        let direction = input.direction.normalize();
        body.velocity.x = direction.x * controller.move_speed;
        body.velocity.z = direction.z * controller.move_speed;

        assert!((body.velocity.z - controller.move_speed).abs() < 1e-5);
        // Y velocity не трогаем
        assert_eq!(body.velocity.y, -1.0);
    }
}
