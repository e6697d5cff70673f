//! Плавный поворот к цели.

use bevy::prelude::*;

/// Плавно доворачивает корпус к цели, возвращает НЕинтерполированную
/// target-ротацию.
///
/// Caller сравнивает текущую (сглаженную) ориентацию с возвращённой target —
/// отсюда лаг в один тик на пороге. Лаг намеренный: гасит осцилляцию на
/// границе fire-angle. Не «чинить» сравнением с уже сглаженной ротацией.
pub fn face_toward(transform: &mut Transform, target: Vec3, turn_rate: f32, dt: f32) -> Quat {
    let to_target = target - transform.translation;
    if to_target.length_squared() < 1e-6 {
        return transform.rotation;
    }

    let target_rotation = Transform::from_translation(transform.translation)
        .looking_at(target, Vec3::Y)
        .rotation;

    let t = (turn_rate * dt).min(1.0);
    transform.rotation = transform.rotation.slerp(target_rotation, t);

    target_rotation
}

/// Точка на пути от `from` к `to`, не дальше `max_delta`
pub fn move_towards(from: Vec3, to: Vec3, max_delta: f32) -> Vec3 {
    let offset = to - from;
    let distance = offset.length();
    if distance <= max_delta || distance < 1e-6 {
        to
    } else {
        from + offset / distance * max_delta
    }
}
