//! Projectile: полёт и первая коллизия.
//!
//! Пуля — отдельная entity, живёт до первого попадания (или до конца
//! lifetime). Владелец исключён из коллизии, мёртвые персонажи тоже —
//! у трупа collision выключен.

use bevy::prelude::*;

use crate::character::HitVolumes;
use crate::combat::Dead;

/// Пуля: урон, владелец (исключается из коллизии), скорость
#[derive(Component, Debug, Clone, Copy)]
pub struct Projectile {
    pub attack: u32,
    pub owner: Entity,
    pub velocity: Vec3,
    /// Оставшееся время жизни (сек) — страховка от вечных пуль
    pub lifetime: f32,
}

impl Projectile {
    pub const MAX_LIFETIME: f32 = 3.0;
}

/// Событие: пуля попала в персонажа
#[derive(Event, Debug, Clone)]
pub struct ProjectileImpact {
    pub owner: Entity,
    pub target: Entity,
    /// Урон пули (для head shot перекрывается policy-значением в damage)
    pub attack: u32,
    /// Попадание в head sphere
    pub head_shot: bool,
}

/// Система: интеграция полёта + swept-коллизия за тик
///
/// Отрезок [позиция, позиция + v*dt] тестируем против hit volumes всех живых
/// персонажей: сначала head sphere (instant-lethal policy), потом body
/// capsule. Первое попадание уничтожает пулю.
pub fn fly_projectiles(
    mut projectiles: Query<(Entity, &mut Transform, &mut Projectile)>,
    targets: Query<(Entity, &Transform, &HitVolumes), (Without<Projectile>, Without<Dead>)>,
    mut impact_events: EventWriter<ProjectileImpact>,
    mut commands: Commands,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (projectile_entity, mut transform, mut projectile) in projectiles.iter_mut() {
        let start = transform.translation;
        let end = start + projectile.velocity * delta;

        let mut hit = None;
        for (target_entity, target_transform, volumes) in targets.iter() {
            if target_entity == projectile.owner {
                continue; // не бьём стрелявшего
            }

            if volumes.head_sphere(target_transform).intersects_segment(start, end) {
                hit = Some((target_entity, true));
                break;
            }
            if volumes.body_capsule(target_transform).intersects_segment(start, end) {
                hit = Some((target_entity, false));
                break;
            }
        }

        if let Some((target, head_shot)) = hit {
            impact_events.write(ProjectileImpact {
                owner: projectile.owner,
                target,
                attack: projectile.attack,
                head_shot,
            });
            commands.entity(projectile_entity).despawn();
            continue;
        }

        transform.translation = end;

        projectile.lifetime -= delta;
        if projectile.lifetime <= 0.0 {
            commands.entity(projectile_entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projectile_segment_hits_body() {
        // Логика коллизии без App: пуля летит по X через персонажа в (5,0,0)
        let volumes = HitVolumes::default();
        let target_transform = Transform::from_translation(Vec3::new(5.0, 0.0, 0.0));

        let start = Vec3::new(0.0, 1.0, 0.0);
        let end = Vec3::new(10.0, 1.0, 0.0);

        assert!(volumes
            .body_capsule(&target_transform)
            .intersects_segment(start, end));
        assert!(!volumes
            .head_sphere(&target_transform)
            .intersects_segment(start, end));
    }

    #[test]
    fn test_projectile_segment_hits_head() {
        let volumes = HitVolumes::default();
        let target_transform = Transform::from_translation(Vec3::new(5.0, 0.0, 0.0));

        // На высоте головы (1.7м)
        let start = Vec3::new(0.0, 1.7, 0.0);
        let end = Vec3::new(10.0, 1.7, 0.0);

        assert!(volumes
            .head_sphere(&target_transform)
            .intersects_segment(start, end));
    }

    #[test]
    fn test_projectile_misses_offset_target() {
        let volumes = HitVolumes::default();
        let target_transform = Transform::from_translation(Vec3::new(5.0, 0.0, 3.0));

        let start = Vec3::new(0.0, 1.0, 0.0);
        let end = Vec3::new(10.0, 1.0, 0.0);

        assert!(!volumes
            .body_capsule(&target_transform)
            .intersects_segment(start, end));
    }
}
