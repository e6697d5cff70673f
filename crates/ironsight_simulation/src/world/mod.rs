//! World-query capabilities: навигация и terrain.
//!
//! Внешние способности из дизайна ("sample walkable point", "ground height")
//! инжектятся как Resources при конструировании App — никаких lookup по
//! имени/тегу в рантайме.

use bevy::prelude::*;

pub mod volumes;

pub use volumes::{Capsule, Obb, Sphere};

/// Прямоугольная walkable-зона (упрощённый navmesh)
///
/// `sample_position` — аналог NavMesh.SamplePosition: проецирует точку на
/// ближайшую валидную позицию. Не имеет права фейлить вызывающего: если
/// проекция вне радиуса — возвращаем исходную точку (conservative fallback).
#[derive(Resource, Debug, Clone, Copy)]
pub struct NavArea {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for NavArea {
    fn default() -> Self {
        Self {
            min: Vec3::new(-50.0, 0.0, -50.0),
            max: Vec3::new(50.0, 0.0, 50.0),
        }
    }
}

impl NavArea {
    /// Ближайшая walkable точка к `point` в пределах `radius`
    pub fn sample_position(&self, point: Vec3, radius: f32) -> Vec3 {
        let projected = Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            self.min.y,
            point.z.clamp(self.min.z, self.max.z),
        );

        if projected.distance(point) <= radius {
            projected
        } else {
            // Вне радиуса — отдаём исходную точку, caller не должен падать
            point
        }
    }
}

/// Terrain: высота земли для ground probe
///
/// Плоский пол — достаточно для behavioral core. Raycast по реальной
/// геометрии живёт в презентационном слое.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Terrain {
    pub ground_height: f32,
}

impl Default for Terrain {
    fn default() -> Self {
        Self { ground_height: 0.0 }
    }
}
