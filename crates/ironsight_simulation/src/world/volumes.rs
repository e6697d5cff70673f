//! Volume overlap math: OBB (perception), sphere и capsule (hit volumes).
//!
//! Ядро владеет collision-геометрией персонажей, поэтому overlap-тесты
//! считаем сами. Projectile тестируем как отрезок полёта за тик (swept),
//! иначе быстрые пули туннелируют сквозь capsule.

use bevy::prelude::*;

/// Oriented bounding box — perception volume перед агентом
#[derive(Debug, Clone, Copy)]
pub struct Obb {
    pub center: Vec3,
    pub rotation: Quat,
    pub half_extents: Vec3,
}

impl Obb {
    pub fn contains(&self, point: Vec3) -> bool {
        // Переводим точку в локальное пространство box'а
        let local = self.rotation.inverse() * (point - self.center);
        local.x.abs() <= self.half_extents.x
            && local.y.abs() <= self.half_extents.y
            && local.z.abs() <= self.half_extents.z
    }
}

/// Сфера (head volume)
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Пересекает ли отрезок [a, b] сферу
    pub fn intersects_segment(&self, a: Vec3, b: Vec3) -> bool {
        let closest = closest_point_on_segment(a, b, self.center);
        closest.distance_squared(self.center) <= self.radius * self.radius
    }
}

/// Вертикальная capsule (body volume): отрезок [base, top] + радиус
#[derive(Debug, Clone, Copy)]
pub struct Capsule {
    pub base: Vec3,
    pub top: Vec3,
    pub radius: f32,
}

impl Capsule {
    /// Пересекает ли отрезок [a, b] capsule
    pub fn intersects_segment(&self, a: Vec3, b: Vec3) -> bool {
        let dist = segment_segment_distance(a, b, self.base, self.top);
        dist <= self.radius
    }
}

/// Ближайшая точка отрезка [a, b] к точке p
pub fn closest_point_on_segment(a: Vec3, b: Vec3, p: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Минимальная дистанция между отрезками [p1, q1] и [p2, q2]
///
/// Стандартный closest-point-between-segments (Ericson, Real-Time Collision
/// Detection, 5.1.9), без экзотики.
pub fn segment_segment_distance(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> f32 {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);

    let (s, t);
    if a <= f32::EPSILON && e <= f32::EPSILON {
        // Оба отрезка — точки
        return r.length();
    }
    if a <= f32::EPSILON {
        s = 0.0;
        t = (f / e).clamp(0.0, 1.0);
    } else {
        let c = d1.dot(r);
        if e <= f32::EPSILON {
            t = 0.0;
            s = (-c / a).clamp(0.0, 1.0);
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let s0 = if denom > f32::EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let t0 = (b * s0 + f) / e;
            if t0 < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t0 > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            } else {
                t = t0;
                s = s0;
            }
        }
    }

    let c1 = p1 + d1 * s;
    let c2 = p2 + d2 * t;
    c1.distance(c2)
}
