//! Weapon: магазин, fire-interval, перезарядка, recoil.
//!
//! Fire и Reload — intent events: и AI, и player adapter шлют одинаковые
//! intents, системы здесь применяют их к WeaponStats. Невалидные intents
//! (перезарядка идёт, магазин полон, персонаж мёртв) — молчаливый no-op:
//! это input debouncing, не ошибка.

use bevy::prelude::*;
use rand::Rng;

use crate::combat::cues::{AnimKind, AnimationFlag, AudioCue, AudioKind};
use crate::combat::projectile::Projectile;
use crate::combat::Dead;
use crate::DeterministicRng;

/// Unified weapon stats: боезапас + таймеры
///
/// ECS владеет всем state оружия; визуал (muzzle flash, анимация ствола) —
/// презентационный слой.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct WeaponStats {
    /// Урон пули
    pub attack: u32,

    /// Ёмкость магазина
    pub magazine_capacity: u32,
    /// Патроны в магазине (0..=capacity)
    pub magazine: u32,
    /// Запас патронов (≥ 0)
    pub reserve: u32,

    /// Интервал между выстрелами (сек)
    pub fire_interval: f32,
    /// Накопитель held-trigger'а: растёт пока жмут Fire, сбрасывается
    /// на выстреле/щелчке. Не cooldown — без intents не тикает.
    pub fire_timer: f32,

    /// Начальная скорость пули (m/s)
    pub muzzle_speed: f32,

    /// Длительность перезарядки == длине анимации (сек)
    pub reload_duration: f32,
    /// Some(оставшееся время) пока идёт перезарядка
    pub reload_timer: Option<f32>,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self::rifle()
    }
}

impl WeaponStats {
    /// Автомат: 30/90, один выстрел в 0.2 сек
    pub fn rifle() -> Self {
        Self {
            attack: 10,
            magazine_capacity: 30,
            magazine: 30,
            reserve: 90,
            fire_interval: 0.2,
            fire_timer: 0.0,
            muzzle_speed: 60.0,
            reload_duration: 2.0,
            reload_timer: None,
        }
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_timer.is_some()
    }

    /// Можно ли начать перезарядку (магазин не полон, запас есть, не идёт уже)
    pub fn can_start_reload(&self) -> bool {
        !self.is_reloading() && self.magazine < self.magazine_capacity && self.reserve > 0
    }

    /// Перенос патронов запас → магазин
    ///
    /// Патроны только перемещаются, не создаются и не исчезают.
    pub fn start_reload(&mut self) {
        debug_assert!(self.can_start_reload());
        let needed = self.magazine_capacity - self.magazine;
        let moved = needed.min(self.reserve);
        self.magazine += moved;
        self.reserve -= moved;
        self.reload_timer = Some(self.reload_duration);
    }

    /// Суммарный боезапас (для тестов консервации)
    pub fn total_ammo(&self) -> u32 {
        self.magazine + self.reserve
    }
}

/// Точка прицеливания: локальный offset цели, куда летит пуля
///
/// Вертикальная координата ограничена [limit_min, limit_max]; после каждого
/// выстрела дёргается на случайный шаг (recoil) и снова clamp'ится.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct AimPoint {
    /// Локальный offset точки прицеливания от origin персонажа
    pub local: Vec3,
    /// Нижний предел local.y
    pub limit_min: f32,
    /// Верхний предел local.y
    pub limit_max: f32,
    /// Шаг recoil-смещения после выстрела
    pub recoil_step: f32,
    /// Высота дула над origin
    pub muzzle_height: f32,
}

impl Default for AimPoint {
    fn default() -> Self {
        Self {
            local: Vec3::new(0.0, 1.0, -8.0), // -Z = forward
            limit_min: 0.8,
            limit_max: 1.2,
            recoil_step: 0.05,
            muzzle_height: 1.5,
        }
    }
}

impl AimPoint {
    pub fn clamp_vertical(&mut self) {
        self.local.y = self.local.y.clamp(self.limit_min, self.limit_max);
    }

    /// Вертикальный сдвиг точки прицеливания с clamp'ом (AI-коррекция)
    pub fn nudge_vertical(&mut self, delta_y: f32) {
        self.local.y += delta_y;
        self.clamp_vertical();
    }

    /// Recoil после выстрела: сдвиг вверх/вниз на случайный шаг
    pub fn perturb_vertical(&mut self, steps: i32) {
        self.nudge_vertical(steps as f32 * self.recoil_step);
    }

    pub fn world_target(&self, transform: &Transform) -> Vec3 {
        transform.translation + transform.rotation * self.local
    }

    pub fn muzzle_position(&self, transform: &Transform) -> Vec3 {
        transform.translation + Vec3::Y * self.muzzle_height
    }
}

/// Intent: нажат спуск
#[derive(Event, Debug, Clone)]
pub struct FireIntent {
    pub shooter: Entity,
}

/// Intent: перезарядка
#[derive(Event, Debug, Clone)]
pub struct ReloadIntent {
    pub entity: Entity,
}

/// Система: обработка FireIntent
///
/// Held-trigger rate limiting: fire_timer накапливает dt на каждый intent;
/// пока не дотикал до fire_interval — intent молча поглощается, максимум
/// один выстрел за интервал. На выстреле: патрон из магазина, projectile с
/// muzzle-импульсом вперёд, fire cue, recoil на AimPoint. Пустой магазин —
/// щелчок, таймер тоже сбрасываем.
pub fn process_fire_intents(
    mut fire_events: EventReader<FireIntent>,
    mut shooters: Query<(&Transform, &mut WeaponStats, &mut AimPoint), Without<Dead>>,
    mut commands: Commands,
    mut audio_events: EventWriter<AudioCue>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for intent in fire_events.read() {
        let Ok((transform, mut weapon, mut aim)) = shooters.get_mut(intent.shooter) else {
            continue; // мёртв или despawned — no-op
        };

        if weapon.is_reloading() {
            continue;
        }

        weapon.fire_timer += delta;
        if weapon.fire_timer < weapon.fire_interval {
            continue; // интервал не прошёл — intent поглощён
        }
        weapon.fire_timer = 0.0;

        if weapon.magazine == 0 {
            audio_events.write(AudioCue {
                entity: intent.shooter,
                kind: AudioKind::EmptyFire,
            });
            continue;
        }

        weapon.magazine -= 1;

        let muzzle = aim.muzzle_position(transform);
        let target = aim.world_target(transform);
        let direction = (target - muzzle).normalize_or_zero();

        commands.spawn((
            Transform::from_translation(muzzle),
            Projectile {
                attack: weapon.attack,
                owner: intent.shooter,
                velocity: direction * weapon.muzzle_speed,
                lifetime: Projectile::MAX_LIFETIME,
            },
        ));

        audio_events.write(AudioCue {
            entity: intent.shooter,
            kind: AudioKind::Fire,
        });

        // Recoil: {-1, 0, 1} * step, как в оригинале
        let steps = rng.rng.gen_range(-1..=1);
        aim.perturb_vertical(steps);

        crate::log(&format!(
            "🔫 {:?} fired ({} in mag, {} reserve)",
            intent.shooter, weapon.magazine, weapon.reserve
        ));
    }
}

/// Система: обработка ReloadIntent
///
/// Перенос патронов применяется сразу, таймер на reload_duration гейтит
/// стрельбу. Повторный intent при полном магазине / во время перезарядки /
/// без запаса — no-op (идемпотентно).
pub fn process_reload_intents(
    mut reload_events: EventReader<ReloadIntent>,
    mut weapons: Query<&mut WeaponStats, Without<Dead>>,
    mut anim_events: EventWriter<AnimationFlag>,
) {
    for intent in reload_events.read() {
        let Ok(mut weapon) = weapons.get_mut(intent.entity) else {
            continue;
        };

        if !weapon.can_start_reload() {
            continue;
        }

        weapon.start_reload();
        anim_events.write(AnimationFlag {
            entity: intent.entity,
            kind: AnimKind::Reload,
            active: true,
        });

        crate::log(&format!(
            "🔄 {:?} reloading ({} in mag, {} reserve)",
            intent.entity, weapon.magazine, weapon.reserve
        ));
    }
}

/// Система: тик перезарядки
///
/// Deferred завершение: `Without<Dead>` — таймер мёртвого персонажа
/// не применяет эффект (aliveness-check контракта deferred действий).
pub fn tick_reloads(
    mut weapons: Query<(Entity, &mut WeaponStats), Without<Dead>>,
    mut anim_events: EventWriter<AnimationFlag>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut weapon) in weapons.iter_mut() {
        let Some(timer) = weapon.reload_timer else {
            continue;
        };

        let remaining = timer - delta;
        if remaining <= 0.0 {
            weapon.reload_timer = None;
            anim_events.write(AnimationFlag {
                entity,
                kind: AnimKind::Reload,
                active: false,
            });
        } else {
            weapon.reload_timer = Some(remaining);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_partial_magazine() {
        // Сценарий из дизайна: 30/90, в магазине 5 → 30/65
        let mut weapon = WeaponStats::rifle();
        weapon.magazine = 5;
        assert!(weapon.can_start_reload());

        weapon.start_reload();
        assert_eq!(weapon.magazine, 30);
        assert_eq!(weapon.reserve, 65);
        assert!(weapon.is_reloading());
    }

    #[test]
    fn test_reload_drains_reserve() {
        let mut weapon = WeaponStats::rifle();
        weapon.magazine = 0;
        weapon.reserve = 12;

        weapon.start_reload();
        assert_eq!(weapon.magazine, 12);
        assert_eq!(weapon.reserve, 0);
    }

    #[test]
    fn test_reload_noop_when_full() {
        let weapon = WeaponStats::rifle();
        assert_eq!(weapon.magazine, weapon.magazine_capacity);
        assert!(!weapon.can_start_reload());
    }

    #[test]
    fn test_reload_noop_when_reserve_empty() {
        let mut weapon = WeaponStats::rifle();
        weapon.magazine = 5;
        weapon.reserve = 0;
        assert!(!weapon.can_start_reload());
    }

    #[test]
    fn test_reload_conserves_ammo() {
        let mut weapon = WeaponStats::rifle();
        weapon.magazine = 7;
        let total = weapon.total_ammo();

        weapon.start_reload();
        assert_eq!(weapon.total_ammo(), total);
    }

    #[test]
    fn test_aim_point_clamp() {
        let mut aim = AimPoint::default();
        aim.local.y = 5.0;
        aim.clamp_vertical();
        assert_eq!(aim.local.y, aim.limit_max);

        aim.local.y = -5.0;
        aim.clamp_vertical();
        assert_eq!(aim.local.y, aim.limit_min);
    }

    #[test]
    fn test_aim_point_perturb_stays_in_limits() {
        let mut aim = AimPoint::default();
        for _ in 0..100 {
            aim.perturb_vertical(1);
            assert!(aim.local.y <= aim.limit_max);
        }
        for _ in 0..100 {
            aim.perturb_vertical(-1);
            assert!(aim.local.y >= aim.limit_min);
        }
    }

    #[test]
    fn test_fire_timer_rate_limit() {
        // Эмуляция held trigger: интервал 0.2s при 60Hz ≈ 12 тиков на выстрел
        let mut weapon = WeaponStats::rifle();
        let delta = 1.0 / 60.0;
        let mut shots = 0;

        for _ in 0..60 {
            weapon.fire_timer += delta;
            if weapon.fire_timer < weapon.fire_interval {
                continue;
            }
            weapon.fire_timer = 0.0;
            if weapon.magazine > 0 {
                weapon.magazine -= 1;
                shots += 1;
            }
        }

        // 1 секунда / 0.2s interval → максимум 5 выстрелов
        assert!(shots <= 5, "shots = {}", shots);
        assert!(shots >= 4, "shots = {}", shots);
    }
}
