//! FSM AI: Idle → RandomWalk → TrackTarget → Fire.
//!
//! Конечный автомат врага:
//! - Idle: случайное ожидание, затем RandomWalk
//! - RandomWalk: случайная точка в радиусе, идём до stop distance,
//!   дальше монетка idle_probability
//! - TrackTarget: доворачиваемся на игрока до fire-angle порога
//! - Fire: держим прицел, шлём Fire/Reload intents, корректируем прицел
//!
//! Таймеры живут в данных variant'ов: переход в состояние пересоздаёт
//! variant и тем самым отменяет pending ожидание (cancel-and-replace).

use bevy::prelude::*;
use rand::Rng;

use crate::ai::facing;
use crate::character::MovementInput;
use crate::combat::{AimPoint, FireIntent, ReloadIntent, WeaponStats};
use crate::player::PlayerControlled;
use crate::world::NavArea;
use crate::DeterministicRng;

/// AI FSM состояния
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum AiState {
    /// Ожидание перед случайной прогулкой
    Idle {
        /// None — ожидание ещё не засэмплировано (первый тик в состоянии)
        wait_timer: Option<f32>,
    },

    /// Случайная прогулка
    RandomWalk {
        /// Some — идём к точке ("currently walking" суб-флаг)
        target: Option<Vec3>,
    },

    /// Доворот на игрока
    TrackTarget,

    /// Огонь по игроку
    Fire {
        /// Накопитель интервала коррекции прицела
        aim_timer: f32,
    },
}

impl Default for AiState {
    fn default() -> Self {
        Self::Idle { wait_timer: None }
    }
}

/// Параметры AI (все — tunable числа на агента)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct AiConfig {
    /// Диапазон ожидания в Idle (сек)
    pub idle_wait: Vec2,
    /// Радиус случайной прогулки (м)
    pub walk_radius: f32,
    /// Стоп-дистанция до точки прогулки (м)
    pub stop_distance: f32,
    /// Шаг waypoint'а между собой и целью (м)
    pub walk_step: f32,
    /// Вероятность уйти в Idle после прогулки
    pub idle_probability: f32,
    /// Скорость доворота (экспоненциальное приближение)
    pub turn_rate: f32,
    /// Порог угла до цели для перехода в Fire (градусы)
    pub fire_angle: f32,
    /// Смещение perception box'а вперёд (м)
    pub perception_offset: f32,
    /// Полуразмеры perception box'а (м)
    pub perception_extents: Vec3,
    /// Интервал коррекции прицела в Fire (сек)
    pub aim_interval: f32,
    /// Шаг вертикальной коррекции прицела
    pub aim_step: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            idle_wait: Vec2::new(2.0, 6.0),
            walk_radius: 20.0,
            stop_distance: 1.5,
            walk_step: 1.5,
            idle_probability: 0.3,
            turn_rate: 3.0,
            fire_angle: 2.0,
            perception_offset: 5.0,
            perception_extents: Vec3::new(0.5, 0.5, 5.0), // box 1×1×10
            aim_interval: 0.2,
            aim_step: 0.05,
        }
    }
}

/// Система: внутренние FSM transitions + команды персонажу
///
/// Внутренний цикл автомата. Perception (внешний цикл) бежит следом в той же
/// цепочке и может переписать state — поздняя запись побеждает.
#[allow(clippy::too_many_arguments)]
pub fn ai_fsm_transitions(
    mut agents: Query<(
        Entity,
        &mut AiState,
        &AiConfig,
        &mut Transform,
        &mut MovementInput,
        &mut AimPoint,
        &WeaponStats,
    )>,
    players: Query<&Transform, (With<PlayerControlled>, Without<AiState>)>,
    mut fire_events: EventWriter<FireIntent>,
    mut reload_events: EventWriter<ReloadIntent>,
    mut rng: ResMut<DeterministicRng>,
    nav: Res<NavArea>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let player_position = players.iter().next().map(|t| t.translation);

    for (entity, mut state, config, mut transform, mut movement, mut aim, weapon) in
        agents.iter_mut()
    {
        let new_state = match state.as_ref() {
            AiState::Idle { wait_timer } => {
                movement.direction = Vec3::ZERO;

                match wait_timer {
                    None => {
                        // Первый тик в Idle — сэмплим ожидание
                        let wait = rng.rng.gen_range(config.idle_wait.x..config.idle_wait.y);
                        AiState::Idle {
                            wait_timer: Some(wait),
                        }
                    }
                    Some(timer) => {
                        let remaining = timer - delta;
                        if remaining <= 0.0 {
                            crate::log(&format!("AI: {:?} Idle → RandomWalk", entity));
                            AiState::RandomWalk { target: None }
                        } else {
                            AiState::Idle {
                                wait_timer: Some(remaining),
                            }
                        }
                    }
                }
            }

            AiState::RandomWalk { target } => match target {
                None => {
                    // Случайная точка в радиусе, спроецированная на walkable
                    let angle = rng.rng.gen::<f32>() * std::f32::consts::TAU;
                    let distance = rng.rng.gen::<f32>() * config.walk_radius;
                    let candidate = transform.translation
                        + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);
                    let point = nav.sample_position(candidate, config.walk_radius);

                    AiState::RandomWalk {
                        target: Some(point),
                    }
                }
                Some(point) => {
                    let point = *point;
                    if transform.translation.distance(point) > config.stop_distance {
                        // Идём: доворачиваемся на waypoint между собой и целью,
                        // шагаем вперёд (интеграция — в locomotion)
                        let waypoint =
                            facing::move_towards(transform.translation, point, config.walk_step);
                        facing::face_toward(&mut transform, waypoint, config.turn_rate, delta);
                        movement.direction = *transform.forward();

                        AiState::RandomWalk {
                            target: Some(point),
                        }
                    } else {
                        // Дошли — монетка: отдыхать или гулять дальше
                        movement.direction = Vec3::ZERO;
                        if rng.rng.gen::<f32>() < config.idle_probability {
                            crate::log(&format!("AI: {:?} RandomWalk → Idle", entity));
                            AiState::Idle { wait_timer: None }
                        } else {
                            AiState::RandomWalk { target: None }
                        }
                    }
                }
            },

            AiState::TrackTarget => {
                movement.direction = Vec3::ZERO;

                if let Some(player_pos) = player_position {
                    let target_rotation =
                        facing::face_toward(&mut transform, player_pos, config.turn_rate, delta);
                    // Сравниваем СГЛАЖЕННУЮ ориентацию с сырой target-ротацией
                    let angle = transform
                        .rotation
                        .angle_between(target_rotation)
                        .to_degrees();

                    if angle <= config.fire_angle {
                        crate::log(&format!("AI: {:?} TrackTarget → Fire", entity));
                        AiState::Fire { aim_timer: 0.0 }
                    } else {
                        AiState::TrackTarget
                    }
                } else {
                    // Игрока нет в мире — стоим, perception разрулит
                    AiState::TrackTarget
                }
            }

            AiState::Fire { aim_timer } => {
                movement.direction = Vec3::ZERO;

                if let Some(player_pos) = player_position {
                    facing::face_toward(&mut transform, player_pos, config.turn_rate, delta);

                    if weapon.magazine == 0 {
                        reload_events.write(ReloadIntent { entity });
                        AiState::Fire {
                            aim_timer: *aim_timer,
                        }
                    } else {
                        fire_events.write(FireIntent { shooter: entity });

                        // Независимая коррекция прицела поверх recoil'а выстрела
                        let mut timer = aim_timer + delta;
                        if timer > config.aim_interval {
                            let steps = rng.rng.gen_range(-1..=1);
                            aim.nudge_vertical(steps as f32 * config.aim_step);
                            timer = 0.0;
                        }
                        AiState::Fire { aim_timer: timer }
                    }
                } else {
                    AiState::Fire {
                        aim_timer: *aim_timer,
                    }
                }
            }
        };

        if *state != new_state {
            *state = new_state;
        }
    }
}
