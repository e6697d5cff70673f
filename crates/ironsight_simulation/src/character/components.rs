//! Базовые компоненты персонажа: Character, Health, контроллер, hit volumes.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::world::{Capsule, Sphere};

/// Тип персонажа — закрытый variant для win/lose логики
///
/// Session матчит исчерпывающе: новый тип не провалится молча.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum CharacterKind {
    Player,
    Enemy,
}

/// Персонаж (игрок или враг) — общая боевая модель
///
/// Автоматически добавляет контроллер, тело, input и hit volumes через
/// Required Components. И AI, и player-контроль гоняют персонажа через один
/// и тот же command surface (MovementInput/TurnInput/intent events).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Health, CharacterController, Body, MovementInput, TurnInput, RigBlendWeight, HitVolumes)]
pub struct Character {
    pub kind: CharacterKind,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            kind: CharacterKind::Enemy,
        }
    }
}

/// Здоровье персонажа
///
/// Инвариант: 0 ≤ current ≤ max. Смерть — одноразовый переход при current == 0.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }
}

/// Kinematic контроллер: скорости движения/поворота + grounded state
///
/// Все поля — tunable параметры персонажа (не файлы конфигурации).
/// `grounded`/`walking` — runtime state, обновляется системами.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CharacterController {
    /// Скорость движения (m/s)
    pub move_speed: f32,
    /// Скорость поворота корпуса (deg/s на единицу yaw input)
    pub turn_speed: f32,
    /// Чувствительность вертикального прицеливания (m/s на единицу pitch input)
    pub pitch_sensitivity: f32,
    /// Импульс прыжка (m/s вверх)
    pub jump_impulse: f32,
    /// Гравитация (m/s²)
    pub gravity: f32,
    /// Задержка восстановления rig blend weight после прыжка (сек)
    pub weight_restore_delay: f32,
    /// Смещение ground probe вниз от origin (м)
    pub ground_offset: f32,
    /// Радиус ground probe (м)
    pub ground_radius: f32,
    /// На земле ли персонаж (гейтит прыжок)
    pub grounded: bool,
    /// Идёт ли персонаж (для walk animation flag)
    pub walking: bool,
}

impl Default for CharacterController {
    fn default() -> Self {
        Self {
            move_speed: 5.0,       // средняя скорость ходьбы
            turn_speed: 120.0,     // deg/s
            pitch_sensitivity: 1.0,
            jump_impulse: 5.0,
            gravity: -9.81,
            weight_restore_delay: 0.5,
            ground_offset: 0.1,
            ground_radius: 0.3,
            grounded: false,
            walking: false,
        }
    }
}

/// Кинематическое тело: velocity, интегрируется в FixedUpdate
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Body {
    pub velocity: Vec3,
}

/// Направление движения (normalized), пишется контроллером (AI или player)
///
/// Один писатель на персонажа — AI владеет command stream'ом своего
/// персонажа эксклюзивно.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct MovementInput {
    pub direction: Vec3,
}

/// Поворот за тик: yaw крутит корпус, pitch двигает AimPoint по вертикали
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct TurnInput {
    pub yaw: f32,
    pub pitch: f32,
}

/// Intent: прыжок (no-op если не grounded или мёртв)
#[derive(Event, Debug, Clone)]
pub struct JumpIntent {
    pub entity: Entity,
}

/// Blend weight верхней части rig'а
///
/// Прыжок обнуляет weight (торс «деревенеет»), restore_timer возвращает 1.0
/// после фиксированной задержки. Новый прыжок заменяет pending таймер.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct RigBlendWeight {
    pub value: f32,
    pub restore_timer: Option<f32>,
}

impl Default for RigBlendWeight {
    fn default() -> Self {
        Self {
            value: 1.0,
            restore_timer: None,
        }
    }
}

/// Collision volumes персонажа: body capsule + head sphere
///
/// Попадание в head sphere — instant-lethal (policy, не физика). Различение
/// идёт по форме volume'а — так делал оригинал, сохраняем как документированное
/// поведение.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HitVolumes {
    /// Нижняя точка capsule (локально, от origin в ногах)
    pub body_base: Vec3,
    /// Верхняя точка capsule (локально)
    pub body_top: Vec3,
    /// Радиус capsule
    pub body_radius: f32,
    /// Центр головы (локально)
    pub head_center: Vec3,
    /// Радиус head sphere
    pub head_radius: f32,
}

impl Default for HitVolumes {
    fn default() -> Self {
        Self {
            body_base: Vec3::new(0.0, 0.2, 0.0),
            body_top: Vec3::new(0.0, 1.5, 0.0),
            body_radius: 0.4,
            head_center: Vec3::new(0.0, 1.7, 0.0),
            head_radius: 0.2,
        }
    }
}

impl HitVolumes {
    pub fn body_capsule(&self, transform: &Transform) -> Capsule {
        Capsule {
            base: transform.translation + transform.rotation * self.body_base,
            top: transform.translation + transform.rotation * self.body_top,
            radius: self.body_radius,
        }
    }

    pub fn head_sphere(&self, transform: &Transform) -> Sphere {
        Sphere {
            center: transform.translation + transform.rotation * self.head_center,
            radius: self.head_radius,
        }
    }
}
