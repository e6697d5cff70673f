//! Применение урона и переход в смерть.
//!
//! Смерть — одноразовый идемпотентный переход: повторные попадания по
//! мёртвому персонажу — no-op, повторного CharacterDied не бывает.

use bevy::prelude::*;

use crate::character::{Body, Character, CharacterKind, Health, MovementInput, TurnInput};
use crate::combat::cues::{AnimKind, AnimationFlag, AudioCue, AudioKind};
use crate::combat::projectile::ProjectileImpact;

/// Фиксированный урон head shot — policy, перекрывает attack пули
pub const HEADSHOT_DAMAGE: u32 = 100;

/// Событие: персонаж умер (ровно один раз на персонажа)
#[derive(Event, Debug, Clone)]
pub struct CharacterDied {
    pub entity: Entity,
    pub kind: CharacterKind,
    pub killer: Option<Entity>,
}

/// Маркер: персонаж мёртв
///
/// Системы движения/огня/AI фильтруют по `Without<Dead>` — труп инертен,
/// но остаётся в мире (не despawn).
#[derive(Component, Debug)]
pub struct Dead;

/// Система: применение ProjectileImpact к Health
///
/// Head shot перекрывает урон пули фиксированным значением. Переход в
/// смерть — через was_alive/is_alive, чтобы CharacterDied ушёл ровно раз.
pub fn apply_impacts(
    mut impact_events: EventReader<ProjectileImpact>,
    mut targets: Query<(&mut Health, &Character)>,
    mut died_events: EventWriter<CharacterDied>,
    mut audio_events: EventWriter<AudioCue>,
    mut anim_events: EventWriter<AnimationFlag>,
) {
    for impact in impact_events.read() {
        let Ok((mut health, character)) = targets.get_mut(impact.target) else {
            continue;
        };

        if !health.is_alive() {
            continue; // труп — урон no-op
        }

        let damage = if impact.head_shot {
            HEADSHOT_DAMAGE
        } else {
            impact.attack
        };

        health.take_damage(damage);

        audio_events.write(AudioCue {
            entity: impact.target,
            kind: if impact.head_shot {
                AudioKind::HeadShot
            } else {
                AudioKind::Impact
            },
        });

        crate::log(&format!(
            "💥 {:?} hit {:?} for {} ({}HP left{})",
            impact.owner,
            impact.target,
            damage,
            health.current,
            if impact.head_shot { ", HEADSHOT" } else { "" }
        ));

        if !health.is_alive() {
            died_events.write(CharacterDied {
                entity: impact.target,
                kind: character.kind,
                killer: Some(impact.owner),
            });
            anim_events.write(AnimationFlag {
                entity: impact.target,
                kind: AnimKind::Death,
                active: true,
            });
            crate::log_info(&format!(
                "☠️ {:?} ({:?}) killed by {:?}",
                impact.target, character.kind, impact.owner
            ));
        }
    }
}

/// Система: заморозка мёртвых
///
/// Обнуляем velocity и input сразу, маркер Dead и снятие AI — через
/// Commands. Дальше труп не двигается, не стреляет и не думает.
pub fn disable_on_death(
    mut commands: Commands,
    mut died_events: EventReader<CharacterDied>,
    mut bodies: Query<(&mut Body, Option<&mut MovementInput>)>,
) {
    for event in died_events.read() {
        if let Ok((mut body, movement)) = bodies.get_mut(event.entity) {
            body.velocity = Vec3::ZERO;
            if let Some(mut input) = movement {
                input.direction = Vec3::ZERO;
            }
        }

        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands.remove::<crate::ai::AiState>();
            entity_commands.remove::<MovementInput>();
            entity_commands.remove::<TurnInput>();
            entity_commands.insert(Dead);
        }
    }
}
