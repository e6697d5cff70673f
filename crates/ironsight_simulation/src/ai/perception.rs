//! Perception: обнаружение игрока oriented box'ом перед агентом.
//!
//! Внешний цикл AI: бежит ПОСЛЕ внутренних FSM transitions в той же цепочке
//! и может их переписать (поздняя запись побеждает). Отсутствие игрока в
//! мире — «игрока не видно», не ошибка.

use bevy::prelude::*;

use crate::ai::{AiConfig, AiState};
use crate::combat::Dead;
use crate::player::PlayerControlled;
use crate::world::Obb;

/// Высота reference-точки игрока и центра box'а над origin (грудь)
const PERCEPTION_HEIGHT: f32 = 1.0;

/// Система: тест игрока в perception box'е
///
/// Box смещён вперёд на perception_offset и ориентирован по корпусу агента.
/// Игрок внутри и state ≠ Fire → форсим TrackTarget. Игрок снаружи и state
/// ∉ {Fire, RandomWalk, Idle} → форсим Idle (с новым ожиданием).
pub fn perceive_player(
    mut agents: Query<(Entity, &Transform, &AiConfig, &mut AiState)>,
    players: Query<&Transform, (With<PlayerControlled>, Without<AiState>, Without<Dead>)>,
) {
    // Мёртвый или отсутствующий игрок — "absent", никаких форс-переходов
    let Some(player_transform) = players.iter().next() else {
        return;
    };
    let reference = player_transform.translation + Vec3::Y * PERCEPTION_HEIGHT;

    for (entity, transform, config, mut state) in agents.iter_mut() {
        let volume = Obb {
            center: transform.translation
                + Vec3::Y * PERCEPTION_HEIGHT
                + *transform.forward() * config.perception_offset,
            rotation: transform.rotation,
            half_extents: config.perception_extents,
        };

        if volume.contains(reference) {
            if !matches!(*state, AiState::Fire { .. } | AiState::TrackTarget) {
                crate::log(&format!("AI: {:?} spotted player → TrackTarget", entity));
                *state = AiState::TrackTarget;
            }
        } else if !matches!(
            *state,
            AiState::Fire { .. } | AiState::RandomWalk { .. } | AiState::Idle { .. }
        ) {
            crate::log(&format!("AI: {:?} lost player → Idle", entity));
            *state = AiState::Idle { wait_timer: None };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perception_box(agent: &Transform, config: &AiConfig) -> Obb {
        Obb {
            center: agent.translation
                + Vec3::Y * PERCEPTION_HEIGHT
                + *agent.forward() * config.perception_offset,
            rotation: agent.rotation,
            half_extents: config.perception_extents,
        }
    }

    #[test]
    fn test_player_in_front_is_seen() {
        let config = AiConfig::default();
        // Агент в origin, forward = -Z
        let agent = Transform::default();
        let volume = perception_box(&agent, &config);

        // Игрок в 6м прямо по курсу — внутри box'а (offset 5, глубина 10)
        let player = Vec3::new(0.0, PERCEPTION_HEIGHT, -6.0);
        assert!(volume.contains(player));
    }

    #[test]
    fn test_player_behind_not_seen() {
        let config = AiConfig::default();
        let agent = Transform::default();
        let volume = perception_box(&agent, &config);

        let player = Vec3::new(0.0, PERCEPTION_HEIGHT, 6.0);
        assert!(!volume.contains(player));
    }

    #[test]
    fn test_player_to_the_side_not_seen() {
        let config = AiConfig::default();
        let agent = Transform::default();
        let volume = perception_box(&agent, &config);

        // Box узкий (1м шириной) — игрок в 3м вбок не виден
        let player = Vec3::new(3.0, PERCEPTION_HEIGHT, -6.0);
        assert!(!volume.contains(player));
    }

    #[test]
    fn test_box_follows_agent_rotation() {
        let config = AiConfig::default();
        // Агент повёрнут на 90°: forward смотрит вдоль -X
        let agent =
            Transform::default().looking_at(Vec3::new(-10.0, 0.0, 0.0), Vec3::Y);
        let volume = perception_box(&agent, &config);

        assert!(volume.contains(Vec3::new(-6.0, PERCEPTION_HEIGHT, 0.0)));
        assert!(!volume.contains(Vec3::new(0.0, PERCEPTION_HEIGHT, -6.0)));
    }
}
