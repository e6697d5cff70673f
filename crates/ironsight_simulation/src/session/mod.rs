//! Game Session: агрегация побед/поражений.
//!
//! Явно сконструированный resource вместо глобального singleton'а: флаг
//! game over — поле объекта, не process-wide static. Ядро только считает
//! смерти; баннер и fade-in — презентационный слой.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::character::CharacterKind;
use crate::combat::CharacterDied;
use crate::SimStage;

/// Исход игры
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
}

/// Состояние сессии: счётчик врагов + исход
#[derive(Resource, Debug, Default)]
pub struct GameSession {
    pub enemy_total: u32,
    pub enemy_dead: u32,
    outcome: Option<Outcome>,
}

impl GameSession {
    pub fn new(enemy_total: u32) -> Self {
        Self {
            enemy_total,
            enemy_dead: 0,
            outcome: None,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Регистрация смерти. Исчерпывающий match по типу персонажа:
    /// игрок умер — поражение, все враги умерли — победа. Первый исход
    /// финален.
    pub fn register_death(&mut self, kind: CharacterKind) {
        match kind {
            CharacterKind::Player => {
                if self.outcome.is_none() {
                    self.outcome = Some(Outcome::Lose);
                }
            }
            CharacterKind::Enemy => {
                self.enemy_dead += 1;
                if self.outcome.is_none()
                    && self.enemy_total > 0
                    && self.enemy_dead >= self.enemy_total
                {
                    self.outcome = Some(Outcome::Win);
                }
            }
        }
    }
}

/// Система: подсчёт смертей из CharacterDied
pub fn update_session(
    mut died_events: EventReader<CharacterDied>,
    mut session: ResMut<GameSession>,
) {
    for event in died_events.read() {
        session.register_death(event.kind);

        if let Some(outcome) = session.outcome() {
            crate::log_info(&format!(
                "🏁 Session over: {:?} ({}/{} enemies dead)",
                outcome, session.enemy_dead, session.enemy_total
            ));
        }
    }
}

/// Session Plugin
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameSession>();
        app.add_systems(FixedUpdate, update_session.in_set(SimStage::Session));
    }
}
