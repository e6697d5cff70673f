//! Presentation cues — one-way сигналы наружу (звук, анимация).
//!
//! Ядро только пишет эти события; презентационный слой (рендер, аудио)
//! читает их на своей стороне. Ядро никогда не читает их обратно.

use bevy::prelude::*;

/// Звуковой cue (fire-and-forget)
#[derive(Event, Debug, Clone)]
pub struct AudioCue {
    pub entity: Entity,
    pub kind: AudioKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioKind {
    /// Выстрел
    Fire,
    /// Щелчок пустого магазина
    EmptyFire,
    /// Попадание по телу
    Impact,
    /// Попадание в голову
    HeadShot,
}

/// Анимационный флаг (fire-and-forget)
#[derive(Event, Debug, Clone)]
pub struct AnimationFlag {
    pub entity: Entity,
    pub kind: AnimKind,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimKind {
    Walk,
    Jump,
    Falling,
    Reload,
    Death,
}
