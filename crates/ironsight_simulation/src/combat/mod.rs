//! Combat Resolver: оружие, пули, урон, смерть, presentation cues.
//!
//! ECS ответственность:
//! - Game state: магазин/запас, таймеры огня и перезарядки, health
//! - Combat rules: rate limiting, head shot policy, одноразовая смерть
//! - Events: FireIntent/ReloadIntent (вход), AudioCue/AnimationFlag/
//!   CharacterDied (выход)
//!
//! Презентационный слой: звук, muzzle flash, анимации, ragdoll.

use bevy::prelude::*;

pub mod cues;
pub mod damage;
pub mod projectile;
pub mod weapon;

pub use cues::{AnimKind, AnimationFlag, AudioCue, AudioKind};
pub use damage::{CharacterDied, Dead, HEADSHOT_DAMAGE};
pub use projectile::{Projectile, ProjectileImpact};
pub use weapon::{AimPoint, FireIntent, ReloadIntent, WeaponStats};

use crate::SimStage;

/// Combat Plugin
///
/// Порядок выполнения (chain):
/// 1. process_reload_intents — старт перезарядки (перенос патронов)
/// 2. process_fire_intents — rate limiting, спавн пуль, recoil
/// 3. tick_reloads — тик таймера перезарядки
/// 4. fly_projectiles — полёт + первая коллизия
/// 5. apply_impacts — урон, переход в смерть
/// 6. disable_on_death — заморозка трупов
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<FireIntent>()
            .add_event::<ReloadIntent>()
            .add_event::<ProjectileImpact>()
            .add_event::<CharacterDied>()
            .add_event::<AudioCue>()
            .add_event::<AnimationFlag>();

        app.add_systems(
            FixedUpdate,
            (
                weapon::process_reload_intents,
                weapon::process_fire_intents,
                weapon::tick_reloads,
                projectile::fly_projectiles,
                damage::apply_impacts,
                damage::disable_on_death,
            )
                .chain()
                .in_set(SimStage::Combat),
        );
    }
}
