//! IRONSIGHT Simulation Core
//!
//! Поведенческое ядро FPS-прототипа: ECS-симуляция на Bevy 0.16.
//! - AI finite-state контроллер (Idle/RandomWalk/TrackTarget/Fire)
//! - Общая боевая модель персонажа (health, магазин, перезарядка, прыжок,
//!   ground detection) — одна для игрока и AI
//!
//! Рендер, опрос ввода, UI, аудио и navmesh-pathfinding — внешние
//! коллабораторы: ядро шлёт им one-way events и потребляет инжектированные
//! capabilities (NavArea, Terrain).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod character;
pub mod combat;
pub mod logger;
pub mod player;
pub mod session;
pub mod world;

// Re-export основных типов для удобства
pub use ai::{AiConfig, AiPlugin, AiState};
pub use character::{
    spawn_enemy, spawn_player, Body, Character, CharacterController, CharacterKind,
    CharacterPlugin, Health, HitVolumes, JumpIntent, MovementInput, RigBlendWeight, TurnInput,
};
pub use combat::{
    AimPoint, AnimKind, AnimationFlag, AudioCue, AudioKind, CharacterDied, CombatPlugin, Dead,
    FireIntent, Projectile, ProjectileImpact, ReloadIntent, WeaponStats, HEADSHOT_DAMAGE,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_printer};
pub use player::{PlayerControlled, PlayerInput, PlayerPlugin};
pub use session::{GameSession, Outcome, SessionPlugin};
pub use world::{NavArea, Terrain};

/// Этапы симуляционного тика (выполняются строго по порядку)
///
/// Решения → команды → движение → бой → сессия. Внутри каждого этапа
/// системы дополнительно chain'ятся своими plugin'ами.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimStage {
    /// AI FSM + perception
    AiDecide,
    /// Player input → command surface
    PlayerControl,
    /// Движение/поворот/прыжок/ground probe
    Locomotion,
    /// Огонь, пули, урон, смерть
    Combat,
    /// Win/lose агрегация
    Session,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Fixed timestep 60Hz для simulation tick
        app.insert_resource(Time::<Fixed>::from_hz(60.0));

        // Seeded RNG: не перетираем если seed уже задан снаружи
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        // Инжектированные world capabilities (дефолты, если не заданы)
        app.init_resource::<NavArea>();
        app.init_resource::<Terrain>();

        app.configure_sets(
            FixedUpdate,
            (
                SimStage::AiDecide,
                SimStage::PlayerControl,
                SimStage::Locomotion,
                SimStage::Combat,
                SimStage::Session,
            )
                .chain(),
        );

        app.add_plugins((
            AiPlugin,
            PlayerPlugin,
            CharacterPlugin,
            CombatPlugin,
            SessionPlugin,
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Все случайные решения ядра (idle wait, random walk, recoil, монетки)
/// тянут из него — два прогона с одним seed идентичны.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время шагает вручную ровно по 1/60 сек на `app.update()` — один update
/// == один FixedUpdate тик, независимо от wall clock. Иначе детерминизм
/// и тайминговые сценарии в тестах зависели бы от скорости машины.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)) // 60Hz FixedUpdate
        .insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(
            std::time::Duration::from_secs_f64(1.0 / 60.0),
        ));

    app
}

/// Snapshot мира для сравнения детерминизма
///
/// Упрощённый формат: Entity ID + Debug-представление компонента,
/// отсортировано по Entity для стабильности.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
