//! Headless симуляция IRONSIGHT
//!
//! Запускает Bevy App без рендера: игрок (без ввода) + 3 врага с AI.

use bevy::prelude::*;
use ironsight_simulation::{
    create_headless_app, spawn_enemy, spawn_player, GameSession, SimulationPlugin,
};

fn main() {
    let seed = 42;
    println!("Starting IRONSIGHT headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    app.insert_resource(GameSession::new(3));

    {
        let world = app.world_mut();
        let mut commands = world.commands();
        spawn_player(&mut commands, Vec3::new(0.0, 0.0, 0.0));
        spawn_enemy(&mut commands, Vec3::new(10.0, 0.0, 0.0));
        spawn_enemy(&mut commands, Vec3::new(-10.0, 0.0, 10.0));
        spawn_enemy(&mut commands, Vec3::new(0.0, 0.0, -15.0));
    }

    // 1000 тиков симуляции
    for tick in 0..1000 {
        app.update();

        if tick % 100 == 0 {
            let entity_count = app.world().entities().len();
            println!("Tick {}: {} entities", tick, entity_count);
        }

        if let Some(outcome) = app.world().resource::<GameSession>().outcome() {
            println!("Session over at tick {}: {:?}", tick, outcome);
            break;
        }
    }

    println!("Simulation complete!");
}
