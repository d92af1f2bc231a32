//! Headless симуляция RIFTLINE
//!
//! Игрок с пистолетом и клинком против группы hostile акторов.
//! Игрок стреляет в ближайшего живого врага каждый тик (attack intent),
//! cooldowns/ammo/auto-switch решают, что реально произойдёт.

use bevy::prelude::*;
use riftline_simulation::shared::planar_distance;
use riftline_simulation::*;

const TICKS: u32 = 1200;

fn main() {
    let seed = 42;
    println!("Starting RIFTLINE headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    set_log_level(LogLevel::Info);

    let player = app
        .world_mut()
        .spawn((Player, Transform::default(), Armor::new(50), WeaponInventory::standard()))
        .id();

    for (index, position) in [
        Vec3::new(8.0, 0.0, 6.0),
        Vec3::new(-10.0, 0.0, 4.0),
        Vec3::new(3.0, 0.0, -12.0),
        Vec3::new(20.0, 0.0, 20.0),
    ]
    .into_iter()
    .enumerate()
    {
        let hostile = app
            .world_mut()
            .spawn((HostileAI::default(), Health::new(30), Transform::from_translation(position)))
            .id();
        println!("Spawned hostile #{} {:?} at {:?}", index, hostile, position);
    }

    for tick in 0..TICKS {
        if let Some(target_point) = nearest_hostile(app.world_mut(), player) {
            app.world_mut().send_event(AttackIntent {
                entity: player,
                target_point,
            });
        }

        step(&mut app, DEFAULT_TICK_DELTA);

        if tick % 100 == 0 {
            print_summary(app.world_mut(), player, tick);
        }
    }

    print_summary(app.world_mut(), player, TICKS);
    println!("Simulation complete!");
}

fn nearest_hostile(world: &mut World, player: Entity) -> Option<Vec3> {
    let origin = world.get::<Transform>(player)?.translation;

    let mut query = world.query::<(&Transform, &HostileAI)>();
    query
        .iter(world)
        .filter(|(_, ai)| ai.is_live())
        .map(|(transform, _)| transform.translation)
        .min_by(|a, b| planar_distance(origin, *a).total_cmp(&planar_distance(origin, *b)))
}

fn print_summary(world: &mut World, player: Entity, tick: u32) {
    let hostiles = world.query::<&HostileAI>().iter(world).filter(|ai| ai.is_live()).count();
    let score = world.get_resource::<Score>().map_or(0, |score| score.total);
    let health = world.get::<Health>(player).copied().unwrap_or_default();
    let weapon = world
        .get::<WeaponInventory>(player)
        .and_then(|inventory| inventory.active_kind().zip(inventory.ammo()));

    println!(
        "Tick {}: hostiles alive {}, score {}, player health {}/{}, weapon {:?}",
        tick, hostiles, score, health.current, health.max, weapon
    );
}
