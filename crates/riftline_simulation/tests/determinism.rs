//! Determinism tests
//!
//! Одинаковый seed + одинаковая последовательность dt → идентичный мир.

use bevy::prelude::*;
use riftline_simulation::*;

const DT: f32 = 1.0 / 60.0;

fn run_scenario(seed: u64, ticks: u32) -> (Vec<u8>, Vec<u8>, u32) {
    let mut app = create_headless_app(seed);

    let player = app
        .world_mut()
        .spawn((Player, Transform::default(), WeaponInventory::standard()))
        .id();

    for position in [
        Vec3::new(30.0, 0.0, 0.0),
        Vec3::new(-25.0, 0.0, 10.0),
        Vec3::new(5.0, 0.0, -40.0),
        Vec3::new(12.0, 0.0, 9.0),
    ] {
        app.world_mut().spawn((HostileAI::default(), Transform::from_translation(position)));
    }

    for tick in 0..ticks {
        if tick % 20 == 0 {
            app.world_mut().send_event(AttackIntent {
                entity: player,
                target_point: Vec3::new(12.0, 0.0, 9.0),
            });
        }
        step(&mut app, DT);
    }

    let transforms = world_snapshot::<Transform>(app.world_mut());
    let health = world_snapshot::<Health>(app.world_mut());
    let score = app.world().resource::<Score>().total;
    (transforms, health, score)
}

/// Test: 3 прогона с seed=42 дают идентичные результаты
#[test]
fn test_same_seed_same_world() {
    let first = run_scenario(42, 600);
    let second = run_scenario(42, 600);
    let third = run_scenario(42, 600);

    assert_eq!(first, second);
    assert_eq!(second, third);
}

/// Test: другой seed → другие wander траектории
#[test]
fn test_different_seed_diverges() {
    let a = run_scenario(42, 300);
    let b = run_scenario(7, 300);

    assert_ne!(a.0, b.0);
}

/// Test: DeterministicRng, вставленный до плагина, не перетирается
#[test]
fn test_preinserted_rng_is_kept() {
    let mut app = App::new();
    app.insert_resource(DeterministicRng::new(1234))
        .add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin::default());

    assert_eq!(app.world().resource::<DeterministicRng>().seed, 1234);
}
