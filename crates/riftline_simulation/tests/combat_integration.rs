//! Combat integration tests
//!
//! Headless App + SimulationPlugin, тики через `step`.
//! Signals вычитываются из `Events<T>` после каждого тика (точный подсчёт).

use bevy::prelude::*;
use riftline_simulation::*;

const DT: f32 = 1.0 / 60.0;

/// Собранные за прогон signals
#[derive(Default)]
struct Signals {
    damage: Vec<DamageDealt>,
    deaths: Vec<EntityDied>,
    points: Vec<PointsScored>,
    switches: Vec<ActiveWeaponChanged>,
    fired: Vec<WeaponFired>,
    stats: Vec<StatChanged>,
    scores: Vec<ScoreChanged>,
}

impl Signals {
    fn collect(&mut self, app: &mut App) {
        self.damage.extend(drain::<DamageDealt>(app));
        self.deaths.extend(drain::<EntityDied>(app));
        self.points.extend(drain::<PointsScored>(app));
        self.switches.extend(drain::<ActiveWeaponChanged>(app));
        self.fired.extend(drain::<WeaponFired>(app));
        self.stats.extend(drain::<StatChanged>(app));
        self.scores.extend(drain::<ScoreChanged>(app));
    }
}

fn drain<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}

fn run(app: &mut App, signals: &mut Signals, ticks: u32) {
    for _ in 0..ticks {
        step(app, DT);
        signals.collect(app);
    }
}

fn spawn_player(app: &mut App, position: Vec3, health: u32) -> Entity {
    app.world_mut()
        .spawn((Player, Transform::from_translation(position), Health::new(health)))
        .id()
}

fn spawn_armed_player(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            Player,
            Transform::from_translation(position),
            WeaponInventory::standard(),
        ))
        .id()
}

fn spawn_hostile(app: &mut App, position: Vec3, health: u32) -> Entity {
    app.world_mut()
        .spawn((HostileAI::default(), Transform::from_translation(position), Health::new(health)))
        .id()
}

fn ai_state(app: &App, entity: Entity) -> AIState {
    app.world().get::<HostileAI>(entity).map(|ai| ai.state).unwrap_or_default()
}

fn place(app: &mut App, entity: Entity, position: Vec3) {
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(entity) {
        transform.translation = position;
    }
}

/// Test: Wander (20m) → Chase (10m) → Attack (1m), контактный урон ровно один раз за cooldown
#[test]
fn test_hostile_wander_chase_attack() {
    let mut app = create_headless_app(42);
    let mut signals = Signals::default();
    let player = spawn_player(&mut app, Vec3::ZERO, 100);
    let hostile = spawn_hostile(&mut app, Vec3::new(20.0, 0.0, 0.0), 30);

    run(&mut app, &mut signals, 1);
    assert_eq!(ai_state(&app, hostile), AIState::Wander);

    place(&mut app, hostile, Vec3::new(10.0, 0.0, 0.0));
    run(&mut app, &mut signals, 1);
    assert_eq!(ai_state(&app, hostile), AIState::Chase);

    // Двигается к игроку со скоростью chase
    let x = app.world().get::<Transform>(hostile).unwrap().translation.x;
    assert!((x - (10.0 - 4.0 * DT)).abs() < 1e-4, "x = {}", x);

    place(&mut app, hostile, Vec3::new(1.0, 0.0, 0.0));
    run(&mut app, &mut signals, 1);
    assert_eq!(ai_state(&app, hostile), AIState::Attack);
    assert_eq!(signals.damage.len(), 1);
    assert_eq!(signals.damage[0].source, DamageSource::Contact);
    assert_eq!(signals.damage[0].target, player);
    assert_eq!(signals.damage[0].amount, 10);
    assert_eq!(app.world().get::<Health>(player).unwrap().current, 90);

    // В пределах attack cooldown (1s): больше ни одного удара
    run(&mut app, &mut signals, 30);
    assert_eq!(signals.damage.len(), 1);

    run(&mut app, &mut signals, 40);
    assert_eq!(signals.damage.len(), 2);
}

/// Test: выстрел убивает врага, смерть и очки ровно один раз, потом despawn
#[test]
fn test_ranged_kill_scores_once_and_despawns() {
    let mut app = create_headless_app(42);
    let mut signals = Signals::default();
    let player = spawn_armed_player(&mut app, Vec3::ZERO);
    let hostile = spawn_hostile(&mut app, Vec3::new(0.0, 0.0, 10.0), 10);

    app.world_mut().send_event(AttackIntent {
        entity: player,
        target_point: Vec3::new(0.0, 0.0, 10.0),
    });
    run(&mut app, &mut signals, 1);
    assert_eq!(signals.fired.len(), 1);
    assert_eq!(signals.fired[0].kind, WeaponKind::Ranged);

    run(&mut app, &mut signals, 30);
    assert_eq!(signals.deaths.len(), 1);
    assert_eq!(signals.deaths[0].entity, hostile);
    assert_eq!(signals.deaths[0].killer, Some(player));
    assert_eq!(ai_state(&app, hostile), AIState::Dying);

    // Стрельба по умирающему не даёт повторных очков
    for _ in 0..3 {
        app.world_mut().send_event(AttackIntent {
            entity: player,
            target_point: Vec3::new(0.0, 0.0, 10.0),
        });
        run(&mut app, &mut signals, 20);
    }

    assert_eq!(signals.deaths.len(), 1);
    assert_eq!(signals.points.len(), 1);
    assert_eq!(signals.points[0].points, 100);
    assert_eq!(app.world().resource::<Score>().total, 100);
    assert_eq!(signals.scores.last().map(|event| event.total), Some(100));

    // death duration 1.5s → entity убран из мира
    run(&mut app, &mut signals, 60);
    assert!(!app.world().entities().contains(hostile));
}

/// Test: урон мимо resolver (прямо в Health) всё равно даёт одну смерть + очки
#[test]
fn test_external_damage_kill_scores_once() {
    let mut app = create_headless_app(42);
    let mut signals = Signals::default();
    let hostile = spawn_hostile(&mut app, Vec3::new(5.0, 0.0, 5.0), 30);

    let killed = app
        .world_mut()
        .get_mut::<Health>(hostile)
        .map(|mut health| health.take_damage(35));
    assert_eq!(killed, Some(true));

    run(&mut app, &mut signals, 1);
    assert_eq!(ai_state(&app, hostile), AIState::Dying);
    assert_eq!(signals.deaths.len(), 1);
    assert_eq!(signals.deaths[0].entity, hostile);
    assert_eq!(signals.deaths[0].killer, None);
    assert_eq!(signals.points.len(), 1);
    assert_eq!(signals.points[0].points, 100);
    assert_eq!(signals.points[0].killer, None);
    assert_eq!(app.world().resource::<Score>().total, 100);

    run(&mut app, &mut signals, 10);
    assert_eq!(signals.deaths.len(), 1);
    assert_eq!(signals.points.len(), 1);
    assert_eq!(app.world().resource::<Score>().total, 100);
}

/// Test: death sequence длится полные 1.5s после тика смерти
#[test]
fn test_death_sequence_full_duration_after_kill_tick() {
    let mut app = create_headless_app(42);
    let mut signals = Signals::default();
    let hostile = spawn_hostile(&mut app, Vec3::new(5.0, 0.0, 5.0), 30);

    if let Some(mut health) = app.world_mut().get_mut::<Health>(hostile) {
        health.take_damage(30);
    }
    run(&mut app, &mut signals, 1); // тик смерти
    assert_eq!(signals.deaths.len(), 1);

    // 88 тиков = 1.4667s < 1.5s
    run(&mut app, &mut signals, 88);
    assert!(app.world().entities().contains(hostile));

    run(&mut app, &mut signals, 3);
    assert!(!app.world().entities().contains(hostile));
}

/// Test: на 30 Hz projectile не пролетает сквозь цель на линии огня
#[test]
fn test_ranged_hit_at_low_tick_rate() {
    let mut app = create_headless_app(42);
    let player = spawn_armed_player(&mut app, Vec3::ZERO);
    // Неподвижная цель: концы тиков (1.67m, 3.33m) оба дальше hit radius
    let hostile = app
        .world_mut()
        .spawn((
            HostileAI::default(),
            AIConfig {
                chase_speed: 0.0,
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, 2.5),
            Health::new(30),
        ))
        .id();

    app.world_mut().send_event(AttackIntent {
        entity: player,
        target_point: Vec3::new(0.0, 0.0, 2.5),
    });
    for _ in 0..10 {
        step(&mut app, 1.0 / 30.0);
    }

    let health = app.world().get::<Health>(hostile).map(|health| health.current);
    assert_eq!(health, Some(20));
}

/// Test: swing бьёт только цель в дуге, раньше чем она успеет ударить
#[test]
fn test_melee_swing_same_tick() {
    let mut app = create_headless_app(42);
    let mut signals = Signals::default();
    let player = spawn_armed_player(&mut app, Vec3::ZERO);
    let front = spawn_hostile(&mut app, Vec3::new(0.0, 0.0, 1.4), 25);
    let behind = spawn_hostile(&mut app, Vec3::new(0.0, 0.0, -2.0), 25);

    app.world_mut().send_event(SwitchWeaponIntent { entity: player, slot: 1 });
    app.world_mut().send_event(AttackIntent {
        entity: player,
        target_point: Vec3::new(0.0, 0.0, 1.4),
    });
    run(&mut app, &mut signals, 1);

    assert_eq!(signals.switches.len(), 1);
    assert_eq!(signals.switches[0].kind, WeaponKind::Melee);
    assert!(!signals.switches[0].automatic);

    assert_eq!(signals.damage.len(), 1);
    assert_eq!(signals.damage[0].source, DamageSource::Melee);
    assert_eq!(signals.damage[0].target, front);
    assert_eq!(signals.damage[0].amount, 25);
    assert_eq!(signals.deaths.len(), 1);
    assert_eq!(ai_state(&app, front), AIState::Dying);

    assert_eq!(app.world().get::<Health>(behind).unwrap().current, 25);
    assert_eq!(app.world().get::<Health>(player).unwrap().current, 100);
}

/// Test: пустой магазин → auto-switch на клинок после delay
#[test]
fn test_auto_switch_on_empty_magazine() {
    let mut app = create_headless_app(42);
    let mut signals = Signals::default();

    let mut inventory = WeaponInventory::standard();
    if let Some(Weapon::Ranged(pistol)) = inventory.weapon_mut(0) {
        pistol.set_ammo(1);
    }
    let player = app.world_mut().spawn((Player, Transform::default(), inventory)).id();

    app.world_mut().send_event(AttackIntent {
        entity: player,
        target_point: Vec3::new(5.0, 0.0, 0.0),
    });
    run(&mut app, &mut signals, 30);
    assert!(signals.switches.is_empty()); // delay 0.75s ещё идёт

    run(&mut app, &mut signals, 30);
    assert_eq!(signals.switches.len(), 1);
    assert!(signals.switches[0].automatic);
    assert_eq!(signals.switches[0].slot, 1);

    let inventory = app.world().get::<WeaponInventory>(player).unwrap();
    assert_eq!(inventory.active_kind(), Some(WeaponKind::Melee));
}

/// Test: StatChanged только при реальном изменении
#[test]
fn test_stat_changes_reported_once_per_change() {
    let mut app = create_headless_app(42);
    let mut signals = Signals::default();
    let player = spawn_armed_player(&mut app, Vec3::ZERO);

    // Стартовые значения
    run(&mut app, &mut signals, 1);
    assert_eq!(signals.stats.len(), 2);
    assert!(signals
        .stats
        .iter()
        .any(|event| event.stat == StatKind::Health && event.current == 100));
    assert!(signals
        .stats
        .iter()
        .any(|event| event.stat == StatKind::Ammo && event.current == 30 && event.max == 30));

    // Тики без изменений: тишина
    run(&mut app, &mut signals, 10);
    assert_eq!(signals.stats.len(), 2);

    app.world_mut().send_event(AttackIntent {
        entity: player,
        target_point: Vec3::new(0.0, 0.0, 50.0),
    });
    run(&mut app, &mut signals, 1);
    assert_eq!(signals.stats.len(), 3);
    assert_eq!(
        signals.stats[2],
        StatChanged {
            entity: player,
            stat: StatKind::Ammo,
            current: 29,
            max: 30,
        }
    );

    // Pickup → магазин снова полон, одно изменение
    app.world_mut().send_event(AmmoPickup { entity: player, amount: 5 });
    run(&mut app, &mut signals, 1);
    assert_eq!(signals.stats.len(), 4);
    assert_eq!(signals.stats[3].current, 30);
}

/// Test: игрок погибает от контактного урона, Dead marker, очков нет
#[test]
fn test_player_death_marks_dead() {
    let mut app = create_headless_app(42);
    let mut signals = Signals::default();
    let player = spawn_player(&mut app, Vec3::ZERO, 10);
    let hostile = spawn_hostile(&mut app, Vec3::new(1.0, 0.0, 0.0), 30);

    run(&mut app, &mut signals, 1);
    assert_eq!(signals.deaths.len(), 1);
    assert_eq!(signals.deaths[0].entity, player);
    assert_eq!(signals.deaths[0].killer, Some(hostile));
    assert!(signals.points.is_empty());
    assert!(app.world().get::<Dead>(player).is_some());

    // Мёртвый игрок больше не цель
    run(&mut app, &mut signals, 120);
    assert_eq!(signals.damage.len(), 1);
    assert_eq!(ai_state(&app, hostile), AIState::Wander);
}

/// Test: броня поглощает контактный урон первой
#[test]
fn test_armor_absorbs_contact_damage() {
    let mut app = create_headless_app(42);
    let mut signals = Signals::default();
    let player = app
        .world_mut()
        .spawn((Player, Transform::default(), Armor::new(4)))
        .id();
    spawn_hostile(&mut app, Vec3::new(1.0, 0.0, 0.0), 30);

    run(&mut app, &mut signals, 1);
    assert_eq!(signals.damage.len(), 1);
    assert_eq!(signals.damage[0].absorbed, 4);
    assert_eq!(signals.damage[0].amount, 6);
    assert_eq!(app.world().get::<Armor>(player).unwrap().current, 0);
    assert_eq!(app.world().get::<Health>(player).unwrap().current, 94);
}

/// Test: отрицательный dt не двигает таймеры
#[test]
fn test_negative_delta_is_ignored() {
    let mut app = create_headless_app(42);
    let mut signals = Signals::default();
    let player = spawn_armed_player(&mut app, Vec3::ZERO);

    app.world_mut().send_event(AttackIntent {
        entity: player,
        target_point: Vec3::Z,
    });
    run(&mut app, &mut signals, 1);

    step(&mut app, -5.0);
    let inventory = app.world().get::<WeaponInventory>(player).unwrap();
    assert_eq!(inventory.active_weapon().unwrap().cooldown_remaining(), 0.25);
    assert_eq!(app.world().resource::<SimulationTick>().delta, 0.0);
}
