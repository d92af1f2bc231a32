//! Tests for hit resolution (projectiles + melee swings).

#[cfg(test)]
mod tests {
    use super::super::projectile::ProjectilePool;
    use super::super::resolver::{resolve_projectile_hits, resolve_swing, HitTarget};
    use super::super::weapon::MeleeSwing;
    use bevy::prelude::*;

    const RADIUS: f32 = 0.8;

    fn target(index: u32, x: f32, z: f32) -> HitTarget {
        HitTarget {
            entity: Entity::from_raw(index),
            position: Vec3::new(x, 0.0, z),
            alive: true,
        }
    }

    #[test]
    fn test_projectile_hits_single_target_and_deactivates() {
        let owner = Entity::from_raw(1);
        let mut pool = ProjectilePool::new(4);
        pool.launch(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 1.0);

        // Две цели в радиусе: засчитывается только одна
        let mut targets = [target(1, 0.0, 5.0), target(2, 0.0, 5.2), target(3, 0.1, 5.3)];
        let mut struck = Vec::new();

        let hits = resolve_projectile_hits(&mut pool, owner, RADIUS, &mut targets, |entity| {
            struck.push(entity);
            false
        });

        assert_eq!(hits, 1);
        assert_eq!(struck, vec![Entity::from_raw(2)]); // владелец пропущен
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_projectile_misses_keep_flying() {
        let mut pool = ProjectilePool::new(4);
        pool.launch(Vec3::ZERO, Vec3::Z, 1.0);
        let mut targets = [target(2, 5.0, 5.0)];

        let hits = resolve_projectile_hits(&mut pool, Entity::from_raw(1), RADIUS, &mut targets, |_| false);

        assert_eq!(hits, 0);
        assert_eq!(pool.active_count(), 1);
    }

    #[test]
    fn test_projectile_sweeps_path_between_ticks() {
        let mut pool = ProjectilePool::new(4);
        pool.launch(Vec3::ZERO, Vec3::new(0.0, 0.0, 50.0), 1.0);
        let mut targets = [target(2, 0.0, 2.5)];

        // 30 Hz: 1.67m за тик, концы тиков (1.67, 3.33) оба дальше радиуса от цели
        pool.tick(1.0 / 30.0);
        assert_eq!(resolve_projectile_hits(&mut pool, Entity::from_raw(1), RADIUS, &mut targets, |_| false), 0);

        pool.tick(1.0 / 30.0);
        let position = pool.iter_active().next().map(|projectile| projectile.position);
        assert!(position.is_some_and(|position| (position.z - 2.5).abs() > RADIUS));

        let hits = resolve_projectile_hits(&mut pool, Entity::from_raw(1), RADIUS, &mut targets, |_| false);
        assert_eq!(hits, 1);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_projectile_hits_first_target_along_path() {
        let mut pool = ProjectilePool::new(4);
        pool.launch(Vec3::ZERO, Vec3::new(0.0, 0.0, 60.0), 1.0);
        pool.tick(0.1); // 0 → 6m

        let mut targets = [target(2, 0.0, 4.5), target(3, 0.3, 1.5)];
        let mut struck = Vec::new();
        resolve_projectile_hits(&mut pool, Entity::from_raw(1), RADIUS, &mut targets, |entity| {
            struck.push(entity);
            false
        });

        assert_eq!(struck, vec![Entity::from_raw(3)]);
    }

    #[test]
    fn test_dead_targets_are_skipped() {
        let mut pool = ProjectilePool::new(4);
        pool.launch(Vec3::ZERO, Vec3::ZERO, 1.0);
        pool.launch(Vec3::ZERO, Vec3::ZERO, 1.0);

        let mut targets = [target(2, 0.0, 0.1), target(3, 0.0, -0.1)];
        let mut struck = Vec::new();

        // Первое попадание убивает цель 2 → второй projectile летит в цель 3
        let hits = resolve_projectile_hits(&mut pool, Entity::from_raw(1), RADIUS, &mut targets, |entity| {
            struck.push(entity);
            true
        });

        assert_eq!(hits, 2);
        assert_eq!(struck, vec![Entity::from_raw(2), Entity::from_raw(3)]);
        assert!(!targets[0].alive && !targets[1].alive);
    }

    #[test]
    fn test_swing_hits_every_target_in_arc_once() {
        let attacker = Entity::from_raw(1);
        let mut swing = MeleeSwing::new(attacker, Vec3::ZERO, 0.0, 60f32.to_radians(), 2.2, 25);
        let mut targets = [
            target(1, 0.0, 0.0),  // сам атакующий
            target(2, 0.0, 1.0),  // прямо перед
            target(3, 0.5, 1.5),  // в дуге
            target(4, 0.0, -1.0), // за спиной
            target(5, 0.0, 4.0),  // дальше range
        ];
        let mut struck = Vec::new();

        let hits = resolve_swing(&mut swing, &mut targets, |entity| {
            struck.push(entity);
            false
        });

        assert_eq!(hits, 2);
        assert_eq!(struck, vec![Entity::from_raw(2), Entity::from_raw(3)]);

        // Повторный резолв того же swing никого не бьёт
        let again = resolve_swing(&mut swing, &mut targets, |_| false);
        assert_eq!(again, 0);
    }

    #[test]
    fn test_swing_ignores_dead_targets() {
        let mut swing = MeleeSwing::new(Entity::from_raw(1), Vec3::ZERO, 0.0, 1.0, 2.0, 25);
        let mut targets = [HitTarget {
            alive: false,
            ..target(2, 0.0, 1.0)
        }];

        assert_eq!(resolve_swing(&mut swing, &mut targets, |_| true), 0);
        assert!(swing.struck().is_empty());
    }
}
