//! End-to-end runs with the stock entity kinds over small tile levels.

use tessel_engine::kinds::energy_bullet::{self, EnergyBullet};
use tessel_engine::kinds::player::Player;
use tessel_engine::kinds::walker::Walker;
use tessel_engine::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn engine_over(rows: &[&str]) -> Engine {
    let world = World::with_tiles(TileMap::from_rows(rows, 16.0));
    let mut engine = Engine::new(world, EngineConfig::default());
    engine.install_default_systems().unwrap();
    kinds::register_defaults(&mut engine.world_mut().factory);
    engine
}

fn open_field() -> Engine {
    engine_over(&[
        "....................",
        "....................",
        "....................",
        "....................",
        "####################",
    ])
}

fn count_kind(engine: &Engine, kind: &str) -> usize {
    engine
        .world()
        .entities
        .bodies()
        .filter(|(_, b)| b.kind == kind)
        .count()
}

fn find_kind<'a>(engine: &'a Engine, kind: &str) -> Option<&'a Entity> {
    engine
        .world()
        .entities
        .iter()
        .find(|(_, e)| e.body().kind == kind)
        .map(|(_, e)| e)
}

// ---------------------------------------------------------------------------
// 1. A projectile that hits a wall is gone by the next frame
// ---------------------------------------------------------------------------

#[test]
fn projectile_hitting_wall_is_removed_in_the_same_frame() {
    let mut engine = engine_over(&[
        ".....#....",
        ".....#....",
        ".....#....",
    ]);
    engine.world_mut().entities.add_projectile(EnergyBullet::fired(
        40.0,
        20.0,
        Vec2::new(energy_bullet::SPEED, 0.0),
        PhysicsLayer::PlayerProjectile,
    ));

    // 4 px per frame; the 6 px shot reaches the wall at x = 80 on frame 8.
    engine.run_frames(8);
    assert_eq!(engine.world().entities.projectile_len(), 1);
    assert_eq!(engine.world().physics_stats.tile_contacts, 0);

    let diag = engine.frame();
    assert_eq!(diag.frame, 8);
    assert_eq!(diag.evicted, 1);
    assert_eq!(engine.world().physics_stats.tile_contacts, 1);
    assert_eq!(engine.world().entities.projectile_len(), 0);

    engine.frame();
    assert!(engine.world().entities.is_empty());
}

// ---------------------------------------------------------------------------
// 2. Bullet lifetime and range
// ---------------------------------------------------------------------------

#[test]
fn bullet_expires_after_its_range() {
    let mut engine = Engine::new(World::new(), EngineConfig::default());
    engine.install_default_systems().unwrap();
    engine.world_mut().entities.add_projectile(EnergyBullet::fired(
        100.0,
        100.0,
        Vec2::new(energy_bullet::SPEED, 0.0),
        PhysicsLayer::PlayerProjectile,
    ));

    // 320 px of range at 4 px per frame.
    engine.run_frames(79);
    let (_, bullet) = engine.world().entities.bodies().next().unwrap();
    assert!(bullet.position.x > 410.0);
    engine.run_frames(4);
    assert_eq!(engine.world().entities.projectile_len(), 0);
}

#[test]
fn bullet_expires_after_its_lifetime() {
    let mut engine = Engine::new(World::new(), EngineConfig::default());
    engine.install_default_systems().unwrap();
    engine.world_mut().entities.add_projectile(EnergyBullet::fired_with(
        100.0,
        100.0,
        Vec2::new(10.0, 0.0),
        PhysicsLayer::PlayerProjectile,
        0.5,
        energy_bullet::MAX_RANGE,
    ));

    engine.run_frames(29);
    assert_eq!(engine.world().entities.projectile_len(), 1);
    let elapsed = find_kind(&engine, energy_bullet::TYPE_KEY)
        .and_then(|e| e.behavior_as::<EnergyBullet>())
        .unwrap()
        .elapsed();
    assert!((elapsed - 29.0 / 60.0).abs() < 1e-9);

    engine.run_frames(3);
    assert_eq!(engine.world().entities.projectile_len(), 0);
}

// ---------------------------------------------------------------------------
// 3. Walker: shot down, drops a pickup the player collects
// ---------------------------------------------------------------------------

#[test]
fn walker_shot_three_times_drops_a_pickup() {
    let mut engine = open_field();
    engine.world_mut().entities.spawn_named("walker", 120.0, 48.0);
    for _ in 0..walker_health() {
        engine.world_mut().entities.add_projectile(EnergyBullet::fired(
            96.0,
            54.0,
            Vec2::new(energy_bullet::SPEED, 0.0),
            PhysicsLayer::PlayerProjectile,
        ));
    }

    engine.run_frames(10);
    assert_eq!(count_kind(&engine, "walker"), 0);
    assert_eq!(count_kind(&engine, energy_bullet::TYPE_KEY), 0);
    assert_eq!(count_kind(&engine, "pickup"), 1);

    let (_, pickup) = engine
        .world()
        .entities
        .bodies()
        .find(|(_, b)| b.kind == "pickup")
        .unwrap();
    let (px, py) = (pickup.position.x, pickup.position.y);

    engine.world_mut().entities.spawn_named("player", px - 2.0, py - 4.0);
    engine.run_frames(3);

    assert_eq!(count_kind(&engine, "pickup"), 0);
    let player = find_kind(&engine, "player")
        .and_then(|e| e.behavior_as::<Player>())
        .unwrap();
    assert_eq!(player.coins(), 1);
}

fn walker_health() -> u32 {
    tessel_engine::kinds::walker::HEALTH
}

#[test]
fn walker_turns_at_walls() {
    let mut engine = engine_over(&[
        "#........#",
        "#........#",
        "##########",
    ]);
    engine.world_mut().entities.spawn_named("walker", 40.0, 16.0);

    // Walking left at 40 px/s, it meets the wall at x = 16 within a second.
    engine.run_frames(60);
    let walker = find_kind(&engine, "walker").unwrap();
    assert_eq!(walker.behavior_as::<Walker>().unwrap().direction(), 1.0);
    assert!(walker.body().position.x >= 16.0);
    assert!(walker.body().on_ground);
}

// ---------------------------------------------------------------------------
// 4. Player input
// ---------------------------------------------------------------------------

#[test]
fn player_runs_jumps_and_shoots_from_scripted_input() {
    let mut engine = open_field();
    let script = ScriptedInput::new();
    engine.register_system(InputSystem::new(script.clone())).unwrap();
    engine.world_mut().entities.spawn_named("player", 32.0, 44.0);

    engine.run_frames(5);
    let grounded = find_kind(&engine, "player").unwrap().body().clone();
    assert!(grounded.on_ground);
    assert_eq!(grounded.position.y, 44.0);

    // Velocity set on one frame moves the body on the next: 29 steps of 2 px.
    script.hold(InputFrame::default().with("right", 1.0), 30);
    engine.run_frames(30);
    let ran = find_kind(&engine, "player").unwrap().body().clone();
    assert!((ran.position.x - (32.0 + 29.0 * 2.0)).abs() < 1e-6);
    assert_eq!(ran.animation.clip.as_deref(), Some("run"));

    script.push(InputFrame::default().with("jump", 1.0));
    engine.run_frames(2);
    let airborne = find_kind(&engine, "player").unwrap().body().clone();
    assert!(airborne.position.y < 44.0);
    assert!(!airborne.on_ground);

    script.push(InputFrame::default().with("shoot", 1.0));
    engine.run_frames(2);
    assert_eq!(engine.world().entities.projectile_len(), 1);
}

#[test]
fn walker_contact_hurts_player_once_per_invulnerability_window() {
    let mut engine = open_field();
    engine.world_mut().entities.spawn_named("player", 100.0, 44.0);
    engine.world_mut().entities.spawn_named("walker", 108.0, 48.0);

    engine.run_frames(30);
    let player = find_kind(&engine, "player")
        .and_then(|e| e.behavior_as::<Player>())
        .unwrap();
    assert_eq!(player.health(), tessel_engine::kinds::player::HEALTH - 1);
}

// ---------------------------------------------------------------------------
// 5. Determinism
// ---------------------------------------------------------------------------

fn scripted_run(frames: u64) -> (String, String) {
    let mut engine = open_field();
    let script = ScriptedInput::new();
    engine.register_system(InputSystem::new(script.clone())).unwrap();
    engine.world_mut().entities.spawn_named("player", 32.0, 44.0);
    engine.world_mut().entities.spawn_named("walker", 200.0, 48.0);
    engine.world_mut().entities.spawn_named("walker", 260.0, 48.0);

    script.hold(InputFrame::default().with("right", 1.0).with("shoot", 1.0), 40);
    script.push(InputFrame::default().with("jump", 1.0));
    script.hold(InputFrame::default().with("left", 1.0), 20);

    let initial = engine.state_hash();
    engine.run_frames(frames);
    (initial, engine.state_hash())
}

#[test]
fn identical_runs_produce_identical_state() {
    let (start_a, end_a) = scripted_run(90);
    let (start_b, end_b) = scripted_run(90);
    assert_eq!(start_a, start_b);
    assert_eq!(end_a, end_b);
    assert_ne!(start_a, end_a);
}
