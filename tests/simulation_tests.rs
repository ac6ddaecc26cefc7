//! Integration tests for the bouncing-ball simulation.
//!
//! These drive the public API end to end: building a scene from a config,
//! running it to completion, and checking that the ball stays in the box.

use bouncebox::prelude::*;
use bouncebox::{ConfigError, Wall};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn default_sim() -> Simulation {
    Simulation::new(&SceneConfig::default()).unwrap()
}

/// Largest distance the ball's surface may sit past a wall after a tick.
fn overshoot_allowance(sim: &Simulation, axis: Axis) -> f32 {
    sim.ball().velocity[axis.index()].abs() * sim.time_step() + 1e-4
}

fn assert_within_box(sim: &Simulation) {
    let ball = sim.ball();
    let half = sim.bounds().half_extent;
    for axis in Axis::ALL {
        let i = axis.index();
        let reach = ball.position[i].abs() + ball.radius;
        assert!(
            reach <= half[i] + overshoot_allowance(sim, axis),
            "tick {}: ball reach {} on {:?} exceeds {}",
            sim.ticks(),
            reach,
            axis,
            half[i]
        );
    }
}

// ============================================================================
// Default Scene
// ============================================================================

#[test]
fn test_default_run_completes() {
    let mut sim = default_sim();
    let summary = sim.run_headless(|_, _| {}).unwrap();

    // 3s at 5ms per tick
    assert_eq!(summary.ticks, 600);
    assert!((summary.elapsed - 3.0).abs() < 1e-6);
    assert!(summary.bounces > 0);
    assert!(sim.is_finished());
}

#[test]
fn test_default_run_stays_in_box() {
    let mut sim = default_sim();
    while sim.tick().is_some() {
        assert_within_box(&sim);
    }
}

#[test]
fn test_speed_is_conserved() {
    let mut sim = default_sim();
    let speed = sim.ball().speed();
    sim.run_headless(|sim, _| {
        assert!((sim.ball().speed() - speed).abs() < 1e-4);
    })
    .unwrap();
}

#[test]
fn test_first_bounce_is_front_wall() {
    // z needs 5.5 / 15 s to reach a wall, x needs 10.5 / 25 s
    let mut sim = default_sim();
    let mut first = None;
    while let Some(report) = sim.tick() {
        if let Some(wall) = report.reflections.iter().next() {
            first = Some(wall);
            break;
        }
    }
    assert_eq!(first, Some(Wall::FRONT));
    assert!(sim.ball().velocity.z < 0.0);
    assert!(sim.ball().velocity.x > 0.0);
}

#[test]
fn test_callback_sees_every_tick() {
    let mut sim = default_sim();
    let mut seen = 0u64;
    let mut reflected = 0u64;
    let summary = sim
        .run_headless(|_, report| {
            seen += 1;
            assert_eq!(report.tick, seen);
            reflected += report.reflections.count() as u64;
        })
        .unwrap();

    assert_eq!(seen, summary.ticks);
    assert_eq!(reflected, summary.bounces);
}

#[test]
fn test_reset_replays_identically() {
    let mut sim = default_sim();
    let first = sim.run_headless(|_, _| {}).unwrap();

    sim.reset();
    assert!(!sim.is_finished());
    let second = sim.run_headless(|_, _| {}).unwrap();

    assert_eq!(first, second);
}

// ============================================================================
// Reflection
// ============================================================================

#[test]
fn test_one_flip_per_crossing() {
    // a long first step leaves the ball deep inside the right wall's band
    let config = SceneConfig::default()
        .with_initial_position(Vec3::new(5.4, 0.0, 0.0))
        .with_initial_velocity(Vec3::new(1.0, 0.0, 0.0))
        .with_duration(None);
    let mut sim = Simulation::new(&config).unwrap();
    sim.step(0.5);
    assert!(!sim.bounds().contains(sim.ball()));

    let flipped = sim.step(0.005);
    assert!(flipped.reflections.contains(Wall::RIGHT));
    assert_eq!(sim.ball().velocity.x, -1.0);

    // still penetrating for many ticks, but already heading inwards
    let mut ticks = 0;
    while !sim.bounds().contains(sim.ball()) {
        let report = sim.step(0.005);
        assert!(report.reflections.is_empty(), "re-flipped at tick {}", report.tick);
        assert_eq!(sim.ball().velocity.x, -1.0);
        ticks += 1;
        assert!(ticks < 1000);
    }
    assert!(ticks > 1);
    assert_eq!(sim.bounce_count(), 1);
}

#[test]
fn test_no_wall_reflects_on_consecutive_ticks() {
    let mut sim = default_sim();
    let mut last_hit = [None::<u64>; 6];

    while let Some(report) = sim.tick() {
        for wall in report.reflections.iter() {
            let slot = Wall::ALL.iter().position(|w| *w == wall).unwrap();
            if let Some(prev) = last_hit[slot] {
                assert!(report.tick > prev + 1, "{} hit twice in a row", wall.name());
            }
            last_hit[slot] = Some(report.tick);

            // velocity now points back into the box
            let v = sim.ball().velocity[wall.axis.index()];
            assert!(v * wall.side.sign() < 0.0);
        }
    }
}

#[test]
fn test_corner_hit_reflects_two_axes() {
    let config = SceneConfig::default()
        .with_initial_position(Vec3::new(5.45, 5.45, 0.0))
        .with_initial_velocity(Vec3::new(20.0, 20.0, 0.0));
    let mut sim = Simulation::new(&config).unwrap();

    sim.step(0.005);
    let report = sim.step(0.005);
    assert!(report.reflections.contains(Wall::RIGHT));
    assert!(report.reflections.contains(Wall::TOP));
    assert_eq!(report.reflections.count(), 2);
    assert_eq!(sim.ball().velocity, Vec3::new(-20.0, -20.0, 0.0));
}

#[test]
fn test_front_wall_collides() {
    let config = SceneConfig::default()
        .with_initial_position(Vec3::ZERO)
        .with_initial_velocity(Vec3::new(0.0, 0.0, 30.0))
        .with_front_wall(false);
    let mut sim = Simulation::new(&config).unwrap();

    let mut hit = false;
    while let Some(report) = sim.tick() {
        if report.reflections.contains(Wall::FRONT) {
            hit = true;
            break;
        }
    }
    assert!(hit);
    assert!(sim.ball().velocity.z < 0.0);
}

#[test]
fn test_random_scenes_stay_in_box() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..50 {
        let radius = rng.gen_range(0.1..1.5);
        let box_size = rng.gen_range(4.0..20.0);
        let limit = box_size * 0.5 - radius;
        let position = Vec3::new(
            rng.gen_range(-limit..limit),
            rng.gen_range(-limit..limit),
            rng.gen_range(-limit..limit),
        );
        let velocity = Vec3::new(
            rng.gen_range(-60.0..60.0),
            rng.gen_range(-60.0..60.0),
            rng.gen_range(-60.0..60.0),
        );

        let config = SceneConfig::default()
            .with_box_size(box_size)
            .with_ball_radius(radius)
            .with_initial_position(position)
            .with_initial_velocity(velocity)
            .with_duration(Some(2.0));
        let mut sim = Simulation::new(&config).unwrap();
        while sim.tick().is_some() {
            assert_within_box(&sim);
        }
    }
}

// ============================================================================
// Arrow and Trail
// ============================================================================

#[test]
fn test_arrow_follows_ball() {
    let mut sim = default_sim();
    for _ in 0..250 {
        sim.tick();
        let arrow = sim.arrow();
        assert_eq!(arrow.origin, sim.ball().position);
        assert!((arrow.axis - sim.ball().velocity * 0.1).length() < 1e-5);
        assert!((arrow.tip() - (arrow.origin + arrow.axis)).length() < 1e-6);
    }
}

#[test]
fn test_trail_is_bounded() {
    let config = SceneConfig::default().with_trail(100, 0.0);
    let mut sim = Simulation::new(&config).unwrap();
    sim.run_headless(|_, _| {}).unwrap();

    assert_eq!(sim.trail().len(), 100);
    assert_eq!(sim.trail().latest(), Some(sim.ball().position));
}

#[test]
fn test_trail_spacing_thins_points() {
    let dense = {
        let mut sim = default_sim();
        sim.run_headless(|_, _| {}).unwrap();
        sim.trail().len()
    };
    let sparse = {
        let config = SceneConfig::default().with_trail(2000, 1.0);
        let mut sim = Simulation::new(&config).unwrap();
        sim.run_headless(|_, _| {}).unwrap();
        sim.trail().len()
    };
    assert!(sparse < dense / 4, "sparse = {}, dense = {}", sparse, dense);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_partial_json_keeps_defaults() {
    let json = r#"{
        "box_size": 20.0,
        "initial_velocity": [1.0, 2.0, 3.0],
        "duration": null
    }"#;
    let config = SceneConfig::from_json_str(json).unwrap();

    assert_eq!(config.box_size, 20.0);
    assert_eq!(config.initial_velocity, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(config.duration, None);
    assert_eq!(config.ball_radius, 0.5);
    assert_eq!(config.time_step, 0.005);
}

#[test]
fn test_json_rejects_invalid_scene() {
    let err = SceneConfig::from_json_str(r#"{ "time_step": -1.0 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::NonPositive("time_step")));

    let err = SceneConfig::from_json_str(r#"{ "ball_radius": 7.0 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::BallTooLarge { .. }));

    let err = SceneConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_save_and_load() {
    let path = std::env::temp_dir().join(format!("bouncebox-test-{}.json", std::process::id()));
    let config = SceneConfig::default()
        .with_box_size(9.0)
        .with_front_wall(true)
        .with_window_title("saved");

    config.save(&path).unwrap();
    let loaded = SceneConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, config);
}

#[test]
fn test_load_missing_file() {
    let err = SceneConfig::load("/definitely/not/here/scene.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
