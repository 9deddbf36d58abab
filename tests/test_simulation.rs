//! Simulation API tests: ball management, queries, edits and evolution
//! bookkeeping.

use approx::assert_relative_eq;
use billiards::{Billiard, BilliardError};
use nalgebra::Vector2;

fn vec2(x: f64, y: f64) -> Vector2<f64> {
    Vector2::new(x, y)
}

#[test]
fn test_ball_indices_are_dense() {
    let mut sim = Billiard::new(Vec::new());
    for i in 0..10 {
        let idx = sim
            .add_ball(vec2(i as f64, 0.0), vec2(0.0, i as f64), 0.0, 1.0)
            .unwrap();
        assert_eq!(idx, i);
    }
    assert_eq!(sim.num_balls(), 10);

    for idx in 0..10 {
        assert_eq!(sim.balls_initial_position()[idx].x, idx as f64);
        assert_eq!(sim.balls_velocity()[idx].y, idx as f64);
    }
}

#[test]
fn test_add_ball_validation() {
    let mut sim = Billiard::new(Vec::new());

    assert!(matches!(
        sim.add_ball(vec2(f64::NAN, 0.0), vec2(0.0, 0.0), 0.0, 1.0),
        Err(BilliardError::NonFinite { .. })
    ));
    assert!(matches!(
        sim.add_ball(vec2(0.0, 0.0), vec2(f64::INFINITY, 0.0), 0.0, 1.0),
        Err(BilliardError::NonFinite { .. })
    ));
    assert!(matches!(
        sim.add_ball(vec2(0.0, 0.0), vec2(0.0, 0.0), -1.0, 1.0),
        Err(BilliardError::InvalidRadius(_))
    ));
    assert!(matches!(
        sim.add_ball(vec2(0.0, 0.0), vec2(0.0, 0.0), f64::INFINITY, 1.0),
        Err(BilliardError::InvalidRadius(_))
    ));
    assert!(matches!(
        sim.add_ball(vec2(0.0, 0.0), vec2(0.0, 0.0), 0.0, -1.0),
        Err(BilliardError::InvalidMass(_))
    ));
    assert!(matches!(
        sim.add_ball(vec2(0.0, 0.0), vec2(0.0, 0.0), 0.0, f64::NAN),
        Err(BilliardError::InvalidMass(_))
    ));

    // infinite mass and zero mass are both legal
    assert!(sim
        .add_ball(vec2(0.0, 0.0), vec2(0.0, 0.0), 1.0, f64::INFINITY)
        .is_ok());
    assert!(sim.add_ball(vec2(5.0, 0.0), vec2(0.0, 0.0), 1.0, 0.0).is_ok());

    // failed insertions must not have grown the state
    assert_eq!(sim.num_balls(), 2);
}

#[test]
fn test_free_flight() {
    let mut sim = Billiard::new(Vec::new());
    sim.add_ball(vec2(2.0, 0.0), vec2(4.0, 0.0), 1.0, 1.0).unwrap();

    let counts = sim.evolve(10.0).unwrap();
    assert_eq!(counts, (0, 0));
    assert_eq!(sim.time(), 10.0);
    assert_eq!(sim.ball_position(0), vec2(42.0, 0.0));
    assert_eq!(sim.ball_velocity(0), vec2(4.0, 0.0));
}

#[test]
fn test_no_event_evolution_leaves_ball_state_untouched() {
    let mut sim = Billiard::new(Vec::new());
    sim.add_ball(vec2(1.0, 2.0), vec2(3.0, -4.0), 0.5, 1.0).unwrap();

    let (time, next) = sim.next_collision();
    assert_eq!(time, f64::INFINITY);
    assert!(next.is_none());

    sim.evolve(7.0).unwrap();
    assert_eq!(sim.time(), 7.0);

    // the clock moved but the stored anchor state did not
    assert_eq!(sim.balls_initial_time()[0], 0.0);
    assert_eq!(sim.balls_initial_position()[0], vec2(1.0, 2.0));
    assert_eq!(sim.balls_velocity()[0], vec2(3.0, -4.0));
}

#[test]
fn test_evolve_argument_validation() {
    let mut sim = Billiard::new(Vec::new());
    sim.evolve(5.0).unwrap();

    assert!(matches!(
        sim.evolve(f64::NAN),
        Err(BilliardError::NonFinite { .. })
    ));
    assert!(matches!(
        sim.evolve(f64::INFINITY),
        Err(BilliardError::NonFinite { .. })
    ));
    assert!(matches!(
        sim.evolve(4.0),
        Err(BilliardError::TimeReversal { .. })
    ));

    // evolving to the current time is a no-op, not a reversal
    assert_eq!(sim.evolve(5.0).unwrap(), (0, 0));
}

#[test]
fn test_queries_on_empty_table() {
    let sim = Billiard::new(Vec::new());

    let (time, pair) = sim.next_ball_ball_collision();
    assert_eq!(time, f64::INFINITY);
    assert!(pair.is_none());

    let (time, hit) = sim.next_ball_obstacle_collision();
    assert_eq!(time, f64::INFINITY);
    assert!(hit.is_none());

    let (time, next) = sim.next_collision();
    assert_eq!(time, f64::INFINITY);
    assert!(next.is_none());
}

#[test]
fn test_two_body_head_on() {
    let mut sim = Billiard::new(Vec::new());
    sim.add_ball(vec2(2.0, 0.0), vec2(4.0, 0.0), 1.0, 1.0).unwrap();
    sim.add_ball(vec2(50.0, 108.0), vec2(0.0, -9.0), 1.0, 2.0).unwrap();

    let (time, pair) = sim.next_ball_ball_collision();
    assert_eq!(pair, Some((0, 1)));
    assert_relative_eq!(time, 11.79693, max_relative = 1e-6);

    let counts = sim.evolve(14.0).unwrap();
    assert_eq!(counts, (1, 0));

    // the pair is on a perfect head-on course, so the post-impact
    // velocities are exact fractions
    let v0 = sim.ball_velocity(0);
    let v1 = sim.ball_velocity(1);
    assert_relative_eq!(v0.x, -4.0 / 3.0, max_relative = 1e-9);
    assert_relative_eq!(v0.y, -12.0, max_relative = 1e-9);
    assert_relative_eq!(v1.x, 8.0 / 3.0, max_relative = 1e-9);
    assert_relative_eq!(v1.y, -3.0, max_relative = 1e-9);

    let p0 = sim.ball_position(0);
    let p1 = sim.ball_position(1);
    assert_relative_eq!(p0.x, 46.25029742, max_relative = 1e-7);
    assert_relative_eq!(p0.y, -26.4368308, max_relative = 1e-7);
    assert_relative_eq!(p1.x, 55.87485129, max_relative = 1e-7);
    assert_relative_eq!(p1.y, -4.7815846, max_relative = 1e-7);
}

#[test]
fn test_set_velocity_keeps_trajectory_continuous() {
    let mut sim = Billiard::new(Vec::new());
    sim.add_ball(vec2(0.0, 0.0), vec2(1.0, 0.0), 0.0, 1.0).unwrap();
    sim.evolve(3.0).unwrap();

    sim.set_velocity(0, vec2(0.0, 2.0)).unwrap();
    sim.recompute_toi(&[0]).unwrap();

    // the rebased anchor sits where the ball was when the velocity changed
    assert_eq!(sim.balls_initial_time()[0], 3.0);
    assert_eq!(sim.balls_initial_position()[0], vec2(3.0, 0.0));

    sim.evolve(5.0).unwrap();
    assert_eq!(sim.ball_position(0), vec2(3.0, 4.0));
}

#[test]
fn test_edit_reschedules_collisions() {
    let mut sim = Billiard::new(Vec::new());
    sim.add_ball(vec2(0.0, 0.0), vec2(1.0, 0.0), 1.0, 1.0).unwrap();
    sim.add_ball(vec2(10.0, 0.0), vec2(0.0, 0.0), 1.0, 1.0).unwrap();

    let (time, _) = sim.next_ball_ball_collision();
    assert_relative_eq!(time, 8.0);

    // move the target out of the way; the collision disappears
    sim.set_position(1, vec2(10.0, 10.0)).unwrap();
    sim.recompute_toi(&[1]).unwrap();
    let (time, pair) = sim.next_ball_ball_collision();
    assert_eq!(time, f64::INFINITY);
    assert!(pair.is_none());

    // aim it back at the first ball; a new collision appears
    sim.set_position(1, vec2(5.0, 0.0)).unwrap();
    sim.recompute_toi(&[1]).unwrap();
    let (time, pair) = sim.next_ball_ball_collision();
    assert_relative_eq!(time, 3.0);
    assert_eq!(pair, Some((0, 1)));
}

#[test]
fn test_edit_validation() {
    let mut sim = Billiard::new(Vec::new());
    sim.add_ball(vec2(0.0, 0.0), vec2(0.0, 0.0), 0.0, 1.0).unwrap();

    assert!(matches!(
        sim.set_position(3, vec2(0.0, 0.0)),
        Err(BilliardError::UnknownBall { index: 3, count: 1 })
    ));
    assert!(matches!(
        sim.set_velocity(0, vec2(f64::NAN, 0.0)),
        Err(BilliardError::NonFinite { .. })
    ));
    assert!(matches!(
        sim.set_radius(0, -0.5),
        Err(BilliardError::InvalidRadius(_))
    ));
    assert!(matches!(
        sim.set_mass(0, -2.0),
        Err(BilliardError::InvalidMass(_))
    ));
    assert!(matches!(
        sim.recompute_toi(&[0, 7]),
        Err(BilliardError::UnknownBall { index: 7, count: 1 })
    ));
}

#[test]
fn test_set_radius_changes_contact_distance() {
    let mut sim = Billiard::new(Vec::new());
    sim.add_ball(vec2(0.0, 0.0), vec2(1.0, 0.0), 1.0, 1.0).unwrap();
    sim.add_ball(vec2(10.0, 0.0), vec2(0.0, 0.0), 1.0, 1.0).unwrap();

    sim.set_radius(1, 3.0).unwrap();
    sim.recompute_toi(&[1]).unwrap();

    let (time, _) = sim.next_ball_ball_collision();
    assert_relative_eq!(time, 6.0);
}

#[test]
fn test_lifetime_collision_counters() {
    let mut sim = Billiard::new(Vec::new());
    sim.add_ball(vec2(0.0, 0.0), vec2(1.0, 0.0), 1.0, 1.0).unwrap();
    sim.add_ball(vec2(10.0, 0.0), vec2(-1.0, 0.0), 1.0, 1.0).unwrap();

    let counts = sim.evolve(10.0).unwrap();
    assert_eq!(counts, (1, 0));
    assert_eq!(sim.ball_ball_collisions(), 1);
    assert_eq!(sim.ball_obstacle_collisions(), 0);

    // later calls keep accumulating into the lifetime totals
    let counts = sim.evolve(20.0).unwrap();
    assert_eq!(counts, (0, 0));
    assert_eq!(sim.ball_ball_collisions(), 1);
}

#[test]
fn test_resume_equivalence_two_body() {
    let setup = || {
        let mut sim = Billiard::new(Vec::new());
        sim.add_ball(vec2(2.0, 0.0), vec2(4.0, 0.0), 1.0, 1.0).unwrap();
        sim.add_ball(vec2(50.0, 108.0), vec2(0.0, -9.0), 1.0, 2.0).unwrap();
        sim
    };

    let mut single = setup();
    single.evolve(14.0).unwrap();

    let mut resumed = setup();
    for step in 1..=14 {
        resumed.evolve(step as f64).unwrap();
    }

    assert_eq!(single.balls_initial_time(), resumed.balls_initial_time());
    assert_eq!(
        single.balls_initial_position(),
        resumed.balls_initial_position()
    );
    assert_eq!(single.balls_velocity(), resumed.balls_velocity());
}
