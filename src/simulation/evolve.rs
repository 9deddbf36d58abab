//! Event loop: select, apply and re-schedule collisions.

use std::collections::HashMap;
use std::sync::Arc;

use nalgebra::Vector2;

use super::Billiard;
use crate::error::BilliardError;
use crate::obstacles::ObstacleRef;
use crate::physics;

use super::toi_table::ObstacleMin;

/// The other party of a collision, as reported to ball callbacks.
#[derive(Debug, Clone)]
pub enum Partner {
    /// The other ball's index.
    Ball(usize),
    /// The obstacle that was hit.
    Obstacle(ObstacleRef),
}

impl PartialEq for Partner {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Partner::Ball(a), Partner::Ball(b)) => a == b,
            (Partner::Obstacle(a), Partner::Obstacle(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Callback fired for a participating ball at each resolved collision.
///
/// Receives the event time, the ball's position at contact, its velocity
/// before and after the impact, and the collision partner.
pub type BallCallback<'a> =
    Box<dyn FnMut(f64, Vector2<f64>, Vector2<f64>, Vector2<f64>, &Partner) + 'a>;

/// Per-ball callbacks keyed by ball index.
pub type BallCallbacks<'a> = HashMap<usize, BallCallback<'a>>;

/// The event the scheduler would resolve next.
enum PendingEvent {
    BallBall(usize, usize),
    BallObstacle(usize, ObstacleMin),
}

impl Billiard {
    /// Advance the simulation until the given time.
    ///
    /// Collisions at or before `end_time` are resolved in order; afterwards
    /// the clock reads `end_time` and every ball is in free flight. Returns
    /// the number of ball-ball and ball-obstacle collisions resolved by
    /// this call.
    ///
    /// `end_time` must be finite and not before the current time.
    pub fn evolve(&mut self, end_time: f64) -> Result<(usize, usize), BilliardError> {
        self.evolve_with(end_time, None, &mut BallCallbacks::new())
    }

    /// Advance the simulation until the given time, reporting collisions.
    ///
    /// `time_callback` fires once per resolved collision with the event
    /// time; afterwards each participating ball with an entry in
    /// `ball_callbacks` fires, in ascending ball index order.
    pub fn evolve_with(
        &mut self,
        end_time: f64,
        mut time_callback: Option<&mut dyn FnMut(f64)>,
        ball_callbacks: &mut BallCallbacks<'_>,
    ) -> Result<(usize, usize), BilliardError> {
        if !end_time.is_finite() {
            return Err(BilliardError::NonFinite {
                quantity: "end_time",
            });
        }
        if end_time < self.time {
            return Err(BilliardError::TimeReversal {
                time: self.time,
                end_time,
            });
        }

        let mut ball_ball = 0;
        let mut ball_obstacle = 0;
        while let Some(event) = self.peek_next(end_time) {
            match event {
                PendingEvent::BallBall(i, j) => {
                    self.bounce_ball_ball(i, j, &mut time_callback, ball_callbacks);
                    ball_ball += 1;
                }
                PendingEvent::BallObstacle(i, min) => {
                    self.bounce_ball_obstacle(i, min, &mut time_callback, ball_callbacks);
                    ball_obstacle += 1;
                }
            }
        }

        // No event left before end_time: only the clock moves, stored ball
        // states stay untouched so resumed evolutions replay bit for bit.
        self.time = end_time;
        Ok((ball_ball, ball_obstacle))
    }

    /// Next event at or before `end_time`, ball-ball winning ties.
    fn peek_next(&self, end_time: f64) -> Option<PendingEvent> {
        let (bb_time, bb_pair) = self.ball_ball_toi.next_event();
        let (bo_time, bo_hit) = self.ball_obstacle_toi.next_event();

        if bb_time <= bo_time {
            let (i, j) = bb_pair?;
            (bb_time <= end_time).then_some(PendingEvent::BallBall(i, j))
        } else {
            let (i, min) = bo_hit?;
            (bo_time <= end_time).then_some(PendingEvent::BallObstacle(i, min))
        }
    }

    /// Move a ball's stored state to the given time without changing its
    /// velocity.
    fn advance_ball(&mut self, idx: usize, time: f64) {
        let dt = time - self.balls_initial_time[idx];
        self.balls_initial_position[idx] += dt * self.balls_velocity[idx];
        self.balls_initial_time[idx] = time;
    }

    fn bounce_ball_ball(
        &mut self,
        i: usize,
        j: usize,
        time_callback: &mut Option<&mut dyn FnMut(f64)>,
        ball_callbacks: &mut BallCallbacks<'_>,
    ) {
        let time = self.ball_ball_toi.pair(i, j);
        self.advance_ball(i, time);
        self.advance_ball(j, time);
        self.time = time;

        let (pos1, pos2) = (self.balls_initial_position[i], self.balls_initial_position[j]);
        let (vel1, vel2) = (self.balls_velocity[i], self.balls_velocity[j]);
        let (new1, new2) = physics::elastic_collision(
            pos1,
            vel1,
            self.balls_mass[i],
            pos2,
            vel2,
            self.balls_mass[j],
        );
        self.balls_velocity[i] = new1;
        self.balls_velocity[j] = new2;
        self.num_ball_ball += 1;

        if let Some(callback) = time_callback {
            callback(time);
        }
        // i < j, so callbacks fire in ascending ball order
        if let Some(callback) = ball_callbacks.get_mut(&i) {
            callback(time, pos1, vel1, new1, &Partner::Ball(j));
        }
        if let Some(callback) = ball_callbacks.get_mut(&j) {
            callback(time, pos2, vel2, new2, &Partner::Ball(i));
        }

        self.repair_toi(&[i, j]);
    }

    fn bounce_ball_obstacle(
        &mut self,
        i: usize,
        min: ObstacleMin,
        time_callback: &mut Option<&mut dyn FnMut(f64)>,
        ball_callbacks: &mut BallCallbacks<'_>,
    ) {
        let time = min.time;
        self.advance_ball(i, time);
        self.time = time;

        let obstacle = Arc::clone(&self.obstacles[min.obstacle]);
        let pos = self.balls_initial_position[i];
        let vel = self.balls_velocity[i];
        let new = obstacle.collide(pos, vel, self.balls_radius[i], min.hint);
        self.balls_velocity[i] = new;
        self.num_ball_obstacle += 1;

        if let Some(callback) = time_callback {
            callback(time);
        }
        if let Some(callback) = ball_callbacks.get_mut(&i) {
            callback(time, pos, vel, new, &Partner::Obstacle(obstacle));
        }

        self.repair_toi(&[i]);
    }
}
