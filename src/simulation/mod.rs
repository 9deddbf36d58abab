//! The billiard table: ball storage, scheduling and evolution.
//!
//! [`Billiard`] owns the dense per-ball state arrays, the registered
//! obstacles and the time-of-impact caches, and advances from collision to
//! collision. Free flight between events is never integrated: each ball
//! stores its position at the last time its velocity changed, so the
//! current position is reconstructed in closed form and repeated partial
//! evolutions reproduce a single long one exactly.

mod evolve;
mod toi_table;

pub use evolve::{BallCallback, BallCallbacks, Partner};

use std::sync::Arc;

use nalgebra::Vector2;

use crate::error::{require_finite_point, BilliardError};
use crate::obstacles::ObstacleRef;
use crate::physics;
use toi_table::{BallBallTable, BallObstacleTable, ObstacleMin};

/// A billiard table with static obstacles and moving balls.
///
/// The plane is unbounded; geometry comes entirely from the obstacles
/// registered at construction. Balls are added with [`Billiard::add_ball`]
/// and the simulation advances with [`Billiard::evolve`]. All queries and
/// evolution are deterministic: the same initial state, obstacle list and
/// sequence of calls produce the same collisions and the same final state
/// on every run.
///
/// # Example
///
/// ```
/// use billiards::{Billiard, Exterior, InfiniteWall};
/// use nalgebra::Vector2;
/// use std::sync::Arc;
///
/// // vertical wall at x = 0, reflecting balls on its +x side
/// let wall = InfiniteWall::new(
///     Vector2::new(0.0, -1.0),
///     Vector2::new(0.0, 1.0),
///     Exterior::Right,
/// )
/// .unwrap();
///
/// let mut sim = Billiard::new(vec![Arc::new(wall)]);
/// sim.add_ball(Vector2::new(3.0, 0.0), Vector2::new(-1.0, 0.0), 1.0, 1.0)
///     .unwrap();
///
/// let (ball_ball, ball_obstacle) = sim.evolve(10.0).unwrap();
/// assert_eq!((ball_ball, ball_obstacle), (0, 1));
/// assert_eq!(sim.ball_position(0), Vector2::new(9.0, 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct Billiard {
    time: f64,
    balls_initial_time: Vec<f64>,
    balls_initial_position: Vec<Vector2<f64>>,
    balls_velocity: Vec<Vector2<f64>>,
    balls_radius: Vec<f64>,
    balls_mass: Vec<f64>,
    obstacles: Vec<ObstacleRef>,
    ball_ball_toi: BallBallTable,
    ball_obstacle_toi: BallObstacleTable,
    num_ball_ball: usize,
    num_ball_obstacle: usize,
}

impl Billiard {
    /// Create an empty table at time zero with the given obstacles.
    pub fn new(obstacles: Vec<ObstacleRef>) -> Self {
        Self {
            time: 0.0,
            balls_initial_time: Vec::new(),
            balls_initial_position: Vec::new(),
            balls_velocity: Vec::new(),
            balls_radius: Vec::new(),
            balls_mass: Vec::new(),
            obstacles,
            ball_ball_toi: BallBallTable::default(),
            ball_obstacle_toi: BallObstacleTable::default(),
            num_ball_ball: 0,
            num_ball_obstacle: 0,
        }
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of balls on the table.
    pub fn num_balls(&self) -> usize {
        self.balls_initial_time.len()
    }

    /// Per-ball time of the last velocity change.
    pub fn balls_initial_time(&self) -> &[f64] {
        &self.balls_initial_time
    }

    /// Per-ball position at the last velocity change.
    pub fn balls_initial_position(&self) -> &[Vector2<f64>] {
        &self.balls_initial_position
    }

    /// Per-ball velocity.
    pub fn balls_velocity(&self) -> &[Vector2<f64>] {
        &self.balls_velocity
    }

    /// Per-ball radius.
    pub fn balls_radius(&self) -> &[f64] {
        &self.balls_radius
    }

    /// Per-ball mass.
    pub fn balls_mass(&self) -> &[f64] {
        &self.balls_mass
    }

    /// Obstacles registered at construction.
    pub fn obstacles(&self) -> &[ObstacleRef] {
        &self.obstacles
    }

    /// Ball-ball collisions resolved over the simulation's lifetime.
    pub fn ball_ball_collisions(&self) -> usize {
        self.num_ball_ball
    }

    /// Ball-obstacle collisions resolved over the simulation's lifetime.
    pub fn ball_obstacle_collisions(&self) -> usize {
        self.num_ball_obstacle
    }

    /// Position of one ball at the current time.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not a valid ball index.
    pub fn ball_position(&self, idx: usize) -> Vector2<f64> {
        self.balls_initial_position[idx]
            + (self.time - self.balls_initial_time[idx]) * self.balls_velocity[idx]
    }

    /// Velocity of one ball.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not a valid ball index.
    pub fn ball_velocity(&self, idx: usize) -> Vector2<f64> {
        self.balls_velocity[idx]
    }

    /// Positions of all balls at the current time.
    pub fn ball_positions(&self) -> Vec<Vector2<f64>> {
        (0..self.num_balls()).map(|i| self.ball_position(i)).collect()
    }

    /// Add a ball and return its index.
    ///
    /// The ball starts at `pos` with velocity `vel` at the current
    /// simulation time. A zero radius makes a point particle (two point
    /// particles never collide); a zero mass makes a tracer that is
    /// deflected by other balls without pushing back; an infinite mass
    /// makes a ball no collision can deflect.
    pub fn add_ball(
        &mut self,
        pos: Vector2<f64>,
        vel: Vector2<f64>,
        radius: f64,
        mass: f64,
    ) -> Result<usize, BilliardError> {
        require_finite_point(pos, "ball position")?;
        require_finite_point(vel, "ball velocity")?;
        if !radius.is_finite() || radius < 0.0 {
            return Err(BilliardError::InvalidRadius(radius));
        }
        if mass.is_nan() || mass < 0.0 {
            return Err(BilliardError::InvalidMass(mass));
        }

        let idx = self.num_balls();
        self.balls_initial_time.push(self.time);
        self.balls_initial_position.push(pos);
        self.balls_velocity.push(vel);
        self.balls_radius.push(radius);
        self.balls_mass.push(mass);

        self.ball_ball_toi.grow();
        self.ball_obstacle_toi.grow(self.obstacles.len());
        self.repair_toi(&[idx]);

        Ok(idx)
    }

    /// Teleport a ball to a new position at the current time.
    ///
    /// Stale caches must be repaired with [`Billiard::recompute_toi`]
    /// before the next query or evolution.
    pub fn set_position(&mut self, idx: usize, pos: Vector2<f64>) -> Result<(), BilliardError> {
        self.check_ball(idx)?;
        require_finite_point(pos, "ball position")?;
        self.balls_initial_time[idx] = self.time;
        self.balls_initial_position[idx] = pos;
        Ok(())
    }

    /// Change a ball's velocity at the current time.
    ///
    /// The ball's position is materialised first so its trajectory stays
    /// continuous. Requires a [`Billiard::recompute_toi`] call afterwards.
    pub fn set_velocity(&mut self, idx: usize, vel: Vector2<f64>) -> Result<(), BilliardError> {
        self.check_ball(idx)?;
        require_finite_point(vel, "ball velocity")?;
        let pos = self.ball_position(idx);
        self.balls_initial_time[idx] = self.time;
        self.balls_initial_position[idx] = pos;
        self.balls_velocity[idx] = vel;
        Ok(())
    }

    /// Change a ball's radius. Requires a [`Billiard::recompute_toi`] call
    /// afterwards.
    pub fn set_radius(&mut self, idx: usize, radius: f64) -> Result<(), BilliardError> {
        self.check_ball(idx)?;
        if !radius.is_finite() || radius < 0.0 {
            return Err(BilliardError::InvalidRadius(radius));
        }
        self.balls_radius[idx] = radius;
        Ok(())
    }

    /// Change a ball's mass. Mass only enters the collision response, so no
    /// cache repair is needed.
    pub fn set_mass(&mut self, idx: usize, mass: f64) -> Result<(), BilliardError> {
        self.check_ball(idx)?;
        if mass.is_nan() || mass < 0.0 {
            return Err(BilliardError::InvalidMass(mass));
        }
        self.balls_mass[idx] = mass;
        Ok(())
    }

    /// Recompute the cached times of impact for the given balls.
    ///
    /// Must be called after mutating a ball's position, velocity or radius
    /// so the scheduler sees the edited state. Indices may repeat; each
    /// ball is repaired once.
    pub fn recompute_toi(&mut self, indices: &[usize]) -> Result<(), BilliardError> {
        for &idx in indices {
            self.check_ball(idx)?;
        }
        let mut touched = indices.to_vec();
        touched.sort_unstable();
        touched.dedup();
        self.repair_toi(&touched);
        Ok(())
    }

    /// Recompute the cached times of impact for every ball.
    pub fn recompute_all_toi(&mut self) {
        let all: Vec<usize> = (0..self.num_balls()).collect();
        self.repair_toi(&all);
    }

    /// Earliest upcoming ball-ball collision as `(time, Some((i, j)))` with
    /// `i < j`, or `(inf, None)` when no two balls ever meet.
    pub fn next_ball_ball_collision(&self) -> (f64, Option<(usize, usize)>) {
        self.ball_ball_toi.next_event()
    }

    /// Earliest upcoming ball-obstacle collision, `(inf, None)` if there is
    /// none.
    pub fn next_ball_obstacle_collision(&self) -> (f64, Option<(usize, ObstacleRef)>) {
        let (time, hit) = self.ball_obstacle_toi.next_event();
        let hit = hit.map(|(ball, min)| (ball, Arc::clone(&self.obstacles[min.obstacle])));
        (time, hit)
    }

    /// Earliest upcoming collision of either kind.
    ///
    /// Ball-ball collisions win ties against ball-obstacle collisions, so
    /// coincident events always resolve in the same order.
    pub fn next_collision(&self) -> (f64, Option<(usize, Partner)>) {
        let (bb_time, bb_pair) = self.ball_ball_toi.next_event();
        let (bo_time, bo_hit) = self.ball_obstacle_toi.next_event();
        if bb_time <= bo_time {
            (bb_time, bb_pair.map(|(i, j)| (i, Partner::Ball(j))))
        } else {
            let hit = bo_hit.map(|(ball, min)| {
                (ball, Partner::Obstacle(Arc::clone(&self.obstacles[min.obstacle])))
            });
            (bo_time, hit)
        }
    }

    fn check_ball(&self, index: usize) -> Result<(), BilliardError> {
        if index < self.num_balls() {
            Ok(())
        } else {
            Err(BilliardError::UnknownBall {
                index,
                count: self.num_balls(),
            })
        }
    }

    /// Absolute time of impact of two balls, computed from their current
    /// state.
    fn pair_toi(&self, i: usize, j: usize) -> f64 {
        self.time
            + physics::toi_ball_ball(
                self.ball_position(i),
                self.balls_velocity[i],
                self.balls_radius[i],
                self.ball_position(j),
                self.balls_velocity[j],
                self.balls_radius[j],
            )
    }

    /// Recompute the ball-obstacle row of one ball, caching the row minimum
    /// together with the winning obstacle's location hint.
    fn recompute_obstacle_row(&mut self, idx: usize) {
        let pos = self.ball_position(idx);
        let vel = self.balls_velocity[idx];
        let radius = self.balls_radius[idx];
        let now = self.time;

        let mut min = ObstacleMin::none();
        let row = self.ball_obstacle_toi.row_mut(idx);
        for (k, obstacle) in self.obstacles.iter().enumerate() {
            let (tau, hint) = obstacle.time_of_impact(pos, vel, radius);
            let time = now + tau;
            row[k] = time;
            if time < min.time {
                min = ObstacleMin {
                    time,
                    obstacle: k,
                    hint,
                };
            }
        }
        self.ball_obstacle_toi.set_min(idx, min);
    }

    /// Rewrite every cache row of the given balls and refresh the affected
    /// row minima. `touched` must be sorted and unique.
    fn repair_toi(&mut self, touched: &[usize]) {
        for &i in touched {
            for j in 0..self.num_balls() {
                if j == i || (j < i && touched.contains(&j)) {
                    // pair already rewritten when j's row was repaired
                    continue;
                }
                let time = self.pair_toi(i, j);
                self.ball_ball_toi.set_pair(i, j, time);
            }
            self.recompute_obstacle_row(i);
        }
        self.ball_ball_toi.refresh(touched);
    }
}

impl Default for Billiard {
    /// An empty table without obstacles.
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
