//! Deterministic, event-driven simulation of dynamical billiards.
//!
//! A finite set of hard disks moves in straight lines through the plane and
//! bounces elastically off each other and off static obstacles. Instead of
//! stepping time at a fixed rate, the engine jumps from collision to
//! collision: times of impact are solved in closed form, cached per ball
//! pair and per ball-obstacle pair, and the globally earliest event is
//! resolved next. Fast balls therefore never tunnel, and collision-free
//! stretches cost nothing regardless of their length.
//!
//! # Architecture
//!
//! - [`physics`] - closed-form time-of-impact solvers and the elastic
//!   two-body response
//! - [`obstacles`] - the [`Obstacle`] trait and the built-in [`Disk`],
//!   [`InfiniteWall`] and [`LineSegment`] shapes
//! - [`simulation`] - the [`Billiard`] table: ball storage, time-of-impact
//!   caches, the event loop and the edit API
//!
//! # Example
//!
//! ```
//! use billiards::Billiard;
//! use nalgebra::Vector2;
//!
//! let mut sim = Billiard::new(Vec::new());
//! sim.add_ball(Vector2::new(2.0, 0.0), Vector2::new(4.0, 0.0), 1.0, 1.0)
//!     .unwrap();
//!
//! sim.evolve(10.0).unwrap();
//! assert_eq!(sim.ball_position(0), Vector2::new(42.0, 0.0));
//! ```

pub mod error;
pub mod obstacles;
pub mod physics;
pub mod simulation;
pub mod utils;

pub use error::BilliardError;
pub use obstacles::{Disk, Exterior, InfiniteWall, LineSegment, LocationHint, Obstacle, ObstacleRef};
pub use simulation::{BallCallback, BallCallbacks, Billiard, Partner};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::BilliardError;
    pub use crate::obstacles::{
        Disk, Exterior, InfiniteWall, LineSegment, LocationHint, Obstacle, ObstacleRef,
    };
    pub use crate::simulation::{BallCallback, BallCallbacks, Billiard, Partner};
}
