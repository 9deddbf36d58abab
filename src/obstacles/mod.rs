//! Static obstacles on the billiard table.
//!
//! Obstacles are immutable geometric bodies with an exterior side; balls
//! collide only when approaching the exterior surface from outside. The
//! engine dispatches through the [`Obstacle`] trait and treats the
//! [`LocationHint`] produced by [`Obstacle::time_of_impact`] as an opaque
//! token that it hands back to [`Obstacle::collide`].

use std::fmt;
use std::sync::Arc;

use nalgebra::Vector2;

mod disk;
mod segment;
mod wall;

pub use disk::Disk;
pub use segment::LineSegment;
pub use wall::{Exterior, InfiniteWall};

pub(crate) use crate::error::require_finite_point;

/// Shared handle to an obstacle registered with a simulation.
pub type ObstacleRef = Arc<dyn Obstacle>;

/// Contact geometry forwarded from [`Obstacle::time_of_impact`] to
/// [`Obstacle::collide`].
///
/// Each obstacle chooses which variant it emits and how to interpret it;
/// the scheduler only stores and forwards the value so the response does
/// not have to re-solve geometry that the impact query already settled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationHint {
    /// Nothing worth forwarding.
    None,
    /// Closing speed towards a flat surface.
    Headway(f64),
    /// Contact on the flat part of a segment, with the line parameter.
    Face(f64),
    /// Contact with the cap around a segment's start point.
    StartCap,
    /// Contact with the cap around a segment's end point.
    EndCap,
}

/// A static obstacle a ball can bounce off.
///
/// Implementations must be one-sided: only approaches from the exterior
/// towards the exterior surface register, and a ball starting inside the
/// obstacle never collides with it. Both operations receive the ball's
/// radius so a single obstacle serves balls of any size.
pub trait Obstacle: fmt::Debug + Send + Sync {
    /// Time until a ball of the given radius at `pos` with velocity `vel`
    /// first touches the exterior surface, or `f64::INFINITY` if it never
    /// does. The returned hint is passed verbatim to [`Obstacle::collide`].
    fn time_of_impact(
        &self,
        pos: Vector2<f64>,
        vel: Vector2<f64>,
        radius: f64,
    ) -> (f64, LocationHint);

    /// Velocity after the impact. `pos` is the ball's center at the moment
    /// of contact; the caller advances the ball there first.
    fn collide(
        &self,
        pos: Vector2<f64>,
        vel: Vector2<f64>,
        radius: f64,
        hint: LocationHint,
    ) -> Vector2<f64>;
}
