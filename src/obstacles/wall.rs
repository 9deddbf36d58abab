//! One-sided infinite wall.

use nalgebra::Vector2;

use super::{require_finite_point, LocationHint, Obstacle};
use crate::error::BilliardError;
use crate::utils::constants::T_EPS;

/// Which side of the directed line from start to end faces the playing
/// region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exterior {
    Left,
    Right,
}

/// An infinite straight wall that reflects balls from one side only.
///
/// The wall is the full line through its two construction points; the
/// [`Exterior`] tag picks the half-plane balls bounce back into. A ball on
/// the interior side, or one that crosses from interior to exterior, is
/// never reflected.
#[derive(Debug, Clone, PartialEq)]
pub struct InfiniteWall {
    start: Vector2<f64>,
    end: Vector2<f64>,
    /// Unit normal pointing into the exterior half-plane.
    normal: Vector2<f64>,
}

impl InfiniteWall {
    /// Create a wall through two distinct points.
    pub fn new(
        start: Vector2<f64>,
        end: Vector2<f64>,
        exterior: Exterior,
    ) -> Result<Self, BilliardError> {
        require_finite_point(start, "wall start point")?;
        require_finite_point(end, "wall end point")?;

        let direction = end - start;
        if direction.norm_squared() == 0.0 {
            return Err(BilliardError::DegenerateLine(start.x, start.y));
        }

        // normal on the left of start -> end, flipped for a right exterior
        let mut normal = Vector2::new(-direction.y, direction.x) / direction.norm();
        if exterior == Exterior::Right {
            normal = -normal;
        }

        Ok(Self { start, end, normal })
    }

    pub fn start(&self) -> Vector2<f64> {
        self.start
    }

    pub fn end(&self) -> Vector2<f64> {
        self.end
    }

    /// Unit normal pointing into the exterior.
    pub fn normal(&self) -> Vector2<f64> {
        self.normal
    }
}

impl Obstacle for InfiniteWall {
    fn time_of_impact(
        &self,
        pos: Vector2<f64>,
        vel: Vector2<f64>,
        radius: f64,
    ) -> (f64, LocationHint) {
        // headway: closing speed, positive when the ball moves towards the
        // wall from the exterior side
        let headway = -vel.dot(&self.normal);
        if headway <= 0.0 {
            return (f64::INFINITY, LocationHint::None);
        }

        // gap between the ball's surface and the wall, negative once the
        // ball reaches into the wall
        let gap = (pos - self.start).dot(&self.normal) - radius;
        let t = gap / headway;
        if t < T_EPS {
            // already behind the wall: an interior ball, not an impact
            (f64::INFINITY, LocationHint::None)
        } else {
            (t.max(0.0), LocationHint::Headway(headway))
        }
    }

    fn collide(
        &self,
        _pos: Vector2<f64>,
        vel: Vector2<f64>,
        _radius: f64,
        hint: LocationHint,
    ) -> Vector2<f64> {
        let headway = match hint {
            LocationHint::Headway(headway) => headway,
            _ => -vel.dot(&self.normal),
        };
        vel + 2.0 * headway * self.normal
    }
}
