//! Circular obstacle.

use nalgebra::Vector2;

use super::{require_finite_point, LocationHint, Obstacle};
use crate::error::BilliardError;
use crate::physics;

/// A circular obstacle whose exterior is everything at or beyond its rim.
///
/// One-sided like every obstacle: a ball released inside the disk (or
/// overlapping its rim) never collides with it, so a `Disk` blocks balls
/// out, not in.
#[derive(Debug, Clone, PartialEq)]
pub struct Disk {
    center: Vector2<f64>,
    radius: f64,
}

impl Disk {
    /// Create a disk with the given center and radius.
    ///
    /// The radius must be finite and strictly positive; a zero-radius disk
    /// would be a degenerate point obstacle.
    pub fn new(center: Vector2<f64>, radius: f64) -> Result<Self, BilliardError> {
        require_finite_point(center, "disk center")?;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(BilliardError::InvalidDiskRadius(radius));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Vector2<f64> {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Obstacle for Disk {
    fn time_of_impact(
        &self,
        pos: Vector2<f64>,
        vel: Vector2<f64>,
        radius: f64,
    ) -> (f64, LocationHint) {
        // A ball of radius r touching the rim is a point touching a circle
        // of radius R + r around the center.
        let t = physics::toi_ball_point(pos, vel, self.radius + radius, self.center);
        (t, LocationHint::None)
    }

    fn collide(
        &self,
        pos: Vector2<f64>,
        vel: Vector2<f64>,
        _radius: f64,
        _hint: LocationHint,
    ) -> Vector2<f64> {
        let offset = pos - self.center;
        physics::reflect(vel, offset / offset.norm())
    }
}
