//! Line segment with rounded end caps.

use nalgebra::Vector2;

use super::{require_finite_point, LocationHint, Obstacle};
use crate::error::BilliardError;
use crate::physics::{self, SegmentContact};

/// A finite line segment that reflects balls hitting either flat side or
/// one of its end points.
///
/// The segment has zero thickness, so its exterior is the whole plane and
/// both faces are reflective; the end points act as caps with the contact
/// normal of a point.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    start: Vector2<f64>,
    end: Vector2<f64>,
    /// Direction divided by its squared length; maps offsets from `start`
    /// to line parameters in `[0, 1]`.
    covector: Vector2<f64>,
    /// Unit normal of the carrier line.
    normal: Vector2<f64>,
}

impl LineSegment {
    /// Create a segment between two distinct points.
    pub fn new(start: Vector2<f64>, end: Vector2<f64>) -> Result<Self, BilliardError> {
        require_finite_point(start, "segment start point")?;
        require_finite_point(end, "segment end point")?;

        let direction = end - start;
        let length_sqrd = direction.norm_squared();
        if length_sqrd == 0.0 {
            return Err(BilliardError::DegenerateLine(start.x, start.y));
        }

        Ok(Self {
            start,
            end,
            covector: direction / length_sqrd,
            normal: Vector2::new(-direction.y, direction.x) / length_sqrd.sqrt(),
        })
    }

    pub fn start(&self) -> Vector2<f64> {
        self.start
    }

    pub fn end(&self) -> Vector2<f64> {
        self.end
    }
}

impl Obstacle for LineSegment {
    fn time_of_impact(
        &self,
        pos: Vector2<f64>,
        vel: Vector2<f64>,
        radius: f64,
    ) -> (f64, LocationHint) {
        let (t, contact) =
            physics::toi_ball_segment(pos, vel, radius, self.start, self.covector, self.normal);
        match contact {
            SegmentContact::Face(u) => (t, LocationHint::Face(u)),
            SegmentContact::Start => (
                physics::toi_ball_point(pos, vel, radius, self.start),
                LocationHint::StartCap,
            ),
            SegmentContact::End => (
                physics::toi_ball_point(pos, vel, radius, self.end),
                LocationHint::EndCap,
            ),
            SegmentContact::Miss => (f64::INFINITY, LocationHint::None),
        }
    }

    fn collide(
        &self,
        pos: Vector2<f64>,
        vel: Vector2<f64>,
        _radius: f64,
        hint: LocationHint,
    ) -> Vector2<f64> {
        match hint {
            LocationHint::StartCap => {
                let offset = pos - self.start;
                physics::reflect(vel, offset / offset.norm())
            }
            LocationHint::EndCap => {
                let offset = pos - self.end;
                physics::reflect(vel, offset / offset.norm())
            }
            // face contact from either side
            _ => physics::reflect(vel, self.normal),
        }
    }
}
