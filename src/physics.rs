//! Collision detection and response for hard disks.
//!
//! Closed-form time-of-impact solvers for ball-ball, ball-point and
//! ball-segment encounters, plus the perfectly elastic two-body response.
//! All times are relative to the shared present of the input states and
//! `f64::INFINITY` means the pair never meets.

use nalgebra::Vector2;

use crate::utils::constants::{APPROACH_EPS, T_EPS};

/// Which part of a line segment a ball's path first meets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentContact {
    /// The flat face, at the given line parameter in `[0, 1]`.
    Face(f64),
    /// The face is missed but the start cap may still be hit.
    Start,
    /// The face is missed but the end cap may still be hit.
    End,
    /// Neither the face nor any cap can be hit.
    Miss,
}

/// Time of impact for two moving balls.
///
/// Returns the smallest non-negative root of `|dpos + t dvel|^2 = (r1 +
/// r2)^2`. Pairs that are separating, moving in parallel, or missing each
/// other never collide. Balls whose surfaces already overlap while
/// approaching collide immediately (time zero), so overlapping initial
/// conditions resolve as a chain of coincident events instead of silently
/// passing through each other.
pub fn toi_ball_ball(
    pos1: Vector2<f64>,
    vel1: Vector2<f64>,
    radius1: f64,
    pos2: Vector2<f64>,
    vel2: Vector2<f64>,
    radius2: f64,
) -> f64 {
    let dpos = pos2 - pos1;
    let dvel = vel2 - vel1;

    // Not moving towards each other; this also covers zero relative velocity
    let pos_dot_vel = dpos.dot(&dvel);
    if pos_dot_vel >= 0.0 {
        return f64::INFINITY;
    }

    let radius_sum = radius1 + radius2;
    let c = dpos.norm_squared() - radius_sum * radius_sum;
    if c < 0.0 {
        // approaching while the surfaces already overlap
        return 0.0;
    }

    // Roots of the quadratic a t^2 + 2 b t + c with a = |dvel|^2 and
    // b = pos_dot_vel. No real root means the balls miss, a double root
    // means they graze without touching.
    let discriminant = pos_dot_vel * pos_dot_vel - dvel.norm_squared() * c;
    if discriminant <= 0.0 {
        return f64::INFINITY;
    }

    // The smaller root (-b - sqrt(D)) / a cancels catastrophically for
    // grazing impacts; since t1 t2 = c / a, divide c by the larger root
    // instead. With c >= 0 and -b > 0 the result is never negative.
    c / (-pos_dot_vel + discriminant.sqrt())
}

/// Time of impact for a moving ball and a static point.
///
/// One-sided: a point already inside the ball yields no impact, so obstacles
/// built from point tests never capture balls that start out of bounds.
/// Times in `[T_EPS, 0)` count as immediate, absorbing the rounding drift
/// of a ball resting exactly on the surface it just left.
pub fn toi_ball_point(
    pos: Vector2<f64>,
    vel: Vector2<f64>,
    radius: f64,
    point: Vector2<f64>,
) -> f64 {
    let dpos = pos - point;

    let pos_dot_vel = dpos.dot(&vel);
    if pos_dot_vel >= 0.0 {
        return f64::INFINITY;
    }

    let c = dpos.norm_squared() - radius * radius;
    let discriminant = pos_dot_vel * pos_dot_vel - vel.norm_squared() * c;
    if discriminant <= 0.0 {
        return f64::INFINITY;
    }

    let t = c / (-pos_dot_vel + discriminant.sqrt());
    if t >= T_EPS {
        t.max(0.0)
    } else {
        f64::INFINITY
    }
}

/// Time of impact for a moving ball and the face of a line segment.
///
/// The segment runs from `start` to `start + direction` and is described by
/// its precomputed `covector` (`direction / |direction|^2`, mapping offsets
/// to line parameters) and unit `normal`. Returns the impact time together
/// with the [`SegmentContact`] region; when the face cannot be hit the
/// region tells the caller which end cap, if any, remains a candidate for a
/// [`toi_ball_point`] test.
pub fn toi_ball_segment(
    pos: Vector2<f64>,
    vel: Vector2<f64>,
    radius: f64,
    start: Vector2<f64>,
    covector: Vector2<f64>,
    normal: Vector2<f64>,
) -> (f64, SegmentContact) {
    // Shift the ball slightly into the past so contacts within T_EPS of now
    // register; the shift is corrected before returning.
    let dpos = pos - start + T_EPS * vel;
    let dpos_line = covector.dot(&dpos);
    let dpos_normal = normal.dot(&dpos);

    // Closer to the carrier line than one radius: the face cannot be hit
    // head-on, only an end cap (or the ball already overlaps the segment).
    if dpos_normal.abs() <= radius {
        return if dpos_line < 0.0 {
            (f64::INFINITY, SegmentContact::Start)
        } else if dpos_line > 1.0 {
            (f64::INFINITY, SegmentContact::End)
        } else {
            (f64::INFINITY, SegmentContact::Miss)
        };
    }

    let vel_normal = normal.dot(&vel);
    if vel_normal == 0.0 {
        // moving parallel to the line at more than one radius distance
        return (f64::INFINITY, SegmentContact::Miss);
    }

    // Time at which the distance to the carrier line equals the radius
    let offset = if dpos_normal > 0.0 { -radius } else { radius };
    let t = -(dpos_normal + offset) / vel_normal;
    if t < 0.0 {
        return (f64::INFINITY, SegmentContact::Miss);
    }

    // Line parameter of the contact point; outside [0, 1] the ball passes
    // the carrier line beyond an endpoint and may still hit that cap.
    let u = dpos_line + t * covector.dot(&vel);
    if (0.0..=1.0).contains(&u) {
        ((t + T_EPS).max(0.0), SegmentContact::Face(u))
    } else if u < 0.0 {
        (f64::INFINITY, SegmentContact::Start)
    } else {
        (f64::INFINITY, SegmentContact::End)
    }
}

/// Reflect a velocity about a surface with the given unit normal.
pub fn reflect(vel: Vector2<f64>, normal: Vector2<f64>) -> Vector2<f64> {
    vel - 2.0 * vel.dot(&normal) * normal
}

/// Velocities after a perfectly elastic collision of two balls in contact.
///
/// Momentum and kinetic energy are conserved for finite positive masses.
/// The degenerate mass combinations take their physical limits:
///
/// - one infinite mass: the immovable ball keeps its velocity, the other is
///   reflected off it,
/// - two infinite masses: both keep their velocity,
/// - a massless ball is a tracer: it is reflected without disturbing its
///   partner (the natural `m -> 0` limit of the update),
/// - two massless balls are both reflected.
///
/// The balls must be approaching each other; the caller resolves collisions
/// exactly at contact where this holds by construction.
pub fn elastic_collision(
    pos1: Vector2<f64>,
    vel1: Vector2<f64>,
    mass1: f64,
    pos2: Vector2<f64>,
    vel2: Vector2<f64>,
    mass2: f64,
) -> (Vector2<f64>, Vector2<f64>) {
    let dpos = pos2 - pos1;
    let dvel = vel2 - vel1;

    let pos_dot_vel = dpos.dot(&dvel);
    debug_assert!(
        pos_dot_vel <= APPROACH_EPS,
        "balls are not approaching: <dpos, dvel> = {pos_dot_vel}"
    );

    // Degenerate masses collapse onto effective weights for the update rule
    let (weight1, weight2) = if mass1.is_infinite() {
        if mass2.is_infinite() {
            return (vel1, vel2);
        }
        (1.0, 0.0)
    } else if mass2.is_infinite() {
        (0.0, 1.0)
    } else if mass1 == 0.0 && mass2 == 0.0 {
        // two tracers reflect off each other
        let normal = dpos / dpos.norm();
        let closing = dvel.dot(&normal);
        return (vel1 + 2.0 * closing * normal, vel2 - 2.0 * closing * normal);
    } else {
        (mass1, mass2)
    };

    let impulse = 2.0 * pos_dot_vel / ((weight1 + weight2) * dpos.norm_squared()) * dpos;
    (vel1 + weight2 * impulse, vel2 - weight1 * impulse)
}
