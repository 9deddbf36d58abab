//! Numerical tolerances for collision detection and response.

/// Cutoff below which a computed time of impact is discarded.
///
/// Ideally the cutoff would be zero: a negative impact time means the
/// contact lies in the past. But a ball that just bounced can sit a rounding
/// error inside the surface it left and report a slightly negative time on
/// the very next query, and discarding that contact would let the ball
/// tunnel through. Times in `[T_EPS, 0)` are therefore treated as impacts
/// happening right now; only times below `T_EPS` count as already elapsed.
pub const T_EPS: f64 = -1e-10;

/// Largest value of `<p2 - p1, v2 - v1>` two balls may have while still
/// counting as approaching each other at the moment of contact.
///
/// The elastic response is only defined for approaching bodies; the slack
/// above exact zero absorbs rounding in the scalar product.
pub const APPROACH_EPS: f64 = 1e-15;
