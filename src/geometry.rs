//! Geometry kernel.
//!
//! Pure functions over points and circles:
//! - Euclidean distance and point-in-circle tests
//! - Line ∩ circle (movement ray against a base perimeter)
//! - Circle ∩ circle (area-of-effect overlap, interception)
//!
//! Nothing here holds state, so every function can be called from any thread.
//! Intersections that do not exist come back as `Ok(None)`; only inputs with
//! no well-defined answer produce a [`GeometryError`].

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, GeometryResult};

/// Relative tolerance under which a discriminant counts as zero (tangency).
const TANGENT_EPSILON: f64 = 1e-12;

/// Relative distance under which two circle centres are treated as equal.
const CONCENTRIC_EPSILON: f64 = 1e-12;

/// A point (or displacement) in arena coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Length of this point read as a vector.
    #[must_use]
    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Dot product with another vector.
    #[must_use]
    #[inline]
    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// True if both coordinates are finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// A circle: a base perimeter or the reach of an ability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Centre of the circle.
    pub center: Point,
    /// Radius, non-negative.
    pub radius: f64,
}

impl Circle {
    /// Create a new circle.
    #[must_use]
    pub const fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// True if `point` lies inside or on the circle.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        is_inside(*self, point)
    }

    fn validated(self) -> GeometryResult<Self> {
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(GeometryError::InvalidRadius(self.radius));
        }
        if !self.center.is_finite() {
            return Err(GeometryError::NonFinitePoint);
        }
        Ok(self)
    }
}

/// Candidate points where a line or a circle crosses a circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crossing {
    /// No common point.
    Miss,
    /// Exactly one common point.
    Tangent(Point),
    /// Two distinct common points.
    Secant(Point, Point),
}

impl Crossing {
    /// The candidate closest to `target`.
    ///
    /// On an exact tie the second candidate wins.
    #[must_use]
    pub fn nearest_to(self, target: Point) -> Option<Point> {
        match self {
            Crossing::Miss => None,
            Crossing::Tangent(point) => Some(point),
            Crossing::Secant(first, second) => {
                if target.distance(first) < target.distance(second) {
                    Some(first)
                } else {
                    Some(second)
                }
            }
        }
    }

    /// The first candidate reached when travelling from `origin` along
    /// `direction`. Candidates behind the origin are ignored.
    #[must_use]
    pub fn first_along(self, origin: Point, direction: Point) -> Option<Point> {
        self.points()
            .filter(|point| (*point - origin).dot(direction) >= 0.0)
            .min_by(|a, b| origin.distance(*a).total_cmp(&origin.distance(*b)))
    }

    /// Iterate over the candidates (zero, one or two points).
    pub fn points(self) -> impl Iterator<Item = Point> {
        let (first, second) = match self {
            Crossing::Miss => (None, None),
            Crossing::Tangent(point) => (Some(point), None),
            Crossing::Secant(first, second) => (Some(first), Some(second)),
        };
        first.into_iter().chain(second)
    }

    /// True if there is no common point.
    #[must_use]
    pub const fn is_miss(self) -> bool {
        matches!(self, Crossing::Miss)
    }
}

/// Euclidean distance between two points.
///
/// Uses `hypot`, so coordinates in the tens of thousands neither overflow
/// nor lose precision when squared.
#[must_use]
pub fn distance(p: Point, q: Point) -> f64 {
    p.distance(q)
}

/// True iff `point` lies inside or on `circle`.
///
/// Compares squared distances; no square root is taken.
#[must_use]
pub fn is_inside(circle: Circle, point: Point) -> bool {
    let dx = circle.center.x - point.x;
    let dy = circle.center.y - point.y;
    dx * dx + dy * dy <= circle.radius * circle.radius
}

/// Square root of a discriminant, or `None` when it is negative or NaN.
///
/// Values within `TANGENT_EPSILON * scale` of zero are snapped to zero so a
/// tangent computed in floating point reports one point instead of missing.
fn discriminant_root(delta: f64, scale: f64) -> Option<f64> {
    if delta.is_nan() {
        return None;
    }
    let tolerance = TANGENT_EPSILON * scale.abs();
    if delta < -tolerance {
        None
    } else if delta <= tolerance {
        Some(0.0)
    } else {
        Some(delta.sqrt())
    }
}

#[allow(clippy::float_cmp)]
fn is_vertical(origin: Point, dest: Point) -> bool {
    origin.x == dest.x
}

/// Both points where the infinite line through `origin` and `dest` crosses
/// `circle`.
///
/// # Errors
///
/// Returns an error if either point is non-finite, the radius is invalid, or
/// `origin` and `dest` are too close (or too far apart) to give a usable
/// direction.
pub fn line_circle_crossing(origin: Point, dest: Point, circle: Circle) -> GeometryResult<Crossing> {
    let circle = circle.validated()?;
    if !origin.is_finite() || !dest.is_finite() {
        return Err(GeometryError::NonFinitePoint);
    }
    if origin == dest {
        return Err(GeometryError::DegenerateLine);
    }

    let r_sq = circle.radius * circle.radius;

    // x = origin.x, solve for y directly
    if is_vertical(origin, dest) {
        let dx = origin.x - circle.center.x;
        let Some(root) = discriminant_root(r_sq - dx * dx, r_sq) else {
            return Ok(Crossing::Miss);
        };
        let upper = Point::new(origin.x, circle.center.y + root);
        if root == 0.0 {
            return Ok(Crossing::Tangent(upper));
        }
        let lower = Point::new(origin.x, circle.center.y - root);
        return Ok(Crossing::Secant(upper, lower));
    }

    // P(t) = origin + t * direction, |P(t) - center|² = r², i.e. a·t² + b·t + c = 0.
    // b² - 4ac = 4a(r²·a - cross²) by Lagrange's identity; the cross-product form
    // does not cancel catastrophically when the direction vector is short.
    let direction = dest - origin;
    let offset = origin - circle.center;
    let a = direction.dot(direction);
    // Zero after underflow, or infinite after overflow
    if !a.is_normal() {
        return Err(GeometryError::DegenerateLine);
    }
    let cross = offset.x * direction.y - offset.y * direction.x;

    let Some(half_chord) = discriminant_root(r_sq - cross * cross / a, r_sq) else {
        return Ok(Crossing::Miss);
    };
    let foot = -offset.dot(direction) / a;
    let spread = half_chord / a.sqrt();
    let near = origin + direction * (foot - spread);
    if half_chord == 0.0 {
        return Ok(Crossing::Tangent(near));
    }
    let far = origin + direction * (foot + spread);
    Ok(Crossing::Secant(near, far))
}

/// Where the line through `origin` towards `dest` crosses `circle`.
///
/// Of two crossings, the one closest to `tie_break` is returned. When the
/// line is vertical the crossing closest to `origin` is returned instead.
/// `Ok(None)` means the line misses the circle.
///
/// # Errors
///
/// See [`line_circle_crossing`].
pub fn line_circle_intersection(
    origin: Point,
    dest: Point,
    circle: Circle,
    tie_break: Point,
) -> GeometryResult<Option<Point>> {
    let crossing = line_circle_crossing(origin, dest, circle)?;
    let reference = if is_vertical(origin, dest) { origin } else { tie_break };
    Ok(crossing.nearest_to(reference))
}

/// Both points where two circles cross, via the radical line.
///
/// Disjoint, nested and concentric circles with different radii miss.
///
/// # Errors
///
/// Returns [`GeometryError::CoincidentCircles`] when both circles are the
/// same circle, and an error for invalid radii or non-finite centres.
pub fn circle_circle_crossing(first: Circle, second: Circle) -> GeometryResult<Crossing> {
    let first = first.validated()?;
    let second = second.validated()?;

    let scale = first.radius.max(second.radius).max(1.0);
    let between = second.center - first.center;
    let d = between.length();

    // Checked before anything divides by d
    if d <= CONCENTRIC_EPSILON * scale {
        if (first.radius - second.radius).abs() <= CONCENTRIC_EPSILON * scale {
            return Err(GeometryError::CoincidentCircles);
        }
        return Ok(Crossing::Miss);
    }
    if d > first.radius + second.radius + TANGENT_EPSILON * scale
        || d < (first.radius - second.radius).abs() - TANGENT_EPSILON * scale
    {
        return Ok(Crossing::Miss);
    }

    // Distance from the first centre to the radical line, along the centre line
    let along = ((first.radius - second.radius) * (first.radius + second.radius) / d + d) / 2.0;
    let Some(half_chord) = discriminant_root(
        first.radius * first.radius - along * along,
        scale * scale,
    ) else {
        return Ok(Crossing::Miss);
    };

    let unit = between * (1.0 / d);
    let foot = first.center + unit * along;
    if half_chord == 0.0 {
        return Ok(Crossing::Tangent(foot));
    }
    let normal = Point::new(-unit.y, unit.x);
    Ok(Crossing::Secant(
        foot + normal * half_chord,
        foot - normal * half_chord,
    ))
}

/// Where two circles cross; of two points, the one closest to `tie_break`.
///
/// `Ok(None)` means the circles have no common point.
///
/// # Errors
///
/// See [`circle_circle_crossing`].
pub fn circle_circle_intersection(
    first: Circle,
    second: Circle,
    tie_break: Point,
) -> GeometryResult<Option<Point>> {
    Ok(circle_circle_crossing(first, second)?.nearest_to(tie_break))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Point, expected: Point) {
        assert!(
            actual.distance(expected) < 1e-9,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_distance_large_coordinates() {
        let d = distance(Point::new(0.0, 0.0), Point::new(17630.0, 9000.0));
        assert!((d - 19_794.365_36).abs() < 1e-3);
        assert!((distance(Point::new(3.0, 0.0), Point::new(0.0, 4.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_is_inside_boundary() {
        let base = Circle::new(Point::new(0.0, 0.0), 5000.0);
        assert!(is_inside(base, Point::new(5000.0, 0.0)));
        assert!(is_inside(base, Point::new(3000.0, 4000.0)));
        assert!(!is_inside(base, Point::new(3000.0, 4001.0)));
        assert!(base.contains(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_line_circle_secant_tie_break() {
        let circle = Circle::new(Point::new(0.0, 0.0), 5.0);
        let origin = Point::new(-10.0, 0.0);
        let dest = Point::new(10.0, 0.0);

        let near = line_circle_intersection(origin, dest, circle, origin).unwrap();
        assert_close(near.unwrap(), Point::new(-5.0, 0.0));

        let far = line_circle_intersection(origin, dest, circle, dest).unwrap();
        assert_close(far.unwrap(), Point::new(5.0, 0.0));
    }

    #[test]
    fn test_line_circle_tangent() {
        let circle = Circle::new(Point::new(0.0, 0.0), 5.0);
        let crossing =
            line_circle_crossing(Point::new(-10.0, 5.0), Point::new(10.0, 5.0), circle).unwrap();
        match crossing {
            Crossing::Tangent(point) => assert_close(point, Point::new(0.0, 5.0)),
            other => panic!("expected tangent, got {other:?}"),
        }
    }

    #[test]
    fn test_line_circle_miss() {
        let circle = Circle::new(Point::new(0.0, 0.0), 5.0);
        let result = line_circle_intersection(
            Point::new(-10.0, 6.0),
            Point::new(10.0, 7.0),
            circle,
            Point::new(0.0, 0.0),
        );
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_line_circle_vertical_prefers_origin_side() {
        let circle = Circle::new(Point::new(0.0, 0.0), 5.0);
        // Tie-break point sits below, but vertical lines pick the root nearest the origin
        let hit = line_circle_intersection(
            Point::new(3.0, 10.0),
            Point::new(3.0, 9.0),
            circle,
            Point::new(3.0, -100.0),
        )
        .unwrap();
        assert_close(hit.unwrap(), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_line_circle_vertical_miss() {
        let circle = Circle::new(Point::new(0.0, 0.0), 5.0);
        let crossing =
            line_circle_crossing(Point::new(6.0, 10.0), Point::new(6.0, -10.0), circle).unwrap();
        assert!(crossing.is_miss());
    }

    #[test]
    fn test_line_circle_rejects_degenerate_input() {
        let circle = Circle::new(Point::new(0.0, 0.0), 5.0);
        let p = Point::new(1.0, 1.0);
        assert_eq!(
            line_circle_crossing(p, p, circle),
            Err(GeometryError::DegenerateLine)
        );
        assert_eq!(
            line_circle_crossing(p, Point::new(f64::NAN, 0.0), circle),
            Err(GeometryError::NonFinitePoint)
        );
        assert_eq!(
            line_circle_crossing(p, Point::new(2.0, 2.0), Circle::new(p, -1.0)),
            Err(GeometryError::InvalidRadius(-1.0))
        );
    }

    #[test]
    fn test_line_circle_rejects_vanishing_direction() {
        let circle = Circle::new(Point::new(0.0, 0.0), 5000.0);
        let origin = Point::new(0.0, 0.0);
        assert_eq!(
            line_circle_intersection(origin, Point::new(1e-200, 1e-200), circle, origin),
            Err(GeometryError::DegenerateLine)
        );
        assert_eq!(
            line_circle_crossing(origin, Point::new(1e300, 1e300), circle),
            Err(GeometryError::DegenerateLine)
        );
    }

    #[test]
    fn test_discriminant_root_rejects_nan() {
        assert_eq!(discriminant_root(f64::NAN, 1.0), None);
        assert_eq!(discriminant_root(-1.0, 1.0), None);
        assert_eq!(discriminant_root(0.0, 1.0), Some(0.0));
    }

    #[test]
    fn test_circle_circle_disjoint() {
        let a = Circle::new(Point::new(0.0, 0.0), 3.0);
        let b = Circle::new(Point::new(10.0, 0.0), 3.0);
        assert_eq!(circle_circle_intersection(a, b, Point::new(5.0, 0.0)), Ok(None));
    }

    #[test]
    fn test_circle_circle_tie_break_selects_side() {
        let a = Circle::new(Point::new(0.0, 0.0), 5.0);
        let b = Circle::new(Point::new(6.0, 0.0), 5.0);

        let above = circle_circle_intersection(a, b, Point::new(3.0, 10.0)).unwrap();
        assert_close(above.unwrap(), Point::new(3.0, 4.0));

        let below = circle_circle_intersection(a, b, Point::new(3.0, -10.0)).unwrap();
        assert_close(below.unwrap(), Point::new(3.0, -4.0));
    }

    #[test]
    fn test_circle_circle_tangent() {
        let a = Circle::new(Point::new(0.0, 0.0), 2.0);
        let b = Circle::new(Point::new(5.0, 0.0), 3.0);
        match circle_circle_crossing(a, b).unwrap() {
            Crossing::Tangent(point) => assert_close(point, Point::new(2.0, 0.0)),
            other => panic!("expected tangent, got {other:?}"),
        }
    }

    #[test]
    fn test_circle_circle_nested_misses() {
        let outer = Circle::new(Point::new(0.0, 0.0), 10.0);
        let inner = Circle::new(Point::new(1.0, 1.0), 2.0);
        assert!(circle_circle_crossing(outer, inner).unwrap().is_miss());
    }

    #[test]
    fn test_circle_circle_degenerate_centres() {
        let a = Circle::new(Point::new(4.0, 4.0), 5.0);
        assert_eq!(
            circle_circle_crossing(a, a),
            Err(GeometryError::CoincidentCircles)
        );

        let smaller = Circle::new(Point::new(4.0, 4.0), 3.0);
        assert_eq!(circle_circle_crossing(a, smaller), Ok(Crossing::Miss));
    }

    #[test]
    fn test_circle_circle_vertical_centres() {
        // Centres share x
        let a = Circle::new(Point::new(0.0, 0.0), 5.0);
        let b = Circle::new(Point::new(0.0, 6.0), 5.0);
        let right = circle_circle_intersection(a, b, Point::new(10.0, 3.0)).unwrap();
        assert_close(right.unwrap(), Point::new(4.0, 3.0));
    }

    #[test]
    fn test_first_along_ignores_points_behind() {
        let circle = Circle::new(Point::new(0.0, 0.0), 5.0);
        let origin = Point::new(0.0, 0.0);
        let crossing =
            line_circle_crossing(origin, Point::new(1.0, 0.5), circle).unwrap();
        let ahead = crossing.first_along(origin, Point::new(-2.0, -1.0)).unwrap();
        assert!(ahead.x < 0.0);
        assert_eq!(crossing.points().count(), 2);
    }
}
