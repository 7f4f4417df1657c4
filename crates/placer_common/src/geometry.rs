//! Points, vectors, axis-aligned rectangles and the pure helpers built on them.
//!
//! Positions are always box centers. Nothing in here holds state; every
//! function is total and side-effect free.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Penetration below this is treated as touching, not overlapping.
pub const OVERLAP_EPSILON: f64 = 1e-9;

/// A position in board space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` if both coordinates are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A displacement, force, or velocity in board space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Creates a vector.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Returns this vector rescaled so its length is at most `max`.
    pub fn clamp_length(self, max: f64) -> Vec2 {
        let len = self.length();
        if len > max {
            if max <= 0.0 {
                return Vec2::ZERO;
            }
            self * (max / len)
        } else {
            self
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl Add<Vec2> for Point {
    type Output = Point;
    fn add(self, rhs: Vec2) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign<Vec2> for Point {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign<Vec2> for Point {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Sub for Point {
    type Output = Vec2;
    fn sub(self, rhs: Point) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An axis-aligned rectangle stored by its extents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub min_x: f64,
    /// Bottom edge.
    pub min_y: f64,
    /// Right edge.
    pub max_x: f64,
    /// Top edge.
    pub max_y: f64,
}

/// How far a box sticks out of a container on each side. All values are `>= 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Penetration {
    /// Overhang past the container's left edge.
    pub left: f64,
    /// Overhang past the container's right edge.
    pub right: f64,
    /// Overhang past the container's bottom edge.
    pub bottom: f64,
    /// Overhang past the container's top edge.
    pub top: f64,
}

impl Penetration {
    /// Returns `true` if the box sticks out on any side.
    pub fn any(&self) -> bool {
        self.left > OVERLAP_EPSILON
            || self.right > OVERLAP_EPSILON
            || self.bottom > OVERLAP_EPSILON
            || self.top > OVERLAP_EPSILON
    }

    /// The inward push direction weighted by depth on each side.
    pub fn inward(&self) -> Vec2 {
        Vec2::new(self.left - self.right, self.bottom - self.top)
    }
}

impl Rect {
    /// Creates a rectangle from its extents.
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates the box of size `width` × `height` centered on `center`.
    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::new(center.x - hw, center.y - hh, center.x + hw, center.y + hh)
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns `true` if `inner` lies entirely within `self`, within tolerance.
    pub fn contains_rect(&self, inner: &Rect) -> bool {
        !inner.penetration_outside(self).any()
    }

    /// Measures how far `self` extends past `container` on each side.
    pub fn penetration_outside(&self, container: &Rect) -> Penetration {
        Penetration {
            left: (container.min_x - self.min_x).max(0.0),
            right: (self.max_x - container.max_x).max(0.0),
            bottom: (container.min_y - self.min_y).max(0.0),
            top: (self.max_y - container.max_y).max(0.0),
        }
    }

    /// Clamps a box center so a `width` × `height` box stays inside `self`.
    ///
    /// An axis on which the box does not fit is centered instead.
    pub fn clamp_center(&self, center: Point, width: f64, height: f64) -> Point {
        Point::new(
            clamp_axis(center.x, self.min_x, self.max_x, width),
            clamp_axis(center.y, self.min_y, self.max_y, height),
        )
    }
}

fn clamp_axis(value: f64, min: f64, max: f64, extent: f64) -> f64 {
    let lo = min + extent / 2.0;
    let hi = max - extent / 2.0;
    if lo > hi {
        (min + max) / 2.0
    } else {
        value.clamp(lo, hi)
    }
}

/// Returns the minimum translation that moves `a` clear of `b` by `spacing`.
///
/// Yields `None` when the boxes are already at least `spacing` apart along
/// either axis. The returned vector points along the axis of smaller
/// penetration, away from `b`; coincident centers resolve toward `+`.
pub fn overlap_depth(a: &Rect, b: &Rect, spacing: f64) -> Option<Vec2> {
    let ca = a.center();
    let cb = b.center();
    let dx = ca.x - cb.x;
    let dy = ca.y - cb.y;
    let ox = (a.width() + b.width()) / 2.0 + spacing - dx.abs();
    let oy = (a.height() + b.height()) / 2.0 + spacing - dy.abs();
    if ox <= OVERLAP_EPSILON || oy <= OVERLAP_EPSILON {
        return None;
    }
    if ox < oy {
        Some(Vec2::new(ox * sign(dx), 0.0))
    } else {
        Some(Vec2::new(0.0, oy * sign(dy)))
    }
}

fn sign(v: f64) -> f64 {
    if v >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Euclidean distance between two points.
pub fn distance(p: Point, q: Point) -> f64 {
    (q - p).length()
}

/// Unit vector from `p` toward `q`, or `(1, 0)` when the points coincide.
pub fn direction(p: Point, q: Point) -> Vec2 {
    let d = q - p;
    let len = d.length();
    if len <= f64::EPSILON {
        Vec2::new(1.0, 0.0)
    } else {
        d * (1.0 / len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Rect {
        Rect::from_center(Point::new(x, y), size, size)
    }

    #[test]
    fn distance_three_four_five() {
        assert_eq!(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn direction_is_unit_length() {
        let d = direction(Point::new(1.0, 1.0), Point::new(4.0, 5.0));
        assert!((d.length() - 1.0).abs() < 1e-12);
        assert!((d.x - 0.6).abs() < 1e-12);
        assert!((d.y - 0.8).abs() < 1e-12);
    }

    #[test]
    fn direction_coincident_falls_back() {
        let p = Point::new(2.0, 2.0);
        assert_eq!(direction(p, p), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn separated_boxes_have_no_overlap() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(10.0, 0.0, 2.0);
        assert_eq!(overlap_depth(&a, &b, 2.0), None);
    }

    #[test]
    fn spacing_counts_as_overlap() {
        // Edges are 1.0 apart, spacing demands 2.0.
        let a = square(0.0, 0.0, 2.0);
        let b = square(3.0, 0.0, 2.0);
        let mtv = overlap_depth(&a, &b, 2.0).unwrap();
        assert!((mtv.x + 1.0).abs() < 1e-12);
        assert_eq!(mtv.y, 0.0);
    }

    #[test]
    fn mtv_uses_smaller_axis() {
        let a = square(0.0, 0.0, 4.0);
        let b = square(1.0, 3.5, 4.0);
        let mtv = overlap_depth(&a, &b, 0.0).unwrap();
        assert_eq!(mtv.x, 0.0);
        assert!((mtv.y + 0.5).abs() < 1e-12);
    }

    #[test]
    fn applying_mtv_separates() {
        let a = square(0.0, 0.0, 4.0);
        let b = square(1.0, 0.5, 4.0);
        let mtv = overlap_depth(&a, &b, 2.0).unwrap();
        let moved = Rect::from_center(a.center() + mtv, 4.0, 4.0);
        assert_eq!(overlap_depth(&moved, &b, 2.0), None);
    }

    #[test]
    fn coincident_centers_push_positive() {
        let a = square(5.0, 5.0, 2.0);
        let mtv = overlap_depth(&a, &a, 0.0).unwrap();
        assert!(mtv.x > 0.0 || mtv.y > 0.0);
    }

    #[test]
    fn penetration_outside_container() {
        let board = Rect::new(5.0, 5.0, 95.0, 95.0);
        let inside = square(50.0, 50.0, 10.0);
        assert!(board.contains_rect(&inside));

        let hanging = square(3.0, 96.0, 4.0);
        let pen = hanging.penetration_outside(&board);
        assert!((pen.left - 4.0).abs() < 1e-12);
        assert!((pen.top - 3.0).abs() < 1e-12);
        assert_eq!(pen.right, 0.0);
        assert_eq!(pen.bottom, 0.0);
        let push = pen.inward();
        assert!(push.x > 0.0 && push.y < 0.0);
    }

    #[test]
    fn clamp_center_keeps_box_inside() {
        let board = Rect::new(5.0, 5.0, 95.0, 95.0);
        let p = board.clamp_center(Point::new(0.0, 100.0), 10.0, 4.0);
        assert_eq!(p, Point::new(10.0, 93.0));
    }

    #[test]
    fn clamp_center_oversized_axis_is_centered() {
        let board = Rect::new(0.0, 0.0, 10.0, 10.0);
        let p = board.clamp_center(Point::new(1.0, 1.0), 20.0, 2.0);
        assert_eq!(p, Point::new(5.0, 1.0));
    }

    #[test]
    fn clamp_length_limits_magnitude() {
        let v = Vec2::new(30.0, 40.0).clamp_length(5.0);
        assert!((v.length() - 5.0).abs() < 1e-12);
        assert_eq!(Vec2::new(1.0, 1.0).clamp_length(0.0), Vec2::ZERO);
        assert_eq!(Vec2::new(1.0, 0.0).clamp_length(3.0), Vec2::new(1.0, 0.0));
    }
}
