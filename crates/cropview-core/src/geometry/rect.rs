//! Axis-aligned rectangles, quads, and the rectangle algebra the crop engine
//! is built on.
//!
//! # Conventions
//!
//! - Coordinates are `f32`, origin top-left, y grows downwards
//! - A [`Rect`] is not guaranteed to be normalized (`left <= right`) until
//!   [`Rect::sort`] is called
//! - A zero-area rect is valid and means "nothing to crop"; callers check
//!   [`Rect::is_empty`] rather than expecting an error
//! - A [`Quad`] lists its corners in the fixed order
//!   top-left, top-right, bottom-right, bottom-left

use serde::{Deserialize, Serialize};

/// A point in 2D space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Angle of the vector from `self` to `other`, in degrees.
    pub fn degrees_to(self, other: Point) -> f32 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }

    /// Midpoint between two points.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Axis-aligned rectangle in floating point coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rect anchored at the origin with the given size.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) * 0.5
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// True when the rect has no area (zero or negative width or height).
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Swap edges so that `left <= right` and `top <= bottom`.
    pub fn sort(&mut self) {
        if self.left > self.right {
            std::mem::swap(&mut self.left, &mut self.right);
        }
        if self.top > self.bottom {
            std::mem::swap(&mut self.top, &mut self.bottom);
        }
    }

    /// Normalized copy of this rect.
    pub fn sorted(mut self) -> Self {
        self.sort();
        self
    }

    /// Strict overlap test: rects that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Move the rect by `(dx, dy)`.
    pub fn offset(&mut self, dx: f32, dy: f32) {
        self.left += dx;
        self.right += dx;
        self.top += dy;
        self.bottom += dy;
    }

    /// Shrink the rect by `dx` on the left and right and `dy` on the top and
    /// bottom. Negative values grow it.
    pub fn inset(&mut self, dx: f32, dy: f32) {
        self.left += dx;
        self.right -= dx;
        self.top += dy;
        self.bottom -= dy;
    }

    /// Smallest integer rect containing this one.
    pub fn round_out(&self) -> PixelRect {
        PixelRect {
            left: self.left.floor() as i32,
            top: self.top.floor() as i32,
            right: self.right.ceil() as i32,
            bottom: self.bottom.ceil() as i32,
        }
    }

    /// Compare edges with an absolute tolerance.
    pub fn approx_eq(&self, other: &Rect, tolerance: f32) -> bool {
        (self.left - other.left).abs() <= tolerance
            && (self.top - other.top).abs() <= tolerance
            && (self.right - other.right).abs() <= tolerance
            && (self.bottom - other.bottom).abs() <= tolerance
    }
}

/// Integer rectangle addressing source pixels, as handed to a region decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Clip this rect to `0..width` x `0..height`.
    pub fn clamp_to(&self, width: u32, height: u32) -> PixelRect {
        let (w, h) = (width as i32, height as i32);
        PixelRect {
            left: self.left.clamp(0, w),
            top: self.top.clamp(0, h),
            right: self.right.clamp(0, w),
            bottom: self.bottom.clamp(0, h),
        }
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.left as f32,
            self.top as f32,
            self.right as f32,
            self.bottom as f32,
        )
    }
}

/// Four corner points of a transformed rectangle, ordered TL, TR, BR, BL.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Quad {
    pub points: [Point; 4],
}

impl Quad {
    /// Flatten into `[x0, y0, x1, y1, ...]`.
    pub fn to_array(&self) -> [f32; 8] {
        let p = &self.points;
        [
            p[0].x, p[0].y, p[1].x, p[1].y, p[2].x, p[2].y, p[3].x, p[3].y,
        ]
    }

    /// Bounding box of the four corners.
    pub fn bounds(&self) -> Rect {
        trap_to_rect(&self.points)
    }
}

/// Corners of `r` in the order top-left, top-right, bottom-right, bottom-left.
///
/// Everything that looks up sides or edges by index relies on this order.
pub fn corners_from_rect(r: &Rect) -> Quad {
    Quad {
        points: [
            Point::new(r.left, r.top),
            Point::new(r.right, r.top),
            Point::new(r.right, r.bottom),
            Point::new(r.left, r.bottom),
        ],
    }
}

/// Smallest normalized rectangle containing every point.
///
/// Used to "un-rotate" a quad into a conservative axis-aligned rect. An empty
/// slice yields [`Rect::ZERO`].
pub fn trap_to_rect(points: &[Point]) -> Rect {
    if points.is_empty() {
        return Rect::ZERO;
    }

    let mut r = Rect::new(
        f32::INFINITY,
        f32::INFINITY,
        f32::NEG_INFINITY,
        f32::NEG_INFINITY,
    );
    for p in points {
        r.left = r.left.min(p.x);
        r.top = r.top.min(p.y);
        r.right = r.right.max(p.x);
        r.bottom = r.bottom.max(p.y);
    }
    r.sorted()
}

/// Point containment that treats the right and bottom edges as inside.
pub fn inclusive_contains(r: &Rect, p: Point) -> bool {
    !(p.x > r.right || p.x < r.left || p.y > r.bottom || p.y < r.top)
}

/// Clamp every point into `bound`, in place.
pub fn clamp_points_to_rect(bound: &Rect, points: &mut [Point]) {
    for p in points.iter_mut() {
        p.x = p.x.max(bound.left).min(bound.right);
        p.y = p.y.max(bound.top).min(bound.bottom);
    }
}

/// Resize `r` about its center to the aspect ratio `w:h`.
///
/// The rect only ever shrinks: the scale is `min(r.w / w, r.h / h)`.
pub fn fix_aspect_ratio(r: &mut Rect, w: f32, h: f32) {
    let scale = (r.width() / w).min(r.height() / h);
    let cx = r.center_x();
    let cy = r.center_y();
    let hw = scale * w / 2.0;
    let hh = scale * h / 2.0;
    *r = Rect::new(cx - hw, cy - hh, cx + hw, cy + hh);
}

/// Resize `r` to the aspect ratio `w:h` by shrinking only one axis.
///
/// Unlike [`fix_aspect_ratio`] the left or top edge moves so the rect stays
/// centered on the axis that changed, and the other axis is left untouched.
pub fn fix_aspect_ratio_contained(r: &mut Rect, w: f32, h: f32) {
    let orig_aspect = r.width() / r.height();
    let target = w / h;
    if orig_aspect < target {
        let final_h = r.width() / target;
        r.top = r.center_y() - final_h / 2.0;
        r.bottom = r.top + final_h;
    } else {
        let final_w = r.height() * target;
        r.left = r.center_x() - final_w / 2.0;
        r.right = r.left + final_w;
    }
}

/// Intersect an axis-aligned rect with the bounding box of a rotated one.
///
/// Returns `None` when the two do not overlap, which callers read as
/// "nothing to crop".
pub fn intersection_of_rotated_and_axis_aligned(axis: &Rect, rotated: &Rect) -> Option<Rect> {
    let unrotated = corners_from_rect(rotated).bounds();
    if !axis.intersects(&unrotated) {
        return None;
    }
    let mut corners = corners_from_rect(&unrotated).points;
    clamp_points_to_rect(axis, &mut corners);
    Some(trap_to_rect(&corners))
}

/// Move `src` so that it shares its center with `dst`, keeping its size.
pub fn center_rect_on(src: &mut Rect, dst: &Rect) {
    let w = src.width();
    let h = src.height();
    let left = dst.center_x() - w / 2.0;
    let top = dst.center_y() - h / 2.0;
    *src = Rect::new(left, top, left + w, top + h);
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-200.0f32..200.0, -200.0f32..200.0, 10.0f32..800.0, 10.0f32..800.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, x + w, y + h))
    }

    proptest! {
        /// Property: fixing the aspect ratio keeps the center, hits the
        /// requested ratio, and never grows the rect.
        #[test]
        fn prop_fix_aspect_ratio(
            r in rect_strategy(),
            w in 1.0f32..20.0,
            h in 1.0f32..20.0,
        ) {
            let mut fixed = r;
            fix_aspect_ratio(&mut fixed, w, h);

            prop_assert!((fixed.center_x() - r.center_x()).abs() < 1e-2);
            prop_assert!((fixed.center_y() - r.center_y()).abs() < 1e-2);
            let ratio = fixed.width() / fixed.height();
            prop_assert!((ratio - w / h).abs() / (w / h) < 1e-3, "ratio {} vs {}", ratio, w / h);
            prop_assert!(fixed.width() <= r.width() + 1e-3);
            prop_assert!(fixed.height() <= r.height() + 1e-3);
        }

        /// Property: bounding boxes are always normalized and contain every
        /// input point.
        #[test]
        fn prop_trap_to_rect_contains_points(
            pts in prop::collection::vec((-1000.0f32..1000.0, -1000.0f32..1000.0), 1..12),
        ) {
            let points: Vec<Point> = pts.iter().map(|&(x, y)| Point::new(x, y)).collect();
            let r = trap_to_rect(&points);
            prop_assert!(r.left <= r.right && r.top <= r.bottom);
            for p in points {
                prop_assert!(inclusive_contains(&r, p));
            }
        }

        /// Property: clamped points always land inside the bound.
        #[test]
        fn prop_clamped_points_inside(
            bound in rect_strategy(),
            pts in prop::collection::vec((-2000.0f32..2000.0, -2000.0f32..2000.0), 1..8),
        ) {
            let mut points: Vec<Point> = pts.iter().map(|&(x, y)| Point::new(x, y)).collect();
            clamp_points_to_rect(&bound, &mut points);
            for p in points {
                prop_assert!(inclusive_contains(&bound, p));
            }
        }
    }
}
