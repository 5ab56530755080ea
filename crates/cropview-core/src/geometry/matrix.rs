//! 2D affine matrices.
//!
//! The matrix is stored as six components:
//!
//! ```text
//!   | sx  kx  tx |
//!   | ky  sy  ty |
//!   |  0   0   1 |
//! ```
//!
//! and maps `x' = sx*x + kx*y + tx`, `y' = ky*x + sy*y + ty`.
//!
//! # Composition order
//!
//! `post_*` operations apply *after* the existing transform (`M' = T * M`),
//! `pre_*` operations apply *before* it (`M' = M * T`). Pivoted rotations and
//! scales are expressed in the coordinate frame that is current at that point
//! of the chain, so the order of calls is part of the meaning.

use super::rect::{corners_from_rect, trap_to_rect, Point, Quad, Rect};
use thiserror::Error;

/// Determinants smaller than this are treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Errors produced by matrix operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The matrix has no inverse (scale collapsed to zero).
    #[error("matrix is singular and cannot be inverted")]
    Singular,

    /// A component became NaN or infinite.
    #[error("matrix has non-finite components")]
    NonFinite,

    /// `set_rect_to_rect` was asked to map from an empty rectangle.
    #[error("source rectangle is empty")]
    EmptySource,
}

/// How [`AffineMatrix::set_rect_to_rect`] fits the source into the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleToFit {
    /// Scale each axis independently so the source fills the destination.
    #[default]
    Fill,
    /// Uniform scale that fits inside the destination, centered.
    Center,
}

/// 2D affine transformation matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix {
    pub sx: f32,
    pub kx: f32,
    pub tx: f32,
    pub ky: f32,
    pub sy: f32,
    pub ty: f32,
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `(sin, cos)` of an angle in degrees, with exact values at quarter turns.
fn sin_cos_degrees(degrees: f32) -> (f32, f32) {
    let normalized = (degrees as f64).rem_euclid(360.0);
    let exact = match normalized {
        n if n == 0.0 => Some((0.0, 1.0)),
        n if n == 90.0 => Some((1.0, 0.0)),
        n if n == 180.0 => Some((0.0, -1.0)),
        n if n == 270.0 => Some((-1.0, 0.0)),
        _ => None,
    };
    match exact {
        Some(sc) => sc,
        None => {
            let (s, c) = normalized.to_radians().sin_cos();
            (s as f32, c as f32)
        }
    }
}

impl AffineMatrix {
    pub const IDENTITY: AffineMatrix = AffineMatrix {
        sx: 1.0,
        kx: 0.0,
        tx: 0.0,
        ky: 0.0,
        sy: 1.0,
        ty: 0.0,
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn new(sx: f32, kx: f32, tx: f32, ky: f32, sy: f32, ty: f32) -> Self {
        Self {
            sx,
            kx,
            tx,
            ky,
            sy,
            ty,
        }
    }

    /// Translation by `(dx, dy)`.
    pub fn translate(dx: f32, dy: f32) -> Self {
        Self::new(1.0, 0.0, dx, 0.0, 1.0, dy)
    }

    /// Scale by `(sx, sy)` about the pivot `(px, py)`.
    pub fn scale(sx: f32, sy: f32, px: f32, py: f32) -> Self {
        Self::new(sx, 0.0, px - sx * px, 0.0, sy, py - sy * py)
    }

    /// Rotation by `degrees` (clockwise on a y-down screen) about `(px, py)`.
    pub fn rotate(degrees: f32, px: f32, py: f32) -> Self {
        let (s, c) = sin_cos_degrees(degrees);
        Self::new(c, -s, px - c * px + s * py, s, c, py - s * px - c * py)
    }

    /// Matrix that maps `src` onto `dst` using the given fit policy.
    pub fn rect_to_rect(src: &Rect, dst: &Rect, fit: ScaleToFit) -> Result<Self, TransformError> {
        let mut m = Self::IDENTITY;
        m.set_rect_to_rect(src, dst, fit)?;
        Ok(m)
    }

    /// Replace this matrix with one mapping `src` onto `dst`.
    ///
    /// Fails with [`TransformError::EmptySource`] when `src` has no area, in
    /// which case the matrix is reset to identity.
    pub fn set_rect_to_rect(
        &mut self,
        src: &Rect,
        dst: &Rect,
        fit: ScaleToFit,
    ) -> Result<(), TransformError> {
        if src.is_empty() {
            *self = Self::IDENTITY;
            return Err(TransformError::EmptySource);
        }

        let mut sx = dst.width() / src.width();
        let mut sy = dst.height() / src.height();
        let mut tx = dst.left - src.left * sx;
        let mut ty = dst.top - src.top * sy;

        if fit == ScaleToFit::Center {
            let s = sx.min(sy);
            sx = s;
            sy = s;
            tx = dst.left - src.left * s + (dst.width() - src.width() * s) / 2.0;
            ty = dst.top - src.top * s + (dst.height() - src.height() * s) / 2.0;
        }

        *self = Self::new(sx, 0.0, tx, 0.0, sy, ty);
        self.ensure_finite()
    }

    /// `a * b`: the transform that applies `b` first, then `a`.
    fn multiply(a: &AffineMatrix, b: &AffineMatrix) -> AffineMatrix {
        AffineMatrix {
            sx: a.sx * b.sx + a.kx * b.ky,
            kx: a.sx * b.kx + a.kx * b.sy,
            tx: a.sx * b.tx + a.kx * b.ty + a.tx,
            ky: a.ky * b.sx + a.sy * b.ky,
            sy: a.ky * b.kx + a.sy * b.sy,
            ty: a.ky * b.tx + a.sy * b.ty + a.ty,
        }
    }

    /// Apply `other` before this matrix (`self = self * other`).
    pub fn pre_concat(&mut self, other: &AffineMatrix) -> &mut Self {
        *self = Self::multiply(self, other);
        self
    }

    /// Apply `other` after this matrix (`self = other * self`).
    pub fn post_concat(&mut self, other: &AffineMatrix) -> &mut Self {
        *self = Self::multiply(other, self);
        self
    }

    pub fn post_translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.tx += dx;
        self.ty += dy;
        self
    }

    pub fn post_scale(&mut self, sx: f32, sy: f32, px: f32, py: f32) -> &mut Self {
        self.post_concat(&Self::scale(sx, sy, px, py))
    }

    pub fn post_rotate(&mut self, degrees: f32, px: f32, py: f32) -> &mut Self {
        self.post_concat(&Self::rotate(degrees, px, py))
    }

    pub fn pre_translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.pre_concat(&Self::translate(dx, dy))
    }

    pub fn pre_scale(&mut self, sx: f32, sy: f32, px: f32, py: f32) -> &mut Self {
        self.pre_concat(&Self::scale(sx, sy, px, py))
    }

    pub fn pre_rotate(&mut self, degrees: f32, px: f32, py: f32) -> &mut Self {
        self.pre_concat(&Self::rotate(degrees, px, py))
    }

    pub fn determinant(&self) -> f64 {
        self.sx as f64 * self.sy as f64 - self.kx as f64 * self.ky as f64
    }

    pub fn is_finite(&self) -> bool {
        [self.sx, self.kx, self.tx, self.ky, self.sy, self.ty]
            .iter()
            .all(|v| v.is_finite())
    }

    /// `Ok(())` when every component is finite.
    pub fn ensure_finite(&self) -> Result<(), TransformError> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(TransformError::NonFinite)
        }
    }

    /// Inverse of this matrix.
    ///
    /// There is no best-effort fallback: a (near) zero determinant or a
    /// non-finite result is reported as an error.
    pub fn invert(&self) -> Result<AffineMatrix, TransformError> {
        self.ensure_finite()?;
        let det = self.determinant();
        if det.abs() < SINGULAR_EPSILON {
            return Err(TransformError::Singular);
        }

        let (sx, kx, tx) = (self.sx as f64, self.kx as f64, self.tx as f64);
        let (ky, sy, ty) = (self.ky as f64, self.sy as f64, self.ty as f64);
        let inv = AffineMatrix {
            sx: (sy / det) as f32,
            kx: (-kx / det) as f32,
            tx: ((kx * ty - sy * tx) / det) as f32,
            ky: (-ky / det) as f32,
            sy: (sx / det) as f32,
            ty: ((ky * tx - sx * ty) / det) as f32,
        };
        inv.ensure_finite()?;
        Ok(inv)
    }

    pub fn map_point(&self, p: Point) -> Point {
        Point::new(
            self.sx * p.x + self.kx * p.y + self.tx,
            self.ky * p.x + self.sy * p.y + self.ty,
        )
    }

    pub fn map_points(&self, points: &mut [Point]) {
        for p in points.iter_mut() {
            *p = self.map_point(*p);
        }
    }

    /// The four mapped corners of `r`, in TL, TR, BR, BL order of the source.
    ///
    /// Use this when the true footprint of a rotated rect matters.
    pub fn map_quad(&self, r: &Rect) -> Quad {
        let mut q = corners_from_rect(r);
        self.map_points(&mut q.points);
        q
    }

    /// Bounding box of the mapped rect.
    ///
    /// Under rotation this over-estimates the footprint; see [`Self::map_quad`].
    pub fn map_rect(&self, r: &Rect) -> Rect {
        trap_to_rect(&self.map_quad(r).points)
    }

    /// True when the matrix only scales and translates.
    pub fn is_scale_translate(&self) -> bool {
        self.kx == 0.0 && self.ky == 0.0
    }

    /// Compare components with an absolute tolerance.
    pub fn approx_eq(&self, other: &AffineMatrix, tolerance: f32) -> bool {
        let a = [self.sx, self.kx, self.tx, self.ky, self.sy, self.ty];
        let b = [other.sx, other.kx, other.tx, other.ky, other.sy, other.ty];
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tolerance)
    }

    /// Row-major `[sx, kx, tx, ky, sy, ty]`, the layout 2D canvas APIs expect
    /// after reordering.
    pub fn to_array(&self) -> [f32; 6] {
        [self.sx, self.kx, self.tx, self.ky, self.sy, self.ty]
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
