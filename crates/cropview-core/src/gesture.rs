//! Touch gestures over the displayed image.
//!
//! One finger drags, two fingers pinch (scale and rotate about a pivot).
//! Every move resets the matrices to the snapshot taken when the gesture
//! started and re-applies the whole delta, so errors never accumulate over a
//! gesture.
//!
//! Two matrices are updated together:
//! - the display matrix, image → screen, drawn by the host;
//! - the crop-inverse matrix, which holds only the accumulated gesture
//!   transform and is used to carry the fixed crop window back into the
//!   initial display frame at commit.
//!
//! They are never derived from each other; [`MatrixPair`] is the only way to
//! change them.

use crate::geometry::{AffineMatrix, Point};

/// A touch event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    /// The first finger touched down.
    Down(Point),
    /// A second finger touched down while the first is held.
    PointerDown { first: Point, second: Point },
    /// One or both fingers moved.
    Move { first: Point, second: Option<Point> },
    /// One of two fingers lifted.
    PointerUp,
    /// The last finger lifted.
    Up,
    /// The host aborted the gesture.
    Cancel,
}

/// Display matrix and crop-inverse matrix, updated in lock-step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixPair {
    display: AffineMatrix,
    crop_inverse: AffineMatrix,
}

impl MatrixPair {
    /// Pair for a freshly fitted image: no gesture applied yet.
    pub fn new(initial_display: AffineMatrix) -> Self {
        Self {
            display: initial_display,
            crop_inverse: AffineMatrix::IDENTITY,
        }
    }

    pub fn display(&self) -> &AffineMatrix {
        &self.display
    }

    pub fn crop_inverse(&self) -> &AffineMatrix {
        &self.crop_inverse
    }

    pub fn post_translate(&mut self, dx: f32, dy: f32) {
        self.display.post_translate(dx, dy);
        self.crop_inverse.post_translate(dx, dy);
    }

    pub fn post_scale(&mut self, scale: f32, px: f32, py: f32) {
        self.display.post_scale(scale, scale, px, py);
        self.crop_inverse.post_scale(scale, scale, px, py);
    }

    pub fn post_rotate(&mut self, degrees: f32, px: f32, py: f32) {
        self.display.post_rotate(degrees, px, py);
        self.crop_inverse.post_rotate(degrees, px, py);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging,
    Zooming,
}

/// Turns touch events into updates of a [`MatrixPair`].
#[derive(Debug, Clone)]
pub struct GestureTransformState {
    pair: MatrixPair,
    snapshot: MatrixPair,
    state: GestureState,
    /// Where the first finger went down. Also one end of the pinch pivot.
    anchor: Point,
    pivot: Point,
    initial_distance: f32,
    initial_degrees: f32,
    /// Set when a pinch started with the fingers too close to measure.
    awaiting_baseline: bool,
    min_pinch_distance: f32,
    /// Smallest zoom relative to the initial display, across all gestures.
    min_scale: f32,
    initial_scale: f32,
}

impl GestureTransformState {
    pub fn new(initial_display: AffineMatrix, min_pinch_distance: f32, min_scale: f32) -> Self {
        let pair = MatrixPair::new(initial_display);
        Self {
            pair,
            snapshot: pair,
            state: GestureState::Idle,
            anchor: Point::default(),
            pivot: Point::default(),
            initial_distance: 0.0,
            initial_degrees: 0.0,
            awaiting_baseline: false,
            min_pinch_distance,
            min_scale,
            initial_scale: uniform_scale(&initial_display),
        }
    }

    pub fn pair(&self) -> &MatrixPair {
        &self.pair
    }

    pub fn display_matrix(&self) -> &AffineMatrix {
        self.pair.display()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Apply one event. Returns true when the matrices changed and the host
    /// should redraw.
    pub fn handle(&mut self, event: TouchEvent) -> bool {
        match event {
            TouchEvent::Down(pos) => {
                self.state = GestureState::Dragging;
                self.anchor = pos;
                self.snapshot = self.pair;
                false
            }
            TouchEvent::PointerDown { .. } if self.state == GestureState::Idle => false,
            TouchEvent::PointerDown { first, second } => {
                self.state = GestureState::Zooming;
                self.snapshot = self.pair;
                self.initial_distance = first.distance_to(second);
                self.initial_degrees = first.degrees_to(second);
                // The pivot pairs the first finger's touch-down position, not
                // its current one, with the second finger.
                self.pivot = self.anchor.midpoint(second);
                self.awaiting_baseline = self.initial_distance < self.min_pinch_distance;
                false
            }
            TouchEvent::Move { first, second } => match self.state {
                GestureState::Dragging => {
                    self.pair = self.snapshot;
                    self.pair
                        .post_translate(first.x - self.anchor.x, first.y - self.anchor.y);
                    true
                }
                GestureState::Zooming => match second {
                    Some(second) => self.pinch(first, second),
                    None => false,
                },
                GestureState::Idle => false,
            },
            TouchEvent::PointerUp | TouchEvent::Up | TouchEvent::Cancel => {
                self.state = GestureState::Idle;
                false
            }
        }
    }

    fn pinch(&mut self, first: Point, second: Point) -> bool {
        let distance = first.distance_to(second);
        let degrees = first.degrees_to(second);

        if self.awaiting_baseline {
            if distance < self.min_pinch_distance {
                return false;
            }
            log::trace!("pinch baseline taken at distance {}", distance);
            self.initial_distance = distance;
            self.initial_degrees = degrees;
            self.awaiting_baseline = false;
        }

        // Floor the accumulated zoom, not just this pinch's factor.
        let zoom = uniform_scale(self.snapshot.display()) / self.initial_scale;
        let floor = if zoom.is_finite() && zoom > 0.0 {
            self.min_scale / zoom
        } else {
            self.min_scale
        };
        let scale = (distance / self.initial_distance).max(floor);
        let delta = (degrees - self.initial_degrees) % 360.0;

        self.pair = self.snapshot;
        self.pair.post_scale(scale, self.pivot.x, self.pivot.y);
        self.pair.post_rotate(delta, self.pivot.x, self.pivot.y);
        true
    }
}

/// Scale factor of a matrix, ignoring rotation.
fn uniform_scale(m: &AffineMatrix) -> f32 {
    m.determinant().abs().sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    fn state_with(initial: AffineMatrix) -> GestureTransformState {
        GestureTransformState::new(initial, 10.0, 0.05)
    }

    fn assert_point_near(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3,
            "{:?} != {:?}",
            a,
            b
        );
    }

    fn drag(state: &mut GestureTransformState, from: Point, to: Point) {
        state.handle(TouchEvent::Down(from));
        state.handle(TouchEvent::Move {
            first: to,
            second: None,
        });
        state.handle(TouchEvent::Up);
    }

    #[test]
    fn test_starts_idle_with_identity_inverse() {
        let initial = AffineMatrix::scale(0.5, 0.5, 0.0, 0.0);
        let state = state_with(initial);
        assert_eq!(state.state(), GestureState::Idle);
        assert_eq!(*state.display_matrix(), initial);
        assert_eq!(*state.pair().crop_inverse(), AffineMatrix::IDENTITY);
    }

    #[test]
    fn test_drag_translates_both_matrices() {
        let mut state = state_with(AffineMatrix::scale(0.5, 0.5, 0.0, 0.0));
        state.handle(TouchEvent::Down(p(100.0, 100.0)));
        assert_eq!(state.state(), GestureState::Dragging);

        let changed = state.handle(TouchEvent::Move {
            first: p(130.0, 90.0),
            second: None,
        });
        assert!(changed);
        assert_point_near(state.display_matrix().map_point(p(0.0, 0.0)), p(30.0, -10.0));
        assert_point_near(
            state.pair().crop_inverse().map_point(p(0.0, 0.0)),
            p(30.0, -10.0),
        );
    }

    #[test]
    fn test_drag_moves_are_not_cumulative() {
        let mut state = state_with(AffineMatrix::IDENTITY);
        state.handle(TouchEvent::Down(p(0.0, 0.0)));
        for x in [10.0, 20.0, 30.0] {
            state.handle(TouchEvent::Move {
                first: p(x, 0.0),
                second: None,
            });
        }
        assert_eq!(state.display_matrix().tx, 30.0);
    }

    #[test]
    fn test_drag_there_and_back_restores_matrix() {
        let initial = AffineMatrix::scale(0.25, 0.25, 0.0, 0.0);
        let mut state = state_with(initial);
        drag(&mut state, p(10.0, 10.0), p(210.0, -40.0));
        drag(&mut state, p(210.0, -40.0), p(10.0, 10.0));
        assert!(state.display_matrix().approx_eq(&initial, 1e-4));
        assert!(state
            .pair()
            .crop_inverse()
            .approx_eq(&AffineMatrix::IDENTITY, 1e-4));
    }

    #[test]
    fn test_pinch_spread_scales_about_pivot() {
        let mut state = state_with(AffineMatrix::IDENTITY);
        state.handle(TouchEvent::Down(p(100.0, 100.0)));
        state.handle(TouchEvent::PointerDown {
            first: p(100.0, 100.0),
            second: p(200.0, 100.0),
        });
        assert_eq!(state.state(), GestureState::Zooming);

        let changed = state.handle(TouchEvent::Move {
            first: p(50.0, 100.0),
            second: Some(p(250.0, 100.0)),
        });
        assert!(changed);
        let m = state.display_matrix();
        assert!((m.sx - 2.0).abs() < 1e-5);
        assert!((m.sy - 2.0).abs() < 1e-5);
        // The pivot (150, 100) stays put.
        assert_point_near(m.map_point(p(150.0, 100.0)), p(150.0, 100.0));
    }

    #[test]
    fn test_pinch_rotation_about_pivot() {
        let mut state = state_with(AffineMatrix::IDENTITY);
        state.handle(TouchEvent::Down(p(0.0, 0.0)));
        state.handle(TouchEvent::PointerDown {
            first: p(0.0, 0.0),
            second: p(100.0, 0.0),
        });
        // Second finger swings a quarter turn, same distance.
        state.handle(TouchEvent::Move {
            first: p(0.0, 0.0),
            second: Some(p(0.0, 100.0)),
        });
        let m = state.display_matrix();
        let pivot = p(50.0, 0.0);
        assert_point_near(m.map_point(pivot), pivot);
        // 90 degrees about (50, 0) sends (100, 0) to (50, 50).
        assert_point_near(m.map_point(p(100.0, 0.0)), p(50.0, 50.0));
    }

    #[test]
    fn test_pinch_pivot_uses_first_touch_position() {
        let mut state = state_with(AffineMatrix::IDENTITY);
        state.handle(TouchEvent::Down(p(0.0, 0.0)));
        state.handle(TouchEvent::Move {
            first: p(50.0, 0.0),
            second: None,
        });
        state.handle(TouchEvent::PointerDown {
            first: p(50.0, 0.0),
            second: p(150.0, 0.0),
        });
        state.handle(TouchEvent::Move {
            first: p(50.0, 0.0),
            second: Some(p(250.0, 0.0)),
        });

        // Pivot is the midpoint of the touch-down position (0, 0) and the
        // second finger (150, 0), not of the two current fingers. The image
        // point shown at screen x = 75 before the pinch stays there.
        let m = state.display_matrix();
        assert_point_near(m.map_point(p(25.0, 0.0)), p(75.0, 0.0));
        assert_point_near(m.map_point(p(0.0, 0.0)), p(25.0, 0.0));
    }

    #[test]
    fn test_zero_start_distance_waits_for_separation() {
        let mut state = state_with(AffineMatrix::IDENTITY);
        state.handle(TouchEvent::Down(p(100.0, 100.0)));
        state.handle(TouchEvent::PointerDown {
            first: p(100.0, 100.0),
            second: p(100.0, 100.0),
        });

        // Still too close to measure: nothing changes.
        let changed = state.handle(TouchEvent::Move {
            first: p(100.0, 100.0),
            second: Some(p(103.0, 100.0)),
        });
        assert!(!changed);
        assert_eq!(*state.display_matrix(), AffineMatrix::IDENTITY);

        // First usable separation becomes the baseline.
        assert!(state.handle(TouchEvent::Move {
            first: p(100.0, 100.0),
            second: Some(p(120.0, 100.0)),
        }));
        assert!(state.display_matrix().approx_eq(&AffineMatrix::IDENTITY, 1e-5));

        state.handle(TouchEvent::Move {
            first: p(100.0, 100.0),
            second: Some(p(140.0, 100.0)),
        });
        let m = state.display_matrix();
        assert!((m.sx - 2.0).abs() < 1e-5);
        assert!(m.is_finite());
    }

    #[test]
    fn test_pinch_scale_is_clamped() {
        let mut state = state_with(AffineMatrix::IDENTITY);
        state.handle(TouchEvent::Down(p(0.0, 0.0)));
        state.handle(TouchEvent::PointerDown {
            first: p(0.0, 0.0),
            second: p(1000.0, 0.0),
        });
        state.handle(TouchEvent::Move {
            first: p(0.0, 0.0),
            second: Some(p(1.0, 0.0)),
        });
        let m = state.display_matrix();
        assert!((m.sx - 0.05).abs() < 1e-5);
        assert!(m.invert().is_ok());
    }

    fn pinch_in(state: &mut GestureTransformState) {
        state.handle(TouchEvent::Down(p(0.0, 200.0)));
        state.handle(TouchEvent::PointerDown {
            first: p(0.0, 200.0),
            second: p(400.0, 200.0),
        });
        state.handle(TouchEvent::Move {
            first: p(0.0, 200.0),
            second: Some(p(2.0, 200.0)),
        });
        state.handle(TouchEvent::Up);
    }

    #[test]
    fn test_repeated_pinches_keep_total_zoom_floor() {
        let initial = AffineMatrix::scale(0.5, 0.5, 0.0, 0.0);
        let mut state = state_with(initial);
        for _ in 0..6 {
            pinch_in(&mut state);
            let m = state.display_matrix();
            assert!((m.sx - 0.025).abs() < 1e-5, "sx = {}", m.sx);
            assert!(m.invert().is_ok());
            assert!(state.pair().crop_inverse().invert().is_ok());
        }
    }

    #[test]
    fn test_zoom_back_in_after_floor() {
        let mut state = state_with(AffineMatrix::IDENTITY);
        pinch_in(&mut state);
        state.handle(TouchEvent::Down(p(100.0, 0.0)));
        state.handle(TouchEvent::PointerDown {
            first: p(100.0, 0.0),
            second: p(110.0, 0.0),
        });
        state.handle(TouchEvent::Move {
            first: p(100.0, 0.0),
            second: Some(p(300.0, 0.0)),
        });
        assert!((state.display_matrix().sx - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_pointer_down_while_idle_is_ignored() {
        let mut state = state_with(AffineMatrix::IDENTITY);
        drag(&mut state, p(0.0, 0.0), p(10.0, 0.0));
        let before = *state.display_matrix();

        assert!(!state.handle(TouchEvent::PointerDown {
            first: p(300.0, 300.0),
            second: p(400.0, 300.0),
        }));
        assert_eq!(state.state(), GestureState::Idle);
        assert!(!state.handle(TouchEvent::Move {
            first: p(300.0, 300.0),
            second: Some(p(600.0, 300.0)),
        }));
        assert_eq!(*state.display_matrix(), before);
    }

    #[test]
    fn test_pointer_up_returns_to_idle() {
        let mut state = state_with(AffineMatrix::IDENTITY);
        state.handle(TouchEvent::Down(p(0.0, 0.0)));
        state.handle(TouchEvent::PointerDown {
            first: p(0.0, 0.0),
            second: p(100.0, 0.0),
        });
        state.handle(TouchEvent::PointerUp);
        assert_eq!(state.state(), GestureState::Idle);

        let before = *state.display_matrix();
        assert!(!state.handle(TouchEvent::Move {
            first: p(40.0, 40.0),
            second: None,
        }));
        assert_eq!(*state.display_matrix(), before);
    }

    #[test]
    fn test_cancel_keeps_matrix() {
        let mut state = state_with(AffineMatrix::IDENTITY);
        state.handle(TouchEvent::Down(p(0.0, 0.0)));
        state.handle(TouchEvent::Move {
            first: p(5.0, 5.0),
            second: None,
        });
        state.handle(TouchEvent::Cancel);
        assert_eq!(state.state(), GestureState::Idle);
        assert_eq!(state.display_matrix().tx, 5.0);
    }

    #[test]
    fn test_zooming_move_without_second_pointer_is_ignored() {
        let mut state = state_with(AffineMatrix::IDENTITY);
        state.handle(TouchEvent::Down(p(0.0, 0.0)));
        state.handle(TouchEvent::PointerDown {
            first: p(0.0, 0.0),
            second: p(100.0, 0.0),
        });
        assert!(!state.handle(TouchEvent::Move {
            first: p(10.0, 0.0),
            second: None,
        }));
    }
}
