//! Front-end crop session state.
//!
//! A session owns the image space of the current load, the viewport, the
//! fixed matrices built from them, and the gesture state. The display is
//! built lazily once both an image and a viewport are known; a new image or
//! a viewport change throws away every gesture and rebuilds from scratch.

use crate::config::CropConfig;
use crate::decode::DecodedImage;
use crate::error::CropError;
use crate::geometry::{crop_to_screen, image_to_screen, AffineMatrix, Rect, Rotation};
use crate::gesture::{GestureState, GestureTransformState, TouchEvent};
use crate::pipeline::LoadedImage;
use crate::transform::{resolve_crop, CropFrame, CropResult};

/// What is known about the loaded image. Immutable for one load.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ImageSpace {
    image_rect: Rect,
    original_bounds: Rect,
    rotation: Rotation,
}

#[derive(Debug, Clone)]
struct DisplayState {
    frame: CropFrame,
    gesture: GestureTransformState,
    crop_in_screen: Rect,
}

/// Interactive state for one crop widget.
#[derive(Debug, Clone)]
pub struct CropSession {
    config: CropConfig,
    image: Option<ImageSpace>,
    viewport: Option<(u32, u32)>,
    display: Option<DisplayState>,
}

impl CropSession {
    pub fn new(config: CropConfig) -> Result<Self, CropError> {
        config.validate()?;
        Ok(Self {
            config,
            image: None,
            viewport: None,
            display: None,
        })
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Install a new image. Any previous image and its gestures are dropped.
    ///
    /// `preview` is the size of the displayed bitmap, `original` the
    /// full-resolution size of the source.
    pub fn load(
        &mut self,
        preview: (u32, u32),
        original: (u32, u32),
        rotation: Rotation,
    ) -> Result<(), CropError> {
        if preview.0 == 0 || preview.1 == 0 || original.0 == 0 || original.1 == 0 {
            self.image = None;
            self.display = None;
            log::warn!(
                "rejecting image with preview {:?} and bounds {:?}",
                preview,
                original
            );
            return Err(CropError::LoadFailure(
                "could not load image for cropping".to_string(),
            ));
        }

        self.image = Some(ImageSpace {
            image_rect: Rect::from_size(preview.0 as f32, preview.1 as f32),
            original_bounds: Rect::from_size(original.0 as f32, original.1 as f32),
            rotation,
        });
        self.invalidate();
        Ok(())
    }

    /// Forget the current image. The viewport is kept.
    pub fn unload(&mut self) {
        self.image = None;
        self.display = None;
    }

    /// Install the result of [`crate::pipeline::load_image`].
    pub fn show(&mut self, loaded: &LoadedImage) -> Result<(), CropError> {
        let preview: &DecodedImage = &loaded.preview;
        self.load(
            (preview.width, preview.height),
            (loaded.metadata.width, loaded.metadata.height),
            loaded.rotation(),
        )
    }

    /// Report the viewport size. Returns true when the display was rebuilt.
    ///
    /// A change in either dimension is a hard reset: gestures are discarded
    /// and every matrix is rebuilt.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> bool {
        if self.viewport == Some((width, height)) {
            return false;
        }
        self.viewport = Some((width, height));
        self.invalidate();
        self.display.is_some()
    }

    /// Rebuild the display from the current image and viewport, discarding
    /// gestures. Leaves the session not ready when either is missing or the
    /// matrices cannot be built.
    pub fn invalidate(&mut self) {
        self.display = None;
        let (Some(image), Some(viewport)) = (self.image, self.viewport) else {
            return;
        };

        match self.build_display(&image, viewport) {
            Ok(display) => {
                log::debug!(
                    "display rebuilt for {:?} in {:?}: crop window {:?}",
                    image.image_rect,
                    viewport,
                    display.crop_in_screen
                );
                self.display = Some(display);
            }
            Err(e) => log::error!("failed to build display matrices: {}", e),
        }
    }

    fn build_display(
        &self,
        image: &ImageSpace,
        (width, height): (u32, u32),
    ) -> Result<DisplayState, CropError> {
        let mut screen = Rect::from_size(width as f32, height as f32);
        screen.inset(self.config.margin_horizontal, self.config.margin_vertical);
        if screen.is_empty() {
            return Err(CropError::NotReady);
        }

        let initial_display = image_to_screen(&image.image_rect, &screen, image.rotation)?;
        let crop_rect = Rect::from_size(
            self.config.output_width as f32,
            self.config.output_height as f32,
        );
        let display_crop = crop_to_screen(&crop_rect, &screen)?;

        Ok(DisplayState {
            frame: CropFrame {
                image_rect: image.image_rect,
                original_bounds: image.original_bounds,
                crop_rect,
                initial_display,
                display_crop,
            },
            gesture: GestureTransformState::new(
                initial_display,
                self.config.min_pinch_distance,
                self.config.min_gesture_scale,
            ),
            crop_in_screen: display_crop.map_rect(&crop_rect),
        })
    }

    pub fn is_ready(&self) -> bool {
        self.display.is_some()
    }

    /// Feed a touch event. Returns true when the host should redraw.
    pub fn handle_touch(&mut self, event: TouchEvent) -> bool {
        match self.display.as_mut() {
            Some(display) => display.gesture.handle(event),
            None => false,
        }
    }

    pub fn gesture_state(&self) -> GestureState {
        self.display
            .as_ref()
            .map(|d| d.gesture.state())
            .unwrap_or_default()
    }

    /// Matrix the host draws the preview with.
    pub fn display_image_matrix(&self) -> Option<AffineMatrix> {
        self.display.as_ref().map(|d| *d.gesture.display_matrix())
    }

    /// The crop window in viewport coordinates.
    pub fn crop_in_screen(&self) -> Option<Rect> {
        self.display.as_ref().map(|d| d.crop_in_screen)
    }

    /// Resolve the current crop.
    pub fn crop_result(&self) -> Result<CropResult, CropError> {
        let display = self.display.as_ref().ok_or(CropError::NotReady)?;
        resolve_crop(&display.frame, display.gesture.pair())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn ready_session(output: u32, preview: (u32, u32), viewport: (u32, u32)) -> CropSession {
        let mut session = CropSession::new(CropConfig::with_output(output, output)).unwrap();
        session.load(preview, preview, Rotation::Deg0).unwrap();
        assert!(session.set_viewport(viewport.0, viewport.1));
        session
    }

    fn drag(session: &mut CropSession, dx: f32, dy: f32) {
        let start = Point::new(200.0, 200.0);
        session.handle_touch(TouchEvent::Down(start));
        session.handle_touch(TouchEvent::Move {
            first: Point::new(start.x + dx, start.y + dy),
            second: None,
        });
        session.handle_touch(TouchEvent::Up);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            CropSession::new(CropConfig::with_output(0, 10)),
            Err(CropError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_not_ready_until_image_and_viewport() {
        let mut session = CropSession::new(CropConfig::default()).unwrap();
        assert!(matches!(session.crop_result(), Err(CropError::NotReady)));
        assert!(!session.handle_touch(TouchEvent::Down(Point::new(1.0, 1.0))));

        session.load((400, 200), (400, 200), Rotation::Deg0).unwrap();
        assert!(!session.is_ready());
        session.set_viewport(400, 400);
        assert!(session.is_ready());
    }

    #[test]
    fn test_zero_bounds_fail_to_load() {
        let mut session = CropSession::new(CropConfig::default()).unwrap();
        let err = session.load((0, 200), (400, 200), Rotation::Deg0).unwrap_err();
        assert!(matches!(err, CropError::LoadFailure(_)));
        assert!(session
            .load((400, 200), (400, 0), Rotation::Deg0)
            .is_err());
    }

    #[test]
    fn test_crop_window_and_result() {
        let session = ready_session(100, (400, 200), (400, 400));
        assert_eq!(
            session.crop_in_screen(),
            Some(Rect::new(150.0, 150.0, 250.0, 250.0))
        );

        let result = session.crop_result().unwrap();
        assert!(result
            .raw_intersection_rect
            .approx_eq(&Rect::new(150.0, 50.0, 250.0, 150.0), 1e-3));
    }

    #[test]
    fn test_drag_changes_crop() {
        let mut session = ready_session(100, (400, 200), (400, 400));
        drag(&mut session, -100.0, 0.0);
        let result = session.crop_result().unwrap();
        assert!(result
            .raw_intersection_rect
            .approx_eq(&Rect::new(250.0, 50.0, 350.0, 150.0), 1e-3));
    }

    #[test]
    fn test_viewport_change_resets_gestures() {
        let mut session = ready_session(100, (400, 200), (400, 400));
        let initial = session.display_image_matrix().unwrap();
        drag(&mut session, 30.0, 0.0);
        assert_ne!(session.display_image_matrix(), Some(initial));

        // Same size: no reset.
        assert!(!session.set_viewport(400, 400));
        assert_ne!(session.display_image_matrix(), Some(initial));

        // Only the width changes: still a reset.
        assert!(session.set_viewport(500, 400));
        let rebuilt = session.display_image_matrix().unwrap();
        assert_eq!(rebuilt.tx, 50.0);
        assert_eq!(session.gesture_state(), GestureState::Idle);
    }

    #[test]
    fn test_margins_shrink_fitting_area() {
        let mut config = CropConfig::with_output(1000, 1000);
        config.margin_horizontal = 100.0;
        config.margin_vertical = 100.0;
        let mut session = CropSession::new(config).unwrap();
        session.load((400, 400), (400, 400), Rotation::Deg0).unwrap();
        session.set_viewport(1000, 1000);

        assert_eq!(
            session.crop_in_screen(),
            Some(Rect::new(100.0, 100.0, 900.0, 900.0))
        );
    }

    #[test]
    fn test_viewport_smaller_than_margins_is_not_ready() {
        let mut config = CropConfig::default();
        config.margin_horizontal = 300.0;
        let mut session = CropSession::new(config).unwrap();
        session.load((400, 400), (400, 400), Rotation::Deg0).unwrap();
        assert!(!session.set_viewport(500, 500));
        assert!(matches!(session.crop_result(), Err(CropError::NotReady)));
    }

    #[test]
    fn test_rotated_load() {
        let mut session = CropSession::new(CropConfig::with_output(200, 200)).unwrap();
        session.load((400, 200), (800, 400), Rotation::Deg90).unwrap();
        session.set_viewport(1000, 1000);

        let result = session.crop_result().unwrap();
        assert!(result
            .raw_intersection_rect
            .approx_eq(&Rect::new(100.0, 0.0, 300.0, 200.0), 1e-2));
        assert!(result
            .true_crop
            .approx_eq(&Rect::new(200.0, 0.0, 600.0, 400.0), 1e-2));
    }

    #[test]
    fn test_repeated_pinch_out_still_resolves() {
        let mut session = ready_session(100, (400, 400), (400, 400));
        for _ in 0..6 {
            let anchor = Point::new(0.0, 200.0);
            session.handle_touch(TouchEvent::Down(anchor));
            session.handle_touch(TouchEvent::PointerDown {
                first: anchor,
                second: Point::new(400.0, 200.0),
            });
            session.handle_touch(TouchEvent::Move {
                first: anchor,
                second: Some(Point::new(2.0, 200.0)),
            });
            session.handle_touch(TouchEvent::Up);
            assert!(session.crop_result().is_ok());
        }
        let sx = session.display_image_matrix().unwrap().sx;
        assert!((sx - 0.05).abs() < 1e-4, "sx = {}", sx);
    }

    #[test]
    fn test_unload_keeps_viewport() {
        let mut session = ready_session(100, (400, 200), (400, 400));
        session.unload();
        assert!(!session.is_ready());
        session.load((400, 200), (400, 200), Rotation::Deg0).unwrap();
        assert!(session.is_ready());
    }

    #[test]
    fn test_new_load_discards_gestures() {
        let mut session = ready_session(100, (400, 200), (400, 400));
        let initial = session.display_image_matrix().unwrap();
        drag(&mut session, 30.0, 0.0);
        session.load((400, 200), (400, 200), Rotation::Deg0).unwrap();
        assert_eq!(session.display_image_matrix(), Some(initial));
    }
}
