//! Fixtures shared by unit tests across modules.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

pub const RED: [u8; 3] = [255, 0, 0];
pub const BLUE: [u8; 3] = [0, 0, 255];

/// A `width` x `height` image, left half red and right half blue.
pub fn two_color_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb(RED)
        } else {
            Rgb(BLUE)
        }
    })
}

/// `two_color_image` encoded in `format`.
pub fn encode_fixture(image: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

pub fn two_color_png(width: u32, height: u32) -> Vec<u8> {
    encode_fixture(&two_color_image(width, height), ImageFormat::Png)
}

/// Channel-wise closeness for colors that went through resampling or JPEG.
pub fn assert_color_near(actual: [u8; 3], expected: [u8; 3], tolerance: u8) {
    for i in 0..3 {
        let diff = (actual[i] as i16 - expected[i] as i16).unsigned_abs();
        assert!(
            diff <= tolerance as u16,
            "color {:?} not within {} of {:?}",
            actual,
            tolerance,
            expected
        );
    }
}
