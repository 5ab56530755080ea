//! EXIF orientation probing.

use std::io::Cursor;

use exif::{In, Reader, Tag};

use super::Orientation;

/// Read the EXIF orientation tag from encoded image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or the tag
/// cannot be read. A missing tag is the common case for PNG sources.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(e) => {
            log::trace!("no EXIF orientation: {}", e);
            Orientation::Normal
        }
    }
}
