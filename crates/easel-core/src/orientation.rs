//! EXIF orientation tags and the corrections that undo them.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use exif::{In, Reader, Tag};
use serde::{Deserialize, Serialize};

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Mirrored across the top-left to bottom-right diagonal.
    Transpose = 5,
    /// Needs a 90 degree clockwise turn to display upright.
    Rotate90CW = 6,
    /// Mirrored across the top-right to bottom-left diagonal.
    Transverse = 7,
    /// Needs a 90 degree counter-clockwise turn to display upright.
    Rotate270CW = 8,
}

/// One step of an orientation fix, applied in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correction {
    FlipHorizontal,
    /// Counter-clockwise rotation in degrees.
    Rotate(f64),
}

impl Orientation {
    /// Returns true if correcting this orientation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }

    /// The steps that bring an image with this tag upright.
    pub fn corrections(self) -> &'static [Correction] {
        use Correction::{FlipHorizontal, Rotate};

        match self {
            Orientation::Normal => &[],
            Orientation::FlipHorizontal => &[FlipHorizontal],
            Orientation::Rotate180 => &[Rotate(180.0)],
            Orientation::FlipVertical => &[Rotate(180.0), FlipHorizontal],
            Orientation::Transpose => &[Rotate(-90.0), FlipHorizontal],
            Orientation::Rotate90CW => &[Rotate(-90.0)],
            Orientation::Transverse => &[Rotate(90.0), FlipHorizontal],
            Orientation::Rotate270CW => &[Rotate(90.0)],
        }
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

fn orientation_tag(exif: &exif::Exif) -> Orientation {
    match exif
        .get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
    {
        Some(value @ 1..=8) => Orientation::from(value),
        Some(value) => {
            log::warn!("Ignoring out-of-range EXIF orientation {}", value);
            Orientation::Normal
        }
        None => Orientation::Normal,
    }
}

/// Read the orientation tag from an encoded image.
///
/// Returns `Orientation::Normal` if no EXIF data is found or the tag is
/// missing or malformed.
pub fn orientation_from_bytes(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => orientation_tag(&exif),
        Err(e) => {
            log::trace!("No EXIF orientation: {}", e);
            Orientation::Normal
        }
    }
}

/// Read the orientation tag from an image file.
///
/// Unreadable files count as having no tag.
pub fn read_orientation(path: &Path) -> Orientation {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            log::trace!("Cannot read orientation of {}: {}", path.display(), e);
            return Orientation::Normal;
        }
    };

    match Reader::new().read_from_container(&mut BufReader::new(file)) {
        Ok(exif) => orientation_tag(&exif),
        Err(e) => {
            log::trace!("No EXIF orientation in {}: {}", path.display(), e);
            Orientation::Normal
        }
    }
}
