//! Error type shared by every fallible handle operation.

use thiserror::Error;

/// Errors raised by loading, converting, encoding and saving images.
///
/// Geometry and color parameters are normalized rather than rejected, so the
/// variants here only cover structural problems: unknown formats, missing
/// resources, missing configuration and codec or transport failures.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The format token or the image bytes do not name a supported format.
    #[error("Image type not supported: {0}")]
    UnsupportedFormat(String),

    /// The file or remote resource does not exist.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// No output directory could be resolved for saving.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A color string that is neither hex (1, 3 or 6 digits) nor `r,g,b`.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// The bytes claim a supported format but could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The encoder rejected the raster.
    #[error("Encode error: {0}")]
    Encode(String),

    /// The input is larger than the configured limit.
    #[error("Resource limit exceeded: {0}")]
    ResourceLimit(String),

    /// Transport failure while fetching a remote image.
    #[error("Network error: {0}")]
    Network(String),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ImageError::UnsupportedFormat("tiff".to_string());
        assert_eq!(err.to_string(), "Image type not supported: tiff");

        let err = ImageError::Configuration("Set a path to save the file".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: Set a path to save the file"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ImageError = io.into();
        assert!(matches!(err, ImageError::Io(_)));
    }
}
