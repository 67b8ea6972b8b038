//! Reading encoded bytes from disk or over HTTP, and the codec bridge.

mod codec;

use std::path::Path;

use crate::{ImageConfig, ImageError};

pub use codec::{decode, detect_format, encode};

/// Read an image file, enforcing the configured size limit.
pub fn read_file(path: &Path, config: &ImageConfig) -> Result<Vec<u8>, ImageError> {
    if !path.is_file() {
        return Err(ImageError::ResourceNotFound(path.display().to_string()));
    }

    let size = std::fs::metadata(path)?.len();
    check_limit(size, config)?;

    log::debug!("Reading {} ({} bytes)", path.display(), size);
    Ok(std::fs::read(path)?)
}

/// Download an image with a blocking client.
///
/// A 404 response maps to [`ImageError::ResourceNotFound`]; every other
/// transport or status failure maps to [`ImageError::Network`].
#[cfg(feature = "remote")]
pub fn fetch_url(url: &str, config: &ImageConfig) -> Result<Vec<u8>, ImageError> {
    use std::time::Duration;

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.download_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build()
        .map_err(|e| ImageError::Network(format!("Failed to create HTTP client: {}", e)))?;

    log::debug!("Fetching {}", url);
    let response = client.get(url).send().map_err(|e| map_reqwest_error(e, url))?;

    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ImageError::ResourceNotFound(url.to_string()));
    }
    if !status.is_success() {
        return Err(ImageError::Network(format!("HTTP {} for {}", status.as_u16(), url)));
    }

    if let Some(length) = response.content_length() {
        check_limit(length, config)?;
    }

    let bytes = response.bytes().map_err(|e| map_reqwest_error(e, url))?;
    check_limit(bytes.len() as u64, config)?;

    Ok(bytes.to_vec())
}

#[cfg(feature = "remote")]
fn map_reqwest_error(e: reqwest::Error, url: &str) -> ImageError {
    if e.is_timeout() {
        ImageError::Network(format!("Timed out fetching {}", url))
    } else if e.is_connect() {
        ImageError::Network(format!("Could not connect to {}: {}", url, e))
    } else {
        ImageError::Network(format!("Request to {} failed: {}", url, e))
    }
}

fn check_limit(size: u64, config: &ImageConfig) -> Result<(), ImageError> {
    if size > config.max_file_size {
        return Err(ImageError::ResourceLimit(format!(
            "{:.2} MB exceeds the {:.2} MB limit",
            size as f64 / 1024.0 / 1024.0,
            config.max_file_size as f64 / 1024.0 / 1024.0
        )));
    }
    Ok(())
}
