// AnomalyDash - platform/fs.rs
//
// Filesystem helpers for image uploads: size checks, format sniffing,
// and bounded reads.

use crate::util::error::PredictError;
use std::io::Read;
use std::path::Path;

/// Number of leading bytes read for magic-number format detection.
const SNIFF_BYTES: usize = 64;

/// Facts about an image file gathered before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageProbe {
    /// MIME type sent with the multipart `image` part.
    pub mime_type: &'static str,
    /// File size in bytes at probe time.
    pub size_bytes: u64,
}

/// Check that `path` is a readable image no larger than `max_bytes`.
///
/// The format is identified from the file's magic bytes first and from its
/// extension second, so a correctly named file with an unusual header is
/// still accepted.
pub fn probe_image(path: &Path, max_bytes: u64) -> Result<ImageProbe, PredictError> {
    let metadata = std::fs::metadata(path).map_err(|e| PredictError::ReadImage {
        path: path.to_path_buf(),
        source: e,
    })?;
    if !metadata.is_file() {
        return Err(PredictError::UnsupportedImage {
            path: path.to_path_buf(),
        });
    }
    let size_bytes = metadata.len();
    if size_bytes > max_bytes {
        return Err(PredictError::ImageTooLarge {
            path: path.to_path_buf(),
            size: size_bytes,
            max: max_bytes,
        });
    }

    let mut header = Vec::with_capacity(SNIFF_BYTES);
    std::fs::File::open(path)
        .and_then(|f| f.take(SNIFF_BYTES as u64).read_to_end(&mut header))
        .map_err(|e| PredictError::ReadImage {
            path: path.to_path_buf(),
            source: e,
        })?;

    let format = image::guess_format(&header)
        .ok()
        .or_else(|| image::ImageFormat::from_path(path).ok())
        .ok_or_else(|| PredictError::UnsupportedImage {
            path: path.to_path_buf(),
        })?;

    tracing::debug!(
        path = %path.display(),
        format = ?format,
        size = size_bytes,
        "Image probed"
    );

    Ok(ImageProbe {
        mime_type: format.to_mime_type(),
        size_bytes,
    })
}

/// Read the whole image for upload, re-checking the size limit since the
/// file may have changed after it was selected.
pub fn read_image(path: &Path, max_bytes: u64) -> Result<Vec<u8>, PredictError> {
    let bytes = std::fs::read(path).map_err(|e| PredictError::ReadImage {
        path: path.to_path_buf(),
        source: e,
    })?;
    let size = bytes.len() as u64;
    if size > max_bytes {
        return Err(PredictError::ImageTooLarge {
            path: path.to_path_buf(),
            size,
            max: max_bytes,
        });
    }
    Ok(bytes)
}
