use std::path::{Path, PathBuf};

use crate::error::{InvalidEntry, ThumbnailError};
use crate::state::data::Thumbnail;

/// Largest upload accepted as a thumbnail (10MB)
pub const MAX_THUMBNAIL_BYTES: u64 = 10 * 1024 * 1024;

/// Extensions offered by the file picker
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Turn uploaded bytes into a thumbnail.
///
/// The media type is sniffed from the bytes themselves, so a renamed text
/// file is rejected even if it ends in `.png`. Bytes are stored as-is; no
/// resizing or re-encoding happens here.
pub fn ingest(bytes: Vec<u8>) -> Result<Thumbnail, InvalidEntry> {
    if bytes.is_empty() {
        return Err(InvalidEntry::Thumbnail("file is empty".to_string()));
    }

    let format = image::guess_format(&bytes)
        .map_err(|_| InvalidEntry::Thumbnail("please select an image file".to_string()))?;

    let media_type = format.to_mime_type().to_string();
    tracing::debug!(%media_type, size = bytes.len(), "accepted thumbnail");

    Ok(Thumbnail::Data { media_type, bytes })
}

/// Read a thumbnail candidate from disk.
///
/// Either the whole file is returned or an error is; callers never see a
/// partial payload.
pub async fn load(path: PathBuf) -> Result<Vec<u8>, ThumbnailError> {
    let size = tokio::fs::metadata(&path)
        .await
        .map_err(|source| read_error(&path, source))?
        .len();

    if size > MAX_THUMBNAIL_BYTES {
        return Err(ThumbnailError::TooLarge {
            path,
            size,
            limit: MAX_THUMBNAIL_BYTES,
        });
    }

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| read_error(&path, source))?;

    tracing::info!(path = %path.display(), size = bytes.len(), "loaded thumbnail file");
    Ok(bytes)
}

fn read_error(path: &Path, source: std::io::Error) -> ThumbnailError {
    ThumbnailError::Read {
        path: path.to_path_buf(),
        source,
    }
}
