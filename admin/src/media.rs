//! Image references and local uploads.

use faraway_admin_api::FilePart;
use std::io;
use std::path::Path;
use url::Url;

/// Whether `value` is an absolute `http` or `https` URL
#[must_use]
pub fn is_http_url(value: &str) -> bool {
    Url::parse(value.trim()).is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
}

/// Whether `value` can be shown as an image (absolute `http`/`https` URL)
///
/// Relative paths, `data:` URIs and blank strings are rejected.
#[must_use]
pub fn is_valid_image_url(value: &str) -> bool {
    is_http_url(value)
}

/// MIME type guessed from a file extension
#[must_use]
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Read a local file as an upload
///
/// # Errors
///
/// Returns the I/O error when the file cannot be read.
pub async fn load_file(path: &Path) -> io::Result<FilePart> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
    tracing::debug!(path = %path.display(), size = bytes.len(), "Loaded upload");
    Ok(FilePart::new(file_name, content_type_for(path), bytes))
}
