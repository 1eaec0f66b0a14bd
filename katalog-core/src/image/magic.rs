//! Content-type detection from leading magic bytes.

use tracing::debug;

/// Why [`sniff_content_type`] could not name a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SniffFailure {
    /// Too few bytes to hold any recognized header.
    TooSmall,
    UnrecognizedFormat,
}

/// Detect the image format of `data` from its header bytes.
pub fn sniff_content_type(data: &[u8]) -> Result<&'static str, SniffFailure> {
    if data.len() < 2 {
        return Err(SniffFailure::TooSmall);
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Ok("image/jpeg");
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Ok("image/png");
    }

    // WebP: RIFF....WEBP
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return Ok("image/webp");
    }

    // AVIF: ftyp box with avif/avis brand
    if data.len() >= 12
        && &data[4..8] == b"ftyp"
        && (&data[8..12] == b"avif" || &data[8..12] == b"avis")
    {
        return Ok("image/avif");
    }

    // GIF87a / GIF89a
    if data.starts_with(b"GIF8") {
        return Ok("image/gif");
    }

    if data.starts_with(b"BM") {
        return Ok("image/bmp");
    }

    let head = String::from_utf8_lossy(&data[..data.len().min(256)]);
    let head = head.trim_start();
    if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
    {
        return Ok("image/svg+xml");
    }

    debug!(
        "Unrecognized image format, first 8 bytes: {:02X?}",
        &data[..8.min(data.len())]
    );
    Err(SniffFailure::UnrecognizedFormat)
}

/// Canonical content type for a declared data-URI mime, if it is one we
/// serve.
pub fn normalize_declared(mime: &str) -> Option<&'static str> {
    match mime.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some("image/jpeg"),
        "image/png" => Some("image/png"),
        "image/gif" => Some("image/gif"),
        "image/webp" => Some("image/webp"),
        "image/avif" => Some("image/avif"),
        "image/bmp" => Some("image/bmp"),
        "image/svg+xml" => Some("image/svg+xml"),
        _ => None,
    }
}
