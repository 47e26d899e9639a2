//! Photo loading for `hazard submit --image`.

use std::path::Path;

use anyhow::{Context, Result, bail};
use hazard_domain::ImageAttachment;

/// MIME type for an image file extension
pub fn image_content_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let content_type = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "bmp" => "image/bmp",
        _ => return None,
    };
    Some(content_type)
}

/// Read an image from disk; non-image extensions are refused
pub fn load_attachment(path: &Path) -> Result<ImageAttachment> {
    let Some(content_type) = image_content_type(path) else {
        bail!("{} does not look like an image", path.display());
    };
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(ImageAttachment::new(file_name, content_type, bytes))
}
