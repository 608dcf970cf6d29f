use std::sync::OnceLock;

use regex::Regex;

/// Extension used when neither the URL nor the content type gives one
pub const DEFAULT_IMAGE_EXTENSION: &str = ".jpg";

const FALLBACK_FILE_STEM: &str = "image";
const MAX_EXTENSION_LEN: usize = 5;

/// Make `name` safe to use as a file name.
///
/// Spaces become underscores and anything outside `[A-Za-z0-9_.-]` is dropped.
pub fn sanitize_filename(name: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_\-.]").unwrap());

    let spaced = name.trim().replace(' ', "_");
    let cleaned = re.replace_all(&spaced, "").to_string();

    if cleaned.is_empty() {
        FALLBACK_FILE_STEM.to_string()
    } else {
        cleaned
    }
}

/// Extension (with leading dot) of the last path segment of `url`
pub fn extension_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.last()?;
    let dot = segment.rfind('.')?;

    // ".bashrc"-style names have no extension
    if dot == 0 {
        return None;
    }

    let ext = &segment[dot..];
    if ext.len() > 1 && ext.len() <= MAX_EXTENSION_LEN {
        Some(ext.to_string())
    } else {
        None
    }
}

/// Extension for an image media type, ignoring parameters such as `charset`
pub fn extension_from_content_type(content_type: &str) -> Option<&'static str> {
    let media_type = content_type.split(';').next()?.trim().to_lowercase();

    match media_type.as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        "image/gif" => Some(".gif"),
        "image/webp" => Some(".webp"),
        "image/bmp" | "image/x-ms-bmp" => Some(".bmp"),
        "image/svg+xml" => Some(".svg"),
        "image/tiff" => Some(".tiff"),
        "image/avif" => Some(".avif"),
        "image/x-icon" | "image/vnd.microsoft.icon" => Some(".ico"),
        _ => None,
    }
}

/// Pick the extension for a downloaded image: URL first, then content type
pub fn image_extension(url: &str, content_type: Option<&str>) -> String {
    extension_from_url(url)
        .or_else(|| {
            content_type
                .and_then(extension_from_content_type)
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_IMAGE_EXTENSION.to_string())
}

/// File name for a topic's image, appending `ext` unless already present
pub fn image_file_name(topic: &str, ext: &str) -> String {
    let stem = sanitize_filename(topic);
    if stem.to_lowercase().ends_with(&ext.to_lowercase()) {
        stem
    } else {
        format!("{stem}{ext}")
    }
}
