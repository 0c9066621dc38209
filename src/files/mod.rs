// files/mod.rs - upload filename handling
//
// Extension allow-list, path-safe sanitizing and storage key generation for
// uploaded images.

use uuid::Uuid;

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Lowercased text after the last `.`, if any.
pub fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// True when `filename` ends in one of the accepted image extensions.
pub fn allowed_ext(filename: &str) -> bool {
    extension(filename)
        .map(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Reduce a client-supplied filename to a flat, ASCII-only name.
///
/// Path separators become word breaks, whitespace runs collapse to `_`,
/// anything outside `[A-Za-z0-9_.-]` is dropped and leading or trailing
/// dots and underscores are trimmed. The result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let flattened: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Storage key for an upload: a random token followed by the sanitized name.
pub fn unique_filename(sanitized: &str) -> String {
    format!("{}.{}", Uuid::new_v4().simple(), sanitized)
}

/// MIME type served for an accepted extension.
pub fn mime_for(filename: &str) -> Option<&'static str> {
    match extension(filename)?.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

/// Public URL of a stored image.
pub fn image_url(unique: &str) -> String {
    format!("/api/image/{}", unique)
}
