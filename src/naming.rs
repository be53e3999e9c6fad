//! Filename sanitization, collision-free naming, and upload type policy.

/// File extensions (lowercase, dot included) accepted for upload and
/// recognized when scanning the photo directory.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp"];

/// Declared content types accepted for upload.
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Sanitizes a client-supplied filename to prevent traversal and unsafe
/// path characters.
///
/// Keeps only the final path segment, lower-cases the extension, and
/// replaces every base character outside `[A-Za-z0-9_.-]` with `_`. Never
/// fails; the result may have an empty base or be empty entirely, in which
/// case upload validation rejects it before any I/O happens.
pub fn sanitize(raw: &str) -> String {
    let base = std::path::Path::new(raw)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");

    let (stem, ext) = split_extension(base);

    let stem: String = stem
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '_'
            }
        })
        .collect();

    format!("{stem}{}", ext.to_ascii_lowercase())
}

/// Resolves `sanitized` to a name not currently taken.
///
/// Returns the input unchanged when free; otherwise appends `_1`, `_2`, ...
/// to the stem until a free name is found. Callers are responsible for
/// making the check-then-reserve sequence atomic; the photo store runs it
/// only from its single writer task.
pub fn uniquify<F>(is_taken: F, sanitized: &str) -> String
where
    F: Fn(&str) -> bool,
{
    if !is_taken(sanitized) {
        return sanitized.to_owned();
    }

    let (stem, ext) = split_extension(sanitized);
    let mut counter = 1u64;
    loop {
        let candidate = format!("{stem}_{counter}{ext}");
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Returns `true` when the lowercase filename ends in a recognized image
/// extension.
pub fn has_allowed_extension(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Returns `true` when the declared content type parses and is in the
/// image allowlist.
pub fn is_allowed_mime(declared: &str) -> bool {
    let Ok(mime) = declared.parse::<mime::Mime>() else {
        return false;
    };
    ALLOWED_MIME_TYPES
        .iter()
        .any(|allowed| mime.essence_str().eq_ignore_ascii_case(allowed))
}

/// Content type served for a stored photo, derived from its extension.
pub fn content_type_for(name: &str) -> &'static str {
    let (_, ext) = split_extension(name);
    match ext.to_ascii_lowercase().as_str() {
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".gif" => "image/gif",
        ".webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Splits a filename into stem and extension (dot included).
///
/// A leading dot is part of the stem, so dotfiles have no extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}
