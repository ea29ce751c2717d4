//! Language inference from file extensions.

const EXTENSIONS: &[(&str, &str)] = &[
    (".jsx", "javascript"),
    (".js", "javascript"),
    (".html", "javascript"),
    (".tsx", "typescript"),
    (".ts", "typescript"),
    (".py", "python"),
    (".css", "css"),
    (".json", "json"),
    (".md", "markdown"),
    (".png", "image"),
    (".jpg", "image"),
    (".jpeg", "image"),
];

/// Language label used when no extension matches.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Language label for image assets.
pub const IMAGE_LANGUAGE: &str = "image";

/// Infers a language label from `path`, ignoring case.
#[must_use]
pub fn infer_language(path: &str) -> &'static str {
    let lowered = path.to_lowercase();
    EXTENSIONS
        .iter()
        .find(|(extension, _)| lowered.ends_with(extension))
        .map_or(UNKNOWN_LANGUAGE, |(_, language)| language)
}
