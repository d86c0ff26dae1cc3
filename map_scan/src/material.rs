use std::sync::OnceLock;

use regex::Regex;

/// Namespaces shipped with the base game; never packaged with a map.
pub const BUILTIN_NAMESPACES: [&str; 5] = [
    "common/",
    "common_alphascale/",
    "sfx/",
    "liquids/",
    "effects/",
];

const TEXTURES_PREFIX: &str = "textures/";

/// Slash-delimited path-like token: word runs joined by `/`, `_` or `-`
/// with at least one `/`.
pub(crate) fn path_token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:(?:[0-9A-Za-z_]+[/_\-]*)+/(?:[0-9A-Za-z_]+[/_\-]*)*)+")
            .expect("path token pattern is valid")
    })
}

/// Leftmost path-like token on the line, if any.
pub fn find_path_token(line: &str) -> Option<&str> {
    path_token_pattern().find(line).map(|found| found.as_str())
}

/// Extracts the material referenced by a line, with the `textures/` prefix
/// stripped. Returns an empty string when the line has no path token or the
/// token belongs to a built-in namespace.
pub fn get_material(line: &str) -> String {
    match find_path_token(line) {
        Some(token) if is_custom_material(token) => format_path(token),
        _ => String::new(),
    }
}

pub fn is_custom_material(material: &str) -> bool {
    !BUILTIN_NAMESPACES
        .iter()
        .any(|namespace| material.contains(namespace))
}

/// Removes the first `textures/` segment.
pub fn format_path(material: &str) -> String {
    material.replacen(TEXTURES_PREFIX, "", 1)
}
