//! Case-insensitive text helpers for editor ids and model paths.

/// ASCII case-insensitive substring test. An empty needle always matches.
pub fn icontains(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Text filters that name model files are matched against inventory model
/// paths instead of keywords.
pub fn is_path_pattern(text: &str) -> bool {
    text.contains('\\') || text.contains('/') || icontains(text, ".nif")
}
