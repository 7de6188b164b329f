//! Slugs used as category keys.

/// Convert a display name to a URL-safe kebab-case slug.
///
/// Lowercases the input and collapses every run of characters outside
/// `[a-z0-9]` into a single `-`. Leading and trailing separators are dropped,
/// so `"  Close Friends!! "` and `"close-friends"` map to the same key.
///
/// Example: "Work / Clients" → "work-clients"
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
