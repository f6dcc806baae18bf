//! Slug derivation from page names.

use std::sync::LazyLock;

use regex::Regex;

/// Runs of characters that are neither letters nor digits.
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap());

/// Slug used when a name has no letters or digits.
const EMPTY_SLUG: &str = "n-a";

/// Convert a display name into a url-safe slug.
///
/// Lowercases the name and collapses every run of non letter/digit
/// characters into a single `-`. Leading and trailing separators are
/// trimmed. Names without any letter or digit produce `n-a`.
///
/// # Example
///
/// ```
/// assert_eq!(trellis_site::slugify("About Us!"), "about-us");
/// assert_eq!(trellis_site::slugify("---"), "n-a");
/// ```
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let slug = SEPARATOR_RE.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        EMPTY_SLUG.to_owned()
    } else {
        slug.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_simple_name() {
        assert_eq!(slugify("About"), "about");
    }

    #[test]
    fn test_slugify_collapses_separator_runs() {
        assert_eq!(slugify("Our  Team -- 2024"), "our-team-2024");
    }

    #[test]
    fn test_slugify_trims_separators() {
        assert_eq!(slugify("  (Contact) "), "contact");
    }

    #[test]
    fn test_slugify_keeps_unicode_letters() {
        assert_eq!(slugify("Über Café"), "über-café");
    }

    #[test]
    fn test_slugify_empty_name() {
        assert_eq!(slugify(""), "n-a");
        assert_eq!(slugify("?!"), "n-a");
    }
}
