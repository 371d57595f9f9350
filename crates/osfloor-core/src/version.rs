//! Build number extraction from announcement titles.

use regex::Regex;
use std::sync::OnceLock;

fn build_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9]+\.[0-9]+\.[0-9]+").expect("static regex is valid"))
}

/// First three-component dotted version in `title`, e.g. `17.4.1`.
pub fn extract_build(title: &str) -> Option<&str> {
    build_pattern().find(title).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_release_notes_title() {
        assert_eq!(extract_build("iOS 26 Release Notes - 17.4.1"), Some("17.4.1"));
    }

    #[test]
    fn takes_first_match() {
        assert_eq!(extract_build("iOS 26.0.1 supersedes 26.0.0"), Some("26.0.1"));
    }

    #[test]
    fn ignores_two_component_versions() {
        assert_eq!(extract_build("iOS 26.1 (23B85)"), None);
        assert_eq!(extract_build("iOS 26 Release Notes"), None);
    }

    #[test]
    fn only_ascii_digits_count() {
        assert_eq!(extract_build("iOS 26 \u{661}\u{667}.\u{664}.\u{661}"), None);
        assert_eq!(extract_build("iOS 26 \u{FF11}7.4.1"), Some("7.4.1"));
    }

    #[test]
    fn four_component_version_yields_leading_three() {
        assert_eq!(extract_build("build 26.0.1.4"), Some("26.0.1"));
    }
}
