//! Text cleanup for strings pulled out of the schedule markup.

/// Known entity and mis-decoding artifacts, applied in order.
///
/// This is a denylist, not an entity decoder. Numeric character references
/// other than `&#39;` pass through untouched.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("&#39;", "'"),
    ("\u{e2}\u{20ac}\u{2122}", "'"), // "â€™", a UTF-8 right quote read as cp1252
    ("&amp;", "&"),
    ("&quot;", "'"),
];

/// Replace the known entity/encoding artifacts with plain text.
pub fn normalize(text: &str) -> String {
    REPLACEMENTS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Trim and collapse every whitespace run (newlines included) to one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_known_artifacts() {
        assert_eq!(normalize("Don&#39;t panic"), "Don't panic");
        assert_eq!(normalize("It\u{e2}\u{20ac}\u{2122}s"), "It's");
        assert_eq!(normalize("Rock &amp; Roll"), "Rock & Roll");
        assert_eq!(normalize("&quot;quoted&quot;"), "'quoted'");
    }

    #[test]
    fn leaves_other_references_alone() {
        assert_eq!(normalize("caf&#233; &lt;b&gt;"), "caf&#233; &lt;b&gt;");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn amp_is_decoded_after_apostrophe() {
        // "&amp;#39;" only loses one level of escaping
        assert_eq!(normalize("&amp;#39;"), "&#39;");
    }

    #[test]
    fn collapse_joins_lines() {
        assert_eq!(
            collapse_whitespace("\n   First line\r\n  second\tline  \n"),
            "First line second line"
        );
        assert_eq!(collapse_whitespace("a\u{a0}b"), "a b");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
