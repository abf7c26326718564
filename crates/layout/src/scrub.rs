//! Span-text cleanup applied at extraction time.

use unicode_normalization::UnicodeNormalization;

/// Typographic ligatures expanded to their letter sequences so downstream
/// word counting and casing checks see plain text.
const LIGATURES: &[(&str, &str)] = &[
    ("\u{FB00}", "ff"),
    ("\u{FB01}", "fi"),
    ("\u{FB02}", "fl"),
    ("\u{FB03}", "ffi"),
    ("\u{FB04}", "ffl"),
];

/// Clean a decoded span text: NFC normalization, ligature expansion, and
/// removal of the Unicode replacement character left by undecodable bytes.
pub fn scrub_text(text: &str) -> String {
    let mut result: String = text.nfc().collect();

    for (ligature, replacement) in LIGATURES {
        if result.contains(ligature) {
            result = result.replace(ligature, replacement);
        }
    }

    if result.contains('\u{FFFD}') {
        result = result.replace('\u{FFFD}', "");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough() {
        assert_eq!(scrub_text("Hello world."), "Hello world.");
    }

    #[test]
    fn ligatures_expanded() {
        assert_eq!(scrub_text("\u{FB01}nd the \u{FB04}uent"), "find the ffluent");
    }

    #[test]
    fn replacement_char_removed() {
        assert_eq!(scrub_text("Intro\u{FFFD}duction"), "Introduction");
    }

    #[test]
    fn nfc_normalization() {
        // e + combining acute collapses to a single code point.
        assert_eq!(scrub_text("caf\u{0065}\u{0301}"), "caf\u{00E9}");
    }

    #[test]
    fn empty() {
        assert_eq!(scrub_text(""), "");
    }
}
