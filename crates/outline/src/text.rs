//! Text-shape classifiers shared by the title and heading extractors.
//!
//! All casing rules here are explicit and English/Latin-script oriented: the
//! heuristics downstream ("page" token, title-case) only make sense for
//! English documents, so no locale handling is attempted.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::HeadingLevel;

/// Collapse whitespace runs to a single space and trim the ends.
pub fn clean_text(text: &str) -> String {
    static RE_WS: OnceLock<Regex> = OnceLock::new();
    let re = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    re.replace_all(text.trim(), " ").to_string()
}

/// Normalized form used for title/heading equality and deduplication:
/// lowercased and trimmed.
pub fn normalize_key(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Uppercase check: at least one cased letter, and no lowercase letters.
pub fn is_all_uppercase(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Title-case check: uppercase letters appear only at word starts, lowercase
/// letters only after another cased letter, and at least one cased letter is
/// present.
pub fn is_title_case(text: &str) -> bool {
    let mut has_cased = false;
    let mut prev_cased = false;
    for c in text.chars() {
        let cased = c.is_lowercase() || c.is_uppercase();
        if c.is_uppercase() {
            if prev_cased {
                return false;
            }
            has_cased = true;
        } else if c.is_lowercase() {
            if !prev_cased {
                return false;
            }
            has_cased = true;
        }
        prev_cased = cased;
    }
    has_cased
}

/// Classify a numbered section prefix, which wins over font size:
/// `1. Foo` is H1 (at most 6 words), `1.2 Foo` is H2 (at most 8),
/// `1.2.3 Foo` is H3 (at most 10).
pub fn numbered_heading_level(text: &str) -> Option<HeadingLevel> {
    static RE_H1: OnceLock<Regex> = OnceLock::new();
    static RE_H2: OnceLock<Regex> = OnceLock::new();
    static RE_H3: OnceLock<Regex> = OnceLock::new();
    let re_h1 = RE_H1.get_or_init(|| Regex::new(r"^\d+\.\s").unwrap());
    let re_h2 = RE_H2.get_or_init(|| Regex::new(r"^\d+\.\d+\s").unwrap());
    let re_h3 = RE_H3.get_or_init(|| Regex::new(r"^\d+\.\d+\.\d+\s").unwrap());

    let words = word_count(text);
    if re_h1.is_match(text) && words <= 6 {
        Some(HeadingLevel::H1)
    } else if re_h2.is_match(text) && words <= 8 {
        Some(HeadingLevel::H2)
    } else if re_h3.is_match(text) && words <= 10 {
        Some(HeadingLevel::H3)
    } else {
        None
    }
}

/// Numbered form questions ("12. Amount of advance required.") look like
/// numbered headings but carry a full clause. A short numeric prefix followed
/// by five or more words is form content, not a section heading.
pub fn is_form_field(text: &str) -> bool {
    static RE_PREFIX: OnceLock<Regex> = OnceLock::new();
    let re = RE_PREFIX.get_or_init(|| Regex::new(r"^\d{1,2}\.").unwrap());
    re.is_match(text.trim()) && word_count(text) >= 5
}

/// Lines of only digits, dots, dashes, slashes, and whitespace (dates, page
/// markers, section separators) are never headings.
fn is_digits_and_punct(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[\d\s\.\-/]+$").unwrap());
    re.is_match(text)
}

/// Stoplist of header/footer boilerplate, matched against lowercased text.
fn is_stoplisted(lower: &str) -> bool {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [
            r"^\d{1,3}$",         // bare page number
            r"^page \d+",         // "page 4 of 12"
            r"^\d{4}$",           // bare year
            r"^©.*copyright.*$",  // copyright line
            r"^version.*\d+.*$",  // version line
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    });
    patterns.iter().any(|re| re.is_match(lower))
}

/// Shape test: does this line of text look like a heading?
///
/// The text must have a plausible heading length and survive the boilerplate
/// stoplist; it then qualifies either by font size (at least 1.05x the body
/// size) or by shape (all-uppercase, title-case, trailing colon, or at most
/// ten words).
pub fn is_likely_heading(text: &str, line_size: f32, body_size: f32) -> bool {
    let text = clean_text(text);

    let len = text.chars().count();
    if len < 2 || len > 200 {
        return false;
    }

    if is_digits_and_punct(&text) {
        return false;
    }

    if is_stoplisted(&text.to_lowercase()) {
        return false;
    }

    let shaped = is_all_uppercase(&text)
        || is_title_case(&text)
        || text.ends_with(':')
        || word_count(&text) <= 10;

    line_size >= body_size * 1.05 || shaped
}
