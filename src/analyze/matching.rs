// src/analyze/matching.rs
//! Keyword matching rule used by the topic matcher and issue classifier.

use crate::analyze::text::is_ascii_alnum;

/// Minimum length for an ASCII keyword to be tried against compact text.
pub const MIN_COMPACT_ASCII_LEN: usize = 3;

/// ASCII keywords must stand alone ("ai" hits "ai chip", not "paid");
/// anything else (Hangul etc.) is plain containment.
pub fn matches_keyword(text: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    if is_ascii_alnum(keyword) {
        return contains_ascii_word(text, keyword);
    }
    text.contains(keyword)
}

/// Case-insensitive search for `word` not touching another ASCII letter/digit.
///
/// `word` is ASCII, so any byte-level hit sits on char boundaries and bytes of
/// multi-byte neighbours never count as alphanumeric.
fn contains_ascii_word(text: &str, word: &str) -> bool {
    let hay = text.as_bytes();
    let needle = word.as_bytes();
    if needle.len() > hay.len() {
        return false;
    }
    (0..=hay.len() - needle.len()).any(|start| {
        let end = start + needle.len();
        hay[start..end].eq_ignore_ascii_case(needle)
            && (start == 0 || !hay[start - 1].is_ascii_alphanumeric())
            && (end == hay.len() || !hay[end].is_ascii_alphanumeric())
    })
}

/// Number of keywords that hit `text`, falling back to `compact_text` for
/// matches split by punctuation ("k-pop" vs "kpop").
pub fn count_keyword_hits<'a, I>(text: &str, compact_text: &str, keywords: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    keywords
        .into_iter()
        .filter(|kw| keyword_hits(text, compact_text, kw))
        .count()
}

fn keyword_hits(text: &str, compact_text: &str, keyword: &str) -> bool {
    if matches_keyword(text, keyword) {
        return true;
    }
    if is_ascii_alnum(keyword) {
        return keyword.len() >= MIN_COMPACT_ASCII_LEN && compact_text.contains(keyword);
    }
    !keyword.is_empty() && compact_text.contains(keyword)
}
