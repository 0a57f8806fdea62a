// src/analyze/text.rs
//! Text normalization shared by keyword building, pool dedup and matching.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));
static RE_ENTITIES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)&(?:#[0-9]+|#x[0-9a-f]+|[a-z][a-z0-9]*);").expect("entity regex")
});
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Strip tags and entity tokens, collapse whitespace, trim, lowercase.
///
/// Tags and entities are replaced by a space, so removing one never glues
/// its neighbours into a new token. The function is idempotent.
pub fn normalize_text(raw: &str) -> String {
    let out = RE_TAGS.replace_all(raw, " ");
    let out = RE_ENTITIES.replace_all(&out, " ");
    let out = RE_WS.replace_all(&out, " ");
    out.trim().to_lowercase()
}

/// Characters dropped by [`compact_text`] (besides whitespace).
pub const COMPACT_SEPARATORS: &[char] = &['\\', '/', '·', '(', ')', ',', '&', '-'];

/// Remove whitespace and separator punctuation so "k-pop" and "kpop" meet.
pub fn compact_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !COMPACT_SEPARATORS.contains(c))
        .collect()
}

/// Non-empty and made only of ASCII letters/digits.
pub fn is_ascii_alnum(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Any Hangul jamo (ㄱ-ㅎ) or syllable (가-힣).
pub fn contains_hangul(s: &str) -> bool {
    s.chars()
        .any(|c| matches!(c, '\u{3131}'..='\u{314E}' | '\u{AC00}'..='\u{D7A3}'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_entities_and_case() {
        let s = "  <b>SK하이닉스</b>&quot;HBM&quot;  공급&amp;계약\n\t확대 ";
        assert_eq!(normalize_text(s), "sk하이닉스 hbm 공급 계약 확대");
    }

    #[test]
    fn empty_is_ok() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   <br/>  "), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "<p>Hello&nbsp;<b>World</b></p>",
            "<<a>b> &AMP;amp; x",
            "&am&amp;p; K-POP   (엔터)",
            "İstanbul ÅNGSTRÖM &#39;quoted&#x27;",
            "a<b",
            "\u{00A0}반도체\u{3000}수출 급증",
        ];
        for s in samples {
            let once = normalize_text(s);
            assert_eq!(normalize_text(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn compact_removes_separators_and_spaces() {
        assert_eq!(compact_text("k-pop (엔터) a/b·c, d&e \\ f"), "kpop엔터abcdef");
        assert_eq!(compact_text("kpop"), "kpop");
    }

    #[test]
    fn ascii_and_hangul_classes() {
        assert!(is_ascii_alnum("k2"));
        assert!(!is_ascii_alnum("k-pop"));
        assert!(!is_ascii_alnum(""));
        assert!(!is_ascii_alnum("sk하이닉스"));
        assert!(contains_hangul("SK하이닉스"));
        assert!(contains_hangul("ㅋ"));
        assert!(!contains_hangul("SK Hynix"));
    }
}
