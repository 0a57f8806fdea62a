// src/analyze/keywords.rs
//! Keyword expansion: raw topic labels -> deduplicated, matchable keyword set.
//!
//! Per label:
//! 1) split on `\ / · ( ) , &`, keeping the whole label too,
//! 2) spell uppercase acronyms with Korean letter names ("SK" -> "에스케이"),
//! 3) normalize and drop ignored / too short entries,
//! 4) add the compact form next to the normalized one.

use std::collections::{BTreeSet, HashSet};

use crate::analyze::text::{compact_text, contains_hangul, is_ascii_alnum, normalize_text};
use crate::config::KeywordRules;

const LABEL_SEPARATORS: &[char] = &['\\', '/', '·', '(', ')', ',', '&'];

/// Korean name of a Latin capital letter.
pub fn letter_name(c: char) -> Option<&'static str> {
    let name = match c {
        'A' => "에이",
        'B' => "비",
        'C' => "씨",
        'D' => "디",
        'E' => "이",
        'F' => "에프",
        'G' => "지",
        'H' => "에이치",
        'I' => "아이",
        'J' => "제이",
        'K' => "케이",
        'L' => "엘",
        'M' => "엠",
        'N' => "엔",
        'O' => "오",
        'P' => "피",
        'Q' => "큐",
        'R' => "알",
        'S' => "에스",
        'T' => "티",
        'U' => "유",
        'V' => "브이",
        'W' => "더블유",
        'X' => "엑스",
        'Y' => "와이",
        'Z' => "지",
        _ => return None,
    };
    Some(name)
}

/// Spell a run of capitals/digits in Korean. Digits pass through; any other
/// character aborts the whole run.
pub fn acronym_to_korean(run: &str) -> Option<String> {
    let mut out = String::with_capacity(run.len() * 6);
    for c in run.chars() {
        if c.is_ascii_digit() {
            out.push(c);
        } else {
            out.push_str(letter_name(c)?);
        }
    }
    (!out.is_empty()).then_some(out)
}

/// Replace acronym runs (`[A-Z0-9]+`) with their Korean spelling.
///
/// Single-letter runs only qualify when the value already contains Hangul
/// ("SK하이닉스", "D램"). Returns `None` when nothing changed.
pub fn expand_acronyms(value: &str) -> Option<String> {
    let allow_single = contains_hangul(value);
    let is_run_char = |c: char| c.is_ascii_uppercase() || c.is_ascii_digit();

    let mut out = String::with_capacity(value.len() * 2);
    let mut run = String::new();
    let mut replaced = false;

    let mut flush = |run: &mut String, out: &mut String| {
        if run.is_empty() {
            return;
        }
        let eligible = allow_single || run.chars().count() >= 2;
        match eligible.then(|| acronym_to_korean(run)).flatten() {
            Some(korean) => {
                replaced = true;
                out.push_str(&korean);
            }
            None => out.push_str(run),
        }
        run.clear();
    };

    for c in value.chars() {
        if is_run_char(c) {
            run.push(c);
        } else {
            flush(&mut run, &mut out);
            out.push(c);
        }
    }
    flush(&mut run, &mut out);

    (replaced && out != value).then_some(out)
}

/// Raw variants of one label: the trimmed label, its separator-split parts
/// and the acronym-expanded form of each.
pub fn label_variants(label: &str) -> Vec<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut variants: Vec<String> = vec![trimmed.to_string()];
    for part in trimmed.split(LABEL_SEPARATORS) {
        let part = part.trim();
        if !part.is_empty() && !variants.iter().any(|v| v == part) {
            variants.push(part.to_string());
        }
    }

    let expanded: Vec<String> = variants.iter().filter_map(|v| expand_acronyms(v)).collect();
    for e in expanded {
        if !variants.contains(&e) {
            variants.push(e);
        }
    }
    variants
}

/// Deduplicated lowercase keywords built from one or more labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    entries: BTreeSet<String>,
}

impl KeywordSet {
    pub fn build<I, S>(labels: I, rules: &KeywordRules) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allow: HashSet<&str> = rules
            .short_ascii_allowlist
            .iter()
            .map(String::as_str)
            .collect();
        let ignored: HashSet<&str> = rules.ignored.iter().map(String::as_str).collect();

        // Compact forms go through the same gate: "m&a" must not leak "ma".
        let admissible = |kw: &str| -> bool {
            if kw.chars().count() < 2 || ignored.contains(kw) {
                return false;
            }
            !(is_ascii_alnum(kw) && kw.len() < rules.min_ascii_length && !allow.contains(kw))
        };

        let mut entries = BTreeSet::new();
        for label in labels {
            for variant in label_variants(label.as_ref()) {
                let normalized = normalize_text(&variant);
                if !admissible(&normalized) {
                    continue;
                }
                let compact = compact_text(&normalized);
                if compact != normalized && admissible(&compact) {
                    entries.insert(compact);
                }
                entries.insert(normalized);
            }
        }
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.entries.contains(keyword)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a KeywordSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
