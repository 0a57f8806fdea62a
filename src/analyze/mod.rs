// src/analyze/mod.rs
//! Text analysis primitives: normalization, keyword expansion, the keyword
//! matching rule and issue classification.

pub mod issues;
pub mod keywords;
pub mod matching;
pub mod text;

// Re-export convenient types.
pub use crate::analyze::issues::IssueClassifier;
pub use crate::analyze::keywords::{expand_acronyms, label_variants, KeywordSet};
pub use crate::analyze::matching::{count_keyword_hits, matches_keyword};
pub use crate::analyze::text::{compact_text, normalize_text};
