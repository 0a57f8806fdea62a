// src/analyze/issues.rs
//! Issue-type classifier: category -> expanded keyword set, built once.

use crate::analyze::keywords::KeywordSet;
use crate::analyze::matching::count_keyword_hits;
use crate::config::{IssueCategoryCfg, KeywordRules};

#[derive(Debug, Clone)]
pub struct IssueClassifier {
    categories: Vec<(String, KeywordSet)>,
    fallback: String,
}

impl IssueClassifier {
    pub fn new(categories: &[IssueCategoryCfg], fallback: &str, rules: &KeywordRules) -> Self {
        let categories = categories
            .iter()
            .map(|c| (c.name.clone(), KeywordSet::build(&c.keywords, rules)))
            .collect();
        Self {
            categories,
            fallback: fallback.to_string(),
        }
    }

    /// All categories hit by the normalized text, in table order; the
    /// fallback category alone when nothing hits.
    pub fn classify(&self, text: &str, compact_text: &str) -> Vec<String> {
        let hits: Vec<String> = self
            .categories
            .iter()
            .filter(|(_, keywords)| !keywords.is_empty())
            .filter(|(_, keywords)| count_keyword_hits(text, compact_text, keywords.iter()) > 0)
            .map(|(name, _)| name.clone())
            .collect();
        if hits.is_empty() {
            vec![self.fallback.clone()]
        } else {
            hits
        }
    }
}
