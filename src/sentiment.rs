//! Keyword-polarity sentiment.
//!
//! Each text is positive when it contains a positive keyword and no negative
//! one, negative in the reverse case, neutral otherwise. The score is the
//! positive share of the polar weight, or the neutral score when nothing is
//! polar. Keywords match as plain lowercase substrings (no word boundaries).

use crate::config::LexiconCfg;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone)]
pub struct SentimentLexicon {
    positive: Vec<String>,
    negative: Vec<String>,
    neutral_score: f64,
}

impl SentimentLexicon {
    pub fn new(cfg: &LexiconCfg, neutral_score: f64) -> Self {
        let lower = |v: &[String]| -> Vec<String> {
            v.iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect()
        };
        Self {
            positive: lower(&cfg.positive),
            negative: lower(&cfg.negative),
            neutral_score,
        }
    }

    pub fn neutral_score(&self) -> f64 {
        self.neutral_score
    }

    /// `text` must already be lowercase.
    pub fn polarity(&self, text: &str) -> Polarity {
        let has_pos = self.positive.iter().any(|k| text.contains(k.as_str()));
        let has_neg = self.negative.iter().any(|k| text.contains(k.as_str()));
        match (has_pos, has_neg) {
            (true, false) => Polarity::Positive,
            (false, true) => Polarity::Negative,
            _ => Polarity::Neutral,
        }
    }

    /// Weighted variant used by the pooled pipeline. Texts are expected to be
    /// normalized (lowercase) already; empty texts are skipped.
    pub fn score_weighted<'a, I>(&self, items: I) -> f64
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut positive = 0.0_f64;
        let mut negative = 0.0_f64;
        for (text, weight) in items {
            if text.is_empty() {
                continue;
            }
            match self.polarity(text) {
                Polarity::Positive => positive += weight,
                Polarity::Negative => negative += weight,
                Polarity::Neutral => {}
            }
        }
        self.ratio(positive, negative)
    }

    /// Unweighted variant for single-query lookups over raw texts.
    pub fn score_texts<S: AsRef<str>>(&self, texts: &[S]) -> f64 {
        let lowered: Vec<String> = texts.iter().map(|t| t.as_ref().to_lowercase()).collect();
        self.score_weighted(lowered.iter().map(|t| (t.as_str(), 1.0)))
    }

    fn ratio(&self, positive: f64, negative: f64) -> f64 {
        if positive == 0.0 && negative == 0.0 {
            return self.neutral_score;
        }
        (positive / (positive + negative)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> SentimentLexicon {
        SentimentLexicon::new(
            &LexiconCfg {
                positive: vec!["급증".into(), "계약".into(), "Record High".into()],
                negative: vec!["급락".into(), "소송".into()],
            },
            0.5,
        )
    }

    #[test]
    fn polarity_requires_one_side_only() {
        let l = lexicon();
        assert_eq!(l.polarity("수출 급증"), Polarity::Positive);
        assert_eq!(l.polarity("주가 급락"), Polarity::Negative);
        assert_eq!(l.polarity("계약 해지 소송"), Polarity::Neutral);
        assert_eq!(l.polarity("보합"), Polarity::Neutral);
    }

    #[test]
    fn no_polar_hits_is_exactly_neutral() {
        let l = lexicon();
        assert_eq!(l.score_texts(&["보합세", "관망"]), 0.5);
        assert_eq!(l.score_texts::<&str>(&[]), 0.5);
        assert_eq!(l.score_weighted([("", 3.0)]), 0.5);
    }

    #[test]
    fn weighted_ratio_and_bounds() {
        let l = lexicon();
        let s = l.score_weighted([("수출 급증", 3.0), ("주가 급락", 1.0), ("보합", 9.0)]);
        assert!((s - 0.75).abs() < 1e-12);
        for items in [
            vec![("급증", 1.0)],
            vec![("급락", 2.0)],
            vec![("급증", 0.2), ("급락", 0.7), ("소송 계약", 5.0)],
        ] {
            let s = l.score_weighted(items);
            assert!((0.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn unweighted_lowercases_raw_text() {
        let l = lexicon();
        assert_eq!(l.score_texts(&["KOSPI RECORD HIGH"]), 1.0);
        // substring match, no word boundaries here
        assert_eq!(l.score_texts(&["recordhighs"]), 0.5);
        assert_eq!(l.score_texts(&["a record highway"]), 1.0);
    }
}
