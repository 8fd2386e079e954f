//! Rule-based classifier used when no model can be loaded.
//!
//! Counts English and Turkish sentiment keywords (whole words, case-insensitive),
//! a handful of emoji, and exclamation marks. The outcome is expressed the way
//! a model adapter would: the dominant label carries its confidence and the
//! remainder is split between the other two labels.

use super::classifier::{Classifier, LabelScores};
use super::round_to;
use crate::core::error::{PipelineError, Result};
use regex::Regex;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "happy", "excellent", "wonderful", "amazing", "love", "perfect", "best",
    "awesome", "fantastic", "brilliant", "nice", "fine", "beautiful", "superb", "outstanding",
    "magnificent", "delightful", "pleased", "glad", "joyful", "thank", "thanks",
    "güzel", "harika", "mükemmel", "süper", "mutlu", "seviyorum", "teşekkür", "teşekkürler",
    "çok iyi", "bayıldım", "muhteşem", "fevkalade", "olağanüstü", "şahane", "müthiş",
    "harikulade",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "sad", "angry", "terrible", "awful", "hate", "worst", "horrible", "disappointing",
    "poor", "disgusting", "annoying", "frustrated", "upset", "unhappy", "depressed", "miserable",
    "pathetic", "useless", "waste", "fail", "failed",
    "kötü", "üzgün", "kızgın", "berbat", "nefret", "rezalet", "felaket", "bıktım", "sinirliyim",
    "mutsuz", "hüsran", "hayal kırıklığı", "zavallı", "işe yaramaz", "boşa",
];

const NEUTRAL_WORDS: &[&str] = &[
    "okay", "ok", "fine", "normal", "average", "moderate", "acceptable", "adequate", "fair",
    "standard", "typical",
    "idare eder", "fena değil", "orta", "eh işte", "olabilir", "şöyle böyle", "ne iyi ne kötü",
];

const POSITIVE_EMOJI: &[&str] = &["😊", "😀", "🎉", "❤️", "👍", "✨"];
const NEGATIVE_EMOJI: &[&str] = &["😢", "😞", "😠", "😤", "👎", "💔"];
const NEUTRAL_EMOJI: &[&str] = &["😐", "🤔", "😶"];

/// Keyword-counting [`Classifier`]. Reports `POSITIVE`, `NEUTRAL` and
/// `NEGATIVE` labels.
pub struct KeywordClassifier {
    positive: Vec<Regex>,
    negative: Vec<Regex>,
    neutral: Vec<Regex>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Counts {
    positive: usize,
    negative: usize,
    neutral: usize,
    exclamations: usize,
}

impl KeywordClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            positive: compile(POSITIVE_WORDS)?,
            negative: compile(NEGATIVE_WORDS)?,
            neutral: compile(NEUTRAL_WORDS)?,
        })
    }

    fn count(&self, text: &str) -> Counts {
        let lower = text.to_lowercase();
        let matches = |patterns: &[Regex]| patterns.iter().filter(|re| re.is_match(&lower)).count();
        let has_any = |emoji: &[&str]| emoji.iter().any(|e| text.contains(e));

        let mut counts = Counts {
            positive: matches(self.positive.as_slice()),
            negative: matches(self.negative.as_slice()),
            neutral: matches(self.neutral.as_slice()),
            exclamations: text.chars().filter(|&c| c == '!').count(),
        };
        if has_any(POSITIVE_EMOJI) {
            counts.positive += 2;
        }
        if has_any(NEGATIVE_EMOJI) {
            counts.negative += 2;
        }
        if has_any(NEUTRAL_EMOJI) {
            counts.neutral += 1;
        }
        counts
    }

    /// Label plus a positivity score in `[0, 1]`.
    fn score(counts: Counts) -> (&'static str, f64) {
        let total = counts.positive + counts.negative + counts.neutral;
        if total == 0 {
            return if counts.exclamations > 1 {
                ("POSITIVE", 0.65)
            } else {
                ("NEUTRAL", 0.50)
            };
        }

        let ratio = |n: usize| n as f64 / total as f64;
        let (pos, neg, neu) = (
            ratio(counts.positive),
            ratio(counts.negative),
            ratio(counts.neutral),
        );

        if pos > neg && pos > neu {
            let bonus = (counts.positive as f64 * 0.08).min(0.35);
            let excitement = (counts.exclamations as f64 * 0.02).min(0.05);
            ("POSITIVE", (0.60 + bonus + excitement).min(0.98))
        } else if neg > pos && neg > neu {
            let penalty = (counts.negative as f64 * 0.08).min(0.35);
            ("NEGATIVE", (0.40 - penalty).max(0.02))
        } else if counts.positive > counts.negative {
            ("NEUTRAL", 0.55 + (counts.positive as f64 * 0.05).min(0.15))
        } else if counts.negative > counts.positive {
            ("NEUTRAL", 0.45 - (counts.negative as f64 * 0.05).min(0.15))
        } else {
            ("NEUTRAL", 0.50)
        }
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Result<LabelScores> {
        let counts = self.count(text);
        let (label, positivity) = Self::score(counts);
        let positivity = round_to(positivity, 2);

        // Confidence in the reported label, not positivity.
        let confidence = match label {
            "NEGATIVE" => 1.0 - positivity,
            "NEUTRAL" => positivity.max(1.0 - positivity),
            _ => positivity,
        };
        let rest = (1.0 - confidence) / 2.0;

        Ok(["POSITIVE", "NEUTRAL", "NEGATIVE"]
            .iter()
            .map(|&l| {
                let c = if l == label { confidence } else { rest };
                (l.to_string(), c as f32)
            })
            .collect())
    }

    fn name(&self) -> String {
        "keyword".to_string()
    }
}

fn compile(words: &[&str]) -> Result<Vec<Regex>> {
    words
        .iter()
        .map(|w| {
            Regex::new(&format!(r"\b{}\b", regex::escape(w))).map_err(|e| {
                PipelineError::Unexpected(format!("Invalid keyword pattern '{w}': {e}"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::{ModelVariant, Sentiment, SentimentAnalyzer};

    fn top(scores: &LabelScores) -> &str {
        scores
            .iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .map(|(l, _)| l.as_str())
            .unwrap()
    }

    #[test]
    fn counts_whole_words_only() {
        let classifier = KeywordClassifier::new().unwrap();
        let counts = classifier.count("Goodness, a sadder day");
        assert_eq!(counts.positive, 0);
        assert_eq!(counts.negative, 0);
    }

    #[test]
    fn turkish_keywords() {
        let classifier = KeywordClassifier::new().unwrap();
        assert_eq!(top(&classifier.classify("Bu harika!").unwrap()), "POSITIVE");
        assert_eq!(
            top(&classifier.classify("Çok kötü bir deneyim.").unwrap()),
            "NEGATIVE"
        );
    }

    #[test]
    fn emoji_add_weight() {
        let classifier = KeywordClassifier::new().unwrap();
        let counts = classifier.count("see you 👍");
        assert_eq!(counts.positive, 2);
    }

    #[test]
    fn no_keywords_with_excitement_is_positive() {
        let classifier = KeywordClassifier::new().unwrap();
        let scores = classifier.classify("Wow!! Really!!").unwrap();
        assert_eq!(top(&scores), "POSITIVE");
    }

    #[test]
    fn negative_score_round_trips_through_binary_normalizer() {
        // Two negative words: 0.40 - 0.16 = 0.24 positivity.
        let analyzer = SentimentAnalyzer::new(KeywordClassifier::new().unwrap(), ModelVariant::Binary);
        let result = analyzer.analyze("bad and awful service");
        assert_eq!(result.sentiment, Sentiment::Negative);
        assert_eq!(result.score, 0.24);
    }

    #[test]
    fn positive_score_formula() {
        // One positive word, one exclamation: 0.60 + 0.08 + 0.02.
        let analyzer = SentimentAnalyzer::new(KeywordClassifier::new().unwrap(), ModelVariant::Binary);
        let result = analyzer.analyze("This is great!");
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.score, 0.7);
    }

    #[test]
    fn mixed_keywords_are_neutral() {
        let analyzer =
            SentimentAnalyzer::new(KeywordClassifier::new().unwrap(), ModelVariant::Multilingual);
        let result = analyzer.analyze("good but bad");
        assert_eq!(result.sentiment, Sentiment::Neutral);
    }
}
