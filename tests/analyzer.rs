// Integration tests for the sentiment normalizer and report.
// Classifiers are fakes so no model is downloaded.

use sentiment_service::core::PipelineError;
use sentiment_service::sentiment::{
    classifier, report, ClassScores, LabelScores, ModelVariant, Sentiment, SentimentAnalyzer,
    SentimentResult,
};

fn fixed(pairs: &'static [(&'static str, f32)]) -> impl Fn(&str) -> sentiment_service::core::Result<LabelScores> {
    move |_| Ok(pairs.iter().map(|(l, c)| (l.to_string(), *c)).collect())
}

#[test]
fn binary_end_to_end_examples() {
    let positive = SentimentAnalyzer::new(
        classifier::from_fn(fixed(&[("POSITIVE", 0.98)])),
        ModelVariant::Binary,
    );
    assert_eq!(
        positive.analyze("I love it!"),
        SentimentResult {
            sentiment: Sentiment::Positive,
            score: 0.98,
            scores: None,
            error: None,
        }
    );

    let negative = SentimentAnalyzer::new(
        classifier::from_fn(fixed(&[("NEGATIVE", 0.95)])),
        ModelVariant::Binary,
    );
    let result = negative.analyze("This is terrible");
    assert_eq!(result.sentiment, Sentiment::Negative);
    assert_eq!(result.score, 0.05);
    assert_eq!(result.error, None);
}

#[test]
fn binary_negative_score_is_inverted() {
    for c in [0.5_f32, 0.6, 0.731, 0.9999, 1.0] {
        let analyzer = SentimentAnalyzer::new(
            classifier::from_fn(move |_| Ok(vec![("LABEL_0".to_string(), c)])),
            ModelVariant::Binary,
        );
        let result = analyzer.analyze("text");
        let expected = ((1.0 - c as f64) * 10_000.0).round() / 10_000.0;
        assert_eq!(result.sentiment, Sentiment::Negative);
        assert_eq!(result.score, expected, "confidence {c}");
    }
}

#[test]
fn multilingual_empty_input() {
    let analyzer = SentimentAnalyzer::new(
        classifier::from_fn(fixed(&[("positive", 1.0)])),
        ModelVariant::Multilingual,
    );
    assert_eq!(
        analyzer.analyze(""),
        SentimentResult {
            sentiment: Sentiment::Neutral,
            score: 0.33,
            scores: Some(ClassScores {
                positive: 0.33,
                neutral: 0.34,
                negative: 0.33,
            }),
            error: Some("Empty text".to_string()),
        }
    );
}

#[test]
fn whitespace_is_empty_and_silent_in_report() {
    for variant in [ModelVariant::Binary, ModelVariant::Multilingual] {
        let analyzer = SentimentAnalyzer::new(
            classifier::from_fn(fixed(&[("POSITIVE", 0.9)])),
            variant,
        );
        for text in ["", "   ", "\n\t"] {
            let result = analyzer.analyze(text);
            assert_eq!(result.sentiment, Sentiment::Neutral);
            assert_eq!(result.error.as_deref(), Some("Empty text"));
            let markdown = report::render(&result, variant);
            assert!(!markdown.contains("Note"), "{markdown}");
            assert!(!markdown.contains("Empty text"), "{markdown}");
        }
    }
}

#[test]
fn multilingual_scores_have_three_keys_and_dominant_wins() {
    let analyzer = SentimentAnalyzer::new(
        classifier::from_fn(fixed(&[
            ("negative", 0.123456),
            ("neutral", 0.2),
            ("positive", 0.676544),
        ])),
        ModelVariant::Multilingual,
    );
    let result = analyzer.analyze("Harika bir gün!");
    let scores = result.scores.expect("three-class scores");

    assert_eq!(result.sentiment, Sentiment::Positive);
    assert_eq!(result.score, scores.positive);
    assert_eq!(scores.negative, 0.1235);
    assert_eq!(scores.neutral, 0.2);
    assert_eq!(scores.positive, 0.6765);

    let json = serde_json::to_value(&result).unwrap();
    let keys: Vec<&String> = json["scores"].as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 3);
}

#[test]
fn multilingual_ties_prefer_positive_then_neutral() {
    let analyzer = SentimentAnalyzer::new(
        classifier::from_fn(fixed(&[("negative", 0.4), ("neutral", 0.4), ("positive", 0.2)])),
        ModelVariant::Multilingual,
    );
    assert_eq!(analyzer.analyze("so so").sentiment, Sentiment::Neutral);

    let analyzer = SentimentAnalyzer::new(
        classifier::from_fn(fixed(&[("LABEL_0", 0.5), ("LABEL_2", 0.5)])),
        ModelVariant::Multilingual,
    );
    assert_eq!(analyzer.analyze("so so").sentiment, Sentiment::Positive);
}

#[test]
fn classifier_failure_matches_empty_fallback_except_error() {
    for variant in [ModelVariant::Binary, ModelVariant::Multilingual] {
        let failing = SentimentAnalyzer::new(
            classifier::from_fn(|_| Err(PipelineError::Unexpected("CUDA out of memory".into()))),
            variant,
        );
        let failed = failing.analyze("hello there");
        let empty = failing.analyze("");

        assert_eq!(failed.error.as_deref(), Some("CUDA out of memory"));
        assert_eq!(
            SentimentResult {
                error: None,
                ..failed.clone()
            },
            SentimentResult {
                error: None,
                ..empty
            }
        );
        assert!(report::render(&failed, variant).ends_with("\n\n⚠️ Note: CUDA out of memory"));
    }
}

#[test]
fn try_analyze_separates_empty_input_from_failures() {
    let analyzer = SentimentAnalyzer::new(
        classifier::from_fn(|_| Err(PipelineError::Tokenization("bad input".into()))),
        ModelVariant::Binary,
    );
    assert!(analyzer.try_analyze(" ").unwrap_err().is_empty_input());

    let err = analyzer.try_analyze("text").unwrap_err();
    assert!(!err.is_empty_input());
    assert_eq!(err.to_string(), "bad input");
}

#[test]
fn analyze_is_idempotent() {
    let analyzer = SentimentAnalyzer::new(
        classifier::from_fn(fixed(&[("negative", 0.2), ("neutral", 0.3), ("positive", 0.5)])),
        ModelVariant::Multilingual,
    );
    let first = analyzer.analyze("Great service, highly recommend!");
    let second = analyzer.analyze("Great service, highly recommend!");
    assert_eq!(first, second);
}

#[test]
fn non_empty_inputs_always_get_a_canonical_label() {
    let labels: &[&str] = &[
        "POSITIVE",
        "NEGATIVE",
        "LABEL_0",
        "LABEL_1",
        "LABEL_2",
        "LABEL_9",
        "positive",
        "neutral",
        "negative",
        "Very Negative",
        "3",
        "mixed",
    ];
    for variant in [ModelVariant::Binary, ModelVariant::Multilingual] {
        for label in labels {
            let label = label.to_string();
            let analyzer = SentimentAnalyzer::new(
                classifier::from_fn(move |_| Ok(vec![(label.clone(), 0.8)])),
                variant,
            );
            let result = analyzer.analyze("anything");
            assert!(Sentiment::ALL.contains(&result.sentiment));
            assert!((0.0..=1.0).contains(&result.score));
            assert_eq!(result.error, None);
        }
    }
}

#[test]
fn record_json_shape() {
    let analyzer = SentimentAnalyzer::new(
        classifier::from_fn(fixed(&[("POSITIVE", 0.98)])),
        ModelVariant::Binary,
    );
    let json = serde_json::to_value(report::to_record(&analyzer.analyze("I love it!"))).unwrap();
    assert_eq!(json, serde_json::json!({ "sentiment": "positive", "score": 0.98 }));
}
