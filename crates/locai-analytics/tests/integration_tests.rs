//! Integration tests for the analytics toolkit.
//!
//! These tests exercise the public facade end to end, the way a calling
//! layer would: JSON-shaped inputs in, typed results (or typed errors) out.

use chrono::{TimeZone, Utc};
use locai_analytics::{
    AnomalyConfig, AnomalyMethod, AttributeValue, BusinessData, CentroidInit, DataPoint,
    FeatureNormalizer, ForecastConfig, ForecastMethod, InsightKind, Interaction, ItemAttributes,
    RecommendationConfig, RecommendationMethod, SegmentationConfig, SentimentLabel, TextAnalysis,
    TextConfig, TextMethod, Toolkit, UserInteractions,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_business() -> BusinessData {
    let raw = std::fs::read_to_string(fixtures_path().join("business.json"))
        .expect("Failed to read business fixture");
    serde_json::from_str(&raw).expect("Failed to parse business fixture")
}

fn points(values: &[f64]) -> Vec<DataPoint> {
    values.iter().copied().map(DataPoint::from).collect()
}

fn alternating(len: usize) -> Vec<f64> {
    [100.0, 110.0, 90.0, 120.0]
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

// ============================================================================
// Forecasting
// ============================================================================

#[test]
fn test_seasonal_forecast_scenario() {
    let config = ForecastConfig::builder().seasonal_periods(7).build().unwrap();
    let forecast = Toolkit::new()
        .forecast_time_series(&points(&alternating(14)), 7, &config)
        .unwrap();

    assert_eq!(forecast.len(), 7);
    assert!(forecast.iter().all(|v| v.is_finite()));
}

#[test]
fn test_forecast_length_matches_periods() {
    let toolkit = Toolkit::new();
    let history = points(&alternating(21));
    for method in [ForecastMethod::MovingAverage, ForecastMethod::ExponentialSmoothing] {
        let config = ForecastConfig::builder().method(method).build().unwrap();
        for periods in [0, 1, 7, 30] {
            let forecast = toolkit
                .forecast_time_series(&history, periods, &config)
                .unwrap();
            assert_eq!(forecast.len(), periods, "{method:?} with {periods} periods");
        }
    }
}

#[test]
fn test_constant_series_forecast() {
    let forecast = Toolkit::new()
        .forecast_time_series(&points(&[75.0; 28]), 14, &ForecastConfig::default())
        .unwrap();
    for value in forecast {
        assert!((value - 75.0).abs() < 1e-6, "got {value}");
    }
}

#[test]
fn test_short_history_reports_required_minimum() {
    let err = Toolkit::new()
        .forecast_time_series(&points(&alternating(13)), 7, &ForecastConfig::default())
        .unwrap_err();

    assert_eq!(err.error_code(), "INSUFFICIENT_DATA");
    assert!(err.to_string().contains("need at least 14"));
    assert!(err.is_recoverable());
}

#[test]
fn test_oversized_season_is_invalid_config() {
    let config = ForecastConfig {
        seasonal_periods: usize::MAX / 2 + 1,
        ..ForecastConfig::default()
    };
    let err = Toolkit::new()
        .forecast_time_series(&points(&alternating(21)), 7, &config)
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_CONFIG");
}

#[test]
fn test_unvalidated_oversized_season_reports_insufficient_data() {
    let forecaster = locai_analytics::Forecaster::new(ForecastConfig {
        seasonal_periods: usize::MAX,
        ..ForecastConfig::default()
    });
    let err = forecaster.forecast(&alternating(21), 7).unwrap_err();
    assert_eq!(err.error_code(), "INSUFFICIENT_DATA");
}

// ============================================================================
// Anomaly Detection
// ============================================================================

#[test]
fn test_zscore_scenario_flags_only_spike() {
    let values: Vec<DataPoint> =
        serde_json::from_value(json!([10, 10, {"value": 10}, {"y": 10}, 100])).unwrap();
    let records = Toolkit::new()
        .detect_anomalies(&values, &AnomalyConfig::new(AnomalyMethod::Zscore, 2.0))
        .unwrap();

    let flags: Vec<bool> = records.iter().map(|r| r.is_anomaly).collect();
    assert_eq!(flags, vec![false, false, false, false, true]);
}

#[test]
fn test_zero_variance_flags_nothing() {
    let records = Toolkit::new()
        .detect_anomalies(&points(&[3.0; 12]), &AnomalyConfig::default())
        .unwrap();
    assert!(records.iter().all(|r| !r.is_anomaly));
}

#[test]
fn test_detectors_agree_on_low_high_sequence() {
    let values = points(&[5.0, 5.0, 6.0, 5.0, 4.0, 5.0, 6.0, 5.0, 5.0, 95.0]);
    let toolkit = Toolkit::new();
    for method in [AnomalyMethod::Zscore, AnomalyMethod::Iqr] {
        let records = toolkit
            .detect_anomalies(&values, &AnomalyConfig::new(method, 2.0))
            .unwrap();
        assert!(records[9].is_anomaly, "{method:?} missed the spike");
    }
}

// ============================================================================
// Normalization and Segmentation
// ============================================================================

#[test]
fn test_normalize_maps_extremes_to_unit_range() {
    let records = vec![
        json!({"frequency": 2, "monetary": 40.0}),
        json!({"frequency": 8, "monetary": 10.0}),
        json!({"frequency": 5, "monetary": 25.0}),
    ];
    let vectors = FeatureNormalizer::normalize(&records, &["frequency", "monetary"]).unwrap();

    assert_eq!(vectors[0]["frequency"], 0.0);
    assert_eq!(vectors[1]["frequency"], 1.0);
    assert_eq!(vectors[1]["monetary"], 0.0);
    assert_eq!(vectors[0]["monetary"], 1.0);
}

#[test]
fn test_classify_customers_assignments() {
    let records: Vec<serde_json::Value> = (0..30)
        .map(|i| json!({"frequency": i % 5, "recency": (i * 7) % 30, "monetary": i * 3}))
        .collect();

    for init in [CentroidInit::Uniform, CentroidInit::KMeansPlusPlus] {
        let config = SegmentationConfig::builder()
            .clusters(4)
            .init(init)
            .seed(17)
            .build()
            .unwrap();
        let result = Toolkit::new().classify_customers(&records, &config).unwrap();

        assert_eq!(result.assignments.len(), records.len());
        assert!(result.assignments.iter().all(|a| a.cluster < 4));
        assert_eq!(result.cluster_sizes.iter().sum::<usize>(), records.len());
    }
}

#[test]
fn test_segmentation_is_reproducible_with_seed() {
    let records: Vec<serde_json::Value> = (0..20)
        .map(|i| json!({"frequency": i, "recency": 20 - i, "monetary": (i * i) % 11}))
        .collect();
    let config = SegmentationConfig::builder().seed(99).build().unwrap();
    let toolkit = Toolkit::new();

    let a = toolkit.classify_customers(&records, &config).unwrap();
    let b = toolkit.classify_customers(&records, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_zero_clusters_is_invalid_input() {
    let records = vec![json!({"frequency": 1})];
    let config = SegmentationConfig::builder().clusters(0).build().unwrap();
    let err = Toolkit::new()
        .classify_customers(&records, &config)
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_INPUT");
}

// ============================================================================
// Recommendations
// ============================================================================

fn shop() -> (
    BTreeMap<String, UserInteractions>,
    BTreeMap<String, ItemAttributes>,
) {
    let items = BTreeMap::from([
        (
            "flat-white".to_string(),
            ItemAttributes::new()
                .with("price", AttributeValue::Number(4.2))
                .with("categories", AttributeValue::Text("coffee".to_string())),
        ),
        (
            "mocha".to_string(),
            ItemAttributes::new()
                .with("price", AttributeValue::Number(4.8))
                .with("categories", AttributeValue::Text("coffee".to_string()))
                .with("tags", AttributeValue::List(vec!["chocolate".to_string()])),
        ),
        (
            "brownie".to_string(),
            ItemAttributes::new()
                .with("price", AttributeValue::Number(3.0))
                .with("categories", AttributeValue::Text("bakery".to_string()))
                .with("tags", AttributeValue::List(vec!["chocolate".to_string()])),
        ),
        (
            "scone".to_string(),
            ItemAttributes::new()
                .with("price", AttributeValue::Number(2.8))
                .with("categories", AttributeValue::Text("bakery".to_string())),
        ),
    ]);

    let users: BTreeMap<String, UserInteractions> = serde_json::from_value(json!({
        "dana": {"interactions": [{"itemId": "flat-white", "rating": 5}, {"itemId": "mocha", "rating": 4}]},
        "eli":  {"interactions": [{"itemId": "flat-white", "rating": 5}, {"itemId": "mocha", "rating": 4}, {"itemId": "brownie", "rating": 5}]},
        "fay":  {"interactions": [{"itemId": "scone"}]},
        "gus":  {"interactions": []}
    }))
    .unwrap();

    (users, items)
}

#[test]
fn test_recommendations_exclude_seen_items() {
    let (users, items) = shop();
    let toolkit = Toolkit::new();

    for method in [
        RecommendationMethod::Collaborative,
        RecommendationMethod::ContentBased,
    ] {
        let recommendations = toolkit
            .generate_recommendations(&users, &items, &RecommendationConfig::new(method))
            .unwrap();

        for (user, scores) in &recommendations {
            for score in scores {
                assert!(
                    !users[user].has_interacted(&score.item_id),
                    "{method:?} recommended {} to {user}",
                    score.item_id
                );
            }
            assert!(scores.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }
}

#[test]
fn test_collaborative_uses_similar_users() {
    let (users, items) = shop();
    let recommendations = Toolkit::new()
        .generate_recommendations(&users, &items, &RecommendationConfig::default())
        .unwrap();

    let dana: Vec<&str> = recommendations["dana"]
        .iter()
        .map(|r| r.item_id.as_str())
        .collect();
    assert_eq!(dana, vec!["brownie"]);
    assert!(recommendations["gus"].is_empty());
}

#[test]
fn test_collaborative_ignores_unrated_neighbour_items() {
    let (_, items) = shop();
    let users: BTreeMap<String, UserInteractions> = serde_json::from_value(json!({
        "hal": {"interactions": [{"itemId": "flat-white", "rating": 5}]},
        "ivy": {"interactions": [{"itemId": "flat-white", "rating": 5}, {"itemId": "brownie"}]}
    }))
    .unwrap();

    let recommendations = Toolkit::new()
        .generate_recommendations(&users, &items, &RecommendationConfig::default())
        .unwrap();
    assert!(recommendations["hal"].is_empty());
}

#[test]
fn test_recommendation_options_validated() {
    let (users, items) = shop();
    let config = RecommendationConfig {
        max_recommendations: 0,
        ..RecommendationConfig::default()
    };
    let err = Toolkit::new()
        .generate_recommendations(&users, &items, &config)
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_CONFIG");

    let implicit = UserInteractions::new(vec![Interaction::new("scone", 1.0)]);
    assert!(implicit.has_interacted("scone"));
}

// ============================================================================
// Text Analysis
// ============================================================================

fn sentiment_of(text: &str) -> (SentimentLabel, f64) {
    match Toolkit::new()
        .analyze_text(text, &TextConfig::default())
        .unwrap()
    {
        TextAnalysis::Sentiment(result) => (result.label, result.score),
        other => panic!("expected sentiment, got {other:?}"),
    }
}

#[test]
fn test_sentiment_labels() {
    assert_eq!(
        sentiment_of("This is great, wonderful, amazing service").0,
        SentimentLabel::Positive
    );
    assert_eq!(
        sentiment_of("This is terrible, awful, disappointing").0,
        SentimentLabel::Negative
    );
    assert_eq!(sentiment_of("The shop opens at nine").0, SentimentLabel::Neutral);
}

#[test]
fn test_keyword_limit() {
    let config = TextConfig {
        limit: 5,
        ..TextConfig::new(TextMethod::Keywords)
    };
    let text = "fresh bread fresh coffee warm bread fresh pastries friendly baristas \
                quick service cozy seating bread";
    let analysis = Toolkit::new().analyze_text(text, &config).unwrap();

    let TextAnalysis::Keywords(result) = analysis else {
        panic!("expected keywords");
    };
    assert_eq!(result.keywords.len(), 5);
    assert!(result.keywords.windows(2).all(|w| w[0].count >= w[1].count));
    assert_eq!(result.keywords[0].word, "fresh");
    assert_eq!(result.keywords[1].word, "bread");
}

#[test]
fn test_text_analysis_serializes_with_kind() {
    let analysis = Toolkit::new()
        .analyze_text(
            "Delivered 12/03/2025, 40% faster",
            &TextConfig::new(TextMethod::Entities),
        )
        .unwrap();
    let value = serde_json::to_value(&analysis).unwrap();

    assert_eq!(value["kind"], "entities");
    assert_eq!(value["entities"]["dates"], json!(["12/03/2025"]));
}

// ============================================================================
// Insights
// ============================================================================

#[test]
fn test_insights_from_fixture() {
    let data = load_business();
    let as_of = Utc.with_ymd_and_hms(2025, 3, 31, 0, 0, 0).unwrap();

    let insights = Toolkit::new()
        .generate_insights(&data, as_of, Some(7))
        .unwrap();
    let kinds: Vec<InsightKind> = insights.iter().map(|i| i.kind).collect();

    assert_eq!(
        kinds,
        vec![
            InsightKind::SalesAnomalies,
            InsightKind::SalesForecast,
            InsightKind::CustomerSegmentation,
            InsightKind::CustomerSentiment,
            InsightKind::PeakTraffic,
        ]
    );
    assert!(insights[0].description.contains("detected 1 unusual"));
    assert!(insights[3].description.starts_with("60% of your customer feedback"));
    assert_eq!(
        insights[4].description,
        "Your store experiences the highest foot traffic during 8AM and 9AM."
    );
    assert!(insights.iter().all(|i| (0.0..=1.0).contains(&i.confidence)));
}

#[test]
fn test_errors_serialize_with_code() {
    let err = Toolkit::new()
        .detect_anomalies(&[], &AnomalyConfig::default())
        .unwrap_err();
    let value = serde_json::to_value(&err).unwrap();

    assert_eq!(value["code"], "INVALID_INPUT");
    assert!(
        value["message"]
            .as_str()
            .unwrap()
            .starts_with("anomaly detection failed")
    );
}
