// Unit tests for SafeBites Algo

use safebites_algo::core::{
    confidence::{volume_bonus, wilson_lower_bound, ConfidenceEstimator, DEFAULT_Z},
    cuisine::CuisineMatcher,
    distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box},
    keywords::KeywordDetector,
    sentiment::SentimentClassifier,
    signal::summarize,
};
use safebites_algo::models::{GlutenSignal, Sentiment};

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(33.7490, -84.3880, 33.7490, -84.3880);
    assert!(distance < 0.01);
}

#[test]
fn test_haversine_distance_atlanta_to_new_york() {
    // Roughly 746 miles as the crow flies
    let distance = haversine_distance(33.7490, -84.3880, 40.7128, -74.0060);
    assert!((distance - 746.0).abs() < 10.0, "Expected ~746mi, got {}", distance);
}

#[test]
fn test_haversine_symmetric() {
    let ab = haversine_distance(33.7490, -84.3880, 34.0522, -118.2437);
    let ba = haversine_distance(34.0522, -118.2437, 33.7490, -84.3880);
    assert!((ab - ba).abs() < 1e-9);
}

#[test]
fn test_point_within_bbox() {
    let bbox = calculate_bounding_box(33.7490, -84.3880, 10.0);

    // Center point is within
    assert!(is_within_bounding_box(33.7490, -84.3880, &bbox));

    // Far point is not within
    assert!(!is_within_bounding_box(40.0, -80.0, &bbox));

    // Point just outside latitude is not within
    assert!(!is_within_bounding_box(bbox.max_lat + 0.01, -84.3880, &bbox));
}

#[test]
fn test_wilson_bound_never_exceeds_observed() {
    for n in [1u64, 2, 5, 10, 50, 100, 1000] {
        for phat in [0.0, 0.1, 0.5, 0.8, 1.0] {
            let lb = wilson_lower_bound(phat, n, DEFAULT_Z);
            assert!(lb <= phat + 1e-12, "lb {} > phat {} at n={}", lb, phat, n);
        }
    }
}

#[test]
fn test_wilson_bound_increases_with_sample_size() {
    let mut previous = 0.0;
    for n in [5u64, 10, 50, 100, 1000, 10_000] {
        let lb = wilson_lower_bound(0.8, n, DEFAULT_Z);
        assert!(lb > previous, "lb should grow with n");
        previous = lb;
    }
    assert!(previous < 0.8);
}

#[test]
fn test_confidence_degenerate_inputs() {
    let estimator = ConfidenceEstimator::default();
    assert_eq!(estimator.estimate(0, 0, 0), 0);
    // relevant but never polarized
    assert_eq!(estimator.estimate(0, 0, 12), 0);

    for n in [1u32, 3, 10, 100] {
        assert!(estimator.estimate(n, 0, n) > 0, "all-positive N={} should be > 0", n);
        assert_eq!(estimator.estimate(0, n, n), 0, "all-negative N={} should be 0", n);
    }
}

#[test]
fn test_confidence_monotonic_in_volume() {
    let estimator = ConfidenceEstimator::default();
    assert!(estimator.estimate(8, 2, 10) <= estimator.estimate(80, 20, 100));
    assert_eq!(estimator.estimate(8, 2, 10), 50);
    assert_eq!(estimator.estimate(80, 20, 100), 80);
}

#[test]
fn test_volume_bonus_saturates() {
    assert_eq!(volume_bonus(0), 0.0);
    assert!((volume_bonus(99) - 1.0).abs() < 1e-12);
    assert_eq!(volume_bonus(10_000), 1.0);
}

#[test]
fn test_keyword_boundaries() {
    let detector = KeywordDetector::new();
    assert!(detector.detect("").is_empty());
    assert!(!detector.has_match("The glutenfree pizza was good"));
    assert!(detector.has_match("The gluten-free pizza was good"));
    assert!(detector.has_match("GF options everywhere"));
    assert!(!detector.has_match("The gfx card was loud"));
}

#[test]
fn test_sentiment_classification() {
    let classifier = SentimentClassifier::new();
    assert_eq!(classifier.classify("Celiac safe restaurant"), Sentiment::Positive);
    assert_eq!(
        classifier.classify("Not safe for celiac, they use shared equipment"),
        Sentiment::Negative
    );
    assert_eq!(classifier.classify("They have some gluten-free options"), Sentiment::Neutral);
    assert_eq!(classifier.classify(""), Sentiment::Neutral);
}

#[test]
fn test_cuisine_lookup() {
    let matcher = CuisineMatcher::new();
    assert_eq!(matcher.search_terms("PIZZA")[0], "pizza");
    assert!(matcher.matches("Trattoria", &["pizza"], "italian"));
    assert!(!matcher.matches("Trattoria", &["thai"], "italian"));
}

#[test]
fn test_summary_counts() {
    let signal = [Sentiment::Negative, Sentiment::Negative, Sentiment::Positive]
        .into_iter()
        .fold(GlutenSignal::default(), GlutenSignal::record);

    assert_eq!(summarize(&signal), "Mostly negative gluten reviews (2/3 negative)");
}
