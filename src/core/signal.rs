use std::collections::BTreeSet;

use futures::future::join_all;

use crate::core::{keywords::KeywordDetector, sentiment::SentimentClassifier};
use crate::models::{GlutenSignal, ReviewText, Sentiment};

/// A gluten-relevant review and how it was classified
#[derive(Debug, Clone)]
pub struct ClassifiedReview {
    pub review: ReviewText,
    pub keywords: BTreeSet<&'static str>,
    pub sentiment: Sentiment,
}

/// Outcome of scanning one place's reviews
#[derive(Debug, Clone, Default)]
pub struct ReviewAnalysis {
    pub signal: GlutenSignal,
    pub relevant: Vec<ClassifiedReview>,
}

impl ReviewAnalysis {
    fn from_classified(relevant: Vec<ClassifiedReview>) -> Self {
        let signal = relevant
            .iter()
            .fold(GlutenSignal::default(), |signal, r| signal.record(r.sentiment));
        Self { signal, relevant }
    }
}

/// Turns raw reviews into a [`GlutenSignal`]
///
/// Only reviews with at least one gluten phrase are classified.
#[derive(Debug, Clone, Default)]
pub struct SignalExtractor {
    detector: KeywordDetector,
    classifier: SentimentClassifier,
}

impl SignalExtractor {
    pub fn new(detector: KeywordDetector, classifier: SentimentClassifier) -> Self {
        Self { detector, classifier }
    }

    fn relevant<'a>(
        &'a self,
        reviews: &'a [ReviewText],
    ) -> impl Iterator<Item = (&'a ReviewText, BTreeSet<&'static str>)> + 'a {
        reviews.iter().filter_map(|review| {
            let keywords = self.detector.detect(&review.text);
            (!keywords.is_empty()).then_some((review, keywords))
        })
    }

    /// Rule-based analysis
    pub fn extract(&self, reviews: &[ReviewText]) -> ReviewAnalysis {
        let relevant = self
            .relevant(reviews)
            .map(|(review, keywords)| ClassifiedReview {
                sentiment: self.classifier.classify(&review.text),
                review: review.clone(),
                keywords,
            })
            .collect();

        ReviewAnalysis::from_classified(relevant)
    }

    /// Analysis using the language model for classification when one is attached
    pub async fn extract_enriched(&self, reviews: &[ReviewText]) -> ReviewAnalysis {
        if !self.classifier.has_language_model() {
            return self.extract(reviews);
        }

        let classified = self.relevant(reviews).map(|(review, keywords)| async move {
            ClassifiedReview {
                sentiment: self.classifier.classify_enriched(&review.text).await,
                review: review.clone(),
                keywords,
            }
        });

        ReviewAnalysis::from_classified(join_all(classified).await)
    }
}

/// One-line description of a place's gluten reviews
pub fn summarize(signal: &GlutenSignal) -> String {
    let GlutenSignal {
        gluten_review_count: total,
        positive_count: positive,
        negative_count: negative,
    } = *signal;

    if total == 0 {
        return "No gluten-related reviews found.".to_string();
    }

    if positive > negative {
        format!("Mostly positive gluten reviews ({}/{} positive)", positive, total)
    } else if negative > positive {
        format!("Mostly negative gluten reviews ({}/{} negative)", negative, total)
    } else {
        format!(
            "Mixed gluten reviews ({} positive, {} negative out of {})",
            positive, negative, total
        )
    }
}
