use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use crate::core::keywords::PhraseTable;
use crate::models::Sentiment;
use crate::services::LanguageModelProvider;

/// Instruction sent to the language model for three-way classification
pub const CLASSIFICATION_INSTRUCTION: &str = "classify review text strictly on gluten-safety signal, \
ignoring general food-quality sentiment, returning exactly one of positive/negative/neutral";

/// Phrases indicating a place handled gluten safely
pub const POSITIVE_PHRASES: &[&str] = &[
    "celiac safe",
    "celiac friendly",
    "gluten friendly",
    "dedicated fryer",
    "separate fryer",
    "dedicated kitchen",
    "separate kitchen",
    "took precautions",
    "no cross contamination",
    "dedicated prep area",
    "separate prep area",
    "dedicated equipment",
    "separate equipment",
    "gluten free menu",
    "gf menu",
    "allergen protocol",
    "allergen information",
    "allergen menu",
    "safe for celiac",
    "celiac approved",
    "gluten safe",
    "no issues",
    "no problems",
    "no reaction",
    "felt great",
    "very careful",
    "very accommodating",
    "understood my needs",
];

/// Phrases indicating a place was unsafe for gluten-free diners
pub const NEGATIVE_PHRASES: &[&str] = &[
    "not safe",
    "got sick",
    "no dedicated fryer",
    "shared fryer",
    "shared kitchen",
    "cross contaminated",
    "cross contamination",
    "shared equipment",
    "not celiac safe",
    "not gluten friendly",
    "got glutened",
    "had a reaction",
    "made me sick",
    "didn't understand",
    "not careful",
    "no precautions",
    "shared prep area",
    "mixed up",
    "contaminated",
    "avoid if celiac",
    "not recommended for celiac",
];

pub const NEGATION_WORDS: &[&str] = &[
    "no", "not", "never", "none", "nobody", "nothing", "neither", "nowhere", "hardly", "barely",
    "scarcely", "doesn't", "isn't", "wasn't", "shouldn't", "wouldn't", "couldn't", "won't",
    "can't", "don't", "didn't", "hasn't", "haven't", "hadn't",
];

const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(10);

/// Rule-based evidence behind a classification
#[derive(Debug, Clone)]
pub struct SentimentAnalysis {
    pub sentiment: Sentiment,
    pub positive_matches: BTreeSet<&'static str>,
    pub negative_matches: BTreeSet<&'static str>,
    /// Counted but never used to flip polarity
    pub negation_count: usize,
}

/// Classifies the gluten-safety polarity of review text
///
/// The rule-based path compares distinct positive and negative phrase hits.
/// When a language model is attached, [`SentimentClassifier::classify_enriched`]
/// asks it first and falls back to the rules on any failure.
#[derive(Clone)]
pub struct SentimentClassifier {
    positive: PhraseTable,
    negative: PhraseTable,
    negations: PhraseTable,
    language_model: Option<Arc<dyn LanguageModelProvider>>,
    model_timeout: Duration,
}

impl std::fmt::Debug for SentimentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentClassifier")
            .field("positive_phrases", &self.positive.len())
            .field("negative_phrases", &self.negative.len())
            .field("language_model", &self.language_model.is_some())
            .field("model_timeout", &self.model_timeout)
            .finish()
    }
}

impl SentimentClassifier {
    pub fn new() -> Self {
        Self {
            positive: PhraseTable::new(POSITIVE_PHRASES),
            negative: PhraseTable::new(NEGATIVE_PHRASES),
            negations: PhraseTable::new(NEGATION_WORDS),
            language_model: None,
            model_timeout: DEFAULT_MODEL_TIMEOUT,
        }
    }

    /// Attach a language model used by [`Self::classify_enriched`]
    pub fn with_language_model(
        mut self,
        model: Arc<dyn LanguageModelProvider>,
        timeout: Duration,
    ) -> Self {
        self.language_model = Some(model);
        self.model_timeout = timeout;
        self
    }

    pub fn has_language_model(&self) -> bool {
        self.language_model.is_some()
    }

    pub fn analyze(&self, text: &str) -> SentimentAnalysis {
        let positive_matches = self.positive.find_all(text);
        let negative_matches = self.negative.find_all(text);
        let negation_count = self.negations.count_occurrences(text);

        let (p, n) = (positive_matches.len(), negative_matches.len());
        let sentiment = if n > p {
            Sentiment::Negative
        } else if p > n {
            Sentiment::Positive
        } else {
            Sentiment::Neutral
        };

        SentimentAnalysis {
            sentiment,
            positive_matches,
            negative_matches,
            negation_count,
        }
    }

    /// Rule-based classification
    pub fn classify(&self, text: &str) -> Sentiment {
        self.analyze(text).sentiment
    }

    /// 1 for positive, -1 for negative, 0 otherwise
    pub fn score(&self, text: &str) -> f64 {
        self.classify(text).score()
    }

    /// Classify with the language model when one is attached
    ///
    /// Never fails: timeouts, transport errors and unparseable answers all
    /// resolve to the rule-based result.
    pub async fn classify_enriched(&self, text: &str) -> Sentiment {
        let fallback = self.classify(text);
        if text.trim().is_empty() {
            return fallback;
        }
        let Some(model) = &self.language_model else {
            return fallback;
        };

        let answer = tokio::time::timeout(
            self.model_timeout,
            model.classify(CLASSIFICATION_INSTRUCTION, text),
        )
        .await;

        match answer {
            Ok(Ok(label)) => match Sentiment::from_label(&label) {
                Some(sentiment) => sentiment,
                None => {
                    tracing::warn!("Language model returned unexpected label {:?}, using rules", label);
                    fallback
                }
            },
            Ok(Err(e)) => {
                tracing::warn!("Language model classification failed, using rules: {}", e);
                fallback
            }
            Err(_) => {
                tracing::warn!(
                    "Language model classification timed out after {:?}, using rules",
                    self.model_timeout
                );
                fallback
            }
        }
    }
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ProviderError;
    use async_trait::async_trait;

    struct FixedModel(Result<&'static str, ()>);

    #[async_trait]
    impl LanguageModelProvider for FixedModel {
        async fn classify(&self, _instruction: &str, _text: &str) -> Result<String, ProviderError> {
            self.0
                .map(str::to_string)
                .map_err(|_| ProviderError::Unavailable("model offline".into()))
        }
    }

    struct SlowModel;

    #[async_trait]
    impl LanguageModelProvider for SlowModel {
        async fn classify(&self, _instruction: &str, _text: &str) -> Result<String, ProviderError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("positive".to_string())
        }
    }

    #[test]
    fn test_positive_sentiment() {
        let classifier = SentimentClassifier::new();
        assert_eq!(classifier.classify("Celiac safe restaurant"), Sentiment::Positive);
        assert_eq!(
            classifier.classify("This restaurant is celiac safe with dedicated fryer"),
            Sentiment::Positive
        );
    }

    #[test]
    fn test_negative_sentiment() {
        let classifier = SentimentClassifier::new();
        assert_eq!(
            classifier.classify("Not safe for celiac, they use shared equipment"),
            Sentiment::Negative
        );
        assert_eq!(classifier.classify("Shared fryer used"), Sentiment::Negative);
        assert_eq!(classifier.classify("Got sick after eating here"), Sentiment::Negative);
    }

    #[test]
    fn test_neutral_sentiment() {
        let classifier = SentimentClassifier::new();
        assert_eq!(classifier.classify("They have some gluten-free options"), Sentiment::Neutral);
        assert_eq!(classifier.classify(""), Sentiment::Neutral);
        assert_eq!(classifier.score(""), 0.0);
    }

    #[test]
    fn test_tie_is_neutral() {
        let classifier = SentimentClassifier::new();
        let analysis = classifier.analyze("They have a dedicated fryer but a shared kitchen");
        assert_eq!(analysis.positive_matches.len(), 1);
        assert_eq!(analysis.negative_matches.len(), 1);
        assert_eq!(analysis.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_repeated_phrase_counts_once() {
        let classifier = SentimentClassifier::new();
        // two distinct negatives outweigh one positive repeated three times
        let text = "gluten safe, gluten safe, gluten safe... but I got sick from the shared fryer";
        assert_eq!(classifier.classify(text), Sentiment::Negative);
    }

    #[test]
    fn test_negation_does_not_flip_polarity() {
        let classifier = SentimentClassifier::new();
        let analysis = classifier.analyze("They do not have a dedicated fryer");

        assert!(analysis.negation_count >= 1);
        assert_eq!(analysis.sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_explicit_negative_phrase_wins() {
        let classifier = SentimentClassifier::new();
        // "no dedicated fryer" is its own negative entry alongside the positive "dedicated fryer"
        let analysis = classifier.analyze("There is no dedicated fryer and they got it mixed up");
        assert_eq!(analysis.sentiment, Sentiment::Negative);
    }

    #[test]
    fn test_scores() {
        let classifier = SentimentClassifier::new();
        assert_eq!(classifier.score("Celiac safe restaurant"), 1.0);
        assert_eq!(
            classifier.score("Not safe for celiac, they use shared equipment"),
            -1.0
        );
        assert_eq!(classifier.score("Some gluten-free options"), 0.0);
    }

    #[tokio::test]
    async fn test_enriched_without_model_uses_rules() {
        let classifier = SentimentClassifier::new();
        assert!(!classifier.has_language_model());
        assert_eq!(
            classifier.classify_enriched("Celiac safe restaurant").await,
            Sentiment::Positive
        );
    }

    #[tokio::test]
    async fn test_enriched_prefers_model_answer() {
        let classifier = SentimentClassifier::new()
            .with_language_model(Arc::new(FixedModel(Ok(" Negative\n"))), Duration::from_secs(1));
        assert_eq!(
            classifier.classify_enriched("Celiac safe restaurant").await,
            Sentiment::Negative
        );
    }

    #[test]
    fn test_enriched_falls_back_on_failure() {
        let failing = SentimentClassifier::new()
            .with_language_model(Arc::new(FixedModel(Err(()))), Duration::from_secs(1));
        let garbled = SentimentClassifier::new()
            .with_language_model(Arc::new(FixedModel(Ok("maybe?"))), Duration::from_secs(1));

        let text = "Not safe for celiac, they use shared equipment";
        assert_eq!(tokio_test::block_on(failing.classify_enriched(text)), Sentiment::Negative);
        assert_eq!(tokio_test::block_on(garbled.classify_enriched(text)), Sentiment::Negative);
    }

    #[tokio::test]
    async fn test_enriched_falls_back_on_timeout() {
        let classifier = SentimentClassifier::new()
            .with_language_model(Arc::new(SlowModel), Duration::from_millis(50));
        assert_eq!(
            classifier.classify_enriched("I got sick, shared fryer").await,
            Sentiment::Negative
        );
    }
}
