use std::collections::BTreeSet;

use regex::{Regex, RegexSet};

/// Gluten-relevant phrases a review must mention to count toward a place's signal
pub const GLUTEN_PHRASES: &[&str] = &[
    // Basic gluten terms
    "gluten free",
    "gluten-free",
    "gf",
    "celiac",
    "coeliac",
    "gluten allergy",
    "gluten intolerance",
    "gluten sensitive",
    // Cross-contamination and kitchen setup
    "cross contamination",
    "cross-contamination",
    "separate fryer",
    "dedicated fryer",
    "dedicated kitchen",
    "dedicated space",
    "separate kitchen",
    "shared equipment",
    // Safety indicators
    "gluten friendly",
    "celiac safe",
    "celiac friendly",
    "took precautions",
    "no cross contamination",
    "dedicated prep area",
    "separate prep area",
    // Negative indicators
    "not safe",
    "got sick",
    "no dedicated fryer",
    "shared fryer",
    "shared kitchen",
    "cross contaminated",
    // Equipment and menus
    "dedicated equipment",
    "separate equipment",
    "gluten free menu",
    "gf menu",
    "allergen menu",
    "allergen information",
    "allergen protocol",
];

/// Case-insensitive phrase table matched on word boundaries
///
/// Each phrase compiles to `(?i)\b<phrase>\b`, so "gluten free" never
/// matches inside "glutenfree" or "gluten freely".
#[derive(Debug, Clone)]
pub struct PhraseTable {
    phrases: Vec<&'static str>,
    set: RegexSet,
    patterns: Vec<Regex>,
}

fn bounded_pattern(phrase: &str) -> String {
    format!(r"(?i)\b{}\b", regex::escape(phrase))
}

impl PhraseTable {
    pub fn new(phrases: &[&'static str]) -> Self {
        let mut phrases = phrases.to_vec();
        phrases.sort_unstable();
        phrases.dedup();

        let sources: Vec<String> = phrases.iter().map(|p| bounded_pattern(p)).collect();
        let set = RegexSet::new(&sources).expect("Invalid phrase table regex");
        let patterns = sources
            .iter()
            .map(|source| Regex::new(source).expect("Invalid phrase regex"))
            .collect();

        Self { phrases, set, patterns }
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Distinct phrases present in `text`
    pub fn find_all(&self, text: &str) -> BTreeSet<&'static str> {
        if text.trim().is_empty() {
            return BTreeSet::new();
        }

        self.set
            .matches(text)
            .into_iter()
            .map(|index| self.phrases[index])
            .collect()
    }

    /// Total occurrences of all phrases, repeats included
    pub fn count_occurrences(&self, text: &str) -> usize {
        if text.trim().is_empty() {
            return 0;
        }

        self.patterns
            .iter()
            .map(|pattern| pattern.find_iter(text).count())
            .sum()
    }
}

/// Detects gluten-relevant phrases in review text
#[derive(Debug, Clone)]
pub struct KeywordDetector {
    table: PhraseTable,
}

impl KeywordDetector {
    pub fn new() -> Self {
        Self::with_phrases(GLUTEN_PHRASES)
    }

    pub fn with_phrases(phrases: &[&'static str]) -> Self {
        Self {
            table: PhraseTable::new(phrases),
        }
    }

    /// Unique gluten phrases found in `text`
    pub fn detect(&self, text: &str) -> BTreeSet<&'static str> {
        self.table.find_all(text)
    }

    #[inline]
    pub fn has_match(&self, text: &str) -> bool {
        !self.detect(text).is_empty()
    }

    /// Number of distinct phrases, not occurrences
    pub fn count_matches(&self, text: &str) -> usize {
        self.detect(text).len()
    }
}

impl Default for KeywordDetector {
    fn default() -> Self {
        Self::new()
    }
}
